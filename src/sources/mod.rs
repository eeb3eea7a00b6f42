pub mod traits;
pub mod xtream;

pub use traits::{ChannelLister, LiveSource, StreamUrlGenerator};
pub use xtream::XtreamClient;
