//! Data types shared across the addon
//!
//! - [`ProgrammeEntry`]: a normalised EPG programme
//! - [`ChannelRecord`]: one live stream as returned by the provider
//! - addon wire types: manifest, catalog, stream and meta envelopes

pub mod addon;
pub mod programme;
pub mod xtream;

pub use addon::*;
pub use programme::ProgrammeEntry;
pub use xtream::ChannelRecord;
