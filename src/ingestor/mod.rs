pub mod ingest_epg;
pub mod scheduler;

pub use ingest_epg::{EpgIngestor, RefreshOutcome};
pub use scheduler::{create_shutdown_channel, EpgRefreshScheduler, ShutdownReceiver, ShutdownSender};
