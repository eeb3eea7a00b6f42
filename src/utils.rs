//! Utility functions for the IPTV addon
//!
//! - `time`: XMLTV timestamp parsing
//! - `url`: credential obfuscation for log output
//! - `xmltv_parser`: streaming programme extraction
//! - `decompression`: gzip feed detection and inflation
//! - `http_client`: reqwest client construction

pub mod decompression;
pub mod http_client;
pub mod time;
pub mod url;
pub mod xmltv_parser;

pub use self::decompression::DecompressionService;
pub use self::http_client::build_http_client;
pub use self::time::parse_xmltv_timestamp;
pub use self::url::UrlUtils;
pub use self::xmltv_parser::{XmltvProgramme, XmltvProgrammes};

/// Format a duration in milliseconds into a human-readable string
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{minutes}m{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m5s");
    }
}
