use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::io::Read;
use xz2::read::XzDecoder;

use crate::errors::{SourceError, SourceResult};

/// Supported compression formats detected by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Gzip,
    Bzip2,
    Xz,
    Uncompressed,
}

/// Magic byte detection and decompression for downloaded feeds
pub struct DecompressionService;

impl DecompressionService {
    pub fn detect_compression_format(data: &[u8]) -> CompressionFormat {
        match infer::get(data).map(|kind| kind.mime_type()) {
            Some("application/gzip") => CompressionFormat::Gzip,
            Some("application/x-bzip2") => CompressionFormat::Bzip2,
            Some("application/x-xz") => CompressionFormat::Xz,
            _ => CompressionFormat::Uncompressed,
        }
    }

    /// Inflate the body if needed and decode it as UTF-8 text.
    pub fn decompress_to_string(data: &[u8]) -> SourceResult<String> {
        let bytes = match Self::detect_compression_format(data) {
            CompressionFormat::Gzip => Self::read_all(GzDecoder::new(data), "gzip")?,
            CompressionFormat::Bzip2 => Self::read_all(BzDecoder::new(data), "bzip2")?,
            CompressionFormat::Xz => Self::read_all(XzDecoder::new(data), "xz")?,
            CompressionFormat::Uncompressed => data.to_vec(),
        };

        String::from_utf8(bytes)
            .map_err(|e| SourceError::parse_error("xmltv", format!("Feed is not valid UTF-8: {e}")))
    }

    fn read_all<R: Read>(mut decoder: R, format: &str) -> SourceResult<Vec<u8>> {
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| SourceError::Decompression {
                message: format!("Failed to decompress {format} data: {e}"),
            })?;
        Ok(decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FEED: &str = "<tv><programme/></tv>";

    #[test]
    fn test_plain_text_passes_through() {
        let body = b"<tv></tv>";
        assert_eq!(
            DecompressionService::detect_compression_format(body),
            CompressionFormat::Uncompressed
        );
        assert_eq!(
            DecompressionService::decompress_to_string(body).unwrap(),
            "<tv></tv>"
        );
    }

    #[test]
    fn test_gzip_is_inflated() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(FEED.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(
            DecompressionService::detect_compression_format(&compressed),
            CompressionFormat::Gzip
        );
        assert_eq!(
            DecompressionService::decompress_to_string(&compressed).unwrap(),
            FEED
        );
    }

    #[test]
    fn test_bzip2_is_inflated() {
        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(FEED.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(
            DecompressionService::detect_compression_format(&compressed),
            CompressionFormat::Bzip2
        );
        assert_eq!(
            DecompressionService::decompress_to_string(&compressed).unwrap(),
            FEED
        );
    }

    #[test]
    fn test_xz_is_inflated() {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(FEED.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert!(compressed.starts_with(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]));
        assert_eq!(
            DecompressionService::detect_compression_format(&compressed),
            CompressionFormat::Xz
        );
        assert_eq!(
            DecompressionService::decompress_to_string(&compressed).unwrap(),
            FEED
        );
    }

    #[test]
    fn test_truncated_gzip_is_an_error() {
        let err = DecompressionService::decompress_to_string(&[0x1f, 0x8b, 0x08]).unwrap_err();
        assert!(matches!(err, SourceError::Decompression { .. }));
    }
}
