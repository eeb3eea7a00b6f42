//! Error type definitions for the IPTV addon

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration; fatal at startup
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Upstream (provider or EPG feed) errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// HTTP client construction or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

}

/// Errors raised while talking to the IPTV provider or the EPG feed
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request never produced a response
    #[error("Request failed: {url} - {message}")]
    Transport { url: String, message: String },

    /// The upstream answered with a non-success status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The body could not be interpreted
    #[error("Parse error: {source_type} - {message}")]
    ParseError { source_type: String, message: String },

    /// The body looked compressed but could not be inflated
    #[error("Decompression failed: {message}")]
    Decompression { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a transport error; `url` should already be obfuscated
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http<M: Into<String>>(status: u16, message: M) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error<S: Into<String>, M: Into<String>>(source_type: S, message: M) -> Self {
        Self::ParseError {
            source_type: source_type.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_converts_into_app_error() {
        let err: AppError = SourceError::http(502, "Bad Gateway").into();
        assert!(matches!(err, AppError::Source(SourceError::Http { status: 502, .. })));
        assert_eq!(err.to_string(), "Source error: HTTP error: 502 - Bad Gateway");
    }

    #[test]
    fn test_configuration_message() {
        let err = AppError::configuration("Missing required environment variables: IPTV_USER");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variables: IPTV_USER"
        );
    }

    #[tokio::test]
    async fn test_client_errors_are_http_errors() {
        let err = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        let err: AppError = err.into();
        assert!(matches!(err, AppError::Http(_)));
        assert!(err.to_string().starts_with("HTTP error: "));
    }

    #[test]
    fn test_app_error_variants() {
        fn fatal_at_startup(err: &AppError) -> bool {
            match err {
                AppError::Configuration { .. } | AppError::Http(_) => true,
                AppError::Source(_) => false,
            }
        }

        assert!(fatal_at_startup(&AppError::configuration("bad port")));
        assert!(!fatal_at_startup(&SourceError::http(500, "oops").into()));
    }
}
