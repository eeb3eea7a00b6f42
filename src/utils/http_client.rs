use reqwest::Client;
use std::time::Duration;

use crate::errors::AppResult;

const USER_AGENT: &str = concat!("iptv-addon/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the provider and EPG calls.
///
/// No timeout is applied unless one is configured.
pub fn build_http_client(timeout: Option<Duration>) -> AppResult<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_and_without_timeout() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some(Duration::from_secs(5))).is_ok());
    }
}
