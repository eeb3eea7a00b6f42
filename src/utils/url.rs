//! URL helpers

use regex::Regex;
use url::Url;

pub struct UrlUtils;

impl UrlUtils {
    /// Mask credentials in a URL before it is written to a log.
    ///
    /// Handles `user:pass@host` authority, credential query parameters and
    /// Xtream playback paths (`/live/{user}/{pass}/...`).
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        if let Ok(parsed) = Url::parse(url) {
            if !parsed.username().is_empty() || parsed.password().is_some() {
                let mut new_url = parsed.clone();
                let _ = new_url.set_username("****");
                let _ = new_url.set_password(Some("****"));
                obfuscated = new_url.to_string();
            }
        }

        let sensitive_params = ["username", "password", "user", "pass", "pwd", "passwd"];
        for param in &sensitive_params {
            let pattern = format!(r"(?i)([?&]{}=)[^&]*", regex::escape(param));
            if let Ok(re) = Regex::new(&pattern) {
                obfuscated = re.replace_all(&obfuscated, "${1}****").to_string();
            }
        }

        if let Ok(re) = Regex::new(r"(/(?:live|movie|series)/)[^/]+/[^/]+/") {
            obfuscated = re.replace_all(&obfuscated, "${1}****/****/").to_string();
        }

        obfuscated
    }
}
