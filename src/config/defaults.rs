/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
use std::time::Duration;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 10000;

// EPG defaults
pub const DEFAULT_EPG_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_EPG_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MAX_PROGRAMMES_PER_CHANNEL: usize = 10;

// Environment variable names; also used in startup error messages
pub const ENV_USERNAME: &str = "IPTV_USER";
pub const ENV_PASSWORD: &str = "IPTV_PASS";
pub const ENV_SERVER: &str = "IPTV_SERVER";
pub const ENV_EPG_URL: &str = "EPG_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
