//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default backend address
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Resource path of the friends collection
pub const FRIENDS_PATH: &str = "/api/friends";

/// Avatar pre-filled in the add-friend form
pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/48";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "splitmon.log";

/// Directory under $HOME holding the optional config file
pub const CONFIG_DIR_NAME: &str = ".splitmon";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application name
pub const APP_NAME: &str = "SPLITMON";
