//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default collection endpoint for exhibits
pub const DEFAULT_EXHIBITS_API: &str =
    "https://functions.poehali.dev/a5f75286-e43d-41cf-9f8e-a0761fc19330";

/// Default collection endpoint for virtual tours
pub const DEFAULT_TOURS_API: &str =
    "https://functions.poehali.dev/6e807a4d-b14e-4443-b1c0-a408a63c11d7";

/// Request timeout when the config file doesn't set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How long a toast stays on screen
pub const DEFAULT_TOAST_TTL_SECS: u64 = 4;

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "museum-tui.log";

/// Directory under $HOME holding config.yaml
pub const CONFIG_DIR_NAME: &str = ".museum";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application name
pub const APP_NAME: &str = "Museum";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
