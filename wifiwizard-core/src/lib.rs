//! Core library for WifiWizard.
//! This crate defines the `Bridge` trait and the `WifiWizard` facade that
//! validates and reshapes WiFi configuration calls before handing them to a
//! bridge, plus the bridge implementations (mock, wpa_cli, nmcli).

pub mod bridges;
pub mod config;
pub mod factory;
pub mod format;
pub mod traits;
pub mod wizard;

pub use format::{format_wifi_config, format_wifi_string};
pub use traits::{Action, Bridge, ConfiguredNetwork, SERVICE_NAME, WifiConfig};
pub use wizard::WifiWizard;

// Define a shared Error and Result type for the entire crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid arguments for {action}: expected {expected}, got {got}")]
    InvalidArguments {
        action: traits::Action,
        expected: usize,
        got: usize,
    },

    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("No tokio runtime available to dispatch bridge calls")]
    NoRuntime,

    // 以下为本地参数校验失败，只用于日志，不会交给回调
    #[error("No SSID given")]
    MissingSsid,

    #[error("No authentication algorithm given")]
    MissingAuthAlg,

    #[error("listNetworks requires a success handler")]
    MissingSuccessHandler,
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;
