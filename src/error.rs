//! Start-up and configuration errors
//!
//! The simulation itself never fails; everything here happens before the
//! first tick runs.

use thiserror::Error;

/// Errors that abort game initialization.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no browser window available")]
    NoWindow,

    #[error("no document attached to the window")]
    NoDocument,

    #[error("render target #{0} not found")]
    MissingElement(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
