use std::path::PathBuf;

use thiserror::Error;

/// Result type returned from functions that can have our `Error`s.
pub type Result<T, E = BacklightError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BacklightError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidRegex(#[from] regex::Error),

    #[cfg(feature = "logind")]
    #[error("{0}")]
    DBus(#[from] zbus::Error),

    #[error("Initialization failed: {0}")]
    Init(String),

    #[error("Backlight manager is not initialized")]
    NotInitialized,

    #[error("Invalid subsystem {0:?}")]
    InvalidSubsystem(String),

    #[error("Enumerate scan of {} failed: {source}", path.display())]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid device: {}", .0.display())]
    InvalidDevice(PathBuf),

    #[error("Device {} has no attribute {attribute:?}", syspath.display())]
    NoSuchAttribute { syspath: PathBuf, attribute: String },

    #[error("Writing {value} to {attribute} of {} failed: {source}", syspath.display())]
    Write {
        syspath: PathBuf,
        attribute: String,
        value: String,
        source: std::io::Error,
    },

    #[error("No matching devices exist")]
    NoDevices,

    #[error("{0}")]
    Other(String),
}
