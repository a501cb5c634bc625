//! Error types for webqr operations

use thiserror::Error;

/// Result type alias using webqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// The external login routine failed or timed out
    #[error("Login failed: {0}")]
    Login(String),

    /// The login routine returned neither a QR code nor a message
    #[error("Login returned neither a QR code nor a status message")]
    EmptyLoginResult,

    /// Malformed data URL or base64 payload
    #[error("Invalid QR data URL: {0}")]
    DataUrl(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// No QR code found in the decoded image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::DataUrl(format!("base64 decode error: {}", e))
    }
}
