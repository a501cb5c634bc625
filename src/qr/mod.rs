//! QR image handling
//!
//! The login routine hands back a PNG. Before it is written out the image can
//! be checked for a readable QR code, and the code can be redrawn in the
//! terminal for operators scanning straight from an SSH session.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;

use crate::error::Result;
use image::ImageFormat;

/// A decoded login QR image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    /// Raw PNG bytes exactly as decoded from the data URL
    bytes: Vec<u8>,
    /// QR text content, known once the image has been verified
    text: Option<String>,
}

impl QrImage {
    /// Wrap PNG bytes without inspecting them
    pub fn from_png(bytes: Vec<u8>) -> Self {
        Self { bytes, text: None }
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// QR text content, if the image has been verified
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Decode the PNG and locate a QR code in it, returning its text.
    pub fn verify(&mut self) -> Result<&str> {
        let image = image::load_from_memory_with_format(&self.bytes, ImageFormat::Png)?;
        let text = QrDecoder::new().decode(&image)?;
        tracing::debug!(width = image.width(), height = image.height(), "Verified QR image");
        Ok(self.text.insert(text).as_str())
    }
}
