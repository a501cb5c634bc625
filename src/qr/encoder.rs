//! QR code encoder

use crate::error::{Error, Result};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use qrcode::render::unicode;
use std::io::Cursor;

/// QR code encoder
pub struct QrEncoder {
    /// Error correction level
    ecc_level: qrcode::EcLevel,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC)
    pub fn new() -> Self {
        Self {
            ecc_level: qrcode::EcLevel::M,
        }
    }

    fn code(&self, text: &str) -> Result<QrCode> {
        QrCode::with_error_correction_level(text.as_bytes(), self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))
    }

    /// Encode text into PNG bytes shaped like the login routine's output
    pub fn encode_png(&self, text: &str) -> Result<Vec<u8>> {
        let image = self
            .code(text)?
            .render::<Luma<u8>>()
            .min_dimensions(264, 264)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Draw text as a QR code using half-height Unicode blocks.
    ///
    /// Colours are inverted so the code scans on dark terminal backgrounds.
    pub fn render_terminal(&self, text: &str) -> Result<String> {
        Ok(self
            .code(text)?
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build())
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
