//! PNG data URL decoding

use crate::error::{Error, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::{DecodePaddingMode, Engine as _};

/// MIME prefix carried by QR payloads returned from the login routine
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Lenient decoder: padding optional, stray trailing bits tolerated
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Remove a single leading `data:image/png;base64,` prefix.
///
/// Input without the prefix is returned unchanged.
pub fn strip_png_prefix(data_url: &str) -> &str {
    data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .unwrap_or(data_url)
}

/// Decode a PNG data URL into raw image bytes.
///
/// Whitespace anywhere in the payload is ignored and `=` padding is optional.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload: String = strip_png_prefix(data_url)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(Error::DataUrl("empty base64 payload".to_string()));
    }

    let bytes = LENIENT.decode(&payload)?;
    tracing::debug!(
        encoded = payload.len(),
        decoded = bytes.len(),
        "Decoded QR data URL"
    );
    Ok(bytes)
}

/// Encode PNG bytes as a data URL in the same shape the login routine emits.
pub fn encode_png_data_url(bytes: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes))
}
