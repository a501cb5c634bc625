//! Stand-in login routine for trying webqr without a messaging backend
//!
//! Prints one `{"qrDataUrl": ...}` record on stdout, the same shape the real
//! login bridge emits. Point `login.program` at the built example:
//!
//! ```toml
//! [login]
//! program = "target/debug/examples/generate_qr"
//! args = ["demo-token-{timeout_ms}"]
//! ```

use webqr::RawLoginResult;
use webqr::data_url::encode_png_data_url;
use webqr::QrEncoder;

fn main() -> anyhow::Result<()> {
    let token = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "2@webqr-demo-token".to_string());

    let png = QrEncoder::new().encode_png(&token)?;
    let record = RawLoginResult {
        qr_data_url: Some(encode_png_data_url(&png)),
        message: None,
    };

    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}
