//! webqr - fetch a messaging web-login QR code for remote scanning
//!
//! Starts a web login through an external routine, decodes the QR code it
//! returns as a `data:image/png;base64,` URL, writes the PNG to disk and
//! tells the operator how to copy it to a phone-friendly screen.
//!
//! # Example
//!
//! ```no_run
//! use webqr::{CommandLoginInitiator, WebQrConfig, app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WebQrConfig::load(None)?;
//!     let initiator = CommandLoginInitiator::new(&config.login);
//!
//!     let ssh = std::env::var("SSH_CONNECTION").ok();
//!     let outcome = app::run(&initiator, &config, ssh.as_deref(), &mut std::io::stdout()).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod app;
pub mod config;
pub mod data_url;
pub mod error;
pub mod instructions;
pub mod logging;
pub mod login;
pub mod qr;

// Re-exports for convenience
pub use app::Outcome;
pub use config::{LogRotation, LoggingOptions, LoginOptions, OutputOptions, WebQrConfig};
pub use error::{Error, Result};
pub use login::{CommandLoginInitiator, LoginInitiator, LoginResult, RawLoginResult};
pub use qr::{QrDecoder, QrEncoder, QrImage};
