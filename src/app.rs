//! One login attempt, from the login routine to the PNG on disk

use crate::config::{OutputOptions, WebQrConfig};
use crate::data_url::decode_png_data_url;
use crate::error::{Error, Result};
use crate::instructions;
use crate::login::{LoginInitiator, LoginResult};
use crate::qr::{QrEncoder, QrImage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// QR image written to disk
    Saved {
        /// Destination file
        path: PathBuf,
        /// Number of PNG bytes written
        bytes: usize,
    },
    /// The login routine only reported a status
    Message(String),
}

/// Start a login, save the QR image if one comes back, and print operator text to `out`.
///
/// `ssh_connection` is the value of `SSH_CONNECTION`, used for the `scp` hint.
pub async fn run<I, W>(
    initiator: &I,
    config: &WebQrConfig,
    ssh_connection: Option<&str>,
    out: &mut W,
) -> Result<Outcome>
where
    I: LoginInitiator + ?Sized,
    W: Write,
{
    writeln!(out, "Starting web login...")?;

    match initiator.start(config.login.timeout()).await? {
        LoginResult::Qr { data_url } => {
            let mut qr = QrImage::from_png(decode_png_data_url(&data_url)?);
            if config.output.should_verify() {
                qr.verify()?;
            }

            let path = &config.output.path;
            write_qr(path, qr.as_bytes())?;
            info!(path = %path.display(), bytes = qr.as_bytes().len(), "Saved QR image");

            for line in instructions::render(path, &config.output, ssh_connection) {
                writeln!(out, "{line}")?;
            }
            print_terminal(&qr, &config.output, out)?;

            Ok(Outcome::Saved {
                path: path.clone(),
                bytes: qr.as_bytes().len(),
            })
        }
        LoginResult::Message(message) => {
            writeln!(out, "\n{message}")?;
            Ok(Outcome::Message(message))
        }
    }
}

/// Write PNG bytes to `path`, creating parent directories as needed.
pub fn write_qr(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory {}: {e}", parent.display()),
                ))
            })?;
        }
    }

    fs::write(path, bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {e}", path.display()),
        ))
    })
}

fn print_terminal<W: Write>(qr: &QrImage, options: &OutputOptions, out: &mut W) -> Result<()> {
    if !options.terminal {
        return Ok(());
    }
    let Some(text) = qr.text() else {
        return Ok(());
    };

    writeln!(out, "\nOr scan directly from this terminal:\n")?;
    writeln!(out, "{}", QrEncoder::new().render_terminal(text)?)?;
    Ok(())
}
