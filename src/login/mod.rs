//! Login routine seam
//!
//! The QR handshake itself is owned by an external routine. This module
//! defines the result it hands back and the trait the orchestrator drives.

mod command;

pub use command::CommandLoginInitiator;

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Starts a web login and yields either a QR code or a status message
#[async_trait]
pub trait LoginInitiator: Send + Sync {
    /// Begin the login, waiting at most `timeout` for a QR code.
    async fn start(&self, timeout: Duration) -> Result<LoginResult>;
}

/// Outcome of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// A QR code is waiting to be scanned, as a `data:image/png;base64,` URL
    Qr {
        /// PNG data URL
        data_url: String,
    },
    /// No QR code; the routine reported a status instead (e.g. already linked)
    Message(String),
}

/// Result record as the login routine serialises it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoginResult {
    /// PNG data URL, when a QR code was produced
    #[serde(default)]
    pub qr_data_url: Option<String>,
    /// Plain-text status
    #[serde(default)]
    pub message: Option<String>,
}

impl TryFrom<RawLoginResult> for LoginResult {
    type Error = Error;

    fn try_from(raw: RawLoginResult) -> Result<Self> {
        let qr = raw.qr_data_url.filter(|url| !url.is_empty());
        let message = raw.message.filter(|msg| !msg.is_empty());

        match (qr, message) {
            (Some(data_url), message) => {
                if let Some(message) = message {
                    tracing::debug!(%message, "Login returned a message alongside the QR code");
                }
                Ok(LoginResult::Qr { data_url })
            }
            (None, Some(message)) => Ok(LoginResult::Message(message)),
            (None, None) => Err(Error::EmptyLoginResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(qr: Option<&str>, message: Option<&str>) -> RawLoginResult {
        RawLoginResult {
            qr_data_url: qr.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn qr_takes_precedence_over_message() {
        let result = LoginResult::try_from(raw(Some("data:image/png;base64,AA=="), Some("hi")));
        assert_eq!(
            result.unwrap(),
            LoginResult::Qr {
                data_url: "data:image/png;base64,AA==".to_string()
            }
        );
    }

    #[test]
    fn message_only() {
        let result = LoginResult::try_from(raw(None, Some("Already linked"))).unwrap();
        assert_eq!(result, LoginResult::Message("Already linked".to_string()));
    }

    #[test]
    fn neither_field_is_an_error() {
        assert!(matches!(
            LoginResult::try_from(raw(None, None)),
            Err(Error::EmptyLoginResult)
        ));
        assert!(matches!(
            LoginResult::try_from(raw(Some(""), Some(""))),
            Err(Error::EmptyLoginResult)
        ));
    }

    #[test]
    fn deserialises_camel_case_record() {
        let parsed: RawLoginResult =
            serde_json::from_str(r#"{"qrDataUrl":null,"message":"Scan pending"}"#).unwrap();
        assert_eq!(parsed, raw(None, Some("Scan pending")));

        let empty: RawLoginResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RawLoginResult::default());
    }
}
