//! Login routine run as a child process
//!
//! The child receives the timeout in `WEBQR_TIMEOUT_MS` (and in any argument
//! containing `{timeout_ms}`), ends its stdout with a JSON record
//! `{"qrDataUrl": ..., "message": ...}`, and exits non-zero with the
//! failure reason on stderr when the login cannot start.

use super::{LoginInitiator, LoginResult, RawLoginResult};
use crate::config::LoginOptions;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Environment variable carrying the timeout handed to the child
pub const TIMEOUT_ENV: &str = "WEBQR_TIMEOUT_MS";

const TIMEOUT_PLACEHOLDER: &str = "{timeout_ms}";

/// Node bridge used when no explicit arguments are configured.
/// `process.argv[1]` is the module exporting `startWebLoginWithQr`.
const NODE_BRIDGE: &str = r#"
import { pathToFileURL } from 'node:url';
try {
  const { startWebLoginWithQr } = await import(pathToFileURL(process.argv[1]).href);
  const result = await startWebLoginWithQr({ timeoutMs: Number(process.env.WEBQR_TIMEOUT_MS) });
  process.stdout.write(JSON.stringify({
    qrDataUrl: result?.qrDataUrl ?? null,
    message: result?.message ?? null,
  }) + '\n');
  process.exit(0);
} catch (error) {
  process.stderr.write(String(error?.message ?? error) + '\n');
  process.exit(1);
}
"#;

/// Runs the configured program and reads its JSON result from stdout
#[derive(Debug, Clone)]
pub struct CommandLoginInitiator {
    program: String,
    args: Vec<String>,
    grace: Duration,
}

impl CommandLoginInitiator {
    /// Build an initiator from login options.
    pub fn new(options: &LoginOptions) -> Self {
        let args = if options.args.is_empty() {
            vec![
                "--input-type=module".to_string(),
                "-e".to_string(),
                NODE_BRIDGE.to_string(),
                options.module.display().to_string(),
            ]
        } else {
            options.args.clone()
        };

        Self {
            program: options.program.clone(),
            args,
            grace: options.grace(),
        }
    }

    /// Arguments after `{timeout_ms}` substitution
    fn resolved_args(&self, timeout_ms: u64) -> Vec<String> {
        let timeout = timeout_ms.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace(TIMEOUT_PLACEHOLDER, &timeout))
            .collect()
    }
}

#[async_trait]
impl LoginInitiator for CommandLoginInitiator {
    async fn start(&self, timeout: Duration) -> Result<LoginResult> {
        let timeout_ms = millis(timeout);
        info!(program = %self.program, timeout_ms, "Starting web login");

        let mut cmd = Command::new(&self.program);
        cmd.args(self.resolved_args(timeout_ms))
            .env(TIMEOUT_ENV, timeout_ms.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let deadline = timeout.saturating_add(self.grace);
        let output = match tokio::time::timeout(deadline, cmd.output()).await {
            Ok(output) => output.map_err(|e| {
                Error::Login(format!("Failed to run '{}': {e}", self.program))
            })?,
            Err(_) => {
                return Err(Error::Login(format!(
                    "timed out after {} ms waiting for a QR code",
                    deadline.as_millis()
                )));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Login routine stderr");
        }

        if !output.status.success() {
            return Err(Error::Login(failure_reason(&stderr, output.status)));
        }

        parse_stdout(&output.stdout)
    }
}

/// Whole milliseconds, saturating for durations past `u64::MAX` ms
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Last non-empty stderr line, or the exit status when stderr is silent
fn failure_reason(stderr: &str, status: std::process::ExitStatus) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("login routine exited with {status}"))
}

/// Find the login record in the child's stdout.
///
/// The record is the last line the bridge writes; anything the login routine
/// prints before it is skipped.
fn parse_stdout(stdout: &[u8]) -> Result<LoginResult> {
    let text = String::from_utf8_lossy(stdout);
    let mut last_error = None;

    for line in text.lines().rev().map(str::trim).filter(|line| !line.is_empty()) {
        match serde_json::from_str::<RawLoginResult>(line) {
            Ok(raw) => return LoginResult::try_from(raw),
            Err(e) => {
                debug!(%line, "Skipping non-record stdout line");
                last_error.get_or_insert(e);
            }
        }
    }

    Err(Error::Login(match last_error {
        Some(e) => format!("Unreadable login result: {e}"),
        None => "login routine produced no output".to_string(),
    }))
}
