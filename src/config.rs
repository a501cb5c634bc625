//! webqr runtime configuration handling

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default wait handed to the login routine (two minutes)
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

const MIN_TIMEOUT_MS: u64 = 1_000;

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebQrConfig {
    /// External login routine settings
    pub login: LoginOptions,
    /// Where and how the QR image is written
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl WebQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No webqr.toml / webqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.login.timeout_ms = config.login.timeout_ms.max(MIN_TIMEOUT_MS);
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["webqr.toml", "webqr.yaml", "webqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("webqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.login.apply_env_overrides();
        self.output.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

/// How the external login routine is launched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginOptions {
    /// Wait handed to the login routine, in milliseconds
    pub timeout_ms: u64,
    /// Extra time the child process gets on top of `timeout_ms` before it is killed
    pub grace_ms: u64,
    /// Program to execute (defaults to `node`)
    pub program: String,
    /// JavaScript module exporting `startWebLoginWithQr`, used when `args` is empty
    pub module: PathBuf,
    /// Explicit arguments; `{timeout_ms}` is substituted in each one
    pub args: Vec<String>,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            grace_ms: 5_000,
            program: "node".to_string(),
            module: PathBuf::from("/root/dist/web/login-qr.js"),
            args: Vec::new(),
        }
    }
}

impl LoginOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(timeout) = env::var("WEBQR_TIMEOUT_MS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.timeout_ms = parsed;
            }
        }
        if let Ok(program) = env::var("WEBQR_LOGIN_PROGRAM") {
            self.program = program;
        }
        if let Ok(module) = env::var("WEBQR_LOGIN_MODULE") {
            self.module = PathBuf::from(module);
        }
    }

    /// Timeout handed to the login routine
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Extra time the child process gets past the login timeout
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

/// QR image destination and operator hints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Where the decoded PNG is written
    pub path: PathBuf,
    /// Account used in the suggested `scp` command
    pub remote_user: String,
    /// Destination suggested for the operator's workstation
    pub local_path: String,
    /// Check that the written bytes are a PNG containing a QR code
    pub verify: bool,
    /// Also draw the QR code in the terminal (implies `verify`)
    pub terminal: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/root/.openclaw/workspace/whatsapp-qr.png"),
            remote_user: "root".to_string(),
            local_path: "~/Desktop/whatsapp-qr.png".to_string(),
            verify: false,
            terminal: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("WEBQR_OUTPUT") {
            if !path.trim().is_empty() {
                self.path = PathBuf::from(path);
            }
        }
        if let Ok(user) = env::var("WEBQR_REMOTE_USER") {
            self.remote_user = user;
        }
        if let Ok(local) = env::var("WEBQR_LOCAL_PATH") {
            self.local_path = local;
        }
        if let Some(verify) = env_flag("WEBQR_VERIFY") {
            self.verify = verify;
        }
        if let Some(terminal) = env_flag("WEBQR_TERMINAL") {
            self.terminal = terminal;
        }
    }

    /// Whether the PNG should be decoded and checked before being written
    pub fn should_verify(&self) -> bool {
        self.verify || self.terminal
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `WEBQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("WEBQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("WEBQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = env_flag("WEBQR_LOG_COLOR") {
            self.color = color;
        }
        if let Ok(rotation) = env::var("WEBQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    parse_flag(&env::var(key).ok()?)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
