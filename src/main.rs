//! webqr entrypoint

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use webqr::{CommandLoginInitiator, Outcome, Result, WebQrConfig, app, logging};

#[derive(Parser, Debug)]
#[command(
    name = "webqr",
    version,
    about = "Fetch a messaging web-login QR code and save it as a PNG"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to webqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            debug!(?outcome, "Finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config = WebQrConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging)?;
    debug!(?config, "Loaded configuration");

    let initiator = CommandLoginInitiator::new(&config.login);
    let ssh_connection = std::env::var("SSH_CONNECTION").ok();

    let mut stdout = std::io::stdout().lock();
    app::run(&initiator, &config, ssh_connection.as_deref(), &mut stdout).await
}
