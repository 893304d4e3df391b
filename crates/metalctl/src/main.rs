mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use metalctl_api::{AdminClient, Session, UnauthorizedHook};
use metalctl_config::FileTokenStore;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never talk to the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "metalctl", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client = build_client(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

/// Logs a hint when the API rejects the stored token mid-command.
struct ExpiryNotice;

impl UnauthorizedHook for ExpiryNotice {
    fn on_unauthorized(&self) {
        tracing::warn!("session expired, stored token cleared");
    }
}

/// Build the API client from the config file plus CLI overrides.
fn build_client(global: &cli::GlobalOpts) -> Result<Arc<AdminClient>, CliError> {
    let cfg = metalctl_config::load_config_or_default();
    let base_url = global.base_url.clone().unwrap_or(cfg.base_url);
    let timeout = global.timeout.unwrap_or(cfg.timeout);

    let session = Session::with_store(Box::new(FileTokenStore::default_location()));
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .user_agent(concat!("metalctl/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(metalctl_api::Error::from)?;

    let client = AdminClient::from_reqwest(&base_url, http, session)
        .map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {base_url}"),
        })?
        .with_unauthorized_hook(Arc::new(ExpiryNotice));

    Ok(Arc::new(client))
}
