use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use vtm::cli_app::{failure_context, handle_command, Cli};
use vtm::config::Config;
use vtm::logger::init_logger;
use vtm::session::SessionStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let (config_path, store) = match Config::default_path()
        .and_then(|config_path| Ok((config_path, SessionStore::in_config_dir()?)))
    {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}: {}", failure_context(&cli.command), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(config = %config_path.display(), session = %store.path().display(), "paths");

    let stdin = std::io::stdin();
    match handle_command(&cli, &config_path, &store, stdin.lock(), std::io::stdout()).await {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", failure_context(&cli.command), e);
            ExitCode::FAILURE
        }
    }
}
