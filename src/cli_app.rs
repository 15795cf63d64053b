use std::io::{BufRead, Write};
use std::path::Path;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::command_logic::auth::{login, logout, session_api, whoami};
use crate::command_logic::device::send_device_command;
use crate::command_logic::test_session::start_test;
use crate::config::Config;
use crate::constants::Message;
use crate::external_api::backend_api::models::device_command::{DeviceCommand, EspId};
use crate::external_api::backend_api::BackendApi;
use crate::external_api::ApiError;
use crate::logger::LogLevel;
use crate::session::SessionStore;

#[derive(Parser)]
#[command(
    name = "vtm",
    version,
    about = "CLI client for the volleyball team management backend. vtm - VolleyTeamManager",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Log verbosity, VTM_LOG overrides it
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Timed tests
    #[command(subcommand)]
    Test(TestCommands),
    /// ESP devices
    #[command(subcommand)]
    Device(DeviceCommands),
    /// Log in to the backend
    Login(LoginArgs),
    /// Close the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Save backend settings
    Config(ConfigArgs),
}

#[derive(Subcommand)]
pub enum TestCommands {
    /// Start a timed test
    Start(StartTestArgs),
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// Send a command to an ESP device
    Send(SendCommandArgs),
}

#[derive(Args)]
pub struct StartTestArgs {
    /// Test type, e.g. reaccion
    #[arg(long, short, required = true, value_parser = validate_test_type)]
    pub test_type: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["esp_id", "device_id"])))]
pub struct SendCommandArgs {
    /// Numeric device id, sent as ESP-<ID>
    #[arg(long, short)]
    pub esp_id: Option<u64>,
    /// Formatted device id, sent unchanged
    #[arg(long, short)]
    pub device_id: Option<String>,
    /// Command to send [default: on]
    #[arg(long, short, value_enum)]
    pub command: Option<DeviceCommand>,
}

impl SendCommandArgs {
    pub fn target(&self) -> EspId {
        match (&self.esp_id, &self.device_id) {
            (Some(id), _) => EspId::Numeric(*id),
            (None, Some(id)) => EspId::Formatted(id.clone()),
            // clap requires one of them
            (None, None) => EspId::Formatted(String::new()),
        }
    }
}

#[derive(Args)]
pub struct LoginArgs {
    /// User name
    #[arg(long, short, required = true)]
    pub user: String,
    /// Password, asked for when not given
    #[arg(long, short)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Backend url, e.g. https://backend.example.com
    #[arg(long, short, required = true)]
    pub backend_url: String,
    /// Request timeout in seconds
    #[arg(long, short)]
    pub timeout_secs: Option<u64>,
}

fn validate_test_type(value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::EmptyTestType);
    }
    Ok(value.to_string())
}

fn backend_api(config_path: &Path) -> Result<BackendApi, ApiError> {
    let config = Config::load(config_path)?;
    BackendApi::new(&config.backend_url, config.request_timeout())
}

/// Run the command, returns what to print on success
pub async fn handle_command<R, W>(
    cli: &Cli,
    config_path: &Path,
    store: &SessionStore,
    input: R,
    output: W,
) -> Result<String, ApiError>
where
    R: BufRead,
    W: Write,
{
    match &cli.command {
        Commands::Test(TestCommands::Start(args)) => {
            let api = session_api(&backend_api(config_path)?, store)?;
            start_test(&args.test_type, &api).await
        }
        Commands::Device(DeviceCommands::Send(args)) => {
            let api = session_api(&backend_api(config_path)?, store)?;
            send_device_command(&args.target(), args.command, &api).await
        }
        Commands::Login(args) => {
            let api = backend_api(config_path)?;
            login(&args.user, args.password.as_deref(), &api, store, input, output).await
        }
        Commands::Logout => logout(store),
        Commands::Whoami => whoami(store),
        Commands::Config(args) => {
            Config::new(&args.backend_url, args.timeout_secs)?.save(config_path)?;
            Ok(Message::ConfigSaved(config_path.display().to_string()).to_formatted_string())
        }
    }
}

/// Prefix for the error line of a failed command
pub fn failure_context(command: &Commands) -> &'static str {
    match command {
        Commands::Test(_) => "Failed to start test",
        Commands::Device(_) => "Failed to send command",
        Commands::Login(_) => "Failed to log in",
        Commands::Logout => "Failed to log out",
        Commands::Whoami => "Failed to read session",
        Commands::Config(_) => "Failed to save config",
    }
}
