pub mod cli_app;
pub mod command_logic;
pub mod config;
pub mod constants;
pub mod external_api;
pub mod logger;
pub mod session;
