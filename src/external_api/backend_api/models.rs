pub mod device_command;
pub mod login;
pub mod test_session;
