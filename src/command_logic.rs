pub mod auth;
pub mod device;
pub mod test_session;
