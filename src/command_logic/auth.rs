use std::io::{BufRead, Write};

use tracing::debug;

use crate::constants::{Message, ENTER_PASSWORD};
use crate::external_api::backend_api::BackendApi;
use crate::external_api::ApiError;
use crate::session::SessionStore;

/// Log in and keep the session in the store.
///
/// Password is read from `input` when not given.
pub async fn login<R, W>(
    user: &str,
    password: Option<&str>,
    backend_api: &BackendApi,
    store: &SessionStore,
    input: R,
    output: W,
) -> Result<String, ApiError>
where
    R: BufRead,
    W: Write,
{
    let password = match password {
        Some(value) => value.to_string(),
        None => read_password(input, output)?,
    };
    let session = backend_api.login(user, &password).await?;
    store.save(&session)?;
    Ok(Message::LoggedIn(user.to_string(), session.role().to_string()).to_formatted_string())
}

fn read_password<R, W>(mut input: R, mut output: W) -> Result<String, ApiError>
where
    R: BufRead,
    W: Write,
{
    output.write_all(ENTER_PASSWORD.as_bytes())?;
    output.flush()?;

    let mut password = String::new();
    input.read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

/// Drop the stored session
pub fn logout(store: &SessionStore) -> Result<String, ApiError> {
    let message = if store.clear()? {
        Message::LoggedOut
    } else {
        Message::NoSession
    };
    Ok(message.to_formatted_string())
}

/// Current session as `id`, `role` lines
pub fn whoami(store: &SessionStore) -> Result<String, ApiError> {
    let session = store.load()?.ok_or(ApiError::NotLoggedIn)?;
    Ok(format!("id: {}\nrole: {}", session.id(), session.role()))
}

/// Api handle authenticated with the stored session, if there is one
pub fn session_api(backend_api: &BackendApi, store: &SessionStore) -> Result<BackendApi, ApiError> {
    match store.load()? {
        Some(session) => {
            debug!(id = session.id(), "using stored session");
            Ok(backend_api.with_session(&session))
        }
        None => Ok(backend_api.clone()),
    }
}
