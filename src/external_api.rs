pub mod backend_api;

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode, Url,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{FALLBACK_COMMAND_ERROR, FALLBACK_INITIALIZATION_ERROR, FALLBACK_LOGIN_ERROR};

const APPLICATION_JSON: &str = "application/json";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Initialization(String),
    #[error("{0}")]
    Command(String),
    #[error("{0}")]
    Login(String),
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("The string entered must be a URL")]
    InvalidUrl,
    #[error("Session token can't be sent as a header")]
    InvalidToken,
    #[error("Failed to retrieve the user's directories")]
    NotFoundUserDir,
    #[error("Not logged in, run: vtm login --user <USER>")]
    NotLoggedIn,
    #[error("Test type can't be empty")]
    EmptyTestType,
}

/// Backend operation a request belongs to.
///
/// Decides which error variant a failure is reported as and which message is
/// used when the backend doesn't send one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InitializeTest,
    SendCommand,
    Login,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::InitializeTest => FALLBACK_INITIALIZATION_ERROR,
            Operation::SendCommand => FALLBACK_COMMAND_ERROR,
            Operation::Login => FALLBACK_LOGIN_ERROR,
        }
    }

    /// Operation error with the backend message, or the fallback one
    pub fn failure(self, message: Option<String>) -> ApiError {
        let message = message.unwrap_or_else(|| self.fallback_message().to_string());
        match self {
            Operation::InitializeTest => ApiError::Initialization(message),
            Operation::SendCommand => ApiError::Command(message),
            Operation::Login => ApiError::Login(message),
        }
    }
}

/// Non-empty string `message` field of a backend body
pub fn backend_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Basic api client
#[derive(Clone, Debug)]
pub struct BaseApiClient {
    client: Client,
    pub base_url: Url,
}

impl BaseApiClient {
    fn build_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers
    }

    fn bearer_header(token: &str) -> Result<HeaderValue, ApiError> {
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::InvalidToken)
    }

    /// Response body is parsed before the status is looked at, a body that
    /// isn't JSON on a failed request counts as a body without `message`.
    async fn handle_response(
        &self,
        response: reqwest::Response,
        operation: Operation,
    ) -> Result<(StatusCode, Value), ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(?operation, error = %e, "failed to read backend response");
            operation.failure(None)
        })?;
        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            let message = parsed.ok().as_ref().and_then(backend_message);
            debug!(?operation, %status, ?message, "backend rejected request");
            return Err(operation.failure(message));
        }

        Ok((status, parsed?))
    }

    /// Build client. No timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().default_headers(Self::get_default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(base_url).map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// POST json body, returns the parsed response body of a 2xx answer
    pub async fn post<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
        operation: Operation,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(endpoint)?;
        let mut request = self.client.post(url.clone()).json(body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, Self::bearer_header(token)?);
        }

        debug!(?operation, %url, "sending request");
        let response = request.send().await.map_err(|e| {
            warn!(?operation, %url, error = %e, "request did not complete");
            operation.failure(None)
        })?;

        let (status, value) = self.handle_response(response, operation).await?;
        debug!(?operation, %status, "backend accepted request");
        Ok(value)
    }
}
