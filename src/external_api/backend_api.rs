pub mod models;

use std::time::Duration;

use serde_json::Value;
use tracing::info;

use super::{ApiError, BaseApiClient, Operation};
use crate::constants::{INITIALIZE_TEST_ENDPOINT, LOGIN_ENDPOINT, SEND_COMMAND_ENDPOINT};
use crate::session::Session;
use models::device_command::{DeviceCommand, DeviceCommandRequest, EspId};
use models::login::{LoginRequest, LoginResponse};
use models::test_session::TestSessionRequest;

/// Volleyball team management backend.
///
/// Every call is a single independent request: nothing is cached, retried
/// or shared between calls, so one handle can serve any number of
/// concurrent callers.
#[derive(Clone, Debug)]
pub struct BackendApi {
    pub client: BaseApiClient,
    token: Option<String>,
}

impl BackendApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        Ok(Self {
            client: BaseApiClient::new(base_url, timeout)?,
            token: None,
        })
    }

    /// Handle whose requests are authenticated with the session token
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            client: self.client.clone(),
            token: Some(session.token().to_string()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn post<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        operation: Operation,
    ) -> Result<Value, ApiError> {
        self.client
            .post(endpoint, body, self.token.as_deref(), operation)
            .await
    }

    /// Tell the backend a timed test starts now
    pub async fn initialize_test(&self, test_type: &str) -> Result<Value, ApiError> {
        let request = TestSessionRequest::new(test_type);
        info!(test_type, start_time = request.start_time(), "initializing test");
        self.post(INITIALIZE_TEST_ENDPOINT, &request, Operation::InitializeTest)
            .await
    }

    /// Relay a command to an ESP device, `ON` when no command is given
    pub async fn send_command_to_esp(
        &self,
        esp_id: &EspId,
        command: Option<DeviceCommand>,
    ) -> Result<Value, ApiError> {
        let request = DeviceCommandRequest::new(esp_id, command);
        info!(
            device_id = request.device_id(),
            command = %request.command(),
            channel = request.channel(),
            "sending device command"
        );
        self.post(SEND_COMMAND_ENDPOINT, &request, Operation::SendCommand)
            .await
    }

    pub async fn login(&self, user: &str, password: &str) -> Result<Session, ApiError> {
        let body = self
            .post(LOGIN_ENDPOINT, &LoginRequest::new(user, password), Operation::Login)
            .await?;
        let response: LoginResponse = serde_json::from_value(body)?;

        if !response.success {
            return Err(Operation::Login.failure(response.message.filter(|m| !m.is_empty())));
        }
        let session: Session = response
            .data
            .ok_or_else(|| Operation::Login.failure(None))?
            .into();
        info!(id = session.id(), role = %session.role(), "logged in");
        Ok(session)
    }

    #[cfg(test)]
    pub fn mock(base_url: &str) -> Self {
        Self::new(base_url, None).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FALLBACK_COMMAND_ERROR, FALLBACK_INITIALIZATION_ERROR, FALLBACK_LOGIN_ERROR};
    use crate::session::Role;
    use mockito::{Matcher, ServerGuard};
    use rstest::rstest;
    use serde_json::json;

    const ISO_MILLIS_UTC: &str = r#""tiempo_inicio":"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z""#;

    async fn mock_login(server: &mut ServerGuard, status: usize, body: Value) -> mockito::Mock {
        server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(status)
            .with_body(body.to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_initialize_test_request_and_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", INITIALIZE_TEST_ENDPOINT)
            .match_header("content-type", "application/json")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"tipo_prueba": "reaccion"})),
                Matcher::Regex(ISO_MILLIS_UTC.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"success":true,"id":42}"#)
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let response = api.initialize_test("reaccion").await.unwrap();

        assert_eq!(response, json!({"success": true, "id": 42}));
        mock.assert_async().await;
    }

    #[rstest]
    #[case(400, r#"{"message":"Prueba ya iniciada"}"#, "Prueba ya iniciada")]
    #[case(500, r#"{"success":false}"#, FALLBACK_INITIALIZATION_ERROR)]
    #[case(503, "", FALLBACK_INITIALIZATION_ERROR)]
    #[tokio::test]
    async fn test_initialize_test_failure(
        #[case] status: usize,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", INITIALIZE_TEST_ENDPOINT)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let err = api.initialize_test("pliometria").await.unwrap_err();

        assert!(matches!(err, ApiError::Initialization(_)));
        assert_eq!(err.to_string(), expected);
    }

    #[tokio::test]
    async fn test_send_command_numeric_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEND_COMMAND_ENDPOINT)
            .match_body(Matcher::Json(json!({
                "deviceId": "ESP-7",
                "command": "OFF",
                "channel": "private-device-ESP-7"
            })))
            .with_status(200)
            .with_body(r#"{"sent":true}"#)
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let response = api
            .send_command_to_esp(&EspId::Numeric(7), Some(DeviceCommand::Off))
            .await
            .unwrap();

        assert_eq!(response, json!({"sent": true}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_command_formatted_id_defaults_to_on() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEND_COMMAND_ENDPOINT)
            .match_body(Matcher::Json(json!({
                "deviceId": "ESP-12",
                "command": "ON",
                "channel": "private-device-ESP-12"
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        api.send_command_to_esp(&EspId::from("ESP-12"), None)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[rstest]
    #[case(404, r#"{"message":"Dispositivo no encontrado"}"#, "Dispositivo no encontrado")]
    #[case(500, r#"{"error":"boom"}"#, FALLBACK_COMMAND_ERROR)]
    #[tokio::test]
    async fn test_send_command_failure(
        #[case] status: usize,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SEND_COMMAND_ENDPOINT)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let err = api
            .send_command_to_esp(&EspId::Numeric(3), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Command(_)));
        assert_eq!(err.to_string(), expected);
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("POST", SEND_COMMAND_ENDPOINT)
            .match_body(Matcher::PartialJson(json!({"deviceId": "ESP-1"})))
            .with_status(200)
            .with_body(r#"{"device":1}"#)
            .create_async()
            .await;
        let failing = server
            .mock("POST", SEND_COMMAND_ENDPOINT)
            .match_body(Matcher::PartialJson(json!({"deviceId": "ESP-2"})))
            .with_status(500)
            .with_body(r#"{"message":"offline"}"#)
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let first = EspId::Numeric(1);
        let second = EspId::Numeric(2);
        let (first, second) = tokio::join!(
            api.send_command_to_esp(&first, None),
            api.send_command_to_esp(&second, None),
        );

        assert_eq!(first.unwrap(), json!({"device": 1}));
        assert_eq!(second.unwrap_err().to_string(), "offline");
        ok.assert_async().await;
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", LOGIN_ENDPOINT)
            .match_body(Matcher::Json(json!({"usuario": "ana", "contraseña": "secreto"})))
            .with_status(200)
            .with_body(
                json!({"success": true, "data": {"id": 9, "rol": "entrenador", "token": "jwt"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        let session = api.login("ana", "secreto").await.unwrap();

        assert_eq!(session, Session::new(9, Role::Trainer, "jwt".to_string()));
        mock.assert_async().await;
    }

    #[rstest]
    #[case(200, json!({"success": false, "message": "Contraseña incorrecta"}), "Contraseña incorrecta")]
    #[case(200, json!({"success": false}), FALLBACK_LOGIN_ERROR)]
    #[case(200, json!({"success": true}), FALLBACK_LOGIN_ERROR)]
    #[case(401, json!({"success": false, "message": "No autorizado"}), "No autorizado")]
    #[tokio::test]
    async fn test_login_failure(#[case] status: usize, #[case] body: Value, #[case] expected: &str) {
        let mut server = mockito::Server::new_async().await;
        mock_login(&mut server, status, body).await;

        let api = BackendApi::mock(&server.url());
        let err = api.login("ana", "mala").await.unwrap_err();

        assert!(matches!(err, ApiError::Login(_)));
        assert_eq!(err.to_string(), expected);
    }

    #[tokio::test]
    async fn test_with_session_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", INITIALIZE_TEST_ENDPOINT)
            .match_header("authorization", "Bearer jwt")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let api = BackendApi::mock(&server.url());
        assert!(!api.is_authenticated());
        let session = Session::new(1, Role::Technician, "jwt".to_string());
        let authenticated = api.with_session(&session);
        assert!(authenticated.is_authenticated());

        authenticated.initialize_test("reaccion").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_without_session_no_authorization_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", INITIALIZE_TEST_ENDPOINT)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        BackendApi::mock(&server.url())
            .initialize_test("reaccion")
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
