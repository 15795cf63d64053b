use crate::external_api::backend_api::models::device_command::{DeviceCommand, EspId};
use crate::external_api::backend_api::BackendApi;
use crate::external_api::ApiError;

/// Send a command to an ESP device, returns the backend answer as pretty json
pub async fn send_device_command(
    esp_id: &EspId,
    command: Option<DeviceCommand>,
    backend_api: &BackendApi,
) -> Result<String, ApiError> {
    let response = backend_api.send_command_to_esp(esp_id, command).await?;
    Ok(serde_json::to_string_pretty(&response)?)
}
