use crate::external_api::backend_api::BackendApi;
use crate::external_api::ApiError;

/// Start a timed test, returns the backend answer as pretty json
pub async fn start_test(test_type: &str, backend_api: &BackendApi) -> Result<String, ApiError> {
    let response = backend_api.initialize_test(test_type).await?;
    Ok(serde_json::to_string_pretty(&response)?)
}
