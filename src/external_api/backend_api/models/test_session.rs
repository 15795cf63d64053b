use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Body of `POST /api/pruebas/iniciar`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TestSessionRequest {
    tipo_prueba: String,
    tiempo_inicio: String,
}

impl TestSessionRequest {
    /// Test starting now
    pub fn new(test_type: &str) -> Self {
        Self::started_at(test_type, Utc::now())
    }

    pub fn started_at(test_type: &str, start: DateTime<Utc>) -> Self {
        Self {
            tipo_prueba: test_type.to_string(),
            tiempo_inicio: start.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn test_type(&self) -> &str {
        &self.tipo_prueba
    }

    pub fn start_time(&self) -> &str {
        &self.tiempo_inicio
    }
}
