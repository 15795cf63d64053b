use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::constants::{DEVICE_CHANNEL_PREFIX, ESP_PREFIX};

/// Identifier of an ESP device as given by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EspId {
    /// Bare number, gets the `ESP-` prefix
    Numeric(u64),
    /// Already formatted id, sent as is
    Formatted(String),
}

impl EspId {
    /// Id the backend knows the device by.
    ///
    /// Only `Numeric` ids are prefixed: `Formatted("7")` stays `"7"` while
    /// `Numeric(7)` becomes `"ESP-7"`.
    pub fn device_id(&self) -> String {
        match self {
            EspId::Numeric(id) => format!("{ESP_PREFIX}{id}"),
            EspId::Formatted(id) => {
                if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                    warn!(device_id = %id, "numeric device id given as text is sent without the ESP- prefix");
                }
                id.clone()
            }
        }
    }
}

impl From<u64> for EspId {
    fn from(value: u64) -> Self {
        EspId::Numeric(value)
    }
}

impl From<&str> for EspId {
    fn from(value: &str) -> Self {
        EspId::Formatted(value.to_string())
    }
}

impl From<String> for EspId {
    fn from(value: String) -> Self {
        EspId::Formatted(value)
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceCommand {
    #[default]
    On,
    Off,
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::On => write!(f, "ON"),
            DeviceCommand::Off => write!(f, "OFF"),
        }
    }
}

/// Body of `POST /api/pusher/send-command`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommandRequest {
    device_id: String,
    command: DeviceCommand,
    channel: String,
}

impl DeviceCommandRequest {
    pub fn new(esp_id: &EspId, command: Option<DeviceCommand>) -> Self {
        let device_id = esp_id.device_id();
        Self {
            channel: format!("{DEVICE_CHANNEL_PREFIX}{device_id}"),
            device_id,
            command: command.unwrap_or_default(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn command(&self) -> DeviceCommand {
        self.command
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}
