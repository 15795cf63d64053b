pub const CONFIG_DIR: &str = ".config/vtm";
pub const CONFIG_FILE: &str = "config.json";
pub const SESSION_FILE: &str = "session.json";

pub const DEFAULT_BACKEND_URL: &str = "https://voley-backend.onrender.com";
pub const BACKEND_URL_ENV: &str = "VTM_BACKEND_URL";
pub const LOG_ENV: &str = "VTM_LOG";

pub const INITIALIZE_TEST_ENDPOINT: &str = "/api/pruebas/iniciar";
pub const SEND_COMMAND_ENDPOINT: &str = "/api/pusher/send-command";
pub const LOGIN_ENDPOINT: &str = "/api/auth/login";

pub const ESP_PREFIX: &str = "ESP-";
pub const DEVICE_CHANNEL_PREFIX: &str = "private-device-";

pub const FALLBACK_INITIALIZATION_ERROR: &str = "Error al iniciar la prueba";
pub const FALLBACK_COMMAND_ERROR: &str = "Error al enviar el comando";
pub const FALLBACK_LOGIN_ERROR: &str = "Usuario o contraseña incorrectos";

pub const ENTER_PASSWORD: &str = "Enter the password: ";

/// Standard message
#[derive(Debug)]
pub enum Message {
    LoggedIn(String, String),
    LoggedOut,
    NoSession,
    ConfigSaved(String),
}

impl Message {
    pub fn to_formatted_string(&self) -> String {
        match self {
            Message::LoggedIn(user, role) => format!("Logged in as '{}' ({})", user, role),
            Message::LoggedOut => "Session closed".to_string(),
            Message::NoSession => "There is no open session".to_string(),
            Message::ConfigSaved(path) => format!("Config saved: {}", path),
        }
    }
}
