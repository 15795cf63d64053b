use serde::{Deserialize, Serialize};

use crate::session::{Role, Session};

/// Body of `POST /api/auth/login`
#[derive(Serialize, Debug)]
pub struct LoginRequest {
    usuario: String,
    #[serde(rename = "contraseña")]
    contrasena: String,
}

impl LoginRequest {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            usuario: user.to_string(),
            contrasena: password.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<LoginData>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginData {
    pub id: u64,
    pub rol: Role,
    pub token: String,
}

impl From<LoginData> for Session {
    fn from(data: LoginData) -> Self {
        Session::new(data.id, data.rol, data.token)
    }
}
