//! Login state.
//!
//! A [`Session`] is created by a successful login and dropped by logout.
//! The CLI keeps it in `~/.config/vtm/session.json` between runs through
//! [`SessionStore`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{CONFIG_DIR, SESSION_FILE};
use crate::external_api::ApiError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "entrenador")]
    Trainer,
    #[serde(rename = "jugador")]
    Player,
    #[serde(rename = "tecnico")]
    Technician,
    #[serde(rename = "desconocido")]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Trainer => "entrenador",
            Role::Player => "jugador",
            Role::Technician => "tecnico",
            Role::Unknown => "desconocido",
        };
        write!(f, "{name}")
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    id: u64,
    rol: Role,
    token: String,
}

impl Session {
    pub fn new(id: u64, rol: Role, token: String) -> Self {
        Self { id, rol, token }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> &Role {
        &self.rol
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// token stays out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("rol", &self.rol)
            .field("token", &"***")
            .finish()
    }
}

/// File backed storage for the current session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the user's config directory
    pub fn in_config_dir() -> Result<Self, ApiError> {
        let user_dirs = UserDirs::new().ok_or(ApiError::NotFoundUserDir)?;
        Ok(Self::new(
            user_dirs.home_dir().join(CONFIG_DIR).join(SESSION_FILE),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// `None` when nobody is logged in
    pub fn load(&self) -> Result<Option<Session>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Returns whether there was a session to remove
    pub fn clear(&self) -> Result<bool, ApiError> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        debug!(path = %self.path.display(), "session removed");
        Ok(true)
    }
}
