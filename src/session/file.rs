//! Session persistence in a JSON file.

use super::{SessionError, SessionStore};
use crate::credentials::PrincipalInfo;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

const SESSION_FILENAME: &str = "session.json";

/// Stores the signed-in identity as JSON at a fixed path, by default under
/// the user's config directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/sesamo/session.json`, falling back to the home
    /// directory and then the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sesamo")
            .join(SESSION_FILENAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PrincipalInfo>, SessionError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionError::Io(err)),
        };

        // A file that does not parse reads as absent: the user signs in
        // again instead of being locked out by a corrupt session.
        match serde_json::from_slice(&data) {
            Ok(principal) => Ok(Some(principal)),
            Err(err) => {
                warn!("Discarding malformed session file: {}", err);

                Ok(None)
            }
        }
    }

    fn save(&self, principal: &PrincipalInfo) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_vec_pretty(principal)?)?;

        restrict_permissions(&self.path)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionError::Io(err)),
        }
    }
}

// Identity data, owner-only
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
