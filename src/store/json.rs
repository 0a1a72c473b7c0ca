use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::PersistenceError;
use crate::profile::UserProfile;
use crate::store::repository::UserRepository;

pub const DEFAULT_USERS_PATH: &str = "users.json";

/// On-disk shape of `users.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersDocument {
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

pub fn document_to_json(doc: &UsersDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

pub fn document_from_json(data: &str) -> serde_json::Result<UsersDocument> {
    serde_json::from_str(data)
}

/// Single JSON document holding every profile.
///
/// Saves write a sibling temporary file and rename it over the document,
/// so a crash mid-save leaves either the old or the new contents.
#[derive(Debug, Clone)]
pub struct JsonUserRepository {
    path: PathBuf,
}

impl JsonUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl UserRepository for JsonUserRepository {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_all(&self) -> Result<Vec<UserProfile>, PersistenceError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let doc = document_from_json(&data).map_err(|source| PersistenceError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(doc.users)
    }

    fn save_all(&mut self, profiles: &[UserProfile]) -> Result<(), PersistenceError> {
        let doc = UsersDocument {
            users: profiles.to_vec(),
        };
        let json = document_to_json(&doc).map_err(|source| PersistenceError::Json {
            path: self.path.display().to_string(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;
        }
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}
