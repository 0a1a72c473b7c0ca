use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{BadgeCatalog, CatalogError, QuizBank, TaskCatalog};
use crate::error::StoreError;
use crate::store::{
    JsonUserRepository, SqliteUserRepository, UserRepository, UserStore, DEFAULT_USERS_DB_PATH,
    DEFAULT_USERS_PATH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Parser, Debug, Default)]
#[command(about = "EcoSpark climate-education console", version)]
pub struct Args {
    /// JSON config file; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where user profiles are stored (default: users.json, or users.db for sqlite)
    #[arg(long)]
    pub users: Option<PathBuf>,

    /// Storage backend for user profiles
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// Task catalog JSON replacing the built-in tasks
    #[arg(long)]
    pub tasks: Option<PathBuf>,

    /// Badge catalog JSON replacing the built-in badges
    #[arg(long)]
    pub badges: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub users_path: Option<PathBuf>,
    pub tasks_path: Option<PathBuf>,
    pub badges_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// File values (if `--config` was given) with flags layered on top.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(backend) = args.backend {
            config.backend = backend;
        }
        if let Some(users) = &args.users {
            config.users_path = Some(users.clone());
        }
        if let Some(tasks) = &args.tasks {
            config.tasks_path = Some(tasks.clone());
        }
        if let Some(badges) = &args.badges {
            config.badges_path = Some(badges.clone());
        }
        Ok(config)
    }

    pub fn users_path(&self) -> PathBuf {
        match (&self.users_path, self.backend) {
            (Some(path), _) => path.clone(),
            (None, StoreBackend::Json) => PathBuf::from(DEFAULT_USERS_PATH),
            (None, StoreBackend::Sqlite) => PathBuf::from(DEFAULT_USERS_DB_PATH),
        }
    }

    pub fn open_store(&self) -> Result<UserStore, StoreError> {
        let path = self.users_path();
        let repo: Box<dyn UserRepository> = match self.backend {
            StoreBackend::Json => Box::new(JsonUserRepository::new(path)),
            StoreBackend::Sqlite => Box::new(SqliteUserRepository::open(path)?),
        };
        UserStore::open(repo)
    }

    pub fn task_catalog(&self) -> Result<TaskCatalog, CatalogError> {
        match &self.tasks_path {
            Some(path) => TaskCatalog::load(path),
            None => Ok(TaskCatalog::builtin()),
        }
    }

    pub fn badge_catalog(&self) -> Result<BadgeCatalog, CatalogError> {
        match &self.badges_path {
            Some(path) => BadgeCatalog::load(path),
            None => Ok(BadgeCatalog::builtin()),
        }
    }

    pub fn quiz_bank(&self) -> QuizBank {
        QuizBank::builtin()
    }
}
