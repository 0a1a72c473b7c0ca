pub mod badges;
pub mod quiz;
pub mod tasks;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use badges::{Badge, BadgeCatalog};
pub use quiz::{QuizBank, QuizQuestion};
pub use tasks::{Task, TaskCatalog, TaskCategory, TaskId};

#[derive(Debug, Error)]
pub enum CatalogError {
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
    #[error("{0}")]
    Validation(String),
}

pub(crate) fn read_catalog_file<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.display().to_string(),
        source,
    })
}
