use thiserror::Error;

/// Rejected input from a form, a registration or a quiz answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Storage backend failure. Kept apart from lookup misses so callers can
/// tell "disk is broken" from "no such user".
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {path}: {source}")]
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
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no profile registered for {0}")]
    NotFound(String),
    #[error("a profile for {0} already exists")]
    DuplicateEntry(String),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Persistence(PersistenceError::Db(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = ValidationError::new("electricity", "must not be negative");
        assert_eq!(err.to_string(), "electricity: must not be negative");
    }

    #[test]
    fn store_errors_keep_not_found_distinct_from_io() {
        let missing = StoreError::NotFound("a@x.com".to_string());
        let io = StoreError::from(PersistenceError::Io {
            path: "users.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(matches!(missing, StoreError::NotFound(_)));
        assert!(matches!(io, StoreError::Persistence(PersistenceError::Io { .. })));
        assert!(io.to_string().contains("users.json"));
    }
}
