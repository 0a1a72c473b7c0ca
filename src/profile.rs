use serde::{Deserialize, Serialize};

use crate::data::tasks::TaskId;
use crate::error::ValidationError;

/// One registered user as stored in `users.json`.
///
/// `completed_tasks` and `badges` behave as append-only sets: the order is
/// recency, duplicates are never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    // Stored in plaintext to match the existing document format.
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub completed_tasks: Vec<TaskId>,
    #[serde(default)]
    pub badges: Vec<String>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            points: 0,
            completed_tasks: Vec::new(),
            badges: Vec::new(),
        }
    }

    pub fn has_completed(&self, task: TaskId) -> bool {
        self.completed_tasks.contains(&task)
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|badge| badge == name)
    }

    /// Returns false if the badge was already held.
    pub fn grant_badge(&mut self, name: &str) -> bool {
        if self.has_badge(name) {
            return false;
        }
        self.badges.push(name.to_string());
        true
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Collapse repeated ids and badge names left by hand-edited documents,
    /// keeping the first occurrence.
    pub fn dedup(&mut self) {
        let mut seen_tasks = Vec::with_capacity(self.completed_tasks.len());
        self.completed_tasks.retain(|id| {
            if seen_tasks.contains(id) {
                false
            } else {
                seen_tasks.push(*id);
                true
            }
        });
        let mut seen_badges: Vec<String> = Vec::with_capacity(self.badges.len());
        self.badges.retain(|name| {
            if seen_badges.contains(name) {
                false
            } else {
                seen_badges.push(name.clone());
                true
            }
        });
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form contents.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::new("confirm_password", "passwords do not match"));
        }
        Ok(())
    }

    pub fn into_profile(self) -> UserProfile {
        UserProfile::new(normalize_email(&self.email), self.name.trim(), self.password)
    }
}

/// Emails are keys; compare them trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "is required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "is required"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::new("email", "must contain '@'"));
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::new("email", "is not a valid address"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("email", "must not contain spaces"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
