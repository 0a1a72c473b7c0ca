pub mod json;
pub mod repository;
pub mod sqlite;

use std::collections::HashMap;
use std::path::PathBuf;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info, warn};
use thiserror::Error;

use crate::data::badges::{Badge, BadgeCatalog};
use crate::data::tasks::{TaskCatalog, TaskId};
use crate::error::StoreError;
use crate::profile::{normalize_email, validate_name, validate_password, Registration, UserProfile};
use crate::rules::gamification::{complete_task, evaluate_new_badges};

pub use json::{JsonUserRepository, UsersDocument, DEFAULT_USERS_PATH};
pub use repository::UserRepository;
pub use sqlite::{SqliteUserRepository, DEFAULT_USERS_DB_PATH};

/// Result of reporting a task as done.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Completed {
        points_awarded: u32,
        total_points: u32,
        new_badges: Vec<Badge>,
    },
    AlreadyCompleted,
    UnknownTask(TaskId),
    UnknownUser(String),
}

/// A completion that was applied in memory but could not be saved. The
/// outcome is kept so newly unlocked badges still reach the caller.
#[derive(Debug, Error)]
#[error("task progress recorded but not saved: {source}")]
pub struct UnsavedCompletion {
    pub outcome: CompletionOutcome,
    #[source]
    pub source: StoreError,
}

/// In-memory profile map backed by a repository.
///
/// Every mutating call updates memory and then rewrites the whole
/// collection before returning. If the write fails the error is returned
/// and memory keeps the new state.
#[derive(Resource)]
pub struct UserStore {
    profiles: HashMap<String, UserProfile>,
    repo: Box<dyn UserRepository>,
}

impl UserStore {
    /// Open a store and load whatever the repository holds.
    pub fn open(repo: Box<dyn UserRepository>) -> Result<Self, StoreError> {
        let mut store = Self {
            profiles: HashMap::new(),
            repo,
        };
        store.load()?;
        Ok(store)
    }

    pub fn open_json(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open(Box::new(JsonUserRepository::new(path)))
    }

    pub fn location(&self) -> String {
        self.repo.describe()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn emails(&self) -> Vec<&str> {
        let mut emails: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        emails.sort_unstable();
        emails
    }

    pub fn authenticate(&self, email: &str, password: &str) -> bool {
        self.get(email)
            .map(|profile| profile.password_matches(password))
            .unwrap_or(false)
    }

    pub fn exists(&self, email: &str) -> bool {
        self.profiles.contains_key(&normalize_email(email))
    }

    pub fn get(&self, email: &str) -> Option<&UserProfile> {
        self.profiles.get(&normalize_email(email))
    }

    pub fn require(&self, email: &str) -> Result<&UserProfile, StoreError> {
        self.get(email)
            .ok_or_else(|| StoreError::NotFound(normalize_email(email)))
    }

    /// Insert or overwrite by email, then save.
    pub fn add(&mut self, mut profile: UserProfile) -> Result<(), StoreError> {
        profile.email = normalize_email(&profile.email);
        profile.dedup();
        debug!("storing profile {}", profile.email);
        self.profiles.insert(profile.email.clone(), profile);
        self.save()
    }

    pub fn update(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        self.add(profile)
    }

    /// Validate a sign-up and create the profile. An existing email fails
    /// without touching the store.
    pub fn register(&mut self, registration: Registration) -> Result<UserProfile, StoreError> {
        registration.validate()?;
        let profile = registration.into_profile();
        if self.profiles.contains_key(&profile.email) {
            return Err(StoreError::DuplicateEntry(profile.email));
        }
        info!("registered {}", profile.email);
        self.add(profile.clone())?;
        Ok(profile)
    }

    pub fn update_name(&mut self, email: &str, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let profile = self.profile_mut(email)?;
        profile.name = name.trim().to_string();
        self.save()
    }

    pub fn update_password(&mut self, email: &str, password: &str) -> Result<(), StoreError> {
        validate_password(password)?;
        let profile = self.profile_mut(email)?;
        profile.password = password.to_string();
        self.save()
    }

    /// Remove a profile. Deleting an unknown email is a logged no-op that
    /// returns false and does not rewrite the document.
    pub fn delete(&mut self, email: &str) -> Result<bool, StoreError> {
        let key = normalize_email(email);
        if self.profiles.remove(&key).is_none() {
            warn!("delete requested for unknown profile {}", key);
            return Ok(false);
        }
        info!("deleted profile {}", key);
        self.save()?;
        Ok(true)
    }

    /// Apply a completion, evaluate badges and persist if anything changed.
    /// A failed save returns the outcome inside the error; memory keeps it.
    pub fn record_completion(
        &mut self,
        email: &str,
        task_id: TaskId,
        tasks: &TaskCatalog,
        badges: &BadgeCatalog,
    ) -> Result<CompletionOutcome, UnsavedCompletion> {
        let key = normalize_email(email);
        let Some(task) = tasks.get(task_id) else {
            warn!("{} reported unknown task {}", key, task_id);
            return Ok(CompletionOutcome::UnknownTask(task_id));
        };
        let Some(profile) = self.profiles.get_mut(&key) else {
            warn!("completion reported for unknown profile {}", key);
            return Ok(CompletionOutcome::UnknownUser(key));
        };
        if !complete_task(profile, task) {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }
        let new_badges = evaluate_new_badges(profile, badges);
        let outcome = CompletionOutcome::Completed {
            points_awarded: task.points,
            total_points: profile.points,
            new_badges,
        };
        match self.save() {
            Ok(()) => Ok(outcome),
            Err(source) => Err(UnsavedCompletion { outcome, source }),
        }
    }

    /// Mutable access without saving; the caller must call [`UserStore::save`].
    pub fn profile_mut(&mut self, email: &str) -> Result<&mut UserProfile, StoreError> {
        let key = normalize_email(email);
        self.profiles
            .get_mut(&key)
            .ok_or(StoreError::NotFound(key))
    }

    /// Write the whole collection, sorted by email.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let mut profiles: Vec<UserProfile> = self.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.email.cmp(&b.email));
        if let Err(err) = self.repo.save_all(&profiles) {
            warn!("failed to save {} profiles to {}: {}", profiles.len(), self.repo.describe(), err);
            return Err(err.into());
        }
        debug!("saved {} profiles to {}", profiles.len(), self.repo.describe());
        Ok(())
    }

    /// Replace memory with the repository contents.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let stored = self.repo.load_all()?;
        let mut profiles = HashMap::with_capacity(stored.len());
        for mut profile in stored {
            profile.email = normalize_email(&profile.email);
            profile.dedup();
            if profiles.contains_key(&profile.email) {
                warn!("duplicate profile {} in {}; keeping the last one", profile.email, self.repo.describe());
            }
            profiles.insert(profile.email.clone(), profile);
        }
        info!("loaded {} profiles from {}", profiles.len(), self.repo.describe());
        self.profiles = profiles;
        Ok(())
    }
}
