use crate::error::PersistenceError;
use crate::profile::UserProfile;

/// Whole-collection persistence for user profiles. Every save replaces the
/// previous contents.
pub trait UserRepository: Send + Sync {
    /// Human-readable location, for logs and error messages.
    fn describe(&self) -> String;

    /// Read every stored profile. A missing backing store is empty, not an error.
    fn load_all(&self) -> Result<Vec<UserProfile>, PersistenceError>;

    fn save_all(&mut self, profiles: &[UserProfile]) -> Result<(), PersistenceError>;
}
