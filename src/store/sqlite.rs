use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use crate::data::tasks::TaskId;
use crate::error::PersistenceError;
use crate::profile::UserProfile;
use crate::store::repository::UserRepository;

pub const DEFAULT_USERS_DB_PATH: &str = "users.db";

const USERS_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  email TEXT PRIMARY KEY,
  password TEXT NOT NULL,
  name TEXT NOT NULL,
  points INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS user_tasks (
  email TEXT NOT NULL,
  seq INTEGER NOT NULL,
  task_id INTEGER NOT NULL,
  PRIMARY KEY (email, task_id)
);

CREATE TABLE IF NOT EXISTS user_badges (
  email TEXT NOT NULL,
  seq INTEGER NOT NULL,
  badge TEXT NOT NULL,
  PRIMARY KEY (email, badge)
);
"#;

/// SQLite alternative to the JSON document. Same whole-collection contract;
/// a save is one transaction.
pub struct SqliteUserRepository {
    conn: Mutex<Connection>,
    location: PathBuf,
}

impl SqliteUserRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Self::with_connection(conn, path.to_path_buf())
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, PathBuf::from(":memory:"))
    }

    fn with_connection(conn: Connection, location: PathBuf) -> Result<Self, PersistenceError> {
        conn.execute_batch(USERS_DB_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UserRepository for SqliteUserRepository {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.location.display())
    }

    fn load_all(&self) -> Result<Vec<UserProfile>, PersistenceError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT email, password, name, points FROM users ORDER BY email")?;
        let mut profiles = stmt
            .query_map([], |row| {
                Ok(UserProfile {
                    email: row.get(0)?,
                    password: row.get(1)?,
                    name: row.get(2)?,
                    points: row.get::<_, i64>(3)?.max(0) as u32,
                    completed_tasks: Vec::new(),
                    badges: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut task_stmt =
            conn.prepare("SELECT task_id FROM user_tasks WHERE email = ?1 ORDER BY seq")?;
        let mut badge_stmt =
            conn.prepare("SELECT badge FROM user_badges WHERE email = ?1 ORDER BY seq")?;
        for profile in profiles.iter_mut() {
            profile.completed_tasks = task_stmt
                .query_map(params![profile.email], |row| {
                    Ok(TaskId(row.get::<_, i64>(0)? as u32))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            profile.badges = badge_stmt
                .query_map(params![profile.email], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(profiles)
    }

    fn save_all(&mut self, profiles: &[UserProfile]) -> Result<(), PersistenceError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM user_badges", [])?;
        tx.execute("DELETE FROM user_tasks", [])?;
        tx.execute("DELETE FROM users", [])?;
        for profile in profiles {
            tx.execute(
                "INSERT INTO users (email, password, name, points) VALUES (?1, ?2, ?3, ?4)",
                params![profile.email, profile.password, profile.name, profile.points as i64],
            )?;
            for (seq, task) in profile.completed_tasks.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO user_tasks (email, seq, task_id) VALUES (?1, ?2, ?3)",
                    params![profile.email, seq as i64, task.0 as i64],
                )?;
            }
            for (seq, badge) in profile.badges.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO user_badges (email, seq, badge) VALUES (?1, ?2, ?3)",
                    params![profile.email, seq as i64, badge],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_profiles_in_order() {
        let mut repo = SqliteUserRepository::open_in_memory().unwrap();
        let mut a = UserProfile::new("a@x.com", "A", "secret1");
        a.points = 45;
        a.completed_tasks = vec![TaskId(9), TaskId(2), TaskId(14)];
        a.badges = vec!["Novice".to_string(), "Eco Explorer".to_string()];
        let b = UserProfile::new("b@x.com", "B", "secret2");

        repo.save_all(&[b.clone(), a.clone()]).unwrap();
        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded, vec![a, b]);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let mut repo = SqliteUserRepository::open_in_memory().unwrap();
        repo.save_all(&[UserProfile::new("a@x.com", "A", "secret1")])
            .unwrap();
        repo.save_all(&[]).unwrap();
        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");
        {
            let mut repo = SqliteUserRepository::open(&path).unwrap();
            repo.save_all(&[UserProfile::new("a@x.com", "A", "secret1")])
                .unwrap();
        }
        let repo = SqliteUserRepository::open(&path).unwrap();
        assert_eq!(repo.load_all().unwrap().len(), 1);
        assert!(repo.describe().starts_with("sqlite:"));
    }
}
