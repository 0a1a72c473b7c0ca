// Re-export core modules for use by the console binary or a UI front end
pub mod config;
pub mod data;
pub mod emissions;
pub mod error;
pub mod profile;
pub mod rules;
pub mod session;
pub mod store;

pub use crate::error::{PersistenceError, StoreError, ValidationError};
pub use crate::profile::{Registration, UserProfile};
pub use crate::session::{DashboardIntent, DashboardSnapshot, Session};
pub use crate::store::UserStore;
