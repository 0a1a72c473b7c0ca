pub mod ecs;
pub mod systems;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::info;

use crate::data::badges::{Badge, BadgeCatalog};
use crate::data::quiz::QuizBank;
use crate::data::tasks::{TaskCatalog, TaskCategory, TaskId};
use crate::error::StoreError;
use crate::profile::{normalize_email, Registration, UserProfile};
use crate::rules::gamification::{category_counts, next_badge, recent_tasks, BadgeProgress};
use crate::store::UserStore;

pub use ecs::{
    create_schedule, create_world, ActivityLog, BadgeUnlocks, CurrentUser, DashboardIntent,
    DashboardSet, IntentQueue, PersistStatus,
};

const RECENT_TASK_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub category: TaskCategory,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
    pub points: u32,
    pub completed_count: usize,
    pub badges: Vec<String>,
    pub recent_tasks: Vec<String>,
    pub next_badge: Option<BadgeProgress>,
    pub category_counts: Vec<(TaskCategory, u32)>,
}

/// Read-only dashboard view returned to the UI after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub user: Option<UserSummary>,
    pub tasks: Vec<TaskView>,
    pub new_badges: Vec<Badge>,
    pub activity: Vec<String>,
}

/// Wrapper around the dashboard world and its schedule.
pub struct Session {
    world: World,
    schedule: Schedule,
}

impl Session {
    pub fn new(store: UserStore, tasks: TaskCatalog, badges: BadgeCatalog, quiz: QuizBank) -> Self {
        Self {
            world: create_world(store, tasks, badges, quiz),
            schedule: create_schedule(),
        }
    }

    pub fn store(&self) -> &UserStore {
        self.world.resource::<UserStore>()
    }

    pub fn tasks(&self) -> &TaskCatalog {
        self.world.resource::<TaskCatalog>()
    }

    pub fn badges(&self) -> &BadgeCatalog {
        self.world.resource::<BadgeCatalog>()
    }

    pub fn quiz(&self) -> &QuizBank {
        self.world.resource::<QuizBank>()
    }

    pub fn register(&mut self, registration: Registration) -> Result<UserProfile, StoreError> {
        self.world.resource_mut::<UserStore>().register(registration)
    }

    /// Returns false on a wrong email or password; the session stays as it was.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        if !self.store().authenticate(email, password) {
            return false;
        }
        let email = normalize_email(email);
        info!("{} logged in", email);
        self.world.resource_mut::<CurrentUser>().0 = Some(email);
        true
    }

    pub fn logout(&mut self) {
        if let Some(email) = self.world.resource_mut::<CurrentUser>().0.take() {
            info!("{} logged out", email);
        }
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.world.resource_mut::<ActivityLog>().0.clear();
        self.world.resource_mut::<BadgeUnlocks>().0.clear();
    }

    pub fn current_email(&self) -> Option<&str> {
        self.world.resource::<CurrentUser>().0.as_deref()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current_email()
            .and_then(|email| self.store().get(email))
    }

    /// Delete the logged-in account and log out.
    pub fn delete_account(&mut self) -> Result<bool, StoreError> {
        let Some(email) = self.world.resource_mut::<CurrentUser>().0.take() else {
            return Ok(false);
        };
        self.clear_pending();
        self.world.resource_mut::<UserStore>().delete(&email)
    }

    /// Apply intents and return the dashboard. A failed save is returned as
    /// an error; the changes stay in memory and are retried next tick.
    ///
    /// Activity and badge unlocks accumulate until a tick saves successfully,
    /// so a retry still reports what the failed tick produced.
    pub fn tick(&mut self, intents: Vec<DashboardIntent>) -> Result<DashboardSnapshot, StoreError> {
        self.world.resource_mut::<IntentQueue>().0 = intents;

        self.schedule.run(&mut self.world);

        if let Some(err) = self.world.resource_mut::<PersistStatus>().failure.take() {
            return Err(err);
        }
        let snapshot = self.snapshot();
        self.clear_pending();
        Ok(snapshot)
    }

    /// Current view. `activity` and `new_badges` hold whatever no
    /// successful tick has returned yet.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let tasks = self.tasks();
        let badges = self.badges();
        let user = self.current_user();

        let task_views = tasks
            .iter()
            .map(|task| TaskView {
                id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                points: task.points,
                category: task.category,
                completed: user.map(|u| u.has_completed(task.id)).unwrap_or(false),
            })
            .collect();

        let user = user.map(|profile| {
            let mut counts: Vec<(TaskCategory, u32)> =
                category_counts(profile, tasks).into_iter().collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(b.0.label())));
            UserSummary {
                name: profile.name.clone(),
                email: profile.email.clone(),
                points: profile.points,
                completed_count: profile.completed_tasks.len(),
                badges: profile.badges.clone(),
                recent_tasks: recent_tasks(profile, tasks, RECENT_TASK_LIMIT)
                    .into_iter()
                    .map(|task| task.title.clone())
                    .collect(),
                next_badge: next_badge(profile, badges),
                category_counts: counts,
            }
        });

        DashboardSnapshot {
            user,
            tasks: task_views,
            new_badges: self.world.resource::<BadgeUnlocks>().0.clone(),
            activity: self.world.resource::<ActivityLog>().0.clone(),
        }
    }
}
