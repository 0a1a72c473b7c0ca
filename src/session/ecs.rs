use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::data::badges::{Badge, BadgeCatalog};
use crate::data::quiz::QuizBank;
use crate::data::tasks::{TaskCatalog, TaskId};
use crate::error::StoreError;
use crate::session::systems::{apply_intents_system, badge_evaluation_system, persist_system};
use crate::store::UserStore;

/// Requests queued by the UI for the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardIntent {
    CompleteTask { task_id: TaskId },
    Rename { name: String },
    ChangePassword { current: String, new: String },
}

#[derive(Resource, Default, Debug)]
pub struct IntentQueue(pub Vec<DashboardIntent>);

/// Email of the logged-in user, if any.
#[derive(Resource, Default, Debug, Clone)]
pub struct CurrentUser(pub Option<String>);

/// Messages produced during the last tick, for the status bar.
#[derive(Resource, Default, Debug)]
pub struct ActivityLog(pub Vec<String>);

#[derive(Resource, Default, Debug)]
pub struct BadgeUnlocks(pub Vec<Badge>);

#[derive(Resource, Default, Debug)]
pub struct PersistStatus {
    pub dirty: bool,
    pub failure: Option<StoreError>,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum DashboardSet {
    Intake,
    Rules,
    Persist,
}

pub fn create_world(store: UserStore, tasks: TaskCatalog, badges: BadgeCatalog, quiz: QuizBank) -> World {
    let mut world = World::new();
    world.insert_resource(store);
    world.insert_resource(tasks);
    world.insert_resource(badges);
    world.insert_resource(quiz);
    world.insert_resource(CurrentUser::default());
    world.insert_resource(IntentQueue::default());
    world.insert_resource(ActivityLog::default());
    world.insert_resource(BadgeUnlocks::default());
    world.insert_resource(PersistStatus::default());
    world
}

pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((DashboardSet::Intake, DashboardSet::Rules, DashboardSet::Persist).chain());

    schedule.add_systems((
        apply_intents_system.in_set(DashboardSet::Intake),
        badge_evaluation_system.in_set(DashboardSet::Rules),
        persist_system.in_set(DashboardSet::Persist),
    ));

    schedule
}
