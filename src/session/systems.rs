use bevy_ecs::prelude::*;
use bevy_utils::tracing::warn;

use crate::data::badges::BadgeCatalog;
use crate::data::tasks::TaskCatalog;
use crate::profile::{validate_name, validate_password};
use crate::rules::gamification::{complete_task, evaluate_new_badges};
use crate::session::ecs::{
    ActivityLog, BadgeUnlocks, CurrentUser, DashboardIntent, IntentQueue, PersistStatus,
};
use crate::store::UserStore;

/// System: applies queued intents to the logged-in profile.
pub fn apply_intents_system(
    mut queue: ResMut<IntentQueue>,
    current: Res<CurrentUser>,
    tasks: Res<TaskCatalog>,
    mut store: ResMut<UserStore>,
    mut log: ResMut<ActivityLog>,
    mut status: ResMut<PersistStatus>,
) {
    let intents = std::mem::take(&mut queue.0);
    let Some(email) = current.0.as_deref() else {
        if !intents.is_empty() {
            log.0.push("Log in to record progress.".to_string());
        }
        return;
    };
    let profile = match store.profile_mut(email) {
        Ok(profile) => profile,
        Err(err) => {
            log.0.push(err.to_string());
            return;
        }
    };

    for intent in intents {
        match intent {
            DashboardIntent::CompleteTask { task_id } => {
                let Some(task) = tasks.get(task_id) else {
                    log.0.push(format!("Task {} does not exist.", task_id));
                    continue;
                };
                if complete_task(profile, task) {
                    log.0.push(format!("Completed '{}' (+{} points).", task.title, task.points));
                    status.dirty = true;
                } else {
                    log.0.push(format!("'{}' was already completed.", task.title));
                }
            }
            DashboardIntent::Rename { name } => match validate_name(&name) {
                Ok(()) => {
                    profile.name = name.trim().to_string();
                    log.0.push(format!("Name changed to {}.", profile.name));
                    status.dirty = true;
                }
                Err(err) => log.0.push(format!("Name not changed: {}.", err)),
            },
            DashboardIntent::ChangePassword { current, new } => {
                if !profile.password_matches(&current) {
                    log.0.push("Password not changed: current password is wrong.".to_string());
                    continue;
                }
                match validate_password(&new) {
                    Ok(()) => {
                        profile.password = new;
                        log.0.push("Password changed.".to_string());
                        status.dirty = true;
                    }
                    Err(err) => log.0.push(format!("Password not changed: {}.", err)),
                }
            }
        }
    }
}

/// System: unlocks points-gated badges for the logged-in profile.
pub fn badge_evaluation_system(
    current: Res<CurrentUser>,
    badges: Res<BadgeCatalog>,
    mut store: ResMut<UserStore>,
    mut unlocks: ResMut<BadgeUnlocks>,
    mut log: ResMut<ActivityLog>,
    mut status: ResMut<PersistStatus>,
) {
    let Some(email) = current.0.as_deref() else {
        return;
    };
    let Ok(profile) = store.profile_mut(email) else {
        return;
    };
    let unlocked = evaluate_new_badges(profile, &badges);
    if unlocked.is_empty() {
        return;
    }
    for badge in &unlocked {
        log.0.push(format!("Badge unlocked: {}!", badge.name));
    }
    unlocks.0.extend(unlocked);
    status.dirty = true;
}

/// System: rewrites the store once per tick if anything changed.
pub fn persist_system(mut store: ResMut<UserStore>, mut status: ResMut<PersistStatus>) {
    if !status.dirty {
        return;
    }
    match store.save() {
        Ok(()) => status.dirty = false,
        Err(err) => {
            warn!("dashboard changes not saved: {}", err);
            // Stay dirty so the next tick retries.
            status.failure = Some(err);
        }
    }
}
