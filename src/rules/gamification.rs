use std::collections::HashMap;

use bevy_utils::tracing::{debug, info};

use crate::data::badges::{Badge, BadgeCatalog};
use crate::data::tasks::{Task, TaskCatalog, TaskCategory};
use crate::profile::UserProfile;

/// Record `task` as completed. Completing the same id twice awards nothing
/// and returns false.
pub fn complete_task(profile: &mut UserProfile, task: &Task) -> bool {
    if profile.has_completed(task.id) {
        debug!(
            "{} already completed task {}; no points awarded",
            profile.email, task.id
        );
        return false;
    }
    profile.completed_tasks.push(task.id);
    profile.points = profile.points.saturating_add(task.points);
    info!(
        "{} completed task {} (+{} points, total {})",
        profile.email, task.id, task.points, profile.points
    );
    true
}

/// Award every points-gated badge whose threshold the profile now meets.
/// Returns only badges that were not held before. Category-gated badges
/// are not awarded here.
pub fn evaluate_new_badges(profile: &mut UserProfile, catalog: &BadgeCatalog) -> Vec<Badge> {
    let mut unlocked = Vec::new();
    for badge in catalog.points_gated() {
        if profile.has_badge(&badge.name) || profile.points < badge.points_required {
            continue;
        }
        profile.grant_badge(&badge.name);
        info!("{} unlocked badge '{}'", profile.email, badge.name);
        unlocked.push(badge.clone());
    }
    unlocked
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeProgress {
    pub badge: Badge,
    pub points_remaining: u32,
}

/// Lowest-threshold points-gated badge the profile does not hold yet.
pub fn next_badge(profile: &UserProfile, catalog: &BadgeCatalog) -> Option<BadgeProgress> {
    catalog
        .points_gated()
        .filter(|badge| !profile.has_badge(&badge.name))
        .min_by_key(|badge| badge.points_required)
        .map(|badge| BadgeProgress {
            badge: badge.clone(),
            points_remaining: badge.points_required.saturating_sub(profile.points),
        })
}

/// Most recent completions first. Ids missing from the catalog are skipped.
pub fn recent_tasks<'a>(profile: &UserProfile, catalog: &'a TaskCatalog, limit: usize) -> Vec<&'a Task> {
    profile
        .completed_tasks
        .iter()
        .rev()
        .filter_map(|id| catalog.get(*id))
        .take(limit)
        .collect()
}

pub fn category_counts(profile: &UserProfile, catalog: &TaskCatalog) -> HashMap<TaskCategory, u32> {
    let mut counts = HashMap::new();
    for task in profile.completed_tasks.iter().filter_map(|id| catalog.get(*id)) {
        *counts.entry(task.category).or_insert(0) += 1;
    }
    counts
}

/// Points implied by the completion list. Equals `profile.points` as long
/// as the catalog has not changed point values since completion.
pub fn points_from_completions(profile: &UserProfile, catalog: &TaskCatalog) -> u32 {
    profile
        .completed_tasks
        .iter()
        .filter_map(|id| catalog.get(*id))
        .fold(0u32, |sum, task| sum.saturating_add(task.points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tasks::TaskId;

    fn task(id: u32, points: u32) -> Task {
        Task {
            id: TaskId(id),
            title: format!("Task {}", id),
            description: String::new(),
            points,
            category: TaskCategory::Energy,
        }
    }

    fn profile() -> UserProfile {
        UserProfile::new("a@x.com", "A", "secret1")
    }

    #[test]
    fn completion_is_idempotent() {
        let mut once = profile();
        let mut twice = profile();
        let t = task(1, 15);
        assert!(complete_task(&mut once, &t));
        assert!(complete_task(&mut twice, &t));
        assert!(!complete_task(&mut twice, &t));
        assert_eq!(once.points, twice.points);
        assert_eq!(once.completed_tasks.len(), twice.completed_tasks.len());
    }

    #[test]
    fn novice_unlocks_exactly_once() {
        let catalog = BadgeCatalog::builtin();
        let mut p = profile();
        complete_task(&mut p, &task(1, 15));
        assert_eq!(p.points, 15);

        let unlocked = evaluate_new_badges(&mut p, &catalog);
        let names: Vec<&str> = unlocked.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names.iter().filter(|n| **n == "Novice").count(), 1);
        assert!(p.has_badge("Novice"));

        assert!(evaluate_new_badges(&mut p, &catalog).is_empty());
    }

    #[test]
    fn badges_survive_later_point_changes() {
        let catalog = BadgeCatalog::builtin();
        let mut p = profile();
        p.points = 120;
        let unlocked: Vec<String> = evaluate_new_badges(&mut p, &catalog)
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert!(unlocked.contains(&"Novice".to_string()));
        assert!(unlocked.contains(&"Eco Explorer".to_string()));
        assert!(unlocked.contains(&"Green Guardian".to_string()));
        assert!(!unlocked.contains(&"Sustainability Champion".to_string()));

        // Admin correction drops points; badges stay.
        p.points = 0;
        assert!(evaluate_new_badges(&mut p, &catalog).is_empty());
        assert!(p.has_badge("Green Guardian"));
        assert_eq!(p.badges.len(), 3);
    }

    #[test]
    fn category_badges_never_auto_award() {
        let catalog = BadgeCatalog::builtin();
        let mut p = profile();
        for id in 1..=20 {
            complete_task(&mut p, &task(id, 50));
        }
        evaluate_new_badges(&mut p, &catalog);
        assert!(!p.has_badge("Energy Saver"));
        assert!(p.has_badge("Planet Hero"));
    }

    #[test]
    fn next_badge_reports_remaining_points() {
        let catalog = BadgeCatalog::builtin();
        let mut p = profile();
        p.points = 4;
        let next = next_badge(&p, &catalog).unwrap();
        assert_eq!(next.badge.name, "Novice");
        assert_eq!(next.points_remaining, 6);

        p.points = 60;
        evaluate_new_badges(&mut p, &catalog);
        let next = next_badge(&p, &catalog).unwrap();
        assert_eq!(next.badge.name, "Green Guardian");
        assert_eq!(next.points_remaining, 40);
    }

    #[test]
    fn recent_tasks_are_newest_first() {
        let catalog = TaskCatalog::builtin();
        let mut p = profile();
        for id in [2, 5, 9] {
            let t = catalog.get(TaskId(id)).unwrap().clone();
            complete_task(&mut p, &t);
        }
        p.completed_tasks.push(TaskId(4040));
        let recent: Vec<TaskId> = recent_tasks(&p, &catalog, 2).iter().map(|t| t.id).collect();
        assert_eq!(recent, vec![TaskId(9), TaskId(5)]);
    }

    #[test]
    fn stored_points_match_completions() {
        let catalog = TaskCatalog::builtin();
        let mut p = profile();
        for t in catalog.iter().take(5) {
            complete_task(&mut p, t);
        }
        assert_eq!(points_from_completions(&p, &catalog), p.points);
        let counts = category_counts(&p, &catalog);
        assert_eq!(counts.values().sum::<u32>(), 5);
    }
}
