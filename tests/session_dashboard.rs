use std::fs;

use ecospark::data::{BadgeCatalog, QuizBank, TaskCatalog, TaskId};
use ecospark::session::{DashboardIntent, Session};
use ecospark::{Registration, UserStore};
use serde_json::Value;
use tempfile::tempdir;

fn session_at(path: &std::path::Path) -> Session {
    let store = UserStore::open_json(path).expect("open store");
    Session::new(
        store,
        TaskCatalog::builtin(),
        BadgeCatalog::builtin(),
        QuizBank::builtin(),
    )
}

fn register_and_login(session: &mut Session) {
    session
        .register(Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "sunshine".to_string(),
            confirm_password: "sunshine".to_string(),
        })
        .expect("register");
    assert!(session.login("ada@example.com", "sunshine"));
}

#[test]
fn completing_a_task_updates_snapshot_and_document() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);
    register_and_login(&mut session);

    let snapshot = session
        .tick(vec![DashboardIntent::CompleteTask { task_id: TaskId(2) }])
        .expect("tick");
    let user = snapshot.user.as_ref().expect("logged in");
    assert_eq!(user.points, 15);
    assert_eq!(user.completed_count, 1);
    assert_eq!(user.recent_tasks, vec!["Switch to LED bulbs".to_string()]);
    assert_eq!(snapshot.new_badges.len(), 1);
    assert_eq!(snapshot.new_badges[0].name, "Novice");
    assert!(snapshot
        .tasks
        .iter()
        .any(|task| task.id == TaskId(2) && task.completed));
    let next = user.next_badge.as_ref().expect("more badges to earn");
    assert_eq!(next.badge.name, "Eco Explorer");
    assert_eq!(next.points_remaining, 35);

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let stored = &doc["users"][0];
    assert_eq!(stored["points"], 15);
    assert_eq!(stored["completedTasks"], serde_json::json!([2]));
    assert_eq!(stored["badges"], serde_json::json!(["Novice"]));
}

#[test]
fn repeated_completion_awards_nothing() {
    let dir = tempdir().expect("tempdir");
    let mut session = session_at(&dir.path().join("users.json"));
    register_and_login(&mut session);

    let intent = DashboardIntent::CompleteTask { task_id: TaskId(2) };
    session.tick(vec![intent.clone()]).unwrap();
    let snapshot = session.tick(vec![intent]).unwrap();
    let user = snapshot.user.unwrap();
    assert_eq!(user.points, 15);
    assert_eq!(user.completed_count, 1);
    assert!(snapshot.new_badges.is_empty());
    assert!(snapshot
        .activity
        .iter()
        .any(|line| line.contains("already completed")));
}

#[test]
fn unknown_task_is_reported_not_fatal() {
    let dir = tempdir().expect("tempdir");
    let mut session = session_at(&dir.path().join("users.json"));
    register_and_login(&mut session);

    let snapshot = session
        .tick(vec![DashboardIntent::CompleteTask { task_id: TaskId(404) }])
        .unwrap();
    assert_eq!(snapshot.user.unwrap().points, 0);
    assert_eq!(snapshot.activity, vec!["Task 404 does not exist.".to_string()]);
}

#[test]
fn intents_without_login_change_nothing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);

    let snapshot = session
        .tick(vec![DashboardIntent::CompleteTask { task_id: TaskId(1) }])
        .unwrap();
    assert!(snapshot.user.is_none());
    assert!(!path.exists());
}

#[test]
fn wrong_password_does_not_log_in() {
    let dir = tempdir().expect("tempdir");
    let mut session = session_at(&dir.path().join("users.json"));
    register_and_login(&mut session);
    session.logout();
    assert!(!session.login("ada@example.com", "moonlight"));
    assert!(session.current_email().is_none());
    assert!(!session.login("nobody@example.com", "sunshine"));
}

#[test]
fn profile_edits_flow_through_intents() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);
    register_and_login(&mut session);

    let snapshot = session
        .tick(vec![
            DashboardIntent::Rename {
                name: "Ada Lovelace".to_string(),
            },
            DashboardIntent::ChangePassword {
                current: "wrong-one".to_string(),
                new: "analytical".to_string(),
            },
            DashboardIntent::ChangePassword {
                current: "sunshine".to_string(),
                new: "analytical".to_string(),
            },
        ])
        .unwrap();
    assert_eq!(snapshot.user.unwrap().name, "Ada Lovelace");
    assert_eq!(snapshot.activity.len(), 3);

    session.logout();
    let reopened = session_at(&path);
    assert!(reopened.store().authenticate("ada@example.com", "analytical"));
    assert_eq!(reopened.store().get("ada@example.com").unwrap().name, "Ada Lovelace");
}

#[test]
fn deleting_the_account_logs_out_and_persists() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);
    register_and_login(&mut session);

    assert!(session.delete_account().unwrap());
    assert!(session.current_email().is_none());
    assert!(!session.delete_account().unwrap());

    let reopened = session_at(&path);
    assert!(!reopened.store().exists("ada@example.com"));
}

#[test]
fn failed_save_is_surfaced_and_retried() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);
    register_and_login(&mut session);

    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    let result = session.tick(vec![DashboardIntent::CompleteTask { task_id: TaskId(2) }]);
    assert!(result.is_err());
    assert_eq!(session.current_user().unwrap().points, 15);

    fs::remove_dir(&path).unwrap();
    let retry = session.tick(Vec::new()).expect("retry succeeds");
    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["users"][0]["points"], 15);

    // What the failed tick produced is reported by the first tick that saves.
    let names: Vec<&str> = retry.new_badges.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Novice"]);
    assert!(retry
        .activity
        .iter()
        .any(|line| line.starts_with("Completed 'Switch to LED bulbs'")));

    let after = session.tick(Vec::new()).unwrap();
    assert!(after.new_badges.is_empty());
    assert!(after.activity.is_empty());
}

#[test]
fn repeated_failures_report_the_badge_once() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let mut session = session_at(&path);
    register_and_login(&mut session);

    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    assert!(session
        .tick(vec![DashboardIntent::CompleteTask { task_id: TaskId(2) }])
        .is_err());
    assert!(session.tick(Vec::new()).is_err());

    fs::remove_dir(&path).unwrap();
    let retry = session.tick(Vec::new()).unwrap();
    assert_eq!(retry.new_badges.len(), 1);
    assert_eq!(retry.new_badges[0].name, "Novice");
    assert_eq!(
        retry
            .activity
            .iter()
            .filter(|line| line.as_str() == "Badge unlocked: Novice!")
            .count(),
        1
    );
}
