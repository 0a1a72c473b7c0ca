use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{read_catalog_file, CatalogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Community,
    Energy,
    Water,
    Waste,
    Consumption,
    Food,
    Transport,
    Conservation,
    Sustainable,
}

impl TaskCategory {
    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Community => "Community",
            TaskCategory::Energy => "Energy",
            TaskCategory::Water => "Water",
            TaskCategory::Waste => "Waste",
            TaskCategory::Consumption => "Consumption",
            TaskCategory::Food => "Food",
            TaskCategory::Transport => "Transport",
            TaskCategory::Conservation => "Conservation",
            TaskCategory::Sustainable => "Sustainable living",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskCategory::Community => "people",
            TaskCategory::Energy => "bolt",
            TaskCategory::Water => "droplet",
            TaskCategory::Waste => "recycle",
            TaskCategory::Consumption => "bag",
            TaskCategory::Food => "leaf",
            TaskCategory::Transport => "bike",
            TaskCategory::Conservation => "tree",
            TaskCategory::Sustainable => "globe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub category: TaskCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskCatalogFile {
    schema_version: u32,
    tasks: Vec<Task>,
}

/// Immutable list of sustainability actions. Ids are fixed constants so
/// completions persisted in older documents keep pointing at the same task.
#[derive(Resource, Debug, Clone)]
pub struct TaskCatalog {
    tasks: Vec<Task>,
}

impl TaskCatalog {
    pub fn new(tasks: Vec<Task>) -> Result<Self, CatalogError> {
        let catalog = Self { tasks };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file: TaskCatalogFile = read_catalog_file(path.as_ref())?;
        if file.schema_version == 0 {
            return Err(CatalogError::Validation(
                "task catalog schema_version must be >= 1".to_string(),
            ));
        }
        Self::new(file.tasks)
    }

    pub fn builtin() -> Self {
        let task = |id: u32, title: &str, description: &str, points: u32, category| Task {
            id: TaskId(id),
            title: title.to_string(),
            description: description.to_string(),
            points,
            category,
        };
        Self {
            tasks: vec![
                task(1, "Join a community clean-up", "Spend an afternoon picking up litter in a park, beach or street near you.", 30, TaskCategory::Community),
                task(2, "Switch to LED bulbs", "Replace at least three incandescent bulbs at home with LEDs.", 15, TaskCategory::Energy),
                task(3, "Take shorter showers", "Keep every shower under five minutes for a full week.", 10, TaskCategory::Water),
                task(4, "Start composting", "Set up a compost bin for food scraps and garden waste.", 25, TaskCategory::Waste),
                task(5, "Go plastic-free for a week", "Avoid single-use plastic bags, bottles and packaging for seven days.", 35, TaskCategory::Consumption),
                task(6, "Eat plant-based for a day", "Have only plant-based meals from breakfast to dinner.", 10, TaskCategory::Food),
                task(7, "Bike or walk to school", "Leave the car at home and travel on foot or by bike for a week.", 20, TaskCategory::Transport),
                task(8, "Plant a tree", "Plant a native tree or sapling and take care of it.", 40, TaskCategory::Conservation),
                task(9, "Unplug idle electronics", "Unplug chargers and devices on standby when they are not in use.", 10, TaskCategory::Energy),
                task(10, "Fix a leaking tap", "Find and repair (or report) a dripping tap at home or school.", 15, TaskCategory::Water),
                task(11, "Sort your recycling", "Separate paper, glass, metal and plastic for a whole week.", 15, TaskCategory::Waste),
                task(12, "Buy second-hand", "Choose a used or refurbished item instead of buying new.", 20, TaskCategory::Consumption),
                task(13, "Shop at a local market", "Buy seasonal produce from local growers.", 15, TaskCategory::Food),
                task(14, "Take public transport", "Use the bus or train instead of a car for your trips this week.", 20, TaskCategory::Transport),
                task(15, "Build a bird or bee house", "Give local wildlife a home in your garden or balcony.", 25, TaskCategory::Conservation),
                task(16, "Carry a reusable bottle and bag", "Bring your own bottle and shopping bag every day for two weeks.", 10, TaskCategory::Sustainable),
                task(17, "Host a climate talk", "Organise a short session to share what you learned with friends or classmates.", 50, TaskCategory::Community),
                task(18, "Line-dry your laundry", "Skip the dryer and hang your clothes for a week.", 15, TaskCategory::Sustainable),
            ],
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn in_category(&self, category: TaskCategory) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.category == category)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.tasks.is_empty() {
            return Err(CatalogError::Validation(
                "task catalog cannot be empty".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        for task in &self.tasks {
            if task.id.0 == 0 {
                return Err(CatalogError::Validation(format!(
                    "task '{}' must have a positive id",
                    task.title
                )));
            }
            if !ids.insert(task.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            if task.title.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "task {} missing title",
                    task.id
                )));
            }
            if task.points == 0 {
                return Err(CatalogError::Validation(format!(
                    "task {} must award at least one point",
                    task.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = TaskCatalog::builtin();
        catalog.validate().unwrap();
        assert!(catalog.get(TaskId(1)).is_some());
        assert!(catalog.get(TaskId(999)).is_none());
    }

    #[test]
    fn every_category_has_a_task() {
        let catalog = TaskCatalog::builtin();
        for category in [
            TaskCategory::Community,
            TaskCategory::Energy,
            TaskCategory::Water,
            TaskCategory::Waste,
            TaskCategory::Consumption,
            TaskCategory::Food,
            TaskCategory::Transport,
            TaskCategory::Conservation,
            TaskCategory::Sustainable,
        ] {
            assert!(catalog.in_category(category).next().is_some(), "{:?}", category);
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let task = Task {
            id: TaskId(4),
            title: "Compost".to_string(),
            description: String::new(),
            points: 5,
            category: TaskCategory::Waste,
        };
        let err = TaskCatalog::new(vec![task.clone(), task]).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 4"));
    }

    #[test]
    fn zero_point_tasks_are_rejected() {
        let task = Task {
            id: TaskId(1),
            title: "Nothing".to_string(),
            description: String::new(),
            points: 0,
            category: TaskCategory::Energy,
        };
        assert!(TaskCatalog::new(vec![task]).is_err());
    }

    #[test]
    fn catalog_file_uses_snake_case_categories() {
        let raw = r#"{"id": 7, "title": "Bike", "description": "", "points": 20, "category": "transport"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, TaskId(7));
        assert_eq!(task.category, TaskCategory::Transport);
    }

    const TASK_FILE: &str = r#"{
        "schema_version": 1,
        "tasks": [
            {"id": 101, "title": "Repair a bike", "description": "", "points": 20, "category": "transport"},
            {"id": 102, "title": "Seed swap", "description": "", "points": 15, "category": "conservation"}
        ]
    }"#;

    #[test]
    fn catalog_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, TASK_FILE).unwrap();

        let catalog = TaskCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(TaskId(101)).map(|t| t.points), Some(20));
        assert!(catalog.get(TaskId(1)).is_none());
    }

    #[test]
    fn catalog_file_with_schema_version_zero_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, TASK_FILE.replace("\"schema_version\": 1", "\"schema_version\": 0")).unwrap();
        assert!(matches!(TaskCatalog::load(&path), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn catalog_file_errors_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(TaskCatalog::load(&missing), Err(CatalogError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"schema_version\": 1, \"tasks\": [").unwrap();
        assert!(matches!(TaskCatalog::load(&broken), Err(CatalogError::Json { .. })));
    }
}
