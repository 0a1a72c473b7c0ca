use std::collections::HashSet;
use std::path::Path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::tasks::TaskCategory;
use crate::data::{read_catalog_file, CatalogError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    /// Zero means the badge is tied to a category rather than a threshold.
    #[serde(default)]
    pub points_required: u32,
    #[serde(default)]
    pub category: Option<TaskCategory>,
}

impl Badge {
    pub fn is_points_gated(&self) -> bool {
        self.points_required > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BadgeCatalogFile {
    schema_version: u32,
    badges: Vec<Badge>,
}

#[derive(Resource, Debug, Clone)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<Badge>) -> Result<Self, CatalogError> {
        let catalog = Self { badges };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file: BadgeCatalogFile = read_catalog_file(path.as_ref())?;
        if file.schema_version == 0 {
            return Err(CatalogError::Validation(
                "badge catalog schema_version must be >= 1".to_string(),
            ));
        }
        Self::new(file.badges)
    }

    pub fn builtin() -> Self {
        let points = |name: &str, description: &str, icon: &str, color: &str, required: u32| Badge {
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            points_required: required,
            category: None,
        };
        let category = |name: &str, description: &str, icon: &str, color: &str, tag| Badge {
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            points_required: 0,
            category: Some(tag),
        };
        Self {
            badges: vec![
                points("Novice", "Earn your first 10 points.", "seedling", "#8BC34A", 10),
                points("Eco Explorer", "Reach 50 points.", "compass", "#4CAF50", 50),
                points("Green Guardian", "Reach 100 points.", "shield", "#2E7D32", 100),
                points("Sustainability Champion", "Reach 250 points.", "trophy", "#00897B", 250),
                points("Planet Hero", "Reach 500 points.", "globe", "#00695C", 500),
                category("Energy Saver", "Complete energy-saving tasks.", "bolt", "#FFC107", TaskCategory::Energy),
                category("Water Warrior", "Complete water-saving tasks.", "droplet", "#03A9F4", TaskCategory::Water),
                category("Waste Reducer", "Complete waste-reduction tasks.", "recycle", "#795548", TaskCategory::Waste),
                category("Green Commuter", "Complete sustainable transport tasks.", "bike", "#9C27B0", TaskCategory::Transport),
                category("Community Leader", "Complete community tasks.", "people", "#FF5722", TaskCategory::Community),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Badge> {
        self.badges.iter().find(|badge| badge.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }

    pub fn points_gated(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|badge| badge.is_points_gated())
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.badges.is_empty() {
            return Err(CatalogError::Validation(
                "badge catalog cannot be empty".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for badge in &self.badges {
            if badge.name.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "badge name cannot be empty".to_string(),
                ));
            }
            if !names.insert(badge.name.as_str()) {
                return Err(CatalogError::Validation(format!(
                    "duplicate badge name {}",
                    badge.name
                )));
            }
        }
        Ok(())
    }
}
