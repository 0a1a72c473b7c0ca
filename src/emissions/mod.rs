pub mod detailed;
pub mod quick;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use detailed::{DetailedEmissionModel, DetailedInputs, FootprintForm};
pub use quick::{parse_household_size, QuickEmissionModel, QuickInputs};

/// National per-capita average used for comparisons, in tons.
pub const AVERAGE_FOOTPRINT_TONS: f64 = 16.0;
/// Per-capita budget compatible with climate targets, in tons.
pub const TARGET_FOOTPRINT_TONS: f64 = 2.0;
pub const OFFSET_PRICE_PER_TON_USD: f64 = 12.50;

/// A footprint estimation strategy. Strategies share the output shape but
/// not their formulas; results from different strategies are not comparable.
pub trait EmissionModel {
    type Input;

    fn name(&self) -> &'static str;

    fn breakdown(&self, input: &Self::Input) -> Result<FootprintBreakdown, ValidationError>;

    fn report(&self, input: &Self::Input) -> Result<FootprintReport, ValidationError> {
        Ok(FootprintReport::from_breakdown(self.breakdown(input)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionCategory {
    Home,
    Transport,
    Food,
    Waste,
}

impl EmissionCategory {
    pub fn label(self) -> &'static str {
        match self {
            EmissionCategory::Home => "Home energy",
            EmissionCategory::Transport => "Transport",
            EmissionCategory::Food => "Food",
            EmissionCategory::Waste => "Waste",
        }
    }
}

/// Annual emissions per category, metric tons CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FootprintBreakdown {
    pub home: f64,
    pub transport: f64,
    pub food: f64,
    pub waste: f64,
}

impl FootprintBreakdown {
    pub fn total(&self) -> f64 {
        self.home + self.transport + self.food + self.waste
    }

    pub fn get(&self, category: EmissionCategory) -> f64 {
        match category {
            EmissionCategory::Home => self.home,
            EmissionCategory::Transport => self.transport,
            EmissionCategory::Food => self.food,
            EmissionCategory::Waste => self.waste,
        }
    }

    /// Category with the highest share; ties resolve to the first listed.
    pub fn largest_category(&self) -> EmissionCategory {
        let mut best = EmissionCategory::Home;
        for category in [
            EmissionCategory::Transport,
            EmissionCategory::Food,
            EmissionCategory::Waste,
        ] {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStatus {
    Excellent,
    VeryGood,
    Good,
    Average,
    AboveAverage,
    High,
    VeryHigh,
}

impl ComparisonStatus {
    pub fn label(self) -> &'static str {
        match self {
            ComparisonStatus::Excellent => "Excellent",
            ComparisonStatus::VeryGood => "Very good",
            ComparisonStatus::Good => "Good",
            ComparisonStatus::Average => "Average",
            ComparisonStatus::AboveAverage => "Above average",
            ComparisonStatus::High => "High",
            ComparisonStatus::VeryHigh => "Very high",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ComparisonStatus::Excellent => "Well under half the national average. Keep it up!",
            ComparisonStatus::VeryGood => "Comfortably below the national average.",
            ComparisonStatus::Good => "A little below the national average.",
            ComparisonStatus::Average => "Close to the national average.",
            ComparisonStatus::AboveAverage => "Somewhat above the national average.",
            ComparisonStatus::High => "Well above the national average.",
            ComparisonStatus::VeryHigh => "Far above the national average. Start with your largest category.",
        }
    }
}

pub fn total(breakdown: &FootprintBreakdown) -> f64 {
    breakdown.total()
}

pub fn comparison_status(total: f64) -> ComparisonStatus {
    let ratio = total / AVERAGE_FOOTPRINT_TONS;
    if ratio < 0.5 {
        ComparisonStatus::Excellent
    } else if ratio < 0.7 {
        ComparisonStatus::VeryGood
    } else if ratio < 0.9 {
        ComparisonStatus::Good
    } else if ratio < 1.1 {
        ComparisonStatus::Average
    } else if ratio < 1.3 {
        ComparisonStatus::AboveAverage
    } else if ratio < 1.5 {
        ComparisonStatus::High
    } else {
        ComparisonStatus::VeryHigh
    }
}

pub fn offset_cost_usd(total: f64) -> f64 {
    total * OFFSET_PRICE_PER_TON_USD
}

pub fn reduction_needed_percent(total: f64) -> f64 {
    if total <= TARGET_FOOTPRINT_TONS {
        0.0
    } else {
        (total - TARGET_FOOTPRINT_TONS) / total * 100.0
    }
}

/// Everything the results panel shows for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintReport {
    pub breakdown: FootprintBreakdown,
    pub total: f64,
    pub status: ComparisonStatus,
    pub offset_cost_usd: f64,
    pub reduction_needed_percent: f64,
    pub largest_category: EmissionCategory,
}

impl FootprintReport {
    pub fn from_breakdown(breakdown: FootprintBreakdown) -> Self {
        let total = breakdown.total();
        Self {
            breakdown,
            total,
            status: comparison_status(total),
            offset_cost_usd: offset_cost_usd(total),
            reduction_needed_percent: reduction_needed_percent(total),
            largest_category: breakdown.largest_category(),
        }
    }

    pub fn share_percent(&self, category: EmissionCategory) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        self.breakdown.get(category) / self.total * 100.0
    }
}
