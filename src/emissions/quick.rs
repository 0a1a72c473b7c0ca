use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::emissions::{EmissionModel, FootprintBreakdown};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    UnitedStates,
    Canada,
    Australia,
    UnitedKingdom,
    Germany,
    France,
    China,
    India,
    Brazil,
    Other,
}

impl Country {
    /// Household home-energy emissions before dividing by household size.
    fn home_tons(self) -> f64 {
        match self {
            Country::UnitedStates => 7.5,
            Country::Canada => 6.8,
            Country::Australia => 7.0,
            Country::UnitedKingdom => 4.2,
            Country::Germany => 5.0,
            Country::France => 2.4,
            Country::China => 4.6,
            Country::India => 1.6,
            Country::Brazil => 1.2,
            Country::Other => 4.0,
        }
    }

    fn waste_tons(self) -> f64 {
        match self {
            Country::UnitedStates | Country::Canada | Country::Australia => 0.9,
            Country::UnitedKingdom | Country::Germany | Country::France => 0.6,
            Country::China | Country::Brazil | Country::Other => 0.5,
            Country::India => 0.3,
        }
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "us" | "usa" | "united_states" => Ok(Country::UnitedStates),
            "ca" | "canada" => Ok(Country::Canada),
            "au" | "australia" => Ok(Country::Australia),
            "uk" | "gb" | "united_kingdom" => Ok(Country::UnitedKingdom),
            "de" | "germany" => Ok(Country::Germany),
            "fr" | "france" => Ok(Country::France),
            "cn" | "china" => Ok(Country::China),
            "in" | "india" => Ok(Country::India),
            "br" | "brazil" => Ok(Country::Brazil),
            "other" => Ok(Country::Other),
            _ => Err(unknown_key("country", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
    PublicTransit,
    None,
}

impl VehicleType {
    fn transport_tons(self) -> f64 {
        match self {
            VehicleType::Gasoline => 4.6,
            VehicleType::Diesel => 4.2,
            VehicleType::Hybrid => 2.6,
            VehicleType::Electric => 1.4,
            VehicleType::PublicTransit => 0.9,
            VehicleType::None => 0.3,
        }
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gasoline" | "petrol" | "gas" => Ok(VehicleType::Gasoline),
            "diesel" => Ok(VehicleType::Diesel),
            "hybrid" => Ok(VehicleType::Hybrid),
            "electric" | "ev" => Ok(VehicleType::Electric),
            "public_transit" | "transit" | "bus" => Ok(VehicleType::PublicTransit),
            "none" | "bike" | "walk" => Ok(VehicleType::None),
            _ => Err(unknown_key("vehicle_type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    HeavyMeat,
    Average,
    LowMeat,
    Pescatarian,
    Vegetarian,
    Vegan,
}

impl DietType {
    fn food_tons(self) -> f64 {
        match self {
            DietType::HeavyMeat => 3.3,
            DietType::Average => 2.5,
            DietType::LowMeat => 1.9,
            DietType::Pescatarian => 1.7,
            DietType::Vegetarian => 1.5,
            DietType::Vegan => 1.1,
        }
    }
}

impl FromStr for DietType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "heavy_meat" | "meat_lover" => Ok(DietType::HeavyMeat),
            "average" | "omnivore" => Ok(DietType::Average),
            "low_meat" => Ok(DietType::LowMeat),
            "pescatarian" => Ok(DietType::Pescatarian),
            "vegetarian" => Ok(DietType::Vegetarian),
            "vegan" => Ok(DietType::Vegan),
            _ => Err(unknown_key("diet_type", s)),
        }
    }
}

const RECYCLING_WASTE_FACTOR: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickInputs {
    pub country: Country,
    pub vehicle_type: VehicleType,
    pub diet_type: DietType,
    pub recycles: bool,
    pub household_size: u32,
}

impl QuickInputs {
    /// Build from the raw selections of the quick form.
    pub fn from_keys(
        country: &str,
        vehicle_type: &str,
        diet_type: &str,
        recycles: bool,
        household_size: u32,
    ) -> Result<Self, ValidationError> {
        let inputs = Self {
            country: country.parse()?,
            vehicle_type: vehicle_type.parse()?,
            diet_type: diet_type.parse()?,
            recycles,
            household_size,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.household_size == 0 {
            return Err(ValidationError::new("household_size", "must be at least 1"));
        }
        Ok(())
    }
}

/// Household size as typed into the quick form.
pub fn parse_household_size(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("household_size", "is required"));
    }
    let size: u32 = trimmed.parse().map_err(|_| {
        ValidationError::new("household_size", format!("'{}' is not a whole number", trimmed))
    })?;
    if size == 0 {
        return Err(ValidationError::new("household_size", "must be at least 1"));
    }
    Ok(size)
}

/// Lookup-table calculator for users who do not know their bills.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickEmissionModel;

impl EmissionModel for QuickEmissionModel {
    type Input = QuickInputs;

    fn name(&self) -> &'static str {
        "quick"
    }

    fn breakdown(&self, input: &QuickInputs) -> Result<FootprintBreakdown, ValidationError> {
        input.validate()?;
        let waste_factor = if input.recycles {
            RECYCLING_WASTE_FACTOR
        } else {
            1.0
        };
        Ok(FootprintBreakdown {
            home: input.country.home_tons() / f64::from(input.household_size),
            transport: input.vehicle_type.transport_tons(),
            food: input.diet_type.food_tons(),
            waste: input.country.waste_tons() * waste_factor,
        })
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn unknown_key(field: &str, value: &str) -> ValidationError {
    ValidationError::new(field, format!("unknown option '{}'", value.trim()))
}
