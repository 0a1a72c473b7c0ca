use serde::{Deserialize, Serialize};

use crate::emissions::{EmissionModel, FootprintBreakdown};
use crate::error::ValidationError;

const LBS_PER_METRIC_TON: f64 = 2204.62;
const ELECTRICITY_LBS_PER_KWH: f64 = 0.92;
const GAS_LBS_PER_THERM: f64 = 11.7;

const CAR_GRAMS_PER_MILE: f64 = 404.0;
const TRANSIT_GRAMS_PER_MILE: f64 = 150.0;
const FLIGHT_GRAMS_PER_MILE: f64 = 200.0;
const GRAMS_PER_METRIC_TON: f64 = 1_000_000.0;

const VEGETARIAN_FOOD_TONS: f64 = 1.75;
const OMNIVORE_FOOD_TONS: f64 = 2.5;
const OMNIVORE_MEAT_SHARE: f64 = 0.3;
const REFERENCE_MEAT_MEALS_PER_WEEK: f64 = 10.0;

const WASTE_KG_CO2_PER_KG: f64 = 2.1;

/// Home energy from monthly electricity (kWh) and natural gas (therms).
pub fn compute_home(electricity_kwh_per_month: f64, gas_therms_per_month: f64) -> f64 {
    (electricity_kwh_per_month * 12.0 * ELECTRICITY_LBS_PER_KWH
        + gas_therms_per_month * 12.0 * GAS_LBS_PER_THERM)
        / LBS_PER_METRIC_TON
}

pub fn compute_transport(car_miles: f64, transit_miles: f64, flight_miles: f64) -> f64 {
    (car_miles * CAR_GRAMS_PER_MILE
        + transit_miles * TRANSIT_GRAMS_PER_MILE
        + flight_miles * FLIGHT_GRAMS_PER_MILE)
        / GRAMS_PER_METRIC_TON
}

pub fn compute_food(is_vegetarian: bool, meat_meals_per_week: f64) -> f64 {
    if is_vegetarian {
        return VEGETARIAN_FOOD_TONS;
    }
    let plant = OMNIVORE_FOOD_TONS * (1.0 - OMNIVORE_MEAT_SHARE);
    let meat = OMNIVORE_FOOD_TONS * OMNIVORE_MEAT_SHARE
        * (meat_meals_per_week / REFERENCE_MEAT_MEALS_PER_WEEK);
    plant + meat
}

pub fn compute_waste(waste_kg_per_year: f64) -> f64 {
    waste_kg_per_year * WASTE_KG_CO2_PER_KG / 1000.0
}

/// Validated quantities for the detailed calculator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedInputs {
    pub electricity_kwh_per_month: f64,
    pub gas_therms_per_month: f64,
    pub car_miles_per_year: f64,
    pub transit_miles_per_year: f64,
    pub flight_miles_per_year: f64,
    pub is_vegetarian: bool,
    pub meat_meals_per_week: f64,
    pub waste_kg_per_year: f64,
}

impl DetailedInputs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("electricity", self.electricity_kwh_per_month),
            ("gas", self.gas_therms_per_month),
            ("car_miles", self.car_miles_per_year),
            ("transit_miles", self.transit_miles_per_year),
            ("flight_miles", self.flight_miles_per_year),
            ("meat_meals", self.meat_meals_per_week),
            ("waste", self.waste_kg_per_year),
        ];
        for (field, value) in fields {
            check_quantity(field, value)?;
        }
        Ok(())
    }
}

/// Raw text as typed into the calculator form.
#[derive(Debug, Clone, Default)]
pub struct FootprintForm {
    pub electricity: String,
    pub gas: String,
    pub car_miles: String,
    pub transit_miles: String,
    pub flight_miles: String,
    pub diet: String,
    pub meat_meals: String,
    pub waste: String,
}

impl FootprintForm {
    /// Parse every field in form order; the first bad field is reported.
    pub fn parse(&self) -> Result<DetailedInputs, ValidationError> {
        let electricity_kwh_per_month = parse_quantity("electricity", &self.electricity)?;
        let gas_therms_per_month = parse_quantity("gas", &self.gas)?;
        let car_miles_per_year = parse_quantity("car_miles", &self.car_miles)?;
        let transit_miles_per_year = parse_quantity("transit_miles", &self.transit_miles)?;
        let flight_miles_per_year = parse_quantity("flight_miles", &self.flight_miles)?;
        let is_vegetarian = parse_diet(&self.diet)?;
        let meat_meals_per_week = if is_vegetarian && self.meat_meals.trim().is_empty() {
            0.0
        } else {
            parse_quantity("meat_meals", &self.meat_meals)?
        };
        let inputs = DetailedInputs {
            electricity_kwh_per_month,
            gas_therms_per_month,
            car_miles_per_year,
            transit_miles_per_year,
            flight_miles_per_year,
            is_vegetarian,
            meat_meals_per_week,
            waste_kg_per_year: parse_quantity("waste", &self.waste)?,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

fn parse_diet(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "vegetarian" | "veg" | "yes" | "y" => Ok(true),
        "omnivore" | "meat" | "no" | "n" => Ok(false),
        "" => Err(ValidationError::new("diet", "is required")),
        other => Err(ValidationError::new(
            "diet",
            format!("unknown diet '{}' (expected vegetarian or omnivore)", other),
        )),
    }
}

fn parse_quantity(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", trimmed)))?;
    check_quantity(field, value)?;
    Ok(value)
}

fn check_quantity(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

/// Quantity-based calculator: monthly utility bills, yearly mileage, diet
/// and yearly waste.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailedEmissionModel;

impl EmissionModel for DetailedEmissionModel {
    type Input = DetailedInputs;

    fn name(&self) -> &'static str {
        "detailed"
    }

    fn breakdown(&self, input: &DetailedInputs) -> Result<FootprintBreakdown, ValidationError> {
        input.validate()?;
        Ok(FootprintBreakdown {
            home: compute_home(input.electricity_kwh_per_month, input.gas_therms_per_month),
            transport: compute_transport(
                input.car_miles_per_year,
                input.transit_miles_per_year,
                input.flight_miles_per_year,
            ),
            food: compute_food(input.is_vegetarian, input.meat_meals_per_week),
            waste: compute_waste(input.waste_kg_per_year),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emissions::total;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn home_matches_reference_figures() {
        assert_eq!(compute_home(0.0, 0.0), 0.0);
        let expected = (900.0 * 12.0 * 0.92 + 50.0 * 12.0 * 11.7) / 2204.62;
        assert!(close(compute_home(900.0, 50.0), expected));
    }

    #[test]
    fn home_is_monotonic_in_each_argument() {
        let samples = [0.0, 1.0, 10.0, 250.0, 1000.0, 5000.0];
        for &gas in &samples {
            for pair in samples.windows(2) {
                assert!(compute_home(pair[0], gas) <= compute_home(pair[1], gas));
            }
        }
        for &elec in &samples {
            for pair in samples.windows(2) {
                assert!(compute_home(elec, pair[0]) <= compute_home(elec, pair[1]));
            }
        }
    }

    #[test]
    fn transport_uses_gram_factors() {
        assert!(close(compute_transport(10_000.0, 0.0, 0.0), 4.04));
        assert!(close(compute_transport(0.0, 2_000.0, 5_000.0), 0.3 + 1.0));
    }

    #[test]
    fn food_baselines() {
        assert!(close(compute_food(true, 14.0), 1.75));
        assert!(close(compute_food(false, 0.0), 1.75));
        assert!(close(compute_food(false, 10.0), 2.5));
        assert!(close(compute_food(false, 20.0), 1.75 + 1.5));
    }

    #[test]
    fn waste_scales_linearly() {
        assert_eq!(compute_waste(0.0), 0.0);
        assert!(close(compute_waste(1000.0), 2.1));
    }

    #[test]
    fn total_is_sum_of_category_calls() {
        let inputs = DetailedInputs {
            electricity_kwh_per_month: 600.0,
            gas_therms_per_month: 30.0,
            car_miles_per_year: 8_000.0,
            transit_miles_per_year: 1_200.0,
            flight_miles_per_year: 3_000.0,
            is_vegetarian: false,
            meat_meals_per_week: 7.0,
            waste_kg_per_year: 400.0,
        };
        let breakdown = DetailedEmissionModel.breakdown(&inputs).unwrap();
        let expected = compute_home(600.0, 30.0)
            + compute_transport(8_000.0, 1_200.0, 3_000.0)
            + compute_food(false, 7.0)
            + compute_waste(400.0);
        assert!(close(total(&breakdown), expected));
    }

    #[test]
    fn form_rejects_bad_fields_before_computing() {
        let mut form = FootprintForm {
            electricity: "500".into(),
            gas: "20".into(),
            car_miles: "5000".into(),
            transit_miles: "0".into(),
            flight_miles: "0".into(),
            diet: "omnivore".into(),
            meat_meals: "5".into(),
            waste: "300".into(),
        };
        assert!(form.parse().is_ok());

        form.gas = "-3".into();
        assert_eq!(form.parse().unwrap_err().field, "gas");

        form.gas = "lots".into();
        assert_eq!(form.parse().unwrap_err().field, "gas");

        form.gas = "20".into();
        form.waste = "  ".into();
        assert_eq!(form.parse().unwrap_err().field, "waste");

        form.waste = "300".into();
        form.diet = "carnivore".into();
        assert_eq!(form.parse().unwrap_err().field, "diet");
    }

    #[test]
    fn first_bad_field_follows_form_order() {
        let form = FootprintForm {
            electricity: "abc".into(),
            gas: "0".into(),
            car_miles: "0".into(),
            transit_miles: "0".into(),
            flight_miles: "0".into(),
            diet: "carnivore".into(),
            meat_meals: "-1".into(),
            waste: "0".into(),
        };
        assert_eq!(form.parse().unwrap_err().field, "electricity");
    }

    #[test]
    fn non_finite_text_is_rejected() {
        let mut form = FootprintForm {
            electricity: "inf".into(),
            gas: "0".into(),
            car_miles: "0".into(),
            transit_miles: "0".into(),
            flight_miles: "0".into(),
            diet: "omnivore".into(),
            meat_meals: "3".into(),
            waste: "0".into(),
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.field, "electricity");
        assert_eq!(err.reason, "must be a finite number");

        form.electricity = "100".into();
        form.flight_miles = "NaN".into();
        let err = form.parse().unwrap_err();
        assert_eq!(err.field, "flight_miles");
        assert_eq!(err.reason, "must be a finite number");
    }

    #[test]
    fn vegetarian_form_may_leave_meat_meals_blank() {
        let form = FootprintForm {
            electricity: "100".into(),
            gas: "0".into(),
            car_miles: "0".into(),
            transit_miles: "0".into(),
            flight_miles: "0".into(),
            diet: "vegetarian".into(),
            meat_meals: String::new(),
            waste: "0".into(),
        };
        let inputs = form.parse().unwrap();
        assert!(inputs.is_vegetarian);
        assert_eq!(inputs.meat_meals_per_week, 0.0);
    }

    #[test]
    fn model_rejects_negative_inputs() {
        let inputs = DetailedInputs {
            car_miles_per_year: -1.0,
            ..Default::default()
        };
        assert!(DetailedEmissionModel.breakdown(&inputs).is_err());
    }
}
