use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

#[derive(Resource, Debug, Clone)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
}

impl QuizBank {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, CatalogError> {
        let bank = Self { questions };
        bank.validate()?;
        Ok(bank)
    }

    pub fn builtin() -> Self {
        let q = |prompt: &str, options: &[&str], correct: usize, explanation: &str| QuizQuestion {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
            explanation: explanation.to_string(),
        };
        Self {
            questions: vec![
                q(
                    "Which gas is the largest contributor to human-caused global warming?",
                    &["Oxygen", "Carbon dioxide", "Nitrogen", "Helium"],
                    1,
                    "Carbon dioxide from burning fossil fuels is the main driver of warming.",
                ),
                q(
                    "What is the main source of electricity-related emissions worldwide?",
                    &["Wind turbines", "Solar panels", "Coal power plants", "Hydroelectric dams"],
                    2,
                    "Coal is the most carbon-intensive way to generate electricity.",
                ),
                q(
                    "Which of these diets usually has the lowest carbon footprint?",
                    &["Beef-heavy", "Average omnivore", "Pescatarian", "Vegan"],
                    3,
                    "Plant-based diets avoid the large emissions of livestock farming.",
                ),
                q(
                    "Roughly how much has the global average temperature risen since pre-industrial times?",
                    &["About 0.1 C", "About 1.1 C", "About 5 C", "About 10 C"],
                    1,
                    "The planet has warmed by about 1.1 C, and most of it in the last 50 years.",
                ),
                q(
                    "What does 'carbon offsetting' mean?",
                    &[
                        "Paying to reduce or remove emissions elsewhere",
                        "Burning less coal at night",
                        "Storing carbon in batteries",
                        "Planting only indoor plants",
                    ],
                    0,
                    "Offsets fund projects that cut or capture an equivalent amount of CO2.",
                ),
                q(
                    "Which mode of transport emits the most CO2 per passenger mile?",
                    &["Train", "Bus", "Bicycle", "Short-haul flight"],
                    3,
                    "Short flights burn a lot of fuel during take-off relative to distance.",
                ),
                q(
                    "What happens to food waste sent to landfill?",
                    &[
                        "It turns into clean soil",
                        "It releases methane as it rots",
                        "It disappears within a week",
                        "It absorbs carbon dioxide",
                    ],
                    1,
                    "Without oxygen, rotting food produces methane, a potent greenhouse gas.",
                ),
                q(
                    "Which household change saves the most energy?",
                    &[
                        "Leaving chargers plugged in",
                        "Using LED bulbs",
                        "Opening the fridge more often",
                        "Washing clothes at 90 C",
                    ],
                    1,
                    "LEDs use up to 80% less electricity than incandescent bulbs.",
                ),
                q(
                    "What is the Paris Agreement's headline goal?",
                    &[
                        "Ban all cars by 2030",
                        "Keep warming well below 2 C",
                        "Plant one trillion trees",
                        "Stop all air travel",
                    ],
                    1,
                    "Countries agreed to limit warming to well below 2 C, aiming for 1.5 C.",
                ),
                q(
                    "Which ecosystem stores the most carbon per hectare?",
                    &["Deserts", "Peatlands", "Parking lots", "Open ocean surface"],
                    1,
                    "Peatlands hold vast amounts of carbon built up over thousands of years.",
                ),
            ],
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::Validation("quiz cannot be empty".to_string()));
        }
        for (index, question) in self.questions.iter().enumerate() {
            if !(2..=6).contains(&question.options.len()) {
                return Err(CatalogError::Validation(format!(
                    "question {} needs between 2 and 6 options",
                    index + 1
                )));
            }
            if question.correct >= question.options.len() {
                return Err(CatalogError::Validation(format!(
                    "question {} marks a missing option as correct",
                    index + 1
                )));
            }
        }
        Ok(())
    }
}
