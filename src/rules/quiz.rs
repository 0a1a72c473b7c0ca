use crate::data::quiz::{QuizBank, QuizQuestion};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizRating {
    Expert,
    Learner,
    Beginner,
}

impl QuizRating {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            QuizRating::Expert
        } else if percent >= 50.0 {
            QuizRating::Learner
        } else {
            QuizRating::Beginner
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            QuizRating::Expert => "Climate expert! You really know your stuff.",
            QuizRating::Learner => "Good effort. A little more reading and you'll ace it.",
            QuizRating::Beginner => "Keep learning. Every fact helps the planet.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_option: String,
    pub explanation: String,
}

/// One pass through the question bank.
#[derive(Debug)]
pub struct QuizSession<'a> {
    bank: &'a QuizBank,
    position: usize,
    score: usize,
}

impl<'a> QuizSession<'a> {
    pub fn new(bank: &'a QuizBank) -> Self {
        Self {
            bank,
            position: 0,
            score: 0,
        }
    }

    pub fn current(&self) -> Option<&'a QuizQuestion> {
        self.bank.questions().get(self.position)
    }

    /// 1-based index of the current question, for "Question 3 of 10".
    pub fn question_number(&self) -> usize {
        self.position + 1
    }

    pub fn total(&self) -> usize {
        self.bank.len()
    }

    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome, ValidationError> {
        let question = self
            .current()
            .ok_or_else(|| ValidationError::new("answer", "the quiz is already finished"))?;
        if choice >= question.options.len() {
            return Err(ValidationError::new(
                "answer",
                format!("choose an option between 1 and {}", question.options.len()),
            ));
        }
        let correct = choice == question.correct;
        if correct {
            self.score += 1;
        }
        self.position += 1;
        Ok(AnswerOutcome {
            correct,
            correct_option: question.options[question.correct].clone(),
            explanation: question.explanation.clone(),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.bank.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn percent(&self) -> f64 {
        if self.bank.is_empty() {
            return 0.0;
        }
        self.score as f64 / self.bank.len() as f64 * 100.0
    }

    pub fn rating(&self) -> QuizRating {
        QuizRating::from_percent(self.percent())
    }
}
