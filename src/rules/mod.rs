pub mod gamification;
pub mod quiz;

pub use gamification::{
    category_counts, complete_task, evaluate_new_badges, next_badge, points_from_completions,
    recent_tasks, BadgeProgress,
};
pub use quiz::{AnswerOutcome, QuizRating, QuizSession};
