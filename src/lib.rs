pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod review;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Attempt, DomainStats, DueCard, Flashcard, Question, QuizSession};
pub use review::{ReviewSession, grade_card};
