pub mod attempt;
pub mod domain_stats;
pub mod flashcard;
pub mod question;
pub mod quiz_session;
pub mod sm2;

pub use attempt::Attempt;
pub use domain_stats::DomainStats;
pub use flashcard::{DueCard, Flashcard};
pub use question::Question;
pub use quiz_session::{AnswerCheck, QuizSession};
pub use sm2::Schedule;
