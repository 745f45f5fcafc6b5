//! Question is a prompt with an optional answer, tagged with a topical domain.
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DOMAIN: &str = "General";
pub const DEFAULT_QTYPE: &str = "free";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub domain: String,
    pub question: String,
    pub answer: Option<String>,
    pub qtype: String,
    pub metadata: Option<Value>,
}

impl Question {
    /// Answer text, empty when none was stored.
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or("")
    }

    /// Question text cut to `max` characters for one-line listings.
    pub fn preview(&self, max: usize) -> String {
        if self.question.chars().count() <= max {
            self.question.clone()
        } else {
            let cut: String = self.question.chars().take(max).collect();
            format!("{}…", cut)
        }
    }
}
