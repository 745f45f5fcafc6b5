//! Flashcard is the spaced repetition state attached to a question.
use super::Question;
use chrono::{Days, NaiveDate};

pub const INITIAL_INTERVAL: i64 = 1;
pub const INITIAL_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
/// Longest interval in days (100 years).
pub const MAX_INTERVAL: i64 = 36_500;

/// Storage format of review dates. ISO order makes text comparison valid.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq)]
pub struct Flashcard {
    pub id: i64,
    pub question_id: i64,
    pub interval: i64,
    pub ease: f64,
    pub next_review: NaiveDate,
}

impl Flashcard {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }
}

/// A question whose flashcard is due, as returned by the due-set query.
#[derive(Clone, Debug, PartialEq)]
pub struct DueCard {
    pub question: Question,
    pub flashcard: Flashcard,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// `today + days`, saturating at the last representable date.
pub fn add_days(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_add_days(Days::new(days.max(0) as u64))
        .unwrap_or(NaiveDate::MAX)
}
