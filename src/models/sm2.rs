//! Simplified SM-2 (SuperMemo 2) review scheduling.
//!
//! - A question reviewed for the first time gets interval 1, ease 2.5.
//! - Quality 0-2 is a lapse: the interval restarts at 1 day, ease is kept.
//! - Quality 3-5 multiplies the interval by the current ease, then adjusts
//!   the ease by a quadratic penalty on `5 - quality`.
//! - Ease never falls below 1.3.
//! - Intervals are capped at 100 years so review dates keep 4-digit years.
//!
//! There is no repetition counter: the values produced here must stay
//! identical to the ones already stored in existing databases.

use super::flashcard::{INITIAL_EASE, INITIAL_INTERVAL, MAX_INTERVAL, MIN_EASE, add_days};
use chrono::NaiveDate;

/// Lowest quality that still counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;
/// Lowest quality that is logged as a correct attempt.
pub const CORRECT_QUALITY: u8 = 4;
pub const MAX_QUALITY: u8 = 5;

/// Scheduling state produced by a review.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    pub interval: i64,
    pub ease: f64,
    pub next_review: NaiveDate,
}

/// Calculates the next schedule for a card.
/// `current` is `(interval, ease)` of the existing card, `None` when the
/// question has no flashcard yet. quality: 0-5, higher values are clamped.
pub fn calculate_next_review(
    current: Option<(i64, f64)>,
    quality: u8,
    today: NaiveDate,
) -> Schedule {
    let quality = quality.min(MAX_QUALITY);

    let (interval, ease) = match current {
        None => (INITIAL_INTERVAL, INITIAL_EASE),
        Some((_, ease)) if quality < PASSING_QUALITY => (INITIAL_INTERVAL, ease),
        Some((interval, ease)) => {
            // Grow with the ease before it is adjusted
            let grown = (interval as f64 * ease).round().min(MAX_INTERVAL as f64) as i64;
            (grown.clamp(INITIAL_INTERVAL, MAX_INTERVAL), next_ease(ease, quality))
        }
    };

    Schedule {
        interval,
        ease,
        next_review: add_days(today, interval),
    }
}

/// `max(1.3, ease + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))`
///
/// The grouping matters: stored ease values depend on this evaluation order.
pub fn next_ease(ease: f64, quality: u8) -> f64 {
    let q = f64::from(quality.min(MAX_QUALITY));
    let new_ease = ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    new_ease.max(MIN_EASE)
}

/// Whether a grade is logged as a correct attempt.
pub fn is_correct(quality: u8) -> bool {
    quality >= CORRECT_QUALITY
}
