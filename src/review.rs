//! Flashcard review: grading due cards.
//!
//! Grading a card updates its schedule and logs an attempt in one
//! transaction, so the two never get out of step.

use crate::database::db;
use crate::models::sm2::{self, MAX_QUALITY, Schedule};
use crate::models::{DueCard, Question};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

/// Outcome of grading a single card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradeOutcome {
    pub schedule: Schedule,
    pub correct: bool,
}

/// Grades a question's flashcard and records the matching attempt.
///
/// quality: 0-5. Grades of 4 and above are recorded as correct.
pub fn grade_card(
    question_id: i64,
    quality: u8,
    today: NaiveDate,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<GradeOutcome> {
    if quality > MAX_QUALITY {
        return Err(Error::InvalidQuality(quality));
    }
    if db::get_question(question_id, conn)?.is_none() {
        return Err(Error::QuestionNotFound(question_id));
    }

    let correct = sm2::is_correct(quality);

    let tx = conn.unchecked_transaction()?;
    let schedule = db::schedule_update(question_id, quality, today, &tx)?;
    db::record_attempt(question_id, correct, now, &tx)?;
    tx.commit()?;

    Ok(GradeOutcome { schedule, correct })
}

/// Walks through the cards that were due when the session started.
pub struct ReviewSession {
    cards: Vec<DueCard>,
    current_index: usize,
    today: NaiveDate,
    reviewed: usize,
}

impl ReviewSession {
    /// Starts a session over the cards due on `today`.
    pub fn new_from_due_cards(today: NaiveDate, conn: &Connection) -> Result<Self> {
        let cards = db::get_due_flashcards(today, conn)?;
        Ok(Self::with_cards(cards, today))
    }

    pub fn with_cards(cards: Vec<DueCard>, today: NaiveDate) -> Self {
        Self {
            cards,
            current_index: 0,
            today,
            reviewed: 0,
        }
    }

    pub fn current_card(&self) -> Option<&Question> {
        self.cards.get(self.current_index).map(|c| &c.question)
    }

    /// Grades the current card and moves to the next one.
    pub fn grade_current_card(
        &mut self,
        quality: u8,
        now: DateTime<Utc>,
        conn: &Connection,
    ) -> Result<GradeOutcome> {
        let question_id = self
            .current_card()
            .map(|q| q.id)
            .ok_or(Error::NoQuestions)?;

        let outcome = grade_card(question_id, quality, self.today, now, conn)?;
        self.current_index += 1;
        self.reviewed += 1;
        Ok(outcome)
    }

    /// Moves past the current card without grading it.
    pub fn skip(&mut self) {
        if self.current_index < self.cards.len() {
            self.current_index += 1;
        }
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviewed
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.cards.len()
    }
}
