//! Database operations for the study app
//!
//! Handles SQLite schema creation, CRUD operations for questions, attempts and
//! flashcards, the due-set query and the per-domain statistics.

use crate::models::attempt::{format_timestamp, parse_timestamp};
use crate::models::flashcard::{INITIAL_EASE, INITIAL_INTERVAL, format_date, parse_date};
use crate::models::question::DEFAULT_QTYPE;
use crate::models::sm2::{self, Schedule};
use crate::models::{Attempt, DomainStats, DueCard, Flashcard, Question};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde_json::Value;
use std::path::Path;

/// Domain filter value that selects every question.
pub const ALL_DOMAINS: &str = "All";

const QUESTION_COLUMNS: &str = "q.id, q.domain, q.question, q.answer, q.qtype, q.metadata";

/// Opens (or creates) the database file and makes sure the schema exists.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the tables if they are missing. Safe to call on every startup.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY,
            domain TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT,
            qtype TEXT DEFAULT 'free',
            metadata TEXT
        );

        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY,
            question_id INTEGER,
            correct INTEGER,
            timestamp TEXT,
            FOREIGN KEY(question_id) REFERENCES questions(id)
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY,
            question_id INTEGER UNIQUE,
            interval INTEGER DEFAULT 1,
            ease REAL DEFAULT 2.5,
            next_review TEXT,
            FOREIGN KEY(question_id) REFERENCES questions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_attempts_question ON attempts(question_id);",
    )
}

/// Inserts a question and returns its ID.
pub fn add_question(
    domain: &str,
    question: &str,
    answer: Option<&str>,
    qtype: &str,
    metadata: Option<&Value>,
    conn: &Connection,
) -> Result<i64> {
    let metadata = metadata.filter(|m| !m.is_null()).map(Value::to_string);

    conn.execute(
        "INSERT INTO questions (domain, question, answer, qtype, metadata) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![domain, question, answer, qtype, metadata],
    )?;

    Ok(conn.last_insert_rowid())
}

fn question_from_row(row: &Row, offset: usize) -> Result<Question> {
    let metadata: Option<String> = row.get(offset + 5)?;
    let qtype: Option<String> = row.get(offset + 4)?;
    Ok(Question {
        id: row.get(offset)?,
        domain: row.get(offset + 1)?,
        question: row.get(offset + 2)?,
        answer: row.get(offset + 3)?,
        qtype: qtype.unwrap_or_else(|| DEFAULT_QTYPE.to_string()),
        // Keep unparseable payloads as raw text rather than failing the read
        metadata: metadata.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw))),
    })
}

fn flashcard_from_row(row: &Row, offset: usize) -> Result<Flashcard> {
    let raw: String = row.get(offset + 4)?;
    let next_review = parse_date(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            offset + 4,
            Type::Text,
            format!("invalid review date '{}'", raw).into(),
        )
    })?;

    Ok(Flashcard {
        id: row.get(offset)?,
        question_id: row.get(offset + 1)?,
        interval: row.get(offset + 2)?,
        ease: row.get(offset + 3)?,
        next_review,
    })
}

/// Retrieves a single question by ID
pub fn get_question(id: i64, conn: &Connection) -> Result<Option<Question>> {
    conn.query_row(
        &format!("SELECT {} FROM questions q WHERE q.id = ?1", QUESTION_COLUMNS),
        params![id],
        |row| question_from_row(row, 0),
    )
    .optional()
}

/// Retrieves questions ordered by ID, optionally filtered by domain and limited in number.
///
/// A domain of `None` or `"All"` selects every question.
pub fn get_questions(
    domain: Option<&str>,
    limit: Option<usize>,
    conn: &Connection,
) -> Result<Vec<Question>> {
    let domain = domain.filter(|d| *d != ALL_DOMAINS);
    // SQLite treats a negative LIMIT as "no limit"
    let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM questions q
         WHERE ?1 IS NULL OR q.domain = ?1
         ORDER BY q.id
         LIMIT ?2",
        QUESTION_COLUMNS
    ))?;

    let questions = stmt
        .query_map(params![domain, limit], |row| question_from_row(row, 0))?
        .collect::<Result<Vec<Question>>>()?;

    Ok(questions)
}

/// Retrieves distinct domain names, sorted
pub fn list_domains(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT domain FROM questions ORDER BY domain")?;
    let domains = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(domains)
}

/// Deletes a question together with its attempts and flashcard.
///
/// Returns false when no question had the given ID.
pub fn delete_question(id: i64, conn: &Connection) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attempts WHERE question_id = ?1", params![id])?;
    tx.execute("DELETE FROM flashcards WHERE question_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM questions WHERE id = ?1", params![id])?;
    tx.commit()?;

    if deleted > 0 {
        log::info!("Deleted question {}", id);
    }
    Ok(deleted > 0)
}

/// Deletes every question, attempt and flashcard.
pub fn reset_database(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attempts", ())?;
    tx.execute("DELETE FROM flashcards", ())?;
    tx.execute("DELETE FROM questions", ())?;
    tx.commit()?;

    log::info!("Database reset");
    Ok(())
}

/// Appends an attempt for a question and returns its ID.
pub fn record_attempt(
    question_id: i64,
    correct: bool,
    at: DateTime<Utc>,
    conn: &Connection,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO attempts (question_id, correct, timestamp) VALUES (?1, ?2, ?3)",
        params![question_id, correct, format_timestamp(at)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Retrieves the attempts recorded for a question, oldest first.
pub fn get_attempts_for_question(question_id: i64, conn: &Connection) -> Result<Vec<Attempt>> {
    let mut stmt = conn.prepare(
        "SELECT id, question_id, correct, timestamp FROM attempts
         WHERE question_id = ?1
         ORDER BY id",
    )?;

    let attempts = stmt
        .query_map(params![question_id], |row| {
            let raw: String = row.get(3)?;
            let timestamp = parse_timestamp(&raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    Type::Text,
                    format!("invalid timestamp '{}'", raw).into(),
                )
            })?;
            Ok(Attempt {
                id: row.get(0)?,
                question_id: row.get(1)?,
                correct: row.get(2)?,
                timestamp,
            })
        })?
        .collect::<Result<Vec<Attempt>>>()?;

    Ok(attempts)
}

/// Retrieves the flashcard of a question, if it has one
pub fn get_flashcard(question_id: i64, conn: &Connection) -> Result<Option<Flashcard>> {
    conn.query_row(
        "SELECT id, question_id, interval, ease, next_review FROM flashcards WHERE question_id = ?1",
        params![question_id],
        |row| flashcard_from_row(row, 0),
    )
    .optional()
}

/// Inserts or replaces the scheduling state of a question's flashcard.
pub fn upsert_flashcard(question_id: i64, schedule: &Schedule, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO flashcards (question_id, interval, ease, next_review) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(question_id) DO UPDATE SET
            interval = excluded.interval,
            ease = excluded.ease,
            next_review = excluded.next_review",
        params![
            question_id,
            schedule.interval,
            schedule.ease,
            format_date(schedule.next_review)
        ],
    )?;
    Ok(())
}

/// Creates a flashcard due today for a question that has none.
///
/// Returns true when a card was created, false when one already existed.
pub fn ensure_flashcard_for(question_id: i64, today: NaiveDate, conn: &Connection) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO flashcards (question_id, interval, ease, next_review)
         VALUES (?1, ?2, ?3, ?4)",
        params![question_id, INITIAL_INTERVAL, INITIAL_EASE, format_date(today)],
    )?;
    Ok(inserted > 0)
}

/// Applies a review grade to a question's flashcard, creating it when missing.
///
/// Does not record an attempt; see [`crate::review::grade_card`] for the
/// combined operation.
pub fn schedule_update(
    question_id: i64,
    quality: u8,
    today: NaiveDate,
    conn: &Connection,
) -> Result<Schedule> {
    let current = get_flashcard(question_id, conn)?.map(|card| (card.interval, card.ease));
    let schedule = sm2::calculate_next_review(current, quality, today);
    upsert_flashcard(question_id, &schedule, conn)?;

    log::debug!(
        "Question {} graded {}: interval {} -> {}, ease {:.2}, next review {}",
        question_id,
        quality,
        current.map_or(0, |(interval, _)| interval),
        schedule.interval,
        schedule.ease,
        schedule.next_review
    );
    Ok(schedule)
}

/// Retrieves questions whose flashcard is due
///
/// Returns cards where next_review <= today, ordered by next_review
/// (most overdue first). Questions without a flashcard are never returned.
pub fn get_due_flashcards(today: NaiveDate, conn: &Connection) -> Result<Vec<DueCard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT f.id, f.question_id, f.interval, f.ease, f.next_review, {}
         FROM flashcards f
         JOIN questions q ON f.question_id = q.id
         WHERE f.next_review <= ?1
         ORDER BY f.next_review ASC, q.id ASC",
        QUESTION_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![format_date(today)], |row| {
            Ok(DueCard {
                flashcard: flashcard_from_row(row, 0)?,
                question: question_from_row(row, 5)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(cards)
}

/// Computes attempts, correct answers and accuracy for every domain.
///
/// Domains without attempts are included with zero counts. Ordered by
/// attempts, highest first.
pub fn stats_per_domain(conn: &Connection) -> Result<Vec<DomainStats>> {
    let mut stmt = conn.prepare(
        "SELECT q.domain, COUNT(a.id) AS attempts, COALESCE(SUM(a.correct), 0) AS correct
         FROM questions q
         LEFT JOIN attempts a ON a.question_id = q.id
         GROUP BY q.domain
         ORDER BY attempts DESC, q.domain ASC",
    )?;

    let stats = stmt
        .query_map([], |row| {
            Ok(DomainStats::new(row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(stats)
}
