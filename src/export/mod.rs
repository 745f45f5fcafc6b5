//! Import and export of the question bank.
//!
//! Both import formats are reduced to [`ImportItem`] values and stored by
//! [`import_items`]; the export format is [`QuestionRecord`].

pub mod csv;
pub mod json;

use crate::Result;
use crate::database::db;
use crate::models::question::{DEFAULT_DOMAIN, DEFAULT_QTYPE};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// One exported question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub domain: String,
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub qtype: String,
}

/// Fields of one imported row or object, before defaults are applied.
///
/// `question` must be text; `domain`, `answer` and `type` also take numbers
/// and booleans, written out as text.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImportItem {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub domain: Option<String>,
    pub question: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub answer: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "scalar_as_text")]
    pub qtype: Option<String>,
    pub metadata: Option<Value>,
}

fn scalar_as_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected text, got {}", other))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Stores every item that has a question and returns how many were added.
///
/// Each added question also gets a flashcard due `today`. A failure to
/// create that flashcard is logged and does not undo the question.
pub fn import_items<I>(items: I, today: NaiveDate, conn: &Connection) -> Result<usize>
where
    I: IntoIterator<Item = ImportItem>,
{
    let mut added = 0;
    let mut skipped = 0;

    for item in items {
        let Some(question) = non_blank(item.question) else {
            skipped += 1;
            continue;
        };
        let domain = non_blank(item.domain).unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let answer = item.answer.unwrap_or_default();
        let qtype = non_blank(item.qtype).unwrap_or_else(|| DEFAULT_QTYPE.to_string());

        let id = db::add_question(
            &domain,
            &question,
            Some(&answer),
            &qtype,
            item.metadata.as_ref(),
            conn,
        )?;

        if let Err(e) = db::ensure_flashcard_for(id, today, conn) {
            log::warn!("Could not create flashcard for question {}: {}", id, e);
        }
        added += 1;
    }

    log::info!("Imported {} questions ({} skipped)", added, skipped);
    Ok(added)
}

/// Returns every stored question in insertion order.
pub fn export_question_bank(conn: &Connection) -> Result<Vec<QuestionRecord>> {
    let records = db::get_questions(None, None, conn)?
        .into_iter()
        .map(|q| QuestionRecord {
            answer: q.answer.unwrap_or_default(),
            domain: q.domain,
            question: q.question,
            qtype: q.qtype,
        })
        .collect();
    Ok(records)
}
