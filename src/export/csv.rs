//! CSV import of questions.
//! Expects a header row with `domain`, `question`, `answer` and `type` columns,
//! in any letter case. Only `question` is required.

use super::{ImportItem, import_items};
use crate::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One CSV row keyed by header name.
pub type TabularRow = HashMap<String, String>;

/// Reads all rows of a CSV document. Rows that cannot be parsed are skipped.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<TabularRow>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Skipping unreadable CSV row: {}", e);
                continue;
            }
        };
        // Short rows just miss the trailing columns
        let row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Looks up a column by name: exact lowercase header first, then any case.
fn field(row: &TabularRow, name: &str) -> Option<String> {
    let non_empty = |v: &&String| !v.trim().is_empty();

    row.get(name)
        .filter(non_empty)
        .or_else(|| {
            row.iter()
                .filter(|(header, _)| header.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
                .find(non_empty)
        })
        .cloned()
}

pub fn item_from_row(row: &TabularRow) -> ImportItem {
    ImportItem {
        domain: field(row, "domain"),
        question: field(row, "question"),
        answer: field(row, "answer"),
        qtype: field(row, "type"),
        metadata: None,
    }
}

/// Imports tabular rows and returns the number of questions added.
pub fn import_from_tabular<I>(rows: I, today: NaiveDate, conn: &Connection) -> Result<usize>
where
    I: IntoIterator<Item = TabularRow>,
{
    import_items(rows.into_iter().map(|row| item_from_row(&row)), today, conn)
}

/// Imports questions from a CSV file.
pub fn import_csv(path: &Path, today: NaiveDate, conn: &Connection) -> Result<usize> {
    let file = File::open(path)?;
    let rows = read_rows(file)?;
    log::info!("Read {} rows from '{}'", rows.len(), path.display());
    import_from_tabular(rows, today, conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db;
    use std::fs;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_read_rows_with_short_row() {
        let data = "domain,question,answer,type\nCrypto,What is AES?,A cipher,free\nCrypto,Short row\n";

        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["answer"], "A cipher");
        assert_eq!(rows[1]["question"], "Short row");
        assert!(!rows[1].contains_key("answer"));
    }

    #[test]
    fn test_capitalized_headers() {
        let data = "Domain,Question,Answer,Type\nThreats,What is phishing?,Social engineering,MCQ\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        let item = item_from_row(&rows[0]);

        assert_eq!(item.domain.as_deref(), Some("Threats"));
        assert_eq!(item.question.as_deref(), Some("What is phishing?"));
        assert_eq!(item.answer.as_deref(), Some("Social engineering"));
        assert_eq!(item.qtype.as_deref(), Some("MCQ"));
    }

    #[test]
    fn test_lowercase_header_wins_when_both_present() {
        let mut row = TabularRow::new();
        row.insert("domain".to_string(), "lower".to_string());
        row.insert("Domain".to_string(), "upper".to_string());
        row.insert("Question".to_string(), "Q".to_string());

        let item = item_from_row(&row);
        assert_eq!(item.domain.as_deref(), Some("lower"));
        assert_eq!(item.question.as_deref(), Some("Q"));
    }

    #[test]
    fn test_import_skips_row_without_question() {
        let conn = test_conn();
        let data = "domain,question,answer\nCrypto,,orphan answer\nCrypto,What is RSA?,Asymmetric\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        let added = import_from_tabular(rows, today(), &conn).unwrap();

        assert_eq!(added, 1);
        let questions = db::get_questions(None, None, &conn).unwrap();
        assert_eq!(questions[0].question, "What is RSA?");
        assert_eq!(questions[0].qtype, "free");
    }

    #[test]
    fn test_import_csv_file() {
        let conn = test_conn();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.csv");
        fs::write(
            &path,
            "question,answer\nWhat port does SSH use?,22\nWhat port does DNS use?,53\n",
        )
        .unwrap();

        let added = import_csv(&path, today(), &conn).unwrap();

        assert_eq!(added, 2);
        assert_eq!(db::list_domains(&conn).unwrap(), vec!["General"]);
        assert_eq!(db::get_due_flashcards(today(), &conn).unwrap().len(), 2);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let conn = test_conn();
        let result = import_csv(Path::new("nonexistent_file_xyz123.csv"), today(), &conn);
        assert!(result.is_err());
    }
}
