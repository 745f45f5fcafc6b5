//! JSON import/export module for the question bank.
//! Imports read an array of objects with `domain`, `question`, `answer`,
//! `type` and an optional `metadata` payload; exports write the same keys
//! without metadata.

use super::{ImportItem, export_question_bank, import_items};
use crate::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::Value;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Imports JSON objects and returns the number of questions added.
///
/// Items that are not objects, or whose question is not text, are skipped.
pub fn import_from_structured<I>(items: I, today: NaiveDate, conn: &Connection) -> Result<usize>
where
    I: IntoIterator<Item = Value>,
{
    let items = items
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<ImportItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                log::debug!("Skipping malformed item: {}", e);
                None
            }
        });
    import_items(items, today, conn)
}

/// Imports questions from a JSON file holding an array of objects.
/// Returns an error if the file doesn't exist or is not a JSON array.
pub fn import_json(path: &Path, today: NaiveDate, conn: &Connection) -> Result<usize> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let items: Vec<Value> = serde_json::from_str(&contents)?;
    log::info!("Read {} items from '{}'", items.len(), path.display());
    import_from_structured(items, today, conn)
}

/// Exports the whole question bank to a JSON file at the specified path.
/// Returns the number of exported questions.
pub fn export_json_to_path(path: &Path, conn: &Connection) -> Result<usize> {
    let records = export_question_bank(conn)?;
    let json_string = serde_json::to_string_pretty(&records)?;

    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    log::info!("Exported {} questions to '{}'", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::database::db;
    use crate::export::QuestionRecord;
    use serde_json::json;
    use std::collections::HashSet;
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
    fn test_import_from_structured_with_metadata() {
        let conn = test_conn();
        let items = vec![json!({
            "domain": "Cryptography",
            "question": "Which cipher is a stream cipher?",
            "answer": "RC4",
            "type": "MCQ",
            "metadata": {"choices": ["AES", "RC4", "DES"], "source": {"chapter": 3}}
        })];

        let added = import_from_structured(items, today(), &conn).unwrap();

        assert_eq!(added, 1);
        let q = &db::get_questions(None, None, &conn).unwrap()[0];
        assert_eq!(q.qtype, "MCQ");
        assert_eq!(q.metadata.as_ref().unwrap()["source"]["chapter"], 3);
    }

    #[test]
    fn test_import_from_structured_skips_malformed_items() {
        let conn = test_conn();
        let items = vec![
            json!({"domain": "Threats"}),
            json!("not an object"),
            json!({"question": 42}),
            json!({"question": "Kept", "answer": null, "domain": null}),
        ];

        let added = import_from_structured(items, today(), &conn).unwrap();

        assert_eq!(added, 1);
        let q = &db::get_questions(None, None, &conn).unwrap()[0];
        assert_eq!(q.question, "Kept");
        assert_eq!(q.domain, "General");
        assert_eq!(q.answer.as_deref(), Some(""));
    }

    #[test]
    fn test_import_from_structured_accepts_scalar_fields() {
        let conn = test_conn();
        let items = vec![
            json!({"question": "Which port does SSH use?", "answer": 22, "type": false, "domain": 3}),
            json!({"question": "Nested answer", "answer": ["22"]}),
        ];

        let added = import_from_structured(items, today(), &conn).unwrap();

        assert_eq!(added, 1);
        let q = &db::get_questions(None, None, &conn).unwrap()[0];
        assert_eq!(q.answer.as_deref(), Some("22"));
        assert_eq!(q.qtype, "false");
        assert_eq!(q.domain, "3");
    }

    #[test]
    fn test_import_json() {
        let conn = test_conn();
        let json_content = r#"[
  {
    "domain": "Network Security",
    "question": "What does a firewall do?",
    "answer": "Filters traffic",
    "type": "free"
  }
]"#;
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_import.json");
        fs::write(&test_file, json_content).unwrap();

        let added = import_json(&test_file, today(), &conn).unwrap();

        assert_eq!(added, 1);
        let q = &db::get_questions(None, None, &conn).unwrap()[0];
        assert_eq!(q.domain, "Network Security");
        assert_eq!(q.answer.as_deref(), Some("Filters traffic"));
    }

    #[test]
    fn test_export_json_to_path() {
        let conn = test_conn();
        db::add_question("Threats", "Was ist Phishing?", Some("Täuschung"), "free", None, &conn)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_export.json");

        let exported = export_json_to_path(&test_file, &conn).unwrap();
        assert_eq!(exported, 1);

        let written = fs::read_to_string(&test_file).unwrap();
        // Non-ASCII text is written as-is
        assert!(written.contains("Täuschung"));

        let records: Vec<QuestionRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(records[0].qtype, "free");
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let source = test_conn();
        db::add_question("Cryptography", "What is a hash?", Some("One-way"), "free", None, &source)
            .unwrap();
        db::add_question("Threats", "What is a worm?", None, "MCQ", None, &source).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_roundtrip.json");

        export_json_to_path(&test_file, &source).unwrap();

        let target = test_conn();
        let added = import_json(&test_file, today(), &target).unwrap();
        assert_eq!(added, 2);

        let original: HashSet<QuestionRecord> =
            export_question_bank(&source).unwrap().into_iter().collect();
        let imported: HashSet<QuestionRecord> =
            export_question_bank(&target).unwrap().into_iter().collect();
        assert_eq!(original, imported);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let conn = test_conn();
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("missing").join("export.json");

        let result = export_json_to_path(&test_file, &conn);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_nonexistent_file() {
        let conn = test_conn();
        let result = import_json(Path::new("nonexistent_file_xyz123.json"), today(), &conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_invalid_json() {
        let conn = test_conn();
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_invalid.json");
        fs::write(&test_file, "{ this is not valid json }").unwrap();

        let result = import_json(&test_file, today(), &conn);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
