//! Command implementations behind the `study` binary.
//! Owns the single database connection and the date treated as "today".

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::Path;
use study_app::database::db;
use study_app::export::{csv, json};
use study_app::models::quiz_session::AnswerCheck;
use study_app::models::sm2::MAX_QUALITY;
use study_app::{Config, QuizSession, ReviewSession};

/// Grade buttons of the review screen.
const GRADES: [(&str, u8); 4] = [("again", 0), ("hard", 3), ("good", 4), ("easy", 5)];

pub struct App {
    conn: Connection,
    today: NaiveDate,
}

impl App {
    pub fn open(config: &Config, today: NaiveDate) -> anyhow::Result<Self> {
        config.ensure_data_dir()?;
        let conn = db::init_database(config.db_path()).with_context(|| {
            format!("Failed to open database '{}'", config.db_path().display())
        })?;
        Ok(Self { conn, today })
    }

    pub fn init(&self, config: &Config) {
        println!("Database ready at {}", config.db_path().display());
    }

    pub fn add(
        &self,
        domain: &str,
        question: &str,
        answer: Option<&str>,
        qtype: &str,
    ) -> anyhow::Result<()> {
        if question.trim().is_empty() {
            bail!("Question text must not be empty");
        }
        let id = db::add_question(domain, question, answer, qtype, None, &self.conn)?;
        db::ensure_flashcard_for(id, self.today, &self.conn)?;
        println!("Added question {}", id);
        Ok(())
    }

    pub fn import(&self, path: &Path) -> anyhow::Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let added = match extension.as_deref() {
            Some("csv") => csv::import_csv(path, self.today, &self.conn),
            Some("json") => json::import_json(path, self.today, &self.conn),
            _ => bail!("Unsupported file type '{}' (expected .csv or .json)", path.display()),
        }
        .with_context(|| format!("Failed to import '{}'", path.display()))?;

        println!("Imported {} questions", added);
        Ok(())
    }

    pub fn export(&self, path: &Path) -> anyhow::Result<()> {
        let exported = json::export_json_to_path(path, &self.conn)
            .with_context(|| format!("Failed to export to '{}'", path.display()))?;
        println!("Exported {} questions to {}", exported, path.display());
        Ok(())
    }

    pub fn list(&self, domain: Option<&str>, limit: Option<usize>) -> anyhow::Result<()> {
        for q in db::get_questions(domain, limit, &self.conn)? {
            println!("{}: [{}] {}", q.id, q.domain, q.preview(80));
        }
        Ok(())
    }

    pub fn show(&self, id: i64) -> anyhow::Result<()> {
        let Some(q) = db::get_question(id, &self.conn)? else {
            bail!("Question {} not found", id);
        };

        println!("[{}] ({})", q.domain, q.qtype);
        println!("Q: {}", q.question);
        println!("A: {}", q.answer_text());
        if let Some(metadata) = &q.metadata {
            println!("Metadata: {}", metadata);
        }
        match db::get_flashcard(id, &self.conn)? {
            Some(card) => println!(
                "Next review {}{} (interval {} days, ease {:.2})",
                card.next_review,
                if card.is_due(self.today) { ", due now" } else { "" },
                card.interval,
                card.ease
            ),
            None => println!("No flashcard"),
        }
        let attempts = db::get_attempts_for_question(id, &self.conn)?;
        let correct = attempts.iter().filter(|a| a.correct).count();
        println!("Attempts: {} ({} correct)", attempts.len(), correct);
        Ok(())
    }

    pub fn domains(&self) -> anyhow::Result<()> {
        for domain in db::list_domains(&self.conn)? {
            println!("{}", domain);
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> anyhow::Result<()> {
        if !db::delete_question(id, &self.conn)? {
            bail!("Question {} not found", id);
        }
        println!("Question removed");
        Ok(())
    }

    pub fn due(&self) -> anyhow::Result<()> {
        let due = db::get_due_flashcards(self.today, &self.conn)?;
        if due.is_empty() {
            println!("No flashcards due");
        }
        for card in due {
            println!(
                "{}: [{}] {} (due {})",
                card.question.id,
                card.question.domain,
                card.question.preview(120),
                card.flashcard.next_review
            );
        }
        Ok(())
    }

    pub fn grade(&self, id: i64, quality: u8) -> anyhow::Result<()> {
        let outcome = study_app::grade_card(id, quality, self.today, Utc::now(), &self.conn)?;
        println!(
            "Next review {} (interval {} days, ease {:.2})",
            outcome.schedule.next_review, outcome.schedule.interval, outcome.schedule.ease
        );
        Ok(())
    }

    /// Interactive review of the due cards.
    pub fn review(&self, input: &mut impl BufRead) -> anyhow::Result<()> {
        let mut session = ReviewSession::new_from_due_cards(self.today, &self.conn)?;
        if session.is_completed() {
            println!("No flashcards due");
            return Ok(());
        }

        while let Some(question) = session.current_card().cloned() {
            println!();
            println!("({} left) [{}] {}", session.remaining_count(), question.domain, question.question);

            let Some(line) = prompt(input, "Enter to show the answer, s to skip, q to quit: ")? else {
                break;
            };
            match line.as_str() {
                "q" => break,
                "s" => {
                    session.skip();
                    continue;
                }
                _ => {}
            }

            let answer = question.answer_text();
            println!("A: {}", if answer.is_empty() { "<no answer provided>" } else { answer });

            let quality = loop {
                let Some(line) = prompt(input, "Grade (again/hard/good/easy or 0-5): ")? else {
                    return Ok(());
                };
                match parse_grade(&line) {
                    Some(quality) => break quality,
                    None => println!("Unknown grade '{}'", line),
                }
            };

            let outcome = session.grade_current_card(quality, Utc::now(), &self.conn)?;
            println!("Next review {}", outcome.schedule.next_review);
        }

        println!("Reviewed {} of {} cards", session.reviewed_count(), session.total_count());
        Ok(())
    }

    /// Interactive quiz over a random sample of questions.
    pub fn quiz(
        &self,
        domain: Option<&str>,
        count: usize,
        input: &mut impl BufRead,
    ) -> anyhow::Result<()> {
        let questions = db::get_questions(domain, None, &self.conn)?;
        let mut session = QuizSession::start(questions, count, &mut rand::rng())
            .context("No questions in chosen domain")?;

        while let Some(question) = session.current_question().cloned() {
            println!();
            println!("Q{}: {}", session.position(), question.question);
            let Some(answer) = prompt(input, "Answer: ")? else {
                // Cancelled
                return Ok(());
            };

            let correct = match session.check_current(&answer) {
                AnswerCheck::Correct => true,
                AnswerCheck::Incorrect => {
                    println!("Expected: {}", question.answer_text());
                    false
                }
                AnswerCheck::NeedsSelfGrade => {
                    if !question.answer_text().is_empty() {
                        println!("Expected: {}", question.answer_text());
                    }
                    match prompt(input, "Did you answer correctly? [y/n]: ")? {
                        Some(reply) => reply.eq_ignore_ascii_case("y"),
                        None => return Ok(()),
                    }
                }
            };
            println!("{}", if correct { "Correct" } else { "Incorrect" });
            session.answer_current(correct, Utc::now(), &self.conn)?;
        }

        println!("{}", session.summary());
        Ok(())
    }

    pub fn stats(&self) -> anyhow::Result<()> {
        println!("{:<32} {:>8} {:>10}", "Domain", "Attempts", "% Correct");
        for s in db::stats_per_domain(&self.conn)? {
            println!("{:<32} {:>8} {:>9.1}%", s.domain, s.attempts, s.pct);
        }
        Ok(())
    }

    pub fn reset(&self, confirmed: bool) -> anyhow::Result<()> {
        if !confirmed {
            bail!("This deletes ALL questions, flashcards and attempts. Re-run with --yes to confirm");
        }
        db::reset_database(&self.conn)?;
        println!("Database reset");
        Ok(())
    }
}

/// Prints a prompt and reads one trimmed line. Returns None at end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Accepts a grade name or a number from 0 to 5.
fn parse_grade(input: &str) -> Option<u8> {
    let input = input.trim().to_ascii_lowercase();
    GRADES
        .iter()
        .find(|(name, _)| *name == input)
        .map(|(_, quality)| *quality)
        .or_else(|| input.parse::<u8>().ok().filter(|q| *q <= MAX_QUALITY))
}
