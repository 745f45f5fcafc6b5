//! Quiz session over a random sample of questions.
//! Every answered question is recorded as an attempt.

use super::Question;
use crate::database::db;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use rusqlite::Connection;

/// Result of comparing a typed answer with the stored one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerCheck {
    Correct,
    Incorrect,
    /// No stored answer or nothing typed: the user has to grade themselves.
    NeedsSelfGrade,
}

/// Exact, case-insensitive comparison. Surrounding whitespace of the typed
/// answer is ignored.
pub fn check_answer(expected: Option<&str>, given: &str) -> AnswerCheck {
    let given = given.trim();
    match expected {
        Some(expected) if !expected.is_empty() && !given.is_empty() => {
            if given.to_lowercase() == expected.to_lowercase() {
                AnswerCheck::Correct
            } else {
                AnswerCheck::Incorrect
            }
        }
        _ => AnswerCheck::NeedsSelfGrade,
    }
}

pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
}

impl QuizSession {
    /// Picks `count` random questions (at least one, at most all of them).
    pub fn start<R: Rng + ?Sized>(
        mut questions: Vec<Question>,
        count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::NoQuestions);
        }

        questions.shuffle(rng);
        questions.truncate(count.max(1));

        Ok(Self {
            questions,
            current_index: 0,
            score: 0,
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Checks a typed answer against the current question.
    pub fn check_current(&self, given: &str) -> AnswerCheck {
        match self.current_question() {
            Some(q) => check_answer(q.answer.as_deref(), given),
            None => AnswerCheck::NeedsSelfGrade,
        }
    }

    /// Records the attempt for the current question and moves on.
    pub fn answer_current(
        &mut self,
        correct: bool,
        now: DateTime<Utc>,
        conn: &Connection,
    ) -> Result<()> {
        let question_id = self
            .current_question()
            .map(|q| q.id)
            .ok_or(Error::NoQuestions)?;

        db::record_attempt(question_id, correct, now, conn)?;
        if correct {
            self.score += 1;
        }
        self.current_index += 1;
        Ok(())
    }

    /// 1-based position of the current question.
    pub fn position(&self) -> usize {
        self.current_index + 1
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn summary(&self) -> String {
        format!("Quiz finished. Score: {}/{}", self.score, self.total_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn seed_questions(n: usize, conn: &Connection) -> Vec<Question> {
        for i in 0..n {
            db::add_question(
                "General",
                &format!("Question {}", i),
                Some(&format!("Answer {}", i)),
                "free",
                None,
                conn,
            )
            .unwrap();
        }
        db::get_questions(None, None, conn).unwrap()
    }

    #[test]
    fn test_check_answer() {
        assert_eq!(check_answer(Some("TCP"), "  tcp "), AnswerCheck::Correct);
        assert_eq!(check_answer(Some("Transport Layer Security"), "TLS"), AnswerCheck::Incorrect);
        assert_eq!(check_answer(Some("TCP"), "   "), AnswerCheck::NeedsSelfGrade);
        assert_eq!(check_answer(Some(""), "TCP"), AnswerCheck::NeedsSelfGrade);
        assert_eq!(check_answer(None, "TCP"), AnswerCheck::NeedsSelfGrade);
    }

    #[test]
    fn test_start_samples_without_duplicates() {
        let conn = test_conn();
        let questions = seed_questions(10, &conn);
        let mut rng = StdRng::seed_from_u64(7);

        let session = QuizSession::start(questions, 4, &mut rng).unwrap();

        assert_eq!(session.total_count(), 4);
        let ids: HashSet<i64> = session.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_start_caps_count_at_available_questions() {
        let conn = test_conn();
        let questions = seed_questions(3, &conn);
        let mut rng = StdRng::seed_from_u64(1);

        let session = QuizSession::start(questions, 20, &mut rng).unwrap();
        assert_eq!(session.total_count(), 3);
    }

    #[test]
    fn test_start_without_questions() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = QuizSession::start(Vec::new(), 5, &mut rng);
        assert!(matches!(result, Err(Error::NoQuestions)));
    }

    #[test]
    fn test_quiz_flow_records_attempts_and_score() {
        let conn = test_conn();
        let questions = seed_questions(2, &conn);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::start(questions, 2, &mut rng).unwrap();

        let first = session.current_question().unwrap().clone();
        let typed = first.answer.clone().unwrap().to_uppercase();
        assert_eq!(session.check_current(&typed), AnswerCheck::Correct);
        session.answer_current(true, now(), &conn).unwrap();

        assert_eq!(session.position(), 2);
        assert_eq!(session.check_current("wrong"), AnswerCheck::Incorrect);
        session.answer_current(false, now(), &conn).unwrap();

        assert!(session.is_completed());
        assert_eq!(session.score(), 1);
        assert_eq!(session.summary(), "Quiz finished. Score: 1/2");
        assert!(session.answer_current(true, now(), &conn).is_err());

        let stats = db::stats_per_domain(&conn).unwrap();
        assert_eq!(stats[0].attempts, 2);
        assert_eq!(stats[0].correct, 1);
        assert_eq!(db::get_attempts_for_question(first.id, &conn).unwrap().len(), 1);
    }
}
