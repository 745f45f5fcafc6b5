mod app;

use app::App;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_app::Config;

#[derive(Parser)]
#[command(name = "study", about = "Question bank, quizzes and spaced repetition flashcards", version)]
struct Cli {
    /// Database file (default: $STUDY_APP_DB or ~/.security_plus_study_app/study.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database if it does not exist
    Init,

    /// Add a single question
    Add {
        /// Question text
        question: String,
        /// Expected answer
        #[arg(long)]
        answer: Option<String>,
        #[arg(long, default_value = "General")]
        domain: String,
        /// Question type tag
        #[arg(long = "type", default_value = "free")]
        qtype: String,
    },

    /// Import questions from a .csv or .json file
    Import { file: PathBuf },

    /// Export the question bank to a JSON file
    Export { file: PathBuf },

    /// List questions
    List {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a question with its flashcard and attempts
    Show { id: i64 },

    /// List domains
    Domains,

    /// Delete a question with its attempts and flashcard
    Delete { id: i64 },

    /// List flashcards due for review
    Due,

    /// Grade one flashcard (0-5)
    Grade { id: i64, quality: u8 },

    /// Review due flashcards interactively
    Review,

    /// Take a quiz over random questions
    Quiz {
        #[arg(long)]
        domain: Option<String>,
        /// Number of questions
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..=200))]
        count: u16,
    },

    /// Accuracy per domain
    Stats,

    /// Delete all questions, flashcards and attempts
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load(cli.db)?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let app = App::open(&config, today)?;

    match cli.command {
        Command::Init => app.init(&config),
        Command::Add {
            question,
            answer,
            domain,
            qtype,
        } => app.add(&domain, &question, answer.as_deref(), &qtype)?,
        Command::Import { file } => app.import(&file)?,
        Command::Export { file } => app.export(&file)?,
        Command::List { domain, limit } => app.list(domain.as_deref(), limit)?,
        Command::Show { id } => app.show(id)?,
        Command::Domains => app.domains()?,
        Command::Delete { id } => app.delete(id)?,
        Command::Due => app.due()?,
        Command::Grade { id, quality } => app.grade(id, quality)?,
        Command::Review => app.review(&mut std::io::stdin().lock())?,
        Command::Quiz { domain, count } => {
            app.quiz(domain.as_deref(), usize::from(count), &mut std::io::stdin().lock())?
        }
        Command::Stats => app.stats()?,
        Command::Reset { yes } => app.reset(yes)?,
    }

    Ok(())
}
