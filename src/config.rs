use crate::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the database location.
pub const DB_PATH_ENV: &str = "STUDY_APP_DB";

const APP_DIR: &str = ".security_plus_study_app";
const DB_FILE: &str = "study.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolves the database path: explicit override first, then
    /// `STUDY_APP_DB`, then `~/.security_plus_study_app/study.db`.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let from_env = env::var(DB_PATH_ENV).ok();
        let config = Self::resolve(db_override, from_env, dirs::home_dir())?;
        log::debug!("Using database at '{}'", config.db_path.display());
        Ok(config)
    }

    fn resolve(
        db_override: Option<PathBuf>,
        from_env: Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let db_path = match (db_override, from_env.filter(|v| !v.trim().is_empty())) {
            (Some(path), _) => path,
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => home.ok_or(Error::NoHomeDir)?.join(APP_DIR).join(DB_FILE),
        };
        Ok(Self { db_path })
    }

    /// Creates the directory holding the database file if it is missing.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
