use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::toml_config::LogFormat;
use crate::domain::model::BookId;
use crate::utils::error::{BoxshelfError, Result};
use crate::utils::validation::{self, Validate};

#[derive(Debug, Clone, Parser)]
#[command(name = "boxshelf")]
#[command(about = "Boxing ring simulator and reading-list runner")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML config with seed data")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Override the configured log format")]
    pub log_format: Option<LogFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Put two roster boxers in the ring and resolve the bout.
    Fight { first: String, second: String },

    /// Build a reading list from catalog ids and read through it.
    Read {
        #[arg(long, value_delimiter = ',', required = true)]
        books: Vec<BookId>,

        #[arg(long, value_enum, default_value = "all")]
        mode: ReadMode,

        #[arg(long, help = "1-indexed position to start from")]
        start: Option<usize>,

        #[arg(long, help = "Start from a random position", conflicts_with = "start")]
        random_start: bool,
    },

    /// Pick a random book from the catalog.
    RandomBook,

    Leaderboard {
        #[arg(value_enum)]
        board: Board,

        #[arg(long, default_value = "wins", help = "wins or win-pct (boxers only)")]
        sort: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReadMode {
    All,
    Rest,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Board {
    Books,
    Boxers,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Fight { first, second } => {
                validation::validate_non_empty_string("first", first)?;
                validation::validate_non_empty_string("second", second)?;
                if first.trim() == second.trim() {
                    return Err(BoxshelfError::InvalidOperation {
                        message: format!("{} cannot fight themselves", first.trim()),
                    });
                }
            }
            Command::Read { start: Some(start), .. } => {
                validation::validate_positive_number("start", *start as u64, 1)?;
            }
            Command::Leaderboard { sort, .. } => {
                sort.parse::<crate::adapters::roster::LeaderboardSort>()?;
            }
            _ => {}
        }
        Ok(())
    }
}
