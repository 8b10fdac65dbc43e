pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use crate::core::{cache::BookCache, reading_list::ReadingList, ring::Ring};
pub use utils::error::{BoxshelfError, Result};
