pub mod cache;
pub mod reading_list;
pub mod ring;

pub use crate::domain::model::{Book, BookId, Boxer, Competitor, CompetitorId, Outcome, WeightClass};
pub use crate::domain::ports::{BookLookup, Clock, ConfigProvider, RandomSource, StatsRecorder};
pub use crate::utils::error::Result;
