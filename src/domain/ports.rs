use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::model::{Book, BookId, CompetitorId, Outcome};
use crate::utils::error::Result;

/// Persists fight results for competitors.
pub trait StatsRecorder: Send + Sync {
    fn record_result(&self, competitor_id: CompetitorId, outcome: Outcome) -> Result<()>;
}

pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&self) -> Result<f64>;
    /// Uniform integer in `[low, high]`.
    fn next_in_range(&self, low: usize, high: usize) -> Result<usize>;
}

/// Key-based access to the book store.
pub trait BookLookup: Send + Sync {
    fn get_by_id(&self, id: BookId) -> Result<Book>;
    fn increment_read_count(&self, id: BookId) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait ConfigProvider: Send + Sync {
    fn cache_ttl_seconds(&self) -> u64;
}

impl<T: StatsRecorder + ?Sized> StatsRecorder for Arc<T> {
    fn record_result(&self, competitor_id: CompetitorId, outcome: Outcome) -> Result<()> {
        (**self).record_result(competitor_id, outcome)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Arc<T> {
    fn next_unit(&self) -> Result<f64> {
        (**self).next_unit()
    }

    fn next_in_range(&self, low: usize, high: usize) -> Result<usize> {
        (**self).next_in_range(low, high)
    }
}

impl<T: BookLookup + ?Sized> BookLookup for Arc<T> {
    fn get_by_id(&self, id: BookId) -> Result<Book> {
        (**self).get_by_id(id)
    }

    fn increment_read_count(&self, id: BookId) -> Result<()> {
        (**self).increment_read_count(id)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
