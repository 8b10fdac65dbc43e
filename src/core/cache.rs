use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::domain::model::{Book, BookId};
use crate::domain::ports::{BookLookup, Clock};
use crate::utils::error::Result;

pub const DEFAULT_TTL_SECONDS: u64 = 60;

struct CachedBook {
    book: Book,
    expires_at: DateTime<Utc>,
}

/// Read-through cache in front of a [`BookLookup`].
///
/// Entries expire lazily: a stale entry stays in memory until the next
/// resolve of the same id, or until [`BookCache::purge_expired`] runs.
/// Lookup failures are never cached.
pub struct BookCache {
    entries: HashMap<BookId, CachedBook>,
    ttl: Duration,
}

impl BookCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: i64::try_from(ttl_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn resolve<L, C>(&mut self, id: BookId, lookup: &L, clock: &C) -> Result<Book>
    where
        L: BookLookup + ?Sized,
        C: Clock + ?Sized,
    {
        let now = clock.now();

        if let Some(entry) = self.entries.get(&id) {
            if now < entry.expires_at {
                tracing::debug!("Book ID {} retrieved from cache", id);
                return Ok(entry.book.clone());
            }
            tracing::debug!("Cached book ID {} expired at {}", id, entry.expires_at);
        }

        let book = lookup.get_by_id(id).map_err(|e| {
            tracing::error!("Book ID {} could not be loaded: {}", id, e);
            e
        })?;
        tracing::info!("Book ID {} loaded from lookup service", id);

        self.entries.insert(
            id,
            CachedBook {
                book: book.clone(),
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
        Ok(book)
    }

    pub fn invalidate(&mut self, id: BookId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        let purged = before - self.entries.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired cache entries", purged);
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BookCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECONDS)
    }
}
