use crate::core::cache::{BookCache, DEFAULT_TTL_SECONDS};
use crate::domain::model::{Book, BookId};
use crate::domain::ports::{BookLookup, Clock, ConfigProvider, RandomSource};
use crate::utils::error::{BoxshelfError, Result};

/// Ordered, duplicate-free list of book ids with a circular 1-indexed cursor.
///
/// Books are resolved through a [`BookCache`]; the list itself only stores
/// ids. While the list is non-empty the cursor stays in `1..=len`.
pub struct ReadingList<L: BookLookup, R: RandomSource, C: Clock> {
    entries: Vec<BookId>,
    current_position: usize,
    cache: BookCache,
    lookup: L,
    random: R,
    clock: C,
}

impl<L: BookLookup, R: RandomSource, C: Clock> ReadingList<L, R, C> {
    pub fn new(lookup: L, random: R, clock: C) -> Self {
        Self::with_ttl(lookup, random, clock, DEFAULT_TTL_SECONDS)
    }

    pub fn with_ttl(lookup: L, random: R, clock: C, ttl_seconds: u64) -> Self {
        Self {
            entries: Vec::new(),
            current_position: 1,
            cache: BookCache::new(ttl_seconds),
            lookup,
            random,
            clock,
        }
    }

    pub fn from_config<P: ConfigProvider>(lookup: L, random: R, clock: C, config: &P) -> Self {
        Self::with_ttl(lookup, random, clock, config.cache_ttl_seconds())
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn cache(&self) -> &BookCache {
        &self.cache
    }

    pub fn current_position(&self) -> usize {
        self.current_position
    }

    pub fn book_ids(&self) -> &[BookId] {
        &self.entries
    }

    ////////////////////////////////////////////////////
    // Membership
    ////////////////////////////////////////////////////

    pub fn add(&mut self, book_id: BookId) -> Result<()> {
        tracing::info!("Received request to add book with ID {} to the reading list", book_id);

        self.validate_book_id(book_id, false)?;

        if self.entries.contains(&book_id) {
            tracing::error!("Book with ID {} already exists in the reading list", book_id);
            return Err(BoxshelfError::DuplicateEntry {
                entity: "Reading list book",
                key: book_id.to_string(),
            });
        }

        let book = self.resolve(book_id)?;
        self.entries.push(book.id);
        tracing::info!("Successfully added to reading list: {}", book);
        Ok(())
    }

    /// The id must still resolve downstream. Once a deleted book's cache
    /// entry expires it can only be dropped with `remove_by_position` or `clear`.
    pub fn remove_by_id(&mut self, book_id: BookId) -> Result<()> {
        tracing::info!("Received request to remove book with ID {}", book_id);

        self.check_if_empty()?;
        self.validate_book_id(book_id, true)?;

        let index = self.index_of(book_id)?;
        self.remove_at(index);
        tracing::info!("Successfully removed book with ID {} from the reading list", book_id);
        Ok(())
    }

    pub fn remove_by_position(&mut self, position: usize) -> Result<()> {
        tracing::info!("Received request to remove book at position {}", position);

        self.check_if_empty()?;
        self.validate_position(position)?;

        self.remove_at(position - 1);
        tracing::info!("Successfully removed book at position {}", position);
        Ok(())
    }

    pub fn clear(&mut self) {
        tracing::info!("Received request to clear the reading list");

        if self.entries.is_empty() {
            tracing::warn!("Clearing an empty reading list");
        }

        self.entries.clear();
        self.current_position = 1;
        tracing::info!("Successfully cleared the reading list");
    }

    ////////////////////////////////////////////////////
    // Retrieval
    ////////////////////////////////////////////////////

    pub fn get_all(&mut self) -> Result<Vec<Book>> {
        self.check_if_empty()?;
        tracing::info!("Retrieving all books in the reading list");

        let ids = self.entries.clone();
        ids.into_iter().map(|id| self.resolve(id)).collect()
    }

    pub fn get_by_id(&mut self, book_id: BookId) -> Result<Book> {
        self.check_if_empty()?;
        self.validate_book_id(book_id, true)?;

        tracing::info!("Retrieving book with ID {} from the reading list", book_id);
        let book = self.resolve(book_id)?;
        tracing::info!("Successfully retrieved book: {}", book);
        Ok(book)
    }

    pub fn get_by_position(&mut self, position: usize) -> Result<Book> {
        self.check_if_empty()?;
        self.validate_position(position)?;

        tracing::info!("Retrieving book at position {} from the reading list", position);
        let book = self.resolve(self.entries[position - 1])?;
        tracing::info!("Successfully retrieved book: {}", book);
        Ok(book)
    }

    pub fn get_current(&mut self) -> Result<Book> {
        self.check_if_empty()?;
        tracing::info!("Retrieving the current book");
        self.get_by_position(self.current_position)
    }

    pub fn length(&self) -> usize {
        let length = self.entries.len();
        tracing::info!("Reading list length: {} books", length);
        length
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of page counts across the list. Zero for an empty list.
    pub fn total_pages(&mut self) -> Result<u64> {
        let ids = self.entries.clone();
        let mut total = 0u64;
        for id in ids {
            total += u64::from(self.resolve(id)?.length);
        }
        tracing::info!("Total reading list length: {} pages", total);
        Ok(total)
    }

    ////////////////////////////////////////////////////
    // Cursor and reordering
    ////////////////////////////////////////////////////

    pub fn go_to_position(&mut self, position: usize) -> Result<()> {
        self.check_if_empty()?;
        self.validate_position(position)?;

        tracing::info!("Setting current position to {}", position);
        self.current_position = position;
        Ok(())
    }

    pub fn go_to_random_position(&mut self) -> Result<()> {
        self.check_if_empty()?;

        let position = self.random.next_in_range(1, self.entries.len())?;
        self.validate_position(position)?;

        tracing::info!("Setting current position to random position {}", position);
        self.current_position = position;
        Ok(())
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.check_if_empty()?;
        self.current_position = 1;
        tracing::info!("Rewound reading list to the first position");
        Ok(())
    }

    pub fn move_to_start(&mut self, book_id: BookId) -> Result<()> {
        tracing::info!("Moving book with ID {} to the start of the reading list", book_id);
        self.check_if_empty()?;
        self.validate_book_id(book_id, true)?;

        let index = self.index_of(book_id)?;
        self.entries.remove(index);
        self.entries.insert(0, book_id);

        tracing::info!("Successfully moved book with ID {} to the start", book_id);
        Ok(())
    }

    pub fn move_to_end(&mut self, book_id: BookId) -> Result<()> {
        tracing::info!("Moving book with ID {} to the end of the reading list", book_id);
        self.check_if_empty()?;
        self.validate_book_id(book_id, true)?;

        let index = self.index_of(book_id)?;
        self.entries.remove(index);
        self.entries.push(book_id);

        tracing::info!("Successfully moved book with ID {} to the end", book_id);
        Ok(())
    }

    pub fn move_to_position(&mut self, book_id: BookId, position: usize) -> Result<()> {
        tracing::info!("Moving book with ID {} to position {}", book_id, position);
        self.check_if_empty()?;
        self.validate_book_id(book_id, true)?;
        self.validate_position(position)?;

        let index = self.index_of(book_id)?;
        self.entries.remove(index);
        self.entries.insert(position - 1, book_id);

        tracing::info!("Successfully moved book with ID {} to position {}", book_id, position);
        Ok(())
    }

    pub fn swap(&mut self, first_id: BookId, second_id: BookId) -> Result<()> {
        tracing::info!("Swapping books with IDs {} and {}", first_id, second_id);
        self.check_if_empty()?;
        self.validate_book_id(first_id, true)?;
        self.validate_book_id(second_id, true)?;

        if first_id == second_id {
            tracing::error!("Cannot swap a book with itself: {}", first_id);
            return Err(BoxshelfError::InvalidOperation {
                message: format!("Cannot swap a book with itself: {}", first_id),
            });
        }

        let first = self.index_of(first_id)?;
        let second = self.index_of(second_id)?;
        self.entries.swap(first, second);

        tracing::info!("Successfully swapped books with IDs {} and {}", first_id, second_id);
        Ok(())
    }

    ////////////////////////////////////////////////////
    // Reading
    ////////////////////////////////////////////////////

    /// Reads the book under the cursor, then steps the cursor forward,
    /// wrapping to 1 after the last position.
    ///
    /// The returned snapshot comes from the cache and does not reflect the
    /// increment that was just requested.
    pub fn read_current(&mut self) -> Result<Book> {
        self.check_if_empty()?;
        let book = self.get_by_position(self.current_position)?;

        tracing::info!(
            "Reading book: {} (ID: {}) at position {}",
            book.title,
            book.id,
            self.current_position
        );
        self.lookup.increment_read_count(book.id)?;
        tracing::info!("Updated read count for book: {} (ID: {})", book.title, book.id);

        self.current_position = (self.current_position % self.entries.len()) + 1;
        tracing::info!("Advanced to position {}", self.current_position);
        Ok(book)
    }

    pub fn read_all(&mut self) -> Result<Vec<Book>> {
        self.check_if_empty()?;
        tracing::info!("Starting to read the entire reading list");

        self.resolve_from(1)?;
        self.current_position = 1;
        let books = (0..self.entries.len())
            .map(|_| self.read_current())
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Finished reading the entire reading list");
        Ok(books)
    }

    pub fn read_remainder(&mut self) -> Result<Vec<Book>> {
        self.check_if_empty()?;
        tracing::info!("Reading the rest of the reading list from position {}", self.current_position);

        self.resolve_from(self.current_position)?;
        let remaining = self.entries.len() - self.current_position + 1;
        let books = (0..remaining)
            .map(|_| self.read_current())
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Finished reading the rest of the reading list");
        Ok(books)
    }

    ////////////////////////////////////////////////////
    // Shared checks
    ////////////////////////////////////////////////////

    fn resolve(&mut self, book_id: BookId) -> Result<Book> {
        self.cache.resolve(book_id, &self.lookup, &self.clock)
    }

    /// Resolves every entry from `position` to the end, so a missing book
    /// fails a batch read before the cursor moves or any read count changes.
    fn resolve_from(&mut self, position: usize) -> Result<()> {
        let ids = self.entries[position - 1..].to_vec();
        for id in ids {
            self.resolve(id)?;
        }
        Ok(())
    }

    fn check_if_empty(&self) -> Result<()> {
        if self.entries.is_empty() {
            tracing::error!("Reading list is empty");
            return Err(BoxshelfError::EmptyCollection {
                collection: "Reading list",
            });
        }
        Ok(())
    }

    /// Confirms the id is on the list (when asked) and still resolvable.
    fn validate_book_id(&mut self, book_id: BookId, require_member: bool) -> Result<()> {
        if require_member && !self.entries.contains(&book_id) {
            tracing::error!("Book with ID {} not found in reading list", book_id);
            return Err(BoxshelfError::not_found("Reading list book", book_id));
        }

        self.resolve(book_id).map(|_| ())
    }

    fn validate_position(&self, position: usize) -> Result<()> {
        let length = self.entries.len();
        if position < 1 || position > length {
            tracing::error!("Invalid position: {}", position);
            return Err(BoxshelfError::OutOfRange { position, length });
        }
        Ok(())
    }

    fn index_of(&self, book_id: BookId) -> Result<usize> {
        self.entries
            .iter()
            .position(|&id| id == book_id)
            .ok_or_else(|| BoxshelfError::not_found("Reading list book", book_id))
    }

    /// Removes by index and keeps the cursor on the same book when an earlier
    /// entry goes. Removing the book under the cursor leaves it on the next
    /// one, wrapping to 1 past the end.
    fn remove_at(&mut self, index: usize) {
        self.entries.remove(index);

        if self.entries.is_empty() {
            self.current_position = 1;
        } else if index + 1 < self.current_position {
            self.current_position -= 1;
        } else if self.current_position > self.entries.len() {
            self.current_position = 1;
        }
    }
}
