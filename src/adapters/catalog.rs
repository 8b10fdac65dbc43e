use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::model::{Book, BookId};
use crate::domain::ports::{BookLookup, RandomSource};
use crate::utils::error::{BoxshelfError, Result};
use crate::utils::validation::{validate_greater_than, validate_non_empty_string};

#[derive(Default)]
struct CatalogState {
    books: BTreeMap<BookId, Book>,
    next_id: BookId,
}

/// In-memory book store. Ids are assigned sequentially from 1 and never reused.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_book(
        &self,
        author: &str,
        title: &str,
        year: i32,
        genre: &str,
        length: u32,
    ) -> Result<Book> {
        tracing::info!("Received request to create book: {} - {} ({})", author, title, year);

        let author = validate_non_empty_string("author", author)?;
        let title = validate_non_empty_string("title", title)?;
        let genre = validate_non_empty_string("genre", genre)?;
        validate_greater_than("year", year, 1900)?;
        validate_greater_than("length", length, 0)?;

        let mut state = self.write();
        let exists = state
            .books
            .values()
            .any(|b| b.author == author && b.title == title && b.year == year);
        if exists {
            tracing::error!("Book already exists: {} - {} ({})", author, title, year);
            return Err(BoxshelfError::DuplicateEntry {
                entity: "Book",
                key: format!("{} - {} ({})", author, title, year),
            });
        }

        state.next_id += 1;
        let book = Book {
            id: state.next_id,
            author: author.to_string(),
            title: title.to_string(),
            year,
            genre: genre.to_string(),
            length,
            read_count: 0,
        };
        state.books.insert(book.id, book.clone());

        tracing::info!("Book successfully added: {} (ID {})", book, book.id);
        Ok(book)
    }

    pub fn delete_book(&self, id: BookId) -> Result<()> {
        tracing::info!("Received request to delete book with ID {}", id);
        match self.write().books.remove(&id) {
            Some(_) => {
                tracing::info!("Successfully deleted book with ID {}", id);
                Ok(())
            }
            None => {
                tracing::warn!("Attempted to delete non-existent book with ID {}", id);
                Err(BoxshelfError::not_found("Book", id))
            }
        }
    }

    pub fn get_by_compound_key(&self, author: &str, title: &str, year: i32) -> Result<Book> {
        let (author, title) = (author.trim(), title.trim());
        self.read()
            .books
            .values()
            .find(|b| b.author == author && b.title == title && b.year == year)
            .cloned()
            .ok_or_else(|| BoxshelfError::not_found("Book", format!("{} - {} ({})", author, title, year)))
    }

    pub fn all_books(&self, sort_by_read_count: bool) -> Vec<Book> {
        let mut books: Vec<Book> = self.read().books.values().cloned().collect();
        if books.is_empty() {
            tracing::warn!("The book catalog is empty");
        }
        if sort_by_read_count {
            // Stable, so ties keep id order.
            books.sort_by(|a, b| b.read_count.cmp(&a.read_count));
        }
        books
    }

    /// Books ordered by read count, most read first.
    pub fn leaderboard(&self) -> Vec<Book> {
        self.all_books(true)
    }

    pub fn random_book<R: RandomSource + ?Sized>(&self, random: &R) -> Result<Book> {
        let books = self.all_books(false);
        if books.is_empty() {
            return Err(BoxshelfError::EmptyCollection {
                collection: "Book catalog",
            });
        }

        let length = books.len();
        let position = random.next_in_range(1, length)?;
        tracing::info!("Random position selected: {} (total books: {})", position, length);
        books
            .into_iter()
            .nth(position.wrapping_sub(1))
            .ok_or(BoxshelfError::OutOfRange { position, length })
    }

    pub fn clear(&self) {
        let mut state = self.write();
        tracing::info!("Clearing {} books from the catalog", state.books.len());
        state.books.clear();
    }

    pub fn len(&self) -> usize {
        self.read().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().books.is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl BookLookup for InMemoryCatalog {
    fn get_by_id(&self, id: BookId) -> Result<Book> {
        tracing::debug!("Attempting to retrieve book with ID {}", id);
        self.read()
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| BoxshelfError::not_found("Book", id))
    }

    fn increment_read_count(&self, id: BookId) -> Result<()> {
        let mut state = self.write();
        let book = state.books.get_mut(&id).ok_or_else(|| {
            tracing::warn!("Cannot update read count: book with ID {} not found", id);
            BoxshelfError::not_found("Book", id)
        })?;
        book.read_count += 1;
        tracing::info!("Read count incremented for book with ID {}", id);
        Ok(())
    }
}
