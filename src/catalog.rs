//! The session catalog: the ordered, in-memory book list every menu operation
//! reads or mutates. It is built once at startup and handed to the dispatcher
//! by reference; nothing touches the store except `open` and `save`.

use std::fmt;

use tracing::{debug, warn};

use crate::models::Book;
use crate::store::{Store, StoreError};

/// Which field a search matches against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Title,
    Author,
}

impl SearchField {
    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Title,
        }
    }

    fn value<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }
}

/// Summary numbers for the statistics view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub read: usize,
}

impl Stats {
    /// Share of read books in percent. An empty library reports 0.
    pub fn percentage_read(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.read as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total books: {}\nPercentage read: {:.1}%",
            self.total,
            self.percentage_read()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
    unsaved: bool,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            unsaved: false,
        }
    }

    /// Load the catalog from the store. Malformed files are not fatal: the
    /// session starts empty and the error is handed back so the UI can show it.
    pub fn open(store: &Store) -> Result<(Self, Option<StoreError>), StoreError> {
        match store.load() {
            Ok(books) => Ok((Self::new(books), None)),
            Err(err @ StoreError::Malformed { .. }) => {
                warn!(error = %err, "starting with an empty library");
                Ok((Self::default(), Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// True once the catalog has diverged from what was last loaded or saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Append a book. No duplicate check.
    pub fn add(&mut self, book: Book) {
        debug!(title = %book.title, "adding book");
        self.books.push(book);
        self.unsaved = true;
    }

    /// Remove the first book whose title equals `title`, ignoring case.
    pub fn remove_by_title(&mut self, title: &str) -> Option<Book> {
        let needle = title.to_lowercase();
        let index = self
            .books
            .iter()
            .position(|book| book.title.to_lowercase() == needle)?;
        self.unsaved = true;
        Some(self.books.remove(index))
    }

    /// Case-insensitive substring search, results in catalog order. An empty
    /// query matches every book.
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| field.value(book).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total: self.books.len(),
            read: self.books.iter().filter(|book| book.read).count(),
        }
    }

    /// Flush the full catalog to the store, replacing the file.
    pub fn save(&mut self, store: &Store) -> Result<(), StoreError> {
        store.save(&self.books)?;
        self.unsaved = false;
        Ok(())
    }
}
