//! Menu entries and the single dispatcher that runs one operation per
//! interaction. The terminal UI gathers inputs into an [`Action`], hands it to
//! [`dispatch`] together with the session catalog, and renders the returned
//! [`Outcome`].

use std::path::PathBuf;

use tracing::info;

use crate::catalog::{Catalog, SearchField, Stats};
use crate::models::Book;
use crate::store::{Store, StoreError};

/// Entries of the sidebar, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    AddBook,
    RemoveBook,
    SearchBooks,
    DisplayAll,
    DisplayStats,
    SaveLibrary,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 6] = [
        MenuEntry::AddBook,
        MenuEntry::RemoveBook,
        MenuEntry::SearchBooks,
        MenuEntry::DisplayAll,
        MenuEntry::DisplayStats,
        MenuEntry::SaveLibrary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuEntry::AddBook => "Add a book",
            MenuEntry::RemoveBook => "Remove a book",
            MenuEntry::SearchBooks => "Search for a book",
            MenuEntry::DisplayAll => "Display all books",
            MenuEntry::DisplayStats => "Display statistics",
            MenuEntry::SaveLibrary => "Save Library",
        }
    }

    /// Header shown above the content pane.
    pub fn heading(&self) -> &'static str {
        match self {
            MenuEntry::AddBook => "Add a Book",
            MenuEntry::RemoveBook => "Remove a Book",
            MenuEntry::SearchBooks => "Search for a Book",
            MenuEntry::DisplayAll => "Your Library",
            MenuEntry::DisplayStats => "Library Statistics",
            MenuEntry::SaveLibrary => "Save Library",
        }
    }
}

/// One user-triggered operation with its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddBook(Book),
    RemoveBook { title: String },
    Search { field: SearchField, query: String },
    DisplayAll,
    DisplayStats,
    Save,
}

/// Result of running an [`Action`]. "Not found" and "no matches" are normal
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added(Book),
    Removed(Book),
    NotFound(String),
    Matches(Vec<Book>),
    NoMatches,
    Listing(Vec<Book>),
    EmptyLibrary,
    Statistics(Stats),
    Saved(PathBuf),
}

impl Outcome {
    /// Short message for the status footer.
    pub fn message(&self) -> String {
        match self {
            Outcome::Added(_) => "Book added successfully!".to_string(),
            Outcome::Removed(_) => "Book removed successfully!".to_string(),
            Outcome::NotFound(_) => "Book not found!".to_string(),
            Outcome::Matches(books) => {
                let plural = if books.len() == 1 { "" } else { "s" };
                format!("Found {} matching book{plural}.", books.len())
            }
            Outcome::NoMatches => "No matching books found!".to_string(),
            Outcome::Listing(books) => {
                let plural = if books.len() == 1 { "" } else { "s" };
                format!("{} book{plural} in the library.", books.len())
            }
            Outcome::EmptyLibrary => "No books in the library!".to_string(),
            Outcome::Statistics(stats) => format!("Total books: {}", stats.total),
            Outcome::Saved(_) => "Library saved to file.".to_string(),
        }
    }

    /// Outcomes the footer renders in the error style.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::NotFound(_))
    }
}

/// Run one action against the session catalog. Only `Save` touches the store,
/// and only a failed save returns an error.
pub fn dispatch(
    catalog: &mut Catalog,
    store: &Store,
    action: Action,
) -> Result<Outcome, StoreError> {
    let outcome = match action {
        Action::AddBook(book) => {
            catalog.add(book.clone());
            info!(title = %book.title, total = catalog.len(), "book added");
            Outcome::Added(book)
        }
        Action::RemoveBook { title } => match catalog.remove_by_title(&title) {
            Some(book) => {
                info!(title = %book.title, total = catalog.len(), "book removed");
                Outcome::Removed(book)
            }
            None => {
                info!(title = %title, "no book to remove");
                Outcome::NotFound(title)
            }
        },
        Action::Search { field, query } => {
            let matches: Vec<Book> = catalog
                .search(field, &query)
                .into_iter()
                .cloned()
                .collect();
            info!(field = field.label(), query = %query, hits = matches.len(), "search");
            if matches.is_empty() {
                Outcome::NoMatches
            } else {
                Outcome::Matches(matches)
            }
        }
        Action::DisplayAll => {
            if catalog.is_empty() {
                Outcome::EmptyLibrary
            } else {
                Outcome::Listing(catalog.books().to_vec())
            }
        }
        Action::DisplayStats => Outcome::Statistics(catalog.stats()),
        Action::Save => {
            catalog.save(store)?;
            Outcome::Saved(store.path().to_path_buf())
        }
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, Catalog) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));
        let catalog = Catalog::new(vec![
            Book::new("The Art of War", "Sun Tzu", 500, "Strategy", true),
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false),
            Book::new("Emma", "Jane Austen", 1815, "Classic", false),
            Book::new("Dune", "Brian Herbert", 1999, "Sci-Fi", false),
        ]);
        (dir, store, catalog)
    }

    #[test]
    fn add_reports_success() {
        let (_dir, store, mut catalog) = setup();
        let book = Book::new("Beloved", "Toni Morrison", 1987, "Fiction", false);

        let outcome = dispatch(&mut catalog, &store, Action::AddBook(book.clone())).unwrap();

        assert_eq!(outcome, Outcome::Added(book.clone()));
        assert_eq!(outcome.message(), "Book added successfully!");
        assert_eq!(catalog.books().last(), Some(&book));
    }

    #[test]
    fn remove_missing_title_is_not_found() {
        let (_dir, store, mut catalog) = setup();

        let outcome = dispatch(
            &mut catalog,
            &store,
            Action::RemoveBook {
                title: "Ulysses".into(),
            },
        )
        .unwrap();

        assert_eq!(outcome, Outcome::NotFound("Ulysses".into()));
        assert!(outcome.is_failure());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn remove_takes_first_duplicate() {
        let (_dir, store, mut catalog) = setup();

        let outcome = dispatch(
            &mut catalog,
            &store,
            Action::RemoveBook {
                title: "dune".into(),
            },
        )
        .unwrap();

        match outcome {
            Outcome::Removed(book) => assert_eq!(book.author, "Frank Herbert"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.books()[2].author, "Brian Herbert");
    }

    #[test]
    fn search_without_hits_is_informational() {
        let (_dir, store, mut catalog) = setup();

        let outcome = dispatch(
            &mut catalog,
            &store,
            Action::Search {
                field: SearchField::Title,
                query: "xyz".into(),
            },
        )
        .unwrap();

        assert_eq!(outcome, Outcome::NoMatches);
        assert!(!outcome.is_failure());
        assert_eq!(outcome.message(), "No matching books found!");
    }

    #[test]
    fn display_all_on_empty_library() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));
        let mut catalog = Catalog::default();

        let outcome = dispatch(&mut catalog, &store, Action::DisplayAll).unwrap();
        assert_eq!(outcome, Outcome::EmptyLibrary);
    }

    #[test]
    fn stats_quarter_read() {
        let (_dir, store, mut catalog) = setup();

        match dispatch(&mut catalog, &store, Action::DisplayStats).unwrap() {
            Outcome::Statistics(stats) => assert_eq!(stats.percentage_read(), 25.0),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn save_writes_the_file() {
        let (_dir, store, mut catalog) = setup();
        catalog.add(Book::default());

        let outcome = dispatch(&mut catalog, &store, Action::Save).unwrap();

        assert_eq!(outcome, Outcome::Saved(store.path().to_path_buf()));
        assert_eq!(outcome.message(), "Library saved to file.");
        assert!(!catalog.has_unsaved_changes());
        assert_eq!(store.load().unwrap().len(), 5);
    }

    #[test]
    fn menu_lists_six_entries_in_order() {
        let labels: Vec<_> = MenuEntry::ALL.iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Add a book",
                "Remove a book",
                "Search for a book",
                "Display all books",
                "Display statistics",
                "Save Library",
            ]
        );
    }
}
