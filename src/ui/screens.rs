use crate::models::Book;

use super::forms::SearchForm;

/// A scrollable list of books: the full library or a set of search matches.
/// Indices shown to the user are 1-based within this list.
pub(crate) struct ListingScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl ListingScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        Self { books, selected: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let len = self.books.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }
}

/// Search inputs together with the outcome of the last submitted query.
/// `results` stays `None` until the first search runs.
#[derive(Default)]
pub(crate) struct SearchScreen {
    pub(crate) form: SearchForm,
    pub(crate) results: Option<ListingScreen>,
}
