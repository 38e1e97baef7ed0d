use anyhow::{Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::catalog::SearchField;
use crate::models::Book;

/// Internal representation of the "add book" form fields. Everything is kept
/// as raw text until submit so the user can edit freely.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: String::new(),
            genre: String::new(),
            read: "Yes".to_string(),
            active: BookField::Title,
            error: None,
        }
    }
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read",
        }
    }
}

/// Map a Yes/No answer to the read flag. Anything other than "yes" (in any
/// case) counts as unread.
pub(crate) fn parse_read_flag(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

impl BookForm {
    /// Cycle focus forward through the fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Genre,
            BookField::Genre => BookField::Read,
            BookField::Read => BookField::Title,
        };
    }

    /// Cycle focus backward through the fields.
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Read,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
            BookField::Genre => BookField::Year,
            BookField::Read => BookField::Genre,
        };
    }

    /// Flip the read answer between Yes and No.
    pub(crate) fn toggle_read(&mut self) {
        self.read = if parse_read_flag(&self.read) {
            "No".to_string()
        } else {
            "Yes".to_string()
        };
    }

    /// Append a character to the active field. The year only takes digits and
    /// the read field only answers to y/n/space.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Genre => self.genre.push(ch),
            BookField::Year => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.year.push(ch);
            }
            BookField::Read => match ch {
                'y' | 'Y' => self.read = "Yes".to_string(),
                'n' | 'N' => self.read = "No".to_string(),
                ' ' => self.toggle_read(),
                _ => return false,
            },
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre => {
                self.genre.pop();
            }
            BookField::Read => {}
        }
    }

    /// Turn the inputs into a book. Text is taken as typed; an empty year is 0.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        let year_raw = self.year.trim();
        let year = if year_raw.is_empty() {
            0
        } else {
            year_raw
                .parse::<u32>()
                .context("Year must be a non-negative whole number.")?
        };
        Ok(Book {
            title: self.title.clone(),
            author: self.author.clone(),
            year,
            genre: self.genre.clone(),
            read: parse_read_flag(&self.read),
        })
    }

    fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Read => &self.read,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField, focused: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = focused && self.active == field;

        let display = match field {
            BookField::Read => format!("< {value} >"),
            BookField::Year if value.is_empty() => "0".to_string(),
            _ if value.is_empty() => "<empty>".to_string(),
            _ => value.to_string(),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{:<8}", format!("{}:", field.label()))),
            Span::styled(display, style),
        ])
    }

    /// Character count for the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }
}

/// Single text input for the remove flow.
#[derive(Default, Clone)]
pub(crate) struct RemoveForm {
    pub(crate) title: String,
}

impl RemoveForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.title.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.title.pop();
    }
}

/// Search mode plus query text.
#[derive(Default, Clone)]
pub(crate) struct SearchForm {
    pub(crate) field: SearchField,
    pub(crate) query: String,
}

impl SearchForm {
    pub(crate) fn toggle_field(&mut self) {
        self.field = self.field.toggle();
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.query.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }

    /// Prompt shown before the query, e.g. `Enter the title: `.
    pub(crate) fn prompt(&self) -> String {
        format!("Enter the {}: ", self.field.label().to_lowercase())
    }
}

/// Tracks the user's choice when quitting with unsaved changes.
pub(crate) struct ConfirmQuit {
    pub(crate) selection: QuitChoice,
}

impl ConfirmQuit {
    /// Create a confirmation dialog with the initial selection on "Save".
    pub(crate) fn new() -> Self {
        Self {
            selection: QuitChoice::Save,
        }
    }

    /// Move the selection forward (Save → Discard → Cancel).
    pub(crate) fn next(&mut self) {
        self.selection = match self.selection {
            QuitChoice::Save => QuitChoice::Discard,
            QuitChoice::Discard => QuitChoice::Cancel,
            QuitChoice::Cancel => QuitChoice::Save,
        };
    }

    /// Move the selection backward.
    pub(crate) fn previous(&mut self) {
        self.selection = match self.selection {
            QuitChoice::Save => QuitChoice::Cancel,
            QuitChoice::Discard => QuitChoice::Save,
            QuitChoice::Cancel => QuitChoice::Discard,
        };
    }

    pub(crate) fn labels(&self) -> [&'static str; 3] {
        ["Save & Quit", "Discard & Quit", "Cancel"]
    }

    pub(crate) fn selected_index(&self) -> usize {
        match self.selection {
            QuitChoice::Save => 0,
            QuitChoice::Discard => 1,
            QuitChoice::Cancel => 2,
        }
    }
}

/// Options presented in the quit confirmation dialog.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum QuitChoice {
    Save,
    Discard,
    Cancel,
}
