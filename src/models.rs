//! Domain model for a single book record. The struct stays a plain data holder
//! so the catalog, the store and the terminal UI can all pass it around without
//! caring about presentation or persistence details.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One entry in the personal library. Every field falls back to its default
/// when the key is missing from the persisted file, so older or hand-edited
/// files still load.
#[serde(default)]
pub struct Book {
    /// Title shown in listings and matched by remove/search. Not unique.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Author name, searchable as a substring.
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    /// Publication year. Unsigned so the non-negative rule holds by type.
    #[serde(deserialize_with = "null_as_default")]
    pub year: u32,
    /// Free-form genre label.
    #[serde(deserialize_with = "null_as_default")]
    pub genre: String,
    /// Whether the owner has finished the book.
    #[serde(deserialize_with = "null_as_default")]
    pub read: bool,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: u32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// Label used wherever the read flag is shown to the user.
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year) - Genre - Status`, the line format shared by the
    /// full listing and the search results.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}
