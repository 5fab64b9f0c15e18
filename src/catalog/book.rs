//! Book records stored in the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Maximum length (in characters) of the title, author, genre and publisher fields
pub const MAX_FIELD_LEN: usize = 50;

/// A book entry keyed by `id`
///
/// The id is the only ordering and uniqueness key in the catalog. Text fields
/// must hold between 1 and [`MAX_FIELD_LEN`] characters; over-long values are
/// rejected rather than truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    /// Unique identifier
    pub id: u32,

    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1, max = 50))]
    pub author: String,

    #[validate(length(min = 1, max = 50))]
    pub genre: String,

    #[validate(length(min = 1, max = 50))]
    pub publisher: String,

    /// Publication year
    pub year: u32,

    /// Page count
    pub pages: u32,
}

impl Book {
    /// Attach an id to a draft
    pub fn from_draft(id: u32, draft: BookDraft) -> Self {
        Book {
            id,
            title: draft.title,
            author: draft.author,
            genre: draft.genre,
            publisher: draft.publisher,
            year: draft.year,
            pages: draft.pages,
        }
    }

    /// Case-insensitive (ASCII) genre comparison
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.eq_ignore_ascii_case(genre)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} by {} ({}, {}, {}) - {} pages",
            self.id, self.title, self.author, self.genre, self.publisher, self.year, self.pages
        )
    }
}

/// Book attributes before an id has been assigned
///
/// Used for manual entry and for imports where ids are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookDraft {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1, max = 50))]
    pub author: String,

    #[validate(length(min = 1, max = 50))]
    pub genre: String,

    #[validate(length(min = 1, max = 50))]
    pub publisher: String,

    pub year: u32,

    pub pages: u32,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        publisher: impl Into<String>,
        year: u32,
        pages: u32,
    ) -> Self {
        BookDraft {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            publisher: publisher.into(),
            year,
            pages,
        }
    }
}
