//! # Bookshelf - In-Memory Book Catalog
//!
//! `bookshelf` keeps book records in a binary search tree keyed by a unique id:
//!
//! - **Keyed insert** with duplicate-id rejection (first write wins)
//! - **Id generation** from a seedable generator owned by the catalog
//! - **Genre search**, case-insensitive, over a full scan
//! - **CSV import** that skips and reports bad lines instead of failing
//! - **Shared access** through a read/write-locked handle
//!
//! ## Quick Start
//!
//! ```rust
//! use bookshelf::{Book, BookDraft, Catalog, ImportSchema, Result};
//!
//! # fn main() -> Result<()> {
//! let mut catalog = Catalog::new();
//!
//! // Insert with a known id
//! catalog.insert(Book::from_draft(
//!     1,
//!     BookDraft::new("Dune", "Frank Herbert", "SciFi", "Ace", 1965, 412),
//! ))?;
//!
//! // Insert with a generated id
//! let id = catalog.insert_draft(BookDraft::new(
//!     "Emma", "Jane Austen", "Romance", "Penguin", 1815, 474,
//! ))?;
//! assert!(catalog.exists(id));
//!
//! // Import CSV lines; the malformed one is skipped
//! let csv = "2,Neuromancer,William Gibson,scifi,Ace,1984,271\n3,broken\n";
//! let report =
//!     bookshelf::import::load_reader(csv.as_bytes(), &mut catalog, ImportSchema::WithId)?;
//! assert_eq!(report.imported, 1);
//! assert_eq!(report.skipped_count(), 1);
//!
//! // Genre search ignores case
//! assert_eq!(catalog.search_by_genre("SCIFI").count(), 2);
//!
//! // Release everything
//! assert_eq!(catalog.destroy(), 3);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod import;
pub mod shared;
pub mod shell;

pub use crate::catalog::{Book, BookDraft, BookTree, Catalog, IdGenerator, MAX_FIELD_LEN};
pub use crate::config::BookshelfConfig;
pub use crate::error::{CatalogError, Result};
pub use crate::import::{bulk_load, ImportReport, ImportSchema, SkipKind, SkippedLine};
pub use crate::shared::SharedCatalog;
pub use crate::shell::Shell;
