//! Book catalog
//!
//! The catalog maps book ids to records. Storage is a binary search tree keyed
//! by id; ids for records entered without one come from an [`IdGenerator`]
//! owned by the catalog.

pub mod book;
pub mod id;
pub mod tree;

pub use book::{Book, BookDraft, MAX_FIELD_LEN};
pub use id::IdGenerator;
pub use tree::{BookTree, Iter};

use crate::config::BookshelfConfig;
use crate::error::{CatalogError, Result};
use tracing::{debug, info, warn};
use validator::Validate;

/// Generation attempts after which a warning is logged
const SLOW_GENERATION_ATTEMPTS: u64 = 1_000;

/// Catalog of books keyed by unique id
///
/// Provides:
/// - Insert with duplicate-key rejection
/// - Unique id generation
/// - Membership test
/// - Case-insensitive genre search
/// - Enumeration in ascending id order
/// - Teardown via [`Catalog::destroy`]
///
/// Not synchronized; wrap it in a [`crate::SharedCatalog`] to share between
/// threads.
#[derive(Debug, Default)]
pub struct Catalog {
    tree: BookTree,
    ids: IdGenerator,
}

impl Catalog {
    /// Create an empty catalog with an entropy-seeded id generator
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Create an empty catalog with the given id generator
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Catalog {
            tree: BookTree::new(),
            ids,
        }
    }

    /// Create an empty catalog configured from `config`
    pub fn from_config(config: &BookshelfConfig) -> Result<Self> {
        let ids = IdGenerator::from_config(&config.ids)?;
        debug!(
            "Creating catalog with id range {:?}, seed {:?}",
            ids.range(),
            ids.seed()
        );
        Ok(Catalog::with_id_generator(ids))
    }

    /// Insert a record
    ///
    /// Fails with `InvalidRecord` if a text field is empty or longer than
    /// [`MAX_FIELD_LEN`] characters, and with `DuplicateKey` if the id is
    /// already stored. Either way the catalog is unchanged.
    pub fn insert(&mut self, book: Book) -> Result<()> {
        book.validate()?;

        let id = book.id;
        match self.tree.insert(book) {
            Ok(()) => {
                debug!("Inserted book {}", id);
                Ok(())
            }
            Err(err) => {
                debug!("Rejected book {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Generate an id and insert the draft under it, returning the id
    pub fn insert_draft(&mut self, draft: BookDraft) -> Result<u32> {
        draft.validate()?;
        let id = self.generate_unique_id()?;
        self.insert(Book::from_draft(id, draft))?;
        Ok(id)
    }

    /// Produce an id not currently stored in the catalog
    ///
    /// Retries candidates from the id generator until one misses. Fails with
    /// `IdSpaceExhausted` when every id in the generator range is taken.
    pub fn generate_unique_id(&mut self) -> Result<u32> {
        let capacity = self.ids.capacity();
        let mut attempts: u64 = 0;
        loop {
            let candidate = self.ids.next_candidate();
            attempts += 1;
            if !self.tree.contains(candidate) {
                if attempts > 1 {
                    debug!("Generated id {} after {} attempts", candidate, attempts);
                }
                return Ok(candidate);
            }

            // Range scan only after a collision, and only once per call
            if attempts == 1 && self.range_is_full(capacity) {
                let range = self.ids.range();
                return Err(CatalogError::IdSpaceExhausted {
                    min: range.start,
                    max: range.end,
                });
            }
            if attempts == SLOW_GENERATION_ATTEMPTS {
                warn!(
                    "Id generation slow: {} collisions with {} of {} ids in use",
                    attempts,
                    self.tree.len(),
                    capacity
                );
            }
        }
    }

    fn range_is_full(&self, capacity: u64) -> bool {
        self.tree.len() as u64 >= capacity
            && self.tree.count_in_range(self.ids.range()) as u64 >= capacity
    }

    pub fn exists(&self, id: u32) -> bool {
        self.tree.contains(id)
    }

    /// Look up a record by id
    pub fn get(&self, id: u32) -> Option<&Book> {
        self.tree.get(id)
    }

    /// Records whose genre equals `genre`, ignoring ASCII case
    ///
    /// Always a full scan; results come in ascending id order.
    pub fn search_by_genre<'a>(&'a self, genre: &'a str) -> impl Iterator<Item = &'a Book> + 'a {
        self.tree.iter().filter(move |book| book.has_genre(genre))
    }

    /// Every record, in ascending id order
    pub fn iter(&self) -> Iter<'_> {
        self.tree.iter()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Mutable access to the id generator (reseeding, tests)
    pub fn id_generator_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Release every record and consume the catalog
    ///
    /// Returns the number of records released.
    pub fn destroy(self) -> usize {
        let released = self.tree.destroy();
        info!("Destroyed catalog, released {} books", released);
        released
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Book;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
