//! Thread-shared catalog
//!
//! `Catalog` has no internal synchronization. `SharedCatalog` wraps it in an
//! `Arc<RwLock<_>>`:
//! - writes (insert, generate + insert, import batches) take the write lock
//! - reads take the read lock and return owned snapshots
//! - imports parse the source before the write lock is taken

use crate::catalog::{Book, BookDraft, Catalog};
use crate::error::Result;
use crate::import::{self, ImportReport, ImportSchema};
use parking_lot::RwLock;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Cloneable handle to a catalog shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        SharedCatalog {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn insert(&self, book: Book) -> Result<()> {
        self.inner.write().insert(book)
    }

    /// Generate an id and insert under a single write lock
    pub fn insert_draft(&self, draft: BookDraft) -> Result<u32> {
        self.inner.write().insert_draft(draft)
    }

    pub fn exists(&self, id: u32) -> bool {
        self.inner.read().exists(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copy of every record, in ascending id order
    pub fn snapshot(&self) -> Vec<Book> {
        self.inner.read().iter().cloned().collect()
    }

    /// Copy of every record matching `genre` (ASCII case-insensitive)
    pub fn search_by_genre(&self, genre: &str) -> Vec<Book> {
        self.inner.read().search_by_genre(genre).cloned().collect()
    }

    /// Run `f` with the read lock held
    pub fn with_read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Catalog) -> T,
    {
        f(&self.inner.read())
    }

    /// Import a CSV file; parsing happens outside the lock
    pub fn import_path<P: AsRef<Path>>(
        &self,
        path: P,
        schema: ImportSchema,
    ) -> Result<ImportReport> {
        let path = path.as_ref();
        info!("Importing books from {:?} into shared catalog", path);
        let file = File::open(path)?;
        self.import_reader(file, schema)
    }

    /// Import CSV text; the parsed batch is inserted under one write lock
    pub fn import_reader<R: Read>(
        &self,
        reader: R,
        schema: ImportSchema,
    ) -> Result<ImportReport> {
        let parsed = import::parse_source(reader, schema)?;
        debug!("Applying {} parsed lines under write lock", parsed.lines.len());
        let mut catalog = self.inner.write();
        Ok(import::apply(parsed, &mut catalog))
    }

    /// Take the catalog back if this is the last handle
    pub fn into_inner(self) -> Option<Catalog> {
        Arc::try_unwrap(self.inner).ok().map(|lock| lock.into_inner())
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        SharedCatalog::new(catalog)
    }
}
