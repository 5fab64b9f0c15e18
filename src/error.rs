//! Error types for catalog operations

use thiserror::Error;

/// Catalog operation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A record with this id is already stored; the stored record is unchanged
    #[error("Duplicate key: a book with id {0} is already in the catalog")]
    DuplicateKey(u32),

    /// Import source could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An import line did not match the expected schema
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: u64, reason: String },

    /// A record failed field validation (empty or over-long text fields)
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] validator::ValidationErrors),

    /// Every id in the generator range is already taken
    #[error("Id space exhausted: all ids in [{min}, {max}) are in use")]
    IdSpaceExhausted { min: u32, max: u32 },

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are inconsistent
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    /// True for errors a bulk import records and moves past
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateKey(_)
                | CatalogError::MalformedLine { .. }
                | CatalogError::InvalidRecord(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(CatalogError::DuplicateKey(7).is_recoverable());
        assert!(CatalogError::MalformedLine {
            line: 3,
            reason: "expected 7 fields, found 4".to_string()
        }
        .is_recoverable());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!CatalogError::from(io).is_recoverable());
        assert!(!CatalogError::IdSpaceExhausted { min: 1, max: 2 }.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = CatalogError::DuplicateKey(42);
        assert_eq!(
            err.to_string(),
            "Duplicate key: a book with id 42 is already in the catalog"
        );

        let err = CatalogError::IdSpaceExhausted { min: 100, max: 1000 };
        assert!(err.to_string().contains("[100, 1000)"));
    }
}
