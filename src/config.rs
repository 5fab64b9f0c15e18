//! Bookshelf configuration
//!
//! Loaded from a TOML file, then overridden by environment variables:
//!
//! - `BOOKSHELF_ID_SEED`: fixed seed for id generation (unsigned integer)
//! - `BOOKSHELF_IMPORT_SCHEMA`: `with-id` or `generated-id`
//!
//! ```toml
//! [ids]
//! min = 100
//! max = 1000
//! seed = 42
//!
//! [import]
//! schema = "with-id"
//! ```

use crate::catalog::IdGenerator;
use crate::error::{CatalogError, Result};
use crate::import::ImportSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable holding a fixed id seed
pub const ENV_ID_SEED: &str = "BOOKSHELF_ID_SEED";

/// Environment variable selecting the import schema
pub const ENV_IMPORT_SCHEMA: &str = "BOOKSHELF_IMPORT_SCHEMA";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookshelfConfig {
    pub ids: IdConfig,
    pub import: ImportConfig,
}

/// Id generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    /// Smallest generated id (inclusive)
    pub min: u32,
    /// Upper bound for generated ids (exclusive)
    pub max: u32,
    /// Fixed seed; `None` seeds from OS entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            min: IdGenerator::DEFAULT_MIN,
            max: IdGenerator::DEFAULT_MAX,
            seed: None,
        }
    }
}

/// Import settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub schema: ImportSchema,
}

impl BookshelfConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BookshelfConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `BOOKSHELF_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ID_SEED) {
            let seed = value.trim().parse::<u64>().map_err(|_| {
                CatalogError::InvalidConfig(format!(
                    "{}: '{}' is not an unsigned integer",
                    ENV_ID_SEED, value
                ))
            })?;
            self.ids.seed = Some(seed);
        }

        if let Some(value) = lookup(ENV_IMPORT_SCHEMA) {
            self.import.schema = value.parse()?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.ids.min >= self.ids.max {
            return Err(CatalogError::InvalidConfig(format!(
                "ids.min ({}) must be below ids.max ({})",
                self.ids.min, self.ids.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BookshelfConfig::default();
        assert_eq!(config.ids.min, 100);
        assert_eq!(config.ids.max, 1000);
        assert_eq!(config.ids.seed, None);
        assert_eq!(config.import.schema, ImportSchema::WithId);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let config = BookshelfConfig::from_toml_str(
            r#"
            [ids]
            min = 1
            max = 50
            seed = 7

            [import]
            schema = "generated-id"
            "#,
        )
        .unwrap();

        assert_eq!(config.ids.min, 1);
        assert_eq!(config.ids.max, 50);
        assert_eq!(config.ids.seed, Some(7));
        assert_eq!(config.import.schema, ImportSchema::GeneratedId);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = BookshelfConfig::from_toml_str("[ids]\nseed = 3\n").unwrap();
        assert_eq!(config.ids.min, 100);
        assert_eq!(config.ids.max, 1000);
        assert_eq!(config.ids.seed, Some(3));

        let empty = BookshelfConfig::from_toml_str("").unwrap();
        assert_eq!(empty, BookshelfConfig::default());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = BookshelfConfig::from_toml_str("[ids]\nmin = 10\nmax = 10\n");
        assert!(matches!(result, Err(CatalogError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_schema_rejected() {
        let result = BookshelfConfig::from_toml_str("[import]\nschema = \"xml\"\n");
        assert!(matches!(result, Err(CatalogError::ConfigParse(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_ID_SEED, "12345"),
            (ENV_IMPORT_SCHEMA, "generated-id"),
        ]
        .into_iter()
        .collect();

        let config = BookshelfConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.ids.seed, Some(12345));
        assert_eq!(config.import.schema, ImportSchema::GeneratedId);
    }

    #[test]
    fn test_bad_seed_override() {
        let result = BookshelfConfig::default().with_overrides(|name| {
            (name == ENV_ID_SEED).then(|| "not-a-number".to_string())
        });
        assert!(matches!(result, Err(CatalogError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.toml");
        std::fs::write(&path, "[ids]\nmin = 5\nmax = 9\n").unwrap();

        let config = BookshelfConfig::load(&path).unwrap();
        assert_eq!(config.ids.min, 5);
        assert_eq!(config.ids.max, 9);

        let missing = BookshelfConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }
}
