//! Runtime configuration loaded from environment variables.

use std::str::FromStr;

use crate::errors::HistoryError;

pub const DEFAULT_DATABASE: &str = "UserDB";
pub const DEFAULT_COLLECTION: &str = "Query";

/// Which [`crate::HistoryStore`] implementation to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryBackend {
    /// MongoDB collection (production).
    #[default]
    Mongo,
    /// Process-local map; history is lost on restart.
    Memory,
}

impl FromStr for HistoryBackend {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(HistoryError::Config(format!(
                "unsupported HISTORY_BACKEND `{other}` (expected `mongo` or `memory`)"
            ))),
        }
    }
}

/// Store connection settings.
#[derive(Clone, Debug)]
pub struct HistoryStoreConfig {
    pub backend: HistoryBackend,
    /// MongoDB connection string, required for [`HistoryBackend::Mongo`].
    pub mongodb_uri: Option<String>,
    pub database: String,
    pub collection: String,
}

impl Default for HistoryStoreConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::Mongo,
            mongodb_uri: None,
            database: DEFAULT_DATABASE.into(),
            collection: DEFAULT_COLLECTION.into(),
        }
    }
}

impl HistoryStoreConfig {
    /// Config that keeps history in memory.
    pub fn memory() -> Self {
        Self {
            backend: HistoryBackend::Memory,
            ..Self::default()
        }
    }

    /// Reads `HISTORY_BACKEND`, `MONGODB_URI`, `MONGODB_DATABASE` and
    /// `MONGODB_COLLECTION`, then validates the result.
    pub fn from_env() -> Result<Self, HistoryError> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let cfg = Self {
            backend: non_empty("HISTORY_BACKEND")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
            mongodb_uri: non_empty("MONGODB_URI"),
            database: non_empty("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            collection: non_empty("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.into()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.backend == HistoryBackend::Mongo && self.mongodb_uri.is_none() {
            return Err(HistoryError::Config("MONGODB_URI is required".into()));
        }
        if self.database.trim().is_empty() {
            return Err(HistoryError::Config("database is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(HistoryError::Config("collection is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "HISTORY_BACKEND",
        "MONGODB_URI",
        "MONGODB_DATABASE",
        "MONGODB_COLLECTION",
    ];

    fn clear_env() {
        for v in VARS {
            // SAFETY: tests touching the environment are serialized.
            unsafe { std::env::remove_var(v) };
        }
    }

    #[test]
    fn backend_names() {
        assert_eq!("Mongo".parse::<HistoryBackend>().unwrap(), HistoryBackend::Mongo);
        assert_eq!("memory".parse::<HistoryBackend>().unwrap(), HistoryBackend::Memory);
        assert!("redis".parse::<HistoryBackend>().is_err());
    }

    #[test]
    #[serial]
    fn mongo_requires_uri() {
        clear_env();
        assert!(matches!(
            HistoryStoreConfig::from_env(),
            Err(HistoryError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn defaults_match_legacy_collection() {
        clear_env();
        // SAFETY: serialized.
        unsafe { std::env::set_var("MONGODB_URI", "mongodb://localhost:27017") };

        let cfg = HistoryStoreConfig::from_env().unwrap();
        assert_eq!(cfg.backend, HistoryBackend::Mongo);
        assert_eq!(cfg.database, "UserDB");
        assert_eq!(cfg.collection, "Query");
        clear_env();
    }

    #[test]
    #[serial]
    fn memory_backend_needs_no_uri() {
        clear_env();
        // SAFETY: serialized.
        unsafe { std::env::set_var("HISTORY_BACKEND", "memory") };

        let cfg = HistoryStoreConfig::from_env().unwrap();
        assert_eq!(cfg.backend, HistoryBackend::Memory);
        clear_env();
    }
}
