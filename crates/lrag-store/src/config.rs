//! Store configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use lrag_core::{Error, Result, DEFAULT_DIMENSION};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "demo_collection";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the document store factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub qdrant_url: String,
    pub collection: String,
    pub dimension: usize,
    pub connect_timeout_secs: u64,
    /// Drop and recreate the collection when the store is constructed
    pub recreate_collection: bool,
}

impl StoreConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let qdrant_url =
            env::var("QDRANT_URL").unwrap_or_else(|_| DEFAULT_QDRANT_URL.to_string());

        let collection =
            env::var("LRAG_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());

        let dimension = parse_var("LRAG_EMBEDDING_DIM", DEFAULT_DIMENSION)?;
        if dimension == 0 {
            return Err(Error::Configuration(
                "LRAG_EMBEDDING_DIM must be greater than zero".to_string(),
            ));
        }

        let connect_timeout_secs =
            parse_var("LRAG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let recreate_collection = parse_var("LRAG_RECREATE_COLLECTION", true)?;

        Ok(Self {
            qdrant_url,
            collection,
            dimension,
            connect_timeout_secs,
            recreate_collection,
        })
    }

    /// Create configuration for an explicit endpoint, with defaults elsewhere
    pub fn new(qdrant_url: impl Into<String>) -> Self {
        Self {
            qdrant_url: qdrant_url.into(),
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            dimension: DEFAULT_DIMENSION,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            recreate_collection: true,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            Error::Configuration(format!("{} has an invalid value: {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
