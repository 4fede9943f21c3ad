pub mod filter;
pub mod memory;
pub mod update;

pub use filter::{Filter, Predicate};
pub use memory::{Collection, Document};
pub use update::Update;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// The document-store handle. Built once at startup and passed explicitly
/// to whatever needs it; cloning shares the underlying collections.
#[derive(Debug, Clone)]
pub struct Store {
    pub users: Collection,
    pub events: Collection,
}

impl Store {
    pub fn open() -> Self {
        Self {
            users: Collection::new("users"),
            events: Collection::new("events"),
        }
    }
}
