//! Document store holding todo records.
//!
//! Handlers only see the [`TodoStore`] trait. Both backends keep the whole
//! collection in memory behind a `tokio` lock; [`FileStore`] additionally
//! snapshots it to a JSON file after every committed write.
//!
//! Multi-document updates go through [`TodoStore::commit`], which applies a
//! batch of [`Guarded`] writes under one write lock. Each write names the
//! `order` its document had when it was read, and the batch is rejected as a
//! whole if any of them no longer matches.

mod collection;
mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StorageMode, StoreConfig};
use crate::model::{NewTodo, Todo};

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A guarded write found its document changed or gone.
    #[error("todo {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("store file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A write that only applies while the stored document still holds
/// `expected_order`. When the write moves the todo to a new order, that
/// order must also be free of todos outside the committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guarded {
    pub todo: Todo,
    pub expected_order: u64,
}

impl Guarded {
    pub fn new(todo: Todo, expected_order: u64) -> Self {
        Self {
            todo,
            expected_order,
        }
    }
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// The todo holding `order`. Should several hold it, the one that sorts
    /// first in [`TodoStore::list`] wins.
    async fn find_by_order(&self, order: u64) -> Result<Option<Todo>, StoreError>;

    async fn find_max_order(&self) -> Result<Option<Todo>, StoreError>;

    /// Every todo, highest `order` first.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Stores a new todo under a freshly assigned id.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Applies all writes or none of them.
    async fn commit(&self, writes: Vec<Guarded>) -> Result<(), StoreError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Opens the backend selected by `config`.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn TodoStore>, StoreError> {
    match config.mode {
        StorageMode::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageMode::File => Ok(Arc::new(FileStore::open(&config.path).await?)),
    }
}
