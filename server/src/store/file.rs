use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collection::Collection;
use super::{Guarded, StoreError, TodoStore};
use crate::model::{NewTodo, Todo};

/// Store persisted as a single JSON document holding every todo.
///
/// Writes are staged on a copy of the collection, flushed to disk, and only
/// then made visible, so a failed flush leaves both memory and file on the
/// previous state.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    todos: RwLock<Collection>,
}

impl FileStore {
    /// Loads `path`, starting empty when the file does not exist yet.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let todos = match fs::read(path).await {
            Ok(bytes) => {
                let docs: Vec<Todo> = serde_json::from_slice(&bytes)?;
                Collection::from_docs(docs)
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Collection::default(),
            Err(error) => return Err(error.into()),
        };
        tracing::info!(path = %path.display(), count = todos.len(), "opened todo file store");
        Ok(Self {
            path: path.to_path_buf(),
            todos: RwLock::new(todos),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, todos: &Collection) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let bytes = serde_json::to_vec_pretty(&todos.sorted())?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for FileStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.get(id))
    }

    async fn find_by_order(&self, order: u64) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.by_order(order))
    }

    async fn find_max_order(&self) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.max_order())
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.sorted())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut guard = self.todos.write().await;
        let mut next = guard.clone();
        let inserted = next.insert(todo);
        self.flush(&next).await?;
        *guard = next;
        Ok(inserted)
    }

    async fn commit(&self, writes: Vec<Guarded>) -> Result<(), StoreError> {
        let mut guard = self.todos.write().await;
        let mut next = guard.clone();
        next.apply(writes)?;
        self.flush(&next).await?;
        *guard = next;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.todos.write().await;
        let mut next = guard.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        self.flush(&next).await?;
        *guard = next;
        Ok(true)
    }
}
