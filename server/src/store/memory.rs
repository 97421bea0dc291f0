use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collection::Collection;
use super::{Guarded, StoreError, TodoStore};
use crate::model::{NewTodo, Todo};

/// Volatile store; everything is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
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
        Ok(self.todos.write().await.insert(todo))
    }

    async fn commit(&self, writes: Vec<Guarded>) -> Result<(), StoreError> {
        self.todos.write().await.apply(writes)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.todos.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering;

    fn new_todo(value: &str, order: u64) -> NewTodo {
        NewTodo {
            value: value.to_string(),
            order,
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_todo("a", 1)).await.unwrap();
        let b = store.insert(new_todo("b", 2)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.done_at.is_none());
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn commit_swaps_two_orders() {
        let store = MemoryStore::new();
        let mut a = store.insert(new_todo("a", 1)).await.unwrap();
        let mut b = store.insert(new_todo("b", 2)).await.unwrap();
        a.order = 2;
        b.order = 1;

        store
            .commit(vec![Guarded::new(b.clone(), 2), Guarded::new(a.clone(), 1)])
            .await
            .unwrap();

        assert_eq!(store.find_by_order(2).await.unwrap().unwrap().id, a.id);
        assert_eq!(store.find_by_order(1).await.unwrap().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn interleaved_moves_onto_same_free_order_conflict() {
        let store = MemoryStore::new();
        let a = store.insert(new_todo("a", 1)).await.unwrap();
        let b = store.insert(new_todo("b", 2)).await.unwrap();

        // Both requests read before either commits.
        let mut moved_a = store.find_by_id(a.id).await.unwrap().unwrap();
        let mut moved_b = store.find_by_id(b.id).await.unwrap().unwrap();
        let holder_a = store.find_by_order(5).await.unwrap();
        let holder_b = store.find_by_order(5).await.unwrap();
        assert!(ordering::reposition(&mut moved_a, 5, holder_a).is_none());
        assert!(ordering::reposition(&mut moved_b, 5, holder_b).is_none());

        store.commit(vec![Guarded::new(moved_a, 1)]).await.unwrap();
        let err = store.commit(vec![Guarded::new(moved_b, 2)]).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(id) if id == b.id));
        let orders: Vec<u64> = store.list().await.unwrap().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![5, 2]);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let a = store.insert(new_todo("a", 1)).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
