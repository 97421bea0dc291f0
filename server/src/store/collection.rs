use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::{Guarded, StoreError};
use crate::model::{NewTodo, Todo};

/// The in-memory todo collection shared by both store backends.
#[derive(Clone, Debug, Default)]
pub(super) struct Collection {
    docs: HashMap<Uuid, Todo>,
}

/// Highest order first; ids break ties so listings are stable.
fn rank(a: &Todo, b: &Todo) -> Ordering {
    b.order.cmp(&a.order).then_with(|| a.id.cmp(&b.id))
}

impl Collection {
    pub(super) fn from_docs(docs: impl IntoIterator<Item = Todo>) -> Self {
        Self {
            docs: docs.into_iter().map(|todo| (todo.id, todo)).collect(),
        }
    }

    pub(super) fn get(&self, id: Uuid) -> Option<Todo> {
        self.docs.get(&id).cloned()
    }

    pub(super) fn by_order(&self, order: u64) -> Option<Todo> {
        self.docs
            .values()
            .filter(|todo| todo.order == order)
            .min_by(|a, b| rank(a, b))
            .cloned()
    }

    pub(super) fn max_order(&self) -> Option<Todo> {
        self.docs.values().min_by(|a, b| rank(a, b)).cloned()
    }

    pub(super) fn sorted(&self) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self.docs.values().cloned().collect();
        todos.sort_by(rank);
        todos
    }

    pub(super) fn insert(&mut self, new: NewTodo) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4(),
            value: new.value,
            order: new.order,
            done_at: None,
        };
        self.docs.insert(todo.id, todo.clone());
        todo
    }

    /// Checks every precondition before touching anything.
    pub(super) fn apply(&mut self, writes: Vec<Guarded>) -> Result<(), StoreError> {
        let batch: HashSet<Uuid> = writes.iter().map(|write| write.todo.id).collect();
        for write in &writes {
            match self.docs.get(&write.todo.id) {
                Some(stored) if stored.order == write.expected_order => {}
                _ => return Err(StoreError::Conflict(write.todo.id)),
            }
            // A moved todo's new order must not be held outside the batch.
            if write.todo.order != write.expected_order
                && self
                    .docs
                    .values()
                    .any(|other| other.order == write.todo.order && !batch.contains(&other.id))
            {
                return Err(StoreError::Conflict(write.todo.id));
            }
        }
        for write in writes {
            self.docs.insert(write.todo.id, write.todo);
        }
        Ok(())
    }

    pub(super) fn remove(&mut self, id: Uuid) -> bool {
        self.docs.remove(&id).is_some()
    }

    pub(super) fn len(&self) -> usize {
        self.docs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_with(orders: &[u64]) -> (Collection, Vec<Todo>) {
        let mut collection = Collection::default();
        let todos = orders
            .iter()
            .map(|&order| {
                collection.insert(NewTodo {
                    value: format!("todo {order}"),
                    order,
                })
            })
            .collect();
        (collection, todos)
    }

    #[test]
    fn sorted_is_order_descending() {
        let (collection, _) = collection_with(&[2, 7, 1, 4]);
        let orders: Vec<u64> = collection.sorted().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![7, 4, 2, 1]);
    }

    #[test]
    fn max_order_on_empty_collection_is_none() {
        assert!(Collection::default().max_order().is_none());
    }

    #[test]
    fn by_order_picks_first_ranked_duplicate() {
        let (collection, todos) = collection_with(&[5, 5]);
        let expected = todos.iter().map(|t| t.id).min().unwrap();
        assert_eq!(collection.by_order(5).unwrap().id, expected);
        assert!(collection.by_order(6).is_none());
    }

    #[test]
    fn apply_rejects_whole_batch_on_stale_precondition() {
        let (mut collection, todos) = collection_with(&[1, 2]);
        let mut first = todos[0].clone();
        first.order = 2;
        let mut second = todos[1].clone();
        second.order = 1;

        let err = collection
            .apply(vec![Guarded::new(first, 1), Guarded::new(second, 9)])
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(id) if id == todos[1].id));
        assert_eq!(collection.get(todos[0].id).unwrap().order, 1);
        assert_eq!(collection.get(todos[1].id).unwrap().order, 2);
    }

    #[test]
    fn apply_rejects_move_onto_order_taken_since_read() {
        let (mut collection, todos) = collection_with(&[1, 2]);
        let mut first = todos[0].clone();
        let mut second = todos[1].clone();
        first.order = 5;
        second.order = 5;

        collection.apply(vec![Guarded::new(first, 1)]).unwrap();
        let err = collection.apply(vec![Guarded::new(second, 2)]).unwrap_err();

        assert!(matches!(err, StoreError::Conflict(id) if id == todos[1].id));
        let orders: Vec<u64> = collection.sorted().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![5, 2]);
    }

    #[test]
    fn apply_allows_swap_within_batch() {
        let (mut collection, todos) = collection_with(&[1, 2]);
        let mut first = todos[0].clone();
        let mut second = todos[1].clone();
        first.order = 2;
        second.order = 1;

        collection
            .apply(vec![Guarded::new(second, 2), Guarded::new(first, 1)])
            .unwrap();

        assert_eq!(collection.by_order(2).unwrap().id, todos[0].id);
        assert_eq!(collection.by_order(1).unwrap().id, todos[1].id);
    }

    #[test]
    fn apply_rejects_write_to_missing_document() {
        let (mut collection, todos) = collection_with(&[1]);
        assert!(collection.remove(todos[0].id));
        let err = collection
            .apply(vec![Guarded::new(todos[0].clone(), 1)])
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(collection.len(), 0);
    }
}
