//! Rank assignment for todos.
//!
//! New todos go to the top of the list: one past the current maximum order.
//! Moving a todo onto an order that another todo already holds swaps the two,
//! so no two todos share an order once an update commits.

use crate::model::Todo;

/// Order for a todo created after `max`, the current highest-ranked todo.
pub fn next_order(max: Option<&Todo>) -> u64 {
    max.map_or(1, |todo| todo.order.saturating_add(1))
}

/// Moves `current` to `target`.
///
/// `holder` is whichever todo held `target` when it was looked up. When that
/// is some other todo it takes over `current`'s old order and is returned so
/// the caller can write both back together.
pub fn reposition(current: &mut Todo, target: u64, holder: Option<Todo>) -> Option<Todo> {
    let previous = std::mem::replace(&mut current.order, target);
    holder
        .filter(|holder| holder.id != current.id)
        .map(|mut holder| {
            holder.order = previous;
            holder
        })
}
