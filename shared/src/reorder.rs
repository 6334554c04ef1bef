//! Drag-and-drop reordering of an ordered item sequence.
//!
//! The engine only tracks the drag gesture and computes the new order on drop.
//! It never owns the items: callers hand in the current slice and receive the
//! renumbered sequence through the `on_reorder` callback.

/// Item with a 1-based `order` field that follows its list position.
pub trait Orderable: Clone {
    fn set_order(&mut self, order: u32);
}

/// Ephemeral drag gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { source: usize },
    Hovering { source: usize, target: usize },
}

impl DragState {
    pub fn source(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging { source } | Self::Hovering { source, .. } => Some(*source),
        }
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Hovering { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Drag session for one reorderable list.
///
/// Gesture events must be fed in the order the UI fires them:
/// `begin_drag` → `hover`/`leave`* → `drop` | `cancel_drag`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReorderEngine {
    state: DragState,
    read_only: bool,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            state: DragState::Idle,
            read_only: true,
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.state = DragState::Idle;
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Start dragging the item at `index` of a list with `len` items.
    pub fn begin_drag(&mut self, index: usize, len: usize) {
        if self.read_only || index >= len {
            return;
        }
        self.state = DragState::Dragging { source: index };
    }

    /// Record the hovered index. Returns `true` only when the state changed.
    pub fn hover(&mut self, index: usize) -> bool {
        if self.read_only {
            return false;
        }
        let next = match self.state {
            DragState::Idle => return false,
            DragState::Dragging { source } => DragState::Hovering { source, target: index },
            DragState::Hovering { source, target } => {
                if target == index {
                    return false;
                }
                DragState::Hovering { source, target: index }
            }
        };
        self.state = next;
        true
    }

    /// Pointer left the hovered item without entering another one.
    pub fn leave(&mut self) {
        if let DragState::Hovering { source, .. } = self.state {
            self.state = DragState::Dragging { source };
        }
    }

    /// `dragleave` on the item at `index`. `into_child` is set when the pointer
    /// only moved onto one of the item's own children, which keeps the hover.
    pub fn leave_item(&mut self, index: usize, into_child: bool) -> bool {
        if into_child || self.state.target() != Some(index) {
            return false;
        }
        self.leave();
        true
    }

    /// Drop the dragged item at `index`.
    ///
    /// Invokes `on_reorder` with the renumbered sequence when the drop moves
    /// an item, and returns whether it did. The session is back to `Idle`
    /// afterwards in every case.
    pub fn drop<T, F>(&mut self, index: usize, items: &[T], on_reorder: F) -> bool
    where
        T: Orderable,
        F: FnOnce(Vec<T>),
    {
        if self.read_only {
            return false;
        }
        let state = std::mem::take(&mut self.state);
        let Some(source) = state.source() else {
            return false;
        };
        match reorder(items, source, index) {
            Some(reordered) => {
                log::debug!("reorder: moved item {source} -> {index}");
                on_reorder(reordered);
                true
            }
            None => false,
        }
    }

    /// Abort the gesture without reordering.
    pub fn cancel_drag(&mut self) {
        if self.read_only {
            return;
        }
        self.state = DragState::Idle;
    }
}

/// Move `items[source]` to `target` and renumber every `order` to `position + 1`.
///
/// Returns `None` for a no-op move or an index outside the slice.
pub fn reorder<T: Orderable>(items: &[T], source: usize, target: usize) -> Option<Vec<T>> {
    if source == target || source >= items.len() || target >= items.len() {
        return None;
    }
    let mut reordered = items.to_vec();
    let moved = reordered.remove(source);
    reordered.insert(target, moved);
    renumber(&mut reordered);
    Some(reordered)
}

/// Reassign contiguous 1-based `order` values matching positions.
pub fn renumber<T: Orderable>(items: &mut [T]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.set_order(position as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: &'static str,
        order: u32,
    }

    impl Orderable for Item {
        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn items(ids: &[&'static str]) -> Vec<Item> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| Item { id, order: index as u32 + 1 })
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|item| item.id).collect()
    }

    fn orders(items: &[Item]) -> Vec<u32> {
        items.iter().map(|item| item.order).collect()
    }

    #[test]
    fn test_drop_moves_first_item_to_end() {
        let list = items(&["a", "b", "c"]);
        let mut engine = ReorderEngine::new();
        let calls = RefCell::new(Vec::new());

        engine.begin_drag(0, list.len());
        let reordered = engine.drop(2, &list, |updated| calls.borrow_mut().push(updated));

        assert!(reordered);
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 1);
        assert_eq!(ids(&calls[0]), vec!["b", "c", "a"]);
        assert_eq!(orders(&calls[0]), vec![1, 2, 3]);
        assert_eq!(engine.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_source_is_noop() {
        let list = items(&["a", "b", "c"]);
        for index in 0..list.len() {
            let mut engine = ReorderEngine::new();
            let mut called = false;
            engine.begin_drag(index, list.len());
            assert!(!engine.drop(index, &list, |_| called = true));
            assert!(!called);
            assert_eq!(engine.state(), DragState::Idle);
        }
        assert_eq!(orders(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let list = items(&["a", "b"]);
        let mut engine = ReorderEngine::new();
        let mut called = false;
        assert!(!engine.drop(1, &list, |_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_renumbering_invariant_for_all_moves() {
        let list = items(&["a", "b", "c", "d", "e"]);
        for source in 0..list.len() {
            for target in 0..list.len() {
                if source == target {
                    continue;
                }
                let reordered = reorder(&list, source, target).unwrap();
                assert_eq!(reordered.len(), list.len());
                assert_eq!(orders(&reordered), vec![1, 2, 3, 4, 5]);
                assert_eq!(reordered[target].id, list[source].id);

                let mut before = ids(&list);
                let mut after = ids(&reordered);
                before.sort();
                after.sort();
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn test_cancel_never_reorders() {
        let list = items(&["a", "b", "c", "d"]);
        for source in 0..list.len() {
            for target in 0..list.len() {
                let mut engine = ReorderEngine::new();
                engine.begin_drag(source, list.len());
                engine.hover(target);
                engine.cancel_drag();
                assert_eq!(engine.state(), DragState::Idle);

                // A drop after cancel has no source left to move
                let mut called = false;
                assert!(!engine.drop(target, &list, |_| called = true));
                assert!(!called, "cancel {source} -> {target} reordered");
            }
        }
    }

    #[test]
    fn test_hover_skips_redundant_updates() {
        let mut engine = ReorderEngine::new();
        assert!(!engine.hover(1)); // not dragging

        engine.begin_drag(0, 3);
        assert!(engine.hover(1));
        assert!(!engine.hover(1));
        assert!(engine.hover(2));
        assert_eq!(engine.state(), DragState::Hovering { source: 0, target: 2 });
    }

    #[test]
    fn test_leaving_into_own_child_keeps_hover() {
        let mut engine = ReorderEngine::new();
        engine.begin_drag(0, 3);
        engine.hover(1);

        assert!(!engine.leave_item(1, true));
        assert!(!engine.leave_item(2, false)); // not the hovered item
        assert_eq!(engine.state(), DragState::Hovering { source: 0, target: 1 });

        assert!(engine.leave_item(1, false));
        assert_eq!(engine.state(), DragState::Dragging { source: 0 });
    }

    #[test]
    fn test_leave_keeps_source() {
        let mut engine = ReorderEngine::new();
        engine.begin_drag(1, 3);
        engine.hover(2);
        engine.leave();
        assert_eq!(engine.state(), DragState::Dragging { source: 1 });
        assert_eq!(engine.state().target(), None);
    }

    #[test]
    fn test_read_only_disables_gestures() {
        let list = items(&["a", "b"]);
        let mut engine = ReorderEngine::read_only();
        engine.begin_drag(0, list.len());
        assert_eq!(engine.state(), DragState::Idle);
        assert!(!engine.hover(1));

        let mut called = false;
        assert!(!engine.drop(1, &list, |_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_switching_to_read_only_clears_session() {
        let mut engine = ReorderEngine::new();
        engine.begin_drag(0, 2);
        engine.set_read_only(true);
        assert!(!engine.state().is_active());
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        let list = items(&["a", "b"]);
        let mut engine = ReorderEngine::new();

        engine.begin_drag(5, list.len());
        assert_eq!(engine.state(), DragState::Idle);

        engine.begin_drag(1, list.len());
        let mut called = false;
        assert!(!engine.drop(7, &list, |_| called = true));
        assert!(!called);
        assert_eq!(engine.state(), DragState::Idle);
    }

    #[test]
    fn test_list_shrunk_mid_gesture() {
        let mut engine = ReorderEngine::new();
        engine.begin_drag(2, 3);
        let shrunk = items(&["a", "b"]);
        let mut called = false;
        assert!(!engine.drop(0, &shrunk, |_| called = true));
        assert!(!called);
    }
}
