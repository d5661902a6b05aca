//! Undo/redo history of full element-list snapshots.

use crate::elements::Element;
use crate::scene::Scene;

/// Two stacks of element-list snapshots.
///
/// Only the elements are tracked; camera, selection and tool are outside
/// history. Capacity is unbounded: every save point keeps a full copy of
/// the list for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Oldest first; the last entry is the state one undo brings back.
    past: Vec<Vec<Element>>,
    /// Next redo first.
    future: Vec<Vec<Element>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scene's current elements as a save point (call before
    /// mutating) and drop any redo states.
    pub fn save_snapshot(&mut self, scene: &Scene) {
        self.past.push(scene.elements().to_vec());
        self.future.clear();
    }

    /// Restore the most recent save point.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = scene.take_elements();
        self.future.insert(0, current);
        scene.set_elements(previous);
        true
    }

    /// Re-apply the most recently undone state.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if self.future.is_empty() {
            return false;
        }
        let next = self.future.remove(0);
        let current = scene.take_elements();
        self.past.push(current);
        scene.set_elements(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Forget all save points.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, DEFAULT_STROKE, ElementId, ElementKind};

    fn rect(id: &str) -> Element {
        Element::with_id(
            ElementId::from(id),
            ElementKind::Rectangle(BoxSize::new(10.0, 10.0)),
            0.0,
            0.0,
            DEFAULT_STROKE,
        )
    }

    fn ids(scene: &Scene) -> Vec<String> {
        scene.elements().iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn test_undo_add_element() {
        let mut scene = Scene::new();
        let mut history = History::new();

        history.save_snapshot(&scene);
        scene.add_element(rect("a"));

        assert!(history.can_undo());
        assert!(history.undo(&mut scene));
        assert!(scene.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut scene));
        assert_eq!(ids(&scene), vec!["a"]);
    }

    #[test]
    fn test_undo_redo_inverse_over_many_steps() {
        let mut scene = Scene::new();
        let mut history = History::new();

        for id in ["a", "b", "c", "d"] {
            history.save_snapshot(&scene);
            scene.add_element(rect(id));
        }
        // A move gesture on top of the appends.
        history.save_snapshot(&scene);
        scene.get_mut(&ElementId::from("b")).unwrap().x = 42.0;

        let before: Vec<Element> = scene.elements().to_vec();
        let n = 5;
        for _ in 0..n {
            assert!(history.undo(&mut scene));
        }
        assert!(scene.is_empty());
        for _ in 0..n {
            assert!(history.redo(&mut scene));
        }
        assert_eq!(scene.elements(), before.as_slice());
    }

    #[test]
    fn test_new_snapshot_invalidates_redo() {
        let mut scene = Scene::new();
        let mut history = History::new();

        history.save_snapshot(&scene);
        scene.add_element(rect("a"));
        assert!(history.undo(&mut scene));
        assert!(history.can_redo());

        history.save_snapshot(&scene);
        scene.add_element(rect("b"));

        assert!(!history.can_redo());
        assert!(!history.redo(&mut scene));
        assert_eq!(ids(&scene), vec!["b"]);
    }

    #[test]
    fn test_undo_redo_on_empty_stacks() {
        let mut scene = Scene::new();
        scene.add_element(rect("keep"));
        let mut history = History::new();

        assert!(!history.undo(&mut scene));
        assert!(!history.redo(&mut scene));
        assert_eq!(ids(&scene), vec!["keep"]);
    }

    #[test]
    fn test_future_is_ordered_front_first() {
        let mut scene = Scene::new();
        let mut history = History::new();
        for id in ["a", "b"] {
            history.save_snapshot(&scene);
            scene.add_element(rect(id));
        }
        history.undo(&mut scene);
        history.undo(&mut scene);
        assert_eq!(history.redo_depth(), 2);

        history.redo(&mut scene);
        assert_eq!(ids(&scene), vec!["a"]);
        history.redo(&mut scene);
        assert_eq!(ids(&scene), vec!["a", "b"]);
    }
}
