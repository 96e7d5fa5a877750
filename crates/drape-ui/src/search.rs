//! First-match queries over a tree with two child relations.
//!
//! Each node is tested before its children. Logical children (the elements
//! exposed to assistive technology) are searched depth-first before the
//! structural ones, so when a node shows up under both relations the logical
//! hit wins. The order is fixed, which makes results reproducible for a given
//! tree.
//!
//! ```rust
//! use drape_core::*;
//! use drape_ui::*;
//!
//! let root = Column(Modifier::new()).child((
//!     Text("Title"),
//!     Row(Modifier::new()).identifier("save_row").child(Button("Save", || {})),
//! ));
//!
//! assert!(trigger_view_by_id(&root, "save_row"));
//! assert!(!trigger_view_by_id(&root, "missing"));
//! ```

use drape_core::{Traits, View};

/// A node with a logical and a structural child relation.
pub trait SearchNode: Sized {
    fn logical_children(&self) -> &[Self];
    fn structural_children(&self) -> &[Self];
}

impl SearchNode for View {
    fn logical_children(&self) -> &[View] {
        self.elements.as_deref().unwrap_or(&[])
    }

    fn structural_children(&self) -> &[View] {
        &self.children
    }
}

/// Returns the first node (self, then logical, then structural) matching `is_match`.
pub fn find_first<'a, N: SearchNode>(root: &'a N, is_match: &dyn Fn(&N) -> bool) -> Option<&'a N> {
    if is_match(root) {
        return Some(root);
    }
    root.logical_children()
        .iter()
        .find_map(|c| find_first(c, is_match))
        .or_else(|| {
            root.structural_children()
                .iter()
                .find_map(|c| find_first(c, is_match))
        })
}

pub fn find_by_identifier<'a>(root: &'a View, identifier: &str) -> Option<&'a View> {
    find_first(root, &|v: &View| v.identifier_str() == Some(identifier))
}

/// First node under `root` tagged as a button.
pub fn find_activatable(root: &View) -> Option<&View> {
    find_first(root, &|v: &View| {
        v.semantics
            .as_ref()
            .is_some_and(|s| s.traits.contains(Traits::BUTTON))
    })
}

/// Simulates a tap on the button inside the container identified by `id`.
///
/// Two lookups: the identified container first, then the first button
/// within it. Returns false when either is missing or the button is disabled.
pub fn trigger_view_by_id(root: &View, id: &str) -> bool {
    let Some(container) = find_by_identifier(root, id) else {
        log::debug!("trigger_view_by_id: no node identified {id:?}");
        return false;
    };
    let Some(control) = find_activatable(container) else {
        log::debug!("trigger_view_by_id: {id:?} has no button inside");
        return false;
    };
    control.activate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Box, Button, Column, Text, ViewExt};
    use drape_core::Modifier;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pressed_log() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> View) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| {
            let l = l.clone();
            Button(name, move || l.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn finds_unique_match() {
        let tree = Column(Modifier::new()).child((
            Text("a"),
            Box(Modifier::new()).child(Text("b").identifier("target")),
        ));
        let hit = find_by_identifier(&tree, "target").map(|v| v.outline());
        assert_eq!(hit.as_deref(), Some("Text \"b\" #target"));
    }

    #[test]
    fn no_match_is_none() {
        let tree = Column(Modifier::new()).child(Text("a"));
        assert!(find_first(&tree, &|_: &View| false).is_none());
        assert!(find_by_identifier(&tree, "nope").is_none());
    }

    #[test]
    fn root_is_tested_first() {
        let tree = Column(Modifier::new())
            .identifier("x")
            .child(Text("a").identifier("x"));
        let hit = find_by_identifier(&tree, "x").map(|v| v.kind.clone());
        assert!(matches!(hit, Some(drape_core::ViewKind::Column)));
    }

    #[test]
    fn logical_children_win_over_structural() {
        let tree = Column(Modifier::new())
            .accessibility_elements(vec![Text("logical").identifier("dup")])
            .child(Text("structural").identifier("dup"));
        let hit = find_by_identifier(&tree, "dup").map(|v| v.outline());
        assert_eq!(hit.as_deref(), Some("Text \"logical\" #dup"));
    }

    #[test]
    fn deep_logical_match_beats_shallow_structural() {
        let tree = Column(Modifier::new())
            .accessibility_elements(vec![
                Box(Modifier::new()).child(Box(Modifier::new()).child(Text("deep").identifier("dup"))),
            ])
            .child(Text("shallow").identifier("dup"));
        let hit = find_by_identifier(&tree, "dup").map(|v| v.outline());
        assert_eq!(hit.as_deref(), Some("Text \"deep\" #dup"));
    }

    #[test]
    fn structural_fallback_when_logical_has_no_match() {
        let tree = Column(Modifier::new())
            .accessibility_elements(vec![Text("other")])
            .child(Text("only").identifier("t"));
        assert!(find_by_identifier(&tree, "t").is_some());
    }

    #[test]
    fn trigger_taps_first_button_inside_container() {
        let (log, make) = pressed_log();
        let tree = Column(Modifier::new()).child((
            make("outside"),
            Box(Modifier::new())
                .identifier("actions")
                .child((Text("label"), make("first"), make("second"))),
        ));
        assert!(trigger_view_by_id(&tree, "actions"));
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn trigger_returns_false_without_button_or_when_disabled() {
        let (log, make) = pressed_log();
        let tree = Column(Modifier::new()).child((
            Box(Modifier::new()).identifier("empty").child(Text("nothing")),
            Box(Modifier::new())
                .identifier("off")
                .child(make("disabled").modifier(Modifier::new().disabled(true))),
        ));
        assert!(!trigger_view_by_id(&tree, "empty"));
        assert!(!trigger_view_by_id(&tree, "off"));
        assert!(!trigger_view_by_id(&tree, "missing"));
        assert!(log.borrow().is_empty());
    }
}
