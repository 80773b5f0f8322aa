//! Document focus service contracts.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashSet},
    rc::Rc,
};

use app_layout_contract::{ElementRef, FocusTarget};

/// Host service for reading and moving document focus.
pub trait FocusHost {
    /// Returns the currently focused element, if any.
    fn active_element(&self) -> Option<ElementRef>;

    /// Returns whether `element` is still attached to the document.
    fn is_connected(&self, element: ElementRef) -> bool;

    /// Moves focus to `target`. Returns `false` when the target is not rendered.
    fn focus(&self, target: &FocusTarget) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op focus service for headless composition.
pub struct NoopFocusHost;

impl FocusHost for NoopFocusHost {
    fn active_element(&self) -> Option<ElementRef> {
        None
    }

    fn is_connected(&self, _element: ElementRef) -> bool {
        false
    }

    fn focus(&self, _target: &FocusTarget) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct MemoryFocusState {
    rendered: HashSet<FocusTarget>,
    connected: BTreeSet<ElementRef>,
    active: Option<ElementRef>,
    history: Vec<FocusTarget>,
}

#[derive(Debug, Clone, Default)]
/// In-memory focus service that records every focus move.
pub struct MemoryFocusHost {
    inner: Rc<RefCell<MemoryFocusState>>,
}

impl MemoryFocusHost {
    /// Marks `target` as rendered so it can receive focus.
    pub fn render(&self, target: FocusTarget) {
        self.inner.borrow_mut().rendered.insert(target);
    }

    /// Removes `target` from the rendered set.
    pub fn unrender(&self, target: &FocusTarget) {
        self.inner.borrow_mut().rendered.remove(target);
    }

    /// Attaches `element` to the document and focuses it.
    pub fn attach_and_focus(&self, element: ElementRef) {
        let mut inner = self.inner.borrow_mut();
        inner.connected.insert(element);
        inner.active = Some(element);
    }

    /// Detaches `element` from the document.
    pub fn detach(&self, element: ElementRef) {
        let mut inner = self.inner.borrow_mut();
        inner.connected.remove(&element);
        if inner.active == Some(element) {
            inner.active = None;
        }
    }

    /// Returns every successful focus move in order.
    pub fn history(&self) -> Vec<FocusTarget> {
        self.inner.borrow().history.clone()
    }

    /// Returns the last successful focus move.
    pub fn last_focused(&self) -> Option<FocusTarget> {
        self.inner.borrow().history.last().cloned()
    }
}

impl FocusHost for MemoryFocusHost {
    fn active_element(&self) -> Option<ElementRef> {
        self.inner.borrow().active
    }

    fn is_connected(&self, element: ElementRef) -> bool {
        self.inner.borrow().connected.contains(&element)
    }

    fn focus(&self, target: &FocusTarget) -> bool {
        let mut inner = self.inner.borrow_mut();
        let reachable = match target {
            FocusTarget::Element { element } => inner.connected.contains(element),
            other => inner.rendered.contains(other),
        };
        if !reachable {
            return false;
        }
        inner.active = match target {
            FocusTarget::Element { element } => Some(*element),
            _ => None,
        };
        inner.history.push(target.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use app_layout_contract::DrawerId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_focus_host_only_focuses_rendered_targets() {
        let host = MemoryFocusHost::default();
        let close = FocusTarget::DrawerClose {
            id: DrawerId::new("tools"),
        };

        assert!(!host.focus(&close));
        host.render(close.clone());
        assert!(host.focus(&close));
        assert_eq!(host.history(), vec![close]);
    }

    #[test]
    fn memory_focus_host_tracks_connected_elements() {
        let host = MemoryFocusHost::default();
        host.attach_and_focus(ElementRef(7));
        assert_eq!(host.active_element(), Some(ElementRef(7)));

        host.detach(ElementRef(7));
        assert_eq!(host.active_element(), None);
        assert!(!host.focus(&FocusTarget::Element {
            element: ElementRef(7)
        }));
    }
}
