//! Focus management for a drawer.
//!
//! Each drawer owns a [`FocusManager`] that:
//!
//! 1. Keeps the drawer's focusable set, in document order
//! 2. Remembers which element outside the drawer had focus when it opened
//! 3. Moves focus to the first focusable element once the drawer is open
//! 4. Traps Tab/Shift+Tab inside the drawer while it is shown
//! 5. Returns focus to the remembered element when the drawer closes
//!
//! # Focusable Set
//!
//! An element belongs to the set if it is a natively interactive control
//! that is not disabled (buttons, selects, text areas, inputs other than
//! hidden ones, anchors with a target), or if it has a non-negative
//! explicit tab order. Dismiss controls are never part of the set.

use horizon_drawer_core::logging::targets;
use horizon_drawer_core::{DrawerRole, Element, HostDocument, NodeId};

/// Direction of a Tab key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    /// Tab.
    Forward,
    /// Shift+Tab.
    Backward,
}

impl TabDirection {
    /// Direction for a Tab press with the given Shift state.
    #[inline]
    pub fn from_shift(shift: bool) -> Self {
        if shift { Self::Backward } else { Self::Forward }
    }
}

/// Whether `element` belongs in a drawer's focusable set.
pub fn is_tabbable(element: &Element) -> bool {
    if element.role == Some(DrawerRole::Dismiss) {
        return false;
    }
    let native = !element.disabled && element.kind.is_interactive();
    let explicit = element.tab_index.is_some_and(|index| index >= 0);
    native || explicit
}

/// Collect the focusable descendants of `root` in document order.
pub fn collect_focusables<D: HostDocument + ?Sized>(doc: &D, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&node| doc.element(node).is_some_and(is_tabbable))
        .collect()
}

/// Per-drawer focus state.
#[derive(Debug, Default, Clone)]
pub struct FocusManager {
    /// The element that had focus before the drawer opened.
    previous: Option<NodeId>,
    /// The drawer's focusable set.
    focusables: Vec<NodeId>,
}

impl FocusManager {
    /// Create a focus manager with an empty focusable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current focusable set.
    #[inline]
    pub fn focusables(&self) -> &[NodeId] {
        &self.focusables
    }

    /// The remembered element, if any.
    #[inline]
    pub fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    /// Recompute the focusable set from the subtree at `root`.
    pub fn refresh<D: HostDocument + ?Sized>(&mut self, doc: &D, root: NodeId) {
        self.focusables = collect_focusables(doc, root);
        tracing::trace!(target: targets::FOCUS, count = self.focusables.len(), "focusable set refreshed");
    }

    /// Remember the currently focused element so it can be restored later.
    ///
    /// Focus already inside the drawer is not remembered.
    pub fn capture<D: HostDocument + ?Sized>(&mut self, doc: &D, root: NodeId) {
        self.previous = doc.focused().filter(|&node| !doc.is_within(node, root));
        tracing::trace!(target: targets::FOCUS, previous = ?self.previous, "focus captured");
    }

    /// Move focus to the first element of the focusable set.
    ///
    /// Returns the focused element, or `None` if the set is empty (focus is
    /// left where it was) or the element refused focus.
    pub fn autofocus<D: HostDocument + ?Sized>(&self, doc: &mut D) -> Option<NodeId> {
        let first = *self.focusables.first()?;
        if doc.focus(first) {
            tracing::debug!(target: targets::FOCUS, node = ?first, "autofocus applied");
            Some(first)
        } else {
            None
        }
    }

    /// Return focus to the remembered element and forget it.
    ///
    /// Returns `true` if focus was restored. A second call without an
    /// intervening [`capture`](Self::capture) does nothing.
    pub fn restore<D: HostDocument + ?Sized>(&mut self, doc: &mut D) -> bool {
        let Some(previous) = self.previous.take() else {
            return false;
        };
        let still_focusable = doc.element(previous).is_some_and(Element::accepts_focus);
        let restored = still_focusable && doc.focus(previous);
        tracing::debug!(target: targets::FOCUS, node = ?previous, restored, "focus restore");
        restored
    }

    /// Keep Tab navigation inside the drawer.
    ///
    /// Tab on the last element wraps to the first; Shift+Tab on the first
    /// wraps to the last. Returns `true` if focus was redirected, in which
    /// case the host must suppress its own Tab handling. Every other press
    /// is left to the host.
    pub fn trap_tab<D: HostDocument + ?Sized>(&self, doc: &mut D, direction: TabDirection) -> bool {
        let (Some(&first), Some(&last)) = (self.focusables.first(), self.focusables.last()) else {
            return false;
        };
        let current = doc.focused();

        let redirect = match direction {
            TabDirection::Forward if current == Some(last) => first,
            TabDirection::Backward if current == Some(first) => last,
            _ => return false,
        };

        tracing::trace!(target: targets::FOCUS, ?direction, node = ?redirect, "tab wrapped");
        doc.focus(redirect)
    }
}
