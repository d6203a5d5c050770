//! Swipe-to-close gesture tracking.
//!
//! On touch viewports a shown drawer can be dragged down by its handle. The
//! [`GestureTracker`] turns the raw vertical samples into a drag offset and,
//! on release, a [`Release`] decision: close, or snap back.
//!
//! A move or release with no preceding start does nothing, and a start
//! while already dragging restarts the drag from the new position.
//!
//! # Usage
//!
//! ```
//! use horizon_drawer::gesture::{GestureTracker, Release};
//!
//! let mut tracker = GestureTracker::new(100);
//! tracker.begin(200.0, 375.0);
//!
//! assert_eq!(tracker.update(180.0), Some(0.0)); // upward motion is ignored
//! assert_eq!(tracker.update(350.0), Some(150.0));
//! assert_eq!(tracker.release(), Some(Release::Commit));
//! ```

use horizon_drawer_core::logging::targets;
use horizon_drawer_core::{DrawerRole, HostDocument, NodeId};

/// Viewports narrower than this many pixels are treated as touch devices.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Height of the band below the panel's top edge that counts as the handle.
pub const HEADER_BAND_HEIGHT: f32 = 60.0;

/// Whether a viewport of `width` pixels enables swipe gestures.
#[inline]
pub fn is_mobile(width: f32) -> bool {
    width < MOBILE_BREAKPOINT
}

/// What to do when the finger lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The drag went past the threshold: close the drawer.
    Commit,
    /// Return the panel to its resting position.
    SnapBack,
}

/// Raw drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    /// A finger is down on the handle.
    pub active: bool,
    /// Vertical position where the drag started.
    pub start_y: f32,
    /// Most recent vertical position.
    pub current_y: f32,
    /// Whether the viewport was mobile when the drag started.
    pub started_mobile: bool,
}

impl DragState {
    /// Downward distance travelled, clamped at zero.
    #[inline]
    pub fn delta(&self) -> f32 {
        (self.current_y - self.start_y).max(0.0)
    }
}

/// Tracks a single swipe-to-close drag.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    drag: DragState,
    threshold: f32,
}

impl GestureTracker {
    /// Create a tracker that commits drags longer than `swipe_threshold` pixels.
    pub fn new(swipe_threshold: u32) -> Self {
        Self {
            drag: DragState::default(),
            threshold: swipe_threshold as f32,
        }
    }

    /// The raw drag state.
    #[inline]
    pub fn state(&self) -> DragState {
        self.drag
    }

    /// Whether a drag is in progress.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Current visual offset. Zero when not dragging.
    #[inline]
    pub fn offset(&self) -> f32 {
        if self.drag.active { self.drag.delta() } else { 0.0 }
    }

    /// Start a drag at vertical position `y`.
    ///
    /// `viewport_width` is recorded so that a later resize across the
    /// mobile breakpoint can cancel the drag.
    pub fn begin(&mut self, y: f32, viewport_width: f32) {
        self.drag = DragState {
            active: true,
            start_y: y,
            current_y: y,
            started_mobile: is_mobile(viewport_width),
        };
        tracing::trace!(target: targets::GESTURE, y, "drag started");
    }

    /// Record a move sample and return the new offset.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn update(&mut self, y: f32) -> Option<f32> {
        if !self.drag.active {
            tracing::trace!(target: targets::GESTURE, y, "move without start ignored");
            return None;
        }
        self.drag.current_y = y;
        Some(self.drag.delta())
    }

    /// Finish the drag.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn release(&mut self) -> Option<Release> {
        if !self.drag.active {
            return None;
        }
        let delta = self.drag.delta();
        self.drag = DragState::default();

        let decision = if delta > self.threshold {
            Release::Commit
        } else {
            Release::SnapBack
        };
        tracing::trace!(target: targets::GESTURE, delta, ?decision, "drag released");
        Some(decision)
    }

    /// Abandon the drag. Returns `true` if one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.drag.active;
        self.drag = DragState::default();
        was_active
    }

    /// React to a viewport resize.
    ///
    /// Cancels the drag and returns `true` if the new width lies on the other
    /// side of the mobile breakpoint from where the drag started.
    pub fn viewport_changed(&mut self, width: f32) -> bool {
        if self.drag.active && is_mobile(width) != self.drag.started_mobile {
            tracing::debug!(target: targets::GESTURE, width, "viewport crossed breakpoint, drag cancelled");
            self.cancel()
        } else {
            false
        }
    }
}

/// Whether a touch at (`target`, `y`) grabs the drawer rooted at `drawer`.
///
/// The touch counts if `target` is, or sits inside, a [`DrawerRole::Handle`]
/// element of the drawer, or if `y` falls inside the header band measured
/// from the panel's top edge. The panel is the drawer's first
/// [`DrawerRole::Panel`] descendant, or the drawer node itself.
pub fn hits_handle<D: HostDocument + ?Sized>(
    doc: &D,
    drawer: NodeId,
    target: NodeId,
    y: f32,
) -> bool {
    if !doc.is_within(target, drawer) {
        return false;
    }

    let mut current = Some(target);
    while let Some(node) = current {
        if doc
            .element(node)
            .is_some_and(|e| e.role == Some(DrawerRole::Handle))
        {
            return true;
        }
        if node == drawer {
            break;
        }
        current = doc.parent(node);
    }

    let panel = doc
        .descendants(drawer)
        .into_iter()
        .find(|&n| doc.element(n).is_some_and(|e| e.role == Some(DrawerRole::Panel)))
        .unwrap_or(drawer);
    let Some(top) = doc.element(panel).map(|e| e.top) else {
        return false;
    };
    y >= top && y - top < HEADER_BAND_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_drawer_core::{Document, Element, ElementKind};

    const PHONE: f32 = 390.0;
    const DESKTOP: f32 = 1280.0;

    #[test]
    fn test_threshold_decision() {
        let mut tracker = GestureTracker::new(100);

        tracker.begin(100.0, PHONE);
        tracker.update(250.0);
        assert_eq!(tracker.release(), Some(Release::Commit));

        tracker.begin(100.0, PHONE);
        tracker.update(150.0);
        assert_eq!(tracker.release(), Some(Release::SnapBack));

        // Exactly at the threshold does not commit.
        tracker.begin(0.0, PHONE);
        tracker.update(100.0);
        assert_eq!(tracker.release(), Some(Release::SnapBack));
    }

    #[test]
    fn test_upward_motion_clamped() {
        let mut tracker = GestureTracker::new(100);
        tracker.begin(300.0, PHONE);
        assert_eq!(tracker.update(120.0), Some(0.0));
        assert_eq!(tracker.offset(), 0.0);
        assert_eq!(tracker.update(330.0), Some(30.0));
        assert_eq!(tracker.offset(), 30.0);
    }

    #[test]
    fn test_out_of_order_samples_ignored() {
        let mut tracker = GestureTracker::new(100);
        assert_eq!(tracker.update(50.0), None);
        assert_eq!(tracker.release(), None);
        assert!(!tracker.cancel());
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.offset(), 0.0);
    }

    #[test]
    fn test_resize_across_breakpoint_cancels() {
        let mut tracker = GestureTracker::new(100);
        tracker.begin(0.0, PHONE);
        tracker.update(40.0);

        assert!(!tracker.viewport_changed(500.0));
        assert!(tracker.is_dragging());

        assert!(tracker.viewport_changed(DESKTOP));
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.offset(), 0.0);
        assert!(!tracker.viewport_changed(PHONE));
    }

    #[test]
    fn test_mobile_breakpoint() {
        assert!(is_mobile(767.0));
        assert!(!is_mobile(768.0));
        assert!(!is_mobile(DESKTOP));
    }

    #[test]
    fn test_hits_handle() {
        let mut doc = Document::new();
        let drawer = doc.append(doc.root(), Element::default());
        let panel = doc.append(drawer, Element::default().with_role(DrawerRole::Panel).with_top(400.0));
        let handle = doc.append(panel, Element::default().with_role(DrawerRole::Handle).with_top(400.0));
        let grip = doc.append(handle, Element::default().with_top(405.0));
        let body = doc.append(panel, Element::new(ElementKind::Button).with_top(600.0));
        let outside = doc.append(doc.root(), Element::default());

        // On the handle, regardless of height.
        assert!(hits_handle(&doc, drawer, grip, 900.0));
        // Off the handle but inside the header band.
        assert!(hits_handle(&doc, drawer, body, 430.0));
        // Below the header band.
        assert!(!hits_handle(&doc, drawer, body, 470.0));
        // Above the panel.
        assert!(!hits_handle(&doc, drawer, body, 390.0));
        // Outside the drawer entirely.
        assert!(!hits_handle(&doc, drawer, outside, 410.0));
    }
}
