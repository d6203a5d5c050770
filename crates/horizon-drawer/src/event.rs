//! Lifecycle notifications and input events.
//!
//! Two kinds of events flow through a drawer:
//!
//! - **Lifecycle notifications** ([`DrawerEvent`]) flow out to listeners.
//!   `Show` and `Hide` are dispatched before the state changes and can be
//!   cancelled; `Shown` and `Hidden` report a finished transition.
//! - **Input events** ([`InputEvent`]) flow in from the host, which feeds
//!   pointer, touch, keyboard and viewport activity through
//!   [`Drawers::dispatch_input`](crate::Drawers::dispatch_input).

use horizon_drawer_core::NodeId;

use crate::drawer::DrawerId;

/// The four lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerEventKind {
    /// About to open. Cancelable.
    Show,
    /// Finished opening.
    Shown,
    /// About to close. Cancelable.
    Hide,
    /// Finished closing.
    Hidden,
}

impl DrawerEventKind {
    /// Whether listeners may cancel this notification.
    #[inline]
    pub fn is_cancelable(self) -> bool {
        matches!(self, Self::Show | Self::Hide)
    }

    /// Conventional event name, as used by DOM-style hosts.
    pub fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Shown => "shown",
            Self::Hide => "hide",
            Self::Hidden => "hidden",
        }
    }
}

/// What caused a drawer to open or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeReason {
    /// A direct call to `show`, `hide` or `toggle`.
    #[default]
    Api,
    /// Another drawer is opening and this one had to make room.
    Replaced,
    /// [`Drawers::close_all`](crate::Drawers::close_all).
    CloseAll,
    /// The Escape key.
    Keyboard,
    /// A click on the overlay outside the panel.
    Backdrop,
    /// A click on a dismiss control.
    Dismiss,
    /// A downward swipe past the threshold.
    Swipe,
    /// The `show_on_load` option.
    Load,
}

/// A lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerEvent {
    /// Which notification this is.
    pub kind: DrawerEventKind,
    /// The drawer the notification is about.
    pub drawer: DrawerId,
    /// The drawer's stable identifier.
    pub identifier: String,
    /// The registry's active slot at the moment of dispatch.
    pub active: Option<DrawerId>,
    /// Detail payload: what triggered the change.
    pub reason: ChangeReason,
}

impl DrawerEvent {
    /// Whether listeners may cancel this notification.
    #[inline]
    pub fn is_cancelable(&self) -> bool {
        self.kind.is_cancelable()
    }
}

/// Keys the drawer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    /// Any other key.
    Other,
}

/// Raw input fed to the registry by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer click on `target`.
    Click { target: NodeId },
    /// A key press. `target` is the focused node, if any.
    KeyDown {
        key: Key,
        shift: bool,
        target: Option<NodeId>,
    },
    /// A finger touched `target` at viewport height `y`.
    TouchStart { target: NodeId, y: f32 },
    /// The finger moved to viewport height `y`.
    TouchMove { y: f32 },
    /// The finger lifted.
    TouchEnd,
    /// The platform aborted the touch.
    TouchCancel,
    /// The viewport was resized.
    Resize { width: f32 },
    /// A form was submitted.
    Submit { form: NodeId },
    /// The host document finished loading.
    DocumentReady,
}

/// How the registry dealt with an [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// At least one drawer acted on the event.
    pub handled: bool,
    /// The host should suppress the platform's default behavior
    /// (scrolling for touch moves, focus movement for Tab, form navigation).
    pub prevent_default: bool,
}

impl InputOutcome {
    /// Nothing happened.
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    /// Acted on, default behavior allowed.
    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };

    /// Acted on, default behavior suppressed.
    pub const CONSUMED: Self = Self {
        handled: true,
        prevent_default: true,
    };

    /// Combine outcomes from several drawers.
    pub fn merge(self, other: InputOutcome) -> InputOutcome {
        InputOutcome {
            handled: self.handled || other.handled,
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}

/// Passed to a drawer's form-submit callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitEvent {
    /// The drawer containing the form.
    pub drawer: DrawerId,
    /// The submitted form.
    pub form: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelable_kinds() {
        assert!(DrawerEventKind::Show.is_cancelable());
        assert!(DrawerEventKind::Hide.is_cancelable());
        assert!(!DrawerEventKind::Shown.is_cancelable());
        assert!(!DrawerEventKind::Hidden.is_cancelable());
        assert_eq!(DrawerEventKind::Hidden.name(), "hidden");
    }

    #[test]
    fn test_outcome_merge() {
        assert_eq!(
            InputOutcome::IGNORED.merge(InputOutcome::HANDLED),
            InputOutcome::HANDLED
        );
        assert_eq!(
            InputOutcome::HANDLED.merge(InputOutcome::CONSUMED),
            InputOutcome::CONSUMED
        );
    }
}
