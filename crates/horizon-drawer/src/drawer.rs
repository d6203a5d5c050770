//! Per-drawer state.
//!
//! A [`DrawerInstance`] is everything one drawer owns exclusively: its
//! lifecycle state, configuration snapshot, drag and focus sub-state, pending
//! deferred tasks, input subscriptions and listeners. Instances live inside
//! a [`Drawers`](crate::Drawers) registry, which is the only thing that
//! drives their transitions.

use horizon_drawer_core::{ListenerId, NodeId, Notifier, TaskToken, Verdict, VisualState};
use slotmap::new_key_type;

use crate::config::DrawerConfig;
use crate::event::{ChangeReason, DrawerEvent, SubmitEvent};
use crate::focus::FocusManager;
use crate::gesture::GestureTracker;
use crate::router::SubscriptionId;

new_key_type! {
    /// Handle to a drawer inside a [`Drawers`](crate::Drawers) registry.
    ///
    /// Handles are versioned: once a drawer is disposed its handle never
    /// resolves again, even if the slot is reused.
    pub struct DrawerId;
}

/// Lifecycle state of a drawer.
///
/// ```text
///            show()                 duration
///  Hidden ───────────▶ Showing ──────────────▶ Shown
///    ▲                                           │
///    │     duration                 hide()       │
///    └─────────────── Hiding ◀───────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawerState {
    /// Closed and at rest.
    #[default]
    Hidden,
    /// Opening; the transition has not finished yet.
    Showing,
    /// Open and at rest.
    Shown,
    /// Closing; the transition has not finished yet.
    Hiding,
}

impl DrawerState {
    /// Whether a transition is in flight.
    #[inline]
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Showing | Self::Hiding)
    }

    /// Whether the drawer is open or opening.
    #[inline]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Showing | Self::Shown)
    }
}

pub(crate) type SubmitCallback = Box<dyn FnMut(&SubmitEvent) + Send>;

/// Deferred tasks a drawer may have pending.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PendingTasks {
    pub transition: Option<TaskToken>,
    pub autofocus: Option<TaskToken>,
    pub load: Option<TaskToken>,
}

impl PendingTasks {
    /// Take every pending token, leaving none behind.
    pub fn drain(&mut self) -> Vec<TaskToken> {
        [
            self.transition.take(),
            self.autofocus.take(),
            self.load.take(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A single drawer bound to a document node.
pub struct DrawerInstance {
    pub(crate) node: NodeId,
    pub(crate) identifier: String,
    pub(crate) config: DrawerConfig,
    pub(crate) state: DrawerState,
    pub(crate) reason: ChangeReason,
    pub(crate) visual: VisualState,
    pub(crate) gesture: GestureTracker,
    pub(crate) focus: FocusManager,
    pub(crate) pending: PendingTasks,
    pub(crate) subscriptions: Vec<SubscriptionId>,
    pub(crate) listeners: Notifier<DrawerEvent>,
    pub(crate) form: Option<NodeId>,
    pub(crate) on_submit: Option<SubmitCallback>,
}

impl DrawerInstance {
    pub(crate) fn new(node: NodeId, identifier: String, config: DrawerConfig) -> Self {
        Self {
            node,
            identifier,
            config,
            state: DrawerState::Hidden,
            reason: ChangeReason::default(),
            visual: VisualState::HIDDEN,
            gesture: GestureTracker::new(config.swipe_threshold),
            focus: FocusManager::new(),
            pending: PendingTasks::default(),
            subscriptions: Vec::new(),
            listeners: Notifier::new(),
            form: None,
            on_submit: None,
        }
    }

    /// The document node this drawer is bound to.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Stable identifier: the node's `id` attribute, or a generated one.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The configuration snapshot taken at construction.
    #[inline]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> DrawerState {
        self.state
    }

    /// Whether a transition is in flight.
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// The styling most recently applied to the node.
    #[inline]
    pub fn visual(&self) -> VisualState {
        self.visual
    }

    /// Swipe gesture state.
    #[inline]
    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    /// Focus sub-state.
    #[inline]
    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// Whether a form-submit callback is attached.
    #[inline]
    pub fn has_submit_handler(&self) -> bool {
        self.on_submit.is_some()
    }

    pub(crate) fn connect<F, V>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&DrawerEvent) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.listeners.connect(listener)
    }
}

impl std::fmt::Debug for DrawerInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerInstance")
            .field("node", &self.node)
            .field("identifier", &self.identifier)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("reason", &self.reason)
            .field("visual", &self.visual)
            .field("gesture", &self.gesture)
            .field("focus", &self.focus)
            .field("subscriptions", &self.subscriptions.len())
            .field("listeners", &self.listeners)
            .field("form", &self.form)
            .field("has_submit_handler", &self.on_submit.is_some())
            .finish()
    }
}
