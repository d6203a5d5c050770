//! Input subscriptions.
//!
//! A drawer only sees the input channels it subscribed to. Each subscription
//! is an explicit [`SubscriptionId`] handle that the drawer stores and hands
//! back on disposal, so tearing a drawer down never depends on finding its
//! callbacks again by identity.

use slotmap::{SlotMap, new_key_type};

use crate::drawer::DrawerId;
use crate::event::InputEvent;

new_key_type! {
    /// Handle to an input subscription.
    pub struct SubscriptionId;
}

/// The input channels a drawer can listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    /// Clicks (backdrop and dismiss controls).
    Pointer,
    /// Key presses (Escape, Tab trap).
    Keyboard,
    /// Touch start/move/end/cancel.
    Touch,
    /// Viewport resizes.
    Viewport,
    /// Form submissions.
    Form,
    /// The document-ready signal.
    Load,
}

impl InputChannel {
    /// The channel an input event is delivered on.
    pub fn of(event: &InputEvent) -> Self {
        match event {
            InputEvent::Click { .. } => Self::Pointer,
            InputEvent::KeyDown { .. } => Self::Keyboard,
            InputEvent::TouchStart { .. }
            | InputEvent::TouchMove { .. }
            | InputEvent::TouchEnd
            | InputEvent::TouchCancel => Self::Touch,
            InputEvent::Resize { .. } => Self::Viewport,
            InputEvent::Submit { .. } => Self::Form,
            InputEvent::DocumentReady => Self::Load,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Subscription {
    drawer: DrawerId,
    channel: InputChannel,
}

/// Routes input channels to subscribed drawers.
#[derive(Debug, Default)]
pub struct InputRouter {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
}

impl InputRouter {
    /// Create a router with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `drawer` to `channel`.
    pub fn subscribe(&mut self, drawer: DrawerId, channel: InputChannel) -> SubscriptionId {
        self.subscriptions.insert(Subscription { drawer, channel })
    }

    /// Drop a subscription. Returns `true` if it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    /// The channel of a live subscription.
    pub fn channel(&self, id: SubscriptionId) -> Option<InputChannel> {
        self.subscriptions.get(id).map(|s| s.channel)
    }

    /// Drawers subscribed to `channel`, with their subscription handles.
    pub fn subscribers(&self, channel: InputChannel) -> Vec<(SubscriptionId, DrawerId)> {
        self.subscriptions
            .iter()
            .filter(|(_, s)| s.channel == channel)
            .map(|(id, s)| (id, s.drawer))
            .collect()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether there are no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
