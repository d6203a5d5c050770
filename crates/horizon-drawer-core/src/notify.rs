//! Listener lists with cancelable dispatch.
//!
//! A [`Notifier`] is a simplified, single-threaded cousin of a signal: each
//! connected listener receives the event by reference and answers with a
//! [`Verdict`]. Dispatching returns a [`Dispatch`] that reports whether any
//! listener asked to cancel, so the cancellation contract is an ordinary
//! return value instead of a flag mutated on the event.
//!
//! # Example
//!
//! ```
//! use horizon_drawer_core::{Notifier, Verdict};
//!
//! let mut opening = Notifier::<&str>::new();
//! let id = opening.connect(|name| {
//!     if *name == "locked" { Verdict::Cancel } else { Verdict::Proceed }
//! });
//!
//! assert!(!opening.dispatch_cancelable(&"menu").cancelled);
//! assert!(opening.dispatch_cancelable(&"locked").cancelled);
//!
//! opening.disconnect(id);
//! assert!(!opening.dispatch_cancelable(&"locked").cancelled);
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies a connected listener.
    ///
    /// Returned by [`Notifier::connect`] and consumed by [`Notifier::disconnect`].
    pub struct ListenerId;
}

/// A listener's answer to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// Let the operation continue.
    #[default]
    Proceed,
    /// Ask for the operation to be abandoned.
    ///
    /// Only honoured by cancelable dispatches.
    Cancel,
}

impl From<bool> for Verdict {
    /// `true` means "proceed", mirroring a DOM handler's return value.
    fn from(proceed: bool) -> Self {
        if proceed { Self::Proceed } else { Self::Cancel }
    }
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Self::Proceed
    }
}

/// Outcome of dispatching a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Whether a listener cancelled the notification.
    ///
    /// Always `false` for non-cancelable dispatches.
    pub cancelled: bool,
    /// Number of listeners that received the notification.
    pub delivered: usize,
}

impl Dispatch {
    /// Combine two dispatch results for the same notification.
    pub fn merge(self, other: Dispatch) -> Dispatch {
        Dispatch {
            cancelled: self.cancelled || other.cancelled,
            delivered: self.delivered + other.delivered,
        }
    }
}

type Listener<E> = Box<dyn Fn(&E) -> Verdict + Send + Sync>;

/// An ordered set of listeners for events of type `E`.
pub struct Notifier<E> {
    listeners: SlotMap<ListenerId, Listener<E>>,
}

impl<E> Notifier<E> {
    /// Create a notifier with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
        }
    }

    /// Connect a listener.
    ///
    /// The closure may return a [`Verdict`], a `bool` (`false` cancels) or `()`.
    pub fn connect<F, V>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&E) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.listeners
            .insert(Box::new(move |event| listener(event).into()))
    }

    /// Disconnect a listener by id.
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Disconnect every listener.
    pub fn disconnect_all(&mut self) {
        self.listeners.clear();
    }

    /// Number of connected listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver a notification that cannot be cancelled.
    ///
    /// Listener verdicts are ignored.
    pub fn dispatch(&self, event: &E) -> Dispatch {
        let mut result = self.deliver(event);
        result.cancelled = false;
        result
    }

    /// Deliver a cancelable notification.
    ///
    /// Every listener runs, even after one has cancelled; the result is
    /// cancelled if any of them returned [`Verdict::Cancel`].
    pub fn dispatch_cancelable(&self, event: &E) -> Dispatch {
        self.deliver(event)
    }

    fn deliver(&self, event: &E) -> Dispatch {
        let mut result = Dispatch::default();
        for (_, listener) in self.listeners.iter() {
            if listener(event) == Verdict::Cancel {
                result.cancelled = true;
            }
            result.delivered += 1;
        }
        tracing::trace!(
            target: targets::NOTIFY,
            delivered = result.delivered,
            cancelled = result.cancelled,
            "notification delivered"
        );
        result
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Notifier<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_dispatch_reaches_all_listeners() {
        let mut notifier = Notifier::<i32>::new();
        let sum = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let sum = sum.clone();
            notifier.connect(move |n: &i32| {
                sum.fetch_add(*n as usize, Ordering::SeqCst);
            });
        }

        let result = notifier.dispatch(&5);
        assert_eq!(result.delivered, 3);
        assert!(!result.cancelled);
        assert_eq!(sum.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn test_cancel_is_ignored_when_not_cancelable() {
        let mut notifier = Notifier::<()>::new();
        notifier.connect(|_| Verdict::Cancel);

        assert!(!notifier.dispatch(&()).cancelled);
        assert!(notifier.dispatch_cancelable(&()).cancelled);
    }

    #[test]
    fn test_cancel_still_runs_later_listeners() {
        let mut notifier = Notifier::<()>::new();
        let later = Arc::new(AtomicUsize::new(0));

        notifier.connect(|_| false);
        let later_clone = later.clone();
        notifier.connect(move |_| {
            later_clone.fetch_add(1, Ordering::SeqCst);
            true
        });

        let result = notifier.dispatch_cancelable(&());
        assert!(result.cancelled);
        assert_eq!(result.delivered, 2);
        assert_eq!(later.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect() {
        let mut notifier = Notifier::<()>::new();
        let id = notifier.connect(|_| Verdict::Cancel);
        assert_eq!(notifier.listener_count(), 1);

        assert!(notifier.disconnect(id));
        assert!(!notifier.disconnect(id));
        assert_eq!(notifier.listener_count(), 0);
        assert!(!notifier.dispatch_cancelable(&()).cancelled);

        notifier.connect(|_| ());
        notifier.connect(|_| ());
        notifier.disconnect_all();
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_merge() {
        let a = Dispatch {
            cancelled: false,
            delivered: 2,
        };
        let b = Dispatch {
            cancelled: true,
            delivered: 1,
        };
        assert_eq!(
            a.merge(b),
            Dispatch {
                cancelled: true,
                delivered: 3
            }
        );
    }
}
