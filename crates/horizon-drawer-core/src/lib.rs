//! Core systems for Horizon Drawer.
//!
//! This crate provides the host-independent building blocks the drawer
//! widget is assembled from:
//!
//! - **Host Document**: [`HostDocument`], the query/command seam to the
//!   platform, plus the in-memory [`Document`]
//! - **Scheduler**: deferred completions with cancelable [`TaskToken`]s
//! - **Notifications**: listener lists whose dispatch reports cancellation
//! - **Errors**: the [`Error`] taxonomy shared by the workspace
//! - **Logging**: `tracing` target names and document tree visualization
//!
//! Nothing here knows what a drawer is; the `horizon-drawer` crate builds
//! the state machine on top.
//!
//! # Example
//!
//! ```
//! use horizon_drawer_core::{Notifier, Scheduler, Verdict};
//! use std::time::Duration;
//!
//! let mut before_open = Notifier::<u32>::new();
//! before_open.connect(|_| Verdict::Proceed);
//!
//! let mut scheduler = Scheduler::new();
//! if !before_open.dispatch_cancelable(&1).cancelled {
//!     scheduler.schedule(Duration::from_millis(300), "opened");
//! }
//! assert_eq!(scheduler.advance(Duration::from_millis(300)), vec!["opened"]);
//! ```

pub mod document;
mod error;
pub mod logging;
pub mod notify;
pub mod scheduler;

pub use document::{
    Document, DrawerRole, Element, ElementKind, HostDocument, InputType, NodeId, VisualState,
};
pub use error::{Error, Result};
pub use notify::{Dispatch, ListenerId, Notifier, Verdict};
pub use scheduler::{Scheduler, TaskToken};
