//! Horizon Drawer - a sliding panel widget with gesture, keyboard and focus handling.
//!
//! A drawer is a panel that slides over a host document. This crate is the
//! interaction state machine behind it: it reconciles programmatic
//! show/hide, swipe-to-close drags and keyboard input into one consistent
//! visual and focus state per drawer, keeps at most one drawer open at a
//! time, and binds at most one drawer to each document node.
//!
//! The crate never touches a platform directly. It reads and writes the
//! host through [`HostDocument`]; [`Document`] is an in-memory
//! implementation for tests and headless hosts.
//!
//! # Example
//!
//! ```
//! use horizon_drawer::{
//!     ChangeReason, Document, DrawerConfig, DrawerEventKind, DrawerState, Drawers, Element,
//!     ElementKind, HostDocument, InputEvent, Key, Verdict,
//! };
//! use std::time::Duration;
//!
//! let mut doc = Document::new();
//! let trigger = doc.append(doc.root(), Element::new(ElementKind::Button));
//! let cart = doc.append(doc.root(), Element::default().with_id("cart"));
//! let checkout = doc.append(cart, Element::new(ElementKind::Button));
//! doc.focus(trigger);
//!
//! let mut drawers = Drawers::new(doc);
//! let id = drawers
//!     .get_or_create_by_id("cart", DrawerConfig::builder().animation_duration(200))
//!     .unwrap();
//!
//! // Keep the drawer open while a checkout is in progress.
//! drawers.on(|event| {
//!     if event.kind == DrawerEventKind::Hide && event.reason == ChangeReason::Backdrop {
//!         Verdict::Cancel
//!     } else {
//!         Verdict::Proceed
//!     }
//! });
//!
//! drawers.show(id);
//! drawers.advance(Duration::from_millis(200));
//! assert_eq!(drawers.state(id), Some(DrawerState::Shown));
//! assert_eq!(drawers.document().focused(), Some(checkout));
//!
//! drawers.dispatch_input(InputEvent::KeyDown { key: Key::Escape, shift: false, target: None });
//! drawers.advance(Duration::from_millis(200));
//! assert_eq!(drawers.state(id), Some(DrawerState::Hidden));
//! assert_eq!(drawers.document().focused(), Some(trigger));
//! ```

pub mod config;
pub mod drawer;
pub mod event;
pub mod focus;
pub mod gesture;
mod registry;
pub mod router;


pub use config::{DrawerConfig, DrawerOptions};
pub use drawer::{DrawerId, DrawerInstance, DrawerState};
pub use event::{
    ChangeReason, DrawerEvent, DrawerEventKind, InputEvent, InputOutcome, Key, SubmitEvent,
};
pub use registry::Drawers;

pub use horizon_drawer_core::{
    Dispatch, Document, DrawerRole, Element, ElementKind, Error, HostDocument, InputType,
    ListenerId, NodeId, Result, Verdict, VisualState,
};
