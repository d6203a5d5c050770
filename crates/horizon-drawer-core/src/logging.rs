//! Logging and debugging facilities for Horizon Drawer.
//!
//! This module provides:
//! - Target names for filtering the crate's `tracing` output
//! - Debug visualization for host document subtrees
//!
//! # Tracing Integration
//!
//! Horizon Drawer uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_drawer=debug")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use horizon_drawer_core::{Document, Element, ElementKind};
//! use horizon_drawer_core::logging::DocumentTreeDebug;
//!
//! let mut doc = Document::new();
//! let menu = doc.append(doc.root(), Element::default().with_id("menu"));
//! doc.append(menu, Element::new(ElementKind::Button));
//!
//! let output = DocumentTreeDebug::new().format_subtree(&doc, menu);
//! assert!(output.contains("#menu"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::document::{ElementKind, HostDocument, NodeId};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_drawer_core";
    /// Deferred task scheduler target.
    pub const SCHEDULER: &str = "horizon_drawer_core::scheduler";
    /// Notification dispatch target.
    pub const NOTIFY: &str = "horizon_drawer_core::notify";
    /// Drawer lifecycle transitions.
    pub const STATE: &str = "horizon_drawer::state";
    /// Registry bookkeeping (construction, disposal, active slot).
    pub const REGISTRY: &str = "horizon_drawer::registry";
    /// Swipe-to-close gesture tracking.
    pub const GESTURE: &str = "horizon_drawer::gesture";
    /// Focus capture, restoration and trapping.
    pub const FOCUS: &str = "horizon_drawer::focus";
    /// Input routing.
    pub const INPUT: &str = "horizon_drawer::input";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for document tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show attributes.
    pub show_attributes: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_attributes: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_attributes: true,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing a host document subtree.
#[derive(Debug, Clone, Default)]
pub struct DocumentTreeDebug {
    options: TreeFormatOptions,
}

impl DocumentTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree<D: HostDocument + ?Sized>(&self, doc: &D, root: NodeId) -> String {
        let mut output = String::new();
        self.format_into(doc, root, 0, true, &mut output);
        output
    }

    fn format_into<D: HostDocument + ?Sized>(
        &self,
        doc: &D,
        node: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(element) = doc.element(node) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(kind_label(&element.kind));
        if let Some(id) = &element.id {
            let _ = write!(output, " #{id}");
        }
        if let Some(role) = element.role {
            let _ = write!(output, " <{role:?}>");
        }
        if element.disabled {
            output.push_str(" disabled");
        }
        if let Some(tab_index) = element.tab_index {
            let _ = write!(output, " tabindex={tab_index}");
        }
        if doc.focused() == Some(node) {
            output.push_str(" *focused*");
        }
        if self.options.show_ids {
            let _ = write!(output, " [{node:?}]");
        }
        if self.options.show_attributes {
            for (name, value) in &element.attributes {
                let _ = write!(output, " {name}=\"{value}\"");
            }
        }
        output.push('\n');

        let children = doc.children(node);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(doc, child, depth + 1, i + 1 == count, output);
        }
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
        };

        let mut prefix = branch.repeat(depth - 1);
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

fn kind_label(kind: &ElementKind) -> &'static str {
    match kind {
        ElementKind::Generic => "div",
        ElementKind::Button => "button",
        ElementKind::Input(_) => "input",
        ElementKind::Select => "select",
        ElementKind::TextArea => "textarea",
        ElementKind::Anchor { .. } => "a",
        ElementKind::Form => "form",
    }
}
