//! Host document model.
//!
//! The drawer never touches a real document directly. It asks questions and
//! issues commands through [`HostDocument`], and the host translates those
//! into whatever its platform needs (DOM calls, a retained widget tree, a
//! test fixture). Elements are described semantically by [`Element`]: what
//! kind of control it is, whether it is disabled, its explicit tab order, and
//! which drawer role (if any) it plays.
//!
//! [`Document`] is a complete in-memory implementation. It backs the test
//! suites and is a reasonable starting point for headless hosts.
//!
//! # Example
//!
//! ```
//! use horizon_drawer_core::{Document, DrawerRole, Element, ElementKind, HostDocument};
//!
//! let mut doc = Document::new();
//! let drawer = doc.append(doc.root(), Element::new(ElementKind::Generic).with_id("menu"));
//! let close = doc.append(drawer, Element::new(ElementKind::Button).with_role(DrawerRole::Dismiss));
//!
//! assert_eq!(doc.find_by_id("menu"), Some(drawer));
//! assert!(doc.is_within(close, drawer));
//! ```

use std::collections::BTreeMap;

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identity of a node in the host document.
    pub struct NodeId;
}

/// The `type` of an input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Search,
    Checkbox,
    Radio,
    Submit,
    /// Hidden inputs never take focus.
    Hidden,
}

/// What kind of element a node is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// A non-interactive container.
    #[default]
    Generic,
    Button,
    Input(InputType),
    Select,
    TextArea,
    /// A hyperlink. Only anchors with a target are interactive.
    Anchor { href: Option<String> },
    Form,
}

impl ElementKind {
    /// Whether this kind of element is natively interactive.
    pub fn is_interactive(&self) -> bool {
        match self {
            Self::Button | Self::Select | Self::TextArea => true,
            Self::Input(ty) => *ty != InputType::Hidden,
            Self::Anchor { href } => href.is_some(),
            Self::Generic | Self::Form => false,
        }
    }
}

/// The part an element plays inside a drawer's markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerRole {
    /// The sliding panel itself. Its top edge anchors the header band.
    Panel,
    /// The grab handle that starts a swipe-to-close gesture.
    Handle,
    /// A control that closes the drawer when activated.
    Dismiss,
}

/// Semantic description of a document element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// The element kind.
    pub kind: ElementKind,
    /// The element's `id` attribute.
    pub id: Option<String>,
    /// Additional attributes, such as `data-*` option overrides.
    pub attributes: BTreeMap<String, String>,
    /// The drawer role this element plays, if any.
    pub role: Option<DrawerRole>,
    /// Whether the element is disabled.
    pub disabled: bool,
    /// Explicit tab order. Negative values remove the element from tab navigation.
    pub tab_index: Option<i32>,
    /// Top edge in viewport coordinates, in pixels.
    pub top: f32,
}

impl Element {
    /// Create an element of the given kind.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the `id` attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the drawer role.
    pub fn with_role(mut self, role: DrawerRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Mark the element disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set an explicit tab order.
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Set the top edge position.
    pub fn with_top(mut self, top: f32) -> Self {
        self.top = top;
        self
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether focus can be moved to this element at all.
    ///
    /// This is broader than tab navigation: an element with `tab_index = -1`
    /// can still be focused programmatically.
    pub fn accepts_focus(&self) -> bool {
        if self.disabled {
            return false;
        }
        self.kind.is_interactive() || self.tab_index.is_some()
    }
}

/// Styling state the drawer asks the host to apply to its node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Whether the drawer is styled as open.
    pub visible: bool,
    /// Vertical drag offset, in pixels.
    pub offset_y: f32,
    /// Whether style changes animate. Disabled while a finger drags the panel.
    pub transition_enabled: bool,
}

impl VisualState {
    /// Closed, at rest.
    pub const HIDDEN: Self = Self {
        visible: false,
        offset_y: 0.0,
        transition_enabled: true,
    };

    /// Open, at rest.
    pub const SHOWN: Self = Self {
        visible: true,
        offset_y: 0.0,
        transition_enabled: true,
    };
}

impl Default for VisualState {
    fn default() -> Self {
        Self::HIDDEN
    }
}

/// Access to the host document.
///
/// Implementors answer structural queries and carry out focus and styling
/// commands. All methods must tolerate ids of nodes that no longer exist.
pub trait HostDocument {
    /// The element for `node`, or `None` if the node is not attached.
    fn element(&self, node: NodeId) -> Option<&Element>;

    /// The parent of `node`.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node`, in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Find an attached node by its `id` attribute.
    fn find_by_id(&self, id: &str) -> Option<NodeId>;

    /// The currently focused node.
    fn focused(&self) -> Option<NodeId>;

    /// Move focus to `node`. Returns `false` if the node cannot take focus.
    fn focus(&mut self, node: NodeId) -> bool;

    /// Current viewport width, in pixels.
    fn viewport_width(&self) -> f32;

    /// Whether the document has finished loading.
    fn is_ready(&self) -> bool;

    /// Apply drawer styling to `node`.
    fn apply_visual(&mut self, node: NodeId, visual: VisualState);

    /// Whether `node` is attached to the document.
    fn contains(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All descendants of `root` in depth-first pre-order, excluding `root`.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        order
    }
}

#[derive(Debug)]
struct NodeData {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visual: VisualState,
}

/// An in-memory host document.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    focused: Option<NodeId>,
    viewport_width: f32,
    ready: bool,
}

/// Viewport width of a freshly created [`Document`].
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;

impl Document {
    /// Create a loaded document with an empty body and a desktop-sized viewport.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData {
            element: Element::default(),
            parent: None,
            children: Vec::new(),
            visual: VisualState::default(),
        });
        Self {
            nodes,
            root,
            focused: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            ready: true,
        }
    }

    /// The body node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append an element as the last child of `parent`.
    ///
    /// If `parent` is not in the document the element is dropped and the
    /// returned handle never resolves.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.nodes.insert(NodeData {
            element,
            parent: Some(parent),
            children: Vec::new(),
            visual: VisualState::default(),
        });
        match self.nodes.get_mut(parent) {
            Some(data) => data.children.push(id),
            None => {
                self.nodes.remove(id);
                tracing::trace!(target: targets::CORE, ?parent, "append under missing parent dropped");
            }
        }
        id
    }

    /// Remove `node` and its subtree. Focus inside the subtree is dropped.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.root || !self.nodes.contains_key(node) {
            return false;
        }

        if self.focused.is_some_and(|f| self.is_within(f, node)) {
            self.focused = None;
        }

        let mut subtree = self.descendants(node);
        subtree.push(node);

        if let Some(parent) = self.nodes.get(node).and_then(|d| d.parent) {
            if let Some(data) = self.nodes.get_mut(parent) {
                data.children.retain(|&c| c != node);
            }
        }
        for id in subtree {
            self.nodes.remove(id);
        }
        true
    }

    /// Mutable access to an element.
    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node).map(|d| &mut d.element)
    }

    /// The styling last applied to `node`.
    pub fn visual(&self, node: NodeId) -> Option<VisualState> {
        self.nodes.get(node).map(|d| d.visual)
    }

    /// Drop focus entirely.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Resize the viewport.
    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    /// Mark the document as loaded or still loading.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of attached nodes, including the body.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document has at least its body.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDocument for Document {
    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).map(|d| &d.element)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|d| d.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&node| {
                self.element(node)
                    .and_then(|e| e.id.as_deref())
                    .is_some_and(|candidate| candidate == id)
            })
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if self.element(node).is_some_and(Element::accepts_focus) {
            self.focused = Some(node);
            true
        } else {
            false
        }
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn apply_visual(&mut self, node: NodeId, visual: VisualState) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.visual = visual;
        }
    }
}

static_assertions::assert_impl_all!(Document: Send, Sync);
