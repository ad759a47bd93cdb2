//! Live tree nodes
//!
//!     Nodes are reference counted ([Handle]) with a weak back-pointer to their parent, the same
//!     shape `markup5ever_rcdom` uses. Unlike rcdom the node set also covers document fragments
//!     and CDATA sections, comments are mutable (the writer concatenates text into them) and
//!     elements carry the live state browsers keep outside the attribute list: the form value,
//!     legacy stylesheet text, nested frame documents and legacy pre-rendered markup.

use super::Dialect;
use crate::error::ConversionError;
use html5ever::{ns, Attribute, LocalName, QualName};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Reference to a DOM node.
pub type Handle = Rc<Node>;

/// Weak reference to a DOM node, used for parent pointers.
pub type WeakHandle = Weak<Node>;

/// The different kinds of nodes in the tree.
pub enum NodeData {
    /// The root of a parsed or freshly allocated document
    Document { dialect: Dialect },

    /// A list of siblings with no element identity
    Fragment,

    /// A `DOCTYPE`, with (possibly empty) public and system identifiers.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },

    Text { contents: RefCell<String> },

    CData { contents: RefCell<String> },

    Comment { contents: RefCell<String> },

    ProcessingInstruction { target: String, contents: String },

    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,
        state: ElementState,
    },
}

/// Live element state that is not reflected in the attribute list
#[derive(Default)]
pub struct ElementState {
    /// Form control value once set programmatically
    pub value: RefCell<Option<String>>,
    /// Legacy `styleSheet.cssText` of a `style` element
    pub style_sheet: RefCell<Option<String>>,
    /// Documents reachable from a `frame`/`iframe`
    pub frame: RefCell<FrameContent>,
    /// Legacy `.xml` property holding pre-rendered markup
    pub legacy_markup: RefCell<Option<String>>,
}

/// Where a frame exposes its nested document
#[derive(Default, Clone)]
pub struct FrameContent {
    pub content_document: Option<Handle>,
    pub window_document: Option<Handle>,
    pub legacy_document: Option<Handle>,
    /// Set when the nested document belongs to another origin
    pub cross_origin: bool,
}

impl FrameContent {
    /// The nested document, in `content_document`, `window_document`, `legacy_document` order
    pub fn document(&self) -> Result<Option<Handle>, ConversionError> {
        if self.cross_origin {
            return Err(ConversionError::AccessDenied(
                "blocked a frame from accessing a cross-origin document".to_string(),
            ));
        }
        Ok(self
            .content_document
            .as_ref()
            .or(self.window_document.as_ref())
            .or(self.legacy_document.as_ref())
            .cloned())
    }
}

/// A DOM node.
pub struct Node {
    /// Parent node.
    pub parent: Cell<Option<WeakHandle>>,
    /// Child nodes of this node.
    pub children: RefCell<Vec<Handle>>,
    /// Represents this node's data.
    pub data: NodeData,
}

impl Node {
    /// Create a new node from its contents
    pub fn new(data: NodeData) -> Handle {
        Rc::new(Node {
            data,
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    pub fn parent(&self) -> Option<Handle> {
        let weak = self.parent.take();
        let parent = weak.as_ref().and_then(Weak::upgrade);
        self.parent.set(weak);
        parent
    }

    /// Snapshot of the child list
    pub fn child_nodes(&self) -> Vec<Handle> {
        self.children.borrow().clone()
    }

    pub fn has_child_nodes(&self) -> bool {
        !self.children.borrow().is_empty()
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.data, NodeData::Comment { .. })
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::Fragment)
    }

    /// Documents, fragments and elements hold children
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document { .. } | NodeData::Fragment | NodeData::Element { .. }
        )
    }

    pub fn qual_name(&self) -> Option<&QualName> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn local_name(&self) -> Option<&str> {
        self.qual_name().map(|name| &*name.local)
    }

    /// `prefix:local` for elements, `None` for everything else
    pub fn tag_name(&self) -> Option<String> {
        self.qual_name().map(qualified_name)
    }

    /// True for an element in the HTML namespace with the given local name
    pub fn is_html_element(&self, local: &str) -> bool {
        self.qual_name()
            .is_some_and(|name| name.ns == ns!(html) && &*name.local == local)
    }

    /// Text of a text, CDATA or comment node
    pub fn node_value(&self) -> Option<String> {
        match &self.data {
            NodeData::Text { contents }
            | NodeData::CData { contents }
            | NodeData::Comment { contents } => Some(contents.borrow().clone()),
            NodeData::ProcessingInstruction { contents, .. } => Some(contents.clone()),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        match &self.data {
            NodeData::Text { contents } | NodeData::CData { contents } => {
                contents.borrow().clone()
            }
            _ => {
                let mut text = String::new();
                for child in self.children.borrow().iter() {
                    if !child.is_comment() {
                        text.push_str(&child.text_content());
                    }
                }
                text
            }
        }
    }

    /// Attribute list as `(qualified name, value)` pairs, in document order
    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .map(|attr| (qualified_name(&attr.name), attr.value.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| qualified_name(&attr.name) == name)
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    /// Set or replace an attribute; a no-op on anything but elements
    pub fn set_attribute(&self, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &self.data {
            let mut attrs = attrs.borrow_mut();
            match attrs.iter_mut().find(|attr| qualified_name(&attr.name) == name) {
                Some(attr) => attr.value = value.to_string().into(),
                None => attrs.push(Attribute {
                    name: attribute_name(name),
                    value: value.to_string().into(),
                }),
            }
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        if let NodeData::Element { attrs, .. } = &self.data {
            attrs
                .borrow_mut()
                .retain(|attr| qualified_name(&attr.name) != name);
        }
    }

    pub fn element_state(&self) -> Option<&ElementState> {
        match &self.data {
            NodeData::Element { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Live value of a form control
    ///
    /// A value set through [Node::set_value] wins; otherwise `input` reflects its `value`
    /// attribute and `textarea` its text content.
    pub fn value(&self) -> Option<String> {
        let state = self.element_state()?;
        if let Some(value) = state.value.borrow().as_ref() {
            return Some(value.clone());
        }
        match self.local_name() {
            Some("input") => self.get_attribute("value"),
            Some("textarea") => Some(self.text_content()),
            _ => None,
        }
    }

    pub fn set_value(&self, value: impl Into<String>) {
        if let Some(state) = self.element_state() {
            *state.value.borrow_mut() = Some(value.into());
        }
    }

    /// Append text to a comment node; returns false for other kinds
    pub fn append_comment_text(&self, text: &str) -> bool {
        match &self.data {
            NodeData::Comment { contents } => {
                contents.borrow_mut().push_str(text);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            NodeData::Document { dialect } => write!(f, "#document({:?})", dialect),
            NodeData::Fragment => write!(f, "#document-fragment"),
            NodeData::Doctype { name, .. } => write!(f, "<!DOCTYPE {}>", name),
            NodeData::Text { contents } => write!(f, "#text({:?})", contents.borrow()),
            NodeData::CData { contents } => write!(f, "#cdata({:?})", contents.borrow()),
            NodeData::Comment { contents } => write!(f, "<!--{}-->", contents.borrow()),
            NodeData::ProcessingInstruction { target, .. } => write!(f, "<?{}?>", target),
            NodeData::Element { name, .. } => write!(f, "<{}>", qualified_name(name)),
        }
    }
}

/// `prefix:local` rendering of a qualified name
pub fn qualified_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

/// Attribute names live in the null namespace; `xmlns` declarations keep theirs
pub(crate) fn attribute_name(name: &str) -> QualName {
    match name.split_once(':') {
        Some(("xmlns", local)) => {
            QualName::new(Some("xmlns".into()), ns!(xmlns), LocalName::from(local))
        }
        Some(("xml", local)) => QualName::new(Some("xml".into()), ns!(xml), LocalName::from(local)),
        _ if name == "xmlns" => QualName::new(None, ns!(xmlns), LocalName::from(name)),
        _ => QualName::new(None, ns!(), LocalName::from(name)),
    }
}

fn detach(target: &Handle) {
    if let Some(parent) = target.parent() {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, target));
    }
    target.parent.set(None);
}

/// Append `child` to `parent`, moving it out of any previous parent
///
/// A fragment child contributes its children instead of itself, like `appendChild` does.
pub fn append(parent: &Handle, child: Handle) -> Result<(), ConversionError> {
    insert_at(parent, None, child)
}

/// Insert `child` at `index` (or at the end), same rules as [append]
pub fn insert_at(
    parent: &Handle,
    index: Option<usize>,
    child: Handle,
) -> Result<(), ConversionError> {
    if !parent.can_have_children() {
        return Err(ConversionError::HierarchyRequest(format!(
            "{:?} cannot have children",
            parent
        )));
    }
    if matches!(child.data, NodeData::Document { .. }) || is_inclusive_ancestor(&child, parent) {
        return Err(ConversionError::HierarchyRequest(format!(
            "{:?} cannot be inserted into {:?}",
            child, parent
        )));
    }

    if child.is_fragment() {
        let moved: Vec<Handle> = child.children.borrow_mut().drain(..).collect();
        let mut index = index;
        for node in moved {
            node.parent.set(None);
            insert_at(parent, index, node)?;
            index = index.map(|i| i + 1);
        }
        return Ok(());
    }

    detach(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    let mut children = parent.children.borrow_mut();
    match index {
        Some(i) if i < children.len() => children.insert(i, child),
        _ => children.push(child),
    }
    Ok(())
}

fn is_inclusive_ancestor(candidate: &Handle, node: &Handle) -> bool {
    let mut current = Some(node.clone());
    while let Some(step) = current {
        if Rc::ptr_eq(&step, candidate) {
            return true;
        }
        current = step.parent();
    }
    false
}

/// Detach `target` from its parent; returns the index it held
pub fn remove_from_parent(target: &Handle) -> Option<usize> {
    let parent = target.parent()?;
    let index = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, target));
    detach(target);
    index
}
