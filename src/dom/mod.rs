//! Live document tree
//!
//!     The reader consumes and the writer produces nodes of this tree. It is a small
//!     reference-counted DOM in the style of `markup5ever_rcdom`, with the node kinds and live
//!     element state the conversion rules need.
//!
//!     - [node]: node kinds, element state and the tree mutation helpers
//!     - [document]: per-dialect node allocation and name validation
//!     - [parse]: HTML (html5ever) and XML (xml5ever) text into a live tree
//!     - [serialize]: a live tree back to text through the same crates

pub mod document;
pub mod node;
pub mod parse;
pub mod serialize;

pub use document::{is_valid_name, Document};
pub use node::{
    append, insert_at, qualified_name, remove_from_parent, ElementState, FrameContent, Handle,
    Node, NodeData, WeakHandle,
};
pub use serialize::SerializableHandle;

use html5ever::ns;

/// Which flavor of tree a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Html,
    Xml,
}

/// Root of the tree `node` belongs to
pub fn root_of(node: &Handle) -> Handle {
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

/// True when `node` belongs to an XML tree
///
/// A node attached to a document is XML unless the document element is the HTML `html`
/// element. A detached node is XML when it is an element outside the HTML namespace.
pub fn is_xml(node: &Handle) -> bool {
    let root = root_of(node);
    if let NodeData::Document { .. } = root.data {
        return root
            .children
            .borrow()
            .iter()
            .find(|child| child.is_element())
            .is_some_and(|element| !element.is_html_element("html"));
    }
    root.qual_name()
        .or(node.qual_name())
        .is_some_and(|name| name.ns != ns!(html))
}
