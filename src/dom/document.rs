//! Node allocation
//!
//! A [Document] owns a document node and hands out detached nodes for its dialect. HTML element
//! names are ASCII-lowercased and placed in the HTML namespace. XML names keep their case and
//! live whole in the null namespace, prefix included: a `p:` prefix only gains a namespace through
//! an `xmlns:p` attribute, which the serializer writes like any other.

use super::node::{ElementState, Handle, Node, NodeData};
use super::Dialect;
use crate::error::{ConversionError, NameKind};
use html5ever::{ns, LocalName, QualName};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::fmt;

const NAME_START: &str = r":A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";
const NAME_REST: &str = r"\-\.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

// XML `Name` production
static XML_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{start}][{start}{rest}]*$",
        start = NAME_START,
        rest = NAME_REST
    ))
    .expect("XML name pattern is valid")
});

/// True if `name` matches the XML `Name` production
pub fn is_valid_name(name: &str) -> bool {
    XML_NAME.is_match(name)
}

pub(crate) fn validate_name(kind: NameKind, name: &str) -> Result<(), ConversionError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ConversionError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// A document node plus the factory methods that allocate nodes for it
#[derive(Clone)]
pub struct Document {
    node: Handle,
    dialect: Dialect,
}

impl Document {
    pub fn new(dialect: Dialect) -> Self {
        Document {
            node: Node::new(NodeData::Document { dialect }),
            dialect,
        }
    }

    pub fn html() -> Self {
        Self::new(Dialect::Html)
    }

    pub fn xml() -> Self {
        Self::new(Dialect::Xml)
    }

    /// Wrap an existing document node; `None` for any other node kind
    pub fn from_node(node: Handle) -> Option<Self> {
        let dialect = match node.data {
            NodeData::Document { dialect } => dialect,
            _ => return None,
        };
        Some(Document { node, dialect })
    }

    pub fn node(&self) -> &Handle {
        &self.node
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The first element child of the document node
    pub fn document_element(&self) -> Option<Handle> {
        self.node
            .children
            .borrow()
            .iter()
            .find(|child| child.is_element())
            .cloned()
    }

    /// First element with the given local name, in document order
    pub fn find_element(&self, local: &str) -> Option<Handle> {
        find_descendant(&self.node, local)
    }

    /// Allocate an element for `tag`
    ///
    /// Fails with [ConversionError::InvalidName] when `tag` is not an XML name.
    pub fn create_element(&self, tag: &str) -> Result<Handle, ConversionError> {
        validate_name(NameKind::Element, tag)?;
        let name = match self.dialect {
            Dialect::Html => QualName::new(None, ns!(html), LocalName::from(tag.to_ascii_lowercase())),
            Dialect::Xml => QualName::new(None, ns!(), LocalName::from(tag)),
        };
        Ok(Node::new(NodeData::Element {
            name,
            attrs: RefCell::new(Vec::new()),
            state: ElementState::default(),
        }))
    }

    pub fn create_text(&self, text: &str) -> Handle {
        Node::new(NodeData::Text {
            contents: RefCell::new(text.to_string()),
        })
    }

    pub fn create_cdata(&self, text: &str) -> Handle {
        Node::new(NodeData::CData {
            contents: RefCell::new(text.to_string()),
        })
    }

    pub fn create_comment(&self, text: &str) -> Handle {
        Node::new(NodeData::Comment {
            contents: RefCell::new(text.to_string()),
        })
    }

    pub fn create_fragment(&self) -> Handle {
        Node::new(NodeData::Fragment)
    }

    pub fn create_doctype(&self, name: &str, public_id: &str, system_id: &str) -> Handle {
        Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    pub fn create_processing_instruction(&self, target: &str, contents: &str) -> Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            contents: contents.to_string(),
        })
    }
}

fn find_descendant(node: &Handle, local: &str) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if child.local_name() == Some(local) {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant(child, local) {
            return Some(found);
        }
    }
    None
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("dialect", &self.dialect)
            .field("children", &self.node.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_names_are_lowercased() {
        let doc = Document::html();
        let node = doc.create_element("DIV").unwrap();
        assert_eq!(node.tag_name().as_deref(), Some("div"));
        assert!(node.is_html_element("div"));
    }

    #[test]
    fn xml_names_keep_case_and_prefix() {
        let doc = Document::xml();
        let node = doc.create_element("svg:Rect").unwrap();
        assert_eq!(node.tag_name().as_deref(), Some("svg:Rect"));
        assert_eq!(node.qual_name().map(|name| name.ns.clone()), Some(ns!()));
    }

    #[test]
    fn rejects_invalid_names() {
        let doc = Document::html();
        for name in ["", "1a", "a b", "<p>", "-x"] {
            assert!(
                matches!(
                    doc.create_element(name),
                    Err(ConversionError::InvalidName {
                        kind: NameKind::Element,
                        ..
                    })
                ),
                "{name:?} should be rejected"
            );
        }
        assert!(is_valid_name("data-x.y_z"));
        assert!(is_valid_name("été"));
    }

    #[test]
    fn from_node_requires_a_document() {
        let doc = Document::xml();
        assert!(Document::from_node(doc.node().clone()).is_some());
        assert!(Document::from_node(doc.create_text("x")).is_none());
    }
}
