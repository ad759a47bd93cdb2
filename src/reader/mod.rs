//! Live tree to markup
//!
//!     [Reader] walks a live node and produces the equivalent [MarkupNode]. Elements, documents
//!     and fragments become `[tag, attrs?, ...children]` (documents and fragments with the empty
//!     tag), text becomes a string, doctypes and `DOCTYPE` comments become `['!', text]`.
//!     Everything else reads as `None`.
//!
//!     In the HTML dialect tags are lowercased and a handful of elements keep their content
//!     outside the child list; those are handled by the per-tag table in [html]. The filter, if
//!     any, runs once per produced node after its subtree is complete.
//!
//!     Failures never escape: a node that cannot be read contributes nothing and its siblings
//!     are read as usual.

pub mod html;

use crate::config::{ReaderSettings, WhitespaceRule};
use crate::dom::{Dialect, Handle, NodeData};
use crate::markup::{Attributes, Element, MarkupNode};
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;
use tracing::debug;

/// Caller hook run on every produced node, given the node it was read from
///
/// Returning `None` discards the node.
pub type ReadFilter<'a> = dyn Fn(MarkupNode, &Handle) -> Option<MarkupNode> + 'a;

// ASCII whitespace only; U+00A0 and the other Unicode spaces count as content
static ASCII_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\n|[\t\n\x0B\x0C\r ])+$").expect("valid blank pattern"));

static UNICODE_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\n|\s)+$").expect("valid blank pattern"));

/// Reads live nodes of one dialect into markup
pub struct Reader<'a> {
    dialect: Dialect,
    whitespace: WhitespaceRule,
    filter: Option<&'a ReadFilter<'a>>,
}

impl<'a> Reader<'a> {
    pub fn new(dialect: Dialect, settings: &ReaderSettings) -> Self {
        Reader {
            dialect,
            whitespace: settings.whitespace,
            filter: None,
        }
    }

    pub fn with_filter<'b>(self, filter: Option<&'b ReadFilter<'b>>) -> Reader<'b> {
        Reader {
            dialect: self.dialect,
            whitespace: self.whitespace,
            filter,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Read `node` and its subtree
    pub fn read(&self, node: &Handle) -> Option<MarkupNode> {
        match &node.data {
            NodeData::Element { .. } | NodeData::Document { .. } | NodeData::Fragment => {
                let element = self.read_container(node);
                self.finish(MarkupNode::Element(element), node)
            }
            NodeData::Text { contents } | NodeData::CData { contents } => {
                self.read_text_node(node, &contents.borrow())
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                let markup = doctype_markup(name, public_id, system_id);
                self.finish(markup, node)
            }
            NodeData::Comment { contents } => {
                let text = contents.borrow();
                if !text.starts_with("DOCTYPE") {
                    return None;
                }
                let markup = Element::new("!").child(text.as_str()).into();
                self.finish(markup, node)
            }
            NodeData::ProcessingInstruction { target, .. } => {
                debug!(target = %target, "processing instruction skipped");
                None
            }
        }
    }

    /// Append every readable child of `node` to `element`; false when `node` has no children
    pub fn read_children(&self, node: &Handle, element: &mut Element) -> bool {
        let children = node.child_nodes();
        for child in &children {
            if let Some(markup) = self.read(child) {
                element.children.push(markup);
            }
        }
        !children.is_empty()
    }

    fn read_container(&self, node: &Handle) -> Element {
        let tag = match node.tag_name() {
            Some(name) if self.dialect == Dialect::Html => name.to_lowercase(),
            Some(name) => name,
            None => String::new(),
        };

        let mut element = Element::new(tag);
        let attributes: Attributes = node
            .attributes()
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect();
        if !attributes.is_empty() {
            element.attributes = Some(attributes);
        }

        let special = match self.dialect {
            Dialect::Html => html::tag_reader(&element.tag.to_lowercase()),
            Dialect::Xml => None,
        };
        match special {
            Some(read_tag) => read_tag(self, node, &mut element),
            None => {
                self.read_children(node, &mut element);
            }
        }
        element
    }

    fn read_text_node(&self, node: &Handle, text: &str) -> Option<MarkupNode> {
        if text.is_empty() || (self.is_blank(text) && !is_inline_gap(node, text)) {
            return None;
        }
        Some(MarkupNode::Text(text.to_string()))
    }

    fn is_blank(&self, text: &str) -> bool {
        match self.whitespace {
            WhitespaceRule::Ascii => ASCII_BLANK.is_match(text),
            WhitespaceRule::Unicode => UNICODE_BLANK.is_match(text),
            WhitespaceRule::Preserve => false,
        }
    }

    fn finish(&self, markup: MarkupNode, source: &Handle) -> Option<MarkupNode> {
        match self.filter {
            Some(filter) => filter(markup, source),
            None => Some(markup),
        }
    }
}

/// Spaces without a line break between two element siblings, as in `<em>a</em> <em>b</em>`
fn is_inline_gap(node: &Handle, text: &str) -> bool {
    if text.contains(['\n', '\r']) {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    let siblings = parent.children.borrow();
    let Some(index) = siblings.iter().position(|child| Rc::ptr_eq(child, node)) else {
        return false;
    };
    index > 0
        && siblings[index - 1].is_element()
        && siblings.get(index + 1).is_some_and(|next| next.is_element())
}

fn doctype_markup(name: &str, public_id: &str, system_id: &str) -> MarkupNode {
    let name = if name.is_empty() {
        "html".to_string()
    } else {
        name.to_lowercase()
    };
    let mut parts = vec!["DOCTYPE".to_string(), name];
    if !public_id.is_empty() {
        parts.push("PUBLIC".to_string());
        parts.push(format!("\"{}\"", public_id));
    }
    if !system_id.is_empty() {
        parts.push(format!("\"{}\"", system_id));
    }
    Element::new("!").child(parts.join(" ")).into()
}

/// Unwrap the result of reading a scratch container
///
/// A container holding exactly one child reads as that child; anything else becomes a
/// fragment.
pub(crate) fn unwrap_container(markup: MarkupNode) -> MarkupNode {
    match markup {
        MarkupNode::Element(mut element) => {
            if element.attributes.is_none() && element.children.len() == 1 {
                return element.children.remove(0);
            }
            element.tag.clear();
            MarkupNode::Element(element)
        }
        other => other,
    }
}
