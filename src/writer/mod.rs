//! Markup to live tree
//!
//!     [Writer] allocates live nodes from markup and [Writer::patch] pours markup into a node
//!     the caller already owns. The rules, per markup shape:
//!
//!     - text becomes a text node, empty text becomes nothing
//!     - raw markup becomes a text node holding its value verbatim
//!     - `""` builds a fragment; a fragment that ends up with a single child is replaced by
//!       that child
//!     - `"!"` and `"!rest"` build a comment; text children are concatenated into it
//!     - any other tag builds an element, applies its attributes ([attributes]) and appends its
//!       children, repairing table structure in HTML ([tables])
//!
//!     Every recursive write is its own failure boundary. A failure is handed to the configured
//!     error hook and the node it returns takes the failed node's place, so one bad child never
//!     takes its siblings down.

pub mod attributes;
pub mod tables;

use crate::config::{ConversionConfig, ErrorContext};
use crate::dom::{append, remove_from_parent, Dialect, Document, Handle};
use crate::error::ConversionError;
use crate::markup::{Element, MarkupNode};
use tracing::{debug, warn};

/// Caller hook run on every produced node; returning `None` discards it
pub type WriteFilter<'a> = dyn Fn(Handle) -> Option<Handle> + 'a;

/// Writes markup into live nodes allocated from one document
pub struct Writer<'a> {
    document: &'a Document,
    config: &'a ConversionConfig,
    filter: Option<&'a WriteFilter<'a>>,
}

impl<'a> Writer<'a> {
    pub fn new(document: &'a Document, config: &'a ConversionConfig) -> Self {
        Writer {
            document,
            config,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<&'a WriteFilter<'a>>) -> Self {
        self.filter = filter;
        self
    }

    fn dialect(&self) -> Dialect {
        self.document.dialect()
    }

    /// Build a live node from `markup`; never fails
    pub fn write(&self, markup: &MarkupNode) -> Option<Handle> {
        match self.try_write(markup) {
            Ok(node) => node,
            Err(err) => self.funnel(&err, Some(markup)),
        }
    }

    /// Pour the attributes and children of `markup` into `target`
    ///
    /// The tag of `markup` is ignored and `target` keeps its identity. Text nodes are left
    /// untouched. A failure appends the diagnostic node to `target`.
    pub fn patch(&self, target: &Handle, markup: &MarkupNode) -> Handle {
        if target.is_text() {
            return target.clone();
        }
        if let MarkupNode::Element(element) = markup {
            if let Err(err) = self.patch_element(target, element) {
                if let Some(diagnostic) = self.funnel(&err, Some(markup)) {
                    if let Err(append_err) = append(target, diagnostic) {
                        debug!(error = %append_err, "diagnostic node not attached");
                    }
                }
            }
        }
        target.clone()
    }

    fn try_write(&self, markup: &MarkupNode) -> Result<Option<Handle>, ConversionError> {
        match markup {
            MarkupNode::Text(text) if text.is_empty() => Ok(None),
            MarkupNode::Text(text) => Ok(Some(self.document.create_text(text))),
            MarkupNode::Raw(raw) => Ok(Some(self.document.create_text(raw.value()))),
            MarkupNode::Element(element) if element.is_fragment() => self.write_fragment(element),
            MarkupNode::Element(element) => {
                let node = if element.is_comment() {
                    self.document.create_comment(&self.comment_text(&element.tag))
                } else {
                    self.document.create_element(&element.tag)?
                };
                self.patch_element(&node, element)?;
                Ok(self.finish(node))
            }
        }
    }

    fn write_fragment(&self, element: &Element) -> Result<Option<Handle>, ConversionError> {
        let fragment = self.document.create_fragment();
        for child in &element.children {
            if let Some(node) = self.write(child) {
                self.append_node(&fragment, node)?;
            }
        }

        let only_child = {
            let children = fragment.children.borrow();
            match children.as_slice() {
                [single] => Some(single.clone()),
                _ => None,
            }
        };
        match only_child {
            Some(single) => {
                remove_from_parent(&single);
                Ok(Some(single))
            }
            None => Ok(Some(fragment)),
        }
    }

    /// `"!"` is an empty comment; `"!rest"` keeps the legacy trailing space when configured
    fn comment_text(&self, tag: &str) -> String {
        let rest = &tag[1..];
        if rest.is_empty() {
            String::new()
        } else if self.config.settings.writer.comment_trailing_space {
            format!("{} ", rest)
        } else {
            rest.to_string()
        }
    }

    fn patch_element(&self, target: &Handle, element: &Element) -> Result<(), ConversionError> {
        if let Some(attributes) = &element.attributes {
            if target.is_element() {
                attributes::apply_attributes(
                    target,
                    attributes,
                    self.dialect(),
                    &self.config.settings.writer,
                )?;
            }
        }
        for child in &element.children {
            if let Some(node) = self.write(child) {
                self.append_node(target, node)?;
            }
        }
        Ok(())
    }

    fn append_node(&self, parent: &Handle, child: Handle) -> Result<(), ConversionError> {
        if parent.is_comment() {
            if let Some(text) = child.node_value().filter(|_| child.is_text()) {
                parent.append_comment_text(&text);
            }
            return Ok(());
        }
        match self.dialect() {
            Dialect::Html => tables::append_child(self.document, parent, child),
            Dialect::Xml => append(parent, child),
        }
    }

    fn finish(&self, node: Handle) -> Option<Handle> {
        match self.filter {
            Some(filter) => filter(node),
            None => Some(node),
        }
    }

    /// Hand `err` to the error hook and return the node to use in place of the failed one
    pub fn funnel(&self, err: &ConversionError, markup: Option<&MarkupNode>) -> Option<Handle> {
        debug!(error = %err, detail = err.detail(), "conversion failed");
        let Some(hook) = self.config.error_hook() else {
            return Some(self.diagnostic(err));
        };
        let context = ErrorContext {
            markup,
            document: self.document,
        };
        match hook(err, &context) {
            Ok(node) => node,
            Err(hook_err) => {
                warn!(error = %hook_err, "error hook failed, using fallback diagnostic");
                Some(self.diagnostic(&hook_err))
            }
        }
    }

    fn diagnostic(&self, err: &ConversionError) -> Handle {
        self.document.create_text(&format!("[{}]", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::serialize::serialize_node;
    use crate::dom::NodeData;
    use crate::markup::RawMarkup;

    fn html(markup: &MarkupNode) -> Option<Handle> {
        let doc = Document::html();
        let config = ConversionConfig::default();
        Writer::new(&doc, &config).write(markup)
    }

    fn text_of(node: &Handle) -> String {
        serialize_node(node, Dialect::Html).unwrap()
    }

    #[test]
    fn empty_text_writes_nothing() {
        assert!(html(&MarkupNode::text("")).is_none());
    }

    #[test]
    fn raw_markup_becomes_verbatim_text() {
        let node = html(&RawMarkup::new("<b>").into()).unwrap();
        assert!(node.is_text());
        assert_eq!(node.node_value().as_deref(), Some("<b>"));
    }

    #[test]
    fn single_child_fragment_is_elided() {
        let markup = MarkupNode::fragment(vec![Element::new("span").child("bar").into()]);
        let node = html(&markup).unwrap();
        assert_eq!(text_of(&node), "<span>bar</span>");
        assert!(node.parent().is_none());
    }

    #[test]
    fn comment_shorthand_keeps_trailing_space() {
        let node = html(&Element::new("!note").into()).unwrap();
        assert_eq!(node.node_value().as_deref(), Some("note "));

        let mut config = ConversionConfig::default();
        config.settings.writer.comment_trailing_space = false;
        let doc = Document::html();
        let node = Writer::new(&doc, &config)
            .write(&Element::new("!note").into())
            .unwrap();
        assert_eq!(node.node_value().as_deref(), Some("note"));
    }

    #[test]
    fn comment_collects_text_children_only() {
        let markup = Element::new("!")
            .child("DOCTYPE ")
            .child(Element::new("b").child("ignored"))
            .child("html")
            .into();
        let node = html(&markup).unwrap();
        assert!(matches!(node.data, NodeData::Comment { .. }));
        assert_eq!(node.node_value().as_deref(), Some("DOCTYPE html"));
    }

    #[test]
    fn invalid_child_is_replaced_in_place() {
        let markup = Element::new("p")
            .child("a")
            .child(Element::new("not valid"))
            .child("b")
            .into();
        let node = html(&markup).unwrap();
        assert_eq!(
            text_of(&node),
            "<p>a[InvalidCharacterError: invalid element name 'not valid']b</p>"
        );
    }

    #[test]
    fn error_hook_replaces_diagnostic() {
        let config = ConversionConfig::default().with_error_hook(|err, ctx| {
            Ok(Some(ctx.document.create_comment(&err.to_string())))
        });
        let doc = Document::html();
        let node = Writer::new(&doc, &config)
            .write(&Element::new("1x").into())
            .unwrap();
        assert!(node.is_comment());
    }

    #[test]
    fn failing_hook_falls_back_to_text() {
        let config = ConversionConfig::default().with_error_hook(|_, _| {
            Err(ConversionError::Serialization("hook broke".to_string()))
        });
        let doc = Document::html();
        let node = Writer::new(&doc, &config)
            .write(&Element::new("1x").into())
            .unwrap();
        assert_eq!(
            node.node_value().as_deref(),
            Some("[SerializationError: hook broke]")
        );
    }

    #[test]
    fn filter_can_discard_nodes() {
        let doc = Document::html();
        let config = ConversionConfig::default();
        let drop_spans = |node: Handle| {
            if node.is_html_element("span") {
                None
            } else {
                Some(node)
            }
        };
        let writer = Writer::new(&doc, &config).with_filter(Some(&drop_spans));
        let markup = Element::new("p").child(Element::new("span")).child("x").into();
        let node = writer.write(&markup).unwrap();
        assert_eq!(text_of(&node), "<p>x</p>");
    }

    #[test]
    fn patch_leaves_text_nodes_alone() {
        let doc = Document::html();
        let config = ConversionConfig::default();
        let target = doc.create_text("foo");
        let patched = Writer::new(&doc, &config)
            .patch(&target, &MarkupNode::fragment(vec![MarkupNode::text("bar")]));
        assert!(std::rc::Rc::ptr_eq(&patched, &target));
        assert_eq!(target.node_value().as_deref(), Some("foo"));
    }
}
