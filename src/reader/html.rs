//! HTML elements that keep content outside their child list
//!
//! Lookup is by lowercased tag name. Each entry replaces the generic child walk for its tag.

use super::Reader;
use crate::dom::serialize::serialize_children;
use crate::dom::{Dialect, Handle};
use crate::markup::{Element, MarkupNode};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// Reads the content of one special-cased element into `element`
pub type TagReader = fn(&Reader<'_>, &Handle, &mut Element);

static TAG_READERS: Lazy<HashMap<&'static str, TagReader>> = Lazy::new(|| {
    let mut readers: HashMap<&'static str, TagReader> = HashMap::new();
    readers.insert("frame", read_frame);
    readers.insert("iframe", read_frame);
    readers.insert("style", read_style);
    readers.insert("input", read_input);
    readers.insert("textarea", read_textarea);
    readers
});

pub fn tag_reader(tag: &str) -> Option<TagReader> {
    TAG_READERS.get(tag).copied()
}

/// The nested document replaces the frame's own children
fn read_frame(reader: &Reader<'_>, node: &Handle, element: &mut Element) {
    let Some(state) = node.element_state() else {
        return;
    };
    let document = state.frame.borrow().document();
    match document {
        Ok(Some(document)) => {
            if let Some(child) = reader.read(&document) {
                element.children.push(child);
            }
        }
        Ok(None) => {}
        Err(err) => debug!(error = %err, "frame content not readable"),
    }
}

fn strip_comment_markers(text: &str) -> String {
    text.replacen("<!--", "", 1).replacen("-->", "", 1)
}

fn read_style(reader: &Reader<'_>, node: &Handle, element: &mut Element) {
    let sheet = node
        .element_state()
        .and_then(|state| state.style_sheet.borrow().clone())
        .filter(|text| !text.is_empty());
    if let Some(text) = sheet {
        element.children.push(MarkupNode::Text(strip_comment_markers(&text)));
        return;
    }
    for child in node.child_nodes() {
        if let Some(MarkupNode::Text(text)) = reader.read(&child) {
            element.children.push(MarkupNode::Text(strip_comment_markers(&text)));
        }
    }
}

fn read_input(reader: &Reader<'_>, node: &Handle, element: &mut Element) {
    reader.read_children(node, element);
    let is_password = node
        .get_attribute("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("password"));
    if is_password {
        return;
    }
    if let Some(value) = node.value().filter(|value| !value.is_empty()) {
        element.set_attribute("value", value);
    }
}

fn read_textarea(reader: &Reader<'_>, node: &Handle, element: &mut Element) {
    if reader.read_children(node, element) {
        return;
    }
    let fallback = node
        .value()
        .filter(|value| !value.is_empty())
        .or_else(|| serialize_children(node, Dialect::Html).ok())
        .filter(|text| !text.is_empty());
    if let Some(text) = fallback {
        element.children.push(MarkupNode::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::dom::{append, Document, FrameContent};

    fn reader() -> Reader<'static> {
        Reader::new(Dialect::Html, &Settings::default().reader)
    }

    #[test]
    fn iframe_reads_nested_document_in_priority_order() {
        let doc = Document::html();
        let iframe = doc.create_element("iframe").unwrap();
        append(&iframe, doc.create_text("fallback")).unwrap();

        let inner = Document::html();
        let body = inner.create_element("body").unwrap();
        append(inner.node(), body).unwrap();
        let other = Document::html();

        if let Some(state) = iframe.element_state() {
            *state.frame.borrow_mut() = FrameContent {
                window_document: Some(other.node().clone()),
                content_document: Some(inner.node().clone()),
                ..Default::default()
            };
        }
        assert_eq!(
            reader().read(&iframe),
            Some(
                Element::new("iframe")
                    .child(Element::new("").child(Element::new("body")))
                    .into()
            )
        );
    }

    #[test]
    fn cross_origin_frame_reads_empty() {
        let doc = Document::html();
        let frame = doc.create_element("frame").unwrap();
        if let Some(state) = frame.element_state() {
            state.frame.borrow_mut().cross_origin = true;
        }
        assert_eq!(reader().read(&frame), Some(MarkupNode::element("frame")));
    }

    #[test]
    fn style_sheet_text_wins_and_loses_comment_markers() {
        let doc = Document::html();
        let style = doc.create_element("style").unwrap();
        append(&style, doc.create_text("ignored")).unwrap();
        if let Some(state) = style.element_state() {
            *state.style_sheet.borrow_mut() = Some("<!-- p { color: red } -->".to_string());
        }
        assert_eq!(
            reader().read(&style),
            Some(Element::new("style").child(" p { color: red } ").into())
        );
    }

    #[test]
    fn style_children_lose_comment_markers() {
        let doc = Document::html();
        let style = doc.create_element("style").unwrap();
        append(&style, doc.create_text("<!--a-->b-->")).unwrap();
        assert_eq!(
            reader().read(&style),
            Some(Element::new("style").child("ab-->").into())
        );
    }

    #[test]
    fn input_value_overrides_attribute_unless_password() {
        let doc = Document::html();
        let input = doc.create_element("input").unwrap();
        input.set_value("typed");
        assert_eq!(
            reader().read(&input),
            Some(Element::new("input").attr("value", "typed").into())
        );

        let password = doc.create_element("input").unwrap();
        password.set_attribute("type", "Password");
        password.set_value("secret");
        assert_eq!(
            reader().read(&password),
            Some(Element::new("input").attr("type", "Password").into())
        );
    }

    #[test]
    fn textarea_falls_back_to_live_value() {
        let doc = Document::html();
        let textarea = doc.create_element("textarea").unwrap();
        textarea.set_value("draft");
        assert_eq!(
            reader().read(&textarea),
            Some(Element::new("textarea").child("draft").into())
        );

        let empty = doc.create_element("textarea").unwrap();
        assert_eq!(reader().read(&empty), Some(MarkupNode::element("textarea")));
    }
}
