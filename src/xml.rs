//! XML entry points backed by a per-thread default [Converter]

use crate::converter::Converter;
use crate::dom::{Document, Handle};
use crate::markup::MarkupNode;
use crate::reader::ReadFilter;
use crate::writer::WriteFilter;

thread_local! {
    static DEFAULT: Converter = Converter::xml();
}

fn with_default<R>(f: impl FnOnce(&Converter) -> R) -> R {
    DEFAULT.with(f)
}

/// Read an XML node into markup
pub fn from_xml(node: Option<&Handle>, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
    with_default(|converter| converter.read(node, filter))
}

/// Parse an XML document and read its document element
pub fn from_xml_text(text: &str, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
    with_default(|converter| converter.read_text(text, filter))
}

/// Build an XML node from markup
pub fn to_xml(markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<Handle> {
    with_default(|converter| converter.write(markup, filter))
}

/// Build XML text from markup
pub fn to_xml_text(markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<String> {
    with_default(|converter| converter.write_to_text(markup, filter))
}

/// Parse XML text into a live document; `None` for empty text
pub fn parse_xml(text: &str) -> Option<Document> {
    with_default(|converter| converter.parse(text))
}

pub fn render_xml(node: Option<&Handle>) -> Option<String> {
    with_default(|converter| converter.render(node))
}

/// True when `node` belongs to an XML tree, see [crate::dom::is_xml]
pub fn is_xml(node: &Handle) -> bool {
    crate::dom::is_xml(node)
}
