//! HTML entry points backed by a per-thread default [Converter]
//!
//! The default converter is created on first use with the built-in settings and reused by
//! every call on the same thread. Use [Converter::new] directly for custom settings or an
//! error hook.

use crate::converter::Converter;
use crate::dom::Handle;
use crate::markup::{MarkupNode, RawMarkup};
use crate::reader::ReadFilter;
use crate::writer::WriteFilter;

thread_local! {
    static DEFAULT: Converter = Converter::html();
}

fn with_default<R>(f: impl FnOnce(&Converter) -> R) -> R {
    DEFAULT.with(f)
}

/// Read an HTML node into markup
pub fn from_html(node: Option<&Handle>, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
    with_default(|converter| converter.read(node, filter))
}

/// Parse HTML text and read it
pub fn from_html_text(text: &str, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
    with_default(|converter| converter.read_text(text, filter))
}

/// Build an HTML node from markup
pub fn to_html(markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<Handle> {
    with_default(|converter| converter.write(markup, filter))
}

/// Build HTML text from markup
pub fn to_html_text(markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<String> {
    with_default(|converter| converter.write_to_text(markup, filter))
}

/// Pour markup into an existing node
pub fn patch(target: &Handle, markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Handle {
    with_default(|converter| converter.patch(target, markup, filter))
}

pub fn render_html(node: Option<&Handle>) -> Option<String> {
    with_default(|converter| converter.render(node))
}

/// Mark `value` as pre-formatted markup
pub fn raw(value: impl Into<String>) -> RawMarkup {
    RawMarkup::new(value)
}

pub fn is_raw(node: &MarkupNode) -> bool {
    node.is_raw()
}
