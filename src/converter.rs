//! The conversion entry point
//!
//! A [Converter] binds a dialect, a [ConversionConfig] and the scratch [Document] new nodes are
//! allocated from. All reading, writing, patching, rendering and parsing goes through it; the
//! [crate::html] and [crate::xml] modules expose per-thread default converters as free
//! functions.

use crate::config::ConversionConfig;
use crate::dom::parse::{parse_html, parse_html_into, parse_xml};
use crate::dom::{Dialect, Document, Handle};
use crate::markup::json::is_falsy;
use crate::markup::MarkupNode;
use crate::reader::{unwrap_container, ReadFilter, Reader};
use crate::render::render;
use crate::writer::{WriteFilter, Writer};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Converter {
    dialect: Dialect,
    config: ConversionConfig,
    document: Document,
}

impl Converter {
    pub fn new(dialect: Dialect, config: ConversionConfig) -> Self {
        Converter {
            dialect,
            config,
            document: Document::new(dialect),
        }
    }

    /// HTML converter with the built-in defaults
    pub fn html() -> Self {
        Self::new(Dialect::Html, ConversionConfig::default())
    }

    /// XML converter with the built-in defaults
    pub fn xml() -> Self {
        Self::new(Dialect::Xml, ConversionConfig::default())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// The document new nodes are allocated from
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn reader<'f>(&self, filter: Option<&'f ReadFilter<'f>>) -> Reader<'f> {
        Reader::new(self.dialect, &self.config.settings.reader).with_filter(filter)
    }

    fn writer<'f>(&'f self, filter: Option<&'f WriteFilter<'f>>) -> Writer<'f> {
        Writer::new(&self.document, &self.config).with_filter(filter)
    }

    /// Read a live node into markup; `None` for an absent or unreadable node
    pub fn read(&self, node: Option<&Handle>, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
        self.reader(filter).read(node?)
    }

    /// Parse markup text and read it
    ///
    /// HTML text is parsed into a scratch `div`; a lone child comes back as itself, anything
    /// else as a fragment. XML text must be a document and its document element is read.
    pub fn read_text(&self, text: &str, filter: Option<&ReadFilter<'_>>) -> Option<MarkupNode> {
        match self.dialect {
            Dialect::Html => {
                let container = self.document.create_element("div").ok()?;
                if let Err(err) = parse_html_into(&container, text) {
                    debug!(error = %err, "markup text not parsed");
                    return None;
                }
                self.reader(filter).read(&container).map(unwrap_container)
            }
            Dialect::Xml => {
                let document = self.parse(text)?;
                let root = document.document_element()?;
                self.reader(filter).read(&root)
            }
        }
    }

    /// Build a live node from markup; failures come back as diagnostic nodes
    pub fn write(&self, markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<Handle> {
        self.writer(filter).write(markup)
    }

    /// Build a live node from an untyped JSON value
    ///
    /// JSON falsy values write nothing; a value outside the JsonML grammar is funneled like any
    /// other failure.
    pub fn write_json(&self, value: &Value, filter: Option<&WriteFilter<'_>>) -> Option<Handle> {
        if is_falsy(value) {
            return None;
        }
        let writer = self.writer(filter);
        match MarkupNode::from_json(value) {
            Ok(markup) => writer.write(&markup),
            Err(err) => writer.funnel(&err, None),
        }
    }

    /// Write markup and render the result as text
    pub fn write_to_text(&self, markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Option<String> {
        let node = self.write(markup, filter);
        self.render(node.as_ref())
    }

    /// Pour markup into a node the caller owns; returns `target`
    pub fn patch(&self, target: &Handle, markup: &MarkupNode, filter: Option<&WriteFilter<'_>>) -> Handle {
        self.writer(filter).patch(target, markup)
    }

    /// Render a live node as text in this converter's dialect
    pub fn render(&self, node: Option<&Handle>) -> Option<String> {
        render(node, self.dialect, &self.config.settings.render)
    }

    /// Parse text into a live document; `None` for empty text or when no parser applies
    pub fn parse(&self, text: &str) -> Option<Document> {
        if text.is_empty() {
            return None;
        }
        let parsed = match self.dialect {
            Dialect::Html => parse_html(text),
            Dialect::Xml if self.config.settings.parse.xml_parser => parse_xml(text),
            Dialect::Xml => {
                debug!("no XML parser configured");
                return None;
            }
        };
        match parsed {
            Ok(document) => Some(document),
            Err(err) => {
                debug!(error = %err, "markup text not parsed");
                None
            }
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::html()
    }
}
