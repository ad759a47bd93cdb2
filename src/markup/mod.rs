//! JsonML markup nodes
//!
//!     A markup node is either a text literal or an element `[tag, attrs?, ...children]`. Two tag
//!     shapes are special:
//!
//!     - `""` is a fragment: no element identity, just a list of siblings. Its attributes, if
//!       any, have no rendering effect.
//!     - a tag starting with `!` is a comment (`"!"`, `"! msg"`, or `"!DOCTYPE"` followed by text).
//!
//!     [RawMarkup] marks a string as pre-formatted so the writer emits it verbatim as text.
//!
//!     The wire grammar lives in [json], the small structural utility API in [utils].

pub mod json;
pub mod utils;

use indexmap::IndexMap;
use std::fmt;

pub use utils::Slot;

/// Attribute mapping of an element, in insertion order
pub type Attributes = IndexMap<String, AttributeValue>;

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl AttributeValue {
    /// String form used when the value is applied as a plain attribute
    ///
    /// `Null` maps to the empty string; integral numbers print without a fraction.
    pub fn to_attribute_string(&self) -> String {
        match self {
            AttributeValue::Null => String::new(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Number(n) => format_number(*n),
            AttributeValue::String(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

/// A string the writer emits verbatim as a text node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMarkup {
    value: String,
}

impl RawMarkup {
    pub fn new(value: impl Into<String>) -> Self {
        RawMarkup {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RawMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A JsonML element: tag, optional attributes, ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Option<Attributes>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: None,
            children: Vec::new(),
        }
    }

    /// Builder helper: set an attribute, creating the mapping if needed
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builder helper: push a child without any coalescing
    pub fn child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.tag.starts_with('!')
    }
}

/// A JsonML node
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Text(String),
    Raw(RawMarkup),
    Element(Element),
}

impl MarkupNode {
    pub fn text(value: impl Into<String>) -> Self {
        MarkupNode::Text(value.into())
    }

    pub fn element(tag: impl Into<String>) -> Self {
        MarkupNode::Element(Element::new(tag))
    }

    pub fn fragment(children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element(Element {
            tag: String::new(),
            attributes: None,
            children,
        })
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        MarkupNode::Element(element)
    }
}

impl From<&str> for MarkupNode {
    fn from(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }
}

impl From<String> for MarkupNode {
    fn from(text: String) -> Self {
        MarkupNode::Text(text)
    }
}

impl From<RawMarkup> for MarkupNode {
    fn from(raw: RawMarkup) -> Self {
        MarkupNode::Raw(raw)
    }
}
