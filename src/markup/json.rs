//! JsonML wire grammar
//!
//! Converts between [MarkupNode] and JSON values of the shape `[tag, {attrs}?, ...children]`.
//!
//! Decoding is lenient where JsonML is lenient: attribute objects may appear at any slot after
//! the tag and are merged in order, `null` slots are skipped, numbers and booleans become text.
//! Anything else that is not an array starting with a string is invalid markup.

use super::{format_number, AttributeValue, Attributes, Element, MarkupNode};
use crate::error::ConversionError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

impl MarkupNode {
    /// Decode a JSON value into a markup node
    pub fn from_json(value: &Value) -> Result<MarkupNode, ConversionError> {
        match value {
            Value::String(text) => Ok(MarkupNode::Text(text.clone())),
            Value::Array(slots) => decode_element(slots).map(MarkupNode::Element),
            other => Err(ConversionError::InvalidMarkup(format!(
                "expected a string or an array, found {}",
                kind_of(other)
            ))),
        }
    }

    /// Parse JsonML text
    pub fn from_json_str(text: &str) -> Result<MarkupNode, ConversionError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ConversionError::InvalidMarkup(format!("malformed JSON: {}", e)))?;
        MarkupNode::from_json(&value)
    }

    /// Encode as a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            MarkupNode::Text(text) => Value::String(text.clone()),
            MarkupNode::Raw(raw) => Value::String(raw.value().to_string()),
            MarkupNode::Element(element) => {
                let mut slots = Vec::with_capacity(element.children.len() + 2);
                slots.push(Value::String(element.tag.clone()));
                if let Some(attributes) = &element.attributes {
                    slots.push(Value::Object(encode_attributes(attributes)));
                }
                slots.extend(element.children.iter().map(MarkupNode::to_json));
                Value::Array(slots)
            }
        }
    }
}

fn decode_element(slots: &[Value]) -> Result<Element, ConversionError> {
    let tag = match slots.first() {
        Some(Value::String(tag)) => tag.clone(),
        Some(other) => {
            return Err(ConversionError::InvalidMarkup(format!(
                "expected a tag string, found {}",
                kind_of(other)
            )))
        }
        None => {
            return Err(ConversionError::InvalidMarkup(
                "empty array has no tag".to_string(),
            ))
        }
    };

    let mut element = Element::new(tag);
    for slot in &slots[1..] {
        match slot {
            Value::Null => {}
            Value::Object(map) => {
                let attributes = element.attributes.get_or_insert_with(Attributes::new);
                for (key, value) in map {
                    attributes.insert(key.clone(), decode_attribute(value));
                }
            }
            Value::Array(child) => element
                .children
                .push(MarkupNode::Element(decode_element(child)?)),
            Value::String(text) => element.children.push(MarkupNode::Text(text.clone())),
            Value::Bool(b) => element.children.push(MarkupNode::Text(b.to_string())),
            Value::Number(n) => element
                .children
                .push(MarkupNode::Text(number_text(n))),
        }
    }
    Ok(element)
}

fn decode_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => n
            .as_f64()
            .map(AttributeValue::Number)
            .unwrap_or_else(|| AttributeValue::String(n.to_string())),
        Value::String(s) => AttributeValue::String(s.clone()),
        // Transitional: anything else is kept as its JSON text
        other => AttributeValue::String(other.to_string()),
    }
}

fn encode_attributes(attributes: &Attributes) -> Map<String, Value> {
    attributes
        .iter()
        .map(|(key, value)| {
            let value = match value {
                AttributeValue::Null => Value::Null,
                AttributeValue::Bool(b) => Value::Bool(*b),
                AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                    Value::from(*n as i64)
                }
                AttributeValue::Number(n) => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(format_number(*n))),
                AttributeValue::String(s) => Value::String(s.clone()),
            };
            (key.clone(), value)
        })
        .collect()
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() => format_number(f),
        _ => n.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// JSON falsy test used by the untyped writer entry point
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl Serialize for MarkupNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MarkupNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        MarkupNode::from_json(&value).map_err(|e| D::Error::custom(format!("{} ({})", e, e.detail())))
    }
}
