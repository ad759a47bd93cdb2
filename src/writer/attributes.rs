//! Attribute coercion policy
//!
//! Every attribute key maps to one [Coercion]; the writer looks it up once per attribute and
//! applies the value accordingly.

use crate::config::WriterSettings;
use crate::dom::document::validate_name;
use crate::dom::{Dialect, Handle};
use crate::error::{ConversionError, NameKind};
use crate::markup::{AttributeValue, Attributes};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// How a markup attribute value lands on a live element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// String form of the value; `null` becomes the empty string
    PlainString,
    /// Presence for `true`, absence for `false`; other values as [Coercion::PlainString]
    BooleanFlag,
    /// As [Coercion::PlainString], also written to the named attribute
    DualWrite(&'static str),
    /// As [Coercion::PlainString], except `null` writes nothing
    SkippedWhenNull,
}

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "inert",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nomodule",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
];

static COERCIONS: Lazy<HashMap<&'static str, Coercion>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Coercion> = BOOLEAN_ATTRIBUTES
        .iter()
        .map(|name| (*name, Coercion::BooleanFlag))
        .collect();
    table.insert("value", Coercion::SkippedWhenNull);
    table.insert("enctype", Coercion::DualWrite("encoding"));
    table
});

/// The coercion for `key` in `dialect`
///
/// Boolean semantics only exist for HTML, and only while `writer.boolean_attributes` is on.
pub fn coercion_for(key: &str, dialect: Dialect, settings: &WriterSettings) -> Coercion {
    let lookup = match dialect {
        Dialect::Html => COERCIONS.get(key.to_ascii_lowercase().as_str()),
        Dialect::Xml => COERCIONS.get(key),
    };
    match lookup.copied().unwrap_or(Coercion::PlainString) {
        Coercion::BooleanFlag if dialect == Dialect::Xml || !settings.boolean_attributes => {
            Coercion::PlainString
        }
        coercion => coercion,
    }
}

/// Apply a whole attribute mapping, in order
pub fn apply_attributes(
    target: &Handle,
    attributes: &Attributes,
    dialect: Dialect,
    settings: &WriterSettings,
) -> Result<(), ConversionError> {
    for (key, value) in attributes {
        apply_attribute(target, key, value, coercion_for(key, dialect, settings), dialect)?;
    }
    Ok(())
}

pub fn apply_attribute(
    target: &Handle,
    key: &str,
    value: &AttributeValue,
    coercion: Coercion,
    dialect: Dialect,
) -> Result<(), ConversionError> {
    validate_name(NameKind::Attribute, key)?;
    let name = match dialect {
        Dialect::Html => key.to_ascii_lowercase(),
        Dialect::Xml => key.to_string(),
    };

    match (coercion, value) {
        (Coercion::SkippedWhenNull, AttributeValue::Null) => {}
        (Coercion::BooleanFlag, AttributeValue::Bool(true)) => target.set_attribute(&name, ""),
        (Coercion::BooleanFlag, AttributeValue::Bool(false)) => target.remove_attribute(&name),
        (Coercion::DualWrite(other), value) => {
            let text = value.to_attribute_string();
            target.set_attribute(&name, &text);
            target.set_attribute(other, &text);
        }
        (_, value) => target.set_attribute(&name, &value.to_attribute_string()),
    }
    Ok(())
}
