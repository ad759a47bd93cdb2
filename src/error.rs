//! Error types for conversion
//!
//!     Errors never cross the writer boundary: `write`, `write_to_text` and `patch` hand every
//!     failure to the configured error hook (see [crate::config::ConversionConfig]) and return the
//!     diagnostic node it produces. The reader absorbs failures per node. These types are what the
//!     hook receives.

use std::fmt;

/// Which kind of name failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Element,
    Attribute,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Element => write!(f, "element"),
            NameKind::Attribute => write!(f, "attribute"),
        }
    }
}

/// Error type for markup conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Input does not follow the `[tag, attrs?, ...children]` grammar
    InvalidMarkup(String),
    /// A tag or attribute name is not a valid XML name
    InvalidName { kind: NameKind, name: String },
    /// A child was appended to a node kind that cannot hold children
    HierarchyRequest(String),
    /// An optional subsystem (e.g. a nested frame document) is not reachable
    AccessDenied(String),
    /// A render strategy could not produce text
    Serialization(String),
}

impl ConversionError {
    /// Human readable detail, not part of the diagnostic text
    pub fn detail(&self) -> &str {
        match self {
            ConversionError::InvalidMarkup(detail)
            | ConversionError::HierarchyRequest(detail)
            | ConversionError::AccessDenied(detail)
            | ConversionError::Serialization(detail) => detail,
            ConversionError::InvalidName { name, .. } => name,
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The detail stays out of the message: diagnostic nodes render as `[SyntaxError: invalid JsonML]`
            ConversionError::InvalidMarkup(_) => write!(f, "SyntaxError: invalid JsonML"),
            ConversionError::InvalidName { kind, name } => {
                write!(f, "InvalidCharacterError: invalid {} name '{}'", kind, name)
            }
            ConversionError::HierarchyRequest(msg) => write!(f, "HierarchyRequestError: {}", msg),
            ConversionError::AccessDenied(msg) => write!(f, "SecurityError: {}", msg),
            ConversionError::Serialization(msg) => write!(f, "SerializationError: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}
