//! # jsonml
//!
//! Bidirectional conversion between JsonML markup (`[tag, attrs?, ...children]`) and live
//! HTML or XML document trees.
//!
//! ## Architecture
//!
//!     markup text ──parse──▶ live tree ──read──▶ MarkupNode ──write/patch──▶ live tree ──render──▶ text
//!
//! - [markup]: the markup node model, the JsonML wire codec and the structural utilities
//! - [dom]: the live tree, parsing (html5ever / xml5ever) and serialization
//! - [reader]: live tree to markup, with the HTML per-tag special cases
//! - [writer]: markup to live tree and patching, with attribute coercion and table repair
//! - [render]: live node to text through an ordered strategy chain
//! - [converter]: [Converter], which binds a dialect, a configuration and a scratch document
//! - [html], [xml]: free functions over per-thread default converters
//! - [config]: settings, the embedded defaults and the layered [config::Loader]
//! - [error]: [ConversionError], what the error hook receives
//!
//! Reading and writing do not round-trip exactly: the writer normalizes table structure and
//! elides single-child fragments, the reader drops insignificant whitespace and comments.
//!
//! ## Errors
//!
//! Nothing in the conversion surface returns an error. The reader skips what it cannot read;
//! the writer hands failures to the configured error hook and uses the node it returns, by
//! default a text node like `[SyntaxError: invalid JsonML]`.

pub mod config;
pub mod converter;
pub mod dom;
pub mod error;
pub mod html;
pub mod markup;
pub mod reader;
pub mod render;
pub mod writer;
pub mod xml;

pub use config::{ConversionConfig, Settings};
pub use converter::Converter;
pub use dom::{Dialect, Document, Handle};
pub use error::ConversionError;
pub use markup::{AttributeValue, Attributes, Element, MarkupNode, RawMarkup};
