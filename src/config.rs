//! Conversion configuration
//!
//! `defaults/jsonml.default.toml` is embedded into the crate so that docs and runtime behavior
//! stay in sync. Applications layer user-specific files on top of those defaults via [`Loader`]
//! before deserializing into [`Settings`]. [`ConversionConfig`] pairs those settings with the
//! optional error hook that every converter reads on failure.

use crate::dom::{Document, Handle};
use crate::error::ConversionError;
use crate::markup::MarkupNode;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

const DEFAULT_TOML: &str = include_str!("../defaults/jsonml.default.toml");

/// Top-level settings consumed by converters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub reader: ReaderSettings,
    pub writer: WriterSettings,
    pub render: RenderSettings,
    pub parse: ParseSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReaderSettings {
    pub whitespace: WhitespaceRule,
}

/// Which text nodes the reader drops as insignificant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceRule {
    /// `^(\n|\s)+$` with an ASCII-only `\s`, narrower than [WhitespaceRule::Unicode]
    Ascii,
    /// `^(\n|\s)+$` with a Unicode `\s`, so no-break and other Unicode spaces are blank too
    Unicode,
    /// Keep every non-empty text node
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriterSettings {
    pub comment_trailing_space: bool,
    pub boolean_attributes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderSettings {
    pub strategies: Vec<RenderStrategy>,
}

/// Ways of turning a live node into text, see [crate::render]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    Standard,
    LegacyProperty,
    OuterMarkup,
    ScratchContainer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParseSettings {
    pub xml_parser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            reader: ReaderSettings {
                whitespace: WhitespaceRule::Ascii,
            },
            writer: WriterSettings {
                comment_trailing_space: true,
                boolean_attributes: true,
            },
            render: RenderSettings {
                strategies: vec![
                    RenderStrategy::Standard,
                    RenderStrategy::LegacyProperty,
                    RenderStrategy::OuterMarkup,
                    RenderStrategy::ScratchContainer,
                ],
            },
            parse: ParseSettings { xml_parser: true },
        }
    }
}

/// What the error hook gets to see besides the error itself
pub struct ErrorContext<'a> {
    /// The markup being written, when the failure happened on typed input
    pub markup: Option<&'a MarkupNode>,
    /// Document to allocate the replacement node from
    pub document: &'a Document,
}

/// Replacement for the default diagnostic node.
///
/// Returning `Err` falls back to a plain `[error]` text node.
pub type ErrorHook =
    dyn Fn(&ConversionError, &ErrorContext<'_>) -> Result<Option<Handle>, ConversionError>;

/// Settings plus the overridable error hook
#[derive(Clone, Default)]
pub struct ConversionConfig {
    pub settings: Settings,
    on_error: Option<Rc<ErrorHook>>,
}

impl ConversionConfig {
    pub fn new(settings: Settings) -> Self {
        ConversionConfig {
            settings,
            on_error: None,
        }
    }

    /// Install an error hook, replacing any previous one
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ConversionError, &ErrorContext<'_>) -> Result<Option<Handle>, ConversionError>
            + 'static,
    {
        self.on_error = Some(Rc::new(hook));
        self
    }

    pub fn error_hook(&self) -> Option<&ErrorHook> {
        self.on_error.as_deref()
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("settings", &self.settings)
            .field("on_error", &self.on_error.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
