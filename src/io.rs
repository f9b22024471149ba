//! Reader/Writer traits and format dispatch
//!
//! Scene configs arrive as YAML or JSON and leave as a generated demo page.
//! Readers and writers are registered in a small registry that dispatches
//! on file extension, so adding a format touches nothing else.

use std::path::Path;

use thiserror::Error;

use crate::html_writer::HtmlWriter;
use crate::scene::SceneConfig;

/// Errors that can occur during reading or writing
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// A rendering/writing error occurred
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for reader/writer operations
pub type IoResult<T> = Result<T, IoError>;

/// A reader parses an input format into a [`SceneConfig`]
pub trait Reader {
    /// Parse the input file into a scene config
    fn read(&self, input: &Path) -> IoResult<SceneConfig>;

    /// File extensions this reader can handle (e.g., ["yaml", "yml"])
    fn supported_extensions(&self) -> &[&str];

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// A writer emits a scene config to an output format
pub trait Writer {
    /// Write the scene to the output directory
    fn write(&self, scene: &SceneConfig, output: &Path) -> IoResult<()>;

    /// Identifier for this output format (e.g., "html")
    fn format_id(&self) -> &str;
}

/// Reads scene configs from YAML files
pub struct YamlReader;

impl Reader for YamlReader {
    fn read(&self, input: &Path) -> IoResult<SceneConfig> {
        let text = std::fs::read_to_string(input)?;
        serde_yaml::from_str(&text).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Reads scene configs from JSON files
pub struct JsonReader;

impl Reader for JsonReader {
    fn read(&self, input: &Path) -> IoResult<SceneConfig> {
        let text = std::fs::read_to_string(input)?;
        serde_json::from_str(&text).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Registry of available readers and writers
pub struct FormatRegistry {
    readers: Vec<Box<dyn Reader>>,
    writers: Vec<Box<dyn Writer>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Create a registry with all default readers and writers registered
    ///
    /// Currently registers:
    /// - Readers: `YamlReader` (yaml, yml), `JsonReader` (json)
    /// - Writers: `HtmlWriter` (html)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_reader(Box::new(YamlReader));
        registry.register_reader(Box::new(JsonReader));
        registry.register_writer(Box::new(HtmlWriter::new()));
        registry
    }

    /// Register a reader
    pub fn register_reader(&mut self, reader: Box<dyn Reader>) {
        self.readers.push(reader);
    }

    /// Register a writer
    pub fn register_writer(&mut self, writer: Box<dyn Writer>) {
        self.writers.push(writer);
    }

    /// Find a reader for the given file extension
    pub fn reader_for_extension(&self, ext: &str) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref())
    }

    /// Find a writer by format ID
    pub fn writer_for_format(&self, format_id: &str) -> Option<&dyn Writer> {
        self.writers
            .iter()
            .find(|w| w.format_id().eq_ignore_ascii_case(format_id))
            .map(|w| w.as_ref())
    }

    /// Get file extension from a path
    pub fn extension_from_path(path: &Path) -> Option<&str> {
        path.extension().and_then(|e| e.to_str())
    }

    /// Find a reader for the given path based on its extension
    pub fn reader_for_path(&self, path: &Path) -> IoResult<&dyn Reader> {
        let ext = Self::extension_from_path(path)
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        self.reader_for_extension(ext)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }
}
