//! Error types for tree conversion and rendering operations.

use thiserror::Error;

/// Errors that can occur while converting or rendering a [`Tree`](crate::Tree).
#[derive(Error, Debug)]
pub enum TreeError {
    /// The input string was not valid JSON (`Tree::from_json_str`).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input string was not valid INI.
    /// Includes the 1-based line number where the error was detected.
    #[error("INI parse error at line {line}: {message}")]
    IniParse { line: usize, message: String },

    /// Two scalar values were flattened onto the same dotted INI path.
    #[error("INI key conflict: `{path}` is assigned twice")]
    KeyConflict { path: String },

    /// The input string was not a well-formed XML element.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A tree shape that the target representation cannot express.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A renderer or template was handed a shape it cannot format, or a
    /// template referenced a slot that does not exist.
    #[error("Template error: {0}")]
    TemplateArity(String),
}

/// Convenience alias used throughout treetext.
pub type Result<T> = std::result::Result<T, TreeError>;
