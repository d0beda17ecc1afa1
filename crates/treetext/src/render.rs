//! Template Renderer: formats every entry of a tree with printf-style templates.
//!
//! A [`Templates`] value holds three slots:
//!
//! - `scalar` -- applied to scalar entries with arguments `(key, value, marker)`
//! - `complex` -- applied to nested entries with `(key, joined branch, marker)`;
//!   falls back to `scalar` when unset
//! - `glue` -- joins the rendered entries of a nested branch
//!
//! The marker overlay is a second tree shaped like the value. The marker for
//! a key is that key's entry in the overlay (empty when missing or blank).
//! Nested branches render against the overlay's sub-tree at the same key, or
//! against the *whole* overlay when there is none. That fallback lets a flat
//! overlay such as `{"b": " selected"}` mark `b` at any depth.
//!
//! ```
//! use serde_json::json;
//! use treetext::render::{render, Templates, NO_MARKERS};
//! use treetext::Tree;
//!
//! let value = Tree::from(json!({"a": {"x": 1}}));
//! let templates = Templates::new("%s:%s%s").with_complex("(%s){%s}%s").with_glue("|");
//! assert_eq!(render(&value, &templates, &NO_MARKERS).unwrap(), vec!["(a){x:1}"]);
//! ```

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::format::{scalar_text, sprintf};
use crate::types::{Scalar, Tree};

/// The empty marker overlay.
pub const NO_MARKERS: Tree = Tree::Scalar(Scalar::Null);

/// Scalar template, optional complex template, and glue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub scalar: String,
    pub complex: Option<String>,
    pub glue: String,
}

impl Templates {
    pub fn new(scalar: impl Into<String>) -> Self {
        Self {
            scalar: scalar.into(),
            complex: None,
            glue: String::new(),
        }
    }

    pub fn with_complex(mut self, complex: impl Into<String>) -> Self {
        self.complex = Some(complex.into());
        self
    }

    pub fn with_glue(mut self, glue: impl Into<String>) -> Self {
        self.glue = glue.into();
        self
    }

    /// Template for nested entries.
    pub fn complex(&self) -> &str {
        self.complex.as_deref().unwrap_or(&self.scalar)
    }
}

impl From<&str> for Templates {
    fn from(scalar: &str) -> Self {
        Templates::new(scalar)
    }
}

/// Render each entry of `value`, returning one string per entry in
/// iteration order. Joining the top level is left to the caller.
///
/// `value` must be a map or list.
pub fn render(value: &Tree, templates: &Templates, markers: &Tree) -> Result<Vec<String>> {
    let entries = value.entries().ok_or_else(|| {
        TreeError::TemplateArity("render expects a map or a list, got a scalar".to_string())
    })?;

    let mut out = Vec::new();
    for (key, item) in entries {
        let marker = markers.child(key).filter(|m| !m.is_blank());
        let token = marker.map(scalar_text).unwrap_or_default();
        let key = key.to_string();

        let line = match item {
            Tree::Scalar(scalar) => {
                sprintf(&templates.scalar, &[key.as_str(), scalar.to_string().as_str(), token.as_str()])?
            }
            branch => {
                let joined = render(branch, templates, marker.unwrap_or(markers))?.join(&templates.glue);
                sprintf(templates.complex(), &[key.as_str(), joined.as_str(), token.as_str()])?
            }
        };
        out.push(line);
    }

    trace!(entries = out.len(), "rendered level");
    Ok(out)
}
