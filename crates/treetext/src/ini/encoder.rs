//! INI Encoder: writes a tree as flat `key=value` lines and `[section]` blocks.
//!
//! INI grammar only allows flat lines before the first section header, so each
//! map is reordered so that scalar entries precede nested ones (stable
//! otherwise). Nested entries become a `[parent.path]` header followed by
//! their own lines:
//!
//! ```
//! use serde_json::json;
//! use treetext::{ini, Tree};
//!
//! let tree = Tree::from(json!({"db": {"port": 5432}, "debug": true, "name": null}));
//! let text = ini::encode(&tree).unwrap();
//! assert_eq!(text, ["debug=on", "name=null", "[db]", "port=5432"].join(ini::LINE_ENDING));
//! ```

use tracing::trace;

use super::{FALSE_WORDS, LINE_ENDING, TRUE_WORDS};
use crate::error::{Result, TreeError};
use crate::types::{Entries, Scalar, Tree};

/// Encode a map or list as INI text.
pub fn encode(tree: &Tree) -> Result<String> {
    encode_with_parent(tree, &[])
}

/// Encode with section headers prefixed by `parent` (`["app"]` turns the
/// nested `db` section into `[app.db]`).
pub fn encode_with_parent(tree: &Tree, parent: &[&str]) -> Result<String> {
    let entries = tree.entries().ok_or_else(|| {
        TreeError::Conversion("INI text can only hold a map or a list at its root".to_string())
    })?;
    let mut path = Vec::with_capacity(parent.len());
    for segment in parent {
        check_key(segment)?;
        path.push(segment.to_string());
    }
    let mut lines = Vec::new();
    encode_entries(entries, &mut path, &mut lines)?;
    Ok(lines.join(LINE_ENDING))
}

/// Emit one map or list level: scalars first, then one section per nested value.
fn encode_entries(entries: Entries<'_>, path: &mut Vec<String>, out: &mut Vec<String>) -> Result<()> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by_key(|(_, value)| !value.is_scalar());

    for (key, value) in entries {
        let key = key.to_string();
        check_key(&key)?;
        match value {
            Tree::Scalar(scalar) => out.push(format!("{key}={}", encode_scalar(scalar))),
            complex => {
                path.push(key);
                let header = path.join(".");
                trace!(section = %header, "ini section");
                out.push(format!("[{header}]"));
                if let Some(children) = complex.entries() {
                    encode_entries(children, path, out)?;
                }
                path.pop();
            }
        }
    }
    Ok(())
}

/// Keys are written bare, so they must read back as the same key: not
/// empty, no surrounding whitespace, no leading comment or header marker,
/// no `=`, brackets or line breaks.
fn check_key(key: &str) -> Result<()> {
    let unreadable = key.is_empty()
        || key != key.trim()
        || key.starts_with([';', '#'])
        || key.contains(['=', '[', ']', '\n', '\r']);
    if unreadable {
        return Err(TreeError::Conversion(format!("`{key}` cannot be written as an INI key")));
    }
    Ok(())
}

/// Scalar literal: `null`, `on`/`off`, numbers bare, strings quoted only
/// when the bare form would read back differently.
fn encode_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(true) => "on".to_string(),
        Scalar::Bool(false) => "off".to_string(),
        Scalar::Str(s) if needs_quoting(s) => quote(s),
        other => other.to_string(),
    }
}

/// A string must be quoted if it:
/// - Is empty or has leading/trailing whitespace
/// - Reads as a keyword (`on`, `no`, `null`, …) or a number
/// - Contains a quote, backslash, comment marker, `=`, brackets or control chars
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    let lower = s.to_ascii_lowercase();
    if lower == "null" || TRUE_WORDS.contains(&lower.as_str()) || FALSE_WORDS.contains(&lower.as_str())
    {
        return true;
    }
    if Scalar::parse_numeric(s).is_some() {
        return true;
    }
    s.chars()
        .any(|c| matches!(c, '"' | '\\' | ';' | '#' | '=' | '[' | ']') || c.is_control())
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
