//! XML Encoder: converts a tree into an [`Element`] tree.
//!
//! Each entry of a map or list becomes markup according to its key:
//!
//! - **Named keys** become a child element of that name.
//! - **`@name` keys** become attributes of the current element.
//! - **Positional keys** (list indices, all-digit names) form a sequence of
//!   repeated elements: the first item is written into the current element
//!   itself and each following item into a new sibling with the same tag.
//!   At the root there is no sibling to repeat, so each item becomes a
//!   `<node>` child instead.
//!
//! Scalars become the element's text; null and empty strings leave it empty.
//!
//! ```
//! use serde_json::json;
//! use treetext::{xml, Tree};
//!
//! let tree = Tree::from(json!({"@lang": "en", "tag": ["a", "b"]}));
//! let markup = xml::encode(&tree).unwrap().to_markup().unwrap();
//! assert_eq!(markup, r#"<xml lang="en"><tag>a</tag><tag>b</tag></xml>"#);
//! ```

use tracing::trace;

use super::element::Element;
use crate::error::{Result, TreeError};
use crate::types::Tree;

/// Tag of a fresh document root.
pub const DEFAULT_ROOT: &str = "xml";
/// Tag given to positional entries that have no enclosing sequence.
pub const LIST_ITEM: &str = "node";

/// Encode `tree` under a new `<xml>` root element.
pub fn encode(tree: &Tree) -> Result<Element> {
    encode_with_root(tree, Element::new(DEFAULT_ROOT))
}

/// Encode `tree` into an existing root element, keeping whatever it
/// already holds.
pub fn encode_with_root(tree: &Tree, mut root: Element) -> Result<Element> {
    // Without a parent there is nowhere for sequence siblings to go.
    let siblings = encode_node(tree, &mut root, false)?;
    root.children.extend(siblings);
    Ok(root)
}

/// Write `tree` into `target`. When `target` has a parent, positional items
/// after the first produce siblings of `target`; they are returned, in
/// document order, for the caller to append to that parent.
fn encode_node(tree: &Tree, target: &mut Element, has_parent: bool) -> Result<Vec<Element>> {
    let mut siblings = Vec::new();

    let Some(entries) = tree.entries() else {
        if let Tree::Scalar(scalar) = tree {
            let text = scalar.to_string();
            if !text.is_empty() {
                target.text = Some(text);
            }
        }
        return Ok(siblings);
    };

    let mut in_sequence = false;
    for (key, value) in entries {
        if key.is_positional() {
            if !has_parent {
                let mut child = Element::new(LIST_ITEM);
                let nested = encode_node(value, &mut child, true)?;
                target.children.push(child);
                target.children.extend(nested);
            } else if in_sequence {
                let mut next = Element::new(target.name.clone());
                let nested = encode_node(value, &mut next, true)?;
                siblings.push(next);
                siblings.extend(nested);
            } else {
                siblings.extend(encode_node(value, target, true)?);
                in_sequence = true;
            }
        } else if let Some(name) = key.attribute_name() {
            let Tree::Scalar(scalar) = value else {
                return Err(TreeError::Conversion(format!(
                    "attribute `@{name}` must hold a scalar value"
                )));
            };
            check_name(name)?;
            target.set_attribute(name, scalar.to_string());
        } else {
            let name = key.to_string();
            check_name(&name)?;
            trace!(element = %name, "xml child");
            let mut child = Element::new(name);
            let nested = encode_node(value, &mut child, true)?;
            target.children.push(child);
            target.children.extend(nested);
        }
    }

    Ok(siblings)
}

/// XML names start with a letter, `_` or `:` and continue with letters,
/// digits, `-`, `.`, `_` or `:`.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == ':');
    if valid_start && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':')) {
        Ok(())
    } else {
        Err(TreeError::Conversion(format!("`{name}` is not a valid XML name")))
    }
}
