//! XML codec: [`Tree`] ⇄ XML element tree.
//!
//! - [`element`]: owned element model, parsed and written with quick-xml
//! - [`encoder`]: tree → element (`@name` keys become attributes)
//! - [`decoder`]: element → tree
//!
//! Scalar leaves and `@` attributes survive `decode(encode(t))`. Positional
//! entries do not keep their shape exactly: a top-level list comes back as a
//! `node` list, and a one-item list comes back as its single item. That
//! asymmetry is part of the format, not something the decoder guesses around.

pub mod decoder;
pub mod element;
pub mod encoder;

pub use decoder::decode;
pub use element::Element;
pub use encoder::{encode, encode_with_root, DEFAULT_ROOT, LIST_ITEM};

use tracing::debug;

use crate::error::Result;
use crate::types::Tree;

/// Encode `tree` as a complete XML document string.
///
/// ```
/// use serde_json::json;
/// use treetext::{xml, Tree};
///
/// let doc = xml::to_string(&Tree::from(json!({"a": 1}))).unwrap();
/// assert_eq!(doc, r#"<?xml version="1.0" standalone="yes"?><xml><a>1</a></xml>"#);
/// ```
pub fn to_string(tree: &Tree) -> Result<String> {
    encode(tree)?.to_xml_string()
}

/// Parse XML text and decode its root element.
pub fn from_str(xml: &str) -> Result<Tree> {
    let root = Element::parse(xml)?;
    debug!(root = %root.name, children = root.children.len(), "decoding xml");
    Ok(decode(&root))
}
