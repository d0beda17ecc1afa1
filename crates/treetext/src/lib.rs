//! # treetext
//!
//! Converts a dynamically shaped **tree value** (scalars, ordered lists and
//! ordered maps with `@attributes`) to and from text.
//!
//! - INI: dotted `[a.b]` sections, rebuilt into nested maps on decode
//! - XML: `@name` keys as attributes, repeated tags as lists
//! - Templates: a recursive printf-style renderer with a per-key marker
//!   overlay, plus HTML fragment builders (attributes, `<option>` lists,
//!   form inputs, nested lists, menus) built on it
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use treetext::{ini, xml, Tree};
//!
//! let tree = Tree::from(json!({"title": "demo", "db": {"port": 5432}}));
//!
//! let text = ini::encode(&tree).unwrap();
//! assert_eq!(ini::decode(&text).unwrap(), tree);
//!
//! let doc = xml::to_string(&tree).unwrap();
//! assert_eq!(xml::from_str(&doc).unwrap(), tree);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `Tree`, `Scalar`, `Map`, `Key`
//! - [`ini`]: INI encoder/decoder
//! - [`xml`]: XML element model, encoder/decoder
//! - [`render`]: the template renderer
//! - [`html`]: HTML fragment builders
//! - [`format`]: `%s`/`%N$s` and `%(name)s` formatting
//! - [`filter`]: `only`, `except`, `get`, `eliminate`, `extract`
//! - [`error`]: error type for conversion and rendering failures

pub mod error;
pub mod filter;
pub mod format;
pub mod html;
pub mod ini;
pub mod render;
pub mod types;
pub mod xml;

pub use error::{Result, TreeError};
pub use filter::{eliminate, except, extract, get, only};
pub use render::{render, Templates, NO_MARKERS};
pub use types::{Key, Map, Scalar, Tree};
