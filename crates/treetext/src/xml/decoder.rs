//! XML Decoder: converts an [`Element`] tree back into a tree.
//!
//! The decoded value is the element's *content*; its own tag is dropped:
//!
//! - attributes become `@name` keys, ahead of everything else
//! - text that sits next to attributes or children is kept under `"0"`
//! - children are grouped by tag in order of first appearance; a tag that
//!   occurs more than once becomes a list
//! - a child with neither attributes nor children decodes to its text, or to
//!   an empty map when it has none
//!
//! Numeric-looking text and attribute values are coerced to numbers (float
//! iff the text contains `.`); everything else stays a string, whitespace
//! included.

use indexmap::IndexMap;

use super::element::Element;
use crate::types::{Map, Scalar, Tree, ATTRIBUTE_PREFIX};

/// Decode the content of `element`.
pub fn decode(element: &Element) -> Tree {
    Tree::Map(decode_content(element))
}

fn decode_content(element: &Element) -> Map {
    let mut out = Map::new();

    for (name, value) in &element.attributes {
        out.insert(format!("{ATTRIBUTE_PREFIX}{name}"), coerce(value));
    }
    if let Some(text) = element.text.as_deref().filter(|t| !t.is_empty()) {
        out.insert("0", coerce(text));
    }

    let mut groups: IndexMap<&str, Vec<&Element>> = IndexMap::new();
    for child in &element.children {
        groups.entry(child.name.as_str()).or_default().push(child);
    }

    for (name, members) in groups {
        let value = match members.as_slice() {
            [single] => decode_child(single),
            many => Tree::List(many.iter().map(|c| decode_child(c)).collect()),
        };
        out.insert(name, value);
    }

    out
}

fn decode_child(child: &Element) -> Tree {
    if child.attributes.is_empty() && child.children.is_empty() {
        return match child.text.as_deref() {
            Some(text) => coerce(text).into(),
            None => Tree::Map(Map::new()),
        };
    }
    Tree::Map(decode_content(child))
}

fn coerce(text: &str) -> Scalar {
    Scalar::parse_numeric(text).unwrap_or_else(|| Scalar::Str(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_numbers_only() {
        assert_eq!(coerce("7"), Scalar::Int(7));
        assert_eq!(coerce("7.0"), Scalar::Float(7.0));
        assert_eq!(coerce("1e3"), Scalar::Int(1000));
        assert_eq!(coerce(" 7 "), Scalar::Str(" 7 ".into()));
        assert_eq!(coerce(""), Scalar::Str(String::new()));
        assert_eq!(coerce("7 apples"), Scalar::Str("7 apples".into()));
    }
}
