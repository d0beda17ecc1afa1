//! The Tree Value model shared by every codec and the renderer.
//!
//! A [`Tree`] is decided once, at construction or decode time, to be a
//! [`Scalar`], an ordered list, or an ordered [`Map`]. Converters pattern-match
//! on that tag instead of probing shapes at each use site.
//!
//! Maps are insertion-ordered. Keys prefixed with `@` are the node's
//! attributes.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::error::Result;

/// Prefix marking a map key as an attribute of its node.
pub const ATTRIBUTE_PREFIX: char = '@';

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The "empty" test used by the renderer and the HTML builders:
    /// null, `false`, zero, `""` and `"0"` are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Str(s) => s.is_empty() || s == "0",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Scalar::Bool(_))
    }

    /// Coerce numeric-looking text: floats when it contains `.`, integers
    /// otherwise. Exponent forms without a `.` (`1e3`) are integers too,
    /// truncated toward zero; anything outside `i64` stays a float. `None`
    /// for anything that is not a number, including `""`.
    pub fn parse_numeric(text: &str) -> Option<Scalar> {
        if !looks_numeric(text) {
            return None;
        }
        let float = text.parse::<f64>().ok()?;
        if text.contains('.') {
            return Some(Scalar::Float(float));
        }
        if let Ok(i) = text.parse::<i64>() {
            return Some(Scalar::Int(i));
        }
        let whole = float.trunc();
        // i64::MAX is not representable; its f64 neighbour is 2^63.
        if whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
            Some(Scalar::Int(whole as i64))
        } else {
            Some(Scalar::Float(float))
        }
    }
}

/// Matches `[+-]digits[.digits][(e|E)[+-]digits]` with at least one mantissa
/// digit. Rejects `inf`, `NaN` and surrounding whitespace.
pub(crate) fn looks_numeric(s: &str) -> bool {
    let rest = s.strip_prefix(['-', '+']).unwrap_or(s);
    if rest.is_empty() {
        return false;
    }
    let mut has_dot = false;
    let mut has_e = false;
    let mut mantissa_digit = false;
    let mut exponent_digit = false;
    let bytes = rest.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' if has_e => exponent_digit = true,
            b'0'..=b'9' => mantissa_digit = true,
            b'.' if !has_dot && !has_e => has_dot = true,
            b'e' | b'E' if !has_e && mantissa_digit => has_e = true,
            b'+' | b'-' if has_e && matches!(bytes[i - 1], b'e' | b'E') => {}
            _ => return false,
        }
    }
    mantissa_digit && (!has_e || exponent_digit)
}

/// Text form of a scalar: null is empty, booleans are `true`/`false`,
/// integral floats keep a trailing `.0` so they read back as floats.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

/// A map key as seen while iterating a [`Tree`]: list positions are
/// indices, map keys are names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

impl Key<'_> {
    /// Positional keys are list indices and all-digit map names.
    pub fn is_positional(&self) -> bool {
        match self {
            Key::Index(_) => true,
            Key::Name(name) => is_positional_name(name),
        }
    }

    /// The attribute name if this key is `@`-prefixed.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => name.strip_prefix(ATTRIBUTE_PREFIX),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

pub(crate) fn is_positional_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Insertion-ordered string-keyed map. Equality ignores entry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: IndexMap<String, Tree>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Tree>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tree> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value. An existing key keeps its position and the old value
    /// is returned; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tree>) -> Option<Tree> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Tree> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Tree> {
        self.entries.values()
    }

    /// `@`-prefixed entries, with the prefix stripped from the name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(ATTRIBUTE_PREFIX).map(|name| (name, v)))
    }

    /// Smallest all-digit key not yet in use.
    pub(crate) fn next_index(&self) -> usize {
        (0..)
            .find(|i: &usize| !self.entries.contains_key(i.to_string().as_str()))
            .unwrap_or_default()
    }

    /// True when the keys are exactly `"0".."n-1"` in some order.
    fn is_sequential(&self) -> bool {
        let n = self.len();
        n > 0 && (0..n).all(|i| self.entries.contains_key(i.to_string().as_str()))
    }
}

impl<K: Into<String>, V: Into<Tree>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<Tree>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Map {
    type Item = (String, Tree);
    type IntoIter = indexmap::map::IntoIter<String, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The universal interchange value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Scalar(Scalar),
    List(Vec<Tree>),
    Map(Map),
}

impl Default for Tree {
    fn default() -> Self {
        Tree::Scalar(Scalar::Null)
    }
}

impl Tree {
    pub fn null() -> Self {
        Tree::Scalar(Scalar::Null)
    }

    /// Parse JSON text into a tree, keeping object key order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Tree::from(value))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Tree::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Tree::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Tree::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tree]> {
        match self {
            Tree::List(items) => Some(items),
            _ => None,
        }
    }

    /// See [`Scalar::is_blank`]; containers are blank when they have no entries.
    pub fn is_blank(&self) -> bool {
        match self {
            Tree::Scalar(s) => s.is_blank(),
            Tree::List(items) => items.is_empty(),
            Tree::Map(map) => map.is_empty(),
        }
    }

    /// Iterate `(key, child)` pairs of a list or map. `None` for scalars.
    pub fn entries(&self) -> Option<Entries<'_>> {
        match self {
            Tree::Scalar(_) => None,
            Tree::List(items) => Some(Entries::List(items.iter().enumerate())),
            Tree::Map(map) => Some(Entries::Map(map.entries.iter())),
        }
    }

    /// Child at `key`: maps look up the key's text, lists accept indices and
    /// all-digit names.
    pub fn child(&self, key: Key<'_>) -> Option<&Tree> {
        match (self, key) {
            (Tree::Map(map), Key::Name(name)) => map.get(name),
            (Tree::Map(map), Key::Index(i)) => map.get(&i.to_string()),
            (Tree::List(items), Key::Index(i)) => items.get(i),
            (Tree::List(items), Key::Name(name)) if is_positional_name(name) => {
                name.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    /// Rebuild lists from maps whose keys are exactly `"0".."n-1"`, recursively.
    /// Items are placed by index, whatever order the keys arrived in.
    pub fn into_lists(self) -> Tree {
        match self {
            Tree::Map(mut map) if map.is_sequential() => {
                let n = map.len();
                Tree::List(
                    (0..n)
                        .filter_map(|i| map.entries.swap_remove(i.to_string().as_str()))
                        .map(Tree::into_lists)
                        .collect(),
                )
            }
            Tree::Map(map) => Tree::Map(map.into_iter().map(|(k, v)| (k, v.into_lists())).collect()),
            Tree::List(items) => Tree::List(items.into_iter().map(Tree::into_lists).collect()),
            scalar => scalar,
        }
    }
}

/// Iterator returned by [`Tree::entries`].
pub enum Entries<'a> {
    List(std::iter::Enumerate<std::slice::Iter<'a, Tree>>),
    Map(indexmap::map::Iter<'a, String, Tree>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Key<'a>, &'a Tree);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::List(iter) => iter.next().map(|(i, v)| (Key::Index(i), v)),
            Entries::Map(iter) => iter.next().map(|(k, v)| (Key::Name(k.as_str()), v)),
        }
    }
}

impl From<Scalar> for Tree {
    fn from(s: Scalar) -> Self {
        Tree::Scalar(s)
    }
}

impl From<Map> for Tree {
    fn from(m: Map) -> Self {
        Tree::Map(m)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::List(items)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Scalar(s.into())
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Scalar(s.into())
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Scalar(b.into())
    }
}

impl From<i64> for Tree {
    fn from(i: i64) -> Self {
        Tree::Scalar(i.into())
    }
}

impl From<i32> for Tree {
    fn from(i: i32) -> Self {
        Tree::Scalar(i.into())
    }
}

impl From<f64> for Tree {
    fn from(f: f64) -> Self {
        Tree::Scalar(f.into())
    }
}

/// JSON objects keep their key order (serde_json `preserve_order`).
/// Integers become `Int`; any other number becomes `Float`.
impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().unwrap_or(f64::NAN).into(),
            },
            Value::String(s) => s.into(),
            Value::Array(items) => Tree::List(items.into_iter().map(Tree::from).collect()),
            Value::Object(obj) => Tree::Map(obj.into_iter().collect()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Tree::Scalar(s) => s.serialize(serializer),
            Tree::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
