//! Key selection helpers for maps and routed lookup through trees.
//!
//! # Route syntax
//!
//! - `"name"` -- the top-level entry `name`
//! - `"server.port"` -- `port` inside `server`
//! - `"servers/0/host"` -- `/` works as a separator too; all-digit segments
//!   index into lists

use crate::types::{Key, Map, Tree};

/// A parsed route, split on `.` and `/`.
///
/// `"items.0/name"` becomes `["items", "0", "name"]`.
#[derive(Debug, Clone)]
struct Route<'a> {
    segments: Vec<&'a str>,
}

impl<'a> Route<'a> {
    fn parse(route: &'a str) -> Self {
        Self {
            segments: route.split(['.', '/']).collect(),
        }
    }
}

/// Keep only the whitelisted keys, in the map's own order.
///
/// ```
/// use treetext::{only, Map};
///
/// let map = Map::new().with("a", 1).with("b", 2).with("c", 3);
/// let kept = only(&map, &["c", "a"]);
/// assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["a", "c"]);
/// ```
pub fn only(map: &Map, keys: &[&str]) -> Map {
    map.iter()
        .filter(|(k, _)| keys.contains(k))
        .map(|(k, v)| (k, v.clone()))
        .collect()
}

/// Drop the blacklisted keys, keeping the rest in order.
///
/// `only(m, k)` and `except(m, k)` partition the keys of `m`.
pub fn except(map: &Map, keys: &[&str]) -> Map {
    map.iter()
        .filter(|(k, _)| !keys.contains(k))
        .map(|(k, v)| (k, v.clone()))
        .collect()
}

/// Value at `key`, or `default` when the key is absent or null.
pub fn get(map: &Map, key: &str, default: Tree) -> Tree {
    match map.get(key) {
        Some(value) if !is_null(value) => value.clone(),
        _ => default,
    }
}

/// Like [`get`], but also removes the key from the map.
///
/// A null entry is left in place and the default is returned.
pub fn eliminate(map: &mut Map, key: &str, default: Tree) -> Tree {
    match map.get(key) {
        Some(value) if !is_null(value) => map.remove(key).unwrap_or(default),
        _ => default,
    }
}

/// Follow `route` through maps and lists, returning `default` as soon as a
/// segment is missing.
///
/// ```
/// use serde_json::json;
/// use treetext::{extract, Tree};
///
/// let tree = Tree::from(json!({"db": {"hosts": ["a", "b"]}}));
/// assert_eq!(extract(&tree, "db/hosts.1", Tree::null()), Tree::from("b"));
/// assert_eq!(extract(&tree, "db.port", Tree::from(5432)), Tree::from(5432));
/// ```
pub fn extract(tree: &Tree, route: &str, default: Tree) -> Tree {
    let route = Route::parse(route);
    let mut current = tree;
    for segment in route.segments {
        match current.child(Key::Name(segment)) {
            Some(next) if !is_null(next) => current = next,
            _ => return default,
        }
    }
    current.clone()
}

fn is_null(tree: &Tree) -> bool {
    matches!(tree, Tree::Scalar(crate::types::Scalar::Null))
}
