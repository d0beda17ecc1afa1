//! INI Decoder: parses typed INI text back into a tree.
//!
//! Parsing happens in two passes:
//!
//! 1. **Lines → sections.** Each `[name]` header opens a top-level map named
//!    verbatim (dots included); `key=value` lines land in the current section.
//!    `key[]=v` appends to a list and `key[sub]=v` fills a map.
//! 2. **Dotted keys → nesting.** Every top-level key containing `.` is split
//!    into a single-child chain (`a.b.c` → `a → b → c → value`), deep-merged
//!    into the result, and removed.
//!
//! Maps whose keys turn out to be exactly `"0".."n-1"` are rebuilt as lists.
//!
//! # Typed values
//!
//! - `on`/`yes`/`true` → `true`, `off`/`no`/`false`/`none` → `false`
//! - `null` → null
//! - integer and decimal literals → numbers
//! - `"quoted"` → the string verbatim (escapes `\"`, `\\`, `\n`, `\r`, `\t`)
//! - anything else → trimmed string

use indexmap::IndexMap;
use tracing::debug;

use super::{FALSE_WORDS, TRUE_WORDS};
use crate::error::{Result, TreeError};
use crate::types::{Map, Scalar, Tree};

/// Decode INI text into a tree.
pub fn decode(ini: &str) -> Result<Tree> {
    let (mut root, dotted): (Map, Map) = parse_sections(ini)?
        .into_iter()
        .partition(|(key, _)| !key.contains('.'));

    for (key, value) in dotted {
        debug!(key = %key, "expanding dotted ini key");
        let branch = key
            .rsplit('.')
            .fold(value, |carry, part| Tree::Map(Map::new().with(part, carry)));
        if let Tree::Map(branch) = branch {
            merge_into(&mut root, branch, "")?;
        }
    }

    Ok(Tree::Map(root).into_lists())
}

/// First pass: comments, headers, and `key=value` assignments.
///
/// Keys before the first header are globals; sections follow them in order of
/// first appearance, and a repeated header reopens the same section.
fn parse_sections(ini: &str) -> Result<Map> {
    let mut globals = Map::new();
    let mut sections: IndexMap<String, Map> = IndexMap::new();
    let mut current: Option<usize> = None;

    for (idx, raw_line) in ini.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = parse_header(rest).ok_or_else(|| TreeError::IniParse {
                line: line_no,
                message: format!("unterminated section header: {line}"),
            })?;
            let entry = sections.entry(name);
            current = Some(entry.index());
            entry.or_default();
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(TreeError::IniParse {
                line: line_no,
                message: format!("expected `key=value`, found: {line}"),
            });
        };
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(TreeError::IniParse {
                line: line_no,
                message: "empty key".to_string(),
            });
        }
        let value = parse_value(raw_value.trim()).map_err(|message| TreeError::IniParse {
            line: line_no,
            message,
        })?;

        let target = match current.and_then(|pos| sections.get_index_mut(pos)) {
            Some((_, section)) => section,
            None => &mut globals,
        };
        assign(target, key, value);
    }

    for (name, section) in sections {
        globals.insert(name, section);
    }
    Ok(globals)
}

/// Section name inside `[...]`, allowing a trailing comment after `]`.
fn parse_header(rest: &str) -> Option<String> {
    let (name, tail) = rest.split_once(']')?;
    let tail = tail.trim();
    if !tail.is_empty() && !tail.starts_with(';') && !tail.starts_with('#') {
        return None;
    }
    Some(name.trim().to_string())
}

/// Store `value` under `key`, honouring `key[]` and `key[sub]` forms.
fn assign(target: &mut Map, key: &str, value: Scalar) {
    let Some((name, sub)) = key
        .strip_suffix(']')
        .and_then(|k| k.split_once('['))
        .map(|(name, sub)| (name.trim(), sub.trim()))
    else {
        target.insert(key, value);
        return;
    };

    if !target.contains_key(name) {
        let fresh = if sub.is_empty() { Tree::List(Vec::new()) } else { Tree::Map(Map::new()) };
        target.insert(name, fresh);
    }
    let Some(slot) = target.get_mut(name) else {
        return;
    };

    match (slot, sub.is_empty()) {
        (Tree::List(items), true) => items.push(value.into()),
        (Tree::Map(map), true) => {
            let idx = map.next_index();
            map.insert(idx.to_string(), value);
        }
        (Tree::Map(map), false) => {
            map.insert(sub, value);
        }
        (slot, _) => {
            let previous = std::mem::take(slot);
            let mut map = match previous {
                Tree::List(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
                Tree::Scalar(s) => Map::new().with("0", s),
                Tree::Map(map) => map,
            };
            let sub = if sub.is_empty() { map.next_index().to_string() } else { sub.to_string() };
            map.insert(sub, value);
            *slot = Tree::Map(map);
        }
    }
}

/// Type a raw (already trimmed) value.
fn parse_value(raw: &str) -> std::result::Result<Scalar, String> {
    if let Some(quoted) = raw.strip_prefix('"') {
        return parse_quoted(quoted);
    }

    let text = match raw.find(';') {
        Some(pos) => raw[..pos].trim_end(),
        None => raw,
    };
    let lower = text.to_ascii_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        return Ok(Scalar::Bool(true));
    }
    if FALSE_WORDS.contains(&lower.as_str()) {
        return Ok(Scalar::Bool(false));
    }
    if lower == "null" {
        return Ok(Scalar::Null);
    }
    Ok(Scalar::parse_numeric(text).unwrap_or_else(|| Scalar::Str(text.to_string())))
}

/// Body of a double-quoted value (opening quote already consumed).
fn parse_quoted(body: &str) -> std::result::Result<Scalar, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => {
                let tail = body[i + 1..].trim();
                if !tail.is_empty() && !tail.starts_with(';') && !tail.starts_with('#') {
                    return Err(format!("unexpected text after closing quote: {tail}"));
                }
                return Ok(Scalar::Str(out));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err("unterminated quoted value".to_string())
}

/// Deep-merge `incoming` into `target`. `prefix` is the dotted path of
/// `target`, used for conflict messages.
fn merge_into(target: &mut Map, incoming: Map, prefix: &str) -> Result<()> {
    for (key, value) in incoming {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match target.get_mut(&key) {
            Some(slot) => {
                let existing = std::mem::take(slot);
                *slot = merge_value(existing, value, &path)?;
            }
            None => {
                target.insert(key, value);
            }
        }
    }
    Ok(())
}

/// Merge two values meeting at the same path. A scalar meeting a container
/// is absorbed into it under the first free positional key and the nested
/// entries keep precedence; two scalars cannot be reconciled.
fn merge_value(existing: Tree, incoming: Tree, path: &str) -> Result<Tree> {
    match (existing, incoming) {
        (Tree::Map(mut a), Tree::Map(b)) => {
            merge_into(&mut a, b, path)?;
            Ok(Tree::Map(a))
        }
        (Tree::List(mut a), Tree::List(b)) => {
            a.extend(b);
            Ok(Tree::List(a))
        }
        (Tree::List(a), Tree::Map(b)) => {
            let mut map: Map = a.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect();
            merge_into(&mut map, b, path)?;
            Ok(Tree::Map(map))
        }
        (Tree::Map(mut a), Tree::List(b)) => {
            let list: Map = b.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect();
            merge_into(&mut a, list, path)?;
            Ok(Tree::Map(a))
        }
        (Tree::Map(mut a), scalar @ Tree::Scalar(_)) => {
            let idx = a.next_index();
            a.insert(idx.to_string(), scalar);
            Ok(Tree::Map(a))
        }
        (Tree::List(mut a), scalar @ Tree::Scalar(_)) => {
            a.push(scalar);
            Ok(Tree::List(a))
        }
        (scalar @ Tree::Scalar(_), Tree::Map(b)) => {
            let idx = b.next_index();
            let mut merged = Map::new().with(idx.to_string(), scalar);
            for (k, v) in b {
                merged.insert(k, v);
            }
            Ok(Tree::Map(merged))
        }
        (scalar @ Tree::Scalar(_), Tree::List(b)) => {
            let mut items = vec![scalar];
            items.extend(b);
            Ok(Tree::List(items))
        }
        (Tree::Scalar(_), Tree::Scalar(_)) => Err(TreeError::KeyConflict {
            path: path.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_allows_trailing_comment() {
        assert_eq!(parse_header("a.b] ; note").as_deref(), Some("a.b"));
        assert_eq!(parse_header("a.b"), None);
        assert_eq!(parse_header("a] junk"), None);
    }

    #[test]
    fn value_typing() {
        assert_eq!(parse_value("On"), Ok(Scalar::Bool(true)));
        assert_eq!(parse_value("none"), Ok(Scalar::Bool(false)));
        assert_eq!(parse_value("NULL"), Ok(Scalar::Null));
        assert_eq!(parse_value("12"), Ok(Scalar::Int(12)));
        assert_eq!(parse_value("1.25"), Ok(Scalar::Float(1.25)));
        assert_eq!(parse_value("plain ; comment"), Ok(Scalar::Str("plain".into())));
        assert_eq!(parse_value(""), Ok(Scalar::Str(String::new())));
        assert_eq!(parse_value(r#""12""#), Ok(Scalar::Str("12".into())));
    }

    #[test]
    fn quoted_errors() {
        assert!(parse_value(r#""open"#).is_err());
        assert!(parse_value(r#""a" b"#).is_err());
        assert_eq!(parse_value(r#""a\"b" ; c"#), Ok(Scalar::Str("a\"b".into())));
    }

    #[test]
    fn scalar_absorbed_into_map() {
        let merged = merge_value(Tree::from(1), Tree::Map(Map::new().with("c", 2)), "a").unwrap();
        assert_eq!(merged, Tree::Map(Map::new().with("0", 1).with("c", 2)));
    }

    #[test]
    fn scalar_collision_is_conflict() {
        let err = merge_value(Tree::from(1), Tree::from(2), "a.b").unwrap_err();
        assert!(matches!(err, TreeError::KeyConflict { path } if path == "a.b"));
    }
}
