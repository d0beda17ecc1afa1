//! printf-style template formatting.
//!
//! Supported directives:
//!
//! - `%s` -- next argument as text
//! - `%d` -- next argument's integer prefix (`0` when it has none)
//! - `%N$s`, `%N$d` -- argument `N` (1-based), without consuming the sequence
//! - `%%` -- a literal percent sign
//!
//! [`format_named`] adds `%(name)s` placeholders resolved against a [`Map`].

use crate::error::{Result, TreeError};
use crate::types::{Map, Tree};

/// Format `template` with positional `args`.
///
/// ```
/// use treetext::format::sprintf;
///
/// assert_eq!(sprintf("%2$s=%1$s", &["a", "b"]).unwrap(), "b=a");
/// assert_eq!(sprintf("%s is %d%%", &["x", "42abc"]).unwrap(), "x is 42%");
/// ```
pub fn sprintf(template: &str, args: &[&str]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        let index = if digits.is_empty() {
            next_arg += 1;
            next_arg
        } else {
            if chars.next() != Some('$') {
                return Err(TreeError::TemplateArity(format!(
                    "unsupported directive `%{digits}` in template {template:?}"
                )));
            }
            match digits.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(TreeError::TemplateArity(format!(
                        "argument index `{digits}` must be 1 or more"
                    )))
                }
            }
        };

        let arg = args.get(index - 1).ok_or_else(|| {
            TreeError::TemplateArity(format!(
                "template {template:?} uses argument {index} but only {} given",
                args.len()
            ))
        })?;

        match chars.next() {
            Some('s') => out.push_str(arg),
            Some('d') => out.push_str(&integer_prefix(arg).to_string()),
            other => {
                return Err(TreeError::TemplateArity(format!(
                    "unsupported conversion {other:?} in template {template:?}"
                )))
            }
        }
    }

    Ok(out)
}

/// Format `%(name)s` / `%(name)d` placeholders with values from `values`.
/// Missing names and complex values render as empty text.
///
/// ```
/// use treetext::{format::format_named, Map};
///
/// let values = Map::new().with("user", "ann").with("n", 3);
/// let text = format_named("%(user)s has %(n)d items", &values).unwrap();
/// assert_eq!(text, "ann has 3 items");
/// ```
pub fn format_named(template: &str, values: &Map) -> Result<String> {
    let mut rewritten = String::with_capacity(template.len());
    let mut texts: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("%(") {
        let (before, after) = rest.split_at(start);
        // An odd run of `%` before `(` means the percent itself is escaped.
        let percents = before.chars().rev().take_while(|c| *c == '%').count();
        if percents % 2 == 1 {
            rewritten.push_str(before);
            rewritten.push_str("%(");
            rest = &after[2..];
            continue;
        }
        let Some(end) = after.find(')') else {
            break;
        };
        let name = &after[2..end];
        texts.push(values.get(name).map(scalar_text).unwrap_or_default());
        rewritten.push_str(before);
        rewritten.push_str(&format!("%{}$", texts.len()));
        rest = &after[end + 1..];
    }
    rewritten.push_str(rest);

    let args: Vec<&str> = texts.iter().map(String::as_str).collect();
    sprintf(&rewritten, &args)
}

/// Text of a scalar tree; complex values have no text.
pub(crate) fn scalar_text(tree: &Tree) -> String {
    match tree {
        Tree::Scalar(s) => s.to_string(),
        _ => String::new(),
    }
}

/// Leading integer of `arg`, after optional whitespace and sign.
fn integer_prefix(arg: &str) -> i64 {
    let trimmed = arg.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
