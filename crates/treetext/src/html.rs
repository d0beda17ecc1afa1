//! HTML fragment builders on top of the [renderer](crate::render).
//!
//! Every builder returns the fragment as a list of lines and never touches a
//! document; callers join and insert the lines themselves. Keys and values are
//! written as given, except for `<input>` values and `<textarea>` content,
//! which are escaped.

use tracing::debug;

use crate::error::{Result, TreeError};
use crate::filter::eliminate;
use crate::format::scalar_text;
use crate::render::{render, Templates, NO_MARKERS};
use crate::types::{Map, Scalar, Tree};

const ATTR_TEMPLATE: &str = r#"%1$s="%2$s""#;
const OPTION_TEMPLATE: &str = r#"<option value="%1$s"%3$s>%2$s</option>"#;
const OPTGROUP_TEMPLATE: &str = r#"<optgroup label="%1$s">%2$s</optgroup>"#;
const SELECTED_MARKER: &str = r#" selected="selected""#;
const NEWLINE: &str = "\n";

/// `key="value"` for every entry.
///
/// ```
/// use treetext::{html::show_attrs, Map, Tree};
///
/// let attrs = Tree::Map(Map::new().with("id", "main").with("tabindex", 2));
/// assert_eq!(show_attrs(&attrs).unwrap(), vec![r#"id="main""#, r#"tabindex="2""#]);
/// ```
pub fn show_attrs(attrs: &Tree) -> Result<Vec<String>> {
    render(attrs, &Templates::new(ATTR_TEMPLATE), &NO_MARKERS)
}

/// Attribute strings with HTML conventions: null values produce a bare
/// key, booleans become `on`/`off`. With `only`, other keys are skipped.
pub fn attr_pairs(attrs: &Map, only: Option<&[&str]>) -> Vec<String> {
    attrs
        .iter()
        .filter(|(k, _)| only.is_none_or(|keys| keys.contains(k)))
        .map(|(k, v)| match v {
            Tree::Scalar(Scalar::Null) => k.to_string(),
            Tree::Scalar(Scalar::Bool(b)) => format!(r#"{k}="{}""#, if *b { "on" } else { "off" }),
            other => format!(r#"{k}="{}""#, scalar_text(other)),
        })
        .collect()
}

/// Which options of an option list are selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selected {
    #[default]
    None,
    /// A single selected key.
    Key(String),
    /// A full marker overlay (see [`render`]).
    Markers(Tree),
}

impl Selected {
    /// Maps and lists are overlays, any other non-blank scalar names the
    /// selected key.
    pub fn from_tree(tree: Tree) -> Self {
        match tree {
            Tree::Scalar(s) if s.is_blank() => Selected::None,
            Tree::Scalar(s) => Selected::Key(s.to_string()),
            overlay => Selected::Markers(overlay),
        }
    }

    fn markers(&self) -> Tree {
        match self {
            Selected::None => Tree::null(),
            Selected::Key(key) => Tree::Map(Map::new().with(key.as_str(), SELECTED_MARKER)),
            Selected::Markers(tree) => tree.clone(),
        }
    }
}

/// `<option>` per scalar entry, `<optgroup>` per nested entry.
///
/// ```
/// use serde_json::json;
/// use treetext::html::{show_options, Selected};
/// use treetext::Tree;
///
/// let options = Tree::from(json!({"en": "English", "de": "Deutsch"}));
/// let lines = show_options(&options, &Selected::Key("de".into())).unwrap();
/// assert_eq!(lines[1], r#"<option value="de" selected="selected">Deutsch</option>"#);
/// ```
pub fn show_options(options: &Tree, selected: &Selected) -> Result<Vec<String>> {
    let templates = Templates::new(OPTION_TEMPLATE).with_complex(OPTGROUP_TEMPLATE);
    render(options, &templates, &selected.markers())
}

/// Fallbacks for the reserved `type`, `name` and `value` keys of
/// [`show_input`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDefaults {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub value: Option<Tree>,
}

/// Markup built by [`show_input`] together with the attributes it did not
/// consume.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedInput {
    pub lines: Vec<String>,
    pub leftover: Map,
}

impl RenderedInput {
    pub fn to_html(&self) -> String {
        self.lines.join(NEWLINE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind<'a> {
    Select,
    Textarea,
    Image,
    Plain(&'a str),
}

impl<'a> InputKind<'a> {
    fn parse(kind: &'a str) -> Self {
        match kind {
            "select" => InputKind::Select,
            "textarea" => InputKind::Textarea,
            "image" => InputKind::Image,
            other => InputKind::Plain(other),
        }
    }
}

/// Build a form control from an attribute bag.
///
/// The reserved keys `div`, `value`, `type`, `name` and `label` (and
/// `selected` for selects) are taken out of `attrs`; everything left is
/// written as generic attributes and handed back in
/// [`RenderedInput::leftover`].
///
/// - `type` defaults to `checkbox` for boolean values, `text` otherwise;
///   a boolean value is written as `1` (true) or empty (false)
/// - `name` defaults to `<type>[]`
/// - `select`, `textarea` and `image` get dedicated markup; any other type is
///   a plain `<input>`
/// - a `label` wraps the control in `<label>`, a `div` (attribute map or any
///   truthy scalar) wraps everything in `<div>`
///
/// ```
/// use treetext::html::{show_input, InputDefaults};
/// use treetext::{Map, Tree};
///
/// let attrs = Map::new().with("value", true).with("class", "big");
/// let input = show_input(attrs, &InputDefaults::default()).unwrap();
/// assert_eq!(input.lines[0], r#"<input type="checkbox" name="checkbox[]""#);
/// assert_eq!(input.leftover.get("class"), Some(&Tree::from("big")));
/// ```
pub fn show_input(mut attrs: Map, defaults: &InputDefaults) -> Result<RenderedInput> {
    let mut lines = Vec::new();

    let div = eliminate(&mut attrs, "div", Tree::null());
    let has_div = !div.is_blank();
    if has_div {
        let suffix = match &div {
            Tree::Scalar(_) => String::new(),
            complex => attr_suffix(complex)?,
        };
        lines.push(format!("<div{suffix}>"));
    }

    let value = eliminate(
        &mut attrs,
        "value",
        defaults.value.clone().unwrap_or_else(|| Tree::from("")),
    );
    let default_kind = match (&defaults.kind, &value) {
        (Some(kind), _) if !kind.is_empty() => kind.clone(),
        (_, Tree::Scalar(Scalar::Bool(_))) => "checkbox".to_string(),
        _ => "text".to_string(),
    };
    let kind = scalar_text(&eliminate(&mut attrs, "type", Tree::from(default_kind)));
    let default_name = match &defaults.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("{kind}[]"),
    };
    let name = scalar_text(&eliminate(&mut attrs, "name", Tree::from(default_name)));

    let label = eliminate(&mut attrs, "label", Tree::null());
    let has_label = !label.is_blank();
    if has_label {
        lines.push(format!("<label>{}", scalar_text(&label)));
    }

    match InputKind::parse(&kind) {
        InputKind::Select => {
            let selected = Selected::from_tree(eliminate(&mut attrs, "selected", Tree::null()));
            let options = match value {
                Tree::Scalar(scalar) => Tree::List(vec![Tree::Scalar(scalar)]),
                complex => complex,
            };
            lines.push(format!(r#"<select name="{name}"{}>"#, map_suffix(&attrs)?));
            lines.push(show_options(&options, &selected)?.join(NEWLINE));
            lines.push("</select>".to_string());
        }
        InputKind::Textarea => {
            lines.push(format!(r#"<textarea name="{name}"{}>"#, map_suffix(&attrs)?));
            let mut content = Vec::new();
            collect_leaves(&value, &mut content);
            lines.push(escape(&content.join(NEWLINE)));
            lines.push("</textarea>".to_string());
        }
        InputKind::Image => {
            lines.push(format!(r#"<button name="{name}"{}>"#, map_suffix(&attrs)?));
            lines.push(format!(r#"<img src="{}" />"#, scalar_text(&value)));
            lines.push("</button>".to_string());
        }
        InputKind::Plain(kind) => {
            debug!(kind, "rendering plain <input>");
            lines.push(format!(r#"<input type="{kind}" name="{name}""#));
            if !attrs.is_empty() {
                lines.push(show_attrs(&Tree::Map(attrs.clone()))?.join(" "));
            }
            lines.push(format!(r#"value="{}" />"#, escape(&input_value(&value))));
        }
    }

    if has_label {
        lines.push("</label>".to_string());
    }
    if has_div {
        lines.push("</div>".to_string());
    }

    Ok(RenderedInput {
        lines,
        leftover: attrs,
    })
}

/// Nested list markup mirroring the depth of `tree`. `ul`/`ol` wrap items in
/// `li`, `div` in `div`, anything else in `span`. Blank trees produce nothing.
///
/// ```
/// use serde_json::json;
/// use treetext::{html::show_tree, Tree};
///
/// let lines = show_tree(&Tree::from(json!(["a", ["b"]])), "ul").unwrap();
/// assert_eq!(lines, vec!["<ul>", "<li>a</li>", "<li><ul>\n<li>b</li>\n</ul></li>", "</ul>"]);
/// ```
pub fn show_tree(tree: &Tree, root_tag: &str) -> Result<Vec<String>> {
    if tree.is_blank() {
        return Ok(Vec::new());
    }
    let entries = tree.entries().ok_or_else(|| {
        TreeError::TemplateArity("show_tree expects a map or a list, got a scalar".to_string())
    })?;
    let item_tag = match root_tag {
        "ul" | "ol" => "li",
        "div" => "div",
        _ => "span",
    };

    let mut lines = vec![format!("<{root_tag}>")];
    for (_, value) in entries {
        let inner = match value {
            Tree::Scalar(scalar) => scalar.to_string(),
            branch => show_tree(branch, root_tag)?.join(NEWLINE),
        };
        lines.push(format!("<{item_tag}>{inner}</{item_tag}>"));
    }
    lines.push(format!("</{root_tag}>"));
    Ok(lines)
}

/// Menu markup: scalar entries are `label → href` links, nested maps become
/// nested lists. `attrs` applies to the outermost `<ul>` only.
///
/// ```
/// use serde_json::json;
/// use treetext::{html::show_menu, Tree};
///
/// let menu = Tree::from(json!({"Home": "/"}));
/// let lines = show_menu(&menu, None).unwrap();
/// assert_eq!(lines, vec!["<ul>", r#"<li><a href="/">Home</a></li>"#, "</ul>"]);
/// ```
pub fn show_menu(tree: &Tree, attrs: Option<&Tree>) -> Result<Vec<String>> {
    if tree.is_blank() {
        return Ok(Vec::new());
    }
    let entries = tree.entries().ok_or_else(|| {
        TreeError::TemplateArity("show_menu expects a map or a list, got a scalar".to_string())
    })?;
    let suffix = match attrs {
        Some(attrs) if !attrs.is_blank() => attr_suffix(attrs)?,
        _ => String::new(),
    };

    let mut lines = vec![format!("<ul{suffix}>")];
    for (key, value) in entries {
        match value {
            Tree::Scalar(href) => lines.push(format!(r#"<li><a href="{href}">{key}</a></li>"#)),
            branch => lines.push(format!("<li>{}</li>", show_menu(branch, None)?.join(NEWLINE))),
        }
    }
    lines.push("</ul>".to_string());
    Ok(lines)
}

/// ` a="1" b="2"` for a non-empty attribute tree, `""` otherwise.
fn attr_suffix(attrs: &Tree) -> Result<String> {
    let rendered = show_attrs(attrs)?;
    if rendered.is_empty() {
        return Ok(String::new());
    }
    Ok(format!(" {}", rendered.join(" ")))
}

fn map_suffix(attrs: &Map) -> Result<String> {
    if attrs.is_empty() {
        return Ok(String::new());
    }
    attr_suffix(&Tree::Map(attrs.clone()))
}

/// Text of an `<input>` value. Booleans submit as `1` or nothing.
fn input_value(value: &Tree) -> String {
    match value {
        Tree::Scalar(Scalar::Bool(true)) => "1".to_string(),
        Tree::Scalar(Scalar::Bool(false)) => String::new(),
        other => scalar_text(other),
    }
}

/// Scalar leaves in depth-first order.
fn collect_leaves(tree: &Tree, out: &mut Vec<String>) {
    match tree.entries() {
        None => out.push(scalar_text(tree)),
        Some(entries) => {
            for (_, child) in entries {
                collect_leaves(child, out);
            }
        }
    }
}

fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
