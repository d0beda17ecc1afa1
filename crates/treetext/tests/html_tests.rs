use serde_json::json;
use treetext::html::{
    attr_pairs, show_attrs, show_input, show_menu, show_options, show_tree, InputDefaults, Selected,
};
use treetext::{Map, Tree, TreeError};

fn tree(value: serde_json::Value) -> Tree {
    Tree::from(value)
}

/// Helper: build an attribute bag from a JSON object literal.
fn bag(value: serde_json::Value) -> Map {
    match Tree::from(value) {
        Tree::Map(map) => map,
        other => panic!("expected an object, got {other:?}"),
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn attrs_render_key_value_pairs() {
    let out = show_attrs(&tree(json!({"id": "main", "n": 2}))).unwrap();
    assert_eq!(out, vec![r#"id="main""#, r#"n="2""#]);
}

#[test]
fn attr_pairs_follow_html_conventions() {
    let attrs = Map::new().with("required", Tree::null()).with("checked", true).with("id", "x");
    assert_eq!(attr_pairs(&attrs, None), vec!["required", r#"checked="on""#, r#"id="x""#]);
    assert_eq!(attr_pairs(&attrs, Some(&["id"][..])), vec![r#"id="x""#]);
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn options_from_list() {
    let out = show_options(&tree(json!(["a", "b"])), &Selected::None).unwrap();
    assert_eq!(
        out,
        vec![r#"<option value="0">a</option>"#, r#"<option value="1">b</option>"#]
    );
}

#[test]
fn options_selected_key_reaches_into_groups() {
    let options = tree(json!({"Fruit": {"ap": "Apple"}, "x": "X"}));
    let out = show_options(&options, &Selected::Key("ap".into())).unwrap();
    assert_eq!(
        out,
        vec![
            r#"<optgroup label="Fruit"><option value="ap" selected="selected">Apple</option></optgroup>"#,
            r#"<option value="x">X</option>"#,
        ]
    );
}

#[test]
fn options_with_marker_overlay() {
    let selected = Selected::from_tree(tree(json!({"b": " disabled"})));
    let out = show_options(&tree(json!({"a": "A", "b": "B"})), &selected).unwrap();
    assert_eq!(out[1], r#"<option value="b" disabled>B</option>"#);
}

// ============================================================================
// Inputs
// ============================================================================

#[test]
fn input_boolean_value_defaults_to_checkbox() {
    let input = show_input(bag(json!({"value": true})), &InputDefaults::default()).unwrap();
    assert_eq!(
        input.lines,
        vec![r#"<input type="checkbox" name="checkbox[]""#, r#"value="1" />"#]
    );
    assert!(input.leftover.is_empty());
}

#[test]
fn input_false_value_is_empty() {
    let input = show_input(bag(json!({"value": false, "name": "opt"})), &InputDefaults::default()).unwrap();
    assert_eq!(input.lines[1], r#"value="" />"#);
}

#[test]
fn input_select_wraps_options() {
    let input = show_input(bag(json!({"type": "select", "value": ["a", "b"]})), &InputDefaults::default()).unwrap();
    assert_eq!(
        input.to_html(),
        [
            r#"<select name="select[]">"#,
            r#"<option value="0">a</option>"#,
            r#"<option value="1">b</option>"#,
            "</select>",
        ]
        .join("\n")
    );
}

#[test]
fn input_select_consumes_selected_and_keeps_extra_attrs() {
    let attrs = bag(json!({"type": "select", "name": "pick", "value": ["a", "b"], "selected": 1, "class": "c"}));
    let input = show_input(attrs, &InputDefaults::default()).unwrap();
    assert_eq!(input.lines[0], r#"<select name="pick" class="c">"#);
    assert!(input.lines[1].contains(r#"<option value="1" selected="selected">b</option>"#));
    assert_eq!(input.leftover, bag(json!({"class": "c"})));
}

#[test]
fn input_textarea_escapes_leaves() {
    let input = show_input(bag(json!({"type": "textarea", "value": ["<a>", "b"]})), &InputDefaults::default()).unwrap();
    assert_eq!(
        input.lines,
        vec![r#"<textarea name="textarea[]">"#, "&lt;a&gt;\nb", "</textarea>"]
    );
}

#[test]
fn input_image_is_button() {
    let input = show_input(bag(json!({"type": "image", "value": "/i.png", "name": "go"})), &InputDefaults::default()).unwrap();
    assert_eq!(
        input.lines,
        vec![r#"<button name="go">"#, r#"<img src="/i.png" />"#, "</button>"]
    );
}

#[test]
fn input_label_and_div_wrap_control() {
    let attrs = bag(json!({"label": "Name", "div": {"class": "row"}, "name": "n", "value": "a\"b"}));
    let input = show_input(attrs, &InputDefaults::default()).unwrap();
    assert_eq!(
        input.lines,
        vec![
            r#"<div class="row">"#,
            "<label>Name",
            r#"<input type="text" name="n""#,
            r#"value="a&quot;b" />"#,
            "</label>",
            "</div>",
        ]
    );
}

#[test]
fn input_truthy_scalar_div_is_plain() {
    let input = show_input(bag(json!({"div": true})), &InputDefaults::default()).unwrap();
    assert_eq!(input.lines.first().map(String::as_str), Some("<div>"));
    assert_eq!(input.lines.last().map(String::as_str), Some("</div>"));
}

#[test]
fn input_generic_attributes_on_own_line() {
    let input = show_input(bag(json!({"id": "q", "size": 10})), &InputDefaults::default()).unwrap();
    assert_eq!(
        input.lines,
        vec![r#"<input type="text" name="text[]""#, r#"id="q" size="10""#, r#"value="" />"#]
    );
    assert_eq!(input.leftover.len(), 2);
}

#[test]
fn input_uses_supplied_defaults() {
    let defaults = InputDefaults {
        kind: Some("email".into()),
        name: Some("mail".into()),
        value: Some(Tree::from("x")),
    };
    let input = show_input(Map::new(), &defaults).unwrap();
    assert_eq!(input.lines, vec![r#"<input type="email" name="mail""#, r#"value="x" />"#]);
}

// ============================================================================
// Trees and menus
// ============================================================================

#[test]
fn tree_nests_by_depth() {
    let out = show_tree(&tree(json!({"a": "x", "b": ["y"]})), "div").unwrap();
    assert_eq!(
        out,
        vec!["<div>", "<div>x</div>", "<div><div>\n<div>y</div>\n</div></div>", "</div>"]
    );
}

#[test]
fn tree_unknown_root_uses_span_items() {
    let out = show_tree(&tree(json!(["x"])), "p").unwrap();
    assert_eq!(out, vec!["<p>", "<span>x</span>", "</p>"]);
}

#[test]
fn tree_blank_is_empty() {
    assert!(show_tree(&tree(json!([])), "ul").unwrap().is_empty());
    assert!(show_tree(&Tree::null(), "ul").unwrap().is_empty());
}

#[test]
fn tree_scalar_is_error() {
    assert!(matches!(show_tree(&tree(json!("x")), "ul"), Err(TreeError::TemplateArity(_))));
}

#[test]
fn menu_nests_submenus_and_applies_root_attrs() {
    let menu = tree(json!({"Home": "/", "More": {"About": "/about"}}));
    let attrs = tree(json!({"class": "nav"}));
    let out = show_menu(&menu, Some(&attrs)).unwrap();
    assert_eq!(
        out,
        vec![
            r#"<ul class="nav">"#,
            r#"<li><a href="/">Home</a></li>"#,
            "<li><ul>\n<li><a href=\"/about\">About</a></li>\n</ul></li>",
            "</ul>",
        ]
    );
}
