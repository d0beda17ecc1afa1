//! Integration tests for the `treetext` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the encode,
//! decode, render, tree and menu subcommands through the actual binary,
//! including stdin/stdout piping, file I/O, error handling, and roundtrips.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: absolute path of a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: read the sample.json fixture as a string.
fn sample_json() -> String {
    std::fs::read_to_string(fixture("sample.json")).expect("sample.json fixture must exist")
}

/// Helper: a fresh `treetext` command.
fn treetext() -> Command {
    Command::cargo_bin("treetext").unwrap()
}

/// Helper: run with stdin and return stdout, asserting success.
fn run_ok(args: &[&str], stdin: &str) -> String {
    let output = treetext()
        .args(args)
        .write_stdin(stdin.to_string())
        .output()
        .expect("treetext should run");
    assert!(
        output.status.success(),
        "treetext {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("output should be valid UTF-8")
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_ini_stdin_to_stdout() {
    treetext()
        .args(["encode", "--format", "ini"])
        .write_stdin(r#"{"db":{"port":5432},"name":"app"}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("name=app"))
        .stdout(predicate::str::contains("[db]"))
        .stdout(predicate::str::contains("port=5432"));
}

#[test]
fn encode_defaults_to_ini() {
    treetext()
        .arg("encode")
        .write_stdin(r#"{"flag":true}"#)
        .assert()
        .success()
        .stdout("flag=on");
}

#[test]
fn encode_ini_with_parent_prefix() {
    treetext()
        .args(["encode", "--parent", "app.v1"])
        .write_stdin(r#"{"db":{"port":1}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("[app.v1.db]"));
}

#[test]
fn encode_xml_with_custom_root() {
    treetext()
        .args(["encode", "-f", "xml", "--root", "config"])
        .write_stdin(r#"{"@version":2,"item":["a","b"]}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"<?xml version="1.0" standalone="yes"?>"#))
        .stdout(predicate::str::contains(
            r#"<config version="2"><item>a</item><item>b</item></config>"#,
        ));
}

#[test]
fn encode_file_to_file() {
    let output_path = std::env::temp_dir().join("treetext-test-encode-output.ini");
    let output_path = output_path.to_str().expect("temp path is UTF-8");
    let _ = std::fs::remove_file(output_path);

    treetext()
        .args(["encode", "-i", &fixture("sample.json"), "-o", output_path])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert!(content.contains("[database.replica]"), "got:\n{content}");

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn encode_invalid_json_fails() {
    treetext()
        .arg("encode")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn encode_scalar_root_fails() {
    treetext()
        .arg("encode")
        .write_stdin("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to encode JSON as INI"));
}

#[test]
fn encode_missing_file_fails() {
    treetext()
        .args(["encode", "-i", "/nonexistent/treetext/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_ini_to_pretty_json() {
    let out = run_ok(&["decode", "--format", "ini"], "a=1\n[s]\nb=on\nc=\"42\"");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(value, serde_json::json!({"a": 1, "s": {"b": true, "c": "42"}}));
    assert!(out.contains('\n'), "output should be pretty-printed");
}

#[test]
fn decode_xml_to_json() {
    let out = run_ok(
        &["decode", "--format", "xml"],
        r#"<feed id="7"><entry>one</entry><entry>two</entry></feed>"#,
    );
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(value, serde_json::json!({"@id": 7, "entry": ["one", "two"]}));
}

#[test]
fn decode_invalid_ini_reports_line() {
    treetext()
        .arg("decode")
        .write_stdin("ok=1\nnot a pair")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode INI"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn decode_invalid_xml_fails() {
    treetext()
        .args(["decode", "--format", "xml"])
        .write_stdin("<open>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode XML"));
}

#[test]
fn unknown_format_fails() {
    treetext()
        .args(["decode", "--format", "yaml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Roundtrips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_ini_pipeline() {
    let input_json = sample_json();
    let ini = run_ok(&["encode", "--format", "ini"], &input_json);
    let result_json = run_ok(&["decode", "--format", "ini"], &ini);

    let original: serde_json::Value = serde_json::from_str(&input_json).expect("input is valid JSON");
    let roundtripped: serde_json::Value =
        serde_json::from_str(&result_json).expect("roundtrip result is valid JSON");
    assert_eq!(original, roundtripped, "INI was:\n{ini}");
}

#[test]
fn roundtrip_xml_pipeline() {
    let input_json = r#"{"@lang":"en","title":"Catalog","book":[{"@id":1,"price":9.5},{"@id":2,"price":4}]}"#;
    let xml = run_ok(&["encode", "--format", "xml"], input_json);
    let result_json = run_ok(&["decode", "--format", "xml"], &xml);

    let original: serde_json::Value = serde_json::from_str(input_json).expect("input is valid JSON");
    let roundtripped: serde_json::Value =
        serde_json::from_str(&result_json).expect("roundtrip result is valid JSON");
    assert_eq!(original, roundtripped, "XML was:\n{xml}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Render, tree and menu subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn render_flat_map_with_join() {
    treetext()
        .args(["render", "--scalar", "%s=%s%s", "--join", ","])
        .write_stdin(r#"{"a":1,"b":2}"#)
        .assert()
        .success()
        .stdout("a=1,b=2");
}

#[test]
fn render_nested_with_complex_and_glue() {
    treetext()
        .args(["render", "--scalar", "%s:%s%s", "--complex", "(%s){%s}%s", "--glue", "|"])
        .write_stdin(r#"{"a":{"x":1,"y":2}}"#)
        .assert()
        .success()
        .stdout("(a){x:1|y:2}");
}

#[test]
fn render_with_marker_file() {
    treetext()
        .args(["render", "--scalar", "%s=%s%s", "--markers", &fixture("markers.json")])
        .write_stdin(r#"{"a":1,"b":2}"#)
        .assert()
        .success()
        .stdout("a=1\nb=2 *");
}

#[test]
fn render_bad_template_fails() {
    treetext()
        .args(["render", "--scalar", "%s %s %s %s"])
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to render templates"));
}

#[test]
fn tree_as_ordered_list() {
    treetext()
        .args(["tree", "--as", "ol"])
        .write_stdin(r#"["a",["b"]]"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<ol>\n<li>a</li>"))
        .stdout(predicate::str::ends_with("</ol>"));
}

#[test]
fn menu_from_fixture() {
    treetext()
        .args(["menu", "--class", "nav", "-i", &fixture("menu.json")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"<ul class="nav">"#))
        .stdout(predicate::str::contains(r#"<li><a href="/">Home</a></li>"#))
        .stdout(predicate::str::contains(r#"<a href="/guide">Guide</a>"#));
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    treetext()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("menu"));
}

#[test]
fn no_arguments_prints_help_and_fails() {
    treetext()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    treetext()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
