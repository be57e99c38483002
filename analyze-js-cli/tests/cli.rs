use assert_cmd::Command;
use std::time::Duration;
use tempfile::tempdir;

fn analyze_js_cli() -> Command {
  #[allow(deprecated)]
  let mut cmd = Command::cargo_bin("analyze-js-cli").expect("binary");
  cmd.timeout(Duration::from_secs(10));
  cmd
}

const UNDECLARED_USE: &str = concat!(
  r#"{"event": "variable_use", "name": "x", "span": [0, 1]}"#,
  "\n",
  r#"{"event": "end_of_module"}"#,
  "\n",
);

#[test]
fn reports_use_of_undeclared_variable() {
  let assert = analyze_js_cli()
    .write_stdin(UNDECLARED_USE)
    .assert()
    .failure()
    .code(1);

  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("VAR0004"), "stderr: {stderr}");
  assert!(stderr.contains("use of undeclared variable"), "stderr: {stderr}");
}

#[test]
fn clean_module_exits_zero() {
  let events = concat!(
    r#"{"event": "variable_declaration", "name": "x", "span": [4, 5], "kind": "let"}"#,
    "\n",
    r#"{"event": "variable_use", "name": "x", "span": [7, 8]}"#,
    "\n",
    r#"{"event": "end_of_module"}"#,
    "\n",
  );
  let assert = analyze_js_cli().write_stdin(events).assert().success();
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.is_empty(), "stderr: {stderr}");
}

#[test]
fn renders_carets_with_source() {
  let dir = tempdir().unwrap();
  let source_path = dir.path().join("app.js");
  std::fs::write(&source_path, "x;\n").unwrap();

  let assert = analyze_js_cli()
    .arg("--source")
    .arg(&source_path)
    .write_stdin(UNDECLARED_USE)
    .assert()
    .failure()
    .code(1);

  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("app.js:1:1"), "stderr: {stderr}");
  assert!(stderr.contains('^'), "stderr: {stderr}");
}

#[test]
fn reads_events_from_file() {
  let dir = tempdir().unwrap();
  let events_path = dir.path().join("events.ndjson");
  std::fs::write(&events_path, UNDECLARED_USE).unwrap();

  let assert = analyze_js_cli().arg(&events_path).assert().failure().code(1);
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("VAR0004"), "stderr: {stderr}");
}

#[test]
fn malformed_event_line_is_a_usage_error() {
  let assert = analyze_js_cli()
    .write_stdin("{ not json\n")
    .assert()
    .failure()
    .code(2);

  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("malformed event on line 1"), "stderr: {stderr}");
}

#[test]
fn unknown_variable_kind_is_a_usage_error() {
  let events = concat!(
    r#"{"event": "variable_declaration", "name": "x", "span": [0, 1], "kind": "mystery"}"#,
    "\n",
  );
  let assert = analyze_js_cli().write_stdin(events).assert().failure().code(2);
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("unknown variable kind"), "stderr: {stderr}");
}

#[test]
fn config_file_declares_extra_globals() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join("quick-lint-js.config");
  std::fs::write(&config_path, r#"{"globals": {"jQuery": true}}"#).unwrap();

  let events = concat!(
    r#"{"event": "variable_use", "name": "jQuery", "span": [0, 6]}"#,
    "\n",
    r#"{"event": "end_of_module"}"#,
    "\n",
  );

  // Without the config: undeclared.
  analyze_js_cli().write_stdin(events).assert().failure().code(1);

  // With the config: declared.
  analyze_js_cli()
    .arg("--config-file")
    .arg(&config_path)
    .write_stdin(events)
    .assert()
    .success();
}

#[test]
fn config_is_discovered_near_event_file() {
  let dir = tempdir().unwrap();
  std::fs::write(
    dir.path().join("quick-lint-js.config"),
    r#"{"globals": {"appGlobal": true}}"#,
  )
  .unwrap();
  let events_path = dir.path().join("events.ndjson");
  std::fs::write(
    &events_path,
    concat!(
      r#"{"event": "variable_use", "name": "appGlobal", "span": [0, 9]}"#,
      "\n",
      r#"{"event": "end_of_module"}"#,
      "\n",
    ),
  )
  .unwrap();

  analyze_js_cli().arg(&events_path).assert().success();
}

#[test]
fn exit_fail_on_controls_exit_code() {
  // `delete Array` is a warning, not an error.
  let warning_events = concat!(
    r#"{"event": "variable_delete_use", "name": "Array", "span": [7, 12], "keyword_span": [0, 6]}"#,
    "\n",
    r#"{"event": "end_of_module"}"#,
    "\n",
  );

  let assert = analyze_js_cli().write_stdin(warning_events).assert().success();
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.contains("VAR0013"), "stderr: {stderr}");

  analyze_js_cli()
    .arg("--exit-fail-on=warning")
    .write_stdin(warning_events)
    .assert()
    .failure()
    .code(1);

  analyze_js_cli()
    .arg("--exit-fail-on=never")
    .write_stdin(UNDECLARED_USE)
    .assert()
    .success();
}

#[test]
fn typescript_language_flag_is_accepted() {
  let events = concat!(
    r#"{"event": "variable_declaration", "name": "I", "span": [10, 11], "kind": "interface"}"#,
    "\n",
    r#"{"event": "variable_type_use", "name": "I", "span": [20, 21]}"#,
    "\n",
    r#"{"event": "end_of_module"}"#,
    "\n",
  );
  analyze_js_cli()
    .arg("--language=ts")
    .write_stdin(events)
    .assert()
    .success();
}
