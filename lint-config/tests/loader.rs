use lint_config::real_filesystem;
use lint_config::ConfigLoader;
use lint_config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, text: &str) {
  fs::write(path, text).unwrap();
}

#[test]
fn no_config_file_yields_none() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.load_for_file(&input).unwrap();
  assert!(loaded.is_none());
}

#[test]
fn finds_config_next_to_input() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("app.js");
  write(&input, "let x;");
  write(
    &dir.path().join(CONFIG_FILE_NAME),
    r#"{"globals": {"jQuery": true}}"#,
  );

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.load_for_file(&input).unwrap().unwrap();
  assert!(loaded.parse_error.is_none());
  assert!(loaded.config.build_globals().find("jQuery").is_some());
}

#[test]
fn finds_config_in_ancestor_directory() {
  let dir = tempdir().unwrap();
  let nested = dir.path().join("src").join("deep");
  fs::create_dir_all(&nested).unwrap();
  let input = nested.join("app.js");
  write(&input, "let x;");
  write(
    &dir.path().join(CONFIG_FILE_NAME),
    r#"{"global-groups": ["ecmascript"]}"#,
  );

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.load_for_file(&input).unwrap().unwrap();
  let globals = loaded.config.build_globals();
  assert!(globals.find("Array").is_some());
  assert!(globals.find("document").is_none());
}

#[test]
fn nearest_config_wins() {
  let dir = tempdir().unwrap();
  let nested = dir.path().join("pkg");
  fs::create_dir_all(&nested).unwrap();
  write(&dir.path().join(CONFIG_FILE_NAME), r#"{"globals": {"outer": true}}"#);
  write(&nested.join(CONFIG_FILE_NAME), r#"{"globals": {"inner": true}}"#);
  let input = nested.join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.load_for_file(&input).unwrap().unwrap();
  let globals = loaded.config.build_globals();
  assert!(globals.find("inner").is_some());
  assert!(globals.find("outer").is_none());
}

#[test]
fn config_is_loaded_once_per_canonical_path() {
  let dir = tempdir().unwrap();
  write(&dir.path().join(CONFIG_FILE_NAME), "{}");
  let first = dir.path().join("a.js");
  let second = dir.path().join("b.js");
  write(&first, "let a;");
  write(&second, "let b;");

  let mut loader = ConfigLoader::new(real_filesystem());
  loader.load_for_file(&first).unwrap().unwrap();
  loader.load_for_file(&second).unwrap().unwrap();
  assert_eq!(loader.cached_config_count(), 1);
}

#[test]
fn input_file_does_not_need_to_exist() {
  let dir = tempdir().unwrap();
  write(&dir.path().join(CONFIG_FILE_NAME), "{}");

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader
    .load_for_file(&dir.path().join("not-written-yet.js"))
    .unwrap();
  assert!(loaded.is_some());
}

#[test]
fn parse_errors_are_recorded_not_fatal() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join(CONFIG_FILE_NAME);
  write(&config_path, "{ not json");

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.load_config_file(&config_path).unwrap();
  assert!(loaded.parse_error.is_some());
  // The default configuration still applies.
  assert!(loaded.config.build_globals().find("Array").is_some());
}

#[test]
fn missing_explicit_config_is_an_io_error() {
  let dir = tempdir().unwrap();
  let mut loader = ConfigLoader::new(real_filesystem());
  let err = loader
    .load_config_file(&dir.path().join("missing.config"))
    .unwrap_err();
  assert!(err.is_not_found());
}

#[test]
fn refresh_reports_content_changes() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join(CONFIG_FILE_NAME);
  write(&config_path, r#"{"globals": {"before": true}}"#);
  let input = dir.path().join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  loader.watch_and_load_for_file(&input, 7).unwrap().unwrap();

  // Unchanged content: no change events.
  assert_eq!(loader.refresh(), []);

  write(&config_path, r#"{"globals": {"after": true}}"#);
  let changes = loader.refresh();
  assert_eq!(changes.len(), 1);
  assert_eq!(changes[0].watched_path, input);
  assert_eq!(changes[0].token, 7);
  let config = changes[0].config.as_ref().unwrap();
  assert!(config.build_globals().find("after").is_some());

  // The observed state was updated; a second refresh is quiet.
  assert_eq!(loader.refresh(), []);
}

#[test]
fn refresh_reports_config_file_appearing_later() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  let loaded = loader.watch_and_load_for_file(&input, 1).unwrap();
  assert!(loaded.is_none());

  write(&dir.path().join(CONFIG_FILE_NAME), "{}");
  let changes = loader.refresh();
  assert_eq!(changes.len(), 1);
  assert!(changes[0].config_path.is_some());
}

#[test]
fn refresh_reports_config_file_disappearing() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join(CONFIG_FILE_NAME);
  write(&config_path, "{}");
  let input = dir.path().join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  loader.watch_and_load_for_file(&input, 1).unwrap().unwrap();

  fs::remove_file(&config_path).unwrap();
  let changes = loader.refresh();
  assert_eq!(changes.len(), 1);
  assert!(changes[0].config_path.is_none());
  assert!(changes[0].config.is_none());
}

#[test]
fn watched_explicit_config_reports_changes() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join(CONFIG_FILE_NAME);
  write(&config_path, "{}");

  let mut loader = ConfigLoader::new(real_filesystem());
  loader
    .watch_and_load_config_file(&config_path, 42)
    .unwrap()
    .unwrap();

  write(&config_path, r#"{"global-groups": false}"#);
  let changes = loader.refresh();
  assert_eq!(changes.len(), 1);
  assert_eq!(changes[0].token, 42);
}

#[test]
fn unwatch_silences_changes() {
  let dir = tempdir().unwrap();
  let config_path = dir.path().join(CONFIG_FILE_NAME);
  write(&config_path, "{}");
  let input = dir.path().join("app.js");
  write(&input, "let x;");

  let mut loader = ConfigLoader::new(real_filesystem());
  loader.watch_and_load_for_file(&input, 1).unwrap().unwrap();
  loader.unwatch_file(&input);

  write(&config_path, r#"{"global-groups": false}"#);
  assert_eq!(loader.refresh(), []);
}
