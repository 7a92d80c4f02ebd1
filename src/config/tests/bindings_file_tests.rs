use super::super::*;
use crate::core::parser::ParseError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[settings]
view_transitions = true

[[binding]]
attribute = "data-on-keys:ctrl-s__throttle.500ms"
action = "save"

[[binding]]
attribute = "on-keys:esc.alt-q__el"
action = "close"
"#;

/// Helper: Writes `content` to a bindings file in a fresh temp dir.
fn create_bindings_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bindings.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn test_load_valid_file() {
    let (_temp_dir, path) = create_bindings_file(SAMPLE);

    let file = BindingsFile::load(&path).unwrap();
    assert!(file.settings.view_transitions);
    assert_eq!(file.bindings.len(), 2);
    assert_eq!(file.bindings[0].action, "save");
    assert_eq!(file.bindings[1].attribute, "on-keys:esc.alt-q__el");
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nonexistent.toml");

    match BindingsFile::load(&path) {
        Err(ConfigError::NotFound(missing)) => assert_eq!(missing, path),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[test]
fn test_settings_default_when_omitted() {
    let file = BindingsFile::from_toml_str(
        "[[binding]]\nattribute = \"on-keys:k\"\naction = \"k\"\n",
    )
    .unwrap();
    assert_eq!(file.settings, Settings::default());
    assert!(!file.settings.view_transitions);
}

#[test]
fn test_empty_file_is_valid() {
    let file = BindingsFile::from_toml_str("").unwrap();
    assert!(file.bindings.is_empty());
    assert!(file.check().unwrap().is_clean());
}

#[test]
fn test_invalid_toml() {
    let result = BindingsFile::from_toml_str("[[binding]\nattribute = ");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_missing_action_is_rejected() {
    let result = BindingsFile::from_toml_str("[[binding]]\nattribute = \"on-keys:k\"\n");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_invalid_attribute_reports_index() {
    let content = r#"
[[binding]]
attribute = "on-keys:k"
action = "ok"

[[binding]]
attribute = "on-click__once"
action = "wrong plugin"
"#;

    match BindingsFile::from_toml_str(content) {
        Err(ConfigError::InvalidAttribute { index, source }) => {
            assert_eq!(index, 1);
            assert_eq!(source, ParseError::UnknownPlugin("on-click__once".to_string()));
        }
        other => panic!("Expected InvalidAttribute error, got: {:?}", other),
    }
}

#[test]
fn test_parsed_bindings() {
    let file = BindingsFile::from_toml_str(SAMPLE).unwrap();
    let bindings = file.parsed().unwrap();

    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].index, 0);
    assert!(bindings[0].attribute.mods.has("throttle"));

    let close = &bindings[1];
    assert_eq!(close.combos().len(), 2);
    assert_eq!(close.trigger(), Trigger { up: false, element: true });
}

#[test]
fn test_bound_combos_share_action_and_trigger() {
    let file = BindingsFile::from_toml_str(SAMPLE).unwrap();
    let close = &file.parsed().unwrap()[1];

    let bound = close.bound_combos();
    assert_eq!(bound.len(), 2);
    assert!(bound.iter().all(|b| b.action == "close" && b.trigger.element));
    assert_eq!(bound[0].combo.key, "esc");
    assert_eq!(bound[1].combo.key, "q");
}

#[test]
fn test_check_clean_file() {
    let report = BindingsFile::from_toml_str(SAMPLE).unwrap().check().unwrap();
    assert_eq!(report.total, 2);
    assert!(report.is_clean(), "Unexpected findings: {:?}", report);
}

#[test]
fn test_check_finds_alias_conflict() {
    let content = r#"
[[binding]]
attribute = "on-keys:esc"
action = "close"

[[binding]]
attribute = "on-keys:escape"
action = "cancel"
"#;

    let report = BindingsFile::from_toml_str(content).unwrap().check().unwrap();
    assert_eq!(report.conflicts.len(), 1);

    let actions: Vec<&str> = report.conflicts[0]
        .conflicting_bindings
        .iter()
        .map(|b| b.action.as_str())
        .collect();
    assert_eq!(actions, vec!["close", "cancel"]);
}

#[test]
fn test_check_keeps_triggers_apart() {
    let content = r#"
[[binding]]
attribute = "on-keys:k"
action = "down"

[[binding]]
attribute = "on-keys:k__up"
action = "up"
"#;

    let report = BindingsFile::from_toml_str(content).unwrap().check().unwrap();
    assert!(report.conflicts.is_empty());
}

#[test]
fn test_check_collects_lint_with_index() {
    let content = r#"
[[binding]]
attribute = "on-keys:k"
action = "fine"

[[binding]]
attribute = "on-keys:ctrl-__debounse.100ms"
action = "broken"
"#;

    let report = BindingsFile::from_toml_str(content).unwrap().check().unwrap();
    assert!(!report.is_clean());
    assert_eq!(
        report.issues,
        vec![
            (1, ValidationIssue::KeylessCombo("ctrl-".to_string())),
            (1, ValidationIssue::UnknownModifier("debounse".to_string())),
        ]
    );
}
