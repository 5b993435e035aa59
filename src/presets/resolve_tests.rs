use super::*;
use crate::presets::file::PRESETS_FILE;
use std::fs;

const PROJECT_PRESETS: &str = r#"{
    "version": 6,
    "configurePresets": [
        {"name": "test-preset", "generator": "Ninja", "binaryDir": "${sourceDir}/build/${presetName}"},
        {"name": "config"},
        {"name": "config_build"},
        {"name": "config_build_test"},
        {"name": "config_build_test_package", "binaryDir": "/shared_build/project/${presetName}"},
        {"name": "base", "hidden": true, "binaryDir": "out/${presetName}", "environment": {"FLAVOR": "base", "DROP": "x"}},
        {"name": "child", "inherits": "base", "environment": {"DROP": null}, "installDir": "${sourceDir}/install/$env{FLAVOR}"}
    ],
    "buildPresets": [
        {"name": "test-build", "configurePreset": "test-preset"},
        {"name": "config_build", "configurePreset": "config_build"},
        {"name": "config_build_test", "configurePreset": "config_build_test"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"},
        {"name": "hidden-build", "hidden": true, "configurePreset": "test-preset"},
        {"name": "inherited-build", "inherits": "hidden-build"}
    ],
    "testPresets": [
        {"name": "test-test", "configurePreset": "test-preset"},
        {"name": "config_build_test", "configurePreset": "config_build_test"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"}
    ],
    "packagePresets": [
        {"name": "test-package", "configurePreset": "test-preset"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"}
    ],
    "workflowPresets": [
        {"name": "test-flow", "steps": [{"type": "configure", "name": "test-preset"}, {"type": "build", "name": "test-build"}]}
    ]
}"#;

fn project(json: &str) -> (tempfile::TempDir, CMakePresets) {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join(PRESETS_FILE), json).expect("write presets");
    let presets = CMakePresets::load(dir.path()).expect("load presets");
    (dir, presets)
}

fn names(presets: &[&Preset]) -> Vec<String> {
    presets.iter().map(|preset| preset.name.clone()).collect()
}

#[test]
fn related_presets_group_by_kind_and_skip_hidden() {
    let (_dir, presets) = project(PROJECT_PRESETS);
    let related = presets.find_related_presets("test-preset").expect("related");
    assert_eq!(
        names(&related[&PresetKind::Build]),
        vec!["test-build", "inherited-build"]
    );
    assert_eq!(names(&related[&PresetKind::Test]), vec!["test-test"]);
    assert_eq!(names(&related[&PresetKind::Package]), vec!["test-package"]);
    assert_eq!(names(&related[&PresetKind::Workflow]), vec!["test-flow"]);
    assert!(!related.contains_key(&PresetKind::Configure));
}

#[test]
fn kinds_without_related_presets_are_absent() {
    let (_dir, presets) = project(PROJECT_PRESETS);
    let related = presets.find_related_presets("config_build").expect("related");
    assert_eq!(related.keys().copied().collect::<Vec<_>>(), vec![PresetKind::Build]);
}

#[test]
fn empty_project_has_no_related_presets() {
    let (_dir, presets) = project(r#"{"version": 2}"#);
    assert!(presets.find_related_presets("test-preset").expect("related").is_empty());
    assert!(presets
        .get_preset_by_name(PresetKind::Configure, "test-preset")
        .is_none());
}

#[test]
fn binary_dir_expands_source_dir_and_preset_name() {
    let (_dir, presets) = project(PROJECT_PRESETS);
    let resolved = presets
        .resolve_macro_values(PresetKind::Configure, "test-preset")
        .expect("resolve");
    let expected = presets.source_dir().join("build").join("test-preset");
    assert_eq!(
        resolved.binary_dir.as_deref(),
        Some(format!("{}/build/test-preset", presets.source_dir().display()).as_str())
    );
    assert_eq!(std::path::PathBuf::from(resolved.binary_dir.unwrap_or_default()), expected);
    assert_eq!(resolved.generator.as_deref(), Some("Ninja"));
}

#[test]
fn inherited_values_use_the_child_name_and_environment() {
    let (_dir, presets) = project(PROJECT_PRESETS);
    let resolved = presets
        .resolve_macro_values(PresetKind::Configure, "child")
        .expect("resolve");
    assert_eq!(resolved.binary_dir.as_deref(), Some("out/child"));
    assert_eq!(
        resolved.install_dir,
        Some(format!("{}/install/base", presets.source_dir().display()))
    );
}

#[test]
fn environment_values_are_macro_expanded() {
    let (_dir, presets) = project(
        r#"{"version": 6, "configurePresets": [
            {"name": "env-out", "environment": {"OUT": "${sourceDir}/out/${presetName}"}, "binaryDir": "$env{OUT}"}
        ]}"#,
    );
    let resolved = presets
        .resolve_macro_values(PresetKind::Configure, "env-out")
        .expect("resolve");
    assert_eq!(
        resolved.binary_dir,
        Some(format!("{}/out/env-out", presets.source_dir().display()))
    );
}

#[test]
fn missing_binary_dir_resolves_to_none() {
    let (_dir, presets) = project(PROJECT_PRESETS);
    let resolved = presets
        .resolve_macro_values(PresetKind::Configure, "config")
        .expect("resolve");
    assert_eq!(resolved.binary_dir, None);
}

#[test]
fn inheritance_cycles_are_errors() {
    let (_dir, presets) = project(
        r#"{"version": 6, "configurePresets": [
            {"name": "a", "inherits": "b"},
            {"name": "b", "inherits": "a"}
        ]}"#,
    );
    let err = presets
        .resolve_macro_values(PresetKind::Configure, "a")
        .expect_err("cycle");
    assert!(matches!(err, PresetError::InheritanceCycle { .. }));
}

#[test]
fn unknown_parent_is_reported() {
    let (_dir, presets) = project(
        r#"{"version": 6, "configurePresets": [{"name": "a", "inherits": "ghost"}]}"#,
    );
    let err = presets
        .resolve_macro_values(PresetKind::Configure, "a")
        .expect_err("unknown parent");
    assert_eq!(
        err.to_string(),
        "configure preset 'a' inherits from unknown preset 'ghost'"
    );
}

#[test]
fn root_that_is_not_a_directory_is_invalid() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CMakePresets::load(&dir.path().join("missing")).expect_err("invalid root");
    assert!(matches!(err, PresetError::ProjectRootInvalid { .. }));
}
