//! Shared helpers for integration tests that drive the `preset-ci` binary.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Output};

/// Presets used by the step-generation tests: one configure preset per
/// combination of related build/test/package presets.
pub const PROJECT_PRESETS: &str = r#"{
    "version": 6,
    "configurePresets": [
        {"name": "test-preset", "generator": "Ninja", "binaryDir": "${sourceDir}/build/${presetName}"},
        {"name": "config"},
        {"name": "config_build"},
        {"name": "config_build_test"},
        {"name": "config_build_test_package", "binaryDir": "/shared_build/project/${presetName}"}
    ],
    "buildPresets": [
        {"name": "test-build", "configurePreset": "test-preset"},
        {"name": "config_build", "configurePreset": "config_build"},
        {"name": "config_build_test", "configurePreset": "config_build_test"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"}
    ],
    "testPresets": [
        {"name": "test-test", "configurePreset": "test-preset"},
        {"name": "config_build_test", "configurePreset": "config_build_test"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"}
    ],
    "packagePresets": [
        {"name": "test-package", "configurePreset": "test-preset"},
        {"name": "config_build_test_package", "configurePreset": "config_build_test_package"}
    ]
}"#;

/// A `preset-ci` command with CI environment variables cleared so the host
/// environment cannot leak into assertions.
#[allow(dead_code)]
pub fn preset_ci() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_preset-ci"));
    for var in ["GITHUB_WORKSPACE", "RUNS_ON", "TOOLCHAIN", "PRESET", "PRESET_CI_LOG"] {
        command.env_remove(var);
    }
    command
}

/// Create `<root>/path` holding a `CMakePresets.json`, returning the project
/// directory.
#[allow(dead_code)]
pub fn write_project(root: &Path, presets_json: &str) -> std::path::PathBuf {
    let project = root.join("path");
    std::fs::create_dir_all(&project).expect("create project dir");
    std::fs::write(project.join("CMakePresets.json"), presets_json).expect("write presets");
    project
}

/// Parse `key=value` lines from stdout.
#[allow(dead_code)]
pub fn parse_outputs(output: &Output) -> BTreeMap<String, String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
