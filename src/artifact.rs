//! Artifact specifications and the override/default merge used by `steps`.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback artifact path when neither an override nor a preset binary dir
/// provides one.
pub const DEFAULT_ARTIFACT_PATH: &str = "build";

/// Path globs (`!` prefix excludes) plus retention period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub path: Vec<String>,
    pub retention_days: u32,
}

/// User-supplied artifact settings; either field may be omitted.
///
/// Unknown keys are kept so that an override carrying only them still counts
/// as supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArtifactOverride {
    #[serde(default)]
    pub path: Option<Vec<String>>,
    #[serde(default)]
    pub retention_days: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactOverride {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.retention_days.is_none() && self.extra.is_empty()
    }
}

/// Artifact settings in the shape the upload step consumes: paths joined by
/// newlines into one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutput {
    pub path: String,
    pub retention_days: u32,
}

impl From<ArtifactSpec> for ArtifactOutput {
    fn from(spec: ArtifactSpec) -> Self {
        Self {
            path: spec.path.join("\n"),
            retention_days: spec.retention_days,
        }
    }
}

/// Apply an override on top of defaults and decide whether anything is stored.
///
/// Artifacts are emitted when the override is non-empty or storing is enabled
/// by default; otherwise `None`.
pub fn merge_artifact(
    defaults: ArtifactSpec,
    overrides: &ArtifactOverride,
    store_by_default: bool,
) -> Option<ArtifactOutput> {
    if overrides.is_empty() && !store_by_default {
        return None;
    }
    let mut spec = defaults;
    if let Some(path) = &overrides.path {
        spec.path = path.clone();
    }
    if let Some(days) = overrides.retention_days {
        spec.retention_days = days;
    }
    Some(spec.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ArtifactSpec {
        ArtifactSpec {
            path: vec!["build/debug".to_string()],
            retention_days: 7,
        }
    }

    fn parse(json: &str) -> ArtifactOverride {
        serde_json::from_str(json).expect("parse override")
    }

    #[test]
    fn nothing_is_stored_without_override_or_default() {
        assert_eq!(merge_artifact(defaults(), &ArtifactOverride::default(), false), None);
    }

    #[test]
    fn store_by_default_uses_defaults() {
        let output = merge_artifact(defaults(), &ArtifactOverride::default(), true).expect("stored");
        assert_eq!(output.path, "build/debug");
        assert_eq!(output.retention_days, 7);
    }

    #[test]
    fn override_path_keeps_default_retention() {
        let output = merge_artifact(defaults(), &parse(r#"{"path": ["custom/path"]}"#), false)
            .expect("stored");
        assert_eq!(output.path, "custom/path");
        assert_eq!(output.retention_days, 7);
    }

    #[test]
    fn override_retention_keeps_default_path() {
        let output =
            merge_artifact(defaults(), &parse(r#"{"retention_days": 1}"#), false).expect("stored");
        assert_eq!(output.path, "build/debug");
        assert_eq!(output.retention_days, 1);
    }

    #[test]
    fn multiple_paths_are_newline_joined() {
        let overrides = parse(r#"{"path": ["dir1", "dir2", "!dir1/**/*.md"], "retention_days": 5}"#);
        let output = merge_artifact(defaults(), &overrides, false).expect("stored");
        assert_eq!(output.path, "dir1\ndir2\n!dir1/**/*.md");
        let json = serde_json::to_string(&output).expect("serialize");
        assert_eq!(json, r#"{"path":"dir1\ndir2\n!dir1/**/*.md","retention_days":5}"#);
    }

    #[test]
    fn unknown_keys_still_count_as_supplied() {
        let overrides = parse(r#"{"name": "logs"}"#);
        assert!(!overrides.is_empty());
        let output = merge_artifact(defaults(), &overrides, false).expect("stored");
        assert_eq!(output.path, "build/debug");
    }

    #[test]
    fn wrong_path_type_is_rejected() {
        assert!(serde_json::from_str::<ArtifactOverride>(r#"{"path": 123}"#).is_err());
    }
}
