//! Step generation for a single configure preset.
//!
//! Emits the configure/build/test/package commands for one CI job and the
//! artifact upload settings derived from the preset's binary directory.
use crate::artifact::{merge_artifact, ArtifactOutput, ArtifactSpec, DEFAULT_ARTIFACT_PATH};
use crate::cli::StepsArgs;
use crate::output::Outputs;
use crate::presets::{CMakePresets, PresetKind};
use crate::util::{normalize_lexically, relative_display};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Commands for each stage; an empty string means the stage is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Steps {
    pub configure: String,
    pub build: String,
    pub test: String,
    pub package: String,
}

/// Run the steps command and print `key=value` outputs.
pub fn run_steps(args: &StepsArgs) -> Result<()> {
    let outputs = generate(args)?;
    outputs.print()
}

fn generate(args: &StepsArgs) -> Result<Outputs> {
    let presets = CMakePresets::load(&args.cmake_project_root)?;
    let configure = presets
        .get_preset_by_name(PresetKind::Configure, &args.preset)
        .ok_or_else(|| anyhow!("Preset '{}' not found in the CMake project", args.preset))?;
    if configure.hidden {
        return Err(anyhow!(
            "Preset '{}' is hidden and cannot be configured",
            args.preset
        ));
    }

    let related = presets
        .find_related_presets(&args.preset)
        .with_context(|| format!("find presets related to '{}'", args.preset))?;
    let related: BTreeMap<PresetKind, Vec<&str>> = related
        .into_iter()
        .map(|(kind, list)| (kind, list.into_iter().map(|p| p.name.as_str()).collect()))
        .collect();
    tracing::info!(preset = %args.preset, ?related, "resolved related presets");
    let steps = generate_steps(&args.preset, &related);

    let default_path = default_artifact_path(&presets, args)?;
    let defaults = ArtifactSpec {
        path: default_path,
        retention_days: args.default_artifact_retention_days,
    };
    if !args.artifact.extra.is_empty() {
        let keys: Vec<&str> = args.artifact.extra.keys().map(String::as_str).collect();
        tracing::warn!(?keys, "ignoring unknown artifact keys");
    }
    let artifact = merge_artifact(
        defaults,
        &args.artifact,
        args.default_store_artifact.unwrap_or(false),
    );

    let mut outputs = Outputs::default();
    outputs.push("configure", steps.configure);
    outputs.push("build", steps.build);
    outputs.push("test", steps.test);
    outputs.push("package", steps.package);
    outputs.push("artifact", artifact_text(artifact.as_ref())?);
    Ok(outputs)
}

/// Build stage commands from the configure preset and the first related
/// preset of each kind.
pub fn generate_steps(configure: &str, related: &BTreeMap<PresetKind, Vec<&str>>) -> Steps {
    let first = |kind: PresetKind| {
        related
            .get(&kind)
            .and_then(|names| names.first())
            .map(|name| shell_words::quote(name).into_owned())
    };
    Steps {
        configure: format!("cmake --preset {}", shell_words::quote(configure)),
        build: first(PresetKind::Build)
            .map(|name| format!("cmake --build --preset {name}"))
            .unwrap_or_default(),
        test: first(PresetKind::Test)
            .map(|name| format!("ctest --preset {name}"))
            .unwrap_or_default(),
        package: first(PresetKind::Package)
            .map(|name| format!("cmake --build --preset {name} --target package"))
            .unwrap_or_default(),
    }
}

/// The preset's binary dir relative to the workspace or project root, or the
/// CLI fallback when the preset has none.
fn default_artifact_path(presets: &CMakePresets, args: &StepsArgs) -> Result<Vec<String>> {
    let resolved = presets
        .resolve_macro_values(PresetKind::Configure, &args.preset)
        .with_context(|| format!("resolve binaryDir of '{}'", args.preset))?;
    let Some(binary_dir) = resolved.binary_dir else {
        let fallback = args
            .default_artifact_path
            .as_ref()
            .map(|paths| paths.0.clone())
            .unwrap_or_else(|| vec![DEFAULT_ARTIFACT_PATH.to_string()]);
        tracing::debug!(?fallback, "preset has no binaryDir");
        return Ok(fallback);
    };
    let binary_dir = normalize_lexically(&presets.source_dir().join(binary_dir));
    Ok(vec![artifact_path_for(
        &binary_dir,
        args.workspace.as_deref(),
        presets.source_dir(),
    )])
}

/// Relativize `binary_dir` against the workspace when it lies inside it,
/// otherwise against the project root, otherwise keep it absolute.
///
/// A relative workspace is taken from the current directory.
pub fn artifact_path_for(binary_dir: &Path, workspace: Option<&Path>, root: &Path) -> String {
    if let Some(workspace) = workspace {
        let workspace = std::path::absolute(workspace)
            .map(|path| normalize_lexically(&path))
            .unwrap_or_else(|_| workspace.to_path_buf());
        if let Some(relative) = relative_display(binary_dir, &workspace) {
            return relative;
        }
        tracing::debug!(
            workspace = %workspace.display(),
            binary_dir = %binary_dir.display(),
            "binary dir is outside the workspace"
        );
    }
    relative_display(binary_dir, root).unwrap_or_else(|| binary_dir.display().to_string())
}

fn artifact_text(artifact: Option<&ArtifactOutput>) -> Result<String> {
    match artifact {
        Some(artifact) => serde_json::to_string(artifact).context("serialize artifact settings"),
        None => Ok(String::new()),
    }
}
