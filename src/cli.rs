//! CLI argument parsing for the CI helpers.
//!
//! Each subcommand mirrors one CI step. Argument-level failures (bad booleans,
//! malformed `--artifact` JSON) are rejected here so clap reports them with
//! its usage exit code.
use crate::artifact::ArtifactOverride;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default location of per-runner setup actions.
pub const DEFAULT_ACTIONS_ROOT: &str = "./.github/actions/cmake-builder";
/// Default output directory for the generated setup action.
pub const DEFAULT_SETUP_OUT_DIR: &str = "./.select-setup-actions";

const TRUE_VALUES: [&str; 5] = ["true", "1", "yes", "y", "on"];
const FALSE_VALUES: [&str; 5] = ["false", "0", "no", "n", "off"];

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "preset-ci",
    version,
    about = "CI matrix and step generation for CMake preset projects",
    after_help = "Examples:\n  preset-ci matrix --default-runs-on ubuntu-latest --default-toolchain gcc --presets '{\"debug\":{}}'\n  preset-ci steps --cmake-project-root . --preset debug --default-artifact-retention-days 7\n  preset-ci validate --presets '{\"debug\":{\"toolchain\":\"gcc\"}}'\n  preset-ci setup-action --runs-on ubuntu-latest --toolchain gcc --preset debug",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Raise the default log level to debug (logs go to stderr)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Matrix(MatrixArgs),
    Steps(StepsArgs),
    Validate(ValidateArgs),
    SetupAction(SetupActionArgs),
}

/// Matrix command inputs.
#[derive(Parser, Debug)]
#[command(about = "Construct a build matrix from preset descriptors")]
pub struct MatrixArgs {
    /// Runner label used when a preset does not set `runs-on`
    #[arg(long, value_name = "LABEL")]
    pub default_runs_on: String,

    /// Toolchain used when a preset does not set `toolchain`
    #[arg(long, value_name = "NAME")]
    pub default_toolchain: String,

    /// Presets JSON object, keyed by preset name
    #[arg(long, value_name = "JSON")]
    pub presets: String,
}

/// Steps command inputs.
#[derive(Parser, Debug)]
#[command(about = "Generate configure/build/test/package commands for a preset")]
pub struct StepsArgs {
    /// Root directory of the CMake project
    #[arg(long, value_name = "DIR")]
    pub cmake_project_root: PathBuf,

    /// Configure preset to generate steps for
    #[arg(long, value_name = "NAME")]
    pub preset: String,

    /// Whether to store artifacts by default (true/false/yes/no/1/0)
    #[arg(long, value_name = "BOOL", value_parser = parse_boolean)]
    pub default_store_artifact: Option<bool>,

    /// Retention days used when the artifact override does not set one
    #[arg(long, value_name = "DAYS")]
    pub default_artifact_retention_days: u32,

    /// Fallback artifact paths when the preset has no binaryDir (e.g. 'out,!out/tmp')
    #[arg(long, value_name = "PATHS", value_parser = parse_artifact_paths)]
    pub default_artifact_path: Option<ArtifactPaths>,

    /// Artifact configuration as JSON (e.g. {"path": ["dir1", "!dir1/**/*.md"], "retention_days": 5})
    #[arg(long, value_name = "JSON", value_parser = parse_artifact_override, default_value = "")]
    pub artifact: ArtifactOverride,

    /// Workspace root used to relativize the artifact path
    #[arg(long, value_name = "DIR", env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

/// Validate command inputs.
#[derive(Parser, Debug)]
#[command(about = "Validate preset descriptors against the preset schema")]
pub struct ValidateArgs {
    /// Presets JSON object, keyed by preset name
    #[arg(long, value_name = "JSON")]
    pub presets: String,

    /// Schema file to validate against instead of the built-in schema
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// Setup-action command inputs.
#[derive(Parser, Debug)]
#[command(about = "Generate a composite setup action from per-runner action directories")]
pub struct SetupActionArgs {
    /// Runner label selecting the action directory
    #[arg(long, value_name = "LABEL", env = "RUNS_ON")]
    pub runs_on: String,

    /// Toolchain whose setup action should be included
    #[arg(long, value_name = "NAME", env = "TOOLCHAIN")]
    pub toolchain: String,

    /// Preset whose setup action should be included
    #[arg(long, value_name = "NAME", env = "PRESET")]
    pub preset: String,

    /// Directory holding `<runs-on>/{base,toolchains,presets}` actions
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ACTIONS_ROOT)]
    pub actions_root: PathBuf,

    /// Directory that receives the generated action.yml
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SETUP_OUT_DIR)]
    pub out_dir: PathBuf,
}

/// Path globs parsed from a comma or whitespace separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths(pub Vec<String>);

pub fn parse_boolean(raw: &str) -> Result<bool, String> {
    let lowered = raw.to_ascii_lowercase();
    if TRUE_VALUES.contains(&lowered.as_str()) {
        return Ok(true);
    }
    if FALSE_VALUES.contains(&lowered.as_str()) {
        return Ok(false);
    }
    Err(format!(
        "'{raw}' is not a valid boolean value. Expected one of: {}",
        TRUE_VALUES
            .iter()
            .chain(FALSE_VALUES.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

pub fn parse_artifact_paths(raw: &str) -> Result<ArtifactPaths, String> {
    let paths: Vec<String> = raw
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if paths.is_empty() {
        return Err("expected at least one path (e.g. 'path/to/artifacts' or 'path1,path2')".into());
    }
    Ok(ArtifactPaths(paths))
}

pub fn parse_artifact_override(raw: &str) -> Result<ArtifactOverride, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "''" {
        return Ok(ArtifactOverride::default());
    }
    serde_json::from_str(trimmed).map_err(|err| {
        format!(
            "invalid artifact JSON ({err}); expected e.g. {{\"path\": [\"dir1\", \"!dir1/**/*.md\"], \"retention_days\": 5}}"
        )
    })
}
