//! Build-matrix construction from preset descriptors.
use crate::cli::MatrixArgs;
use crate::output::Outputs;
use crate::util::{json_type_name, parse_json_object};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Per-preset settings as supplied in `--presets`.
///
/// Values are kept as raw JSON: `runs-on` may be a label list, and an explicit
/// `null` is passed through rather than replaced by a default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetDescriptor {
    #[serde(rename = "runs-on", default, deserialize_with = "present")]
    pub runs_on: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub toolchain: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub artifact: Option<Value>,
}

/// `Some` whenever the key exists, `null` included.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixEntry {
    pub preset: String,
    #[serde(rename = "runs-on")]
    pub runs_on: Value,
    pub toolchain: Value,
    /// Artifact settings as embedded JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matrix {
    pub include: Vec<MatrixEntry>,
}

pub fn run_matrix(args: &MatrixArgs) -> Result<()> {
    let presets = parse_json_object(&args.presets)?;
    let presets = parse_descriptors(presets)?;
    let matrix = construct_matrix(&presets, &args.default_runs_on, &args.default_toolchain)?;
    tracing::info!(entries = matrix.include.len(), "constructed matrix");

    let mut outputs = Outputs::default();
    outputs.push(
        "matrix",
        serde_json::to_string(&matrix).context("serialize matrix")?,
    );
    outputs.print()
}

/// Decode each preset value, keeping input order.
pub fn parse_descriptors(presets: Map<String, Value>) -> Result<Vec<(String, PresetDescriptor)>> {
    presets
        .into_iter()
        .map(|(name, value)| {
            if !value.is_object() {
                return Err(anyhow!(
                    "JSON decode error: preset '{name}' must be an object, got {}",
                    json_type_name(&value)
                ));
            }
            let descriptor = serde_json::from_value(value)
                .map_err(|err| anyhow!("JSON decode error: preset '{name}': {err}"))?;
            Ok((name, descriptor))
        })
        .collect()
}

/// One matrix entry per preset; `runs-on` and `toolchain` fall back to the
/// defaults only when the preset omits the key.
pub fn construct_matrix(
    presets: &[(String, PresetDescriptor)],
    default_runs_on: &str,
    default_toolchain: &str,
) -> Result<Matrix> {
    let include = presets
        .iter()
        .map(|(name, descriptor)| {
            let artifact = descriptor
                .artifact
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .with_context(|| format!("serialize artifact of preset '{name}'"))?;
            Ok(MatrixEntry {
                preset: name.clone(),
                runs_on: descriptor
                    .runs_on
                    .clone()
                    .unwrap_or_else(|| Value::from(default_runs_on)),
                toolchain: descriptor
                    .toolchain
                    .clone()
                    .unwrap_or_else(|| Value::from(default_toolchain)),
                artifact,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Matrix { include })
}
