//! Preset descriptor validation against the JSON schema.
//!
//! The schema ships inside the binary; `--schema` swaps in a file so the CI
//! repository can evolve the format without a rebuild.
use crate::cli::ValidateArgs;
use crate::util::parse_json;
use anyhow::{anyhow, Context, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Schema used when `--schema` is not given.
pub const BUILTIN_SCHEMA: &str = include_str!("../schemas/preset-schema.json");

pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let presets = parse_json(&args.presets)?;
    let schema = load_schema(args.schema.as_deref())?;
    validate_presets(&presets, &schema)?;
    println!("Presets validation successful");
    Ok(())
}

pub fn load_schema(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return serde_json::from_str(BUILTIN_SCHEMA).context("parse built-in preset schema");
    };
    if !path.is_file() {
        return Err(anyhow!("Schema file not found: {}", path.display()));
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse schema {}", path.display()))
}

/// Check `presets` against `schema`, reporting the first failure with the
/// path of the offending value.
pub fn validate_presets(presets: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|err| anyhow!("invalid preset schema: {err}"))?;
    let outcome = compiled.validate(presets);
    let Err(mut errors) = outcome else {
        return Ok(());
    };
    let Some(first) = errors.next() else {
        return Ok(());
    };
    let segments = pointer_segments(&first.instance_path.to_string());
    let location = if segments.is_empty() {
        String::new()
    } else {
        format!(" @ {}", segments.join(" -> "))
    };
    tracing::debug!(schema_path = %first.schema_path, "preset validation failed");
    Err(anyhow!("Preset validation error{location}: {first}"))
}

/// Split a JSON pointer (`/a/b~1c`) into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}
