use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// Parse JSON passed on the command line.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|err| anyhow!("JSON decode error: {err}"))
}

/// Parse a JSON object passed on the command line.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>> {
    match parse_json(text)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!(
            "JSON decode error: expected an object, got {}",
            json_type_name(&other)
        )),
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `path` relative to `base`, or `None` when it does not lie under `base`.
pub fn relative_display(path: &Path, base: &Path) -> Option<String> {
    let relative = normalize_lexically(path)
        .strip_prefix(normalize_lexically(base))
        .ok()?
        .to_path_buf();
    if relative.as_os_str().is_empty() {
        return Some(".".to_string());
    }
    Some(relative.display().to_string())
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
