use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Values a macro may expand to for one preset.
pub(super) struct MacroContext<'a> {
    pub source_dir: &'a Path,
    pub preset_name: &'a str,
    pub generator: Option<&'a str>,
    pub file_dir: &'a Path,
    pub environment: &'a BTreeMap<String, String>,
}

fn macro_regex() -> &'static Regex {
    static MACRO: OnceLock<Regex> = OnceLock::new();
    MACRO.get_or_init(|| {
        Regex::new(r"\$(env|penv|vendor)?\{([^}]*)\}").expect("regex for preset macros")
    })
}

/// Expand CMake preset macros in `value`. Unknown macros are left as written.
pub(super) fn expand(value: &str, ctx: &MacroContext<'_>) -> String {
    macro_regex()
        .replace_all(value, |caps: &Captures<'_>| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            match caps.get(1).map(|m| m.as_str()) {
                Some("env") => ctx
                    .environment
                    .get(name)
                    .cloned()
                    .or_else(|| std::env::var(name).ok())
                    .unwrap_or_default(),
                Some("penv") => std::env::var(name).unwrap_or_default(),
                Some(_) => whole.to_string(),
                None => expand_builtin(name, ctx).unwrap_or_else(|| whole.to_string()),
            }
        })
        .into_owned()
}

fn expand_builtin(name: &str, ctx: &MacroContext<'_>) -> Option<String> {
    let value = match name {
        "sourceDir" => path_text(ctx.source_dir),
        "sourceParentDir" => path_text(ctx.source_dir.parent().unwrap_or(ctx.source_dir)),
        "sourceDirName" => ctx
            .source_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "presetName" => ctx.preset_name.to_string(),
        "generator" => ctx.generator?.to_string(),
        "hostSystemName" => host_system_name().to_string(),
        "fileDir" => path_text(ctx.file_dir),
        "dollar" => "$".to_string(),
        "pathListSep" => path_list_separator().to_string(),
        _ => return None,
    };
    Some(value)
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn host_system_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn path_list_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
