//! Composite setup action generation.
//!
//! Runner setup is split into up to three local actions under
//! `<actions-root>/<runs-on>/`: `base`, `toolchains/<toolchain>` and
//! `presets/<preset>`. The generated action runs whichever exist, in that
//! order, forwarding the generic secret inputs to each.
use crate::cli::SetupActionArgs;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const ACTION_FILE: &str = "action.yml";
const SECRET_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionLayer {
    Base,
    Toolchain,
    Preset,
}

impl ActionLayer {
    fn label(self) -> &'static str {
        match self {
            ActionLayer::Base => "BASE",
            ActionLayer::Toolchain => "TOOLCHAIN",
            ActionLayer::Preset => "PRESET",
        }
    }
}

/// A local action that exists on disk, with the `uses:` path to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSource {
    pub layer: ActionLayer,
    pub uses: String,
}

pub fn run_setup_action(args: &SetupActionArgs) -> Result<()> {
    let sources = find_action_sources(
        &args.actions_root,
        &args.runs_on,
        &args.toolchain,
        &args.preset,
    );
    if sources.is_empty() {
        println!("No actions found, exiting gracefully");
        return Ok(());
    }
    for source in &sources {
        println!("Found {} action", source.layer.label());
    }

    let content = render_action(&sources);
    let path = write_action(&args.out_dir, &content)?;
    tracing::info!(path = %path.display(), steps = sources.len(), "wrote setup action");

    println!("Generated action file content:");
    println!("{content}");
    Ok(())
}

/// Candidate actions in base, toolchain, preset order, keeping those with an
/// `action.yml` or `action.yaml`.
pub fn find_action_sources(
    actions_root: &Path,
    runs_on: &str,
    toolchain: &str,
    preset: &str,
) -> Vec<ActionSource> {
    let base = format!(
        "{}/{runs_on}",
        actions_root.to_string_lossy().trim_end_matches(['/', '\\'])
    );
    [
        (ActionLayer::Base, format!("{base}/base")),
        (ActionLayer::Toolchain, format!("{base}/toolchains/{toolchain}")),
        (ActionLayer::Preset, format!("{base}/presets/{preset}")),
    ]
    .into_iter()
    .filter(|(layer, uses)| {
        let exists = action_exists(Path::new(uses));
        tracing::debug!(layer = layer.label(), path = %uses, exists, "checked setup action");
        exists
    })
    .map(|(layer, uses)| ActionSource { layer, uses })
    .collect()
}

fn action_exists(dir: &Path) -> bool {
    dir.join("action.yml").is_file() || dir.join("action.yaml").is_file()
}

pub fn render_action(sources: &[ActionSource]) -> String {
    let mut content = String::from(
        "name: Dynamic Setup Action\ndescription: Dynamically generated action\n\n# Input definitions for secrets\ninputs:",
    );
    for slot in 1..=SECRET_SLOTS {
        let _ = write!(
            content,
            "\n  secret{slot}:\n    description: \"Generic secret slot {slot}\"\n    required: false"
        );
    }
    content.push_str("\n\nruns:\n  using: composite\n  steps:");
    for source in sources {
        let _ = write!(content, "\n    - uses: {}\n      with:", source.uses);
        for slot in 1..=SECRET_SLOTS {
            let _ = write!(content, "\n        secret{slot}: ${{{{ inputs.secret{slot} }}}}");
        }
    }
    content
}

fn write_action(out_dir: &Path, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let path = out_dir.join(ACTION_FILE);
    fs::write(&path, content.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
