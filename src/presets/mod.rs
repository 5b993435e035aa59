//! Minimal CMake presets reader.
//!
//! Covers what CI step generation needs: loading `CMakePresets.json` (plus
//! `CMakeUserPresets.json` and `include` files), looking presets up by kind and
//! name, finding the build/test/package/workflow presets attached to a
//! configure preset, and macro-expanding inherited values like `binaryDir`.
mod file;
mod macros;
mod resolve;

pub use resolve::CMakePresets;

use std::fmt;
use std::path::PathBuf;

/// Preset kinds, in the order CMake runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PresetKind {
    Configure,
    Build,
    Test,
    Package,
    Workflow,
}

impl PresetKind {
    pub const ALL: [PresetKind; 5] = [
        PresetKind::Configure,
        PresetKind::Build,
        PresetKind::Test,
        PresetKind::Package,
        PresetKind::Workflow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetKind::Configure => "configure",
            PresetKind::Build => "build",
            PresetKind::Test => "test",
            PresetKind::Package => "package",
            PresetKind::Workflow => "workflow",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("CMake project root is not a directory: {}", path.display())]
    ProjectRootInvalid { path: PathBuf },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} preset '{name}' in {}", path.display())]
    Duplicate {
        kind: PresetKind,
        name: String,
        path: PathBuf,
    },

    #[error("{kind} preset '{name}' not found")]
    NotFound { kind: PresetKind, name: String },

    #[error("{kind} preset '{name}' inherits from unknown preset '{parent}'")]
    UnknownParent {
        kind: PresetKind,
        name: String,
        parent: String,
    },

    #[error("{kind} preset '{name}' has an inheritance cycle")]
    InheritanceCycle { kind: PresetKind, name: String },
}
