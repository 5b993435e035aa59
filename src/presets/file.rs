use super::{PresetError, PresetKind};
use crate::util::normalize_lexically;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const PRESETS_FILE: &str = "CMakePresets.json";
pub const USER_PRESETS_FILE: &str = "CMakeUserPresets.json";

/// One preset entry of any kind; fields irrelevant to a kind stay unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, deserialize_with = "string_or_list")]
    pub inherits: Vec<String>,
    pub configure_preset: Option<String>,
    pub binary_dir: Option<String>,
    pub install_dir: Option<String>,
    pub generator: Option<String>,
    /// `null` values unset a variable inherited from a parent.
    #[serde(default)]
    pub environment: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    /// Directory of the file that declared this preset (`${fileDir}`).
    #[serde(skip)]
    pub file_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowStep {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetsFile {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    configure_presets: Vec<Preset>,
    #[serde(default)]
    build_presets: Vec<Preset>,
    #[serde(default)]
    test_presets: Vec<Preset>,
    #[serde(default)]
    package_presets: Vec<Preset>,
    #[serde(default)]
    workflow_presets: Vec<Preset>,
}

impl PresetsFile {
    fn into_kinds(self) -> [(PresetKind, Vec<Preset>); 5] {
        [
            (PresetKind::Configure, self.configure_presets),
            (PresetKind::Build, self.build_presets),
            (PresetKind::Test, self.test_presets),
            (PresetKind::Package, self.package_presets),
            (PresetKind::Workflow, self.workflow_presets),
        ]
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// Presets of every kind, in declaration order across all loaded files.
pub(super) type PresetTable = BTreeMap<PresetKind, Vec<Preset>>;

/// Load `CMakePresets.json` from `source_dir`, then `CMakeUserPresets.json`
/// when present. Each file (including `include` targets) is read once.
pub(super) fn load_presets(source_dir: &Path) -> Result<PresetTable, PresetError> {
    let mut table: PresetTable = PresetKind::ALL.iter().map(|kind| (*kind, Vec::new())).collect();
    let mut visited = BTreeSet::new();

    let main = source_dir.join(PRESETS_FILE);
    if !main.is_file() {
        return Err(PresetError::FileNotFound { path: main });
    }
    load_file(&main, &mut table, &mut visited)?;

    let user = source_dir.join(USER_PRESETS_FILE);
    if user.is_file() {
        load_file(&user, &mut table, &mut visited)?;
    }
    Ok(table)
}

fn load_file(
    path: &Path,
    table: &mut PresetTable,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<(), PresetError> {
    let path = normalize_lexically(path);
    if !visited.insert(path.clone()) {
        return Ok(());
    }
    if !path.is_file() {
        return Err(PresetError::FileNotFound { path });
    }
    let text = fs::read_to_string(&path).map_err(|source| PresetError::Read {
        path: path.clone(),
        source,
    })?;
    let file: PresetsFile = serde_json::from_str(&text).map_err(|source| PresetError::Parse {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), includes = file.include.len(), "loaded presets file");

    let file_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let includes: Vec<PathBuf> = file.include.iter().map(|rel| file_dir.join(rel)).collect();

    for (kind, presets) in file.into_kinds() {
        let entries = table.entry(kind).or_default();
        for mut preset in presets {
            if entries.iter().any(|existing| existing.name == preset.name) {
                return Err(PresetError::Duplicate {
                    kind,
                    name: preset.name,
                    path: path.clone(),
                });
            }
            preset.file_dir = file_dir.clone();
            entries.push(preset);
        }
    }

    for include in includes {
        load_file(&include, table, visited)?;
    }
    Ok(())
}
