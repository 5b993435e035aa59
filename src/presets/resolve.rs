use super::file::{load_presets, Preset, PresetTable};
use super::macros::{expand, MacroContext};
use super::{PresetError, PresetKind};
use crate::util::normalize_lexically;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Presets loaded from one CMake project root.
#[derive(Debug)]
pub struct CMakePresets {
    source_dir: PathBuf,
    presets: PresetTable,
}

/// Inherited and macro-expanded values of one preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPreset {
    pub name: String,
    pub binary_dir: Option<String>,
    pub install_dir: Option<String>,
    pub generator: Option<String>,
}

impl CMakePresets {
    /// Load presets from `root`, which must be an existing directory holding
    /// `CMakePresets.json`.
    pub fn load(root: &Path) -> Result<Self, PresetError> {
        let source_dir = std::path::absolute(root)
            .map(|path| normalize_lexically(&path))
            .map_err(|_| PresetError::ProjectRootInvalid {
                path: root.to_path_buf(),
            })?;
        if !source_dir.is_dir() {
            return Err(PresetError::ProjectRootInvalid {
                path: root.to_path_buf(),
            });
        }
        let presets = load_presets(&source_dir)?;
        Ok(Self {
            source_dir,
            presets,
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn presets(&self, kind: PresetKind) -> &[Preset] {
        self.presets.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get_preset_by_name(&self, kind: PresetKind, name: &str) -> Option<&Preset> {
        self.presets(kind).iter().find(|preset| preset.name == name)
    }

    /// Non-hidden presets of every non-configure kind that run against the
    /// configure preset `configure`. Kinds with no match are omitted.
    ///
    /// Build, test and package presets match on their (possibly inherited)
    /// `configurePreset`; workflow presets match when their first step is
    /// that configure preset.
    pub fn find_related_presets(
        &self,
        configure: &str,
    ) -> Result<BTreeMap<PresetKind, Vec<&Preset>>, PresetError> {
        let mut related: BTreeMap<PresetKind, Vec<&Preset>> = BTreeMap::new();
        for kind in PresetKind::ALL {
            if kind == PresetKind::Configure {
                continue;
            }
            for preset in self.presets(kind) {
                if preset.hidden {
                    continue;
                }
                let matches = if kind == PresetKind::Workflow {
                    preset
                        .steps
                        .first()
                        .is_some_and(|step| step.kind == "configure" && step.name == configure)
                } else {
                    self.inherited(kind, &preset.name, |p| p.configure_preset.as_deref())?
                        .is_some_and(|name| name == configure)
                };
                if matches {
                    related.entry(kind).or_default().push(preset);
                }
            }
        }
        Ok(related)
    }

    /// Resolve inherited values of a preset and expand their macros.
    pub fn resolve_macro_values(
        &self,
        kind: PresetKind,
        name: &str,
    ) -> Result<ResolvedPreset, PresetError> {
        let lineage = self.lineage(kind, name)?;
        let first = |field: fn(&Preset) -> Option<&str>| lineage.iter().copied().find_map(field);

        let generator = first(|p| p.generator.as_deref());
        let mut raw_environment = BTreeMap::new();
        for preset in lineage.iter().rev() {
            for (key, value) in &preset.environment {
                match value {
                    Some(value) => raw_environment.insert(key.clone(), value.clone()),
                    None => raw_environment.remove(key),
                };
            }
        }
        let own = lineage[0];
        let raw_ctx = MacroContext {
            source_dir: &self.source_dir,
            preset_name: &own.name,
            generator,
            file_dir: &own.file_dir,
            environment: &raw_environment,
        };
        // `$env{}` inside an environment value sees the other values unexpanded.
        let environment: BTreeMap<String, String> = raw_environment
            .iter()
            .map(|(key, value)| (key.clone(), expand(value, &raw_ctx)))
            .collect();
        let ctx = MacroContext {
            environment: &environment,
            ..raw_ctx
        };

        let resolved = ResolvedPreset {
            name: own.name.clone(),
            binary_dir: first(|p| p.binary_dir.as_deref()).map(|value| expand(value, &ctx)),
            install_dir: first(|p| p.install_dir.as_deref()).map(|value| expand(value, &ctx)),
            generator: generator.map(str::to_string),
        };
        tracing::debug!(
            kind = %kind,
            preset = %resolved.name,
            binary_dir = ?resolved.binary_dir,
            install_dir = ?resolved.install_dir,
            generator = ?resolved.generator,
            "resolved preset values"
        );
        Ok(resolved)
    }

    fn inherited<'a>(
        &'a self,
        kind: PresetKind,
        name: &str,
        field: impl Fn(&'a Preset) -> Option<&'a str>,
    ) -> Result<Option<&'a str>, PresetError> {
        Ok(self.lineage(kind, name)?.into_iter().find_map(field))
    }

    /// The preset followed by its ancestors, depth-first in `inherits` order,
    /// each listed once.
    fn lineage(&self, kind: PresetKind, name: &str) -> Result<Vec<&Preset>, PresetError> {
        let mut order = Vec::new();
        let mut stack = Vec::new();
        self.walk(kind, name, &mut stack, &mut order)?;
        Ok(order)
    }

    fn walk<'a>(
        &'a self,
        kind: PresetKind,
        name: &str,
        stack: &mut Vec<String>,
        order: &mut Vec<&'a Preset>,
    ) -> Result<(), PresetError> {
        if stack.iter().any(|entry| entry == name) {
            return Err(PresetError::InheritanceCycle {
                kind,
                name: name.to_string(),
            });
        }
        let preset = self
            .get_preset_by_name(kind, name)
            .ok_or_else(|| PresetError::NotFound {
                kind,
                name: name.to_string(),
            })?;
        if order.iter().any(|seen| seen.name == preset.name) {
            return Ok(());
        }
        order.push(preset);
        stack.push(preset.name.clone());
        for parent in &preset.inherits {
            if self.get_preset_by_name(kind, parent).is_none() {
                return Err(PresetError::UnknownParent {
                    kind,
                    name: preset.name.clone(),
                    parent: parent.clone(),
                });
            }
            self.walk(kind, parent, stack, order)?;
        }
        stack.pop();
        Ok(())
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
