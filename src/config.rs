use crate::descriptors::DescriptorRegistry;
use crate::level::LintLevel;
use crate::settings::SettingsSnapshot;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct ClippyConfig {
    #[serde(default)]
    pub lints: LintsConfig,

    #[serde(default)]
    pub fixes: FixesConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct LintsConfig {
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Enables preview-group rules.
    #[serde(default)]
    pub preview: bool,

    /// Lint ids and category names mapped to levels.
    #[serde(flatten)]
    pub levels: HashMap<String, LintLevel>,
}

/// Fix variant id → enabled. Variants not listed stay enabled.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct FixesConfig(pub HashMap<String, bool>);

impl ClippyConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid sharp-clippy configuration")
    }

    /// Lint ids or category names in `[lints]` that no built-in lint answers to.
    pub fn unknown_lints(&self) -> Vec<&str> {
        let known = DescriptorRegistry::builtin();
        let mut unknown: Vec<&str> = self
            .lints
            .levels
            .keys()
            .chain(&self.lints.disabled)
            .map(String::as_str)
            .filter(|id| !known.is_known(id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    /// Freeze into the snapshot one analysis pass reads from.
    pub fn to_settings(&self) -> SettingsSnapshot {
        for lint in self.unknown_lints() {
            tracing::warn!(lint, "unknown lint in configuration; ignoring");
        }
        SettingsSnapshot::default()
            .with_config_levels(self.lints.levels.clone())
            .disable(self.lints.disabled.iter().cloned())
            .with_fix_toggles(self.fixes.0.clone())
            .with_preview(self.lints.preview)
    }
}

pub const DEFAULT_CONFIG_FILE_NAME: &str = "sharp-clippy.toml";

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut cur = Some(start_dir);
    while let Some(dir) = cur {
        let candidate = dir.join(DEFAULT_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        cur = dir.parent();
    }
    None
}

pub fn load_config_file(path: &Path) -> Result<ClippyConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let cfg: ClippyConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(cfg)
}

pub fn load_config(
    explicit_path: Option<&Path>,
    start_dir: &Path,
) -> Result<Option<(PathBuf, ClippyConfig)>> {
    if let Some(p) = explicit_path {
        let cfg = load_config_file(p)?;
        return Ok(Some((p.to_path_buf(), cfg)));
    }

    let Some(p) = find_config_file(start_dir) else {
        return Ok(None);
    };
    let cfg = load_config_file(&p)?;
    Ok(Some((p, cfg)))
}
