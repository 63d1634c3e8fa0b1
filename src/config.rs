//! Project configuration from `summon.toml`.
//!
//! Everything is optional; a missing file means defaults. CLI flags
//! override file values.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub const CONFIG_FILE: &str = "summon.toml";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummonConfig {
    /// Where generator templates live, relative to the project root.
    pub templates_dir: Option<PathBuf>,
    /// Preset answers applied before prompting, keyed by prompt name.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Command line executed after a successful live run.
    pub post_generate: Option<String>,
}

impl SummonConfig {
    /// Load `summon.toml` from `root`, or defaults when absent.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// The templates directory, resolved against `root`.
    pub fn templates_dir(&self, root: &Path) -> PathBuf {
        match &self.templates_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join(DEFAULT_TEMPLATES_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: SummonConfig = toml::from_str(
            r#"
templates_dir = "scaffolding"
post_generate = "npm run lint -- --fix"

[variables]
withStyles = "true"
"#,
        )
        .unwrap();
        assert_eq!(config.templates_dir, Some(PathBuf::from("scaffolding")));
        assert_eq!(config.variables["withStyles"], "true");
        assert!(config.post_generate.is_some());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SummonConfig::load(dir.path()).unwrap();
        assert!(config.variables.is_empty());
        assert_eq!(
            config.templates_dir(dir.path()),
            dir.path().join("templates")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = toml::from_str::<SummonConfig>("template_dir = \"typo\"\n");
        assert!(result.is_err());
    }
}
