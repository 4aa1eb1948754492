use std::path::PathBuf;

use marionette_core::Result;
use marionette_scene::DuplicateNamePolicy;
use serde::{Deserialize, Serialize};

/// Knobs for [`crate::SceneBuilder`].
///
/// Deserializes with every field optional, so `{}` is the default set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Rescale bone weights so each vertex's weights sum to 1.
    pub normalize_weights: bool,
    pub duplicate_names: DuplicateNamePolicy,
    /// Directory texture file names are resolved against.
    pub texture_base_dir: Option<PathBuf>,
    /// When false, materials keep their texture names but nothing is loaded.
    pub load_textures: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            normalize_weights: true,
            duplicate_names: DuplicateNamePolicy::FirstWins,
            texture_base_dir: None,
            load_textures: true,
        }
    }
}

impl ImportSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_texture_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_base_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.duplicate_names = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let settings = ImportSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, ImportSettings::default());
        assert!(settings.normalize_weights);
        assert!(settings.load_textures);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let settings = ImportSettings::from_json_str(
            r#"{ "duplicate_names": "reject", "texture_base_dir": "assets" }"#,
        )
        .unwrap();
        assert_eq!(settings.duplicate_names, DuplicateNamePolicy::Reject);
        assert_eq!(settings.texture_base_dir, Some(PathBuf::from("assets")));
        assert!(settings.normalize_weights);
    }
}
