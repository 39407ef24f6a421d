//! Optional per-project settings read from `paratranz.toml`.
//!
//! ```toml
//! original_dir = "original"
//! translation_dir = "localization"
//! output_dir = "para_tranz/output"
//! mapping_file = "para_tranz/para_tranz_map.json"
//! target_script = "hangul-jamo"
//! ```
//!
//! Relative paths are resolved against the project directory.

use std::path::{Path, PathBuf};

use paratranz_sync::{ProjectLayout, ScriptRange};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "paratranz.toml";

/// Scripts accepted by `--target-script`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetScript {
    /// Hangul Jamo, U+1100..=U+11FF.
    HangulJamo,

    /// Precomposed Hangul syllables, U+AC00..=U+D7A3.
    HangulSyllables,

    /// CJK unified ideographs, U+4E00..=U+9FA5.
    Cjk,
}

impl TargetScript {
    pub fn range(self) -> ScriptRange {
        match self {
            TargetScript::HangulJamo => ScriptRange::HANGUL_JAMO,
            TargetScript::HangulSyllables => ScriptRange::HANGUL_SYLLABLES,
            TargetScript::Cjk => ScriptRange::CJK_UNIFIED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSettings {
    pub original_dir: Option<PathBuf>,
    pub translation_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mapping_file: Option<PathBuf>,
    pub target_script: Option<String>,
}

impl ProjectSettings {
    /// Reads `paratranz.toml` below `root`, or returns empty settings when
    /// the file does not exist.
    pub fn load(root: &Path) -> Result<Self, String> {
        let path = root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("Invalid '{}': {}", path.display(), e))
    }

    /// Default layout below `root` with every configured directory applied.
    pub fn layout(&self, root: &Path) -> ProjectLayout {
        let mut layout = ProjectLayout::new(root);
        if let Some(dir) = &self.original_dir {
            layout = layout.with_original_dir(root.join(dir));
        }
        if let Some(dir) = &self.translation_dir {
            layout = layout.with_translation_dir(root.join(dir));
        }
        if let Some(dir) = &self.output_dir {
            layout = layout.with_output_dir(root.join(dir));
        }
        if let Some(file) = &self.mapping_file {
            layout = layout.with_mapping_file(root.join(file));
        }
        layout
    }

    /// Parses `target_script`; the file accepts the same names as the flag.
    pub fn script(&self) -> Result<ScriptRange, String> {
        match &self.target_script {
            Some(name) => name.parse().map_err(|e: paratranz_sync::Error| e.to_string()),
            None => Ok(ScriptRange::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = ProjectSettings::load(dir.path()).unwrap();
        assert_eq!(settings, ProjectSettings::default());
        assert_eq!(settings.layout(dir.path()), ProjectLayout::new(dir.path()));
        assert_eq!(settings.script().unwrap(), ScriptRange::HANGUL_JAMO);
    }

    #[test]
    fn test_settings_override_layout() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            indoc! {r#"
                translation_dir = "ko"
                mapping_file = "map.json"
                target_script = "hangul-syllables"
            "#},
        )
        .unwrap();

        let settings = ProjectSettings::load(dir.path()).unwrap();
        let layout = settings.layout(dir.path());
        assert_eq!(layout.translation_dir, dir.path().join("ko"));
        assert_eq!(layout.mapping_file, dir.path().join("map.json"));
        assert_eq!(layout.original_dir, dir.path().join("original"));
        assert_eq!(settings.script().unwrap(), ScriptRange::HANGUL_SYLLABLES);
    }

    #[test]
    fn test_unknown_script_in_file_is_rejected() {
        let settings = ProjectSettings {
            target_script: Some("klingon".to_string()),
            ..ProjectSettings::default()
        };
        let err = settings.script().unwrap_err();
        assert!(err.contains("unknown target script"));
    }

    #[test]
    fn test_flag_names_match_file_names() {
        use clap::ValueEnum;

        for script in TargetScript::value_variants() {
            let name = script.to_possible_value().unwrap().get_name().to_string();
            let settings = ProjectSettings {
                target_script: Some(name),
                ..ProjectSettings::default()
            };
            assert_eq!(settings.script().unwrap(), script.range());
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "outptu_dir = \"x\"\n").unwrap();
        assert!(ProjectSettings::load(dir.path()).is_err());
    }
}
