//! Stored user preferences (`.ems.yaml`)
//!
//! Remembers the last output format, process mode and region choice
//! between runs. CLI flags always override what is stored here.

use crate::error::EmsResult;
use crate::types::{OutputFormat, ProcessMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFS_FILE: &str = ".ems.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub output_format: OutputFormat,
    pub process_mode: ProcessMode,
    pub include_region: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Csv,
            process_mode: ProcessMode::Individual,
            include_region: true,
        }
    }
}

impl Preferences {
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_PREFS_FILE)
    }

    /// Load preferences, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> EmsResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> EmsResult<()> {
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.include_region);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".ems.yaml");
        let prefs = Preferences {
            output_format: OutputFormat::Both,
            process_mode: ProcessMode::Combined,
            include_region: false,
        };
        prefs.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("output_format: both"));
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".ems.yaml");
        std::fs::write(&path, "process_mode: combined\n").unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.process_mode, ProcessMode::Combined);
        assert_eq!(prefs.output_format, OutputFormat::Csv);
        assert!(prefs.include_region);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".ems.yaml");
        std::fs::write(&path, "output_format: [csv").unwrap();
        assert!(Preferences::load(&path).is_err());
    }
}
