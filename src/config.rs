//! User settings, stored as `settings.json` in the data directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::concepts::{ExtractorConfig, InsightConfig};
use crate::flashcards::SchedulerConfig;
use crate::storage::{read_json_or_default, write_json, Result, StorageError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub scheduler: SchedulerConfig,
    pub extractor: ExtractorConfig,
    pub insights: InsightConfig,
}

impl Settings {
    /// Load settings, using defaults for a missing file or missing fields
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Settings = read_json_or_default(path)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        write_json(path, self)
    }

    fn validate(&self) -> Result<()> {
        let s = &self.scheduler;
        if !s.min_ease.is_finite() || s.min_ease <= 0.0 || s.initial_ease < s.min_ease {
            return Err(StorageError::Validation(format!(
                "initial ease {} must be at least the minimum ease {} (> 0)",
                s.initial_ease, s.min_ease
            )));
        }
        let intervals = [
            s.again_interval_days,
            s.hard_interval_days,
            s.first_interval_days,
            s.second_interval_days,
            s.max_interval_days,
        ];
        if intervals.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(StorageError::Validation("intervals must be non-negative".to_string()));
        }
        if s.max_interval_days < s.second_interval_days {
            return Err(StorageError::Validation(format!(
                "maximum interval {} is shorter than the second interval {}",
                s.max_interval_days, s.second_interval_days
            )));
        }
        if s.again_penalty < 0.0 || s.hard_penalty < 0.0 {
            return Err(StorageError::Validation("ease penalties must be non-negative".to_string()));
        }
        if self.extractor.min_length == 0 {
            return Err(StorageError::Validation("minimum concept length must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("settings.json")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.scheduler.min_ease, 1.3);
        assert_eq!(settings.extractor.min_length, 3);
        assert_eq!(settings.insights.default_top_k, 5);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"scheduler":{"againPenalty":0.3},"extractor":{"minLength":4}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.scheduler.again_penalty, 0.3);
        assert_eq!(settings.scheduler.initial_ease, 2.5);
        assert_eq!(settings.extractor.min_length, 4);
        assert!(settings.extractor.collapse_plurals);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"scheduler":{"initialEase":1.0}}"#).unwrap();

        assert!(matches!(Settings::load(&path), Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_max_interval_below_second_interval_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"scheduler":{"maxIntervalDays":3.0}}"#).unwrap();

        assert!(matches!(Settings::load(&path), Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let mut settings = Settings::default();
        settings.insights.default_top_k = 3;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
