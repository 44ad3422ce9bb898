//! Application configuration
//!
//! Read from a TOML file. Every key is optional; missing keys take the
//! defaults below.
//!
//! ```toml
//! storage_dir = "checklists"
//! progress_file = "progress.json"
//! log_file = "logs/flight_log.csv"
//! aerodrome_db = "aerodromes.csv"
//! language = "en"
//!
//! [pagination]
//! item_height = 80
//! min_items_per_page = 5
//!
//! [navigation]
//! auto_advance_delay_ms = 300
//! screen_height = 800
//! show_buttons = true
//!
//! [geo]
//! max_distance_km = 2.0
//! max_speed_kmh = 40.0
//! ```

use anyhow::{Context, Result};
use checks_geo::{GeoConfig, HeaderLanguage};
use checks_progress::{PageLayout, PaginationConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub(crate) const DEFAULT_CONFIG_FILE: &str = "checks.toml";

/// Navigation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NavigationConfig {
    /// Delay before a fully checked page turns
    pub(crate) auto_advance_delay_ms: u64,
    /// Display height used to size full-list pages
    pub(crate) screen_height: u32,
    /// Whether the navigation button bar takes space
    pub(crate) show_buttons: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay_ms: 300,
            screen_height: 800,
            show_buttons: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Directory holding checklist documents
    pub(crate) storage_dir: PathBuf,
    /// Progress store file
    pub(crate) progress_file: PathBuf,
    /// Flight log file
    pub(crate) log_file: PathBuf,
    /// Aerodrome CSV; no proximity tagging without it
    pub(crate) aerodrome_db: Option<PathBuf>,
    /// Flight log header language (`es` or `en`)
    pub(crate) language: String,
    pub(crate) pagination: PaginationConfig,
    pub(crate) navigation: NavigationConfig,
    pub(crate) geo: GeoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("checklists"),
            progress_file: PathBuf::from("progress.json"),
            log_file: PathBuf::from("logs/flight_log.csv"),
            aerodrome_db: None,
            language: "es".to_string(),
            pagination: PaginationConfig::default(),
            navigation: NavigationConfig::default(),
            geo: GeoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse TOML text
    pub(crate) fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present and defaults otherwise.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in {}", path.display()))?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Flight log header language
    pub(crate) fn header_language(&self) -> Result<HeaderLanguage> {
        self.language
            .parse()
            .with_context(|| format!("language '{}' in configuration", self.language))
    }

    /// Full-list page layout for the configured screen
    pub(crate) fn page_layout(&self) -> PageLayout {
        PageLayout::for_screen(
            self.navigation.screen_height,
            self.navigation.show_buttons,
            &self.pagination,
        )
    }

    pub(crate) fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.navigation.auto_advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            language = "en"
            aerodrome_db = "data/aerodromes.csv"

            [pagination]
            item_height = 100

            [geo]
            max_distance_km = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.header_language().unwrap(), HeaderLanguage::English);
        assert_eq!(config.aerodrome_db, Some(PathBuf::from("data/aerodromes.csv")));
        assert_eq!(config.pagination.item_height, 100);
        assert_eq!(config.pagination.min_items_per_page, 5);
        assert!((config.geo.max_distance_km - 5.0).abs() < f64::EPSILON);
        assert!((config.geo.max_speed_kmh - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.navigation, NavigationConfig::default());
    }

    #[test]
    fn default_layout_fits_seven_items() {
        // 800 - 128 chrome - 80 buttons = 592 -> 7 items of 80
        assert_eq!(AppConfig::default().page_layout().items_per_page(), 7);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let config = AppConfig::from_toml_str("language = \"fr\"").unwrap();
        assert!(config.header_language().is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("checks.toml");
        std::fs::write(&path, "storage_dir = \"docs\"\n[navigation]\nshow_buttons = false\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("docs"));
        assert!(!config.navigation.show_buttons);
    }
}
