use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::carousel::{default_pages, Page, PageTargetPolicy};
use crate::style::HeaderStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub header: HeaderBarConfig,
    #[serde(default = "default_pages")]
    pub pages: Vec<Page>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scroll: ScrollConfig::default(),
            carousel: CarouselConfig::default(),
            refresh: RefreshConfig::default(),
            header: HeaderBarConfig::default(),
            pages: default_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Scroll thresholds, in points relative to the rest position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Offset of the list at rest; overscroll is measured from here
    #[serde(default)]
    pub rest_offset: f64,
    /// At or above this offset the hero is fully opaque
    #[serde(default)]
    pub start_fade: f64,
    /// At or below this offset the hero is fully faded
    #[serde(default = "default_end_fade")]
    pub end_fade: f64,
    /// Height of the hero banner
    #[serde(default = "default_hero_height")]
    pub hero_height: f64,
    /// Height of the compact header bar below the safe area
    #[serde(default = "default_bar_height")]
    pub bar_height: f64,
    /// Top safe-area inset assumed until the host reports one
    #[serde(default = "default_safe_area_top")]
    pub default_safe_area_top: f64,
    /// Fixed collapse threshold; derived from the hero geometry when unset
    #[serde(default)]
    pub collapse_threshold: Option<f64>,
    /// Extra distance past the threshold needed to expand again (0 = none)
    #[serde(default)]
    pub collapse_hysteresis: f64,
    /// Viewport width at which the layout switches to wide
    #[serde(default = "default_wide_breakpoint")]
    pub wide_breakpoint: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            rest_offset: 0.0,
            start_fade: 0.0,
            end_fade: default_end_fade(),
            hero_height: default_hero_height(),
            bar_height: default_bar_height(),
            default_safe_area_top: default_safe_area_top(),
            collapse_threshold: None,
            collapse_hysteresis: 0.0,
            wide_breakpoint: default_wide_breakpoint(),
        }
    }
}

impl ScrollConfig {
    /// Collapse threshold for a given top safe-area inset
    ///
    /// The header collapses once the hero has scrolled up far enough that only
    /// the bar and the safe area would remain of it.
    pub fn collapse_threshold_for(&self, safe_area_top: f64) -> f64 {
        self.collapse_threshold
            .unwrap_or(-(self.hero_height - safe_area_top - self.bar_height))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Auto-advance interval in milliseconds
    #[serde(default = "default_carousel_interval")]
    pub interval_ms: u64,
    /// Pause after a manual page change before auto-advance restarts
    #[serde(default = "default_resume_delay")]
    pub resume_delay_ms: u64,
    /// Handling of out-of-range swipe targets
    #[serde(default)]
    pub page_target: PageTargetPolicy,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_carousel_interval(),
            resume_delay_ms: default_resume_delay(),
            page_target: PageTargetPolicy::default(),
        }
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Overscroll distance that triggers a refresh
    #[serde(default = "default_refresh_threshold")]
    pub threshold: f64,
    /// Hold time after the refresh operation completes
    #[serde(default = "default_minimum_visible")]
    pub minimum_visible_ms: u64,
    /// Spinner offset from the top while a refresh is active
    #[serde(default = "default_spinner_rest_offset")]
    pub spinner_rest_offset: f64,
    /// Emit a feedback event when a refresh triggers
    #[serde(default = "default_true")]
    pub feedback: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            threshold: default_refresh_threshold(),
            minimum_visible_ms: default_minimum_visible(),
            spinner_rest_offset: default_spinner_rest_offset(),
            feedback: default_true(),
        }
    }
}

impl RefreshConfig {
    pub fn minimum_visible(&self) -> Duration {
        Duration::from_millis(self.minimum_visible_ms)
    }
}

/// Static header bar content and palettes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderBarConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_welcome")]
    pub welcome: String,
    /// Icon buttons, left to right
    #[serde(default = "default_icons")]
    pub icons: Vec<String>,
    /// Popovers the header can open
    #[serde(default = "default_popovers")]
    pub popovers: Vec<String>,
    #[serde(default = "HeaderStyle::expanded_default")]
    pub expanded: HeaderStyle,
    #[serde(default = "HeaderStyle::collapsed_default")]
    pub collapsed: HeaderStyle,
}

impl Default for HeaderBarConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            welcome: default_welcome(),
            icons: default_icons(),
            popovers: default_popovers(),
            expanded: HeaderStyle::expanded_default(),
            collapsed: HeaderStyle::collapsed_default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("herobar")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_end_fade() -> f64 {
    -120.0
}

fn default_hero_height() -> f64 {
    276.0
}

fn default_bar_height() -> f64 {
    80.0
}

fn default_safe_area_top() -> f64 {
    50.0
}

fn default_wide_breakpoint() -> f64 {
    700.0
}

fn default_carousel_interval() -> u64 {
    5000
}

fn default_resume_delay() -> u64 {
    1500
}

fn default_refresh_threshold() -> f64 {
    80.0
}

fn default_minimum_visible() -> u64 {
    2000
}

fn default_spinner_rest_offset() -> f64 {
    70.0
}

fn default_greeting() -> String {
    "Hey, Vemalla Srinivas Reddy!".to_string()
}

fn default_welcome() -> String {
    "Welcome, we're happy to have you here!".to_string()
}

fn default_icons() -> Vec<String> {
    vec!["announcements".to_string(), "notifications".to_string()]
}

fn default_popovers() -> Vec<String> {
    vec!["notifications".to_string(), "profile".to_string()]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl HeaderConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Reject settings the controller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error::Config;

        if self.pages.is_empty() {
            return Err(crate::Error::EmptyPages);
        }
        let finite = [
            ("scroll.rest_offset", self.scroll.rest_offset),
            ("scroll.start_fade", self.scroll.start_fade),
            ("scroll.end_fade", self.scroll.end_fade),
            ("scroll.hero_height", self.scroll.hero_height),
            ("scroll.bar_height", self.scroll.bar_height),
            ("scroll.default_safe_area_top", self.scroll.default_safe_area_top),
            ("scroll.wide_breakpoint", self.scroll.wide_breakpoint),
            ("refresh.threshold", self.refresh.threshold),
            ("refresh.spinner_rest_offset", self.refresh.spinner_rest_offset),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Config(format!("{} must be a finite number, got {}", name, value)));
            }
        }
        if let Some(threshold) = self.scroll.collapse_threshold {
            if !threshold.is_finite() {
                return Err(Config(format!(
                    "scroll.collapse_threshold must be a finite number, got {}",
                    threshold
                )));
            }
        }
        let fade_ordered = self.scroll.end_fade < self.scroll.start_fade;
        if !fade_ordered {
            return Err(Config(format!(
                "scroll.end_fade ({}) must be below scroll.start_fade ({})",
                self.scroll.end_fade, self.scroll.start_fade
            )));
        }
        if !self.scroll.collapse_hysteresis.is_finite() || self.scroll.collapse_hysteresis < 0.0 {
            return Err(Config("scroll.collapse_hysteresis must be >= 0".to_string()));
        }
        let threshold_positive = self.refresh.threshold > 0.0;
        if !threshold_positive {
            return Err(Config("refresh.threshold must be positive".to_string()));
        }
        if self.carousel.interval_ms == 0 {
            return Err(Config("carousel.interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/herobar/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("herobar")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("herobar.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collapse_threshold() {
        let config = ScrollConfig::default();
        assert_eq!(config.collapse_threshold_for(50.0), -146.0);
        // Taller safe area collapses earlier
        assert_eq!(config.collapse_threshold_for(100.0), -96.0);
    }

    #[test]
    fn test_collapse_threshold_override() {
        let config = ScrollConfig {
            collapse_threshold: Some(-10.0),
            ..Default::default()
        };
        assert_eq!(config.collapse_threshold_for(50.0), -10.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: HeaderConfig = toml::from_str(
            r##"
            [carousel]
            interval_ms = 3000
            page_target = "clamp"

            [header.collapsed]
            background = "#FFFFFF"
            title_tint = "#000"
            icon_tint = "#000"
            icon_fill = "#1F8E8E93"
            avatar_ring = "#2E8E8E93"
            "##,
        )
        .unwrap();

        assert_eq!(config.carousel.interval(), Duration::from_secs(3));
        assert_eq!(config.carousel.page_target, PageTargetPolicy::Clamp);
        assert_eq!(config.refresh.minimum_visible(), Duration::from_secs(2));
        assert_eq!(config.pages.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let result: Result<HeaderConfig, _> = toml::from_str(
            r##"
            [[pages]]
            title = "x"
            image = "x"
            gradient = { colors = ["#nothex"] }
            "##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_fade() {
        let mut config = HeaderConfig::default();
        config.scroll.end_fade = 10.0;
        assert!(config.validate().is_err());

        let mut config = HeaderConfig::default();
        config.pages.clear();
        assert!(matches!(config.validate(), Err(crate::Error::EmptyPages)));
    }

    #[test]
    fn test_validate_rejects_non_finite_geometry() {
        let cases: [(&str, fn(&mut HeaderConfig, f64)); 9] = [
            ("rest_offset", |c, v| c.scroll.rest_offset = v),
            ("start_fade", |c, v| c.scroll.start_fade = v),
            ("end_fade", |c, v| c.scroll.end_fade = v),
            ("hero_height", |c, v| c.scroll.hero_height = v),
            ("bar_height", |c, v| c.scroll.bar_height = v),
            ("default_safe_area_top", |c, v| c.scroll.default_safe_area_top = v),
            ("wide_breakpoint", |c, v| c.scroll.wide_breakpoint = v),
            ("threshold", |c, v| c.refresh.threshold = v),
            ("spinner_rest_offset", |c, v| c.refresh.spinner_rest_offset = v),
        ];
        for (name, set) in cases {
            for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let mut config = HeaderConfig::default();
                set(&mut config, value);
                assert!(
                    matches!(config.validate(), Err(crate::Error::Config(_))),
                    "{} = {} was accepted",
                    name,
                    value
                );
            }
        }
    }

    #[test]
    fn test_validate_rejects_non_finite_collapse_threshold() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut config = HeaderConfig::default();
            config.scroll.collapse_threshold = Some(value);
            assert!(config.validate().is_err(), "collapse_threshold = {}", value);
        }

        let mut config = HeaderConfig::default();
        config.scroll.collapse_threshold = Some(-10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_nan_collapse_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scroll]\ncollapse_threshold = nan\n").unwrap();

        let result = HeaderConfig::load_from(&path);
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_save_to_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        HeaderConfig::default().save_to(&path).unwrap();

        let loaded = HeaderConfig::load_from(&path).unwrap();
        assert_eq!(loaded.carousel.interval_ms, 5000);
    }

    #[test]
    fn test_toml_round_trip_keeps_pages() {
        let config = HeaderConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: HeaderConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.pages, config.pages);
        assert_eq!(parsed.header.collapsed, config.header.collapsed);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = HeaderConfig::load_from(Path::new("/nonexistent/herobar.toml")).unwrap();
        assert_eq!(config.carousel.interval_ms, 5000);
    }
}
