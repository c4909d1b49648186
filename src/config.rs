use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::DEFAULT_API_BASE;

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// Environment variable overriding `service.api_base`.
pub const ENV_API_BASE: &str = "LEAFLENS_API_BASE";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG: &str = "LEAFLENS_LOG";

/// Matching service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the matching service
    pub api_base: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Typewriter reveal settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay between revealed characters in milliseconds
    pub interval_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { interval_ms: 25 }
    }
}

impl RevealConfig {
    /// Reveal interval, never shorter than one millisecond.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Behavior configuration for the UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Number of exchanges to scroll with Page Up/Down
    pub scroll_page_size: usize,
    /// Frame duration while something is animating or in flight
    pub animation_frame_ms: u64,
    /// Polling interval when idle
    pub idle_poll_ms: u64,
    /// Cursor blink interval
    pub cursor_blink_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_page_size: 10,
            animation_frame_ms: 16, // ~60 FPS
            idle_poll_ms: 50,
            cursor_blink_ms: 530,
        }
    }
}

/// Color configuration for the UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Chat area gradient start color (Forest green by default)
    pub chat_gradient_start: Rgb,
    /// Chat area gradient end color (Teal by default)
    pub chat_gradient_end: Rgb,
    /// Input area gradient start color
    pub input_gradient_start: Rgb,
    /// Input area gradient end color
    pub input_gradient_end: Rgb,
    /// Greeting gradient start
    pub greeting_start: Rgb,
    /// Greeting gradient end
    pub greeting_end: Rgb,
    /// User line color
    pub user: Rgb,
    /// Service line color
    pub answer: Rgb,
    /// Failed exchange color
    pub failure: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            chat_gradient_start: [34, 139, 34],   // Forest green
            chat_gradient_end: [0, 128, 128],     // Teal
            input_gradient_start: [154, 205, 50], // Yellow green
            input_gradient_end: [32, 178, 170],   // Light sea green
            greeting_start: [173, 255, 47],       // Green yellow
            greeting_end: [64, 224, 208],         // Turquoise
            user: [0, 255, 255],
            answer: [144, 238, 144],
            failure: [255, 100, 100],
        }
    }
}

impl ColorConfig {
    /// Convert an RGB array to a tuple for the gradient helpers.
    pub fn to_tuple(rgb: &Rgb) -> (u8, u8, u8) {
        (rgb[0], rgb[1], rgb[2])
    }

    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Get chat gradient colors as tuples.
    pub fn chat_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.chat_gradient_start),
            Self::to_tuple(&self.chat_gradient_end),
        )
    }

    /// Get input gradient colors as tuples.
    pub fn input_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.input_gradient_start),
            Self::to_tuple(&self.input_gradient_end),
        )
    }

    /// Get greeting gradient colors as tuples.
    pub fn greeting_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.greeting_start),
            Self::to_tuple(&self.greeting_end),
        )
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "leaflens_cli=debug"
    pub level: String,
    /// Log file; defaults to the platform data directory
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Returns the default log file: <data_local_dir>/leaflens/leaflens.log
    pub fn default_file() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("leaflens").join("leaflens.log"))
    }

    /// The configured log file, or the default one.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.clone().or_else(Self::default_file)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub reveal: RevealConfig,
    pub behavior: BehaviorConfig,
    pub colors: ColorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the default config file path: ~/.config/leaflens/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("leaflens").join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_or_default().0
    }

    /// Like `load`, but also reports why an existing file was ignored.
    ///
    /// A missing file is not an error. Environment overrides are applied.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        let (mut config, error) = match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from_path(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            },
            _ => (Self::default(), None),
        };

        config.apply_env(|key| std::env::var(key).ok());
        (config, error)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.service.api_base = base;
        }

        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to_path(&path)
        } else {
            Err(anyhow::anyhow!("Could not determine config directory"))
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
