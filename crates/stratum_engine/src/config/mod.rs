//! Configuration system
//!
//! Engine settings load from `.toml` or `.ron` files through the [`Config`]
//! trait. Every section is `#[serde(default)]`, so a file only has to name the
//! values it changes.

use crate::debug::DebugFlags;
use crate::foundation::logging::LoggingConfig;
use crate::foundation::math::{Color, Vec2};
use crate::foundation::time::FixedTimestep;
use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::from_path(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window and default render size
    pub window: WindowConfig,
    /// Scene behaviour
    pub scene: SceneConfig,
    /// Physics world and fixed-step settings
    pub physics: PhysicsConfig,
    /// Logger settings
    pub logging: LoggingConfig,
}

impl Config for EngineConfig {}

/// Window settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WindowConfig {
    /// Window extent as a vector
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stratum".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Break draw-layer ties by local Y position
    pub y_sort: bool,
    /// Screen-space margin (before zoom) kept around the viewport when culling
    pub cull_margin: f32,
    /// Ambient light color
    pub ambient_color: Color,
    /// Debug overlays drawn at the end of each frame
    pub debug: DebugFlags,
    /// World distance between sprite stack slices, before scale and zoom
    pub stack_layer_offset: f32,
    /// Lean sprite stack slices away from the screen centre
    pub stack_perspective_shift: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            y_sort: false,
            cull_margin: 100.0,
            ambient_color: Color::WHITE,
            debug: DebugFlags::empty(),
            stack_layer_offset: -1.0,
            stack_perspective_shift: false,
        }
    }
}

/// Physics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Seconds per physics step
    pub fixed_timestep: f32,
    /// Upper bound on physics steps run in a single frame
    pub max_fixed_steps: u32,
    /// World gravity
    pub gravity: [f32; 2],
}

impl PhysicsConfig {
    /// Gravity as a vector
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity[0], self.gravity[1])
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: FixedTimestep::DEFAULT_STEP,
            max_fixed_steps: 5,
            gravity: [0.0, 0.0],
        }
    }
}
