use std::fs;
use serde::Deserialize;

/// Window settings from the `[window]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Render settings from the `[render]` table.
///
/// `frame_limit` of 0 means uncapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f64; 3],
    pub vsync: bool,
    pub frame_limit: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.2, 0.3],
            vsync: true,
            frame_limit: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn new(config_path: &str) -> Result<Self, String> {
        let toml_str = fs::read_to_string(config_path)
            .map_err(|e| format!("Could not find/read config file: {}", e))?;
        Self::from_str(&toml_str)
    }

    /// Parses a TOML document into a `Config`.
    ///
    /// Every field is optional and falls back to its default, but a field
    /// that is present and malformed is an error. A zero window dimension
    /// and an out-of-range clear color channel are rejected as well.
    pub fn from_str(toml_str: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| format!("Could not parse TOML: {}", e))?;

        if config.window.width == 0 || config.window.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                config.window.width, config.window.height
            ));
        }
        for channel in config.render.clear_color {
            if !(0.0..=1.0).contains(&channel) {
                return Err(format!("Clear color channel out of range: {}", channel));
            }
        }

        Ok(config)
    }

    /// The clear color as a `wgpu::Color` with full alpha.
    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.render.clear_color[0],
            g: self.render.clear_color[1],
            b: self.render.clear_color[2],
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_str("");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.window.title, "wgpu_triangle");
        assert_eq!(config.render.clear_color, [0.1, 0.2, 0.3]);
        assert!(config.render.vsync);
        assert_eq!(config.render.frame_limit, 0);
    }

    #[test]
    fn test_window_partial() {
        let config = Config::from_str("[window]\nwidth = 1200");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 480);
    }

    #[test]
    fn test_window_full() {
        let config = Config::from_str("[window]\nwidth = 1200\nheight = 800\ntitle = \"demo\"");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "demo");
    }

    #[test]
    fn test_window_zero_width() {
        let config = Config::from_str("[window]\nwidth = 0\nheight = 800");
        assert!(config.is_err());
    }

    #[test]
    fn test_window_wrong_type() {
        let config = Config::from_str("[window]\nwidth = \"wide\"");
        assert!(config.is_err());
    }

    #[test]
    fn test_render_clear_color() {
        let config = Config::from_str("[render]\nclear_color = [0.0, 1.0, 0.0]");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert_eq!(config.render.clear_color, [0.0, 1.0, 0.0]);

        let color = config.clear_color();
        assert_eq!(color.r, 0.0);
        assert_eq!(color.g, 1.0);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_render_clear_color_out_of_range() {
        let config = Config::from_str("[render]\nclear_color = [0.0, 1.5, 0.0]");
        assert!(config.is_err());
    }

    #[test]
    fn test_render_vsync_and_frame_limit() {
        let config = Config::from_str("[render]\nvsync = false\nframe_limit = 60");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert!(!config.render.vsync);
        assert_eq!(config.render.frame_limit, 60);
    }

    #[test]
    fn test_unparsable_document() {
        let config = Config::from_str("[window\nwidth = 800");
        assert!(config.is_err());
    }

    #[test]
    fn test_missing_file() {
        let config = Config::new("does/not/exist.toml");
        assert!(config.is_err());
    }
}
