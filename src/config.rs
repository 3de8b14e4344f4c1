//! Configuration of the input core
//!
//! The configuration is read from a TOML document:
//!
//! ```toml
//! meta_key = "logo"
//!
//! [[device]]
//! name = "Wacom Intuos S Pen"
//! mapped_output = "DP-1"
//!
//! [[device]]
//! name = "AT Translated Set 2 keyboard"
//! meta_key = "alt"
//!
//! [[cursor]]
//! seat = "seat0"
//! theme = "Adwaita"
//! default_image = "default"
//!
//! [gesture]
//! edge_margin = 24.0
//! left = "switch_workspace prev"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::input::{keyboard::MetaKey, pointer::CursorIcon};

/// Errors of the configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read the configuration file")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid TOML or does not match the expected layout
    #[error("Failed to deserialize the configuration")]
    Parse(#[from] toml::de::Error),
    /// A cursor image is not part of the cursor naming specification
    #[error("Unknown cursor image {0:?}")]
    UnknownCursorIcon(String),
}

/// Configuration of the input core
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Meta modifier of keyboards without a device section naming one
    pub meta_key: MetaKey,
    /// Per-device settings, matched by device name
    pub device: Vec<DeviceConfig>,
    /// Per-seat cursor settings, matched by seat name
    pub cursor: Vec<CursorConfig>,
    /// Edge swipe gestures
    pub gesture: GestureConfig,
}

/// Settings of an input device
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceConfig {
    /// Name of the device, as reported by the backend
    pub name: String,
    /// Name of the output absolute motion of the device maps to
    #[serde(default)]
    pub mapped_output: Option<String>,
    /// Meta modifier, for keyboards
    #[serde(default)]
    pub meta_key: Option<MetaKey>,
}

/// Cursor settings of a seat
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CursorConfig {
    /// Name of the seat
    pub seat: String,
    /// Name of the cursor theme
    #[serde(default)]
    pub theme: Option<String>,
    /// Size of the cursor images
    #[serde(default = "default_cursor_size")]
    pub size: u32,
    /// Name of the image shown when no client sets one
    #[serde(default)]
    pub default_image: Option<String>,
    /// Name of the output the cursor is restricted to
    #[serde(default)]
    pub mapped_output: Option<String>,
}

fn default_cursor_size() -> u32 {
    24
}

impl CursorConfig {
    /// Default cursor image of the seat
    pub fn default_icon(&self) -> Result<CursorIcon, ConfigError> {
        match &self.default_image {
            Some(name) => name
                .parse()
                .map_err(|_| ConfigError::UnknownCursorIcon(name.clone())),
            None => Ok(CursorIcon::Default),
        }
    }
}

/// Settings of the edge swipe gestures of touchscreens
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distance from an output edge a touch has to start within
    pub edge_margin: f64,
    /// Distance a swipe has to travel away from its edge
    ///
    /// On small outputs half of the output extent is enough.
    pub min_travel: f64,
    /// Command run by a swipe from the top edge
    pub top: String,
    /// Command run by a swipe from the bottom edge
    pub bottom: String,
    /// Command run by a swipe from the left edge
    pub left: String,
    /// Command run by a swipe from the right edge
    pub right: String,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            edge_margin: 24.0,
            min_travel: 100.0,
            top: "exec killall cloth-bar || cloth-bar".into(),
            bottom: "exec killall cloth-kbd || cloth-kbd".into(),
            left: "switch_workspace prev".into(),
            right: "switch_workspace next".into(),
        }
    }
}

impl Config {
    /// Parse a configuration from a TOML document
    pub fn from_toml_str(document: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(document)?;
        for cursor in &config.cursor {
            cursor.default_icon()?;
        }
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Config::from_toml_str(&document)
    }

    /// Settings of a device, by device name
    pub fn get_device(&self, name: &str) -> Option<&DeviceConfig> {
        self.device.iter().find(|device| device.name == name)
    }

    /// Cursor settings of a seat, by seat name
    pub fn get_cursor(&self, seat: &str) -> Option<&CursorConfig> {
        self.cursor.iter().find(|cursor| cursor.seat == seat)
    }

    /// Meta modifier of a keyboard
    pub fn meta_key(&self, device_name: &str) -> MetaKey {
        self.get_device(device_name)
            .and_then(|device| device.meta_key)
            .unwrap_or(self.meta_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(Config::default(), Config::from_toml_str("").unwrap());
        assert_eq!("switch_workspace next", Config::default().gesture.right);
    }

    #[test]
    fn sections_are_matched_by_name() {
        let config = Config::from_toml_str(
            r#"
            meta_key = "alt"

            [[device]]
            name = "touchscreen"
            mapped_output = "eDP-1"

            [[device]]
            name = "keyboard"
            meta_key = "logo"

            [[cursor]]
            seat = "seat0"
            theme = "Adwaita"
            default_image = "crosshair"

            [gesture]
            min_travel = 50.0
            "#,
        )
        .unwrap();

        assert_eq!(
            Some("eDP-1"),
            config
                .get_device("touchscreen")
                .and_then(|d| d.mapped_output.as_deref())
        );
        assert_eq!(MetaKey::Logo, config.meta_key("keyboard"));
        assert_eq!(MetaKey::Alt, config.meta_key("other keyboard"));

        let cursor = config.get_cursor("seat0").unwrap();
        assert_eq!(24, cursor.size);
        assert_eq!(CursorIcon::Crosshair, cursor.default_icon().unwrap());
        assert!(config.get_cursor("seat1").is_none());

        assert_eq!(50.0, config.gesture.min_travel);
        assert_eq!(24.0, config.gesture.edge_margin);
    }

    #[test]
    fn unknown_cursor_image_is_rejected() {
        let result = Config::from_toml_str(
            r#"
            [[cursor]]
            seat = "seat0"
            default_image = "definitely-not-a-cursor"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::UnknownCursorIcon(name)) if name == "definitely-not-a-cursor"));
    }

    #[test]
    fn invalid_document_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("meta_key = \"hyper\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load("/nonexistent/tablecloth/input.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
