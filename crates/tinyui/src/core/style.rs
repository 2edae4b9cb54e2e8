use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::{Error, Result};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Color4 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    #[serde(default)]
    pub a: u8,
}

impl Color4 {
    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The font a style asks the renderer for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// Font file name.
    pub name: String,
    /// Point size. Also used as the estimated glyph width for layout.
    pub size: i32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: "Arial.ttf".into(),
            size: 35,
        }
    }
}

/// Colors, margin and font used by the render walk.
///
/// Styles deserialize from JSON; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Foreground: button faces, boxes, progress fill.
    pub fg: Color4,
    /// Background: frame clear color and field interiors.
    pub bg: Color4,
    /// Text color.
    pub text_color: Color4,
    /// Border color for panels, frames and field outlines.
    pub border: Color4,
    /// Margin between a widget's edge and its content.
    pub margin: i32,
    /// Font.
    pub font: FontSpec,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Color4::new(255, 255, 255, 0),
            bg: Color4::new(0, 0, 0, 0),
            text_color: Color4::new(0, 0, 255, 0),
            border: Color4::new(200, 200, 200, 0),
            margin: 2,
            font: FontSpec::default(),
        }
    }
}

impl Style {
    /// Parse a style from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        let style: Self = serde_json::from_str(s)?;
        style.validate()?;
        Ok(style)
    }

    /// Load a style from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Reject values the renderer cannot use.
    fn validate(&self) -> Result<()> {
        if self.margin < 0 {
            return Err(Error::Config(format!("negative margin {}", self.margin)));
        }
        if self.font.size <= 0 {
            return Err(Error::Config(format!("bad font size {}", self.font.size)));
        }
        Ok(())
    }
}
