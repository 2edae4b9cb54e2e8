use std::collections::{HashMap, hash_map::Entry};

use slotmap::{SlotMap, new_key_type};

use crate::core::{
    error::Result,
    render::RenderBackend,
    style::FontSpec,
};

new_key_type! {
    /// Key for an image held in the context's image cache.
    pub struct ImageId;
}

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// File name the image was loaded from.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA pixel data.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Return the RGBA value at a pixel, if it is inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// A font handle as returned by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    /// Font file name.
    pub name: String,
    /// Point size.
    pub size: i32,
}

/// Images keyed by file name. Widgets hold `ImageId`s, never the images.
#[derive(Default)]
pub struct ImageCache {
    /// Loaded images.
    images: SlotMap<ImageId, Image>,
    /// File name to image lookup.
    by_name: HashMap<String, ImageId>,
}

impl ImageCache {
    /// Return the cached image for a file name, loading it through the
    /// renderer on first use.
    pub fn load(&mut self, be: &mut dyn RenderBackend, filename: &str) -> Result<ImageId> {
        if let Some(id) = self.by_name.get(filename) {
            return Ok(*id);
        }
        let image = be.load_image(filename)?;
        tracing::debug!(filename, w = image.width, h = image.height, "loaded image");
        let id = self.images.insert(image);
        self.by_name.insert(filename.to_string(), id);
        Ok(id)
    }

    /// Borrow a cached image.
    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id)
    }

    /// Look up an image by file name without loading it.
    pub fn find(&self, filename: &str) -> Option<ImageId> {
        self.by_name.get(filename).copied()
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop every image.
    pub fn clear(&mut self) {
        self.images.clear();
        self.by_name.clear();
    }
}

/// Fonts keyed by file name and size.
#[derive(Default)]
pub struct FontCache {
    /// Loaded fonts.
    fonts: HashMap<FontSpec, Font>,
}

impl FontCache {
    /// Return the cached font for a spec, loading it on first use.
    pub fn load(&mut self, be: &mut dyn RenderBackend, spec: &FontSpec) -> Result<&Font> {
        match self.fonts.entry(spec.clone()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let font = be.load_font(&spec.name, spec.size)?;
                tracing::debug!(name = %font.name, size = font.size, "loaded font");
                Ok(e.insert(font))
            }
        }
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every font.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}
