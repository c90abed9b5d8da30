//! Growth maps: 2D density masks controlling where guide hairs may be placed.
//!
//! A growth map is decoded once into a grid of values in `[0, 1]`. Each value
//! is the HSV *value* of the source pixel (the brightest of its R, G and B
//! channels), so any non-black pixel allows growth and black forbids it.
//!
//! # UV convention
//!
//! Row 0 is the top of the image while `v = 0` is the bottom of UV space, so
//! lookups flip `v`:
//!
//! ```text
//! x = u * width
//! y = (1 - v) * height
//! ```
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use crate::error::GrowthMapError;
use glam::Vec2;
use std::fs;
use std::path::Path;

/// Largest UV component used for lookups; keeps `u = 1` inside the image.
pub const MAX_UV: f32 = 0.999;

/// PNG bundled into the binary: a scalp cap over the upper half of a UV
/// sphere with a wavy hairline.
pub const BUILTIN_GROWTH_MAP: &[u8] = include_bytes!("../assets/growth.png");

/// Decoded growth mask.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthMap {
    width: u32,
    height: u32,
    /// Row-major values, top row first.
    values: Vec<f32>,
}

impl GrowthMap {
    /// Load a growth map from an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the
    /// decoded image has no pixels.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let map = GrowthMap::from_file("assets/lower.png")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GrowthMapError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_memory(&bytes)
    }

    /// Decode a growth map from encoded image bytes.
    pub fn from_memory(bytes: &[u8]) -> Result<Self, GrowthMapError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// The map compiled into the crate, see [`BUILTIN_GROWTH_MAP`].
    pub fn builtin() -> Result<Self, GrowthMapError> {
        Self::from_memory(BUILTIN_GROWTH_MAP)
    }

    /// Create a growth map from raw RGBA data (4 bytes per pixel).
    ///
    /// Alpha is ignored.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // Left column grows hair, right column does not
    /// let data = vec![
    ///     255, 255, 255, 255,  0, 0, 0, 255,
    ///     255, 255, 255, 255,  0, 0, 0, 255,
    /// ];
    /// let map = GrowthMap::from_rgba(data, 2, 2)?;
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, GrowthMapError> {
        if width == 0 || height == 0 {
            return Err(GrowthMapError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(GrowthMapError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let values = data
            .chunks_exact(4)
            .map(|px| px[0].max(px[1]).max(px[2]) as f32 / 255.0)
            .collect();

        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// A map with the same value everywhere.
    ///
    /// `solid(w, h, 1.0)` grows everywhere; `solid(w, h, 0.0)` grows nothing.
    pub fn solid(width: u32, height: u32, value: f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            values: vec![value.clamp(0.0, 1.0); (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel addressed by `uv`, or `None` if it lands outside the image.
    ///
    /// Each UV component is first clamped above to [`MAX_UV`] so that
    /// `u = 1` or `v = 1` stays on the last column/row. Nothing clamps from
    /// below, so `v = 0` lands one row past the bottom and is rejected.
    pub fn texel_for_uv(&self, uv: Vec2) -> Option<(u32, u32)> {
        if !uv.is_finite() {
            return None;
        }
        let u = uv.x.min(MAX_UV);
        let v = uv.y.min(MAX_UV);

        let x = (u * self.width as f32).floor();
        let y = ((1.0 - v) * self.height as f32).floor();

        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((x, y))
    }

    /// Value at texel `(x, y)`; zero outside the image.
    pub fn value(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.values[(y * self.width + x) as usize]
    }

    /// Growth value at `uv`; zero when the lookup falls outside the image.
    pub fn density_at(&self, uv: Vec2) -> f32 {
        self.texel_for_uv(uv)
            .map(|(x, y)| self.value(x, y))
            .unwrap_or(0.0)
    }

    /// Whether hair may grow at `uv`.
    #[inline]
    pub fn allows(&self, uv: Vec2) -> bool {
        self.density_at(uv) > 0.0
    }
}
