//! Screen texture slot
//!
//! The screen panel always has something to sample: a 1×1 placeholder until
//! a real image is swapped in. Loading never blocks a frame; whoever decodes
//! the image calls [`TextureSlot::swap_in`] when it is ready.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::Result;

pub const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 255, 255];

#[derive(Debug, Clone)]
pub struct TextureSlot {
    image: RgbaImage,
    placeholder: bool,
    generation: u64,
}

impl Default for TextureSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSlot {
    pub fn new() -> Self {
        Self {
            image: RgbaImage::from_pixel(1, 1, Rgba(PLACEHOLDER_RGBA)),
            placeholder: true,
            generation: 0,
        }
    }

    pub fn swap_in(&mut self, image: RgbaImage) {
        if image.width() == 0 || image.height() == 0 {
            log::warn!("Ignoring empty texture image");
            return;
        }
        log::info!("Screen texture swapped in ({}×{})", image.width(), image.height());
        self.image = image;
        self.placeholder = false;
        self.generation += 1;
    }

    /// Decodes an image file and swaps it in
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = image::open(path.as_ref())?.to_rgba8();
        self.swap_in(image);
        Ok(())
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Bumped on every swap so GPU copies know when to re-upload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Nearest-neighbour lookup, clamped to the edge. `v = 0` is the bottom
    /// row of the image.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let (w, h) = self.image.dimensions();
        let u = uv[0].clamp(0.0, 1.0);
        let v = uv[1].clamp(0.0, 1.0);
        let x = ((u * w as f32) as u32).min(w - 1);
        let y = (((1.0 - v) * h as f32) as u32).min(h - 1);
        let p = self.image.get_pixel(x, y).0;
        [
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
            p[3] as f32 / 255.0,
        ]
    }
}
