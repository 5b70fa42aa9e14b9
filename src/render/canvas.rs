//! Flat RGB pixel buffer.

use image::RgbImage;

use crate::types::Colour;

use super::NUM_CHANNELS;

/// An RGB pixel buffer, 3 bytes per pixel, rows packed with no padding.
///
/// All drawing clips to the buffer bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a black canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * NUM_CHANNELS],
        }
    }

    pub fn filled(width: usize, height: usize, colour: Colour) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.fill_rect(0, 0, width, height, colour);
        canvas
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Colour at (x, y), or `None` outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Colour::rgb(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, colour: Colour) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + NUM_CHANNELS].copy_from_slice(&colour.to_rgb());
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, colour: Colour) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        let rgb = colour.to_rgb();
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = self.offset(x_end, row);
            for px in self.data[start..end].chunks_exact_mut(NUM_CHANNELS) {
                px.copy_from_slice(&rgb);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy into an `image` buffer for callers that embed or encode it.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * NUM_CHANNELS
    }
}
