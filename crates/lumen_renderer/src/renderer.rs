//! Pixel output: tone mapping, 8-bit conversion and the image buffer.

use std::path::Path;

use lumen_math::{Interval, Vec3};

/// Display gamma applied after tone mapping.
pub const GAMMA: f32 = 2.2;

/// Receives finished pixels from [`Camera::render`](crate::Camera::render).
///
/// Pixels arrive row-major, top row first.
pub trait PixelSink {
    fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]);

    /// Called once every pixel of row `y` has been delivered.
    fn row_complete(&mut self, _y: u32) {}
}

/// Compress an unbounded linear value into [0, 1) and gamma-correct it.
///
/// Negative input is treated as black.
#[inline]
pub fn tone_map(value: f32) -> f32 {
    let v = value.max(0.0);
    (v / (v + 1.0)).powf(1.0 / GAMMA)
}

/// Flat shading from a fixed light direction, cubed to sharpen the falloff.
#[inline]
pub fn brightness(normal: Vec3, light_direction: Vec3) -> f32 {
    Interval::UNIT
        .clamp(normal.dot(light_direction) / 2.0 + 0.5)
        .powi(3)
}

/// Convert a linear colour to tone-mapped 8-bit RGBA.
pub fn color_to_rgba(color: Vec3) -> [u8; 4] {
    let to_byte = |c: f32| (tone_map(c) * 256.0).min(255.0) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Row-major offset of pixel (x, y), widened to `usize` before multiplying.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels[pixel_index(self.width, x, y)] = rgba;
    }

    /// Flatten to RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Write the buffer as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl PixelSink for ImageBuffer {
    fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.set(x, y, rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_map() {
        assert_eq!(tone_map(0.0), 0.0);
        assert_eq!(tone_map(-3.0), 0.0);
        assert!((tone_map(1.0) - 0.5f32.powf(1.0 / 2.2)).abs() < 1e-6);

        // Monotonic and bounded below 1
        assert!(tone_map(10.0) > tone_map(1.0));
        assert!(tone_map(1.0e6) < 1.0);
    }

    #[test]
    fn test_brightness() {
        let light = Vec3::X;

        assert!((brightness(Vec3::X, light) - 1.0).abs() < 1e-6);
        assert!((brightness(Vec3::Z, light) - 0.125).abs() < 1e-6);
        assert_eq!(brightness(Vec3::NEG_X, light), 0.0);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Vec3::ZERO), [0, 0, 0, 255]);

        let rgba = color_to_rgba(Vec3::new(1.0, 0.0, 1.0e9));
        // 0.5^(1/2.2) * 256 = 186.9
        assert_eq!(rgba[0], 186);
        assert_eq!(rgba[1], 0);
        assert_eq!(rgba[2], 255);
        assert_eq!(rgba[3], 255);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_pixel_index_does_not_overflow_u32() {
        assert_eq!(pixel_index(4, 3, 2), 11);
        // 70000 * 70000 exceeds u32::MAX
        assert_eq!(pixel_index(70_000, 1, 70_000), 4_900_000_001);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.get(2, 1), [0, 0, 0, 255]);

        image.set_pixel(2, 1, [10, 20, 30, 255]);
        assert_eq!(image.get(2, 1), [10, 20, 30, 255]);

        let bytes = image.to_rgba();
        assert_eq!(bytes.len(), 3 * 2 * 4);
        assert_eq!(&bytes[20..24], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("lumen_renderer_{}.png", std::process::id()));
        let image = ImageBuffer::new(4, 4);

        image.save_png(&path).unwrap();
        assert!(path.exists());

        std::fs::remove_file(&path).ok();
    }
}
