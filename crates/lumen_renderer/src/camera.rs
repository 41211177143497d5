//! Camera: per-pixel ray generation, scene-wide nearest hit and shading.

use std::sync::Arc;
use std::time::Instant;

use lumen_core::RenderSettings;
use lumen_math::{Ray, Vec3};

use crate::renderer::{brightness, color_to_rgba, ImageBuffer, PixelSink};
use crate::Model;

/// Colour of pixels whose ray hits nothing.
pub const BACKGROUND: Vec3 = Vec3::new(0.02, 0.02, 0.04);

/// Fixed direction the flat shading is measured against.
pub const LIGHT_DIRECTION: Vec3 = Vec3::X;

/// Nearest hit across every model in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Index of the model in insertion order
    pub model: usize,
    /// Index into that model's triangle arena
    pub triangle: usize,
    pub t: f32,
}

/// Pinhole camera looking down +Z from its position.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    width: u32,
    height: u32,
    fov_degrees: f32,
    background: Vec3,
    models: Vec<Arc<Model>>,

    // Cached projection values
    half_width: f32,
    half_height: f32,
    aspect_ratio: f32,
    /// Distance to the projection plane; fixes the horizontal FOV
    focal_length: f32,
}

impl Camera {
    /// Create a camera rendering `width` x `height` pixels with the given
    /// horizontal field of view.
    pub fn new(position: Vec3, width: u32, height: u32, fov_degrees: f32) -> Self {
        // Integer halves, as pixel centres are not offset
        let half_width = (width / 2).max(1) as f32;
        let half_height = (height / 2).max(1) as f32;

        Self {
            position,
            width,
            height,
            fov_degrees,
            background: BACKGROUND,
            models: Vec::new(),
            half_width,
            half_height,
            aspect_ratio: width as f32 / height.max(1) as f32,
            focal_length: 1.0 / (fov_degrees.to_radians() / 2.0).tan(),
        }
    }

    /// Camera described by validated settings, with no models yet.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(
            settings.camera_position(),
            settings.width,
            settings.height,
            settings.fov_degrees,
        )
        .with_background(settings.background())
    }

    /// Set background color.
    pub fn with_background(mut self, color: Vec3) -> Self {
        self.background = color;
        self
    }

    /// Add a model to the scene. Models are queried in insertion order.
    pub fn insert_model(&mut self, model: Arc<Model>) {
        self.models.push(model);
    }

    pub fn models(&self) -> &[Arc<Model>] {
        &self.models
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn background(&self) -> Vec3 {
        self.background
    }

    /// Unnormalized view-space direction through pixel (px, py).
    pub fn view_direction(&self, px: u32, py: u32) -> Vec3 {
        Vec3::new(
            (px as f32 - self.half_width) / self.half_width * self.aspect_ratio,
            (py as f32 - self.half_height) / self.half_height,
            self.focal_length,
        )
    }

    /// Primary ray for pixel (px, py).
    pub fn emit_ray(&self, px: u32, py: u32) -> Ray {
        Ray::new(self.position, self.view_direction(px, py))
    }

    /// Nearest hit across all models; earlier models win exact ties.
    pub fn trace(&self, ray: &Ray) -> Option<SceneHit> {
        let mut nearest: Option<SceneHit> = None;

        for (index, model) in self.models.iter().enumerate() {
            if let Some(hit) = model.intersect(ray) {
                if nearest.map_or(true, |n| hit.t < n.t) {
                    nearest = Some(SceneHit {
                        model: index,
                        triangle: hit.triangle,
                        t: hit.t,
                    });
                }
            }
        }
        nearest
    }

    /// Linear colour seen along `ray`.
    pub fn shade(&self, ray: &Ray) -> Vec3 {
        let Some(hit) = self.trace(ray) else {
            return self.background;
        };

        let model = &self.models[hit.model];
        match model
            .triangle(hit.triangle)
            .and_then(|triangle| model.normal(triangle.normal_index()))
        {
            Ok(normal) => model.colour() * brightness(normal, LIGHT_DIRECTION),
            Err(e) => {
                log::warn!("Shading failed for model {}: {}", hit.model, e);
                self.background
            }
        }
    }

    /// Render every pixel into `sink`, row-major, top row first.
    pub fn render<S: PixelSink>(&self, sink: &mut S) {
        let start = Instant::now();
        log::debug!(
            "Rendering {}x{} with {} models",
            self.width,
            self.height,
            self.models.len()
        );

        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.shade(&self.emit_ray(x, y));
                sink.set_pixel(x, y, color_to_rgba(color));
            }
            sink.row_complete(y);

            let rows_done = y + 1;
            let elapsed = start.elapsed().as_secs_f32();
            let remaining = elapsed / rows_done as f32 * (self.height - rows_done) as f32;
            log::debug!(
                "Row {}/{} done, ~{:.1}s remaining",
                rows_done,
                self.height,
                remaining
            );
        }

        log::info!(
            "Rendered {}x{} in {:.2}s",
            self.width,
            self.height,
            start.elapsed().as_secs_f32()
        );
    }

    /// Render into a new image buffer.
    pub fn render_image(&self) -> ImageBuffer {
        let mut image = ImageBuffer::new(self.width, self.height);
        self.render(&mut image);
        image
    }
}
