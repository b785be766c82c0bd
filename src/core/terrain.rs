//! Terrain surfaces synthesized from 2D height fields.
//!
//! A height field is any grid of RGB samples; the height of a sample is the
//! plain mean of its three channels. The synthesized mesh places one vertex
//! per sample on an integer grid centered on the origin.

use std::path::Path;

use glam::Vec3;
use image::{Rgb32FImage, RgbImage};
use log::debug;

use super::mesh::TriMesh;
use crate::error::Result;
use crate::utils::logging::ScopedTimer;

/// Read access to a 2D grid of color samples.
pub trait HeightField {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// RGB channels of the sample at `(x, y)`, nominally in `[0, 1]`.
    fn pixel(&self, x: u32, y: u32) -> [f32; 3];
}

impl HeightField for Rgb32FImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.get_pixel(x, y).0
    }
}

impl HeightField for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.get_pixel(x, y).0.map(|channel| f32::from(channel) / 255.0)
    }
}

/// Loads an image file as a floating point height field.
pub fn load_height_field(path: impl AsRef<Path>) -> Result<Rgb32FImage> {
    let path = path.as_ref();
    let field = image::open(path)?.to_rgb32f();
    debug!(
        "loaded height field {}x{} from {}",
        field.width(),
        field.height(),
        path.display()
    );
    Ok(field)
}

/// Unweighted mean of the three channels.
pub fn luminance(rgb: [f32; 3]) -> f32 {
    (rgb[0] + rgb[1] + rgb[2]) / 3.0
}

/// Builds the renderable terrain surface for `field`.
///
/// Every sample contributes one vertex and six indices. On the last column
/// (row) the neighbor offset drops to zero, so seam cells emit degenerate
/// triangles. Normals are computed for interior cells from the first triangle
/// of the cell; the last row and column keep a zero normal.
pub fn synthesize_terrain(field: &impl HeightField) -> TriMesh {
    let _timer = ScopedTimer::new("terrain::synthesize");
    let width = field.width();
    let height = field.height();
    let half_width = width as f32 * 0.5;
    let half_height = height as f32 * 0.5;
    let samples = width as usize * height as usize;

    let mut positions = Vec::with_capacity(samples);
    let mut normals = vec![Vec3::ZERO; samples];
    let mut indices = Vec::with_capacity(samples * 6);
    let index = |x: u32, y: u32| x + width * y;

    for y in 0..height {
        for x in 0..width {
            positions.push(Vec3::new(
                x as f32 - half_width,
                luminance(field.pixel(x, y)),
                y as f32 - half_height,
            ));

            let dx = u32::from(x + 1 < width);
            let dy = u32::from(y + 1 < height);
            indices.extend_from_slice(&[
                index(x, y),
                index(x + dx, y),
                index(x + dx, y + dy),
                index(x, y + dy),
                index(x + dx, y + dy),
                index(x, y),
            ]);
        }
    }

    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let first = index(x, y) as usize * 6;
            let v0 = positions[indices[first] as usize];
            let v1 = positions[indices[first + 1] as usize];
            let v2 = positions[indices[first + 2] as usize];
            normals[index(x, y) as usize] = (v1 - v0).cross(v1 - v2).normalize_or_zero();
        }
    }

    debug!(
        "synthesized {}x{} terrain: {} vertices, {} indices",
        width,
        height,
        positions.len(),
        indices.len()
    );
    TriMesh::new(positions, indices).with_normals(normals)
}
