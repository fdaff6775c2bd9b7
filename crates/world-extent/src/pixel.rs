//! Affine pixel/world mapping.

use geo_common::Extent;
use nalgebra::{Matrix3, Vector3};

/// 2D affine map between viewport pixels and world coordinates.
///
/// Pixel `(0, 0)` is the upper-left corner of the mapped extent and
/// `(width, height)` its lower-right corner. Pixel size is signed, so the
/// extent's axis orientation carries through. A rotation (degrees,
/// counter-clockwise) turns the pixel grid about the tie point.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelModel {
    pixel_to_world: Matrix3<f64>,
    world_to_pixel: Matrix3<f64>,
}

impl PixelModel {
    /// Build the model for `extent` shown in a `width x height` viewport.
    ///
    /// Returns `None` when the map would be singular: an empty viewport or a
    /// zero-sized extent.
    pub fn new(extent: &Extent, width: u32, height: u32, rotation_degrees: f64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let ul = extent.upper_left;
        let pixel_width = (extent.lower_right.x - ul.x) / f64::from(width);
        let pixel_height = (extent.lower_right.y - ul.y) / f64::from(height);

        let translation = Matrix3::new(
            1.0, 0.0, ul.x, //
            0.0, 1.0, ul.y, //
            0.0, 0.0, 1.0,
        );
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        let rotation = Matrix3::new(
            cos, -sin, 0.0, //
            sin, cos, 0.0, //
            0.0, 0.0, 1.0,
        );
        let scale = Matrix3::new(
            pixel_width, 0.0, 0.0, //
            0.0, pixel_height, 0.0, //
            0.0, 0.0, 1.0,
        );

        let pixel_to_world = translation * rotation * scale;
        let world_to_pixel = pixel_to_world.try_inverse()?;

        if !pixel_to_world.iter().chain(world_to_pixel.iter()).all(|v| v.is_finite()) {
            return None;
        }

        Some(Self {
            pixel_to_world,
            world_to_pixel,
        })
    }

    pub fn pixel_to_world(&self, px: f64, py: f64) -> (f64, f64) {
        apply(&self.pixel_to_world, px, py)
    }

    pub fn world_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        apply(&self.world_to_pixel, x, y)
    }

    /// World size of one pixel along each pixel axis (ignoring rotation sign).
    pub fn pixel_size(&self) -> (f64, f64) {
        let m = &self.pixel_to_world;
        (
            m[(0, 0)].hypot(m[(1, 0)]),
            m[(0, 1)].hypot(m[(1, 1)]),
        )
    }
}

fn apply(m: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let v = m * Vector3::new(x, y, 1.0);
    (v.x, v.y)
}
