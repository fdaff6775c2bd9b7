//! Coordinate transforms between spatial references.
//!
//! A [`CoordinateTransform`] is built once for a pair of references and then
//! applied to points, point sequences and extents in either direction. Pairs
//! that need no reprojection (the same reference, or two raster pixel/line
//! spaces) become identity transforms without ever touching the backend.

use std::fmt;

use geo_common::{Coordinate, Extent, GeoRefError, GeoRefResult};
use proj4rs::proj::Proj;
use tracing::{debug, trace};

use crate::spatial_reference::{self, ReferenceKind};

/// Which way to apply a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From `reference_in` to `reference_out`.
    Forward,
    /// From `reference_out` back to `reference_in`.
    Inverse,
}

/// One direction of a backend transform.
///
/// The backend works in radians for angular references; this wrapper speaks
/// degrees on both sides.
struct ProjPipeline {
    source: Proj,
    target: Proj,
    source_angular: bool,
    target_angular: bool,
}

impl ProjPipeline {
    fn new(source_def: &str, target_def: &str) -> Option<Self> {
        let source = Proj::from_proj_string(source_def).ok()?;
        let target = Proj::from_proj_string(target_def).ok()?;
        Some(Self {
            source_angular: source.is_latlong(),
            target_angular: target.is_latlong(),
            source,
            target,
        })
    }

    fn apply(&self, point: Coordinate) -> Option<Coordinate> {
        let (x, y) = if self.source_angular {
            (point.x.to_radians(), point.y.to_radians())
        } else {
            (point.x, point.y)
        };

        let mut p = (x, y, 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut p).ok()?;

        let out = if self.target_angular {
            Coordinate::new(p.0.to_degrees(), p.1.to_degrees())
        } else {
            Coordinate::new(p.0, p.1)
        };

        out.is_finite().then_some(out)
    }
}

enum Backend {
    Identity,
    Native {
        forward: ProjPipeline,
        inverse: ProjPipeline,
    },
}

/// A bidirectional mapping between two spatial references.
///
/// Owns its backend handles; dropping the transform releases them. The type
/// is deliberately not `Clone`.
pub struct CoordinateTransform {
    reference_in: String,
    reference_out: String,
    backend: Backend,
}

impl fmt::Debug for CoordinateTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateTransform")
            .field("reference_in", &self.reference_in)
            .field("reference_out", &self.reference_out)
            .field("identity", &self.is_identity())
            .finish_non_exhaustive()
    }
}

impl CoordinateTransform {
    /// Build a transform from `reference_in` to `reference_out`.
    ///
    /// Resolution order:
    /// 1. two pixel/line references → identity
    /// 2. either descriptor fails to parse → [`GeoRefError::ReferenceInvalid`]
    /// 3. identical text → identity
    /// 4. semantically the same reference → identity
    /// 5. backend forward and inverse transforms; if either cannot be built →
    ///    [`GeoRefError::TransformUnavailable`]
    pub fn create(reference_in: &str, reference_out: &str) -> GeoRefResult<Self> {
        let kind_in = spatial_reference::reference_kind(reference_in);
        let kind_out = spatial_reference::reference_kind(reference_out);

        if kind_in == ReferenceKind::PixelLine && kind_out == ReferenceKind::PixelLine {
            trace!("Both references are pixel/line, using identity transform");
            return Ok(Self::identity(reference_in, reference_out));
        }

        for (reference, kind) in [(reference_in, kind_in), (reference_out, kind_out)] {
            if kind == ReferenceKind::Invalid || reference.trim().is_empty() {
                debug!(reference = %reference, "Rejecting invalid spatial reference");
                return Err(GeoRefError::ReferenceInvalid(reference.to_string()));
            }
        }

        if reference_in == reference_out
            || spatial_reference::is_same_reference(reference_in, reference_out)
        {
            trace!("References are equivalent, using identity transform");
            return Ok(Self::identity(reference_in, reference_out));
        }

        let unavailable = || GeoRefError::TransformUnavailable {
            from: reference_in.to_string(),
            to: reference_out.to_string(),
        };

        let (Some(def_in), Some(def_out)) = (
            spatial_reference::proj_definition(reference_in),
            spatial_reference::proj_definition(reference_out),
        ) else {
            debug!(
                from = %reference_in,
                to = %reference_out,
                "No backend definition for reference"
            );
            return Err(unavailable());
        };

        let (Some(forward), Some(inverse)) = (
            ProjPipeline::new(&def_in, &def_out),
            ProjPipeline::new(&def_out, &def_in),
        ) else {
            debug!(from = %def_in, to = %def_out, "Backend rejected transform definition");
            return Err(unavailable());
        };

        Ok(Self {
            reference_in: reference_in.to_string(),
            reference_out: reference_out.to_string(),
            backend: Backend::Native { forward, inverse },
        })
    }

    /// Build a transform from a (projected) reference to the geographic
    /// reference it is based on.
    pub fn create_to_geographic(reference: &str) -> GeoRefResult<Self> {
        let geographic = spatial_reference::geographic_reference(reference);
        if geographic.is_empty() {
            return Err(GeoRefError::ReferenceInvalid(reference.to_string()));
        }
        Self::create(reference, &geographic)
    }

    fn identity(reference_in: &str, reference_out: &str) -> Self {
        Self {
            reference_in: reference_in.to_string(),
            reference_out: reference_out.to_string(),
            backend: Backend::Identity,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.backend, Backend::Identity)
    }

    pub fn reference_in(&self) -> &str {
        &self.reference_in
    }

    pub fn reference_out(&self) -> &str {
        &self.reference_out
    }

    /// Transform one point, reporting out-of-domain points as errors.
    pub fn try_transform_point(
        &self,
        point: Coordinate,
        direction: Direction,
    ) -> GeoRefResult<Coordinate> {
        match &self.backend {
            Backend::Identity => Ok(point),
            Backend::Native { forward, inverse } => {
                let pipeline = match direction {
                    Direction::Forward => forward,
                    Direction::Inverse => inverse,
                };
                pipeline.apply(point).ok_or(GeoRefError::PointOutOfDomain {
                    x: point.x,
                    y: point.y,
                })
            }
        }
    }

    /// Transform one point; `None` when it lies outside the transform domain.
    pub fn transform_point(&self, point: Coordinate, direction: Direction) -> Option<Coordinate> {
        self.try_transform_point(point, direction).ok()
    }

    /// Transform points in place and return how many succeeded.
    ///
    /// Points that fail are left as they were; compare the count with the
    /// slice length to detect partial failure.
    pub fn transform_points(&self, points: &mut [Coordinate], direction: Direction) -> usize {
        if self.is_identity() {
            return points.len();
        }

        let mut succeeded = 0;
        for point in points.iter_mut() {
            if let Some(transformed) = self.transform_point(*point, direction) {
                *point = transformed;
                succeeded += 1;
            }
        }
        succeeded
    }

    /// Reproject an extent by sampling a regular grid over it.
    ///
    /// A `sample_grid_size x sample_grid_size` grid spanning the extent is
    /// transformed and the bounding box of every successfully transformed
    /// sample replaces the extent. An axis that runs backwards in the input
    /// (upper-left larger than lower-right) runs backwards in the output too.
    ///
    /// Returns the number of samples that transformed. Identity transforms
    /// return `sample_grid_size²` without touching the extent; grids smaller
    /// than two return 0. When no sample transforms the extent is left as it
    /// was and 0 is returned.
    pub fn transform_extent(
        &self,
        extent: &mut Extent,
        sample_grid_size: usize,
        direction: Direction,
    ) -> usize {
        if self.is_identity() {
            return sample_grid_size.saturating_mul(sample_grid_size);
        }
        if sample_grid_size < 2 {
            return 0;
        }

        let steps = (sample_grid_size - 1) as f64;
        let ul = extent.upper_left;
        let dx = (extent.lower_right.x - ul.x) / steps;
        let dy = (extent.lower_right.y - ul.y) / steps;

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        let mut succeeded = 0;

        for row in 0..sample_grid_size {
            for col in 0..sample_grid_size {
                let sample = Coordinate::new(ul.x + col as f64 * dx, ul.y + row as f64 * dy);
                if let Some(p) = self.transform_point(sample, direction) {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                    succeeded += 1;
                }
            }
        }

        if succeeded == 0 {
            debug!(extent = %extent, "No extent sample could be transformed");
            return 0;
        }

        *extent = Extent::from_bounds(min_x, min_y, max_x, max_y, dx >= 0.0, dy >= 0.0);
        succeeded
    }

    /// One-shot point transform between two descriptors.
    pub fn transform_point_between(
        reference_in: &str,
        reference_out: &str,
        point: Coordinate,
        direction: Direction,
    ) -> Option<Coordinate> {
        Self::create(reference_in, reference_out)
            .ok()?
            .transform_point(point, direction)
    }

    /// One-shot sequence transform; 0 when no transform can be built.
    pub fn transform_points_between(
        reference_in: &str,
        reference_out: &str,
        points: &mut [Coordinate],
        direction: Direction,
    ) -> usize {
        match Self::create(reference_in, reference_out) {
            Ok(transform) => transform.transform_points(points, direction),
            Err(_) => 0,
        }
    }

    /// One-shot extent transform; 0 when no transform can be built.
    pub fn transform_extent_between(
        reference_in: &str,
        reference_out: &str,
        extent: &mut Extent,
        sample_grid_size: usize,
        direction: Direction,
    ) -> usize {
        match Self::create(reference_in, reference_out) {
            Ok(transform) => transform.transform_extent(extent, sample_grid_size, direction),
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = r#"LOCAL_CS["Pixel-Line"]"#;

    #[test]
    fn test_pixel_line_pair_is_identity() {
        let t = CoordinateTransform::create(PIXEL, "").unwrap();
        assert!(t.is_identity());
        assert_eq!(t.reference_in(), PIXEL);
    }

    #[test]
    fn test_identity_extent_reports_full_grid() {
        let t = CoordinateTransform::create(PIXEL, PIXEL).unwrap();
        let mut extent = Extent::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(t.transform_extent(&mut extent, 5, Direction::Forward), 25);
        assert_eq!(t.transform_extent(&mut extent, 1, Direction::Forward), 1);
        assert_eq!(extent, Extent::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_empty_against_real_reference_is_invalid() {
        let geo = r#"GEOGCS["g",DATUM["d",SPHEROID["s",6378137,298.257223563]]]"#;
        let err = CoordinateTransform::create("", geo).unwrap_err();
        assert!(matches!(err, GeoRefError::ReferenceInvalid(_)));
    }

    #[test]
    fn test_debug_does_not_expose_backend() {
        let t = CoordinateTransform::create(PIXEL, PIXEL).unwrap();
        let text = format!("{:?}", t);
        assert!(text.contains("identity: true"));
    }
}
