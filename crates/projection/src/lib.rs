//! Spatial reference queries and coordinate transforms.
//!
//! Descriptors are WKT text or authority ids (`EPSG:4326`). The
//! [`spatial_reference`] module answers questions about a single descriptor,
//! [`CoordinateTransform`] maps points and extents between two of them.
//! Reprojection itself is delegated to `proj4rs`.

pub mod proj_def;
pub mod spatial_reference;
pub mod transform;
pub mod wkt;

pub use spatial_reference::{BursaWolfParameters, ReferenceKind};
pub use transform::{CoordinateTransform, Direction};
pub use wkt::{WktError, WktNode, WktValue};
