//! Common types shared by the spatial reference, transform and world extent crates.

pub mod coord;
pub mod error;
pub mod extent;

pub use coord::Coordinate;
pub use error::{GeoRefError, GeoRefResult};
pub use extent::{Extent, ExtentParseError};
