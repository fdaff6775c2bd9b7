//! Axis-aligned extents (subsets) and the join operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Coordinate;

/// An axis-aligned rectangle given by its upper-left and lower-right corners.
///
/// The corners keep the orientation of the data they describe. A north-up
/// geographic extent has `upper_left.y > lower_right.y`, while a pixel/line
/// extent usually has `upper_left.y < lower_right.y`. Nothing here forces
/// one convention; operations that combine extents preserve the orientation
/// of the left-hand operand.
///
/// The all-zero extent is the "no extent" sentinel (see [`Extent::EMPTY`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub upper_left: Coordinate,
    pub lower_right: Coordinate,
}

impl Extent {
    /// The degenerate sentinel meaning "uninitialized / no extent".
    pub const EMPTY: Extent = Extent {
        upper_left: Coordinate::new(0.0, 0.0),
        lower_right: Coordinate::new(0.0, 0.0),
    };

    /// Create a new extent from corner components.
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self {
            upper_left: Coordinate::new(ulx, uly),
            lower_right: Coordinate::new(lrx, lry),
        }
    }

    /// True for the all-zero sentinel.
    ///
    /// Only the exact sentinel counts. A zero-width extent somewhere else is
    /// a real (if thin) extent and takes part in joins.
    pub fn is_degenerate(&self) -> bool {
        self.upper_left.x == 0.0
            && self.upper_left.y == 0.0
            && self.lower_right.x == 0.0
            && self.lower_right.y == 0.0
    }

    /// `None` for the sentinel, the extent otherwise.
    pub fn non_degenerate(self) -> Option<Extent> {
        if self.is_degenerate() {
            None
        } else {
            Some(self)
        }
    }

    /// X grows from upper-left to lower-right.
    pub fn x_ascending(&self) -> bool {
        self.lower_right.x >= self.upper_left.x
    }

    /// Y grows from upper-left to lower-right (south-up / pixel-line order).
    pub fn y_ascending(&self) -> bool {
        self.lower_right.y >= self.upper_left.y
    }

    pub fn min_x(&self) -> f64 {
        self.upper_left.x.min(self.lower_right.x)
    }

    pub fn max_x(&self) -> f64 {
        self.upper_left.x.max(self.lower_right.x)
    }

    pub fn min_y(&self) -> f64 {
        self.upper_left.y.min(self.lower_right.y)
    }

    pub fn max_y(&self) -> f64 {
        self.upper_left.y.max(self.lower_right.y)
    }

    /// Width of the extent in coordinate units (always non-negative).
    pub fn width(&self) -> f64 {
        (self.lower_right.x - self.upper_left.x).abs()
    }

    /// Height of the extent in coordinate units (always non-negative).
    pub fn height(&self) -> f64 {
        (self.lower_right.y - self.upper_left.y).abs()
    }

    /// Check if a point lies inside the closed rectangle.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x() && x <= self.max_x() && y >= self.min_y() && y <= self.max_y()
    }

    /// Check if `other` lies entirely inside this extent.
    pub fn contains(&self, other: &Extent) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// Check if this extent overlaps another.
    pub fn intersects(&self, other: &Extent) -> bool {
        self.min_x() <= other.max_x()
            && self.max_x() >= other.min_x()
            && self.min_y() <= other.max_y()
            && self.max_y() >= other.min_y()
    }

    /// Smallest extent covering both `self` and `other`.
    ///
    /// Each operand is read with its own axis orientation, the covered
    /// rectangles are united, and the result is laid out with the orientation
    /// of `self`. The degenerate sentinel is the identity element on either
    /// side.
    pub fn join(&self, other: &Extent) -> Extent {
        if other.is_degenerate() {
            return *self;
        }
        if self.is_degenerate() {
            return *other;
        }

        let min_x = self.min_x().min(other.min_x());
        let max_x = self.max_x().max(other.max_x());
        let min_y = self.min_y().min(other.min_y());
        let max_y = self.max_y().max(other.max_y());

        Extent::from_bounds(min_x, min_y, max_x, max_y, self.x_ascending(), self.y_ascending())
    }

    /// Lay out min/max bounds as corners with the given axis orientation.
    pub fn from_bounds(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        x_ascending: bool,
        y_ascending: bool,
    ) -> Extent {
        let (ulx, lrx) = if x_ascending {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (uly, lry) = if y_ascending {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        Extent::new(ulx, uly, lrx, lry)
    }

    /// Center of the extent.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.upper_left.x + self.lower_right.x) / 2.0,
            (self.upper_left.y + self.lower_right.y) / 2.0,
        )
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.upper_left.x, self.upper_left.y, self.lower_right.x, self.lower_right.y
        )
    }
}

/// Parses "ulx,uly,lrx,lry".
impl FromStr for Extent {
    type Err = ExtentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(ExtentParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| ExtentParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Extent::new(values[0], values[1], values[2], values[3]))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtentParseError {
    #[error("Invalid extent format: {0}. Expected 'ulx,uly,lrx,lry'")]
    InvalidFormat(String),

    #[error("Invalid number in extent: {0}")]
    InvalidNumber(String),
}
