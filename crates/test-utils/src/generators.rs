//! Test data generators for points and extents.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. Nothing here is random: the
//! "scattered" generators use a fixed linear congruential sequence so a
//! failing case always reproduces.

/// Creates a regular `n x n` grid of points spanning an extent.
///
/// Points are emitted row by row starting at the upper-left corner, with the
/// step sign following the extent's orientation.
///
/// # Example
///
/// ```
/// use test_utils::create_point_grid;
///
/// let points = create_point_grid((0.0, 10.0, 10.0, 0.0), 3);
/// assert_eq!(points.len(), 9);
/// assert_eq!(points[0], (0.0, 10.0));
/// assert_eq!(points[8], (10.0, 0.0));
/// ```
pub fn create_point_grid(extent: (f64, f64, f64, f64), n: usize) -> Vec<(f64, f64)> {
    let (ulx, uly, lrx, lry) = extent;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(ulx, uly)];
    }

    let dx = (lrx - ulx) / (n - 1) as f64;
    let dy = (lry - uly) / (n - 1) as f64;

    let mut points = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            points.push((ulx + col as f64 * dx, uly + row as f64 * dy));
        }
    }
    points
}

/// Deterministic pseudo-random sequence in `[0, 1)`.
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_in(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// Creates `count` extents scattered over the given bounds.
///
/// Orientation alternates between north-up and south-up so that join tests
/// see both conventions. None of the generated extents is the all-zero
/// sentinel.
pub fn create_scattered_extents(
    seed: u64,
    count: usize,
    bounds: (f64, f64, f64, f64),
) -> Vec<(f64, f64, f64, f64)> {
    let (min_x, min_y, max_x, max_y) = bounds;
    let mut rng = Lcg(seed);
    let mut extents = Vec::with_capacity(count);

    for i in 0..count {
        let x0 = rng.next_in(min_x, max_x);
        let x1 = rng.next_in(min_x, max_x);
        let y0 = rng.next_in(min_y, max_y);
        let y1 = rng.next_in(min_y, max_y);

        let (left, right) = (x0.min(x1), x0.max(x1) + 1.0);
        let (bottom, top) = (y0.min(y1), y0.max(y1) + 1.0);

        if i % 2 == 0 {
            extents.push((left, top, right, bottom));
        } else {
            extents.push((left, bottom, right, top));
        }
    }
    extents
}

/// Creates `count` geographic points inside the given lon/lat bounds.
pub fn create_scattered_points(
    seed: u64,
    count: usize,
    bounds: (f64, f64, f64, f64),
) -> Vec<(f64, f64)> {
    let (min_x, min_y, max_x, max_y) = bounds;
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| (rng.next_in(min_x, max_x), rng.next_in(min_y, max_y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_grid_respects_orientation() {
        let points = create_point_grid((0.0, 0.0, 4.0, 8.0), 3);
        assert_eq!(points[1], (2.0, 0.0));
        assert_eq!(points[3], (0.0, 4.0));
    }

    #[test]
    fn test_point_grid_small_sizes() {
        assert!(create_point_grid((0.0, 0.0, 1.0, 1.0), 0).is_empty());
        assert_eq!(create_point_grid((3.0, 4.0, 5.0, 6.0), 1), vec![(3.0, 4.0)]);
    }

    #[test]
    fn test_scattered_extents_are_reproducible() {
        let a = create_scattered_extents(7, 10, (-50.0, -50.0, 50.0, 50.0));
        let b = create_scattered_extents(7, 10, (-50.0, -50.0, 50.0, 50.0));
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        for (ulx, uly, lrx, lry) in a {
            assert!(ulx < lrx);
            assert_ne!(uly, lry);
        }
    }

    #[test]
    fn test_scattered_points_within_bounds() {
        for (x, y) in create_scattered_points(3, 50, (10.0, 40.0, 20.0, 50.0)) {
            assert!((10.0..20.0).contains(&x));
            assert!((40.0..50.0).contains(&y));
        }
    }
}
