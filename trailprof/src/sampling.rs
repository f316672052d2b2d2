//! Index-based down-sampling of coordinate sequences.
//!
//! The sampler bounds how many points are sent to an elevation provider,
//! however detailed the input path is. It keeps every `stride`-th vertex,
//! where `stride = max(1, len / max_points)`. Spacing follows the vertex
//! spacing of the input, not distance along it.
//!
//! The final vertex is only kept when `(len - 1)` is a multiple of the
//! stride, so a profile may stop short of the true end of the path.

use crate::geodesy::Coordinate;

/// Default upper bound on the number of points queried per profile.
pub const DEFAULT_MAX_POINTS: usize = 50;

/// Stride used to decimate a sequence of `len` coordinates.
///
/// A `max_points` of zero is treated as one.
///
/// # Example
///
/// ```
/// use trailprof::sampling::stride;
///
/// assert_eq!(stride(60, 50), 1);
/// assert_eq!(stride(500, 50), 10);
/// ```
pub fn stride(len: usize, max_points: usize) -> usize {
    (len / max_points.max(1)).max(1)
}

/// Keep the coordinates whose index is a multiple of [`stride`].
///
/// Order is preserved and index 0 is always kept for non-empty input. The
/// output has `ceil(len / stride)` elements.
pub fn sample(coords: &[Coordinate], max_points: usize) -> Vec<Coordinate> {
    let step = stride(coords.len(), max_points);
    coords.iter().step_by(step).copied().collect()
}
