//! Error types for geocover operations.

use thiserror::Error;

/// Convenience alias for `std::result::Result` with [`GeocoverError`].
pub type Result<T> = std::result::Result<T, GeocoverError>;

/// All failure modes surfaced by this crate.
///
/// Coverage computation is a pure computational path: every core variant is
/// a synchronous validation failure raised at the point of the bad input,
/// never retried. The `Io` and `Cache` variants belong to the geometry-cache
/// boundary in [`crate::cache`].
#[derive(Debug, Error)]
pub enum GeocoverError {
    /// Longitude or latitude outside the valid geographic range, or not finite.
    #[error("invalid coordinate lon={lon}, lat={lat} (expected lon in [-180, 180], lat in [-90, 90])")]
    InvalidCoordinate {
        /// Offending longitude in degrees.
        lon: f64,
        /// Offending latitude in degrees.
        lat: f64,
    },

    /// Geohash precision outside the supported `1..=12` range.
    #[error("invalid geohash precision {0} (expected 1..=12)")]
    InvalidPrecision(usize),

    /// A geohash string that is empty or contains non-alphabet characters.
    #[error("invalid geohash {0:?}")]
    InvalidGeohash(String),

    /// Degenerate or non-polygonal input geometry.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Adaptive refinement bounds that do not satisfy `1 <= min <= max <= 12`.
    #[error("invalid level range {min}..={max} (expected 1 <= min_level <= max_level <= 12)")]
    InvalidLevelRange {
        /// Requested minimum refinement level.
        min: usize,
        /// Requested maximum refinement level.
        max: usize,
    },

    /// Coverage threshold outside `[0.0, 1.0]`, or not finite.
    #[error("invalid coverage threshold {0} (expected a value in [0.0, 1.0])")]
    InvalidThreshold(f64),

    /// Filesystem failure while reading or writing a cache entry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache entry that exists on disk but cannot be parsed back into geometry.
    #[error("geometry cache error: {0}")]
    Cache(String),
}
