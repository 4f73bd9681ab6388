//! Adaptive geohash coverage of polygon and multipolygon geometries.
//!
//! Given an arbitrary polygon in lon/lat degrees, produce a minimal,
//! level-stratified set of geohash tiles approximating its area: coarse
//! tiles where the polygon fully covers them, finer tiles only where the
//! boundary actually crosses.
//!
//! ```rust
//! use geo::polygon;
//! use geocover::{adaptive_geohash_coverage, geohashes_to_multipolygon};
//!
//! let area = polygon![
//!     (x: 4.2, y: 50.6),
//!     (x: 5.1, y: 50.6),
//!     (x: 5.1, y: 51.2),
//!     (x: 4.2, y: 51.2),
//!     (x: 4.2, y: 50.6),
//! ];
//!
//! let coverage = adaptive_geohash_coverage(area, 3, 5, 0.95)?;
//! for (level, tiles) in coverage.levels() {
//!     println!("level {}: {} tiles", level, tiles.len());
//! }
//!
//! // Resolve the tiles back into geometry for plotting or data requests.
//! let outline = geohashes_to_multipolygon(coverage.geohashes(), true)?;
//! assert!(!outline.0.is_empty());
//! # Ok::<(), geocover::GeocoverError>(())
//! ```

pub mod aoi;
pub mod assembler;
pub mod cache;
pub mod codec;
pub mod coverage;
pub mod error;
pub mod geometry;
pub mod spatial_index;
pub mod types;

pub use error::{GeocoverError, Result};

pub use coverage::{
    adaptive_geohash_coverage, adaptive_geohash_coverage_with_options, geohash_coverage,
    geohash_coverage_with_options,
};

pub use assembler::{geohashes_to_boxes, geohashes_to_multipolygon};

/// The 32 immediate children of a geohash cell, re-exported for direct use.
pub use codec::children as get_geohash_children;

pub use types::{CoverageMap, CoverageOptions, MAX_LEVEL, Tile};

pub use aoi::AreaOfInterest;

pub use cache::{CachedCountrySource, CountryGeometrySource, GeometryCache};

pub use spatial_index::PolygonIndex;

pub use geo::{MultiPolygon, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeocoverError, Result, adaptive_geohash_coverage, geohash_coverage};

    pub use crate::{geohashes_to_boxes, geohashes_to_multipolygon, get_geohash_children};

    pub use crate::{AreaOfInterest, CoverageMap, CoverageOptions, Tile};

    pub use geo::{MultiPolygon, Polygon, Rect};
}
