//! The coverage engine: single-level and adaptive geohash coverage.
//!
//! Both entry points map a polygonal geometry to a level-stratified set of
//! geohash tiles. The single-level form sweeps one precision across the
//! geometry's bounding box; the adaptive form refines partially covered
//! tiles into their 32 children until they are sufficiently covered or the
//! maximum level is reached.

use geo::{BoundingRect, MultiPolygon, Rect};
use log::{debug, trace};

use crate::codec;
use crate::error::{GeocoverError, Result};
use crate::geometry;
use crate::spatial_index::PolygonIndex;
use crate::types::{CoverageMap, CoverageOptions, MAX_LEVEL};

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(GeocoverError::InvalidThreshold(threshold));
    }
    Ok(())
}

fn validated_bounding_rect(geometry: &MultiPolygon<f64>) -> Result<Rect<f64>> {
    geometry::validate_multipolygon(geometry)?;
    geometry
        .bounding_rect()
        .ok_or_else(|| GeocoverError::InvalidPolygon("geometry has no bounding box".to_string()))
}

fn build_index(
    geometry: &MultiPolygon<f64>,
    candidate_count: usize,
    options: &CoverageOptions,
) -> Option<PolygonIndex> {
    if !options.use_index || candidate_count < options.index_min_candidates {
        return None;
    }
    let index = PolygonIndex::build(geometry);
    debug!(
        "built polygon index over {} parts for {} candidate tiles",
        index.len(),
        candidate_count
    );
    Some(index)
}

/// Cover a geometry with geohash tiles of a single level.
///
/// With `threshold == 0.0` every tile that overlaps the geometry at all is
/// accepted; with a positive threshold only tiles whose coverage ratio
/// reaches it (inclusive) are kept. No refinement happens: the result holds
/// exactly one level.
///
/// # Errors
///
/// `InvalidPolygon` for empty or degenerate geometry, `InvalidPrecision`
/// for a level outside `1..=12`, `InvalidThreshold` for a threshold outside
/// `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use geo::polygon;
/// use geocover::geohash_coverage;
///
/// let square = polygon![
///     (x: 0.1, y: 0.1),
///     (x: 0.9, y: 0.1),
///     (x: 0.9, y: 0.9),
///     (x: 0.1, y: 0.9),
///     (x: 0.1, y: 0.1),
/// ];
///
/// let coverage = geohash_coverage(square, 1, 0.0)?;
/// assert_eq!(coverage.tiles_at(1).unwrap().len(), 1);
/// assert!(coverage.tiles_at(1).unwrap().contains("s"));
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn geohash_coverage(
    geometry: impl Into<MultiPolygon<f64>>,
    level: usize,
    threshold: f64,
) -> Result<CoverageMap> {
    geohash_coverage_with_options(geometry, level, threshold, &CoverageOptions::default())
}

/// [`geohash_coverage`] with explicit engine options.
pub fn geohash_coverage_with_options(
    geometry: impl Into<MultiPolygon<f64>>,
    level: usize,
    threshold: f64,
    options: &CoverageOptions,
) -> Result<CoverageMap> {
    let geometry = geometry.into();
    validate_threshold(threshold)?;
    let bbox = validated_bounding_rect(&geometry)?;

    let candidates = codec::candidates_covering_bbox(&bbox, level)?;
    debug!(
        "single-level coverage at level {}: {} candidate tiles",
        level,
        candidates.len()
    );
    let index = build_index(&geometry, candidates.len(), options);

    let mut result = CoverageMap::new();
    for geohash in candidates {
        let cell = codec::decode_bbox(&geohash)?;
        if let Some(index) = &index {
            if !index.intersects(&cell) {
                continue;
            }
        }
        let ratio = geometry::coverage_ratio(&cell, &geometry);
        let accepted = if threshold == 0.0 {
            ratio > 0.0
        } else {
            ratio >= threshold
        };
        if accepted {
            result.insert(level, geohash);
        }
    }

    debug!(
        "single-level coverage at level {}: {} tiles accepted",
        level,
        result.total_tiles()
    );
    Ok(result)
}

/// Cover a geometry adaptively between two geohash levels.
///
/// Every level-`min_level` tile over the geometry's bounding box seeds a
/// worklist. A tile with no overlap is discarded; a tile whose coverage
/// ratio reaches `threshold` (inclusive) is accepted at its current level
/// and never refined further; a partially covered tile is replaced by its
/// 32 children until `max_level`, where boundary tiles are accepted as-is
/// so the union of accepted tiles never leaves gaps along the boundary.
///
/// The worklist makes the recursion explicit: memory stays proportional to
/// the frontier, and a caller wanting parallelism can partition the seed
/// tiles and merge the per-partition results.
///
/// # Errors
///
/// `InvalidPolygon` for empty or degenerate geometry, `InvalidLevelRange`
/// unless `1 <= min_level <= max_level <= 12`, `InvalidThreshold` for a
/// threshold outside `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use geo::polygon;
/// use geocover::adaptive_geohash_coverage;
///
/// // An L-shaped area: coarse tiles win in the interior, fine tiles trace
/// // the boundary.
/// let area = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 2.0, y: 0.0),
///     (x: 2.0, y: 2.0),
///     (x: 1.0, y: 2.0),
///     (x: 1.0, y: 3.0),
///     (x: 0.0, y: 3.0),
///     (x: 0.0, y: 0.0),
/// ];
///
/// let coverage = adaptive_geohash_coverage(area, 2, 5, 0.95)?;
/// assert!(coverage.total_tiles() > 0);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn adaptive_geohash_coverage(
    geometry: impl Into<MultiPolygon<f64>>,
    min_level: usize,
    max_level: usize,
    threshold: f64,
) -> Result<CoverageMap> {
    adaptive_geohash_coverage_with_options(
        geometry,
        min_level,
        max_level,
        threshold,
        &CoverageOptions::default(),
    )
}

/// [`adaptive_geohash_coverage`] with explicit engine options.
pub fn adaptive_geohash_coverage_with_options(
    geometry: impl Into<MultiPolygon<f64>>,
    min_level: usize,
    max_level: usize,
    threshold: f64,
    options: &CoverageOptions,
) -> Result<CoverageMap> {
    let geometry = geometry.into();
    if min_level == 0 || min_level > max_level || max_level > MAX_LEVEL {
        return Err(GeocoverError::InvalidLevelRange {
            min: min_level,
            max: max_level,
        });
    }
    validate_threshold(threshold)?;
    let bbox = validated_bounding_rect(&geometry)?;

    let seed = codec::candidates_covering_bbox(&bbox, min_level)?;
    debug!(
        "adaptive coverage: {} seed tiles at level {}, refining to level {}",
        seed.len(),
        min_level,
        max_level
    );
    let index = build_index(&geometry, seed.len(), options);

    // Worklist of pending geohashes; a tile's level is its string length.
    let mut work: Vec<String> = seed;
    let mut result = CoverageMap::new();

    while let Some(geohash) = work.pop() {
        let level = geohash.len();
        let cell = codec::decode_bbox(&geohash)?;

        if let Some(index) = &index {
            if !index.intersects(&cell) {
                continue;
            }
        }

        let ratio = geometry::coverage_ratio(&cell, &geometry);
        if ratio <= 0.0 {
            continue;
        }

        if ratio >= threshold {
            trace!("{geohash}: accepted at level {level} (ratio {ratio:.4})");
            result.insert(level, geohash);
        } else if level < max_level {
            trace!("{geohash}: refining (ratio {ratio:.4})");
            work.extend(codec::children(&geohash));
        } else {
            // Boundary tile at the deepest level: keep it so the union of
            // accepted tiles still covers the whole geometry.
            trace!("{geohash}: accepted at max level {level} (ratio {ratio:.4})");
            result.insert(level, geohash);
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        for (level, tiles) in result.levels() {
            debug!("adaptive coverage level {}: {} tiles", level, tiles.len());
        }
    }
    Ok(result)
}
