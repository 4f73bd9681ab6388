//! Core result and configuration types for coverage computation.

use std::collections::{BTreeMap, BTreeSet};

use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;

/// Deepest supported geohash precision.
///
/// A level-12 cell is already sub-centimeter in longitude, and the base-32
/// bit interleaving used by the wire format tops out here.
pub const MAX_LEVEL: usize = 12;

/// A single geohash tile: the cell identifier plus its decoded box.
///
/// The box is a pure function of the geohash; a `Tile` is derived data and
/// never independently mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// The base-32 cell identifier.
    pub geohash: String,
    /// The cell's bounding box in lon/lat degrees.
    pub bbox: Rect<f64>,
}

impl Tile {
    /// Decode a geohash into a tile.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geocover::Tile;
    ///
    /// let tile = Tile::from_geohash("u4pruyd")?;
    /// assert_eq!(tile.level(), 7);
    /// assert!(tile.bbox.min().x < 10.41 && tile.bbox.max().x > 10.40);
    /// # Ok::<(), geocover::GeocoverError>(())
    /// ```
    pub fn from_geohash(geohash: impl Into<String>) -> Result<Self> {
        let geohash = geohash.into();
        let bbox = codec::decode_bbox(&geohash)?;
        Ok(Self { geohash, bbox })
    }

    /// The tile's precision level (the geohash string length).
    pub fn level(&self) -> usize {
        self.geohash.len()
    }
}

/// Level-stratified coverage result: one set of geohashes per precision level.
///
/// Invariants maintained by the coverage engine:
/// - a geohash appears at exactly one level, and once within it;
/// - no two geohashes in the same result have overlapping boxes (a refined
///   child never coexists with an accepted ancestor);
/// - the union of all tile boxes covers the input polygon to within the
///   configured threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMap {
    levels: BTreeMap<usize, BTreeSet<String>>,
}

impl CoverageMap {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted tile. Returns `false` if the geohash was already
    /// present at this level.
    pub(crate) fn insert(&mut self, level: usize, geohash: String) -> bool {
        self.levels.entry(level).or_default().insert(geohash)
    }

    /// The level → geohash-set mapping.
    pub fn levels(&self) -> &BTreeMap<usize, BTreeSet<String>> {
        &self.levels
    }

    /// The tiles accepted at one level, if any.
    pub fn tiles_at(&self, level: usize) -> Option<&BTreeSet<String>> {
        self.levels.get(&level)
    }

    /// Total number of tiles across all levels.
    pub fn total_tiles(&self) -> usize {
        self.levels.values().map(BTreeSet::len).sum()
    }

    /// Whether the result contains no tiles at all.
    pub fn is_empty(&self) -> bool {
        self.levels.values().all(BTreeSet::is_empty)
    }

    /// Iterate over every accepted geohash, coarsest level first.
    pub fn geohashes(&self) -> impl Iterator<Item = &str> {
        self.levels
            .values()
            .flat_map(|tiles| tiles.iter().map(String::as_str))
    }

    /// Decode every accepted geohash into a [`Tile`], coarsest level first.
    ///
    /// Handy for plotting collaborators that want boxes rather than strings.
    pub fn tiles(&self) -> Result<Vec<Tile>> {
        self.geohashes().map(Tile::from_geohash).collect()
    }

    /// Consume the result, yielding the raw mapping.
    pub fn into_levels(self) -> BTreeMap<usize, BTreeSet<String>> {
        self.levels
    }
}

/// Tuning knobs for the coverage engine.
///
/// The defaults match the behavior most callers want; the plain
/// [`crate::geohash_coverage`] and [`crate::adaptive_geohash_coverage`]
/// entry points use them as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageOptions {
    /// Build an R-tree over the polygon parts and use it as an intersection
    /// prefilter. Never changes the result, only how fast candidate tiles
    /// are rejected.
    pub use_index: bool,
    /// Minimum number of seed candidates before the index is worth building.
    pub index_min_candidates: usize,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            use_index: true,
            index_min_candidates: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_from_geohash() {
        let tile = Tile::from_geohash("ezs42").unwrap();
        assert_eq!(tile.level(), 5);
        // Known cell: lon ~ -5.603, lat ~ 42.605
        assert!(tile.bbox.min().x <= -5.603 && tile.bbox.max().x >= -5.603);
        assert!(tile.bbox.min().y <= 42.605 && tile.bbox.max().y >= 42.605);
    }

    #[test]
    fn test_tile_from_invalid_geohash() {
        assert!(Tile::from_geohash("ab!").is_err());
        assert!(Tile::from_geohash("").is_err());
    }

    #[test]
    fn test_coverage_map_set_semantics() {
        let mut map = CoverageMap::new();
        assert!(map.insert(2, "u4".to_string()));
        assert!(!map.insert(2, "u4".to_string()));
        assert!(map.insert(3, "u4p".to_string()));

        assert_eq!(map.total_tiles(), 2);
        assert_eq!(map.tiles_at(2).unwrap().len(), 1);
        assert!(!map.is_empty());

        let geohashes: Vec<&str> = map.geohashes().collect();
        assert_eq!(geohashes, vec!["u4", "u4p"]);
    }

    #[test]
    fn test_coverage_map_serde_round_trip() {
        let mut map = CoverageMap::new();
        map.insert(1, "u".to_string());
        map.insert(2, "u4".to_string());
        map.insert(2, "u5".to_string());

        let json = serde_json::to_string(&map).unwrap();
        let restored: CoverageMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, restored);
    }

    #[test]
    fn test_coverage_options_default() {
        let options = CoverageOptions::default();
        assert!(options.use_index);
        assert!(options.index_min_candidates > 0);
    }
}
