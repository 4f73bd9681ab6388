//! Conversion of geohash sets into boxes and multipolygon geometry.
//!
//! Downstream consumers (plotting, data-fetch area selection) want geometry
//! rather than strings; these helpers resolve coverage results back into
//! `geo` types, optionally dissolving adjacent tiles into contiguous
//! regions.

use std::collections::BTreeMap;

use geo::{MultiPolygon, Polygon, Rect, unary_union};

use crate::codec;
use crate::error::Result;

/// Decode each geohash into its bounding box, keyed by the geohash.
///
/// Duplicates collapse on the key; the output is idempotent over its own
/// key set.
///
/// # Examples
///
/// ```rust
/// use geocover::geohashes_to_boxes;
///
/// let boxes = geohashes_to_boxes(["u4pru", "u4prv", "u4pru"])?;
/// assert_eq!(boxes.len(), 2);
/// assert!(boxes.contains_key("u4pru"));
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn geohashes_to_boxes<I, S>(geohashes: I) -> Result<BTreeMap<String, Rect<f64>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut boxes = BTreeMap::new();
    for geohash in geohashes {
        let geohash = geohash.as_ref();
        if !boxes.contains_key(geohash) {
            boxes.insert(geohash.to_string(), codec::decode_bbox(geohash)?);
        }
    }
    Ok(boxes)
}

/// Convert geohashes into a multipolygon of their cell boxes.
///
/// With `dissolve` set, touching and overlapping boxes merge into maximal
/// contiguous regions and disjoint groups stay separate polygons. Without
/// it, the result keeps one polygon per input geohash, in input order.
///
/// # Examples
///
/// ```rust
/// use geocover::{geohashes_to_multipolygon, get_geohash_children};
///
/// // The first eight children of a cell form one contiguous block.
/// let children = get_geohash_children("u4pr");
/// let block = &children[..8];
///
/// let merged = geohashes_to_multipolygon(block, true)?;
/// assert_eq!(merged.0.len(), 1);
///
/// let separate = geohashes_to_multipolygon(block, false)?;
/// assert_eq!(separate.0.len(), 8);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn geohashes_to_multipolygon<I, S>(geohashes: I, dissolve: bool) -> Result<MultiPolygon<f64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for geohash in geohashes {
        polygons.push(codec::decode_bbox(geohash.as_ref())?.to_polygon());
    }

    if dissolve {
        Ok(unary_union(&polygons))
    } else {
        Ok(MultiPolygon::new(polygons))
    }
}
