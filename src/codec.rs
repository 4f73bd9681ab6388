//! Geohash codec: encoding, bounding boxes, children, and candidate sweeps.
//!
//! Wraps the `geohash` crate for the interleaved-bit base-32 encoding and
//! adds the two operations the coverage engine needs on top of it: the 32
//! immediate children of a cell, and grid-sweep enumeration of every cell of
//! a given level touching a bounding box.

use geo::Rect;

use crate::error::{GeocoverError, Result};
use crate::types::MAX_LEVEL;

/// The standard base-32 geohash alphabet, in sort order.
///
/// Each character encodes 5 bits, alternating contribution to longitude and
/// latitude, longitude first.
pub const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

fn validate_level(level: usize) -> Result<()> {
    if level == 0 || level > MAX_LEVEL {
        return Err(GeocoverError::InvalidPrecision(level));
    }
    Ok(())
}

/// Encode a lon/lat coordinate into a geohash of the given level.
///
/// # Errors
///
/// `InvalidCoordinate` for non-finite or out-of-range coordinates,
/// `InvalidPrecision` for a level outside `1..=12`.
///
/// # Examples
///
/// ```rust
/// use geocover::codec::encode;
///
/// assert_eq!(encode(10.40744, 57.64911, 7)?, "u4pruyd");
/// assert!(encode(200.0, 40.0, 7).is_err());
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn encode(lon: f64, lat: f64, level: usize) -> Result<String> {
    validate_level(level)?;
    if !lon.is_finite() || !lat.is_finite() {
        return Err(GeocoverError::InvalidCoordinate { lon, lat });
    }
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(GeocoverError::InvalidCoordinate { lon, lat });
    }

    geohash::encode(geohash::Coord { x: lon, y: lat }, level)
        .map_err(|_| GeocoverError::InvalidCoordinate { lon, lat })
}

/// Decode a geohash into its bounding box.
///
/// Deterministic for well-formed input; `InvalidGeohash` for empty strings
/// or characters outside the base-32 alphabet.
///
/// # Examples
///
/// ```rust
/// use geocover::codec::decode_bbox;
///
/// let bbox = decode_bbox("u")?;
/// assert_eq!(bbox.min().x, 0.0);
/// assert_eq!(bbox.max().x, 45.0);
/// assert_eq!(bbox.min().y, 45.0);
/// assert_eq!(bbox.max().y, 90.0);
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn decode_bbox(geohash: &str) -> Result<Rect<f64>> {
    if geohash.is_empty() {
        return Err(GeocoverError::InvalidGeohash(geohash.to_string()));
    }
    geohash::decode_bbox(geohash).map_err(|_| GeocoverError::InvalidGeohash(geohash.to_string()))
}

/// The 32 immediate children of a geohash cell, in alphabet sort order.
///
/// Children partition the parent exactly: no gaps, no overlaps. The order
/// only matters for reproducible iteration.
pub fn children(geohash: &str) -> Vec<String> {
    GEOHASH_ALPHABET
        .iter()
        .map(|&c| {
            let mut child = String::with_capacity(geohash.len() + 1);
            child.push_str(geohash);
            child.push(c as char);
            child
        })
        .collect()
}

/// Longitude and latitude span, in degrees, of a single cell at `level`.
///
/// A level-L geohash carries `5L` bits, `ceil(5L/2)` of them longitude.
pub fn cell_dimensions(level: usize) -> Result<(f64, f64)> {
    validate_level(level)?;
    let lon_bits = (5 * level + 1) / 2;
    let lat_bits = (5 * level) / 2;
    Ok((
        360.0 / (1u64 << lon_bits) as f64,
        180.0 / (1u64 << lat_bits) as f64,
    ))
}

/// Enumerate every level-`level` geohash whose cell overlaps the bounding
/// box, by sweeping the cell lattice between the box's corner cells.
///
/// The sweep walks row-major (south to north, west to east), so the order is
/// deterministic. The box is clamped to world bounds first; a box entirely
/// outside the world yields an empty set. Cells that merely share an edge
/// with the box's max corner are included (closed-box semantics); the
/// engine's ratio test discards zero-area overlaps anyway.
pub fn candidates_covering_bbox(bbox: &Rect<f64>, level: usize) -> Result<Vec<String>> {
    let (cell_w, cell_h) = cell_dimensions(level)?;

    let corners = [bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y];
    if corners.iter().any(|c| !c.is_finite()) {
        return Err(GeocoverError::InvalidCoordinate {
            lon: bbox.min().x,
            lat: bbox.min().y,
        });
    }

    let lon_min = bbox.min().x.max(-180.0);
    let lon_max = bbox.max().x.min(180.0);
    let lat_min = bbox.min().y.max(-90.0);
    let lat_max = bbox.max().y.min(90.0);
    if lon_min > lon_max || lat_min > lat_max {
        return Ok(Vec::new());
    }

    let max_i = (360.0 / cell_w).round() as u64 - 1;
    let max_j = (180.0 / cell_h).round() as u64 - 1;
    let i0 = (((lon_min + 180.0) / cell_w).floor() as u64).min(max_i);
    let i1 = (((lon_max + 180.0) / cell_w).floor() as u64).min(max_i);
    let j0 = (((lat_min + 90.0) / cell_h).floor() as u64).min(max_j);
    let j1 = (((lat_max + 90.0) / cell_h).floor() as u64).min(max_j);

    let mut cells = Vec::with_capacity(((i1 - i0 + 1) * (j1 - j0 + 1)) as usize);
    for j in j0..=j1 {
        let lat = -90.0 + (j as f64 + 0.5) * cell_h;
        for i in i0..=i1 {
            let lon = -180.0 + (i as f64 + 0.5) * cell_w;
            cells.push(encode(lon, lat, level)?);
        }
    }
    Ok(cells)
}
