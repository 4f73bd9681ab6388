//! Area-of-interest inputs accepted by data-fetching collaborators.
//!
//! External fetchers (marine, climate, reanalysis) take an area selector
//! that may be a geometry, a single geohash, a list of geohashes, or the
//! whole globe, and resolve it to a bounding box or a multipolygon before
//! querying their remote APIs. This crate exposes no network behavior; it
//! only pins down that resolution so every fetcher does it the same way.

use geo::{BoundingRect, MultiPolygon, Polygon, Rect, coord};

use crate::assembler;
use crate::codec;
use crate::error::{GeocoverError, Result};

/// An area selector for downstream data requests.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaOfInterest {
    /// The whole globe.
    World,
    /// An explicit polygonal geometry in lon/lat degrees.
    Geometry(MultiPolygon<f64>),
    /// A single geohash cell.
    Geohash(String),
    /// A set of geohash cells, e.g. one level of a coverage result.
    Geohashes(Vec<String>),
}

impl AreaOfInterest {
    /// Resolve the selector to a bounding box `(lon/lat degrees)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geocover::AreaOfInterest;
    ///
    /// let world = AreaOfInterest::World.bounding_box()?;
    /// assert_eq!(world.min().x, -180.0);
    ///
    /// let cell = AreaOfInterest::from("u").bounding_box()?;
    /// assert_eq!((cell.min().x, cell.max().y), (0.0, 90.0));
    /// # Ok::<(), geocover::GeocoverError>(())
    /// ```
    pub fn bounding_box(&self) -> Result<Rect<f64>> {
        match self {
            Self::World => Ok(world_rect()),
            Self::Geometry(geometry) => geometry.bounding_rect().ok_or_else(|| {
                GeocoverError::InvalidPolygon("empty geometry has no bounding box".to_string())
            }),
            Self::Geohash(geohash) => codec::decode_bbox(geohash),
            Self::Geohashes(geohashes) => {
                let mut cells = geohashes.iter();
                let first = cells.next().ok_or_else(|| {
                    GeocoverError::InvalidPolygon(
                        "empty geohash list has no bounding box".to_string(),
                    )
                })?;
                let mut bounds = codec::decode_bbox(first)?;
                for geohash in cells {
                    let cell = codec::decode_bbox(geohash)?;
                    bounds = Rect::new(
                        coord! {
                            x: bounds.min().x.min(cell.min().x),
                            y: bounds.min().y.min(cell.min().y),
                        },
                        coord! {
                            x: bounds.max().x.max(cell.max().x),
                            y: bounds.max().y.max(cell.max().y),
                        },
                    );
                }
                Ok(bounds)
            }
        }
    }

    /// Resolve the selector to polygonal geometry.
    ///
    /// Geohash lists are dissolved into contiguous regions, matching what a
    /// fetcher wants to mask raster cells against.
    pub fn to_geometry(&self) -> Result<MultiPolygon<f64>> {
        match self {
            Self::World => Ok(MultiPolygon::new(vec![world_rect().to_polygon()])),
            Self::Geometry(geometry) => Ok(geometry.clone()),
            Self::Geohash(geohash) => Ok(MultiPolygon::new(vec![
                codec::decode_bbox(geohash)?.to_polygon(),
            ])),
            Self::Geohashes(geohashes) => assembler::geohashes_to_multipolygon(geohashes, true),
        }
    }
}

fn world_rect() -> Rect<f64> {
    Rect::new(coord! { x: -180.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 })
}

impl From<MultiPolygon<f64>> for AreaOfInterest {
    fn from(geometry: MultiPolygon<f64>) -> Self {
        Self::Geometry(geometry)
    }
}

impl From<Polygon<f64>> for AreaOfInterest {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::Geometry(MultiPolygon::new(vec![polygon]))
    }
}

impl From<&str> for AreaOfInterest {
    fn from(geohash: &str) -> Self {
        Self::Geohash(geohash.to_string())
    }
}

impl From<String> for AreaOfInterest {
    fn from(geohash: String) -> Self {
        Self::Geohash(geohash)
    }
}

impl From<Vec<String>> for AreaOfInterest {
    fn from(geohashes: Vec<String>) -> Self {
        Self::Geohashes(geohashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_world_bounds() {
        let bbox = AreaOfInterest::World.bounding_box().unwrap();
        assert_eq!(
            (bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y),
            (-180.0, -90.0, 180.0, 90.0)
        );
    }

    #[test]
    fn test_geometry_bounds() {
        let aoi = AreaOfInterest::from(polygon![
            (x: 4.0, y: 50.0),
            (x: 6.0, y: 50.0),
            (x: 6.0, y: 52.0),
            (x: 4.0, y: 52.0),
            (x: 4.0, y: 50.0),
        ]);
        let bbox = aoi.bounding_box().unwrap();
        assert_eq!((bbox.min().x, bbox.max().y), (4.0, 52.0));
    }

    #[test]
    fn test_geohash_list_bounds_span_all_cells() {
        let aoi = AreaOfInterest::from(vec!["s".to_string(), "u".to_string()]);
        let bbox = aoi.bounding_box().unwrap();
        // "s" is lat 0..45, "u" is lat 45..90, both lon 0..45
        assert_eq!((bbox.min().x, bbox.max().x), (0.0, 45.0));
        assert_eq!((bbox.min().y, bbox.max().y), (0.0, 90.0));
    }

    #[test]
    fn test_empty_geohash_list_rejected() {
        let aoi = AreaOfInterest::Geohashes(vec![]);
        assert!(aoi.bounding_box().is_err());
    }

    #[test]
    fn test_to_geometry_dissolves_adjacent_cells() {
        let aoi = AreaOfInterest::from(vec!["s".to_string(), "u".to_string()]);
        let geometry = aoi.to_geometry().unwrap();
        // Vertically adjacent cells merge into a single region
        assert_eq!(geometry.0.len(), 1);
    }
}
