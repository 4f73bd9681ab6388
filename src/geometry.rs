//! Planar geometry operations over polygonal inputs.
//!
//! Thin wrappers around the `geo` crate. All areas are in squared degrees
//! with no projection correction: refinement decisions are driven by
//! coverage *ratios*, not physical area, so the planar simplification is
//! deliberate and inherited from the problem domain.

use geo::{
    Area, BooleanOps, BoundingRect, Contains, Geometry, Intersects, MultiPolygon, Polygon, Rect,
};

use crate::error::{GeocoverError, Result};

/// Planar area of a bounding box in squared degrees.
pub fn box_area(bbox: &Rect<f64>) -> f64 {
    bbox.width() * bbox.height()
}

/// Planar area of a single polygon in squared degrees.
pub fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

/// Planar area of a multipolygon in squared degrees.
pub fn multipolygon_area(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Whether two bounding boxes overlap (closed-box semantics: touching
/// edges count).
pub fn bboxes_intersect(first: &Rect<f64>, second: &Rect<f64>) -> bool {
    first.intersects(second)
}

/// Whether `outer` fully contains `inner` (boundary included).
pub fn box_contains(outer: &Rect<f64>, inner: &Rect<f64>) -> bool {
    inner.min().x >= outer.min().x
        && inner.max().x <= outer.max().x
        && inner.min().y >= outer.min().y
        && inner.max().y <= outer.max().y
}

/// Area of the intersection between a box and a multipolygon, in squared
/// degrees. Zero when disjoint.
pub fn intersection_area(bbox: &Rect<f64>, geometry: &MultiPolygon<f64>) -> f64 {
    if !geometry.intersects(bbox) {
        return 0.0;
    }
    let cell = MultiPolygon::new(vec![bbox.to_polygon()]);
    geometry.intersection(&cell).unsigned_area()
}

/// Fraction of the box's area lying inside the multipolygon, in `[0, 1]`.
///
/// 1.0 means the box is fully inside the polygon, 0.0 fully outside or
/// disjoint. Disjoint and fully-contained boxes are answered with exact
/// predicates before falling back to the boolean intersection, so a tile
/// strictly inside the polygon reports exactly 1.0 rather than a value a
/// float ulp below it.
pub fn coverage_ratio(bbox: &Rect<f64>, geometry: &MultiPolygon<f64>) -> f64 {
    let area = box_area(bbox);
    if area == 0.0 || !geometry.intersects(bbox) {
        return 0.0;
    }
    if geometry.contains(bbox) {
        return 1.0;
    }
    let cell = MultiPolygon::new(vec![bbox.to_polygon()]);
    geometry.intersection(&cell).unsigned_area() / area
}

/// Validate a multipolygon as coverage input.
///
/// Rejects empty geometry, rings with non-finite coordinates, and
/// degenerate geometry whose bounding box has zero area. The engine does
/// not repair invalid geometry; callers are expected to supply valid,
/// non-self-intersecting rings.
pub fn validate_multipolygon(geometry: &MultiPolygon<f64>) -> Result<()> {
    if geometry.0.is_empty() {
        return Err(GeocoverError::InvalidPolygon(
            "geometry contains no polygons".to_string(),
        ));
    }

    for (index, polygon) in geometry.0.iter().enumerate() {
        if polygon.exterior().0.is_empty() {
            return Err(GeocoverError::InvalidPolygon(format!(
                "polygon {index} has an empty exterior ring"
            )));
        }
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors().iter());
        for ring in rings {
            for coord in ring.coords() {
                if !coord.x.is_finite() || !coord.y.is_finite() {
                    return Err(GeocoverError::InvalidPolygon(format!(
                        "polygon {index} has a non-finite coordinate ({}, {})",
                        coord.x, coord.y
                    )));
                }
            }
        }
    }

    let bbox = geometry.bounding_rect().ok_or_else(|| {
        GeocoverError::InvalidPolygon("geometry has no bounding box".to_string())
    })?;
    if box_area(&bbox) == 0.0 {
        return Err(GeocoverError::InvalidPolygon(
            "geometry bounding box has zero area".to_string(),
        ));
    }

    Ok(())
}

/// Coerce any polygonal geometry into a `MultiPolygon`.
///
/// Accepts polygons, multipolygons, and geometry collections with polygonal
/// members (nested collections included). Everything non-polygonal is
/// skipped; if nothing polygonal remains the input is rejected.
pub fn to_multipolygon(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multipolygon) => Ok(multipolygon),
        Geometry::GeometryCollection(collection) => {
            let mut parts = Vec::new();
            for member in collection {
                if let Ok(multipolygon) = to_multipolygon(member) {
                    parts.extend(multipolygon);
                }
            }
            if parts.is_empty() {
                return Err(GeocoverError::InvalidPolygon(
                    "geometry collection contains no polygonal members".to_string(),
                ));
            }
            Ok(MultiPolygon::new(parts))
        }
        other => Err(GeocoverError::InvalidPolygon(format!(
            "unsupported geometry type: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{GeometryCollection, LineString, Point, Polygon, coord, polygon};

    fn rect(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Rect<f64> {
        Rect::new(
            coord! { x: lon_min, y: lat_min },
            coord! { x: lon_max, y: lat_max },
        )
    }

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn test_box_area() {
        assert_eq!(box_area(&rect(0.0, 0.0, 2.0, 3.0)), 6.0);
        assert_eq!(box_area(&rect(1.0, 1.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_multipolygon_area() {
        assert_eq!(multipolygon_area(&unit_square()), 1.0);
        assert_eq!(polygon_area(&unit_square().0[0]), 1.0);
    }

    #[test]
    fn test_intersection_area() {
        let square = unit_square();
        // Half-overlapping box
        assert!((intersection_area(&rect(0.5, 0.0, 1.5, 1.0), &square) - 0.5).abs() < 1e-9);
        // Disjoint
        assert_eq!(intersection_area(&rect(5.0, 5.0, 6.0, 6.0), &square), 0.0);
        // Containing the whole polygon
        assert!((intersection_area(&rect(-1.0, -1.0, 2.0, 2.0), &square) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_ratio() {
        let square = unit_square();
        assert_eq!(coverage_ratio(&rect(0.25, 0.25, 0.75, 0.75), &square), 1.0);
        assert_eq!(coverage_ratio(&rect(5.0, 5.0, 6.0, 6.0), &square), 0.0);

        let half = coverage_ratio(&rect(0.5, 0.0, 1.5, 1.0), &square);
        assert!((half - 0.5).abs() < 1e-9);

        // Zero-area box contributes nothing
        assert_eq!(coverage_ratio(&rect(0.5, 0.5, 0.5, 0.5), &square), 0.0);
    }

    #[test]
    fn test_coverage_ratio_touching_edge_is_zero() {
        let square = unit_square();
        // Shares the lon=1 edge only: intersects, but no overlapping area
        assert_eq!(coverage_ratio(&rect(1.0, 0.0, 2.0, 1.0), &square), 0.0);
    }

    #[test]
    fn test_box_predicates() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert!(box_contains(&outer, &rect(1.0, 1.0, 9.0, 9.0)));
        assert!(box_contains(&outer, &outer));
        assert!(!box_contains(&outer, &rect(5.0, 5.0, 11.0, 9.0)));

        assert!(bboxes_intersect(&outer, &rect(9.0, 9.0, 12.0, 12.0)));
        // Touching edges count as intersecting
        assert!(bboxes_intersect(&outer, &rect(10.0, 0.0, 12.0, 10.0)));
        assert!(!bboxes_intersect(&outer, &rect(11.0, 11.0, 12.0, 12.0)));
    }

    #[test]
    fn test_validate_multipolygon() {
        assert!(validate_multipolygon(&unit_square()).is_ok());

        assert!(matches!(
            validate_multipolygon(&MultiPolygon::new(vec![])),
            Err(GeocoverError::InvalidPolygon(_))
        ));

        let nan = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: f64::NAN, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]);
        assert!(matches!(
            validate_multipolygon(&nan),
            Err(GeocoverError::InvalidPolygon(_))
        ));

        // A "polygon" collapsed to a point has a zero-area bounding box
        let degenerate = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(2.0, 2.0), (2.0, 2.0), (2.0, 2.0), (2.0, 2.0)]),
            vec![],
        )]);
        assert!(matches!(
            validate_multipolygon(&degenerate),
            Err(GeocoverError::InvalidPolygon(_))
        ));
    }

    #[test]
    fn test_to_multipolygon_coercions() {
        let polygon: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];

        let from_polygon = to_multipolygon(Geometry::Polygon(polygon.clone())).unwrap();
        assert_eq!(from_polygon.0.len(), 1);

        let collection = GeometryCollection::new_from(vec![
            Geometry::Point(Point::new(0.0, 0.0)),
            Geometry::Polygon(polygon.clone()),
            Geometry::MultiPolygon(unit_square()),
        ]);
        let from_collection = to_multipolygon(Geometry::GeometryCollection(collection)).unwrap();
        assert_eq!(from_collection.0.len(), 2);

        assert!(matches!(
            to_multipolygon(Geometry::Point(Point::new(1.0, 2.0))),
            Err(GeocoverError::InvalidPolygon(_))
        ));
    }
}
