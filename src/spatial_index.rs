//! R-tree acceleration for repeated box-vs-polygon intersection tests.
//!
//! The coverage engine asks "does this candidate cell intersect the
//! polygon?" once per tile, and a complex multipolygon can have hundreds of
//! parts. Bulk-loading the parts into an R-tree once per invocation turns
//! each question into an envelope lookup plus an exact check against the few
//! parts whose bounding boxes overlap the cell.
//!
//! The index is a prefilter, not a semantic change: with or without it, the
//! engine reaches identical accept/reject decisions.

use geo::{BoundingRect, Intersects, MultiPolygon, Polygon, Rect};
use rstar::{AABB, RTree, RTreeObject};

/// One polygon part of the input geometry plus its precomputed envelope.
#[derive(Debug, Clone)]
struct IndexedPart {
    polygon: Polygon<f64>,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl IndexedPart {
    fn new(polygon: Polygon<f64>) -> Option<Self> {
        let bbox = polygon.bounding_rect()?;
        Some(Self {
            polygon,
            min_x: bbox.min().x,
            min_y: bbox.min().y,
            max_x: bbox.max().x,
            max_y: bbox.max().y,
        })
    }
}

impl RTreeObject for IndexedPart {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// Read-only R-tree over the parts of one multipolygon.
///
/// Built once per coverage invocation and dropped at the end; it owns
/// clones of the parts and nothing else.
#[derive(Debug)]
pub struct PolygonIndex {
    tree: RTree<IndexedPart>,
}

impl PolygonIndex {
    /// Bulk-load an index over every part of the geometry.
    ///
    /// Parts without a bounding box (empty rings) are skipped; the engine
    /// validates geometry before building, so in practice every part is
    /// indexed.
    pub fn build(geometry: &MultiPolygon<f64>) -> Self {
        let parts: Vec<IndexedPart> = geometry
            .0
            .iter()
            .cloned()
            .filter_map(IndexedPart::new)
            .collect();
        Self {
            tree: RTree::bulk_load(parts),
        }
    }

    /// Number of indexed polygon parts.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no parts.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Exact test: does the box intersect any part of the geometry?
    ///
    /// Envelope query first, then the precise `geo` predicate on the
    /// surviving parts.
    pub fn intersects(&self, bbox: &Rect<f64>) -> bool {
        let envelope = AABB::from_corners(
            [bbox.min().x, bbox.min().y],
            [bbox.max().x, bbox.max().y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .any(|part| bbox.intersects(&part.polygon))
    }
}
