//! Thin adapter over `geos` providing fixed-precision polygon offsetting and
//! line-in-polygon clipping with order-tag preservation.
//!
//! `geos` has no per-vertex user-data channel, so [`ClipEngine::clip_lines`]
//! uses the fallback the design notes sanction: clip each tagged segment
//! individually against the boundary and reattach its tag to every vertex of
//! every resulting fragment.

use geo::BoundingRect;
use geo_types::{Geometry, LineString, Polygon};
use geos::Geom;
use tracing::debug;

use crate::geometry::{Point2, PolygonRegion, Polyline, TaggedPolyline, TaggedSegment};

const DEFAULT_SCALE_FACTOR: f64 = 1e5;
const OFFSET_QUADRANT_SEGMENTS: i32 = 8;

/// Offset/clip engine instance. Carries its own scale factor rather than a
/// process-wide constant, so independent layers can run on independent
/// instances without sharing state.
pub struct ClipEngine {
    scale_factor: f64,
}

impl Default for ClipEngine {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl ClipEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale_factor(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    fn snap(&self, v: f64) -> f64 {
        (v * self.scale_factor).round() / self.scale_factor
    }

    fn snap_ring(&self, ring: Polyline) -> Polyline {
        LineString::new(
            ring.into_iter()
                .map(|c| geo_types::coord! { x: self.snap(c.x), y: self.snap(c.y) })
                .collect(),
        )
    }

    /// Offsets each closed polyline independently by signed distance
    /// `delta` (positive = outward). Rings that vanish under the offset are
    /// omitted; overlapping expansions do not union across input rings.
    pub fn offset(&self, rings: &[Polyline], delta: f64) -> Vec<Polyline> {
        rings
            .iter()
            .flat_map(|ring| self.offset_ring(ring, delta))
            .collect()
    }

    fn offset_ring(&self, ring: &Polyline, delta: f64) -> Vec<Polyline> {
        let polygon = Polygon::new(ring.clone(), vec![]);
        let result = (|| -> geos::GResult<Vec<Polyline>> {
            let geos_poly = geos::Geometry::try_from(&polygon)?;
            let buffered = geos_poly.buffer(delta, OFFSET_QUADRANT_SEGMENTS)?;
            let gt: Geometry<f64> = Geometry::try_from(buffered)?;
            Ok(exterior_rings(&gt))
        })();

        match result {
            Ok(rings) if rings.is_empty() => {
                debug!(delta, "offset eliminated ring");
                Vec::new()
            }
            Ok(rings) => rings.into_iter().map(|r| self.snap_ring(r)).collect(),
            Err(err) => {
                debug!(%err, "offset failed, treating ring as vanished");
                Vec::new()
            }
        }
    }

    /// Clips `tagged_segments` against `boundary`, returning only the
    /// portions strictly inside it. Each returned vertex carries the tag of
    /// its source segment. Non-zero fill rule (holes subtract from the
    /// outer ring).
    pub fn clip_lines(
        &self,
        boundary: &PolygonRegion,
        segments: &[TaggedSegment],
    ) -> Vec<TaggedPolyline> {
        let Some(boundary_geo) = self.boundary_geometry(boundary) else {
            return Vec::new();
        };

        segments
            .iter()
            .flat_map(|seg| self.clip_one(&boundary_geo, seg))
            .collect()
    }

    fn boundary_geometry(&self, boundary: &PolygonRegion) -> Option<geos::Geometry> {
        let outer = boundary.outer()?.clone();
        let polygon = Polygon::new(outer, boundary.holes().to_vec());
        geos::Geometry::try_from(&polygon).ok()
    }

    fn clip_one(&self, boundary_geo: &geos::Geometry, seg: &TaggedSegment) -> Vec<TaggedPolyline> {
        let subject = LineString::new(vec![seg.p0, seg.p1]);
        let result = (|| -> geos::GResult<Vec<Vec<Point2>>> {
            let geos_line = geos::Geometry::try_from(&subject)?;
            let clipped = geos_line.intersection(boundary_geo)?;
            let gt: Geometry<f64> = Geometry::try_from(clipped)?;
            Ok(flatten_lines(&gt))
        })();

        match result {
            Ok(lines) if lines.is_empty() => {
                debug!(tag = seg.tag, "segment produced no clipped intersection");
                Vec::new()
            }
            Ok(lines) => lines
                .into_iter()
                .map(|points| TaggedPolyline {
                    points,
                    tag: seg.tag,
                })
                .collect(),
            Err(err) => {
                debug!(%err, tag = seg.tag, "clip failed for segment, best-effort skip");
                Vec::new()
            }
        }
    }
}

fn flatten_lines(g: &Geometry<f64>) -> Vec<Vec<Point2>> {
    match g {
        Geometry::LineString(ls) => vec![ls.0.clone()],
        Geometry::MultiLineString(mls) => mls.0.iter().map(|ls| ls.0.clone()).collect(),
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(flatten_lines).collect(),
        _ => Vec::new(),
    }
}

fn exterior_rings(g: &Geometry<f64>) -> Vec<Polyline> {
    match g {
        Geometry::Polygon(poly) => vec![poly.exterior().clone()],
        Geometry::MultiPolygon(polys) => polys.0.iter().map(|p| p.exterior().clone()).collect(),
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(exterior_rings).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polyline {
        LineString::new(vec![
            coord! {x: x0, y: y0},
            coord! {x: x1, y: y0},
            coord! {x: x1, y: y1},
            coord! {x: x0, y: y1},
            coord! {x: x0, y: y0},
        ])
    }

    /// Installs a subscriber once so the `debug!` breadcrumbs in `offset`/
    /// `clip_one` run through a real collector instead of the default noop.
    fn init_logs() {
        static INIT: AtomicBool = AtomicBool::new(false);
        if INIT.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok() {
            tracing_subscriber::fmt::try_init().ok();
        }
    }

    #[test]
    fn offset_inward_shrinks_square() {
        init_logs();
        let engine = ClipEngine::new();
        let ring = square(0.0, 0.0, 10.0, 10.0);
        let offset = engine.offset(std::slice::from_ref(&ring), -1.0);
        assert_eq!(offset.len(), 1);
        let rect = offset[0].bounding_rect().expect("offset ring has a bbox");
        assert!((rect.min().x - 1.0).abs() < 1e-2);
        assert!((rect.max().x - 9.0).abs() < 1e-2);
    }

    #[test]
    fn offset_past_inradius_vanishes() {
        init_logs();
        let engine = ClipEngine::new();
        let ring = square(0.0, 0.0, 10.0, 10.0);
        let offset = engine.offset(std::slice::from_ref(&ring), -6.0);
        assert!(offset.is_empty());
    }

    #[test]
    fn clip_lines_against_wkt_boundary() {
        use wkt::TryFromWkt;

        let boundary_ring = Polyline::try_from_wkt_str(
            "LINESTRING (0 0, 10 0, 10 10, 0 10, 0 0)",
        )
        .expect("valid WKT boundary");
        let boundary = PolygonRegion::new(boundary_ring, vec![]);
        let engine = ClipEngine::new();
        let segments = vec![TaggedSegment {
            p0: coord! {x: -5.0, y: 5.0},
            p1: coord! {x: 15.0, y: 5.0},
            tag: 1,
        }];
        let clipped = engine.clip_lines(&boundary, &segments);
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].tag, 1);
    }

    #[test]
    fn clip_lines_keeps_tag_on_interior_portion() {
        let engine = ClipEngine::new();
        let boundary = PolygonRegion::new(square(0.0, 0.0, 10.0, 10.0), vec![]);
        let segments = vec![TaggedSegment {
            p0: coord! {x: -5.0, y: 5.0},
            p1: coord! {x: 15.0, y: 5.0},
            tag: 7,
        }];
        let clipped = engine.clip_lines(&boundary, &segments);
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].tag, 7);
        for p in &clipped[0].points {
            assert!(p.x >= -1e-6 && p.x <= 10.0 + 1e-6);
        }
    }

    #[test]
    fn clip_lines_empty_boundary_returns_empty() {
        let engine = ClipEngine::new();
        let boundary = PolygonRegion { rings: vec![] };
        let segments = vec![TaggedSegment {
            p0: coord! {x: 0.0, y: 0.0},
            p1: coord! {x: 1.0, y: 1.0},
            tag: 0,
        }];
        assert!(engine.clip_lines(&boundary, &segments).is_empty());
    }
}
