//! Core data model: points, polylines, tagged segments and the record types
//! that make up a [`Layer`].

use geo::BoundingRect;
use geo_types::{LineString, Rect};
use serde::{Deserialize, Serialize};

/// Pair of real coordinates. Fixed-precision integer representation is
/// confined to the clip engine's internals (see [`crate::clip::ClipEngine`]).
pub type Point2 = geo_types::Coord<f64>;

/// Ordered sequence of [`Point2`]. May be open or closed (closed meaning
/// first == last).
pub type Polyline = LineString<f64>;

/// A set of closed polylines: the first is the outer ring, any subsequent
/// rings are holes. Clipping treats this with a non-zero fill rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonRegion {
    pub rings: Vec<Polyline>,
}

impl PolygonRegion {
    pub fn new(outer: Polyline, holes: Vec<Polyline>) -> Self {
        let mut rings = Vec::with_capacity(1 + holes.len());
        rings.push(outer);
        rings.extend(holes);
        Self { rings }
    }

    pub fn outer(&self) -> Option<&Polyline> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Polyline] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Bounding box of the outer ring. Holes never extend beyond it.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.outer().and_then(|ring| ring.bounding_rect())
    }
}

/// An ordered pair of endpoints plus the integer order tag assigned at
/// generation time. The tag survives clipping on every output vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedSegment {
    pub p0: Point2,
    pub p1: Point2,
    pub tag: i64,
}

/// An open or closed polyline produced by clipping, carrying the tag of the
/// subject segment it was cut from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedPolyline {
    pub points: Vec<Point2>,
    pub tag: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContourKind {
    Outer,
    Inner,
}

/// A closed polyline plus a kind, identifying which build style it should be
/// exposed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourGeometry {
    pub polyline: Polyline,
    pub kind: ContourKind,
    pub model_id: u32,
    pub build_id: u32,
}

impl ContourGeometry {
    pub fn new(polyline: Polyline, kind: ContourKind) -> Self {
        Self {
            polyline,
            kind,
            model_id: 0,
            build_id: 0,
        }
    }
}

/// A flat array of points of even length, interpreted as consecutive
/// (start, end) pairs. One record per hatch-generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HatchGeometry {
    pub points: Vec<Point2>,
    pub model_id: u32,
    pub build_id: u32,
}

impl HatchGeometry {
    pub fn from_pairs(pairs: Vec<(Point2, Point2)>) -> Self {
        let mut points = Vec::with_capacity(pairs.len() * 2);
        for (p0, p1) in pairs {
            points.push(p0);
            points.push(p1);
        }
        Self {
            points,
            model_id: 0,
            build_id: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeometryRecord {
    Contour(ContourGeometry),
    Hatch(HatchGeometry),
}

/// The set of scan trajectories for one physical build layer, ordered for
/// the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Build-style/job identifier, distinct from `layer_index`.
    pub layer_id: u64,
    /// Monotonically incremented per slice; used to rotate the hatch angle.
    pub layer_index: u64,
    pub records: Vec<GeometryRecord>,
}

impl Layer {
    pub fn new(layer_id: u64, layer_index: u64) -> Self {
        Self {
            layer_id,
            layer_index,
            records: Vec::new(),
        }
    }
}
