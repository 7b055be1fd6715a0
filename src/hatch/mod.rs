//! Infill strategies sharing one contract: an unclipped, ordered grid of
//! parallel line segments covering the bounding disk of a region.

mod island;
mod stripe;
mod uniform;

pub use island::IslandHatcher;
pub use stripe::StripeHatcher;
pub use uniform::UniformHatcher;

use geo_types::{coord, Coord, Rect};

use crate::geometry::{PolygonRegion, TaggedSegment};

/// Re-architected strategy interface replacing the abstract-base/subclass
/// hierarchy in the original hatcher: one operation, independent of how the
/// recipe composes it.
pub trait HatchStrategy: Send + Sync {
    fn generate_hatching(
        &self,
        boundary: &PolygonRegion,
        spacing: f64,
        angle_deg: f64,
    ) -> Vec<TaggedSegment>;
}

/// Applies the (mod 180, subtract 180 if > 90) rule, canonicalising any
/// angle into (-90, 90].
pub fn canonicalize_angle(angle_deg: f64) -> f64 {
    let mut a = angle_deg.rem_euclid(180.0);
    if a > 90.0 {
        a -= 180.0;
    }
    a
}

pub(crate) fn far_corner_radius(rect: &Rect<f64>, center: Coord<f64>) -> f64 {
    [
        rect.min(),
        rect.max(),
        coord! {x: rect.min().x, y: rect.max().y},
        coord! {x: rect.max().x, y: rect.min().y},
    ]
    .iter()
    .map(|c| ((c.x - center.x).powi(2) + (c.y - center.y).powi(2)).sqrt())
    .fold(0.0_f64, f64::max)
}

pub(crate) fn rotate_translate(
    (lx, ly): (f64, f64),
    sin_t: f64,
    cos_t: f64,
    center: Coord<f64>,
) -> Coord<f64> {
    coord! {
        x: lx * cos_t - ly * sin_t + center.x,
        y: lx * sin_t + ly * cos_t + center.y,
    }
}
