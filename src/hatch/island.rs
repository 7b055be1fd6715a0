use geo::BoundingRect;

use crate::geometry::{PolygonRegion, TaggedSegment};

use super::{far_corner_radius, rotate_translate, HatchStrategy};

/// Partitions the bounding disk into a square grid of islands. Cells where
/// `(i + j)` is odd scan horizontally, even cells scan vertically, giving
/// orthogonal scan directions on a checkerboard. Rotation is applied
/// globally afterwards, non-negated (see [`super::StripeHatcher`] for the
/// sign this departs from).
pub struct IslandHatcher {
    island_width: f64,
    island_overlap: f64,
    island_offset_fraction: f64,
}

impl IslandHatcher {
    /// Fails fast if `island_width` is non-positive: a zero or negative
    /// width can never partition the disk into cells.
    pub fn new(
        island_width: f64,
        island_overlap: f64,
        island_offset_fraction: f64,
    ) -> Result<Self, crate::errors::ConfigError> {
        if island_width <= 0.0 {
            return Err(crate::errors::ConfigError::NonPositiveIslandWidth);
        }
        Ok(Self {
            island_width,
            island_overlap,
            island_offset_fraction,
        })
    }
}

impl HatchStrategy for IslandHatcher {
    fn generate_hatching(
        &self,
        boundary: &PolygonRegion,
        spacing: f64,
        angle_deg: f64,
    ) -> Vec<TaggedSegment> {
        let Some(rect) = boundary.bounding_rect() else {
            return Vec::new();
        };
        let center = rect.center();
        let r = far_corner_radius(&rect, center);
        if r <= 0.0 || spacing <= 0.0 {
            return Vec::new();
        }

        let w = self.island_width;
        let o = self.island_overlap;
        let f = self.island_offset_fraction;
        let n = ((2.0 * r) / w).ceil() as i64 + 1;

        let theta = angle_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();

        let mut tag = 0i64;
        let mut segments = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let x_min = -r + (i as f64) * w - o;
                let x_max = -r + ((i + 1) as f64) * w + o;
                let y_min = -r + (j as f64) * w - o;
                let y_max = -r + ((j + 1) as f64) * w + o;
                let odd = (i + j) % 2 != 0;
                let shift = if odd { f * spacing } else { 0.0 };

                if odd {
                    let mut y = y_min + shift;
                    while y <= y_max {
                        segments.push(TaggedSegment {
                            p0: rotate_translate((x_min, y), sin_t, cos_t, center),
                            p1: rotate_translate((x_max, y), sin_t, cos_t, center),
                            tag,
                        });
                        tag += 1;
                        y += spacing;
                    }
                } else {
                    let mut x = x_min + shift;
                    while x <= x_max {
                        segments.push(TaggedSegment {
                            p0: rotate_translate((x, y_min), sin_t, cos_t, center),
                            p1: rotate_translate((x, y_max), sin_t, cos_t, center),
                            tag,
                        });
                        tag += 1;
                        x += spacing;
                    }
                }
            }
        }
        segments
    }
}
