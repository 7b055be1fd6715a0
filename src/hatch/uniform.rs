use geo::BoundingRect;

use crate::geometry::{PolygonRegion, TaggedSegment};

use super::{far_corner_radius, rotate_translate, HatchStrategy};

/// Uniform parallel hatch: a family of horizontal segments in a local frame
/// centred on the boundary's bbox, rotated by the hatch angle and translated
/// back. Rotating a grid that covers the circumscribed disk guarantees
/// coverage for any angle without per-angle bbox recomputation.
pub struct UniformHatcher;

impl HatchStrategy for UniformHatcher {
    fn generate_hatching(
        &self,
        boundary: &PolygonRegion,
        spacing: f64,
        angle_deg: f64,
    ) -> Vec<TaggedSegment> {
        generate(boundary, spacing, angle_deg, false)
    }
}

/// Shared by [`UniformHatcher`] and [`super::IslandHatcher`]'s global
/// rotation step; `negate_angle` is set only by the stripe generator.
pub(crate) fn generate(
    boundary: &PolygonRegion,
    spacing: f64,
    angle_deg: f64,
    negate_angle: bool,
) -> Vec<TaggedSegment> {
    let Some(rect) = boundary.bounding_rect() else {
        return Vec::new();
    };
    let center = rect.center();
    let r = far_corner_radius(&rect, center);
    if r <= 0.0 || spacing <= 0.0 {
        return Vec::new();
    }

    let mut xs = Vec::new();
    if spacing >= 2.0 * r {
        xs.push(0.0);
    } else {
        let mut x = -r;
        while x <= r {
            xs.push(x);
            x += spacing;
        }
    }

    let theta = if negate_angle {
        -angle_deg.to_radians()
    } else {
        angle_deg.to_radians()
    };
    let (sin_t, cos_t) = theta.sin_cos();

    xs.into_iter()
        .enumerate()
        .map(|(k, x)| TaggedSegment {
            p0: rotate_translate((x, -r), sin_t, cos_t, center),
            p1: rotate_translate((x, r), sin_t, cos_t, center),
            tag: k as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolygonRegion;
    use geo_types::{coord, LineString};

    fn unit_square(side: f64) -> PolygonRegion {
        PolygonRegion::new(
            LineString::new(vec![
                coord! {x: 0.0, y: 0.0},
                coord! {x: side, y: 0.0},
                coord! {x: side, y: side},
                coord! {x: 0.0, y: side},
                coord! {x: 0.0, y: 0.0},
            ]),
            vec![],
        )
    }

    #[test]
    fn degenerate_region_emits_nothing() {
        let point = PolygonRegion::new(
            LineString::new(vec![
                coord! {x: 5.0, y: 5.0},
                coord! {x: 5.0, y: 5.0},
                coord! {x: 5.0, y: 5.0},
            ]),
            vec![],
        );
        let hatcher = UniformHatcher;
        assert!(hatcher.generate_hatching(&point, 1.0, 0.0).is_empty());
    }

    #[test]
    fn large_spacing_emits_single_segment_through_center() {
        let region = unit_square(10.0);
        let hatcher = UniformHatcher;
        let segments = hatcher.generate_hatching(&region, 1000.0, 0.0);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn tags_are_contiguous_from_zero() {
        let region = unit_square(10.0);
        let hatcher = UniformHatcher;
        let segments = hatcher.generate_hatching(&region, 1.0, 0.0);
        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.tag, i as i64);
        }
    }
}
