//! Inner-Region Abstraction: a rotated/translated sub-region that can own
//! its own hatch generator and a clip-locally flag, used by island-like
//! recipes that want per-cell clipping.
//!
//! The 2D and tag-preserving transforms here generalise the affine-matrix
//! helpers the teacher built for geometry transforms, extended with an
//! identity row/column so a tag dimension rides through unchanged.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

use crate::geometry::{Point2, PolygonRegion};

/// Sub-region origin, orientation and boundary, with the two flags
/// island-style recipes use to decide whether to clip per-cell.
pub struct InnerRegion {
    pub origin: Point2,
    pub orientation_rad: f64,
    pub boundary: PolygonRegion,
    pub requires_clipping: bool,
    pub is_intersecting: bool,
}

impl InnerRegion {
    pub fn new(origin: Point2, orientation_rad: f64, boundary: PolygonRegion) -> Self {
        Self {
            origin,
            orientation_rad,
            boundary,
            requires_clipping: false,
            is_intersecting: false,
        }
    }

    /// 2D affine transform (rotation about the origin, then translation)
    /// built from this region's (origin, orientation).
    pub fn transform_2d(&self) -> Matrix3<f64> {
        rotation_translation_matrix(self.orientation_rad, self.origin)
    }

    /// Tag-preserving 3D form: extends the 2D rotation with an identity
    /// row/column so a `tag` coordinate passes through matrix
    /// multiplication unchanged, letting batch transforms be applied via
    /// linear algebra without special-casing the tag.
    pub fn transform_tagged(&self) -> Matrix4<f64> {
        tagged_rotation_translation_matrix(self.orientation_rad, self.origin)
    }

    pub fn apply_2d(&self, p: Point2) -> Point2 {
        let v = self.transform_2d() * Vector3::new(p.x, p.y, 1.0);
        geo_types::coord! { x: v.x, y: v.y }
    }

    pub fn apply_tagged(&self, p: Point2, tag: f64) -> (Point2, f64) {
        let v = self.transform_tagged() * Vector4::new(p.x, p.y, tag, 1.0);
        (geo_types::coord! { x: v.x, y: v.y }, v.z)
    }
}

fn rotation_translation_matrix(theta: f64, origin: Point2) -> Matrix3<f64> {
    let (sin_t, cos_t) = theta.sin_cos();
    Matrix3::new(
        cos_t, -sin_t, origin.x, sin_t, cos_t, origin.y, 0.0, 0.0, 1.0,
    )
}

fn tagged_rotation_translation_matrix(theta: f64, origin: Point2) -> Matrix4<f64> {
    let (sin_t, cos_t) = theta.sin_cos();
    Matrix4::new(
        cos_t, -sin_t, 0.0, origin.x, sin_t, cos_t, 0.0, origin.y, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo_types::coord;
    use std::f64::consts::PI;

    #[test]
    fn tag_rides_through_unchanged() {
        let region = InnerRegion::new(coord! {x: 10.0, y: 5.0}, PI / 2.0, PolygonRegion { rings: vec![] });
        let (_, tag_out) = region.apply_tagged(coord! {x: 1.0, y: 0.0}, 42.0);
        assert_relative_eq!(tag_out, 42.0, epsilon = 1e-9);
    }

    #[test]
    fn rotate_then_translate_matches_2d_apply() {
        let region = InnerRegion::new(coord! {x: 10.0, y: 0.0}, PI / 2.0, PolygonRegion { rings: vec![] });
        let out = region.apply_2d(coord! {x: 1.0, y: 0.0});
        assert_relative_eq!(out.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(out.y, 1.0, epsilon = 1e-9);
    }
}
