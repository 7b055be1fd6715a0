//! Exposure-point sampling, an auxiliary utility decoupled from
//! [`crate::recipe::HatchRecipe`]: given a [`Layer`] and the build styles its
//! geometry records reference, emits discrete laser exposure positions.
//! Callers compose this themselves; the hatch-generation core does not call
//! it internally.

use crate::errors::ExposureError;
use crate::geometry::{GeometryRecord, Layer, Point2};

/// Opaque per-(model_id, build_id) laser parameters. The core does not
/// interpret these beyond the two fields this utility needs.
#[derive(Debug, Clone, Copy)]
pub struct BuildStyle {
    pub model_id: u32,
    pub build_id: u32,
    /// Micrometres between successive exposure points along a vector.
    pub point_distance_um: f64,
    /// Watts.
    pub laser_power: f64,
    /// Microseconds of dwell per exposure.
    pub point_exposure_time_us: f64,
}

/// A single discrete laser exposure: position plus deposited energy.
#[derive(Debug, Clone, Copy)]
pub struct ExposurePoint {
    pub position: Point2,
    pub energy: f64,
}

fn find_build_style<'a>(
    styles: &'a [BuildStyle],
    model_id: u32,
    build_id: u32,
) -> Option<&'a BuildStyle> {
    styles
        .iter()
        .find(|s| s.model_id == model_id && s.build_id == build_id)
}

/// Samples every geometry record in `layer` against the matching
/// `build_styles`. Hatch vectors are sampled from their far endpoint
/// stepping backward; contour edges are sampled from the first vertex
/// stepping forward.
pub fn sample_layer(
    layer: &Layer,
    build_styles: &[BuildStyle],
) -> Result<Vec<ExposurePoint>, ExposureError> {
    let mut points = Vec::new();
    for record in &layer.records {
        let (model_id, build_id) = match record {
            GeometryRecord::Contour(c) => (c.model_id, c.build_id),
            GeometryRecord::Hatch(h) => (h.model_id, h.build_id),
        };
        let style = find_build_style(build_styles, model_id, build_id).ok_or(ExposureError {
            model_id,
            build_id,
        })?;
        if style.point_distance_um < 1.0 {
            return Err(ExposureError {
                model_id,
                build_id,
            });
        }

        let point_distance_mm = style.point_distance_um * 1e-3;
        let energy = style.laser_power * (style.point_exposure_time_us * 1e-6);

        match record {
            GeometryRecord::Hatch(h) => {
                for pair in h.points.chunks_exact(2) {
                    points.extend(sample_hatch_vector(pair[0], pair[1], point_distance_mm, energy));
                }
            }
            GeometryRecord::Contour(c) => {
                for window in c.polyline.0.windows(2) {
                    points.extend(sample_contour_edge(
                        window[0],
                        window[1],
                        point_distance_mm,
                        energy,
                    ));
                }
            }
        }
    }
    Ok(points)
}

fn sample_hatch_vector(p0: Point2, p1: Point2, point_distance_mm: f64, energy: f64) -> Vec<ExposurePoint> {
    let delta_x = p1.x - p0.x;
    let delta_y = p1.y - p0.y;
    let len = (delta_x * delta_x + delta_y * delta_y).sqrt();
    if len <= 0.0 {
        return Vec::new();
    }
    let dir = (-delta_x / len, -delta_y / len);
    let num_points = (len / point_distance_mm).ceil() as usize;
    (0..num_points)
        .map(|i| {
            let step = point_distance_mm * i as f64;
            ExposurePoint {
                position: geo_types::coord! {
                    x: p1.x + step * dir.0,
                    y: p1.y + step * dir.1,
                },
                energy,
            }
        })
        .collect()
}

fn sample_contour_edge(p0: Point2, p1: Point2, point_distance_mm: f64, energy: f64) -> Vec<ExposurePoint> {
    let delta_x = p1.x - p0.x;
    let delta_y = p1.y - p0.y;
    let len = (delta_x * delta_x + delta_y * delta_y).sqrt();
    if len <= 0.0 {
        return Vec::new();
    }
    let dir = (delta_x / len, delta_y / len);
    let num_points = (len / point_distance_mm).ceil() as usize;
    (0..num_points)
        .map(|i| {
            let step = point_distance_mm * i as f64;
            ExposurePoint {
                position: geo_types::coord! {
                    x: p0.x + step * dir.0,
                    y: p0.y + step * dir.1,
                },
                energy,
            }
        })
        .collect()
}
