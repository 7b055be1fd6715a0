//! Composes offsets, contour extraction, hatch generation, clipping,
//! ordering and an optional sort strategy into a final [`Layer`] of
//! geometry. Configured once per recipe instance, invoked once per slice.

use rayon::prelude::*;

use crate::clip::ClipEngine;
use crate::errors::ConfigError;
use crate::geometry::{
    ContourGeometry, ContourKind, GeometryRecord, HatchGeometry, Layer, Point2, PolygonRegion,
};
use crate::hatch::{canonicalize_angle, HatchStrategy, UniformHatcher};
use crate::sort::SortStrategy;

pub struct HatchRecipeConfig {
    pub num_outer_contours: u32,
    pub num_inner_contours: u32,
    pub spot_compensation: f64,
    pub contour_offset: f64,
    pub volume_offset_hatch: f64,
    pub hatch_distance: f64,
    pub hatch_angle_deg: f64,
    pub layer_angle_increment_deg: f64,
    pub scan_contour_first: bool,
    pub hatching_enabled: bool,
}

impl Default for HatchRecipeConfig {
    fn default() -> Self {
        Self {
            num_outer_contours: 1,
            num_inner_contours: 0,
            spot_compensation: 0.0,
            contour_offset: 0.1,
            volume_offset_hatch: 0.0,
            hatch_distance: 0.1,
            hatch_angle_deg: 0.0,
            layer_angle_increment_deg: 0.0,
            scan_contour_first: true,
            hatching_enabled: true,
        }
    }
}

pub struct HatchRecipeBuilder {
    config: HatchRecipeConfig,
    strategy: Box<dyn HatchStrategy>,
    sort_strategy: Option<Box<dyn SortStrategy>>,
}

impl Default for HatchRecipeBuilder {
    fn default() -> Self {
        Self {
            config: HatchRecipeConfig::default(),
            strategy: Box::new(UniformHatcher),
            sort_strategy: None,
        }
    }
}

impl HatchRecipeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_outer_contours(mut self, n: u32) -> Self {
        self.config.num_outer_contours = n;
        self
    }

    pub fn num_inner_contours(mut self, n: u32) -> Self {
        self.config.num_inner_contours = n;
        self
    }

    pub fn spot_compensation(mut self, v: f64) -> Self {
        self.config.spot_compensation = v;
        self
    }

    pub fn contour_offset(mut self, v: f64) -> Self {
        self.config.contour_offset = v;
        self
    }

    pub fn volume_offset_hatch(mut self, v: f64) -> Self {
        self.config.volume_offset_hatch = v;
        self
    }

    pub fn hatch_distance(mut self, v: f64) -> Self {
        self.config.hatch_distance = v;
        self
    }

    pub fn hatch_angle_deg(mut self, v: f64) -> Self {
        self.config.hatch_angle_deg = v;
        self
    }

    pub fn layer_angle_increment_deg(mut self, v: f64) -> Self {
        self.config.layer_angle_increment_deg = v;
        self
    }

    pub fn scan_contour_first(mut self, v: bool) -> Self {
        self.config.scan_contour_first = v;
        self
    }

    pub fn hatching_enabled(mut self, v: bool) -> Self {
        self.config.hatching_enabled = v;
        self
    }

    pub fn strategy(mut self, strategy: Box<dyn HatchStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn sort_strategy(mut self, strategy: Box<dyn SortStrategy>) -> Self {
        self.sort_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<HatchRecipe, ConfigError> {
        if self.config.hatch_distance <= 0.0 {
            return Err(ConfigError::NonPositiveSpacing);
        }
        if !(-180.0..=180.0).contains(&self.config.hatch_angle_deg) {
            return Err(ConfigError::InvalidAngle);
        }
        Ok(HatchRecipe {
            config: self.config,
            strategy: self.strategy,
            sort_strategy: self.sort_strategy,
        })
    }
}

/// A configured recipe. Owns no persistent state between slices except what
/// the caller passes explicitly (`layer_index`), so layer-parallel batch
/// drivers can run independent instances safely.
pub struct HatchRecipe {
    config: HatchRecipeConfig,
    strategy: Box<dyn HatchStrategy>,
    sort_strategy: Option<Box<dyn SortStrategy>>,
}

impl HatchRecipe {
    pub fn builder() -> HatchRecipeBuilder {
        HatchRecipeBuilder::new()
    }

    /// Runs the single-slice operation described in the composition
    /// algorithm: offset chain, hatch generation, clip, sort, assemble.
    pub fn hatch(
        &self,
        boundary: &PolygonRegion,
        clip_engine: &ClipEngine,
        layer_id: u64,
        layer_index: u64,
    ) -> Layer {
        let mut layer = Layer::new(layer_id, layer_index);
        if boundary.is_empty() {
            return layer;
        }

        const EPS: f64 = 1e-6;
        let mut d = -self.config.spot_compensation - EPS;
        let mut contours = Vec::new();
        let mut any_contours = false;

        for i in 0..self.config.num_outer_contours {
            if i > 0 {
                d -= self.config.contour_offset;
            }
            for ring in clip_engine.offset(&boundary.rings, d) {
                contours.push(ContourGeometry::new(ring, ContourKind::Outer));
                any_contours = true;
            }
        }

        // Ambiguous branch, preserved verbatim: the first inner contour
        // only skips its decrement when there were no outer contours.
        for i in 0..self.config.num_inner_contours {
            let skip_decrement = self.config.num_outer_contours == 0 && i == 0;
            if !skip_decrement {
                d -= self.config.contour_offset;
            }
            for ring in clip_engine.offset(&boundary.rings, d) {
                contours.push(ContourGeometry::new(ring, ContourKind::Inner));
                any_contours = true;
            }
        }

        if any_contours {
            d -= self.config.volume_offset_hatch;
        }
        let interior = PolygonRegion {
            rings: clip_engine.offset(&boundary.rings, d),
        };

        let mut hatch_records = Vec::new();
        if self.config.hatching_enabled && !interior.is_empty() {
            if let Some(hatch_geometry) =
                self.generate_hatch_geometry(&interior, clip_engine, layer_index)
            {
                hatch_records.push(GeometryRecord::Hatch(hatch_geometry));
            }
        }

        let contour_records: Vec<GeometryRecord> =
            contours.into_iter().map(GeometryRecord::Contour).collect();

        if self.config.scan_contour_first {
            layer.records.extend(contour_records);
            layer.records.extend(hatch_records);
        } else {
            layer.records.extend(hatch_records);
            layer.records.extend(contour_records);
        }
        layer
    }

    /// Hatches several disjoint regions of the same layer in parallel, the
    /// only place this crate reaches for `rayon`, per the single-threaded-
    /// per-layer concurrency model. Each task constructs its own
    /// `ClipEngine` rather than sharing one across threads.
    pub fn hatch_regions_parallel(
        &self,
        regions: &[PolygonRegion],
        layer_id: u64,
        layer_index: u64,
    ) -> Vec<Layer> {
        regions
            .par_iter()
            .map(|region| {
                let engine = ClipEngine::new();
                self.hatch(region, &engine, layer_id, layer_index)
            })
            .collect()
    }

    fn generate_hatch_geometry(
        &self,
        interior: &PolygonRegion,
        clip_engine: &ClipEngine,
        layer_index: u64,
    ) -> Option<HatchGeometry> {
        let raw_angle =
            self.config.hatch_angle_deg + self.config.layer_angle_increment_deg * layer_index as f64;
        let theta = canonicalize_angle(raw_angle);

        let segments = self
            .strategy
            .generate_hatching(interior, self.config.hatch_distance, theta);
        if segments.is_empty() {
            return None;
        }

        let mut clipped = clip_engine.clip_lines(interior, &segments);
        clipped.sort_by_key(|tp| tp.tag);

        let mut pairs: Vec<(Point2, Point2)> = clipped
            .iter()
            .filter_map(|tp| Some((*tp.points.first()?, *tp.points.last()?)))
            .collect();

        if let Some(sort_strategy) = &self.sort_strategy {
            pairs = sort_strategy.sort(pairs);
        }

        if pairs.is_empty() {
            None
        } else {
            Some(HatchGeometry::from_pairs(pairs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hatch::{IslandHatcher, StripeHatcher};
    use geo_types::{coord, LineString};

    fn square(side: f64) -> PolygonRegion {
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

    fn annulus() -> PolygonRegion {
        PolygonRegion::new(
            LineString::new(vec![
                coord! {x: 0.0, y: 0.0},
                coord! {x: 10.0, y: 0.0},
                coord! {x: 10.0, y: 10.0},
                coord! {x: 0.0, y: 10.0},
                coord! {x: 0.0, y: 0.0},
            ]),
            vec![LineString::new(vec![
                coord! {x: 4.0, y: 4.0},
                coord! {x: 6.0, y: 4.0},
                coord! {x: 6.0, y: 6.0},
                coord! {x: 4.0, y: 6.0},
                coord! {x: 4.0, y: 4.0},
            ])],
        )
    }

    #[test]
    fn rejects_non_positive_hatch_distance() {
        let err = HatchRecipe::builder()
            .hatch_distance(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveSpacing));
    }

    #[test]
    fn rejects_out_of_range_angle() {
        let err = HatchRecipe::builder()
            .hatch_distance(1.0)
            .hatch_angle_deg(200.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAngle));
    }

    #[test]
    fn unit_square_uniform_hatch_produces_even_flat_array() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(0)
            .num_inner_contours(0)
            .spot_compensation(0.0)
            .hatch_distance(1.0)
            .hatch_angle_deg(0.0)
            .layer_angle_increment_deg(0.0)
            .build()
            .expect("valid config");

        let engine = ClipEngine::new();
        let layer = recipe.hatch(&square(10.0), &engine, 0, 0);

        let hatch = layer
            .records
            .iter()
            .find_map(|r| match r {
                GeometryRecord::Hatch(h) => Some(h),
                _ => None,
            })
            .expect("a hatch record was produced");
        assert_eq!(hatch.points.len() % 2, 0);
        assert!(hatch.points.len() >= 18);
    }

    #[test]
    fn contour_offset_chain_produces_three_rings() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(2)
            .num_inner_contours(1)
            .spot_compensation(0.08)
            .contour_offset(0.1)
            .hatching_enabled(false)
            .hatch_distance(1.0)
            .build()
            .expect("valid config");

        let engine = ClipEngine::new();
        let layer = recipe.hatch(&square(10.0), &engine, 0, 0);

        let contours: Vec<&ContourGeometry> = layer
            .records
            .iter()
            .filter_map(|r| match r {
                GeometryRecord::Contour(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(contours.len(), 3);
        assert_eq!(contours[0].kind, ContourKind::Outer);
        assert_eq!(contours[1].kind, ContourKind::Outer);
        assert_eq!(contours[2].kind, ContourKind::Inner);
    }

    #[test]
    fn annulus_clips_hatches_around_hole() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(0)
            .num_inner_contours(0)
            .spot_compensation(0.0)
            .hatch_distance(0.5)
            .hatch_angle_deg(0.0)
            .build()
            .expect("valid config");

        let engine = ClipEngine::new();
        let layer = recipe.hatch(&annulus(), &engine, 0, 0);
        let hatch = layer
            .records
            .iter()
            .find_map(|r| match r {
                GeometryRecord::Hatch(h) => Some(h),
                _ => None,
            })
            .expect("a hatch record was produced");
        assert!(!hatch.points.is_empty());
    }

    #[test]
    fn stripe_strategy_plugs_into_recipe() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(0)
            .num_inner_contours(0)
            .hatch_distance(0.5)
            .hatch_angle_deg(0.0)
            .strategy(Box::new(
                StripeHatcher::new(3.0, 0.1, 0.5).expect("valid stripe config"),
            ))
            .build()
            .expect("valid config");

        let engine = ClipEngine::new();
        let layer = recipe.hatch(&square(10.0), &engine, 0, 0);
        assert!(layer.records.iter().any(|r| matches!(r, GeometryRecord::Hatch(_))));
    }

    #[test]
    fn island_strategy_plugs_into_recipe() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(0)
            .num_inner_contours(0)
            .hatch_distance(1.0)
            .hatch_angle_deg(0.0)
            .strategy(Box::new(
                IslandHatcher::new(5.0, 0.0, 0.0).expect("valid island config"),
            ))
            .build()
            .expect("valid config");

        let engine = ClipEngine::new();
        let layer = recipe.hatch(&square(10.0), &engine, 0, 0);
        assert!(layer.records.iter().any(|r| matches!(r, GeometryRecord::Hatch(_))));
    }

    #[test]
    fn hatch_regions_parallel_produces_one_layer_per_region() {
        let recipe = HatchRecipeBuilder::new()
            .num_outer_contours(0)
            .num_inner_contours(0)
            .hatch_distance(1.0)
            .build()
            .expect("valid config");

        let regions = vec![square(10.0), square(5.0)];
        let layers = recipe.hatch_regions_parallel(&regions, 0, 0);
        assert_eq!(layers.len(), 2);
        for layer in &layers {
            assert!(!layer.records.is_empty());
        }
    }

    #[test]
    fn empty_boundary_returns_empty_layer() {
        let recipe = HatchRecipeBuilder::new()
            .hatch_distance(1.0)
            .build()
            .expect("valid config");
        let engine = ClipEngine::new();
        let boundary = PolygonRegion { rings: vec![] };
        let layer = recipe.hatch(&boundary, &engine, 0, 0);
        assert!(layer.records.is_empty());
    }
}
