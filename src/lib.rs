//! # lpbf-hatch-core
//!
//! Contour offsetting and hatch infill generation for laser powder-bed
//! fusion (L-PBF) slice processing. Given one or more closed polygonal
//! regions for a build layer, produces the scan trajectory the laser will
//! follow: offset contour rings traced around the boundary, and an infill
//! pattern of parallel scan segments clipped to the offset interior.
//!
//! Slicing a 3D mesh into polygon slices, machine-file I/O, build-style
//! modelling, visualisation and exposure-point sampling are treated as
//! external collaborators; only [`exposure`] is provided here, as a
//! decoupled auxiliary utility rather than something the core calls.

pub mod clip;
pub mod errors;
pub mod exposure;
pub mod geometry;
pub mod hatch;
pub mod recipe;
pub mod region;
pub mod sort;

pub mod prelude {
    pub use crate::clip::ClipEngine;
    pub use crate::errors::{ConfigError, ExposureError};
    pub use crate::geometry::{
        ContourGeometry, ContourKind, GeometryRecord, HatchGeometry, Layer, Point2, PolygonRegion,
        Polyline, TaggedPolyline, TaggedSegment,
    };
    pub use crate::hatch::{HatchStrategy, IslandHatcher, StripeHatcher, UniformHatcher};
    pub use crate::recipe::{HatchRecipe, HatchRecipeBuilder, HatchRecipeConfig};
    pub use crate::region::InnerRegion;
    pub use crate::sort::{AlternateSort, IdentitySort, LinearSort, SortMethod, SortStrategy};
}
