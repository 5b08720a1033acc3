//! ECM IC - extracellular-matrix initial conditions for agent-based simulations
//!
//! Rasterizes a layered `ic_ecm` XML description (whole-domain, elliptical
//! ring, elliptical disc and ellipse-with-shell patches) onto a voxel grid
//! and exports one row per voxel with density and a 2D fiber orientation.

pub mod compositor;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod pipeline;
pub mod template;

pub use compositor::{LayerCompositor, PatchResolver};
pub use config::DomainConfig;
pub use document::{
    load_document, parse_document, EcmDocument, EcmSpec, Layer, OrientationMode, Patch, PatchCollection,
    PatchKind,
};
pub use error::{EcmError, Result};
pub use geometry::{EllipseGeometry, EllipseRegion, FiberOrientationSolver};
pub use grid::{VoxelGrid, VoxelRow};
pub use pipeline::{compose, generate, generate_grid, GenerateOptions, GenerationSummary};
pub use template::{template_document, write_template, TemplateVariant};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
