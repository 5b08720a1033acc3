//! Rasterization and compositing of patches and layers.
//!
//! Control flow:
//! 1. Each patch is rasterized onto its own scratch grid by [`PatchResolver`]
//! 2. Scratch grids within a layer merge without overwrite (overlap is an error)
//! 3. Layer grids merge in ascending ID order with overwrite
//! 4. Every voxel must be defined at the end

mod layer;
mod patch;

pub use layer::LayerCompositor;
pub use patch::PatchResolver;
