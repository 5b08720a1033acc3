//! Voxel lattice holding the rasterized ECM fields.

mod voxel_grid;

pub use voxel_grid::{MergeConflict, VoxelGrid, VoxelRow};
