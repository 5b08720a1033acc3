//! Layer compositing.
//!
//! Inside a layer every voxel may be claimed once: patches and patch
//! collections are merged without overwrite. Layers are then merged in
//! ascending ID order with overwrite, so higher layers win.

use crate::document::{Layer, PatchCollection};
use crate::error::{EcmError, Result};
use crate::geometry::FiberOrientationSolver;
use crate::grid::{MergeConflict, VoxelGrid};

use super::PatchResolver;

fn overlap(layer: i64, source_patch: String, conflict: MergeConflict) -> EcmError {
    EcmError::OverlapViolation {
        layer,
        source_patch,
        count: conflict.count,
        x: conflict.first.x,
        y: conflict.first.y,
    }
}

/// Merges layers of patches into the final grid
pub struct LayerCompositor {
    resolver: PatchResolver,
}

impl LayerCompositor {
    pub fn new(solver: FiberOrientationSolver) -> Self {
        Self {
            resolver: PatchResolver::new(solver),
        }
    }

    /// Rasterize every patch of a collection; patches may not overlap
    pub fn resolve_patch_collection(
        &mut self,
        layer: i64,
        collection: &PatchCollection,
        domain: &VoxelGrid,
    ) -> Result<VoxelGrid> {
        let mut scratch = domain.empty_like();
        for patch in &collection.patches {
            let patch_grid = self.resolver.resolve(patch, layer, domain)?;
            patch_grid
                .merge_into(&mut scratch, false)
                .map_err(|conflict| overlap(layer, patch.label(), conflict))?;
        }
        Ok(scratch)
    }

    /// Rasterize a layer; overlap is checked across all its collections
    pub fn resolve_layer(&mut self, layer: &Layer, domain: &VoxelGrid) -> Result<VoxelGrid> {
        let mut layer_grid = domain.empty_like();
        for collection in &layer.collections {
            let collection_grid = self.resolve_patch_collection(layer.id, collection, domain)?;
            collection_grid
                .merge_into(&mut layer_grid, false)
                .map_err(|conflict| {
                    overlap(
                        layer.id,
                        format!("patch_collection '{}'", collection.kind),
                        conflict,
                    )
                })?;
        }
        log::debug!(
            "Layer {}: {} patch(es), {} voxel(s) defined",
            layer.id,
            layer.patch_count(),
            layer_grid.defined_count()
        );
        Ok(layer_grid)
    }

    /// Composite all layers in ascending ID order and require full coverage
    pub fn resolve_all(&mut self, layers: &[Layer], domain: &VoxelGrid) -> Result<VoxelGrid> {
        let mut ordered: Vec<&Layer> = layers.iter().collect();
        ordered.sort_by_key(|layer| layer.id);

        let mut accumulator = domain.empty_like();
        for layer in ordered {
            let layer_grid = self.resolve_layer(layer, domain)?;
            layer_grid
                .merge_into(&mut accumulator, true)
                .map_err(|conflict| overlap(layer.id, format!("layer {}", layer.id), conflict))?;
        }

        if let Some(gap) = accumulator.undefined_rows() {
            return Err(EcmError::IncompleteCoverage {
                count: gap.count,
                x: gap.first.x,
                y: gap.first.y,
            });
        }

        log::info!(
            "Composited {} layer(s) onto {} voxel(s)",
            layers.len(),
            accumulator.len()
        );
        Ok(accumulator)
    }
}
