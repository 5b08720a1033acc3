//! Rasterization of a single patch onto a scratch grid.

use glam::DVec2;

use crate::document::{EcmSpec, EcmTarget, OrientationMode, Patch};
use crate::error::Result;
use crate::geometry::{EllipseGeometry, EllipseRegion, FiberOrientationSolver};
use crate::grid::VoxelGrid;

/// Turns patches into filled scratch grids
pub struct PatchResolver {
    solver: FiberOrientationSolver,
}

impl PatchResolver {
    pub fn new(solver: FiberOrientationSolver) -> Self {
        Self { solver }
    }

    /// Rasterize one patch onto an empty grid shaped like `domain`
    ///
    /// `layer` is only used for error context.
    pub fn resolve(&mut self, patch: &Patch, layer: i64, domain: &VoxelGrid) -> Result<VoxelGrid> {
        let mut grid = domain.empty_like();
        let context = format!("layer {layer}, {}", patch.label());

        let filled = match patch {
            Patch::Everywhere { ecm, .. } => {
                self.fill(&mut grid, EcmTarget::Everywhere, ecm, None, |_| true, &context)?
            }
            Patch::Ellipse { geometry, ecm, .. } => self.fill(
                &mut grid,
                EcmTarget::Ring,
                ecm,
                Some(geometry),
                |p| geometry.inside_ring(p),
                &context,
            )?,
            Patch::EllipticalDisc { geometry, ecm, .. } => self.fill(
                &mut grid,
                EcmTarget::Disc,
                ecm,
                Some(geometry),
                |p| geometry.inside_disc(p),
                &context,
            )?,
            Patch::EllipseWithShell {
                geometry,
                interior,
                shell,
                exterior,
                ..
            } => {
                let inner = geometry.with_thickness(0.0)?;
                let mut filled = self.fill(
                    &mut grid,
                    EcmTarget::Interior,
                    interior,
                    Some(&inner),
                    |p| inner.inside_disc(p),
                    &format!("{context} <interior>"),
                )?;
                filled += self.fill(
                    &mut grid,
                    EcmTarget::Shell,
                    shell,
                    Some(geometry),
                    |p| geometry.inside_ring(p),
                    &format!("{context} <shell>"),
                )?;
                if let Some(exterior) = exterior {
                    filled += self.fill(
                        &mut grid,
                        EcmTarget::Exterior,
                        exterior,
                        Some(geometry),
                        |p| geometry.classify(p) == EllipseRegion::Outside,
                        &format!("{context} <exterior>"),
                    )?;
                }
                filled
            }
        };

        log::debug!("{context}: {filled} voxel(s) defined");
        Ok(grid)
    }

    /// Fill the rows selected by `predicate` with `ecm`
    fn fill<P>(
        &mut self,
        grid: &mut VoxelGrid,
        target: EcmTarget,
        ecm: &EcmSpec,
        ellipse: Option<&EllipseGeometry>,
        predicate: P,
        context: &str,
    ) -> Result<usize>
    where
        P: FnMut(DVec2) -> bool,
    {
        target.require(ecm.orientation, context)?;

        let solver = &mut self.solver;
        let anisotropy = ecm.anisotropy;
        let filled = match (ecm.orientation, ellipse) {
            (OrientationMode::Random, _) => {
                grid.fill_where(predicate, ecm.density, |_| solver.random(anisotropy))
            }
            (OrientationMode::Perpendicular, Some(e)) => {
                grid.fill_where(predicate, ecm.density, |p| anisotropy * solver.perpendicular(e, p))
            }
            (OrientationMode::Parallel, Some(e)) => {
                grid.fill_where(predicate, ecm.density, |p| anisotropy * solver.parallel(e, p))
            }
            (mode, None) => return Err(target.orientation_error(mode.as_str(), context)),
        };
        Ok(filled)
    }
}
