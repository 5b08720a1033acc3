//! Voxel grid with per-row density, orientation and a "defined" mask.
//!
//! Rows are voxel centers in generation order with x varying fastest:
//! row k sits at (x[k % nx], y[k / nx]). The order is fixed at build time and
//! every grid derived from the same domain shares the same coordinates.

use std::sync::Arc;

use glam::DVec2;

use crate::config::DomainConfig;
use crate::error::Result;

/// Bias subtracted before rounding the voxel count up, so an exact multiple
/// of the spacing does not gain an extra voxel from rounding noise
const AXIS_COUNT_EPSILON: f64 = 1e-10;

/// One voxel of the output table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub density: f64,
    pub orientation: DVec2,
    pub defined: bool,
}

/// Rows that already carried a definition when a no-overwrite merge ran
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeConflict {
    /// Number of clashing rows
    pub count: usize,
    /// Center of the first clashing row
    pub first: DVec2,
}

/// Voxel centers along one axis: min + (i + 0.5) * d
fn axis_centers(min: f64, max: f64, d: f64) -> Vec<f64> {
    let n = ((max - min) / d - AXIS_COUNT_EPSILON).ceil().max(1.0) as usize;
    (0..n).map(|i| min + (i as f64 + 0.5) * d).collect()
}

/// Rasterized ECM fields over the domain
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    nx: usize,
    ny: usize,
    z0: f64,
    /// Voxel centers, shared between grids of the same domain
    centers: Arc<[DVec2]>,
    density: Vec<f64>,
    orientation: Vec<DVec2>,
    defined: Vec<bool>,
}

impl VoxelGrid {
    /// Build an all-undefined grid covering the domain
    pub fn build(domain: &DomainConfig) -> Result<Self> {
        domain.validate()?;

        let xs = axis_centers(domain.x_min, domain.x_max, domain.dx);
        let ys = axis_centers(domain.y_min, domain.y_max, domain.dy);
        let (nx, ny) = (xs.len(), ys.len());

        let centers: Arc<[DVec2]> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| DVec2::new(x, y)))
            .collect();

        log::debug!("Built {}x{} voxel grid ({} rows)", nx, ny, centers.len());

        let n = centers.len();
        Ok(Self {
            nx,
            ny,
            z0: domain.z0,
            centers,
            density: vec![0.0; n],
            orientation: vec![DVec2::ZERO; n],
            defined: vec![false; n],
        })
    }

    /// Fresh all-undefined grid with the same coordinates
    pub fn empty_like(&self) -> Self {
        let n = self.len();
        Self {
            nx: self.nx,
            ny: self.ny,
            z0: self.z0,
            centers: Arc::clone(&self.centers),
            density: vec![0.0; n],
            orientation: vec![DVec2::ZERO; n],
            defined: vec![false; n],
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Voxel centers in row order
    pub fn centers(&self) -> &[DVec2] {
        &self.centers
    }

    pub fn row(&self, index: usize) -> VoxelRow {
        let center = self.centers[index];
        VoxelRow {
            x: center.x,
            y: center.y,
            z: self.z0,
            density: self.density[index],
            orientation: self.orientation[index],
            defined: self.defined[index],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = VoxelRow> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// Number of rows with a definition
    pub fn defined_count(&self) -> usize {
        self.defined.iter().filter(|&&d| d).count()
    }

    /// Count and first center of undefined rows, if any
    pub fn undefined_rows(&self) -> Option<MergeConflict> {
        let mut undefined = self
            .defined
            .iter()
            .zip(self.centers.iter())
            .filter(|(&d, _)| !d)
            .map(|(_, &c)| c);
        let first = undefined.next()?;
        Some(MergeConflict {
            count: 1 + undefined.count(),
            first,
        })
    }

    /// Assign density and orientation to every row whose center satisfies
    /// `predicate`, marking those rows defined
    ///
    /// `orientation` is evaluated once per selected row, in row order.
    /// Returns the number of rows filled.
    pub fn fill_where<P, O>(&mut self, mut predicate: P, density: f64, mut orientation: O) -> usize
    where
        P: FnMut(DVec2) -> bool,
        O: FnMut(DVec2) -> DVec2,
    {
        let mut filled = 0;
        for (i, &center) in self.centers.iter().enumerate() {
            if predicate(center) {
                self.density[i] = density;
                self.orientation[i] = orientation(center);
                self.defined[i] = true;
                filled += 1;
            }
        }
        filled
    }

    /// Copy every defined row of `self` into `accumulator`
    ///
    /// Without `allow_overwrite`, no row defined here may already be defined in
    /// the accumulator; on a clash nothing is copied and the clash is reported.
    /// Returns the number of rows copied.
    pub fn merge_into(&self, accumulator: &mut VoxelGrid, allow_overwrite: bool) -> std::result::Result<usize, MergeConflict> {
        debug_assert!(Arc::ptr_eq(&self.centers, &accumulator.centers) || self.centers == accumulator.centers);

        if !allow_overwrite {
            let mut clashes = self
                .defined
                .iter()
                .zip(accumulator.defined.iter())
                .enumerate()
                .filter(|(_, (&mine, &theirs))| mine && theirs)
                .map(|(i, _)| self.centers[i]);
            if let Some(first) = clashes.next() {
                return Err(MergeConflict {
                    count: 1 + clashes.count(),
                    first,
                });
            }
        }

        let mut copied = 0;
        for i in 0..self.len() {
            if self.defined[i] {
                accumulator.density[i] = self.density[i];
                accumulator.orientation[i] = self.orientation[i];
                accumulator.defined[i] = true;
                copied += 1;
            }
        }
        Ok(copied)
    }
}
