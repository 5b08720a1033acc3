//! End-to-end generation: document → composited grid → CSV table.
//!
//! The grid is fully composited before anything is written, so a failing run
//! never produces an output file.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::compositor::LayerCompositor;
use crate::config::DomainConfig;
use crate::document::{load_document, parse_document, EcmDocument};
use crate::error::Result;
use crate::export::export_grid_csv;
use crate::geometry::FiberOrientationSolver;
use crate::grid::VoxelGrid;

/// Options for a generation run
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Seed for random fiber directions; entropy when absent
    pub seed: Option<u64>,
}

impl GenerateOptions {
    fn solver(&self) -> FiberOrientationSolver {
        match self.seed {
            Some(seed) => FiberOrientationSolver::with_seed(seed),
            None => FiberOrientationSolver::new(),
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub nx: usize,
    pub ny: usize,
    pub rows: usize,
    pub layers: usize,
    pub output: PathBuf,
}

/// Composite a parsed document onto the domain
pub fn compose(document: &EcmDocument, domain: &DomainConfig, options: GenerateOptions) -> Result<VoxelGrid> {
    let domain_grid = VoxelGrid::build(domain)?;
    log::info!(
        "Domain grid: {} x {} = {} voxels",
        domain_grid.nx(),
        domain_grid.ny(),
        domain_grid.len()
    );

    let mut compositor = LayerCompositor::new(options.solver());
    compositor.resolve_all(&document.layers, &domain_grid)
}

/// Parse and composite an in-memory `ic_ecm` document
pub fn generate_grid(xml: &str, domain: &DomainConfig, options: GenerateOptions) -> Result<VoxelGrid> {
    let document = parse_document(xml)?;
    compose(&document, domain, options)
}

/// Read `xml_path`, composite it onto `domain` and write the table to `output_path`
pub fn generate(
    xml_path: &Path,
    output_path: &Path,
    domain: &DomainConfig,
    options: GenerateOptions,
) -> anyhow::Result<GenerationSummary> {
    let document = load_document(xml_path)
        .with_context(|| format!("reading ECM document {}", xml_path.display()))?;
    let grid = compose(&document, domain, options)
        .with_context(|| format!("compositing {}", xml_path.display()))?;
    let output = export_grid_csv(&grid, output_path)?;

    Ok(GenerationSummary {
        nx: grid.nx(),
        ny: grid.ny(),
        rows: grid.len(),
        layers: document.layers.len(),
        output,
    })
}
