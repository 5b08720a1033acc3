//! CSV export of the voxel table consumed by the agent-based simulation.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::grid::{VoxelGrid, VoxelRow};

/// Column order of the exported table
pub const CSV_HEADER: [&str; 6] = [
    "x",
    "y",
    "z",
    "ecm_density",
    "ecm_orientation_x",
    "ecm_orientation_y",
];

/// One exported voxel
#[derive(Debug, Clone, Serialize)]
pub struct VoxelRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub ecm_density: f64,
    pub ecm_orientation_x: f64,
    pub ecm_orientation_y: f64,
}

impl From<VoxelRow> for VoxelRecord {
    fn from(row: VoxelRow) -> Self {
        Self {
            x: row.x,
            y: row.y,
            z: row.z,
            ecm_density: row.density,
            ecm_orientation_x: row.orientation.x,
            ecm_orientation_y: row.orientation.y,
        }
    }
}

/// Write the grid as CSV (header plus one record per voxel, in row order)
pub fn write_grid_csv<W: Write>(grid: &VoxelGrid, writer: W) -> crate::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in grid.rows() {
        writer.serialize(VoxelRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the grid to `path`
///
/// Data goes to a sibling temporary file first and is renamed into place
/// once complete, so a failed export leaves no partial table behind.
pub fn export_grid_csv(grid: &VoxelGrid, path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);

    let written = File::create(&tmp_path)
        .map_err(anyhow::Error::from)
        .and_then(|file| write_grid_csv(grid, file).map_err(anyhow::Error::from));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("writing {}", tmp_path.display()));
    }

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("moving {} to {}", tmp_path.display(), path.display()))?;

    log::info!("CSV export completed: {} ({} rows)", path.display(), grid.len());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainConfig;

    #[test]
    fn test_header_and_row_order() {
        let mut grid = VoxelGrid::build(&DomainConfig {
            x_min: 0.0,
            x_max: 20.0,
            dx: 10.0,
            y_min: 0.0,
            y_max: 10.0,
            dy: 10.0,
            z0: 2.5,
        })
        .unwrap();
        grid.fill_where(|_| true, 0.5, |p| glam::DVec2::new(p.x / 100.0, 0.0));

        let mut buffer = Vec::new();
        write_grid_csv(&grid, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(lines[1], "5.0,5.0,2.5,0.5,0.05,0.0");
        assert_eq!(lines[2], "15.0,5.0,2.5,0.5,0.15,0.0");
        assert_eq!(lines.len(), 3);
    }
}
