//! Export of the composited voxel table.

mod csv_export;

pub use csv_export::{export_grid_csv, write_grid_csv, VoxelRecord, CSV_HEADER};
