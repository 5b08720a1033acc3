//! Configuration module for the simulation domain.
//!
//! The domain record fixes the voxel lattice every layer is rasterized onto.

mod domain;

pub use domain::DomainConfig;
