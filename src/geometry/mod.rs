//! Geometry module for ECM patch regions.
//!
//! Contains the rotated-ellipse descriptor used by every elliptical patch
//! and the fiber-orientation solver that works in its local frame.

mod ellipse;
mod orientation;

pub use ellipse::{ellipse_functional, EllipseGeometry, EllipseRegion};
pub use orientation::{closest_boundary_angle, FiberOrientationSolver};
