//! Rotated ellipse with an optional ring of constant thickness.
//!
//! The local frame puts the ellipse center at the origin with the semi-axes
//! along u and v:
//! (u/a)² + (v/b)² ≤ 1            inner disc
//! (u/(a+t))² + (v/(b+t))² ≤ 1    outer boundary of the ring

use glam::{DMat2, DVec2};

use crate::error::{EcmError, Result};

/// Region of the plane relative to an [`EllipseGeometry`]
///
/// Boundary points resolve toward the interior: `Inside` wins over
/// `InThickness`, which wins over `Outside`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EllipseRegion {
    Inside,
    InThickness,
    Outside,
}

/// Ellipse functional (u/a)² + (v/b)²
#[inline]
pub fn ellipse_functional(u: f64, v: f64, a: f64, b: f64) -> f64 {
    (u / a).powi(2) + (v / b).powi(2)
}

/// Immutable rotated ellipse
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseGeometry {
    center: DVec2,
    semi_axes: DVec2,
    rotation_rad: f64,
    thickness: f64,
    /// Local → global rotation
    forward: DMat2,
    /// Global → local rotation
    inverse: DMat2,
}

impl EllipseGeometry {
    /// Build an ellipse, rejecting non-positive semi-axes and negative thickness
    ///
    /// # Arguments
    /// * `center` - center in global coordinates
    /// * `semi_axes` - (a, b) along the local u and v axes
    /// * `rotation_rad` - counter-clockwise rotation of the local frame
    /// * `thickness` - ring width added to both semi-axes
    pub fn new(center: DVec2, semi_axes: DVec2, rotation_rad: f64, thickness: f64) -> Result<Self> {
        if !center.is_finite() || !semi_axes.is_finite() || !rotation_rad.is_finite() {
            return Err(EcmError::InvalidGeometry {
                context: "ellipse".to_string(),
                reason: format!(
                    "non-finite parameter (center={center}, semi-axes={semi_axes}, rotation={rotation_rad})"
                ),
            });
        }
        if semi_axes.x <= 0.0 || semi_axes.y <= 0.0 {
            return Err(EcmError::InvalidGeometry {
                context: "ellipse".to_string(),
                reason: format!("semi-axes must be positive, got a={}, b={}", semi_axes.x, semi_axes.y),
            });
        }
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(EcmError::InvalidGeometry {
                context: "ellipse".to_string(),
                reason: format!("thickness must be non-negative, got {thickness}"),
            });
        }

        let forward = DMat2::from_angle(rotation_rad);
        Ok(Self {
            center,
            semi_axes,
            rotation_rad,
            thickness,
            forward,
            inverse: forward.transpose(),
        })
    }

    /// Same center, axes and rotation with a different ring thickness
    pub fn with_thickness(&self, thickness: f64) -> Result<Self> {
        Self::new(self.center, self.semi_axes, self.rotation_rad, thickness)
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn semi_axes(&self) -> DVec2 {
        self.semi_axes
    }

    pub fn rotation_rad(&self) -> f64 {
        self.rotation_rad
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Global point → local frame (translate by -center, rotate by -rotation)
    #[inline]
    pub fn to_local(&self, p: DVec2) -> DVec2 {
        self.inverse * (p - self.center)
    }

    /// Local point → global frame
    #[inline]
    pub fn from_local(&self, q: DVec2) -> DVec2 {
        self.forward * q + self.center
    }

    /// Rotate a local direction into the global frame (no translation)
    #[inline]
    pub fn direction_to_global(&self, d: DVec2) -> DVec2 {
        self.forward * d
    }

    /// Classify a global point as inside, in the ring, or outside
    pub fn classify(&self, p: DVec2) -> EllipseRegion {
        let q = self.to_local(p);
        let (a, b) = (self.semi_axes.x, self.semi_axes.y);
        if ellipse_functional(q.x, q.y, a, b) <= 1.0 {
            EllipseRegion::Inside
        } else if ellipse_functional(q.x, q.y, a + self.thickness, b + self.thickness) <= 1.0 {
            EllipseRegion::InThickness
        } else {
            EllipseRegion::Outside
        }
    }

    /// Inner disc membership, boundary inclusive
    pub fn inside_disc(&self, p: DVec2) -> bool {
        let q = self.to_local(p);
        ellipse_functional(q.x, q.y, self.semi_axes.x, self.semi_axes.y) <= 1.0
    }

    /// Ring membership: outside the inner disc but within the thickness
    pub fn inside_ring(&self, p: DVec2) -> bool {
        self.classify(p) == EllipseRegion::InThickness
    }
}
