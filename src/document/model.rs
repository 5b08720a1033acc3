//! Typed form of an `ic_ecm` document.

use std::fmt;

use crate::error::{EcmError, Result};
use crate::geometry::EllipseGeometry;

/// Fiber orientation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrientationMode {
    Random,
    Parallel,
    Perpendicular,
}

impl OrientationMode {
    pub const ALL: [OrientationMode; 3] = [
        OrientationMode::Random,
        OrientationMode::Parallel,
        OrientationMode::Perpendicular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationMode::Random => "random",
            OrientationMode::Parallel => "parallel",
            OrientationMode::Perpendicular => "perpendicular",
        }
    }

    /// Case-insensitive lookup by document spelling
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region an ECM spec is applied to; fixes which orientation modes it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmTarget {
    /// Whole domain of an `everywhere` patch
    Everywhere,
    /// Ring of an `ellipse` patch
    Ring,
    /// Disc of an `elliptical_disc` patch
    Disc,
    /// Inner disc of an `ellipse_with_shell` patch
    Interior,
    /// Ring of an `ellipse_with_shell` patch
    Shell,
    /// Everything outside an `ellipse_with_shell` patch
    Exterior,
}

impl EcmTarget {
    pub fn allowed_orientations(&self) -> &'static [OrientationMode] {
        match self {
            EcmTarget::Ring | EcmTarget::Shell => &OrientationMode::ALL,
            EcmTarget::Everywhere | EcmTarget::Disc | EcmTarget::Interior | EcmTarget::Exterior => {
                &[OrientationMode::Random]
            }
        }
    }

    /// Check `mode` against the allowed set
    pub fn require(&self, mode: OrientationMode, context: &str) -> Result<()> {
        if self.allowed_orientations().contains(&mode) {
            Ok(())
        } else {
            Err(self.orientation_error(mode.as_str(), context))
        }
    }

    /// Error for an orientation value this target does not accept
    pub fn orientation_error(&self, found: &str, context: &str) -> EcmError {
        let allowed = self
            .allowed_orientations()
            .iter()
            .map(OrientationMode::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        EcmError::UnrecognizedOrientation {
            found: found.to_string(),
            context: format!("{context} ({self})"),
            allowed,
        }
    }
}

impl fmt::Display for EcmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EcmTarget::Everywhere => "everywhere",
            EcmTarget::Ring => "ellipse ring",
            EcmTarget::Disc => "elliptical disc",
            EcmTarget::Interior => "interior",
            EcmTarget::Shell => "shell",
            EcmTarget::Exterior => "exterior",
        };
        f.write_str(name)
    }
}

/// ECM attributes assigned to a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcmSpec {
    pub density: f64,
    pub orientation: OrientationMode,
    /// Magnitude given to the unit fiber direction
    pub anisotropy: f64,
}

impl EcmSpec {
    pub fn new(density: f64, orientation: OrientationMode, anisotropy: f64) -> Self {
        Self {
            density,
            orientation,
            anisotropy,
        }
    }
}

/// Value of a `patch_collection` `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Everywhere,
    Ellipse,
    EllipticalDisc,
    EllipseWithShell,
}

impl PatchKind {
    pub const ALL: [PatchKind; 4] = [
        PatchKind::Everywhere,
        PatchKind::Ellipse,
        PatchKind::EllipticalDisc,
        PatchKind::EllipseWithShell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchKind::Everywhere => "everywhere",
            PatchKind::Ellipse => "ellipse",
            PatchKind::EllipticalDisc => "elliptical_disc",
            PatchKind::EllipseWithShell => "ellipse_with_shell",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|kind| kind.as_str() == text)
    }

    /// Comma-separated list of every known type
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(PatchKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geometric region with its ECM attributes
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Whole domain, random orientation only
    Everywhere { id: i64, ecm: EcmSpec },
    /// Ring between the ellipse and its thickness offset
    Ellipse {
        id: i64,
        geometry: EllipseGeometry,
        ecm: EcmSpec,
    },
    /// Filled ellipse, random orientation only
    EllipticalDisc {
        id: i64,
        geometry: EllipseGeometry,
        ecm: EcmSpec,
    },
    /// Disc, ring and optionally the rest of the domain
    EllipseWithShell {
        id: i64,
        geometry: EllipseGeometry,
        interior: EcmSpec,
        shell: EcmSpec,
        exterior: Option<EcmSpec>,
    },
}

impl Patch {
    pub fn kind(&self) -> PatchKind {
        match self {
            Patch::Everywhere { .. } => PatchKind::Everywhere,
            Patch::Ellipse { .. } => PatchKind::Ellipse,
            Patch::EllipticalDisc { .. } => PatchKind::EllipticalDisc,
            Patch::EllipseWithShell { .. } => PatchKind::EllipseWithShell,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Patch::Everywhere { id, .. }
            | Patch::Ellipse { id, .. }
            | Patch::EllipticalDisc { id, .. }
            | Patch::EllipseWithShell { id, .. } => *id,
        }
    }

    /// Short description for messages, e.g. `ellipse patch 2`
    pub fn label(&self) -> String {
        format!("{} patch {}", self.kind(), self.id())
    }
}

/// Patches of one type inside a layer
#[derive(Debug, Clone, PartialEq)]
pub struct PatchCollection {
    pub kind: PatchKind,
    pub patches: Vec<Patch>,
}

/// Compositing unit; higher IDs overwrite lower ones
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: i64,
    pub collections: Vec<PatchCollection>,
}

impl Layer {
    pub fn patch_count(&self) -> usize {
        self.collections.iter().map(|c| c.patches.len()).sum()
    }
}

/// Parsed `ic_ecm` document, layers in ascending ID order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EcmDocument {
    pub layers: Vec<Layer>,
}
