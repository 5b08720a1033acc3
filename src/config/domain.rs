//! Domain bounds and voxel spacing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EcmError, Result};

/// Rectangular simulation domain and its voxel spacing
///
/// Units follow the consuming simulation (μm for PhysiCell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Lower x bound
    pub x_min: f64,
    /// Upper x bound
    pub x_max: f64,
    /// Voxel width along x
    pub dx: f64,
    /// Lower y bound
    pub y_min: f64,
    /// Upper y bound
    pub y_max: f64,
    /// Voxel width along y
    pub dy: f64,
    /// Constant z written to every row
    #[serde(default)]
    pub z0: f64,
}

impl DomainConfig {
    /// Load a domain record from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded domain from {:?}", path.as_ref());
        Ok(config)
    }

    /// Read the `<domain>` block of a PhysiCell settings file
    ///
    /// `z0` is the midpoint of `z_min`/`z_max` when both are present.
    pub fn from_physicell_settings<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_physicell_str(&contents)?;
        log::info!("Loaded domain from PhysiCell settings {:?}", path.as_ref());
        Ok(config)
    }

    /// Same as [`DomainConfig::from_physicell_settings`] over an in-memory document
    pub fn from_physicell_str(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let domain = doc
            .descendants()
            .find(|n| n.has_tag_name("domain"))
            .ok_or_else(|| EcmError::MissingRequiredElement {
                element: "<domain>".to_string(),
                context: "PhysiCell settings".to_string(),
            })?;

        let field = |name: &str| -> Result<Option<f64>> {
            let Some(node) = domain.children().find(|n| n.has_tag_name(name)) else {
                return Ok(None);
            };
            let text = node.text().unwrap_or("").trim();
            text.parse::<f64>().map(Some).map_err(|_| EcmError::InvalidValue {
                element: name.to_string(),
                value: text.to_string(),
                context: "PhysiCell settings <domain>".to_string(),
                expected: "a number".to_string(),
            })
        };
        let required = |name: &str| -> Result<f64> {
            field(name)?.ok_or_else(|| EcmError::MissingRequiredElement {
                element: format!("<{name}>"),
                context: "PhysiCell settings <domain>".to_string(),
            })
        };

        let z0 = match (field("z_min")?, field("z_max")?) {
            (Some(lo), Some(hi)) => 0.5 * (lo + hi),
            _ => 0.0,
        };

        let config = Self {
            x_min: required("x_min")?,
            x_max: required("x_max")?,
            dx: required("dx")?,
            y_min: required("y_min")?,
            y_max: required("y_max")?,
            dy: required("dy")?,
            z0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check bounds and spacing
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("dx", self.dx),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("dy", self.dy),
            ("z0", self.z0),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EcmError::InvalidDomain(format!("{name} is not finite ({value})")));
        }
        if self.dx <= 0.0 || self.dy <= 0.0 {
            return Err(EcmError::InvalidDomain(format!(
                "spacing must be positive (dx={}, dy={})",
                self.dx, self.dy
            )));
        }
        if self.x_max <= self.x_min {
            return Err(EcmError::InvalidDomain(format!(
                "x_max ({}) must exceed x_min ({})",
                self.x_max, self.x_min
            )));
        }
        if self.y_max <= self.y_min {
            return Err(EcmError::InvalidDomain(format!(
                "y_max ({}) must exceed y_min ({})",
                self.y_max, self.y_min
            )));
        }
        Ok(())
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        // PhysiCell default 2D domain
        Self {
            x_min: -500.0,
            x_max: 500.0,
            dx: 20.0,
            y_min: -500.0,
            y_max: 500.0,
            dy: 20.0,
            z0: 0.0,
        }
    }
}
