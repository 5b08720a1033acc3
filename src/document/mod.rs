//! Input document model and XML parsing.
//!
//! The `ic_ecm` grammar describes ordered layers of patch collections. Parsing
//! resolves every patch into a typed [`Patch`] with its geometry and ECM specs,
//! so the compositor never looks at raw XML.

mod expression;
mod model;
mod parser;
mod rotation;

pub use expression::{evaluate as evaluate_angle_expression, ExpressionError};
pub use model::{EcmDocument, EcmSpec, EcmTarget, Layer, OrientationMode, Patch, PatchCollection, PatchKind};
pub use parser::{load_document, parse_document, ROOT_ELEMENT};
pub use rotation::parse_rotation;
