//! Error types for ECM initial-condition generation.
//!
//! Every failure is fatal to the current generation run. Parse errors name
//! the offending element and what was expected; compositing errors name the
//! layer and patch that triggered them.

use std::io;

use thiserror::Error;

/// ECM generation errors
#[derive(Debug, Error)]
pub enum EcmError {
    /// `patch_collection` carries a `type` outside the known set
    #[error("unrecognized patch type '{found}' in layer {layer}; expected one of: {expected}")]
    UnrecognizedPatchType {
        layer: i64,
        found: String,
        expected: String,
    },

    /// Orientation mode not permitted for the patch kind or region
    #[error("unrecognized orientation '{found}' for {context}; allowed: {allowed}")]
    UnrecognizedOrientation {
        found: String,
        context: String,
        allowed: String,
    },

    /// A required child element or attribute is absent
    ///
    /// `element` reads as written in the document, e.g. `<density>` or `attribute 'ID'`.
    #[error("missing required {element} in {context}")]
    MissingRequiredElement { element: String, context: String },

    /// Numeric text that does not parse
    #[error("invalid value '{value}' for <{element}> in {context}: expected {expected}")]
    InvalidValue {
        element: String,
        value: String,
        context: String,
        expected: String,
    },

    /// Rotation written with pi while `units` asks for something other than radians
    #[error("rotation '{text}' in {context} uses pi but units=\"{units}\" is not radians")]
    RotationUnitsConflict {
        text: String,
        units: String,
        context: String,
    },

    /// Pi-bearing rotation expression rejected by the arithmetic evaluator
    #[error("cannot evaluate rotation '{text}' in {context}: {reason}")]
    RotationParseFailure {
        text: String,
        context: String,
        reason: String,
    },

    /// Ellipse parameters outside their valid range
    #[error("invalid geometry in {context}: {reason}")]
    InvalidGeometry { context: String, reason: String },

    /// Two patches in the same layer claim the same voxels
    #[error(
        "overlap in layer {layer}: {source_patch} redefines {count} voxel(s) already claimed in this layer \
         (first at x={x}, y={y}); move one patch to a separate layer or shrink the regions"
    )]
    OverlapViolation {
        layer: i64,
        source_patch: String,
        count: usize,
        x: f64,
        y: f64,
    },

    /// Voxels left undefined after every layer was merged
    #[error(
        "{count} voxel(s) left undefined after compositing all layers (first at x={x}, y={y}); \
         add an 'everywhere' base layer or extend the patches"
    )]
    IncompleteCoverage { count: usize, x: f64, y: f64 },

    /// Domain bounds or spacing are unusable
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Document root is not `ic_ecm`
    #[error("unexpected document root <{found}>; expected <{expected}>")]
    UnexpectedRoot { found: String, expected: String },

    /// Malformed XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Malformed domain JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for ECM operations
pub type Result<T> = std::result::Result<T, EcmError>;
