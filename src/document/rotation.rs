//! Rotation text → radians.
//!
//! Plain numbers are degrees unless `units` starts with "rad". Text that
//! mentions pi (`pi` or `π`) is always radians and is evaluated by the
//! arithmetic evaluator; pairing it with non-radian units is an error.

use super::expression;
use crate::error::{EcmError, Result};

fn mentions_pi(text: &str) -> bool {
    text.contains('π') || text.to_ascii_lowercase().contains("pi")
}

fn units_are_radians(units: &str) -> bool {
    units.trim().to_ascii_lowercase().starts_with("rad")
}

/// Parse a `<rotation>` element's text and optional `units` attribute
///
/// # Arguments
/// * `text` - element text, e.g. `30`, `pi/6`, `-2pi/3`
/// * `units` - value of the `units` attribute, if present
/// * `context` - patch description used in error messages
///
/// # Returns
/// Counter-clockwise rotation in radians
pub fn parse_rotation(text: &str, units: Option<&str>, context: &str) -> Result<f64> {
    let text = text.trim();

    if mentions_pi(text) {
        if let Some(units) = units.filter(|u| !units_are_radians(u)) {
            return Err(EcmError::RotationUnitsConflict {
                text: text.to_string(),
                units: units.to_string(),
                context: context.to_string(),
            });
        }
        return expression::evaluate(text).map_err(|e| EcmError::RotationParseFailure {
            text: text.to_string(),
            context: context.to_string(),
            reason: e.to_string(),
        });
    }

    let value = text.parse::<f64>().map_err(|_| EcmError::InvalidValue {
        element: "rotation".to_string(),
        value: text.to_string(),
        context: context.to_string(),
        expected: "a number of degrees, a number with units=\"rad\", or a pi expression".to_string(),
    })?;
    if !value.is_finite() {
        return Err(EcmError::InvalidValue {
            element: "rotation".to_string(),
            value: text.to_string(),
            context: context.to_string(),
            expected: "a finite angle".to_string(),
        });
    }

    match units {
        Some(units) if units_are_radians(units) => Ok(value),
        _ => Ok(value.to_radians()),
    }
}
