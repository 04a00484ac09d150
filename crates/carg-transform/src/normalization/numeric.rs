//! Numeric normalization utilities.

use carg_model::FieldValue;

/// Parses a string as f64, accepting a decimal comma. None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match trimmed.parse::<f64>() {
        Ok(number) => number,
        Err(_) if trimmed.matches(',').count() == 1 && !trimmed.contains('.') => {
            trimmed.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    parsed.is_finite().then_some(parsed)
}

pub fn to_real(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Integer(number) => Some(*number as f64),
        FieldValue::Real(number) => number.is_finite().then_some(*number),
        FieldValue::Text(text) => parse_f64(text),
        FieldValue::Null => None,
    }
}

/// Integral values only; `3.0` and `"3"` are accepted, `3.5` is not.
pub fn to_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(number) => Some(*number),
        other => {
            let number = to_real(other)?;
            let integral = number.fract() == 0.0 && number.abs() < 9.0e15;
            integral.then_some(number as i64)
        }
    }
}
