//! Value normalization to the declared kind of an output field.

pub mod direction;
pub mod flag;
pub mod numeric;
pub mod text;

use carg_model::FieldValue;
use carg_standards::FieldKind;

/// Problem found while coercing one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Input could not be read as the declared kind and was nulled.
    Unparseable,
    /// Text exceeded the field width and was cut.
    Truncated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: FieldValue,
    pub anomaly: Option<Anomaly>,
}

impl Coerced {
    fn clean(value: FieldValue) -> Self {
        Self {
            value,
            anomaly: None,
        }
    }

    fn nulled() -> Self {
        Self {
            value: FieldValue::Null,
            anomaly: Some(Anomaly::Unparseable),
        }
    }
}

/// Converts `value` to `kind`. Never fails; unreadable input becomes null.
///
/// Applying `coerce` to its own output returns the same value.
pub fn coerce(value: FieldValue, kind: FieldKind) -> Coerced {
    match kind {
        FieldKind::Text => text::coerce_text(value),
        FieldKind::Integer => match value {
            FieldValue::Null => Coerced::clean(FieldValue::Null),
            other if other.is_blank() => Coerced::clean(FieldValue::Null),
            other => numeric::to_integer(&other)
                .map_or_else(Coerced::nulled, |number| Coerced::clean(FieldValue::Integer(number))),
        },
        FieldKind::Real => real_with(value, numeric::to_real),
        FieldKind::Direction => real_with(value, direction::parse_direction),
        FieldKind::Flag => Coerced::clean(FieldValue::text(flag::sommerso(&value))),
    }
}

fn real_with(value: FieldValue, parse: fn(&FieldValue) -> Option<f64>) -> Coerced {
    if value.is_blank() {
        return Coerced::clean(FieldValue::Null);
    }
    parse(&value).map_or_else(Coerced::nulled, |number| Coerced::clean(FieldValue::Real(number)))
}
