use carg_model::FieldValue;

use super::{Anomaly, Coerced};

/// Width of a text attribute in the delivered layers.
pub const MAX_TEXT_CHARS: usize = 254;

pub fn coerce_text(value: FieldValue) -> Coerced {
    let text = match value {
        FieldValue::Null => {
            return Coerced {
                value: FieldValue::Null,
                anomaly: None,
            };
        }
        FieldValue::Text(text) => text,
        other => other.as_text().into_owned(),
    };
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => Coerced {
            value: FieldValue::Text(text[..cut].to_string()),
            anomaly: Some(Anomaly::Truncated),
        },
        None => Coerced {
            value: FieldValue::Text(text),
            anomaly: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        let long = "è".repeat(300);
        let coerced = coerce_text(FieldValue::text(long));
        assert_eq!(coerced.anomaly, Some(Anomaly::Truncated));
        assert_eq!(coerced.value.as_text().chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn numbers_become_text() {
        assert_eq!(coerce_text(FieldValue::Integer(4)).value, FieldValue::text("4"));
        assert_eq!(coerce_text(FieldValue::Null).value, FieldValue::Null);
    }
}
