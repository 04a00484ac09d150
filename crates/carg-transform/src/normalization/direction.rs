//! Orientation values ("Direzione").
//!
//! Producers store the azimuth as an integer, a double, or text such as
//! `"90"`, `"90,5"` or `"90°"`. All of them normalize to a real number of
//! degrees.

use carg_model::FieldValue;

use super::numeric::{parse_f64, to_real};

const DEGREE_SUFFIXES: &[&str] = &["°", "º", "deg", "gradi"];

pub fn parse_direction(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Text(text) => {
            let trimmed = text.trim();
            let number = DEGREE_SUFFIXES
                .iter()
                .find_map(|suffix| strip_suffix_ignore_case(trimmed, suffix))
                .unwrap_or(trimmed);
            parse_f64(number)
        }
        other => to_real(other),
    }
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix)
        .then(|| text.get(..split))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_producer_format() {
        for value in [
            FieldValue::Integer(90),
            FieldValue::Real(90.0),
            FieldValue::text("90"),
            FieldValue::text(" 90.0 "),
            FieldValue::text("90°"),
            FieldValue::text("90 DEG"),
        ] {
            assert_eq!(parse_direction(&value), Some(90.0), "{value:?}");
        }
        assert_eq!(parse_direction(&FieldValue::text("12,5")), Some(12.5));
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(parse_direction(&FieldValue::text("N-S")), None);
        assert_eq!(parse_direction(&FieldValue::Null), None);
    }
}
