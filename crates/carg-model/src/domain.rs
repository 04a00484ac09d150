//! Code to text lookup relations ("domini").

use std::collections::BTreeMap;

use crate::value::FieldValue;

/// Canonical key for a domain code.
///
/// Codes arrive as integers, reals, or text depending on the producer, so
/// `1`, `1.0`, `"1"` and `" 1.0 "` all collapse to the key `"1"`. Non-numeric
/// text is only trimmed. Blank codes have no key.
pub fn normalize_code(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Null => None,
        FieldValue::Integer(code) => Some(code.to_string()),
        FieldValue::Real(code) => Some(integral_key(*code).unwrap_or_else(|| code.to_string())),
        FieldValue::Text(code) => normalize_code_str(code),
    }
}

pub fn normalize_code_str(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(number) => Some(integral_key(number).unwrap_or_else(|| trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

fn integral_key(number: f64) -> Option<String> {
    let in_range = number.is_finite() && number.abs() < 9.0e15;
    if in_range && number.fract() == 0.0 {
        Some((number as i64).to_string())
    } else {
        None
    }
}

/// An immutable-once-loaded mapping from normalized code to display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainTable {
    name: String,
    entries: BTreeMap<String, String>,
}

impl DomainTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Builds a table from raw `(code, text)` pairs.
    pub fn from_pairs<I, C, T>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: AsRef<str>,
        T: Into<String>,
    {
        let mut table = Self::new(name);
        for (code, text) in pairs {
            table.insert(code.as_ref(), text);
        }
        table
    }

    /// Adds an entry. Returns false when the code is blank and nothing was stored.
    /// A repeated code keeps its first text.
    pub fn insert(&mut self, code: &str, text: impl Into<String>) -> bool {
        let Some(key) = normalize_code_str(code) else {
            return false;
        };
        self.entries
            .entry(key)
            .or_insert_with(|| text.into().trim().to_string());
        true
    }

    pub fn lookup(&self, code: &FieldValue) -> Option<&str> {
        let key = normalize_code(code)?;
        self.entries.get(&key).map(String::as_str)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, text)| (code.as_str(), text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_codes_share_a_key() {
        let table = DomainTable::from_pairs("d_stato", [("1", "attivo"), ("2.0", "quiescente")]);
        assert_eq!(table.lookup(&FieldValue::Integer(1)), Some("attivo"));
        assert_eq!(table.lookup(&FieldValue::Real(1.0)), Some("attivo"));
        assert_eq!(table.lookup(&FieldValue::text(" 2 ")), Some("quiescente"));
        assert_eq!(table.lookup(&FieldValue::text("2.0")), Some("quiescente"));
    }

    #[test]
    fn text_and_fractional_codes() {
        let table = DomainTable::from_pairs("d_t2000_eta", [("PLE", "Pleistocene"), ("1.5", "x")]);
        assert_eq!(table.lookup(&FieldValue::text("PLE")), Some("Pleistocene"));
        assert_eq!(table.lookup(&FieldValue::Real(1.5)), Some("x"));
        assert_eq!(table.lookup(&FieldValue::text("ple")), None);
        assert_eq!(table.lookup(&FieldValue::Null), None);
    }

    #[test]
    fn blank_codes_are_skipped() {
        let mut table = DomainTable::new("d_fase");
        assert!(!table.insert("  ", "vuoto"));
        assert!(table.insert("3", "  terza "));
        assert!(table.insert("3", "duplicato"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&FieldValue::Integer(3)), Some("terza"));
    }
}
