//! Declarative description of one standardized output schema.

use std::collections::BTreeSet;

use carg_model::GeometryType;

use crate::domain_cache::Fallback;
use crate::error::StandardsError;

/// Attribute fields that are never written: object ids and geometry-derived
/// measures recomputed by the writer.
pub const EXCLUDED_FIELDS: &[&str] = &["OBJECTID", "FID", "Shape_Length", "Shape_Area", "Shape_Leng"];

/// Any field starting with this prefix is a computed geometry measure.
pub const EXCLUDED_PREFIX: &str = "SHAPE_";

/// Declared value type of an output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    /// Orientation in degrees; accepts numeric or textual input.
    Direction,
    /// `SI` / `NO` flag; anything else becomes empty text.
    Flag,
}

impl FieldKind {
    /// Default kind for a field name.
    pub fn for_name(name: &str) -> Self {
        const REAL_MARKERS: &[&str] = &["AREA", "PERIMETER", "LENGTH", "QUOTA", "INCLINAZ", "IMMERSIONE"];

        let upper = name.to_ascii_uppercase();
        if upper == "DIREZIONE" {
            Self::Direction
        } else if REAL_MARKERS.iter().any(|marker| upper.contains(marker)) {
            Self::Real
        } else if upper.starts_with("NUM_") || upper == "FID" {
            Self::Integer
        } else {
            Self::Text
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Direction => "direction",
            Self::Flag => "flag",
        }
    }
}

/// A target field filled by translating a code through a domain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainRule {
    pub target: &'static str,
    pub source: &'static str,
    pub table: &'static str,
    pub fallback: Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct StandardizationProfile {
    pub name: &'static str,
    pub geometry_type: GeometryType,
    pub field_order: &'static [&'static str],
    /// Source name to target name.
    pub field_mappings: &'static [(&'static str, &'static str)],
    pub domain_fields: &'static [DomainRule],
    /// Kinds that differ from [`FieldKind::for_name`].
    pub field_kinds: &'static [(&'static str, FieldKind)],
    pub exclusions: &'static [&'static str],
}

impl StandardizationProfile {
    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.field_kinds
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map_or_else(|| FieldKind::for_name(field), |(_, kind)| *kind)
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.exclusions
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(field))
            || field.to_ascii_uppercase().starts_with(EXCLUDED_PREFIX)
    }

    pub fn domain_rule(&self, target: &str) -> Option<&DomainRule> {
        self.domain_fields.iter().find(|rule| rule.target == target)
    }

    /// Sources renamed onto `target`, in declaration order.
    pub fn mapped_sources<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.field_mappings
            .iter()
            .filter(move |(_, to)| *to == target)
            .map(|(from, _)| *from)
    }

    /// Domain tables this profile reads.
    pub fn tables(&self) -> BTreeSet<&'static str> {
        self.domain_fields.iter().map(|rule| rule.table).collect()
    }

    /// Checks the structural invariants of the profile.
    pub fn check(&self) -> Result<(), StandardsError> {
        let invalid = |message: String| StandardsError::InvalidProfile {
            profile: self.name.to_string(),
            message,
        };

        let mut seen = BTreeSet::new();
        for field in self.field_order {
            if !seen.insert(field.to_ascii_uppercase()) {
                return Err(invalid(format!("duplicate field {field}")));
            }
            if self.is_excluded(field) {
                return Err(invalid(format!("excluded field {field} in field order")));
            }
        }
        for (source, target) in self.field_mappings {
            if !self.field_order.contains(target) {
                return Err(invalid(format!("mapping {source} -> {target} targets unknown field")));
            }
        }
        for rule in self.domain_fields {
            if !self.field_order.contains(&rule.target) {
                return Err(invalid(format!(
                    "domain field {} ({}) is not in field order",
                    rule.target, rule.table
                )));
            }
        }
        for (field, _) in self.field_kinds {
            if !self.field_order.contains(field) {
                return Err(invalid(format!("kind declared for unknown field {field}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_from_names() {
        assert_eq!(FieldKind::for_name("Direzione"), FieldKind::Direction);
        assert_eq!(FieldKind::for_name("Quota"), FieldKind::Real);
        assert_eq!(FieldKind::for_name("Inclinaz"), FieldKind::Real);
        assert_eq!(FieldKind::for_name("Num_Oss"), FieldKind::Integer);
        assert_eq!(FieldKind::for_name("Tipo_Geo"), FieldKind::Text);
    }

    #[test]
    fn check_rejects_duplicates_and_dangling_mappings() {
        let duplicate = StandardizationProfile {
            name: "dup",
            geometry_type: GeometryType::Point,
            field_order: &["Foglio", "FOGLIO"],
            field_mappings: &[],
            domain_fields: &[],
            field_kinds: &[],
            exclusions: EXCLUDED_FIELDS,
        };
        assert!(duplicate.check().is_err());

        let dangling = StandardizationProfile {
            name: "dangling",
            field_order: &["Foglio"],
            field_mappings: &[("Tipo_txt", "Tipo")],
            ..duplicate
        };
        assert!(dangling.check().is_err());

        let excluded = StandardizationProfile {
            name: "excluded",
            field_order: &["Foglio", "Shape_Area"],
            field_mappings: &[],
            ..duplicate
        };
        assert!(excluded.check().is_err());
    }
}
