//! Profile-driven field standardization.
//!
//! For every target field of the profile, in order:
//! 1. domain substitution, when the rule's source field is present;
//! 2. rename, when one of the mapped source fields is present;
//! 3. carry-through of a field already named like the target;
//! 4. otherwise a typed null.
//!
//! The value is then coerced to the field's declared kind. Output records carry
//! exactly `profile.field_order`. Sources that are not themselves targets do not
//! survive, so a second pass only ever reaches step 3 and changes nothing.

use std::collections::BTreeMap;

use carg_model::{FeatureRecord, FieldMap, FieldValue};
use carg_standards::{DomainTableCache, StandardizationProfile};
use serde::Serialize;
use tracing::debug;

use crate::normalization::{Anomaly, coerce};

/// Counters collected while standardizing one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardizeReport {
    pub records: usize,
    /// Values nulled because they could not be read as the declared kind, per field.
    pub unparseable: BTreeMap<String, usize>,
    pub truncated: usize,
    /// Target fields that were neither present nor derivable, per field.
    pub defaulted: BTreeMap<String, usize>,
}

impl StandardizeReport {
    pub fn unparseable_total(&self) -> usize {
        self.unparseable.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standardized {
    pub records: Vec<FeatureRecord>,
    pub report: StandardizeReport,
}

pub fn standardize(
    records: Vec<FeatureRecord>,
    profile: &StandardizationProfile,
    cache: &DomainTableCache,
) -> Standardized {
    let mut report = StandardizeReport {
        records: records.len(),
        ..StandardizeReport::default()
    };

    let records = records
        .into_iter()
        .map(|record| standardize_record(record, profile, cache, &mut report))
        .collect();

    if report.unparseable_total() > 0 {
        debug!(
            profile = profile.name,
            unparseable = report.unparseable_total(),
            "values nulled during standardization"
        );
    }
    Standardized { records, report }
}

fn standardize_record(
    record: FeatureRecord,
    profile: &StandardizationProfile,
    cache: &DomainTableCache,
    report: &mut StandardizeReport,
) -> FeatureRecord {
    let source = &record.fields;
    let mut fields = FieldMap::new();

    for &target in profile.field_order {
        let value = match derive_value(source, target, profile, cache) {
            Some(value) => value,
            None => {
                *report.defaulted.entry(target.to_string()).or_insert(0) += 1;
                FieldValue::Null
            }
        };
        let coerced = coerce(value, profile.kind_of(target));
        match coerced.anomaly {
            Some(Anomaly::Unparseable) => {
                *report.unparseable.entry(target.to_string()).or_insert(0) += 1;
            }
            Some(Anomaly::Truncated) => report.truncated += 1,
            None => {}
        }
        fields.insert(target, coerced.value);
    }

    FeatureRecord {
        geometry: record.geometry,
        fields,
        provenance: record.provenance,
    }
}

fn derive_value(
    source: &FieldMap,
    target: &str,
    profile: &StandardizationProfile,
    cache: &DomainTableCache,
) -> Option<FieldValue> {
    if let Some(rule) = profile.domain_rule(target)
        && let Some(code) = source.lookup(rule.source)
    {
        if code.is_blank() {
            return Some(FieldValue::Null);
        }
        return Some(FieldValue::Text(cache.resolve_with(
            rule.table,
            code,
            rule.fallback,
        )));
    }

    if let Some(value) = profile
        .mapped_sources(target)
        .find_map(|name| source.lookup(name))
    {
        return Some(value.clone());
    }

    source.lookup(target).cloned()
}
