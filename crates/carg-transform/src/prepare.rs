//! Layer preparation: brings a raw CARG layer to the staging fields its
//! profile expects.
//!
//! Renames with alternative sources, decoding of coded fields into `*_txt`
//! staging fields, fixed values, the sheet identifier, and for the polygon
//! layer the auxiliary table joins and the submerged flag.

use std::collections::{BTreeMap, BTreeSet};

use carg_model::{AttributeTable, FeatureRecord, FieldMap, FieldValue, normalize_code};
use carg_standards::{AuxiliaryJoin, DomainTableCache, LayerSpec};
use serde::Serialize;
use tracing::{debug, warn};

use crate::normalization::flag;

/// Field holding the raw sheet number on every CARG layer.
pub const SHEET_FIELD: &str = "FoglioGeologico";

pub struct PrepareContext<'a> {
    pub cache: &'a DomainTableCache,
    /// Sheet used for records without their own.
    pub run_sheet: &'a str,
    pub auxiliary: &'a [AttributeTable],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    /// Renamed fields with no source in the layer.
    pub missing_fields: BTreeSet<String>,
    pub missing_auxiliary: BTreeSet<String>,
    /// Join keys with no matching auxiliary row.
    pub unmatched_keys: usize,
    /// Records that took the run-level sheet.
    pub inherited_sheet: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub records: Vec<FeatureRecord>,
    pub report: PrepareReport,
}

pub fn prepare(records: Vec<FeatureRecord>, spec: &LayerSpec, ctx: &PrepareContext<'_>) -> Prepared {
    let mut report = PrepareReport::default();
    let joins: Vec<(&AuxiliaryJoin, Option<JoinIndex<'_>>)> = spec
        .auxiliary
        .iter()
        .map(|join| {
            let index = find_table(ctx.auxiliary, join.table).map(|table| JoinIndex::build(table, join));
            if index.is_none() {
                warn!(layer = spec.id, table = join.table, "auxiliary table missing; joined fields left empty");
                report.missing_auxiliary.insert(join.table.to_string());
            }
            (join, index)
        })
        .collect();

    let records = records
        .into_iter()
        .map(|mut record| {
            assign_sheet(&mut record, ctx.run_sheet, &mut report);
            apply_renames(&mut record.fields, spec, &mut report);
            for domain in spec.domains {
                let text = match record.fields.lookup(domain.source) {
                    Some(code) => ctx.cache.resolve(domain.table, code),
                    None => String::new(),
                };
                record.fields.insert(domain.target, FieldValue::Text(text));
            }
            for (field, value) in spec.fixed_values {
                record.fields.insert(*field, FieldValue::text(*value));
            }
            for (join, index) in &joins {
                apply_join(&mut record.fields, join, index.as_ref(), ctx.cache, &mut report);
            }
            if let Some(rule) = spec.sommerso {
                let value = record
                    .fields
                    .lookup(rule.source)
                    .map_or("", flag::sommerso);
                record.fields.insert(rule.target, FieldValue::text(value));
            }
            record
        })
        .collect();

    for field in &report.missing_fields {
        warn!(layer = spec.id, field = %field, "no source field for renamed field");
    }
    if report.unmatched_keys > 0 {
        debug!(layer = spec.id, unmatched = report.unmatched_keys, "auxiliary keys without a match");
    }
    Prepared { records, report }
}

/// Sheet of the record itself, or the run sheet when it has none.
fn assign_sheet(record: &mut FeatureRecord, run_sheet: &str, report: &mut PrepareReport) {
    let own = record
        .fields
        .lookup(SHEET_FIELD)
        .filter(|value| !value.is_blank())
        .map(|value| value.as_text().trim().to_string());
    let sheet = match own {
        Some(sheet) => sheet,
        None => {
            report.inherited_sheet += 1;
            if let Some(name) = record.fields.find_name(SHEET_FIELD).map(str::to_string) {
                record.fields.remove(&name);
            }
            record
                .fields
                .insert(SHEET_FIELD, FieldValue::text(run_sheet));
            run_sheet.to_string()
        }
    };
    record.provenance.sheet = Some(sheet);
}

fn apply_renames(fields: &mut FieldMap, spec: &LayerSpec, report: &mut PrepareReport) {
    for rename in spec.renames {
        let candidates = rename.candidates();
        let found = candidates
            .iter()
            .find_map(|candidate| fields.find_name(candidate))
            .map(str::to_string);
        let Some(actual) = found else {
            report.missing_fields.insert(rename.target.to_string());
            continue;
        };
        if actual == rename.target {
            continue;
        }
        if let Some(value) = fields.remove(&actual) {
            fields.insert(rename.target, value);
        }
    }
}

fn apply_join(
    fields: &mut FieldMap,
    join: &AuxiliaryJoin,
    index: Option<&JoinIndex<'_>>,
    cache: &DomainTableCache,
    report: &mut PrepareReport,
) {
    let row = index.and_then(|index| {
        let key = fields.lookup(join.key_field).and_then(normalize_code)?;
        let row = index.rows.get(&key).copied();
        if row.is_none() {
            report.unmatched_keys += 1;
        }
        row
    });

    for column in join.columns {
        let text = match row.and_then(|row| row.lookup(column.column)) {
            Some(raw) => match column.domain {
                Some(table) => cache.resolve(table, raw),
                None => raw.as_text().trim().to_string(),
            },
            None => String::new(),
        };
        fields.insert(column.target, FieldValue::Text(text));
    }
}

fn find_table<'a>(tables: &'a [AttributeTable], name: &str) -> Option<&'a AttributeTable> {
    tables
        .iter()
        .find(|table| table.name.eq_ignore_ascii_case(name))
}

/// Auxiliary rows keyed by normalized join key; the first row wins.
struct JoinIndex<'a> {
    rows: BTreeMap<String, &'a FieldMap>,
}

impl<'a> JoinIndex<'a> {
    fn build(table: &'a AttributeTable, join: &AuxiliaryJoin) -> Self {
        let mut rows = BTreeMap::new();
        for row in &table.rows {
            if let Some(key) = row.lookup(join.key_column).and_then(normalize_code) {
                rows.entry(key).or_insert(row);
            }
        }
        Self { rows }
    }
}
