//! Field standardizer behaviour against the declared profiles.

use carg_model::{Coord, FeatureRecord, FieldValue, Geometry};
use carg_standards::{DomainTableCache, InMemoryDomainTables, PROFILES, profile};
use carg_transform::standardize;
use proptest::prelude::*;

fn cache() -> DomainTableCache {
    DomainTableCache::new(
        InMemoryDomainTables::new()
            .with_table("d_foglio", &[("255", "Genova"), ("64", "Trento")]),
    )
}

fn names(record: &FeatureRecord) -> Vec<&str> {
    record.fields.names().collect()
}

#[test]
fn output_matches_profile_order_and_drops_extras() {
    let profile = profile("geomorfologia_punti").expect("profile");
    let record = FeatureRecord::new("ST010Point", 0)
        .with_geometry(Geometry::Point(Coord::new(10.0, 44.0)))
        .with_field("OBJECTID", 9_i64)
        .with_field("Shape_Length", 1.25)
        .with_field("FoglioGeologico", 255_i64)
        .with_field("Pun_Gmo", "P1")
        .with_field("Tipo_Gmrf", 3_i64)
        .with_field("Tipo_G_txt", "orlo di scarpata")
        .with_field("Stato_txt", "attivo")
        .with_field("Tipol_txt", "certa")
        .with_field("Direzione", "45");

    let out = standardize(vec![record], profile, &cache());
    let record = &out.records[0];
    assert_eq!(names(record), profile.field_order);
    assert_eq!(record.field("Foglio"), Some(&FieldValue::text("Genova")));
    assert_eq!(
        record.field("Tipo_Gmrf"),
        Some(&FieldValue::text("orlo di scarpata"))
    );
    assert_eq!(record.field("Direzione"), Some(&FieldValue::Real(45.0)));
    assert!(record.field("OBJECTID").is_none());
    assert!(record.geometry.is_some());
    assert_eq!(out.report.records, 1);
}

#[test]
fn absent_fields_become_typed_nulls() {
    let profile = profile("risorse_prospezioni").expect("profile");
    let record = FeatureRecord::new("ST013Point", 0)
        .with_field("FoglioGeologico", "255")
        .with_field("NUM_RIS", "12");

    let out = standardize(vec![record], profile, &cache());
    let record = &out.records[0];
    assert_eq!(record.field("Num_Ris"), Some(&FieldValue::Integer(12)));
    assert_eq!(record.field("Label2"), Some(&FieldValue::Null));
    assert_eq!(out.report.defaulted.get("Label1"), Some(&1));
}

#[test]
fn direction_number_and_text_normalize_identically() {
    let profile = profile("geologia_linee").expect("profile");
    let records = vec![
        FeatureRecord::new("ST018Polyline", 0).with_field("Direzione", 90_i64),
        FeatureRecord::new("ST018Polyline", 1).with_field("Direzione", "90"),
        FeatureRecord::new("ST018Polyline", 2).with_field("Direzione", "verso nord"),
    ];
    let out = standardize(records, profile, &cache());
    assert_eq!(out.records[0].field("Direzione"), out.records[1].field("Direzione"));
    assert_eq!(out.records[0].field("Direzione"), Some(&FieldValue::Real(90.0)));
    assert_eq!(out.records[2].field("Direzione"), Some(&FieldValue::Null));
    assert_eq!(out.report.unparseable.get("Direzione"), Some(&1));
}

#[test]
fn unknown_sheet_keeps_raw_code() {
    let profile = profile("geologia_punti").expect("profile");
    let records = vec![FeatureRecord::new("ST019Point", 0).with_field("FoglioGeologico", 999_i64)];
    let out = standardize(records, profile, &cache());
    assert_eq!(out.records[0].field("Foglio"), Some(&FieldValue::text("999")));

    let empty = DomainTableCache::new(InMemoryDomainTables::new());
    let records = vec![FeatureRecord::new("ST019Point", 0).with_field("FoglioGeologico", 255_i64)];
    let out = standardize(records, profile, &empty);
    assert_eq!(out.records[0].field("Foglio"), Some(&FieldValue::text("255")));
    assert_eq!(empty.missing_tables(), ["d_foglio"]);
}

#[test]
fn second_pass_is_a_no_op() {
    let profile = profile("geologia_poligoni").expect("profile");
    let record = FeatureRecord::new("ST018Polygon", 0)
        .with_field("FoglioGeologico", 64_i64)
        .with_field("Pol_Uc", "U1")
        .with_field("ETA_super", "Pliocene")
        .with_field("Sommerso_", "SI")
        .with_field("Direzio", 30_i64);
    let cache = cache();
    let once = standardize(vec![record], profile, &cache).records;
    let twice = standardize(once.clone(), profile, &cache).records;
    assert_eq!(once, twice);
    assert_eq!(once[0].field("ETA_Super"), Some(&FieldValue::text("Pliocene")));
    assert_eq!(once[0].field("Sommerso"), Some(&FieldValue::text("SI")));
}

fn field_pool() -> Vec<&'static str> {
    let mut pool: Vec<&'static str> = vec![
        "FoglioGeologico",
        "OBJECTID",
        "Shape_Area",
        "Direzio",
        "Note",
    ];
    for profile in PROFILES {
        pool.extend(profile.field_order.iter().copied());
        pool.extend(profile.field_mappings.iter().map(|(source, _)| *source));
    }
    pool.sort_unstable();
    pool.dedup();
    pool
}

fn value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Null),
        any::<i64>().prop_map(FieldValue::Integer),
        (-1.0e6..1.0e6f64).prop_map(FieldValue::Real),
        "[ A-Za-z0-9,.]{0,12}".prop_map(FieldValue::Text),
    ]
}

fn record_strategy() -> impl Strategy<Value = FeatureRecord> {
    prop::collection::vec((prop::sample::select(field_pool()), value_strategy()), 0..16).prop_map(
        |fields| {
            let mut record = FeatureRecord::new("ST000", 0);
            for (name, value) in fields {
                record.fields.insert(name, value);
            }
            record
        },
    )
}

proptest! {
    #[test]
    fn standardize_is_idempotent(
        records in prop::collection::vec(record_strategy(), 0..6),
        index in 0..PROFILES.len(),
    ) {
        let profile = &PROFILES[index];
        let cache = cache();
        let once = standardize(records, profile, &cache).records;
        let twice = standardize(once.clone(), profile, &cache).records;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn output_never_contains_computed_measures(
        records in prop::collection::vec(record_strategy(), 1..4),
        index in 0..PROFILES.len(),
    ) {
        let profile = &PROFILES[index];
        let out = standardize(records, profile, &cache());
        for record in &out.records {
            let names: Vec<&str> = record.fields.names().collect();
            prop_assert_eq!(names.as_slice(), profile.field_order);
            prop_assert!(record.fields.get("Shape_Area").is_none());
            prop_assert!(record.fields.get("OBJECTID").is_none());
        }
    }
}
