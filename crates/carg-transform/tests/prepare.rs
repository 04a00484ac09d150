//! Layer preparation: renames, domain decoding, auxiliary joins, sheets.

use carg_model::{AttributeTable, FeatureRecord, FieldMap, FieldValue};
use carg_standards::{DomainTableCache, InMemoryDomainTables, layer_spec, profile};
use carg_transform::{PrepareContext, prepare, standardize};

fn cache() -> DomainTableCache {
    DomainTableCache::new(
        InMemoryDomainTables::new()
            .with_table("d_foglio", &[("255", "Genova")])
            .with_table("d_tipologia", &[("1", "certa"), ("2", "presunta")])
            .with_table("d_fase", &[("3", "D1")])
            .with_table("d_st021", &[("10", "anticlinale")])
            .with_table("d_stato", &[("1", "attivo")])
            .with_table("d_1000_tipo", &[("5", "unita quaternaria")])
            .with_table("d_t2000_eta", &[("PLE", "Pleistocene"), ("OLO", "Olocene")])
            .with_table("d_2000_SiglaTipo", &[("1", "formazione")])
            .with_table("d_t3000", &[("7", "massiva")]),
    )
}

fn row(pairs: &[(&str, FieldValue)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect()
}

fn auxiliary() -> Vec<AttributeTable> {
    vec![
        AttributeTable::new(
            "T0180801000",
            vec![row(&[
                ("UQ_CAR", FieldValue::text("Q1")),
                ("TIPO", FieldValue::Integer(5)),
                ("STATO", FieldValue::Integer(1)),
            ])],
        ),
        AttributeTable::new(
            "T0180802000",
            vec![row(&[
                ("Uc_Lege", FieldValue::Integer(12)),
                ("Eta_Sup", FieldValue::text("OLO")),
                ("Eta_Inf", FieldValue::text("PLE")),
                ("S1_Tipo", FieldValue::Integer(1)),
                ("Sigla1", FieldValue::text("AVM")),
                ("Sigla_Carta", FieldValue::text("AVM1")),
                ("Nome", FieldValue::text("Alluvioni")),
                ("Legenda", FieldValue::text("depositi alluvionali")),
            ])],
        ),
    ]
}

fn polygon(fid: u64, sommerso: FieldValue) -> FeatureRecord {
    FeatureRecord::new("ST018Polygon", fid)
        .with_field("FoglioGeologico", 255_i64)
        .with_field("Pol_Uc", format!("P{fid}"))
        .with_field("UC_LEGE", 12_i64)
        .with_field("UQ_CAR", "Q1")
        .with_field("ID_TESS", 7_i64)
        .with_field("SOMMERSO", sommerso)
        .with_field("DIREZIO", "15")
}

#[test]
fn polygons_join_auxiliary_tables_and_decode_sommerso() {
    let spec = layer_spec("ST018Polygon").expect("spec");
    let cache = cache();
    let auxiliary = auxiliary();
    let ctx = PrepareContext {
        cache: &cache,
        run_sheet: "255",
        auxiliary: &auxiliary,
    };
    let records = vec![
        polygon(0, FieldValue::Integer(1)),
        polygon(1, FieldValue::Integer(2)),
        polygon(2, FieldValue::Integer(9)),
        polygon(3, FieldValue::text("1.0")),
    ];

    let prepared = prepare(records, spec, &ctx);
    assert_eq!(
        prepared.report.missing_auxiliary.iter().collect::<Vec<_>>(),
        ["T0180803000"]
    );

    let out = standardize(
        prepared.records,
        profile(spec.output).expect("profile"),
        &cache,
    );
    let first = &out.records[0];
    assert_eq!(first.field("Tipo_UQ"), Some(&FieldValue::text("unita quaternaria")));
    assert_eq!(first.field("Stato_UQ"), Some(&FieldValue::text("attivo")));
    assert_eq!(first.field("ETA_Super"), Some(&FieldValue::text("Olocene")));
    assert_eq!(first.field("ETA_Infer"), Some(&FieldValue::text("Pleistocene")));
    assert_eq!(first.field("Tipo_UG"), Some(&FieldValue::text("formazione")));
    assert_eq!(first.field("Sigla_UG"), Some(&FieldValue::text("AVM1")));
    assert_eq!(first.field("Tessitura"), Some(&FieldValue::text("")));
    assert_eq!(first.field("Direzione"), Some(&FieldValue::Real(15.0)));
    assert_eq!(first.field("Foglio"), Some(&FieldValue::text("Genova")));

    let flags: Vec<String> = out
        .records
        .iter()
        .map(|r| r.field("Sommerso").map(|v| v.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(flags, ["SI", "NO", "", "SI"]);
}

#[test]
fn folds_get_fixed_values_and_decoded_phase() {
    let spec = layer_spec("ST021Polyline").expect("spec");
    let cache = cache();
    let ctx = PrepareContext {
        cache: &cache,
        run_sheet: "255",
        auxiliary: &[],
    };
    let record = FeatureRecord::new("ST021Polyline", 0)
        .with_field("TIPO", 10_i64)
        .with_field("Tipologia", 2_i64)
        .with_field("FASE", 3_i64)
        .with_field("Direzio", 120_i64);

    let prepared = prepare(vec![record], spec, &ctx);
    let record = &prepared.records[0];
    assert_eq!(record.field("Tipo_geo"), Some(&FieldValue::Integer(10)));
    assert_eq!(record.field("Tipo_g_txt"), Some(&FieldValue::text("anticlinale")));
    assert_eq!(record.field("Tipol_txt"), Some(&FieldValue::text("presunta")));
    assert_eq!(record.field("Fase_txt"), Some(&FieldValue::text("D1")));
    assert_eq!(record.field("Affior_txt"), Some(&FieldValue::text("non applicabile")));
    assert_eq!(record.field("Cont_txt"), Some(&FieldValue::text("no")));
    assert_eq!(record.field("Direzione"), Some(&FieldValue::Integer(120)));
    assert!(record.field("Direzio").is_none());
}

#[test]
fn records_without_sheet_inherit_the_run_sheet() {
    let spec = layer_spec("ST010Point").expect("spec");
    let cache = cache();
    let ctx = PrepareContext {
        cache: &cache,
        run_sheet: "255",
        auxiliary: &[],
    };
    let records = vec![
        FeatureRecord::new("ST010Point", 0).with_field("FoglioGeologico", "064"),
        FeatureRecord::new("ST010Point", 1).with_field("FoglioGeologico", FieldValue::Null),
        FeatureRecord::new("ST010Point", 2),
    ];
    let prepared = prepare(records, spec, &ctx);
    let sheets: Vec<Option<&str>> = prepared
        .records
        .iter()
        .map(|r| r.provenance.sheet.as_deref())
        .collect();
    assert_eq!(sheets, [Some("064"), Some("255"), Some("255")]);
    assert_eq!(prepared.report.inherited_sheet, 2);
    assert_eq!(
        prepared.records[2].field("FoglioGeologico"),
        Some(&FieldValue::text("255"))
    );
}

#[test]
fn missing_domain_table_leaves_empty_text() {
    let spec = layer_spec("ST010Point").expect("spec");
    let cache = cache();
    let ctx = PrepareContext {
        cache: &cache,
        run_sheet: "255",
        auxiliary: &[],
    };
    let records: Vec<FeatureRecord> = (0..4)
        .map(|fid| FeatureRecord::new("ST010Point", fid).with_field("Tipo", 1_i64))
        .collect();
    let prepared = prepare(records, spec, &ctx);
    for record in &prepared.records {
        assert_eq!(record.field("Tipo_G_txt"), Some(&FieldValue::text("")));
    }
    assert_eq!(cache.missing_tables(), ["d_10_tipo"]);
    assert!(prepared.report.missing_fields.contains("Pun_Gmo"));
}
