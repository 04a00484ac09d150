//! End-to-end runs of the pipeline against in-memory datasets.

use carg_core::{
    LayerOutcome, LayerStage, MemorySink, MemorySource, PipelineError, PipelineOptions, run,
};
use carg_model::{Coord, FeatureRecord, FieldValue, Geometry, IssueKind};
use carg_standards::{CsvDomainDirectory, DomainTableCache, InMemoryDomainTables, OUTPUT_PROFILES};

fn cache() -> DomainTableCache {
    DomainTableCache::new(
        InMemoryDomainTables::new()
            .with_table("d_foglio", &[("348", "Capo Santa Maria di Leuca")])
            .with_table("d_tipologia", &[("1", "certa"), ("2", "presunta")])
            .with_table("d_st018_line", &[("1", "faglia diretta")])
            .with_table("d_st018_contorno", &[("1", "si")])
            .with_table("d_st018_affiora", &[("1", "affiorante")])
            .with_table("d_st021", &[("10", "anticlinale")])
            .with_table("d_fase", &[("3", "D1")])
            .with_table("d_stato", &[("1", "attivo")]),
    )
}

fn line(x: f64) -> Geometry {
    Geometry::LineString(vec![Coord::new(x, 0.0), Coord::new(x, 10.0)])
}

fn square() -> Geometry {
    Geometry::Polygon(vec![vec![
        Coord::new(0.0, 0.0),
        Coord::new(0.0, 1.0),
        Coord::new(1.0, 1.0),
        Coord::new(1.0, 0.0),
        Coord::new(0.0, 0.0),
    ]])
}

fn fault(index: u64) -> FeatureRecord {
    FeatureRecord::new("ST018Polyline", index)
        .with_geometry(line(index as f64))
        .with_field("FoglioGeologico", 348_i64)
        .with_field("Tipo", 1_i64)
        .with_field("Tipologia", 1_i64)
        .with_field("Contorno", 1_i64)
        .with_field("Affiora", 1_i64)
        .with_field("Direzio", 30_i64)
        .with_field("Shape_Length", 10.0)
}

fn fold(index: u64) -> FeatureRecord {
    FeatureRecord::new("ST021Polyline", index)
        .with_geometry(line(100.0 + index as f64))
        .with_field("FoglioGeologico", 348_i64)
        .with_field("Tipo", 10_i64)
        .with_field("Tipologia", 2_i64)
        .with_field("Fase", 3_i64)
        .with_field("Direzio", "45")
}

fn polygon(id: &str, sommerso: FieldValue) -> FeatureRecord {
    FeatureRecord::new("ST018Polygon", 0)
        .with_geometry(square())
        .with_field("FoglioGeologico", 348_i64)
        .with_field("Pol_Uc", id)
        .with_field("Sommerso", sommerso)
        .with_field("Shape_Area", 1.0)
}

fn lines_source() -> MemorySource {
    MemorySource::new()
        .with_layer("main.ST018Polyline", (0..3).map(fault).collect())
        .with_layer("ST021Polyline", (0..2).map(fold).collect())
}

#[test]
fn merged_lines_keep_declared_order() {
    let mut sink = MemorySink::new();
    let summary = run(&lines_source(), &mut sink, &cache(), &PipelineOptions::default())
        .expect("run completes");

    let merged = sink.layer("geologia_linee").expect("merged layer written");
    assert_eq!(merged.len(), 5);
    let origins: Vec<(&str, u64)> = merged
        .records
        .iter()
        .map(|r| (r.provenance.source_layer.as_str(), r.provenance.fid))
        .collect();
    assert_eq!(
        origins,
        [
            ("ST018Polyline", 0),
            ("ST018Polyline", 1),
            ("ST018Polyline", 2),
            ("ST021Polyline", 0),
            ("ST021Polyline", 1),
        ]
    );

    let first = &merged.records[0];
    assert_eq!(first.field("Tipo_Geo"), Some(&FieldValue::text("faglia diretta")));
    assert_eq!(
        first.field("Fase"),
        Some(&FieldValue::text("non applicabile/non classificabile"))
    );
    assert_eq!(first.field("Foglio"), Some(&FieldValue::text("Capo Santa Maria di Leuca")));
    let last = &merged.records[4];
    assert_eq!(last.field("Tipo_Geo"), Some(&FieldValue::text("anticlinale")));
    assert_eq!(last.field("Affiora"), Some(&FieldValue::text("non applicabile")));
    assert_eq!(last.field("Direzione"), Some(&FieldValue::Real(45.0)));

    let output = summary.output("geologia_linee").expect("output summary");
    assert_eq!(output.records, 5);
    assert!(matches!(output.outcome, LayerOutcome::Emitted { .. }));
    assert_eq!(
        summary.layer("ST021Polyline").map(|layer| layer.stage),
        Some(LayerStage::Emitted)
    );
}

#[test]
fn computed_fields_never_reach_an_output() {
    let source = lines_source().with_layer(
        "ST018Polygon",
        vec![polygon("P1", FieldValue::Integer(1))],
    );
    let mut sink = MemorySink::new();
    run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    for layer in &sink.layers {
        for record in &layer.records {
            for name in record.fields.names() {
                assert!(
                    !name.to_ascii_uppercase().starts_with("SHAPE_"),
                    "{} carries {name}",
                    layer.name
                );
            }
        }
    }
}

#[test]
fn sommerso_flag_is_decoded_end_to_end() {
    let source = MemorySource::new().with_layer(
        "ST018Polygon",
        vec![
            polygon("A", FieldValue::Integer(1)),
            polygon("B", FieldValue::Integer(2)),
            polygon("C", FieldValue::text("forse")),
        ],
    );
    let mut sink = MemorySink::new();
    let summary =
        run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    let layer = sink.layer("geologia_poligoni").expect("polygons written");
    let flags: Vec<String> = layer
        .records
        .iter()
        .map(|record| record.field("Sommerso").map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(flags, ["SI", "NO", ""]);
    assert_eq!(summary.total_issues, 0);
}

#[test]
fn direction_text_and_number_agree() {
    let source = MemorySource::new().with_layer(
        "ST018Polyline",
        vec![
            fault(0).with_field("Direzio", 90_i64),
            fault(1).with_field("Direzio", "90"),
        ],
    );
    let mut sink = MemorySink::new();
    run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    let layer = sink.layer("geologia_linee").expect("lines written");
    let directions: Vec<Option<&FieldValue>> = layer
        .records
        .iter()
        .map(|record| record.field("Direzione"))
        .collect();
    assert_eq!(directions, [Some(&FieldValue::Real(90.0)), Some(&FieldValue::Real(90.0))]);
}

#[test]
fn no_sheet_anywhere_aborts_without_output() {
    let strip = |record: FeatureRecord| {
        let mut record = record;
        record.fields.remove("FoglioGeologico");
        record
    };
    let source = MemorySource::new()
        .with_layer("ST018Polyline", (0..3).map(fault).map(strip).collect())
        .with_layer("ST021Polyline", (0..2).map(fold).map(strip).collect());
    let mut sink = MemorySink::new();

    let error = run(&source, &mut sink, &cache(), &PipelineOptions::default())
        .expect_err("run aborts");
    assert!(matches!(
        error.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingSheetIdentifier)
    ));
    assert!(sink.is_untouched());
}

#[test]
fn configured_sheet_does_not_replace_a_missing_field() {
    let mut record = fault(0);
    record.fields.remove("FoglioGeologico");
    let source = MemorySource::new().with_layer("ST018Polyline", vec![record]);
    let options = PipelineOptions {
        sheet: Some("348".to_string()),
        ..PipelineOptions::default()
    };
    let mut sink = MemorySink::new();

    let error = run(&source, &mut sink, &cache(), &options).expect_err("run aborts");
    assert!(matches!(
        error.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingSheetIdentifier)
    ));
    assert!(sink.is_untouched());
}

#[test]
fn configured_sheet_fills_records_without_their_own() {
    let mut orphan = fault(1);
    orphan.fields.remove("FoglioGeologico");
    let source = MemorySource::new().with_layer("ST018Polyline", vec![fault(0), orphan]);
    let options = PipelineOptions {
        sheet: Some("348".to_string()),
        ..PipelineOptions::default()
    };
    let mut sink = MemorySink::new();
    let summary = run(&source, &mut sink, &cache(), &options).expect("run completes");

    assert_eq!(summary.anomalies.inherited_sheet, 1);
    let layer = sink.layer("geologia_linee").expect("lines written");
    assert_eq!(
        layer.records[1].field("Foglio"),
        Some(&FieldValue::text("Capo Santa Maria di Leuca"))
    );
}

#[test]
fn zero_padded_sheet_is_kept_as_written() {
    let padded = |index: u64| fault(index).with_field("FoglioGeologico", "075");
    let orphan = |index: u64| {
        let mut record = fault(index);
        record.fields.remove("FoglioGeologico");
        record
    };
    let mut padded_missing = padded(1);
    padded_missing.geometry = None;
    let mut orphan_missing = orphan(3);
    orphan_missing.geometry = None;
    let source = MemorySource::new().with_layer(
        "ST018Polyline",
        vec![padded(0), padded_missing, orphan(2), orphan_missing],
    );
    let mut sink = MemorySink::new();
    let summary =
        run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    assert_eq!(summary.sheet, "075");
    assert_eq!(sink.reports.keys().collect::<Vec<_>>(), ["075"]);
    assert_eq!(sink.reports.get("075"), Some(&2));
    let layer = sink.layer("geologia_linee").expect("lines written");
    let sheets: Vec<Option<&FieldValue>> = layer
        .records
        .iter()
        .map(|record| record.field("Foglio"))
        .collect();
    assert_eq!(
        sheets,
        [Some(&FieldValue::text("075")), Some(&FieldValue::text("075"))]
    );
}

#[test]
fn missing_domain_table_is_reported_once() {
    let cache = DomainTableCache::new(
        InMemoryDomainTables::new()
            .with_table("d_foglio", &[("348", "Capo Santa Maria di Leuca")])
            .with_table("d_tipologia", &[("1", "certa"), ("2", "presunta")])
            .with_table("d_st018_line", &[("1", "faglia diretta")])
            .with_table("d_st018_contorno", &[("1", "si")])
            .with_table("d_st018_affiora", &[("1", "affiorante")])
            .with_table("d_fase", &[("3", "D1")]),
    );
    let mut sink = MemorySink::new();
    let summary =
        run(&lines_source(), &mut sink, &cache, &PipelineOptions::default()).expect("run completes");

    let layer = sink.layer("geologia_linee").expect("lines written");
    let folds: Vec<&FieldValue> = layer.records[3..]
        .iter()
        .filter_map(|record| record.field("Tipo_Geo"))
        .collect();
    assert_eq!(folds, [&FieldValue::text(""), &FieldValue::text("")]);
    assert_eq!(
        summary
            .missing_tables
            .iter()
            .filter(|table| table.as_str() == "d_st021")
            .count(),
        1
    );
}

#[test]
fn absent_domain_directory_aborts() {
    let dir = std::env::temp_dir().join("carg-core-tests-no-such-domini");
    let cache = DomainTableCache::new(CsvDomainDirectory::new(dir));
    let mut sink = MemorySink::new();

    let error = run(&lines_source(), &mut sink, &cache, &PipelineOptions::default())
        .expect_err("run aborts");
    assert!(matches!(
        error.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingDomainDirectory { .. })
    ));
    assert!(sink.is_untouched());
}

#[test]
fn missing_layers_fail_alone() {
    let mut sink = MemorySink::new();
    let summary = run(&lines_source(), &mut sink, &cache(), &PipelineOptions::default())
        .expect("run completes");

    assert_eq!(summary.outputs.len(), OUTPUT_PROFILES.len());
    assert_eq!(summary.emitted(), 1);
    assert!(summary.has_failures());
    let points = summary.layer("ST010Point").expect("declared layer");
    assert_eq!(points.stage, LayerStage::NotLoaded);
    match &points.outcome {
        LayerOutcome::Failed { reason } => assert!(reason.contains("not found")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn unreadable_contributor_leaves_merge_partial() {
    let source = MemorySource::new()
        .with_layer("ST018Polyline", (0..3).map(fault).collect())
        .with_broken_layer("ST021Polyline");
    let mut sink = MemorySink::new();
    let summary =
        run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    assert_eq!(sink.layer("geologia_linee").map(|layer| layer.len()), Some(3));
    let folds = summary.layer("ST021Polyline").expect("declared layer");
    assert!(folds.outcome.is_failed());
}

#[test]
fn failed_write_marks_contributors_failed() {
    let mut sink = MemorySink {
        fail_on: vec!["geologia_linee".to_string()],
        ..MemorySink::default()
    };
    let summary = run(&lines_source(), &mut sink, &cache(), &PipelineOptions::default())
        .expect("run completes");

    let output = summary.output("geologia_linee").expect("output summary");
    assert!(output.outcome.is_failed());
    assert!(summary.layer("ST018Polyline").expect("layer").outcome.is_failed());
    assert!(sink.summary.is_some());
}

#[test]
fn null_geometry_is_dropped_and_reported_per_sheet() {
    let mut missing = fault(3);
    missing.geometry = None;
    let crossing = fault(4).with_geometry(Geometry::LineString(vec![
        Coord::new(0.0, 0.0),
        Coord::new(2.0, 2.0),
        Coord::new(2.0, 0.0),
        Coord::new(0.0, 2.0),
    ]));
    let source = MemorySource::new().with_layer(
        "ST018Polyline",
        vec![fault(0), missing, crossing],
    );
    let mut sink = MemorySink::new();
    let summary =
        run(&source, &mut sink, &cache(), &PipelineOptions::default()).expect("run completes");

    let layer = sink.layer("geologia_linee").expect("lines written");
    assert_eq!(layer.len(), 2);
    let kinds: Vec<IssueKind> = sink.ledger.iter().map(|issue| issue.kind).collect();
    assert_eq!(kinds, [IssueKind::NullGeometry, IssueKind::SelfIntersection]);
    assert_eq!(sink.reports.get("348"), Some(&2));
    assert_eq!(summary.output("geologia_linee").map(|o| o.dropped), Some(1));
    assert_eq!(summary.issue_reports.len(), 1);
}

#[test]
fn identical_input_gives_identical_ledger() {
    let run_once = || {
        let mut sink = MemorySink::new();
        let mut broken = fault(0);
        broken.geometry = None;
        let source = MemorySource::new().with_layer("ST018Polyline", vec![broken, fault(1)]);
        run(&source, &mut sink, &cache(), &PipelineOptions::default())
            .expect("run completes")
            .ledger_digest
    };
    assert_eq!(run_once(), run_once());
}

#[test]
fn summary_serializes_outcomes() {
    let mut sink = MemorySink::new();
    let summary = run(&lines_source(), &mut sink, &cache(), &PipelineOptions::default())
        .expect("run completes");
    let json = serde_json::to_value(&summary).expect("serialize");
    assert_eq!(json["outputs"][4]["name"], "geologia_linee");
    assert_eq!(json["outputs"][4]["outcome"]["status"], "emitted");
    assert_eq!(json["outputs"][0]["outcome"]["status"], "failed");
    assert_eq!(json["ring_convention"], "esri");
}
