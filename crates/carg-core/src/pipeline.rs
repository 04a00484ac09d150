//! Run orchestration.
//!
//! # Stages
//!
//! 1. **Domain tables**: the domain directory must exist, otherwise the run aborts.
//! 2. **Load**: every declared CARG layer is located and read; a missing or
//!    unreadable layer fails on its own.
//! 3. **Sheet**: the run sheet is the first `FoglioGeologico` found across the
//!    loaded layers in declared order, kept as written; without one the run
//!    aborts, even when a sheet is configured.
//! 4. **Prepare and standardize** each layer against its own profile.
//! 5. **Merge** layers sharing a deliverable, then standardize the merged set
//!    against the deliverable's profile.
//! 6. **Validate** geometries and collect the issue ledger.
//! 7. **Emit** each deliverable.
//! 8. **Report**: the per-sheet issue reports and the run summary.
//!
//! Both abort conditions are checked before anything is written, so an
//! aborted run leaves no output.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use carg_model::{AttributeTable, FeatureRecord, IssueLedger, OutputLayer};
use carg_standards::{
    DomainTableCache, LAYER_SPECS, LayerSpec, OUTPUT_PROFILES, RingConvention,
    StandardizationProfile, merge_group_for, profile,
};
use carg_transform::prepare::SHEET_FIELD;
use carg_transform::{MergeInput, PrepareContext, StandardizeReport, merge, prepare, standardize};
use carg_validate::{ValidationOptions, validate};
use tracing::{debug, info, info_span, warn};

use crate::error::PipelineError;
use crate::io::{LayerSink, LayerSource};
use crate::summary::{
    AnomalyCounts, LayerOutcome, LayerStage, LayerSummary, OutputSummary, RunSummary,
    ledger_digest,
};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Sheet given to records without their own, instead of the run sheet.
    pub sheet: Option<String>,
    pub rings: RingConvention,
}

/// State of one declared layer while the run is in progress.
struct LayerRun {
    spec: &'static LayerSpec,
    source: Option<String>,
    records_read: usize,
    stage: LayerStage,
    records: Vec<FeatureRecord>,
    auxiliary: Vec<AttributeTable>,
    failure: Option<String>,
    location: Option<String>,
}

impl LayerRun {
    fn new(spec: &'static LayerSpec) -> Self {
        Self {
            spec,
            source: None,
            records_read: 0,
            stage: LayerStage::NotLoaded,
            records: Vec::new(),
            auxiliary: Vec::new(),
            failure: None,
            location: None,
        }
    }

    fn is_live(&self) -> bool {
        self.failure.is_none()
    }

    fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(layer = self.spec.id, reason = %reason, "layer failed");
        self.records.clear();
        self.failure = Some(reason);
    }

    fn summary(&self) -> LayerSummary {
        let outcome = match (&self.failure, &self.location) {
            (Some(reason), _) => LayerOutcome::Failed {
                reason: reason.clone(),
            },
            (None, Some(location)) => LayerOutcome::Emitted {
                location: location.clone(),
            },
            (None, None) => LayerOutcome::Failed {
                reason: "not emitted".to_string(),
            },
        };
        LayerSummary {
            layer: self.spec.id.to_string(),
            output: self.spec.output.to_string(),
            source: self.source.clone(),
            records_read: self.records_read,
            stage: self.stage,
            outcome,
        }
    }
}

/// Runs the full conversion from `source` into `sink`.
///
/// Returns a [`PipelineError`] (inside `anyhow`) when the run aborts; layer
/// failures are reported in the returned summary instead.
pub fn run(
    source: &dyn LayerSource,
    sink: &mut dyn LayerSink,
    cache: &DomainTableCache,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let run_span = info_span!("run", source = %source.describe());
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 1: Domain tables
    // =========================================================================
    if !cache.is_available() {
        return Err(PipelineError::MissingDomainDirectory {
            location: cache.describe(),
        }
        .into());
    }

    // =========================================================================
    // Stage 2: Load
    // =========================================================================
    let mut runs: Vec<LayerRun> = LAYER_SPECS
        .iter()
        .map(|spec| load_layer(source, spec))
        .collect();
    let loaded = runs.iter().filter(|layer| layer.is_live()).count();
    info!(loaded, declared = runs.len(), "layers loaded");

    // =========================================================================
    // Stage 3: Sheet
    // =========================================================================
    let sheet = resolve_sheet(&runs).ok_or(PipelineError::MissingSheetIdentifier)?;
    let inherited = options
        .sheet
        .as_deref()
        .map(str::trim)
        .filter(|configured| !configured.is_empty())
        .unwrap_or(&sheet)
        .to_string();
    info!(sheet = %sheet, inherited = %inherited, "run sheet resolved");

    // =========================================================================
    // Stage 4: Prepare and standardize
    // =========================================================================
    let mut anomalies = AnomalyCounts::default();
    let mut missing_auxiliary = BTreeSet::new();
    for layer in runs.iter_mut().filter(|layer| layer.is_live()) {
        let layer_span = info_span!("layer", layer = %layer.spec.id);
        let _layer_guard = layer_span.enter();

        let records = std::mem::take(&mut layer.records);
        let ctx = PrepareContext {
            cache,
            run_sheet: &inherited,
            auxiliary: &layer.auxiliary,
        };
        let prepared = prepare(records, layer.spec, &ctx);
        anomalies.inherited_sheet += prepared.report.inherited_sheet;
        anomalies.unmatched_join_keys += prepared.report.unmatched_keys;
        missing_auxiliary.extend(prepared.report.missing_auxiliary);
        layer.stage = LayerStage::DomainMapped;

        let profile = match profile(layer.spec.profile) {
            Ok(profile) => profile,
            Err(error) => {
                layer.fail(error.to_string());
                continue;
            }
        };
        let standardized = standardize(prepared.records, profile, cache);
        count_standardize(&mut anomalies, &standardized.report);
        layer.records = standardized.records;
        layer.stage = LayerStage::Standardized;
        debug!(records = layer.records.len(), profile = profile.name, "layer standardized");
    }

    // =========================================================================
    // Stage 5-7: Merge, validate and emit each deliverable
    // =========================================================================
    let mut ledger = IssueLedger::new();
    let mut outputs = Vec::with_capacity(OUTPUT_PROFILES.len());
    for &output in OUTPUT_PROFILES {
        let output_span = info_span!("output", output = %output);
        let _output_guard = output_span.enter();
        let summary = emit_output(
            output,
            &mut runs,
            cache,
            options.rings,
            sink,
            &mut ledger,
            &mut anomalies,
        );
        outputs.push(summary);
    }

    // =========================================================================
    // Stage 8: Reports and summary
    // =========================================================================
    let issue_reports = sink
        .write_issue_reports(&ledger)
        .context("write geometry issue reports")?;
    let stats = cache.stats();
    anomalies.unmapped_codes = stats.unmapped_codes;
    anomalies.encoding_repairs = stats.encoding_repairs;

    let summary = RunSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        source: source.describe(),
        output: sink.location(),
        sheet,
        ring_convention: options.rings.label().to_string(),
        layers: runs.iter().map(LayerRun::summary).collect(),
        outputs,
        issues_by_kind: ledger.count_by_kind(),
        total_issues: ledger.len(),
        issue_reports,
        missing_tables: stats.missing_tables,
        missing_auxiliary: missing_auxiliary.into_iter().collect(),
        anomalies,
        ledger_digest: ledger_digest(&ledger),
    };
    sink.write_summary(&summary).context("write run summary")?;
    info!(
        emitted = summary.emitted(),
        issues = summary.total_issues,
        failed = summary.has_failures(),
        "run complete"
    );
    Ok(summary)
}

fn load_layer(source: &dyn LayerSource, spec: &'static LayerSpec) -> LayerRun {
    let mut layer = LayerRun::new(spec);
    let Some(name) = source.find_layer(spec.patterns) else {
        layer.fail(format!("source layer not found (looked for {})", spec.patterns.join(", ")));
        return layer;
    };
    match source.read_layer(&name, spec.id) {
        Ok(records) => {
            layer.records_read = records.len();
            layer.records = records;
            layer.stage = LayerStage::Loaded;
        }
        Err(error) => {
            layer.source = Some(name);
            layer.fail(format!("source layer unreadable: {error:#}"));
            return layer;
        }
    }
    layer.source = Some(name);

    for table in spec.auxiliary_tables() {
        match source.read_table(table) {
            Ok(Some(table)) => layer.auxiliary.push(table),
            Ok(None) => {}
            Err(error) => {
                let message = format!("{error:#}");
                warn!(layer = spec.id, table, error = %message, "auxiliary table unreadable");
            }
        }
    }
    info!(layer = spec.id, records = layer.records_read, "layer loaded");
    layer
}

/// First sheet carried by a record, in declared layer order, as written.
fn resolve_sheet(runs: &[LayerRun]) -> Option<String> {
    runs.iter()
        .flat_map(|layer| layer.records.iter())
        .find_map(|record| {
            record
                .fields
                .lookup(SHEET_FIELD)
                .filter(|value| !value.is_blank())
                .map(|value| value.as_text().trim().to_string())
        })
}

fn count_standardize(anomalies: &mut AnomalyCounts, report: &StandardizeReport) {
    anomalies.unparseable_values += report.unparseable_total();
    anomalies.truncated_values += report.truncated;
    anomalies.defaulted_fields += report.defaulted.values().sum::<usize>();
}

fn emit_output(
    output: &str,
    runs: &mut [LayerRun],
    cache: &DomainTableCache,
    rings: RingConvention,
    sink: &mut dyn LayerSink,
    ledger: &mut IssueLedger,
    anomalies: &mut AnomalyCounts,
) -> OutputSummary {
    let members: Vec<usize> = runs
        .iter()
        .enumerate()
        .filter(|(_, layer)| layer.spec.output == output)
        .map(|(index, _)| index)
        .collect();
    let mut summary = OutputSummary {
        name: output.to_string(),
        contributors: members.iter().map(|&i| runs[i].spec.id.to_string()).collect(),
        records: 0,
        dropped: 0,
        issues: 0,
        outcome: LayerOutcome::Failed {
            reason: String::new(),
        },
    };

    let live: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| runs[i].is_live())
        .collect();
    if live.is_empty() {
        let reasons: Vec<String> = members
            .iter()
            .filter_map(|&i| {
                runs[i]
                    .failure
                    .as_ref()
                    .map(|reason| format!("{}: {reason}", runs[i].spec.id))
            })
            .collect();
        summary.outcome = LayerOutcome::Failed {
            reason: if reasons.is_empty() {
                "no contributing layer".to_string()
            } else {
                reasons.join("; ")
            },
        };
        return summary;
    }

    let output_profile = match profile(output) {
        Ok(profile) => profile,
        Err(error) => return fail_output(summary, runs, &live, error.to_string()),
    };
    let records = match assemble(output, output_profile, runs, &live, cache, anomalies) {
        Ok(records) => records,
        Err(reason) => return fail_output(summary, runs, &live, reason),
    };

    let id_field = live.first().and_then(|&i| runs[i].spec.id_field);
    let options = ValidationOptions {
        layer: output,
        geometry_type: output_profile.geometry_type,
        id_field,
        rings,
    };
    let validation = match validate(records, &options) {
        Ok(validation) => validation,
        Err(error) => return fail_output(summary, runs, &live, error.to_string()),
    };
    for &i in &live {
        runs[i].stage = LayerStage::Validated;
    }
    summary.dropped = validation.dropped();
    summary.issues = validation.issues.len();
    ledger.append(validation.issues);

    let layer = OutputLayer {
        name: output.to_string(),
        geometry_type: output_profile.geometry_type,
        field_order: output_profile
            .field_order
            .iter()
            .map(|field| (*field).to_string())
            .collect(),
        records: validation.kept,
    };
    summary.records = layer.len();
    match sink.write_layer(&layer) {
        Ok(location) => {
            info!(records = layer.len(), location = %location, "deliverable written");
            for &i in &live {
                runs[i].stage = LayerStage::Emitted;
                runs[i].location = Some(location.clone());
            }
            summary.outcome = LayerOutcome::Emitted { location };
            summary
        }
        Err(error) => fail_output(summary, runs, &live, format!("write failed: {error:#}")),
    }
}

/// Records of a deliverable: the single contributor's, or the merged and
/// re-standardized records of a merge group.
fn assemble(
    output: &str,
    output_profile: &StandardizationProfile,
    runs: &mut [LayerRun],
    live: &[usize],
    cache: &DomainTableCache,
    anomalies: &mut AnomalyCounts,
) -> std::result::Result<Vec<FeatureRecord>, String> {
    let Some(group) = merge_group_for(output) else {
        return Ok(std::mem::take(&mut runs[live[0]].records));
    };

    let mut inputs = Vec::with_capacity(group.members.len());
    for member in group.members {
        let Some(&index) = live.iter().find(|&&i| runs[i].spec.id == *member) else {
            continue;
        };
        let records = std::mem::take(&mut runs[index].records);
        inputs.push(MergeInput::new(*member, records));
    }
    let merged = merge(output, output_profile.field_order, inputs).map_err(|error| error.to_string())?;
    for &i in live {
        runs[i].stage = LayerStage::Merged;
    }

    let standardized = standardize(merged, output_profile, cache);
    count_standardize(anomalies, &standardized.report);
    Ok(standardized.records)
}

fn fail_output(
    mut summary: OutputSummary,
    runs: &mut [LayerRun],
    live: &[usize],
    reason: String,
) -> OutputSummary {
    for &i in live {
        runs[i].fail(reason.clone());
    }
    summary.outcome = LayerOutcome::Failed { reason };
    summary
}
