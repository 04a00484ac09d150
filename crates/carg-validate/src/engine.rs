use carg_model::{FeatureRecord, GeometryIssue, GeometryType, IssueKind};
use carg_standards::RingConvention;
use tracing::{debug, warn};

use crate::checks::{CheckContext, run_all};
use crate::error::ValidateError;

#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions<'a> {
    /// Output layer name, used in errors and logs.
    pub layer: &'a str,
    pub geometry_type: GeometryType,
    /// Field identifying a feature in the report.
    pub id_field: Option<&'a str>,
    pub rings: RingConvention,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub kept: Vec<FeatureRecord>,
    pub issues: Vec<GeometryIssue>,
}

impl Validation {
    pub fn dropped(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.kind.excludes_record())
            .count()
    }
}

/// Checks every record's geometry.
///
/// A record with a null geometry is reported and left out of `kept`; every
/// other faulted record is reported and kept unchanged. A record reports each
/// distinct fault kind once, in [`IssueKind`] order. The only error is a batch
/// in which no record carries a sheet identifier.
pub fn validate(
    records: Vec<FeatureRecord>,
    options: &ValidationOptions<'_>,
) -> Result<Validation, ValidateError> {
    if records.is_empty() {
        return Ok(Validation {
            kept: records,
            issues: Vec::new(),
        });
    }

    let Some(batch_sheet) = records
        .iter()
        .find_map(|record| record.provenance.sheet.clone())
    else {
        return Err(ValidateError::MissingSheetIdentifier {
            layer: options.layer.to_string(),
        });
    };

    let ctx = CheckContext {
        declared: options.geometry_type,
        rings: options.rings,
    };
    let mut kept = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for record in records {
        let issue = |kind: IssueKind, detail: String| GeometryIssue {
            sheet: record
                .provenance
                .sheet
                .clone()
                .unwrap_or_else(|| batch_sheet.clone()),
            layer: record.provenance.source_layer.clone(),
            feature_id: feature_id(&record, options.id_field),
            kind,
            detail,
        };

        let Some(geometry) = &record.geometry else {
            issues.push(issue(IssueKind::NullGeometry, "geometry is null".to_string()));
            continue;
        };
        for finding in run_all(geometry, &ctx) {
            issues.push(issue(finding.kind, finding.detail));
        }
        kept.push(record);
    }

    let validation = Validation { kept, issues };
    let dropped = validation.dropped();
    if dropped > 0 {
        warn!(layer = options.layer, dropped, "records without geometry left out of the output");
    }
    debug!(
        layer = options.layer,
        kept = validation.kept.len(),
        issues = validation.issues.len(),
        "geometry validation complete"
    );
    Ok(validation)
}

/// Value of the id field, or `#<fid>` when the record has none.
pub fn feature_id(record: &FeatureRecord, id_field: Option<&str>) -> String {
    id_field
        .and_then(|field| record.fields.lookup(field))
        .filter(|value| !value.is_blank())
        .map_or_else(
            || format!("#{}", record.provenance.fid),
            |value| value.as_text().trim().to_string(),
        )
}
