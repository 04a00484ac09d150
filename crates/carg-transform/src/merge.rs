//! Concatenation of standardized layers that share one output schema.

use std::collections::BTreeSet;

use carg_model::FeatureRecord;
use tracing::info;

use crate::error::{Result, TransformError};

/// One contributor to a merge, already standardized to the target schema.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeInput {
    pub layer: String,
    pub records: Vec<FeatureRecord>,
}

impl MergeInput {
    pub fn new(layer: impl Into<String>, records: Vec<FeatureRecord>) -> Self {
        Self {
            layer: layer.into(),
            records,
        }
    }
}

/// Appends `inputs` in the given order, keeping record order within each input.
///
/// Every record must carry exactly the fields of `field_order`; a contributor
/// that does not is rejected as a whole rather than having fields dropped.
pub fn merge(output: &str, field_order: &[&str], inputs: Vec<MergeInput>) -> Result<Vec<FeatureRecord>> {
    let expected: BTreeSet<&str> = field_order.iter().copied().collect();
    for input in &inputs {
        check_schema(output, &expected, input)?;
    }

    let total: usize = inputs.iter().map(|input| input.records.len()).sum();
    let mut merged = Vec::with_capacity(total);
    for input in inputs {
        info!(output, layer = %input.layer, records = input.records.len(), "appending layer");
        merged.extend(input.records);
    }
    debug_assert_eq!(merged.len(), total);
    Ok(merged)
}

fn check_schema(output: &str, expected: &BTreeSet<&str>, input: &MergeInput) -> Result<()> {
    for record in &input.records {
        let actual: BTreeSet<&str> = record.fields.names().collect();
        if actual != *expected {
            let missing: Vec<&str> = expected.difference(&actual).copied().collect();
            let unexpected: Vec<&str> = actual.difference(expected).copied().collect();
            return Err(TransformError::SchemaMismatch {
                layer: input.layer.clone(),
                output: output.to_string(),
                missing: missing.join(", "),
                unexpected: unexpected.join(", "),
            });
        }
    }
    Ok(())
}
