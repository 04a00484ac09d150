use anyhow::{Context, Result};
use carg_core::run;
use carg_ingest::GeoJsonDirectory;
use carg_output::DirectorySink;
use carg_standards::{CsvDomainDirectory, DomainTableCache, LAYER_SPECS, merge_group_for};
use comfy_table::Table;
use tracing::{info, info_span};

use carg_cli::settings::{Overrides, RunSettings};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;
use crate::types::RunResult;

pub fn run_layers() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Layer", "Geometry", "Profile", "Deliverable", "Domain tables"]);
    apply_table_style(&mut table);
    for spec in LAYER_SPECS {
        let deliverable = match merge_group_for(spec.output) {
            Some(_) => format!("{} (merged)", spec.output),
            None => spec.output.to_string(),
        };
        table.add_row(vec![
            spec.id.to_string(),
            spec.geometry_type.to_string(),
            spec.profile.to_string(),
            deliverable,
            spec.tables().join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_conversion(args: &RunArgs) -> Result<RunResult> {
    let overrides = Overrides {
        output_dir: args.output.clone(),
        domini_dir: args.domini.clone(),
        config: args.config.clone(),
        sheet: args.sheet.clone(),
        ring_convention: args.ring_convention.map(Into::into),
    };
    let settings = RunSettings::resolve(&args.input, &overrides)?;
    let span = info_span!("carg", input = %settings.input.display());
    let _guard = span.enter();
    info!(
        output = %settings.output_dir.display(),
        domini = %settings.domini_dir.display(),
        rings = %settings.ring_convention,
        "starting run"
    );

    let source = GeoJsonDirectory::open(&settings.input)
        .with_context(|| format!("open dataset {}", settings.input.display()))?;
    let cache = DomainTableCache::new(CsvDomainDirectory::new(&settings.domini_dir));
    let mut sink = DirectorySink::new(&settings.output_dir);
    let summary = run(&source, &mut sink, &cache, &settings.pipeline_options())?;
    Ok(RunResult { settings, summary })
}
