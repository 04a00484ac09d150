use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use carg_core::{LayerOutcome, OutputSummary, RunSummary};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let summary = &result.summary;
    println!("Input: {}", result.settings.input.display());
    println!("Output: {}", result.settings.output_dir.display());
    println!("Sheet: {} ({} rings)", summary.sheet, summary.ring_convention);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Deliverable"),
        header_cell("Layers"),
        header_cell("Records"),
        header_cell("Dropped"),
        header_cell("Issues"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    let mut total_records = 0usize;
    let mut total_dropped = 0usize;
    let mut total_issues = 0usize;
    for output in &summary.outputs {
        total_records += output.records;
        total_dropped += output.dropped;
        total_issues += output.issues;
        table.add_row(vec![
            Cell::new(&output.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(output.contributors.join(", ")),
            Cell::new(output.records),
            count_cell(output.dropped, Color::Yellow),
            count_cell(output.issues, Color::Yellow),
            status_cell(output),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} of {} written", summary.emitted(), summary.outputs.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(total_dropped, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total_issues, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_kinds(summary);
    print_notes(summary);
}

fn print_issue_kinds(summary: &RunSummary) {
    if summary.issues_by_kind.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Issue"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (kind, count) in &summary.issues_by_kind {
        table.add_row(vec![Cell::new(kind.label()), Cell::new(count)]);
    }
    println!();
    println!("Geometry issues:");
    println!("{table}");
    for report in &summary.issue_reports {
        println!("Report: {report}");
    }
}

fn print_notes(summary: &RunSummary) {
    if !summary.missing_tables.is_empty() {
        println!("Missing domain tables: {}", summary.missing_tables.join(", "));
    }
    if !summary.missing_auxiliary.is_empty() {
        println!("Missing auxiliary tables: {}", summary.missing_auxiliary.join(", "));
    }
    let anomalies = &summary.anomalies;
    println!(
        "Unmapped codes: {}, unparseable values: {}, truncated values: {}, encoding repairs: {}",
        anomalies.unmapped_codes,
        anomalies.unparseable_values,
        anomalies.truncated_values,
        anomalies.encoding_repairs
    );
    let failures: Vec<String> = summary
        .layers
        .iter()
        .filter_map(|layer| match &layer.outcome {
            LayerOutcome::Failed { reason } => Some(format!("{}: {reason}", layer.layer)),
            LayerOutcome::Emitted { .. } => None,
        })
        .collect();
    if !failures.is_empty() {
        eprintln!("Failed layers:");
        for failure in failures {
            eprintln!("- {failure}");
        }
    }
}

fn status_cell(output: &OutputSummary) -> Cell {
    match &output.outcome {
        LayerOutcome::Emitted { .. } => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        LayerOutcome::Failed { .. } => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
