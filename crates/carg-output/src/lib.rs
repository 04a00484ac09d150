//! Writing the deliverables of a run.
//!
//! - **GeoJSON**: one FeatureCollection per deliverable, properties in
//!   profile order
//! - **Issue reports**: one `F<sheet>_geometry_issues.csv` per map sheet
//! - **Summary**: `run_summary.json`

mod common;
pub mod error;
mod geojson;
mod report;
mod sink;
mod summary;

pub use common::{ensure_output_dir, sanitize_sheet};
pub use error::{OutputError, Result};
pub use geojson::{layer_to_geojson, write_geojson_layer};
pub use report::{
    REPORT_HEADER, render_issue_report, report_file_name, report_file_names, write_issue_report,
};
pub use sink::DirectorySink;
pub use summary::{SUMMARY_FILE_NAME, write_summary_json};
