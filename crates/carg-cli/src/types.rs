use carg_core::RunSummary;

use carg_cli::settings::RunSettings;

#[derive(Debug)]
pub struct RunResult {
    pub settings: RunSettings,
    pub summary: RunSummary,
}
