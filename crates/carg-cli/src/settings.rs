//! Effective run settings: command-line flags over the config file over defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carg_core::PipelineOptions;
use carg_standards::{RingConvention, RunConfig, default_output_dir, domini_root};

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub domini_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sheet: Option<String>,
    pub ring_convention: Option<RingConvention>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub domini_dir: PathBuf,
    pub sheet: Option<String>,
    pub ring_convention: RingConvention,
}

impl RunSettings {
    pub fn resolve(input: &Path, overrides: &Overrides) -> Result<Self> {
        let config = match &overrides.config {
            Some(path) => {
                RunConfig::load(path).with_context(|| format!("load config {}", path.display()))?
            }
            None => RunConfig::default(),
        };
        Ok(Self::merge(input, overrides, config))
    }

    fn merge(input: &Path, overrides: &Overrides, config: RunConfig) -> Self {
        let explicit_domini = overrides.domini_dir.as_deref().or(config.domini_dir.as_deref());
        let domini_dir = domini_root(explicit_domini, input);
        let output_dir = overrides
            .output_dir
            .clone()
            .or(config.output_dir)
            .unwrap_or_else(|| default_output_dir(input));
        Self {
            input: input.to_path_buf(),
            output_dir,
            domini_dir,
            sheet: overrides.sheet.clone().or(config.sheet),
            ring_convention: overrides.ring_convention.unwrap_or(config.ring_convention),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            sheet: self.sheet.clone(),
            rings: self.ring_convention,
        }
    }
}
