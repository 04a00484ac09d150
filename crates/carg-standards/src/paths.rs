//! Domain table directory resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the domain table directory.
pub const DOMINI_ENV_VAR: &str = "CARG_DOMINI_DIR";

/// Directory name of the domain tables next to the input dataset.
pub const DOMINI_DIR_NAME: &str = "domini";

/// Get the domain table directory for an input dataset.
///
/// Resolution order:
/// 1. explicit directory (CLI flag or config file)
/// 2. `CARG_DOMINI_DIR` environment variable
/// 3. `domini/` inside the input directory
pub fn domini_root(explicit: Option<&Path>, input: &Path) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(root) = std::env::var(DOMINI_ENV_VAR) {
        return PathBuf::from(root);
    }
    input.join(DOMINI_DIR_NAME)
}

/// Default output directory for an input dataset.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input.join("output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins() {
        let dir = domini_root(Some(Path::new("/data/domini")), Path::new("/input"));
        assert_eq!(dir, PathBuf::from("/data/domini"));
    }

    #[test]
    fn output_defaults_under_input() {
        assert_eq!(
            default_output_dir(Path::new("/input")),
            PathBuf::from("/input/output")
        );
    }
}
