//! Safety checks for batch output.
//!
//! Batch mode writes one JSON file per lyric file. These checks keep a
//! mistyped output directory from overwriting the lyrics being analyzed.

use anyhow::{bail, Result};
use std::path::Path;

/// Extensions treated as lyric sources; never valid as output.
pub const SOURCE_EXTENSIONS: &[&str] = &["txt", "lrc", "lyrics"];

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must have the `.json` extension
/// - Output cannot be the same as any of the provided source paths
/// - Output cannot sit inside the input directory tree
pub fn validate_output_path(output: &Path, input_root: &Path, source_paths: &[&Path]) -> Result<()> {
    let extension = output.extension().and_then(|e| e.to_str()).unwrap_or("");

    if SOURCE_EXTENSIONS.iter().any(|s| extension.eq_ignore_ascii_case(s)) {
        bail!(
            "Safety check failed: output '{}' has a lyrics source extension",
            output.display()
        );
    }
    if !extension.eq_ignore_ascii_case("json") {
        bail!(
            "Safety check failed: output file '{}' must have a .json extension",
            output.display()
        );
    }

    for source in source_paths {
        if output == *source {
            bail!(
                "Safety check failed: output '{}' cannot be the same as source '{}'",
                output.display(),
                source.display()
            );
        }
    }

    if output.starts_with(input_root) {
        bail!(
            "Safety check failed: output '{}' is inside the input directory '{}'",
            output.display(),
            input_root.display()
        );
    }

    Ok(())
}
