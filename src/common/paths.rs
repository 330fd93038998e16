//! Resolution of image names given on the command line.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Resolve `name` to an existing image file.
///
/// A path that exists as given is used directly. Otherwise a relative name is
/// looked up inside `pictures_dir`.
///
/// # Errors
/// "image not found" when neither location exists.
pub fn resolve_image(name: &str, pictures_dir: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Ok(direct);
    }

    if direct.is_relative() {
        let candidate = pictures_dir.join(&direct);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    bail!(
        "image not found: {} (also looked in {})",
        name,
        pictures_dir.display()
    )
}
