use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use super::codec::{read_model, write_model};
use crate::matrix::ScoreModel;

/// Load a decision table from a CSV file
pub fn load_model(path: &Path) -> Result<ScoreModel> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open decision table at {}", path.display()))?;

    let model = read_model(BufReader::new(file))
        .with_context(|| format!("Failed to load decision table from {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        criteria = model.criterion_count(),
        alternatives = model.alternative_count(),
        "loaded decision table"
    );
    Ok(model)
}

/// Save a decision table to a CSV file atomically
///
/// Uses atomic-write-file so an interrupted save never leaves a half-written
/// table behind. Creates the parent directory if it doesn't exist.
pub fn save_model(path: &Path, model: &ScoreModel) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    write_model(&mut file, model).context("Failed to serialize decision table")?;

    file.commit().context("Failed to save decision table")?;

    tracing::debug!(path = %path.display(), "saved decision table");
    Ok(())
}
