use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::Path;

use crate::reconcile::Reconciliation;

/// Save the run's verdicts and tally as pretty JSON, atomically.
///
/// The file is never left half-written if the process dies mid-write.
pub fn write_report(path: &Path, reconciliation: &Reconciliation) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open report file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, reconciliation).context("Failed to serialize report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}
