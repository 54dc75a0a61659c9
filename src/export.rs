use std::io;
use std::path::Path;

use anyhow::Context;

use crate::models::AugmentedRecord;

/// Writes the augmented table as CSV. Performance indices are written unrounded.
pub fn write_csv<W: io::Write>(writer: W, records: &[AugmentedRecord]) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(records.len())
}

pub fn export_csv(path: &Path, records: &[AugmentedRecord]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, records)
}
