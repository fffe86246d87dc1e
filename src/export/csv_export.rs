//! CSV export functionality
//!
//! Provides CSV serialization for bucket records and window totals.

use std::path::PathBuf;

use csv::Writer;

use super::{ExportableBucket, ExportableTotal};
use crate::Error;

/// Write bucket records to CSV format
pub fn write_buckets_csv(buckets: &[ExportableBucket], path: &PathBuf) -> Result<(), Error> {
    let file = std::fs::File::create(path)
        .map_err(|e| Error::Internal(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    for bucket in buckets {
        writer
            .serialize(bucket)
            .map_err(|e| Error::Internal(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::Internal(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

/// Write per-window grand totals to CSV format
pub fn write_totals_csv(totals: &[ExportableTotal], path: &PathBuf) -> Result<(), Error> {
    let file = std::fs::File::create(path)
        .map_err(|e| Error::Internal(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    for total in totals {
        writer
            .serialize(total)
            .map_err(|e| Error::Internal(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::Internal(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}
