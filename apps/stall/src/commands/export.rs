//! # Export Command
//!
//! Writes one collection as `<Collection>_<dd-mm-yyyy>.csv`.

use chrono::NaiveDate;
use clap::ValueEnum;
use stall_core::{export_collection, export_file_name, Ledger, INVENTORY_COLLECTION, SALES_COLLECTION};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ApiError, Notification};

/// Which collection to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Inventory,
    Sales,
}

impl ExportTarget {
    pub fn collection_name(self) -> &'static str {
        match self {
            ExportTarget::Inventory => INVENTORY_COLLECTION,
            ExportTarget::Sales => SALES_COLLECTION,
        }
    }
}

/// Exports `target` into `dir`, named for `date`.
pub fn export(
    ledger: &Ledger,
    target: ExportTarget,
    dir: &Path,
    date: NaiveDate,
) -> Result<Notification, ApiError> {
    let (csv, rows) = match target {
        ExportTarget::Inventory => (export_collection(ledger.items())?, ledger.items().len()),
        ExportTarget::Sales => (export_collection(ledger.sales())?, ledger.sales().len()),
    };

    if csv.is_empty() {
        return Ok(Notification::info("No data to export"));
    }

    let path = dir.join(export_file_name(target.collection_name(), date));
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, csv))
        .map_err(|err| ApiError::internal(format!("Cannot write {}: {}", path.display(), err)))?;

    info!(path = %path.display(), rows, "Export written");
    Ok(Notification::success(format!(
        "Exported {} rows to {}",
        rows,
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationKind;
    use stall_core::NewItem;

    #[test]
    fn test_export_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        ledger.add_item(NewItem::with_code("A").name("Silk, red")).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let note = export(&ledger, ExportTarget::Inventory, dir.path(), date).unwrap();

        assert_eq!(note.kind, NotificationKind::Success);
        let written = fs::read_to_string(dir.path().join("Inventory_19-10-2026.csv")).unwrap();
        assert!(written.contains("\"Silk, red\""));
    }

    #[test]
    fn test_empty_collection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let note = export(&Ledger::new(), ExportTarget::Sales, dir.path(), date).unwrap();

        assert_eq!(note.kind, NotificationKind::Info);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
