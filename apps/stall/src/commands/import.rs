//! # Import Command
//!
//! Reads a stock sheet from disk and imports it in one step.

use stall_core::ImportSummary;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ApiError, Notification};
use crate::state::LedgerState;

/// Imports a `,` or `|` separated file whose first row is the header.
pub async fn import_file(state: &mut LedgerState, path: &Path) -> Result<Notification, ApiError> {
    let text = fs::read_to_string(path)
        .map_err(|err| ApiError::validation(format!("Cannot read {}: {}", path.display(), err)))?;

    info!(path = %path.display(), bytes = text.len(), "Importing stock sheet");
    import_text(state, &text).await
}

/// Imports pasted text.
pub async fn import_text(state: &mut LedgerState, text: &str) -> Result<Notification, ApiError> {
    let summary = state.apply(|ledger| ledger.import_table(text)).await?;
    Ok(summary_notification(&summary))
}

fn summary_notification(summary: &ImportSummary) -> Notification {
    let mut skipped = Vec::new();
    if summary.duplicate_count > 0 {
        skipped.push(format!("{} duplicate", summary.duplicate_count));
    }
    if summary.blank_count > 0 {
        skipped.push(format!("{} without code", summary.blank_count));
    }
    if summary.invalid_count > 0 {
        skipped.push(format!("{} invalid code", summary.invalid_count));
    }

    let mut message = format!("Imported {} items", summary.added_count);
    if !skipped.is_empty() {
        message.push_str(&format!("; skipped {}", skipped.join(", ")));
    }

    if summary.added_count == 0 {
        Notification::info(message)
    } else {
        Notification::success(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_message() {
        let note = summary_notification(&ImportSummary {
            added_count: 2,
            duplicate_count: 1,
            blank_count: 1,
            invalid_count: 0,
        });
        assert_eq!(note.message, "Imported 2 items; skipped 1 duplicate, 1 without code");

        let nothing = summary_notification(&ImportSummary::default());
        assert_eq!(nothing.kind, crate::error::NotificationKind::Info);
    }
}
