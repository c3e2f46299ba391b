//! # Factory Reset Command

use tracing::warn;

use crate::error::{ApiError, Notification};
use crate::state::LedgerState;

/// Erases all items and sales once the PIN matches.
pub async fn factory_reset(state: &mut LedgerState, pin: &str) -> Result<Notification, ApiError> {
    if let Err(err) = state.factory_reset(pin).await {
        warn!(code = ?err.code, "Factory reset refused");
        return Err(err);
    }
    Ok(Notification::success("All items and sales erased"))
}
