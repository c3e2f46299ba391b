//! # Point-of-Sale Session
//!
//! The cart being built at the till and the scanner feeding it.
//!
//! ## Scanner Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   start_scanning(s) ──► [ scanner open ] ──┬── on_decoded(text) ──┐     │
//! │         ▲                                  ├── switch_mode() ─────┤     │
//! │         │                                  └── start_scanning() ──┤     │
//! │         │                                                         ▼     │
//! │         └────────────────────────────── stop() attempted, scanner dropped│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! At most one scanner is open. A failing `stop()` is logged and the handle
//! is dropped anyway.

use stall_core::{Cart, CartLine, CodeInput, Ledger, PaymentMethod, Sale};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::LedgerState;

/// Scanner failures.
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("Scanner failed to stop: {0}")]
    StopFailed(String),
}

/// An open camera scanning session, owned exclusively by the till.
pub trait Scanner: Send {
    /// Releases the camera.
    fn stop(&mut self) -> Result<(), ScannerError>;
}

/// Till state: one cart, at most one scanner.
#[derive(Default)]
pub struct PosSession {
    cart: Cart,
    scanner: Option<Box<dyn Scanner>>,
}

impl PosSession {
    pub fn new() -> Self {
        PosSession::default()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn is_scanning(&self) -> bool {
        self.scanner.is_some()
    }

    /// Takes ownership of a freshly opened scanner, closing any previous one.
    pub fn start_scanning(&mut self, scanner: Box<dyn Scanner>) {
        self.stop_scanning();
        debug!("Scanner started");
        self.scanner = Some(scanner);
    }

    /// Stops and drops the scanner, if any.
    pub fn stop_scanning(&mut self) {
        if let Some(mut scanner) = self.scanner.take() {
            match scanner.stop() {
                Ok(()) => debug!("Scanner stopped"),
                Err(err) => warn!(error = %err, "Scanner stop failed"),
            }
        }
    }

    /// Handles decoded scanner text: closes the scanner, then stages the item.
    pub fn on_decoded(&mut self, ledger: &Ledger, text: &str) -> Result<&CartLine, ApiError> {
        self.stop_scanning();
        Ok(self.cart.add_input(ledger, &CodeInput::Scanned(text.to_string()))?)
    }

    /// Stages an item from a typed code.
    pub fn add_manual(&mut self, ledger: &Ledger, text: &str) -> Result<&CartLine, ApiError> {
        Ok(self.cart.add_input(ledger, &CodeInput::Manual(text.to_string()))?)
    }

    /// Leaving the till view: scanner closed, cart discarded.
    pub fn switch_mode(&mut self) {
        self.stop_scanning();
        if !self.cart.is_empty() {
            debug!(lines = self.cart.len(), "Discarding cart on mode switch");
        }
        self.cart.clear();
    }

    /// Checks out the cart through the session's ledger.
    pub async fn checkout(
        &mut self,
        state: &mut LedgerState,
        method: PaymentMethod,
    ) -> Result<Vec<Sale>, ApiError> {
        let cart = &mut self.cart;
        state.apply(|ledger| ledger.checkout(cart, method)).await
    }
}

impl Drop for PosSession {
    fn drop(&mut self) {
        self.stop_scanning();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_core::NewItem;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeScanner {
        stops: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Scanner for FakeScanner {
        fn stop(&mut self) -> Result<(), ScannerError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ScannerError::StopFailed("camera busy".into()))
            } else {
                Ok(())
            }
        }
    }

    fn scanner(stops: &Arc<AtomicUsize>, fail: bool) -> Box<dyn Scanner> {
        Box::new(FakeScanner {
            stops: Arc::clone(stops),
            fail,
        })
    }

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_item(NewItem::with_code("SAR101").list_price("500")).unwrap();
        ledger
    }

    #[test]
    fn test_decode_stops_scanner_and_adds() {
        let stops = Arc::new(AtomicUsize::new(0));
        let ledger = ledger();
        let mut session = PosSession::new();

        session.start_scanning(scanner(&stops, false));
        session.on_decoded(&ledger, "sar101\n").unwrap();

        assert!(!session.is_scanning());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(session.cart().len(), 1);
    }

    #[test]
    fn test_only_one_scanner_open() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut session = PosSession::new();

        session.start_scanning(scanner(&stops, false));
        session.start_scanning(scanner(&stops, false));

        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(session.is_scanning());
    }

    #[test]
    fn test_switch_mode_clears_even_if_stop_fails() {
        let stops = Arc::new(AtomicUsize::new(0));
        let ledger = ledger();
        let mut session = PosSession::new();
        session.add_manual(&ledger, "SAR101").unwrap();
        session.start_scanning(scanner(&stops, true));

        session.switch_mode();

        assert!(!session.is_scanning());
        assert!(session.cart().is_empty());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_scan_is_not_found() {
        let ledger = ledger();
        let mut session = PosSession::new();

        let err = session.on_decoded(&ledger, "NOPE").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
