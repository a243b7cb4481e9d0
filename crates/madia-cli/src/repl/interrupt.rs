//! Ctrl-C while a command is running.
//!
//! At the prompt rustyline owns the terminal and reports interrupts itself.
//! While a handler runs, a process-wide signal handler raises a flag instead
//! of killing the process; the loop checks it once the handler returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static FLAG: OnceLock<Option<Arc<AtomicBool>>> = OnceLock::new();

/// Shared interrupt flag, installing the signal handler on first use.
///
/// `None` when the handler could not be installed; Ctrl-C then keeps its
/// default behaviour outside the prompt.
pub fn interrupt_flag() -> Option<Arc<AtomicBool>> {
    FLAG.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let raised = Arc::clone(&flag);
        match ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst)) {
            Ok(()) => Some(flag),
            Err(e) => {
                tracing::warn!(error = %e, "could not install interrupt handler");
                None
            }
        }
    })
    .clone()
}
