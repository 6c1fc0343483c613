//! Process-wide diagnostic switch
//!
//! Warnings and errors are always emitted through `tracing`. Verbose
//! `debug!` traces from the media components are emitted only once
//! `enable_debug()` has been called. There is no way to turn it back off.

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Turn on verbose diagnostics for every instance in the process
pub fn enable_debug() {
    DEBUG.store(true, Ordering::Relaxed);
}

pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// `tracing::debug!`, gated on [`enable_debug`]
#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        if $crate::diagnostics::debug_enabled() {
            ::tracing::debug!($($arg)*);
        }
    };
}
