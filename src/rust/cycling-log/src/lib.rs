// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use std::sync::{atomic::AtomicBool, atomic::Ordering};

#[doc(hidden)]
pub use log as _log;

#[macro_export]
macro_rules! info {
    ($msg:literal, $($arg:tt)+) => {
        cycling_log::_log::info!(target: concat!("cycling.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        cycling_log::_log::info!(target: concat!("cycling.rust::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:literal, $($arg:tt)+) => {
        cycling_log::_log::warn!(target: concat!("cycling.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        cycling_log::_log::warn!(target: concat!("cycling.rust::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! debug {
    ($msg:literal, $($arg:tt)+) => {
        cycling_log::_log::debug!(target: concat!("cycling.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        cycling_log::_log::debug!(target: concat!("cycling.rust::", module_path!()), $msg);
    };
}

/// Log a diagnostic message at info level if diagnostics logging is enabled.
#[macro_export]
macro_rules! diagnostic {
    ($msg:literal, $($arg:tt)+) => {
        if cycling_log::is_diagnostics_enabled() {
             cycling_log::_log::info!(target: concat!("cycling.rust::", module_path!()), $msg, $($arg)+);
        }
    };
    ($msg:literal) => {
        if cycling_log::is_diagnostics_enabled() {
            cycling_log::_log::info!(target: concat!("cycling.rust::", module_path!()), $msg);
        }
    };
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::Acquire)
}

/// Initialize the logging.
///
/// Meant to be called once by the embedding application before compiling
/// protocols. No concrete logger is installed here: records go through the
/// `log` facade to whatever logger the application registered. The flag only
/// controls whether compiler diagnostics (protocol summaries, step
/// coalescing) are emitted.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS_ENABLED.store(with_diagnostics, Ordering::Release);
}
