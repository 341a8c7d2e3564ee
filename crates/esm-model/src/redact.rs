//! Redaction of record-level values in log output.
//!
//! Customer identifiers and other cell values are only written to logs when
//! explicitly enabled; otherwise a fixed token is logged in their place.

use std::sync::atomic::{AtomicBool, Ordering};

static LOG_RECORDS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when record-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

pub fn set_log_records(enabled: bool) {
    LOG_RECORDS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Returns true if record-level logging is explicitly enabled.
pub fn log_records_enabled() -> bool {
    LOG_RECORDS_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when record logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_records_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}
