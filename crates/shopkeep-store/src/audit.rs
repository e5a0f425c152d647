//! Audit sink that forwards events to `tracing`.
//!
//! Severity maps onto the tracing level; the event kind goes out as the
//! structured `event` field so log lines can be filtered by it.

use shopkeep_core::{AuditEvent, AuditLog, Severity};
use tracing::{error, info, warn};

/// Writes every audit event as a tracing event under the `shopkeep::audit`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl AuditLog for TracingAudit {
    fn record(&self, event: &AuditEvent) {
        let kind = event.kind();
        match event.severity() {
            Severity::Info => info!(target: "shopkeep::audit", event = kind, "{}", event),
            Severity::Warning => warn!(target: "shopkeep::audit", event = kind, "{}", event),
            Severity::Error => error!(target: "shopkeep::audit", event = kind, "{}", event),
        }
    }
}
