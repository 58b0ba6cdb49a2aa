use advisor_core::audit::{AuditEvent, AuditOutcome, AuditSink};
use advisor_core::config::{LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber on stderr; stdout carries the chat and
/// command output. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Forwards core audit events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        match event.outcome() {
            AuditOutcome::Applied => tracing::info!(
                event_name = event.event_type(),
                correlation_id = %event.correlation_id,
                session_id = ?event.session_id,
                actor = %event.actor,
                record = ?event.record,
                "audit event"
            ),
            AuditOutcome::Rejected => tracing::warn!(
                event_name = event.event_type(),
                correlation_id = %event.correlation_id,
                session_id = ?event.session_id,
                actor = %event.actor,
                record = ?event.record,
                "audit event"
            ),
        }
    }
}
