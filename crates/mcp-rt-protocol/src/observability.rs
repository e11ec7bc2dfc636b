//! Logging and clock collaborators the core consumes but never owns (§10.1).
//!
//! Handlers, the dispatcher, and the transports only ever call [`Logger`];
//! nothing outside [`TracingLogger`] reaches for `tracing`'s macros
//! directly, so "callers supply the sink" stays literally true.

use std::time::SystemTime;

/// Structured fields a call site may attach to a log event. Every field is
/// optional; absent fields are simply not emitted.
#[derive(Debug, Clone, Default)]
pub struct LogFields {
    pub session_id: Option<String>,
    pub method: Option<String>,
    pub correlation_id: Option<u64>,
    pub event_id: Option<u64>,
}

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_correlation_id(mut self, id: u64) -> Self {
        self.correlation_id = Some(id);
        self
    }

    pub fn with_event_id(mut self, id: u64) -> Self {
        self.event_id = Some(id);
        self
    }
}

/// The one logging seam the core depends on (§1) — never a sink directly.
/// Every suspension point named in §5 (transport I/O, handler invocation,
/// SSE writes, slot drops) calls this at `debug` on the steady path and
/// `warn`/`error` on failure paths.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, fields: LogFields);
    fn info(&self, message: &str, fields: LogFields);
    fn warn(&self, message: &str, fields: LogFields);
    fn error(&self, message: &str, fields: LogFields);
}

/// Discards every event. Useful for tests and embedders with no logging
/// story of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: LogFields) {}
    fn info(&self, _message: &str, _fields: LogFields) {}
    fn warn(&self, _message: &str, _fields: LogFields) {}
    fn error(&self, _message: &str, _fields: LogFields) {}
}

/// Delegates to whatever `tracing` subscriber the caller has installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, fields: LogFields) {
        tracing::debug!(
            session_id = fields.session_id.as_deref(),
            method = fields.method.as_deref(),
            correlation_id = fields.correlation_id,
            event_id = fields.event_id,
            "{message}"
        );
    }

    fn info(&self, message: &str, fields: LogFields) {
        tracing::info!(
            session_id = fields.session_id.as_deref(),
            method = fields.method.as_deref(),
            correlation_id = fields.correlation_id,
            event_id = fields.event_id,
            "{message}"
        );
    }

    fn warn(&self, message: &str, fields: LogFields) {
        tracing::warn!(
            session_id = fields.session_id.as_deref(),
            method = fields.method.as_deref(),
            correlation_id = fields.correlation_id,
            event_id = fields.event_id,
            "{message}"
        );
    }

    fn error(&self, message: &str, fields: LogFields) {
        tracing::error!(
            session_id = fields.session_id.as_deref(),
            method = fields.method.as_deref(),
            correlation_id = fields.correlation_id,
            event_id = fields.event_id,
            "{message}"
        );
    }
}

/// The one time source the core depends on — session expiry sweeps and
/// SSE/event timestamps read this instead of calling `SystemTime::now()`
/// directly, so tests can substitute a fixed clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_logger_accepts_all_levels_without_panicking() {
        let logger = NoopLogger;
        logger.debug("d", LogFields::new());
        logger.info("i", LogFields::new());
        logger.warn("w", LogFields::new());
        logger.error("e", LogFields::new());
    }

    #[test]
    fn system_clock_advances_or_holds_steady() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    struct FixedClock(SystemTime);

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            self.0
        }
    }

    #[test]
    fn custom_clock_is_substitutable() {
        let fixed = SystemTime::UNIX_EPOCH;
        let clock = FixedClock(fixed);
        assert_eq!(clock.now(), fixed);
    }

    #[test]
    fn log_fields_builder_sets_only_requested_fields() {
        let fields = LogFields::new()
            .with_session_id("sess-1")
            .with_correlation_id(42);
        assert_eq!(fields.session_id.as_deref(), Some("sess-1"));
        assert_eq!(fields.correlation_id, Some(42));
        assert!(fields.method.is_none());
    }
}
