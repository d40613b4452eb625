//! Logger capability
//!
//! Four severity-leveled diagnostic sinks. Logging never affects control flow
//! or return values; a logger that drops everything is a valid implementation.

use std::fmt;

/// Pluggable diagnostic sink.
pub trait Logger: Send + Sync {
    /// Informational message.
    fn info(&self, message: fmt::Arguments<'_>);

    /// A degraded-but-recovered condition.
    fn warn(&self, message: fmt::Arguments<'_>);

    /// A failure that was swallowed or surfaced.
    fn error(&self, message: fmt::Arguments<'_>);

    /// Diagnostic detail.
    fn debug(&self, message: fmt::Arguments<'_>);
}

/// Default logger: forwards each severity to the matching `tracing` macro.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: fmt::Arguments<'_>) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        tracing::error!("{}", message);
    }

    fn debug(&self, message: fmt::Arguments<'_>) {
        tracing::debug!("{}", message);
    }
}
