//! Best-effort diagnostics reporting.
//!
//! Search degrades soft on malformed queries: the failure is reported here
//! and the search returns no results instead of surfacing an error. Sinks
//! are fire-and-forget; reporting must never fail visibly to the caller.

use std::sync::Mutex;

use tracing::warn;

/// A fire-and-forget diagnostics sink.
pub trait Diagnostics {
    fn report(&self, message: &str);
}

/// Default sink: reports through the tracing infrastructure.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, message: &str) {
        warn!(target: "stacksift::diagnostics", "{message}");
    }
}

/// Capturing sink for tests: records every reported message.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_records_messages() {
        let sink = CollectingDiagnostics::new();
        sink.report("first");
        sink.report("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }
}
