// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `ERROR:`-prefixed reporting on the diagnostic stream

use std::io::Write;

use crate::matcher::MatchOutcome;

/// Line-oriented sink for user-facing replay diagnostics.
///
/// Reporting is fire-and-forget: a failure to write a diagnostic is logged
/// and otherwise ignored so it can never interrupt the replay.
pub struct Diagnostics {
    sink: Box<dyn Write + Send>,
}

impl Diagnostics {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Report a failed comparison with both raw payloads.
    pub fn mismatch(&mut self, outcome: &MatchOutcome, expected: &str, actual: &str) {
        let mut report = String::new();
        if let Some(err) = outcome.parse_error() {
            report.push_str(&format!("ERROR: Failed to parse JSON: {err}\n"));
        }
        report.push_str("ERROR: JSON mismatch\n");
        report.push_str(&format!("Expected: {expected}\n"));
        report.push_str(&format!("Actual: {actual}\n"));
        self.write(&report);
    }

    /// Report a condition that ends the run.
    pub fn fatal(&mut self, message: impl std::fmt::Display) {
        self.write(&format!("ERROR: {message}\n"));
    }

    fn write(&mut self, report: &str) {
        let result = self
            .sink
            .write_all(report.as_bytes())
            .and_then(|_| self.sink.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write diagnostic");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory sink for asserting on diagnostic output.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn structural_mismatch_reports_both_payloads() {
        let buffer = SharedBuffer::default();
        let mut diagnostics = Diagnostics::new(buffer.clone());
        diagnostics.mismatch(&MatchOutcome::Mismatched, "{\"a\":1}", "{\"a\":2}");
        assert_eq!(
            buffer.contents(),
            "ERROR: JSON mismatch\nExpected: {\"a\":1}\nActual: {\"a\":2}\n"
        );
    }

    #[test]
    fn parse_failure_is_reported_before_mismatch() {
        let buffer = SharedBuffer::default();
        let mut diagnostics = Diagnostics::new(buffer.clone());
        let outcome = MatchOutcome::ActualUnparseable("EOF while parsing".into());
        diagnostics.mismatch(&outcome, "{}", "");
        let text = buffer.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ERROR: Failed to parse JSON: EOF while parsing");
        assert_eq!(lines[1], "ERROR: JSON mismatch");
        assert_eq!(lines[3], "Actual: ");
    }

    #[test]
    fn fatal_messages_carry_error_prefix() {
        let buffer = SharedBuffer::default();
        let mut diagnostics = Diagnostics::new(buffer.clone());
        diagnostics.fatal("Replay file not found: /nope");
        assert_eq!(buffer.contents(), "ERROR: Replay file not found: /nope\n");
    }
}
