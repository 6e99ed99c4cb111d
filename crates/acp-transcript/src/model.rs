// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

/// Marker for a message the peer under test is expected to send us.
pub const OUT_MARKER: &str = "OUT:";

/// Marker for a scripted message we send to the peer under test.
pub const IN_MARKER: &str = "IN:";

/// One classified transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// The next inbound message must structurally equal `expected`.
    Assertion { expected: String },
    /// `payload` is written verbatim to the outbound stream.
    Emission { payload: String },
}

impl Directive {
    /// Classify a single transcript line.
    ///
    /// `OUT:` is checked before `IN:` regardless of where either appears in
    /// the line. Only the first occurrence of the winning marker matters; the
    /// payload is the trimmed remainder after it. Lines with neither marker
    /// yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(expected) = payload_after(line, OUT_MARKER) {
            return Some(Directive::Assertion { expected });
        }
        payload_after(line, IN_MARKER).map(|payload| Directive::Emission { payload })
    }

    pub fn payload(&self) -> &str {
        match self {
            Directive::Assertion { expected } => expected,
            Directive::Emission { payload } => payload,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Assertion { .. } => "assertion",
            Directive::Emission { .. } => "emission",
        }
    }
}

fn payload_after(line: &str, marker: &str) -> Option<String> {
    line.find(marker).map(|idx| line[idx + marker.len()..].trim().to_string())
}

/// A directive together with the 1-based transcript line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub line: usize,
    pub directive: Directive,
}
