// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use acp_transcript::TranscriptError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

/// Conditions that end a replay session.
///
/// Per-directive comparison failures are not errors; see
/// [`MatchOutcome`](crate::MatchOutcome).
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error("failed to read from inbound stream: {0}")]
    Inbound(#[source] std::io::Error),

    #[error("failed to write to outbound stream: {0}")]
    Outbound(#[source] std::io::Error),
}

impl ReplayError {
    /// Message for the `ERROR:` line printed before exiting.
    pub fn diagnostic(&self) -> String {
        match self {
            ReplayError::Transcript(TranscriptError::SourceNotFound { .. }) => self.to_string(),
            other => format!("Unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_transcript_keeps_its_own_wording() {
        let err = ReplayError::from(TranscriptError::SourceNotFound {
            path: PathBuf::from("/tmp/missing.log"),
        });
        assert_eq!(err.diagnostic(), "Replay file not found: /tmp/missing.log");
    }

    #[test]
    fn other_failures_are_unexpected() {
        let err = ReplayError::Outbound(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        assert_eq!(
            err.diagnostic(),
            "Unexpected error: failed to write to outbound stream: pipe closed"
        );
    }
}
