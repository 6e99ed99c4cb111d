// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;
use thiserror::Error;

/// Convenient result alias for transcript operations.
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Errors that can occur while opening or reading a transcript.
///
/// Both variants are fatal for a replay session.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// The transcript source could not be opened because it does not exist.
    #[error("Replay file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Any other IO failure while opening or reading the transcript.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
