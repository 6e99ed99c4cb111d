// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;

/// Immutable settings for one replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Transcript file with `OUT:`/`IN:` directives.
    pub transcript: PathBuf,
    /// Substituted for recorded `params.cwd` values before comparison.
    pub project_root: String,
}

impl SessionConfig {
    pub fn new(transcript: impl Into<PathBuf>, project_root: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            project_root: project_root.into(),
        }
    }
}
