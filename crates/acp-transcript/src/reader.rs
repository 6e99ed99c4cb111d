// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{
    Result, TranscriptError,
    model::{Directive, TranscriptEntry},
};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Lazy, forward-only reader over the lines of a recorded transcript.
///
/// Lines are pulled from the underlying source only when asked for, so a
/// replay never holds more than the current line in memory.
pub struct TranscriptReader<R> {
    lines: Lines<R>,
    line: usize,
    skipped: usize,
}

impl TranscriptReader<BufReader<File>> {
    /// Open a transcript file.
    ///
    /// A missing file maps to [`TranscriptError::SourceNotFound`]; every other
    /// failure is reported as [`TranscriptError::Io`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TranscriptError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => TranscriptError::Io(e),
        })?;
        tracing::debug!(path = %path.display(), "Opened transcript");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> TranscriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            skipped: 0,
        }
    }

    /// Next raw line with its line terminator stripped, or `None` at the end.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let next = self.lines.next_line().await?;
        if next.is_some() {
            self.line += 1;
        }
        Ok(next)
    }

    /// Next directive, silently skipping lines that carry no marker.
    pub async fn next_entry(&mut self) -> Result<Option<TranscriptEntry>> {
        while let Some(text) = self.next_line().await? {
            match Directive::parse(&text) {
                Some(directive) => {
                    return Ok(Some(TranscriptEntry {
                        line: self.line,
                        directive,
                    }));
                }
                None => {
                    tracing::trace!(line = self.line, "Skipping transcript line without marker");
                    self.skipped += 1;
                }
            }
        }
        Ok(None)
    }

    /// Number of lines consumed so far (1-based position of the last line).
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Number of consumed lines that matched neither marker.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }
}
