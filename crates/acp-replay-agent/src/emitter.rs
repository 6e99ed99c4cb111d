// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes scripted messages to the outbound stream, one per line.
///
/// Payloads are sent verbatim; recorded malformations are reproduced as-is.
pub struct Emitter<W> {
    out: W,
}

impl<W: AsyncWrite + Unpin> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write `payload` plus a newline and flush before returning.
    pub async fn emit(&mut self, payload: &str) -> std::io::Result<()> {
        self.out.write_all(payload.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush().await
    }

    #[cfg(test)]
    fn get_ref(&self) -> &W {
        &self.out
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}
