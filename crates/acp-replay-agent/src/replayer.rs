// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sequential transcript interpreter

use acp_transcript::{Directive, TranscriptEntry, TranscriptReader};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader, Stdin, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    Result, SessionConfig,
    diagnostics::Diagnostics,
    emitter::Emitter,
    error::ReplayError,
    matcher::MatchEngine,
};

/// Where the dispatcher is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// Directives remain to be dispatched.
    Draining,
    /// The transcript is exhausted; the process stays alive until cancelled.
    Idle,
}

/// Counters collected while draining a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub directives: usize,
    pub assertions: usize,
    pub mismatches: usize,
    pub emissions: usize,
    pub skipped_lines: usize,
}

/// Replayer bound to the process's standard streams.
pub type StdioReplayer = Replayer<BufReader<File>, BufReader<Stdin>, Stdout>;

/// Walks a transcript, asserting inbound messages and emitting scripted ones.
///
/// The transcript is the only clock: the inbound stream is read exactly once
/// per assertion and never otherwise, and directives are handled strictly in
/// transcript order.
pub struct Replayer<T, I, O> {
    transcript: TranscriptReader<T>,
    inbound: I,
    emitter: Emitter<O>,
    engine: MatchEngine,
    diagnostics: Diagnostics,
    state: ReplayState,
    summary: ReplaySummary,
}

impl StdioReplayer {
    /// Open the configured transcript and attach to stdin/stdout.
    pub async fn from_config(config: &SessionConfig) -> Result<Self> {
        let transcript = TranscriptReader::open(&config.transcript).await?;
        Ok(Replayer::new(
            transcript,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            MatchEngine::new(config.project_root.clone()),
        ))
    }
}

impl<T, I, O> Replayer<T, I, O>
where
    T: AsyncBufRead + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    /// Diagnostics default to standard error.
    pub fn new(
        transcript: TranscriptReader<T>,
        inbound: I,
        outbound: O,
        engine: MatchEngine,
    ) -> Self {
        Self {
            transcript,
            inbound,
            emitter: Emitter::new(outbound),
            engine,
            diagnostics: Diagnostics::stderr(),
            state: ReplayState::Draining,
            summary: ReplaySummary::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    /// Dispatch every remaining directive, then move to [`ReplayState::Idle`].
    ///
    /// Mismatches are reported and skipped past; only transcript or stream
    /// IO failures end the run early.
    pub async fn run(&mut self) -> Result<ReplaySummary> {
        info!(project_root = %self.engine.project_root(), "Starting transcript replay");

        while let Some(entry) = self.transcript.next_entry().await? {
            self.dispatch(entry).await?;
        }
        self.emitter.flush().await.map_err(ReplayError::Outbound)?;

        self.summary.skipped_lines = self.transcript.skipped_lines();
        self.state = ReplayState::Idle;

        let summary = self.summary.clone();
        info!(
            lines = self.transcript.line_number(),
            directives = summary.directives,
            assertions = summary.assertions,
            emissions = summary.emissions,
            mismatches = summary.mismatches,
            "Transcript replay finished"
        );
        if summary.mismatches > 0 {
            warn!(mismatches = summary.mismatches, "Replay finished with mismatches");
        }
        Ok(summary)
    }

    /// Block until `shutdown` is cancelled.
    pub async fn idle(&self, shutdown: CancellationToken) {
        debug_assert_eq!(self.state, ReplayState::Idle);
        debug!("Transcript exhausted; waiting for shutdown");
        shutdown.cancelled().await;
        info!("Shutdown requested; leaving idle state");
    }

    async fn dispatch(&mut self, entry: TranscriptEntry) -> Result<()> {
        self.summary.directives += 1;
        debug!(
            line = entry.line,
            kind = entry.directive.kind(),
            payload = entry.directive.payload(),
            "Dispatching directive"
        );

        match entry.directive {
            Directive::Assertion { expected } => {
                self.summary.assertions += 1;
                let actual = self.read_actual().await?;
                let outcome = self.engine.compare(&expected, &actual);
                if !outcome.is_match() {
                    self.summary.mismatches += 1;
                    debug!(line = entry.line, ?outcome, "Inbound message did not match transcript");
                    self.diagnostics.mismatch(&outcome, &expected, &actual);
                }
            }
            Directive::Emission { payload } => {
                self.summary.emissions += 1;
                self.emitter
                    .emit(&payload)
                    .await
                    .map_err(ReplayError::Outbound)?;
            }
        }
        Ok(())
    }

    /// Read one inbound line. A closed stream reads as the empty line.
    async fn read_actual(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let read = self
            .inbound
            .read_until(b'\n', &mut buf)
            .await
            .map_err(ReplayError::Inbound)?;
        if read == 0 {
            debug!("Inbound stream closed; comparing against empty line");
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
