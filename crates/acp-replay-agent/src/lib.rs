// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Scripted ACP protocol double
//!
//! Replays a recorded transcript against a live agent over stdio. `OUT:`
//! directives assert the next message the agent sends; `IN:` directives are
//! written back to it verbatim. Mismatches are reported on standard error
//! and never stop the replay.

mod config;
pub mod diagnostics;
pub mod emitter;
mod error;
pub mod matcher;
pub mod replayer;

pub use config::SessionConfig;
pub use diagnostics::Diagnostics;
pub use emitter::Emitter;
pub use error::{ReplayError, Result};
pub use matcher::{MatchEngine, MatchOutcome};
pub use replayer::{ReplayState, ReplaySummary, Replayer, StdioReplayer};
