// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Recorded ACP transcript format.
//!
//! A transcript is plain text with one directive per line:
//!
//! ```text
//! <ignored-prefix>OUT:<json the peer must send>
//! <ignored-prefix>IN:<json we reply with>
//! ```
//!
//! Lines carrying neither marker are ignored.

mod error;
mod model;
mod reader;

pub use error::{Result, TranscriptError};
pub use model::{Directive, IN_MARKER, OUT_MARKER, TranscriptEntry};
pub use reader::TranscriptReader;
