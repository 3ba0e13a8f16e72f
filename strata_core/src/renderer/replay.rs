// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pipeline re-entry: tape replay, archive reads, composite expansion.
//!
//! These run as follow-ups, after the per-call session borrow has been
//! released, because each one issues further calls through the full
//! pipeline. Depth counters on the session keep the re-entrant calls from
//! being captured a second time.

use alloc::format;
use alloc::string::String;
use alloc::vec;

use super::Renderer;
use crate::archive::ArchiveError;
use crate::call::Call;
use crate::error::{ErrorCode, Severity};
use crate::param::{Param, ParamList};
use crate::renderer::apply::no_cache_requested;
use crate::tape::Tape;

/// Bound on nested replays; a tape that instances an object whose tape
/// instances it back would otherwise recurse forever.
const MAX_REPLAY_DEPTH: u32 = 64;

/// Corner points (`P`, four per face) of the six bilinear patches making
/// up the unit cube composite, centered at the origin.
const CUBE_FACES: [[f64; 12]; 6] = [
    // -z
    [-0.5, -0.5, -0.5, 0.5, -0.5, -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5],
    // +z
    [-0.5, -0.5, 0.5, 0.5, -0.5, 0.5, -0.5, 0.5, 0.5, 0.5, 0.5, 0.5],
    // -y
    [-0.5, -0.5, -0.5, 0.5, -0.5, -0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5],
    // +y
    [-0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, 0.5, 0.5, 0.5],
    // -x
    [-0.5, -0.5, -0.5, -0.5, 0.5, -0.5, -0.5, -0.5, 0.5, -0.5, 0.5, 0.5],
    // +x
    [0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5, -0.5, 0.5, 0.5, 0.5, 0.5],
];

impl Renderer {
    /// Re-issues every call on `tape` through the public surface.
    ///
    /// Per-call errors are reported at the replay site and do not stop
    /// the replay; session teardown (abort policy) does.
    pub(super) fn replay(&mut self, tape: Tape) {
        let mut entered = false;
        self.with_session(|s| {
            if s.replay_depth < MAX_REPLAY_DEPTH {
                s.replay_depth += 1;
                entered = true;
            }
        });
        if !entered {
            self.report_now(
                ErrorCode::Consistency,
                Severity::Severe,
                "replay: recursion limit reached, tape skipped",
            );
            return;
        }
        for call in tape.calls() {
            if self.current.is_none() {
                break;
            }
            self.issue(call.clone());
        }
        self.with_session(|s| s.replay_depth = s.replay_depth.saturating_sub(1));
    }

    /// The deferred body of `read_archive`: replay the cached tape, or
    /// parse the archive (capturing into a fresh cache tape unless
    /// caching is off).
    pub(super) fn run_read_archive(&mut self, name: String, params: &ParamList) {
        let mut cached = None;
        let mut replaying = false;
        self.with_session(|s| {
            cached = s.archives.get(&name).cloned();
            replaying = s.replay_depth > 0;
        });
        if let Some(tape) = cached {
            if tape.is_valid() {
                self.replay(tape);
            } else {
                self.report_now(
                    ErrorCode::NoFile,
                    Severity::Error,
                    &format!("read_archive: \"{name}\" previously failed to parse"),
                );
            }
            return;
        }
        let Some(mut source) = self.archive_source.take() else {
            self.report_now(
                ErrorCode::NoFile,
                Severity::Error,
                &format!("read_archive: no archive source for \"{name}\""),
            );
            return;
        };
        // A replayed read with a cold cache parses live too: capture
        // is disabled during replay, so a cache tape recorded here
        // would come out empty.
        if no_cache_requested(params) || replaying {
            self.with_session(|s| s.record_suppress_depth += 1);
            let result = source.parse(&name, self);
            self.with_session(|s| {
                s.record_suppress_depth = s.record_suppress_depth.saturating_sub(1);
            });
            self.archive_source = Some(source);
            if let Err(err) = result {
                self.report_archive_error(&name, &err);
            }
            return;
        }
        self.with_session(|s| {
            s.writer_stack.push(s.writer.take());
            s.writer = Some(Tape::new(false));
            s.read_archive_depth += 1;
        });
        let result = source.parse(&name, self);
        self.archive_source = Some(source);
        self.with_session(|s| {
            s.read_archive_depth = s.read_archive_depth.saturating_sub(1);
            let mut tape = s.writer.take().unwrap_or_else(|| Tape::new(false));
            s.writer = s.writer_stack.pop().flatten();
            tape.finish();
            if result.is_err() {
                tape.invalidate();
            }
            s.archives.insert(name.clone(), tape);
        });
        if let Err(err) = result {
            self.report_archive_error(&name, &err);
        }
    }

    fn report_archive_error(&mut self, name: &str, err: &ArchiveError) {
        let code = match err {
            ArchiveError::NotFound(_) => ErrorCode::NoFile,
            ArchiveError::Parse { .. } => ErrorCode::Syntax,
        };
        self.report_now(code, Severity::Error, &format!("read_archive \"{name}\": {err}"));
    }

    /// Expands the `"cube"` composite into six bilinear patches. The
    /// sub-calls run the full pipeline (and reach the backend) but the
    /// suppression guard keeps them off any open tape; the composite
    /// itself was already captured.
    pub(super) fn expand_cube(&mut self) {
        if !self.with_session(|s| s.record_suppress_depth += 1) {
            return;
        }
        for face in &CUBE_FACES {
            if self.current.is_none() {
                break;
            }
            self.issue(Call::Patch {
                kind: String::from("bilinear"),
                params: vec![Param::floats("P", face)],
            });
        }
        self.with_session(|s| {
            s.record_suppress_depth = s.record_suppress_depth.saturating_sub(1);
        });
    }
}
