// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session manager and call pipeline.
//!
//! Every call runs the same four stages, in order:
//!
//! 1. **capture** — if the current session is recording, the call is
//!    appended to the open writer verbatim, before anything can reject it;
//! 2. **validate** — the call kind is checked against the innermost open
//!    block; an illegal call is reported and dropped;
//! 3. **mutate** — session state (stacks, CTM, tables) is updated;
//! 4. **dispatch** — the call is forwarded to the backend.
//!
//! Side effects that re-enter the pipeline (tape replay, archive parsing,
//! composite expansion) are deferred until the session borrow is released,
//! then run as follow-ups under the appropriate depth guard.

mod apply;
mod replay;
mod surface;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::archive::ArchiveSource;
use crate::backend::{Backend, GeomQuery, NullBackend};
use crate::call::Call;
use crate::error::{ErrorCode, ErrorMode, NoopReporter, Reporter, Severity};
use crate::light::LightId;
use crate::param::{DeclScope, Declaration, ParamList};
use crate::session::{ContextId, ObjectId, Session};
use crate::tape::Tape;
use crate::validity;

/// What a call produced, beyond its side effects.
pub(crate) enum Outcome {
    /// Nothing to hand back.
    None,
    /// A light handle.
    Light(LightId),
    /// A retained-object handle.
    Object(ObjectId),
    /// A parsed declaration.
    Declaration(Declaration),
}

/// Work that must run after the per-call session borrow ends.
enum FollowUp {
    None,
    /// Install a new error-handling policy.
    ErrorMode(ErrorMode),
    /// Replace the current session with a fresh one.
    Reset,
    /// Replay a tape through the public surface.
    Replay(Tape),
    /// Resolve and execute an archive read.
    ReadArchive { name: String, params: ParamList },
    /// Expand the `"cube"` composite into bilinear patches.
    ExpandCube,
}

/// Error reporting scoped to one call, tracking whether the `abort`
/// policy wants the session torn down afterwards.
pub(crate) struct Sink<'a> {
    reporter: &'a mut dyn Reporter,
    mode: ErrorMode,
    abort: bool,
}

impl Sink<'_> {
    pub(crate) fn report(&mut self, code: ErrorCode, severity: Severity, message: &str) {
        if self.mode != ErrorMode::Ignore {
            self.reporter.report(code, severity, message);
        }
        if self.mode == ErrorMode::Abort && severity >= Severity::Error {
            self.abort = true;
        }
    }
}

/// The scene-description interface.
///
/// Owns every session, the backend, and the collaborator sinks. All state
/// mutation and dispatch flows through the public call surface; sessions
/// are only reachable through handles.
pub struct Renderer {
    sessions: Vec<Option<Session>>,
    current: Option<usize>,
    backend: Box<dyn Backend>,
    reporter: Box<dyn Reporter>,
    archive_source: Option<Box<dyn ArchiveSource>>,
    defaults: DeclScope,
    error_mode: ErrorMode,
}

impl core::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Renderer")
            .field("sessions", &self.sessions.len())
            .field("current", &self.current)
            .field("error_mode", &self.error_mode)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// A renderer that discards all dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Box::new(NullBackend))
    }

    /// A renderer dispatching to `backend`.
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            sessions: Vec::new(),
            current: None,
            backend,
            reporter: Box::new(NoopReporter),
            archive_source: None,
            defaults: DeclScope::standard(),
            error_mode: ErrorMode::default(),
        }
    }

    /// Installs the error reporter.
    pub fn set_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporter = reporter;
    }

    /// Installs the archive parser used by `read_archive`.
    pub fn set_archive_source(&mut self, source: Box<dyn ArchiveSource>) {
        self.archive_source = Some(source);
    }

    /// Read-only geometry query over the current session, if any.
    #[must_use]
    pub fn query(&self) -> Option<GeomQuery<'_>> {
        let session = self.sessions.get(self.current?)?.as_ref()?;
        Some(GeomQuery::new(session.attrs(), session.opts(), &session.ctm))
    }

    // -- Session control --

    /// Creates a context and makes it current. Returns the handle the
    /// backend chose for it.
    pub fn begin(&mut self) -> ContextId {
        if self.in_archive_parse() {
            self.report_now(
                ErrorCode::IllState,
                Severity::Error,
                "begin: cannot create a context inside an archive",
            );
            return ContextId::NONE;
        }
        let idx = match self.sessions.iter().position(Option::is_none) {
            Some(idx) => idx,
            None => {
                self.sessions.push(None);
                self.sessions.len() - 1
            }
        };
        let mut session = Session::new(self.defaults.clone());
        let external = self.backend.begin(ContextId::from_index(idx));
        session.external = external;
        self.sessions[idx] = Some(session);
        self.current = Some(idx);
        external
    }

    /// Destroys the current context.
    ///
    /// A context with open blocks (or one that is mid-archive) is left
    /// untouched and the call is reported.
    pub fn end(&mut self) {
        let Some(idx) = self.current else {
            self.report_now(ErrorCode::IllState, Severity::Error, "end: no current context");
            return;
        };
        let (open_blocks, in_archive) = match self.sessions[idx].as_ref() {
            Some(s) => (s.blocks.len(), s.read_archive_depth > 0),
            None => {
                self.report_now(ErrorCode::Bug, Severity::Severe, "end: empty context slot");
                return;
            }
        };
        if open_blocks > 0 {
            self.report_now(
                ErrorCode::IllState,
                Severity::Error,
                &format!("end: {open_blocks} block(s) still open"),
            );
            return;
        }
        if in_archive {
            self.report_now(
                ErrorCode::IllState,
                Severity::Error,
                "end: cannot destroy a context inside an archive",
            );
            return;
        }
        self.sessions[idx] = None;
        self.current = None;
        self.backend.end();
    }

    /// Makes the context with handle `id` current. `ContextId::NONE`
    /// leaves no context current.
    pub fn context(&mut self, id: ContextId) {
        if self.in_archive_parse() {
            self.report_now(
                ErrorCode::IllState,
                Severity::Error,
                "context: cannot switch contexts inside an archive",
            );
            return;
        }
        if id == ContextId::NONE {
            self.current = None;
            return;
        }
        let found = self
            .sessions
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.external == id));
        match found {
            Some(idx) => self.current = Some(idx),
            None => self.report_now(
                ErrorCode::BadHandle,
                Severity::Error,
                &format!("context: unknown handle {id:?}"),
            ),
        }
    }

    /// The handle of the current context, or `ContextId::NONE`.
    #[must_use]
    pub fn get_context(&self) -> ContextId {
        self.current
            .and_then(|idx| self.sessions.get(idx)?.as_ref())
            .map_or(ContextId::NONE, |s| s.external)
    }

    // -- Pipeline --

    pub(crate) fn issue(&mut self, call: Call) -> Outcome {
        let Some(idx) = self.current else {
            self.report_now(
                ErrorCode::IllState,
                Severity::Error,
                &format!("{}: no current context", call.name()),
            );
            return Outcome::None;
        };
        let (outcome, follow, abort) = {
            let Some(session) = self.sessions[idx].as_mut() else {
                self.reporter
                    .report(ErrorCode::Bug, Severity::Severe, "empty context slot");
                return Outcome::None;
            };
            // Capture before validation, verbatim. Closing an object
            // definition records into the suspended parent writer; the
            // definition tape itself must hold only the body.
            if session.is_recording() {
                if matches!(call, Call::ObjectEnd) {
                    if let Some(Some(parent)) = session.writer_stack.last_mut() {
                        parent.record(call.clone());
                    }
                } else if let Some(writer) = session.writer.as_mut() {
                    writer.record(call.clone());
                }
            }
            let mut sink = Sink {
                reporter: &mut *self.reporter,
                mode: self.error_mode,
                abort: false,
            };
            let state = session.block_state();
            if validity::legal(call.kind(), state) {
                let (outcome, follow) = apply::apply(session, &mut *self.backend, &mut sink, call);
                (outcome, follow, sink.abort)
            } else {
                sink.report(
                    ErrorCode::Nesting,
                    Severity::Error,
                    &format!("{}: not legal in the {state:?} block", call.name()),
                );
                (Outcome::None, FollowUp::None, sink.abort)
            }
        };
        if abort {
            self.teardown();
            return outcome;
        }
        match follow {
            FollowUp::None => {}
            FollowUp::ErrorMode(mode) => self.error_mode = mode,
            FollowUp::Reset => self.reset_current(),
            FollowUp::Replay(tape) => self.replay(tape),
            FollowUp::ReadArchive { name, params } => self.run_read_archive(name, &params),
            FollowUp::ExpandCube => self.expand_cube(),
        }
        outcome
    }

    /// Runs `f` on the current session. Returns `false` when none exists.
    fn with_session(&mut self, f: impl FnOnce(&mut Session)) -> bool {
        if let Some(idx) = self.current
            && let Some(session) = self.sessions[idx].as_mut()
        {
            f(session);
            true
        } else {
            false
        }
    }

    fn in_archive_parse(&self) -> bool {
        self.current
            .and_then(|idx| self.sessions.get(idx)?.as_ref())
            .is_some_and(|s| s.read_archive_depth > 0)
    }

    /// Reporting for work outside the per-call sink; applies the abort
    /// policy immediately.
    fn report_now(&mut self, code: ErrorCode, severity: Severity, message: &str) {
        if self.error_mode != ErrorMode::Ignore {
            self.reporter.report(code, severity, message);
        }
        if self.error_mode == ErrorMode::Abort && severity >= Severity::Error {
            self.teardown();
        }
    }

    fn teardown(&mut self) {
        if let Some(idx) = self.current.take() {
            self.sessions[idx] = None;
            self.backend.end();
        }
    }

    /// Replaces the current session with a fresh one, keeping its handle.
    fn reset_current(&mut self) {
        if let Some(idx) = self.current
            && let Some(old) = self.sessions[idx].take()
        {
            let mut fresh = Session::new(self.defaults.clone());
            fresh.external = old.external;
            self.sessions[idx] = Some(fresh);
        }
    }
}
