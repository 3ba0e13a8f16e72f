// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy and the reporter collaborator.
//!
//! The engine never panics on a bad call and never terminates the process.
//! Every detected problem is forwarded to a [`Reporter`] and the offending
//! call returns a sentinel/failure value; subsequent calls are still
//! accepted. Whether a report escalates into anything fatal is entirely the
//! reporter's decision.
//!
//! Declaration parsing is the one place where a typed `Result` is returned
//! to the caller instead (see [`DeclError`](crate::param::DeclError)), since
//! the caller needs the parsed declaration back.

/// What went wrong with a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Call issued out of sequence for the current block state.
    Nesting,
    /// Unknown context, light, or object handle.
    BadHandle,
    /// Stack underflow on a pop, or `end` with unterminated blocks.
    IllState,
    /// A required internal state frame is missing.
    Bug,
    /// Allocation of a new state frame failed.
    NoMem,
    /// Archive could not be read or its tape is invalid.
    NoFile,
    /// A named lookup (coordinate system, solid operator, token) failed.
    Consistency,
    /// An argument value is out of range.
    Range,
    /// A declaration string could not be parsed.
    Syntax,
}

/// How bad it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational only.
    Info,
    /// The call was adjusted or partially ignored.
    Warning,
    /// The call failed and had no effect.
    Error,
    /// The session may be unusable until reset.
    Severe,
}

/// Error-handler policy selected by the `error_handler` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Discard all reports.
    Ignore,
    /// Forward reports to the reporter.
    #[default]
    Print,
    /// Forward reports, then tear down the current session on `Error` or
    /// worse.
    Abort,
}

impl ErrorMode {
    /// Parses an error-handler token (`"ignore"`, `"print"`, `"abort"`).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ignore" => Some(Self::Ignore),
            "print" => Some(Self::Print),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

/// Receives every diagnostic the engine produces.
///
/// The engine reports and moves on; it never retries internally. Reporters
/// that want RenderMan's "abort on first error" behavior get it via
/// [`ErrorMode::Abort`] rather than by panicking here.
pub trait Reporter {
    /// Called once per diagnostic.
    fn report(&mut self, code: ErrorCode, severity: Severity, message: &str);
}

/// A [`Reporter`] that discards all diagnostics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _code: ErrorCode, _severity: Severity, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mode_tokens() {
        assert_eq!(ErrorMode::from_token("ignore"), Some(ErrorMode::Ignore));
        assert_eq!(ErrorMode::from_token("print"), Some(ErrorMode::Print));
        assert_eq!(ErrorMode::from_token("abort"), Some(ErrorMode::Abort));
        assert_eq!(ErrorMode::from_token("panic"), None);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Severe);
    }
}
