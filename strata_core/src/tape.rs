// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call tapes for retained objects and cached archives.
//!
//! A tape is an append-only list of calls captured verbatim, before
//! validation. Replay re-issues each call through the normal pipeline, so
//! a call that was invalid at record time is caught (and reported) at
//! replay time instead, in whatever state the replay site provides.

use alloc::vec::Vec;

use crate::call::Call;

/// A recorded call sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Tape {
    calls: Vec<Call>,
    object: bool,
    valid: bool,
    done: bool,
}

impl Tape {
    /// An empty, open tape. `object` marks retained-object tapes, which
    /// replay with primitive dispatch enabled even inside a definition.
    #[must_use]
    pub fn new(object: bool) -> Self {
        Self {
            calls: Vec::new(),
            object,
            valid: true,
            done: false,
        }
    }

    /// Append a call. Ignored once the tape is finished.
    pub fn record(&mut self, call: Call) {
        if !self.done {
            self.calls.push(call);
        }
    }

    /// The recorded calls, in capture order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Close the tape for further recording.
    pub fn finish(&mut self) {
        self.done = true;
    }

    /// Mark the tape unusable; replay of an invalid tape is an error at
    /// the replay site.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether replaying this tape is allowed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether recording has been closed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether this is a retained-object tape.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.object
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_finished() {
        let mut tape = Tape::new(true);
        tape.record(Call::Identity);
        tape.record(Call::ReverseOrientation);
        assert_eq!(tape.len(), 2);
        tape.finish();
        tape.record(Call::Identity);
        assert_eq!(tape.len(), 2);
        assert!(tape.is_done());
        assert!(tape.is_valid());
        assert!(tape.is_object());
    }

    #[test]
    fn invalidation_is_sticky() {
        let mut tape = Tape::new(false);
        tape.record(Call::WorldBegin);
        tape.invalidate();
        assert!(!tape.is_valid());
        assert!(!tape.is_object());
    }
}
