// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-context session state.
//!
//! A [`Session`] bundles everything one context owns: declarations, the
//! block and state stacks, the CTM stack, lights, coordinate systems, and
//! the tapes for retained objects and cached archives. The renderer holds
//! a slab of sessions and routes every call to the current one.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::coord::CoordSystems;
use crate::light::LightTable;
use crate::param::DeclScope;
use crate::state::{AttributeSet, OptionSet};
use crate::tape::Tape;
use crate::transform::CtmStack;
use crate::validity::BlockState;

/// Handle to a rendering context.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(pub(crate) u32);

impl ContextId {
    /// The absent context, returned by `get_context` when none is current.
    pub const NONE: Self = Self(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub(crate) fn index(self) -> Option<usize> {
        (self.0 != 0).then(|| self.0 as usize - 1)
    }
}

impl core::fmt::Debug for ContextId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if *self == Self::NONE {
            write!(f, "ContextId(NONE)")
        } else {
            write!(f, "ContextId({})", self.0)
        }
    }
}

/// Handle to a retained object definition.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl core::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// A CSG operation open on the solid stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolidOp {
    /// Leaf geometry.
    Primitive,
    /// Intersection of child solids.
    Intersection,
    /// Union of child solids.
    Union,
    /// First child minus the rest.
    Difference,
}

impl SolidOp {
    /// Parse a solid-operation token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "primitive" => Some(Self::Primitive),
            "intersection" => Some(Self::Intersection),
            "union" => Some(Self::Union),
            "difference" => Some(Self::Difference),
            _ => None,
        }
    }
}

/// Everything one context owns.
#[derive(Debug)]
pub struct Session {
    /// Token declarations, seeded with the standard set.
    pub declarations: DeclScope,
    /// Open blocks, innermost last.
    pub blocks: Vec<BlockState>,
    /// Open CSG operations, innermost last.
    pub solids: Vec<SolidOp>,
    /// Attribute stack; the last entry is current. Never empty.
    pub attributes: Vec<AttributeSet>,
    /// Option stack; the last entry is current. Never empty.
    pub options: Vec<OptionSet>,
    /// The current transformation and its tracked inverse.
    pub ctm: CtmStack,
    /// Lights created in this session.
    pub lights: LightTable,
    /// Named CTM snapshots.
    pub coords: CoordSystems,
    /// The tape currently recording, if any.
    pub writer: Option<Tape>,
    /// Writers suspended by nested `object_begin`, outermost first.
    pub writer_stack: Vec<Option<Tape>>,
    /// Cached archives by path.
    pub archives: BTreeMap<alloc::string::String, Tape>,
    /// Retained objects by handle.
    pub objects: BTreeMap<u32, Tape>,
    /// Next retained-object handle.
    pub object_counter: u32,
    /// Handles of object definitions currently open, innermost last.
    pub object_stack: Vec<ObjectId>,
    /// The handle the backend chose for this context.
    pub external: ContextId,
    /// Depth of nested tape replays.
    pub replay_depth: u32,
    /// Depth of nested `read_archive` captures.
    pub read_archive_depth: u32,
    /// Depth of nested `object_begin` definitions.
    pub define_object_depth: u32,
    /// Depth of internal call expansion that must not be re-recorded.
    pub record_suppress_depth: u32,
}

impl Session {
    /// A fresh session in the base state.
    #[must_use]
    pub fn new(declarations: DeclScope) -> Self {
        Self {
            declarations,
            blocks: Vec::new(),
            solids: Vec::new(),
            attributes: alloc::vec![AttributeSet::default()],
            options: alloc::vec![OptionSet::default()],
            ctm: CtmStack::new(),
            lights: LightTable::new(),
            coords: CoordSystems::with_defaults(),
            writer: None,
            writer_stack: Vec::new(),
            archives: BTreeMap::new(),
            objects: BTreeMap::new(),
            object_counter: 0,
            object_stack: Vec::new(),
            external: ContextId::NONE,
            replay_depth: 0,
            read_archive_depth: 0,
            define_object_depth: 0,
            record_suppress_depth: 0,
        }
    }

    /// The innermost open block, or `Base` with none open.
    #[must_use]
    pub fn block_state(&self) -> BlockState {
        self.blocks.last().copied().unwrap_or(BlockState::Base)
    }

    /// The current attribute set.
    #[must_use]
    pub fn attrs(&self) -> &AttributeSet {
        // Invariant: the attribute stack is never empty.
        &self.attributes[self.attributes.len() - 1]
    }

    /// The current attribute set, mutably.
    pub fn attrs_mut(&mut self) -> &mut AttributeSet {
        let last = self.attributes.len() - 1;
        &mut self.attributes[last]
    }

    /// The current option set.
    #[must_use]
    pub fn opts(&self) -> &OptionSet {
        &self.options[self.options.len() - 1]
    }

    /// The current option set, mutably.
    pub fn opts_mut(&mut self) -> &mut OptionSet {
        let last = self.options.len() - 1;
        &mut self.options[last]
    }

    /// Whether calls issued now are captured onto the open writer.
    ///
    /// Replayed calls and calls synthesized by composite expansion pass
    /// through the same pipeline but must not be captured again.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.writer.is_some() && self.replay_depth == 0 && self.record_suppress_depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_handles_are_one_based() {
        assert_eq!(ContextId::from_index(0), ContextId(1));
        assert_eq!(ContextId(1).index(), Some(0));
        assert_eq!(ContextId::NONE.index(), None);
    }

    #[test]
    fn fresh_session_is_in_the_base_state() {
        let s = Session::new(DeclScope::standard());
        assert_eq!(s.block_state(), BlockState::Base);
        assert_eq!(s.attributes.len(), 1);
        assert_eq!(s.options.len(), 1);
        assert!(!s.is_recording());
    }

    #[test]
    fn recording_requires_a_writer_and_no_replay() {
        let mut s = Session::new(DeclScope::standard());
        s.writer = Some(Tape::new(false));
        assert!(s.is_recording());
        s.replay_depth = 1;
        assert!(!s.is_recording());
        s.replay_depth = 0;
        s.record_suppress_depth = 1;
        assert!(!s.is_recording());
    }

    #[test]
    fn solid_tokens_parse() {
        assert_eq!(SolidOp::from_token("difference"), Some(SolidOp::Difference));
        assert_eq!(SolidOp::from_token("xor"), None);
    }
}
