// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Light handles and the per-session light table.
//!
//! Lights are created by `light_source` / `area_light_source` and live for
//! the rest of the session; `attribute_end` only toggles which lights
//! illuminate, it never destroys one. The table is append-only so handles
//! stay stable across block boundaries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::param::ParamList;
use crate::transform::Mat4;

/// Handle to a light created in the current session.
///
/// The wrapped value is the handle the backend chose; by default that is
/// the table index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(pub u32);

impl core::fmt::Debug for LightId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "LightId({})", self.0)
    }
}

/// Everything recorded about a light at creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRecord {
    /// Light shader name.
    pub name: String,
    /// Shader parameters captured at creation.
    pub params: ParamList,
    /// Whether this is an area light bound to subsequent geometry.
    pub area: bool,
    /// CTM at creation (light space to camera space).
    pub ctm: Mat4,
    /// Whether the light was created before `world_begin`.
    pub before_world: bool,
    /// The handle the backend chose for this light.
    pub external: LightId,
}

/// Append-only table of a session's lights.
#[derive(Debug, Default)]
pub struct LightTable {
    records: Vec<LightRecord>,
}

impl LightTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its table index as a provisional handle.
    ///
    /// The caller offers this handle to the backend, which may remap it;
    /// the remapped handle is stored back via the record's `external`
    /// field before the record is considered live.
    pub fn add(&mut self, record: LightRecord) -> LightId {
        let id = LightId(self.records.len() as u32);
        self.records.push(record);
        id
    }

    /// Store the backend's handle for the record at `index`.
    pub fn set_external(&mut self, index: LightId, external: LightId) {
        if let Some(record) = self.records.get_mut(index.0 as usize) {
            record.external = external;
        }
    }

    /// Look up a record by the handle the caller holds.
    ///
    /// Backends usually keep the provisional handle, so the direct index
    /// is tried first before scanning for a remapped one.
    #[must_use]
    pub fn resolve(&self, handle: LightId) -> Option<&LightRecord> {
        if let Some(record) = self.records.get(handle.0 as usize)
            && record.external == handle
        {
            return Some(record);
        }
        self.records.iter().find(|r| r.external == handle)
    }

    /// Number of lights created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no lights have been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> LightRecord {
        LightRecord {
            name: String::from(name),
            params: Vec::new(),
            area: false,
            ctm: Mat4::IDENTITY,
            before_world: false,
            external: LightId(0),
        }
    }

    #[test]
    fn handles_are_table_indices() {
        let mut table = LightTable::new();
        let a = table.add(record("ambient"));
        let b = table.add(record("distant"));
        assert_eq!(a, LightId(0));
        assert_eq!(b, LightId(1));
        table.set_external(a, a);
        table.set_external(b, b);
        assert_eq!(table.resolve(b).map(|r| r.name.as_str()), Some("distant"));
    }

    #[test]
    fn remapped_handles_still_resolve() {
        let mut table = LightTable::new();
        let id = table.add(record("spot"));
        table.set_external(id, LightId(700));
        assert!(table.resolve(id).is_none());
        assert_eq!(
            table.resolve(LightId(700)).map(|r| r.name.as_str()),
            Some("spot")
        );
    }
}
