// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named coordinate systems.
//!
//! `coordinate_system` snapshots the CTM under a name and
//! `coord_sys_transform` restores it later. The session pre-binds the
//! standard names; `"camera"` and `"world"` are rebound at `projection`
//! and `world_begin` respectively.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::transform::Mat4;

/// Registry of named CTM snapshots, camera space.
#[derive(Clone, Debug, Default)]
pub struct CoordSystems {
    marked: BTreeMap<String, Mat4>,
}

impl CoordSystems {
    /// A registry with the standard names bound to identity.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut marked = BTreeMap::new();
        for name in ["camera", "world", "screen", "NDC", "raster"] {
            marked.insert(String::from(name), Mat4::IDENTITY);
        }
        Self { marked }
    }

    /// Bind `name` to `ctm`, replacing any previous binding.
    pub fn mark(&mut self, name: &str, ctm: Mat4) {
        self.marked.insert(String::from(name), ctm);
    }

    /// The snapshot bound to `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Mat4> {
        self.marked.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names_are_prebound() {
        let coords = CoordSystems::with_defaults();
        for name in ["camera", "world", "screen", "NDC", "raster"] {
            assert_eq!(coords.lookup(name), Some(&Mat4::IDENTITY));
        }
        assert_eq!(coords.lookup("lamp"), None);
    }

    #[test]
    fn marking_rebinds() {
        let mut coords = CoordSystems::with_defaults();
        let m = Mat4::from_translation(1.0, 2.0, 3.0);
        coords.mark("lamp", m);
        coords.mark("world", m);
        assert_eq!(coords.lookup("lamp"), Some(&m));
        assert_eq!(coords.lookup("world"), Some(&m));
    }
}
