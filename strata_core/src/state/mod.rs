// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics state carried by a session.
//!
//! Options are global to a frame and freeze at `world_begin`; attributes
//! are scoped to blocks and save/restore with them. Both sets start from
//! the interface defaults and are mutated strictly through calls.

mod attributes;
mod options;

pub use attributes::{
    AttributeSet, BEZIER_BASIS, Basis, Orientation, ShaderBinding, ShadingInterpolation, TrimCurve,
};
pub use options::{Display, OptionSet, Projection, Quantization};
