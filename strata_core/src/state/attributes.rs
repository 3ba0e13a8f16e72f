// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The block-scoped attribute set.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::light::LightId;
use crate::param::ParamList;
use crate::transform::Mat4;

/// A shader bound to the graphics state, with the CTM captured at bind
/// time so shader-space queries survive later transform edits.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderBinding {
    /// Shader name.
    pub name: String,
    /// Parameters captured at bind time.
    pub params: ParamList,
    /// CTM at bind time (shader space to camera space).
    pub ctm: Mat4,
    /// Inverse of [`ShaderBinding::ctm`].
    pub inverse: Mat4,
}

/// How surface geometry faces relate to its parametric normal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Same handedness as the current coordinate system.
    #[default]
    Outside,
    /// Opposite handedness to the current coordinate system.
    Inside,
    /// Fixed left-handed.
    LeftHanded,
    /// Fixed right-handed.
    RightHanded,
}

impl Orientation {
    /// Parse an orientation token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "outside" => Some(Self::Outside),
            "inside" => Some(Self::Inside),
            "lh" => Some(Self::LeftHanded),
            "rh" => Some(Self::RightHanded),
            _ => None,
        }
    }

    /// The orientation with the opposite sense.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Outside => Self::Inside,
            Self::Inside => Self::Outside,
            Self::LeftHanded => Self::RightHanded,
            Self::RightHanded => Self::LeftHanded,
        }
    }
}

/// Shading interpolation across micropolygons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadingInterpolation {
    /// One shading sample per micropolygon.
    #[default]
    Constant,
    /// Shading samples interpolated across micropolygons.
    Smooth,
}

impl ShadingInterpolation {
    /// Parse a shading-interpolation token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "constant" => Some(Self::Constant),
            "smooth" => Some(Self::Smooth),
            _ => None,
        }
    }
}

/// Spline bases for bicubic patches and patch meshes.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis {
    /// Basis matrix in u.
    pub u: Mat4,
    /// Control-point step in u.
    pub ustep: i32,
    /// Basis matrix in v.
    pub v: Mat4,
    /// Control-point step in v.
    pub vstep: i32,
}

/// The Bezier basis matrix.
pub const BEZIER_BASIS: Mat4 = Mat4 {
    cols: [
        [-1.0, 3.0, -3.0, 1.0],
        [3.0, -6.0, 3.0, 0.0],
        [-3.0, 3.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ],
};

impl Default for Basis {
    fn default() -> Self {
        Self {
            u: BEZIER_BASIS,
            ustep: 3,
            v: BEZIER_BASIS,
            vstep: 3,
        }
    }
}

/// Trim curves attached to subsequent NURBS patches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrimCurve {
    /// Curves per loop.
    pub ncurves: Vec<i32>,
    /// Order of each curve.
    pub order: Vec<i32>,
    /// Knot vector.
    pub knot: Vec<f64>,
    /// Parametric minimum per curve.
    pub min: Vec<f64>,
    /// Parametric maximum per curve.
    pub max: Vec<f64>,
    /// Control-point count per curve.
    pub n: Vec<i32>,
    /// Homogeneous u coordinates.
    pub u: Vec<f64>,
    /// Homogeneous v coordinates.
    pub v: Vec<f64>,
    /// Homogeneous weights.
    pub w: Vec<f64>,
}

impl TrimCurve {
    /// Whether no trim loops are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ncurves.is_empty()
    }
}

/// Everything saved and restored by `attribute_begin` / `attribute_end`.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSet {
    /// Surface color, one value per color sample.
    pub color: Vec<f64>,
    /// Surface opacity, one value per color sample.
    pub opacity: Vec<f64>,
    /// `(s, t)` at the four parametric corners.
    pub texture_coordinates: [f64; 8],
    /// Lights illuminating subsequent geometry.
    pub lights_on: Vec<LightId>,
    /// Bound surface shader.
    pub surface: Option<ShaderBinding>,
    /// Bound atmosphere shader.
    pub atmosphere: Option<ShaderBinding>,
    /// Bound interior volume shader.
    pub interior: Option<ShaderBinding>,
    /// Bound exterior volume shader.
    pub exterior: Option<ShaderBinding>,
    /// Bound displacement shader.
    pub displacement: Option<ShaderBinding>,
    /// Bound deformation shader.
    pub deformation: Option<ShaderBinding>,
    /// Maximum micropolygon area in pixels.
    pub shading_rate: f64,
    /// Interpolation across micropolygons.
    pub shading_interpolation: ShadingInterpolation,
    /// Whether subsequent geometry is a matte object.
    pub matte: bool,
    /// Declared bound for subsequent geometry, object space.
    pub bound: Option<[f64; 6]>,
    /// Current level of detail, object space.
    pub detail: Option<[f64; 6]>,
    /// Detail range for the active representation.
    pub detail_range: [f64; 4],
    /// Geometric approximation metric and value.
    pub geometric_approximation: Option<(String, f64)>,
    /// Declared surface orientation.
    pub orientation: Orientation,
    /// Whether the CTM has flipped handedness since it was last reset.
    pub flipped: bool,
    /// Visible sides, 1 or 2.
    pub sides: i32,
    /// Spline bases for bicubic patches.
    pub basis: Basis,
    /// Trim curves for subsequent NURBS.
    pub trim: TrimCurve,
    /// Implementation-specific attributes by group name.
    pub user: BTreeMap<String, ParamList>,
}

impl AttributeSet {
    /// The default attribute set for `color_samples` color components.
    #[must_use]
    pub fn new(color_samples: usize) -> Self {
        Self {
            color: vec![1.0; color_samples],
            opacity: vec![1.0; color_samples],
            texture_coordinates: [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            lights_on: Vec::new(),
            surface: None,
            atmosphere: None,
            interior: None,
            exterior: None,
            displacement: None,
            deformation: None,
            shading_rate: 1.0,
            shading_interpolation: ShadingInterpolation::default(),
            matte: false,
            bound: None,
            detail: None,
            detail_range: [0.0, 0.0, f64::INFINITY, f64::INFINITY],
            geometric_approximation: None,
            orientation: Orientation::default(),
            flipped: false,
            sides: 2,
            basis: Basis::default(),
            trim: TrimCurve::default(),
            user: BTreeMap::new(),
        }
    }

    /// The effective orientation after accounting for CTM handedness.
    ///
    /// `Outside` and `Inside` track the coordinate system, so a flipped
    /// CTM inverts their sense; the fixed-handedness tokens do not move.
    #[must_use]
    pub fn effective_orientation(&self) -> Orientation {
        match self.orientation {
            Orientation::Outside | Orientation::Inside if self.flipped => {
                self.orientation.reversed()
            }
            o => o,
        }
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_interface() {
        let a = AttributeSet::default();
        assert_eq!(a.color, vec![1.0, 1.0, 1.0]);
        assert_eq!(a.shading_rate, 1.0);
        assert_eq!(a.sides, 2);
        assert_eq!(a.basis.ustep, 3);
        assert!(a.trim.is_empty());
    }

    #[test]
    fn orientation_reversal_swaps_pairs() {
        assert_eq!(Orientation::Outside.reversed(), Orientation::Inside);
        assert_eq!(Orientation::LeftHanded.reversed(), Orientation::RightHanded);
        assert_eq!(Orientation::from_token("rh"), Some(Orientation::RightHanded));
        assert_eq!(Orientation::from_token("sideways"), None);
    }

    #[test]
    fn flipped_ctm_inverts_relative_orientations_only() {
        let mut a = AttributeSet::default();
        a.flipped = true;
        assert_eq!(a.effective_orientation(), Orientation::Inside);
        a.orientation = Orientation::LeftHanded;
        assert_eq!(a.effective_orientation(), Orientation::LeftHanded);
    }
}
