// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform math and the CTM stack.
//!
//! [`Mat4`] covers exactly the operations the call surface needs —
//! constructors for the transform calls (`translate`, `rotate`, `scale`,
//! `skew`, `perspective`), multiplication, determinant, and inverse —
//! without pulling in a full linear-algebra crate.
//!
//! [`CtmStack`] is the current-transformation state: the CTM and its
//! inverse, plus an internal stack of saved pairs. The stack depth always
//! equals the number of currently open blocks that save transform state
//! (frame, world, attribute, transform, motion).

use core::ops::Mul;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix. Points transform as
/// column vectors: `p' = M · p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Mat4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Returns the columns as a 2-D array.
    #[inline]
    #[must_use]
    pub const fn to_cols_array_2d(self) -> [[f64; 4]; 4] {
        self.cols
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [dx, dy, dz, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation of `radians` about the axis `(ax, ay, az)`.
    ///
    /// Returns the identity when the axis is degenerate.
    #[must_use]
    pub fn from_rotation(radians: f64, ax: f64, ay: f64, az: f64) -> Self {
        let len = (ax * ax + ay * ay + az * az).sqrt();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let (x, y, z) = (ax / len, ay / len, az / len);
        let (s, c) = (radians.sin(), radians.cos());
        let t = 1.0 - c;
        Self {
            cols: [
                [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
                [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
                [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates the perspective projection used by the `perspective` call.
    ///
    /// `radians` is the full field-of-view angle. The matrix maps the view
    /// direction into homogeneous depth with `w' = z`; its determinant is
    /// strictly positive, so a perspective concat never flips handedness on
    /// its own.
    #[must_use]
    pub fn from_perspective(radians: f64) -> Self {
        let half = radians / 2.0;
        let t = half.tan();
        // Degenerate field of view collapses to identity rather than a
        // singular matrix.
        if t == 0.0 || !t.is_finite() {
            return Self::IDENTITY;
        }
        let s = 1.0 / t;
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, s, s],
                [0.0, 0.0, -s, 0.0],
            ],
        }
    }

    /// Creates the shear used by the `skew` call: vectors along `d1` are
    /// tilted by `radians` towards `d2`, leaving everything perpendicular
    /// to the shear plane fixed.
    ///
    /// Returns the identity when either direction is degenerate or the two
    /// are parallel. The determinant of a skew is always 1, so a skew never
    /// flips handedness.
    #[must_use]
    pub fn from_skew(radians: f64, d1: [f64; 3], d2: [f64; 3]) -> Self {
        let a = normalize(d1);
        let b = normalize(d2);
        let (Some(a), Some(b)) = (a, b) else {
            return Self::IDENTITY;
        };
        // Component of b perpendicular to a; the shear direction.
        let dot_ab = dot(a, b);
        let perp = [b[0] - dot_ab * a[0], b[1] - dot_ab * a[1], b[2] - dot_ab * a[2]];
        let Some(n) = normalize(perp) else {
            return Self::IDENTITY;
        };
        let s = radians.tan();
        let mut m = Self::IDENTITY;
        // m = I + s · (n ⊗ a): column j gains s·n·a[j].
        for j in 0..3 {
            for i in 0..3 {
                m.cols[j][i] += s * n[i] * a[j];
            }
        }
        m
    }

    /// Returns the determinant.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = &self.cols;
        // Cofactor expansion over 2×2 sub-determinants of the last two
        // columns.
        let s0 = m[2][0] * m[3][1] - m[3][0] * m[2][1];
        let s1 = m[2][0] * m[3][2] - m[3][0] * m[2][2];
        let s2 = m[2][0] * m[3][3] - m[3][0] * m[2][3];
        let s3 = m[2][1] * m[3][2] - m[3][1] * m[2][2];
        let s4 = m[2][1] * m[3][3] - m[3][1] * m[2][3];
        let s5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];

        let c0 = m[1][1] * s5 - m[1][2] * s4 + m[1][3] * s3;
        let c1 = m[1][0] * s5 - m[1][2] * s2 + m[1][3] * s1;
        let c2 = m[1][0] * s4 - m[1][1] * s2 + m[1][3] * s0;
        let c3 = m[1][0] * s3 - m[1][1] * s1 + m[1][2] * s0;

        m[0][0] * c0 - m[0][1] * c1 + m[0][2] * c2 - m[0][3] * c3
    }

    /// Returns the inverse, or `None` when the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.cols;
        // Full adjugate/determinant inverse via 2×2 sub-determinants.
        let a0 = m[0][0] * m[1][1] - m[1][0] * m[0][1];
        let a1 = m[0][0] * m[1][2] - m[1][0] * m[0][2];
        let a2 = m[0][0] * m[1][3] - m[1][0] * m[0][3];
        let a3 = m[0][1] * m[1][2] - m[1][1] * m[0][2];
        let a4 = m[0][1] * m[1][3] - m[1][1] * m[0][3];
        let a5 = m[0][2] * m[1][3] - m[1][2] * m[0][3];
        let b0 = m[2][0] * m[3][1] - m[3][0] * m[2][1];
        let b1 = m[2][0] * m[3][2] - m[3][0] * m[2][2];
        let b2 = m[2][0] * m[3][3] - m[3][0] * m[2][3];
        let b3 = m[2][1] * m[3][2] - m[3][1] * m[2][2];
        let b4 = m[2][1] * m[3][3] - m[3][1] * m[2][3];
        let b5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];

        let det = a0 * b5 - a1 * b4 + a2 * b3 + a3 * b2 - a4 * b1 + a5 * b0;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        let mut out = [[0.0_f64; 4]; 4];
        out[0][0] = (m[1][1] * b5 - m[1][2] * b4 + m[1][3] * b3) * inv;
        out[0][1] = (-m[0][1] * b5 + m[0][2] * b4 - m[0][3] * b3) * inv;
        out[0][2] = (m[3][1] * a5 - m[3][2] * a4 + m[3][3] * a3) * inv;
        out[0][3] = (-m[2][1] * a5 + m[2][2] * a4 - m[2][3] * a3) * inv;
        out[1][0] = (-m[1][0] * b5 + m[1][2] * b2 - m[1][3] * b1) * inv;
        out[1][1] = (m[0][0] * b5 - m[0][2] * b2 + m[0][3] * b1) * inv;
        out[1][2] = (-m[3][0] * a5 + m[3][2] * a2 - m[3][3] * a1) * inv;
        out[1][3] = (m[2][0] * a5 - m[2][2] * a2 + m[2][3] * a1) * inv;
        out[2][0] = (m[1][0] * b4 - m[1][1] * b2 + m[1][3] * b0) * inv;
        out[2][1] = (-m[0][0] * b4 + m[0][1] * b2 - m[0][3] * b0) * inv;
        out[2][2] = (m[3][0] * a4 - m[3][1] * a2 + m[3][3] * a0) * inv;
        out[2][3] = (-m[2][0] * a4 + m[2][1] * a2 - m[2][3] * a0) * inv;
        out[3][0] = (-m[1][0] * b3 + m[1][1] * b1 - m[1][2] * b0) * inv;
        out[3][1] = (m[0][0] * b3 - m[0][1] * b1 + m[0][2] * b0) * inv;
        out[3][2] = (-m[3][0] * a3 + m[3][1] * a1 - m[3][2] * a0) * inv;
        out[3][3] = (m[2][0] * a3 - m[2][1] * a1 + m[2][2] * a0) * inv;

        Some(Self { cols: out })
    }

    /// Whether the transform is left-handed (negative determinant).
    #[inline]
    #[must_use]
    pub fn flips_handedness(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Is every component [finite](f64::is_finite)?
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols
            .iter()
            .all(|col| col.iter().all(|v| v.is_finite()))
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for j in 0..4 {
            for i in 0..4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = dot(v, v).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

/// The current transformation matrix, its inverse, and the save stack.
///
/// `concat` composes a new local transform *inside* the current one (the
/// incoming matrix applies to points first), which is the semantics of the
/// `transform`-family calls. The inverse is maintained incrementally; a
/// singular replacement leaves the stored inverse at the identity and is
/// reported by the return value.
#[derive(Clone, Debug, Default)]
pub struct CtmStack {
    ctm: Mat4,
    inverse: Mat4,
    saved: Vec<(Mat4, Mat4)>,
}

impl CtmStack {
    /// Creates a stack holding the identity with no saved entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current transformation matrix.
    #[inline]
    #[must_use]
    pub fn ctm(&self) -> Mat4 {
        self.ctm
    }

    /// The inverse of the CTM (identity if the CTM is singular).
    #[inline]
    #[must_use]
    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// Replaces the CTM. Returns `false` when the new matrix is singular
    /// (the CTM is still replaced; the inverse falls back to identity).
    pub fn set(&mut self, m: Mat4) -> bool {
        self.ctm = m;
        match m.inverse() {
            Some(inv) => {
                self.inverse = inv;
                true
            }
            None => {
                self.inverse = Mat4::IDENTITY;
                false
            }
        }
    }

    /// Composes `m` inside the CTM: `ctm' = ctm · m`. Returns `false` when
    /// `m` is singular.
    pub fn concat(&mut self, m: Mat4) -> bool {
        self.ctm = self.ctm * m;
        match m.inverse() {
            Some(inv) => {
                self.inverse = inv * self.inverse;
                true
            }
            None => {
                self.inverse = Mat4::IDENTITY;
                false
            }
        }
    }

    /// Saves the current (CTM, inverse) pair.
    pub fn push(&mut self) {
        self.saved.push((self.ctm, self.inverse));
    }

    /// Restores the most recently saved pair. Returns `false` on underflow.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some((ctm, inverse)) => {
                self.ctm = ctm;
                self.inverse = inverse;
                true
            }
            None => false,
        }
    }

    /// Number of saved pairs.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn mat_approx(a: Mat4, b: Mat4) -> bool {
        a.cols
            .iter()
            .flatten()
            .zip(b.cols.iter().flatten())
            .all(|(x, y)| approx(*x, *y))
    }

    #[test]
    fn identity_multiply() {
        let t = Mat4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Mat4::IDENTITY * t, t);
        assert_eq!(t * Mat4::IDENTITY, t);
    }

    #[test]
    fn translation_composition() {
        let a = Mat4::from_translation(1.0, 0.0, 0.0);
        let b = Mat4::from_translation(0.0, 2.0, 0.0);
        let c = a * b;
        assert_eq!(c.cols[3], [1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn rotation_about_z() {
        let r = Mat4::from_rotation(core::f64::consts::FRAC_PI_2, 0.0, 0.0, 1.0);
        assert!(approx(r.cols[0][0], 0.0));
        assert!(approx(r.cols[0][1], 1.0));
        assert!(approx(r.cols[1][0], -1.0));
        assert!(approx(r.determinant(), 1.0));
    }

    #[test]
    fn determinant_signs() {
        assert!(approx(Mat4::IDENTITY.determinant(), 1.0));
        assert!(approx(Mat4::from_scale(2.0, 3.0, 4.0).determinant(), 24.0));
        assert!(Mat4::from_scale(-1.0, 1.0, 1.0).flips_handedness());
        assert!(!Mat4::from_translation(5.0, 0.0, 0.0).flips_handedness());
    }

    #[test]
    fn inverse_round_trip() {
        let m = Mat4::from_translation(1.0, -2.0, 3.0)
            * Mat4::from_rotation(0.7, 1.0, 2.0, 0.5)
            * Mat4::from_scale(2.0, 0.5, 4.0);
        let inv = m.inverse().unwrap();
        assert!(mat_approx(m * inv, Mat4::IDENTITY));
        assert!(mat_approx(inv * m, Mat4::IDENTITY));
    }

    #[test]
    fn singular_has_no_inverse() {
        let m = Mat4::from_scale(0.0, 1.0, 1.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn skew_determinant_is_one() {
        let m = Mat4::from_skew(0.5, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(approx(m.determinant(), 1.0));
        // A vector along x picks up a tan(angle) y component.
        assert!(approx(m.cols[0][1], 0.5_f64.tan()));
    }

    #[test]
    fn skew_degenerate_directions_are_identity() {
        assert_eq!(
            Mat4::from_skew(0.5, [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Mat4::IDENTITY
        );
        assert_eq!(
            Mat4::from_skew(0.5, [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
            Mat4::IDENTITY
        );
    }

    #[test]
    fn perspective_is_invertible_and_preserves_handedness() {
        let p = Mat4::from_perspective(core::f64::consts::FRAC_PI_2);
        assert!(p.determinant() > 0.0);
        assert!(p.inverse().is_some());
    }

    #[test]
    fn ctm_stack_save_restore() {
        let mut stack = CtmStack::new();
        assert!(stack.concat(Mat4::from_translation(5.0, 0.0, 0.0)));
        stack.push();
        assert!(stack.concat(Mat4::from_scale(2.0, 2.0, 2.0)));
        assert_eq!(stack.depth(), 1);
        assert!(stack.pop());
        assert_eq!(stack.ctm(), Mat4::from_translation(5.0, 0.0, 0.0));
        assert!(!stack.pop());
    }

    #[test]
    fn ctm_inverse_tracks_concat() {
        let mut stack = CtmStack::new();
        assert!(stack.concat(Mat4::from_translation(1.0, 2.0, 3.0)));
        assert!(stack.concat(Mat4::from_scale(2.0, 2.0, 2.0)));
        assert!(mat_approx(stack.ctm() * stack.inverse(), Mat4::IDENTITY));
    }

    #[test]
    fn singular_set_reports_false() {
        let mut stack = CtmStack::new();
        assert!(!stack.set(Mat4::from_scale(0.0, 0.0, 0.0)));
        assert_eq!(stack.inverse(), Mat4::IDENTITY);
    }
}
