// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block nesting states and the call-validity matrix.
//!
//! Every call is checked against the innermost open block before it is
//! applied. The matrix is a bitmask per call kind; [`legal`] is a single
//! mask test. Offending calls are reported and dropped, they never abort
//! the session.

use crate::call::CallKind;

/// The innermost open block of a session.
///
/// `Outside` means no session is current at all; `Base` is a session with
/// no block open. The remaining states name the block at the top of the
/// nesting stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// No current session.
    Outside,
    /// A session with no open block.
    Base,
    /// Inside `frame_begin` .. `frame_end`.
    Frame,
    /// Inside `world_begin` .. `world_end`.
    World,
    /// Inside `attribute_begin` .. `attribute_end`.
    Attribute,
    /// Inside `transform_begin` .. `transform_end`.
    Transform,
    /// Inside `solid_begin` .. `solid_end`.
    Solid,
    /// Inside `object_begin` .. `object_end`.
    Object,
    /// Inside `motion_begin` .. `motion_end`.
    Motion,
}

impl BlockState {
    const fn bit(self) -> u16 {
        match self {
            Self::Outside => 1 << 0,
            Self::Base => 1 << 1,
            Self::Frame => 1 << 2,
            Self::World => 1 << 3,
            Self::Attribute => 1 << 4,
            Self::Transform => 1 << 5,
            Self::Solid => 1 << 6,
            Self::Object => 1 << 7,
            Self::Motion => 1 << 8,
        }
    }
}

// -- Mask vocabulary --

const OUTSIDE: u16 = BlockState::Outside.bit();
const BASE: u16 = BlockState::Base.bit();
const FRAME: u16 = BlockState::Frame.bit();
const WORLD: u16 = BlockState::World.bit();
const ATTRIBUTE: u16 = BlockState::Attribute.bit();
const TRANSFORM: u16 = BlockState::Transform.bit();
const SOLID: u16 = BlockState::Solid.bit();
const OBJECT: u16 = BlockState::Object.bit();
const MOTION: u16 = BlockState::Motion.bit();

/// Any state with a current session.
const ANY_SESSION: u16 = BASE | FRAME | WORLD | ATTRIBUTE | TRANSFORM | SOLID | OBJECT | MOTION;
/// States where scene content (geometry, instances) may appear.
const SCENE: u16 = WORLD | ATTRIBUTE | TRANSFORM | SOLID | OBJECT;
/// States where rendering options may still change.
const OPTIONS: u16 = BASE | FRAME;

/// Whether `kind` may be issued while `state` is the innermost block.
#[must_use]
pub fn legal(kind: CallKind, state: BlockState) -> bool {
    mask(kind) & state.bit() != 0
}

const fn mask(kind: CallKind) -> u16 {
    use CallKind::*;
    match kind {
        // Session control. `begin` is the only call legal with no session;
        // the bookkeeping calls are legal anywhere a session exists.
        Begin => OUTSIDE | ANY_SESSION,
        End | Context | GetContext => OUTSIDE | ANY_SESSION,
        Declare | ErrorHandler | Synchronize | ArchiveRecord | ReadArchive => ANY_SESSION,

        // Blocks. Each `*_end` requires its own block to be innermost.
        FrameBegin => BASE,
        FrameEnd => FRAME,
        WorldBegin => OPTIONS,
        WorldEnd => WORLD,
        AttributeBegin => OPTIONS | SCENE,
        AttributeEnd => ATTRIBUTE,
        TransformBegin => OPTIONS | SCENE,
        TransformEnd => TRANSFORM,
        SolidBegin => WORLD | ATTRIBUTE | TRANSFORM | SOLID,
        SolidEnd => SOLID,
        ObjectBegin => BASE | FRAME | WORLD | ATTRIBUTE | TRANSFORM,
        ObjectEnd => OBJECT,
        ObjectInstance => SCENE | MOTION,
        MotionBegin => BASE | FRAME | WORLD | ATTRIBUTE | TRANSFORM | SOLID | OBJECT,
        MotionEnd => MOTION,

        // Options freeze at `world_begin`.
        Format | FrameAspectRatio | ScreenWindow | CropWindow | Projection | Clipping
        | DepthOfField | Shutter | PixelVariance | PixelSamples | PixelFilter | Exposure
        | Imager | Quantize | Display | Hider | ColorSamples | RelativeDetail | Option => OPTIONS,

        // Attributes may change anywhere except inside a motion block.
        Color | Opacity | TextureCoordinates | LightSource | AreaLightSource | Illuminate
        | Surface | Atmosphere | Interior | Exterior | Displacement | Deformation
        | ShadingRate | ShadingInterpolation | Matte | Bound | Detail | DetailRange
        | GeometricApproximation | Orientation | ReverseOrientation | Sides | Basis
        | TrimCurve | Attribute => OPTIONS | SCENE,

        // Transforms additionally supply motion-block samples.
        Identity | Transform | ConcatTransform | Perspective | Translate | Rotate | Scale
        | Skew | CoordinateSystem | CoordSysTransform => OPTIONS | SCENE | MOTION,

        // Primitives live in the world (motion blocks included).
        Sphere | Cone | Cylinder | Hyperboloid | Paraboloid | Disk | Torus | Polygon
        | GeneralPolygon | PointsPolygons | PointsGeneralPolygons | Patch | PatchMesh
        | NuPatch | Geometry => SCENE | MOTION,

        // Texture maps are whole-image operations, not scene content.
        MakeTexture | MakeBump | MakeLatLongEnvironment | MakeCubeFaceEnvironment
        | MakeShadow => OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_freeze_inside_world() {
        assert!(legal(CallKind::Format, BlockState::Base));
        assert!(legal(CallKind::Format, BlockState::Frame));
        assert!(!legal(CallKind::Format, BlockState::World));
        assert!(!legal(CallKind::Display, BlockState::Attribute));
    }

    #[test]
    fn primitives_need_the_world() {
        assert!(!legal(CallKind::Sphere, BlockState::Base));
        assert!(!legal(CallKind::Sphere, BlockState::Frame));
        assert!(legal(CallKind::Sphere, BlockState::World));
        assert!(legal(CallKind::Sphere, BlockState::Motion));
        assert!(legal(CallKind::Sphere, BlockState::Object));
    }

    #[test]
    fn ends_require_their_own_block() {
        assert!(legal(CallKind::FrameEnd, BlockState::Frame));
        assert!(!legal(CallKind::FrameEnd, BlockState::Base));
        assert!(!legal(CallKind::FrameEnd, BlockState::World));
        assert!(legal(CallKind::MotionEnd, BlockState::Motion));
        assert!(!legal(CallKind::AttributeEnd, BlockState::Transform));
    }

    #[test]
    fn motion_blocks_admit_transforms_but_not_attributes() {
        assert!(legal(CallKind::Translate, BlockState::Motion));
        assert!(!legal(CallKind::Color, BlockState::Motion));
        assert!(!legal(CallKind::MotionBegin, BlockState::Motion));
    }

    #[test]
    fn only_begin_is_legal_without_a_session() {
        assert!(legal(CallKind::Begin, BlockState::Outside));
        assert!(!legal(CallKind::Declare, BlockState::Outside));
        assert!(!legal(CallKind::WorldBegin, BlockState::Outside));
    }

    #[test]
    fn solids_nest_inside_the_world_only() {
        assert!(legal(CallKind::SolidBegin, BlockState::World));
        assert!(legal(CallKind::SolidBegin, BlockState::Solid));
        assert!(!legal(CallKind::SolidBegin, BlockState::Base));
        assert!(!legal(CallKind::SolidBegin, BlockState::Object));
    }
}
