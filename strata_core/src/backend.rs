// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The backend dispatch trait.
//!
//! Calls that survive validation and state mutation are forwarded to the
//! session's [`Backend`]. Every method is defaulted to a no-op (or an
//! identity handle remap), so partial implementations and test doubles
//! only name the calls they care about.
//!
//! Dispatch order relative to state mutation is fixed: the session is
//! fully updated first, then the backend sees the call with its original
//! arguments. Handle-creating calls are the exception, they consult the
//! backend for the externally visible handle before the record is
//! published.

use crate::error::ErrorMode;
use crate::light::{LightId, LightRecord};
use crate::param::ParamList;
use crate::session::{ContextId, ObjectId, SolidOp};
use crate::state::{AttributeSet, Basis, OptionSet, Orientation, ShadingInterpolation, TrimCurve};
use crate::transform::{CtmStack, Mat4};

/// Receiver for dispatched calls.
#[expect(unused_variables, reason = "defaulted no-op methods keep argument names for docs")]
pub trait Backend {
    // -- Session control --

    /// A context was created; returns the externally visible handle.
    fn begin(&mut self, id: ContextId) -> ContextId {
        id
    }
    /// The current context was destroyed.
    fn end(&mut self) {}
    /// A token was declared.
    fn declare(&mut self, name: &str, declaration: &str) {}
    /// The error-handling policy changed.
    fn error_handler(&mut self, mode: ErrorMode) {}
    /// The session was reset or aborted.
    fn synchronize(&mut self, token: &str) {}
    /// A structured comment was emitted.
    fn archive_record(&mut self, kind: &str, text: &str) {}
    /// An archive is about to be read (replayed or parsed).
    fn read_archive(&mut self, name: &str, params: &ParamList) {}

    // -- Blocks --

    /// A frame block opened.
    fn frame_begin(&mut self, frame: i32) {}
    /// A frame block closed.
    fn frame_end(&mut self) {}
    /// The world block opened; options are now frozen.
    fn world_begin(&mut self) {}
    /// The world block closed; the frame may render.
    fn world_end(&mut self) {}
    /// An attribute block opened.
    fn attribute_begin(&mut self) {}
    /// An attribute block closed.
    fn attribute_end(&mut self) {}
    /// A transform block opened.
    fn transform_begin(&mut self) {}
    /// A transform block closed.
    fn transform_end(&mut self) {}
    /// A solid block opened.
    fn solid_begin(&mut self, op: SolidOp) {}
    /// A solid block closed.
    fn solid_end(&mut self) {}
    /// A retained-object definition opened; returns the externally
    /// visible handle.
    fn object_begin(&mut self, id: ObjectId) -> ObjectId {
        id
    }
    /// A retained-object definition closed.
    fn object_end(&mut self) {}
    /// A retained object was instanced. The object's recorded calls are
    /// replayed through normal dispatch immediately after this.
    fn object_instance(&mut self, handle: ObjectId) {}
    /// A motion block opened with these sample times.
    fn motion_begin(&mut self, times: &[f64]) {}
    /// A motion block closed.
    fn motion_end(&mut self) {}

    // -- Options --

    /// Raster resolution and pixel aspect.
    fn format(&mut self, xres: i32, yres: i32, pixel_aspect: f64) {}
    /// Frame aspect ratio.
    fn frame_aspect_ratio(&mut self, ratio: f64) {}
    /// Screen window.
    fn screen_window(&mut self, left: f64, right: f64, bottom: f64, top: f64) {}
    /// Crop window.
    fn crop_window(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {}
    /// Camera projection.
    fn projection(&mut self, name: &str, params: &ParamList) {}
    /// Clipping planes.
    fn clipping(&mut self, near: f64, far: f64) {}
    /// Depth of field.
    fn depth_of_field(&mut self, fstop: f64, focal_length: f64, focal_distance: f64) {}
    /// Shutter times.
    fn shutter(&mut self, open: f64, close: f64) {}
    /// Pixel variance bound.
    fn pixel_variance(&mut self, variance: f64) {}
    /// Pixel sampling rates.
    fn pixel_samples(&mut self, x: f64, y: f64) {}
    /// Pixel reconstruction filter.
    fn pixel_filter(&mut self, name: &str, xwidth: f64, ywidth: f64) {}
    /// Exposure gain and gamma.
    fn exposure(&mut self, gain: f64, gamma: f64) {}
    /// Imager shader.
    fn imager(&mut self, name: &str, params: &ParamList) {}
    /// Quantization for one output type.
    fn quantize(&mut self, kind: &str, one: i32, min: i32, max: i32, dither: f64) {}
    /// A display output.
    fn display(&mut self, name: &str, kind: &str, mode: &str, params: &ParamList) {}
    /// Hidden-surface algorithm.
    fn hider(&mut self, kind: &str, params: &ParamList) {}
    /// Color-sample basis.
    fn color_samples(&mut self, from: &[f64], to: &[f64]) {}
    /// Relative detail scale.
    fn relative_detail(&mut self, scale: f64) {}
    /// Implementation-specific option.
    fn option(&mut self, name: &str, params: &ParamList) {}

    // -- Attributes --

    /// Surface color.
    fn color(&mut self, samples: &[f64]) {}
    /// Surface opacity.
    fn opacity(&mut self, samples: &[f64]) {}
    /// Texture coordinates at the parametric corners.
    fn texture_coordinates(&mut self, corners: &[f64; 8]) {}
    /// A light was created (area or not, see [`LightRecord::area`]);
    /// returns the externally visible handle.
    fn light_source(&mut self, id: LightId, light: &LightRecord) -> LightId {
        id
    }
    /// A light was toggled. Also re-dispatched when an attribute pop
    /// changes effective light membership.
    fn illuminate(&mut self, light: LightId, on: bool) {}
    /// Surface shader.
    fn surface(&mut self, name: &str, params: &ParamList) {}
    /// Atmosphere shader.
    fn atmosphere(&mut self, name: &str, params: &ParamList) {}
    /// Interior volume shader.
    fn interior(&mut self, name: &str, params: &ParamList) {}
    /// Exterior volume shader.
    fn exterior(&mut self, name: &str, params: &ParamList) {}
    /// Displacement shader.
    fn displacement(&mut self, name: &str, params: &ParamList) {}
    /// Deformation shader.
    fn deformation(&mut self, name: &str, params: &ParamList) {}
    /// Shading rate.
    fn shading_rate(&mut self, area: f64) {}
    /// Shading interpolation mode.
    fn shading_interpolation(&mut self, mode: ShadingInterpolation) {}
    /// Matte flag.
    fn matte(&mut self, onoff: bool) {}
    /// Bounding box for subsequent geometry.
    fn bound(&mut self, bounds: &[f64; 6]) {}
    /// Current level of detail.
    fn detail(&mut self, bounds: &[f64; 6]) {}
    /// Detail range.
    fn detail_range(&mut self, range: &[f64; 4]) {}
    /// Geometric approximation hint.
    fn geometric_approximation(&mut self, kind: &str, value: f64) {}
    /// Orientation token.
    fn orientation(&mut self, orientation: Orientation) {}
    /// Orientation flip.
    fn reverse_orientation(&mut self) {}
    /// The CTM changed handedness; `reversed` is the new flip state.
    /// Dispatched exactly once per change, never per transform call.
    fn orientation_flipped(&mut self, reversed: bool) {}
    /// Visible sides.
    fn sides(&mut self, n: i32) {}
    /// Patch bases.
    fn basis(&mut self, basis: &Basis) {}
    /// Trim curves.
    fn trim_curve(&mut self, trim: &TrimCurve) {}
    /// Implementation-specific attribute.
    fn attribute(&mut self, name: &str, params: &ParamList) {}

    // -- Transforms --

    /// CTM reset to identity.
    fn identity(&mut self) {}
    /// CTM replaced.
    fn transform(&mut self, matrix: Mat4) {}
    /// Matrix composed inside the CTM.
    fn concat_transform(&mut self, matrix: Mat4) {}
    /// Perspective composed inside the CTM.
    fn perspective(&mut self, fov: f64) {}
    /// Translation composed inside the CTM.
    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {}
    /// Rotation composed inside the CTM.
    fn rotate(&mut self, angle: f64, ax: f64, ay: f64, az: f64) {}
    /// Scale composed inside the CTM.
    fn scale(&mut self, sx: f64, sy: f64, sz: f64) {}
    /// Skew composed inside the CTM.
    fn skew(&mut self, angle: f64, d1: &[f64; 3], d2: &[f64; 3]) {}
    /// The CTM was bound to a name.
    fn coordinate_system(&mut self, name: &str) {}
    /// The CTM was replaced with a named snapshot.
    fn coord_sys_transform(&mut self, name: &str, ctm: Mat4) {}

    // -- Primitives --

    /// Quadric sphere.
    fn sphere(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, params: &ParamList) {}
    /// Quadric cone.
    fn cone(&mut self, height: f64, radius: f64, thetamax: f64, params: &ParamList) {}
    /// Quadric cylinder.
    fn cylinder(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, params: &ParamList) {}
    /// Quadric hyperboloid.
    fn hyperboloid(
        &mut self,
        point1: &[f64; 3],
        point2: &[f64; 3],
        thetamax: f64,
        params: &ParamList,
    ) {
    }
    /// Quadric paraboloid.
    fn paraboloid(&mut self, rmax: f64, zmin: f64, zmax: f64, thetamax: f64, params: &ParamList) {}
    /// Quadric disk.
    fn disk(&mut self, height: f64, radius: f64, thetamax: f64, params: &ParamList) {}
    /// Quadric torus.
    fn torus(
        &mut self,
        major: f64,
        minor: f64,
        phimin: f64,
        phimax: f64,
        thetamax: f64,
        params: &ParamList,
    ) {
    }
    /// Convex polygon.
    fn polygon(&mut self, params: &ParamList) {}
    /// Concave polygon with holes.
    fn general_polygon(&mut self, nverts: &[i32], params: &ParamList) {}
    /// Indexed polygon mesh.
    fn points_polygons(&mut self, nverts: &[i32], verts: &[i32], params: &ParamList) {}
    /// Indexed general-polygon mesh.
    fn points_general_polygons(
        &mut self,
        nloops: &[i32],
        nverts: &[i32],
        verts: &[i32],
        params: &ParamList,
    ) {
    }
    /// Single patch.
    fn patch(&mut self, kind: &str, params: &ParamList) {}
    /// Patch mesh.
    fn patch_mesh(
        &mut self,
        kind: &str,
        nu: i32,
        uwrap: &str,
        nv: i32,
        vwrap: &str,
        params: &ParamList,
    ) {
    }
    /// NURBS patch.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    fn nu_patch(
        &mut self,
        nu: i32,
        uorder: i32,
        uknot: &[f64],
        umin: f64,
        umax: f64,
        nv: i32,
        vorder: i32,
        vknot: &[f64],
        vmin: f64,
        vmax: f64,
        params: &ParamList,
    ) {
    }
    /// Implementation-specific geometry that was not expanded.
    fn geometry(&mut self, name: &str, params: &ParamList) {}

    // -- Texture maps --

    /// Texture-map conversion.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    fn make_texture(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: &ParamList,
    ) {
    }
    /// Bump-map conversion.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    fn make_bump(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: &ParamList,
    ) {
    }
    /// Lat-long environment-map conversion.
    fn make_lat_long_environment(
        &mut self,
        picture: &str,
        texture: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: &ParamList,
    ) {
    }
    /// Cube-face environment-map conversion.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    fn make_cube_face_environment(
        &mut self,
        faces: &[alloc::string::String; 6],
        texture: &str,
        fov: f64,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: &ParamList,
    ) {
    }
    /// Shadow-map conversion.
    fn make_shadow(&mut self, picture: &str, texture: &str, params: &ParamList) {}
}

/// A backend that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl Backend for NullBackend {}

/// Read-only view of the state a geometry producer needs.
///
/// Borrowed from the current session, so it cannot outlive the renderer
/// borrow that produced it.
#[derive(Debug)]
pub struct GeomQuery<'a> {
    attrs: &'a AttributeSet,
    opts: &'a OptionSet,
    ctm: &'a CtmStack,
}

impl<'a> GeomQuery<'a> {
    pub(crate) fn new(attrs: &'a AttributeSet, opts: &'a OptionSet, ctm: &'a CtmStack) -> Self {
        Self { attrs, opts, ctm }
    }

    /// Number of color samples per color value.
    #[must_use]
    pub fn color_samples(&self) -> usize {
        self.opts.color_samples
    }

    /// Current shading rate in pixels.
    #[must_use]
    pub fn shading_rate(&self) -> f64 {
        self.attrs.shading_rate
    }

    /// Tesselation rate along both parametric axes, as screen area per
    /// facet.
    ///
    /// No separate u/v rate is tracked; producers split until a facet
    /// covers at most [`shading_rate`](Self::shading_rate) pixels in each
    /// direction.
    #[must_use]
    pub fn tesselation_rate(&self) -> f64 {
        self.attrs.shading_rate
    }

    /// Current patch bases and steps.
    #[must_use]
    pub fn basis(&self) -> &Basis {
        &self.attrs.basis
    }

    /// Trim curves attached to the current state.
    #[must_use]
    pub fn trim(&self) -> &TrimCurve {
        &self.attrs.trim
    }

    /// The current object-to-camera transform.
    #[must_use]
    pub fn ctm(&self) -> Mat4 {
        self.ctm.ctm()
    }

    /// Texture coordinates at the parametric corners.
    #[must_use]
    pub fn texture_coordinates(&self) -> &[f64; 8] {
        &self.attrs.texture_coordinates
    }

    /// The effective orientation after CTM handedness.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.attrs.effective_orientation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn null_backend_keeps_handles() {
        let mut backend = NullBackend;
        assert_eq!(backend.begin(ContextId::from_index(2)), ContextId::from_index(2));
        assert_eq!(backend.object_begin(ObjectId(4)), ObjectId(4));
        let record = LightRecord {
            name: alloc::string::String::from("ambient"),
            params: Vec::new(),
            area: false,
            ctm: Mat4::IDENTITY,
            before_world: true,
            external: LightId(1),
        };
        assert_eq!(backend.light_source(LightId(1), &record), LightId(1));
    }

    #[test]
    fn query_reads_through_to_state() {
        let attrs = AttributeSet::default();
        let opts = OptionSet::default();
        let ctm = CtmStack::new();
        let q = GeomQuery::new(&attrs, &opts, &ctm);
        assert_eq!(q.color_samples(), 3);
        assert_eq!(q.shading_rate(), 1.0);
        assert_eq!(q.tesselation_rate(), 1.0);
        assert_eq!(q.basis().vstep, 3);
        assert_eq!(q.ctm(), Mat4::IDENTITY);
        assert_eq!(q.orientation(), Orientation::Outside);
    }
}
