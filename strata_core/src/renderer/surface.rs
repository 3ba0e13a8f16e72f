// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public call surface.
//!
//! One method per call, thin over [`Renderer::issue`]: each wrapper
//! builds the owned [`Call`] descriptor and runs the pipeline. Handle
//! results come back through the pipeline outcome; everything else
//! reports through the installed reporter and returns `()`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::{Outcome, Renderer};
use crate::call::Call;
use crate::light::LightId;
use crate::param::{DeclError, Declaration, ParamList};
use crate::session::ObjectId;
use crate::transform::Mat4;

impl Renderer {
    // -- Session bookkeeping --

    /// Declares `name` with the given declaration string, returning the
    /// parsed declaration.
    ///
    /// # Errors
    ///
    /// Fails when the declaration does not parse, or with
    /// [`DeclError::NoContext`] when no context is current (the session
    /// scope is what holds declarations).
    pub fn declare(&mut self, name: &str, declaration: &str) -> Result<Declaration, DeclError> {
        match self.issue(Call::Declare {
            name: name.to_string(),
            declaration: declaration.to_string(),
        }) {
            Outcome::Declaration(decl) => Ok(decl),
            _ => {
                Declaration::parse(declaration)?;
                Err(DeclError::NoContext)
            }
        }
    }

    /// Selects the error-handling policy: `"ignore"`, `"print"`, or
    /// `"abort"`.
    pub fn error_handler(&mut self, token: &str) {
        self.issue(Call::ErrorHandler {
            token: token.to_string(),
        });
    }

    /// Resets (`"reset"`) or aborts (`"abort"`) the current context,
    /// replacing its session with a fresh one under the same handle.
    pub fn synchronize(&mut self, token: &str) {
        self.issue(Call::Synchronize {
            token: token.to_string(),
        });
    }

    /// Emits a structured comment; `kind` is `"comment"`, `"structure"`,
    /// or `"verbatim"`.
    pub fn archive_record(&mut self, kind: &str, text: &str) {
        self.issue(Call::ArchiveRecord {
            kind: kind.to_string(),
            text: text.to_string(),
        });
    }

    /// Reads the archive at `name` through the installed archive source,
    /// caching its calls for later reads (pass an int or string param
    /// `"cache"` of `0`/`"false"` to parse live instead).
    pub fn read_archive(&mut self, name: &str, params: ParamList) {
        self.issue(Call::ReadArchive {
            name: name.to_string(),
            params,
        });
    }

    // -- Blocks --

    /// Opens a frame block for frame number `frame`.
    pub fn frame_begin(&mut self, frame: i32) {
        self.issue(Call::FrameBegin { frame });
    }

    /// Closes the frame block, restoring options, attributes, and CTM.
    pub fn frame_end(&mut self) {
        self.issue(Call::FrameEnd);
    }

    /// Opens the world block: freezes options, establishes camera space,
    /// and resets the CTM to world space.
    pub fn world_begin(&mut self) {
        self.issue(Call::WorldBegin);
    }

    /// Closes the world block.
    pub fn world_end(&mut self) {
        self.issue(Call::WorldEnd);
    }

    /// Saves the attribute set and CTM.
    pub fn attribute_begin(&mut self) {
        self.issue(Call::AttributeBegin);
    }

    /// Restores the attribute set and CTM saved by the matching begin.
    pub fn attribute_end(&mut self) {
        self.issue(Call::AttributeEnd);
    }

    /// Saves the CTM only.
    pub fn transform_begin(&mut self) {
        self.issue(Call::TransformBegin);
    }

    /// Restores the CTM saved by the matching begin.
    pub fn transform_end(&mut self) {
        self.issue(Call::TransformEnd);
    }

    /// Opens a CSG block; `operation` is `"primitive"`, `"intersection"`,
    /// `"union"`, or `"difference"`.
    pub fn solid_begin(&mut self, operation: &str) {
        self.issue(Call::SolidBegin {
            operation: operation.to_string(),
        });
    }

    /// Closes the innermost CSG block.
    pub fn solid_end(&mut self) {
        self.issue(Call::SolidEnd);
    }

    /// Opens a retained-object definition; subsequent calls record
    /// instead of dispatching. Returns the object handle, or `None` when
    /// the call was rejected.
    pub fn object_begin(&mut self) -> Option<ObjectId> {
        match self.issue(Call::ObjectBegin) {
            Outcome::Object(id) => Some(id),
            _ => None,
        }
    }

    /// Closes the retained-object definition.
    pub fn object_end(&mut self) {
        self.issue(Call::ObjectEnd);
    }

    /// Instances a retained object: its recorded calls replay here,
    /// under the current attributes and CTM.
    pub fn object_instance(&mut self, handle: ObjectId) {
        self.issue(Call::ObjectInstance { handle });
    }

    /// Opens a motion block sampling at `times`.
    pub fn motion_begin(&mut self, times: &[f64]) {
        self.issue(Call::MotionBegin {
            times: times.to_vec(),
        });
    }

    /// Closes the motion block.
    pub fn motion_end(&mut self) {
        self.issue(Call::MotionEnd);
    }

    // -- Options --

    /// Sets raster resolution and pixel aspect ratio.
    pub fn format(&mut self, xres: i32, yres: i32, pixel_aspect: f64) {
        self.issue(Call::Format {
            xres,
            yres,
            pixel_aspect,
        });
    }

    /// Sets the frame aspect ratio.
    pub fn frame_aspect_ratio(&mut self, ratio: f64) {
        self.issue(Call::FrameAspectRatio { ratio });
    }

    /// Sets the screen window in screen space.
    pub fn screen_window(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.issue(Call::ScreenWindow {
            left,
            right,
            bottom,
            top,
        });
    }

    /// Sets the crop window as fractions of the raster.
    pub fn crop_window(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
        self.issue(Call::CropWindow {
            xmin,
            xmax,
            ymin,
            ymax,
        });
    }

    /// Selects the camera projection and starts camera placement over
    /// from an identity CTM.
    pub fn projection(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Projection {
            name: name.to_string(),
            params,
        });
    }

    /// Sets the near and far clipping planes.
    pub fn clipping(&mut self, near: f64, far: f64) {
        self.issue(Call::Clipping { near, far });
    }

    /// Sets depth-of-field parameters.
    pub fn depth_of_field(&mut self, fstop: f64, focal_length: f64, focal_distance: f64) {
        self.issue(Call::DepthOfField {
            fstop,
            focal_length,
            focal_distance,
        });
    }

    /// Sets shutter open and close times.
    pub fn shutter(&mut self, open: f64, close: f64) {
        self.issue(Call::Shutter { open, close });
    }

    /// Sets the acceptable pixel variance.
    pub fn pixel_variance(&mut self, variance: f64) {
        self.issue(Call::PixelVariance { variance });
    }

    /// Sets horizontal and vertical pixel sampling rates.
    pub fn pixel_samples(&mut self, x: f64, y: f64) {
        self.issue(Call::PixelSamples { x, y });
    }

    /// Selects the pixel reconstruction filter.
    pub fn pixel_filter(&mut self, name: &str, xwidth: f64, ywidth: f64) {
        self.issue(Call::PixelFilter {
            name: name.to_string(),
            xwidth,
            ywidth,
        });
    }

    /// Sets exposure gain and gamma.
    pub fn exposure(&mut self, gain: f64, gamma: f64) {
        self.issue(Call::Exposure { gain, gamma });
    }

    /// Binds the imager shader.
    pub fn imager(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Imager {
            name: name.to_string(),
            params,
        });
    }

    /// Sets quantization for the output type `kind` (`"rgba"` or `"z"`).
    pub fn quantize(&mut self, kind: &str, one: i32, min: i32, max: i32, dither: f64) {
        self.issue(Call::Quantize {
            kind: kind.to_string(),
            one,
            min,
            max,
            dither,
        });
    }

    /// Adds a display output; a leading `+` on `name` appends instead of
    /// replacing the display list.
    pub fn display(&mut self, name: &str, kind: &str, mode: &str, params: ParamList) {
        self.issue(Call::Display {
            name: name.to_string(),
            kind: kind.to_string(),
            mode: mode.to_string(),
            params,
        });
    }

    /// Selects the hidden-surface algorithm.
    pub fn hider(&mut self, kind: &str, params: ParamList) {
        self.issue(Call::Hider {
            kind: kind.to_string(),
            params,
        });
    }

    /// Sets the color-sample basis; `from` and `to` are matching `n × 3`
    /// conversion matrices. Subsequent `color`/`opacity` take `n` values.
    pub fn color_samples(&mut self, from: &[f64], to: &[f64]) {
        self.issue(Call::ColorSamples {
            from: from.to_vec(),
            to: to.to_vec(),
        });
    }

    /// Scales all level-of-detail calculations.
    pub fn relative_detail(&mut self, scale: f64) {
        self.issue(Call::RelativeDetail { scale });
    }

    /// Sets an implementation-specific option group.
    pub fn option(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Option {
            name: name.to_string(),
            params,
        });
    }

    // -- Attributes --

    /// Sets the surface color, one value per color sample.
    pub fn color(&mut self, samples: &[f64]) {
        self.issue(Call::Color {
            samples: samples.to_vec(),
        });
    }

    /// Sets the surface opacity, one value per color sample.
    pub fn opacity(&mut self, samples: &[f64]) {
        self.issue(Call::Opacity {
            samples: samples.to_vec(),
        });
    }

    /// Remaps texture coordinates at the four parametric corners.
    pub fn texture_coordinates(&mut self, corners: [f64; 8]) {
        self.issue(Call::TextureCoordinates { corners });
    }

    /// Creates a light. Returns its handle, or `None` when the call was
    /// rejected. The light starts on in the current attribute scope.
    pub fn light_source(&mut self, name: &str, params: ParamList) -> Option<LightId> {
        match self.issue(Call::LightSource {
            name: name.to_string(),
            params,
        }) {
            Outcome::Light(id) => Some(id),
            _ => None,
        }
    }

    /// Creates an area light bound to subsequent geometry. Returns its
    /// handle, or `None` when the call was rejected.
    pub fn area_light_source(&mut self, name: &str, params: ParamList) -> Option<LightId> {
        match self.issue(Call::AreaLightSource {
            name: name.to_string(),
            params,
        }) {
            Outcome::Light(id) => Some(id),
            _ => None,
        }
    }

    /// Turns a light on or off for subsequent geometry. The change is
    /// scoped: the enclosing attribute block restores it on exit.
    pub fn illuminate(&mut self, light: LightId, on: bool) {
        self.issue(Call::Illuminate { light, on });
    }

    /// Binds the surface shader.
    pub fn surface(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Surface {
            name: name.to_string(),
            params,
        });
    }

    /// Binds the atmosphere volume shader.
    pub fn atmosphere(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Atmosphere {
            name: name.to_string(),
            params,
        });
    }

    /// Binds the interior volume shader.
    pub fn interior(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Interior {
            name: name.to_string(),
            params,
        });
    }

    /// Binds the exterior volume shader.
    pub fn exterior(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Exterior {
            name: name.to_string(),
            params,
        });
    }

    /// Binds the displacement shader.
    pub fn displacement(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Displacement {
            name: name.to_string(),
            params,
        });
    }

    /// Binds the deformation shader.
    pub fn deformation(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Deformation {
            name: name.to_string(),
            params,
        });
    }

    /// Sets the maximum micropolygon area, in pixels.
    pub fn shading_rate(&mut self, area: f64) {
        self.issue(Call::ShadingRate { area });
    }

    /// Selects `"constant"` or `"smooth"` shading interpolation.
    pub fn shading_interpolation(&mut self, token: &str) {
        self.issue(Call::ShadingInterpolation {
            token: token.to_string(),
        });
    }

    /// Marks subsequent geometry as a matte object.
    pub fn matte(&mut self, onoff: bool) {
        self.issue(Call::Matte { onoff });
    }

    /// Declares a bound for subsequent geometry, in object space.
    pub fn bound(&mut self, bounds: [f64; 6]) {
        self.issue(Call::Bound { bounds });
    }

    /// Sets the current level of detail, in object space.
    pub fn detail(&mut self, bounds: [f64; 6]) {
        self.issue(Call::Detail { bounds });
    }

    /// Sets the detail range for the current representation.
    pub fn detail_range(&mut self, range: [f64; 4]) {
        self.issue(Call::DetailRange { range });
    }

    /// Sets a geometric approximation hint such as `"flatness"`.
    pub fn geometric_approximation(&mut self, kind: &str, value: f64) {
        self.issue(Call::GeometricApproximation {
            kind: kind.to_string(),
            value,
        });
    }

    /// Sets the orientation: `"outside"`, `"inside"`, `"lh"`, or `"rh"`.
    pub fn orientation(&mut self, token: &str) {
        self.issue(Call::Orientation {
            token: token.to_string(),
        });
    }

    /// Flips the current orientation.
    pub fn reverse_orientation(&mut self) {
        self.issue(Call::ReverseOrientation);
    }

    /// Sets the number of visible sides, 1 or 2.
    pub fn sides(&mut self, n: i32) {
        self.issue(Call::Sides { n });
    }

    /// Sets the u/v bases and steps for bicubic patches.
    pub fn basis(&mut self, u: Mat4, ustep: i32, v: Mat4, vstep: i32) {
        self.issue(Call::Basis { u, ustep, v, vstep });
    }

    /// Attaches trim curves to subsequent NURBS patches; empty `ncurves`
    /// removes trimming.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    pub fn trim_curve(
        &mut self,
        ncurves: &[i32],
        order: &[i32],
        knot: &[f64],
        min: &[f64],
        max: &[f64],
        n: &[i32],
        u: &[f64],
        v: &[f64],
        w: &[f64],
    ) {
        self.issue(Call::TrimCurve {
            ncurves: ncurves.to_vec(),
            order: order.to_vec(),
            knot: knot.to_vec(),
            min: min.to_vec(),
            max: max.to_vec(),
            n: n.to_vec(),
            u: u.to_vec(),
            v: v.to_vec(),
            w: w.to_vec(),
        });
    }

    /// Sets an implementation-specific attribute group.
    pub fn attribute(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Attribute {
            name: name.to_string(),
            params,
        });
    }

    // -- Transforms --

    /// Resets the CTM to identity.
    pub fn identity(&mut self) {
        self.issue(Call::Identity);
    }

    /// Replaces the CTM.
    pub fn transform(&mut self, matrix: Mat4) {
        self.issue(Call::Transform { matrix });
    }

    /// Composes `matrix` inside the CTM.
    pub fn concat_transform(&mut self, matrix: Mat4) {
        self.issue(Call::ConcatTransform { matrix });
    }

    /// Composes a perspective projection with full field of view `fov`
    /// degrees inside the CTM.
    pub fn perspective(&mut self, fov: f64) {
        self.issue(Call::Perspective { fov });
    }

    /// Composes a translation inside the CTM.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.issue(Call::Translate { dx, dy, dz });
    }

    /// Composes a rotation of `angle` degrees about the given axis
    /// inside the CTM.
    pub fn rotate(&mut self, angle: f64, ax: f64, ay: f64, az: f64) {
        self.issue(Call::Rotate { angle, ax, ay, az });
    }

    /// Composes a scale inside the CTM.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.issue(Call::Scale { sx, sy, sz });
    }

    /// Composes a skew of `angle` degrees of `d1` towards `d2` inside
    /// the CTM.
    pub fn skew(&mut self, angle: f64, d1: [f64; 3], d2: [f64; 3]) {
        self.issue(Call::Skew { angle, d1, d2 });
    }

    /// Binds `name` to the current CTM.
    pub fn coordinate_system(&mut self, name: &str) {
        self.issue(Call::CoordinateSystem {
            name: name.to_string(),
        });
    }

    /// Replaces the CTM with the coordinate system bound to `name`.
    pub fn coord_sys_transform(&mut self, name: &str) {
        self.issue(Call::CoordSysTransform {
            name: name.to_string(),
        });
    }

    // -- Primitives --

    /// A sphere of the given radius, clipped to `zmin..zmax`, swept
    /// `thetamax` degrees.
    pub fn sphere(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, params: ParamList) {
        self.issue(Call::Sphere {
            radius,
            zmin,
            zmax,
            thetamax,
            params,
        });
    }

    /// A cone of the given height and base radius.
    pub fn cone(&mut self, height: f64, radius: f64, thetamax: f64, params: ParamList) {
        self.issue(Call::Cone {
            height,
            radius,
            thetamax,
            params,
        });
    }

    /// A cylinder of the given radius spanning `zmin..zmax`.
    pub fn cylinder(
        &mut self,
        radius: f64,
        zmin: f64,
        zmax: f64,
        thetamax: f64,
        params: ParamList,
    ) {
        self.issue(Call::Cylinder {
            radius,
            zmin,
            zmax,
            thetamax,
            params,
        });
    }

    /// A hyperboloid swept from the line between two points.
    pub fn hyperboloid(
        &mut self,
        point1: [f64; 3],
        point2: [f64; 3],
        thetamax: f64,
        params: ParamList,
    ) {
        self.issue(Call::Hyperboloid {
            point1,
            point2,
            thetamax,
            params,
        });
    }

    /// A paraboloid of maximum radius `rmax` spanning `zmin..zmax`.
    pub fn paraboloid(
        &mut self,
        rmax: f64,
        zmin: f64,
        zmax: f64,
        thetamax: f64,
        params: ParamList,
    ) {
        self.issue(Call::Paraboloid {
            rmax,
            zmin,
            zmax,
            thetamax,
            params,
        });
    }

    /// A disk at height `height` with the given radius.
    pub fn disk(&mut self, height: f64, radius: f64, thetamax: f64, params: ParamList) {
        self.issue(Call::Disk {
            height,
            radius,
            thetamax,
            params,
        });
    }

    /// A torus with the given major and minor radii.
    pub fn torus(
        &mut self,
        major: f64,
        minor: f64,
        phimin: f64,
        phimax: f64,
        thetamax: f64,
        params: ParamList,
    ) {
        self.issue(Call::Torus {
            major,
            minor,
            phimin,
            phimax,
            thetamax,
            params,
        });
    }

    /// A convex planar polygon; vertex count comes from `"P"`.
    pub fn polygon(&mut self, params: ParamList) {
        self.issue(Call::Polygon { params });
    }

    /// A possibly concave polygon with holes; `nverts` gives the vertex
    /// count of each loop.
    pub fn general_polygon(&mut self, nverts: &[i32], params: ParamList) {
        self.issue(Call::GeneralPolygon {
            nverts: nverts.to_vec(),
            params,
        });
    }

    /// An indexed mesh of convex polygons.
    pub fn points_polygons(&mut self, nverts: &[i32], verts: &[i32], params: ParamList) {
        self.issue(Call::PointsPolygons {
            nverts: nverts.to_vec(),
            verts: verts.to_vec(),
            params,
        });
    }

    /// An indexed mesh of general polygons.
    pub fn points_general_polygons(
        &mut self,
        nloops: &[i32],
        nverts: &[i32],
        verts: &[i32],
        params: ParamList,
    ) {
        self.issue(Call::PointsGeneralPolygons {
            nloops: nloops.to_vec(),
            nverts: nverts.to_vec(),
            verts: verts.to_vec(),
            params,
        });
    }

    /// A single `"bilinear"` or `"bicubic"` patch.
    pub fn patch(&mut self, kind: &str, params: ParamList) {
        self.issue(Call::Patch {
            kind: kind.to_string(),
            params,
        });
    }

    /// A mesh of patches; wrap tokens are `"periodic"` or
    /// `"nonperiodic"`.
    pub fn patch_mesh(
        &mut self,
        kind: &str,
        nu: i32,
        uwrap: &str,
        nv: i32,
        vwrap: &str,
        params: ParamList,
    ) {
        self.issue(Call::PatchMesh {
            kind: kind.to_string(),
            nu,
            uwrap: uwrap.to_string(),
            nv,
            vwrap: vwrap.to_string(),
            params,
        });
    }

    /// A NURBS patch.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    pub fn nu_patch(
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
        params: ParamList,
    ) {
        self.issue(Call::NuPatch {
            nu,
            uorder,
            uknot: uknot.to_vec(),
            umin,
            umax,
            nv,
            vorder,
            vknot: vknot.to_vec(),
            vmin,
            vmax,
            params,
        });
    }

    /// Named geometry. `"cube"` expands into six bilinear patches; other
    /// names dispatch to the backend untouched.
    pub fn geometry(&mut self, name: &str, params: ParamList) {
        self.issue(Call::Geometry {
            name: name.to_string(),
            params,
        });
    }

    // -- Texture maps --

    /// Converts an image file into a texture map.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    pub fn make_texture(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: ParamList,
    ) {
        self.issue(Call::MakeTexture {
            picture: picture.to_string(),
            texture: texture.to_string(),
            swrap: swrap.to_string(),
            twrap: twrap.to_string(),
            filter: filter.to_string(),
            swidth,
            twidth,
            params,
        });
    }

    /// Converts an image file into a bump map.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    pub fn make_bump(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: ParamList,
    ) {
        self.issue(Call::MakeBump {
            picture: picture.to_string(),
            texture: texture.to_string(),
            swrap: swrap.to_string(),
            twrap: twrap.to_string(),
            filter: filter.to_string(),
            swidth,
            twidth,
            params,
        });
    }

    /// Converts a latitude-longitude image into an environment map.
    pub fn make_lat_long_environment(
        &mut self,
        picture: &str,
        texture: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: ParamList,
    ) {
        self.issue(Call::MakeLatLongEnvironment {
            picture: picture.to_string(),
            texture: texture.to_string(),
            filter: filter.to_string(),
            swidth,
            twidth,
            params,
        });
    }

    /// Converts six face images into a cube-face environment map.
    #[expect(clippy::too_many_arguments, reason = "mirrors the call signature")]
    pub fn make_cube_face_environment(
        &mut self,
        px: &str,
        nx: &str,
        py: &str,
        ny: &str,
        pz: &str,
        nz: &str,
        texture: &str,
        fov: f64,
        filter: &str,
        swidth: f64,
        twidth: f64,
        params: ParamList,
    ) {
        self.issue(Call::MakeCubeFaceEnvironment {
            faces: [
                px.to_string(),
                nx.to_string(),
                py.to_string(),
                ny.to_string(),
                pz.to_string(),
                nz.to_string(),
            ],
            texture: texture.to_string(),
            fov,
            filter: filter.to_string(),
            swidth,
            twidth,
            params,
        });
    }

    /// Converts a depth image into a shadow map.
    pub fn make_shadow(&mut self, picture: &str, texture: &str, params: ParamList) {
        self.issue(Call::MakeShadow {
            picture: picture.to_string(),
            texture: texture.to_string(),
            params,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, Reporter, Severity};
    use crate::session::ContextId;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<ErrorCode>>>);

    impl Reporter for Log {
        fn report(&mut self, code: ErrorCode, _severity: Severity, _message: &str) {
            self.0.borrow_mut().push(code);
        }
    }

    fn renderer_with_log() -> (Renderer, Rc<RefCell<Vec<ErrorCode>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ri = Renderer::new();
        ri.set_reporter(alloc::boxed::Box::new(Log(log.clone())));
        (ri, log)
    }

    #[test]
    fn begin_makes_a_context_current() {
        let mut ri = Renderer::new();
        assert_eq!(ri.get_context(), ContextId::NONE);
        let id = ri.begin();
        assert_ne!(id, ContextId::NONE);
        assert_eq!(ri.get_context(), id);
        ri.end();
        assert_eq!(ri.get_context(), ContextId::NONE);
    }

    #[test]
    fn context_switches_between_sessions() {
        let mut ri = Renderer::new();
        let a = ri.begin();
        let b = ri.begin();
        assert_ne!(a, b);
        assert_eq!(ri.get_context(), b);
        ri.context(a);
        assert_eq!(ri.get_context(), a);
        ri.context(ContextId::NONE);
        assert_eq!(ri.get_context(), ContextId::NONE);
    }

    #[test]
    fn unknown_context_handle_reports_bad_handle() {
        let (mut ri, log) = renderer_with_log();
        ri.begin();
        ri.context(ContextId(9));
        assert_eq!(log.borrow().as_slice(), &[ErrorCode::BadHandle]);
    }

    #[test]
    fn calls_without_a_context_report_ill_state() {
        let (mut ri, log) = renderer_with_log();
        ri.sphere(1.0, -1.0, 1.0, 360.0, vec![]);
        assert_eq!(log.borrow().as_slice(), &[ErrorCode::IllState]);
    }

    #[test]
    fn frame_end_without_frame_begin_is_rejected_and_harmless() {
        let (mut ri, log) = renderer_with_log();
        ri.begin();
        ri.frame_end();
        assert_eq!(log.borrow().as_slice(), &[ErrorCode::Nesting]);
        // The session survives untouched and still accepts a frame.
        ri.frame_begin(1);
        ri.frame_end();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn declare_without_context_distinguishes_syntax_from_scope() {
        let mut ri = Renderer::new();
        assert_eq!(ri.declare("t", "uniform float"), Err(DeclError::NoContext));
        assert!(matches!(
            ri.declare("t", "uniform nonsense"),
            Err(DeclError::UnknownType(_))
        ));
        ri.begin();
        let decl = ri.declare("t", "uniform float");
        assert!(decl.is_ok());
    }

    #[test]
    fn end_with_open_blocks_leaves_the_session_alone() {
        let (mut ri, log) = renderer_with_log();
        let id = ri.begin();
        ri.frame_begin(1);
        ri.end();
        assert_eq!(log.borrow().as_slice(), &[ErrorCode::IllState]);
        assert_eq!(ri.get_context(), id);
        ri.frame_end();
        ri.end();
        assert_eq!(ri.get_context(), ContextId::NONE);
    }

    #[test]
    fn options_are_rejected_inside_the_world() {
        let (mut ri, log) = renderer_with_log();
        ri.begin();
        ri.format(640, 480, 1.0);
        ri.world_begin();
        ri.format(320, 240, 1.0);
        assert_eq!(log.borrow().as_slice(), &[ErrorCode::Nesting]);
        ri.world_end();
        ri.end();
        assert_eq!(log.borrow().len(), 1);
    }
}
