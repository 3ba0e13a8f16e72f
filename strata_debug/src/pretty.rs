// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable call stream output.
//!
//! [`PrettyBackend`] implements [`Backend`] and writes one line per
//! dispatched call to a [`Write`](std::io::Write) destination (default:
//! stderr). Lines are indented by block nesting depth, so a call stream
//! reads like an indented scene file. Parameter lists are summarized as
//! `"name"[len]` pairs rather than dumped in full.

use std::fmt::Write as _;
use std::io::Write;

use strata_core::backend::Backend;
use strata_core::error::ErrorMode;
use strata_core::light::{LightId, LightRecord};
use strata_core::param::ParamList;
use strata_core::session::{ContextId, ObjectId, SolidOp};
use strata_core::state::{Basis, Orientation, ShadingInterpolation, TrimCurve};
use strata_core::transform::Mat4;

/// Writes one indented line per dispatched call.
pub struct PrettyBackend<W: Write = Box<dyn Write>> {
    writer: W,
    depth: usize,
}

impl<W: Write> std::fmt::Debug for PrettyBackend<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyBackend")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl PrettyBackend {
    /// Creates a backend that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            depth: 0,
        }
    }

    /// Creates a backend that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, depth: 0 }
    }
}

impl<W: Write> PrettyBackend<W> {
    /// Creates a backend that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, depth: 0 }
    }

    /// Consumes the backend and returns the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, text: &str) {
        let indent = self.depth * 2;
        let _ = writeln!(self.writer, "{:indent$}{text}", "");
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}

fn params(list: &ParamList) -> String {
    let mut out = String::new();
    for p in list {
        let _ = write!(out, " \"{}\"[{}]", p.name, p.value.len());
    }
    out
}

fn floats(values: &[f64]) -> String {
    let mut out = String::from("[");
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{v}");
    }
    out.push(']');
    out
}

fn matrix(m: Mat4) -> String {
    let mut out = String::from("[");
    for (j, col) in m.cols.iter().enumerate() {
        for (i, v) in col.iter().enumerate() {
            if i > 0 || j > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{v}");
        }
    }
    out.push(']');
    out
}

impl<W: Write> Backend for PrettyBackend<W> {
    fn begin(&mut self, id: ContextId) -> ContextId {
        self.line(&format!("Begin {id:?}"));
        id
    }
    fn end(&mut self) {
        self.line("End");
    }
    fn declare(&mut self, name: &str, declaration: &str) {
        self.line(&format!("Declare \"{name}\" \"{declaration}\""));
    }
    fn error_handler(&mut self, mode: ErrorMode) {
        self.line(&format!("ErrorHandler {mode:?}"));
    }
    fn synchronize(&mut self, token: &str) {
        self.line(&format!("Synchronize \"{token}\""));
    }
    fn archive_record(&mut self, kind: &str, text: &str) {
        self.line(&format!("ArchiveRecord \"{kind}\" \"{text}\""));
    }
    fn read_archive(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("ReadArchive \"{name}\"{}", params(list)));
    }

    fn frame_begin(&mut self, frame: i32) {
        self.open(&format!("FrameBegin {frame}"));
    }
    fn frame_end(&mut self) {
        self.close("FrameEnd");
    }
    fn world_begin(&mut self) {
        self.open("WorldBegin");
    }
    fn world_end(&mut self) {
        self.close("WorldEnd");
    }
    fn attribute_begin(&mut self) {
        self.open("AttributeBegin");
    }
    fn attribute_end(&mut self) {
        self.close("AttributeEnd");
    }
    fn transform_begin(&mut self) {
        self.open("TransformBegin");
    }
    fn transform_end(&mut self) {
        self.close("TransformEnd");
    }
    fn solid_begin(&mut self, op: SolidOp) {
        self.open(&format!("SolidBegin {op:?}"));
    }
    fn solid_end(&mut self) {
        self.close("SolidEnd");
    }
    fn object_begin(&mut self, id: ObjectId) -> ObjectId {
        self.open(&format!("ObjectBegin {id:?}"));
        id
    }
    fn object_end(&mut self) {
        self.close("ObjectEnd");
    }
    fn object_instance(&mut self, handle: ObjectId) {
        self.line(&format!("ObjectInstance {handle:?}"));
    }
    fn motion_begin(&mut self, times: &[f64]) {
        self.open(&format!("MotionBegin {}", floats(times)));
    }
    fn motion_end(&mut self) {
        self.close("MotionEnd");
    }

    fn format(&mut self, xres: i32, yres: i32, pixel_aspect: f64) {
        self.line(&format!("Format {xres} {yres} {pixel_aspect}"));
    }
    fn frame_aspect_ratio(&mut self, ratio: f64) {
        self.line(&format!("FrameAspectRatio {ratio}"));
    }
    fn screen_window(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.line(&format!("ScreenWindow {left} {right} {bottom} {top}"));
    }
    fn crop_window(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
        self.line(&format!("CropWindow {xmin} {xmax} {ymin} {ymax}"));
    }
    fn projection(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Projection \"{name}\"{}", params(list)));
    }
    fn clipping(&mut self, near: f64, far: f64) {
        self.line(&format!("Clipping {near} {far}"));
    }
    fn depth_of_field(&mut self, fstop: f64, focal_length: f64, focal_distance: f64) {
        self.line(&format!("DepthOfField {fstop} {focal_length} {focal_distance}"));
    }
    fn shutter(&mut self, open: f64, close: f64) {
        self.line(&format!("Shutter {open} {close}"));
    }
    fn pixel_variance(&mut self, variance: f64) {
        self.line(&format!("PixelVariance {variance}"));
    }
    fn pixel_samples(&mut self, x: f64, y: f64) {
        self.line(&format!("PixelSamples {x} {y}"));
    }
    fn pixel_filter(&mut self, name: &str, xwidth: f64, ywidth: f64) {
        self.line(&format!("PixelFilter \"{name}\" {xwidth} {ywidth}"));
    }
    fn exposure(&mut self, gain: f64, gamma: f64) {
        self.line(&format!("Exposure {gain} {gamma}"));
    }
    fn imager(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Imager \"{name}\"{}", params(list)));
    }
    fn quantize(&mut self, kind: &str, one: i32, min: i32, max: i32, dither: f64) {
        self.line(&format!("Quantize \"{kind}\" {one} {min} {max} {dither}"));
    }
    fn display(&mut self, name: &str, kind: &str, mode: &str, list: &ParamList) {
        self.line(&format!("Display \"{name}\" \"{kind}\" \"{mode}\"{}", params(list)));
    }
    fn hider(&mut self, kind: &str, list: &ParamList) {
        self.line(&format!("Hider \"{kind}\"{}", params(list)));
    }
    fn color_samples(&mut self, from: &[f64], to: &[f64]) {
        self.line(&format!("ColorSamples {} {}", floats(from), floats(to)));
    }
    fn relative_detail(&mut self, scale: f64) {
        self.line(&format!("RelativeDetail {scale}"));
    }
    fn option(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Option \"{name}\"{}", params(list)));
    }

    fn color(&mut self, samples: &[f64]) {
        self.line(&format!("Color {}", floats(samples)));
    }
    fn opacity(&mut self, samples: &[f64]) {
        self.line(&format!("Opacity {}", floats(samples)));
    }
    fn texture_coordinates(&mut self, corners: &[f64; 8]) {
        self.line(&format!("TextureCoordinates {}", floats(corners)));
    }
    fn light_source(&mut self, id: LightId, light: &LightRecord) -> LightId {
        let call = if light.area {
            "AreaLightSource"
        } else {
            "LightSource"
        };
        self.line(&format!("{call} \"{}\" {id:?}{}", light.name, params(&light.params)));
        id
    }
    fn illuminate(&mut self, light: LightId, on: bool) {
        self.line(&format!("Illuminate {light:?} {}", i32::from(on)));
    }
    fn surface(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Surface \"{name}\"{}", params(list)));
    }
    fn atmosphere(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Atmosphere \"{name}\"{}", params(list)));
    }
    fn interior(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Interior \"{name}\"{}", params(list)));
    }
    fn exterior(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Exterior \"{name}\"{}", params(list)));
    }
    fn displacement(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Displacement \"{name}\"{}", params(list)));
    }
    fn deformation(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Deformation \"{name}\"{}", params(list)));
    }
    fn shading_rate(&mut self, area: f64) {
        self.line(&format!("ShadingRate {area}"));
    }
    fn shading_interpolation(&mut self, mode: ShadingInterpolation) {
        self.line(&format!("ShadingInterpolation {mode:?}"));
    }
    fn matte(&mut self, onoff: bool) {
        self.line(&format!("Matte {}", i32::from(onoff)));
    }
    fn bound(&mut self, bounds: &[f64; 6]) {
        self.line(&format!("Bound {}", floats(bounds)));
    }
    fn detail(&mut self, bounds: &[f64; 6]) {
        self.line(&format!("Detail {}", floats(bounds)));
    }
    fn detail_range(&mut self, range: &[f64; 4]) {
        self.line(&format!("DetailRange {}", floats(range)));
    }
    fn geometric_approximation(&mut self, kind: &str, value: f64) {
        self.line(&format!("GeometricApproximation \"{kind}\" {value}"));
    }
    fn orientation(&mut self, orientation: Orientation) {
        self.line(&format!("Orientation {orientation:?}"));
    }
    fn reverse_orientation(&mut self) {
        self.line("ReverseOrientation");
    }
    fn orientation_flipped(&mut self, reversed: bool) {
        self.line(&format!("# orientation flipped: {reversed}"));
    }
    fn sides(&mut self, n: i32) {
        self.line(&format!("Sides {n}"));
    }
    fn basis(&mut self, basis: &Basis) {
        self.line(&format!(
            "Basis {} {} {} {}",
            matrix(basis.u),
            basis.ustep,
            matrix(basis.v),
            basis.vstep,
        ));
    }
    fn trim_curve(&mut self, trim: &TrimCurve) {
        self.line(&format!(
            "TrimCurve loops={} knots={}",
            trim.ncurves.len(),
            trim.knot.len(),
        ));
    }
    fn attribute(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Attribute \"{name}\"{}", params(list)));
    }

    fn identity(&mut self) {
        self.line("Identity");
    }
    fn transform(&mut self, m: Mat4) {
        self.line(&format!("Transform {}", matrix(m)));
    }
    fn concat_transform(&mut self, m: Mat4) {
        self.line(&format!("ConcatTransform {}", matrix(m)));
    }
    fn perspective(&mut self, fov: f64) {
        self.line(&format!("Perspective {fov}"));
    }
    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.line(&format!("Translate {dx} {dy} {dz}"));
    }
    fn rotate(&mut self, angle: f64, ax: f64, ay: f64, az: f64) {
        self.line(&format!("Rotate {angle} {ax} {ay} {az}"));
    }
    fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.line(&format!("Scale {sx} {sy} {sz}"));
    }
    fn skew(&mut self, angle: f64, d1: &[f64; 3], d2: &[f64; 3]) {
        self.line(&format!("Skew {angle} {} {}", floats(d1), floats(d2)));
    }
    fn coordinate_system(&mut self, name: &str) {
        self.line(&format!("CoordinateSystem \"{name}\""));
    }
    fn coord_sys_transform(&mut self, name: &str, _ctm: Mat4) {
        self.line(&format!("CoordSysTransform \"{name}\""));
    }

    fn sphere(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.line(&format!("Sphere {radius} {zmin} {zmax} {thetamax}{}", params(list)));
    }
    fn cone(&mut self, height: f64, radius: f64, thetamax: f64, list: &ParamList) {
        self.line(&format!("Cone {height} {radius} {thetamax}{}", params(list)));
    }
    fn cylinder(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.line(&format!("Cylinder {radius} {zmin} {zmax} {thetamax}{}", params(list)));
    }
    fn hyperboloid(
        &mut self,
        point1: &[f64; 3],
        point2: &[f64; 3],
        thetamax: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "Hyperboloid {} {} {thetamax}{}",
            floats(point1),
            floats(point2),
            params(list),
        ));
    }
    fn paraboloid(&mut self, rmax: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.line(&format!("Paraboloid {rmax} {zmin} {zmax} {thetamax}{}", params(list)));
    }
    fn disk(&mut self, height: f64, radius: f64, thetamax: f64, list: &ParamList) {
        self.line(&format!("Disk {height} {radius} {thetamax}{}", params(list)));
    }
    fn torus(
        &mut self,
        major: f64,
        minor: f64,
        phimin: f64,
        phimax: f64,
        thetamax: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "Torus {major} {minor} {phimin} {phimax} {thetamax}{}",
            params(list),
        ));
    }
    fn polygon(&mut self, list: &ParamList) {
        self.line(&format!("Polygon{}", params(list)));
    }
    fn general_polygon(&mut self, nverts: &[i32], list: &ParamList) {
        self.line(&format!("GeneralPolygon loops={}{}", nverts.len(), params(list)));
    }
    fn points_polygons(&mut self, nverts: &[i32], _verts: &[i32], list: &ParamList) {
        self.line(&format!("PointsPolygons faces={}{}", nverts.len(), params(list)));
    }
    fn points_general_polygons(
        &mut self,
        nloops: &[i32],
        _nverts: &[i32],
        _verts: &[i32],
        list: &ParamList,
    ) {
        self.line(&format!(
            "PointsGeneralPolygons faces={}{}",
            nloops.len(),
            params(list),
        ));
    }
    fn patch(&mut self, kind: &str, list: &ParamList) {
        self.line(&format!("Patch \"{kind}\"{}", params(list)));
    }
    fn patch_mesh(
        &mut self,
        kind: &str,
        nu: i32,
        uwrap: &str,
        nv: i32,
        vwrap: &str,
        list: &ParamList,
    ) {
        self.line(&format!(
            "PatchMesh \"{kind}\" {nu} \"{uwrap}\" {nv} \"{vwrap}\"{}",
            params(list),
        ));
    }
    fn nu_patch(
        &mut self,
        nu: i32,
        uorder: i32,
        _uknot: &[f64],
        umin: f64,
        umax: f64,
        nv: i32,
        vorder: i32,
        _vknot: &[f64],
        vmin: f64,
        vmax: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "NuPatch {nu} {uorder} {umin} {umax} {nv} {vorder} {vmin} {vmax}{}",
            params(list),
        ));
    }
    fn geometry(&mut self, name: &str, list: &ParamList) {
        self.line(&format!("Geometry \"{name}\"{}", params(list)));
    }

    fn make_texture(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "MakeTexture \"{picture}\" \"{texture}\" \"{swrap}\" \"{twrap}\" \
             \"{filter}\" {swidth} {twidth}{}",
            params(list),
        ));
    }
    fn make_bump(
        &mut self,
        picture: &str,
        texture: &str,
        swrap: &str,
        twrap: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "MakeBump \"{picture}\" \"{texture}\" \"{swrap}\" \"{twrap}\" \
             \"{filter}\" {swidth} {twidth}{}",
            params(list),
        ));
    }
    fn make_lat_long_environment(
        &mut self,
        picture: &str,
        texture: &str,
        filter: &str,
        swidth: f64,
        twidth: f64,
        list: &ParamList,
    ) {
        self.line(&format!(
            "MakeLatLongEnvironment \"{picture}\" \"{texture}\" \"{filter}\" \
             {swidth} {twidth}{}",
            params(list),
        ));
    }
    fn make_cube_face_environment(
        &mut self,
        faces: &[String; 6],
        texture: &str,
        fov: f64,
        filter: &str,
        swidth: f64,
        twidth: f64,
        list: &ParamList,
    ) {
        let mut names = String::new();
        for face in faces {
            let _ = write!(names, "\"{face}\" ");
        }
        self.line(&format!(
            "MakeCubeFaceEnvironment {names}\"{texture}\" {fov} \"{filter}\" \
             {swidth} {twidth}{}",
            params(list),
        ));
    }
    fn make_shadow(&mut self, picture: &str, texture: &str, list: &ParamList) {
        self.line(&format!("MakeShadow \"{picture}\" \"{texture}\"{}", params(list)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_contents_are_indented() {
        let mut sink = PrettyBackend::with_writer(Vec::<u8>::new());
        sink.world_begin();
        sink.sphere(1.0, -1.0, 1.0, 360.0, &ParamList::new());
        sink.world_end();
        let out = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(out, "WorldBegin\n  Sphere 1 -1 1 360\nWorldEnd\n");
    }

    #[test]
    fn params_are_summarized_not_dumped() {
        let mut sink = PrettyBackend::with_writer(Vec::<u8>::new());
        let list = vec![strata_core::param::Param::floats("P", &[0.0; 12])];
        sink.polygon(&list);
        let out = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(out, "Polygon \"P\"[12]\n");
    }
}
