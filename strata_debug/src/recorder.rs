// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured call recording.
//!
//! [`RecorderBackend`] implements [`Backend`] and appends one
//! [`DispatchRecord`] per dispatched call. Records carry the call name and
//! stringified arguments, so tests can assert on dispatch order and content
//! without depending on output formatting. Parameter lists are summarized
//! as `name[len]` entries.

use strata_core::backend::Backend;
use strata_core::error::ErrorMode;
use strata_core::light::{LightId, LightRecord};
use strata_core::param::ParamList;
use strata_core::session::{ContextId, ObjectId, SolidOp};
use strata_core::state::{Basis, Orientation, ShadingInterpolation, TrimCurve};
use strata_core::transform::Mat4;

/// One dispatched call, as seen by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchRecord {
    /// Stable snake_case call name.
    pub name: &'static str,
    /// Stringified arguments, in call order.
    pub args: Vec<String>,
}

/// A [`Backend`] that appends a [`DispatchRecord`] per call.
#[derive(Debug, Default)]
pub struct RecorderBackend {
    records: Vec<DispatchRecord>,
}

impl RecorderBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn records(&self) -> &[DispatchRecord] {
        &self.records
    }

    /// Consumes the recorder and returns the recorded calls.
    #[must_use]
    pub fn into_records(self) -> Vec<DispatchRecord> {
        self.records
    }

    /// Returns the recorded call names, in dispatch order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.name).collect()
    }

    fn push(&mut self, name: &'static str, args: Vec<String>) {
        self.records.push(DispatchRecord { name, args });
    }
}

// -- argument formatting helpers --

fn floats(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    parts.join(" ")
}

fn ints(values: &[i32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    parts.join(" ")
}

fn matrix(m: Mat4) -> String {
    let mut flat = Vec::with_capacity(16);
    for col in &m.cols {
        flat.extend_from_slice(col);
    }
    floats(&flat)
}

fn params(list: &ParamList) -> Vec<String> {
    list.iter()
        .map(|p| format!("{}[{}]", p.name, p.value.len()))
        .collect()
}

fn with_params(mut args: Vec<String>, list: &ParamList) -> Vec<String> {
    args.extend(params(list));
    args
}

impl Backend for RecorderBackend {
    fn begin(&mut self, id: ContextId) -> ContextId {
        self.push("begin", vec![format!("{id:?}")]);
        id
    }
    fn end(&mut self) {
        self.push("end", vec![]);
    }
    fn declare(&mut self, name: &str, declaration: &str) {
        self.push("declare", vec![name.into(), declaration.into()]);
    }
    fn error_handler(&mut self, mode: ErrorMode) {
        self.push("error_handler", vec![format!("{mode:?}")]);
    }
    fn synchronize(&mut self, token: &str) {
        self.push("synchronize", vec![token.into()]);
    }
    fn archive_record(&mut self, kind: &str, text: &str) {
        self.push("archive_record", vec![kind.into(), text.into()]);
    }
    fn read_archive(&mut self, name: &str, list: &ParamList) {
        self.push("read_archive", with_params(vec![name.into()], list));
    }

    fn frame_begin(&mut self, frame: i32) {
        self.push("frame_begin", vec![frame.to_string()]);
    }
    fn frame_end(&mut self) {
        self.push("frame_end", vec![]);
    }
    fn world_begin(&mut self) {
        self.push("world_begin", vec![]);
    }
    fn world_end(&mut self) {
        self.push("world_end", vec![]);
    }
    fn attribute_begin(&mut self) {
        self.push("attribute_begin", vec![]);
    }
    fn attribute_end(&mut self) {
        self.push("attribute_end", vec![]);
    }
    fn transform_begin(&mut self) {
        self.push("transform_begin", vec![]);
    }
    fn transform_end(&mut self) {
        self.push("transform_end", vec![]);
    }
    fn solid_begin(&mut self, op: SolidOp) {
        self.push("solid_begin", vec![format!("{op:?}")]);
    }
    fn solid_end(&mut self) {
        self.push("solid_end", vec![]);
    }
    fn object_begin(&mut self, id: ObjectId) -> ObjectId {
        self.push("object_begin", vec![format!("{id:?}")]);
        id
    }
    fn object_end(&mut self) {
        self.push("object_end", vec![]);
    }
    fn object_instance(&mut self, handle: ObjectId) {
        self.push("object_instance", vec![format!("{handle:?}")]);
    }
    fn motion_begin(&mut self, times: &[f64]) {
        self.push("motion_begin", vec![floats(times)]);
    }
    fn motion_end(&mut self) {
        self.push("motion_end", vec![]);
    }

    fn format(&mut self, xres: i32, yres: i32, pixel_aspect: f64) {
        self.push(
            "format",
            vec![xres.to_string(), yres.to_string(), pixel_aspect.to_string()],
        );
    }
    fn frame_aspect_ratio(&mut self, ratio: f64) {
        self.push("frame_aspect_ratio", vec![ratio.to_string()]);
    }
    fn screen_window(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.push(
            "screen_window",
            vec![
                left.to_string(),
                right.to_string(),
                bottom.to_string(),
                top.to_string(),
            ],
        );
    }
    fn crop_window(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
        self.push(
            "crop_window",
            vec![
                xmin.to_string(),
                xmax.to_string(),
                ymin.to_string(),
                ymax.to_string(),
            ],
        );
    }
    fn projection(&mut self, name: &str, list: &ParamList) {
        self.push("projection", with_params(vec![name.into()], list));
    }
    fn clipping(&mut self, near: f64, far: f64) {
        self.push("clipping", vec![near.to_string(), far.to_string()]);
    }
    fn depth_of_field(&mut self, fstop: f64, focal_length: f64, focal_distance: f64) {
        self.push(
            "depth_of_field",
            vec![
                fstop.to_string(),
                focal_length.to_string(),
                focal_distance.to_string(),
            ],
        );
    }
    fn shutter(&mut self, open: f64, close: f64) {
        self.push("shutter", vec![open.to_string(), close.to_string()]);
    }
    fn pixel_variance(&mut self, variance: f64) {
        self.push("pixel_variance", vec![variance.to_string()]);
    }
    fn pixel_samples(&mut self, x: f64, y: f64) {
        self.push("pixel_samples", vec![x.to_string(), y.to_string()]);
    }
    fn pixel_filter(&mut self, name: &str, xwidth: f64, ywidth: f64) {
        self.push(
            "pixel_filter",
            vec![name.into(), xwidth.to_string(), ywidth.to_string()],
        );
    }
    fn exposure(&mut self, gain: f64, gamma: f64) {
        self.push("exposure", vec![gain.to_string(), gamma.to_string()]);
    }
    fn imager(&mut self, name: &str, list: &ParamList) {
        self.push("imager", with_params(vec![name.into()], list));
    }
    fn quantize(&mut self, kind: &str, one: i32, min: i32, max: i32, dither: f64) {
        self.push(
            "quantize",
            vec![
                kind.into(),
                one.to_string(),
                min.to_string(),
                max.to_string(),
                dither.to_string(),
            ],
        );
    }
    fn display(&mut self, name: &str, kind: &str, mode: &str, list: &ParamList) {
        self.push(
            "display",
            with_params(vec![name.into(), kind.into(), mode.into()], list),
        );
    }
    fn hider(&mut self, kind: &str, list: &ParamList) {
        self.push("hider", with_params(vec![kind.into()], list));
    }
    fn color_samples(&mut self, from: &[f64], to: &[f64]) {
        self.push("color_samples", vec![floats(from), floats(to)]);
    }
    fn relative_detail(&mut self, scale: f64) {
        self.push("relative_detail", vec![scale.to_string()]);
    }
    fn option(&mut self, name: &str, list: &ParamList) {
        self.push("option", with_params(vec![name.into()], list));
    }

    fn color(&mut self, samples: &[f64]) {
        self.push("color", vec![floats(samples)]);
    }
    fn opacity(&mut self, samples: &[f64]) {
        self.push("opacity", vec![floats(samples)]);
    }
    fn texture_coordinates(&mut self, corners: &[f64; 8]) {
        self.push("texture_coordinates", vec![floats(corners)]);
    }
    fn light_source(&mut self, id: LightId, light: &LightRecord) -> LightId {
        let name = if light.area {
            "area_light_source"
        } else {
            "light_source"
        };
        self.push(
            name,
            with_params(vec![light.name.clone(), format!("{id:?}")], &light.params),
        );
        id
    }
    fn illuminate(&mut self, light: LightId, on: bool) {
        self.push("illuminate", vec![format!("{light:?}"), on.to_string()]);
    }
    fn surface(&mut self, name: &str, list: &ParamList) {
        self.push("surface", with_params(vec![name.into()], list));
    }
    fn atmosphere(&mut self, name: &str, list: &ParamList) {
        self.push("atmosphere", with_params(vec![name.into()], list));
    }
    fn interior(&mut self, name: &str, list: &ParamList) {
        self.push("interior", with_params(vec![name.into()], list));
    }
    fn exterior(&mut self, name: &str, list: &ParamList) {
        self.push("exterior", with_params(vec![name.into()], list));
    }
    fn displacement(&mut self, name: &str, list: &ParamList) {
        self.push("displacement", with_params(vec![name.into()], list));
    }
    fn deformation(&mut self, name: &str, list: &ParamList) {
        self.push("deformation", with_params(vec![name.into()], list));
    }
    fn shading_rate(&mut self, area: f64) {
        self.push("shading_rate", vec![area.to_string()]);
    }
    fn shading_interpolation(&mut self, mode: ShadingInterpolation) {
        self.push("shading_interpolation", vec![format!("{mode:?}")]);
    }
    fn matte(&mut self, onoff: bool) {
        self.push("matte", vec![onoff.to_string()]);
    }
    fn bound(&mut self, bounds: &[f64; 6]) {
        self.push("bound", vec![floats(bounds)]);
    }
    fn detail(&mut self, bounds: &[f64; 6]) {
        self.push("detail", vec![floats(bounds)]);
    }
    fn detail_range(&mut self, range: &[f64; 4]) {
        self.push("detail_range", vec![floats(range)]);
    }
    fn geometric_approximation(&mut self, kind: &str, value: f64) {
        self.push(
            "geometric_approximation",
            vec![kind.into(), value.to_string()],
        );
    }
    fn orientation(&mut self, orientation: Orientation) {
        self.push("orientation", vec![format!("{orientation:?}")]);
    }
    fn reverse_orientation(&mut self) {
        self.push("reverse_orientation", vec![]);
    }
    fn orientation_flipped(&mut self, reversed: bool) {
        self.push("orientation_flipped", vec![reversed.to_string()]);
    }
    fn sides(&mut self, n: i32) {
        self.push("sides", vec![n.to_string()]);
    }
    fn basis(&mut self, basis: &Basis) {
        self.push(
            "basis",
            vec![
                matrix(basis.u),
                basis.ustep.to_string(),
                matrix(basis.v),
                basis.vstep.to_string(),
            ],
        );
    }
    fn trim_curve(&mut self, trim: &TrimCurve) {
        self.push(
            "trim_curve",
            vec![ints(&trim.ncurves), ints(&trim.order), floats(&trim.knot)],
        );
    }
    fn attribute(&mut self, name: &str, list: &ParamList) {
        self.push("attribute", with_params(vec![name.into()], list));
    }

    fn identity(&mut self) {
        self.push("identity", vec![]);
    }
    fn transform(&mut self, m: Mat4) {
        self.push("transform", vec![matrix(m)]);
    }
    fn concat_transform(&mut self, m: Mat4) {
        self.push("concat_transform", vec![matrix(m)]);
    }
    fn perspective(&mut self, fov: f64) {
        self.push("perspective", vec![fov.to_string()]);
    }
    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.push(
            "translate",
            vec![dx.to_string(), dy.to_string(), dz.to_string()],
        );
    }
    fn rotate(&mut self, angle: f64, ax: f64, ay: f64, az: f64) {
        self.push(
            "rotate",
            vec![
                angle.to_string(),
                ax.to_string(),
                ay.to_string(),
                az.to_string(),
            ],
        );
    }
    fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.push(
            "scale",
            vec![sx.to_string(), sy.to_string(), sz.to_string()],
        );
    }
    fn skew(&mut self, angle: f64, d1: &[f64; 3], d2: &[f64; 3]) {
        self.push("skew", vec![angle.to_string(), floats(d1), floats(d2)]);
    }
    fn coordinate_system(&mut self, name: &str) {
        self.push("coordinate_system", vec![name.into()]);
    }
    fn coord_sys_transform(&mut self, name: &str, ctm: Mat4) {
        self.push("coord_sys_transform", vec![name.into(), matrix(ctm)]);
    }

    fn sphere(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.push(
            "sphere",
            with_params(
                vec![
                    radius.to_string(),
                    zmin.to_string(),
                    zmax.to_string(),
                    thetamax.to_string(),
                ],
                list,
            ),
        );
    }
    fn cone(&mut self, height: f64, radius: f64, thetamax: f64, list: &ParamList) {
        self.push(
            "cone",
            with_params(
                vec![height.to_string(), radius.to_string(), thetamax.to_string()],
                list,
            ),
        );
    }
    fn cylinder(&mut self, radius: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.push(
            "cylinder",
            with_params(
                vec![
                    radius.to_string(),
                    zmin.to_string(),
                    zmax.to_string(),
                    thetamax.to_string(),
                ],
                list,
            ),
        );
    }
    fn hyperboloid(
        &mut self,
        point1: &[f64; 3],
        point2: &[f64; 3],
        thetamax: f64,
        list: &ParamList,
    ) {
        self.push(
            "hyperboloid",
            with_params(
                vec![floats(point1), floats(point2), thetamax.to_string()],
                list,
            ),
        );
    }
    fn paraboloid(&mut self, rmax: f64, zmin: f64, zmax: f64, thetamax: f64, list: &ParamList) {
        self.push(
            "paraboloid",
            with_params(
                vec![
                    rmax.to_string(),
                    zmin.to_string(),
                    zmax.to_string(),
                    thetamax.to_string(),
                ],
                list,
            ),
        );
    }
    fn disk(&mut self, height: f64, radius: f64, thetamax: f64, list: &ParamList) {
        self.push(
            "disk",
            with_params(
                vec![height.to_string(), radius.to_string(), thetamax.to_string()],
                list,
            ),
        );
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
        self.push(
            "torus",
            with_params(
                vec![
                    major.to_string(),
                    minor.to_string(),
                    phimin.to_string(),
                    phimax.to_string(),
                    thetamax.to_string(),
                ],
                list,
            ),
        );
    }
    fn polygon(&mut self, list: &ParamList) {
        self.push("polygon", params(list));
    }
    fn general_polygon(&mut self, nverts: &[i32], list: &ParamList) {
        self.push("general_polygon", with_params(vec![ints(nverts)], list));
    }
    fn points_polygons(&mut self, nverts: &[i32], verts: &[i32], list: &ParamList) {
        self.push(
            "points_polygons",
            with_params(vec![ints(nverts), ints(verts)], list),
        );
    }
    fn points_general_polygons(
        &mut self,
        nloops: &[i32],
        nverts: &[i32],
        verts: &[i32],
        list: &ParamList,
    ) {
        self.push(
            "points_general_polygons",
            with_params(vec![ints(nloops), ints(nverts), ints(verts)], list),
        );
    }
    fn patch(&mut self, kind: &str, list: &ParamList) {
        self.push("patch", with_params(vec![kind.into()], list));
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
        self.push(
            "patch_mesh",
            with_params(
                vec![
                    kind.into(),
                    nu.to_string(),
                    uwrap.into(),
                    nv.to_string(),
                    vwrap.into(),
                ],
                list,
            ),
        );
    }
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
        list: &ParamList,
    ) {
        self.push(
            "nu_patch",
            with_params(
                vec![
                    nu.to_string(),
                    uorder.to_string(),
                    floats(uknot),
                    umin.to_string(),
                    umax.to_string(),
                    nv.to_string(),
                    vorder.to_string(),
                    floats(vknot),
                    vmin.to_string(),
                    vmax.to_string(),
                ],
                list,
            ),
        );
    }
    fn geometry(&mut self, name: &str, list: &ParamList) {
        self.push("geometry", with_params(vec![name.into()], list));
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
        self.push(
            "make_texture",
            with_params(
                vec![
                    picture.into(),
                    texture.into(),
                    swrap.into(),
                    twrap.into(),
                    filter.into(),
                    swidth.to_string(),
                    twidth.to_string(),
                ],
                list,
            ),
        );
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
        self.push(
            "make_bump",
            with_params(
                vec![
                    picture.into(),
                    texture.into(),
                    swrap.into(),
                    twrap.into(),
                    filter.into(),
                    swidth.to_string(),
                    twidth.to_string(),
                ],
                list,
            ),
        );
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
        self.push(
            "make_lat_long_environment",
            with_params(
                vec![
                    picture.into(),
                    texture.into(),
                    filter.into(),
                    swidth.to_string(),
                    twidth.to_string(),
                ],
                list,
            ),
        );
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
        let mut args: Vec<String> = faces.to_vec();
        args.push(texture.into());
        args.push(fov.to_string());
        args.push(filter.into());
        args.push(swidth.to_string());
        args.push(twidth.to_string());
        self.push("make_cube_face_environment", with_params(args, list));
    }
    fn make_shadow(&mut self, picture: &str, texture: &str, list: &ParamList) {
        self.push(
            "make_shadow",
            with_params(vec![picture.into(), texture.into()], list),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::param::Param;

    #[test]
    fn records_preserve_dispatch_order() {
        let mut rec = RecorderBackend::new();
        rec.world_begin();
        rec.translate(1.0, 2.0, 3.0);
        rec.sphere(1.0, -1.0, 1.0, 360.0, &ParamList::new());
        rec.world_end();
        assert_eq!(
            rec.names(),
            vec!["world_begin", "translate", "sphere", "world_end"],
        );
        assert_eq!(rec.records()[1].args, vec!["1", "2", "3"]);
    }

    #[test]
    fn params_are_summarized() {
        let mut rec = RecorderBackend::new();
        let list = vec![Param::floats("P", &[0.0; 12]), Param::ints("st", &[0, 1])];
        rec.polygon(&list);
        assert_eq!(rec.records()[0].args, vec!["P[12]", "st[2]"]);
    }

    #[test]
    fn area_lights_record_under_their_own_name() {
        let mut rec = RecorderBackend::new();
        let record = LightRecord {
            name: String::from("arealight"),
            params: ParamList::new(),
            area: true,
            ctm: Mat4::IDENTITY,
            before_world: false,
            external: LightId(1),
        };
        let handle = rec.light_source(LightId(1), &record);
        assert_eq!(handle, LightId(1));
        assert_eq!(rec.records()[0].name, "area_light_source");
    }
}
