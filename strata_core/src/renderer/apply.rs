// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage three and four of the pipeline: state mutation and dispatch.
//!
//! Calls arrive here already captured and validated for nesting. Argument
//! errors (`Range`, `Consistency`, `BadHandle`) are detected here; an
//! offending call mutates nothing and dispatches nothing. The session is
//! always updated before the backend hears about a call, so a backend
//! reading through [`GeomQuery`] sees post-call state.
//!
//! [`GeomQuery`]: crate::backend::GeomQuery

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use super::{FollowUp, Outcome, Sink};
use crate::backend::Backend;
use crate::call::Call;
use crate::error::{ErrorCode, ErrorMode, Severity};
use crate::light::{LightId, LightRecord};
use crate::param::{self, ParamList, ParamValue};
use crate::session::{ObjectId, Session, SolidOp};
use crate::state::{
    Basis, Display, Orientation, Projection, Quantization, ShaderBinding, ShadingInterpolation,
    TrimCurve,
};
use crate::tape::Tape;
use crate::transform::Mat4;
use crate::validity::BlockState;

pub(super) fn apply(
    session: &mut Session,
    backend: &mut dyn Backend,
    sink: &mut Sink<'_>,
    call: Call,
) -> (Outcome, FollowUp) {
    let mut follow = FollowUp::None;
    let outcome = match call {
        // -- Session control --
        Call::Declare { name, declaration } => match session.declarations.declare(&name, &declaration) {
            Ok(decl) => {
                backend.declare(&name, &declaration);
                Outcome::Declaration(decl)
            }
            Err(err) => {
                sink.report(
                    ErrorCode::Syntax,
                    Severity::Error,
                    &format!("declare \"{name}\": {err}"),
                );
                Outcome::None
            }
        },
        Call::ErrorHandler { token } => match ErrorMode::from_token(&token) {
            Some(mode) => {
                backend.error_handler(mode);
                follow = FollowUp::ErrorMode(mode);
                Outcome::None
            }
            None => {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("error_handler: unknown policy \"{token}\""),
                );
                Outcome::None
            }
        },
        Call::Synchronize { token } => {
            if token == "reset" || token == "abort" {
                backend.synchronize(&token);
                follow = FollowUp::Reset;
            } else {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("synchronize: unknown token \"{token}\""),
                );
            }
            Outcome::None
        }
        Call::ArchiveRecord { kind, text } => {
            if matches!(kind.as_str(), "comment" | "structure" | "verbatim") {
                backend.archive_record(&kind, &text);
            } else {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("archive_record: unknown kind \"{kind}\""),
                );
            }
            Outcome::None
        }
        Call::ReadArchive { name, params } => {
            backend.read_archive(&name, &params);
            follow = FollowUp::ReadArchive { name, params };
            Outcome::None
        }

        // -- Blocks --
        Call::FrameBegin { frame } => {
            session.options.push(session.opts().clone());
            session.attributes.push(session.attrs().clone());
            session.ctm.push();
            session.blocks.push(BlockState::Frame);
            backend.frame_begin(frame);
            Outcome::None
        }
        Call::FrameEnd => {
            session.blocks.pop();
            pop_attributes(session, backend);
            session.options.truncate(session.options.len().max(2) - 1);
            session.ctm.pop();
            backend.frame_end();
            Outcome::None
        }
        Call::WorldBegin => {
            if session.opts().projection.is_none() {
                session.opts_mut().projection = Some(Projection {
                    name: String::from("orthographic"),
                    params: Vec::new(),
                });
            }
            // The CTM so far is the world-to-camera mapping; the screen
            // projection part was parked at the `projection` call.
            let camera = session.opts().pre_camera * session.ctm.ctm();
            session.coords.mark("camera", camera);
            session.attributes.push(session.attrs().clone());
            session.ctm.push();
            session.ctm.set(Mat4::IDENTITY);
            sync_flip(session, backend);
            session.coords.mark("world", Mat4::IDENTITY);
            session.blocks.push(BlockState::World);
            backend.world_begin();
            Outcome::None
        }
        Call::WorldEnd => {
            session.blocks.pop();
            pop_attributes(session, backend);
            session.ctm.pop();
            backend.world_end();
            Outcome::None
        }
        Call::AttributeBegin => {
            session.attributes.push(session.attrs().clone());
            session.ctm.push();
            session.blocks.push(BlockState::Attribute);
            backend.attribute_begin();
            Outcome::None
        }
        Call::AttributeEnd => {
            session.blocks.pop();
            pop_attributes(session, backend);
            session.ctm.pop();
            backend.attribute_end();
            Outcome::None
        }
        Call::TransformBegin => {
            session.ctm.push();
            session.blocks.push(BlockState::Transform);
            backend.transform_begin();
            Outcome::None
        }
        Call::TransformEnd => {
            session.blocks.pop();
            session.ctm.pop();
            sync_flip(session, backend);
            backend.transform_end();
            Outcome::None
        }
        Call::SolidBegin { operation } => {
            let op = match SolidOp::from_token(&operation) {
                Some(op) => op,
                None => {
                    sink.report(
                        ErrorCode::Consistency,
                        Severity::Error,
                        &format!("solid_begin: unknown operation \"{operation}\""),
                    );
                    // Open the block anyway so nesting stays balanced.
                    SolidOp::Primitive
                }
            };
            session.solids.push(op);
            session.blocks.push(BlockState::Solid);
            backend.solid_begin(op);
            Outcome::None
        }
        Call::SolidEnd => {
            session.blocks.pop();
            session.solids.pop();
            backend.solid_end();
            Outcome::None
        }
        Call::ObjectBegin => {
            session.object_counter += 1;
            let id = ObjectId(session.object_counter);
            let external = backend.object_begin(id);
            session.object_stack.push(external);
            session.attributes.push(session.attrs().clone());
            session.options.push(session.opts().clone());
            session.define_object_depth += 1;
            session.writer_stack.push(session.writer.take());
            session.writer = Some(Tape::new(true));
            session.blocks.push(BlockState::Object);
            Outcome::Object(external)
        }
        Call::ObjectEnd => {
            session.blocks.pop();
            session.define_object_depth = session.define_object_depth.saturating_sub(1);
            match session.writer.take() {
                Some(mut tape) => {
                    tape.finish();
                    if let Some(id) = session.object_stack.pop() {
                        session.objects.insert(id.0, tape);
                    }
                }
                None => sink.report(
                    ErrorCode::Bug,
                    Severity::Severe,
                    "object_end: no definition tape open",
                ),
            }
            session.writer = session.writer_stack.pop().flatten();
            pop_attributes(session, backend);
            session.options.truncate(session.options.len().max(2) - 1);
            backend.object_end();
            Outcome::None
        }
        Call::ObjectInstance { handle } => {
            match session.objects.get(&handle.0) {
                Some(tape) if tape.is_valid() => {
                    // Inside a definition only the tape records; dispatch
                    // and expansion happen when the outer object is
                    // instanced.
                    if session.define_object_depth == 0 {
                        backend.object_instance(handle);
                        follow = FollowUp::Replay(tape.clone());
                    }
                }
                Some(_) => sink.report(
                    ErrorCode::NoFile,
                    Severity::Error,
                    &format!("object_instance: {handle:?} failed to record"),
                ),
                None => sink.report(
                    ErrorCode::BadHandle,
                    Severity::Error,
                    &format!("object_instance: unknown handle {handle:?}"),
                ),
            }
            Outcome::None
        }
        Call::MotionBegin { times } => {
            if times.is_empty() {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "motion_begin: no sample times",
                );
            }
            // The samples are backend data; the steady-state CTM is the
            // pre-motion one, restored at `motion_end`.
            session.ctm.push();
            session.blocks.push(BlockState::Motion);
            backend.motion_begin(&times);
            Outcome::None
        }
        Call::MotionEnd => {
            session.blocks.pop();
            session.ctm.pop();
            sync_flip(session, backend);
            backend.motion_end();
            Outcome::None
        }

        // -- Options --
        Call::Format {
            xres,
            yres,
            pixel_aspect,
        } => {
            if xres <= 0 || yres <= 0 || pixel_aspect <= 0.0 {
                sink.report(ErrorCode::Range, Severity::Error, "format: non-positive size");
            } else {
                session.opts_mut().format = Some((xres, yres, pixel_aspect));
                backend.format(xres, yres, pixel_aspect);
            }
            Outcome::None
        }
        Call::FrameAspectRatio { ratio } => {
            if ratio <= 0.0 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "frame_aspect_ratio: non-positive ratio",
                );
            } else {
                session.opts_mut().frame_aspect_ratio = Some(ratio);
                backend.frame_aspect_ratio(ratio);
            }
            Outcome::None
        }
        Call::ScreenWindow {
            left,
            right,
            bottom,
            top,
        } => {
            session.opts_mut().screen_window = Some(Rect::new(left, bottom, right, top));
            backend.screen_window(left, right, bottom, top);
            Outcome::None
        }
        Call::CropWindow {
            xmin,
            xmax,
            ymin,
            ymax,
        } => {
            let ordered = xmin < xmax && ymin < ymax;
            let unit = xmin >= 0.0 && xmax <= 1.0 && ymin >= 0.0 && ymax <= 1.0;
            if ordered && unit {
                session.opts_mut().crop_window = Rect::new(xmin, ymin, xmax, ymax);
                backend.crop_window(xmin, xmax, ymin, ymax);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "crop_window: not an ordered sub-window of the unit square",
                );
            }
            Outcome::None
        }
        Call::Projection { name, params } => {
            // The CTM accumulated so far becomes the screen projection
            // part; camera placement starts over from identity.
            let pre_camera = session.ctm.ctm();
            let opts = session.opts_mut();
            opts.pre_camera = pre_camera;
            opts.projection = Some(Projection { name, params });
            session.ctm.set(Mat4::IDENTITY);
            sync_flip(session, backend);
            if let Some(p) = &session.opts().projection {
                backend.projection(&p.name, &p.params);
            }
            Outcome::None
        }
        Call::Clipping { near, far } => {
            if near > 0.0 && far > near {
                session.opts_mut().clipping = (near, far);
                backend.clipping(near, far);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "clipping: need 0 < near < far",
                );
            }
            Outcome::None
        }
        Call::DepthOfField {
            fstop,
            focal_length,
            focal_distance,
        } => {
            session.opts_mut().depth_of_field = Some((fstop, focal_length, focal_distance));
            backend.depth_of_field(fstop, focal_length, focal_distance);
            Outcome::None
        }
        Call::Shutter { open, close } => {
            if close < open {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "shutter: closes before it opens",
                );
            } else {
                session.opts_mut().shutter = (open, close);
                backend.shutter(open, close);
            }
            Outcome::None
        }
        Call::PixelVariance { variance } => {
            if variance < 0.0 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "pixel_variance: negative variance",
                );
            } else {
                session.opts_mut().pixel_variance = Some(variance);
                backend.pixel_variance(variance);
            }
            Outcome::None
        }
        Call::PixelSamples { x, y } => {
            if x < 1.0 || y < 1.0 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "pixel_samples: rates below one",
                );
            } else {
                session.opts_mut().pixel_samples = (x, y);
                backend.pixel_samples(x, y);
            }
            Outcome::None
        }
        Call::PixelFilter {
            name,
            xwidth,
            ywidth,
        } => {
            session.opts_mut().pixel_filter = (name, xwidth, ywidth);
            let (name, _, _) = &session.opts().pixel_filter;
            backend.pixel_filter(name, xwidth, ywidth);
            Outcome::None
        }
        Call::Exposure { gain, gamma } => {
            if gain <= 0.0 || gamma <= 0.0 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "exposure: non-positive gain or gamma",
                );
            } else {
                session.opts_mut().exposure = (gain, gamma);
                backend.exposure(gain, gamma);
            }
            Outcome::None
        }
        Call::Imager { name, params } => {
            session.opts_mut().imager = Some((name, params));
            if let Some((name, params)) = &session.opts().imager {
                backend.imager(name, params);
            }
            Outcome::None
        }
        Call::Quantize {
            kind,
            one,
            min,
            max,
            dither,
        } => {
            if min > max {
                sink.report(ErrorCode::Range, Severity::Error, "quantize: min above max");
            } else {
                backend.quantize(&kind, one, min, max, dither);
                session.opts_mut().quantize.insert(
                    kind,
                    Quantization {
                        one,
                        min,
                        max,
                        dither,
                    },
                );
            }
            Outcome::None
        }
        Call::Display {
            name,
            kind,
            mode,
            params,
        } => {
            backend.display(&name, &kind, &mode, &params);
            session.opts_mut().add_display(Display {
                name,
                kind,
                mode,
                params,
            });
            Outcome::None
        }
        Call::Hider { kind, params } => {
            session.opts_mut().hider = (kind, params);
            let (kind, params) = &session.opts().hider;
            backend.hider(kind, params);
            Outcome::None
        }
        Call::ColorSamples { from, to } => {
            if from.is_empty() || from.len() % 3 != 0 || from.len() != to.len() {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "color_samples: bases must be matching non-empty multiples of three",
                );
            } else {
                let n = from.len() / 3;
                session.opts_mut().color_samples = n;
                backend.color_samples(&from, &to);
                session.opts_mut().color_basis = Some((from, to));
                // Current color and opacity change arity with the basis.
                let attrs = session.attrs_mut();
                attrs.color.resize(n, 1.0);
                attrs.opacity.resize(n, 1.0);
            }
            Outcome::None
        }
        Call::RelativeDetail { scale } => {
            if scale < 0.0 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "relative_detail: negative scale",
                );
            } else {
                session.opts_mut().relative_detail = scale;
                backend.relative_detail(scale);
            }
            Outcome::None
        }
        Call::Option { name, params } => {
            backend.option(&name, &params);
            session.opts_mut().user.insert(name, params);
            Outcome::None
        }

        // -- Attributes --
        Call::Color { samples } => {
            if samples.len() == session.opts().color_samples {
                session.attrs_mut().color = samples;
                backend.color(&session.attrs().color);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    &format!(
                        "color: {} sample(s), basis has {}",
                        samples.len(),
                        session.opts().color_samples
                    ),
                );
            }
            Outcome::None
        }
        Call::Opacity { samples } => {
            if samples.len() == session.opts().color_samples {
                session.attrs_mut().opacity = samples;
                backend.opacity(&session.attrs().opacity);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    &format!(
                        "opacity: {} sample(s), basis has {}",
                        samples.len(),
                        session.opts().color_samples
                    ),
                );
            }
            Outcome::None
        }
        Call::TextureCoordinates { corners } => {
            session.attrs_mut().texture_coordinates = corners;
            backend.texture_coordinates(&session.attrs().texture_coordinates);
            Outcome::None
        }
        Call::LightSource { name, params } => make_light(session, backend, name, params, false),
        Call::AreaLightSource { name, params } => make_light(session, backend, name, params, true),
        Call::Illuminate { light, on } => {
            if session.lights.resolve(light).is_none() {
                sink.report(
                    ErrorCode::BadHandle,
                    Severity::Error,
                    &format!("illuminate: unknown handle {light:?}"),
                );
            } else {
                let lights_on = &mut session.attrs_mut().lights_on;
                if on {
                    if !lights_on.contains(&light) {
                        lights_on.push(light);
                    }
                } else {
                    lights_on.retain(|id| *id != light);
                }
                backend.illuminate(light, on);
            }
            Outcome::None
        }
        Call::Surface { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().surface = Some(binding);
            if let Some(b) = &session.attrs().surface {
                backend.surface(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::Atmosphere { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().atmosphere = Some(binding);
            if let Some(b) = &session.attrs().atmosphere {
                backend.atmosphere(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::Interior { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().interior = Some(binding);
            if let Some(b) = &session.attrs().interior {
                backend.interior(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::Exterior { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().exterior = Some(binding);
            if let Some(b) = &session.attrs().exterior {
                backend.exterior(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::Displacement { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().displacement = Some(binding);
            if let Some(b) = &session.attrs().displacement {
                backend.displacement(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::Deformation { name, params } => {
            let binding = bind_shader(session, name, params);
            session.attrs_mut().deformation = Some(binding);
            if let Some(b) = &session.attrs().deformation {
                backend.deformation(&b.name, &b.params);
            }
            Outcome::None
        }
        Call::ShadingRate { area } => {
            if area > 0.0 {
                session.attrs_mut().shading_rate = area;
                backend.shading_rate(area);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "shading_rate: non-positive area",
                );
            }
            Outcome::None
        }
        Call::ShadingInterpolation { token } => {
            match ShadingInterpolation::from_token(&token) {
                Some(mode) => {
                    session.attrs_mut().shading_interpolation = mode;
                    backend.shading_interpolation(mode);
                }
                None => sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("shading_interpolation: unknown mode \"{token}\""),
                ),
            }
            Outcome::None
        }
        Call::Matte { onoff } => {
            session.attrs_mut().matte = onoff;
            backend.matte(onoff);
            Outcome::None
        }
        Call::Bound { bounds } => {
            session.attrs_mut().bound = Some(bounds);
            backend.bound(&bounds);
            Outcome::None
        }
        Call::Detail { bounds } => {
            session.attrs_mut().detail = Some(bounds);
            backend.detail(&bounds);
            Outcome::None
        }
        Call::DetailRange { range } => {
            if range[0] <= range[1] && range[1] <= range[2] && range[2] <= range[3] {
                session.attrs_mut().detail_range = range;
                backend.detail_range(&range);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "detail_range: boundaries not nondecreasing",
                );
            }
            Outcome::None
        }
        Call::GeometricApproximation { kind, value } => {
            backend.geometric_approximation(&kind, value);
            session.attrs_mut().geometric_approximation = Some((kind, value));
            Outcome::None
        }
        Call::Orientation { token } => {
            match Orientation::from_token(&token) {
                Some(orientation) => {
                    session.attrs_mut().orientation = orientation;
                    backend.orientation(orientation);
                }
                None => sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("orientation: unknown token \"{token}\""),
                ),
            }
            Outcome::None
        }
        Call::ReverseOrientation => {
            let attrs = session.attrs_mut();
            attrs.orientation = attrs.orientation.reversed();
            backend.reverse_orientation();
            Outcome::None
        }
        Call::Sides { n } => {
            if n == 1 || n == 2 {
                session.attrs_mut().sides = n;
                backend.sides(n);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    &format!("sides: {n} is not 1 or 2"),
                );
            }
            Outcome::None
        }
        Call::Basis { u, ustep, v, vstep } => {
            if ustep < 1 || vstep < 1 {
                sink.report(ErrorCode::Range, Severity::Error, "basis: steps below one");
            } else {
                session.attrs_mut().basis = Basis { u, ustep, v, vstep };
                backend.basis(&session.attrs().basis);
            }
            Outcome::None
        }
        Call::TrimCurve {
            ncurves,
            order,
            knot,
            min,
            max,
            n,
            u,
            v,
            w,
        } => {
            let trim = TrimCurve {
                ncurves,
                order,
                knot,
                min,
                max,
                n,
                u,
                v,
                w,
            };
            if trim.is_empty() {
                session.attrs_mut().trim = TrimCurve::default();
                backend.trim_curve(&session.attrs().trim);
            } else if trim_consistent(&trim) {
                session.attrs_mut().trim = trim;
                backend.trim_curve(&session.attrs().trim);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "trim_curve: array lengths disagree",
                );
            }
            Outcome::None
        }
        Call::Attribute { name, params } => {
            backend.attribute(&name, &params);
            session.attrs_mut().user.insert(name, params);
            Outcome::None
        }

        // -- Transforms --
        Call::Identity => {
            session.ctm.set(Mat4::IDENTITY);
            sync_flip(session, backend);
            backend.identity();
            Outcome::None
        }
        Call::Transform { matrix } => {
            if matrix.is_finite() {
                if !session.ctm.set(matrix) {
                    sink.report(
                        ErrorCode::Consistency,
                        Severity::Warning,
                        "transform: singular matrix, inverse unavailable",
                    );
                }
                sync_flip(session, backend);
                backend.transform(matrix);
            } else {
                sink.report(ErrorCode::Range, Severity::Error, "transform: non-finite matrix");
            }
            Outcome::None
        }
        Call::ConcatTransform { matrix } => {
            if matrix.is_finite() {
                if !session.ctm.concat(matrix) {
                    sink.report(
                        ErrorCode::Consistency,
                        Severity::Warning,
                        "concat_transform: singular matrix, inverse unavailable",
                    );
                }
                sync_flip(session, backend);
                backend.concat_transform(matrix);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "concat_transform: non-finite matrix",
                );
            }
            Outcome::None
        }
        Call::Perspective { fov } => {
            if fov > 0.0 && fov < 180.0 {
                session.ctm.concat(Mat4::from_perspective(fov.to_radians()));
                sync_flip(session, backend);
                backend.perspective(fov);
            } else {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    &format!("perspective: fov {fov} outside (0, 180)"),
                );
            }
            Outcome::None
        }
        Call::Translate { dx, dy, dz } => {
            session.ctm.concat(Mat4::from_translation(dx, dy, dz));
            backend.translate(dx, dy, dz);
            Outcome::None
        }
        Call::Rotate { angle, ax, ay, az } => {
            session
                .ctm
                .concat(Mat4::from_rotation(angle.to_radians(), ax, ay, az));
            backend.rotate(angle, ax, ay, az);
            Outcome::None
        }
        Call::Scale { sx, sy, sz } => {
            if !session.ctm.concat(Mat4::from_scale(sx, sy, sz)) {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Warning,
                    "scale: zero factor, inverse unavailable",
                );
            }
            sync_flip(session, backend);
            backend.scale(sx, sy, sz);
            Outcome::None
        }
        Call::Skew { angle, d1, d2 } => {
            session
                .ctm
                .concat(Mat4::from_skew(angle.to_radians(), d1, d2));
            backend.skew(angle, &d1, &d2);
            Outcome::None
        }
        Call::CoordinateSystem { name } => {
            session.coords.mark(&name, session.ctm.ctm());
            backend.coordinate_system(&name);
            Outcome::None
        }
        Call::CoordSysTransform { name } => {
            match session.coords.lookup(&name).copied() {
                Some(ctm) => {
                    session.ctm.set(ctm);
                    sync_flip(session, backend);
                    backend.coord_sys_transform(&name, ctm);
                }
                None => sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("coord_sys_transform: unknown coordinate system \"{name}\""),
                ),
            }
            Outcome::None
        }

        // -- Primitives --
        // Inside an object definition primitives only record; the tape
        // dispatches them at instance time.
        Call::Sphere {
            radius,
            zmin,
            zmax,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.sphere(radius, zmin, zmax, thetamax, &params);
            }
            Outcome::None
        }
        Call::Cone {
            height,
            radius,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.cone(height, radius, thetamax, &params);
            }
            Outcome::None
        }
        Call::Cylinder {
            radius,
            zmin,
            zmax,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.cylinder(radius, zmin, zmax, thetamax, &params);
            }
            Outcome::None
        }
        Call::Hyperboloid {
            point1,
            point2,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.hyperboloid(&point1, &point2, thetamax, &params);
            }
            Outcome::None
        }
        Call::Paraboloid {
            rmax,
            zmin,
            zmax,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.paraboloid(rmax, zmin, zmax, thetamax, &params);
            }
            Outcome::None
        }
        Call::Disk {
            height,
            radius,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.disk(height, radius, thetamax, &params);
            }
            Outcome::None
        }
        Call::Torus {
            major,
            minor,
            phimin,
            phimax,
            thetamax,
            params,
        } => {
            if session.define_object_depth == 0 {
                backend.torus(major, minor, phimin, phimax, thetamax, &params);
            }
            Outcome::None
        }
        Call::Polygon { params } => {
            if param::find(&params, "P").is_none() {
                sink.report(ErrorCode::Consistency, Severity::Error, "polygon: no \"P\"");
            } else if session.define_object_depth == 0 {
                backend.polygon(&params);
            }
            Outcome::None
        }
        Call::GeneralPolygon { nverts, params } => {
            if param::find(&params, "P").is_none() {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    "general_polygon: no \"P\"",
                );
            } else if session.define_object_depth == 0 {
                backend.general_polygon(&nverts, &params);
            }
            Outcome::None
        }
        Call::PointsPolygons {
            nverts,
            verts,
            params,
        } => {
            let expected: i64 = nverts.iter().map(|n| i64::from(*n)).sum();
            if expected != verts.len() as i64 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "points_polygons: index count disagrees with face sizes",
                );
            } else if session.define_object_depth == 0 {
                backend.points_polygons(&nverts, &verts, &params);
            }
            Outcome::None
        }
        Call::PointsGeneralPolygons {
            nloops,
            nverts,
            verts,
            params,
        } => {
            let loops: i64 = nloops.iter().map(|n| i64::from(*n)).sum();
            let indices: i64 = nverts.iter().map(|n| i64::from(*n)).sum();
            if loops != nverts.len() as i64 || indices != verts.len() as i64 {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "points_general_polygons: loop or index counts disagree",
                );
            } else if session.define_object_depth == 0 {
                backend.points_general_polygons(&nloops, &nverts, &verts, &params);
            }
            Outcome::None
        }
        Call::Patch { kind, params } => {
            if kind != "bilinear" && kind != "bicubic" {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    &format!("patch: unknown kind \"{kind}\""),
                );
            } else if session.define_object_depth == 0 {
                backend.patch(&kind, &params);
            }
            Outcome::None
        }
        Call::PatchMesh {
            kind,
            nu,
            uwrap,
            nv,
            vwrap,
            params,
        } => {
            let known_kind = kind == "bilinear" || kind == "bicubic";
            let known_wrap = |w: &str| w == "periodic" || w == "nonperiodic";
            if !known_kind || !known_wrap(&uwrap) || !known_wrap(&vwrap) {
                sink.report(
                    ErrorCode::Consistency,
                    Severity::Error,
                    "patch_mesh: unknown kind or wrap token",
                );
            } else if nu < 1 || nv < 1 {
                sink.report(ErrorCode::Range, Severity::Error, "patch_mesh: empty mesh");
            } else if session.define_object_depth == 0 {
                backend.patch_mesh(&kind, nu, &uwrap, nv, &vwrap, &params);
            }
            Outcome::None
        }
        Call::NuPatch {
            nu,
            uorder,
            uknot,
            umin,
            umax,
            nv,
            vorder,
            vknot,
            vmin,
            vmax,
            params,
        } => {
            let u_ok = nu >= 1 && uorder >= 1 && uknot.len() as i64 == i64::from(nu) + i64::from(uorder);
            let v_ok = nv >= 1 && vorder >= 1 && vknot.len() as i64 == i64::from(nv) + i64::from(vorder);
            if !u_ok || !v_ok {
                sink.report(
                    ErrorCode::Range,
                    Severity::Error,
                    "nu_patch: knot counts disagree with order and size",
                );
            } else if session.define_object_depth == 0 {
                backend.nu_patch(
                    nu, uorder, &uknot, umin, umax, nv, vorder, &vknot, vmin, vmax, &params,
                );
            }
            Outcome::None
        }
        Call::Geometry { name, params } => {
            if session.define_object_depth == 0 {
                if name == "cube" {
                    follow = FollowUp::ExpandCube;
                } else {
                    backend.geometry(&name, &params);
                }
            }
            Outcome::None
        }

        // -- Texture maps --
        Call::MakeTexture {
            picture,
            texture,
            swrap,
            twrap,
            filter,
            swidth,
            twidth,
            params,
        } => {
            backend.make_texture(&picture, &texture, &swrap, &twrap, &filter, swidth, twidth, &params);
            Outcome::None
        }
        Call::MakeBump {
            picture,
            texture,
            swrap,
            twrap,
            filter,
            swidth,
            twidth,
            params,
        } => {
            backend.make_bump(&picture, &texture, &swrap, &twrap, &filter, swidth, twidth, &params);
            Outcome::None
        }
        Call::MakeLatLongEnvironment {
            picture,
            texture,
            filter,
            swidth,
            twidth,
            params,
        } => {
            backend.make_lat_long_environment(&picture, &texture, &filter, swidth, twidth, &params);
            Outcome::None
        }
        Call::MakeCubeFaceEnvironment {
            faces,
            texture,
            fov,
            filter,
            swidth,
            twidth,
            params,
        } => {
            backend.make_cube_face_environment(&faces, &texture, fov, &filter, swidth, twidth, &params);
            Outcome::None
        }
        Call::MakeShadow {
            picture,
            texture,
            params,
        } => {
            backend.make_shadow(&picture, &texture, &params);
            Outcome::None
        }
    };
    (outcome, follow)
}

// -- Helpers --

/// Restores the previous attribute frame, re-dispatching `illuminate` for
/// lights whose effective membership changed and the flip state if the
/// restored frame disagrees.
fn pop_attributes(session: &mut Session, backend: &mut dyn Backend) {
    if session.attributes.len() <= 1 {
        return;
    }
    let Some(old) = session.attributes.pop() else {
        return;
    };
    let new = session.attrs();
    for id in &old.lights_on {
        if !new.lights_on.contains(id) {
            backend.illuminate(*id, false);
        }
    }
    for id in &new.lights_on {
        if !old.lights_on.contains(id) {
            backend.illuminate(*id, true);
        }
    }
    if new.flipped != old.flipped {
        backend.orientation_flipped(new.flipped);
    }
}

/// Reconciles the tracked flip state with the CTM's handedness, telling
/// the backend only when it actually changed.
fn sync_flip(session: &mut Session, backend: &mut dyn Backend) {
    let flipped = session.ctm.ctm().flips_handedness();
    if session.attrs().flipped != flipped {
        session.attrs_mut().flipped = flipped;
        backend.orientation_flipped(flipped);
    }
}

fn bind_shader(session: &Session, name: String, params: ParamList) -> ShaderBinding {
    ShaderBinding {
        name,
        params,
        ctm: session.ctm.ctm(),
        inverse: session.ctm.inverse(),
    }
}

fn make_light(
    session: &mut Session,
    backend: &mut dyn Backend,
    name: String,
    params: ParamList,
    area: bool,
) -> Outcome {
    let in_world = session.blocks.contains(&BlockState::World);
    let provisional = LightId(session.lights.len() as u32);
    session.lights.add(LightRecord {
        name,
        params,
        area,
        ctm: session.ctm.ctm(),
        before_world: !in_world,
        external: provisional,
    });
    let external = match session.lights.resolve(provisional) {
        Some(record) => backend.light_source(provisional, record),
        None => provisional,
    };
    session.lights.set_external(provisional, external);
    session.attrs_mut().lights_on.push(external);
    Outcome::Light(external)
}

fn trim_consistent(trim: &TrimCurve) -> bool {
    let curves: i64 = trim.ncurves.iter().map(|n| i64::from(*n)).sum();
    if curves < 0 || trim.order.len() as i64 != curves {
        return false;
    }
    if trim.n.len() as i64 != curves || trim.min.len() as i64 != curves {
        return false;
    }
    if trim.max.len() as i64 != curves {
        return false;
    }
    let points: i64 = trim.n.iter().map(|n| i64::from(*n)).sum();
    let knots: i64 = points + trim.order.iter().map(|o| i64::from(*o)).sum::<i64>();
    trim.knot.len() as i64 == knots
        && trim.u.len() as i64 == points
        && trim.v.len() as i64 == points
        && trim.w.len() as i64 == points
}

// Used by `ParamValue` pattern checks in the follow-up stage.
pub(super) fn no_cache_requested(params: &ParamList) -> bool {
    match param::find(params, "cache") {
        Some(ParamValue::Ints(values)) => values.first() == Some(&0),
        Some(ParamValue::Strings(values)) => {
            values.first().is_some_and(|v| v == "false" || v == "0")
        }
        Some(ParamValue::Floats(values)) => values.first() == Some(&0.0),
        None => false,
    }
}
