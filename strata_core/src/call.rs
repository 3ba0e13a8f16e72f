// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Call kinds and owned call descriptors.
//!
//! [`CallKind`] names every operation on the interface, including the
//! session-control calls that are never recorded. [`Call`] is the owned
//! descriptor for the recordable subset: it is what a [`Tape`] stores and
//! what replay re-issues through the public surface. Arguments are captured
//! verbatim at record time; no validation or resolution happens here.
//!
//! [`Tape`]: crate::tape::Tape

use alloc::string::String;
use alloc::vec::Vec;

use crate::light::LightId;
use crate::param::ParamList;
use crate::session::ObjectId;
use crate::transform::Mat4;

/// Every distinct operation on the call surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    // -- Session control --
    /// Create a context.
    Begin,
    /// Destroy the current context.
    End,
    /// Switch contexts.
    Context,
    /// Query the current context.
    GetContext,
    /// Declare a token.
    Declare,
    /// Select the error-handling policy.
    ErrorHandler,
    /// Reset or abort the current context.
    Synchronize,
    /// Emit a structured comment.
    ArchiveRecord,
    /// Read (and cache) an external archive.
    ReadArchive,

    // -- Blocks --
    /// Open a frame block.
    FrameBegin,
    /// Close a frame block.
    FrameEnd,
    /// Open the world block.
    WorldBegin,
    /// Close the world block.
    WorldEnd,
    /// Open an attribute block.
    AttributeBegin,
    /// Close an attribute block.
    AttributeEnd,
    /// Open a transform block.
    TransformBegin,
    /// Close a transform block.
    TransformEnd,
    /// Open a solid (CSG) block.
    SolidBegin,
    /// Close a solid block.
    SolidEnd,
    /// Open a retained-object definition.
    ObjectBegin,
    /// Close a retained-object definition.
    ObjectEnd,
    /// Instance a retained object.
    ObjectInstance,
    /// Open a motion-blur sample block.
    MotionBegin,
    /// Close a motion block.
    MotionEnd,

    // -- Options --
    /// Set raster resolution and pixel aspect.
    Format,
    /// Set the frame aspect ratio.
    FrameAspectRatio,
    /// Set the screen window.
    ScreenWindow,
    /// Set the crop window.
    CropWindow,
    /// Set the camera projection.
    Projection,
    /// Set near/far clipping planes.
    Clipping,
    /// Set depth-of-field parameters.
    DepthOfField,
    /// Set shutter open/close times.
    Shutter,
    /// Set the pixel variance bound.
    PixelVariance,
    /// Set pixel sampling rates.
    PixelSamples,
    /// Set the pixel reconstruction filter.
    PixelFilter,
    /// Set exposure gain/gamma.
    Exposure,
    /// Bind the imager shader.
    Imager,
    /// Set quantization for an output type.
    Quantize,
    /// Add or replace a display.
    Display,
    /// Select the hidden-surface algorithm.
    Hider,
    /// Set the color-sample basis.
    ColorSamples,
    /// Set the relative detail scale.
    RelativeDetail,
    /// Set an implementation-specific option.
    Option,

    // -- Attributes --
    /// Set the surface color.
    Color,
    /// Set the surface opacity.
    Opacity,
    /// Set texture coordinates at the parametric corners.
    TextureCoordinates,
    /// Create a (non-area) light.
    LightSource,
    /// Create an area light.
    AreaLightSource,
    /// Toggle a light on or off.
    Illuminate,
    /// Bind the surface shader.
    Surface,
    /// Bind the atmosphere volume shader.
    Atmosphere,
    /// Bind the interior volume shader.
    Interior,
    /// Bind the exterior volume shader.
    Exterior,
    /// Bind the displacement shader.
    Displacement,
    /// Bind the deformation shader.
    Deformation,
    /// Set the shading rate.
    ShadingRate,
    /// Set the shading interpolation mode.
    ShadingInterpolation,
    /// Mark geometry as a matte object.
    Matte,
    /// Set the bounding box for subsequent geometry.
    Bound,
    /// Set the current level of detail.
    Detail,
    /// Set the detail range.
    DetailRange,
    /// Set a geometric approximation hint.
    GeometricApproximation,
    /// Set the orientation token.
    Orientation,
    /// Flip the current orientation.
    ReverseOrientation,
    /// Set the number of visible sides.
    Sides,
    /// Set the u/v bases for patch meshes.
    Basis,
    /// Attach trim curves to subsequent NURBS.
    TrimCurve,
    /// Set an implementation-specific attribute.
    Attribute,

    // -- Transforms --
    /// Reset the CTM to identity.
    Identity,
    /// Replace the CTM.
    Transform,
    /// Concatenate onto the CTM.
    ConcatTransform,
    /// Concatenate a perspective projection.
    Perspective,
    /// Concatenate a translation.
    Translate,
    /// Concatenate a rotation.
    Rotate,
    /// Concatenate a scale.
    Scale,
    /// Concatenate a skew.
    Skew,
    /// Name the current coordinate system.
    CoordinateSystem,
    /// Replace the CTM with a named coordinate system.
    CoordSysTransform,

    // -- Primitives --
    /// Quadric sphere.
    Sphere,
    /// Quadric cone.
    Cone,
    /// Quadric cylinder.
    Cylinder,
    /// Quadric hyperboloid.
    Hyperboloid,
    /// Quadric paraboloid.
    Paraboloid,
    /// Quadric disk.
    Disk,
    /// Quadric torus.
    Torus,
    /// Convex polygon.
    Polygon,
    /// Concave polygon with holes.
    GeneralPolygon,
    /// Indexed polygon mesh.
    PointsPolygons,
    /// Indexed general-polygon mesh.
    PointsGeneralPolygons,
    /// Single bilinear/bicubic patch.
    Patch,
    /// Patch mesh.
    PatchMesh,
    /// NURBS patch.
    NuPatch,
    /// Named composite or implementation-specific geometry.
    Geometry,

    // -- Texture maps --
    /// Convert an image to a texture map.
    MakeTexture,
    /// Convert an image to a bump map.
    MakeBump,
    /// Convert an image to a lat-long environment map.
    MakeLatLongEnvironment,
    /// Convert six images to a cube-face environment map.
    MakeCubeFaceEnvironment,
    /// Convert a depth image to a shadow map.
    MakeShadow,
}

/// An owned, replayable call descriptor.
///
/// One variant per recordable call. Session control (`begin`, `end`,
/// `context`, `get_context`) is deliberately absent: those calls select
/// *which* session a tape replays into and are never captured.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    /// `declare(name, declaration)`.
    Declare {
        /// Token name.
        name: String,
        /// Declaration string (parsed during apply).
        declaration: String,
    },
    /// `error_handler(token)`.
    ErrorHandler {
        /// Policy token.
        token: String,
    },
    /// `synchronize(token)`.
    Synchronize {
        /// `"reset"` or `"abort"`.
        token: String,
    },
    /// `archive_record(kind, text)`.
    ArchiveRecord {
        /// `"comment"`, `"structure"`, or `"verbatim"`.
        kind: String,
        /// Record text.
        text: String,
    },
    /// `read_archive(name, params)`.
    ReadArchive {
        /// Archive path.
        name: String,
        /// Trailing parameters (`cache` = 0 disables caching).
        params: ParamList,
    },

    /// `frame_begin(frame)`.
    FrameBegin {
        /// Frame number.
        frame: i32,
    },
    /// `frame_end()`.
    FrameEnd,
    /// `world_begin()`.
    WorldBegin,
    /// `world_end()`.
    WorldEnd,
    /// `attribute_begin()`.
    AttributeBegin,
    /// `attribute_end()`.
    AttributeEnd,
    /// `transform_begin()`.
    TransformBegin,
    /// `transform_end()`.
    TransformEnd,
    /// `solid_begin(operation)`.
    SolidBegin {
        /// CSG operation token.
        operation: String,
    },
    /// `solid_end()`.
    SolidEnd,
    /// `object_begin()`.
    ObjectBegin,
    /// `object_end()`.
    ObjectEnd,
    /// `object_instance(handle)`.
    ObjectInstance {
        /// Retained-object handle.
        handle: ObjectId,
    },
    /// `motion_begin(times)`.
    MotionBegin {
        /// Sample times.
        times: Vec<f64>,
    },
    /// `motion_end()`.
    MotionEnd,

    /// `format(xres, yres, pixel_aspect)`.
    Format {
        /// Horizontal resolution.
        xres: i32,
        /// Vertical resolution.
        yres: i32,
        /// Pixel aspect ratio.
        pixel_aspect: f64,
    },
    /// `frame_aspect_ratio(ratio)`.
    FrameAspectRatio {
        /// Frame aspect ratio.
        ratio: f64,
    },
    /// `screen_window(left, right, bottom, top)`.
    ScreenWindow {
        /// Left edge.
        left: f64,
        /// Right edge.
        right: f64,
        /// Bottom edge.
        bottom: f64,
        /// Top edge.
        top: f64,
    },
    /// `crop_window(xmin, xmax, ymin, ymax)`.
    CropWindow {
        /// Left fraction.
        xmin: f64,
        /// Right fraction.
        xmax: f64,
        /// Top fraction.
        ymin: f64,
        /// Bottom fraction.
        ymax: f64,
    },
    /// `projection(name, params)`.
    Projection {
        /// Projection name.
        name: String,
        /// Projection parameters.
        params: ParamList,
    },
    /// `clipping(near, far)`.
    Clipping {
        /// Near plane.
        near: f64,
        /// Far plane.
        far: f64,
    },
    /// `depth_of_field(fstop, focal_length, focal_distance)`.
    DepthOfField {
        /// Aperture f-stop.
        fstop: f64,
        /// Lens focal length.
        focal_length: f64,
        /// Distance to the focal plane.
        focal_distance: f64,
    },
    /// `shutter(open, close)`.
    Shutter {
        /// Shutter open time.
        open: f64,
        /// Shutter close time.
        close: f64,
    },
    /// `pixel_variance(variance)`.
    PixelVariance {
        /// Acceptable variance.
        variance: f64,
    },
    /// `pixel_samples(x, y)`.
    PixelSamples {
        /// Horizontal sampling rate.
        x: f64,
        /// Vertical sampling rate.
        y: f64,
    },
    /// `pixel_filter(name, xwidth, ywidth)`.
    PixelFilter {
        /// Filter name.
        name: String,
        /// Horizontal support width.
        xwidth: f64,
        /// Vertical support width.
        ywidth: f64,
    },
    /// `exposure(gain, gamma)`.
    Exposure {
        /// Gain.
        gain: f64,
        /// Gamma.
        gamma: f64,
    },
    /// `imager(name, params)`.
    Imager {
        /// Imager shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `quantize(kind, one, min, max, dither)`.
    Quantize {
        /// Output type (`"rgba"` or `"z"`).
        kind: String,
        /// Value mapped to 1.0.
        one: i32,
        /// Minimum quantized value.
        min: i32,
        /// Maximum quantized value.
        max: i32,
        /// Dither amplitude.
        dither: f64,
    },
    /// `display(name, kind, mode, params)`.
    Display {
        /// Output name (`+` prefix appends).
        name: String,
        /// Display driver.
        kind: String,
        /// Channels (`"rgb"`, `"rgba"`, `"z"`, ...).
        mode: String,
        /// Driver parameters.
        params: ParamList,
    },
    /// `hider(kind, params)`.
    Hider {
        /// Hider name.
        kind: String,
        /// Hider parameters.
        params: ParamList,
    },
    /// `color_samples(from, to)`.
    ColorSamples {
        /// Input basis (n × 3 values).
        from: Vec<f64>,
        /// Output basis (n × 3 values).
        to: Vec<f64>,
    },
    /// `relative_detail(scale)`.
    RelativeDetail {
        /// Detail scale.
        scale: f64,
    },
    /// `option(name, params)`.
    Option {
        /// Option group name.
        name: String,
        /// Option values.
        params: ParamList,
    },

    /// `color(samples)`.
    Color {
        /// One value per color sample.
        samples: Vec<f64>,
    },
    /// `opacity(samples)`.
    Opacity {
        /// One value per color sample.
        samples: Vec<f64>,
    },
    /// `texture_coordinates(corners)`.
    TextureCoordinates {
        /// `(s, t)` at the four parametric corners.
        corners: [f64; 8],
    },
    /// `light_source(name, params)`.
    LightSource {
        /// Light shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `area_light_source(name, params)`.
    AreaLightSource {
        /// Light shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `illuminate(light, on)`.
    Illuminate {
        /// Light handle.
        light: LightId,
        /// Whether the light illuminates subsequent geometry.
        on: bool,
    },
    /// `surface(name, params)`.
    Surface {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `atmosphere(name, params)`.
    Atmosphere {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `interior(name, params)`.
    Interior {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `exterior(name, params)`.
    Exterior {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `displacement(name, params)`.
    Displacement {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `deformation(name, params)`.
    Deformation {
        /// Shader name.
        name: String,
        /// Shader parameters.
        params: ParamList,
    },
    /// `shading_rate(area)`.
    ShadingRate {
        /// Maximum micropolygon area in pixels.
        area: f64,
    },
    /// `shading_interpolation(token)`.
    ShadingInterpolation {
        /// `"constant"` or `"smooth"`.
        token: String,
    },
    /// `matte(onoff)`.
    Matte {
        /// Whether subsequent geometry is a matte object.
        onoff: bool,
    },
    /// `bound(bounds)`.
    Bound {
        /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
        bounds: [f64; 6],
    },
    /// `detail(bounds)`.
    Detail {
        /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
        bounds: [f64; 6],
    },
    /// `detail_range(range)`.
    DetailRange {
        /// `[min_visible, lower, upper, max_visible]`.
        range: [f64; 4],
    },
    /// `geometric_approximation(kind, value)`.
    GeometricApproximation {
        /// Approximation metric (`"flatness"`, ...).
        kind: String,
        /// Metric value.
        value: f64,
    },
    /// `orientation(token)`.
    Orientation {
        /// `"outside"`, `"inside"`, `"lh"`, or `"rh"`.
        token: String,
    },
    /// `reverse_orientation()`.
    ReverseOrientation,
    /// `sides(n)`.
    Sides {
        /// 1 or 2.
        n: i32,
    },
    /// `basis(u, ustep, v, vstep)`.
    Basis {
        /// U basis matrix.
        u: Mat4,
        /// U step.
        ustep: i32,
        /// V basis matrix.
        v: Mat4,
        /// V step.
        vstep: i32,
    },
    /// `trim_curve(...)`.
    TrimCurve {
        /// Curves per loop.
        ncurves: Vec<i32>,
        /// Order of each curve.
        order: Vec<i32>,
        /// Knot vector.
        knot: Vec<f64>,
        /// Parametric minimum per curve.
        min: Vec<f64>,
        /// Parametric maximum per curve.
        max: Vec<f64>,
        /// Control-point count per curve.
        n: Vec<i32>,
        /// Homogeneous u coordinates.
        u: Vec<f64>,
        /// Homogeneous v coordinates.
        v: Vec<f64>,
        /// Homogeneous weights.
        w: Vec<f64>,
    },
    /// `attribute(name, params)`.
    Attribute {
        /// Attribute group name.
        name: String,
        /// Attribute values.
        params: ParamList,
    },

    /// `identity()`.
    Identity,
    /// `transform(matrix)`.
    Transform {
        /// Replacement CTM.
        matrix: Mat4,
    },
    /// `concat_transform(matrix)`.
    ConcatTransform {
        /// Matrix composed inside the CTM.
        matrix: Mat4,
    },
    /// `perspective(fov)`.
    Perspective {
        /// Full field of view in degrees.
        fov: f64,
    },
    /// `translate(dx, dy, dz)`.
    Translate {
        /// X offset.
        dx: f64,
        /// Y offset.
        dy: f64,
        /// Z offset.
        dz: f64,
    },
    /// `rotate(angle, ax, ay, az)`.
    Rotate {
        /// Angle in degrees.
        angle: f64,
        /// Axis x.
        ax: f64,
        /// Axis y.
        ay: f64,
        /// Axis z.
        az: f64,
    },
    /// `scale(sx, sy, sz)`.
    Scale {
        /// X scale.
        sx: f64,
        /// Y scale.
        sy: f64,
        /// Z scale.
        sz: f64,
    },
    /// `skew(angle, d1, d2)`.
    Skew {
        /// Shear angle in degrees.
        angle: f64,
        /// Direction being sheared.
        d1: [f64; 3],
        /// Direction sheared towards.
        d2: [f64; 3],
    },
    /// `coordinate_system(name)`.
    CoordinateSystem {
        /// Name to bind the CTM snapshot to.
        name: String,
    },
    /// `coord_sys_transform(name)`.
    CoordSysTransform {
        /// Named coordinate system to restore.
        name: String,
    },

    /// `sphere(radius, zmin, zmax, thetamax, params)`.
    Sphere {
        /// Radius.
        radius: f64,
        /// Lower clip plane.
        zmin: f64,
        /// Upper clip plane.
        zmax: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `cone(height, radius, thetamax, params)`.
    Cone {
        /// Height.
        height: f64,
        /// Base radius.
        radius: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `cylinder(radius, zmin, zmax, thetamax, params)`.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Lower extent.
        zmin: f64,
        /// Upper extent.
        zmax: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `hyperboloid(point1, point2, thetamax, params)`.
    Hyperboloid {
        /// First point of the sweep line.
        point1: [f64; 3],
        /// Second point of the sweep line.
        point2: [f64; 3],
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `paraboloid(rmax, zmin, zmax, thetamax, params)`.
    Paraboloid {
        /// Radius at `zmax`.
        rmax: f64,
        /// Lower extent.
        zmin: f64,
        /// Upper extent.
        zmax: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `disk(height, radius, thetamax, params)`.
    Disk {
        /// Z offset.
        height: f64,
        /// Radius.
        radius: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `torus(major, minor, phimin, phimax, thetamax, params)`.
    Torus {
        /// Major radius.
        major: f64,
        /// Minor radius.
        minor: f64,
        /// Tube start angle in degrees.
        phimin: f64,
        /// Tube end angle in degrees.
        phimax: f64,
        /// Sweep angle in degrees.
        thetamax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `polygon(params)`.
    Polygon {
        /// Primitive variables (vertex count implied by `P`).
        params: ParamList,
    },
    /// `general_polygon(nverts, params)`.
    GeneralPolygon {
        /// Vertex count per loop.
        nverts: Vec<i32>,
        /// Primitive variables.
        params: ParamList,
    },
    /// `points_polygons(nverts, verts, params)`.
    PointsPolygons {
        /// Vertex count per face.
        nverts: Vec<i32>,
        /// Vertex indices.
        verts: Vec<i32>,
        /// Primitive variables.
        params: ParamList,
    },
    /// `points_general_polygons(nloops, nverts, verts, params)`.
    PointsGeneralPolygons {
        /// Loop count per face.
        nloops: Vec<i32>,
        /// Vertex count per loop.
        nverts: Vec<i32>,
        /// Vertex indices.
        verts: Vec<i32>,
        /// Primitive variables.
        params: ParamList,
    },
    /// `patch(kind, params)`.
    Patch {
        /// `"bilinear"` or `"bicubic"`.
        kind: String,
        /// Primitive variables.
        params: ParamList,
    },
    /// `patch_mesh(kind, nu, uwrap, nv, vwrap, params)`.
    PatchMesh {
        /// `"bilinear"` or `"bicubic"`.
        kind: String,
        /// Control points in u.
        nu: i32,
        /// `"periodic"` or `"nonperiodic"`.
        uwrap: String,
        /// Control points in v.
        nv: i32,
        /// `"periodic"` or `"nonperiodic"`.
        vwrap: String,
        /// Primitive variables.
        params: ParamList,
    },
    /// `nu_patch(...)`.
    NuPatch {
        /// Control points in u.
        nu: i32,
        /// Order in u.
        uorder: i32,
        /// Knot vector in u.
        uknot: Vec<f64>,
        /// Parametric range in u.
        umin: f64,
        /// Parametric range in u.
        umax: f64,
        /// Control points in v.
        nv: i32,
        /// Order in v.
        vorder: i32,
        /// Knot vector in v.
        vknot: Vec<f64>,
        /// Parametric range in v.
        vmin: f64,
        /// Parametric range in v.
        vmax: f64,
        /// Primitive variables.
        params: ParamList,
    },
    /// `geometry(name, params)`.
    Geometry {
        /// Composite or implementation-specific name.
        name: String,
        /// Primitive variables.
        params: ParamList,
    },

    /// `make_texture(picture, texture, swrap, twrap, filter, swidth, twidth, params)`.
    MakeTexture {
        /// Source image.
        picture: String,
        /// Destination texture.
        texture: String,
        /// S wrap mode.
        swrap: String,
        /// T wrap mode.
        twrap: String,
        /// Filter name.
        filter: String,
        /// Filter width in s.
        swidth: f64,
        /// Filter width in t.
        twidth: f64,
        /// Extra parameters.
        params: ParamList,
    },
    /// `make_bump(picture, texture, swrap, twrap, filter, swidth, twidth, params)`.
    MakeBump {
        /// Source image.
        picture: String,
        /// Destination bump map.
        texture: String,
        /// S wrap mode.
        swrap: String,
        /// T wrap mode.
        twrap: String,
        /// Filter name.
        filter: String,
        /// Filter width in s.
        swidth: f64,
        /// Filter width in t.
        twidth: f64,
        /// Extra parameters.
        params: ParamList,
    },
    /// `make_lat_long_environment(picture, texture, filter, swidth, twidth, params)`.
    MakeLatLongEnvironment {
        /// Source image.
        picture: String,
        /// Destination environment map.
        texture: String,
        /// Filter name.
        filter: String,
        /// Filter width in s.
        swidth: f64,
        /// Filter width in t.
        twidth: f64,
        /// Extra parameters.
        params: ParamList,
    },
    /// `make_cube_face_environment(px, nx, py, ny, pz, nz, texture, fov, filter, swidth, twidth, params)`.
    MakeCubeFaceEnvironment {
        /// The six face images, +x −x +y −y +z −z.
        faces: [String; 6],
        /// Destination environment map.
        texture: String,
        /// Field of view used when the faces were rendered.
        fov: f64,
        /// Filter name.
        filter: String,
        /// Filter width in s.
        swidth: f64,
        /// Filter width in t.
        twidth: f64,
        /// Extra parameters.
        params: ParamList,
    },
    /// `make_shadow(picture, texture, params)`.
    MakeShadow {
        /// Source depth image.
        picture: String,
        /// Destination shadow map.
        texture: String,
        /// Extra parameters.
        params: ParamList,
    },
}

impl Call {
    /// The kind of this call, for validity lookups.
    #[must_use]
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Declare { .. } => CallKind::Declare,
            Self::ErrorHandler { .. } => CallKind::ErrorHandler,
            Self::Synchronize { .. } => CallKind::Synchronize,
            Self::ArchiveRecord { .. } => CallKind::ArchiveRecord,
            Self::ReadArchive { .. } => CallKind::ReadArchive,
            Self::FrameBegin { .. } => CallKind::FrameBegin,
            Self::FrameEnd => CallKind::FrameEnd,
            Self::WorldBegin => CallKind::WorldBegin,
            Self::WorldEnd => CallKind::WorldEnd,
            Self::AttributeBegin => CallKind::AttributeBegin,
            Self::AttributeEnd => CallKind::AttributeEnd,
            Self::TransformBegin => CallKind::TransformBegin,
            Self::TransformEnd => CallKind::TransformEnd,
            Self::SolidBegin { .. } => CallKind::SolidBegin,
            Self::SolidEnd => CallKind::SolidEnd,
            Self::ObjectBegin => CallKind::ObjectBegin,
            Self::ObjectEnd => CallKind::ObjectEnd,
            Self::ObjectInstance { .. } => CallKind::ObjectInstance,
            Self::MotionBegin { .. } => CallKind::MotionBegin,
            Self::MotionEnd => CallKind::MotionEnd,
            Self::Format { .. } => CallKind::Format,
            Self::FrameAspectRatio { .. } => CallKind::FrameAspectRatio,
            Self::ScreenWindow { .. } => CallKind::ScreenWindow,
            Self::CropWindow { .. } => CallKind::CropWindow,
            Self::Projection { .. } => CallKind::Projection,
            Self::Clipping { .. } => CallKind::Clipping,
            Self::DepthOfField { .. } => CallKind::DepthOfField,
            Self::Shutter { .. } => CallKind::Shutter,
            Self::PixelVariance { .. } => CallKind::PixelVariance,
            Self::PixelSamples { .. } => CallKind::PixelSamples,
            Self::PixelFilter { .. } => CallKind::PixelFilter,
            Self::Exposure { .. } => CallKind::Exposure,
            Self::Imager { .. } => CallKind::Imager,
            Self::Quantize { .. } => CallKind::Quantize,
            Self::Display { .. } => CallKind::Display,
            Self::Hider { .. } => CallKind::Hider,
            Self::ColorSamples { .. } => CallKind::ColorSamples,
            Self::RelativeDetail { .. } => CallKind::RelativeDetail,
            Self::Option { .. } => CallKind::Option,
            Self::Color { .. } => CallKind::Color,
            Self::Opacity { .. } => CallKind::Opacity,
            Self::TextureCoordinates { .. } => CallKind::TextureCoordinates,
            Self::LightSource { .. } => CallKind::LightSource,
            Self::AreaLightSource { .. } => CallKind::AreaLightSource,
            Self::Illuminate { .. } => CallKind::Illuminate,
            Self::Surface { .. } => CallKind::Surface,
            Self::Atmosphere { .. } => CallKind::Atmosphere,
            Self::Interior { .. } => CallKind::Interior,
            Self::Exterior { .. } => CallKind::Exterior,
            Self::Displacement { .. } => CallKind::Displacement,
            Self::Deformation { .. } => CallKind::Deformation,
            Self::ShadingRate { .. } => CallKind::ShadingRate,
            Self::ShadingInterpolation { .. } => CallKind::ShadingInterpolation,
            Self::Matte { .. } => CallKind::Matte,
            Self::Bound { .. } => CallKind::Bound,
            Self::Detail { .. } => CallKind::Detail,
            Self::DetailRange { .. } => CallKind::DetailRange,
            Self::GeometricApproximation { .. } => CallKind::GeometricApproximation,
            Self::Orientation { .. } => CallKind::Orientation,
            Self::ReverseOrientation => CallKind::ReverseOrientation,
            Self::Sides { .. } => CallKind::Sides,
            Self::Basis { .. } => CallKind::Basis,
            Self::TrimCurve { .. } => CallKind::TrimCurve,
            Self::Attribute { .. } => CallKind::Attribute,
            Self::Identity => CallKind::Identity,
            Self::Transform { .. } => CallKind::Transform,
            Self::ConcatTransform { .. } => CallKind::ConcatTransform,
            Self::Perspective { .. } => CallKind::Perspective,
            Self::Translate { .. } => CallKind::Translate,
            Self::Rotate { .. } => CallKind::Rotate,
            Self::Scale { .. } => CallKind::Scale,
            Self::Skew { .. } => CallKind::Skew,
            Self::CoordinateSystem { .. } => CallKind::CoordinateSystem,
            Self::CoordSysTransform { .. } => CallKind::CoordSysTransform,
            Self::Sphere { .. } => CallKind::Sphere,
            Self::Cone { .. } => CallKind::Cone,
            Self::Cylinder { .. } => CallKind::Cylinder,
            Self::Hyperboloid { .. } => CallKind::Hyperboloid,
            Self::Paraboloid { .. } => CallKind::Paraboloid,
            Self::Disk { .. } => CallKind::Disk,
            Self::Torus { .. } => CallKind::Torus,
            Self::Polygon { .. } => CallKind::Polygon,
            Self::GeneralPolygon { .. } => CallKind::GeneralPolygon,
            Self::PointsPolygons { .. } => CallKind::PointsPolygons,
            Self::PointsGeneralPolygons { .. } => CallKind::PointsGeneralPolygons,
            Self::Patch { .. } => CallKind::Patch,
            Self::PatchMesh { .. } => CallKind::PatchMesh,
            Self::NuPatch { .. } => CallKind::NuPatch,
            Self::Geometry { .. } => CallKind::Geometry,
            Self::MakeTexture { .. } => CallKind::MakeTexture,
            Self::MakeBump { .. } => CallKind::MakeBump,
            Self::MakeLatLongEnvironment { .. } => CallKind::MakeLatLongEnvironment,
            Self::MakeCubeFaceEnvironment { .. } => CallKind::MakeCubeFaceEnvironment,
            Self::MakeShadow { .. } => CallKind::MakeShadow,
        }
    }

    /// A stable lowercase name for diagnostics and export.
    #[must_use]
    pub fn name(&self) -> &'static str {
        CallKind::name(self.kind())
    }
}

impl CallKind {
    /// A stable lowercase name for diagnostics and export.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::End => "end",
            Self::Context => "context",
            Self::GetContext => "get_context",
            Self::Declare => "declare",
            Self::ErrorHandler => "error_handler",
            Self::Synchronize => "synchronize",
            Self::ArchiveRecord => "archive_record",
            Self::ReadArchive => "read_archive",
            Self::FrameBegin => "frame_begin",
            Self::FrameEnd => "frame_end",
            Self::WorldBegin => "world_begin",
            Self::WorldEnd => "world_end",
            Self::AttributeBegin => "attribute_begin",
            Self::AttributeEnd => "attribute_end",
            Self::TransformBegin => "transform_begin",
            Self::TransformEnd => "transform_end",
            Self::SolidBegin => "solid_begin",
            Self::SolidEnd => "solid_end",
            Self::ObjectBegin => "object_begin",
            Self::ObjectEnd => "object_end",
            Self::ObjectInstance => "object_instance",
            Self::MotionBegin => "motion_begin",
            Self::MotionEnd => "motion_end",
            Self::Format => "format",
            Self::FrameAspectRatio => "frame_aspect_ratio",
            Self::ScreenWindow => "screen_window",
            Self::CropWindow => "crop_window",
            Self::Projection => "projection",
            Self::Clipping => "clipping",
            Self::DepthOfField => "depth_of_field",
            Self::Shutter => "shutter",
            Self::PixelVariance => "pixel_variance",
            Self::PixelSamples => "pixel_samples",
            Self::PixelFilter => "pixel_filter",
            Self::Exposure => "exposure",
            Self::Imager => "imager",
            Self::Quantize => "quantize",
            Self::Display => "display",
            Self::Hider => "hider",
            Self::ColorSamples => "color_samples",
            Self::RelativeDetail => "relative_detail",
            Self::Option => "option",
            Self::Color => "color",
            Self::Opacity => "opacity",
            Self::TextureCoordinates => "texture_coordinates",
            Self::LightSource => "light_source",
            Self::AreaLightSource => "area_light_source",
            Self::Illuminate => "illuminate",
            Self::Surface => "surface",
            Self::Atmosphere => "atmosphere",
            Self::Interior => "interior",
            Self::Exterior => "exterior",
            Self::Displacement => "displacement",
            Self::Deformation => "deformation",
            Self::ShadingRate => "shading_rate",
            Self::ShadingInterpolation => "shading_interpolation",
            Self::Matte => "matte",
            Self::Bound => "bound",
            Self::Detail => "detail",
            Self::DetailRange => "detail_range",
            Self::GeometricApproximation => "geometric_approximation",
            Self::Orientation => "orientation",
            Self::ReverseOrientation => "reverse_orientation",
            Self::Sides => "sides",
            Self::Basis => "basis",
            Self::TrimCurve => "trim_curve",
            Self::Attribute => "attribute",
            Self::Identity => "identity",
            Self::Transform => "transform",
            Self::ConcatTransform => "concat_transform",
            Self::Perspective => "perspective",
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::Skew => "skew",
            Self::CoordinateSystem => "coordinate_system",
            Self::CoordSysTransform => "coord_sys_transform",
            Self::Sphere => "sphere",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Hyperboloid => "hyperboloid",
            Self::Paraboloid => "paraboloid",
            Self::Disk => "disk",
            Self::Torus => "torus",
            Self::Polygon => "polygon",
            Self::GeneralPolygon => "general_polygon",
            Self::PointsPolygons => "points_polygons",
            Self::PointsGeneralPolygons => "points_general_polygons",
            Self::Patch => "patch",
            Self::PatchMesh => "patch_mesh",
            Self::NuPatch => "nu_patch",
            Self::Geometry => "geometry",
            Self::MakeTexture => "make_texture",
            Self::MakeBump => "make_bump",
            Self::MakeLatLongEnvironment => "make_lat_long_environment",
            Self::MakeCubeFaceEnvironment => "make_cube_face_environment",
            Self::MakeShadow => "make_shadow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trip_for_representative_calls() {
        assert_eq!(Call::WorldBegin.kind(), CallKind::WorldBegin);
        assert_eq!(
            Call::Sphere {
                radius: 1.0,
                zmin: -1.0,
                zmax: 1.0,
                thetamax: 360.0,
                params: alloc::vec::Vec::new(),
            }
            .kind(),
            CallKind::Sphere
        );
        assert_eq!(
            Call::Translate {
                dx: 0.0,
                dy: 0.0,
                dz: 0.0
            }
            .kind(),
            CallKind::Translate
        );
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(CallKind::WorldBegin.name(), "world_begin");
        assert_eq!(CallKind::MakeCubeFaceEnvironment.name(), "make_cube_face_environment");
        assert_eq!(
            Call::ReverseOrientation.name(),
            CallKind::ReverseOrientation.name()
        );
    }
}
