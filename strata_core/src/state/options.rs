// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-scoped option set.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::param::ParamList;
use crate::transform::Mat4;

/// The camera projection selected by `projection`.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// Projection name, `"orthographic"` or `"perspective"` or custom.
    pub name: String,
    /// Projection parameters (`fov` for perspective).
    pub params: ParamList,
}

/// Quantization for one output type.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantization {
    /// Value mapped to 1.0; 0 leaves output in floating point.
    pub one: i32,
    /// Minimum quantized value.
    pub min: i32,
    /// Maximum quantized value.
    pub max: i32,
    /// Dither amplitude.
    pub dither: f64,
}

/// One display output.
#[derive(Clone, Debug, PartialEq)]
pub struct Display {
    /// Output name.
    pub name: String,
    /// Display driver.
    pub kind: String,
    /// Channels written to this output.
    pub mode: String,
    /// Driver parameters.
    pub params: ParamList,
}

/// Everything saved and restored by `frame_begin` / `frame_end`.
///
/// Unset camera options stay `None` until `world_begin`, when the
/// interface defaults are derived from whatever was supplied; deriving at
/// the last moment keeps the documented interactions (format vs. frame
/// aspect vs. screen window) order-independent.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSet {
    /// Raster resolution and pixel aspect, from `format`.
    pub format: Option<(i32, i32, f64)>,
    /// Frame aspect ratio, if set explicitly.
    pub frame_aspect_ratio: Option<f64>,
    /// Screen window in screen space, if set explicitly.
    pub screen_window: Option<Rect>,
    /// Crop window as fractions of the raster.
    pub crop_window: Rect,
    /// Camera projection; `None` until set, orthographic at `world_begin`.
    pub projection: Option<Projection>,
    /// World-to-camera part of the CTM captured at `projection`.
    pub pre_camera: Mat4,
    /// Near and far clipping planes.
    pub clipping: (f64, f64),
    /// Depth of field, `(fstop, focal_length, focal_distance)`.
    pub depth_of_field: Option<(f64, f64, f64)>,
    /// Shutter open and close times.
    pub shutter: (f64, f64),
    /// Acceptable pixel variance.
    pub pixel_variance: Option<f64>,
    /// Pixel sampling rates.
    pub pixel_samples: (f64, f64),
    /// Pixel filter name and support widths.
    pub pixel_filter: (String, f64, f64),
    /// Exposure gain and gamma.
    pub exposure: (f64, f64),
    /// Imager shader.
    pub imager: Option<(String, ParamList)>,
    /// Quantization by output type.
    pub quantize: BTreeMap<String, Quantization>,
    /// Display outputs, in declaration order.
    pub displays: Vec<Display>,
    /// Hidden-surface algorithm and its parameters.
    pub hider: (String, ParamList),
    /// Number of color samples per color value.
    pub color_samples: usize,
    /// Color-sample conversion basis, `(from, to)`.
    pub color_basis: Option<(Vec<f64>, Vec<f64>)>,
    /// Relative detail scale.
    pub relative_detail: f64,
    /// Implementation-specific options by group name.
    pub user: BTreeMap<String, ParamList>,
}

impl OptionSet {
    /// The interface defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: None,
            frame_aspect_ratio: None,
            screen_window: None,
            crop_window: Rect::new(0.0, 0.0, 1.0, 1.0),
            projection: None,
            pre_camera: Mat4::IDENTITY,
            clipping: (f64::EPSILON, f64::INFINITY),
            depth_of_field: None,
            shutter: (0.0, 0.0),
            pixel_variance: None,
            pixel_samples: (2.0, 2.0),
            pixel_filter: (String::from("gaussian"), 2.0, 2.0),
            exposure: (1.0, 1.0),
            imager: None,
            quantize: BTreeMap::new(),
            displays: Vec::new(),
            hider: (String::from("hidden"), Vec::new()),
            color_samples: 3,
            color_basis: None,
            relative_detail: 1.0,
            user: BTreeMap::new(),
        }
    }

    /// Add a display, replacing the list unless `name` starts with `+`.
    pub fn add_display(&mut self, display: Display) {
        let mut display = display;
        if let Some(rest) = display.name.strip_prefix('+') {
            display.name = String::from(rest);
            self.displays.push(display);
        } else {
            self.displays.clear();
            self.displays.push(display);
        }
    }
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_interface() {
        let o = OptionSet::new();
        assert_eq!(o.crop_window, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(o.pixel_filter.0, "gaussian");
        assert_eq!(o.hider.0, "hidden");
        assert_eq!(o.color_samples, 3);
        assert!(o.projection.is_none());
    }

    #[test]
    fn display_plus_prefix_appends() {
        let mut o = OptionSet::new();
        o.add_display(Display {
            name: String::from("out.tiff"),
            kind: String::from("file"),
            mode: String::from("rgba"),
            params: Vec::new(),
        });
        o.add_display(Display {
            name: String::from("+depth.tiff"),
            kind: String::from("file"),
            mode: String::from("z"),
            params: Vec::new(),
        });
        assert_eq!(o.displays.len(), 2);
        assert_eq!(o.displays[1].name, "depth.tiff");

        o.add_display(Display {
            name: String::from("replace.tiff"),
            kind: String::from("framebuffer"),
            mode: String::from("rgb"),
            params: Vec::new(),
        });
        assert_eq!(o.displays.len(), 1);
        assert_eq!(o.displays[0].name, "replace.tiff");
    }
}
