// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles and scenario coverage for strata sessions.
//!
//! The doubles here share their observations through `Rc<RefCell<..>>`
//! handles, so a test can hand ownership to a [`Renderer`] and still read
//! what the renderer dispatched:
//!
//! - [`CountingBackend`] — logs the calls the scenarios assert on, with an
//!   optional light-handle remap to exercise handle resolution.
//! - [`CollectingReporter`] — collects every diagnostic code and severity.
//! - [`ScriptedArchive`] — an [`ArchiveSource`] that replays canned call
//!   scripts and counts how often each archive is parsed.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use strata_core::Renderer;
use strata_core::archive::{ArchiveError, ArchiveSource};
use strata_core::backend::Backend;
use strata_core::error::{ErrorCode, Reporter, Severity};
use strata_core::light::{LightId, LightRecord};
use strata_core::param::ParamList;

// -- CountingBackend --

/// What a [`CountingBackend`] observed.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Names of observed calls, in dispatch order.
    pub calls: Vec<&'static str>,
    /// Every `illuminate` dispatch, with its external handle.
    pub illuminates: Vec<(LightId, bool)>,
    /// Every `orientation_flipped` dispatch.
    pub flips: Vec<bool>,
    /// External handles returned from `light_source`.
    pub lights: Vec<LightId>,
}

impl EventLog {
    /// How many times `name` was dispatched.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| **c == name).count()
    }
}

/// A [`Backend`] that logs the calls scenario tests assert on.
///
/// Only a subset of the trait is overridden; everything else stays a
/// no-op. A nonzero `light_offset` remaps light handles the way a real
/// backend with its own handle space would.
#[derive(Clone, Debug, Default)]
pub struct CountingBackend {
    log: Rc<RefCell<EventLog>>,
    light_offset: u32,
}

impl CountingBackend {
    /// Creates a backend with identity light handles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that returns `LightId(id + offset)` from
    /// `light_source`.
    #[must_use]
    pub fn with_light_offset(offset: u32) -> Self {
        Self {
            log: Rc::default(),
            light_offset: offset,
        }
    }

    /// A shared handle onto the log; survives handing the backend to a
    /// renderer.
    #[must_use]
    pub fn log(&self) -> Rc<RefCell<EventLog>> {
        Rc::clone(&self.log)
    }

    fn push(&self, name: &'static str) {
        self.log.borrow_mut().calls.push(name);
    }
}

impl Backend for CountingBackend {
    fn synchronize(&mut self, _token: &str) {
        self.push("synchronize");
    }
    fn read_archive(&mut self, _name: &str, _params: &ParamList) {
        self.push("read_archive");
    }
    fn world_begin(&mut self) {
        self.push("world_begin");
    }
    fn world_end(&mut self) {
        self.push("world_end");
    }
    fn attribute_begin(&mut self) {
        self.push("attribute_begin");
    }
    fn attribute_end(&mut self) {
        self.push("attribute_end");
    }
    fn object_instance(&mut self, _handle: strata_core::session::ObjectId) {
        self.push("object_instance");
    }
    fn light_source(&mut self, id: LightId, _light: &LightRecord) -> LightId {
        self.push("light_source");
        let external = LightId(id.0 + self.light_offset);
        self.log.borrow_mut().lights.push(external);
        external
    }
    fn illuminate(&mut self, light: LightId, on: bool) {
        self.push("illuminate");
        self.log.borrow_mut().illuminates.push((light, on));
    }
    fn orientation_flipped(&mut self, reversed: bool) {
        self.push("orientation_flipped");
        self.log.borrow_mut().flips.push(reversed);
    }
    fn translate(&mut self, _dx: f64, _dy: f64, _dz: f64) {
        self.push("translate");
    }
    fn sphere(
        &mut self,
        _radius: f64,
        _zmin: f64,
        _zmax: f64,
        _thetamax: f64,
        _params: &ParamList,
    ) {
        self.push("sphere");
    }
    fn patch(&mut self, _kind: &str, _params: &ParamList) {
        self.push("patch");
    }
    fn geometry(&mut self, _name: &str, _params: &ParamList) {
        self.push("geometry");
    }
}

// -- CollectingReporter --

/// A [`Reporter`] that collects every diagnostic.
#[derive(Clone, Debug, Default)]
pub struct CollectingReporter {
    log: Rc<RefCell<Vec<(ErrorCode, Severity)>>>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle onto the collected diagnostics.
    #[must_use]
    pub fn log(&self) -> Rc<RefCell<Vec<(ErrorCode, Severity)>>> {
        Rc::clone(&self.log)
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, code: ErrorCode, severity: Severity, _message: &str) {
        self.log.borrow_mut().push((code, severity));
    }
}

// -- ScriptedArchive --

/// One canned command in a [`ScriptedArchive`] script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptedCall {
    /// A full sphere of the given radius.
    Sphere(f64),
    /// A translation.
    Translate(f64, f64, f64),
    /// Opens an attribute block.
    AttributeBegin,
    /// Closes an attribute block.
    AttributeEnd,
    /// An unparsable token; the parse fails here.
    Garbage,
}

/// An [`ArchiveSource`] that serves canned scripts by name.
#[derive(Debug, Default)]
pub struct ScriptedArchive {
    scripts: BTreeMap<String, Vec<ScriptedCall>>,
    parses: Rc<RefCell<BTreeMap<String, usize>>>,
}

impl ScriptedArchive {
    /// Creates a source with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the script served for `name`.
    pub fn script(&mut self, name: &str, calls: Vec<ScriptedCall>) {
        self.scripts.insert(String::from(name), calls);
    }

    /// A shared handle onto the per-archive parse counts.
    #[must_use]
    pub fn parses(&self) -> Rc<RefCell<BTreeMap<String, usize>>> {
        Rc::clone(&self.parses)
    }
}

impl ArchiveSource for ScriptedArchive {
    fn parse(&mut self, path: &str, ri: &mut Renderer) -> Result<(), ArchiveError> {
        let Some(script) = self.scripts.get(path).cloned() else {
            return Err(ArchiveError::NotFound(String::from(path)));
        };
        *self
            .parses
            .borrow_mut()
            .entry(String::from(path))
            .or_insert(0) += 1;
        for call in script {
            match call {
                ScriptedCall::Sphere(r) => ri.sphere(r, -r, r, 360.0, ParamList::new()),
                ScriptedCall::Translate(dx, dy, dz) => ri.translate(dx, dy, dz),
                ScriptedCall::AttributeBegin => ri.attribute_begin(),
                ScriptedCall::AttributeEnd => ri.attribute_end(),
                ScriptedCall::Garbage => {
                    return Err(ArchiveError::Parse {
                        path: String::from(path),
                        message: String::from("unrecognized token"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;
    use strata_core::param::Param;

    fn rig() -> (Renderer, Rc<RefCell<EventLog>>) {
        let backend = CountingBackend::new();
        let log = backend.log();
        (Renderer::with_backend(Box::new(backend)), log)
    }

    #[test]
    fn attribute_blocks_restore_state() {
        let (mut ri, _log) = rig();
        ri.begin();
        ri.world_begin();
        ri.shading_rate(2.0);
        ri.attribute_begin();
        ri.shading_rate(4.0);
        ri.sides(1);
        assert_eq!(ri.query().map(|q| q.shading_rate()), Some(4.0));
        assert_eq!(ri.query().map(|q| q.tesselation_rate()), Some(4.0));
        ri.attribute_end();
        assert_eq!(ri.query().map(|q| q.shading_rate()), Some(2.0));
        ri.world_end();
        ri.end();
    }

    #[test]
    fn lights_created_in_scope_turn_off_on_pop() {
        let backend = CountingBackend::with_light_offset(10);
        let log = backend.log();
        let mut ri = Renderer::with_backend(Box::new(backend));
        ri.begin();
        ri.world_begin();
        ri.attribute_begin();
        let light = ri.light_source("pointlight", vec![]).unwrap();
        assert_eq!(light, LightId(10), "backend remap must be visible");
        ri.attribute_end();
        // The light died with its scope; the pop turns it off.
        assert_eq!(log.borrow().illuminates, vec![(LightId(10), false)]);
        // The remapped handle still resolves for explicit control.
        ri.illuminate(light, true);
        assert_eq!(log.borrow().illuminates.len(), 2);
        assert_eq!(log.borrow().illuminates[1], (LightId(10), true));
    }

    #[test]
    fn unknown_light_handle_is_rejected() {
        let reporter = CollectingReporter::new();
        let errors = reporter.log();
        let (mut ri, log) = rig();
        ri.set_reporter(Box::new(reporter));
        ri.begin();
        ri.world_begin();
        ri.illuminate(LightId(99), true);
        assert!(
            errors
                .borrow()
                .iter()
                .any(|(code, _)| *code == ErrorCode::BadHandle),
            "expected a BadHandle diagnostic",
        );
        assert_eq!(log.borrow().illuminates.len(), 0);
    }

    #[test]
    fn object_instances_replay_their_tape() {
        let (mut ri, log) = rig();
        ri.begin();
        ri.world_begin();
        let handle = ri.object_begin().unwrap();
        ri.sphere(1.0, -1.0, 1.0, 360.0, vec![]);
        ri.object_end();
        // Definition bodies record without dispatching.
        assert_eq!(log.borrow().count("sphere"), 0);
        ri.translate(3.0, 0.0, 0.0);
        ri.object_instance(handle);
        ri.translate(3.0, 0.0, 0.0);
        ri.object_instance(handle);
        // Each replay lands under the CTM at its own instancing site: the
        // second translate reaches the backend before the second sphere.
        assert_eq!(
            log.borrow().calls[1..],
            ["translate", "object_instance", "sphere", "translate", "object_instance", "sphere"],
        );
    }

    #[test]
    fn reset_returns_session_to_defaults() {
        let (mut ri, _log) = rig();
        let id = ri.begin();
        ri.world_begin();
        ri.shading_rate(5.0);
        ri.synchronize("reset");
        assert_eq!(ri.get_context(), id);
        assert_eq!(ri.query().map(|q| q.shading_rate()), Some(1.0));
        // A second reset of an already-fresh session is a no-op.
        ri.synchronize("reset");
        assert_eq!(ri.query().map(|q| q.shading_rate()), Some(1.0));
        ri.world_begin();
        ri.world_end();
    }

    #[test]
    fn handedness_flip_dispatched_once_per_change() {
        let (mut ri, log) = rig();
        ri.begin();
        ri.world_begin();
        ri.scale(-1.0, 1.0, 1.0);
        assert_eq!(log.borrow().flips, vec![true]);
        ri.translate(1.0, 2.0, 3.0);
        ri.rotate(90.0, 0.0, 0.0, 1.0);
        assert_eq!(log.borrow().flips, vec![true], "rigid motions keep handedness");
        ri.scale(-1.0, 1.0, 1.0);
        assert_eq!(log.borrow().flips, vec![true, false]);
    }

    #[test]
    fn world_begin_unflips_a_flipped_pre_world_transform() {
        let (mut ri, log) = rig();
        ri.begin();
        ri.scale(-1.0, 1.0, 1.0);
        assert_eq!(log.borrow().flips, vec![true]);
        // The identity reset at the world boundary restores right-handed
        // space, and the backend hears about it.
        ri.world_begin();
        assert_eq!(log.borrow().flips, vec![true, false]);
        // Leaving the world re-enters the flipped pre-world state.
        ri.world_end();
        assert_eq!(log.borrow().flips, vec![true, false, true]);
        ri.end();
    }

    #[test]
    fn flip_state_restores_across_attribute_pop() {
        let (mut ri, log) = rig();
        ri.begin();
        ri.world_begin();
        ri.attribute_begin();
        ri.scale(1.0, -1.0, 1.0);
        ri.attribute_end();
        assert_eq!(log.borrow().flips, vec![true, false]);
    }

    #[test]
    fn frame_end_outside_frame_is_rejected() {
        let reporter = CollectingReporter::new();
        let errors = reporter.log();
        let (mut ri, _log) = rig();
        ri.set_reporter(Box::new(reporter));
        ri.begin();
        ri.frame_end();
        assert!(
            errors
                .borrow()
                .iter()
                .any(|(code, _)| *code == ErrorCode::Nesting),
            "expected a Nesting diagnostic",
        );
        // The session is untouched and still usable.
        ri.frame_begin(1);
        ri.world_begin();
        ri.world_end();
        ri.frame_end();
        ri.end();
    }

    #[test]
    fn archives_parse_once_then_replay() {
        let mut source = ScriptedArchive::new();
        source.script(
            "props",
            vec![
                ScriptedCall::AttributeBegin,
                ScriptedCall::Sphere(1.0),
                ScriptedCall::AttributeEnd,
            ],
        );
        let parses = source.parses();
        let (mut ri, log) = rig();
        ri.set_archive_source(Box::new(source));
        ri.begin();
        ri.world_begin();
        ri.read_archive("props", vec![]);
        ri.read_archive("props", vec![]);
        assert_eq!(parses.borrow().get("props"), Some(&1));
        assert_eq!(log.borrow().count("read_archive"), 2);
        assert_eq!(log.borrow().count("sphere"), 2);
    }

    #[test]
    fn uncached_archives_parse_every_read() {
        let mut source = ScriptedArchive::new();
        source.script("props", vec![ScriptedCall::Sphere(2.0)]);
        let parses = source.parses();
        let (mut ri, log) = rig();
        ri.set_archive_source(Box::new(source));
        ri.begin();
        ri.world_begin();
        ri.read_archive("props", vec![Param::ints("cache", &[0])]);
        ri.read_archive("props", vec![Param::ints("cache", &[0])]);
        assert_eq!(parses.borrow().get("props"), Some(&2));
        assert_eq!(log.borrow().count("sphere"), 2);
    }

    #[test]
    fn failed_parses_poison_the_cache() {
        let mut source = ScriptedArchive::new();
        source.script("bad", vec![ScriptedCall::Sphere(1.0), ScriptedCall::Garbage]);
        let parses = source.parses();
        let reporter = CollectingReporter::new();
        let errors = reporter.log();
        let (mut ri, log) = rig();
        ri.set_archive_source(Box::new(source));
        ri.set_reporter(Box::new(reporter));
        ri.begin();
        ri.world_begin();
        ri.read_archive("bad", vec![]);
        assert!(
            errors
                .borrow()
                .iter()
                .any(|(code, _)| *code == ErrorCode::Syntax),
            "expected a Syntax diagnostic",
        );
        // Calls before the parse error still executed.
        assert_eq!(log.borrow().count("sphere"), 1);
        // The second read hits the invalidated cache entry, not the source.
        ri.read_archive("bad", vec![]);
        assert_eq!(parses.borrow().get("bad"), Some(&1));
        assert!(
            errors
                .borrow()
                .iter()
                .any(|(code, _)| *code == ErrorCode::NoFile),
            "expected a NoFile diagnostic",
        );
        assert_eq!(log.borrow().count("sphere"), 1);
    }

    #[test]
    fn missing_archives_report_no_file() {
        let reporter = CollectingReporter::new();
        let errors = reporter.log();
        let (mut ri, _log) = rig();
        ri.set_archive_source(Box::new(ScriptedArchive::new()));
        ri.set_reporter(Box::new(reporter));
        ri.begin();
        ri.world_begin();
        ri.read_archive("nope", vec![]);
        assert!(
            errors
                .borrow()
                .iter()
                .any(|(code, _)| *code == ErrorCode::NoFile),
            "expected a NoFile diagnostic",
        );
    }

    #[test]
    fn cube_composite_expands_to_patches() {
        let (mut ri, log) = rig();
        ri.begin();
        ri.world_begin();
        ri.geometry("cube", vec![]);
        assert_eq!(log.borrow().count("patch"), 6);
        assert_eq!(log.borrow().count("geometry"), 0);
    }
}
