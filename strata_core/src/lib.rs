// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core session engine for the Strata scene-description interface.
//!
//! `strata_core` implements the stateful call surface a modeler drives to
//! describe frames to a renderer: hierarchical graphics state, validated
//! block nesting, macro recording and replay, and dispatch to a pluggable
//! backend. It is `no_std` compatible (with `alloc`); rendering itself is
//! someone else's job — the crate ends where dispatch begins.
//!
//! # Architecture
//!
//! Every call flows through the same pipeline inside [`Renderer`]:
//!
//! ```text
//!   Renderer::<call>() ──► capture ──► validate ──► mutate ──► dispatch
//!                             │           │            │           │
//!                             ▼           ▼            ▼           ▼
//!                        open Tape    validity     Session     Backend
//!                                    (Reporter ◄── on error)
//! ```
//!
//! **[`renderer`]** — The session manager: owns every [`Session`],
//! routes calls, runs the pipeline, and re-enters it for tape replay,
//! archive reads, and composite expansion.
//!
//! **[`session`]** — Per-context state: block and solid stacks,
//! attribute/option frames, the CTM stack, lights, coordinate systems,
//! tapes, and the re-entrancy depth counters.
//!
//! **[`state`]** — The attribute and option sets themselves, with the
//! interface defaults.
//!
//! **[`call`]** / **[`validity`]** — Owned call descriptors (the tape
//! record format) and the per-block-state legality matrix.
//!
//! **[`backend`]** — The [`Backend`](backend::Backend) dispatch trait,
//! every method defaulted, plus the read-only
//! [`GeomQuery`](backend::GeomQuery) surface for geometry producers.
//!
//! **[`tape`]** — Append-only call tapes backing retained objects and
//! cached archives.
//!
//! **[`transform`]** — Column-major 4×4 math and the CTM stack with
//! tracked inverses.
//!
//! **[`param`]** — Token declarations (`"varying color"` …) and the
//! name/value parameter lists every call carries.
//!
//! **[`error`]** — The reported error taxonomy, severities, and the
//! [`Reporter`](error::Reporter) collaborator. Errors are reported and
//! recovered locally; no call panics the caller.
//!
//! **[`archive`]** / **[`light`]** / **[`coord`]** — The archive-parser
//! collaborator, the session light table, and named coordinate systems.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//!
//! [`Renderer`]: renderer::Renderer
//! [`Session`]: session::Session

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod archive;
pub mod backend;
pub mod call;
pub mod coord;
pub mod error;
pub mod light;
pub mod param;
pub mod renderer;
pub mod session;
pub mod state;
pub mod tape;
pub mod transform;
pub mod validity;

pub use renderer::Renderer;
