// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for strata call streams.
//!
//! This crate provides [`Backend`](strata_core::backend::Backend)
//! implementations for development and debugging:
//!
//! - [`pretty::PrettyBackend`] — human-readable one-line-per-call output.
//! - [`recorder::RecorderBackend`] — structured recording for asserting on
//!   dispatch order and content.
//! - [`json::export`] — writes a recording as a JSON array for diffing.

pub mod json;
pub mod pretty;
pub mod recorder;
