// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The external archive-parser collaborator.
//!
//! `read_archive` needs someone who can turn a path into calls. The
//! renderer owns an optional [`ArchiveSource`] and hands itself back to
//! it; the source re-enters the public call surface once per parsed
//! command. The renderer takes care of capture and caching around the
//! parse, the source only translates.

use alloc::string::String;

use thiserror::Error;

use crate::renderer::Renderer;

/// Errors an archive source can produce.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    /// The path does not name a readable archive.
    #[error("archive not found: {0}")]
    NotFound(String),
    /// The archive exists but could not be parsed.
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Archive path.
        path: String,
        /// What went wrong.
        message: String,
    },
}

/// Turns an archive path into calls on the renderer.
pub trait ArchiveSource {
    /// Parse the archive at `path`, issuing one public call per command.
    ///
    /// Errors surface at the `read_archive` site as `NoFile` (not found)
    /// or `Syntax` (parse failure); a partial parse leaves whatever state
    /// the issued calls produced.
    fn parse(&mut self, path: &str, ri: &mut Renderer) -> Result<(), ArchiveError>;
}
