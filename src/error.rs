//! Error types for the pdf2tiff library.
//!
//! One enum, two failure domains:
//!
//! * **Configuration errors** ([`Pdf2TiffError::MissingInput`],
//!   [`Pdf2TiffError::EmptyArgs`]) — detected synchronously, before any
//!   process is spawned. They never reach the subprocess boundary.
//!
//! * **Execution errors** ([`Pdf2TiffError::LaunchFailed`],
//!   [`Pdf2TiffError::GhostscriptFailed`]) — surfaced as the error branch of
//!   the single-resolution async result once the child process has been
//!   attempted or has terminated abnormally.
//!
//! A Ghostscript run is all-or-nothing from the caller's perspective: there
//! are no retries and no partial success.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2tiff library.
#[derive(Debug, Error)]
pub enum Pdf2TiffError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// `exec()` was called before any input document was queued.
    #[error("No input file configured.\nCall .input(path) before exec().")]
    MissingInput,

    /// `exec_raw()` was called with an empty argument list.
    #[error("Empty argument list.\nexec_raw() needs at least one Ghostscript argument.")]
    EmptyArgs,

    // ── Execution errors ──────────────────────────────────────────────────
    /// The child process could not be started at all.
    #[error("Failed to launch '{program}': {source}\nIs Ghostscript installed and executable?")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Ghostscript terminated with a nonzero exit status, or was killed by
    /// a signal (`code: None`).
    ///
    /// Carries the raw exit code, the captured diagnostic stream, and the
    /// exact command line that failed, so the run can be reproduced by hand.
    #[error("Ghostscript failed (exit {code:?})\nCommand: {command_line}\n{stderr}")]
    GhostscriptFailed {
        code: Option<i32>,
        stderr: String,
        command_line: String,
    },

    // ── Discovery errors ──────────────────────────────────────────────────
    /// No Ghostscript executable could be resolved.
    #[error(transparent)]
    GhostscriptNotFound(#[from] gs_auto::GsAutoError),

    // ── Temp file errors ──────────────────────────────────────────────────
    /// Writing an in-memory document to a temporary file failed.
    #[error("Failed to stage input bytes in '{path}': {source}")]
    TempInputFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
