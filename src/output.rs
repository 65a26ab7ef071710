//! Result types for a completed Ghostscript run.

use serde::Serialize;

/// The success payload of a Ghostscript invocation.
///
/// Produced only for a zero exit status. Ghostscript writes its page output
/// to the files named by `-sOutputFile`; the captured streams here are the
/// interpreter's console chatter, kept for diagnostics and for callers that
/// drive `gs` in `-q`-less modes where stdout carries progress lines.
///
/// Serialisable so the CLI can emit a machine-readable run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExecOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured diagnostic stream. May be non-empty even on success —
    /// Ghostscript warns about recoverable document problems on stderr.
    pub stderr: String,
    /// Raw exit code (always `0` here; failures return an error instead).
    pub exit_code: i32,
    /// The exact command line that ran.
    pub command_line: String,
    /// Wall-clock duration of the child process.
    pub duration_ms: u64,
}
