//! Execution: validate, assemble, and run the accumulated command line.
//!
//! ## Why the platform shell?
//!
//! The builder's contract is a *single command-line string* — tokens joined
//! with spaces, quoting passed through literally (the `-c "<n>
//! setvmthreshold"` directive depends on it). Running the line through
//! `sh -c` / `cmd /C` keeps that contract byte-for-byte identical to typing
//! the command by hand; splitting the string back into argv would have to
//! re-implement the shell's quoting rules.
//!
//! ## Concurrency model
//!
//! One invocation spawns one child process and resolves exactly once —
//! success with the captured stdout, or failure with the diagnostic stream.
//! There is no timeout, no cancellation, and no retry. Builder state is only
//! read here, so concurrent executions of *different* builders are
//! independent; re-running the same builder re-runs the same snapshot.

use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::Ghostscript;
use crate::error::Pdf2TiffError;
use crate::output::ExecOutput;

impl Ghostscript {
    /// Runs the accumulated command line as a Ghostscript child process.
    ///
    /// Fails fast — synchronously, before any process is spawned — with
    /// [`Pdf2TiffError::MissingInput`] when no input document is queued.
    ///
    /// # Errors
    /// - [`Pdf2TiffError::MissingInput`] — no input queued
    /// - [`Pdf2TiffError::GhostscriptNotFound`] — discovery found no `gs`
    /// - [`Pdf2TiffError::LaunchFailed`] — the process could not start
    /// - [`Pdf2TiffError::GhostscriptFailed`] — nonzero or signalled exit
    pub async fn exec(&self) -> Result<ExecOutput, Pdf2TiffError> {
        if self.inputs().is_empty() {
            return Err(Pdf2TiffError::MissingInput);
        }

        let program = self.resolve_program()?;
        let line = self.command_line(&program);
        run_command_line(&program, &line).await
    }

    /// Blocking wrapper around [`exec`](Ghostscript::exec).
    ///
    /// Creates a temporary tokio runtime internally; use from synchronous
    /// callers only, never from inside an async context.
    pub fn exec_sync(&self) -> Result<ExecOutput, Pdf2TiffError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| Pdf2TiffError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.exec())
    }

    /// Resolves the interpreter: explicit override first, discovery second
    /// (discovery itself honours `GS_BIN` before searching `PATH`).
    fn resolve_program(&self) -> Result<String, Pdf2TiffError> {
        if let Some(p) = self.program_override() {
            return Ok(p.to_string_lossy().into_owned());
        }
        let path = gs_auto::locate_ghostscript()?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Runs a raw Ghostscript argument list, holding no builder state.
///
/// The stateless counterpart of [`Ghostscript::exec`]: callers assemble the
/// full flag list themselves and pass it in one piece. The interpreter is
/// resolved through discovery (`GS_BIN`, then `PATH`).
///
/// Fails fast with [`Pdf2TiffError::EmptyArgs`] — synchronously, spawning
/// nothing — when `args` is empty; an argument-less `gs` would drop into the
/// interactive interpreter and hang the caller forever.
pub async fn exec_raw<S: AsRef<str>>(args: &[S]) -> Result<ExecOutput, Pdf2TiffError> {
    if args.is_empty() {
        return Err(Pdf2TiffError::EmptyArgs);
    }

    let program = gs_auto::locate_ghostscript()?
        .to_string_lossy()
        .into_owned();

    let mut line = program.clone();
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }

    run_command_line(&program, &line).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Spawns the assembled line through the platform shell and maps the exit
/// status onto the result contract: zero ⇒ stdout payload, anything else ⇒
/// diagnostic-carrying error.
async fn run_command_line(program: &str, line: &str) -> Result<ExecOutput, Pdf2TiffError> {
    info!("Running Ghostscript: {line}");
    let start = Instant::now();

    let output = shell_command(line)
        .output()
        .await
        .map_err(|e| Pdf2TiffError::LaunchFailed {
            program: program.to_string(),
            source: e,
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(Pdf2TiffError::GhostscriptFailed {
            code: output.status.code(),
            stderr,
            command_line: line.to_string(),
        });
    }

    if !stderr.is_empty() {
        warn!("Ghostscript succeeded with warnings:\n{stderr}");
    }
    debug!(
        "Ghostscript finished in {duration_ms}ms ({} bytes stdout)",
        stdout.len()
    );

    Ok(ExecOutput {
        stdout,
        stderr,
        exit_code: 0,
        command_line: line.to_string(),
        duration_ms,
    })
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exec_without_input_is_synchronous_missing_input() {
        let gs = Ghostscript::new().batch().nopause().device(None);
        let err = gs.exec().await.unwrap_err();
        assert!(matches!(err, Pdf2TiffError::MissingInput));
    }

    #[tokio::test]
    async fn exec_raw_rejects_empty_args() {
        let err = exec_raw::<&str>(&[]).await.unwrap_err();
        assert!(matches!(err, Pdf2TiffError::EmptyArgs));
    }

    #[test]
    fn exec_sync_reports_missing_input_too() {
        let gs = Ghostscript::new().quiet();
        let err = gs.exec_sync().unwrap_err();
        assert!(matches!(err, Pdf2TiffError::MissingInput));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn explicit_program_override_skips_discovery() {
        // `true` exits 0 and ignores its arguments, so a successful run
        // proves the override was used verbatim (no `gs` needed on PATH).
        let gs = Ghostscript::new().program("true").quiet().input("ignored.pdf");
        let out = gs.exec().await.expect("`true` always exits 0");
        assert_eq!(out.exit_code, 0);
        assert!(out.command_line.starts_with("true "));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_maps_to_ghostscript_failed() {
        let gs = Ghostscript::new().program("false").input("ignored.pdf");
        let err = gs.exec().await.unwrap_err();
        match err {
            Pdf2TiffError::GhostscriptFailed { code, command_line, .. } => {
                assert_eq!(code, Some(1));
                assert!(command_line.contains("ignored.pdf"));
            }
            other => panic!("expected GhostscriptFailed, got {other:?}"),
        }
    }
}
