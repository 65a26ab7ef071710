//! # gs-auto
//!
//! Locate and probe a [Ghostscript](https://www.ghostscript.com/) executable
//! at runtime, so that users of `pdf2tiff` do not need to tell the library
//! where `gs` lives on every platform.
//!
//! ## How it works
//!
//! On first call to [`locate_ghostscript`]:
//!
//! 1. Checks the `GS_BIN` environment variable. If set and the file exists,
//!    that path wins.
//! 2. Otherwise walks every directory in `PATH` looking for the platform
//!    candidate names (`gs` on unix; `gswin64c.exe`, `gswin32c.exe`, `gs.exe`
//!    on Windows).
//!
//! Subsequent calls skip the search entirely — the resolved path is cached
//! for the process lifetime.
//!
//! Unlike bundled rendering engines, Ghostscript is not redistributable as a
//! single drop-in file, so this crate only discovers an existing install; it
//! never downloads one.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gs_auto::{locate_ghostscript, ghostscript_version};
//!
//! let gs = locate_ghostscript().expect("Ghostscript not installed");
//! let version = ghostscript_version(&gs).expect("probe failed");
//! eprintln!("using {} ({}.{})", gs.display(), version.major, version.minor);
//! ```
//!
//! ## Environment variable overrides
//!
//! - `GS_BIN` — path to an existing Ghostscript executable; skips the
//!   `PATH` search.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use thiserror::Error;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by gs-auto operations.
#[derive(Error, Debug)]
pub enum GsAutoError {
    /// No Ghostscript executable could be found.
    #[error(
        "No Ghostscript executable found (tried: {tried})\n\n\
Install Ghostscript and make sure it is on PATH, or set\n\
GS_BIN=/path/to/gs to use an existing copy.\n\
  • Debian/Ubuntu:  apt install ghostscript\n\
  • macOS:          brew install ghostscript\n\
  • Windows:        https://ghostscript.com/releases/\n"
    )]
    NotFound { tried: String },

    /// The executable exists but running `--version` failed.
    #[error("Failed to probe Ghostscript at '{path}': {reason}")]
    Probe { path: PathBuf, reason: String },

    /// `gs --version` produced output that does not look like a version.
    #[error("Unparseable Ghostscript version output: {output:?}")]
    UnparseableVersion { output: String },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

/// Candidate executable names, most specific first.
///
/// Windows installs the console interpreter as `gswin64c.exe` / `gswin32c.exe`;
/// the bare `gs` name only appears when MSYS-style shims are installed.
#[cfg(windows)]
const CANDIDATES: &[&str] = &["gswin64c.exe", "gswin32c.exe", "gs.exe"];

#[cfg(not(windows))]
const CANDIDATES: &[&str] = &["gs"];

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns `true` if a Ghostscript executable can be resolved without error.
///
/// Also returns `true` when `GS_BIN` points to an existing file.
pub fn is_ghostscript_available() -> bool {
    locate_ghostscript().is_ok()
}

/// Locates the Ghostscript executable.
///
/// Resolution order:
///
/// 1. `GS_BIN` environment variable (must name an existing file).
/// 2. Platform candidate names searched across every `PATH` directory.
///
/// # Thread safety
///
/// Safe to call from multiple threads simultaneously; the search happens
/// only once per process lifetime.
pub fn locate_ghostscript() -> Result<PathBuf, GsAutoError> {
    // Fast path: already resolved in this process.
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = resolve()?;

    // Best-effort cache in the OnceLock (ignore race; both will succeed).
    let _ = RESOLVED_PATH.set(path.clone());

    Ok(path)
}

/// A Ghostscript release version as reported by `gs --version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GsVersion {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for GsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Runs `<gs> --version` and parses the reported release.
///
/// Ghostscript prints a bare `major.minor` line (e.g. `10.03`) on stdout.
pub fn ghostscript_version(path: &Path) -> Result<GsVersion, GsAutoError> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .map_err(|e| GsAutoError::Probe {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GsAutoError::Probe {
            path: path.to_path_buf(),
            reason: format!("exit status {}", output.status),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    parse_version(text.trim())
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn resolve() -> Result<PathBuf, GsAutoError> {
    // 1. Environment variable override.
    if let Ok(env_path) = std::env::var("GS_BIN") {
        let p = PathBuf::from(&env_path);
        if p.exists() {
            return Ok(p);
        }
        // Fall through: env var set but file missing → still search PATH.
        eprintln!("gs-auto: GS_BIN '{env_path}' not found; searching PATH …");
    }

    // 2. PATH search over platform candidates.
    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            for name in CANDIDATES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
    }

    Err(GsAutoError::NotFound {
        tried: CANDIDATES.join(", "),
    })
}

/// Parses a `major.minor` version line.
fn parse_version(line: &str) -> Result<GsVersion, GsAutoError> {
    let mut parts = line.split('.');
    let major = parts.next().and_then(|s| s.trim().parse::<u32>().ok());
    let minor = parts.next().and_then(|s| s.trim().parse::<u32>().ok());

    match (major, minor) {
        (Some(major), Some(minor)) => Ok(GsVersion { major, minor }),
        _ => Err(GsAutoError::UnparseableVersion {
            output: line.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_nonempty() {
        assert!(!CANDIDATES.is_empty());
    }

    #[test]
    fn parse_plain_version() {
        let v = parse_version("10.03").unwrap();
        assert_eq!(v, GsVersion { major: 10, minor: 3 });
        assert_eq!(v.to_string(), "10.03");
    }

    #[test]
    fn parse_three_part_version() {
        // Some builds report a patch level; the trailing part is ignored.
        let v = parse_version("9.56.1").unwrap();
        assert_eq!(v.major, 9);
        assert_eq!(v.minor, 56);
    }

    #[test]
    fn parse_garbage_is_error() {
        assert!(matches!(
            parse_version("GPL Ghostscript"),
            Err(GsAutoError::UnparseableVersion { .. })
        ));
        assert!(parse_version("").is_err());
    }

    #[test]
    fn not_found_message_names_candidates() {
        let e = GsAutoError::NotFound {
            tried: CANDIDATES.join(", "),
        };
        assert!(e.to_string().contains("GS_BIN"));
    }
}
