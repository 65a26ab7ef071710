//! # pdf2tiff
//!
//! Rasterise PDF documents to image sequences (TIFF by default) by driving
//! the [Ghostscript](https://www.ghostscript.com/) interpreter as a child
//! process.
//!
//! ## Why this crate?
//!
//! Ghostscript is the workhorse for PDF rasterisation, but its command line
//! is a minefield of `-dNAME=value` switches, PostScript name literals, and
//! order-sensitive `-c … -f` runtime directives. This crate wraps that
//! surface in a typed fluent builder: each setter appends the exact flag
//! token Ghostscript documents, in call order, and execution maps the
//! process exit status onto a `Result`. The rendering engine itself stays
//! out of process — nothing here parses PDF or encodes pixels.
//!
//! ## Invocation Overview
//!
//! ```text
//! Ghostscript::new()
//!  │
//!  ├─ 1. Configure  chained setters → ordered flag list (+ late list)
//!  ├─ 2. Validate   input queued? (fails fast, nothing spawned)
//!  ├─ 3. Discover   explicit program → GS_BIN → PATH (gs-auto)
//!  ├─ 4. Assemble   program + flags + late flags + inputs, space-joined
//!  ├─ 5. Run        child process, streams captured
//!  └─ 6. Resolve    exit 0 ⇒ ExecOutput   nonzero ⇒ GhostscriptFailed
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2tiff::Ghostscript;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = Ghostscript::new()
//!         .batch()
//!         .nopause()
//!         .quiet()
//!         .device(None)              // tiff24nc
//!         .resolution(300)
//!         .output("page-%03d.tiff")
//!         .input("document.pdf")
//!         .exec()
//!         .await?;
//!     eprintln!("done in {}ms", output.duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tiff` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2tiff = { version = "0.3", default-features = false }
//! ```
//!
//! ## Choosing a Device
//!
//! | Device | Output | Best for |
//! |--------|--------|----------|
//! | `tiff24nc` | 24-bit colour TIFF | Default — archival page images |
//! | `tiffg4`   | bilevel G4 TIFF    | Faxes, scanned text, smallest files |
//! | `png16m`   | 24-bit PNG         | Web display |
//! | `jpeg`     | JPEG               | Photographic pages |
//!
//! Any other device name Ghostscript knows is passed through unvalidated.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod command;
pub mod error;
pub mod exec;
pub mod output;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use command::{FlagValue, Ghostscript};
pub use error::Pdf2TiffError;
pub use exec::exec_raw;
pub use output::ExecOutput;

// Re-export discovery so callers can probe availability without a second
// dependency declaration.
pub use gs_auto::{ghostscript_version, is_ghostscript_available, locate_ghostscript, GsVersion};
