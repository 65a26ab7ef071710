//! The Ghostscript option builder.
//!
//! [`Ghostscript`] accumulates typed configuration calls into ordered lists
//! of command-line flags and serialises them into the exact argument syntax
//! the `gs` interpreter expects. It performs no validation of flag *values*
//! beyond coercing them to text — the command-line contract belongs to
//! Ghostscript, and this builder reproduces it verbatim, per flag.
//!
//! # Design choice: three ordered lists
//!
//! Flags live in three containers with a fixed concatenation order:
//!
//! 1. `options` — every ordinary flag, in call order, duplicates included.
//! 2. `late_options` — flags that must sit *after* all ordinary flags and
//!    *before* the input paths. Today that is only the
//!    [`ram`](Ghostscript::ram) memory-threshold directive, whose `-c … -f`
//!    pair must immediately precede the input continuation.
//! 3. `inputs` — bare document paths, appended last.
//!
//! Merging the lists and sorting at assembly time would lose the caller's
//! ordering, which Ghostscript treats as significant.
//!
//! # Example
//!
//! ```rust
//! use pdf2tiff::Ghostscript;
//!
//! let gs = Ghostscript::new()
//!     .batch()
//!     .nopause()
//!     .quiet()
//!     .device(None)            // -sDEVICE=tiff24nc
//!     .resolution(600)         // -r600
//!     .output("page-%03d.tiff")
//!     .input("scan.pdf");
//!
//! assert_eq!(
//!     gs.command_line("gs"),
//!     "gs -dBATCH -dNOPAUSE -q -sDEVICE=tiff24nc -r600 \
//!      -sOutputFile=page-%03d.tiff scan.pdf"
//! );
//! ```

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Pdf2TiffError;

// ── Flag values ──────────────────────────────────────────────────────────

/// A scalar flag value, coerced to Ghostscript's textual syntax.
///
/// Several `-d` switches accept booleans or numbers. Callers may pass the
/// native Rust type or its string form interchangeably; both render to the
/// same flag text (`true` and `"true"` are indistinguishable downstream).
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Int(n) => write!(f, "{n}"),
            FlagValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Int(v)
    }
}

impl From<i32> for FlagValue {
    fn from(v: i32) -> Self {
        FlagValue::Int(v as i64)
    }
}

impl From<u32> for FlagValue {
    fn from(v: u32) -> Self {
        FlagValue::Int(v as i64)
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::Str(v.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::Str(v)
    }
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for a single Ghostscript invocation.
///
/// Every setter consumes and returns the builder, so calls chain. Repeated
/// calls append repeated flags — there is no deduplication, matching how the
/// interpreter itself reads its argument list left to right.
///
/// State survives [`exec`](Ghostscript::exec): running the same builder twice
/// re-runs the same accumulated command line.
#[derive(Debug, Default)]
pub struct Ghostscript {
    /// Ordinary flags, in call order.
    options: Vec<String>,
    /// Flags pinned between the ordinary flags and the input paths.
    late_options: Vec<String>,
    /// Input document paths, appended last.
    inputs: Vec<String>,
    /// Explicit interpreter path; when unset, discovery runs at exec time.
    program: Option<PathBuf>,
    /// Temp files backing `input_bytes`, kept alive as long as the builder.
    staged: Vec<NamedTempFile>,
}

impl Ghostscript {
    /// Creates a builder with no flags set.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Flag-only switches ───────────────────────────────────────────────

    /// `-dNOPAUSE` — do not pause between pages.
    pub fn nopause(mut self) -> Self {
        self.options.push("-dNOPAUSE".into());
        self
    }

    /// `-q` — suppress startup banner and informational chatter.
    pub fn quiet(mut self) -> Self {
        self.options.push("-q".into());
        self
    }

    /// `-dBATCH` — exit after the last file instead of entering the REPL.
    pub fn batch(mut self) -> Self {
        self.options.push("-dBATCH".into());
        self
    }

    /// `-dINTERPOLATE` — interpolate images during scaling.
    pub fn interpolate(mut self) -> Self {
        self.options.push("-dINTERPOLATE".into());
        self
    }

    // ── Valued switches with defaults ────────────────────────────────────

    /// `-sDEVICE=<name>` — output device. Default: `tiff24nc`.
    ///
    /// Pass `None` for the default, or any device name Ghostscript knows
    /// (`"jpeg"`, `"png16m"`, `"tiffg4"`, …). The name is not validated.
    pub fn device<'a>(mut self, name: impl Into<Option<&'a str>>) -> Self {
        let name = name.into().unwrap_or("tiff24nc");
        self.options.push(format!("-sDEVICE={name}"));
        self
    }

    /// `-r<dpi>` — rendering resolution. Default: `300`.
    pub fn resolution(mut self, dpi: impl Into<Option<u32>>) -> Self {
        let dpi = dpi.into().unwrap_or(300);
        self.options.push(format!("-r{dpi}"));
        self
    }

    /// Memory threshold for the interpreter's garbage collector.
    /// Default: `30000000` bytes.
    ///
    /// Emits the run-time directive `-c "<size> setvmthreshold" -f` into the
    /// *late* list: `-c` switches to PostScript input, so the directive must
    /// come after every ordinary flag, and the `-f` continuation marker must
    /// immediately precede the input paths.
    pub fn ram(mut self, size: impl Into<Option<u64>>) -> Self {
        let size = size.into().unwrap_or(30_000_000);
        self.late_options.push(format!("-c \"{size} setvmthreshold\""));
        self.late_options.push("-f".into());
        self
    }

    /// `-dAutoRotatePages=/<mode>` — page rotation policy. Default: `All`.
    ///
    /// The mode is a PostScript name literal (`None`, `All`, `PageByPage`),
    /// hence the `/` prefix in the emitted flag.
    pub fn auto_rotate_pages<'a>(mut self, mode: impl Into<Option<&'a str>>) -> Self {
        let mode = mode.into().unwrap_or("All");
        self.options.push(format!("-dAutoRotatePages=/{mode}"));
        self
    }

    // ── Page-range switches ──────────────────────────────────────────────

    /// `-dFirstPage=<n>` — first page to process (1-indexed).
    pub fn first_page(mut self, number: u32) -> Self {
        self.options.push(format!("-dFirstPage={number}"));
        self
    }

    /// `-dLastPage=<n>` — last page to process (1-indexed, inclusive).
    pub fn last_page(mut self, number: u32) -> Self {
        self.options.push(format!("-dLastPage={number}"));
        self
    }

    // ── Input / output ───────────────────────────────────────────────────

    /// Queues an input document. May be called repeatedly; documents are
    /// processed in queue order.
    pub fn input(mut self, path: impl Into<String>) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Queues an in-memory document by staging it in a temporary file.
    ///
    /// The file lives as long as the builder, so the path stays valid across
    /// repeated [`exec`](Ghostscript::exec) calls and is removed when the
    /// builder drops.
    pub fn input_bytes(mut self, bytes: &[u8]) -> Result<Self, Pdf2TiffError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("pdf2tiff-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| Pdf2TiffError::TempInputFailed {
                path: std::env::temp_dir(),
                source: e,
            })?;
        tmp.write_all(bytes)
            .map_err(|e| Pdf2TiffError::TempInputFailed {
                path: tmp.path().to_path_buf(),
                source: e,
            })?;
        self.inputs.push(tmp.path().to_string_lossy().into_owned());
        self.staged.push(tmp);
        debug!(
            "Staged {} input bytes ({} file(s) now staged)",
            bytes.len(),
            self.staged.len()
        );
        Ok(self)
    }

    /// `-sOutputFile=<path>` — output destination.
    ///
    /// A `%d`-style page-number pattern (`page-%03d.tiff`) is opaque to the
    /// builder and passed through verbatim for Ghostscript to expand.
    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.options.push(format!("-sOutputFile={}", path.into()));
        self
    }

    // ── Distiller parameters ─────────────────────────────────────────────

    /// `-dCompatibility=<version>` — PDF compatibility level, e.g. `"1.4"`.
    pub fn compatibility(mut self, version: impl Into<FlagValue>) -> Self {
        self.options.push(format!("-dCompatibility={}", version.into()));
        self
    }

    /// `-dPDFSETTINGS=<preset>` — distiller preset, e.g. `"/ebook"`.
    /// Passed through verbatim; no `/` is added.
    pub fn pdf_settings(mut self, preset: impl Into<String>) -> Self {
        self.options.push(format!("-dPDFSETTINGS={}", preset.into()));
        self
    }

    /// `-dAntiAliasColorImage=<bool>`
    pub fn anti_alias_color_image(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dAntiAliasColorImage={}", setting.into()));
        self
    }

    /// `-dAntiAliasGrayImage=<bool>`
    pub fn anti_alias_gray_image(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dAntiAliasGrayImage={}", setting.into()));
        self
    }

    /// `-dAntiAliasMonoImage=<bool>`
    pub fn anti_alias_mono_image(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dAntiAliasMonoImage={}", setting.into()));
        self
    }

    /// `-dAutoFilterColorImages=<bool>`
    pub fn auto_filter_color_images(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dAutoFilterColorImages={}", setting.into()));
        self
    }

    /// `-dAutoFilterGrayImages=<bool>`
    pub fn auto_filter_gray_images(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dAutoFilterGrayImages={}", setting.into()));
        self
    }

    /// `-dColorImageFilter=/<name>` — name literal, e.g. `DCTEncode`.
    pub fn color_image_filter(mut self, name: impl Into<String>) -> Self {
        self.options
            .push(format!("-dColorImageFilter=/{}", name.into()));
        self
    }

    /// `-dGrayImageFilter=/<name>` — name literal, e.g. `FlateEncode`.
    pub fn gray_image_filter(mut self, name: impl Into<String>) -> Self {
        self.options
            .push(format!("-dGrayImageFilter=/{}", name.into()));
        self
    }

    /// `-dDownsampleColorImages=<bool>`
    pub fn downsample_color_images(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dDownsampleColorImages={}", setting.into()));
        self
    }

    /// `-dDownsampleGrayImages=<bool>`
    pub fn downsample_gray_images(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dDownsampleGrayImages={}", setting.into()));
        self
    }

    /// `-dDownsampleMonoImages=<bool>`
    pub fn downsample_mono_images(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dDownsampleMonoImages={}", setting.into()));
        self
    }

    /// `-dColorConversionStrategy=/<name>` — name literal, e.g. `sRGB`.
    pub fn color_conversion_strategy(mut self, name: impl Into<String>) -> Self {
        self.options
            .push(format!("-dColorConversionStrategy=/{}", name.into()));
        self
    }

    /// `-dConvertCMYKImagesToRGB=<bool>`
    pub fn convert_cmyk_images_to_rgb(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dConvertCMYKImagesToRGB={}", setting.into()));
        self
    }

    /// `-dConvertImagesToIndexed=<bool>`
    pub fn convert_images_to_indexed(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dConvertImagesToIndexed={}", setting.into()));
        self
    }

    /// `-dUCRandBGInfo=/<mode>` — name literal, `Preserve` or `Remove`.
    pub fn ucr_and_bg_info(mut self, mode: impl Into<String>) -> Self {
        self.options.push(format!("-dUCRandBGInfo=/{}", mode.into()));
        self
    }

    /// `-dPreserveHalftoneInfo=<bool>`
    pub fn preserve_halftone_info(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dPreserveHalftoneInfo={}", setting.into()));
        self
    }

    /// `-dPreserveOPIComments=<bool>`
    pub fn preserve_opi_comments(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dPreserveOPIComments={}", setting.into()));
        self
    }

    /// `-dPreserveOverprintSettings=<bool>`
    pub fn preserve_overprint_settings(mut self, setting: impl Into<FlagValue>) -> Self {
        self.options
            .push(format!("-dPreserveOverprintSettings={}", setting.into()));
        self
    }

    /// Appends a raw flag token verbatim — the escape hatch for switches
    /// this builder has no setter for (`-dSAFER`, `-dTextAlphaBits=4`, …).
    pub fn raw_flag(mut self, token: impl Into<String>) -> Self {
        self.options.push(token.into());
        self
    }

    // ── Program override ─────────────────────────────────────────────────

    /// Uses an explicit Ghostscript executable instead of discovery.
    pub fn program(mut self, path: impl Into<PathBuf>) -> Self {
        self.program = Some(path.into());
        self
    }

    // ── Introspection / assembly ─────────────────────────────────────────

    /// Ordinary flags accumulated so far, in call order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Late flags (positioned after `options`, before `inputs`).
    pub fn late_options(&self) -> &[String] {
        &self.late_options
    }

    /// Queued input paths.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// The explicit interpreter path, if one was set.
    pub(crate) fn program_override(&self) -> Option<&PathBuf> {
        self.program.as_ref()
    }

    /// The full token sequence: ordinary flags, late flags, then inputs.
    pub fn args(&self) -> Vec<String> {
        let mut args =
            Vec::with_capacity(self.options.len() + self.late_options.len() + self.inputs.len());
        args.extend(self.options.iter().cloned());
        args.extend(self.late_options.iter().cloned());
        args.extend(self.inputs.iter().cloned());
        args
    }

    /// Assembles the command line: `<program> <flags…> <late flags…> <inputs…>`.
    ///
    /// Tokens are joined with single spaces and passed through literally; no
    /// quoting is added beyond what tokens already embed. Assembly is pure —
    /// repeated calls yield identical strings until a setter runs.
    pub fn command_line(&self, program: &str) -> String {
        let mut line = String::from(program);
        for token in self.args() {
            line.push(' ');
            line.push_str(&token);
        }
        line
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
