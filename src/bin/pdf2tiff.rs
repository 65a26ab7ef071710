//! CLI binary for pdf2tiff.
//!
//! A thin shim over the library crate that maps CLI flags onto the
//! [`Ghostscript`] builder and reports the run outcome.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2tiff::{ghostscript_version, locate_ghostscript, Ghostscript, Pdf2TiffError};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rasterise a whole document to 300-DPI colour TIFFs
  pdf2tiff document.pdf

  # One JPEG per page at 600 DPI
  pdf2tiff --device jpeg --resolution 600 -o page-%d.jpg document.pdf

  # Pages 2-9 only, bilevel G4 TIFF
  pdf2tiff --first-page 2 --last-page 9 --device tiffg4 scan.pdf

  # Raise the interpreter's GC threshold for a huge document
  pdf2tiff --ram 123456789 atlas.pdf

  # Several documents in one run (pages number continuously)
  pdf2tiff -o all-%04d.tiff a.pdf b.pdf c.pdf

  # Show the command line without running it
  pdf2tiff --print-command --device png16m document.pdf

  # Machine-readable run summary
  pdf2tiff --json document.pdf > run.json

  # Which Ghostscript would be used?
  pdf2tiff --gs-version

EXTRA FLAGS:
  Anything the builder has no setter for can be passed through verbatim:
    pdf2tiff --flag -dSAFER --flag -dTextAlphaBits=4 document.pdf

ENVIRONMENT VARIABLES:
  GS_BIN               Path to the Ghostscript executable; skips PATH search
  PDF2TIFF_OUTPUT      Default for --output
  PDF2TIFF_DEVICE      Default for --device
  PDF2TIFF_RESOLUTION  Default for --resolution

SETUP:
  Ghostscript must be installed and reachable:
    Debian/Ubuntu:  apt install ghostscript
    macOS:          brew install ghostscript
    Windows:        https://ghostscript.com/releases/  (gswin64c.exe)
"#;

/// Rasterise PDF documents to image sequences with Ghostscript.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tiff",
    version,
    about = "Rasterise PDF documents to image sequences with Ghostscript",
    long_about = "Rasterise PDF documents to image sequences (TIFF, PNG, JPEG, …) by driving \
the Ghostscript interpreter as a child process. The interpreter is located via GS_BIN or PATH.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file(s), processed in order.
    #[arg(required_unless_present = "gs_version")]
    inputs: Vec<String>,

    /// Output file, or a %d-style page pattern (e.g. page-%03d.tiff).
    #[arg(short, long, env = "PDF2TIFF_OUTPUT", default_value = "page-%03d.tiff")]
    output: String,

    /// Ghostscript output device.
    #[arg(
        short,
        long,
        env = "PDF2TIFF_DEVICE",
        default_value = "tiff24nc",
        long_help = "Ghostscript output device. Default: tiff24nc (24-bit colour TIFF).\n\
          Popular choices: tiffg4 (bilevel, smallest), png16m, jpeg."
    )]
    device: String,

    /// Rendering resolution in DPI.
    #[arg(short, long, env = "PDF2TIFF_RESOLUTION", default_value_t = 300)]
    resolution: u32,

    /// First page to process (1-indexed).
    #[arg(long)]
    first_page: Option<u32>,

    /// Last page to process (1-indexed, inclusive).
    #[arg(long)]
    last_page: Option<u32>,

    /// Interpreter memory threshold in bytes (GC tuning for large documents).
    #[arg(long)]
    ram: Option<u64>,

    /// Interpolate images during scaling.
    #[arg(long)]
    interpolate: bool,

    /// Page rotation policy: None, All, or PageByPage.
    #[arg(long)]
    auto_rotate: Option<String>,

    /// Distiller preset, e.g. /screen, /ebook, /prepress.
    #[arg(long)]
    pdf_settings: Option<String>,

    /// PDF compatibility level, e.g. 1.4.
    #[arg(long)]
    compatibility: Option<String>,

    /// Extra raw Ghostscript flag, passed through verbatim. Repeatable.
    #[arg(long = "flag", value_name = "TOKEN")]
    flags: Vec<String>,

    /// Explicit Ghostscript executable (overrides GS_BIN and PATH search).
    #[arg(long, value_name = "PATH")]
    gs: Option<PathBuf>,

    /// Let Ghostscript print its banner and progress chatter.
    #[arg(long)]
    no_quiet: bool,

    /// Assemble and print the command line, but do not run it.
    #[arg(long)]
    print_command: bool,

    /// Output a JSON run summary instead of plain text.
    #[arg(long, env = "PDF2TIFF_JSON")]
    json: bool,

    /// Print the discovered Ghostscript path and version, then exit.
    #[arg(long)]
    gs_version: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TIFF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TIFF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Version probe mode ───────────────────────────────────────────────
    if cli.gs_version {
        let path = locate_ghostscript().context("No Ghostscript executable found")?;
        let version = ghostscript_version(&path).context("Failed to probe Ghostscript")?;
        println!("{}  ({})", version, path.display());
        return Ok(());
    }

    // ── Build the invocation ─────────────────────────────────────────────
    let gs = build_invocation(&cli);

    if cli.print_command {
        let program = match cli.gs {
            Some(ref p) => p.to_string_lossy().into_owned(),
            None => locate_ghostscript()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "gs".to_string()),
        };
        println!("{}", gs.command_line(&program));
        return Ok(());
    }

    // ── Run ──────────────────────────────────────────────────────────────
    match gs.exec().await {
        Ok(out) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("Failed to serialise summary")?
                );
            } else {
                if !out.stdout.is_empty() {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    handle
                        .write_all(out.stdout.as_bytes())
                        .context("Failed to write to stdout")?;
                }
                if !cli.quiet {
                    eprintln!(
                        "✔ {} input(s) rasterised to '{}' in {}ms",
                        cli.inputs.len(),
                        cli.output,
                        out.duration_ms
                    );
                }
            }
            Ok(())
        }
        Err(Pdf2TiffError::GhostscriptFailed {
            code,
            stderr,
            command_line,
        }) => {
            eprintln!("Ghostscript failed (exit {code:?})");
            eprintln!("Command: {command_line}");
            if !stderr.is_empty() {
                eprintln!("{stderr}");
            }
            // Mirror the interpreter's own exit code for scripting.
            std::process::exit(code.unwrap_or(1));
        }
        Err(e) => Err(e).context("Rasterisation failed"),
    }
}

/// Map CLI args to a [`Ghostscript`] builder.
fn build_invocation(cli: &Cli) -> Ghostscript {
    let mut gs = Ghostscript::new().batch().nopause();

    if !cli.no_quiet {
        gs = gs.quiet();
    }
    gs = gs.device(cli.device.as_str()).resolution(cli.resolution);

    if let Some(n) = cli.first_page {
        gs = gs.first_page(n);
    }
    if let Some(n) = cli.last_page {
        gs = gs.last_page(n);
    }
    if cli.interpolate {
        gs = gs.interpolate();
    }
    if let Some(ref mode) = cli.auto_rotate {
        gs = gs.auto_rotate_pages(mode.as_str());
    }
    if let Some(ref preset) = cli.pdf_settings {
        gs = gs.pdf_settings(preset.clone());
    }
    if let Some(ref version) = cli.compatibility {
        gs = gs.compatibility(version.clone());
    }
    if let Some(size) = cli.ram {
        gs = gs.ram(size);
    }
    for raw in &cli.flags {
        gs = gs.raw_flag(raw.clone());
    }
    if let Some(ref program) = cli.gs {
        gs = gs.program(program.clone());
    }

    gs = gs.output(cli.output.clone());
    for input in &cli.inputs {
        gs = gs.input(input.clone());
    }

    gs
}
