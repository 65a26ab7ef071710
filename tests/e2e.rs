//! End-to-end integration tests for pdf2tiff.
//!
//! The assembly-level tests run everywhere. Tests that spawn a real
//! Ghostscript process are gated behind the `E2E_ENABLED` environment
//! variable so they do not run in CI images without the interpreter.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e converts_a_minimal_pdf -- --nocapture

use pdf2tiff::{exec_raw, locate_ghostscript, Ghostscript, Pdf2TiffError};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set *and* Ghostscript is installed.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match locate_ghostscript() {
            Ok(p) => p,
            Err(e) => {
                println!("SKIP — no Ghostscript executable: {e}");
                return;
            }
        }
    }};
}

/// Builds a minimal but structurally valid single-page PDF.
///
/// The xref offsets are computed, not hard-coded, so Ghostscript opens the
/// file without a repair pass. One empty US-Letter page is all the e2e
/// conversions need.
fn minimal_pdf() -> Vec<u8> {
    let header = "%PDF-1.4\n";
    let objects = [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\n",
    ];

    let mut body = String::from(header);
    let mut offsets = Vec::with_capacity(objects.len());
    for obj in &objects {
        offsets.push(body.len());
        body.push_str(obj);
    }

    let xref_offset = body.len();
    body.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    body.push_str("0000000000 65535 f \n");
    for off in &offsets {
        body.push_str(&format!("{off:010} 00000 n \n"));
    }
    body.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    body.into_bytes()
}

/// Writes the minimal PDF into `dir` and returns its path.
fn write_minimal_pdf(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("minimal.pdf");
    std::fs::write(&path, minimal_pdf()).expect("write test PDF");
    path
}

// ── Assembly properties (no Ghostscript required) ────────────────────────────

#[test]
fn full_command_line_matches_documented_layout() {
    let gs = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device(None)
        .resolution(None)
        .ram(None)
        .output("out-%03d.tiff")
        .input("test.pdf");

    assert_eq!(
        gs.command_line("gs"),
        "gs -dBATCH -q -dNOPAUSE -sDEVICE=tiff24nc -r300 \
         -sOutputFile=out-%03d.tiff -c \"30000000 setvmthreshold\" -f test.pdf"
    );
}

#[test]
fn args_concatenate_main_late_input_in_order() {
    let gs = Ghostscript::new()
        .input("z.pdf")
        .ram(1024)
        .quiet()
        .input("a.pdf");

    assert_eq!(
        gs.args(),
        [
            "-q",
            "-c \"1024 setvmthreshold\"",
            "-f",
            "z.pdf",
            "a.pdf"
        ]
    );
}

#[tokio::test]
async fn exec_with_no_input_fails_without_spawning() {
    let err = Ghostscript::new()
        .batch()
        .quiet()
        .exec()
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2TiffError::MissingInput));
}

#[tokio::test]
async fn exec_raw_with_no_args_fails_without_spawning() {
    let err = exec_raw::<&str>(&[]).await.unwrap_err();
    assert!(matches!(err, Pdf2TiffError::EmptyArgs));
}

// ── Conversion tests (gated, require a real `gs`) ────────────────────────────

#[tokio::test]
async fn converts_a_minimal_pdf() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_minimal_pdf(&dir);
    let out_pattern = dir.path().join("page-%03d.tiff");

    let result = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device(None)
        .resolution(None)
        .output(out_pattern.to_str().unwrap())
        .input(pdf.to_str().unwrap())
        .exec()
        .await
        .expect("conversion should succeed");

    assert_eq!(result.exit_code, 0);
    let page1 = dir.path().join("page-001.tiff");
    assert!(page1.exists(), "expected {} to exist", page1.display());
    println!("✓ {} in {}ms", page1.display(), result.duration_ms);
}

#[tokio::test]
async fn nonexistent_input_surfaces_nonzero_exit_and_diagnostics() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();

    let err = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device(None)
        .output(dir.path().join("out.tiff").to_str().unwrap())
        .input("/definitely/not/here.pdf")
        .exec()
        .await
        .unwrap_err();

    match err {
        Pdf2TiffError::GhostscriptFailed {
            code,
            command_line,
            ..
        } => {
            assert!(code.is_some(), "expected a normal (if nonzero) exit");
            assert_ne!(code, Some(0));
            assert!(command_line.contains("/definitely/not/here.pdf"));
        }
        other => panic!("expected GhostscriptFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn rerunning_the_same_builder_reruns_the_same_snapshot() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_minimal_pdf(&dir);

    let gs = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device("tiffg4")
        .output(dir.path().join("rerun-%d.tiff").to_str().unwrap())
        .input(pdf.to_str().unwrap());

    let first = gs.exec().await.expect("first run");
    let second = gs.exec().await.expect("second run");
    assert_eq!(first.command_line, second.command_line);
}

#[tokio::test]
async fn exec_raw_runs_a_full_flag_list() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_minimal_pdf(&dir);
    let out = dir.path().join("raw-%d.tiff");

    let args = vec![
        "-q".to_string(),
        "-dNOPAUSE".to_string(),
        "-dBATCH".to_string(),
        "-sDEVICE=tiff24nc".to_string(),
        "-r300".to_string(),
        format!("-sOutputFile={}", out.display()),
        pdf.display().to_string(),
    ];

    let result = exec_raw(&args).await.expect("raw exec should succeed");
    assert_eq!(result.exit_code, 0);
    assert!(dir.path().join("raw-1.tiff").exists());
}

#[tokio::test]
async fn input_bytes_converts_without_a_caller_visible_file() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();

    let result = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device(None)
        .output(dir.path().join("bytes-%d.tiff").to_str().unwrap())
        .input_bytes(&minimal_pdf())
        .expect("staging should succeed")
        .exec()
        .await
        .expect("conversion should succeed");

    assert_eq!(result.exit_code, 0);
    assert!(dir.path().join("bytes-1.tiff").exists());
}

#[tokio::test]
async fn ram_directive_is_accepted_by_the_interpreter() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_minimal_pdf(&dir);

    let result = Ghostscript::new()
        .batch()
        .quiet()
        .nopause()
        .device(None)
        .ram(123_456_789)
        .output(dir.path().join("ram-%d.tiff").to_str().unwrap())
        .input(pdf.to_str().unwrap())
        .exec()
        .await
        .expect("setvmthreshold directive should be accepted");

    assert!(result
        .command_line
        .contains("-c \"123456789 setvmthreshold\" -f"));
}

#[test]
fn version_probe_reports_a_release() {
    e2e_skip_unless_ready!();
    let path = locate_ghostscript().unwrap();
    let version = pdf2tiff::ghostscript_version(&path).expect("probe should succeed");
    assert!(version.major >= 7, "implausible major version: {version}");
    println!("Ghostscript {version} at {}", path.display());
}
