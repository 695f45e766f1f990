use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BOM: &[u8] = b"\xEF\xBB\xBF";

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new(images: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("images")).unwrap();
        for name in images {
            write_fixture(&dir.path().join("images").join(name));
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run the benchmark with engines that cannot start on any machine
    fn run(&self, output: &Path, fallback: &Path, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ocr-bench"))
            .env_remove("OCR_BENCH_ENGINES")
            .env_remove("OCR_BENCH_IMAGES_DIR")
            .env("RUST_LOG", "warn")
            .arg("--images-dir")
            .arg(self.path("images"))
            .arg("--output")
            .arg(output)
            .arg("--fallback-output")
            .arg(fallback)
            .args(["--engines", "easyocr,doctr"])
            .args(["--python", "/nonexistent/python3"])
            .args(extra)
            .output()
            .expect("Failed to run ocr-bench")
    }
}

/// Dark text-like strokes on a light background
fn write_fixture(path: &Path) {
    let mut img = RgbImage::from_pixel(120, 40, Rgb([245, 240, 235]));
    for y in [12, 20, 28] {
        for x in 10..110 {
            img.put_pixel(x, y, Rgb([15, 15, 20]));
        }
    }
    img.save(path).expect("Failed to write fixture");
}

fn read_report(path: &Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    assert!(bytes.starts_with(BOM), "report should start with a UTF-8 BOM");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(&bytes[BOM.len()..]);
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();
    rows
}

#[test]
fn test_unavailable_engines_still_produce_full_rows() {
    let ws = Workspace::new(&["english_typed.png", "korean_typed.png"]);
    let output = ws.path("results.csv");

    let result = ws.run(&output, &ws.path("fallback.csv"), &["--no-table"]);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));

    let rows = read_report(&output);
    assert_eq!(
        rows[0],
        vec![
            "Image",
            "Lang",
            "EasyOCR_Acc",
            "EasyOCR_Sec",
            "EasyOCR_Output",
            "Doctr_Acc",
            "Doctr_Sec",
            "Doctr_Output",
        ]
    );

    // Missing samples are skipped, present ones keep their order
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][..2], ["english_typed.png", "eng"]);
    assert_eq!(rows[2][..2], ["korean_typed.png", "kor"]);

    for row in &rows[1..] {
        assert_eq!(row.len(), 2 + 2 * 3);
        for engine in 0..2 {
            let base = 2 + engine * 3;
            assert_eq!(row[base], "0.00");
            assert_eq!(row[base + 1], "0.00");
            assert!(row[base + 2].starts_with("[error]"), "got {:?}", row[base + 2]);
        }
    }
}

#[test]
fn test_no_images_writes_header_only() {
    let ws = Workspace::new(&[]);
    let output = ws.path("results.csv");

    let result = ws.run(&output, &ws.path("fallback.csv"), &["--no-table"]);
    assert!(result.status.success());

    let rows = read_report(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 8);
}

#[test]
fn test_unwritable_output_uses_fallback() {
    let ws = Workspace::new(&["vietnamese_handwritten.png"]);
    let output = ws.path("no-such-dir").join("results.csv");
    let fallback = ws.path("Documents").join("ocr_results.csv");

    let result = ws.run(&output, &fallback, &["--no-table"]);
    assert!(result.status.success());

    assert!(!output.exists());
    let rows = read_report(&fallback);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][..2], ["vietnamese_handwritten.png", "vie"]);
}

#[test]
fn test_table_is_printed_to_stdout() {
    let ws = Workspace::new(&["english_handwritten.png"]);
    let output = ws.path("results.csv");

    let result = ws.run(&output, &ws.path("fallback.csv"), &[]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("english_handwritten.png"), "stdout: {}", stdout);
}
