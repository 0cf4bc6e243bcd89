//! Binary integration tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn write_tiff(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut img = RgbImage::from_pixel(60, 40, Rgb([20, 30, 40]));
    for x in 52..58 {
        img.put_pixel(x, 38, Rgb([255, 255, 255]));
    }
    img.save_with_format(path, ImageFormat::Tiff).unwrap();
}

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("scalebar-clean").unwrap();
    cmd.current_dir(dir)
        .env_remove("SCALEBAR_INPUT")
        .env_remove("SCALEBAR_OUTPUT");
    cmd
}

#[test]
fn test_help() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--threshold"));
}

#[test]
fn test_missing_input_exit_code() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["missing", "out"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("ERROR: Input folder"))
        .stdout(predicate::str::contains("does not exist!"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_default_roots() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("Data/run1/img.tif"));

    cmd(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("img.tif -> "))
        .stdout(predicate::str::contains("processed_img.tif"));

    assert!(tmp
        .path()
        .join("data_processed/run1/processed_img.tif")
        .exists());
}

#[test]
fn test_failures_still_exit_zero() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/good.tif"));
    fs::write(tmp.path().join("in/bad.tif"), b"garbage").unwrap();

    cmd(tmp.path())
        .args(["in", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAILED: "))
        .stdout(predicate::str::contains("bad.tif - Could not read image"))
        .stdout(predicate::str::contains("good.tif -> "));

    assert!(tmp.path().join("out/processed_good.tif").exists());
}

#[test]
fn test_quiet_suppresses_file_lines() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));

    cmd(tmp.path())
        .args(["in", "out", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(tmp.path().join("out/processed_a.tif").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));

    cmd(tmp.path())
        .args(["in", "out", "--dry-run", "-v", "--threshold", "180"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry Run"))
        .stdout(predicate::str::contains("Files to process: 1"))
        .stdout(predicate::str::contains("\"threshold\": 180"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_custom_prefix_and_mask() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));

    cmd(tmp.path())
        .args(["in", "out", "--prefix", "clean_", "--save-mask"])
        .assert()
        .success();

    assert!(tmp.path().join("out/clean_a.tif").exists());
    assert!(tmp.path().join("out/clean_a_mask.png").exists());
}

#[test]
fn test_local_config_file_is_used() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));
    fs::write(
        tmp.path().join("scalebar.toml"),
        "[output]\nprefix = \"cfg_\"\n",
    )
    .unwrap();

    cmd(tmp.path()).args(["in", "out"]).assert().success();
    assert!(tmp.path().join("out/cfg_a.tif").exists());
}

#[test]
fn test_invalid_explicit_config_exit_code() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.toml"), "[mask]\nthreshold = \"high\"\n").unwrap();

    cmd(tmp.path())
        .args(["in", "out", "--config", "bad.toml"])
        .assert()
        .code(4);
}

#[test]
fn test_invalid_argument_exit_code() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .args(["--region-left", "3.0"])
        .assert()
        .code(2);
}

#[test]
fn test_wide_label_preset_in_plan() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));

    cmd(tmp.path())
        .args(["in", "out", "--dry-run", "--preset", "wide-label"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Region: x >= 70% of width, y >= 85% of height",
        ));
}

#[test]
fn test_verbose_prints_summary() {
    let tmp = TempDir::new().unwrap();
    write_tiff(&tmp.path().join("in/a.tif"));
    fs::write(tmp.path().join("in/b.tif"), b"garbage").unwrap();

    cmd(tmp.path())
        .args(["in", "out", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cleaned 1/2 TIFF(s): 1 scale bar(s) removed, 1 failed",
        ))
        .stdout(predicate::str::contains("not written: "));
}
