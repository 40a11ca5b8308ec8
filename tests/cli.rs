use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn framesnap_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("framesnap").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

fn png_count(dir: &Path) -> usize {
    std::fs::read_dir(dir.join("Screenshots"))
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn framesnap_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    framesnap_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("In-game screenshot tool"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn settings_set_persists_and_list_reflects_it() {
    let temp = TempDir::new().unwrap();

    framesnap_cmd(temp.path())
        .args(["settings", "set", "Greyscale Mode", "luminance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Greyscale Mode = Luminance"));

    let saved = std::fs::read_to_string(temp.path().join("framesnap/config.toml")).unwrap();
    assert!(saved.contains("greyscale_mode = \"luminance\""), "{saved}");

    framesnap_cmd(temp.path())
        .args(["settings", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Luminance"))
        .stdout(predicate::str::contains("Custom Width").not());

    framesnap_cmd(temp.path())
        .args(["settings", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom Width"));
}

#[test]
fn settings_set_logs_where_it_saved() {
    let temp = TempDir::new().unwrap();

    framesnap_cmd(temp.path())
        .env("RUST_LOG", "info")
        .args(["settings", "set", "Show Quick Settings", "false"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved settings to"))
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn settings_set_rejects_bad_values() {
    let temp = TempDir::new().unwrap();

    framesnap_cmd(temp.path())
        .args(["settings", "set", "Custom Width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    framesnap_cmd(temp.path())
        .args(["settings", "set", "Brightness", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));

    assert!(!temp.path().join("framesnap/config.toml").exists());
}

#[test]
fn run_capture_on_start_writes_png() {
    let config_home = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();

    framesnap_cmd(config_home.path())
        .args(["settings", "set", "Screenshot Mode", "Full"])
        .assert()
        .success();
    framesnap_cmd(config_home.path())
        .args(["settings", "set", "Change Field of View", "false"])
        .assert()
        .success();

    framesnap_cmd(config_home.path())
        .args(["run", "--capture-on-start", "--width", "160", "--height", "120"])
        .arg("--storage-root")
        .arg(storage.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Screenshots"))
        .stdout(predicate::str::ends_with(".png\n"));

    assert_eq!(png_count(storage.path()), 1);
}

#[test]
fn run_help_notes_slide_reel_screen_size() {
    let temp = TempDir::new().unwrap();
    framesnap_cmd(temp.path())
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SlideReel (1024x1024) needs at least 1024"));
}

#[test]
fn run_reports_region_larger_than_screen() {
    let config_home = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();

    // Default mode is 512x512.
    framesnap_cmd(config_home.path())
        .args(["run", "--capture-on-start", "--width", "320", "--height", "240"])
        .arg("--storage-root")
        .arg(storage.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid capture region 512x512"));

    assert_eq!(png_count(storage.path()), 0);
}

#[test]
fn run_capture_on_start_outside_play_scene_fails() {
    let config_home = TempDir::new().unwrap();
    let storage = TempDir::new().unwrap();

    framesnap_cmd(config_home.path())
        .args(["run", "--capture-on-start", "--scene", "title-screen"])
        .arg("--storage-root")
        .arg(storage.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a play scene"));

    assert_eq!(png_count(storage.path()), 0);
}

#[test]
fn config_schema_binary_describes_capture_section() {
    Command::cargo_bin("framesnap-config-schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("greyscale_mode"))
        .stdout(predicate::str::contains("stall_timeout_secs"));
}
