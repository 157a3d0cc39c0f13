use assert_cmd::Command;
use predicates::prelude::*;

fn cmd_in(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("servotune_cli").expect("binary");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn self_check_passes_on_simulated_stack() {
    let dir = tempfile::tempdir().expect("tempdir");
    cmd_in(dir.path())
        .args(["self-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check ok"));
}

#[test]
fn bounded_sim_run_exits_cleanly_and_seeds_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    cmd_in(dir.path())
        .args(["run", "--sim", "--ticks", "50", "--tick-hz", "1000"])
        .assert()
        .success();
    // factory record seeded next to the binary's working directory
    let record = std::fs::read(dir.path().join("servotune_cal.bin")).expect("store file");
    assert_eq!(record.len(), 12);
}

#[test]
fn show_cal_prints_factory_slots_on_fresh_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    cmd_in(dir.path())
        .args(["show-cal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slot 0: 600 .. 2400 us"));
}

#[test]
fn custom_config_is_honored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = dir.path().join("tuner.toml");
    std::fs::write(
        &cfg,
        "[store]\npath = \"custom_cal.bin\"\n\n[defaults]\nmin_us = 700\nmax_us = 2300\n",
    )
    .expect("write config");

    cmd_in(dir.path())
        .args(["--config", "tuner.toml", "show-cal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slot 1: 700 .. 2300 us"));
    assert!(dir.path().join("custom_cal.bin").exists());
}

#[test]
fn invalid_config_fails_loudly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = dir.path().join("tuner.toml");
    std::fs::write(&cfg, "[gesture]\ndebounce_ms = 0\n").expect("write config");

    cmd_in(dir.path())
        .args(["--config", "tuner.toml", "self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("debounce_ms"));
}
