use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn document(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn pml() -> Command {
    let mut cmd = Command::cargo_bin("pml").unwrap();
    cmd.env_remove("PML_LOG");
    cmd
}

const DRIVE: &str = "\
# drive configuration
gamepad1.left_x :: always |-> deadband(0.05) -> scaling(2) ->| strafe,
                :: |->| log;
navx.heading :: sometimes(2) |-> smoothing ->| heading_out;
";

#[test]
fn test_check_reports_count() {
    let file = document(DRIVE);
    pml()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 specification(s)"));
}

#[test]
fn test_check_reports_parse_error_with_caret() {
    let file = document("this.causes :: an |-> error");
    pml()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pipeline_callback: expected '->|' at line 1, column 27",
        ))
        .stderr(predicate::str::contains("this.causes :: an |-> error\n"))
        .stderr(predicate::str::contains(format!("\n{}^", " ".repeat(27))));
}

#[test]
fn test_check_missing_file() {
    pml()
        .args(["check", "does/not/exist.pml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_dump_pml_is_canonical() {
    let file = document("gp.x :: always |-> a -> b(1,2) ->| c, :: |->| d");
    pml()
        .arg("dump")
        .arg(file.path())
        .assert()
        .success()
        .stdout("gp.x :: always |-> a -> b(1,2) ->| c,\n    :: always |->| d;\n");
}

#[test]
fn test_dump_json() {
    let file = document("gp.x :: |->| d");
    let output = pml()
        .args(["dump", "--format", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["callback"], "d");
    assert_eq!(json[0]["filter"]["name"], "changed");
}

#[test]
fn test_default_filter_flag() {
    let file = document("gp.x :: |->| d");
    pml()
        .args(["dump", "--default-filter", "sometimes(3)"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("gp.x :: sometimes(3) |->| d;\n");
}

#[test]
fn test_run_polls_simulated_devices() {
    let file = document(DRIVE);
    pml()
        .args(["run", "--cycles", "4"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("strafe <- "))
        .stdout(predicate::str::contains("heading_out <- "))
        .stdout(predicate::str::contains("4 cycle(s)"));
}

#[test]
fn test_run_reports_bind_errors() {
    let file = document("gamepad1.left_x :: |-> warp ->| out");
    pml()
        .args(["run"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown stage 'warp'"));
}
