use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

const SOURCE: &str = "Technology,Base,Alt1\n\
Fuel Demand Process,2.0,3.0\n\
P-ASU,1.0,0.5\n\
Emissions Impact (right y-axis),0.4,0.35\n\
total energy,3.4,3.85\n";

fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("eb_chart_{}_{}.csv", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn spec_writes_json_to_stdout() {
    let input = write_temp_csv("spec_stdout", SOURCE);
    let output = Command::cargo_bin("eb_chart")
        .unwrap()
        .args(["spec", input.to_str().unwrap(), "-o", "-"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let spec: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(spec["traces"].as_array().unwrap().len(), 3);
    assert_eq!(spec["layout"]["barmode"], "relative");
    fs::remove_file(input).ok();
}

#[test]
fn spec_rejects_unknown_column() {
    let input = write_temp_csv("spec_unknown", SOURCE);
    Command::cargo_bin("eb_chart")
        .unwrap()
        .args([
            "spec",
            input.to_str().unwrap(),
            "-o",
            "-",
            "--columns",
            "Base,NoSuchColumn",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column"));
    fs::remove_file(input).ok();
}

#[test]
fn spec_respects_explicit_column_order() {
    let input = write_temp_csv("spec_order", SOURCE);
    let output = Command::cargo_bin("eb_chart")
        .unwrap()
        .args([
            "spec",
            input.to_str().unwrap(),
            "-o",
            "-",
            "--columns",
            "Alt1,Base",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let spec: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        spec["layout"]["xaxis"]["categoryarray"],
        serde_json::json!(["Alt1", "Base"])
    );
    fs::remove_file(input).ok();
}

#[test]
fn inspect_reports_classification() {
    let input = write_temp_csv("inspect", SOURCE);
    Command::cargo_bin("eb_chart")
        .unwrap()
        .args(["inspect", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("stacked components (2)"))
        .stdout(predicate::str::contains("Fuel Demand Process [canonical]"))
        .stdout(predicate::str::contains(
            "emissions row: Emissions Impact (right y-axis)",
        ));
    fs::remove_file(input).ok();
}

#[test]
fn spec_fails_on_missing_input() {
    Command::cargo_bin("eb_chart")
        .unwrap()
        .args(["spec", "/nonexistent/breakdown.csv", "-o", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
