mod common;

use std::fs;

use assert_cmd::Command;
use common::{PEOPLE_CSV, PEOPLE_LAYOUT, TestWorkspace};
use predicates::prelude::*;
use predicates::str::contains;

fn tabular_mapper() -> Command {
    Command::cargo_bin("tabular-mapper").expect("binary exists")
}

fn people_workspace() -> TestWorkspace {
    let workspace = TestWorkspace::new();
    workspace.write("people.yaml", PEOPLE_LAYOUT);
    workspace.write("people.csv", PEOPLE_CSV);
    workspace
}

#[test]
fn verify_accepts_conforming_files() {
    let workspace = people_workspace();
    let second = workspace.write(
        "more.tsv",
        "Id\tFull name\tJoined\tSalary\tActive\tScores\n4\tEdsger\t1972-01-01\t\ttrue\t7\n",
    );
    tabular_mapper()
        .args(["verify", "-l"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(workspace.join("people.csv"))
        .arg("-i")
        .arg(&second)
        .assert()
        .success();
}

#[test]
fn verify_reports_the_offending_field_and_row() {
    let workspace = people_workspace();
    let broken = workspace.write(
        "broken.csv",
        "Id,Full name,Joined,Salary,Active,Scores\n1,Ada,2021-03-04,,,1\n2,Alan,2019-06-05,lots,,2\n",
    );
    tabular_mapper()
        .args(["verify", "--layout"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(contains("field 'Salary' at row 3, column 4"));
}

#[test]
fn verify_rejects_mismatched_headers() {
    let workspace = people_workspace();
    let renamed = workspace.write(
        "renamed.csv",
        "Id,Name,Joined,Salary,Active,Scores\n1,Ada,2021-03-04,,,1\n",
    );
    tabular_mapper()
        .args(["verify", "-l"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(&renamed)
        .assert()
        .failure()
        .stderr(contains("expected 'Full name', found 'Name'"));
}

#[test]
fn preview_renders_decoded_records() {
    let workspace = people_workspace();
    tabular_mapper()
        .args(["preview", "-l"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(workspace.join("people.csv"))
        .args(["--rows", "2"])
        .assert()
        .success()
        .stdout(contains("Full name"))
        .stdout(contains("Alan Turing"))
        .stdout(contains("1;2;3"))
        .stdout(contains("Grace Hopper").not());
}

#[test]
fn convert_normalizes_values() {
    let workspace = people_workspace();
    let output = workspace.join("normalized.csv");
    tabular_mapper()
        .args(["convert", "-l"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(workspace.join("people.csv"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Id,Full name,Joined,Salary,Active,Scores");
    assert_eq!(lines[1], "1,Ada Lovelace,2021-03-04 00:00:00,4500.25,true,1-2-3");
    assert_eq!(lines[2], "2,Alan Turing,2019-06-05 00:00:00,,false,4");
    assert_eq!(lines[3], "3,Grace Hopper,2018-01-02 08:30:00,7000,,10");
}

#[test]
fn convert_writes_to_stdout_with_requested_delimiter() {
    let workspace = people_workspace();
    tabular_mapper()
        .args(["convert", "-l"])
        .arg(workspace.join("people.yaml"))
        .arg("-i")
        .arg(workspace.join("people.csv"))
        .args(["--output-delimiter", "tab"])
        .assert()
        .success()
        .stdout(contains("Id\tFull name\tJoined"));
}

#[test]
fn layout_command_lists_columns() {
    let workspace = people_workspace();
    tabular_mapper()
        .args(["layout", "-l"])
        .arg(workspace.join("people.yaml"))
        .assert()
        .success()
        .stdout(contains("Full name"))
        .stdout(contains("decimal?"))
        .stdout(contains("int32[]"));
}

#[test]
fn invalid_layout_file_fails() {
    let workspace = TestWorkspace::new();
    let layout = workspace.write("bad.yaml", "columns:\n  - field: Id\n    datatype: money\n");
    tabular_mapper()
        .args(["layout", "-l"])
        .arg(&layout)
        .assert()
        .failure()
        .stderr(contains("Unknown field type 'money'"));
}
