//! End-to-end CLI tests: generate writes mirrored signature files, clean
//! removes the output tree, setup does both.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_fixture(root: &std::path::Path) {
    let models = root.join("app/models");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(
        models.join("user.rb"),
        "class User\n  class_attribute :name #: String\nend\n",
    )
    .unwrap();
    std::fs::write(models.join("empty.rb"), "class Empty\n  def nothing\n  end\nend\n").unwrap();
}

#[test]
fn generate_writes_mirrored_signature_files() {
    let temp = tempfile::tempdir().unwrap();
    write_fixture(temp.path());

    Command::cargo_bin("rbsgen")
        .unwrap()
        .current_dir(temp.path())
        .args(["generate", "--output", "sig/generated", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 1 signature file"));

    let generated = temp.path().join("sig/generated/app/models/user.rbs");
    let text = std::fs::read_to_string(generated).unwrap();
    assert!(text.contains("class ::User < ::Object"));
    assert!(text.contains("def self.name: () -> (String)"));
    assert!(!temp.path().join("sig/generated/app/models/empty.rbs").exists());
}

#[test]
fn clean_removes_the_output_tree() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("sig/generated");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("stale.rbs"), "module ::Stale\nend\n").unwrap();

    Command::cargo_bin("rbsgen")
        .unwrap()
        .current_dir(temp.path())
        .args(["clean", "--output", "sig/generated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    assert!(!output.exists());
}

#[test]
fn setup_replaces_stale_output() {
    let temp = tempfile::tempdir().unwrap();
    write_fixture(temp.path());
    let output = temp.path().join("sig/generated");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("stale.rbs"), "module ::Stale\nend\n").unwrap();

    Command::cargo_bin("rbsgen")
        .unwrap()
        .current_dir(temp.path())
        .args(["setup", "--output", "sig/generated", "app"])
        .assert()
        .success();

    assert!(!output.join("stale.rbs").exists());
    assert!(output.join("app/models/user.rbs").exists());
}
