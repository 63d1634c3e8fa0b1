//! CLI integration tests for the `summon` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn summon() -> Command {
    Command::cargo_bin("summon").unwrap()
}

fn project_with_templates() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let templates = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates");
    std::fs::write(
        dir.path().join("summon.toml"),
        format!("templates_dir = {:?}\n", templates.display().to_string()),
    )
    .unwrap();
    dir
}

#[test]
fn list_names_the_builtin_generators() {
    summon()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("component/react"))
        .stdout(predicate::str::contains("component/svelte"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn unknown_generator_exits_nonzero() {
    summon()
        .args(["run", "component/angular", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown generator"));
}

#[test]
fn dry_run_renders_a_connector_tree_and_writes_nothing() {
    let dir = project_with_templates();
    summon()
        .current_dir(dir.path())
        .args([
            "run",
            "component/react",
            "--dry-run",
            "--set",
            "componentPath=src/components/Button",
            "--set",
            "withStories=false",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("◆ component/react (dry run)"))
        .stdout(predicate::str::contains("mkdir"))
        .stdout(predicate::str::contains("src/components/Button/Button.tsx"))
        .stdout(predicate::str::contains("styles.css"))
        .stdout(predicate::str::contains("Button.stories.tsx").not());

    assert!(!dir.path().join("src").exists());
}

#[test]
fn missing_required_answer_fails_validation() {
    let dir = project_with_templates();
    summon()
        .current_dir(dir.path())
        .args(["run", "component/react", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("componentPath"));
}

#[test]
fn live_run_scaffolds_with_defaults() {
    let dir = project_with_templates();
    summon()
        .current_dir(dir.path())
        .args([
            "run",
            "component/react",
            "--defaults",
            "--set",
            "componentPath=src/components/Card",
            "--set",
            "withStories=false",
        ])
        .assert()
        .success();

    let card = dir.path().join("src/components/Card/Card.tsx");
    let content = std::fs::read_to_string(card).unwrap();
    assert!(content.contains("export function Card"));
    // withStyles defaulted to true.
    assert!(dir.path().join("src/components/Card/styles.css").exists());
    assert!(!dir
        .path()
        .join("src/components/Card/Card.stories.tsx")
        .exists());
}
