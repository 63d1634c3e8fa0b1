//! Integration tests for the dry-run interpreter's contract.
//!
//! These pin the properties callers rely on:
//! - recorded effect lists are deterministic across repeated runs
//! - program order is preserved through parallel/race composition
//! - fail-fast keeps the recorded prefix and drops everything after
//! - mocks override resolution without suppressing recording

use summon::effect::{Effect, EffectKind, LogLevel, PromptDefinition};
use summon::error::ErrorCode;
use summon::interpret::{DryRunInterpreter, MockRegistry};
use summon::task::{ops, Task};
use summon::TaskError;

use serde_json::json;
use std::path::Path;

// ============================================================================
// Fixtures
// ============================================================================

/// A task shaped like a small generator: mkdir, two writes, a log.
fn scaffold_task() -> Task<()> {
    Task::sequence_unit(vec![
        ops::make_dir("src/components/Button"),
        ops::write_file("src/components/Button/Button.tsx", "export {};\n"),
        ops::write_file("src/components/Button/index.ts", "export * from './Button';\n"),
        ops::log(LogLevel::Info, "done"),
    ])
}

fn kinds(effects: &[Effect]) -> Vec<EffectKind> {
    effects.iter().map(Effect::kind).collect()
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn repeated_dry_runs_record_identical_effects() {
    let first = DryRunInterpreter::new().run(scaffold_task());
    let second = DryRunInterpreter::new().run(scaffold_task());
    assert!(first.result.is_ok());
    assert_eq!(first.effects, second.effects);
}

#[test]
fn parallel_and_race_flatten_in_declaration_order() {
    let build = || {
        Task::sequence_unit(vec![
            Task::parallel(vec![
                ops::write_file("a.txt", "a"),
                ops::write_file("b.txt", "b"),
            ])
            .map(|_| ()),
            Task::race(vec![
                ops::write_file("c.txt", "c"),
                ops::write_file("d.txt", "d"),
            ]),
        ])
    };
    let report = DryRunInterpreter::new().run(build());
    assert!(report.result.is_ok());
    assert_eq!(
        report.written_paths(),
        vec![
            Path::new("a.txt"),
            Path::new("b.txt"),
            Path::new("c.txt"),
            Path::new("d.txt"),
        ]
    );
    // Declaration order is stable, so the whole list snapshots cleanly.
    let again = DryRunInterpreter::new().run(build());
    assert_eq!(report.effects, again.effects);
}

// ============================================================================
// Failure propagation
// ============================================================================

#[test]
fn sequence_failure_keeps_prefix_and_drops_suffix() {
    let task = Task::sequence_unit(vec![
        ops::write_file("before.txt", "a"),
        Task::fail(TaskError::internal("interpreter stop")),
        ops::write_file("after.txt", "c"),
    ]);
    let report = DryRunInterpreter::new().run(task);

    let error = report.result.as_ref().unwrap_err();
    assert_eq!(error.message, "interpreter stop");
    assert_eq!(report.written_paths(), vec![Path::new("before.txt")]);
}

#[test]
fn empty_race_is_a_descriptive_failure() {
    let report = DryRunInterpreter::new().run(Task::<()>::race(Vec::new()));
    let error = report.result.unwrap_err();
    assert_eq!(error.code, ErrorCode::EmptyRace);
}

#[test]
fn recover_is_scoped_to_its_receiver() {
    let task = ops::write_file("kept.txt", "x")
        .and_then(|_| Task::<()>::fail(TaskError::process("npm install failed")))
        .recover(|error| {
            assert_eq!(error.code, ErrorCode::Process);
            ops::log(LogLevel::Warn, "falling back")
        });
    let report = DryRunInterpreter::new().run(task);
    assert!(report.result.is_ok());
    assert_eq!(
        kinds(&report.effects),
        vec![EffectKind::WriteFile, EffectKind::Log]
    );
}

// ============================================================================
// Defaults and mocks
// ============================================================================

#[test]
fn unmocked_reads_resolve_to_empty_defaults() {
    let task = ops::read_file("missing.txt")
        .and_then(|content| {
            assert_eq!(content, "");
            ops::exists("missing.txt")
        })
        .and_then(|found| {
            assert!(!found);
            ops::glob("src/**/*.ts", Default::default())
        })
        .map(|paths| assert!(paths.is_empty()));
    let report = DryRunInterpreter::new().run(task);
    assert!(report.result.is_ok());
    // All three queries were still recorded.
    assert_eq!(report.effects.len(), 3);
}

#[test]
fn mocked_variants_resolve_while_others_keep_defaults() {
    let mocks = MockRegistry::new()
        .with_exists(|path| path == Path::new("package.json"))
        .with_prompt(|definition: &PromptDefinition| {
            assert_eq!(definition.name, "confirmOverwrite");
            json!(true)
        });

    let task = ops::exists("package.json")
        .and_then(|found| {
            assert!(found);
            ops::prompt(PromptDefinition::confirm(
                "confirmOverwrite",
                "Overwrite?",
                false,
            ))
        })
        .and_then(|answer| {
            assert_eq!(answer, json!(true));
            // read_file has no mock registered, so the default applies.
            ops::read_file("package.json")
        })
        .map(|content| assert_eq!(content, ""));

    let report = DryRunInterpreter::with_mocks(mocks).run(task);
    assert!(report.result.is_ok());
    assert_eq!(
        kinds(&report.effects),
        vec![EffectKind::Exists, EffectKind::Prompt, EffectKind::ReadFile]
    );
}

#[test]
fn mutating_effects_are_recorded_never_performed() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never-created.txt");
    let task = ops::write_file(&target, "data").and_then({
        let target = target.clone();
        move |_| ops::delete_file(target)
    });
    let report = DryRunInterpreter::new().run(task);
    assert!(report.result.is_ok());
    assert_eq!(report.effects.len(), 2);
    assert!(!target.exists());
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn context_flows_between_independent_subtasks() {
    let compute = ops::write_context("componentName", json!("Button"));
    let consume = ops::read_context("componentName").and_then(|value| match value {
        Some(name) => ops::log(LogLevel::Info, format!("building {name}")),
        None => Task::fail(TaskError::internal("context lost")),
    });
    let report = DryRunInterpreter::new().run(compute.and_then(|_| consume));
    assert!(report.result.is_ok());
}
