//! Integration tests for the live interpreter against a real temp dir.
//!
//! Covers the semantics that only show up when effects actually run:
//! fail-fast without rollback, parallel aggregation order, race settlement,
//! and the dry-run/live ordering agreement.

use summon::effect::{EffectKind, ExecOptions, PromptDefinition};
use summon::interaction::ScriptedPrompter;
use summon::interpret::{DryRunInterpreter, LiveInterpreter};
use summon::subprocess::MockProcessRunner;
use summon::task::{ops, Task};
use summon::{Effect, ExecutionObserver, TaskError};

use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn read(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn file_effects_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src/components/Button/Button.tsx");
    let copied = dir.path().join("backup/Button.tsx");

    let task = ops::write_file(&nested, "export {};\n")
        .and_then({
            let nested = nested.clone();
            let copied = copied.clone();
            move |_| ops::copy_file(nested, copied)
        })
        .and_then({
            let nested = nested.clone();
            move |_| ops::append_file(nested, "// appended\n")
        });

    LiveInterpreter::new().run(task).await.unwrap();

    assert_eq!(read(&nested), "export {};\n// appended\n");
    assert_eq!(read(&copied), "export {};\n");
}

#[tokio::test]
async fn copy_dir_replicates_a_tree() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("templates");
    std::fs::create_dir_all(source.join("react")).unwrap();
    std::fs::write(source.join("react/component.tsx.tera"), "{{ name }}").unwrap();
    std::fs::write(source.join("top.txt"), "top").unwrap();

    let dest = dir.path().join("copy");
    LiveInterpreter::new()
        .run(ops::copy_dir(&source, &dest))
        .await
        .unwrap();

    assert_eq!(read(&dest.join("react/component.tsx.tera")), "{{ name }}");
    assert_eq!(read(&dest.join("top.txt")), "top");
}

#[tokio::test]
async fn queries_see_real_state() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ts"), "").unwrap();
    std::fs::write(dir.path().join("b.ts"), "").unwrap();
    std::fs::write(dir.path().join("c.css"), "").unwrap();

    let pattern = format!("{}/*.ts", dir.path().display());
    let task = ops::exists(dir.path().join("a.ts"))
        .and_then(move |found| {
            assert!(found);
            ops::glob(pattern, Default::default())
        })
        .map(|paths| paths.len());

    let matched = LiveInterpreter::new().run(task).await.unwrap();
    assert_eq!(matched, 2);
}

#[tokio::test]
async fn failure_leaves_prior_effects_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let kept = dir.path().join("kept.txt");
    let never = dir.path().join("never.txt");

    let task = Task::sequence_unit(vec![
        ops::write_file(&kept, "kept"),
        // Reading a missing file fails the sequence.
        ops::read_file(dir.path().join("missing.txt")).map(|_| ()),
        ops::write_file(&never, "never"),
    ]);

    let error = LiveInterpreter::new().run(task).await.unwrap_err();
    assert_eq!(error.code, summon::ErrorCode::Io);
    assert!(kept.exists());
    assert!(!never.exists());
}

#[tokio::test]
async fn parallel_aggregates_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    // The first branch suspends on real I/O; the second settles instantly.
    // The aggregate must still follow input order.
    let writes = ops::write_file(dir.path().join("slow.txt"), "slow").map(|_| "slow");
    let fast = Task::pure("fast");
    let results = LiveInterpreter::new()
        .run(Task::parallel(vec![writes, fast]))
        .await
        .unwrap();
    assert_eq!(results, vec!["slow", "fast"]);
}

#[tokio::test]
async fn race_resolves_with_first_settled() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("winner.txt");

    // The losing branch performs real work that should still complete.
    let loser = ops::write_file(&marker, "loser ran").map(|_| "loser");
    let winner = Task::pure("winner");

    let result = LiveInterpreter::new()
        .run(Task::race(vec![winner, loser]))
        .await
        .unwrap();
    assert_eq!(result, "winner");

    // Give the detached branch a moment to finish in the background.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(marker.exists());
}

#[tokio::test]
async fn prompts_go_through_the_injected_prompter() {
    let prompter = ScriptedPrompter::new([json!("src/components/Button"), json!(true)]);
    let interpreter = LiveInterpreter::new().with_prompter(Arc::new(prompter));

    let task = ops::prompt(PromptDefinition::text("componentPath", "Path?"))
        .and_then(|path| {
            ops::prompt(PromptDefinition::confirm("withStyles", "Styles?", false))
                .map(move |styles| (path, styles))
        });

    let (path, styles) = interpreter.run(task).await.unwrap();
    assert_eq!(path, json!("src/components/Button"));
    assert_eq!(styles, json!(true));
}

#[tokio::test]
async fn prompt_answers_are_validated() {
    // Scripted string answer against a confirm prompt.
    let prompter = ScriptedPrompter::new([json!("not a bool")]);
    let interpreter = LiveInterpreter::new().with_prompter(Arc::new(prompter));

    let task = ops::prompt(PromptDefinition::confirm("withStyles", "Styles?", false));
    let error = interpreter.run(task).await.unwrap_err();
    assert_eq!(error.code, summon::ErrorCode::Validation);
}

#[tokio::test]
async fn exec_uses_the_injected_runner() {
    let mock = MockProcessRunner::new();
    mock.expect_command("git")
        .with_args(|args| args == ["init", "--quiet"])
        .returns_stdout("ok")
        .finish();
    let interpreter = LiveInterpreter::new().with_process_runner(Arc::new(mock.clone()));

    let output = interpreter
        .run(ops::exec(
            "git",
            vec!["init".into(), "--quiet".into()],
            ExecOptions::default(),
        ))
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(mock.times_called("git"), 1);
}

#[tokio::test]
async fn recover_observes_live_failures() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("fallback.txt");

    let task = ops::read_file(dir.path().join("missing.txt"))
        .map(|_| ())
        .recover({
            let fallback = fallback.clone();
            move |error: TaskError| {
                assert_eq!(error.code, summon::ErrorCode::Io);
                ops::write_file(fallback, "fallback")
            }
        });

    LiveInterpreter::new().run(task).await.unwrap();
    assert_eq!(read(&fallback), "fallback");
}

struct KindObserver {
    kinds: Mutex<Vec<EffectKind>>,
}

impl ExecutionObserver for KindObserver {
    fn on_effect_start(&self, effect: &Effect) {
        self.kinds.lock().unwrap().push(effect.kind());
    }
}

#[tokio::test]
async fn live_performs_what_dry_run_records_in_the_same_order() {
    let dir = tempfile::tempdir().unwrap();
    let build = |root: PathBuf| {
        Task::sequence_unit(vec![
            ops::make_dir(root.join("src")),
            ops::write_file(root.join("src/index.ts"), "export {};\n"),
            ops::exists(root.join("src/index.ts")).map(|_| ()),
        ])
    };

    let recorded = DryRunInterpreter::new().run(build(dir.path().to_path_buf()));
    let recorded_kinds: Vec<_> = recorded.effects.iter().map(Effect::kind).collect();

    let observer = Arc::new(KindObserver {
        kinds: Mutex::new(Vec::new()),
    });
    LiveInterpreter::new()
        .with_observer(observer.clone())
        .run(build(dir.path().to_path_buf()))
        .await
        .unwrap();

    let performed_kinds = observer.kinds.lock().unwrap().clone();
    assert_eq!(recorded_kinds, performed_kinds);
}
