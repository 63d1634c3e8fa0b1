//! Rendering of effect lists and live progress for the terminal.
//!
//! Presentation only: everything here consumes the recorded effect list or
//! the observer callbacks, nothing reaches back into the interpreters.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use crate::effect::{Effect, LogLevel};
use crate::interpret::ExecutionObserver;

/// Action label and payload summary for one effect.
fn describe(effect: &Effect) -> (&'static str, String) {
    match effect {
        Effect::WriteFile { path, content } => (
            "write",
            format!("{} ({} bytes)", path.display(), content.len()),
        ),
        Effect::AppendFile { path, .. } => ("append", path.display().to_string()),
        Effect::MakeDir { path } => ("mkdir", path.display().to_string()),
        Effect::CopyFile { source, dest } => (
            "copy",
            format!("{} -> {}", source.display(), dest.display()),
        ),
        Effect::CopyDir { source, dest } => (
            "copydir",
            format!("{} -> {}", source.display(), dest.display()),
        ),
        Effect::DeleteFile { path } => ("delete", path.display().to_string()),
        Effect::DeleteDir { path } => ("deldir", path.display().to_string()),
        Effect::ReadFile { path } => ("read", path.display().to_string()),
        Effect::Exists { path } => ("exists", path.display().to_string()),
        Effect::Glob { pattern, .. } => ("glob", pattern.clone()),
        Effect::Exec { command, args, .. } => {
            if args.is_empty() {
                ("exec", command.clone())
            } else {
                ("exec", format!("{command} {}", args.join(" ")))
            }
        }
        Effect::Prompt { definition } => ("prompt", definition.message.clone()),
        Effect::Log { level, message } => ("log", format!("{level}: {message}")),
        Effect::ReadContext { key } => ("ctx-get", key.clone()),
        Effect::WriteContext { key, .. } => ("ctx-set", key.clone()),
    }
}

/// Connector-tree rendering of a dry-run effect list.
pub fn render_effects(generator: &str, effects: &[Effect]) -> String {
    let mut out = String::new();
    writeln!(&mut out, "◆ {generator} (dry run)").unwrap();
    if effects.is_empty() {
        writeln!(&mut out, "└─ no effects").unwrap();
        return out;
    }
    let last = effects.len() - 1;
    for (index, effect) in effects.iter().enumerate() {
        let connector = if index == last { "└─" } else { "├─" };
        let (label, payload) = describe(effect);
        writeln!(&mut out, "{connector} {label:<8} {payload}").unwrap();
    }
    out
}

/// Observer printing one line per performed effect.
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn shared() -> Arc<dyn ExecutionObserver> {
        Arc::new(Self)
    }
}

impl ExecutionObserver for ConsoleObserver {
    fn on_effect_complete(&self, effect: &Effect, duration: Duration) {
        let (label, payload) = describe(effect);
        println!("✓ {label:<8} {payload} ({}ms)", duration.as_millis());
    }

    fn on_log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Warn | LogLevel::Error => eprintln!("{level}: {message}"),
            _ => println!("{level}: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn tree_uses_final_connector_on_last_line() {
        let effects = vec![
            Effect::MakeDir {
                path: PathBuf::from("src/components/Button"),
            },
            Effect::WriteFile {
                path: PathBuf::from("src/components/Button/index.ts"),
                content: "export {};\n".into(),
            },
        ];
        let rendered = render_effects("component/react", &effects);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "◆ component/react (dry run)");
        assert!(lines[1].starts_with("├─ mkdir"));
        assert!(lines[2].starts_with("└─ write"));
        assert!(lines[2].contains("(11 bytes)"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let rendered = render_effects("init", &[]);
        assert!(rendered.contains("no effects"));
    }
}
