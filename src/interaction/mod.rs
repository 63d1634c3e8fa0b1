//! User interaction boundary for `Prompt` effects.
//!
//! The live interpreter delegates every prompt to a [`Prompter`]; the
//! terminal implementation below is the only place the core touches
//! stdin/stdout. Tests use [`ScriptedPrompter`] with queued answers.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::effect::{PromptDefinition, PromptKind};
use crate::error::TaskError;

/// Answers one prompt definition.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, definition: &PromptDefinition) -> Result<Value, TaskError>;
}

/// Interactive prompter reading from stdin.
#[derive(Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line() -> Result<String, TaskError> {
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| TaskError::prompt("failed to read input").with_source(e))?;
        Ok(input.trim().to_string())
    }

    fn flush_prompt(text: &str) -> Result<(), TaskError> {
        print!("{text}");
        io::stdout()
            .flush()
            .map_err(|e| TaskError::prompt("failed to flush stdout").with_source(e))
    }

    /// Parse a 1-based choice index. `None` means invalid.
    fn parse_choice(input: &str, num_choices: usize) -> Option<usize> {
        input.parse::<usize>().ok().and_then(|n| {
            if n >= 1 && n <= num_choices {
                Some(n - 1)
            } else {
                None
            }
        })
    }

    fn format_choices(message: &str, choices: &[String]) -> String {
        let mut out = String::new();
        out.push_str(message);
        out.push('\n');
        for (i, choice) in choices.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, choice));
        }
        out
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn ask(&self, definition: &PromptDefinition) -> Result<Value, TaskError> {
        match &definition.kind {
            PromptKind::Text { default } => {
                match default {
                    Some(d) => Self::flush_prompt(&format!("{} [{}]: ", definition.message, d))?,
                    None => Self::flush_prompt(&format!("{}: ", definition.message))?,
                }
                let input = Self::read_line()?;
                if input.is_empty() {
                    if let Some(d) = default {
                        return Ok(Value::String(d.clone()));
                    }
                }
                Ok(Value::String(input))
            }
            PromptKind::Confirm { default } => {
                let hint = if *default { "[Y/n]" } else { "[y/N]" };
                Self::flush_prompt(&format!("{} {hint}: ", definition.message))?;
                let input = Self::read_line()?.to_lowercase();
                let answer = match input.as_str() {
                    "" => *default,
                    "y" | "yes" => true,
                    _ => false,
                };
                Ok(Value::Bool(answer))
            }
            PromptKind::Select { choices, .. } => {
                print!("{}", Self::format_choices(&definition.message, choices));
                loop {
                    Self::flush_prompt(&format!("Enter choice (1-{}): ", choices.len()))?;
                    let input = Self::read_line()?;
                    if let Some(index) = Self::parse_choice(&input, choices.len()) {
                        return Ok(Value::String(choices[index].clone()));
                    }
                    println!("Invalid choice.");
                }
            }
            PromptKind::MultiSelect { choices } => {
                print!("{}", Self::format_choices(&definition.message, choices));
                Self::flush_prompt("Enter choices, comma-separated (empty for none): ")?;
                let input = Self::read_line()?;
                let mut picked = Vec::new();
                for part in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match Self::parse_choice(part, choices.len()) {
                        Some(index) => picked.push(Value::String(choices[index].clone())),
                        None => {
                            return Err(TaskError::prompt(format!(
                                "'{part}' is not a choice between 1 and {}",
                                choices.len()
                            )))
                        }
                    }
                }
                Ok(Value::Array(picked))
            }
        }
    }
}

/// Prompter with pre-queued answers, consumed in order.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Value>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Value>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, definition: &PromptDefinition) -> Result<Value, TaskError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                TaskError::prompt(format!(
                    "no scripted answer left for prompt '{}'",
                    definition.name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_choice_is_one_based_and_bounded() {
        assert_eq!(TerminalPrompter::parse_choice("1", 3), Some(0));
        assert_eq!(TerminalPrompter::parse_choice("3", 3), Some(2));
        assert_eq!(TerminalPrompter::parse_choice("0", 3), None);
        assert_eq!(TerminalPrompter::parse_choice("4", 3), None);
        assert_eq!(TerminalPrompter::parse_choice("x", 3), None);
    }

    #[tokio::test]
    async fn scripted_answers_drain_in_order() {
        let prompter = ScriptedPrompter::new([json!("Button"), json!(true)]);
        let path = PromptDefinition::text("componentPath", "Path?");
        let styles = PromptDefinition::confirm("withStyles", "Styles?", true);

        assert_eq!(prompter.ask(&path).await.unwrap(), json!("Button"));
        assert_eq!(prompter.ask(&styles).await.unwrap(), json!(true));
        assert!(prompter.ask(&path).await.is_err());
    }
}
