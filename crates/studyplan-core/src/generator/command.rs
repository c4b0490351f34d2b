//! Subprocess adapter: run a configured program as the generation service.
//!
//! The prompt is written to the program's stdin and its stdout is taken as
//! the answer. A non-zero exit is a service failure; stderr is included in
//! the error for diagnosis.

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::trait_def::TextGenerator;

/// Runs `program args...` once per request.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    fn name(&self) -> &str {
        &self.program
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        debug!(program = %self.program, args = ?self.args, "spawning generator");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!(
                    "failed to spawn generator '{}' -- is it installed and on PATH?",
                    self.program
                )
            })?;

        // stdin is written concurrently with draining stdout.
        let stdin = child.stdin.take();
        let write_prompt = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(prompt.as_bytes()).await {
                    // Program stopped reading; its exit status decides.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                    other => other?,
                }
            }
            Ok::<_, std::io::Error>(())
        };

        let (written, output) = tokio::join!(write_prompt, child.wait_with_output());
        let output = output.context("failed to wait for generator")?;
        written.context("failed to write prompt to generator stdin")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "generator '{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(program = %self.program, bytes = text.len(), "generator answered");

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cat_echoes_prompt() {
        let generator = CommandGenerator::new("cat", vec![]);
        let answer = generator.generate("{\"timetable\": []}").await.unwrap();
        assert_eq!(answer.as_deref(), Some("{\"timetable\": []}"));
    }

    #[tokio::test]
    async fn large_prompt_does_not_stall() {
        let prompt = "x".repeat(1024 * 1024);
        let generator = CommandGenerator::new("cat", vec![]);

        let answer = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            generator.generate(&prompt),
        )
        .await
        .expect("generator should finish while echoing a 1 MiB prompt")
        .unwrap();
        assert_eq!(answer.map(|a| a.len()), Some(prompt.len()));
    }

    #[tokio::test]
    async fn program_ignoring_stdin_still_answers() {
        let prompt = "y".repeat(1024 * 1024);
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "printf done".to_string()],
        );
        let answer = generator.generate(&prompt).await.unwrap();
        assert_eq!(answer.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn args_are_passed() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; printf 'hi %s' \"$0\"".to_string(), "there".to_string()],
        );
        let answer = generator.generate("ignored").await.unwrap();
        assert_eq!(answer.as_deref(), Some("hi there"));
    }

    #[tokio::test]
    async fn empty_stdout_is_none() {
        let generator = CommandGenerator::new("sh", vec!["-c".to_string(), "cat >/dev/null".to_string()]);
        assert_eq!(generator.generate("prompt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_zero_exit_is_error() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo quota exceeded >&2; exit 3".to_string()],
        );
        let err = generator.generate("prompt").await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("quota exceeded"), "unexpected error: {msg}");
    }

    #[tokio::test]
    async fn missing_program_is_error() {
        let generator = CommandGenerator::new("definitely-not-a-real-generator-binary", vec![]);
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("failed to spawn generator"));
    }
}
