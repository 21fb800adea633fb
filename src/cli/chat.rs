//! Line-oriented interactive chat.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::core::controller::{ChatController, RevealProgress, SubmitOutcome};
use crate::utils::logging::LoggingState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Quit,
    /// `/log` with an optional file name.
    Log(Option<String>),
    Message(String),
}

pub fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed == "/quit" || trimmed == "/exit" {
        return ReplInput::Quit;
    }
    if trimmed == "/log" {
        return ReplInput::Log(None);
    }
    if let Some(path) = trimmed.strip_prefix("/log ") {
        let path = path.trim();
        return ReplInput::Log((!path.is_empty()).then(|| path.to_string()));
    }
    ReplInput::Message(line.to_string())
}

pub async fn run_chat(
    mut controller: ChatController,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut logging = LoggingState::new(None);
    if let Some(path) = log_file {
        println!("{}", logging.set_log_file(path)?);
    }

    let mut stdout = io::stdout();
    for message in controller.messages() {
        writeln!(stdout, "{}\n", message.text)?;
    }
    prompt(&mut stdout)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            ReplInput::Quit => break,
            ReplInput::Log(path) => {
                let status = match path {
                    Some(path) => logging.set_log_file(path),
                    None => logging.toggle_logging(),
                };
                match status {
                    Ok(message) => println!("{message}"),
                    Err(err) => eprintln!("❌ {err}"),
                }
            }
            ReplInput::Message(text) => {
                run_turn(&mut controller, &text, &logging, &mut stdout).await?;
            }
        }
        prompt(&mut stdout)?;
    }

    debug!(status = %logging.get_status_string(), "chat session ending");
    controller.shutdown();
    Ok(())
}

/// Submit one line and print the reply as it is revealed.
pub async fn run_turn<W: Write>(
    controller: &mut ChatController,
    text: &str,
    logging: &LoggingState,
    out: &mut W,
) -> Result<SubmitOutcome, Box<dyn Error>> {
    let outcome = controller.submit(text).await;
    if matches!(outcome, SubmitOutcome::Ignored | SubmitOutcome::Rejected) {
        return Ok(outcome);
    }

    if let Some(user) = controller.messages().iter().rev().nth(1) {
        logging.log_turn(user)?;
    }
    match outcome {
        SubmitOutcome::Revealing => write_reveal(controller, out).await?,
        _ => {
            if let Some(reply) = controller.messages().last() {
                writeln!(out, "{}", reply.text)?;
            }
        }
    }
    writeln!(out)?;
    if let Some(reply) = controller.messages().last() {
        logging.log_turn(reply)?;
    }
    Ok(outcome)
}

/// Print each revealed prefix as the delta over the previous one.
pub async fn write_reveal<W: Write>(controller: &mut ChatController, out: &mut W) -> io::Result<()> {
    let mut shown = 0;
    loop {
        match controller.advance_reveal().await {
            RevealProgress::Frame(prefix) => {
                if let Some(delta) = prefix.get(shown..) {
                    write!(out, "{delta}")?;
                    out.flush()?;
                }
                shown = prefix.len();
            }
            RevealProgress::Finished | RevealProgress::Idle => break,
        }
    }
    writeln!(out)
}

fn prompt(stdout: &mut io::Stdout) -> io::Result<()> {
    write!(stdout, "> ")?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::core::completion::CompletionError;
    use crate::core::constants::ERROR_MARKER;
    use crate::core::controller::ControllerOptions;
    use crate::utils::test_utils::StubCompletion;

    fn controller_with(stub: StubCompletion) -> ChatController {
        ChatController::new(
            Arc::new(stub),
            ControllerOptions {
                reveal_interval: Duration::ZERO,
                request_timeout: None,
                greeting: None,
            },
        )
    }

    #[test]
    fn parses_repl_commands() {
        assert_eq!(parse_input("/quit"), ReplInput::Quit);
        assert_eq!(parse_input("  /log  "), ReplInput::Log(None));
        assert_eq!(
            parse_input("/log chat.txt"),
            ReplInput::Log(Some("chat.txt".to_string()))
        );
        assert_eq!(
            parse_input("/logistics of Howrah"),
            ReplInput::Message("/logistics of Howrah".to_string())
        );
        assert_eq!(
            parse_input("Is Salt Lake urban?"),
            ReplInput::Message("Is Salt Lake urban?".to_string())
        );
    }

    #[tokio::test]
    async fn turn_prints_whole_reply_and_logs_both_sides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("chat.log").to_string_lossy().into_owned();
        let mut logging = LoggingState::new(None);
        logging.set_log_file(log_path.clone()).expect("enable log");

        let mut controller = controller_with(StubCompletion::replying(&["Kolkata grew east."]));
        let mut out = Vec::new();
        let outcome = run_turn(&mut controller, "Where did Kolkata grow?", &logging, &mut out)
            .await
            .expect("turn");

        assert_eq!(outcome, SubmitOutcome::Revealing);
        assert_eq!(String::from_utf8(out).expect("utf8"), "Kolkata grew east.\n\n");
        assert!(!controller.is_pending());

        let log = std::fs::read_to_string(&log_path).expect("read log");
        assert!(log.contains("You: Where did Kolkata grow?\n\nKolkata grew east.\n"));
    }

    #[tokio::test]
    async fn failed_turn_prints_error_marker() {
        let mut controller = controller_with(StubCompletion::failing(CompletionError::Cancelled));
        let mut out = Vec::new();
        let outcome = run_turn(&mut controller, "hello", &LoggingState::new(None), &mut out)
            .await
            .expect("turn");

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            format!("{ERROR_MARKER}\n\n")
        );
    }

    #[tokio::test]
    async fn blank_line_prints_nothing() {
        let stub = StubCompletion::replying(&["unused"]);
        let mut controller = controller_with(stub);
        let mut out = Vec::new();
        let outcome = run_turn(&mut controller, "   ", &LoggingState::new(None), &mut out)
            .await
            .expect("turn");

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(out.is_empty());
        assert!(controller.messages().is_empty());
    }
}
