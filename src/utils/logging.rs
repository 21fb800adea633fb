use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::message::{ChatMessage, ChatRole};

/// Route `tracing` output to stderr. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Plain-text transcript of a chat session.
pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A path given here is remembered but not written to until
    /// [`set_log_file`](Self::set_log_file) or a toggle activates it.
    pub fn new(log_file: Option<String>) -> Self {
        LoggingState {
            file_path: log_file,
            is_active: false,
        }
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        self.test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;
        self.log_message(&format!(
            "## GeoAI session started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                if self.is_active {
                    self.log_message(&format!(
                        "## Logging paused {}",
                        Local::now().format("%Y-%m-%d %H:%M:%S")
                    ))?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    /// User turns get a `You:` prefix; assistant turns are written as-is.
    pub fn log_turn(&self, message: &ChatMessage) -> Result<(), Box<dyn std::error::Error>> {
        match message.role {
            ChatRole::User => self.log_message(&format!("You: {}", message.text)),
            ChatRole::Assistant if message.text.is_empty() => Ok(()),
            ChatRole::Assistant => self.log_message(&message.text),
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_deref() else {
            return Ok(());
        };
        if !self.is_active {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }

    fn test_file_access(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir
            .path()
            .join("session.log")
            .to_string_lossy()
            .into_owned();
        (dir, path)
    }

    #[test]
    fn inactive_logger_writes_nothing() {
        let (_dir, path) = temp_log();
        let logging = LoggingState::new(Some(path.clone()));

        logging
            .log_turn(&ChatMessage::user("hello"))
            .expect("log");
        assert!(!Path::new(&path).exists());
        assert_eq!(logging.get_status_string(), "paused (session.log)");
    }

    #[test]
    fn transcript_records_turns_with_header() {
        let (_dir, path) = temp_log();
        let mut logging = LoggingState::new(None);
        assert_eq!(logging.get_status_string(), "disabled");

        let status = logging.set_log_file(path.clone()).expect("enable");
        assert_eq!(status, format!("Logging enabled to: {path}"));
        logging
            .log_turn(&ChatMessage::user("Tell me about Salt Lake"))
            .expect("log user");
        logging
            .log_turn(&ChatMessage::assistant(""))
            .expect("skip empty");
        logging
            .log_turn(&ChatMessage::assistant("It is a planned township.\nSecond line."))
            .expect("log assistant");

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("## GeoAI session started "));
        assert_eq!(
            &lines[1..],
            &[
                "",
                "You: Tell me about Salt Lake",
                "",
                "It is a planned township.",
                "Second line.",
                "",
            ]
        );
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (_dir, path) = temp_log();
        let mut logging = LoggingState::new(None);
        assert!(logging.toggle_logging().is_err());

        logging.set_log_file(path.clone()).expect("enable");
        assert!(logging
            .toggle_logging()
            .expect("pause")
            .starts_with("Logging paused"));
        assert!(!logging.is_active());
        logging
            .log_turn(&ChatMessage::user("not recorded"))
            .expect("log");

        logging.toggle_logging().expect("resume");
        assert!(logging.is_active());
        let contents = std::fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("## Logging paused"));
        assert!(!contents.contains("not recorded"));
    }
}
