//! Plain-text transcript logging.
//!
//! Chat sessions can append every sent message to a log file.
//! Logging can be paused and resumed without losing the file path.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::message::Message;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Self {
        let is_active = log_file.is_some();
        LoggingState {
            file_path: log_file,
            is_active,
        }
    }

    /// Whether a log file has been configured (active or paused).
    pub fn is_configured(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        self.test_file_access(&path)?;
        self.file_path = Some(path.clone());
        self.is_active = true;
        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                self.is_active = !self.is_active;
                if self.is_active {
                    Ok(format!("Logging resumed to: {path}"))
                } else {
                    Ok(format!("Logging paused (file: {path})"))
                }
            }
            None => Err("No log file specified. Pass --log <filename> to enable logging.".into()),
        }
    }

    /// Append one message to the log, prefixed with its author label and
    /// timestamp, with a blank line after for spacing.
    pub fn log_message(
        &self,
        message: &Message,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{} [{}]:",
            label,
            message.created_at.format("%b %-d, %H:%M")
        )?;
        for line in message.text.lines() {
            writeln!(writer, "{line}")?;
        }
        for attachment in &message.attachments {
            writeln!(writer, "(attachment: {}, {} bytes)", attachment.name, attachment.size)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!(
                "active ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
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
    use crate::core::message::{Author, MessageId};
    use chrono::Local;
    use std::fs;
    use tempfile::tempdir;

    fn message(text: &str) -> Message {
        Message::new(MessageId(1), Author::Me, text, Local::now())
    }

    #[test]
    fn test_logging_disabled_without_file() {
        let logging = LoggingState::new(None);
        assert_eq!(logging.get_status_string(), "disabled");
        // No file, no error: logging is a no-op.
        logging.log_message(&message("hi"), "You").unwrap();
    }

    #[test]
    fn test_messages_append_with_label_and_spacing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let logging = LoggingState::new(Some(path.to_string_lossy().into_owned()));

        logging.log_message(&message("hello\nthere"), "You").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("You ["));
        assert!(contents.contains("hello\nthere\n\n"));
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let mut logging = LoggingState::new(Some(path.to_string_lossy().into_owned()));

        let status = logging.toggle_logging().unwrap();
        assert!(status.starts_with("Logging paused"));
        logging.log_message(&message("dropped"), "You").unwrap();
        assert!(!path.exists());

        logging.toggle_logging().unwrap();
        logging.log_message(&message("kept"), "You").unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("kept"));
    }

    #[test]
    fn test_toggle_without_file_is_an_error() {
        let mut logging = LoggingState::new(None);
        assert!(logging.toggle_logging().is_err());
    }

    #[test]
    fn test_set_log_file_enables_logging_at_runtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.log");
        let mut logging = LoggingState::new(None);
        assert!(!logging.is_configured());

        let status = logging
            .set_log_file(path.to_string_lossy().into_owned())
            .unwrap();
        assert!(status.starts_with("Logging enabled"));
        assert!(logging.is_configured());
        assert!(logging.get_status_string().starts_with("active"));

        logging.log_message(&message("hi"), "You").unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("hi"));
    }

    #[test]
    fn test_set_log_file_rejects_unwritable_paths() {
        let mut logging = LoggingState::new(None);
        assert!(logging
            .set_log_file("/no/such/dir/chat.log".to_string())
            .is_err());
        assert!(!logging.is_configured());
    }
}
