use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dispatch::MessageSender;

#[derive(Serialize)]
struct OutboxEntry<'a> {
    sent_at: DateTime<Utc>,
    number: &'a str,
    body: &'a str,
}

/// File-backed messaging transport: appends one JSON line per sent message.
///
/// Stands in for the platform SMS service; anything watching the outbox file
/// (or a human reading it) sees exactly what would have gone out.
pub struct FileOutbox {
    path: PathBuf,
}

impl FileOutbox {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageSender for FileOutbox {
    fn send_text(&mut self, number: &str, body: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }

        let entry = OutboxEntry {
            sent_at: Utc::now(),
            number,
            body,
        };
        let line = serde_json::to_string(&entry).map_err(|e| e.to_string())?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| e.to_string())?;
        writeln!(file, "{line}").map_err(|e| e.to_string())?;

        log::info!("Message queued for {number}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_send_appends_one_line_per_message() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        let mut outbox = FileOutbox::new(path.clone());

        outbox
            .send_text("+911234567890", "I need help. Here: 17.6868,83.2185")
            .unwrap();
        outbox.send_text("+911234567890", "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("+911234567890"));
        assert!(lines[0].contains("17.6868"));
    }

    #[test]
    fn test_send_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/outbox.jsonl");
        let mut outbox = FileOutbox::new(path.clone());

        outbox.send_text("+911234567890", "hello").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_entries_are_valid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        let mut outbox = FileOutbox::new(path.clone());

        outbox.send_text("+911234567890", "body text").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(value["number"], "+911234567890");
        assert_eq!(value["body"], "body text");
        assert!(value["sent_at"].is_string());
    }
}
