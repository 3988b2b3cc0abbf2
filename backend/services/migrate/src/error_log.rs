use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Destination for recoverable failures that must outlive the console.
pub trait ErrorSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Appends one timestamped line per failure to a file.
pub struct FileErrorSink {
    path: PathBuf,
}

impl FileErrorSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ErrorSink for FileErrorSink {
    fn record(&self, message: &str) {
        let line = format!("{} {message}\n", Utc::now().to_rfc3339());
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = written {
            tracing::error!(path = %self.path.display(), error = %e, "unable to write error log");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        let sink = FileErrorSink::new(&path);

        sink.record("Error adding Ticket ID 10: HTTP 400");
        sink.record("Error adding Ticket ID 11: HTTP 500");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" Error adding Ticket ID 10: HTTP 400"));
        assert!(lines[1].ends_with(" Error adding Ticket ID 11: HTTP 500"));

        let (timestamp, _) = lines[0].split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileErrorSink::new(&dir.path().join("missing").join("error.log"));
        sink.record("dropped");
    }
}
