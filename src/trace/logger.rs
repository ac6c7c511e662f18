use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::event::RunEvent;

/// Appends run events as JSON lines. Logging failures degrade to stderr
/// warnings; the pipeline never stops because the log is unwritable.
pub struct RunLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl RunLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open run log '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    /// A logger that drops every event. Used by tests and library callers
    /// that do not want a log file.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn log(&self, event: &RunEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // logging disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize run event: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: run logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            eprintln!("Warning: failed to write run event: {}", e);
        }
    }
}
