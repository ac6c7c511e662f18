use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// One line of the JSONL run log.
///
/// Events never carry credentials. Anything credential-adjacent (validator
/// argv, captured field values) is reduced to role names before it gets here.
#[derive(Debug, Serialize)]
pub struct RunEvent {
    pub timestamp_ms: u128,
    pub severity: Severity,

    /// Pipeline stage that emitted the event: "fetch", "session", "classify",
    /// "capture", "plan", "descriptor", "script", "validate".
    pub stage: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl RunEvent {
    fn now(severity: Severity, stage: &str, message: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            severity,
            stage: stage.to_string(),
            message: message.to_string(),
            url: None,
            detail: None,
            artifact: None,
            fingerprint: None,
        }
    }

    pub fn info(stage: &str, message: impl ToString) -> Self {
        Self::now(Severity::Info, stage, message)
    }

    pub fn warn(stage: &str, message: impl ToString) -> Self {
        Self::now(Severity::Warn, stage, message)
    }

    pub fn error(stage: &str, message: impl ToString) -> Self {
        Self::now(Severity::Error, stage, message)
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_artifact(mut self, path: impl ToString) -> Self {
        self.artifact = Some(path.to_string());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl ToString) -> Self {
        self.fingerprint = Some(fingerprint.to_string());
        self
    }
}
