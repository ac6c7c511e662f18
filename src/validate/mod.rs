use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

use crate::browsers::Browser;
use crate::trace::event::RunEvent;
use crate::trace::logger::RunLogger;

// ============================================================================
// External replay validation
// ============================================================================

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to launch validator '{executable}': {source}")]
    Launch {
        executable: String,
        #[source]
        source: std::io::Error,
    },
}

/// Arguments for one validation run of the external replay engine.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// Engine binary, resolved through PATH unless absolute.
    pub executable: String,
    pub descriptor: PathBuf,
    pub target_url: String,
    pub browser: Browser,
    /// Real credentials substituted for the descriptor placeholders. They go
    /// into the engine's argv and nowhere else; the run log never sees them.
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct ValidationOutcome {
    /// True only when the engine exited with status zero.
    pub passed: bool,
    /// Engine stderr, trimmed. Empty on a clean pass.
    pub diagnostic: String,
}

/// Replay the descriptor through the external engine and report its verdict.
///
/// The engine's contract is `key=value` argv tokens and a process exit code;
/// exit zero means the full login sequence executed. Credentials are optional
/// so a descriptor can be smoke-tested with its placeholders intact.
pub fn run_validation(
    request: &ValidationRequest,
    log: &RunLogger,
) -> Result<ValidationOutcome, ValidationError> {
    let mut command = Command::new(&request.executable);
    command
        .arg(format!("ini={}", request.descriptor.display()))
        .arg(format!("TargetURL={}", request.target_url))
        .arg(format!("BrowserName={}", request.browser.descriptor_name()));
    if let Some(username) = &request.username {
        command.arg(format!("username={}", username));
    }
    if let Some(password) = &request.password {
        command.arg(format!("password={}", password));
    }

    log.log(
        &RunEvent::info("validate", "Launching replay engine")
            .with_url(&request.target_url)
            .with_detail(format!(
                "{} ini={}",
                request.executable,
                request.descriptor.display()
            )),
    );

    let output = command.output().map_err(|e| {
        let err = ValidationError::Launch {
            executable: request.executable.clone(),
            source: e,
        };
        log.log(&RunEvent::error("validate", &err));
        err
    })?;

    let passed = output.status.success();
    let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if passed {
        log.log(&RunEvent::info("validate", "Replay engine reported success"));
    } else {
        let detail = if diagnostic.is_empty() {
            format!("exit status {}", output.status)
        } else {
            diagnostic.clone()
        };
        log.log(&RunEvent::warn("validate", "Replay engine reported failure").with_detail(detail));
    }

    Ok(ValidationOutcome { passed, diagnostic })
}
