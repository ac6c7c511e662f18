use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::acquisition::AcquisitionError;
use crate::browsers::Browser;
use crate::form::form_model::{FormElement, clean_attr};
use crate::locator::{ElementDescriptor, PathStep};

/// How to start the driver helper process.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Path to the Node.js driver script.
    pub script: String,
    pub browser: Browser,
}

/// Request sent to the driver over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DriverRequest {
    Navigate { cmd: &'static str, url: String },
    Document { cmd: &'static str },
    Snapshot { cmd: &'static str },
    Quit { cmd: &'static str },
}

impl DriverRequest {
    pub fn navigate(url: &str) -> Self {
        DriverRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn document() -> Self {
        DriverRequest::Document { cmd: "document" }
    }

    pub fn snapshot() -> Self {
        DriverRequest::Snapshot { cmd: "snapshot" }
    }

    pub fn quit() -> Self {
        DriverRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the driver over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct DriverResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub snapshot: Option<PageSnapshot>,
}

/// Everything the driver reports about the current page's controls.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSnapshot {
    /// Action of the form enclosing the password field; empty when none.
    #[serde(default)]
    pub form_action: String,
    #[serde(default)]
    pub elements: Vec<CapturedElement>,
}

/// One input or button element as reported by the driver, in document order.
///
/// The driver resolves DOM properties, so `type` is the effective type (a
/// bare `<input>` reports "text") and `visible`/`enabled` reflect computed
/// style. `ancestry` is the element's root-to-leaf chain with sibling
/// ordinals, absent for detached nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedElement {
    pub tag: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ancestry: Option<Vec<PathStep>>,
}

impl CapturedElement {
    /// Normalize into the substrate-independent snapshot shape.
    pub fn to_form_element(&self) -> FormElement {
        FormElement {
            tag: self.tag.to_lowercase(),
            r#type: clean_attr(self.r#type.as_deref()).map(|t| t.to_lowercase()),
            id: clean_attr(self.id.as_deref()),
            name: clean_attr(self.name.as_deref()),
            value: clean_attr(self.value.as_deref()),
            text: clean_attr(self.text.as_deref()),
            visible: self.visible,
            enabled: self.enabled,
        }
    }
}

impl ElementDescriptor for CapturedElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn ancestry(&self) -> Option<Vec<PathStep>> {
        self.ancestry.clone()
    }
}

/// A persistent browser session backed by the Node.js driver.
///
/// Launches a long-lived process that keeps a real browser open. Commands are
/// sent as NDJSON over stdin, responses read from stdout; the first line must
/// be the ready signal.
pub struct DriverSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl DriverSession {
    /// Launch the driver process and wait for its ready signal.
    pub fn launch(config: &DriverConfig) -> Result<Self, AcquisitionError> {
        let mut child = Command::new("node")
            .arg(&config.script)
            .arg(config.browser.descriptor_name())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AcquisitionError::DriverSpawn {
                script: config.script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AcquisitionError::SessionIo("Failed to capture stdin of driver process".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AcquisitionError::SessionIo("Failed to capture stdout of driver process".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| AcquisitionError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: DriverResponse =
            serde_json::from_str(line.trim()).map_err(|e| AcquisitionError::Decode {
                context: "driver ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AcquisitionError::Protocol {
                command: "launch".into(),
                error: "Did not receive ready signal from driver".into(),
            });
        }

        Ok(DriverSession {
            child,
            stdin,
            reader,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &DriverRequest) -> Result<DriverResponse, AcquisitionError> {
        let json = serde_json::to_string(request).map_err(|e| AcquisitionError::Encode {
            context: "DriverRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| AcquisitionError::SessionIo(format!("Failed to write to driver stdin: {}", e)))?;

        self.stdin
            .flush()
            .map_err(|e| AcquisitionError::SessionIo(format!("Failed to flush driver stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| AcquisitionError::SessionIo(format!("Failed to read from driver stdout: {}", e)))?;

        if line.trim().is_empty() {
            return Err(AcquisitionError::SessionIo(
                "Empty response from driver (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AcquisitionError::Decode {
            context: "driver response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &DriverRequest,
        command_name: &str,
    ) -> Result<DriverResponse, AcquisitionError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AcquisitionError::Protocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL. The driver applies its bounded readiness wait (10s
    /// for the document body) before acknowledging.
    pub fn navigate(&mut self, url: &str) -> Result<(), AcquisitionError> {
        let request = DriverRequest::navigate(url);
        self.send_ok(&request, "navigate")?;
        Ok(())
    }

    /// Rendered page source of the current page.
    pub fn document(&mut self) -> Result<String, AcquisitionError> {
        let request = DriverRequest::document();
        let response = self.send_ok(&request, "document")?;
        response.html.ok_or_else(|| AcquisitionError::Protocol {
            command: "document".into(),
            error: "No html in document response".into(),
        })
    }

    /// Snapshot all input and button elements of the current page.
    pub fn snapshot(&mut self) -> Result<PageSnapshot, AcquisitionError> {
        let request = DriverRequest::snapshot();
        let response = self.send_ok(&request, "snapshot")?;
        response.snapshot.ok_or_else(|| AcquisitionError::Protocol {
            command: "snapshot".into(),
            error: "No snapshot in snapshot response".into(),
        })
    }

    /// Quit the driver session.
    pub fn quit(&mut self) -> Result<(), AcquisitionError> {
        let request = DriverRequest::quit();
        // Best-effort quit; the process may already be gone
        let _ = self.send(&request);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for DriverSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
