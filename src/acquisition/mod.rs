use thiserror::Error;

pub mod document;
pub mod fetch;
pub mod session;

/// Failures acquiring a page snapshot, from either substrate.
///
/// Classification never appears here: a page with no recognizable login
/// controls is a degraded-but-valid result, not an acquisition failure.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Network-level failure fetching the page.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Driver helper process failed to spawn.
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    DriverSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O on the driver's stdio channel failed.
    #[error("Driver session I/O: {0}")]
    SessionIo(String),

    /// Driver acknowledged a command with an error or a malformed payload.
    #[error("Driver rejected '{command}': {error}")]
    Protocol { command: String, error: String },

    /// A request could not be encoded for the driver.
    #[error("Failed to encode driver request ({context}): {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A line from the driver was not valid JSON.
    #[error("Malformed driver response ({context}): {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The operator abandoned an interactive capture.
    #[error("Interactive capture canceled: {0}")]
    Canceled(String),
}
