use std::time::Duration;

use reqwest::blocking::Client;

use crate::acquisition::AcquisitionError;

/// Desktop UA sent with passive fetches; some login pages serve stripped-down
/// markup to unidentified clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Upper bound on the whole fetch, matching the session substrate's
/// readiness wait.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch raw page source for passive inspection. Redirects are followed;
/// non-success statuses are errors rather than content.
pub fn fetch_document(url: &str) -> Result<String, AcquisitionError> {
    let fetch_err = |source: reqwest::Error| AcquisitionError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(fetch_err)?;

    let response = client.get(url).send().map_err(fetch_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquisitionError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    response.text().map_err(fetch_err)
}
