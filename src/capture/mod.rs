use std::io;

use crate::acquisition::AcquisitionError;
use crate::acquisition::session::DriverSession;
use crate::form::classifier;
use crate::form::form_model::LoginSignature;
use crate::trace::event::RunEvent;
use crate::trace::logger::RunLogger;

// ============================================================================
// Interactive capture
// ============================================================================

/// Capture a login signature from a live session the operator drives.
///
/// The flow is: navigate, hand the page to the operator, wait for `resume`
/// to return, then snapshot the filled form and classify it. The operator
/// fills the fields with their own marker values; only element metadata
/// crosses the bridge, never what they typed into the password field.
///
/// `resume` blocks until the operator signals they are done (typically a
/// line on stdin). An `Err` from it aborts the capture as canceled.
pub fn capture_with_session(
    session: &mut DriverSession,
    url: &str,
    resume: &mut dyn FnMut() -> io::Result<()>,
    log: &RunLogger,
) -> Result<LoginSignature, AcquisitionError> {
    session.navigate(url).map_err(|err| {
        log.log(&RunEvent::error("capture", &err).with_url(url));
        err
    })?;
    log.log(&RunEvent::info("capture", "Page loaded, waiting for operator").with_url(url));

    if let Err(e) = resume() {
        let err = AcquisitionError::Canceled(e.to_string());
        log.log(&RunEvent::error("capture", &err).with_url(url));
        return Err(err);
    }

    let snapshot = session.snapshot().map_err(|err| {
        log.log(&RunEvent::error("capture", &err).with_url(url));
        err
    })?;
    let elements: Vec<_> = snapshot
        .elements
        .iter()
        .map(|e| e.to_form_element())
        .collect();

    let roles = classifier::assign_roles_after_fill(&elements);
    let signature =
        classifier::compose_signature(&elements, &snapshot.elements, &roles, &snapshot.form_action);

    if signature.is_empty() {
        log.log(
            &RunEvent::warn("capture", "No login fields recognized in the filled page")
                .with_url(url),
        );
    } else {
        log.log(
            &RunEvent::info("capture", "Captured login signature")
                .with_url(url)
                .with_detail(signature.role_summary()),
        );
    }

    Ok(signature)
}
