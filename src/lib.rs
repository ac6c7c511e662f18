use std::io;
use std::path::Path;

use crate::acquisition::AcquisitionError;
use crate::acquisition::document::StaticDocument;
use crate::acquisition::fetch::fetch_document;
use crate::acquisition::session::{DriverConfig, DriverSession};
use crate::codegen::descriptor::render_descriptor;
use crate::codegen::plan::{DescriptorHeader, build_task_plan};
use crate::codegen::script::render_script;
use crate::codegen::{ArtifactRecord, CodegenError, write_artifact};
use crate::form::classifier;
use crate::form::form_model::LoginSignature;
use crate::trace::event::RunEvent;
use crate::trace::logger::RunLogger;

pub mod acquisition;
pub mod browsers;
pub mod capture;
pub mod cli;
pub mod codegen;
pub mod form;
pub mod locator;
pub mod trace;
pub mod validate;

// ============================================================================
// Pipeline entry points
// ============================================================================

/// Inspect a login page and produce its signature.
///
/// With `rendered` unset the page is fetched over plain HTTP and parsed as
/// delivered. With a driver config the page is first loaded in a live
/// browser, then the rendered document goes through the same static
/// pipeline, which picks up fields that only exist after scripts run.
pub fn scrape_login_page(
    url: &str,
    rendered: Option<&DriverConfig>,
    log: &RunLogger,
) -> Result<LoginSignature, AcquisitionError> {
    let html = match rendered {
        None => {
            log.log(&RunEvent::info("fetch", "Fetching page").with_url(url));
            fetch_document(url).map_err(|err| {
                log.log(&RunEvent::error("fetch", &err).with_url(url));
                err
            })?
        }
        Some(config) => {
            log.log(&RunEvent::info("session", "Loading page in live browser").with_url(url));
            rendered_document(config, url).map_err(|err| {
                log.log(&RunEvent::error("session", &err).with_url(url));
                err
            })?
        }
    };

    let signature = inspect_html(&html);

    if signature.is_empty() {
        log.log(&RunEvent::warn("classify", "No login fields found").with_url(url));
    } else {
        log.log(
            &RunEvent::info("classify", "Detected login signature")
                .with_url(url)
                .with_detail(signature.role_summary()),
        );
    }

    Ok(signature)
}

/// Load the page in a short-lived driver session and hand back its HTML.
fn rendered_document(config: &DriverConfig, url: &str) -> Result<String, AcquisitionError> {
    let mut session = DriverSession::launch(config)?;
    session.navigate(url)?;
    let html = session.document()?;
    session.quit()?;
    Ok(html)
}

/// Classify an already-acquired document. Pure; both scrape modes end here.
pub fn inspect_html(html: &str) -> LoginSignature {
    let document = StaticDocument::parse(html);
    let scan = document.scan();
    let roles = classifier::assign_roles(&scan.elements);
    classifier::compose_signature(&scan.elements, &scan.handles, &roles, &scan.form_action)
}

/// Run the interactive capture flow in a fresh driver session.
pub fn capture_login_page(
    url: &str,
    driver: &DriverConfig,
    resume: &mut dyn FnMut() -> io::Result<()>,
    log: &RunLogger,
) -> Result<LoginSignature, AcquisitionError> {
    let mut session = DriverSession::launch(driver).map_err(|err| {
        log.log(&RunEvent::error("session", &err).with_url(url));
        err
    })?;
    let signature = capture::capture_with_session(&mut session, url, resume, log)?;
    session.quit().map_err(|err| {
        log.log(&RunEvent::error("session", &err).with_url(url));
        err
    })?;
    Ok(signature)
}

// ============================================================================
// Artifact generation
// ============================================================================

/// Artifact records from one generation run.
#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub descriptor: Option<ArtifactRecord>,
    pub script: Option<ArtifactRecord>,
}

/// Render and write the requested artifacts from one signature.
///
/// Both artifacts come from the same step plan, so they always agree on
/// field order and on the submit strategy. Degraded signatures still
/// produce artifacts; missing roles are logged and their steps skipped.
pub fn generate_artifacts(
    signature: &LoginSignature,
    header: &DescriptorHeader,
    descriptor_path: Option<&Path>,
    script_path: Option<&Path>,
    log: &RunLogger,
) -> Result<GeneratedArtifacts, CodegenError> {
    if signature.username_field.is_none() {
        log.log(&RunEvent::warn("plan", "No username field detected; artifacts skip that step"));
    }
    if signature.password_field.is_none() {
        log.log(&RunEvent::warn("plan", "No password field detected; artifacts skip that step"));
    }
    if signature.submit_control.is_none() {
        log.log(&RunEvent::info("plan", "No submit control detected; artifacts press ENTER instead"));
    }

    let steps = build_task_plan(signature);

    let descriptor = match descriptor_path {
        Some(path) => {
            let content = render_descriptor(header, &steps);
            let record = write_artifact(path, &content).map_err(|err| {
                log.log(&RunEvent::error("descriptor", &err));
                err
            })?;
            log.log(
                &RunEvent::info("descriptor", "Wrote INI descriptor")
                    .with_artifact(record.path.display().to_string())
                    .with_fingerprint(&record.fingerprint),
            );
            Some(record)
        }
        None => None,
    };

    let script = match script_path {
        Some(path) => {
            let content = render_script(header, &steps);
            let record = write_artifact(path, &content).map_err(|err| {
                log.log(&RunEvent::error("script", &err));
                err
            })?;
            log.log(
                &RunEvent::info("script", "Wrote AutoIt script")
                    .with_artifact(record.path.display().to_string())
                    .with_fingerprint(&record.fingerprint),
            );
            Some(record)
        }
        None => None,
    };

    Ok(GeneratedArtifacts { descriptor, script })
}
