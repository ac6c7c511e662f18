use crate::form::form_model::{DetectedField, FormElement, LoginSignature};
use crate::locator::{ElementDescriptor, synthesize};

const USERNAME_HINTS: [&str; 3] = ["user", "email", "login"];
const SUBMIT_TEXT_HINTS: [&str; 3] = ["submit", "login", "sign in"];
const SUBMIT_VALUE_HINTS: [&str; 2] = ["login", "sign in"];

/// Role indices into the candidate slice. Classification is index-based so
/// it stays a pure function of the snapshot, independent of which substrate
/// produced the elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    pub username: Option<usize>,
    pub password: Option<usize>,
    pub submit: Option<usize>,
}

/// Classify a passively acquired snapshot.
///
/// One pass in document order; the first qualifying element takes a role and
/// keeps it. The password rule is checked first per element, so a
/// password-typed input never doubles as a username candidate regardless of
/// its name.
pub fn assign_roles(candidates: &[FormElement]) -> RoleAssignment {
    let mut roles = RoleAssignment::default();

    for (index, el) in candidates.iter().enumerate() {
        if el.is_input() && el.type_is("password") {
            if roles.password.is_none() {
                roles.password = Some(index);
            }
            continue;
        }
        if roles.username.is_none() && is_username_candidate(el) {
            roles.username = Some(index);
        }
    }

    roles.submit = find_submit(candidates);
    roles
}

/// Classify a post-fill snapshot from a live session.
///
/// Only visible and enabled inputs are considered for the field roles; the
/// username is whichever text/email input the operator actually filled. A
/// later qualifying element replaces an earlier one, matching the scan order
/// of the capture flow. Submit detection reuses the passive cascade,
/// unfiltered by visibility.
pub fn assign_roles_after_fill(candidates: &[FormElement]) -> RoleAssignment {
    let mut roles = RoleAssignment::default();

    for (index, el) in candidates.iter().enumerate() {
        if !el.is_input() || !el.visible || !el.enabled {
            continue;
        }
        if el.type_is("password") {
            roles.password = Some(index);
            continue;
        }
        let textual = matches!(el.r#type.as_deref(), Some("text") | Some("email"));
        if textual && el.value.is_some() {
            roles.username = Some(index);
        }
    }

    roles.submit = find_submit(candidates);
    roles
}

/// Build the signature from an assignment, synthesizing one locator per
/// detected role. `elements` and `descriptors` run parallel: both describe
/// the same candidate list in the same order.
pub fn compose_signature<D: ElementDescriptor>(
    elements: &[FormElement],
    descriptors: &[D],
    roles: &RoleAssignment,
    form_action: &str,
) -> LoginSignature {
    let field = |index: Option<usize>| {
        index.map(|i| DetectedField {
            element: elements[i].clone(),
            locator: synthesize(&descriptors[i]),
        })
    };

    LoginSignature {
        username_field: field(roles.username),
        password_field: field(roles.password),
        submit_control: field(roles.submit),
        form_action: form_action.to_string(),
    }
}

fn is_username_candidate(el: &FormElement) -> bool {
    if !el.is_input() {
        return false;
    }
    if matches!(el.r#type.as_deref(), Some("text") | Some("email")) {
        return true;
    }
    attr_has_hint(el.name.as_deref()) || attr_has_hint(el.id.as_deref())
}

fn attr_has_hint(value: Option<&str>) -> bool {
    value.is_some_and(|v| contains_any(v, &USERNAME_HINTS))
}

/// Three-tier submit cascade; each tier scans the whole candidate list before
/// falling through to the next.
fn find_submit(candidates: &[FormElement]) -> Option<usize> {
    // Tier 1: explicitly submit-typed input or button
    if let Some(index) = candidates
        .iter()
        .position(|el| (el.is_input() || el.is_button()) && el.type_is("submit"))
    {
        return Some(index);
    }

    // Tier 2: button whose visible text names the submit intent
    if let Some(index) = candidates
        .iter()
        .position(|el| el.is_button() && contains_any(&el.normalized_text(), &SUBMIT_TEXT_HINTS))
    {
        return Some(index);
    }

    // Tier 3: input whose value attribute names it
    candidates.iter().position(|el| {
        el.is_input()
            && el
                .value
                .as_deref()
                .is_some_and(|v| contains_any(v, &SUBMIT_VALUE_HINTS))
    })
}

fn contains_any(value: &str, hints: &[&str]) -> bool {
    let lower = value.to_lowercase();
    hints.iter().any(|hint| lower.contains(hint))
}
