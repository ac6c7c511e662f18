use serde::{Deserialize, Serialize};

use crate::locator::Locator;

/// Snapshot of one form control, identical in shape whether it came from a
/// parsed document or a live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub tag: String,
    pub r#type: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    /// Inner text for buttons; None for inputs.
    pub text: Option<String>,
    pub visible: bool,
    pub enabled: bool,
}

impl FormElement {
    pub fn is_input(&self) -> bool {
        self.tag == "input"
    }

    pub fn is_button(&self) -> bool {
        self.tag == "button"
    }

    pub fn type_is(&self, wanted: &str) -> bool {
        self.r#type.as_deref() == Some(wanted)
    }

    /// Button text with whitespace collapsed and lowercased, for keyword
    /// matching.
    pub fn normalized_text(&self) -> String {
        self.text
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Short description for log lines, e.g. `input#username`.
    pub fn describe(&self) -> String {
        match (&self.id, &self.name) {
            (Some(id), _) => format!("{}#{}", self.tag, id),
            (None, Some(name)) => format!("{}[name={}]", self.tag, name),
            (None, None) => self.tag.clone(),
        }
    }
}

/// Trim an attribute value, mapping absent or whitespace-only to None.
pub fn clean_attr(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A classified control together with the locator that addresses it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedField {
    pub element: FormElement,
    pub locator: Locator,
}

/// The distilled result of inspecting a login page. Any role may be absent;
/// downstream codegen degrades per-role instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginSignature {
    pub username_field: Option<DetectedField>,
    pub password_field: Option<DetectedField>,
    pub submit_control: Option<DetectedField>,
    /// Action attribute of the scoped form; empty when scanning the whole
    /// document or when the form declares none.
    pub form_action: String,
}

impl LoginSignature {
    pub fn is_empty(&self) -> bool {
        self.username_field.is_none()
            && self.password_field.is_none()
            && self.submit_control.is_none()
    }

    /// Comma-separated list of the roles that were found, for log lines.
    pub fn role_summary(&self) -> String {
        let mut roles = Vec::new();
        if self.username_field.is_some() {
            roles.push("username");
        }
        if self.password_field.is_some() {
            roles.push("password");
        }
        if self.submit_control.is_some() {
            roles.push("submit");
        }
        if roles.is_empty() {
            "none".to_string()
        } else {
            roles.join(", ")
        }
    }
}
