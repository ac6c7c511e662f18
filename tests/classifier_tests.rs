use login_forge::form::{
    classifier::{RoleAssignment, assign_roles, assign_roles_after_fill, compose_signature},
    form_model::FormElement,
};
use login_forge::locator::{ElementDescriptor, Locator, PathStep};

// ============================================================================
// Fixtures
// ============================================================================

fn input(r#type: Option<&str>, id: Option<&str>, name: Option<&str>) -> FormElement {
    FormElement {
        tag: "input".into(),
        r#type: r#type.map(str::to_string),
        id: id.map(str::to_string),
        name: name.map(str::to_string),
        value: None,
        text: None,
        visible: true,
        enabled: true,
    }
}

fn button(r#type: Option<&str>, text: &str) -> FormElement {
    FormElement {
        tag: "button".into(),
        r#type: r#type.map(str::to_string),
        id: None,
        name: None,
        value: None,
        text: Some(text.to_string()),
        visible: true,
        enabled: true,
    }
}

/// Minimal descriptor for exercising signature composition without a parsed
/// document behind it.
struct FakeDescriptor {
    tag: String,
    id: Option<String>,
    name: Option<String>,
}

impl FakeDescriptor {
    fn with_id(id: &str) -> Self {
        FakeDescriptor {
            tag: "input".into(),
            id: Some(id.to_string()),
            name: None,
        }
    }
}

impl ElementDescriptor for FakeDescriptor {
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
        None
    }
}

// ============================================================================
// Passive role assignment
// ============================================================================

#[test]
fn passive_assigns_first_password_and_first_username() {
    let elements = vec![
        input(Some("text"), Some("user"), None),
        input(Some("password"), Some("pass"), None),
        input(Some("password"), Some("pin"), None),
        input(Some("text"), Some("other"), None),
    ];

    let roles = assign_roles(&elements);

    assert_eq!(roles.username, Some(0));
    assert_eq!(roles.password, Some(1), "first password-typed input wins");
}

#[test]
fn password_typed_input_never_takes_username_role() {
    // The name alone would qualify it as a username candidate
    let elements = vec![input(Some("password"), None, Some("user_secret"))];

    let roles = assign_roles(&elements);

    assert_eq!(roles.password, Some(0));
    assert_eq!(roles.username, None, "password rule is checked first");
}

#[test]
fn username_found_by_type() {
    let elements = vec![input(Some("email"), None, None)];
    assert_eq!(assign_roles(&elements).username, Some(0));

    let elements = vec![input(Some("text"), None, None)];
    assert_eq!(assign_roles(&elements).username, Some(0));
}

#[test]
fn username_found_by_name_or_id_hint() {
    // Unrecognized type, but the name carries a hint
    let elements = vec![input(Some("search"), None, Some("login_field"))];
    assert_eq!(assign_roles(&elements).username, Some(0));

    // Hint in the id attribute, matched case-insensitively
    let elements = vec![input(Some("search"), Some("UserBox"), None)];
    assert_eq!(assign_roles(&elements).username, Some(0));

    // No hint anywhere
    let elements = vec![input(Some("search"), Some("query"), Some("q"))];
    assert_eq!(assign_roles(&elements).username, None);
}

#[test]
fn missing_type_does_not_qualify_as_text() {
    let elements = vec![input(None, None, Some("fullname"))];
    assert_eq!(assign_roles(&elements).username, None);

    // Name hints still apply to a typeless input
    let elements = vec![input(None, None, Some("username"))];
    assert_eq!(assign_roles(&elements).username, Some(0));
}

#[test]
fn passive_keeps_the_first_qualifying_username() {
    let elements = vec![
        input(Some("text"), Some("first"), None),
        input(Some("text"), Some("second"), None),
    ];

    assert_eq!(assign_roles(&elements).username, Some(0));
}

#[test]
fn empty_candidate_list_assigns_nothing() {
    let roles = assign_roles(&[]);
    assert_eq!(roles, RoleAssignment::default());
}

// ============================================================================
// Submit cascade
// ============================================================================

#[test]
fn submit_typed_control_beats_earlier_text_match() {
    // The button appears first, but tier 1 scans the whole list before
    // text matching gets a turn
    let elements = vec![
        button(None, "Log In"),
        input(Some("submit"), Some("go"), None),
    ];

    assert_eq!(assign_roles(&elements).submit, Some(1));
}

#[test]
fn submit_found_by_button_text() {
    let elements = vec![
        input(Some("text"), Some("user"), None),
        button(None, "  Sign \n In  "),
    ];

    let roles = assign_roles(&elements);
    assert_eq!(roles.submit, Some(1), "whitespace collapses before matching");
}

#[test]
fn submit_found_by_input_value() {
    let elements = vec![
        input(Some("text"), Some("user"), None),
        FormElement {
            value: Some("Login here".into()),
            ..input(Some("image"), None, None)
        },
    ];

    assert_eq!(assign_roles(&elements).submit, Some(1));
}

#[test]
fn no_submit_control_found() {
    let elements = vec![
        input(Some("text"), Some("user"), None),
        button(None, "Forgot password?"),
    ];

    assert_eq!(assign_roles(&elements).submit, None);
}

// ============================================================================
// Post-fill role assignment
// ============================================================================

fn filled(mut el: FormElement, value: &str) -> FormElement {
    el.value = Some(value.to_string());
    el
}

#[test]
fn post_fill_username_is_the_filled_text_input() {
    let elements = vec![
        input(Some("text"), Some("search"), None),
        filled(input(Some("text"), Some("user"), None), "demo"),
        input(Some("password"), Some("pass"), None),
    ];

    let roles = assign_roles_after_fill(&elements);

    assert_eq!(roles.username, Some(1), "unfilled inputs are not candidates");
    assert_eq!(roles.password, Some(2));
}

#[test]
fn post_fill_later_element_replaces_earlier() {
    let elements = vec![
        filled(input(Some("text"), Some("first"), None), "a"),
        filled(input(Some("email"), Some("second"), None), "b"),
        input(Some("password"), Some("p1"), None),
        input(Some("password"), Some("p2"), None),
    ];

    let roles = assign_roles_after_fill(&elements);

    assert_eq!(roles.username, Some(1));
    assert_eq!(roles.password, Some(3));
}

#[test]
fn post_fill_skips_invisible_and_disabled_inputs() {
    let mut hidden = filled(input(Some("text"), Some("ghost"), None), "x");
    hidden.visible = false;
    let mut disabled = input(Some("password"), Some("locked"), None);
    disabled.enabled = false;

    let elements = vec![
        hidden,
        disabled,
        filled(input(Some("text"), Some("user"), None), "demo"),
        input(Some("password"), Some("pass"), None),
    ];

    let roles = assign_roles_after_fill(&elements);

    assert_eq!(roles.username, Some(2));
    assert_eq!(roles.password, Some(3));
}

#[test]
fn post_fill_reuses_the_submit_cascade() {
    let elements = vec![
        filled(input(Some("text"), Some("user"), None), "demo"),
        input(Some("password"), Some("pass"), None),
        button(Some("submit"), "Sign in"),
    ];

    assert_eq!(assign_roles_after_fill(&elements).submit, Some(2));
}

#[test]
fn post_fill_with_blank_username_yields_partial_signature() {
    // The operator filled only the password; the text input stayed empty
    let elements = vec![
        input(Some("text"), Some("user"), None),
        input(Some("password"), Some("pass"), None),
        button(Some("submit"), "Sign in"),
    ];

    let roles = assign_roles_after_fill(&elements);
    assert_eq!(roles.username, None, "an untouched input is not the username");
    assert_eq!(roles.password, Some(1));

    let descriptors = vec![
        FakeDescriptor::with_id("user"),
        FakeDescriptor::with_id("pass"),
        FakeDescriptor::with_id("go"),
    ];
    let signature = compose_signature(&elements, &descriptors, &roles, "");

    assert!(signature.username_field.is_none());
    let password = signature.password_field.as_ref().unwrap();
    assert_eq!(password.locator, Locator::Id("pass".into()));
    assert_eq!(signature.role_summary(), "password, submit");
}

// ============================================================================
// Signature composition
// ============================================================================

#[test]
fn compose_maps_roles_through_parallel_descriptors() {
    let elements = vec![
        input(Some("text"), Some("user"), None),
        input(Some("password"), Some("pass"), None),
        button(Some("submit"), "Sign in"),
    ];
    let descriptors = vec![
        FakeDescriptor::with_id("user"),
        FakeDescriptor::with_id("pass"),
        FakeDescriptor::with_id("go"),
    ];
    let roles = assign_roles(&elements);

    let signature = compose_signature(&elements, &descriptors, &roles, "/session");

    assert_eq!(signature.form_action, "/session");
    assert_eq!(signature.role_summary(), "username, password, submit");

    let username = signature.username_field.unwrap();
    assert_eq!(username.element.id.as_deref(), Some("user"));
    assert_eq!(username.locator, Locator::Id("user".into()));

    let submit = signature.submit_control.unwrap();
    assert_eq!(submit.locator, Locator::Id("go".into()));
}

#[test]
fn compose_with_no_roles_is_empty() {
    let elements: Vec<FormElement> = vec![];
    let descriptors: Vec<FakeDescriptor> = vec![];

    let signature = compose_signature(&elements, &descriptors, &RoleAssignment::default(), "");

    assert!(signature.is_empty());
    assert_eq!(signature.role_summary(), "none");
}
