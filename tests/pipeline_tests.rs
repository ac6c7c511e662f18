use login_forge::browsers::Browser;
use login_forge::codegen::plan::DescriptorHeader;
use login_forge::locator::Locator;
use login_forge::trace::{event::RunEvent, logger::RunLogger};
use login_forge::{generate_artifacts, inspect_html};

// ============================================================================
// Static inspection end to end
// ============================================================================

const CLASSIC_LOGIN_PAGE: &str = r#"
<html><body>
<form action="/session" method="post">
  <input type="hidden" name="authenticity_token" value="abc123">
  <label for="login_field">Username or email address</label>
  <input type="text" name="login" id="login_field">
  <label for="password">Password</label>
  <input type="password" name="password" id="password">
  <input type="submit" name="commit" value="Sign in">
</form>
</body></html>
"#;

#[test]
fn classic_login_page_yields_full_signature() {
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    assert_eq!(signature.role_summary(), "username, password, submit");
    assert_eq!(signature.form_action, "/session");

    let username = signature.username_field.unwrap();
    assert_eq!(username.locator, Locator::Id("login_field".into()));

    let password = signature.password_field.unwrap();
    assert_eq!(password.locator, Locator::Id("password".into()));

    // The submit input has no id, so its locator drops to the name tier
    let submit = signature.submit_control.unwrap();
    assert_eq!(submit.locator, Locator::Name("commit".into()));
}

#[test]
fn hidden_token_field_is_not_mistaken_for_username() {
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    let username = signature.username_field.unwrap();
    assert_eq!(username.element.name.as_deref(), Some("login"));
}

#[test]
fn password_form_wins_over_earlier_forms() {
    let html = r#"
    <html><body>
    <form action="/search"><input type="text" name="q"></form>
    <form action="/login">
      <input type="text" name="user">
      <input type="password" name="pw">
    </form>
    </body></html>
    "#;

    let signature = inspect_html(html);

    assert_eq!(signature.form_action, "/login");
    let username = signature.username_field.unwrap();
    assert_eq!(
        username.element.name.as_deref(),
        Some("user"),
        "the search box outside the scoped form must not be considered"
    );
}

#[test]
fn first_form_is_scoped_when_no_password_exists() {
    let html = r#"
    <html><body>
    <form action="/subscribe"><input type="email" name="email"></form>
    <form action="/other"><input type="text" name="x"></form>
    </body></html>
    "#;

    let signature = inspect_html(html);

    assert_eq!(signature.form_action, "/subscribe");
    let username = signature.username_field.unwrap();
    assert_eq!(username.element.name.as_deref(), Some("email"));
}

#[test]
fn formless_page_scans_the_whole_document() {
    let html = r#"
    <html><body>
    <input type="text" id="u">
    <input type="password" id="p">
    <button>Sign in</button>
    </body></html>
    "#;

    let signature = inspect_html(html);

    assert_eq!(signature.form_action, "");
    assert_eq!(signature.role_summary(), "username, password, submit");

    // The anonymous button gets a structural path
    let submit = signature.submit_control.unwrap();
    assert_eq!(submit.locator.xpath(), "/html/body/button");
}

#[test]
fn page_without_login_controls_yields_empty_signature() {
    let signature = inspect_html("<html><body><p>Nothing here</p></body></html>");

    assert!(signature.is_empty());
    assert_eq!(signature.role_summary(), "none");
}

#[test]
fn inspection_is_idempotent() {
    assert_eq!(
        inspect_html(CLASSIC_LOGIN_PAGE),
        inspect_html(CLASSIC_LOGIN_PAGE)
    );
}

// ============================================================================
// Artifact generation end to end
// ============================================================================

fn chrome_header() -> DescriptorHeader {
    DescriptorHeader {
        browser: Browser::Chrome,
        target_url: "https://example.com/login".to_string(),
    }
}

#[test]
fn generate_writes_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("example_com_login.ini");
    let au3 = dir.path().join("example_com_login.au3");
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    let artifacts = generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&ini),
        Some(&au3),
        &RunLogger::disabled(),
    )
    .unwrap();

    let descriptor = artifacts.descriptor.unwrap();
    assert_eq!(descriptor.path, ini);
    let ini_text = std::fs::read_to_string(&ini).unwrap();
    assert!(ini_text.starts_with("[General]\n"));
    assert!(ini_text.contains("XPathElement=//*[@id='login_field']"));
    assert!(ini_text.contains("UserName=%username%"));

    let script = artifacts.script.unwrap();
    assert_eq!(script.path, au3);
    let au3_text = std::fs::read_to_string(&au3).unwrap();
    assert!(au3_text.contains("Func example_com_login($username, $password)"));
    assert!(au3_text.contains("ControlSend($hWnd, \"\", \"[ID:login_field]\", $username)"));
}

#[test]
fn generate_can_emit_descriptor_only() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("only.ini");
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    let artifacts = generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&ini),
        None,
        &RunLogger::disabled(),
    )
    .unwrap();

    assert!(artifacts.descriptor.is_some());
    assert!(artifacts.script.is_none());
    assert!(ini.exists());
}

#[test]
fn degraded_signature_still_generates_runnable_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("degraded.ini");
    let au3 = dir.path().join("degraded.au3");

    // Only a password field; no username, no submit control
    let signature = inspect_html(
        r#"<html><body><form><input type="password" name="pw"></form></body></html>"#,
    );
    assert_eq!(signature.role_summary(), "password");

    generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&ini),
        Some(&au3),
        &RunLogger::disabled(),
    )
    .unwrap();

    let ini_text = std::fs::read_to_string(&ini).unwrap();
    assert!(!ini_text.contains("XPathValue=%username%"));
    assert!(ini_text.contains("XPathValue=%password%"));
    assert!(ini_text.contains("XPathValue={ENTER}"), "submit falls back to ENTER");

    let au3_text = std::fs::read_to_string(&au3).unwrap();
    assert!(au3_text.contains("Send($password, 1)"));
    assert!(au3_text.contains("Send(\"{ENTER}\")"));
}

#[test]
fn generation_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    let first = generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&dir.path().join("a.ini")),
        Some(&dir.path().join("a.au3")),
        &RunLogger::disabled(),
    )
    .unwrap();
    let second = generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&dir.path().join("b.ini")),
        Some(&dir.path().join("b.au3")),
        &RunLogger::disabled(),
    )
    .unwrap();

    assert_eq!(
        first.descriptor.unwrap().fingerprint,
        second.descriptor.unwrap().fingerprint
    );
    assert_eq!(
        first.script.unwrap().fingerprint,
        second.script.unwrap().fingerprint
    );
}

#[test]
fn generate_surfaces_write_failures() {
    let dir = tempfile::tempdir().unwrap();
    let ini = dir.path().join("no_such_dir").join("x.ini");
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    let err = generate_artifacts(
        &signature,
        &chrome_header(),
        Some(&ini),
        None,
        &RunLogger::disabled(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("x.ini"));
}

#[test]
fn failed_write_lands_in_the_run_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.jsonl");
    let log = RunLogger::new(log_path.to_str().unwrap());
    let ini = dir.path().join("no_such_dir").join("x.ini");
    let signature = inspect_html(CLASSIC_LOGIN_PAGE);

    generate_artifacts(&signature, &chrome_header(), Some(&ini), None, &log).unwrap_err();

    let content = std::fs::read_to_string(&log_path).unwrap();
    let last: serde_json::Value = serde_json::from_str(content.lines().last().unwrap()).unwrap();
    assert_eq!(last["severity"], "error");
    assert_eq!(last["stage"], "descriptor");
    assert!(
        last["message"].as_str().unwrap().contains("x.ini"),
        "the error event must name the artifact that failed"
    );
}

// ============================================================================
// Run log
// ============================================================================

#[test]
fn logger_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.jsonl");
    let log = RunLogger::new(path.to_str().unwrap());

    log.log(&RunEvent::info("fetch", "Fetching page").with_url("https://example.com"));
    log.log(&RunEvent::warn("classify", "No login fields found"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["severity"], "info");
    assert_eq!(first["stage"], "fetch");
    assert_eq!(first["url"], "https://example.com");
    assert!(first["timestamp_ms"].as_u64().is_some());
    assert!(
        first.get("detail").is_none(),
        "absent optional fields are skipped"
    );

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["severity"], "warn");
    assert!(second.get("url").is_none());
}

#[test]
fn disabled_logger_swallows_events() {
    let log = RunLogger::disabled();
    log.log(&RunEvent::error("validate", "should go nowhere"));
}
