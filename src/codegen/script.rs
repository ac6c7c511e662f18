use url::Url;

use crate::codegen::plan::{DescriptorHeader, StepValue, TaskAction, TaskStep};

// ============================================================================
// AutoIt script artifact
// ============================================================================

/// Login attempts embedded in the generated retry loop.
const SCRIPT_RETRIES: u32 = 3;
/// Seconds the generated script waits for the browser window.
const WINDOW_WAIT_SECS: u32 = 30;

/// Render the standalone AutoIt replay script from the shared step plan.
///
/// The script takes the two credentials as positional arguments, launches the
/// browser, waits for its window, then replays the plan inside a retry loop.
/// Field steps use the addressed control strategy when their locator carries
/// an element id; otherwise they fall back to raw keystrokes, which cannot
/// fail but depend on initial focus. Terminal state is a process exit code.
pub fn render_script(header: &DescriptorHeader, steps: &[TaskStep]) -> String {
    let routine = login_routine_name(&header.target_url);
    let host = host_of(&header.target_url);
    let browser = header.browser;

    let mut s = String::new();

    s.push_str(
        "#cs ----------------------------------------------------------------------------\n",
    );
    s.push_str(" AutoIt Version: 3.3.14.4\n");
    s.push_str(" Script Function:\n");
    s.push_str(&format!(
        "\tAutomated login for {} ({}).\n",
        host,
        browser.window_title()
    ));
    s.push_str(
        "#ce ----------------------------------------------------------------------------\n",
    );
    s.push_str("#include <Constants.au3>\n");
    s.push_str("#include <AutoItConstants.au3>\n\n");

    // Entry point: two positional arguments or abort with the usage line
    s.push_str("If $CmdLine[0] < 2 Then\n");
    s.push_str(&format!(
        "\tConsoleWrite(\"Usage: {} <username> <password>\" & @CRLF)\n",
        routine
    ));
    s.push_str("\tExit 1\n");
    s.push_str("EndIf\n\n");

    s.push_str(&format!("If {}($CmdLine[1], $CmdLine[2]) Then\n", routine));
    s.push_str("\tExit 0\n");
    s.push_str("Else\n");
    s.push_str("\tExit 1\n");
    s.push_str("EndIf\n\n");

    s.push_str(&format!("Func {}($username, $password)\n", routine));
    s.push_str("\t; Run the browser with the target URL\n");
    s.push_str(&format!(
        "\tRun(\"{} {}\")\n",
        browser.executable(),
        header.target_url
    ));
    s.push_str("\tSleep(2000)\n\n");

    s.push_str("\t; Wait for the browser window\n");
    s.push_str(&format!(
        "\tLocal $hWnd = WinWait(\"[CLASS:{}]\", \"\", {})\n",
        browser.window_class(),
        WINDOW_WAIT_SECS
    ));
    s.push_str("\tIf $hWnd = 0 Then\n");
    s.push_str(&format!(
        "\t\tConsoleWrite(\"Failed to find {} window\" & @CRLF)\n",
        browser.window_title()
    ));
    s.push_str("\t\tReturn False\n");
    s.push_str("\tEndIf\n");
    s.push_str("\tWinActivate($hWnd)\n");
    s.push_str("\tSleep(2000)\n\n");

    s.push_str(&format!("\tLocal $retryCount = {}\n", SCRIPT_RETRIES));
    s.push_str("\tLocal $success = False\n");
    s.push_str("\tLocal $attemptOk = False\n\n");

    s.push_str("\tWhile $retryCount > 0 And Not $success\n");
    s.push_str("\t\t$attemptOk = True\n\n");

    for step in steps {
        match step.action {
            // The addressed strategy clears with its own ControlSend; the
            // keystroke fallback never had a clear. Nothing to emit here.
            TaskAction::Clear => {}
            TaskAction::SetValue => push_field(&mut s, step),
            TaskAction::Click => push_click(&mut s, step),
            TaskAction::SendKeys => push_send_keys(&mut s, step),
        }
    }

    s.push_str("\t\tIf $attemptOk Then\n");
    s.push_str("\t\t\t$success = True\n");
    s.push_str("\t\tElse\n");
    s.push_str("\t\t\t$retryCount = $retryCount - 1\n");
    s.push_str(
        "\t\t\tConsoleWrite(\"Login attempt failed. Retries left: \" & $retryCount & @CRLF)\n",
    );
    s.push_str("\t\t\tSleep(2000)\n");
    s.push_str("\t\tEndIf\n");
    s.push_str("\tWEnd\n\n");

    s.push_str("\tIf $success Then\n");
    s.push_str("\t\tConsoleWrite(\"Login process completed successfully\" & @CRLF)\n");
    s.push_str("\t\tReturn True\n");
    s.push_str("\tElse\n");
    s.push_str(
        "\t\tConsoleWrite(\"Failed to complete login process after multiple attempts\" & @CRLF)\n",
    );
    s.push_str("\t\tReturn False\n");
    s.push_str("\tEndIf\n");
    s.push_str(&format!("EndFunc ;==>{}\n", routine));

    s
}

/// AutoIt identifier for the login routine, derived from the target host:
/// `www.example.com` becomes `www_example_com_login`.
pub fn login_routine_name(target_url: &str) -> String {
    let host = host_of(target_url);
    let mut name: String = host
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    format!("{}_login", name)
}

fn host_of(target_url: &str) -> String {
    Url::parse(target_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "site".to_string())
}

fn credential_of(step: &TaskStep) -> Option<(&'static str, &'static str)> {
    match step.value {
        Some(StepValue::Username) => Some(("username", "$username")),
        Some(StepValue::Password) => Some(("password", "$password")),
        _ => None,
    }
}

fn push_field(script: &mut String, step: &TaskStep) {
    let Some((label, var)) = credential_of(step) else {
        return;
    };

    match step.locator.as_ref().and_then(|l| l.control_id()) {
        Some(control_id) => {
            script.push_str(&format!("\t\t; Enter {}\n", label));
            script.push_str(&format!(
                "\t\tControlFocus($hWnd, \"\", \"[ID:{}]\")\n",
                control_id
            ));
            script.push_str("\t\tIf @error Then $attemptOk = False\n");
            script.push_str(&format!(
                "\t\tControlSend($hWnd, \"\", \"[ID:{}]\", \"\")\n",
                control_id
            ));
            script.push_str(&format!(
                "\t\tControlSend($hWnd, \"\", \"[ID:{}]\", {})\n",
                control_id, var
            ));
            script.push_str("\t\tIf @error Then $attemptOk = False\n");
            script.push_str("\t\tSleep(800)\n\n");
        }
        None => {
            script.push_str(&format!("\t\t; Enter {} (using Send)\n", label));
            script.push_str(&format!("\t\tSend({}, 1)\n", var));
            script.push_str("\t\tSleep(800)\n");
            if matches!(step.value, Some(StepValue::Username)) {
                // Advance focus to the next field; raw typing lands wherever
                // focus currently is
                script.push_str("\t\tSend(\"{TAB}\")\n");
                script.push_str("\t\tSleep(500)\n");
            }
            script.push('\n');
        }
    }
}

fn push_click(script: &mut String, step: &TaskStep) {
    match step.locator.as_ref().and_then(|l| l.control_id()) {
        Some(control_id) => {
            script.push_str("\t\t; Click submit button\n");
            script.push_str(&format!(
                "\t\tControlClick($hWnd, \"\", \"[ID:{}]\")\n",
                control_id
            ));
            script.push_str("\t\tIf @error Then $attemptOk = False\n");
            script.push_str(&format!("\t\tSleep({})\n\n", step.delay_ms));
        }
        None => {
            // No addressable control id: submit with ENTER instead
            script.push_str("\t\t; Submit the form (using Send)\n");
            script.push_str("\t\tSend(\"{ENTER}\")\n");
            script.push_str(&format!("\t\tSleep({})\n\n", step.delay_ms));
        }
    }
}

fn push_send_keys(script: &mut String, step: &TaskStep) {
    let keys = step
        .value
        .as_ref()
        .map(|v| v.rendered())
        .unwrap_or("{ENTER}");
    script.push_str("\t\t; Submit the form\n");
    script.push_str(&format!("\t\tSend(\"{}\")\n", keys));
    script.push_str(&format!("\t\tSleep({})\n\n", step.delay_ms));
}
