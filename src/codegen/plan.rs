use serde::Serialize;

use crate::browsers::Browser;
use crate::form::form_model::LoginSignature;
use crate::locator::Locator;

/// Delay after each credential-field step, in engine milliseconds.
pub const FIELD_STEP_DELAY_MS: u32 = 500;
/// Delay after the submit step.
pub const SUBMIT_STEP_DELAY_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Empty the target field before typing into it.
    Clear,
    /// Put the step value into the target field (the engine's default
    /// action; serialized without an explicit action line).
    SetValue,
    Click,
    /// Send raw keystrokes to whatever holds focus.
    SendKeys,
}

/// What a step types: a credential placeholder resolved by the engine at run
/// time, or a literal keystroke sequence. Placeholders keep real credentials
/// out of every generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepValue {
    Username,
    Password,
    Literal(String),
}

impl StepValue {
    /// Text placed into the artifact.
    pub fn rendered(&self) -> &str {
        match self {
            StepValue::Username => "%username%",
            StepValue::Password => "%password%",
            StepValue::Literal(keys) => keys,
        }
    }
}

/// One step of the shared task plan. Both artifact backends consume this
/// exact sequence; neither re-derives field presence on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStep {
    pub action: TaskAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<StepValue>,
    pub delay_ms: u32,
}

/// Run parameters shared by both artifact backends.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorHeader {
    pub browser: Browser,
    pub target_url: String,
}

/// Expand a signature into the ordered step plan.
///
/// Each detected field contributes a clear step followed by a set-value
/// step. The plan always ends with a submit step: a click on the detected
/// control, or an ENTER keystroke when none was found. Missing roles simply
/// contribute nothing; a fully empty signature still yields the keystroke
/// fallback so the artifact remains runnable by hand.
pub fn build_task_plan(signature: &LoginSignature) -> Vec<TaskStep> {
    let mut steps = Vec::new();

    if let Some(field) = &signature.username_field {
        push_field_steps(&mut steps, &field.locator, StepValue::Username);
    }
    if let Some(field) = &signature.password_field {
        push_field_steps(&mut steps, &field.locator, StepValue::Password);
    }

    match &signature.submit_control {
        Some(control) => steps.push(TaskStep {
            action: TaskAction::Click,
            locator: Some(control.locator.clone()),
            value: None,
            delay_ms: SUBMIT_STEP_DELAY_MS,
        }),
        None => steps.push(TaskStep {
            action: TaskAction::SendKeys,
            locator: None,
            value: Some(StepValue::Literal("{ENTER}".to_string())),
            delay_ms: SUBMIT_STEP_DELAY_MS,
        }),
    }

    steps
}

fn push_field_steps(steps: &mut Vec<TaskStep>, locator: &Locator, value: StepValue) {
    steps.push(TaskStep {
        action: TaskAction::Clear,
        locator: Some(locator.clone()),
        value: Some(value.clone()),
        delay_ms: FIELD_STEP_DELAY_MS,
    });
    steps.push(TaskStep {
        action: TaskAction::SetValue,
        locator: Some(locator.clone()),
        value: Some(value),
        delay_ms: FIELD_STEP_DELAY_MS,
    });
}
