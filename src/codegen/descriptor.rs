use crate::codegen::plan::{DescriptorHeader, TaskAction, TaskStep};

// ============================================================================
// INI step-sequence descriptor
// ============================================================================

/// Render the declarative descriptor consumed by the external automation
/// engine.
///
/// Layout: `[General]` run parameters, `[Credentials]` placeholders, then one
/// `[TaskSequence{n}]` section per step, numbered densely from 1 in plan
/// order. Rendering is a pure function of its inputs: the same signature and
/// header always produce byte-identical text.
pub fn render_descriptor(header: &DescriptorHeader, steps: &[TaskStep]) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!(
        "[General]\n\
         BrowserName={browser}\n\
         TargetURL={url}\n\
         EnableLogging=1\n\
         LogMethod=1\n\
         FixupPassword=1\n\
         GlobalSequenceDelay=250\n\
         KioskMode=0",
        browser = header.browser.descriptor_name(),
        url = header.target_url,
    ));

    sections.push(
        "[Credentials]\n\
         UserName=%username%\n\
         Password=%password%"
            .to_string(),
    );

    for (index, step) in steps.iter().enumerate() {
        sections.push(render_step(index + 1, step));
    }

    let mut text = sections.join("\n\n");
    text.push('\n');
    text
}

/// One `[TaskSequence{n}]` section. Line order is fixed per action kind:
/// element and value lines lead for field steps, while the keystroke
/// fallback leads with its action line since it has no target element.
fn render_step(number: usize, step: &TaskStep) -> String {
    let mut lines = vec![format!("[TaskSequence{}]", number)];

    match step.action {
        TaskAction::Clear => {
            push_locator(&mut lines, step);
            push_value(&mut lines, step);
            lines.push("XPathAction=clear".to_string());
        }
        TaskAction::SetValue => {
            // Set-value is the engine default: no action line
            push_locator(&mut lines, step);
            push_value(&mut lines, step);
        }
        TaskAction::Click => {
            push_locator(&mut lines, step);
            lines.push("XPathAction=click".to_string());
        }
        TaskAction::SendKeys => {
            lines.push("XPathAction=SendKeys".to_string());
            push_value(&mut lines, step);
        }
    }

    lines.push(format!("SequenceDelay={}", step.delay_ms));
    lines.join("\n")
}

fn push_locator(lines: &mut Vec<String>, step: &TaskStep) {
    if let Some(locator) = &step.locator {
        lines.push(format!("XPathElement={}", locator.xpath()));
    }
}

fn push_value(lines: &mut Vec<String>, step: &TaskStep) {
    if let Some(value) = &step.value {
        lines.push(format!("XPathValue={}", value.rendered()));
    }
}
