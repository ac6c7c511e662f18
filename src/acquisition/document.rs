use scraper::{ElementRef, Html, Selector};

use crate::form::form_model::{FormElement, clean_attr};
use crate::locator::{ElementDescriptor, PathSegment, PathStep};

/// Parsed page source, scoped and scanned without any live browser.
pub struct StaticDocument {
    html: Html,
}

/// One pass over the document's login scope: the candidate controls in
/// document order, with a descriptor handle per candidate (same index).
pub struct StaticScan<'a> {
    pub form_action: String,
    pub elements: Vec<FormElement>,
    pub handles: Vec<StaticElement<'a>>,
}

/// Handle to one element of a [`StaticDocument`], kept alongside its
/// [`FormElement`] snapshot so locators can be synthesized later.
pub struct StaticElement<'a> {
    element: ElementRef<'a>,
}

impl StaticDocument {
    pub fn parse(html: &str) -> StaticDocument {
        StaticDocument {
            html: Html::parse_document(html),
        }
    }

    /// Scope the document to its login form and collect the candidate
    /// controls.
    ///
    /// Scope selection: the first form containing a password-typed input,
    /// else the first form, else the whole document (with an empty action).
    pub fn scan(&self) -> StaticScan<'_> {
        let form_sel = Selector::parse("form").unwrap();
        let password_sel = Selector::parse("input[type=\"password\"]").unwrap();
        let candidate_sel = Selector::parse("input, button").unwrap();

        let forms: Vec<ElementRef<'_>> = self.html.select(&form_sel).collect();
        let scope = forms
            .iter()
            .find(|form| form.select(&password_sel).next().is_some())
            .or_else(|| forms.first())
            .copied();

        let form_action = scope
            .and_then(|form| clean_attr(form.value().attr("action")))
            .unwrap_or_default();

        let candidates: Vec<ElementRef<'_>> = match scope {
            Some(form) => form.select(&candidate_sel).collect(),
            None => self.html.select(&candidate_sel).collect(),
        };

        let elements = candidates.iter().map(|el| snapshot_element(*el)).collect();
        let handles = candidates
            .into_iter()
            .map(|element| StaticElement { element })
            .collect();

        StaticScan {
            form_action,
            elements,
            handles,
        }
    }

    /// Re-evaluate a structural path against this document. Returns None when
    /// any level fails to match, never a different element.
    pub fn resolve_path(&self, segments: &[PathSegment]) -> Option<ElementRef<'_>> {
        let mut current = self.html.tree.root();

        for segment in segments {
            let wanted = segment.ordinal.unwrap_or(1);
            let mut seen = 0u32;
            let mut matched = None;

            for child in current.children() {
                let Some(el) = ElementRef::wrap(child) else {
                    continue;
                };
                if el.value().name() != segment.tag.as_str() {
                    continue;
                }
                seen += 1;
                if seen == wanted {
                    matched = Some(child);
                    break;
                }
            }

            current = matched?;
        }

        ElementRef::wrap(current)
    }
}

/// Fixed-shape snapshot of one parsed control.
///
/// The visibility heuristic for parsed markup is attribute-only: hidden
/// inputs and `hidden`-attributed elements are invisible, everything else is
/// assumed visible. Computed styles need a live session.
fn snapshot_element(el: ElementRef<'_>) -> FormElement {
    let value = el.value();
    let tag = value.name().to_string();
    let r#type = clean_attr(value.attr("type")).map(|t| t.to_lowercase());

    let text = if tag == "button" {
        clean_attr(Some(&el.text().collect::<String>()))
    } else {
        None
    };

    let hidden =
        value.attr("hidden").is_some() || r#type.as_deref() == Some("hidden");

    FormElement {
        id: clean_attr(value.attr("id")),
        name: clean_attr(value.attr("name")),
        value: clean_attr(value.attr("value")),
        text,
        visible: !hidden,
        enabled: value.attr("disabled").is_none(),
        tag,
        r#type,
    }
}

impl ElementDescriptor for StaticElement<'_> {
    fn tag(&self) -> &str {
        self.element.value().name()
    }

    fn id(&self) -> Option<&str> {
        self.element.value().attr("id")
    }

    fn name(&self) -> Option<&str> {
        self.element.value().attr("name")
    }

    fn ancestry(&self) -> Option<Vec<PathStep>> {
        Some(ancestry_of(self.element))
    }
}

/// Walk from the element to the document root, recording each level's tag,
/// 1-based same-tag ordinal, and whether any sibling shares the tag.
fn ancestry_of(element: ElementRef<'_>) -> Vec<PathStep> {
    let mut chain = Vec::new();
    let mut current = *element;

    loop {
        let Some(el) = ElementRef::wrap(current) else {
            break;
        };
        let tag = el.value().name().to_string();

        let mut ordinal = 1u32;
        let mut shared = false;
        for sibling in current.prev_siblings() {
            if let Some(sib) = ElementRef::wrap(sibling) {
                if sib.value().name() == tag.as_str() {
                    ordinal += 1;
                    shared = true;
                }
            }
        }
        if !shared {
            for sibling in current.next_siblings() {
                if let Some(sib) = ElementRef::wrap(sibling) {
                    if sib.value().name() == tag.as_str() {
                        shared = true;
                        break;
                    }
                }
            }
        }

        chain.push(PathStep {
            tag,
            ordinal,
            sole_of_tag: !shared,
        });

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain.reverse();
    chain
}
