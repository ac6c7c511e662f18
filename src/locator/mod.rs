use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Locator model
// ============================================================================

/// One level of a synthesized structural path, root to leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub tag: String,
    /// 1-based position among same-tag siblings. None when the element is the
    /// only one of its tag at this level, in which case the tag alone is
    /// unambiguous.
    pub ordinal: Option<u32>,
}

/// One ancestry level as reported by an acquisition substrate.
///
/// Substrates report the raw facts (position and whether the tag is shared);
/// the synthesizer decides how they render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub tag: String,
    /// 1-based position among siblings sharing this element's tag.
    pub ordinal: u32,
    /// True when no sibling shares this element's tag.
    pub sole_of_tag: bool,
}

/// What the synthesizer needs to know about an element, independent of
/// whether it came from a parsed document or a live session. Both substrates
/// implement this; the tier logic below exists exactly once.
pub trait ElementDescriptor {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
    /// Root-to-leaf ancestry chain ending at the element itself.
    /// None for a node detached from the document tree.
    fn ancestry(&self) -> Option<Vec<PathStep>>;
}

/// A resolvable element locator, in decreasing order of reliability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    /// `//*[@id='...']`, unique by contract in valid documents.
    Id(String),
    /// `//*[@name='...']`, stable but not guaranteed unique.
    Name(String),
    /// Absolute structural path, brittle under layout changes.
    Path(Vec<PathSegment>),
    /// Bare tag fallback for detached nodes; least reliable.
    Tag(String),
}

// ============================================================================
// Synthesis
// ============================================================================

/// Derive the most reliable locator the element supports.
///
/// Tier order: id, name, structural path, generic tag. Pure function of the
/// descriptor: synthesizing twice for the same element yields equal locators.
pub fn synthesize(element: &dyn ElementDescriptor) -> Locator {
    if let Some(id) = non_empty(element.id()) {
        return Locator::Id(id.to_string());
    }
    if let Some(name) = non_empty(element.name()) {
        return Locator::Name(name.to_string());
    }
    if let Some(steps) = element.ancestry() {
        let segments = steps
            .into_iter()
            .map(|step| PathSegment {
                ordinal: if step.sole_of_tag {
                    None
                } else {
                    Some(step.ordinal)
                },
                tag: step.tag,
            })
            .collect();
        return Locator::Path(segments);
    }
    Locator::Tag(element.tag().to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Rendering
// ============================================================================

impl Locator {
    /// XPath expression embedded into the descriptor artifact.
    pub fn xpath(&self) -> String {
        match self {
            Locator::Id(id) => format!("//*[@id='{}']", id),
            Locator::Name(name) => format!("//*[@name='{}']", name),
            Locator::Path(segments) => {
                let mut path = String::new();
                for segment in segments {
                    path.push('/');
                    path.push_str(&segment.tag);
                    if let Some(n) = segment.ordinal {
                        path.push_str(&format!("[{}]", n));
                    }
                }
                path
            }
            Locator::Tag(tag) => format!("//{}", tag),
        }
    }

    /// The element id, when this locator is id-based. The script backend uses
    /// this to choose its addressed control strategy.
    pub fn control_id(&self) -> Option<&str> {
        match self {
            Locator::Id(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xpath())
    }
}
