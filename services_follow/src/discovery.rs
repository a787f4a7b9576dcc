//! Candidate discovery

use core_types::Viewport;
use host_api::ElementInfo;

/// True for elements follow mode can activate
///
/// Links with a target, buttons, submit/button/reset inputs, elements with a
/// link or button role, and elements with an inline click handler.
pub fn is_candidate(element: &ElementInfo) -> bool {
    match element.tag.as_str() {
        "a" if element.href.is_some() => return true,
        "button" => return true,
        "input" => {
            if matches!(
                element.input_type.as_deref(),
                Some("submit") | Some("button") | Some("reset")
            ) {
                return true;
            }
        }
        _ => {}
    }

    matches!(element.role.as_deref(), Some("link") | Some("button")) || element.has_inline_handler
}

/// Candidates that are rendered, visible and fully inside the viewport,
/// in document order
pub fn discover(elements: &[ElementInfo], viewport: Viewport) -> Vec<ElementInfo> {
    elements
        .iter()
        .filter(|el| is_candidate(el))
        .filter(|el| el.rect.has_area() && viewport.contains(&el.rect) && el.style.is_visible())
        .cloned()
        .collect()
}
