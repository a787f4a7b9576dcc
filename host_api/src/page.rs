//! Synchronous document surface
//!
//! Everything here reads or mutates the document the engine is attached to
//! and completes before returning.

use crate::{HostError, Instant};
use core_types::{ElementId, Rect, ScrollPosition, Viewport};
use serde::{Deserialize, Serialize};

/// Arguments of a host find-in-page call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindQuery {
    pub text: String,
    pub backward: bool,
    pub wrap: bool,
    pub case_insensitive: bool,
    /// Continue from the current selection instead of the document start
    pub from_selection: bool,
}

/// The host's substring search primitive
pub trait FindPrimitive {
    /// Selects the next occurrence of `query.text`; `Ok(false)` when absent
    fn find(&mut self, query: &FindQuery) -> Result<bool, HostError>;
}

/// Full scrollable size of the document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentExtent {
    pub width: f64,
    pub height: f64,
}

/// Computed style bits relevant to visibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub display_none: bool,
    pub visibility_hidden: bool,
    pub opacity: f64,
}

impl ElementStyle {
    pub fn is_visible(&self) -> bool {
        !self.display_none && !self.visibility_hidden && self.opacity != 0.0
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            display_none: false,
            visibility_hidden: false,
            opacity: 1.0,
        }
    }
}

/// Low-level observation of one document element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: ElementId,
    /// Lowercase tag name
    pub tag: String,
    /// `type` attribute of `<input>` elements, lowercased
    pub input_type: Option<String>,
    pub role: Option<String>,
    /// Resolved link target, if the element has one
    pub href: Option<String>,
    /// Element carries an inline `onclick` handler
    pub has_inline_handler: bool,
    /// Element supports synthetic activation
    pub has_activation_hook: bool,
    /// Bounds relative to the viewport
    pub rect: Rect,
    pub style: ElementStyle,
}

impl ElementInfo {
    pub fn new(id: ElementId, tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            tag: tag.into(),
            input_type: None,
            role: None,
            href: None,
            has_inline_handler: false,
            has_activation_hook: true,
            rect,
            style: ElementStyle::default(),
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_inline_handler(mut self) -> Self {
        self.has_inline_handler = true;
        self
    }

    pub fn without_activation_hook(mut self) -> Self {
        self.has_activation_hook = false;
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }
}

/// A `<link>` or `<a>` element considered for previous/next navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    /// `link` or `a`
    pub tag: String,
    pub rel: Option<String>,
    pub href: Option<String>,
    pub text: String,
    pub aria_label: Option<String>,
}

impl LinkInfo {
    pub fn anchor(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: "a".to_string(),
            rel: None,
            href: Some(href.into()),
            text: text.into(),
            aria_label: None,
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }
}

/// The document the engine is attached to
pub trait Page: FindPrimitive {
    /// Current document location
    fn url(&self) -> String;

    /// Current host time
    fn now(&self) -> Instant;

    fn scroll_position(&self) -> ScrollPosition;

    fn viewport(&self) -> Viewport;

    fn document_extent(&self) -> DocumentExtent;

    fn scroll_by(&mut self, dx: f64, dy: f64);

    fn scroll_to(&mut self, position: ScrollPosition);

    fn history_back(&mut self);

    fn history_forward(&mut self);

    /// Replaces the current document with `url`
    fn navigate(&mut self, url: &str) -> Result<(), HostError>;

    /// Interactive-candidate elements in document order
    fn elements(&self) -> Vec<ElementInfo>;

    /// Link elements in document order
    fn links(&self) -> Vec<LinkInfo>;

    fn focus_element(&mut self, id: ElementId) -> Result<(), HostError>;

    /// Synthetic click on the element
    fn activate_element(&mut self, id: ElementId) -> Result<(), HostError>;

    fn blur_active_element(&mut self);

    /// Focuses the first visible enabled form control; false if none
    fn focus_first_input(&mut self) -> bool;
}
