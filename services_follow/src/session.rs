//! Follow session: hint arena, prefix narrowing and activation

use crate::discovery::discover;
use core_types::{ElementId, ScrollPosition, Viewport};
use hint_labels::HintAlphabet;
use host_api::ElementInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a matched target is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowTarget {
    InPlace,
    NewContext,
}

/// What the caller must do with a matched hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Ask the tab service to open `url` in a new focused context
    OpenInNewContext { url: String },
    /// New-context follow of a non-link: activated in place instead
    FallbackInPlace { element: ElementId },
    /// Focus the element, then click it
    FocusAndActivate { element: ElementId },
    /// Pure link without activation support: navigate the document
    Navigate { url: String },
}

impl Activation {
    fn for_element(element: &ElementInfo, target: FollowTarget) -> Self {
        match target {
            FollowTarget::NewContext => match &element.href {
                Some(url) => Activation::OpenInNewContext { url: url.clone() },
                None => Activation::FallbackInPlace { element: element.id },
            },
            FollowTarget::InPlace => match (&element.href, element.has_activation_hook) {
                (Some(url), false) => Activation::Navigate { url: url.clone() },
                _ => Activation::FocusAndActivate { element: element.id },
            },
        }
    }
}

/// Outcome of one typed character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowStatus {
    /// The typed prefix equals one label; the session is finished
    Matched(Activation),
    /// Some labels still start with the typed prefix
    Pending,
    /// No label starts with the typed prefix; the session is finished
    Exhausted,
}

/// One labeled candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub element: ElementInfo,
    pub label: String,
    /// Label starts with the typed prefix
    pub visible: bool,
    /// Visible and at least one character typed
    pub emphasized: bool,
}

/// Marker background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerColor {
    /// Follow opens a new context
    NewContext,
    InPlace,
}

impl MarkerColor {
    pub fn css(&self) -> &'static str {
        match self {
            MarkerColor::NewContext => "#004882",
            MarkerColor::InPlace => "#ffa500",
        }
    }
}

/// Render data for one visible hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: String,
    /// Number of leading label characters already typed
    pub typed: usize,
    /// Document-absolute position of the element's top-left corner
    pub left: f64,
    pub top: f64,
    pub color: MarkerColor,
    pub emphasized: bool,
}

/// An active follow session
///
/// Created in one batch by [`FollowSession::start`] and dropped in one batch
/// when it reports `Matched` or `Exhausted` or is cancelled.
#[derive(Debug, Clone)]
pub struct FollowSession {
    hints: Vec<Hint>,
    by_label: HashMap<String, usize>,
    typed: String,
    target: FollowTarget,
}

impl FollowSession {
    /// Discovers candidates and labels them in document order
    ///
    /// Returns `None` when nothing qualifies; follow mode is then not entered.
    pub fn start(
        elements: &[ElementInfo],
        viewport: Viewport,
        alphabet: &HintAlphabet,
        target: FollowTarget,
    ) -> Option<Self> {
        let candidates = discover(elements, viewport);
        if candidates.is_empty() {
            return None;
        }

        let labels = alphabet.labels(candidates.len());
        let by_label = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        let hints = candidates
            .into_iter()
            .zip(labels)
            .map(|(element, label)| Hint {
                element,
                label,
                visible: true,
                emphasized: false,
            })
            .collect();

        Some(Self {
            hints,
            by_label,
            typed: String::new(),
            target,
        })
    }

    pub fn target(&self) -> FollowTarget {
        self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn hint(&self, label: &str) -> Option<&Hint> {
        self.by_label.get(label).map(|&i| &self.hints[i])
    }

    pub fn visible_count(&self) -> usize {
        self.hints.iter().filter(|h| h.visible).count()
    }

    /// Appends a character to the typed prefix
    ///
    /// Characters are compared lowercased; the caller filters out characters
    /// that are not in the hint alphabet.
    pub fn consume_key(&mut self, c: char) -> FollowStatus {
        self.typed.extend(c.to_lowercase());
        self.recompute();

        if let Some(&index) = self.by_label.get(&self.typed) {
            let hint = &self.hints[index];
            return FollowStatus::Matched(Activation::for_element(&hint.element, self.target));
        }

        if self.visible_count() == 0 {
            FollowStatus::Exhausted
        } else {
            FollowStatus::Pending
        }
    }

    /// Drops the last typed character, restoring the hints it had hidden
    pub fn backspace(&mut self) {
        self.typed.pop();
        self.recompute();
    }

    fn recompute(&mut self) {
        let typed = self.typed.as_str();
        for hint in &mut self.hints {
            hint.visible = hint.label.starts_with(typed);
            hint.emphasized = hint.visible && !typed.is_empty();
        }
    }

    /// Markers for every visible hint
    pub fn markers(&self, scroll: ScrollPosition) -> Vec<Marker> {
        let color = match self.target {
            FollowTarget::NewContext => MarkerColor::NewContext,
            FollowTarget::InPlace => MarkerColor::InPlace,
        };
        self.hints
            .iter()
            .filter(|h| h.visible)
            .map(|h| Marker {
                label: h.label.clone(),
                typed: self.typed.chars().count(),
                left: scroll.x + h.element.rect.left,
                top: scroll.y + h.element.rect.top,
                color,
                emphasized: h.emphasized,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Rect;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 1000.0)
    }

    fn links(n: usize) -> Vec<ElementInfo> {
        (0..n)
            .map(|i| {
                ElementInfo::new(
                    ElementId::new(i as u64),
                    "a",
                    Rect::new(1.0, i as f64 * 0.5, 5.0, 0.5),
                )
                .with_href(format!("https://site.test/{}", i))
            })
            .collect()
    }

    fn start(n: usize, target: FollowTarget) -> FollowSession {
        FollowSession::start(&links(n), viewport(), &HintAlphabet::default(), target).unwrap()
    }

    #[test]
    fn test_start_without_candidates() {
        let none = FollowSession::start(&[], viewport(), &HintAlphabet::default(), FollowTarget::InPlace);
        assert!(none.is_none());
    }

    #[test]
    fn test_labels_assigned_in_document_order() {
        let session = start(3, FollowTarget::InPlace);
        let labels: Vec<&str> = session.hints().iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "s", "d"]);
        assert!(session.hints().iter().all(|h| h.visible && !h.emphasized));
    }

    #[test]
    fn test_single_char_match() {
        let mut session = start(3, FollowTarget::InPlace);
        assert_eq!(
            session.consume_key('s'),
            FollowStatus::Matched(Activation::FocusAndActivate {
                element: ElementId::new(1)
            })
        );
    }

    #[test]
    fn test_uppercase_typed_matches_lowercase_label() {
        let mut session = start(3, FollowTarget::InPlace);
        assert!(matches!(session.consume_key('D'), FollowStatus::Matched(_)));
    }

    #[test]
    fn test_two_char_narrowing() {
        let mut session = start(40, FollowTarget::NewContext);
        assert_eq!(session.consume_key('y'), FollowStatus::Pending);
        assert_eq!(session.visible_count(), 14);
        assert!(session.hint("ya").unwrap().emphasized);
        assert!(!session.hint("a").unwrap().visible);

        assert_eq!(
            session.consume_key('s'),
            FollowStatus::Matched(Activation::OpenInNewContext {
                url: "https://site.test/15".to_string()
            })
        );
    }

    #[test]
    fn test_exhausted_on_dead_prefix() {
        let mut session = start(3, FollowTarget::InPlace);
        // 'f' would be label 3, which does not exist
        assert_eq!(session.consume_key('f'), FollowStatus::Exhausted);
    }

    #[test]
    fn test_backspace_restores_visibility() {
        let mut session = start(40, FollowTarget::InPlace);
        session.consume_key('u');
        assert_eq!(session.visible_count(), 12);

        session.backspace();
        assert_eq!(session.typed(), "");
        assert_eq!(session.visible_count(), 40);
        assert!(session.hints().iter().all(|h| !h.emphasized));
    }

    #[test]
    fn test_every_label_reachable_by_typing() {
        let total = 200;
        for index in 0..total {
            let mut session = start(total, FollowTarget::InPlace);
            let label = session.hints()[index].label.clone();
            let mut chars = label.chars().peekable();
            while let Some(c) = chars.next() {
                let status = session.consume_key(c);
                if chars.peek().is_some() {
                    assert_eq!(status, FollowStatus::Pending);
                } else {
                    assert_eq!(
                        status,
                        FollowStatus::Matched(Activation::FocusAndActivate {
                            element: ElementId::new(index as u64)
                        })
                    );
                }
            }
        }
    }

    #[test]
    fn test_activation_rules() {
        let link = ElementInfo::new(ElementId::new(1), "a", Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_href("https://a.test/");
        let bare_link = link.clone().without_activation_hook();
        let button = ElementInfo::new(ElementId::new(2), "button", Rect::new(0.0, 0.0, 1.0, 1.0));

        assert_eq!(
            Activation::for_element(&link, FollowTarget::NewContext),
            Activation::OpenInNewContext {
                url: "https://a.test/".into()
            }
        );
        assert_eq!(
            Activation::for_element(&button, FollowTarget::NewContext),
            Activation::FallbackInPlace {
                element: ElementId::new(2)
            }
        );
        assert_eq!(
            Activation::for_element(&link, FollowTarget::InPlace),
            Activation::FocusAndActivate {
                element: ElementId::new(1)
            }
        );
        assert_eq!(
            Activation::for_element(&bare_link, FollowTarget::InPlace),
            Activation::Navigate {
                url: "https://a.test/".into()
            }
        );
    }

    #[test]
    fn test_markers_are_document_absolute() {
        let mut session = start(2, FollowTarget::NewContext);
        let markers = session.markers(ScrollPosition::new(0.0, 300.0));
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].top, 300.5);
        assert_eq!(markers[1].left, 1.0);
        assert_eq!(markers[0].color.css(), "#004882");

        session.consume_key('x');
        assert!(session.markers(ScrollPosition::ORIGIN).is_empty());
    }
}
