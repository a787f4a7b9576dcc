//! Simulated document

use core_types::{ElementId, Rect, ScrollPosition, Viewport};
use host_api::{
    DocumentExtent, ElementInfo, FindPrimitive, FindQuery, HostError, Instant, LinkInfo, Page,
};

/// An in-memory document with a scroll position, elements and text
///
/// Scrolling is clamped to the document like a real viewport. Navigating
/// replaces the document: elements, links and text are dropped and the
/// host is told through [`SimPage::take_replaced`]. Moving between locations
/// that differ only in the fragment keeps the document.
#[derive(Debug, Clone)]
pub struct SimPage {
    url: String,
    /// Session history, `history[history_index]` is `url`
    history: Vec<String>,
    history_index: usize,
    now: Instant,
    scroll: ScrollPosition,
    viewport: Viewport,
    extent: DocumentExtent,
    elements: Vec<ElementInfo>,
    links: Vec<LinkInfo>,
    text: String,
    /// Byte offset of the current find selection
    selection: Option<usize>,
    focused: Option<ElementId>,
    activated: Vec<ElementId>,
    finds: Vec<FindQuery>,
    find_error: Option<HostError>,
    blurs: usize,
    replaced: bool,
}

impl SimPage {
    /// A 1000x800 viewport over a 3000x5000 document
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            history: vec![url.clone()],
            url,
            history_index: 0,
            now: Instant::default(),
            scroll: ScrollPosition::ORIGIN,
            viewport: Viewport::new(1000.0, 800.0),
            extent: DocumentExtent {
                width: 3000.0,
                height: 5000.0,
            },
            elements: Vec::new(),
            links: Vec::new(),
            text: String::new(),
            selection: None,
            focused: None,
            activated: Vec::new(),
            finds: Vec::new(),
            find_error: None,
            blurs: 0,
            replaced: false,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_extent(mut self, width: f64, height: f64) -> Self {
        self.extent = DocumentExtent { width, height };
        self
    }

    pub fn with_elements(mut self, elements: Vec<ElementInfo>) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_links(mut self, links: Vec<LinkInfo>) -> Self {
        self.links = links;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends an anchor at `rect`, returning its id
    pub fn add_link(&mut self, href: &str, rect: Rect) -> ElementId {
        let id = ElementId::new(self.elements.len() as u64 + 1);
        self.elements
            .push(ElementInfo::new(id, "a", rect).with_href(href));
        id
    }

    pub fn add_element(&mut self, element: ElementInfo) {
        self.elements.push(element);
    }

    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    /// Makes the next find call fail
    pub fn fail_find(&mut self, error: HostError) {
        self.find_error = Some(error);
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Elements clicked, in order
    pub fn activated(&self) -> &[ElementId] {
        &self.activated
    }

    /// Every find call made, in order
    pub fn finds(&self) -> &[FindQuery] {
        &self.finds
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn blur_count(&self) -> usize {
        self.blurs
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Reports (once) that the document was replaced
    pub fn take_replaced(&mut self) -> bool {
        std::mem::take(&mut self.replaced)
    }

    /// Reloads the current document
    pub fn reload(&mut self) {
        self.load(self.url.clone());
    }

    fn load(&mut self, url: String) {
        if url != self.url && without_fragment(&url) == without_fragment(&self.url) {
            self.url = url;
            return;
        }
        self.url = url;
        self.scroll = ScrollPosition::ORIGIN;
        self.elements.clear();
        self.links.clear();
        self.text.clear();
        self.selection = None;
        self.focused = None;
        self.replaced = true;
    }

    fn max_scroll(&self) -> ScrollPosition {
        ScrollPosition::new(
            (self.extent.width - self.viewport.width).max(0.0),
            (self.extent.height - self.viewport.height).max(0.0),
        )
    }

    fn clamp(&self, position: ScrollPosition) -> ScrollPosition {
        let max = self.max_scroll();
        ScrollPosition::new(position.x.clamp(0.0, max.x), position.y.clamp(0.0, max.y))
    }

    fn element(&self, id: ElementId) -> Result<&ElementInfo, HostError> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| HostError::NoSuchTarget(format!("element {}", id.as_u64())))
    }
}

fn without_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

impl FindPrimitive for SimPage {
    fn find(&mut self, query: &FindQuery) -> Result<bool, HostError> {
        self.finds.push(query.clone());
        if let Some(err) = self.find_error.take() {
            return Err(err);
        }
        if query.text.is_empty() {
            return Ok(false);
        }

        let (haystack, needle) = if query.case_insensitive {
            (self.text.to_lowercase(), query.text.to_lowercase())
        } else {
            (self.text.clone(), query.text.clone())
        };
        let matches: Vec<usize> = haystack.match_indices(&needle).map(|(i, _)| i).collect();
        if matches.is_empty() {
            return Ok(false);
        }

        let anchor = if query.from_selection { self.selection } else { None };
        let found = if query.backward {
            let before = anchor.unwrap_or(haystack.len());
            matches
                .iter()
                .rev()
                .find(|&&i| i < before)
                .or_else(|| query.wrap.then(|| matches.last()).flatten())
        } else {
            let after = anchor.map(|s| s + 1).unwrap_or(0);
            matches
                .iter()
                .find(|&&i| i >= after)
                .or_else(|| query.wrap.then(|| matches.first()).flatten())
        };

        match found {
            Some(&offset) => {
                self.selection = Some(offset);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Page for SimPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn now(&self) -> Instant {
        self.now
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn document_extent(&self) -> DocumentExtent {
        self.extent
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll = self.clamp(ScrollPosition::new(self.scroll.x + dx, self.scroll.y + dy));
    }

    fn scroll_to(&mut self, position: ScrollPosition) {
        self.scroll = self.clamp(position);
    }

    fn history_back(&mut self) {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.load(self.history[self.history_index].clone());
        }
    }

    fn history_forward(&mut self) {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            self.load(self.history[self.history_index].clone());
        }
    }

    fn navigate(&mut self, url: &str) -> Result<(), HostError> {
        if !url.contains(':') {
            return Err(HostError::InvalidUrl(url.to_string()));
        }
        self.history.truncate(self.history_index + 1);
        self.history.push(url.to_string());
        self.history_index = self.history.len() - 1;
        self.load(url.to_string());
        Ok(())
    }

    fn elements(&self) -> Vec<ElementInfo> {
        self.elements.clone()
    }

    fn links(&self) -> Vec<LinkInfo> {
        self.links.clone()
    }

    fn focus_element(&mut self, id: ElementId) -> Result<(), HostError> {
        self.element(id)?;
        self.focused = Some(id);
        Ok(())
    }

    fn activate_element(&mut self, id: ElementId) -> Result<(), HostError> {
        self.element(id)?;
        self.activated.push(id);
        Ok(())
    }

    fn blur_active_element(&mut self) {
        self.focused = None;
        self.blurs += 1;
    }

    fn focus_first_input(&mut self) -> bool {
        let viewport = self.viewport;
        let first = self.elements.iter().find(|e| {
            matches!(e.tag.as_str(), "input" | "textarea" | "select")
                && e.style.is_visible()
                && e.rect.has_area()
                && viewport.contains(&e.rect)
        });
        match first.map(|e| e.id) {
            Some(id) => {
                self.focused = Some(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = SimPage::new("https://a.test/");
        page.scroll_by(0.0, -50.0);
        assert_eq!(page.scroll_position(), ScrollPosition::ORIGIN);
        page.scroll_to(ScrollPosition::new(99999.0, 99999.0));
        assert_eq!(page.scroll_position(), ScrollPosition::new(2000.0, 4200.0));
    }

    #[test]
    fn test_navigation_history() {
        let mut page = SimPage::new("https://a.test/1");
        page.navigate("https://a.test/2").unwrap();
        assert!(page.take_replaced());
        assert!(!page.take_replaced());
        page.history_back();
        assert_eq!(page.url(), "https://a.test/1");
        page.history_forward();
        assert_eq!(page.url(), "https://a.test/2");
        assert!(page.navigate("nowhere").is_err());
    }

    #[test]
    fn test_fragment_navigation_keeps_document() {
        let mut page = SimPage::new("https://a.test/doc").with_text("body");
        page.scroll_by(0.0, 300.0);
        page.navigate("https://a.test/doc#part").unwrap();
        assert!(!page.take_replaced());
        assert_eq!(page.scroll_position().y, 300.0);

        page.history_back();
        assert_eq!(page.url(), "https://a.test/doc");
        assert!(!page.take_replaced());

        page.reload();
        assert!(page.take_replaced());
        assert_eq!(page.scroll_position(), ScrollPosition::ORIGIN);
    }

    #[test]
    fn test_find_wraps_both_ways() {
        let mut page = SimPage::new("https://a.test/").with_text("One two ONE two one");
        let mut query = FindQuery {
            text: "one".to_string(),
            backward: false,
            wrap: true,
            case_insensitive: true,
            from_selection: false,
        };
        assert_eq!(page.find(&query), Ok(true));
        assert_eq!(page.selection(), Some(0));

        query.from_selection = true;
        page.find(&query).unwrap();
        assert_eq!(page.selection(), Some(8));
        page.find(&query).unwrap();
        page.find(&query).unwrap();
        assert_eq!(page.selection(), Some(0));

        query.backward = true;
        page.find(&query).unwrap();
        assert_eq!(page.selection(), Some(16));

        query.text = "three".to_string();
        assert_eq!(page.find(&query), Ok(false));
    }

    #[test]
    fn test_focus_first_input_skips_hidden() {
        let mut page = SimPage::new("https://a.test/").with_elements(vec![
            ElementInfo::new(ElementId::new(1), "input", Rect::new(0.0, 900.0, 10.0, 10.0)),
            ElementInfo::new(ElementId::new(2), "textarea", Rect::new(0.0, 10.0, 10.0, 10.0)),
        ]);
        assert!(page.focus_first_input());
        assert_eq!(page.focused(), Some(ElementId::new(2)));
    }
}
