//! Host document abstraction
//!
//! The coordination layer only touches a narrow slice of the browser: element
//! lookup, window scroll metrics, root attributes, the URL fragment and a few
//! window listeners. `Document` names exactly that slice. `MemoryDocument`
//! is a headless implementation used by tests and the replay tool.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use url::Url;

/// Window-level events the scroll layer listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Resize,
    Load,
    FontsReady,
}

/// Registration token returned by `Document::add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A section landmark used for active-section tracking
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Browser surface used by the scroll layer
pub trait Document {
    /// Top edge, in document coordinates, of the first element matching `selector`
    fn element_top(&self, selector: &str) -> Option<f64>;

    /// Landmarks for every element matching `selector`, in document order
    fn landmarks(&self, selector: &str) -> Vec<Landmark>;

    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn document_height(&self) -> f64;

    /// Largest native scroll offset
    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height()).max(0.0)
    }

    /// Native `window.scrollTo`
    fn window_scroll_to(&mut self, top: f64);

    /// Toggle `scroll-behavior: smooth` on the root element
    fn set_native_smooth_scroll(&mut self, enabled: bool);

    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Replace the URL fragment without navigating (history replacement)
    fn replace_fragment(&mut self, fragment: &str);

    fn add_listener(&mut self, event: WindowEvent) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// An element of the headless document
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub top: f64,
    pub height: f64,
}

impl Element {
    pub fn new(tag: &str, top: f64, height: f64) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            top,
            height,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Simple selectors only: `#id`, `.class`, or a tag name
    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            self.tag.eq_ignore_ascii_case(selector)
        }
    }
}

/// In-memory document with a window, a root element and a location
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    document_height: f64,
    native_smooth: bool,
    attributes: BTreeMap<String, String>,
    location: Url,
    fragment_replacements: usize,
    listeners: HashMap<ListenerId, WindowEvent>,
    next_listener: u64,
}

impl MemoryDocument {
    pub fn new(viewport_width: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            elements: Vec::new(),
            scroll_y: 0.0,
            viewport_width,
            viewport_height,
            document_height,
            native_smooth: false,
            attributes: BTreeMap::new(),
            location: Url::parse("http://localhost/").expect("static URL is valid"),
            fragment_replacements: 0,
            listeners: HashMap::new(),
            next_listener: 1,
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    /// Change the window size, e.g. before firing `WindowEvent::Resize`
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn set_document_height(&mut self, document_height: f64) {
        self.document_height = document_height;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn native_smooth_scroll(&self) -> bool {
        self.native_smooth
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn fragment(&self) -> Option<&str> {
        self.location.fragment()
    }

    pub fn fragment_replacements(&self) -> usize {
        self.fragment_replacements
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registered listeners for `event`, in registration order
    pub fn listeners_for(&self, event: WindowEvent) -> Vec<ListenerId> {
        let mut ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, e)| **e == event)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl Document for MemoryDocument {
    fn element_top(&self, selector: &str) -> Option<f64> {
        self.elements.iter().find(|e| e.matches(selector)).map(|e| e.top)
    }

    fn landmarks(&self, selector: &str) -> Vec<Landmark> {
        self.elements
            .iter()
            .filter(|e| e.matches(selector))
            .filter_map(|e| {
                e.id.as_ref().map(|id| Landmark {
                    id: id.clone(),
                    top: e.top,
                    height: e.height,
                })
            })
            .collect()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn window_scroll_to(&mut self, top: f64) {
        self.scroll_y = top.clamp(0.0, self.max_scroll());
        debug!(scroll_y = self.scroll_y, "Native scroll");
    }

    fn set_native_smooth_scroll(&mut self, enabled: bool) {
        self.native_smooth = enabled;
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn replace_fragment(&mut self, fragment: &str) {
        let fragment = fragment.trim_start_matches('#');
        if fragment.is_empty() {
            self.location.set_fragment(None);
        } else {
            self.location.set_fragment(Some(fragment));
        }
        self.fragment_replacements += 1;
    }

    fn add_listener(&mut self, event: WindowEvent) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, event);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MemoryDocument {
        MemoryDocument::new(1280.0, 800.0, 4000.0)
            .with_element(Element::new("section", 0.0, 800.0).with_id("home"))
            .with_element(Element::new("section", 800.0, 1200.0).with_id("projects").with_class("panel"))
            .with_element(Element::new("footer", 3600.0, 400.0))
    }

    #[test]
    fn test_selector_lookup() {
        let doc = page();
        assert_eq!(doc.element_top("#projects"), Some(800.0));
        assert_eq!(doc.element_top(".panel"), Some(800.0));
        assert_eq!(doc.element_top("footer"), Some(3600.0));
        assert_eq!(doc.element_top("#missing"), None);
    }

    #[test]
    fn test_landmarks_need_ids() {
        let doc = page();
        let ids: Vec<_> = doc.landmarks("section").into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["home", "projects"]);
        assert!(doc.landmarks("footer").is_empty());
    }

    #[test]
    fn test_native_scroll_clamps() {
        let mut doc = page();
        doc.window_scroll_to(9999.0);
        assert_eq!(doc.scroll_y(), 3200.0);
        doc.window_scroll_to(-5.0);
        assert_eq!(doc.scroll_y(), 0.0);
    }

    #[test]
    fn test_fragment_replacement() {
        let mut doc = page();
        doc.replace_fragment("#projects");
        assert_eq!(doc.fragment(), Some("projects"));
        assert_eq!(doc.location().as_str(), "http://localhost/#projects");
        doc.replace_fragment("");
        assert_eq!(doc.fragment(), None);
        assert_eq!(doc.fragment_replacements(), 2);
    }

    #[test]
    fn test_listener_registry() {
        let mut doc = page();
        let a = doc.add_listener(WindowEvent::Resize);
        let b = doc.add_listener(WindowEvent::Load);
        assert_eq!(doc.listeners_for(WindowEvent::Resize), vec![a]);
        doc.remove_listener(a);
        doc.remove_listener(b);
        assert_eq!(doc.listener_count(), 0);
    }
}
