//! Navigation & visibility consumers
//!
//! Every consumer derives its own flag; nothing here is shared between them.

mod go_to_top;
mod navbar;
mod sections;

use folio_core::NavConfig;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::bridge::ScrollEvent;
use crate::document::Document;

pub use go_to_top::GoToTop;
pub use navbar::Navbar;
pub use sections::ActiveSection;

/// Selector for section landmarks
pub const SECTION_SELECTOR: &str = "section";

/// Point-in-time view of the page chrome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromeSnapshot {
    pub navbar_visible: bool,
    pub go_to_top_visible: bool,
    pub active_section: Option<String>,
    pub progress: f64,
}

/// Page chrome driven by scroll events: navbar, scroll-to-top, section highlight
pub struct Chrome {
    rx: broadcast::Receiver<ScrollEvent>,
    navbar: Navbar,
    go_to_top: GoToTop,
    sections: ActiveSection,
    progress: f64,
}

impl Chrome {
    pub fn new(config: &NavConfig, rx: broadcast::Receiver<ScrollEvent>) -> Self {
        Self {
            rx,
            navbar: Navbar::new(config.hide_threshold_px),
            go_to_top: GoToTop::new(config.go_to_top_progress, config.go_to_top_viewport_ratio),
            sections: ActiveSection::new(
                config.section_threshold,
                config.section_margin_top,
                config.section_margin_bottom,
            ),
            progress: 0.0,
        }
    }

    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    pub fn go_to_top(&self) -> &GoToTop {
        &self.go_to_top
    }

    pub fn sections(&self) -> &ActiveSection {
        &self.sections
    }

    /// Apply one event to every scroll-driven consumer
    pub fn apply(&mut self, event: &ScrollEvent) {
        self.progress = event.progress();
        self.navbar.on_offset(event.offset());
        match event {
            ScrollEvent::Smooth(state) => {
                self.go_to_top.on_progress(state.progress);
            }
            ScrollEvent::Native(native) => {
                self.go_to_top.on_native(native);
            }
        }
    }

    /// Apply every queued event without blocking; returns how many were applied
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.apply(&event);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    // Older ticks are superseded anyway; continue from the oldest retained one
                    warn!(skipped, "Chrome fell behind scroll events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Re-read section landmarks from the document
    pub fn refresh_sections(&mut self, doc: &dyn Document) {
        self.sections.set_landmarks(doc.landmarks(SECTION_SELECTOR));
    }

    /// Recompute the active section for `offset`; keeps the URL fragment in sync
    pub fn observe_sections(&mut self, doc: &mut dyn Document, offset: f64) -> Option<String> {
        let changed = self
            .sections
            .observe(offset, doc.viewport_height())
            .map(str::to_string)?;
        debug!(section = %changed, "Active section changed");
        doc.replace_fragment(&changed);
        Some(changed)
    }

    pub fn snapshot(&self) -> ChromeSnapshot {
        ChromeSnapshot {
            navbar_visible: self.navbar.is_visible(),
            go_to_top_visible: self.go_to_top.is_visible(),
            active_section: self.sections.active().map(str::to_string),
            progress: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ScrollBridge;
    use crate::document::{Element, MemoryDocument};
    use crate::state::{RawTick, ScrollDirection};
    use folio_core::ScrollConfig;

    fn tick(offset: f64) -> RawTick {
        RawTick {
            direction: ScrollDirection::Down,
            speed: 1.0,
            offset,
            max_extent: 2000.0,
        }
    }

    #[test]
    fn test_chrome_follows_bridge() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut chrome = Chrome::new(&NavConfig::default(), bridge.subscribe());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 2800.0);

        bridge.on_raw_tick(&mut doc, &tick(100.0));
        assert_eq!(chrome.drain(), 1);
        // 100 / 2000 = 0.05
        assert!(!chrome.go_to_top().is_visible());
        assert!(chrome.navbar().is_visible());

        bridge.on_raw_tick(&mut doc, &tick(300.0));
        bridge.on_raw_tick(&mut doc, &tick(400.0));
        assert_eq!(chrome.drain(), 2);
        let snapshot = chrome.snapshot();
        assert!(snapshot.go_to_top_visible);
        assert!(!snapshot.navbar_visible);
        assert_eq!(snapshot.progress, 0.2);
    }

    #[test]
    fn test_native_channel_alone_drives_chrome() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut chrome = Chrome::new(&NavConfig::default(), bridge.subscribe());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 2800.0);

        doc.window_scroll_to(500.0);
        bridge.on_native_scroll(&doc);
        chrome.drain();
        assert!(chrome.go_to_top().is_visible());
        assert!(!chrome.navbar().is_visible());

        doc.window_scroll_to(450.0);
        bridge.on_native_scroll(&doc);
        chrome.drain();
        assert!(chrome.navbar().is_visible());
    }

    #[test]
    fn test_lagging_chrome_recovers() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut chrome = Chrome::new(&NavConfig::default(), bridge.subscribe());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 2800.0);

        for i in 0..200 {
            bridge.on_raw_tick(&mut doc, &tick(i as f64 * 10.0));
        }
        assert!(chrome.drain() > 0);
        assert_eq!(chrome.snapshot().progress, 1990.0 / 2000.0);
    }

    #[test]
    fn test_section_change_updates_fragment() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut chrome = Chrome::new(&NavConfig::default(), bridge.subscribe());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 2400.0)
            .with_element(Element::new("section", 0.0, 800.0).with_id("home"))
            .with_element(Element::new("section", 800.0, 1600.0).with_id("work"));
        chrome.refresh_sections(&doc);

        assert_eq!(chrome.observe_sections(&mut doc, 0.0).as_deref(), Some("home"));
        assert_eq!(doc.fragment(), Some("home"));
        assert_eq!(chrome.observe_sections(&mut doc, 1000.0).as_deref(), Some("work"));
        assert_eq!(doc.fragment(), Some("work"));
        assert_eq!(chrome.observe_sections(&mut doc, 1010.0), None);
        assert_eq!(doc.fragment_replacements(), 2);
    }
}
