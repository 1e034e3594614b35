//! Scroll context: the page's composition root for scrolling
//!
//! Owns the document, the instance manager and the bridge, and pumps them
//! once per animation frame. Components receive this context (or a bridge
//! receiver) instead of reaching for global state.

use std::time::Instant;

use folio_core::ScrollConfig;
use tokio::sync::broadcast;
use tracing::debug;

use crate::bridge::{ScrollBridge, ScrollEvent};
use crate::document::{Document, WindowEvent};
use crate::engine::EngineFactory;
use crate::manager::{EngineHandle, ScrollManager};
use crate::state::{ScrollOptions, ScrollState, ScrollTarget};

pub struct ScrollContext<D: Document> {
    doc: D,
    manager: ScrollManager,
    bridge: ScrollBridge,
    /// Fragment to publish once a menu-driven engine scroll settles
    pending_fragment: Option<String>,
}

impl<D: Document> ScrollContext<D> {
    pub fn new(doc: D, config: &ScrollConfig) -> Self {
        Self {
            doc,
            manager: ScrollManager::new(config.clone()),
            bridge: ScrollBridge::new(config),
            pending_fragment: None,
        }
    }

    /// Bring up the smooth-scroll engine on `container`
    pub fn initialize(&mut self, container: &str, factory: &dyn EngineFactory) -> Option<EngineHandle> {
        self.pending_fragment = None;
        self.manager.initialize(&mut self.doc, container, factory)
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn manager(&self) -> &ScrollManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ScrollManager {
        &mut self.manager
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScrollEvent> {
        self.bridge.subscribe()
    }

    /// Current scroll offset from whichever backend is active
    pub fn offset(&self) -> f64 {
        self.manager.offset(&self.doc)
    }

    /// Returns whether a scroll was issued
    pub fn scroll_to(&mut self, target: &ScrollTarget, options: ScrollOptions, now: Instant) -> bool {
        let issued = self.manager.scroll_to(&mut self.doc, target, options, now);
        if issued && !self.manager.is_active() {
            self.bridge.on_native_scroll(&self.doc);
        }
        issued
    }

    /// Menu-driven navigation: scroll to `href` and keep the fragment in sync
    pub fn navigate(&mut self, href: &str, now: Instant) {
        let target = ScrollTarget::parse(href);
        let issued = self.scroll_to(&target, ScrollOptions::default(), now);

        // The native path replaces the fragment itself
        if issued && self.manager.is_active() {
            self.pending_fragment = target.fragment().map(str::to_string);
        }
    }

    /// Wheel or touch input from the reader
    pub fn wheel(&mut self, delta_y: f64) {
        if self.manager.is_active() {
            self.manager.input(delta_y);
        } else {
            let next = self.doc.scroll_y() + delta_y;
            self.doc.window_scroll_to(next);
            self.bridge.on_native_scroll(&self.doc);
        }
    }

    pub fn window_event(&mut self, event: WindowEvent, now: Instant) {
        self.manager.handle_window_event(event, now);
    }

    /// Advance one animation frame; returns the published state, if any
    pub fn frame(&mut self, now: Instant) -> Option<ScrollState> {
        let state = self
            .manager
            .frame(&self.doc, now)
            .map(|tick| self.bridge.on_raw_tick(&mut self.doc, &tick));

        if self.pending_fragment.is_some() && !self.manager.needs_frame() {
            if let Some(fragment) = self.pending_fragment.take() {
                debug!(%fragment, "Menu scroll settled");
                self.doc.replace_fragment(&fragment);
            }
        }
        state
    }

    pub fn teardown(&mut self) {
        self.pending_fragment = None;
        self.manager.teardown(&mut self.doc);
    }
}

impl<D: Document> Drop for ScrollContext<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
