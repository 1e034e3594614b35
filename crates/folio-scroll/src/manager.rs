//! Scroll Instance Manager
//!
//! Owns the single smooth-scroll engine of a page and gives callers one
//! scroll-to operation that works whether or not the engine came up.

use std::time::{Duration, Instant};

use folio_core::{Error, ScrollConfig};
use tracing::{debug, info, warn};

use crate::document::{Document, ListenerId, WindowEvent};
use crate::engine::{DeviceClass, EngineFactory, EngineSettings, ScrollEngine};
use crate::state::{RawTick, ScrollOptions, ScrollTarget};
use crate::timing::Debouncer;

/// Window events that trigger a debounced layout recomputation
const LAYOUT_EVENTS: [WindowEvent; 3] = [WindowEvent::Resize, WindowEvent::Load, WindowEvent::FontsReady];

/// Token identifying the engine built by one `initialize` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(u64);

struct ActiveEngine {
    handle: EngineHandle,
    engine: Box<dyn ScrollEngine>,
}

/// Creates, owns and tears down the page's smooth-scroll engine
pub struct ScrollManager {
    config: ScrollConfig,
    active: Option<ActiveEngine>,
    listeners: Vec<(ListenerId, WindowEvent)>,
    layout_update: Debouncer,
    generation: u64,
}

impl ScrollManager {
    pub fn new(config: ScrollConfig) -> Self {
        let delay = Duration::from_millis(config.update_debounce_ms);
        Self {
            config,
            active: None,
            listeners: Vec::new(),
            layout_update: Debouncer::new(delay),
            generation: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Whether the smooth-scroll engine is running the page
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<EngineHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    /// Current engine offset, or the native scroll position without one
    pub fn offset(&self, doc: &dyn Document) -> f64 {
        self.active
            .as_ref()
            .map(|a| a.engine.offset())
            .unwrap_or_else(|| doc.scroll_y())
    }

    /// Whether a layout recomputation is waiting for its quiet period
    pub fn has_pending_update(&self) -> bool {
        self.layout_update.is_pending()
    }

    /// Build the engine bound to `container`
    ///
    /// Any previous engine is torn down first. On failure the document is
    /// switched to native smooth scrolling and `None` is returned.
    pub fn initialize(
        &mut self,
        doc: &mut dyn Document,
        container: &str,
        factory: &dyn EngineFactory,
    ) -> Option<EngineHandle> {
        self.teardown(doc);

        if !self.config.smooth_enabled {
            info!("Smooth scrolling disabled, using native scroll");
            doc.set_native_smooth_scroll(true);
            return None;
        }

        let settings = EngineSettings::new(&self.config, doc.viewport_width(), doc.max_scroll())
            .with_initial_offset(doc.scroll_y());
        let built = if doc.element_top(container).is_some() {
            factory.create(container, &settings)
        } else {
            Err(Error::ContainerNotFound(container.to_string()))
        };

        let engine = match built {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Smooth scroll unavailable, falling back to native scroll: {}", e);
                doc.set_native_smooth_scroll(true);
                return None;
            }
        };

        self.generation += 1;
        let handle = EngineHandle(self.generation);
        self.active = Some(ActiveEngine { handle, engine });
        doc.set_native_smooth_scroll(false);

        for event in LAYOUT_EVENTS {
            let id = doc.add_listener(event);
            self.listeners.push((id, event));
        }

        info!(
            container,
            device = ?settings.device,
            multiplier = settings.multiplier,
            "Smooth scroll engine initialized"
        );
        Some(handle)
    }

    /// Move the viewport so the target's top edge sits at the configured offset
    ///
    /// Unresolvable targets are ignored. Returns whether a scroll was issued.
    pub fn scroll_to(
        &mut self,
        doc: &mut dyn Document,
        target: &ScrollTarget,
        options: ScrollOptions,
        now: Instant,
    ) -> bool {
        let top = match target {
            ScrollTarget::Position(top) => Some(*top),
            ScrollTarget::Anchor(id) => doc.element_top(&format!("#{}", id)),
            ScrollTarget::Selector(selector) => doc.element_top(selector),
        };
        let Some(top) = top else {
            debug!(?target, "Scroll target not found, ignoring");
            return false;
        };

        let scroll = options.resolve(&self.config);
        let destination = top + scroll.offset;

        match self.active.as_mut() {
            Some(active) => {
                if !active.engine.is_running() {
                    debug!(destination, "Engine stopped, ignoring scroll");
                    return false;
                }
                debug!(destination, "Engine scroll");
                active.engine.scroll_to(destination, &scroll, now);
            }
            None => {
                debug!(destination, "Native scroll fallback");
                doc.window_scroll_to(destination);
                if let Some(fragment) = target.fragment() {
                    doc.replace_fragment(fragment);
                }
            }
        }
        true
    }

    /// Request a layout recomputation; bursts collapse into one call
    pub fn update(&mut self, now: Instant) {
        if self.active.is_none() {
            return;
        }
        self.layout_update.request(now);
    }

    /// React to a window event dispatched by the host
    pub fn handle_window_event(&mut self, event: WindowEvent, now: Instant) {
        if self.listeners.iter().any(|(_, e)| *e == event) {
            self.update(now);
        }
    }

    /// Whether the engine still has motion to play out
    pub fn needs_frame(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.engine.needs_frame())
    }

    /// Forward a wheel/touch delta to the engine
    pub fn input(&mut self, delta_y: f64) {
        if let Some(active) = self.active.as_mut() {
            active.engine.input(delta_y);
        }
    }

    pub fn start(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.engine.start();
        }
    }

    pub fn stop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.engine.stop();
        }
    }

    /// Advance one frame: run a due layout update, then step the engine
    pub fn frame(&mut self, doc: &dyn Document, now: Instant) -> Option<RawTick> {
        let active = self.active.as_mut()?;

        if self.layout_update.poll(now) {
            let device = DeviceClass::from_width(doc.viewport_width());
            let multiplier = device.multiplier(&self.config);
            active.engine.update(doc.max_scroll(), device, multiplier);
        }

        active.engine.frame(now)
    }

    /// Release the engine and its window listeners; safe to repeat
    pub fn teardown(&mut self, doc: &mut dyn Document) {
        // Empty the handle before releasing anything so re-entry sees no engine
        let active = self.active.take();
        self.layout_update.cancel();

        for (id, _) in self.listeners.drain(..) {
            doc.remove_listener(id);
        }

        if let Some(mut active) = active {
            // Hand the position back to the native scroller
            doc.window_scroll_to(active.engine.offset());
            active.engine.destroy();
            info!(handle = active.handle.0, "Smooth scroll engine torn down");
        }
    }
}
