//! Scroll Event Bridge
//!
//! Normalizes engine ticks into `ScrollState`, mirrors them onto the document
//! root for stylesheets, and broadcasts them to every subscriber.

use folio_core::ScrollConfig;
use tokio::sync::broadcast;
use tracing::trace;

use crate::document::Document;
use crate::state::{normalize_progress, scaled_speed, NativeScroll, RawTick, ScrollState};

/// Name the event carries on the page
pub const SMOOTH_SCROLL_EVENT: &str = "smooth-scroll";

pub const ATTR_DIRECTION: &str = "data-scroll-direction";
pub const ATTR_SPEED: &str = "data-scroll-speed";
pub const ATTR_PROGRESS: &str = "data-scroll-progress";

/// Buffered events per subscriber before the slowest one starts lagging
const CHANNEL_CAPACITY: usize = 64;

/// Events delivered to scroll consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// Normalized tick from the smooth-scroll engine
    Smooth(ScrollState),
    /// Native window scroll, used when no engine is active
    Native(NativeScroll),
}

impl ScrollEvent {
    /// Progress in [0, 1] regardless of source
    pub fn progress(&self) -> f64 {
        match self {
            ScrollEvent::Smooth(state) => state.progress,
            ScrollEvent::Native(native) => native.progress(),
        }
    }

    /// Scroll offset in pixels regardless of source
    pub fn offset(&self) -> f64 {
        match self {
            ScrollEvent::Smooth(state) => state.offset,
            ScrollEvent::Native(native) => native.scroll_y,
        }
    }
}

/// Publishes scroll state to all consumers
#[derive(Debug, Clone)]
pub struct ScrollBridge {
    tx: broadcast::Sender<ScrollEvent>,
    speed_scale: f64,
    write_root_attributes: bool,
}

impl ScrollBridge {
    pub fn new(config: &ScrollConfig) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            speed_scale: config.speed_scale,
            write_root_attributes: config.write_root_attributes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScrollEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Normalize one engine tick and publish it
    pub fn on_raw_tick(&self, doc: &mut dyn Document, tick: &RawTick) -> ScrollState {
        let state = ScrollState {
            progress: normalize_progress(tick.offset, tick.max_extent),
            direction: tick.direction,
            speed: scaled_speed(tick.speed, self.speed_scale),
            offset: tick.offset,
        };

        if self.write_root_attributes {
            doc.set_root_attribute(ATTR_DIRECTION, state.direction.as_str());
            doc.set_root_attribute(ATTR_SPEED, &format_number(state.speed));
            doc.set_root_attribute(ATTR_PROGRESS, &format_number(state.progress * 100.0));
        }

        self.publish(ScrollEvent::Smooth(state));
        state
    }

    /// Publish the document's native scroll metrics
    pub fn on_native_scroll(&self, doc: &dyn Document) -> NativeScroll {
        let native = NativeScroll {
            scroll_y: doc.scroll_y(),
            viewport_height: doc.viewport_height(),
            document_height: doc.document_height(),
        };
        self.publish(ScrollEvent::Native(native));
        native
    }

    fn publish(&self, event: ScrollEvent) {
        // No subscribers is a normal state, not an error
        if self.tx.send(event).is_err() {
            trace!("Scroll event dropped: no subscribers");
        }
    }
}

/// Render with at most two decimals and no trailing zeros
fn format_number(value: f64) -> String {
    // Adding 0.0 folds -0.0 into 0.0
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::state::ScrollDirection;

    fn tick(offset: f64, max_extent: f64) -> RawTick {
        RawTick {
            direction: ScrollDirection::Down,
            speed: 2.5,
            offset,
            max_extent,
        }
    }

    #[test]
    fn test_subscriber_receives_progress() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut rx = bridge.subscribe();
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1700.0);

        bridge.on_raw_tick(&mut doc, &tick(450.0, 900.0));

        match rx.try_recv().unwrap() {
            ScrollEvent::Smooth(state) => {
                assert_eq!(state.progress, 0.5);
                assert_eq!(state.direction, ScrollDirection::Down);
                assert_eq!(state.speed, 25.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_zero_extent_never_divides() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 800.0);
        let state = bridge.on_raw_tick(&mut doc, &tick(450.0, 0.0));
        assert_eq!(state.progress, 0.0);
        assert_eq!(doc.attribute(ATTR_PROGRESS), Some("0"));
    }

    #[test]
    fn test_negative_zero_is_written_unsigned() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1700.0);
        bridge.on_raw_tick(&mut doc, &tick(-0.0, 900.0));
        assert_eq!(doc.attribute(ATTR_PROGRESS), Some("0"));
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_root_attributes_written() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1700.0);
        bridge.on_raw_tick(
            &mut doc,
            &RawTick {
                direction: ScrollDirection::Up,
                speed: -40.0,
                offset: 300.0,
                max_extent: 900.0,
            },
        );
        assert_eq!(doc.attribute(ATTR_DIRECTION), Some("up"));
        assert_eq!(doc.attribute(ATTR_SPEED), Some("100"));
        assert_eq!(doc.attribute(ATTR_PROGRESS), Some("33.33"));
    }

    #[test]
    fn test_root_attributes_can_be_disabled() {
        let config = ScrollConfig {
            write_root_attributes: false,
            ..Default::default()
        };
        let bridge = ScrollBridge::new(&config);
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1700.0);
        bridge.on_raw_tick(&mut doc, &tick(450.0, 900.0));
        assert_eq!(doc.attribute(ATTR_PROGRESS), None);
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1700.0);
        assert_eq!(bridge.subscriber_count(), 0);
        bridge.on_raw_tick(&mut doc, &tick(900.0, 900.0));
        bridge.on_native_scroll(&doc);
    }

    #[test]
    fn test_native_event_progress() {
        let bridge = ScrollBridge::new(&ScrollConfig::default());
        let mut rx = bridge.subscribe();
        let mut doc = MemoryDocument::new(1280.0, 800.0, 1800.0);
        doc.window_scroll_to(250.0);
        bridge.on_native_scroll(&doc);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.progress(), 0.25);
        assert_eq!(event.offset(), 250.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(33.3333), "33.33");
        assert_eq!(format_number(0.0), "0");
    }
}
