//! Scroll & viewport coordination for the Folio portfolio site
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Easing curves, including CSS cubic-bezier
//! - `timing` - Progress, interpolation and debouncing
//! - `state` - Records exchanged between the layers
//!
//! ## L3 Molecular Layer
//! - `engine` - Smooth-scroll engine seam and the built-in animated engine
//! - `manager` - Owns the engine, scroll-to with native fallback
//! - `bridge` - Normalizes ticks and broadcasts them
//! - `consumers` - Navbar, scroll-to-top and active-section state
//! - `cursor` - Custom cursor follower
//!
//! ## Composition
//! - `context` - Per-page root that owns document, manager and bridge
//!
//! # Usage
//!
//! ```ignore
//! use folio_scroll::{AnimatedEngineFactory, Chrome, MemoryDocument, ScrollContext};
//!
//! let mut ctx = ScrollContext::new(doc, &config.scroll);
//! let mut chrome = Chrome::new(&config.nav, ctx.subscribe());
//! ctx.initialize("#app", &AnimatedEngineFactory);
//!
//! // Each animation frame
//! ctx.frame(Instant::now());
//! chrome.drain();
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod state;
pub mod timing;

// L3 Molecular Layer
pub mod bridge;
pub mod consumers;
pub mod cursor;
pub mod document;
pub mod engine;
pub mod manager;

pub mod context;

// Re-exports for convenient access
pub use bridge::{ScrollBridge, ScrollEvent, SMOOTH_SCROLL_EVENT};
pub use consumers::{ActiveSection, Chrome, ChromeSnapshot, GoToTop, Navbar};
pub use context::ScrollContext;
pub use cursor::{classify, CursorTracker, HoverKind, HoverTarget};
pub use document::{Document, Element, Landmark, MemoryDocument, WindowEvent};
pub use easing::{EasingType, EasingTypeExt};
pub use engine::{AnimatedEngine, AnimatedEngineFactory, DeviceClass, EngineFactory, ScrollEngine};
pub use manager::{EngineHandle, ScrollManager};
pub use state::{NativeScroll, RawTick, ScrollDirection, ScrollOptions, ScrollState, ScrollTarget};
