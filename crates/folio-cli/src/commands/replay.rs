use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_core::AppConfig;
use folio_scroll::{
    AnimatedEngineFactory, Chrome, ChromeSnapshot, CursorTracker, Element, HoverKind,
    MemoryDocument, ScrollContext, WindowEvent,
};

/// One simulated animation frame
const FRAME: Duration = Duration::from_millis(16);

/// Container the engine attaches to
const CONTAINER: &str = "#app";

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: (f64, f64),
    pub document_height: f64,
    #[serde(default)]
    pub sections: Vec<SectionDef>,
    pub steps: Vec<Step>,
}

fn default_viewport() -> (f64, f64) {
    (1280.0, 800.0)
}

#[derive(Debug, Deserialize)]
pub struct SectionDef {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Wheel delta in pixels
    Wheel(f64),
    /// Menu link such as `#work` or `top`
    Navigate(String),
    /// Advance this many frames
    Frames(u32),
    /// New viewport width and height
    Resize(f64, f64),
    /// Content grew or shrank
    DocumentHeight(f64),
    /// Pointer moved to viewport coordinates
    Pointer(f64, f64),
}

/// State printed after each step
#[derive(Debug, Serialize)]
pub struct ReplayLine {
    pub step: usize,
    pub elapsed_ms: u128,
    pub offset: f64,
    pub fragment: Option<String>,
    pub cursor: (f64, f64),
    #[serde(flatten)]
    pub chrome: ChromeSnapshot,
}

pub fn run(config: &AppConfig, script_path: &Path, native: bool) -> Result<()> {
    if !script_path.exists() {
        anyhow::bail!("Script not found: {}", script_path.display());
    }

    let raw = std::fs::read_to_string(script_path)?;
    let script: Script = serde_json::from_str(&raw)?;

    for line in play(config, &script, native) {
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}

/// Run `script` against an in-memory page on a simulated clock
pub fn play(config: &AppConfig, script: &Script, native: bool) -> Vec<ReplayLine> {
    let (width, height) = script.viewport;
    let mut doc = MemoryDocument::new(width, height, script.document_height)
        .with_element(Element::new("main", 0.0, script.document_height).with_id("app"));
    for section in &script.sections {
        doc.push(Element::new("section", section.top, section.height).with_id(&section.id));
    }

    let mut scroll_config = config.scroll.clone();
    if native {
        scroll_config.smooth_enabled = false;
    }

    let mut ctx = ScrollContext::new(doc, &scroll_config);
    let mut chrome = Chrome::new(&config.nav, ctx.subscribe());
    if ctx.initialize(CONTAINER, &AnimatedEngineFactory).is_none() {
        debug!("Replaying with native scrolling");
    }
    chrome.refresh_sections(ctx.document());
    let mut cursor = CursorTracker::from_config(&config.cursor);

    let start = Instant::now();
    let mut now = start;
    let mut lines = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Wheel(delta) => ctx.wheel(*delta),
            Step::Navigate(href) => ctx.navigate(href, now),
            Step::Frames(count) => {
                for _ in 0..*count {
                    now += FRAME;
                    ctx.frame(now);
                    cursor.frame();
                    settle(&mut ctx, &mut chrome);
                }
            }
            Step::Resize(width, height) => {
                ctx.document_mut().resize(*width, *height);
                ctx.window_event(WindowEvent::Resize, now);
                chrome.refresh_sections(ctx.document());
            }
            Step::DocumentHeight(document_height) => {
                ctx.document_mut().set_document_height(*document_height);
                ctx.window_event(WindowEvent::Load, now);
                chrome.refresh_sections(ctx.document());
            }
            Step::Pointer(x, y) => cursor.on_pointer_move(*x, *y, HoverKind::Default),
        }
        settle(&mut ctx, &mut chrome);

        lines.push(ReplayLine {
            step: index,
            elapsed_ms: now.duration_since(start).as_millis(),
            offset: ctx.offset(),
            fragment: ctx.document().fragment().map(str::to_string),
            cursor: cursor.position(),
            chrome: chrome.snapshot(),
        });
    }

    lines
}

fn settle(ctx: &mut ScrollContext<MemoryDocument>, chrome: &mut Chrome) {
    chrome.drain();
    let offset = ctx.offset();
    chrome.observe_sections(ctx.document_mut(), offset);
}
