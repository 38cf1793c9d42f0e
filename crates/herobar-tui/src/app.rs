use std::time::{Duration, Instant};

use anyhow::Result;
use herobar_core::carousel::Page;
use herobar_core::config::HeaderBarConfig;
use herobar_core::controller::PageCause;
use herobar_core::scroll::Viewport;
use herobar_core::{HeaderConfig, HeaderEvent, HeaderHandle, HeaderSnapshot, TapTarget};
use tracing::debug;

use crate::theme::Theme;

/// Points represented by one terminal row
pub const ROW_POINTS: f64 = 16.0;
/// Points represented by one terminal column
pub const COL_POINTS: f64 = 5.0;
/// Terminal rows per list item (text plus spacer)
pub const ITEM_ROWS: u16 = 2;
/// Points moved per scroll key press or wheel notch
pub const SCROLL_STEP: f64 = 24.0;
/// Furthest the list can be pulled past its top
pub const MAX_PULL: f64 = 160.0;
/// Pull released when no pull input arrives for this long
const PULL_RELEASE: Duration = Duration::from_millis(250);
/// Fraction of the overscroll kept per tick while springing back
const SPRING_DECAY: f64 = 0.5;

/// Demo screen state: a scrolling list under the header
pub struct App {
    pub handle: HeaderHandle,
    pub theme: Theme,
    pub pages: Vec<Page>,
    pub header: HeaderBarConfig,
    pub hero_height: f64,
    pub bar_height: f64,
    /// Latest published controller state
    pub snapshot: HeaderSnapshot,
    /// Scroll offset in points; positive is overscroll past the top
    pub offset: f64,
    pub viewport: Viewport,
    /// Number of list rows below the hero
    pub rows: usize,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Animation frame counter, bumped on every tick
    pub frame: u64,
    last_pull: Option<Instant>,
}

impl App {
    pub fn new(handle: HeaderHandle, config: &HeaderConfig) -> Self {
        let snapshot = handle.snapshot();
        Self {
            handle,
            theme: Theme::default(),
            pages: config.pages.clone(),
            header: config.header.clone(),
            hero_height: config.scroll.hero_height,
            bar_height: config.scroll.bar_height,
            snapshot,
            offset: 0.0,
            viewport: Viewport::new(0.0, 0.0, 0.0),
            rows: 20,
            should_quit: false,
            status_message: None,
            frame: 0,
            last_pull: None,
        }
    }

    /// Terminal size changed; report the new viewport
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        self.viewport = Viewport::new(cols as f64 * COL_POINTS, rows as f64 * ROW_POINTS, 0.0);
        debug!(cols, rows, width = self.viewport.width, "Terminal resized");
        self.offset = self.offset.max(self.min_offset());
        self.handle.scroll(self.offset, Some(self.viewport))?;
        Ok(())
    }

    /// Total scrollable content height in points
    pub fn content_height(&self) -> f64 {
        self.hero_height + (self.rows as f64) * (ITEM_ROWS as f64) * ROW_POINTS
    }

    /// Most negative offset: list scrolled to its end
    pub fn min_offset(&self) -> f64 {
        (self.viewport.height - self.content_height()).min(0.0)
    }

    /// Scroll by a delta in points; positive moves toward the top
    pub fn scroll_by(&mut self, delta: f64) -> Result<()> {
        let next = (self.offset + delta).clamp(self.min_offset(), MAX_PULL);
        if next > 0.0 && delta > 0.0 {
            self.last_pull = Some(Instant::now());
        }
        if next != self.offset {
            self.offset = next;
            self.handle.scroll(self.offset, None)?;
        }
        Ok(())
    }

    pub fn scroll_down(&mut self) -> Result<()> {
        self.scroll_by(-SCROLL_STEP)
    }

    pub fn scroll_up(&mut self) -> Result<()> {
        self.scroll_by(SCROLL_STEP)
    }

    pub fn next_page(&mut self) -> Result<()> {
        self.swipe_to(self.snapshot.carousel_page + 1)
    }

    pub fn prev_page(&mut self) -> Result<()> {
        let len = self.pages.len().max(1);
        self.swipe_to((self.snapshot.carousel_page + len - 1) % len)
    }

    pub fn swipe_to(&mut self, page: usize) -> Result<()> {
        self.handle.swipe(page)?;
        Ok(())
    }

    pub fn tap_icon(&mut self, id: &str) -> Result<()> {
        self.handle.tap(TapTarget::Icon(id.to_string()))?;
        Ok(())
    }

    pub fn tap_outside(&mut self) -> Result<()> {
        self.handle.tap(TapTarget::Outside)?;
        Ok(())
    }

    pub fn refresh(&mut self) -> Result<()> {
        debug!("Refresh requested from keyboard");
        self.handle.refresh()?;
        Ok(())
    }

    /// Advance animations and spring an overscroll back once released
    pub fn on_tick(&mut self) -> Result<()> {
        self.frame = self.frame.wrapping_add(1);
        let released = self
            .last_pull
            .map_or(true, |at| at.elapsed() >= PULL_RELEASE);
        if self.offset > 0.0 && released {
            let next = (self.offset * SPRING_DECAY).floor();
            self.offset = if next < 1.0 { 0.0 } else { next };
            self.handle.scroll(self.offset, None)?;
        }
        self.sync();
        Ok(())
    }

    /// Pull the latest snapshot from the runtime
    pub fn sync(&mut self) {
        self.snapshot = self.handle.snapshot();
    }

    /// Reflect a header event in the status line
    pub fn on_header_event(&mut self, event: &HeaderEvent) {
        let message = match event {
            HeaderEvent::RefreshStarted { .. } => Some("Refreshing...".to_string()),
            HeaderEvent::RefreshFailed { message } => Some(format!("Refresh failed: {}", message)),
            HeaderEvent::RefreshFinished => Some("Refreshed".to_string()),
            HeaderEvent::IconTapped { id } => Some(format!("Tapped {}", id)),
            HeaderEvent::PageChanged {
                page,
                cause: PageCause::Swipe,
            } => self
                .pages
                .get(*page)
                .map(|p| format!("Page: {}", p.title)),
            _ => None,
        };
        if message.is_some() {
            self.status_message = message;
        }
    }

    /// Page currently shown in the hero
    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.snapshot.carousel_page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use herobar_core::{DelayRefresh, HeaderRuntime};

    use super::*;

    fn test_app() -> (App, HeaderRuntime) {
        let config = HeaderConfig::default();
        let (runtime, handle) =
            HeaderRuntime::new(&config, Arc::new(DelayRefresh::new(Duration::ZERO))).unwrap();
        (App::new(handle, &config), runtime)
    }

    #[tokio::test]
    async fn test_scroll_clamps_to_content() {
        let (mut app, _runtime) = test_app();
        app.resize(100, 30).unwrap();

        for _ in 0..200 {
            app.scroll_down().unwrap();
        }
        assert_eq!(app.offset, app.min_offset());

        for _ in 0..400 {
            app.scroll_up().unwrap();
        }
        assert_eq!(app.offset, MAX_PULL);
    }

    #[tokio::test]
    async fn test_released_pull_springs_back() {
        let (mut app, _runtime) = test_app();
        app.resize(100, 30).unwrap();
        app.scroll_by(100.0).unwrap();
        app.last_pull = None;

        for _ in 0..20 {
            app.on_tick().unwrap();
        }
        assert_eq!(app.offset, 0.0);
    }

    #[tokio::test]
    async fn test_failed_refresh_sets_status() {
        let (mut app, _runtime) = test_app();
        app.on_header_event(&HeaderEvent::RefreshFailed {
            message: "offline".to_string(),
        });
        assert_eq!(app.status_message.as_deref(), Some("Refresh failed: offline"));

        app.on_header_event(&HeaderEvent::CollapseChanged { collapsed: true });
        assert_eq!(app.status_message.as_deref(), Some("Refresh failed: offline"));
    }
}
