//! Header interaction controller
//!
//! Owns the scroll signal, carousel, carousel clock, pull gesture and refresh
//! lifecycle, and applies every input to them in a fixed order. Collapse and
//! refresh are independent: the header can collapse while a refresh from an
//! earlier pull is still running or cooling.
//!
//! The controller never reads the clock and never spawns. Callers pass `now`
//! in, run the `Effect::Dispatch` it hands back, and call `poll` at or after
//! `next_deadline()`.

mod input;
mod snapshot;

pub use input::{Effect, HeaderEvent, HeaderInput, PageCause, TapTarget};
pub use snapshot::HeaderSnapshot;

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::carousel::{Carousel, CarouselClock, Page};
use crate::config::{HeaderConfig, ScrollConfig};
use crate::refresh::{
    PullRefreshGesture, RefreshHandle, RefreshLifecycle, RefreshOutcome, RefreshSignal,
};
use crate::scroll::{sanitize_offset, LayoutClass, ScrollObservation, ScrollSignal, Viewport};
use crate::style::HeaderStyle;
use crate::Result;

pub struct HeaderController {
    scroll_config: ScrollConfig,
    signal: ScrollSignal,
    carousel: Carousel,
    clock: CarouselClock,
    gesture: PullRefreshGesture,
    lifecycle: RefreshLifecycle,

    /// Last usable offset, fallback for malformed input
    offset: f64,
    observation: ScrollObservation,
    viewport: Option<Viewport>,
    layout: LayoutClass,

    /// One visibility flag per configured popover
    popover_ids: Vec<String>,
    popovers: Vec<bool>,

    resume_delay: Duration,
    spinner_rest_offset: f64,
    feedback: bool,
    expanded_style: HeaderStyle,
    collapsed_style: HeaderStyle,

    closed: bool,
}

impl HeaderController {
    /// Build a controller at rest (expanded, page 0, idle) with the carousel
    /// clock running from `now`
    pub fn new(config: &HeaderConfig, now: Instant) -> Result<Self> {
        config.validate()?;

        let signal = ScrollSignal::new(&config.scroll, config.scroll.default_safe_area_top);
        let observation = signal.observe(config.scroll.rest_offset);
        let mut clock = CarouselClock::new(config.carousel.interval());
        if !observation.collapsed {
            clock.start(now);
        }

        Ok(Self {
            scroll_config: config.scroll.clone(),
            signal,
            carousel: Carousel::new(config.pages.clone(), config.carousel.page_target)?,
            clock,
            gesture: PullRefreshGesture::new(config.refresh.threshold),
            lifecycle: RefreshLifecycle::new(config.refresh.minimum_visible()),
            offset: config.scroll.rest_offset,
            observation,
            viewport: None,
            layout: LayoutClass::Compact,
            popover_ids: config.header.popovers.clone(),
            popovers: vec![false; config.header.popovers.len()],
            resume_delay: config.carousel.resume_delay(),
            spinner_rest_offset: config.refresh.spinner_rest_offset,
            feedback: config.refresh.feedback,
            expanded_style: config.header.expanded,
            collapsed_style: config.header.collapsed,
            closed: false,
        })
    }

    /// Apply one host input
    pub fn handle(&mut self, input: HeaderInput, now: Instant) -> Vec<Effect> {
        match input {
            HeaderInput::Scroll { offset, viewport } => self.scroll(offset, viewport, now),
            HeaderInput::Swipe { page } => self.swipe(page, now),
            HeaderInput::Tap { target } => self.tap(target),
            HeaderInput::Refresh => self.request_refresh(),
        }
    }

    /// Scroll position update
    ///
    /// Order: viewport/layout, offset sanitizing, collapse transition and its
    /// clock side effect, then the pull gesture.
    pub fn scroll(&mut self, offset: f64, viewport: Option<Viewport>, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        if let Some(viewport) = viewport {
            self.apply_viewport(viewport, &mut effects);
        }

        let offset = sanitize_offset(offset, self.offset);
        self.offset = offset;

        let was_collapsed = self.observation.collapsed;
        let observation = self.signal.observe_from(offset, was_collapsed);
        self.observation = observation;

        if observation.collapsed != was_collapsed {
            if observation.collapsed {
                self.clock.stop();
            } else {
                self.clock.start(now);
            }
            debug!(collapsed = observation.collapsed, offset, "Header collapse changed");
            effects.push(Effect::Emit(HeaderEvent::CollapseChanged {
                collapsed: observation.collapsed,
            }));
        }

        if self.gesture.observe(observation.overscroll, self.lifecycle.state()) == RefreshSignal::Trigger {
            self.begin_refresh(&mut effects);
        }

        effects
    }

    /// Manual carousel page change
    pub fn swipe(&mut self, target: usize, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        // Rejected targets leave page and clock untouched
        let Ok(page) = self.carousel.select(target) else {
            return effects;
        };

        if self.observation.collapsed {
            self.clock.stop();
        } else {
            self.clock.restart_after(self.resume_delay, now);
        }

        effects.push(Effect::Emit(HeaderEvent::PageChanged {
            page,
            cause: PageCause::Swipe,
        }));
        effects
    }

    pub fn tap(&mut self, target: TapTarget) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        match target {
            TapTarget::Icon(id) => {
                if let Some(index) = self.popover_index(&id) {
                    self.toggle_popover(index, &mut effects);
                }
                effects.push(Effect::Emit(HeaderEvent::IconTapped { id }));
            }
            TapTarget::Popover(id) => {
                debug!(%id, "Tap inside popover");
            }
            TapTarget::Outside => self.close_popovers(&mut effects),
        }
        effects
    }

    /// Refresh without a pull gesture; same re-entrancy rules
    pub fn request_refresh(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.closed {
            self.begin_refresh(&mut effects);
        }
        effects
    }

    /// The injected operation for `handle` finished
    ///
    /// Success and failure both move the lifecycle to cooling. Completions
    /// for unknown handles, or after shutdown, change nothing.
    pub fn refresh_completed(
        &mut self,
        handle: RefreshHandle,
        outcome: RefreshOutcome,
        now: Instant,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed || !self.lifecycle.complete(handle, now) {
            return effects;
        }

        if let RefreshOutcome::Failed(message) = outcome {
            warn!(%handle, "Refresh operation failed: {}", message);
            effects.push(Effect::Emit(HeaderEvent::RefreshFailed { message }));
        }
        effects
    }

    /// Advance timers to `now`
    ///
    /// Cooling expiry is handled before the carousel tick so both can land in
    /// the same poll without depending on each other.
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        if self.lifecycle.poll(now) {
            effects.push(Effect::Emit(HeaderEvent::RefreshFinished));
        }

        if self.clock.poll(now) && !self.observation.collapsed {
            let page = self.carousel.advance();
            effects.push(Effect::Emit(HeaderEvent::PageChanged {
                page,
                cause: PageCause::AutoAdvance,
            }));
        }

        effects
    }

    /// Restart the carousel interval from `now`
    ///
    /// Hosts that build the controller ahead of time call this when they
    /// begin driving it, so the first advance is one interval after that.
    pub fn restart_clock(&mut self, now: Instant) {
        if self.closed || self.observation.collapsed {
            return;
        }
        self.clock.restart(now);
    }

    /// Earliest instant at which `poll` has work
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }
        match (self.clock.next_deadline(), self.lifecycle.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn snapshot(&self) -> HeaderSnapshot {
        let state = self.lifecycle.state();
        let overscroll = self.observation.overscroll;
        HeaderSnapshot {
            collapsed: self.observation.collapsed,
            fade_progress: self.observation.fade_progress,
            hero_stretch: overscroll,
            carousel_page: self.carousel.current(),
            refresh_state: state,
            spinner_offset: self
                .gesture
                .spinner_offset(overscroll, state, self.spinner_rest_offset),
            open_popover: self.popovers.iter().position(|open| *open),
            layout: self.layout,
            style: if self.observation.collapsed {
                self.collapsed_style
            } else {
                self.expanded_style
            },
        }
    }

    /// Stop the clock, drop any in-flight refresh and ignore further input
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.clock.stop();
        self.lifecycle.cancel();
        self.gesture.reset();
        self.popovers.iter_mut().for_each(|open| *open = false);
        self.closed = true;
        debug!("Header controller shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle of the refresh operation currently awaited, if any
    pub fn in_flight_refresh(&self) -> Option<RefreshHandle> {
        self.lifecycle.in_flight()
    }

    pub fn pages(&self) -> &[Page] {
        self.carousel.pages()
    }

    pub fn popover_ids(&self) -> &[String] {
        &self.popover_ids
    }

    pub fn collapse_threshold(&self) -> f64 {
        self.signal.collapse_threshold()
    }

    fn begin_refresh(&mut self, effects: &mut Vec<Effect>) {
        let Some(handle) = self.lifecycle.trigger() else {
            return;
        };
        effects.push(Effect::Emit(HeaderEvent::RefreshStarted { handle }));
        if self.feedback {
            effects.push(Effect::Emit(HeaderEvent::Feedback));
        }
        effects.push(Effect::Dispatch(handle));
        self.lifecycle.dispatched(handle);
    }

    fn apply_viewport(&mut self, viewport: Viewport, effects: &mut Vec<Effect>) {
        let safe_area_changed = self
            .viewport
            .map_or(true, |previous| previous.safe_area_top != viewport.safe_area_top);
        self.viewport = Some(viewport);

        if safe_area_changed {
            self.signal = ScrollSignal::new(&self.scroll_config, viewport.safe_area_top);
        }

        let layout = viewport.layout(self.scroll_config.wide_breakpoint);
        if layout != self.layout {
            debug!(?layout, width = viewport.width, "Layout class changed");
            self.layout = layout;
            self.close_popovers(effects);
        }
    }

    fn popover_index(&self, id: &str) -> Option<usize> {
        self.popover_ids.iter().position(|candidate| candidate == id)
    }

    /// Flip one popover; opening it closes the others
    fn toggle_popover(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if self.layout == LayoutClass::Wide {
            debug!(id = %self.popover_ids[index], "Popover suppressed on wide layout");
            return;
        }

        let opening = !self.popovers[index];
        if opening {
            self.close_popovers(effects);
        }
        self.popovers[index] = opening;
        effects.push(Effect::Emit(HeaderEvent::PopoverChanged {
            id: self.popover_ids[index].clone(),
            visible: opening,
        }));
    }

    fn close_popovers(&mut self, effects: &mut Vec<Effect>) {
        for (open, id) in self.popovers.iter_mut().zip(&self.popover_ids) {
            if *open {
                *open = false;
                effects.push(Effect::Emit(HeaderEvent::PopoverChanged {
                    id: id.clone(),
                    visible: false,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::RefreshState;

    const SECOND: Duration = Duration::from_secs(1);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn controller(t0: Instant) -> HeaderController {
        HeaderController::new(&HeaderConfig::default(), t0).unwrap()
    }

    fn dispatched(effects: &[Effect]) -> Vec<RefreshHandle> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Dispatch(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    fn events(effects: Vec<Effect>) -> Vec<HeaderEvent> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Emit(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_snapshot() {
        let t0 = Instant::now();
        let controller = controller(t0);
        let snapshot = controller.snapshot();

        assert!(!snapshot.collapsed);
        assert_eq!(snapshot.fade_progress, 1.0);
        assert_eq!(snapshot.carousel_page, 0);
        assert_eq!(snapshot.refresh_state, RefreshState::Idle);
        assert_eq!(snapshot.spinner_offset, None);
        assert_eq!(snapshot.open_popover, None);
        assert_eq!(snapshot.style, HeaderStyle::expanded_default());
        assert_eq!(controller.next_deadline(), Some(t0 + 5 * SECOND));
    }

    #[test]
    fn test_three_ticks_cycle_back_to_first_page() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        controller.poll(t0 + 5 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 1);
        controller.poll(t0 + 10 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 2);
        let effects = controller.poll(t0 + 15 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 0);
        assert_eq!(
            events(effects),
            vec![HeaderEvent::PageChanged {
                page: 0,
                cause: PageCause::AutoAdvance
            }]
        );
    }

    #[test]
    fn test_swipe_suppresses_auto_advance_until_resume() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        controller.swipe(2, t0 + SECOND);
        assert_eq!(controller.snapshot().carousel_page, 2);

        // Resume at 2.5s; the old 5s deadline no longer fires
        controller.poll(t0 + ms(2500));
        controller.poll(t0 + 5 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 2);

        // A full interval after the resume point
        controller.poll(t0 + ms(7499));
        assert_eq!(controller.snapshot().carousel_page, 2);
        controller.poll(t0 + ms(7500));
        assert_eq!(controller.snapshot().carousel_page, 0);
    }

    #[test]
    fn test_out_of_range_swipe_wraps_by_default() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        controller.swipe(4, t0);
        assert_eq!(controller.snapshot().carousel_page, 1);
    }

    #[test]
    fn test_rejected_swipe_keeps_clock_phase() {
        let t0 = Instant::now();
        let mut config = HeaderConfig::default();
        config.carousel.page_target = crate::carousel::PageTargetPolicy::Reject;
        let mut controller = HeaderController::new(&config, t0).unwrap();

        assert!(controller.swipe(9, t0 + SECOND).is_empty());
        controller.poll(t0 + 5 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 1);
    }

    #[test]
    fn test_pull_triggers_exactly_one_refresh() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        let effects = controller.scroll(81.0, None, t0);
        assert_eq!(dispatched(&effects).len(), 1);
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Running);
        assert_eq!(controller.snapshot().spinner_offset, Some(70.0));

        // Still held, released, pulled again: all ignored while running
        assert!(dispatched(&controller.scroll(120.0, None, t0)).is_empty());
        controller.scroll(0.0, None, t0);
        assert!(dispatched(&controller.scroll(81.0, None, t0)).is_empty());
        assert!(dispatched(&controller.request_refresh()).is_empty());
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Running);
    }

    #[test]
    fn test_refresh_events_and_feedback() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let effects = controller.scroll(81.0, None, t0);
        let handle = dispatched(&effects)[0];

        assert_eq!(
            events(effects),
            vec![HeaderEvent::RefreshStarted { handle }, HeaderEvent::Feedback]
        );
    }

    #[test]
    fn test_instant_refresh_still_holds_minimum_duration() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let handle = dispatched(&controller.scroll(81.0, None, t0))[0];

        controller.refresh_completed(handle, RefreshOutcome::Succeeded, t0);
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Cooling);

        controller.poll(t0 + ms(1999));
        assert!(controller.snapshot().is_refreshing());

        let effects = controller.poll(t0 + 2 * SECOND);
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Idle);
        assert!(events(effects).contains(&HeaderEvent::RefreshFinished));
    }

    #[test]
    fn test_failed_refresh_cools_like_success() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let handle = dispatched(&controller.scroll(90.0, None, t0))[0];

        let effects = controller.refresh_completed(
            handle,
            RefreshOutcome::Failed("offline".to_string()),
            t0 + SECOND,
        );
        assert_eq!(
            events(effects),
            vec![HeaderEvent::RefreshFailed {
                message: "offline".to_string()
            }]
        );
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Cooling);
        controller.poll(t0 + 3 * SECOND);
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Idle);
    }

    #[test]
    fn test_restart_clock_moves_first_advance() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        controller.restart_clock(t0 + 3 * SECOND);
        assert_eq!(controller.next_deadline(), Some(t0 + 8 * SECOND));
        assert!(events(controller.poll(t0 + 5 * SECOND)).is_empty());
        controller.poll(t0 + 8 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 1);

        // A collapsed or closed header keeps its clock stopped
        controller.scroll(-200.0, None, t0 + 9 * SECOND);
        controller.restart_clock(t0 + 10 * SECOND);
        assert_eq!(controller.next_deadline(), None);
        controller.scroll(0.0, None, t0 + 11 * SECOND);
        controller.shutdown();
        controller.restart_clock(t0 + 12 * SECOND);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_collapse_pauses_carousel() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        let effects = controller.scroll(-200.0, None, t0 + SECOND);
        assert!(events(effects).contains(&HeaderEvent::CollapseChanged { collapsed: true }));
        assert!(controller.snapshot().collapsed);
        assert_eq!(controller.snapshot().style, HeaderStyle::collapsed_default());

        for seconds in [5, 10, 15, 20] {
            controller.poll(t0 + seconds * SECOND);
        }
        assert_eq!(controller.snapshot().carousel_page, 0);
        assert_eq!(controller.next_deadline(), None);

        // Expanding starts a fresh interval
        controller.scroll(0.0, None, t0 + 21 * SECOND);
        controller.poll(t0 + 25 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 0);
        controller.poll(t0 + 26 * SECOND);
        assert_eq!(controller.snapshot().carousel_page, 1);
    }

    #[test]
    fn test_collapse_boundary_follows_threshold() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let threshold = controller.collapse_threshold();

        controller.scroll(threshold, None, t0);
        assert!(!controller.snapshot().collapsed);
        controller.scroll(threshold - 0.01, None, t0);
        assert!(controller.snapshot().collapsed);
    }

    #[test]
    fn test_collapse_and_refresh_are_independent() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        controller.scroll(85.0, None, t0);
        controller.scroll(-300.0, None, t0 + SECOND);

        let snapshot = controller.snapshot();
        assert!(snapshot.collapsed);
        assert_eq!(snapshot.refresh_state, RefreshState::Running);
    }

    #[test]
    fn test_safe_area_moves_threshold() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let viewport = Viewport::new(390.0, 844.0, 100.0);

        controller.scroll(-100.0, Some(viewport), t0);
        assert_eq!(controller.collapse_threshold(), -96.0);
        assert!(controller.snapshot().collapsed);
    }

    #[test]
    fn test_nan_offset_keeps_last_state() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        controller.scroll(-60.0, None, t0);
        let before = controller.snapshot();

        controller.scroll(f64::NAN, None, t0);
        assert_eq!(controller.snapshot(), before);

        controller.scroll(f64::NEG_INFINITY, None, t0);
        let snapshot = controller.snapshot();
        assert!(snapshot.collapsed);
        assert_eq!(snapshot.fade_progress, 0.0);
    }

    #[test]
    fn test_popover_toggle_and_outside_tap() {
        let t0 = Instant::now();
        let mut controller = controller(t0);

        let effects = controller.tap(TapTarget::Icon("notifications".to_string()));
        assert_eq!(controller.snapshot().open_popover, Some(0));
        assert!(events(effects).contains(&HeaderEvent::PopoverChanged {
            id: "notifications".to_string(),
            visible: true
        }));

        // Opening another closes the first
        controller.tap(TapTarget::Icon("profile".to_string()));
        assert_eq!(controller.snapshot().open_popover, Some(1));

        controller.tap(TapTarget::Popover("profile".to_string()));
        assert!(controller.snapshot().popover_visible(1));

        controller.tap(TapTarget::Outside);
        assert_eq!(controller.snapshot().open_popover, None);
    }

    #[test]
    fn test_icon_without_popover_only_reports_tap() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let effects = controller.tap(TapTarget::Icon("announcements".to_string()));

        assert_eq!(
            events(effects),
            vec![HeaderEvent::IconTapped {
                id: "announcements".to_string()
            }]
        );
        assert_eq!(controller.snapshot().open_popover, None);
    }

    #[test]
    fn test_wide_layout_suppresses_popovers() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let phone = Viewport::new(390.0, 844.0, 50.0);
        let tablet = Viewport::new(1024.0, 768.0, 50.0);

        controller.scroll(0.0, Some(phone), t0);
        controller.tap(TapTarget::Icon("notifications".to_string()));
        assert_eq!(controller.snapshot().open_popover, Some(0));

        controller.scroll(0.0, Some(tablet), t0);
        assert_eq!(controller.snapshot().layout, LayoutClass::Wide);
        assert_eq!(controller.snapshot().open_popover, None);

        controller.tap(TapTarget::Icon("notifications".to_string()));
        assert_eq!(controller.snapshot().open_popover, None);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let t0 = Instant::now();
        let mut controller = controller(t0);
        let handle = dispatched(&controller.scroll(81.0, None, t0))[0];

        controller.shutdown();
        controller.shutdown();
        assert!(controller.is_closed());
        assert_eq!(controller.next_deadline(), None);

        assert!(controller
            .refresh_completed(handle, RefreshOutcome::Succeeded, t0)
            .is_empty());
        assert!(controller.poll(t0 + 60 * SECOND).is_empty());
        assert!(controller.scroll(-500.0, None, t0).is_empty());
        assert_eq!(controller.snapshot().refresh_state, RefreshState::Idle);
        assert_eq!(controller.snapshot().carousel_page, 0);
    }
}
