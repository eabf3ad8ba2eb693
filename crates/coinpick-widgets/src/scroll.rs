#![forbid(unsafe_code)]

//! Scroll-driven window controller with jump-free compensation.
//!
//! [`ScrollWindowController`] owns the live [`WindowState`] for one list.
//! The host forwards three kinds of notifications:
//!
//! - a row height measurement ([`on_measure_row_height`]),
//! - a new backing collection ([`on_collection_changed`]),
//! - viewport scroll events ([`on_scroll`]).
//!
//! The first two reset the window to index 0. Scroll events shift the window
//! by at most one row and move the viewport's `scroll_top` by exactly one
//! row height in the opposite sense, so the rendered rows stay put on
//! screen.
//!
//! # Failure Modes
//!
//! - **Detached viewport**: before [`attach_viewport`] (or after
//!   [`detach_viewport`]) every notification is a no-op. The latest
//!   collection and row height are still recorded and applied on attach.
//! - **Unmeasured rows**: with `row_height == 0` the window is empty and
//!   scroll events are ignored.
//!
//! [`on_measure_row_height`]: ScrollWindowController::on_measure_row_height
//! [`on_collection_changed`]: ScrollWindowController::on_collection_changed
//! [`on_scroll`]: ScrollWindowController::on_scroll
//! [`attach_viewport`]: ScrollWindowController::attach_viewport
//! [`detach_viewport`]: ScrollWindowController::detach_viewport

use coinpick_core::{Collection, Item};
use tracing::{debug, debug_span, trace};

use crate::window::{ScrollDirection, WindowCalculator, WindowState, sanitize_row_height};

/// Host-provided scrollable region.
///
/// `set_scroll_top` is the only mutation the controller performs.
pub trait Viewport {
    fn scroll_top(&self) -> f64;
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;
    fn set_scroll_top(&mut self, scroll_top: f64);
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn scroll_top(&self) -> f64 {
        (**self).scroll_top()
    }
    fn scroll_height(&self) -> f64 {
        (**self).scroll_height()
    }
    fn client_height(&self) -> f64 {
        (**self).client_height()
    }
    fn set_scroll_top(&mut self, scroll_top: f64) {
        (**self).set_scroll_top(scroll_top);
    }
}

/// Measures the rendered height of a representative row, in pixels.
pub trait RowMeasure {
    fn measure_row_height(&self) -> f64;
}

impl<F: Fn() -> f64> RowMeasure for F {
    fn measure_row_height(&self) -> f64 {
        self()
    }
}

/// In-memory viewport for tests and host-driven environments.
///
/// Holds the metrics last reported by the host; `set_scroll_top` clamps to
/// `0..=scroll_height - client_height` like a browser does.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlessViewport {
    scroll_top: f64,
    scroll_height: f64,
    client_height: f64,
}

impl HeadlessViewport {
    #[must_use]
    pub fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height,
            client_height,
        }
    }

    /// Overwrite all metrics with a host report.
    pub fn report(&mut self, metrics: ScrollMetrics) {
        self.scroll_top = metrics.scroll_top;
        self.scroll_height = metrics.scroll_height;
        self.client_height = metrics.client_height;
    }

    /// Current metrics as a scroll event.
    #[must_use]
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: self.scroll_height,
            client_height: self.client_height,
        }
    }

    fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

impl Viewport for HeadlessViewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }
    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }
    fn client_height(&self) -> f64 {
        self.client_height
    }
    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.clamp(0.0, self.max_scroll_top());
    }
}

/// One scroll event as reported by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Within one row of the top.
    #[inline]
    #[must_use]
    pub fn is_near_top(&self, row_height: f64) -> bool {
        self.scroll_top < row_height
    }

    /// Within one row of the bottom.
    #[inline]
    #[must_use]
    pub fn is_near_bottom(&self, row_height: f64) -> bool {
        self.scroll_height - self.scroll_top < self.client_height + row_height
    }
}

/// Result of handling one scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// No viewport attached; nothing happened.
    Detached,
    /// Not near an edge, at a terminal window, or rows unmeasured.
    Idle,
    /// The window moved one row. `scroll_delta` is the change in
    /// `scroll_top` as read back from the viewport: `-row_height` for
    /// Forward and `+row_height` for Backward, unless the viewport clamped
    /// the write.
    Shifted {
        direction: ScrollDirection,
        scroll_delta: f64,
    },
}

impl ScrollOutcome {
    /// True when the visible slice changed and must be re-rendered.
    #[inline]
    #[must_use]
    pub fn is_shifted(&self) -> bool {
        matches!(self, Self::Shifted { .. })
    }
}

/// Stateful window owner for one scrollable list.
#[derive(Debug)]
pub struct ScrollWindowController<V> {
    calculator: WindowCalculator,
    viewport: Option<V>,
    collection: Collection,
    row_height: f64,
    window: WindowState,
}

impl<V: Viewport> Default for ScrollWindowController<V> {
    fn default() -> Self {
        Self::new(WindowCalculator::default())
    }
}

impl<V: Viewport> ScrollWindowController<V> {
    /// Create a detached controller over an empty collection.
    #[must_use]
    pub fn new(calculator: WindowCalculator) -> Self {
        Self {
            calculator,
            viewport: None,
            collection: Collection::empty(),
            row_height: 0.0,
            window: WindowState::default(),
        }
    }

    /// Seed the row height before any measurement arrives.
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = sanitize_row_height(row_height);
        self
    }

    #[must_use]
    pub fn calculator(&self) -> &WindowCalculator {
        &self.calculator
    }

    /// Current window.
    #[must_use]
    pub fn window(&self) -> WindowState {
        self.window
    }

    /// Latest row height (0 = unmeasured).
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Backing collection.
    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&V> {
        self.viewport.as_ref()
    }

    #[must_use]
    pub fn viewport_mut(&mut self) -> Option<&mut V> {
        self.viewport.as_mut()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.viewport.is_some()
    }

    /// Attach the viewport and recompute the window from index 0.
    pub fn attach_viewport(&mut self, viewport: V) {
        self.viewport = Some(viewport);
        self.reset_window("attach");
    }

    /// Detach and return the viewport. The window is kept as-is.
    pub fn detach_viewport(&mut self) -> Option<V> {
        self.viewport.take()
    }

    /// Rows to render: `collection[start..end]`, clamped.
    #[must_use]
    pub fn visible_slice(&self) -> &[Item] {
        self.calculator.visible_slice(&self.collection, &self.window)
    }

    /// A representative row was measured. Resets the window.
    pub fn on_measure_row_height(&mut self, measured_height: f64) {
        self.row_height = sanitize_row_height(measured_height);
        debug!(row_height = self.row_height, "row height measured");
        self.reset_window("measure");
    }

    /// Ask `measurer` for the row height and apply it.
    pub fn measure_with<M: RowMeasure + ?Sized>(&mut self, measurer: &M) {
        self.on_measure_row_height(measurer.measure_row_height());
    }

    /// The backing collection changed. A collection with the same identity
    /// as the current one is ignored; any other resets the window to index
    /// 0, discarding the previous scroll position.
    pub fn on_collection_changed(&mut self, collection: Collection) {
        if self.collection.same_identity(&collection) {
            trace!(len = collection.len(), "collection identity unchanged");
            return;
        }
        self.collection = collection;
        self.reset_window("collection");
    }

    /// Handle a scroll event reported by the host.
    ///
    /// Performs at most one window transition and applies the matching
    /// compensation to the attached viewport.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> ScrollOutcome {
        let Some(viewport) = self.viewport.as_mut() else {
            return ScrollOutcome::Detached;
        };
        let _span = debug_span!(
            "on_scroll",
            scroll_top = metrics.scroll_top,
            start = self.window.start(),
            end = self.window.end()
        )
        .entered();

        let row_height = self.window.row_height();
        if row_height == 0.0 {
            return ScrollOutcome::Idle;
        }
        let len = self.collection.len();

        let direction = if metrics.is_near_bottom(row_height)
            && !self.calculator.is_forward_terminal(&self.window, len)
        {
            ScrollDirection::Forward
        } else if metrics.is_near_top(row_height)
            && !self.calculator.is_backward_terminal(&self.window)
        {
            ScrollDirection::Backward
        } else {
            return ScrollOutcome::Idle;
        };

        self.window = self.calculator.advance(self.window, len, direction);
        let requested = match direction {
            ScrollDirection::Forward => -row_height,
            ScrollDirection::Backward => row_height,
        };
        let scroll_top = viewport.scroll_top();
        let target = scroll_top + requested;
        viewport.set_scroll_top(target);
        let applied = viewport.scroll_top();
        let scroll_delta = if applied == target {
            requested
        } else {
            applied - scroll_top
        };

        debug!(
            ?direction,
            start = self.window.start(),
            end = self.window.end(),
            len,
            scroll_delta,
            "window shifted"
        );
        ScrollOutcome::Shifted {
            direction,
            scroll_delta,
        }
    }

    /// Handle a scroll event using the attached viewport's own metrics.
    pub fn on_viewport_scroll(&mut self) -> ScrollOutcome {
        let Some(viewport) = self.viewport.as_ref() else {
            return ScrollOutcome::Detached;
        };
        let metrics = ScrollMetrics::new(
            viewport.scroll_top(),
            viewport.scroll_height(),
            viewport.client_height(),
        );
        self.on_scroll(metrics)
    }

    fn reset_window(&mut self, cause: &'static str) {
        let Some(viewport) = self.viewport.as_ref() else {
            // Nothing is served from the previous offset until attach.
            self.window = WindowState::new(0, 0, self.row_height);
            trace!(cause, "window reset deferred: viewport detached");
            return;
        };
        self.window = self.calculator.initial_window(
            self.collection.len(),
            viewport.client_height(),
            self.row_height,
        );
        debug!(
            cause,
            start = self.window.start(),
            end = self.window.end(),
            len = self.collection.len(),
            row_height = self.row_height,
            "window reset"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(n: usize) -> Collection {
        (0..n).map(|i| Item::new(format!("COIN{i}"))).collect()
    }

    /// 300px viewport, 30px rows, 100 coins, window 0..20 (600px of content).
    fn mounted(n: usize) -> ScrollWindowController<HeadlessViewport> {
        let mut ctl = ScrollWindowController::default();
        ctl.attach_viewport(HeadlessViewport::new(300.0, 600.0));
        ctl.on_collection_changed(coins(n));
        ctl.on_measure_row_height(30.0);
        ctl
    }

    fn scroll_to(ctl: &mut ScrollWindowController<HeadlessViewport>, top: f64) -> ScrollOutcome {
        let vp = ctl.viewport_mut().unwrap();
        vp.set_scroll_top(top);
        ctl.on_viewport_scroll()
    }

    #[test]
    fn detached_controller_ignores_everything() {
        let mut ctl: ScrollWindowController<HeadlessViewport> = ScrollWindowController::default();
        ctl.on_collection_changed(coins(100));
        ctl.on_measure_row_height(30.0);
        assert!(ctl.window().is_empty());
        assert_eq!(
            ctl.on_scroll(ScrollMetrics::new(290.0, 600.0, 300.0)),
            ScrollOutcome::Detached
        );
        assert_eq!(ctl.on_viewport_scroll(), ScrollOutcome::Detached);
        assert!(ctl.visible_slice().is_empty());
    }

    #[test]
    fn attach_applies_recorded_state() {
        let mut ctl = ScrollWindowController::default();
        ctl.on_collection_changed(coins(100));
        ctl.on_measure_row_height(30.0);
        ctl.attach_viewport(HeadlessViewport::new(300.0, 600.0));
        assert_eq!(ctl.window().range(), 0..20);
        assert_eq!(ctl.visible_slice().len(), 20);
    }

    #[test]
    fn near_bottom_shifts_forward_and_compensates() {
        let mut ctl = mounted(100);
        let outcome = scroll_to(&mut ctl, 290.0);
        assert_eq!(
            outcome,
            ScrollOutcome::Shifted {
                direction: ScrollDirection::Forward,
                scroll_delta: -30.0
            }
        );
        assert_eq!(ctl.window().range(), 1..21);
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 260.0);
        assert_eq!(ctl.visible_slice()[0].name, "COIN1");
    }

    #[test]
    fn near_top_shifts_backward_and_compensates() {
        let mut ctl = mounted(100);
        scroll_to(&mut ctl, 290.0);
        scroll_to(&mut ctl, 290.0);
        assert_eq!(ctl.window().range(), 2..22);

        let outcome = scroll_to(&mut ctl, 10.0);
        assert_eq!(
            outcome,
            ScrollOutcome::Shifted {
                direction: ScrollDirection::Backward,
                scroll_delta: 30.0
            }
        );
        assert_eq!(ctl.window().range(), 1..21);
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 40.0);
    }

    #[test]
    fn middle_of_viewport_is_idle() {
        let mut ctl = mounted(100);
        assert_eq!(scroll_to(&mut ctl, 150.0), ScrollOutcome::Idle);
        assert_eq!(ctl.window().range(), 0..20);
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 150.0);
    }

    #[test]
    fn near_top_at_index_zero_is_idle() {
        let mut ctl = mounted(100);
        assert_eq!(scroll_to(&mut ctl, 0.0), ScrollOutcome::Idle);
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 0.0);
    }

    #[test]
    fn short_collection_never_shifts() {
        let mut ctl = ScrollWindowController::default();
        ctl.attach_viewport(HeadlessViewport::new(300.0, 150.0));
        ctl.on_measure_row_height(30.0);
        ctl.on_collection_changed(coins(5));
        assert_eq!(ctl.window().range(), 0..5);
        let outcome = ctl.on_scroll(ScrollMetrics::new(0.0, 150.0, 300.0));
        assert_eq!(outcome, ScrollOutcome::Idle);
        assert_eq!(ctl.window().range(), 0..5);
    }

    #[test]
    fn one_transition_per_event() {
        let mut ctl = mounted(100);
        // Far past the bottom threshold still moves a single row.
        let outcome = ctl.on_scroll(ScrollMetrics::new(300.0, 600.0, 300.0));
        assert!(outcome.is_shifted());
        assert_eq!(ctl.window().range(), 1..21);
    }

    #[test]
    fn forward_terminal_applies_no_compensation() {
        let mut ctl = mounted(22);
        assert!(scroll_to(&mut ctl, 290.0).is_shifted());
        assert_eq!(ctl.window().range(), 1..21);
        assert_eq!(scroll_to(&mut ctl, 300.0), ScrollOutcome::Idle);
        assert_eq!(ctl.window().range(), 1..21);
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 300.0);
    }

    #[test]
    fn unmeasured_rows_ignore_scroll() {
        let mut ctl = ScrollWindowController::default();
        ctl.attach_viewport(HeadlessViewport::new(300.0, 600.0));
        ctl.on_collection_changed(coins(100));
        assert!(ctl.window().is_empty());
        assert_eq!(
            ctl.on_scroll(ScrollMetrics::new(300.0, 600.0, 300.0)),
            ScrollOutcome::Idle
        );
        assert!(ctl.window().is_empty());
    }

    #[test]
    fn collection_change_resets_window() {
        let mut ctl = mounted(100);
        for _ in 0..5 {
            scroll_to(&mut ctl, 290.0);
        }
        assert_eq!(ctl.window().range(), 5..25);
        ctl.on_collection_changed(coins(3));
        assert_eq!(ctl.window().range(), 0..3);
        assert_eq!(ctl.visible_slice().len(), 3);
    }

    #[test]
    fn same_identity_collection_is_ignored() {
        let mut ctl = mounted(100);
        scroll_to(&mut ctl, 290.0);
        let same = ctl.collection().clone();
        ctl.on_collection_changed(same);
        assert_eq!(ctl.window().range(), 1..21);

        let rebuilt = coins(100);
        ctl.on_collection_changed(rebuilt);
        assert_eq!(ctl.window().range(), 0..20);
    }

    #[test]
    fn remeasure_resets_window() {
        let mut ctl = mounted(100);
        scroll_to(&mut ctl, 290.0);
        ctl.measure_with(&|| 60.0);
        assert_eq!(ctl.row_height(), 60.0);
        assert_eq!(ctl.window().range(), 0..10);
    }

    #[test]
    fn seeded_row_height_is_used_on_attach() {
        let mut ctl: ScrollWindowController<HeadlessViewport> =
            ScrollWindowController::default().with_row_height(30.0);
        ctl.on_collection_changed(coins(100));
        ctl.attach_viewport(HeadlessViewport::new(300.0, 600.0));
        assert_eq!(ctl.window().range(), 0..20);
    }

    #[test]
    fn collection_change_while_detached_drops_stale_offset() {
        let mut ctl = mounted(100);
        for _ in 0..5 {
            scroll_to(&mut ctl, 290.0);
        }
        assert_eq!(ctl.window().range(), 5..25);
        ctl.detach_viewport();

        let fresh: Collection = (0..100).map(|i| Item::new(format!("NEW{i}"))).collect();
        ctl.on_collection_changed(fresh);
        assert!(ctl.window().is_empty());
        assert!(ctl.visible_slice().is_empty());

        ctl.attach_viewport(HeadlessViewport::new(300.0, 600.0));
        assert_eq!(ctl.window().range(), 0..20);
        assert_eq!(ctl.visible_slice()[0].name, "NEW0");
    }

    #[test]
    fn remeasure_while_detached_drops_stale_offset() {
        let mut ctl = mounted(100);
        scroll_to(&mut ctl, 290.0);
        ctl.detach_viewport();
        ctl.on_measure_row_height(60.0);
        assert!(ctl.window().is_empty());
        assert_eq!(ctl.window().row_height(), 60.0);
    }

    #[test]
    fn clamped_compensation_reports_applied_delta() {
        let mut ctl = mounted(100);
        // Reported metrics say near bottom while the viewport itself sits at
        // 10px, so the -30px correction clamps at 0.
        ctl.viewport_mut().unwrap().set_scroll_top(10.0);
        let outcome = ctl.on_scroll(ScrollMetrics::new(290.0, 600.0, 300.0));
        assert_eq!(
            outcome,
            ScrollOutcome::Shifted {
                direction: ScrollDirection::Forward,
                scroll_delta: -10.0
            }
        );
        assert_eq!(ctl.viewport().unwrap().scroll_top(), 0.0);
    }

    #[test]
    fn detach_returns_viewport() {
        let mut ctl = mounted(100);
        let vp = ctl.detach_viewport().unwrap();
        assert_eq!(vp.client_height(), 300.0);
        assert!(!ctl.is_attached());
        assert_eq!(ctl.window().range(), 0..20);
    }

    #[test]
    fn headless_viewport_clamps_scroll_top() {
        let mut vp = HeadlessViewport::new(300.0, 600.0);
        vp.set_scroll_top(-10.0);
        assert_eq!(vp.scroll_top(), 0.0);
        vp.set_scroll_top(1_000.0);
        assert_eq!(vp.scroll_top(), 300.0);
        vp.report(ScrollMetrics::new(12.0, 900.0, 300.0));
        assert_eq!(vp.metrics(), ScrollMetrics::new(12.0, 900.0, 300.0));
    }

    #[test]
    fn borrowed_viewport_works() {
        let mut vp = HeadlessViewport::new(300.0, 600.0);
        vp.set_scroll_top(290.0);
        {
            let mut ctl = ScrollWindowController::default();
            ctl.attach_viewport(&mut vp);
            ctl.on_measure_row_height(30.0);
            ctl.on_collection_changed(coins(100));
            ctl.on_scroll(ScrollMetrics::new(290.0, 600.0, 300.0));
        }
        assert_eq!(vp.scroll_top(), 260.0);
    }
}
