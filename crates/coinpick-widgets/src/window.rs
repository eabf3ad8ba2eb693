#![forbid(unsafe_code)]

//! Sliding index windows over an ordered collection.
//!
//! [`WindowCalculator`] is pure: it never retains state between calls and
//! never touches the collection except to slice it. The stateful side
//! (viewport events, compensation) lives in [`crate::scroll`].
//!
//! # Window policy
//!
//! The window holds `ceil(viewport_height / row_height) * multiplier` rows
//! (multiplier 2 by default: one extra screen of overscan). It moves one
//! row per [`advance`](WindowCalculator::advance) and keeps its size, except
//! where the collection bounds clamp it.
//!
//! # Invariants
//!
//! 1. `start <= end` for every window produced here.
//! 2. `advance` never grows the window.
//! 3. A Forward advance followed by a Backward advance (neither terminal)
//!    restores the original window.
//! 4. [`visible_slice`](WindowCalculator::visible_slice) never panics; it
//!    clamps to the collection.

use std::ops::Range;

/// Contiguous index range `[start, end)` plus the row height it was
/// computed for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowState {
    start: usize,
    end: usize,
    row_height: f64,
}

impl WindowState {
    /// Build a window. `end` is raised to `start` if smaller; a non-positive
    /// or non-finite `row_height` is stored as `0.0`.
    #[must_use]
    pub fn new(start: usize, end: usize, row_height: f64) -> Self {
        Self {
            start,
            end: end.max(start),
            row_height: sanitize_row_height(row_height),
        }
    }

    /// First materialized index (inclusive).
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last materialized index.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Row height in pixels (0 = unmeasured).
    #[inline]
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Window size (`end - start`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Direction of a one-row window shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward the end of the collection (user scrolled near the bottom).
    Forward,
    /// Toward index 0 (user scrolled near the top).
    Backward,
}

/// Pure window arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCalculator {
    multiplier: usize,
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MULTIPLIER)
    }
}

impl WindowCalculator {
    /// Screens materialized per window unless configured otherwise.
    pub const DEFAULT_MULTIPLIER: usize = 2;

    /// Create a calculator. A multiplier of 0 is raised to 1.
    #[must_use]
    pub fn new(multiplier: usize) -> Self {
        Self {
            multiplier: multiplier.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// Rows per window for a viewport/row height pair.
    ///
    /// Zero when the row height is unmeasured.
    #[must_use]
    pub fn window_size(&self, viewport_height: f64, row_height: f64) -> usize {
        let row_height = sanitize_row_height(row_height);
        if row_height == 0.0 {
            return 0;
        }
        let viewport_height = if viewport_height.is_finite() && viewport_height > 0.0 {
            viewport_height
        } else {
            0.0
        };
        // `as` saturates for out-of-range floats.
        let visible = (viewport_height / row_height).ceil() as usize;
        visible.saturating_mul(self.multiplier)
    }

    /// Window for a freshly (re)loaded collection: starts at index 0 and
    /// spans `min(size, len)` rows.
    #[must_use]
    pub fn initial_window(&self, len: usize, viewport_height: f64, row_height: f64) -> WindowState {
        let row_height = sanitize_row_height(row_height);
        if row_height == 0.0 {
            return WindowState::default();
        }
        let size = self.window_size(viewport_height, row_height);
        WindowState::new(0, size.min(len), row_height)
    }

    /// True when a Forward advance would be a no-op.
    #[inline]
    #[must_use]
    pub fn is_forward_terminal(&self, window: &WindowState, len: usize) -> bool {
        window.end.saturating_add(1) >= len
    }

    /// True when a Backward advance would be a no-op.
    #[inline]
    #[must_use]
    pub fn is_backward_terminal(&self, window: &WindowState) -> bool {
        window.start == 0
    }

    /// Shift the window by one row, preserving its size.
    ///
    /// Forward moves while `end < len - 1`; Backward moves while
    /// `start > 0`. At either terminal the window is returned unchanged.
    #[must_use]
    pub fn advance(
        &self,
        window: WindowState,
        len: usize,
        direction: ScrollDirection,
    ) -> WindowState {
        let size = window.len();
        match direction {
            ScrollDirection::Forward if !self.is_forward_terminal(&window, len) => {
                let end = window.end + 1;
                WindowState {
                    start: end - size,
                    end,
                    row_height: window.row_height,
                }
            }
            ScrollDirection::Backward if !self.is_backward_terminal(&window) => {
                let start = window.start - 1;
                WindowState {
                    start,
                    end: start + size,
                    row_height: window.row_height,
                }
            }
            _ => window,
        }
    }

    /// The materialized rows: `items[start..end]`, clamped to `items`.
    #[must_use]
    pub fn visible_slice<'a, T>(&self, items: &'a [T], window: &WindowState) -> &'a [T] {
        let end = window.end.min(items.len());
        let start = window.start.min(end);
        &items[start..end]
    }
}

/// Map negative, NaN and infinite row heights to `0.0` (unmeasured).
#[inline]
#[must_use]
pub fn sanitize_row_height(row_height: f64) -> f64 {
    if row_height.is_finite() && row_height > 0.0 {
        row_height
    } else {
        0.0
    }
}
