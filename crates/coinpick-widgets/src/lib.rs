#![forbid(unsafe_code)]

//! Windowed list virtualization and the coin picker model.
//!
//! # Role in coinpick
//! This crate keeps a scrollable coin list cheap to render: only a sliding
//! window of rows is materialized, while the viewport's scroll offset is
//! corrected on every window shift so the list appears continuous.
//!
//! - [`window`]: pure window arithmetic ([`WindowCalculator`]).
//! - [`scroll`]: the stateful [`ScrollWindowController`] and the
//!   [`Viewport`] / [`RowMeasure`] collaborator traits.
//! - [`picker`]: the [`CoinPicker`] model (query, tabs, favorites,
//!   selection) that feeds collections to the controller.

pub mod picker;
pub mod scroll;
pub mod window;

pub use picker::{CoinPicker, LoadState, PickerRow, Tab};
pub use scroll::{
    HeadlessViewport, RowMeasure, ScrollMetrics, ScrollOutcome, ScrollWindowController, Viewport,
};
pub use window::{ScrollDirection, WindowCalculator, WindowState};
