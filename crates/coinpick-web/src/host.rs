#![forbid(unsafe_code)]

//! Platform-independent host wrapping `CoinPicker<HeadlessViewport>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.
//!
//! The browser owns the real scroll container. On every `scroll` event it
//! reports the container's metrics to [`PickerHost::scroll`]; when the window
//! shifts, the host gets back the corrected `scrollTop` to write into the
//! container before re-rendering [`PickerHost::rows_json`].

use coinpick_core::config::{ConfigError, PickerConfig};
use coinpick_widgets::{
    CoinPicker, HeadlessViewport, LoadState, ScrollMetrics, ScrollOutcome, Tab, Viewport,
};
use serde::Serialize;
use tracing::debug;

/// One row as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub name: String,
    pub is_favorite: bool,
    pub selected: bool,
}

/// Window position, for debug overlays and host-side assertions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowView {
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub row_height: f64,
}

/// Parse a tab label as used by the dropdown markup.
#[must_use]
pub fn parse_tab(label: &str) -> Option<Tab> {
    Tab::ALL
        .into_iter()
        .find(|tab| tab.label().eq_ignore_ascii_case(label.trim()))
}

/// Host-driven picker: JSON and plain numbers in, JSON and scroll offsets out.
#[derive(Debug)]
pub struct PickerHost {
    picker: CoinPicker<HeadlessViewport>,
    coin_list_url: String,
}

impl Default for PickerHost {
    fn default() -> Self {
        Self::new(&PickerConfig::default())
    }
}

impl PickerHost {
    #[must_use]
    pub fn new(config: &PickerConfig) -> Self {
        debug!(config = %config.summary_short(), "picker host configured");
        Self {
            picker: CoinPicker::new(config),
            coin_list_url: config.coin_list_url.clone(),
        }
    }

    /// Build a host from the page's JSON config object.
    pub fn from_config_json(body: &str) -> Result<Self, Vec<ConfigError>> {
        PickerConfig::from_json(body).map(|config| Self::new(&config))
    }

    /// Endpoint the embedding page should fetch the coin list from.
    #[must_use]
    pub fn coin_list_url(&self) -> &str {
        &self.coin_list_url
    }

    #[must_use]
    pub fn picker(&self) -> &CoinPicker<HeadlessViewport> {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut CoinPicker<HeadlessViewport> {
        &mut self.picker
    }

    /// Install a coin-list body. Returns `false` if it could not be decoded;
    /// the picker then reports an error status.
    pub fn load_coins_json(&mut self, body: &str) -> bool {
        self.picker.load_json(body).is_ok()
    }

    /// Record that fetching the coin list failed.
    pub fn fail(&mut self, reason: &str) {
        self.picker.fail(reason);
    }

    /// The list container was mounted with the given size.
    pub fn mount(&mut self, client_height: f64, scroll_height: f64) {
        debug!(client_height, scroll_height, "list mounted");
        self.picker
            .list_mut()
            .attach_viewport(HeadlessViewport::new(client_height, scroll_height));
    }

    /// The list container was removed from the page.
    pub fn unmount(&mut self) {
        self.picker.list_mut().detach_viewport();
    }

    /// A representative row measured `height` pixels.
    pub fn set_row_height(&mut self, height: f64) {
        self.picker.list_mut().on_measure_row_height(height);
    }

    /// Report a scroll event. Returns the `scrollTop` the host must apply if
    /// the window shifted, or `None` if nothing changed.
    pub fn scroll(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> Option<f64> {
        let list = self.picker.list_mut();
        list.viewport_mut()?
            .report(ScrollMetrics::new(scroll_top, scroll_height, client_height));
        match list.on_viewport_scroll() {
            ScrollOutcome::Shifted { .. } => list.viewport().map(Viewport::scroll_top),
            ScrollOutcome::Idle | ScrollOutcome::Detached => None,
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.picker.set_query(query);
    }

    pub fn reset_query(&mut self) {
        self.picker.reset_query();
    }

    /// Switch to the tab with `label`. Unknown labels and the active tab are
    /// ignored.
    pub fn switch_tab(&mut self, label: &str) -> bool {
        parse_tab(label).is_some_and(|tab| self.picker.switch_tab(tab))
    }

    pub fn toggle_favorite(&mut self, name: &str) -> Option<bool> {
        self.picker.toggle_favorite(name)
    }

    pub fn select(&mut self, name: &str) {
        self.picker.select(name);
    }

    pub fn clear_selection(&mut self) {
        self.picker.clear_selection();
    }

    pub fn toggle_open(&mut self) {
        self.picker.toggle_open();
    }

    pub fn close(&mut self) {
        self.picker.close();
    }

    /// Placeholder text shown instead of the list, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&'static str> {
        match self.picker.load_state() {
            LoadState::Loading => Some("Loading..."),
            LoadState::Failed(_) => Some("Error fetching data."),
            LoadState::Loaded => None,
        }
    }

    #[must_use]
    pub fn rows(&self) -> Vec<RowView> {
        self.picker
            .rows()
            .into_iter()
            .map(|row| RowView {
                name: row.item.name.clone(),
                is_favorite: row.item.is_favorite,
                selected: row.selected,
            })
            .collect()
    }

    pub fn rows_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.rows())
    }

    #[must_use]
    pub fn window(&self) -> WindowView {
        let list = self.picker.list();
        let window = list.window();
        WindowView {
            start: window.start(),
            end: window.end(),
            total: list.collection().len(),
            row_height: list.row_height(),
        }
    }
}
