#![forbid(unsafe_code)]

//! Searchable, tabbed coin picker model.
//!
//! [`CoinPicker`] is the collection source for a [`ScrollWindowController`]:
//! it owns the full coin list plus the query, active [`Tab`], favorites and
//! selection, and republishes the filtered [`Collection`] to the controller
//! whenever the filtered result changes. Every republish resets the scroll
//! window to the top.
//!
//! Rendering, the search box, and outside-click detection belong to the
//! host; the host calls the matching methods here.

use std::fmt;

use coinpick_core::coin_list::{CoinListError, parse_coin_list};
use coinpick_core::config::PickerConfig;
use coinpick_core::{Collection, Item};
use tracing::{debug, trace, warn};

use crate::scroll::{ScrollWindowController, Viewport};
use crate::window::WindowCalculator;

/// Dropdown tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    Favorites,
    #[default]
    All,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Tab; 2] = [Tab::Favorites, Tab::All];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::All => "all coins",
        }
    }

    /// Whether `item` belongs on this tab.
    #[inline]
    #[must_use]
    pub fn admits(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => item.is_favorite,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coin-list fetch state as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerRow<'a> {
    pub item: &'a Item,
    pub selected: bool,
}

/// Case-insensitive substring match on the coin name.
#[must_use]
pub fn matches_query(item: &Item, query_lower: &str) -> bool {
    query_lower.is_empty() || item.name.to_lowercase().contains(query_lower)
}

/// Coin picker state plus the windowed list it feeds.
#[derive(Debug)]
pub struct CoinPicker<V> {
    coins: Vec<Item>,
    query: String,
    tab: Tab,
    selected: Option<String>,
    is_open: bool,
    load_state: LoadState,
    list: ScrollWindowController<V>,
}

impl<V: Viewport> Default for CoinPicker<V> {
    fn default() -> Self {
        Self::new(&PickerConfig::default())
    }
}

impl<V: Viewport> CoinPicker<V> {
    /// Create an empty picker in the `Loading` state.
    #[must_use]
    pub fn new(config: &PickerConfig) -> Self {
        let list = ScrollWindowController::new(WindowCalculator::new(config.window_multiplier))
            .with_row_height(config.row_height_hint);
        Self {
            coins: Vec::new(),
            query: String::new(),
            tab: Tab::default(),
            selected: None,
            is_open: false,
            load_state: LoadState::Loading,
            list,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Every coin, unfiltered.
    #[must_use]
    pub fn coins(&self) -> &[Item] {
        &self.coins
    }

    /// The filtered collection currently backing the list.
    #[must_use]
    pub fn filtered(&self) -> &Collection {
        self.list.collection()
    }

    #[must_use]
    pub fn list(&self) -> &ScrollWindowController<V> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ScrollWindowController<V> {
        &mut self.list
    }

    /// Install a freshly fetched coin list.
    pub fn load(&mut self, coins: Vec<Item>) {
        debug!(count = coins.len(), "coins loaded");
        self.coins = coins;
        self.load_state = LoadState::Loaded;
        self.refilter();
    }

    /// Decode and install a coin-list body. On error the picker enters
    /// [`LoadState::Failed`] and keeps no coins.
    pub fn load_json(&mut self, body: &str) -> Result<usize, CoinListError> {
        match parse_coin_list(body) {
            Ok(coins) => {
                let count = coins.len();
                self.load(coins);
                Ok(count)
            }
            Err(err) => {
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Record a failed fetch.
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "coin list unavailable");
        self.coins.clear();
        self.load_state = LoadState::Failed(reason);
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.refilter();
    }

    pub fn reset_query(&mut self) {
        self.set_query(String::new());
    }

    /// Switch tabs. Returns `false` (and does nothing) if `tab` is already
    /// active.
    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        if tab == self.tab {
            return false;
        }
        debug!(%tab, "tab switched");
        self.tab = tab;
        self.refilter();
        true
    }

    /// Flip the favorite flag of the coin named `name`.
    ///
    /// Returns the new flag, or `None` if no such coin exists.
    pub fn toggle_favorite(&mut self, name: &str) -> Option<bool> {
        let coin = self.coins.iter_mut().find(|c| c.identity() == name)?;
        coin.is_favorite = !coin.is_favorite;
        let now = coin.is_favorite;
        trace!(name, favorite = now, "favorite toggled");
        self.refilter();
        Some(now)
    }

    /// Select a coin and close the dropdown.
    pub fn select(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(%name, "coin selected");
        self.selected = Some(name);
        self.is_open = false;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Close the dropdown (Escape key or click outside).
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Rows to render for the current window. Empty unless loaded.
    #[must_use]
    pub fn rows(&self) -> Vec<PickerRow<'_>> {
        if self.load_state != LoadState::Loaded {
            return Vec::new();
        }
        let selected = self.selected.as_deref();
        self.list
            .visible_slice()
            .iter()
            .map(|item| PickerRow {
                item,
                selected: selected == Some(item.identity()),
            })
            .collect()
    }

    fn refilter(&mut self) {
        let query_lower = self.query.to_lowercase();
        let tab = self.tab;
        let filtered: Vec<Item> = self
            .coins
            .iter()
            .filter(|c| tab.admits(c) && matches_query(c, &query_lower))
            .cloned()
            .collect();
        if filtered[..] == self.list.collection()[..] {
            trace!(len = filtered.len(), "filter result unchanged");
            return;
        }
        debug!(
            query = %self.query,
            %tab,
            len = filtered.len(),
            "filter result changed"
        );
        self.list.on_collection_changed(Collection::from(filtered));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::HeadlessViewport;

    fn picker(names: &[&str]) -> CoinPicker<HeadlessViewport> {
        let mut p = CoinPicker::default();
        p.list_mut().attach_viewport(HeadlessViewport::new(300.0, 600.0));
        p.list_mut().on_measure_row_height(30.0);
        p.load(names.iter().map(|n| Item::new(*n)).collect());
        p
    }

    fn visible(p: &CoinPicker<HeadlessViewport>) -> Vec<&str> {
        p.rows().iter().map(|r| r.item.identity()).collect()
    }

    #[test]
    fn starts_loading_with_no_rows() {
        let p: CoinPicker<HeadlessViewport> = CoinPicker::default();
        assert_eq!(p.load_state(), &LoadState::Loading);
        assert_eq!(p.tab(), Tab::All);
        assert!(p.rows().is_empty());
        assert!(!p.is_open());
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let mut p = picker(&["BTCUSDT", "ETHUSDT", "ETHBTC", "SOLUSDT"]);
        p.set_query("bt");
        assert_eq!(visible(&p), ["BTCUSDT", "ETHBTC"]);
        p.reset_query();
        assert_eq!(p.filtered().len(), 4);
    }

    #[test]
    fn favorites_tab_shows_only_favorites() {
        let mut p = picker(&["BTC", "ETH", "SOL"]);
        assert_eq!(p.toggle_favorite("ETH"), Some(true));
        assert!(p.switch_tab(Tab::Favorites));
        assert_eq!(visible(&p), ["ETH"]);
        assert_eq!(p.toggle_favorite("ETH"), Some(false));
        assert!(visible(&p).is_empty());
    }

    #[test]
    fn switching_to_active_tab_is_ignored() {
        let mut p = picker(&["BTC"]);
        assert!(!p.switch_tab(Tab::All));
    }

    #[test]
    fn toggle_unknown_coin_is_none() {
        let mut p = picker(&["BTC"]);
        assert_eq!(p.toggle_favorite("DOGE"), None);
    }

    #[test]
    fn select_records_and_closes() {
        let mut p = picker(&["BTC", "ETH"]);
        p.open();
        p.select("ETH");
        assert_eq!(p.selected(), Some("ETH"));
        assert!(!p.is_open());
        let rows = p.rows();
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        p.clear_selection();
        assert_eq!(p.selected(), None);
    }

    #[test]
    fn open_close_toggle() {
        let mut p = picker(&["BTC"]);
        p.toggle_open();
        assert!(p.is_open());
        p.close();
        assert!(!p.is_open());
        p.toggle_open();
        p.toggle_open();
        assert!(!p.is_open());
    }

    #[test]
    fn query_change_resets_window() {
        let names: Vec<String> = (0..100).map(|i| format!("C{i:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut p = picker(&refs);
        for _ in 0..4 {
            p.list_mut()
                .on_scroll(crate::scroll::ScrollMetrics::new(290.0, 600.0, 300.0));
        }
        assert_eq!(p.list().window().range(), 4..24);
        p.set_query("c0");
        assert_eq!(p.filtered().len(), 100);
        // Query matched everything: same contents, no reset.
        assert_eq!(p.list().window().range(), 4..24);
        p.set_query("c00");
        assert_eq!(p.list().window().range(), 0..10);
    }

    #[test]
    fn same_query_does_not_republish() {
        let mut p = picker(&["BTC", "ETH"]);
        let before = p.filtered().clone();
        p.set_query("");
        assert!(p.filtered().same_identity(&before));
    }

    #[test]
    fn load_json_success_and_failure() {
        let mut p: CoinPicker<HeadlessViewport> = CoinPicker::default();
        assert_eq!(p.load_json(r#"["BTC","","ETH"]"#), Ok(2));
        assert_eq!(p.load_state(), &LoadState::Loaded);
        assert_eq!(p.coins().len(), 2);

        assert!(p.load_json("not json").is_err());
        assert!(matches!(p.load_state(), LoadState::Failed(_)));
        assert!(p.coins().is_empty());
        assert!(p.filtered().is_empty());
        assert!(p.rows().is_empty());
    }

    #[test]
    fn config_multiplier_flows_into_window() {
        let config = PickerConfig {
            window_multiplier: 1,
            row_height_hint: 30.0,
            ..PickerConfig::default()
        };
        let mut p: CoinPicker<HeadlessViewport> = CoinPicker::new(&config);
        p.load((0..50).map(|i| Item::new(format!("C{i}"))).collect());
        p.list_mut().attach_viewport(HeadlessViewport::new(300.0, 600.0));
        assert_eq!(p.list().window().range(), 0..10);
    }

    #[test]
    fn tab_labels() {
        assert_eq!(Tab::All.to_string(), "all coins");
        assert_eq!(Tab::Favorites.label(), "favorites");
        assert_eq!(Tab::ALL[0], Tab::Favorites);
    }
}
