#![forbid(unsafe_code)]

//! Decoder for the upstream coin-list payload.
//!
//! The coin endpoint answers with a bare JSON array of coin names:
//!
//! ```json
//! ["BTCUSDT", "ETHUSDT", "", "SOLUSDT"]
//! ```
//!
//! [`parse_coin_list`] turns that body into [`Item`]s. Fetching the body is
//! the host's job; this module only decodes it.

use std::fmt;

use serde::Deserialize;

use crate::item::Item;

/// Errors from decoding a coin-list body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinListError {
    /// The host delivered no body (failed or aborted fetch).
    Empty,
    /// Body is not a JSON array of strings.
    Json(String),
}

impl fmt::Display for CoinListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "coin list body is empty"),
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
        }
    }
}

impl std::error::Error for CoinListError {}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawCoinList(Vec<String>);

/// Decode a coin-list body into items.
///
/// Names that are blank after trimming are dropped. Surviving names keep
/// their original spelling and order, and start out as non-favorites.
pub fn parse_coin_list(body: &str) -> Result<Vec<Item>, CoinListError> {
    if body.trim().is_empty() {
        return Err(CoinListError::Empty);
    }
    let RawCoinList(names) =
        serde_json::from_str(body).map_err(|e| CoinListError::Json(e.to_string()))?;

    let items: Vec<Item> = names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .map(Item::new)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(count = items.len(), "coin list decoded");

    Ok(items)
}
