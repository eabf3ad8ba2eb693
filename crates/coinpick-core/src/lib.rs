#![forbid(unsafe_code)]

//! Core: coin items, shared collections, coin-list parsing, configuration,
//! and logging.
//!
//! # Role in coinpick
//! `coinpick-core` is the data layer. It owns the [`Item`] and
//! [`Collection`] types that every other crate passes around, decodes the
//! upstream coin-list payload, and decodes host configuration.
//!
//! # How it fits in the system
//! `coinpick-widgets` consumes [`Collection`] values to compute scroll
//! windows, and `coinpick-web` feeds it coin lists parsed here. Nothing in
//! this crate knows about viewports or scroll positions.

pub mod coin_list;
pub mod config;
pub mod item;
pub mod logging;

pub use item::{Collection, Item};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
