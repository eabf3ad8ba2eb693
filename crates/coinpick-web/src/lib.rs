#![forbid(unsafe_code)]

//! Browser adapter for the coin picker (host-driven, deterministic).
//!
//! [`host::PickerHost`] holds all the logic and runs natively in tests; the
//! `wasm` module only exists on `wasm32` and translates between JavaScript
//! values and the host.

pub mod host;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use host::{PickerHost, RowView, WindowView, parse_tab};
