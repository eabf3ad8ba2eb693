#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the coin picker.
//!
//! This module wraps [`super::host::PickerHost`] with JS-friendly types,
//! sends `tracing` output and panics to the browser console, and adds DOM
//! row measurement. Only compiled on `wasm32` targets.

use std::io;

use js_sys::{Function, Reflect};
use tracing::{Level, Metadata};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use coinpick_core::config::{LogConfig, PickerConfig};
use coinpick_core::logging::{self, LoggingError, MakeWriter};
use coinpick_widgets::RowMeasure;

use super::host::PickerHost;

/// `console` method a message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleLevel {
    Log,
    Warn,
    Error,
}

impl ConsoleLevel {
    fn method(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Call `console[level](msg)`. Silently does nothing if the global has no
/// usable console.
fn console(level: ConsoleLevel, msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(method) = Reflect::get(&console, &level.method().into()) else {
        return;
    };
    let Ok(method) = method.dyn_into::<Function>() else {
        return;
    };
    let _ = method.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console(ConsoleLevel::Error, &format!("coinpick: {info}"));
        }));
    });
}

/// One formatted `tracing` event, flushed to the console when dropped.
struct ConsoleWriter {
    level: ConsoleLevel,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            console(self.level, line);
        }
    }
}

/// Routes `tracing` output to `console.log` / `warn` / `error` by level.
#[derive(Debug, Clone, Copy, Default)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: ConsoleLevel::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let level = match *meta.level() {
            Level::ERROR => ConsoleLevel::Error,
            Level::WARN => ConsoleLevel::Warn,
            _ => ConsoleLevel::Log,
        };
        ConsoleWriter {
            level,
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber once per page. Later handles keep the
/// first handle's log settings.
fn install_logging(config: &LogConfig) {
    match logging::init(config, ConsoleMakeWriter) {
        Ok(()) | Err(LoggingError::AlreadyInitialized) => {}
        Err(err) => console(
            ConsoleLevel::Warn,
            &format!("coinpick: logging disabled: {err}"),
        ),
    }
}

/// Measures a row by mounting a throwaway element with the row's CSS class
/// inside the list container.
pub struct DomRowMeasurer {
    container: Element,
    row_class: String,
}

impl DomRowMeasurer {
    #[must_use]
    pub fn new(container: Element, row_class: impl Into<String>) -> Self {
        Self {
            container,
            row_class: row_class.into(),
        }
    }

    fn try_measure(&self) -> Result<f64, JsValue> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no owner document"))?;
        let sample: HtmlElement = document.create_element("li")?.dyn_into()?;
        sample.set_class_name(&self.row_class);
        sample.set_text_content(Some("M"));
        self.container.append_child(&sample)?;
        let height = f64::from(sample.offset_height());
        self.container.remove_child(&sample)?;
        Ok(height)
    }
}

impl RowMeasure for DomRowMeasurer {
    /// Returns 0 (unmeasured) if the sample row cannot be mounted.
    fn measure_row_height(&self) -> f64 {
        self.try_measure().unwrap_or_else(|err| {
            console(
                ConsoleLevel::Warn,
                &format!(
                    "coinpick: measuring .{} failed, rows stay unmeasured: {err:?}",
                    self.row_class
                ),
            );
            0.0
        })
    }
}

/// JS handle for one coin picker.
///
/// Host-driven: JavaScript forwards container scroll events and UI actions,
/// writes back returned `scrollTop` corrections, and re-renders `rowsJson()`.
#[wasm_bindgen]
pub struct CoinPickerHandle {
    inner: PickerHost,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl CoinPickerHandle {
    /// Picker with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        let config = PickerConfig::default();
        install_logging(&config.log);
        Self {
            inner: PickerHost::new(&config),
        }
    }

    /// Picker configured from a JSON object (see `PickerConfig`). Throws a
    /// string listing every invalid field.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<CoinPickerHandle, JsValue> {
        install_panic_hook();
        let config = PickerConfig::from_json(json).map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            JsValue::from_str(&format!("invalid coinpick config: {}", joined.join("; ")))
        })?;
        install_logging(&config.log);
        Ok(Self {
            inner: PickerHost::new(&config),
        })
    }

    /// Endpoint to fetch before calling `loadCoinsJson`.
    #[wasm_bindgen(js_name = coinListUrl)]
    pub fn coin_list_url(&self) -> String {
        self.inner.coin_list_url().to_owned()
    }

    /// Install the coin-list response body. Returns `false` on decode error.
    #[wasm_bindgen(js_name = loadCoinsJson)]
    pub fn load_coins_json(&mut self, body: &str) -> bool {
        self.inner.load_coins_json(body)
    }

    #[wasm_bindgen(js_name = fetchFailed)]
    pub fn fetch_failed(&mut self, reason: &str) {
        self.inner.fail(reason);
    }

    /// Attach the list container and measure a row inside it.
    pub fn mount(&mut self, container: Element, row_class: &str) {
        let client_height = f64::from(container.client_height());
        let scroll_height = f64::from(container.scroll_height());
        self.inner.mount(client_height, scroll_height);
        let measurer = DomRowMeasurer::new(container, row_class);
        self.inner
            .picker_mut()
            .list_mut()
            .measure_with(&measurer);
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    /// Forward a container `scroll` event. Returns the `scrollTop` to apply,
    /// or `undefined` when the window did not move.
    pub fn scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> Option<f64> {
        self.inner.scroll(scroll_top, scroll_height, client_height)
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, query: &str) {
        self.inner.set_query(query);
    }

    #[wasm_bindgen(js_name = resetQuery)]
    pub fn reset_query(&mut self) {
        self.inner.reset_query();
    }

    #[wasm_bindgen(js_name = switchTab)]
    pub fn switch_tab(&mut self, label: &str) -> bool {
        self.inner.switch_tab(label)
    }

    #[wasm_bindgen(js_name = toggleFavorite)]
    pub fn toggle_favorite(&mut self, name: &str) -> Option<bool> {
        self.inner.toggle_favorite(name)
    }

    pub fn select(&mut self, name: &str) {
        self.inner.select(name);
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    #[wasm_bindgen(js_name = toggleOpen)]
    pub fn toggle_open(&mut self) {
        self.inner.toggle_open();
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.picker().is_open()
    }

    #[wasm_bindgen(js_name = selectedCoin)]
    pub fn selected_coin(&self) -> Option<String> {
        self.inner.picker().selected().map(str::to_owned)
    }

    #[wasm_bindgen(js_name = statusMessage)]
    pub fn status_message(&self) -> Option<String> {
        self.inner.status_message().map(str::to_owned)
    }

    /// Visible rows as a JSON array of `{name, is_favorite, selected}`.
    #[wasm_bindgen(js_name = rowsJson)]
    pub fn rows_json(&self) -> Result<String, JsValue> {
        self.inner
            .rows_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for CoinPickerHandle {
    fn default() -> Self {
        Self::new()
    }
}
