//! utilities for writing browser tests on wasm
#![cfg(feature = "test_utils")]
#![expect(clippy::expect_used, reason = "tests only")]

use wasm_bindgen::JsCast;

use crate::get_document;

/// The parent of the testing env
const MOUNT_PARENT: &str = "__CASCADE_TESTING_PARENT";
/// The id of the element tests should render into
/// This is auto created and cleaned up by `setup`
pub const MOUNT_POINT: &str = "__CASCADE_TESTING_MOUNT_POINT";

/// Has a logger be initlized?
static LOGGER_ACTIVE: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// A simple `log` logger that just prints to `console.log` for all levels.
// NOTE: wasm_bindgen_test splits captured output per console level, sending everything to `.log`
// keeps it in order.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn flush(&self) {}
    fn log(&self, record: &log::Record) {
        let message = format!(
            "{}({}): {}",
            record.level(),
            record.module_path().unwrap_or_default(),
            record.args()
        );
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&message));
    }
}

/// Reset `MOUNT_POINT` to an empty element and return it.
///
/// # Panics
/// If the js is in a invalid state.
pub fn setup() -> web_sys::Node {
    let was_logger_active = LOGGER_ACTIVE.fetch_or(true, std::sync::atomic::Ordering::Relaxed);
    if !was_logger_active {
        log::set_logger(&ConsoleLogger).expect("Failed to set logger");
        log::set_max_level(log::LevelFilter::Trace);
    }

    let document = get_document();

    if let Some(element) = document.get_element_by_id(MOUNT_PARENT) {
        log::trace!("Removed old test tree");
        element.remove();
    }

    let parent = document
        .create_element("div")
        .expect("Failed to create div");
    parent.set_id(MOUNT_PARENT);

    let mount = document
        .create_element("div")
        .expect("Failed to create div");
    mount.set_id(MOUNT_POINT);

    parent.append_child(&mount).expect("Failed to append child");
    document
        .body()
        .expect("Could not find <body>")
        .append_child(&parent)
        .expect("Failed to append child");

    log::trace!("Setup test target");
    mount.into()
}

/// Get a element based on its `id` attribute
///
/// # Panics
/// If js is in a invalid state or the element isnt found
#[must_use]
#[expect(clippy::panic, reason = "tests only")]
pub fn get(id: &str) -> web_sys::HtmlElement {
    get_document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("Id {id} not found"))
        .dyn_ref::<web_sys::HtmlElement>()
        .expect("Target Node wasnt a html element")
        .clone()
}
