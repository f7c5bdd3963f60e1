#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![forbid(unsafe_code)]

pub mod attributes;
mod error_handling;
pub mod host;
pub mod node;
pub mod test_utils;

pub use attributes::ToAttribute;
pub use host::{Document, DomError, MemoryDocument, NodeId};
pub use node::{DEFAULT_ELEMENT_TYPE, ElementNode, IntoSubComponent, RenderState, SubComponent};

#[cfg(feature = "web")]
thread_local! {
    /// A lazy initlized reference to the js document.
    static DOCUMENT: web_sys::Document = {
        #[expect(
            clippy::expect_used,
            reason = "Nothing can be rendered in a browser without access to the document"
        )]
        web_sys::window()
            .expect("Window object not found")
            .document()
            .expect("Document object not found")
    };
}

/// Get the globally acquired document
///
/// This is cached so we dont need the js interop and `Option` handling for every node created.
#[cfg(feature = "web")]
pub(crate) fn get_document() -> web_sys::Document {
    DOCUMENT.with(Clone::clone)
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_log", target_arch = "wasm32"))] {
        /// Install `console_log`
        fn install_logger(level: log::Level) {
            if let Err(err) = console_log::init_with_level(level) {
                error_handling::log_or_panic!("Failed to create logger: {err}");
            }
        }
    } else if #[cfg(feature = "simple_logger")] {
        /// Install `simple_logger` writing to stderr
        fn install_logger(level: log::Level) {
            if let Err(err) = simple_logger::init_with_level(level) {
                eprintln!("Failed to setup logger {err}");
            }
        }
    } else {
        /// No logger backend enabled
        fn install_logger(_level: log::Level) {}
    }
}

/// Install a logger for the current target.
///
/// With the `console_log` feature this logs to the browser console on wasm, with the
/// `simple_logger` feature it logs to stderr everywhere else. Without either this does nothing
/// and `log` output goes wherever the application already sends it.
pub fn setup_logging(level: log::Level) {
    install_logger(level);
    log::info!("Logging initialized");
}

/// Commonly used types and traits.
pub mod prelude {
    pub use super::attributes::ToAttribute;
    #[cfg(feature = "web")]
    pub use super::host::WebDocument;
    pub use super::host::{Document, MemoryDocument, NodeId};
    pub use super::node::{ElementNode, IntoSubComponent, SubComponent};
}

#[cfg(all(test, feature = "simple_logger", not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn setup_logging_twice_keeps_the_first_logger() {
        setup_logging(log::Level::Warn);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        setup_logging(log::Level::Trace);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }
}
