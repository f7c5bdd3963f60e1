//! Internal error handling for host failures

/// Cold path hint, causes compiler to better optimize unlikely error paths.
#[cold]
pub(crate) fn cold_path() {}

/// Panic on `Err` value in debug mode.
///
/// The error value is included in the log message.
macro_rules! log_or_panic_result {
    ($expr:expr, $($msg:expr),*) => {
        let res = $expr;
        match res {
            Ok(_) => {}
            Err(err) => {
                let msg = format!($($msg),*);
                $crate::error_handling::log_or_panic!("{msg}: {err:?}");
            }
        }
    };
}

/// Panic on debug builds only
///
/// The node api has no error channel, a host that rejects an operation is either a bug in the
/// caller (say a tag name with whitespace in it) or the host tree being modified behind our back.
/// In debug builds we want that pointed out right where it happens, in release builds we log it
/// and keep rendering the rest of the tree.
///
/// This should not be used for anything a caller can reasonably be expected to handle, those
/// should be `Option`/`Result`.
macro_rules! log_or_panic {
    ($($msg:expr),*) => {
        $crate::error_handling::cold_path();

        ::log::error!($($msg),*);
        if cfg!(debug_assertions) {
            panic!($($msg),*);
        }
    };
}

pub(crate) use {log_or_panic, log_or_panic_result};

#[cfg(test)]
mod tests {
    #[test]
    #[should_panic(expected = "Failed to append: \"boom\"")]
    fn test_debug_expect() {
        log_or_panic_result!(Err::<(), _>("boom"), "Failed to append");
    }

    #[test]
    fn test_ok_is_silent() {
        log_or_panic_result!(Ok::<(), &str>(()), "never logged");
    }

    #[test]
    #[should_panic(expected = "This won't panic in release")]
    fn test_debug_panic() {
        log_or_panic!("This won't panic in release");
    }
}
