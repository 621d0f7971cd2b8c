//! The utilities module provides general capabilities that span the
//! stations, input modeling, persistence, and simulator modules.  The
//! utilities are centered around errors and debugging/traceability.

pub mod errors;

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// https://github.com/rustwasm/console_error_panic_hook#readme
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
