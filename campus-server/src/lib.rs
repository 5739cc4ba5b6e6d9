//! Academy management server
//!
//! Module layout:
//! - `core`: configuration, shared state, HTTP server lifecycle
//! - `auth`: JWT issuing/validation and request middleware
//! - `db`: pool setup, row types, repositories
//! - `api`: route handlers, one module per resource
//! - `utils`: logging, validation, time helpers

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

/// Security event log. Routed to the `security` target so the filter
/// can keep these even when the rest of the app is quiet.
///
/// ```ignore
/// security_log!("LOGIN_FAILED", user = %username, "bad password");
/// ```
#[macro_export]
macro_rules! security_log {
    ($event:expr, $($field:tt)*) => {
        tracing::info!(target: "security", event = $event, $($field)*)
    };
    ($event:expr) => {
        tracing::info!(target: "security", event = $event)
    };
}

/// Load `.env` (if present) and initialize logging.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
}

pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"
   ___   _   __  __ ___ _   _ ___
  / __| /_\ |  \/  | _ \ | | / __|
 | (__ / _ \| |\/| |  _/ |_| \__ \
  \___/_/ \_\_|  |_|_|  \___/|___/
        academy server v{version}
"#
    );
}
