//! push-relay library
//!
//! HTTP relay that forwards push notifications to Firebase Cloud Messaging,
//! either to a caller-supplied device token or to the token stored on a
//! user's Firestore profile.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod server;
pub mod services;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
