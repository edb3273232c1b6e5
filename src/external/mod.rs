//! Upstream service clients
//!
//! - `client`: the shared `reqwest` client
//! - `google`: service-account credentials and OAuth2 access tokens

pub mod client;
pub mod google;
