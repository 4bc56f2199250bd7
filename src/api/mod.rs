//! HTTP client for the Notify backend.
//!
//! [`NotifyApi`] wraps every backend endpoint the front-end uses: album
//! search and detail lookup, login, registration, and the admin
//! monitoring dashboard.

pub mod client;

pub use client::{NotifyApi, AUTH_SCHEME};
