//! # Notify client
//!
//! A Rust client and terminal front-end for the Notify album lookup
//! service: album search and detail, login and registration, and the
//! admin monitoring dashboard.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notify_client::{ClientConfig, NotifyApi, SessionStore, SearchView};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let api = NotifyApi::new(&config)?;
//!     let session = SessionStore::load(&config.session_file)?;
//!
//!     let mut search = SearchView::new();
//!     search.search(&api, "discovery").await;
//!     for album in search.results() {
//!         println!("{} - {}", album.artist, album.title);
//!     }
//!
//!     if let Some(user) = session.user() {
//!         println!("Signed in as {}", user.username);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`NotifyApi`] - one method per backend endpoint
//! - [`SessionStore`] - the persisted token and user
//! - [`validation`] - form rules for login and registration
//! - [`views`] - per-screen display state driving the API

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod validation;
pub mod views;

pub use api::NotifyApi;
pub use config::ClientConfig;
pub use error::NotifyError;
pub use models::{Album, AlbumDetail, AlbumSummary, LogEntry, MonitoringMetrics, User};
pub use routes::Route;
pub use session::SessionStore;
pub use views::{LoginView, MonitoringView, RegisterView, SearchView};
