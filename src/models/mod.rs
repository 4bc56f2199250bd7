//! Data models for Notify API requests and responses.
//!
//! This module contains the album records, user and authentication
//! payloads, and the admin monitoring shapes.

pub mod album;
pub mod common;
pub mod monitoring;
pub mod user;

// Re-exports for convenience
pub use album::{Album, AlbumDetail, AlbumSummary};
pub use common::{format_number, format_release_date, format_time};
pub use monitoring::{
    EndpointStats, LogEntry, LogKind, MonitoringMetrics, RecentError, StatusClass, StatusCount,
};
pub use user::{LoginRequest, LoginResponse, Photo, RegisterRequest, RegisterResponse, User};
