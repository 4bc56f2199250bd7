//! Admin monitoring payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate request metrics for a time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitoringMetrics {
    pub time_range_hours: u32,
    pub total_requests: u64,
    pub average_response_time_ms: f64,
    pub error_count: u64,
    pub error_rate_percent: f64,
    #[serde(default)]
    pub error_breakdown: Vec<StatusCount>,
    #[serde(default)]
    pub status_distribution: Vec<StatusCount>,
    #[serde(default)]
    pub top_endpoints: Vec<EndpointStats>,
    #[serde(default)]
    pub recent_errors: Vec<RecentError>,
}

/// Number of responses with a given status code.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status_code: u16,
    pub count: u64,
}

impl StatusCount {
    pub fn class(&self) -> StatusClass {
        StatusClass::from_code(self.status_code)
    }
}

/// Traffic summary for one endpoint and method.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EndpointStats {
    pub endpoint: String,
    pub method: String,
    pub count: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
}

/// One failed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecentError {
    pub request_id: String,
    pub timestamp: String,
    #[serde(default)]
    pub timestamp_formatted: String,
    pub method: String,
    pub endpoint: String,
    pub status_code: u16,
    pub response_time_ms: f64,
    #[serde(default)]
    pub user_username: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

impl RecentError {
    pub fn class(&self) -> StatusClass {
        StatusClass::from_code(self.status_code)
    }
}

/// Coarse HTTP status grouping used to pick display styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub fn from_code(code: u16) -> Self {
        match code {
            500..=u16::MAX => StatusClass::ServerError,
            400..=499 => StatusClass::ClientError,
            300..=399 => StatusClass::Redirect,
            _ => StatusClass::Success,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Success => "ok",
            StatusClass::Redirect => "redirect",
            StatusClass::ClientError => "client error",
            StatusClass::ServerError => "server error",
        }
    }
}

/// A backend log line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "cuerpo")]
    pub body: String,
    #[serde(rename = "fechahora", default)]
    pub timestamp: String,
}

impl LogEntry {
    pub fn log_kind(&self) -> LogKind {
        LogKind::parse(&self.kind)
    }
}

/// Known log categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Error,
    Crud,
    Action,
    ResponseTime,
    Other,
}

impl LogKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "ERROR" => LogKind::Error,
            "CRUD" => LogKind::Crud,
            "ACTION" => LogKind::Action,
            "RESPONSETIME" => LogKind::ResponseTime,
            _ => LogKind::Other,
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogKind::Error => "ERROR",
            LogKind::Crud => "CRUD",
            LogKind::Action => "ACTION",
            LogKind::ResponseTime => "RESPONSETIME",
            LogKind::Other => "OTHER",
        };
        f.write_str(s)
    }
}
