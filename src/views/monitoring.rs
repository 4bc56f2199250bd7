//! Admin monitoring dashboard.

use serde_json::Value;
use tracing::{error, warn};

use super::body_field;
use crate::api::NotifyApi;
use crate::error::{NotifyError, Result};
use crate::models::{LogEntry, MonitoringMetrics};
use crate::routes::Route;
use crate::session::SessionStore;

/// Selectable time windows, in hours.
pub const TIME_RANGES: [u32; 6] = [1, 6, 12, 24, 48, 72];
pub const DEFAULT_HOURS: u32 = 24;

/// State of the monitoring screen.
#[derive(Debug, Clone)]
pub struct MonitoringView {
    metrics: Option<MonitoringMetrics>,
    logs: Vec<LogEntry>,
    loading: bool,
    loading_logs: bool,
    error: Option<String>,
    selected_hours: u32,
}

impl Default for MonitoringView {
    fn default() -> Self {
        Self {
            metrics: None,
            logs: Vec::new(),
            loading: false,
            loading_logs: false,
            error: None,
            selected_hours: DEFAULT_HOURS,
        }
    }
}

impl MonitoringView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load of both metrics and logs. Returns a route when the
    /// user has to be sent elsewhere.
    pub async fn load(&mut self, api: &NotifyApi, session: &mut SessionStore) -> Option<Route> {
        let redirect = self.load_metrics(api, session).await;
        // Log failures stay off screen.
        let _ = self.load_logs(api, session).await;
        redirect
    }

    /// Fetch metrics for the selected window. Without a token this
    /// redirects to login; a 401 also logs the session out.
    pub async fn load_metrics(
        &mut self,
        api: &NotifyApi,
        session: &mut SessionStore,
    ) -> Option<Route> {
        self.loading = true;
        self.error = None;

        let Some(token) = session.token().map(str::to_string) else {
            self.loading = false;
            self.error = Some("Please log in.".to_string());
            return Some(Route::Login);
        };

        let result = api.monitoring_dashboard(&token, self.selected_hours).await;
        self.loading = false;

        match result {
            Ok(metrics) => {
                self.metrics = Some(metrics);
                None
            }
            Err(e) => {
                error!(
                    status = ?e.status(),
                    body = ?e.body(),
                    "Monitoring dashboard error: {}",
                    e
                );
                self.error = Some(monitoring_error_message(&e));
                if e.is_auth_failure() {
                    if let Err(io) = session.logout() {
                        warn!("Could not clear session: {}", io);
                    }
                    return Some(Route::Login);
                }
                None
            }
        }
    }

    /// Switch the time window and reload metrics.
    pub async fn change_time_range(
        &mut self,
        api: &NotifyApi,
        session: &mut SessionStore,
        hours: u32,
    ) -> Option<Route> {
        self.selected_hours = hours;
        self.load_metrics(api, session).await
    }

    /// Fetch recent log entries. Failures are logged, not displayed.
    /// Fetch recent log entries. Failures never touch the on-screen
    /// error; they are logged and handed back for callers that want them.
    pub async fn load_logs(&mut self, api: &NotifyApi, session: &SessionStore) -> Result<()> {
        let Some(token) = session.token() else {
            return Ok(());
        };

        self.loading_logs = true;
        let result = api.monitoring_logs(token).await;
        self.loading_logs = false;

        match result {
            Ok(logs) => {
                self.logs = logs;
                Ok(())
            }
            Err(e) => {
                error!("Error loading log entries: {}", e);
                Err(e)
            }
        }
    }

    pub fn metrics(&self) -> Option<&MonitoringMetrics> {
        self.metrics.as_ref()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn selected_hours(&self) -> u32 {
        self.selected_hours
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.loading_logs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Message shown for a failed dashboard load.
pub fn monitoring_error_message(err: &NotifyError) -> String {
    let status = err.status().map(|s| s.as_u16());
    let body = err.body();

    match status {
        Some(403) => return "Access denied. Administrator privileges are required.".to_string(),
        Some(401) => return "Authentication required. Please log in again.".to_string(),
        _ => {}
    }
    if err.is_unreachable() {
        return "Cannot connect to the server.".to_string();
    }
    match status {
        Some(404) => return "Monitoring endpoint not found.".to_string(),
        Some(500) => {
            let detail = body
                .and_then(|b| body_field(b, "detail").or_else(|| body_field(b, "error")))
                .unwrap_or_else(|| "Internal server error".to_string());
            return format!("Server error: {}.", detail);
        }
        _ => {}
    }

    if let Some(body) = body {
        if let Some(detail) = body_field(body, "detail") {
            return format!("Error: {}", detail);
        }
        if let Value::String(s) = body {
            return format!("Error: {}", s);
        }
        if let Some(e) = body_field(body, "error") {
            return format!("Error: {}", e);
        }
    }

    format!("Failed to load monitoring data: {}.", err)
}
