//! Screen state for the front-end.
//!
//! Every view owns a few display flags and moves through
//! idle → loading → success/error. Views borrow the API client and the
//! session per call and hold `&mut self` across the request, so a view
//! never has more than one request in flight.

pub mod login;
pub mod monitoring;
pub mod register;
pub mod search;

pub use login::LoginView;
pub use monitoring::MonitoringView;
pub use register::RegisterView;
pub use search::SearchView;

use serde_json::Value;

/// Text of `body[key]`: strings as-is, other non-null values rendered as JSON.
pub(crate) fn body_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
