//! Screen routing and the admin guard.

use crate::session::SessionStore;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Album search, the home screen.
    Search,
    Login,
    Register,
    /// Admin monitoring dashboard.
    Monitoring,
}

impl Route {
    /// Map a path to a route. Unknown paths fall back to the home screen.
    pub fn parse(path: &str) -> Self {
        match path.trim_matches('/') {
            "login" => Route::Login,
            "register" => Route::Register,
            "admin/monitoreo" | "admin/monitoring" => Route::Monitoring,
            _ => Route::Search,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Search => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Monitoring => "/admin/monitoreo",
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Monitoring)
    }

    /// Where navigation to this route actually lands. Admin-only routes
    /// send everyone but an authenticated admin to the login screen.
    pub fn resolve(self, session: &SessionStore) -> Route {
        if self.requires_admin() && !(session.is_authenticated() && session.is_admin()) {
            Route::Login
        } else {
            self
        }
    }
}
