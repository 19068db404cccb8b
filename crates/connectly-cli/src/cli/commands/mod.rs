//! CLI command handlers.

use anyhow::Result;
use connectly_core::routes::{self, RouteDecision};
use connectly_core::session::SessionStore;

pub mod auth;
pub mod config;
pub mod feed;
pub mod profile;

/// Runs the route guard for a screen. On denial the requested screen is
/// discarded and the user is pointed at the login screen.
pub(crate) fn enter(route: &str, session: &SessionStore) -> Result<()> {
    match routes::evaluate(route, session.is_authenticated()) {
        RouteDecision::Allowed => Ok(()),
        RouteDecision::Denied { redirect } => anyhow::bail!(
            "you are not signed in; redirected to {redirect} — run `connectly login`"
        ),
    }
}
