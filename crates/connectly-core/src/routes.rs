//! Navigation route guard.
//!
//! A pure, synchronous check over the already-resolved session flag: no
//! network call ever happens here, so a revoked token is only discovered by
//! the next protected server call.

/// The login screen; also the redirect target for every denial.
pub const LOGIN: &str = "/login";

/// The registration screen.
pub const REGISTER: &str = "/register";

/// The home feed.
pub const HOME: &str = "/";

/// The profile screen.
pub const PROFILE: &str = "/profile";

/// The profile editing screen.
pub const EDIT_PROFILE: &str = "/edit-profile";

/// Routes reachable only with an authenticated session.
pub const PROTECTED: &[&str] = &[HOME, PROFILE, EDIT_PROFILE];

/// Routes reachable anonymously.
pub const PUBLIC: &[&str] = &[LOGIN, REGISTER];

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allowed,
    /// Navigation is redirected; the originally requested path is discarded.
    Denied { redirect: &'static str },
}

impl RouteDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, RouteDecision::Allowed)
    }
}

/// Evaluates a requested path against the current session state.
///
/// Protected paths are allowed only when authenticated. Unknown paths
/// redirect to the login screen regardless of authentication; that is a
/// catch-all routing policy, not an authorization decision.
pub fn evaluate(path: &str, authenticated: bool) -> RouteDecision {
    if PUBLIC.contains(&path) {
        return RouteDecision::Allowed;
    }
    if PROTECTED.contains(&path) {
        return if authenticated {
            RouteDecision::Allowed
        } else {
            RouteDecision::Denied { redirect: LOGIN }
        };
    }
    RouteDecision::Denied { redirect: LOGIN }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_paths_require_authentication() {
        for path in PROTECTED {
            assert_eq!(
                evaluate(path, false),
                RouteDecision::Denied { redirect: LOGIN },
                "{path} should be denied when anonymous"
            );
            assert_eq!(
                evaluate(path, true),
                RouteDecision::Allowed,
                "{path} should be allowed when authenticated"
            );
        }
    }

    #[test]
    fn public_paths_are_always_allowed() {
        for path in PUBLIC {
            assert!(evaluate(path, false).is_allowed());
            assert!(evaluate(path, true).is_allowed());
        }
    }

    #[test]
    fn unknown_paths_redirect_to_login_even_when_authenticated() {
        assert_eq!(
            evaluate("/no-such-screen", true),
            RouteDecision::Denied { redirect: LOGIN }
        );
        assert_eq!(
            evaluate("/no-such-screen", false),
            RouteDecision::Denied { redirect: LOGIN }
        );
    }

    #[test]
    fn guard_reflects_session_changes_immediately() {
        // The guard reads only the boolean it is handed; there is no cache
        // to go stale after a clear.
        assert!(evaluate(PROFILE, true).is_allowed());
        assert!(!evaluate(PROFILE, false).is_allowed());
    }
}
