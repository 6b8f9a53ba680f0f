use serde::Serialize;

use super::NavigationIntent;
use super::table::{RouteMeta, resolve};
use crate::auth::RolePolicy;
use crate::session::Session;

/// GuardDecision
///
/// The only three outcomes a navigation can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

impl GuardDecision {
    pub fn redirect(&self) -> Option<NavigationIntent> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin => Some(NavigationIntent::Login),
            GuardDecision::RedirectToHome => Some(NavigationIntent::Home),
        }
    }
}

/// RouteGuard
///
/// Runs before every transition. Holds no state of its own and never mutates
/// the session: a role mismatch sends the user home, it does not log them out.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    session: &'a Session,
}

impl<'a> RouteGuard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn check(&self, meta: &RouteMeta) -> GuardDecision {
        let has_token = self.session.get_token().is_some();

        if meta.requires_auth && !has_token {
            return GuardDecision::RedirectToLogin;
        }

        if let Some(required) = &meta.requires_role {
            if !has_token {
                return GuardDecision::RedirectToLogin;
            }
            let role = RolePolicy::new(self.session).current_role();
            if !required.admits(role) {
                tracing::debug!(%role, ?required, "role not permitted, redirecting home");
                return GuardDecision::RedirectToHome;
            }
        }

        GuardDecision::Allow
    }

    /// Guards a concrete path. Paths outside the route table are allowed
    /// through; the view layer renders its not-found page.
    pub fn check_path(&self, path: &str) -> GuardDecision {
        match resolve(path) {
            Some(matched) => self.check(&matched.route.meta),
            None => GuardDecision::Allow,
        }
    }
}
