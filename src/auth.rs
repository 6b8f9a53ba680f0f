use crate::models::{Role, RoleRequirement};
use crate::session::Session;

/// Role assumed when there is no session or the cached profile is unusable.
pub const FALLBACK_ROLE: Role = Role::Guest;

/// RolePolicy
///
/// Client-side mirror of the server's RBAC rules, used to hide controls and to
/// short-circuit calls the server would reject anyway. Every answer is read
/// fresh from the session; nothing is cached here.
///
/// These checks are advisory. The server enforces the same rules and is the
/// only authority.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy<'a> {
    session: &'a Session,
}

impl<'a> RolePolicy<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Token and profile both present. A bare token counts as a degraded
    /// session: usable for calls, but not "logged in" for display purposes.
    pub fn is_logged_in(&self) -> bool {
        self.session.get_token().is_some() && self.session.get_user().is_some()
    }

    pub fn current_role(&self) -> Role {
        self.session
            .get_user()
            .map(|user| user.role)
            .unwrap_or(FALLBACK_ROLE)
    }

    pub fn current_user_id(&self) -> Option<u64> {
        self.session.get_user().map(|user| user.id)
    }

    pub fn has_role(&self, target: impl Into<RoleRequirement>) -> bool {
        target.into().admits(self.current_role())
    }

    pub fn is_admin(&self) -> bool {
        self.current_role() == Role::Admin
    }

    pub fn is_teacher(&self) -> bool {
        self.current_role() == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.current_role() == Role::Student
    }

    /// Teachers and admins manage courses.
    pub fn has_manage_permission(&self) -> bool {
        self.has_role([Role::Teacher, Role::Admin])
    }

    /// Owner of the resource, or an admin (admin override).
    pub fn is_owner_or_admin(&self, owner_id: u64) -> bool {
        self.is_admin() || self.current_user_id() == Some(owner_id)
    }
}
