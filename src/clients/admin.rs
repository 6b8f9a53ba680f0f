use super::{require_admin, require_identity, require_token};
use crate::auth::RolePolicy;
use crate::error::ApiError;
use crate::models::{
    AdminStats, AdminUpdateUserRequest, AdminUpdateUserRoleRequest, AdminUserList,
    AdminUserQuery, MessageResponse, Role, UserEnvelope,
};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// AdminApi
///
/// User management and dashboard counters. Every call requires a token and
/// the admin role; the server enforces the same rule again.
#[derive(Clone, Copy)]
pub struct AdminApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> AdminApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    fn guard(&self, action: &str) -> Result<(), ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_admin(session, action)
    }

    /// Replaces the cached profile when the edited user is the signed-in
    /// admin. The response must describe that same user.
    fn refresh_if_self(
        &self,
        user_id: u64,
        seq: u64,
        envelope: &UserEnvelope,
    ) -> Result<(), ApiError> {
        let session = self.pipeline.session();
        if RolePolicy::new(session).current_user_id() != Some(user_id) {
            return Ok(());
        }
        require_identity(self.pipeline, &envelope.user)?;
        if envelope.user.id != user_id {
            tracing::warn!(
                user_id,
                returned = envelope.user.id,
                "admin edit returned a different user"
            );
            return Err(ApiError::Decode(format!(
                "expected user {} in response, got {}",
                user_id, envelope.user.id
            )));
        }
        session.apply_profile(seq, &envelope.user);
        Ok(())
    }

    pub async fn list_users(&self, query: &AdminUserQuery) -> Result<AdminUserList, ApiError> {
        self.guard("list users")?;
        let request = ApiRequest::get("/admin/users").query(query)?;
        self.pipeline.execute(request).await
    }

    /// PUT /admin/users/{id}
    ///
    /// When the admin edits their own record the cached profile is refreshed
    /// from the response.
    pub async fn update_user_profile_as_admin(
        &self,
        user_id: u64,
        changes: &AdminUpdateUserRequest,
    ) -> Result<UserEnvelope, ApiError> {
        self.guard("edit other users")?;
        let session = self.pipeline.session();
        let seq = session.next_profile_seq();

        let request = ApiRequest::put(format!("/admin/users/{}", user_id)).json(changes)?;
        let envelope: UserEnvelope = self.pipeline.execute(request).await?;
        self.refresh_if_self(user_id, seq, &envelope)?;
        Ok(envelope)
    }

    pub async fn update_user_role(&self, user_id: u64, role: Role) -> Result<UserEnvelope, ApiError> {
        self.guard("change roles")?;
        let session = self.pipeline.session();
        let seq = session.next_profile_seq();

        let request = ApiRequest::put(format!("/admin/users/{}/role", user_id))
            .json(&AdminUpdateUserRoleRequest { role })?;
        let envelope: UserEnvelope = self.pipeline.execute(request).await?;
        // Demoting yourself takes effect locally right away.
        self.refresh_if_self(user_id, seq, &envelope)?;
        Ok(envelope)
    }

    pub async fn delete_user(&self, user_id: u64) -> Result<MessageResponse, ApiError> {
        self.guard("delete users")?;
        if RolePolicy::new(self.pipeline.session()).current_user_id() == Some(user_id) {
            return Err(ApiError::Validation(
                "you cannot delete your own account".to_string(),
            ));
        }
        let request = ApiRequest::delete(format!("/admin/users/{}", user_id));
        self.pipeline.execute(request).await
    }

    pub async fn stats(&self) -> Result<AdminStats, ApiError> {
        self.guard("view dashboard statistics")?;
        self.pipeline.execute(ApiRequest::get("/admin/stats")).await
    }
}
