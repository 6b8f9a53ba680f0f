use std::path::Path;

use super::{require_identity, require_token};
use crate::error::ApiError;
use crate::models::{
    AuthResponse, DeleteAvatarRequest, LoginRequest, MessageResponse, RegisterRequest,
    UpdateProfileRequest, UploadResponse, UserEnvelope, UserProfile,
};
use crate::notify::Notice;
use crate::pipeline::RequestPipeline;
use crate::router::NavigationIntent;
use crate::transport::ApiRequest;

/// Extensions the avatar endpoint accepts.
pub const AVATAR_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// UserApi
///
/// Registration, login/logout, and the signed-in user's own profile and
/// avatar. Admin operations on other users live in `admin`.
#[derive(Clone, Copy)]
pub struct UserApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> UserApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// POST /users/register. Registration does not sign the user in.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/users/register").json(payload)?;
        self.pipeline.execute(request).await
    }

    /// POST /users/login
    ///
    /// On success writes the token and profile into the session in one step.
    /// A response without a token, or with a profile that has no id, leaves
    /// the session untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/users/login").json(credentials)?;
        let response: AuthResponse = self.pipeline.execute(request).await?;

        match response.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                if let Some(user) = &response.user {
                    require_identity(self.pipeline, user)?;
                }
                self.pipeline.session().set_session(token, response.user.as_ref());
                self.pipeline.notifier().notify(Notice::info("logged in"));
                if response.user.is_none() {
                    tracing::warn!("login response carried no user profile; session is degraded");
                }
            }
            None => tracing::warn!("login succeeded without a token; session not stored"),
        }
        Ok(response)
    }

    /// GET /users/profile. Refreshes the cached profile.
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        let seq = session.next_profile_seq();

        let user: UserProfile = self.pipeline.execute(ApiRequest::get("/users/profile")).await?;
        require_identity(self.pipeline, &user)?;
        session.apply_profile(seq, &user);
        Ok(user)
    }

    /// PUT /users/profile
    ///
    /// Only the `user` part of the response replaces the cached profile,
    /// never the surrounding envelope.
    pub async fn update_own_profile(
        &self,
        changes: &UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        let seq = session.next_profile_seq();

        let request = ApiRequest::put("/users/profile").json(changes)?;
        let envelope: UserEnvelope = self.pipeline.execute(request).await?;
        require_identity(self.pipeline, &envelope.user)?;
        session.apply_profile(seq, &envelope.user);
        Ok(envelope.user)
    }

    /// POST /upload/avatar as a multipart form with a single `file` field.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        require_token(self.pipeline.session())?;
        let mime = avatar_mime(file_name)?;

        let request = ApiRequest::post("/upload/avatar").multipart("file", file_name, mime, bytes);
        self.pipeline.execute(request).await
    }

    /// DELETE /upload/avatar with the stored path in the JSON body.
    pub async fn delete_avatar(&self, path: &str) -> Result<MessageResponse, ApiError> {
        require_token(self.pipeline.session())?;
        let request = ApiRequest::delete("/upload/avatar").json(&DeleteAvatarRequest {
            path: path.to_string(),
        })?;
        self.pipeline.execute(request).await
    }

    /// Clears the session locally. No request is sent; the caller navigates.
    pub fn logout(&self) -> NavigationIntent {
        self.pipeline.session().clear_session();
        self.pipeline.notifier().notify(Notice::info("logged out"));
        NavigationIntent::Login
    }
}

/// Maps an avatar file name onto its upload content type, rejecting anything
/// the server would refuse.
pub fn avatar_mime(file_name: &str) -> Result<&'static str, ApiError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        _ => Err(ApiError::Validation(format!(
            "avatar must be one of: {}",
            AVATAR_EXTENSIONS.join(", ")
        ))),
    }
}
