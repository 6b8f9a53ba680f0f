use super::{require_owner_or_admin, require_token};
use crate::auth::RolePolicy;
use crate::error::ApiError;
use crate::models::{
    Comment, CommentEnvelope, CommentList, CommentRequest, CommentUpdateRequest, LikeStatus,
    MessageResponse, Pagination,
};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

#[derive(Clone, Copy)]
pub struct CommentApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> CommentApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn list_by_note(&self, note_id: u64, paging: Pagination) -> Result<CommentList, ApiError> {
        let request = ApiRequest::get(format!("/comment/note/{}", note_id)).query(&paging)?;
        self.pipeline.execute(request).await
    }

    pub async fn create(&self, comment: &CommentRequest) -> Result<Comment, ApiError> {
        require_token(self.pipeline.session())?;
        if comment.content.trim().is_empty() {
            return Err(ApiError::Validation("comment cannot be empty".to_string()));
        }
        let request = ApiRequest::post("/comment/").json(comment)?;
        let envelope: CommentEnvelope = self.pipeline.execute(request).await?;
        Ok(envelope.comment)
    }

    pub async fn update(
        &self,
        id: u64,
        changes: &CommentUpdateRequest,
        owner_id: Option<u64>,
    ) -> Result<Comment, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_owner_or_admin(session, owner_id, "edit")?;

        let request = ApiRequest::put(format!("/comment/{}", id)).json(changes)?;
        let envelope: CommentEnvelope = self.pipeline.execute(request).await?;
        Ok(envelope.comment)
    }

    pub async fn delete(&self, id: u64, owner_id: Option<u64>) -> Result<MessageResponse, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_owner_or_admin(session, owner_id, "delete")?;

        self.pipeline
            .execute(ApiRequest::delete(format!("/comment/{}", id)))
            .await
    }

    pub async fn like(&self, id: u64) -> Result<LikeStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::post(format!("/comment/{}/like", id)))
            .await
    }

    pub async fn unlike(&self, id: u64) -> Result<LikeStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::delete(format!("/comment/{}/like", id)))
            .await
    }

    pub fn can_edit_comment(&self, author_id: u64) -> bool {
        RolePolicy::new(self.pipeline.session()).is_owner_or_admin(author_id)
    }

    pub fn can_delete_comment(&self, author_id: u64) -> bool {
        RolePolicy::new(self.pipeline.session()).is_owner_or_admin(author_id)
    }
}
