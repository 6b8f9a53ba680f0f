use super::{require_admin, require_manage_permission, require_token};
use crate::auth::RolePolicy;
use crate::error::ApiError;
use crate::models::{Course, CourseFilter, CourseList, CourseRequest, MessageResponse, Pagination};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// CourseApi
///
/// Browsing is public. Creating and editing needs teacher or admin, deleting
/// needs admin, joining needs a session.
#[derive(Clone, Copy)]
pub struct CourseApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> CourseApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn list(&self, filter: &CourseFilter) -> Result<CourseList, ApiError> {
        let request = ApiRequest::get("/courses").query(filter)?;
        self.pipeline.execute(request).await
    }

    pub async fn detail(&self, id: u64) -> Result<Course, ApiError> {
        self.pipeline
            .execute(ApiRequest::get(format!("/courses/{}", id)))
            .await
    }

    pub async fn create(&self, course: &CourseRequest) -> Result<Course, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_manage_permission(session, "create courses")?;

        let request = ApiRequest::post("/courses").json(course)?;
        self.pipeline.execute(request).await
    }

    pub async fn update(&self, id: u64, course: &CourseRequest) -> Result<Course, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_manage_permission(session, "edit courses")?;

        let request = ApiRequest::put(format!("/courses/{}", id)).json(course)?;
        self.pipeline.execute(request).await
    }

    pub async fn delete(&self, id: u64) -> Result<MessageResponse, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_admin(session, "delete courses")?;

        self.pipeline
            .execute(ApiRequest::delete(format!("/courses/{}", id)))
            .await
    }

    pub async fn join(&self, id: u64) -> Result<MessageResponse, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::post(format!("/courses/{}/join", id)))
            .await
    }

    /// Courses the signed-in user has joined.
    pub async fn my_courses(&self, paging: Pagination) -> Result<CourseList, ApiError> {
        require_token(self.pipeline.session())?;
        let request = ApiRequest::get("/courses/my").query(&paging)?;
        self.pipeline.execute(request).await
    }

    /// Newest courses for the home page. The server answers with a bare array.
    pub async fn latest(&self) -> Result<Vec<Course>, ApiError> {
        self.pipeline
            .execute(ApiRequest::get("/home/latest-courses"))
            .await
    }

    pub fn can_create_course(&self) -> bool {
        RolePolicy::new(self.pipeline.session()).has_manage_permission()
    }

    pub fn can_update_course(&self) -> bool {
        RolePolicy::new(self.pipeline.session()).has_manage_permission()
    }

    pub fn can_delete_course(&self) -> bool {
        RolePolicy::new(self.pipeline.session()).is_admin()
    }
}
