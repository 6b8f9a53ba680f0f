use super::course::CourseApi;
use super::note::NoteApi;
use crate::error::ApiError;
use crate::models::{Course, Note, PublicStats};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// Landing page feeds. All public.
#[derive(Clone, Copy)]
pub struct HomeApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> HomeApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn popular_notes(&self) -> Result<Vec<Note>, ApiError> {
        NoteApi::new(self.pipeline).popular().await
    }

    pub async fn latest_courses(&self) -> Result<Vec<Course>, ApiError> {
        CourseApi::new(self.pipeline).latest().await
    }

    pub async fn public_stats(&self) -> Result<PublicStats, ApiError> {
        self.pipeline.execute(ApiRequest::get("/home/stats")).await
    }
}
