use crate::error::ApiError;
use crate::models::{CourseList, NoteList, SearchQuery};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// SearchApi
///
/// Public keyword search. A blank keyword is rejected locally since the
/// server would answer 400 anyway.
#[derive(Clone, Copy)]
pub struct SearchApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> SearchApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn courses(&self, query: &SearchQuery) -> Result<CourseList, ApiError> {
        let request = build("/search/courses", query)?;
        self.pipeline.execute(request).await
    }

    pub async fn notes(&self, query: &SearchQuery) -> Result<NoteList, ApiError> {
        let request = build("/search/notes", query)?;
        self.pipeline.execute(request).await
    }
}

fn build(path: &str, query: &SearchQuery) -> Result<ApiRequest, ApiError> {
    let keyword = query.keyword.trim();
    if keyword.is_empty() {
        return Err(ApiError::Validation("search keyword is required".to_string()));
    }
    let query = SearchQuery {
        keyword: keyword.to_string(),
        ..query.clone()
    };
    ApiRequest::get(path).query(&query)
}
