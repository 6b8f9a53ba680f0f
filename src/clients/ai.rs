use super::require_token;
use crate::error::ApiError;
use crate::models::{NoteAiMeta, SummarizeRequest, SummarizeResponse};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// AiApi
///
/// Summaries and stored review metadata for notes.
#[derive(Clone, Copy)]
pub struct AiApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> AiApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Summarizes a stored note or raw content. One of the two must be given.
    pub async fn summarize(&self, input: &SummarizeRequest) -> Result<SummarizeResponse, ApiError> {
        require_token(self.pipeline.session())?;
        let has_content = input
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if input.note_id.is_none() && !has_content {
            return Err(ApiError::Validation(
                "provide a note id or some content to summarize".to_string(),
            ));
        }
        let request = ApiRequest::post("/ai/summarize").json(input)?;
        self.pipeline.execute(request).await
    }

    pub async fn note_meta(&self, note_id: u64) -> Result<NoteAiMeta, ApiError> {
        self.pipeline
            .execute(ApiRequest::get(format!("/ai/notes/{}/meta", note_id)))
            .await
    }
}
