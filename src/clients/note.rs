use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::{require_owner_or_admin, require_token};
use crate::auth::RolePolicy;
use crate::error::ApiError;
use crate::models::{
    FavoriteStatus, LikeStatus, MessageResponse, Note, NoteEnvelope, NoteFilter, NoteList,
    NotePage, NoteRequest, NoteUpdateRequest, Pagination,
};
use crate::pipeline::RequestPipeline;
use crate::transport::ApiRequest;

/// Headers that make every cache between client and server skip a note
/// detail response.
pub const NO_CACHE_HEADERS: [(&str, &str); 4] = [
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
    ("If-Modified-Since", "Mon, 26 Jul 1997 05:00:00 GMT"),
];

/// Note collections arrive either bare or wrapped in `{"notes": [...]}`
/// depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum NoteCollection {
    Bare(Vec<Note>),
    Wrapped {
        #[serde(default)]
        notes: Vec<Note>,
    },
}

impl From<NoteCollection> for Vec<Note> {
    fn from(collection: NoteCollection) -> Self {
        match collection {
            NoteCollection::Bare(notes) | NoteCollection::Wrapped { notes } => notes,
        }
    }
}

/// NoteApi
///
/// Reading is public. Writing needs a session; editing and deleting also need
/// ownership of the note unless the user is an admin.
#[derive(Clone, Copy)]
pub struct NoteApi<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> NoteApi<'a> {
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn list(&self, filter: &NoteFilter) -> Result<NoteList, ApiError> {
        let request = ApiRequest::get("/notes").query(filter)?;
        self.pipeline.execute(request).await
    }

    /// GET /notes/{id}
    ///
    /// Like and view counters change constantly, so the detail fetch always
    /// goes to the origin: unique query parameters plus no-cache headers.
    pub async fn detail(&self, id: u64) -> Result<Note, ApiError> {
        let nonce: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
        let mut request = ApiRequest::get(format!("/notes/{}", id))
            .query_pair("t", Utc::now().timestamp_millis().to_string())
            .query_pair("_", nonce)
            .query_pair("nocache", "true");
        for (name, value) in NO_CACHE_HEADERS {
            request = request.header(name, value);
        }
        self.pipeline.execute(request).await
    }

    pub async fn create(&self, note: &NoteRequest) -> Result<Note, ApiError> {
        require_token(self.pipeline.session())?;
        let request = ApiRequest::post("/notes").json(note)?;
        let envelope: NoteEnvelope = self.pipeline.execute(request).await?;
        Ok(envelope.note)
    }

    /// `owner_id` is the note's `user_id` when the caller has it; `None`
    /// leaves the ownership decision to the server.
    pub async fn update(
        &self,
        id: u64,
        changes: &NoteUpdateRequest,
        owner_id: Option<u64>,
    ) -> Result<Note, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_owner_or_admin(session, owner_id, "edit")?;

        let request = ApiRequest::put(format!("/notes/{}", id)).json(changes)?;
        let envelope: NoteEnvelope = self.pipeline.execute(request).await?;
        Ok(envelope.note)
    }

    pub async fn delete(&self, id: u64, owner_id: Option<u64>) -> Result<MessageResponse, ApiError> {
        let session = self.pipeline.session();
        require_token(session)?;
        require_owner_or_admin(session, owner_id, "delete")?;

        self.pipeline
            .execute(ApiRequest::delete(format!("/notes/{}", id)))
            .await
    }

    pub async fn like(&self, id: u64) -> Result<LikeStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::post(format!("/notes/{}/like", id)))
            .await
    }

    pub async fn unlike(&self, id: u64) -> Result<LikeStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::delete(format!("/notes/{}/like", id)))
            .await
    }

    pub async fn favorite(&self, id: u64) -> Result<FavoriteStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::post(format!("/notes/{}/favorite", id)))
            .await
    }

    pub async fn unfavorite(&self, id: u64) -> Result<FavoriteStatus, ApiError> {
        require_token(self.pipeline.session())?;
        self.pipeline
            .execute(ApiRequest::delete(format!("/notes/{}/favorite", id)))
            .await
    }

    pub async fn my_favorites(&self, paging: Pagination) -> Result<NotePage, ApiError> {
        require_token(self.pipeline.session())?;
        let request = ApiRequest::get("/notes/favorites").query(&paging)?;
        self.pipeline.execute(request).await
    }

    pub async fn my_likes(&self, paging: Pagination) -> Result<NotePage, ApiError> {
        require_token(self.pipeline.session())?;
        let request = ApiRequest::get("/notes/likes").query(&paging)?;
        self.pipeline.execute(request).await
    }

    /// Other notes by the same author.
    pub async fn by_author(&self, author_id: u64) -> Result<NoteList, ApiError> {
        let filter = NoteFilter {
            user_id: Some(author_id),
            ..Default::default()
        };
        self.list(&filter).await
    }

    pub async fn related(&self, id: u64) -> Result<Vec<Note>, ApiError> {
        let collection: NoteCollection = self
            .pipeline
            .execute(ApiRequest::get(format!("/notes/{}/related", id)))
            .await?;
        Ok(collection.into())
    }

    pub async fn popular(&self) -> Result<Vec<Note>, ApiError> {
        let collection: NoteCollection = self
            .pipeline
            .execute(ApiRequest::get("/home/popular-notes"))
            .await?;
        Ok(collection.into())
    }

    pub fn can_edit_note(&self, author_id: u64) -> bool {
        RolePolicy::new(self.pipeline.session()).is_owner_or_admin(author_id)
    }

    pub fn can_delete_note(&self, author_id: u64) -> bool {
        RolePolicy::new(self.pipeline.session()).is_owner_or_admin(author_id)
    }
}
