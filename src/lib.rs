use std::sync::Arc;

// --- Module Structure ---

// Session, policy and navigation.
pub mod auth;
pub mod router;
pub mod session;
pub mod storage;

// Request path: transport, pipeline, resource clients.
pub mod clients;
pub mod notify;
pub mod pipeline;
pub mod transport;

pub mod config;
pub mod error;
pub mod models;

// --- Public Re-exports ---

pub use auth::RolePolicy;
pub use config::{ClientConfig, Env};
pub use error::{ApiError, ErrorPayload, StatusCategory};
pub use notify::{Notice, NotifierState, RecordingNotifier, TracingNotifier};
pub use pipeline::RequestPipeline;
pub use router::{GuardDecision, NavigationIntent, RouteGuard};
pub use session::{Session, SessionState};
pub use storage::{FileStore, MemoryStore, StoreState};
pub use transport::{MockTransport, ReqwestTransport, TransportState};

use clients::{
    admin::AdminApi, ai::AiApi, comment::CommentApi, course::CourseApi, home::HomeApi,
    note::NoteApi, search::SearchApi, user::UserApi,
};

/// ApiClient
///
/// The single entry point a front end holds on to. It owns the request
/// pipeline (and through it the shared session) and hands out cheap,
/// borrowed per-resource clients.
#[derive(Clone)]
pub struct ApiClient {
    pipeline: RequestPipeline,
}

impl ApiClient {
    pub fn new(transport: TransportState, session: SessionState, notifier: NotifierState) -> Self {
        Self {
            pipeline: RequestPipeline::new(transport, session, notifier),
        }
    }

    /// Production wiring: reqwest transport, session persisted to the
    /// configured file, notices written to the log.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(config)?) as TransportState;
        let store = Arc::new(FileStore::new(config.store_path.clone())) as StoreState;
        let notifier = Arc::new(TracingNotifier) as NotifierState;

        tracing::info!(base_url = %config.api_base_url, store = %config.store_path.display(), "api client ready");
        Ok(Self::new(transport, Session::shared(store), notifier))
    }

    pub fn session(&self) -> &SessionState {
        self.pipeline.session()
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub fn policy(&self) -> RolePolicy<'_> {
        RolePolicy::new(self.session())
    }

    pub fn guard(&self) -> RouteGuard<'_> {
        RouteGuard::new(self.session())
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(&self.pipeline)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(&self.pipeline)
    }

    pub fn courses(&self) -> CourseApi<'_> {
        CourseApi::new(&self.pipeline)
    }

    pub fn notes(&self) -> NoteApi<'_> {
        NoteApi::new(&self.pipeline)
    }

    pub fn comments(&self) -> CommentApi<'_> {
        CommentApi::new(&self.pipeline)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(&self.pipeline)
    }

    pub fn home(&self) -> HomeApi<'_> {
        HomeApi::new(&self.pipeline)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(&self.pipeline)
    }
}
