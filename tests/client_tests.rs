use noteshare_client::{
    ApiClient, ApiError, MockTransport, NavigationIntent, RecordingNotifier, Session,
    error::LOGIN_REQUIRED,
    models::{
        AdminUpdateUserRequest, CommentRequest, CommentUpdateRequest, CourseRequest, LoginRequest,
        NoteRequest, NoteUpdateRequest, Pagination, Role, SearchQuery, SummarizeRequest,
        UpdateProfileRequest, UserProfile,
    },
    transport::RequestBody,
};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

// --- Test Harness ---

struct TestClient {
    client: ApiClient,
    transport: Arc<MockTransport>,
    notifier: Arc<RecordingNotifier>,
}

fn client() -> TestClient {
    let transport = Arc::new(MockTransport::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ApiClient::new(
        transport.clone(),
        Arc::new(Session::in_memory()),
        notifier.clone(),
    );
    TestClient {
        client,
        transport,
        notifier,
    }
}

fn client_as(id: u64, role: Role) -> TestClient {
    let test = client();
    test.client.session().set_session(
        "t1",
        Some(&UserProfile {
            id,
            username: format!("user{}", id),
            role,
            ..Default::default()
        }),
    );
    test
}

fn assert_login_required(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::Validation(message)) => assert_eq!(message, LOGIN_REQUIRED),
        other => panic!("expected login-required validation error, got {:?}", other),
    }
}

fn sample_course() -> CourseRequest {
    CourseRequest {
        code: "CS101".to_string(),
        name: "Intro to Programming".to_string(),
        ..Default::default()
    }
}

// --- Auth-required guard ---

#[tokio::test]
async fn test_auth_required_operations_never_reach_network() {
    let test = client();
    let api = &test.client;

    assert_login_required(api.users().get_profile().await);
    assert_login_required(
        api.users()
            .update_own_profile(&UpdateProfileRequest::default())
            .await,
    );
    assert_login_required(api.users().upload_avatar("me.png", vec![1, 2, 3]).await);
    assert_login_required(api.courses().join(1).await);
    assert_login_required(api.courses().my_courses(Pagination::default()).await);
    assert_login_required(api.notes().create(&NoteRequest::default()).await);
    assert_login_required(api.notes().like(1).await);
    assert_login_required(api.notes().my_favorites(Pagination::default()).await);
    assert_login_required(api.comments().like(1).await);
    assert_login_required(api.comments().delete(1, Some(1)).await);
    assert_login_required(api.admin().stats().await);
    assert_login_required(
        api.ai()
            .summarize(&SummarizeRequest {
                note_id: Some(1),
                content: None,
            })
            .await,
    );

    assert_eq!(test.transport.request_count(), 0);
    assert!(test.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_public_reads_need_no_session() {
    let test = client();
    test.transport
        .respond(200, json!({"courses": [{"id": 1, "name": "Algebra"}], "total": 1}));

    let list = test.client.courses().list(&Default::default()).await.unwrap();
    assert_eq!(list.courses.len(), 1);
    assert_eq!(list.total, 1);

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/courses");
    assert!(request.header_value("Token").is_none());
}

// --- Manage-permission guard ---

#[tokio::test]
async fn test_student_cannot_mutate_courses() {
    let test = client_as(1, Role::Student);
    let courses = test.client.courses();

    assert!(!courses.can_create_course());
    assert!(matches!(
        courses.create(&sample_course()).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert!(matches!(
        courses.update(4, &sample_course()).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert!(matches!(courses.delete(4).await, Err(ApiError::PermissionDenied(_))));
    assert_eq!(test.transport.request_count(), 0);
}

#[tokio::test]
async fn test_teacher_creates_course_but_cannot_delete() {
    let test = client_as(2, Role::Teacher);
    test.transport.respond(201, json!({"id": 9, "code": "CS101"}));

    let courses = test.client.courses();
    assert!(courses.can_create_course());
    assert!(courses.can_update_course());
    assert!(!courses.can_delete_course());

    let created = courses.create(&sample_course()).await.unwrap();
    assert_eq!(created.id, 9);

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/courses");
    assert_eq!(request.header_value("Token"), Some("t1"));
    match &request.body {
        RequestBody::Json(body) => assert_eq!(body["code"], "CS101"),
        other => panic!("expected json body, got {:?}", other),
    }

    assert!(matches!(courses.delete(9).await, Err(ApiError::PermissionDenied(_))));
    assert_eq!(test.transport.request_count(), 1);
}

#[tokio::test]
async fn test_admin_deletes_course() {
    let test = client_as(5, Role::Admin);
    test.transport.respond(200, json!({"message": "deleted"}));

    let response = test.client.courses().delete(9).await.unwrap();
    assert_eq!(response.message, "deleted");

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/courses/9");
}

// --- Ownership guard ---

#[tokio::test]
async fn test_student_cannot_edit_someone_elses_note() {
    let test = client_as(1, Role::Student);
    let notes = test.client.notes();

    assert!(!notes.can_edit_note(2));
    assert!(matches!(
        notes.update(10, &NoteUpdateRequest::default(), Some(2)).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert!(matches!(
        notes.delete(10, Some(2)).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert_eq!(test.transport.request_count(), 0);
}

#[tokio::test]
async fn test_owner_edits_own_note_regardless_of_role() {
    let test = client_as(1, Role::Student);
    test.transport
        .respond(200, json!({"message": "updated", "note": {"id": 10, "title": "New", "user_id": 1}}));

    let changes = NoteUpdateRequest {
        title: Some("New".to_string()),
        ..Default::default()
    };
    let note = test.client.notes().update(10, &changes, Some(1)).await.unwrap();
    assert_eq!(note.title, "New");

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/notes/10");
}

#[tokio::test]
async fn test_admin_overrides_ownership_and_unknown_owner_is_deferred() {
    let test = client_as(5, Role::Admin);
    assert!(test.client.comments().can_delete_comment(99));
    test.client.comments().delete(3, Some(99)).await.unwrap();

    let student = client_as(1, Role::Student);
    // No owner id supplied: the server decides.
    student.client.notes().delete(3, None).await.unwrap();
    assert_eq!(student.transport.request_count(), 1);

    assert!(matches!(
        student
            .client
            .comments()
            .update(3, &CommentUpdateRequest::default(), Some(42))
            .await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert_eq!(student.transport.request_count(), 1);
}

// --- Session lifecycle ---

#[tokio::test]
async fn test_login_stores_token_and_profile_together() {
    let test = client();
    test.transport.respond(
        200,
        json!({
            "message": "login successful",
            "token": "jwt-abc",
            "user": {"id": 12, "username": "mei", "role": "teacher"}
        }),
    );

    let response = test
        .client
        .users()
        .login(&LoginRequest {
            username: "mei".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token.as_deref(), Some("jwt-abc"));

    let session = test.client.session();
    assert_eq!(session.get_token().as_deref(), Some("jwt-abc"));
    assert_eq!(session.get_user().map(|u| u.id), Some(12));
    assert!(test.client.policy().is_teacher());
    assert!(test.client.policy().is_logged_in());

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.path, "/users/login");
    assert!(request.header_value("Token").is_none());
}

#[tokio::test]
async fn test_logout_clears_everything_and_asks_for_login() {
    let test = client_as(3, Role::Student);

    let intent = test.client.users().logout();
    assert_eq!(intent, NavigationIntent::Login);
    assert_eq!(test.client.session().get_token(), None);
    assert_eq!(test.client.session().get_user(), None);
    assert_eq!(test.client.policy().current_role(), Role::Guest);
    assert_eq!(test.transport.request_count(), 0);
}

#[tokio::test]
async fn test_profile_update_replaces_only_the_cached_user() {
    let test = client_as(3, Role::Student);
    test.transport.respond(
        200,
        json!({"message": "profile updated", "user": {"id": 3, "nickname": "Kai", "role": "student"}}),
    );

    let changes = UpdateProfileRequest {
        nickname: Some("Kai".to_string()),
        ..Default::default()
    };
    let user = test.client.users().update_own_profile(&changes).await.unwrap();
    assert_eq!(user.nickname, "Kai");

    let session = test.client.session();
    assert_eq!(session.get_user().map(|u| u.nickname), Some("Kai".to_string()));
    assert_eq!(session.get_token().as_deref(), Some("t1"));

    match &test.transport.last_request().unwrap().body {
        RequestBody::Json(body) => {
            assert_eq!(body, &json!({"nickname": "Kai"}));
        }
        other => panic!("expected json body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_admin_editing_self_refreshes_cache_but_not_for_others() {
    let test = client_as(5, Role::Admin);
    let changes = AdminUpdateUserRequest {
        nickname: "Root".to_string(),
        ..Default::default()
    };

    test.transport
        .respond(200, json!({"message": "ok", "user": {"id": 8, "nickname": "Other", "role": "student"}}));
    test.client
        .admin()
        .update_user_profile_as_admin(8, &changes)
        .await
        .unwrap();
    assert_eq!(test.client.session().get_user().map(|u| u.id), Some(5));

    test.transport
        .respond(200, json!({"message": "ok", "user": {"id": 5, "nickname": "Root", "role": "admin"}}));
    test.client
        .admin()
        .update_user_profile_as_admin(5, &changes)
        .await
        .unwrap();
    assert_eq!(
        test.client.session().get_user().map(|u| u.nickname),
        Some("Root".to_string())
    );
    assert_eq!(test.transport.last_request().unwrap().path, "/admin/users/5");
}

#[tokio::test]
async fn test_profile_response_without_id_keeps_cached_identity() {
    let test = client_as(7, Role::Teacher);

    // Wrapped in an envelope the profile endpoint never sends.
    test.transport.respond(200, json!({"user": {"id": 7, "role": "teacher"}}));
    let err = test.client.users().get_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    test.transport.respond(200, json!({"message": "profile updated"}));
    let err = test
        .client
        .users()
        .update_own_profile(&UpdateProfileRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    let cached = test.client.session().get_user().unwrap();
    assert_eq!((cached.id, cached.role), (7, Role::Teacher));
    assert!(test.client.courses().can_create_course());
    assert!(!test.client.policy().is_owner_or_admin(0));
    assert_eq!(test.notifier.messages().len(), 2);
}

#[tokio::test]
async fn test_login_with_empty_user_is_not_stored() {
    let test = client();
    test.transport
        .respond(200, json!({"message": "login successful", "token": "jwt-abc", "user": {}}));

    let err = test
        .client
        .users()
        .login(&LoginRequest {
            username: "mei".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(test.client.session().get_token(), None);
    assert_eq!(test.client.session().get_user(), None);
    assert!(!test.client.policy().is_logged_in());
}

#[tokio::test]
async fn test_admin_self_edit_with_wrong_user_keeps_cached_identity() {
    let test = client_as(5, Role::Admin);

    test.transport.respond(200, json!({"message": "role updated"}));
    let err = test
        .client
        .admin()
        .update_user_role(5, Role::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    test.transport.respond(200, json!({"message": "ok", "user": {"id": 8, "role": "student"}}));
    let err = test
        .client
        .admin()
        .update_user_profile_as_admin(5, &AdminUpdateUserRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    assert!(test.client.policy().is_admin());
    assert_eq!(test.client.session().get_user().map(|u| u.id), Some(5));
}

#[tokio::test]
async fn test_admin_operations_need_admin_role() {
    let test = client_as(2, Role::Teacher);
    assert!(matches!(
        test.client.admin().list_users(&Default::default()).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert!(matches!(
        test.client.admin().update_user_role(3, Role::Teacher).await,
        Err(ApiError::PermissionDenied(_))
    ));
    assert_eq!(test.transport.request_count(), 0);

    let admin = client_as(5, Role::Admin);
    assert!(matches!(
        admin.client.admin().delete_user(5).await,
        Err(ApiError::Validation(_))
    ));
    admin.client.admin().delete_user(6).await.unwrap();
    let request = admin.transport.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/admin/users/6");
}

// --- Request shapes ---

#[tokio::test]
async fn test_note_detail_bypasses_caches() {
    let test = client();
    test.transport.respond(200, json!({"id": 4, "like_count": 12}));

    let note = test.client.notes().detail(4).await.unwrap();
    assert_eq!(note.like_count, 12);

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.path, "/notes/4");
    assert_eq!(request.query_value("nocache"), Some("true"));
    assert!(request.query_value("t").unwrap().parse::<i64>().is_ok());
    assert_eq!(request.query_value("_").map(str::len), Some(9));
    assert_eq!(
        request.header_value("cache-control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(request.header_value("Pragma"), Some("no-cache"));
    assert_eq!(request.header_value("Expires"), Some("0"));
}

#[tokio::test]
async fn test_notes_by_author_filter_on_user_id() {
    let test = client();
    test.client.notes().by_author(17).await.unwrap();

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.path, "/notes");
    assert_eq!(request.query, vec![("user_id".to_string(), "17".to_string())]);
}

#[tokio::test]
async fn test_home_feeds_accept_server_shapes() {
    let test = client();
    test.transport
        .respond(200, json!({"notes": [{"id": 1}, {"id": 2}]}))
        .respond(200, json!([{"id": 7, "name": "Physics"}]))
        .respond(200, json!({"users": 10, "courses": 3, "notes": 20, "comments": 50}));

    let home = test.client.home();
    assert_eq!(home.popular_notes().await.unwrap().len(), 2);
    assert_eq!(home.latest_courses().await.unwrap()[0].name, "Physics");
    assert_eq!(home.public_stats().await.unwrap().comments, 50);

    let paths: Vec<String> = test.transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec!["/home/popular-notes", "/home/latest-courses", "/home/stats"]
    );
}

#[tokio::test]
async fn test_search_requires_keyword() {
    let test = client();
    let blank = SearchQuery {
        keyword: "   ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        test.client.search().notes(&blank).await,
        Err(ApiError::Validation(_))
    ));
    assert_eq!(test.transport.request_count(), 0);

    let query = SearchQuery {
        keyword: " rust ".to_string(),
        page: Some(2),
        ..Default::default()
    };
    test.client.search().courses(&query).await.unwrap();
    let request = test.transport.last_request().unwrap();
    assert_eq!(request.path, "/search/courses");
    assert_eq!(request.query_value("keyword"), Some("rust"));
    assert_eq!(request.query_value("page"), Some("2"));
}

#[tokio::test]
async fn test_avatar_upload_is_multipart_file_field() {
    let test = client_as(3, Role::Student);
    assert!(matches!(
        test.client.users().upload_avatar("me.bmp", vec![0]).await,
        Err(ApiError::Validation(_))
    ));
    assert_eq!(test.transport.request_count(), 0);

    test.transport
        .respond(200, json!({"url": "/uploads/avatars/3.png", "size": 3}));
    let uploaded = test
        .client
        .users()
        .upload_avatar("me.png", vec![1, 2, 3])
        .await
        .unwrap();
    assert_eq!(uploaded.url, "/uploads/avatars/3.png");

    let request = test.transport.last_request().unwrap();
    assert_eq!(request.path, "/upload/avatar");
    match request.body {
        RequestBody::Multipart {
            field, mime, bytes, ..
        } => {
            assert_eq!(field, "file");
            assert_eq!(mime, "image/png");
            assert_eq!(bytes, vec![1, 2, 3]);
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_comment_create_posts_to_collection() {
    let test = client_as(3, Role::Student);
    assert!(matches!(
        test.client
            .comments()
            .create(&CommentRequest {
                content: " ".to_string(),
                note_id: 4,
                ..Default::default()
            })
            .await,
        Err(ApiError::Validation(_))
    ));

    test.transport
        .respond(201, json!({"message": "created", "comment": {"id": 30, "content": "Nice", "note_id": 4}}));
    let comment = test
        .client
        .comments()
        .create(&CommentRequest {
            content: "Nice".to_string(),
            note_id: 4,
            rating: 5,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(comment.id, 30);
    assert_eq!(test.transport.last_request().unwrap().path, "/comment/");
}

#[tokio::test]
async fn test_summarize_needs_note_or_content() {
    let test = client_as(3, Role::Student);
    assert!(matches!(
        test.client.ai().summarize(&SummarizeRequest::default()).await,
        Err(ApiError::Validation(_))
    ));
    assert_eq!(test.transport.request_count(), 0);

    test.transport
        .respond(200, json!({"summary": "short", "keywords": ["rust", "async"]}));
    let summary = test
        .client
        .ai()
        .summarize(&SummarizeRequest {
            note_id: None,
            content: Some("A long note".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(summary.keywords, vec!["rust", "async"]);
}
