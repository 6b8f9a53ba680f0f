use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// --- Identity & Roles ---

/// Role
///
/// The RBAC field carried on every user profile. Unknown role strings coming
/// back from the server deserialize as `Guest`, the least privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Student,
    Teacher,
    Admin,
    #[default]
    #[serde(other)]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RoleRequirement
///
/// A single role or a set of roles, exactly as route metadata and permission
/// checks express it (`"admin"` or `["teacher", "admin"]` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RoleRequirement {
    One(Role),
    AnyOf(#[ts(as = "Vec<Role>")] Cow<'static, [Role]>),
}

impl RoleRequirement {
    /// A role set known at compile time, usable in `static` tables.
    pub const fn any_of(roles: &'static [Role]) -> Self {
        RoleRequirement::AnyOf(Cow::Borrowed(roles))
    }

    /// Membership test: does `role` satisfy this requirement?
    pub fn admits(&self, role: Role) -> bool {
        match self {
            RoleRequirement::One(required) => *required == role,
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
        }
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::One(role)
    }
}

impl From<Vec<Role>> for RoleRequirement {
    fn from(roles: Vec<Role>) -> Self {
        RoleRequirement::AnyOf(Cow::Owned(roles))
    }
}

impl<const N: usize> From<[Role; N]> for RoleRequirement {
    fn from(roles: [Role; N]) -> Self {
        RoleRequirement::AnyOf(Cow::Owned(roles.to_vec()))
    }
}

/// UserProfile
///
/// The cached identity record of the signed-in user. Replaced wholesale on
/// login, profile fetch and profile update; never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub school: String,
    pub department: String,
    pub major: String,
    pub introduction: String,
    pub avatar: String,
    pub role: Role,
    #[ts(type = "string | null")]
    pub last_login: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

// --- Auth Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// LoginRequest
///
/// Credentials for `POST /users/login`. The password is sent once and never
/// stored or logged by the client.
#[derive(Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// AuthResponse
///
/// Returned by both register and login. `user` may be missing on older
/// servers, in which case only the token is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct AuthResponse {
    pub message: String,
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

/// UpdateProfileRequest
///
/// Partial self-service profile update (PUT /users/profile). Only provided
/// fields are serialized, so the server leaves the rest untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
}

/// Envelope around a user record: `{ "message": ..., "user": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

// --- Admin ---

/// Full replacement of another user's display fields (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct AdminUpdateUserRequest {
    pub nickname: String,
    pub email: String,
    pub school: String,
    pub department: String,
    pub major: String,
    pub introduction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminUpdateUserRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct AdminUserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct AdminUserList {
    pub data: Vec<UserProfile>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// AdminStats
///
/// Dashboard counters from GET /admin/stats.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_courses: i64,
    pub total_notes: i64,
    pub total_comments: i64,
    pub today_new_users: i64,
    pub online_users: i64,
}

/// Public counters shown on the home page (GET /home/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct PublicStats {
    pub users: i64,
    pub courses: i64,
    pub notes: i64,
    pub comments: i64,
}

// --- Upload ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteAvatarRequest {
    pub path: String,
}

// --- Courses ---

/// Course
///
/// A course record. The membership counters are only populated by the detail
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct Course {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub school: String,
    pub department: String,
    pub teacher: String,
    pub semester: String,
    pub cover: String,
    pub status: String,
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
    pub is_joined: bool,
    pub student_count: i64,
    pub note_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CourseRequest {
    pub code: String,
    pub name: String,
    pub description: String,
    pub school: String,
    pub department: String,
    pub teacher: String,
    pub semester: String,
    pub cover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Query parameters accepted by GET /courses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CourseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct CourseList {
    pub courses: Vec<Course>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub keyword: Option<String>,
}

/// Plain paging parameters (my courses, comment listings).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

// --- Notes ---

/// Note
///
/// A shared note. `user_id` is the author and the id the ownership guard
/// compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub description: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub view_count: i64,
    pub download_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub status: String,
    pub user_id: u64,
    pub course_id: u64,
    pub username: String,
    pub author_avatar: String,
    pub course_name: String,
    pub is_liked: bool,
    pub is_favorited: bool,
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
    // Populated by semantic search only.
    pub similarity: Option<f64>,
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct NoteRequest {
    pub title: String,
    pub content: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<u64>,
    // "public" | "private"; the server defaults to public.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct NoteUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Query parameters accepted by GET /notes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct NoteFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct NoteList {
    pub notes: Vec<Note>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Favorites and likes come back in the `{data, total, page, limit}` shape.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct NotePage {
    pub data: Vec<Note>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct NoteEnvelope {
    pub message: String,
    pub note: Note,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct LikeStatus {
    pub message: String,
    pub like_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct FavoriteStatus {
    pub message: String,
    // "favorited" | "unfavorited"
    pub status: String,
}

// --- Comments ---

/// Comment
///
/// Comments nest one level: top-level comments carry their replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub rating: i32,
    pub like_count: i64,
    pub user_id: u64,
    pub note_id: u64,
    pub username: String,
    pub user_avatar: String,
    pub parent_id: Option<u64>,
    pub reply_to_user_id: Option<u64>,
    pub reply_to_username: Option<String>,
    pub replies: Vec<Comment>,
    pub is_liked: bool,
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CommentRequest {
    pub content: String,
    pub note_id: u64,
    // 0-5 star rating.
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct CommentUpdateRequest {
    pub content: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct CommentList {
    pub comments: Vec<Comment>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct CommentEnvelope {
    pub message: String,
    pub comment: Comment,
}

// --- Search ---

/// SearchQuery
///
/// Keyword search over courses or notes. `keyword` is required by the server;
/// the client rejects an empty one before sending.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct SearchQuery {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// --- AI Metadata ---

/// SummarizeRequest
///
/// Either an existing note (`note_id`) or raw `content` to summarize.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct SummarizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct SummarizeResponse {
    pub summary: String,
    pub keywords: Vec<String>,
}

/// NoteAiMeta
///
/// Stored AI review of a note. A note never reviewed comes back with an empty
/// summary and no keywords rather than a 404.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default)]
#[serde(default)]
#[ts(export)]
pub struct NoteAiMeta {
    pub note_id: u64,
    pub summary: String,
    pub keywords: Vec<String>,
    pub plagiarism_score: f64,
    pub flags: String,
    #[ts(type = "string | null")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}
