use std::collections::HashMap;

use crate::models::{Role, RoleRequirement};

/// RouteMeta
///
/// Static access requirements of a view. Read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_role: Option<RoleRequirement>,
    // Purely presentational: auth screens render without the sidebar.
    pub hide_sidebar: bool,
}

impl RouteMeta {
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            requires_role: None,
            hide_sidebar: false,
        }
    }

    pub const fn auth_screen() -> Self {
        Self {
            requires_auth: false,
            requires_role: None,
            hide_sidebar: true,
        }
    }

    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            requires_role: None,
            hide_sidebar: false,
        }
    }

    pub const fn with_role(role: RoleRequirement) -> Self {
        Self {
            requires_auth: true,
            requires_role: Some(role),
            hide_sidebar: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub meta: RouteMeta,
}

/// ROUTES
///
/// Every navigable view, in match order.
pub static ROUTES: &[Route] = &[
    route("Home", "/", RouteMeta::public()),
    route("Login", "/login", RouteMeta::auth_screen()),
    route("Register", "/register", RouteMeta::auth_screen()),
    route("Profile", "/profile", RouteMeta::authenticated()),
    route("Courses", "/courses", RouteMeta::public()),
    route("CourseDetail", "/courses/:id", RouteMeta::public()),
    route("Notes", "/notes", RouteMeta::public()),
    route("NoteDetail", "/notes/:id", RouteMeta::public()),
    route("CreateNote", "/create-note", RouteMeta::authenticated()),
    route("EditNote", "/notes/:id/edit", RouteMeta::authenticated()),
    route("MyNotes", "/my-notes", RouteMeta::authenticated()),
    route("Search", "/search", RouteMeta::public()),
    route(
        "Admin",
        "/admin",
        RouteMeta::with_role(RoleRequirement::One(Role::Admin)),
    ),
    route(
        "Teacher",
        "/teacher",
        RouteMeta::with_role(RoleRequirement::any_of(&[Role::Teacher, Role::Admin])),
    ),
];

const fn route(name: &'static str, path: &'static str, meta: RouteMeta) -> Route {
    Route { name, path, meta }
}

/// A resolved route plus the values of its `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: HashMap<String, String>,
}

pub fn route_by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Matches a concrete path (query string and trailing slash ignored) against
/// the table. Unknown paths resolve to `None`.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split_segments(path);
    ROUTES.iter().find_map(|route| {
        let pattern = split_segments(route.path);
        if pattern.len() != segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (expected, actual) in pattern.iter().zip(&segments) {
            match expected.strip_prefix(':') {
                Some(name) if !actual.is_empty() => {
                    params.insert(name.to_string(), actual.to_string());
                }
                Some(_) => return None,
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(RouteMatch { route, params })
    })
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
