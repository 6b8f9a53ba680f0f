//! Client-side navigation: the static route table, path resolution, and the
//! guard that decides every transition.

pub mod guard;
pub mod table;

pub use guard::{GuardDecision, RouteGuard};
pub use table::{ROUTES, Route, RouteMatch, RouteMeta, resolve, route_by_name};

use serde::Serialize;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// NavigationIntent
///
/// A navigation the client layer asks for instead of performing it. Errors,
/// logout and the guard return these; the view layer carries them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationIntent {
    Login,
    Home,
}

impl NavigationIntent {
    pub fn path(&self) -> &'static str {
        match self {
            NavigationIntent::Login => LOGIN_PATH,
            NavigationIntent::Home => HOME_PATH,
        }
    }
}
