//! Client Routes
//!
//! The URL paths of the client and where each one leads, plus the REST
//! endpoints the views call.

use std::fmt;

/// A client route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// `/`, which only redirects
    Landing,
    Login,
    Register,
    RegisterDetails,
    Dogs,
    SetAvailability,
    Map,
}

impl AppRoute {
    pub const ALL: [AppRoute; 7] = [
        AppRoute::Landing,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::RegisterDetails,
        AppRoute::Dogs,
        AppRoute::SetAvailability,
        AppRoute::Map,
    ];

    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Landing => "/",
            AppRoute::Login => "/login",
            AppRoute::Register => "/register",
            AppRoute::RegisterDetails => "/register/details",
            AppRoute::Dogs => "/dogs",
            AppRoute::SetAvailability => "/set-availability",
            AppRoute::Map => "/map",
        }
    }

    /// Match a location path, ignoring query, fragment and a trailing slash
    pub fn from_path(path: &str) -> Option<AppRoute> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        AppRoute::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Where this route sends the user without rendering anything
    pub fn redirect(self) -> Option<AppRoute> {
        match self {
            AppRoute::Landing => Some(AppRoute::Login),
            _ => None,
        }
    }

    /// Resolve a path to the route that actually renders
    pub fn resolve(path: &str) -> Option<AppRoute> {
        let route = AppRoute::from_path(path)?;
        Some(route.redirect().unwrap_or(route))
    }

    /// Routes whose view needs a stored session token
    pub fn requires_session(self) -> bool {
        matches!(self, AppRoute::Dogs | AppRoute::SetAvailability)
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// REST endpoint paths, relative to the API base URL
pub mod endpoints {
    pub const LOGIN: &str = "owner/login/";
    pub const REGISTER: &str = "owner/register/";
    pub const MY_DOGS: &str = "owner/dogs/my/";
    pub const ME: &str = "owner/auth/me/";
    pub const AVAILABILITY: &str = "owner/owner-availability/";
    pub const PLACES: &str = "place/places/";
    pub const DOGS: &str = "owner/dogs/";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_redirects_to_login() {
        assert_eq!(AppRoute::resolve("/"), Some(AppRoute::Login));
        assert_eq!(AppRoute::resolve(""), Some(AppRoute::Login));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(AppRoute::from_path("/register/details"), Some(AppRoute::RegisterDetails));
        assert_eq!(AppRoute::from_path("/dogs/"), Some(AppRoute::Dogs));
        assert_eq!(AppRoute::from_path("/map?zoom=3"), Some(AppRoute::Map));
        assert_eq!(AppRoute::from_path("/nope"), None);
    }

    #[test]
    fn test_paths_are_unique() {
        for route in AppRoute::ALL {
            assert_eq!(AppRoute::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_session_requirements() {
        assert!(AppRoute::Dogs.requires_session());
        assert!(AppRoute::SetAvailability.requires_session());
        assert!(!AppRoute::Login.requires_session());
        assert!(!AppRoute::Map.requires_session());
    }
}
