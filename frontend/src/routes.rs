//! The navigation route table of the console.
//!
//! URL matching and history handling are the router's job; this table is the
//! declarative source of truth: which paths exist, which view each one
//! mounts, and the symbolic names used for programmatic navigation.

use crate::pages::{AppRoute, MedicationRoute, View};
use anyhow::{bail, Result};
use std::collections::HashSet;

/// One navigable location: a URL path, a symbolic name, and the view mounted
/// when the path matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub target: AppRoute,
}

/// The immutable route table, built once during startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    base: String,
    routes: Vec<RouteDef>,
}

/// The deployment base path, injected by the build (the Trunk analog of
/// `BASE_URL` in the original Vue build).
pub fn base_url() -> &'static str {
    option_env!("TRUNK_PUBLIC_URL").unwrap_or("/")
}

fn routes() -> Vec<RouteDef> {
    // the root deliberately shows the login view, signed-out visitors land here
    let defs = [
        ("/", "home", AppRoute::Home),
        ("/login", "login", AppRoute::Login),
        ("/register", "register", AppRoute::Register),
        ("/dashboard", "dashboard", AppRoute::Dashboard),
        (
            "/medications/add",
            "add-medication",
            AppRoute::Medications(MedicationRoute::Add),
        ),
    ];

    defs.into_iter()
        .map(|(path, name, target)| RouteDef {
            path,
            name,
            view: target.view(),
            target,
        })
        .collect()
}

impl RouteTable {
    /// Build the table for the configured base path. Fails on duplicate
    /// names or paths, which would silently misroute navigation.
    pub fn build() -> Result<Self> {
        Self::from_parts(base_url(), routes())
    }

    fn from_parts(base: impl Into<String>, routes: Vec<RouteDef>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        for route in &routes {
            if !names.insert(route.name) {
                bail!("duplicate route name: {}", route.name);
            }
            if !paths.insert(route.path) {
                bail!("duplicate route path: {}", route.path);
            }
        }

        Ok(Self {
            base: normalize_base(base.into()),
            routes,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDef> {
        self.routes.iter()
    }

    /// Resolve a browser path (including the base prefix) to its route.
    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        let path = self.strip_base(path)?;
        self.routes.iter().find(|route| route.path == path)
    }

    /// Look up a route by its symbolic name.
    pub fn find(&self, name: &str) -> Option<&RouteDef> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// The router target for a symbolic name.
    pub fn target(&self, name: &str) -> Option<AppRoute> {
        self.find(name).map(|route| route.target.clone())
    }

    /// The base-prefixed href for a symbolic name.
    pub fn href(&self, name: &str) -> Option<String> {
        self.find(name)
            .map(|route| format!("{}{}", self.base, route.path))
    }

    fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.base.as_str()) {
            Some("") => Some("/"),
            Some(rest) if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

/// A base of `/` means "no prefix"; trailing slashes would otherwise double
/// up when joined with route paths.
fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_parts("/", routes()).unwrap()
    }

    #[test]
    fn all_paths_resolve_to_their_view() {
        let table = table();
        for (path, view) in [
            ("/", View::Login),
            ("/login", View::Login),
            ("/register", View::Register),
            ("/dashboard", View::Dashboard),
            ("/medications/add", View::AddMedication),
        ] {
            assert_eq!(table.resolve(path).map(|route| route.view), Some(view));
        }
    }

    #[test]
    fn root_and_login_share_the_login_view() {
        let table = table();
        assert_eq!(
            table.resolve("/").map(|route| route.view),
            table.resolve("/login").map(|route| route.view),
        );
        assert_eq!(table.resolve("/").map(|route| route.name), Some("home"));
    }

    #[test]
    fn names_are_unique() {
        let table = table();
        let mut names = HashSet::new();
        assert!(table.iter().all(|route| names.insert(route.name)));
    }

    #[test]
    fn paths_are_unique() {
        let table = table();
        let mut paths = HashSet::new();
        assert!(table.iter().all(|route| paths.insert(route.path)));
    }

    #[test]
    fn navigation_by_name() {
        let table = table();
        assert_eq!(table.href("dashboard").as_deref(), Some("/dashboard"));
        assert_eq!(
            table.target("dashboard"),
            Some(AppRoute::Dashboard),
        );
        assert_eq!(
            table.href("add-medication").as_deref(),
            Some("/medications/add")
        );
    }

    #[test]
    fn unlisted_paths_do_not_match() {
        let table = table();
        assert!(table.resolve("/unknown").is_none());
        assert!(table.find("unknown").is_none());
    }

    #[test]
    fn base_path_is_applied() {
        let table = RouteTable::from_parts("/app/", routes()).unwrap();
        assert_eq!(table.href("login").as_deref(), Some("/app/login"));
        assert_eq!(
            table.resolve("/app/medications/add").map(|route| route.name),
            Some("add-medication")
        );
        assert_eq!(table.resolve("/app").map(|route| route.name), Some("home"));
        assert!(table.resolve("/login").is_none());
    }

    #[test]
    fn duplicate_names_fail_construction() {
        let mut routes = routes();
        routes[1].name = "home";
        assert!(RouteTable::from_parts("/", routes).is_err());
    }

    #[test]
    fn duplicate_paths_fail_construction() {
        let mut routes = routes();
        routes[1].path = "/";
        assert!(RouteTable::from_parts("/", routes).is_err());
    }

    #[test]
    fn the_built_in_table_is_valid() {
        assert!(RouteTable::build().is_ok());
    }
}
