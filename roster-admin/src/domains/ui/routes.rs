//! Client-visible routes

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Login
    #[default]
    Entry,
    /// User directory
    Directory,
}

impl Route {
    pub const ENTRY_PATH: &'static str = "/";
    pub const DIRECTORY_PATH: &'static str = "/users";

    pub fn path(&self) -> &'static str {
        match self {
            Route::Entry => Self::ENTRY_PATH,
            Route::Directory => Self::DIRECTORY_PATH,
        }
    }

    /// Route named by `path`, ignoring the session
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match path {
            Self::ENTRY_PATH => Some(Route::Entry),
            Self::DIRECTORY_PATH => Some(Route::Directory),
            _ => None,
        }
    }

    /// Route actually shown for `path`.
    ///
    /// Unknown paths redirect to the entry route. The entry route redirects
    /// to the directory while a session is held, and the directory
    /// redirects to the entry route without one.
    pub fn resolve(path: &str, authenticated: bool) -> Route {
        let requested = Self::parse(path).unwrap_or_else(|| {
            log::debug!("[Routes] Unknown path '{}', redirecting to entry", path);
            Route::Entry
        });
        match (requested, authenticated) {
            (Route::Entry, true) | (Route::Directory, true) => Route::Directory,
            (Route::Entry, false) | (Route::Directory, false) => Route::Entry,
        }
    }
}
