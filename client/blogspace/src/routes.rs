//! Client-side routes
//!
//! Mirrors the paths of the web front end so share links and redirects stay
//! recognisable.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Home,
    ChangePassword { email: String },
    AddBlog,
    BlogDetail { id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/home".to_string(),
            Route::ChangePassword { .. } => "/change-password".to_string(),
            Route::AddBlog => "/add-blog".to_string(),
            Route::BlogDetail { id } => format!("/blog/{}", id),
        }
    }

    /// Inverse of [`Route::path`]; route state such as the change-password
    /// email is not part of the path and comes back empty
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "/" => Some(Route::Root),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/home" => Some(Route::Home),
            "/change-password" => Some(Route::ChangePassword {
                email: String::new(),
            }),
            "/add-blog" => Some(Route::AddBlog),
            other => other
                .strip_prefix("/blog/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::BlogDetail { id: id.to_string() }),
        }
    }

    /// Routes that need a stored credential
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::AddBlog | Route::BlogDetail { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
