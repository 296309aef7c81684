//! Session guard and credential storage
//!
//! The guard decides where a user lands: `/home` with a stored credential,
//! `/login` without one. Every redirect replaces the current route; no
//! history is kept.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use blog_types::{ClientError, Result};
use tracing::{debug, info};

use crate::routes::Route;

/// Storage for the bearer credential
pub trait TokenStore: Send + Sync {
    /// Stored token, `None` when absent or blank
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept in a single file between runs
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token.trim())?;
        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| ClientError::Io("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .slot()?
            .clone()
            .filter(|token| !token.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot()? = Some(token.trim().to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Route gate backed by a token store
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.load()?.is_some())
    }

    /// Route a fresh start lands on
    pub fn landing(&self) -> Result<Route> {
        let route = if self.is_authenticated()? {
            Route::Home
        } else {
            Route::Login
        };
        debug!(route = %route, "Landing route resolved");
        Ok(route)
    }

    /// The requested route, or `/login` when it needs a credential we lack
    pub fn resolve(&self, requested: Route) -> Result<Route> {
        if requested == Route::Root {
            return self.landing();
        }
        if requested.requires_auth() && !self.is_authenticated()? {
            debug!(requested = %requested, "Redirecting unauthenticated user to login");
            return Ok(Route::Login);
        }
        Ok(requested)
    }

    pub fn sign_in(&self, token: &str) -> Result<Route> {
        if token.trim().is_empty() {
            return Err(ClientError::Authentication(
                "Login response did not contain a token".to_string(),
            ));
        }
        self.store.save(token)?;
        info!("Signed in");
        Ok(Route::Home)
    }

    pub fn sign_out(&self) -> Result<Route> {
        self.store.clear()?;
        info!("Signed out");
        Ok(Route::Login)
    }
}
