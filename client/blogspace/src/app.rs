//! Application wiring
//!
//! `App` owns one instance of every collaborator (session guard, API clients,
//! entity cache, notifier) and exposes the user-level operations the front
//! ends call. Operations report failures as notices and return `None`/`false`
//! instead of erroring.

use std::sync::Arc;

use blog_types::{LoginUserBody, OtpVerifyPayload, Post, RegisterUserBody, Result, User};
use entity_cache::EntityCache;
use tracing::{debug, info};

use crate::api::{AuthApi, BlogApi, BlogBackend};
use crate::composer::PostComposer;
use crate::config::Config;
use crate::detail::{self, PostView};
use crate::forms::{self, ChangePasswordForm};
use crate::notify::Notifier;
use crate::routes::Route;
use crate::session::{FileTokenStore, SessionGuard, TokenStore};

pub struct App {
    config: Config,
    guard: SessionGuard,
    auth: AuthApi,
    blogs: Arc<dyn BlogBackend>,
    cache: EntityCache,
    notifier: Notifier,
}

impl App {
    /// Wire the app with the token file from `config`
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session.token_path));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Self {
        let auth = AuthApi::new(&config.api.auth_base_url);
        let blogs: Arc<dyn BlogBackend> =
            Arc::new(BlogApi::new(&config.api.blog_base_url, Arc::clone(&store)));
        Self::with_parts(config, store, auth, blogs)
    }

    /// Assemble from explicit parts, e.g. a fake blog backend
    pub fn with_parts(
        config: Config,
        store: Arc<dyn TokenStore>,
        auth: AuthApi,
        blogs: Arc<dyn BlogBackend>,
    ) -> Self {
        Self {
            config,
            guard: SessionGuard::new(store),
            auth,
            blogs,
            cache: EntityCache::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn landing(&self) -> Result<Route> {
        self.guard.landing()
    }

    /// Check `requested` against the guard; a redirect is reported and
    /// yields `None`
    pub fn enter(&self, requested: Route) -> Option<Route> {
        match self.guard.resolve(requested.clone()) {
            Ok(route) if route == requested => Some(route),
            Ok(route) => {
                debug!(requested = %requested, redirect = %route, "Route redirected");
                self.notifier.error("Please login first");
                None
            }
            Err(e) => {
                self.notifier.failure("resolve route", &e);
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Option<Route> {
        let body = LoginUserBody {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        forms::submit_login(&body, &self.auth, &self.guard, &self.notifier).await
    }

    pub async fn logout(&self) -> Route {
        forms::sign_out(&self.guard, &self.cache, &self.notifier).await
    }

    pub async fn register(&self, body: &RegisterUserBody) -> Option<Route> {
        forms::submit_register(body, &self.auth, &self.notifier).await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Option<Route> {
        let body = OtpVerifyPayload {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        forms::submit_otp(&body, &self.auth, &self.notifier).await
    }

    pub async fn change_password(&self, form: &mut ChangePasswordForm) -> Option<Route> {
        form.submit(&self.auth, &self.notifier).await
    }

    /// Home feed, fetched once per session
    pub async fn feed(&self) -> Option<Vec<Post>> {
        self.enter(Route::Home)?;
        let blogs = Arc::clone(&self.blogs);
        match self
            .cache
            .posts_or_fetch(|| async move { blogs.fetch_all_blogs().await })
            .await
        {
            Ok(posts) => Some(posts),
            Err(e) => {
                self.notifier.failure("fetch all blogs", &e);
                None
            }
        }
    }

    /// Detail view for `id`
    ///
    /// `None` when the route is refused. `Some(None)` is the "not found" view,
    /// also used after a failed fetch (reported as a notice).
    pub async fn post_view(&self, id: &str) -> Option<Option<PostView>> {
        self.enter(Route::BlogDetail { id: id.to_string() })?;
        let view = detail::load_post_view(id, &self.cache, self.blogs.as_ref(), &self.notifier).await;
        Some(view)
    }

    /// Posts that can appear in a detail view's related tab
    pub async fn related_candidates(&self) -> Vec<Post> {
        self.cache.all_blogs().await
    }

    pub async fn profile(&self) -> Option<User> {
        self.enter(Route::Home)?;
        let blogs = Arc::clone(&self.blogs);
        match self
            .cache
            .user_or_fetch(|| async move { blogs.fetch_user_profile().await })
            .await
        {
            Ok(user) => Some(user),
            Err(e) => {
                self.notifier.failure("fetch user profile", &e);
                None
            }
        }
    }

    /// Open the composer, author prefilled from the profile when available
    pub async fn start_composer(&self) -> Option<PostComposer> {
        self.enter(Route::AddBlog)?;
        let mut composer = PostComposer::new();
        if let Some(user) = self.profile().await {
            composer.prefill_author(&user);
        }
        Some(composer)
    }

    /// Publish the composer's post
    ///
    /// On success the cached feed is emptied so the next feed view refetches
    /// and shows the new post.
    pub async fn publish(&self, composer: &mut PostComposer) -> bool {
        if self.enter(Route::AddBlog).is_none() {
            return false;
        }
        if !composer.submit(self.blogs.as_ref(), &self.notifier).await {
            return false;
        }
        self.cache.set_all_blogs(Vec::new()).await;
        info!("Feed cache reset after publish");
        true
    }
}
