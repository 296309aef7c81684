//! Session-scoped entity cache
//!
//! Holds the last fetched post list and the current user profile so views
//! can share them without refetching. The only population rule is
//! "fetch once if empty": a fetcher runs when the slot is empty and its result
//! is stored, otherwise the cached value is returned. There is no eviction;
//! `clear` empties everything (sign-out).

mod stats;

pub use stats::{CacheSnapshot, CacheStats};

use std::future::Future;
use std::sync::Arc;

use blog_types::{Post, Result, User};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Metric label of the post list
pub const POSTS: &str = "posts";
/// Metric label of the current user
pub const USER: &str = "user";

#[derive(Default)]
struct CacheState {
    all_blogs: Vec<Post>,
    user: Option<User>,
}

/// Shared cache handle; clones point at the same state
#[derive(Clone, Default)]
pub struct EntityCache {
    state: Arc<RwLock<CacheState>>,
    // Serialises fetches so concurrent views do not issue duplicate requests
    fetch_gate: Arc<Mutex<()>>,
    stats: CacheStats,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Replace the cached post list
    pub async fn set_all_blogs(&self, posts: Vec<Post>) {
        let count = posts.len();
        self.state.write().await.all_blogs = posts;
        self.stats.record_write(POSTS);
        debug!(count, "Cache set posts");
    }

    /// Replace the cached current user
    pub async fn set_current_user(&self, user: Option<User>) {
        self.state.write().await.user = user;
        self.stats.record_write(USER);
        debug!("Cache set current user");
    }

    pub async fn all_blogs(&self) -> Vec<Post> {
        self.state.read().await.all_blogs.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Look up a post in the cached list
    pub async fn find_post(&self, id: &str) -> Option<Post> {
        let state = self.state.read().await;
        let found = state.all_blogs.iter().find(|p| p.id == id).cloned();
        if found.is_some() {
            self.stats.record_hit(POSTS);
        } else {
            self.stats.record_miss(POSTS);
        }
        found
    }

    /// Return the cached post list, running `fetch` only when it is empty
    ///
    /// A failed fetch leaves the cache untouched and returns the error.
    pub async fn posts_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<Post>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Post>>>,
    {
        if let Some(posts) = self.cached_posts().await {
            return Ok(posts);
        }

        let _gate = self.fetch_gate.lock().await;
        // Another caller may have filled the slot while we waited
        if let Some(posts) = self.cached_posts().await {
            return Ok(posts);
        }

        self.stats.record_miss(POSTS);
        match fetch().await {
            Ok(posts) => {
                self.set_all_blogs(posts.clone()).await;
                Ok(posts)
            }
            Err(e) => {
                warn!(error = %e, "Post fetch failed, cache left unchanged");
                self.stats.record_fetch_error(POSTS);
                Err(e)
            }
        }
    }

    /// Return the cached user, running `fetch` only when none is cached
    pub async fn user_or_fetch<F, Fut>(&self, fetch: F) -> Result<User>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<User>>,
    {
        if let Some(user) = self.cached_user().await {
            return Ok(user);
        }

        let _gate = self.fetch_gate.lock().await;
        if let Some(user) = self.cached_user().await {
            return Ok(user);
        }

        self.stats.record_miss(USER);
        match fetch().await {
            Ok(user) => {
                self.set_current_user(Some(user.clone())).await;
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "User fetch failed, cache left unchanged");
                self.stats.record_fetch_error(USER);
                Err(e)
            }
        }
    }

    /// Drop everything (sign-out)
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.all_blogs.clear();
        state.user = None;
        debug!("Cache cleared");
    }

    async fn cached_posts(&self) -> Option<Vec<Post>> {
        let state = self.state.read().await;
        if state.all_blogs.is_empty() {
            return None;
        }
        self.stats.record_hit(POSTS);
        Some(state.all_blogs.clone())
    }

    async fn cached_user(&self) -> Option<User> {
        let state = self.state.read().await;
        let user = state.user.clone()?;
        self.stats.record_hit(USER);
        Some(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_types::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {}", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_posts_fetched_once_when_empty() {
        let cache = EntityCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let posts = cache
                .posts_or_fetch(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![post("a"), post("b")])
                })
                .await
                .unwrap();
            assert_eq!(posts.len(), 2);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snap = cache.stats().snapshot(POSTS);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.hits, 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_prior_state() {
        let cache = EntityCache::new();
        let result = cache
            .posts_or_fetch(|| async { Err(ClientError::Transport("offline".to_string())) })
            .await;
        assert!(result.is_err());
        assert!(cache.all_blogs().await.is_empty());
        assert_eq!(cache.stats().snapshot(POSTS).fetch_errors, 1);

        // Next view retries because the slot is still empty
        let posts = cache
            .posts_or_fetch(|| async { Ok(vec![post("a")]) })
            .await
            .unwrap();
        assert_eq!(posts[0].id, "a");
    }

    #[tokio::test]
    async fn test_empty_result_is_refetched() {
        let cache = EntityCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            cache
                .posts_or_fetch(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Vec::new())
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_user_cached_after_first_fetch() {
        let cache = EntityCache::new();
        let user = User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            ..Default::default()
        };

        let first = cache
            .user_or_fetch(|| {
                let user = user.clone();
                async move { Ok(user) }
            })
            .await
            .unwrap();
        let second = cache
            .user_or_fetch(|| async { Err(ClientError::Transport("must not run".to_string())) })
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_find_post_and_clear() {
        let cache = EntityCache::new();
        cache.set_all_blogs(vec![post("a"), post("b")]).await;
        cache
            .set_current_user(Some(User::default()))
            .await;

        assert_eq!(cache.find_post("b").await.map(|p| p.id), Some("b".to_string()));
        assert!(cache.find_post("zzz").await.is_none());

        cache.clear().await;
        assert!(cache.all_blogs().await.is_empty());
        assert!(cache.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = EntityCache::new();
        let view = cache.clone();
        cache.set_all_blogs(vec![post("a")]).await;
        assert_eq!(view.all_blogs().await.len(), 1);
    }
}
