//! Blog and profile endpoints

use std::sync::Arc;

use async_trait::async_trait;
use blog_types::{ClientError, NewPost, Post, Result, User};
use serde_json::Value;
use tracing::info;

use super::{message_of, ApiClient};
use crate::session::TokenStore;

const BLOG: &str = "/blog";
const USER_PROFILE: &str = "/user/profile";

/// Operations the views need from the blog backend
#[async_trait]
pub trait BlogBackend: Send + Sync {
    async fn fetch_all_blogs(&self) -> Result<Vec<Post>>;
    async fn fetch_blog(&self, id: &str) -> Result<Post>;
    async fn fetch_user_profile(&self) -> Result<User>;
    /// Publish a post; returns the server's message
    async fn create_blog(&self, post: &NewPost) -> Result<String>;
}

/// Client for the blog service
///
/// The token is read from the store on every call so a login made after
/// construction is picked up.
#[derive(Clone)]
pub struct BlogApi {
    client: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl BlogApi {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_client(ApiClient::new("blog", base_url), tokens)
    }

    pub fn with_client(client: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    fn token(&self) -> Result<String> {
        self.tokens
            .load()?
            .ok_or_else(|| ClientError::Authentication("Please login first".to_string()))
    }
}

#[async_trait]
impl BlogBackend for BlogApi {
    async fn fetch_all_blogs(&self) -> Result<Vec<Post>> {
        let token = self.token()?;
        let posts = self
            .client
            .get::<Vec<Post>>(BLOG, Some(&token))
            .await?
            .into_result()?;
        info!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    async fn fetch_blog(&self, id: &str) -> Result<Post> {
        let token = self.token()?;
        self.client
            .get_member::<Post>(BLOG, id, Some(&token))
            .await?
            .into_result()
    }

    async fn fetch_user_profile(&self) -> Result<User> {
        let token = self.token()?;
        self.client
            .get::<User>(USER_PROFILE, Some(&token))
            .await?
            .into_result()
    }

    async fn create_blog(&self, post: &NewPost) -> Result<String> {
        let token = self.token()?;
        let envelope = self
            .client
            .post_json::<_, Value>(BLOG, post, Some(&token))
            .await?;
        let message = message_of(envelope)?;
        info!(title = %post.title, "Post published");
        Ok(message)
    }
}
