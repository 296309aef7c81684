//! Post detail view state
//!
//! Like, bookmark and comment actions are local optimistic updates; they are
//! never sent to the server and never reconciled.

use blog_types::{ClientError, Post};
use entity_cache::EntityCache;
use tracing::debug;

use crate::api::BlogBackend;
use crate::notify::Notifier;

pub const MAX_COMMENT_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Comments,
    Related,
}

#[derive(Clone, Debug)]
pub struct PostView {
    pub post: Post,
    pub liked: bool,
    pub bookmarked: bool,
    pub comment_draft: String,
    pub active_tab: DetailTab,
}

impl PostView {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            liked: false,
            bookmarked: false,
            comment_draft: String::new(),
            active_tab: DetailTab::default(),
        }
    }

    pub fn toggle_like(&mut self) -> bool {
        self.liked = !self.liked;
        debug!(post_id = %self.post.id, liked = self.liked, "Like toggled locally");
        self.liked
    }

    pub fn toggle_bookmark(&mut self) -> bool {
        self.bookmarked = !self.bookmarked;
        debug!(post_id = %self.post.id, bookmarked = self.bookmarked, "Bookmark toggled locally");
        self.bookmarked
    }

    /// Like count including the local toggle
    pub fn display_likes(&self) -> u64 {
        self.post.likes + u64::from(self.liked)
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.active_tab = tab;
    }

    /// Update the draft, truncated to [`MAX_COMMENT_CHARS`]
    pub fn set_comment_draft(&mut self, text: &str) {
        self.comment_draft = text.chars().take(MAX_COMMENT_CHARS).collect();
    }

    /// Post the draft comment
    ///
    /// A blank draft is ignored. Otherwise the draft is cleared and a success
    /// notice is shown; nothing is sent to the server.
    pub fn submit_comment(&mut self, notifier: &Notifier) -> bool {
        let text = self.comment_draft.trim();
        if text.is_empty() {
            return false;
        }
        debug!(post_id = %self.post.id, chars = text.chars().count(), "Comment submitted locally");
        self.comment_draft.clear();
        notifier.success("Comment posted successfully!");
        true
    }

    /// Link to this post on the public site
    pub fn share_link(&self, web_base: &str, notifier: &Notifier) -> String {
        let link = format!("{}/blog/{}", web_base.trim_end_matches('/'), self.post.id);
        notifier.success("Link copied to clipboard!");
        link
    }
}

/// Build the detail view for `id`
///
/// The cached post list is consulted first; on a miss the post is fetched.
/// `None` is the "not found" view. Other failures are reported as a notice
/// and also yield `None`.
pub async fn load_post_view(
    id: &str,
    cache: &EntityCache,
    backend: &dyn BlogBackend,
    notifier: &Notifier,
) -> Option<PostView> {
    if let Some(post) = cache.find_post(id).await {
        return Some(PostView::new(post));
    }

    match backend.fetch_blog(id).await {
        Ok(post) => Some(PostView::new(post)),
        Err(ClientError::NotFound(_)) => None,
        Err(e) => {
            notifier.failure("fetch single blog", &e);
            None
        }
    }
}
