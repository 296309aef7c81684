//! Post composer form state
//!
//! Local, per-field state for the "add blog" form: free text fields, the tag
//! list, single category selection, markup insertion, thumbnail attachment
//! and a preview mode. Nothing leaves the form until `submit`.

pub mod format;
mod preview;

pub use format::Format;

use std::ops::Range;
use std::path::Path;

use blog_types::{ClientError, NewPost, Result, User};
use chrono::Utc;
use tracing::{debug, info};

use crate::api::BlogBackend;
use crate::attachment::ImageAttachment;
use crate::notify::Notifier;

pub const MAX_TAGS: usize = 10;

pub const CATEGORIES: [&str; 15] = [
    "Technology",
    "Lifestyle",
    "Travel",
    "Food",
    "Health",
    "Business",
    "Entertainment",
    "Sports",
    "Education",
    "Science",
    "Art",
    "Music",
    "Fashion",
    "Finance",
    "Personal Development",
];

/// Named text fields accepted by [`PostComposer::set_field`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    Subtitle,
    Content,
    Author,
}

impl std::str::FromStr for Field {
    type Err = ClientError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Field::Title),
            "subtitle" => Ok(Field::Subtitle),
            "content" => Ok(Field::Content),
            "author" => Ok(Field::Author),
            other => Err(ClientError::Validation(format!("Unknown field '{}'", other))),
        }
    }
}

/// Why a tag was not added
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagRejection {
    Empty,
    Duplicate,
    LimitReached,
}

#[derive(Clone, Debug, Default)]
pub struct PostComposer {
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Preview reference of the attached image
    pub thumbnail: String,
    pub tag_input: String,
    pub preview_mode: bool,
    // Set while a publish request is in flight; a UI that renders the form
    // concurrently reads it to disable the publish button
    is_submitting: bool,
}

impl PostComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Subtitle => self.subtitle = value,
            Field::Content => self.content = value,
            Field::Author => self.author = value,
        }
    }

    /// Fill the author from the signed-in profile
    pub fn prefill_author(&mut self, user: &User) {
        self.author = user.display_name();
    }

    /// Commit the pending tag input (the "Enter" key)
    ///
    /// The input is cleared only when the tag is accepted.
    pub fn add_tag(&mut self) -> std::result::Result<(), TagRejection> {
        let tag = self.tag_input.trim().to_lowercase();
        if tag.is_empty() {
            return Err(TagRejection::Empty);
        }
        if self.tags.contains(&tag) {
            return Err(TagRejection::Duplicate);
        }
        if self.tags.len() >= MAX_TAGS {
            return Err(TagRejection::LimitReached);
        }
        debug!(tag = %tag, "Tag added");
        self.tags.push(tag);
        self.tag_input.clear();
        Ok(())
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Single-select from [`CATEGORIES`], matched case-insensitively
    pub fn select_category(&mut self, name: &str) -> Result<()> {
        let chosen = CATEGORIES
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ClientError::Validation(format!("Unknown category '{}'", name)))?;
        self.category = chosen.to_string();
        Ok(())
    }

    /// Insert markup around the selected content range, returning the new
    /// cursor position
    pub fn apply_format(&mut self, format: Format, selection: Range<usize>) -> usize {
        let (content, cursor) = format::apply(&self.content, selection, format);
        self.content = content;
        cursor
    }

    /// Validate and attach a thumbnail, reporting the outcome as a notice
    ///
    /// On failure the previous thumbnail is kept.
    pub fn attach_thumbnail(&mut self, path: &Path, notifier: &Notifier) -> bool {
        match ImageAttachment::open(path) {
            Ok(image) => {
                self.thumbnail = image.preview_url();
                notifier.success("Image uploaded successfully!");
                true
            }
            Err(ClientError::Validation(msg)) => {
                notifier.error(msg);
                false
            }
            Err(e) => {
                notifier.failure("attach thumbnail", &e);
                notifier.error("Failed to upload image");
                false
            }
        }
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview_mode = !self.preview_mode;
        self.preview_mode
    }

    pub fn render_preview(&self) -> String {
        preview::render(self, Utc::now().date_naive())
    }

    /// First failing rule, in form order
    pub fn validate(&self) -> Result<()> {
        let rule = if self.title.trim().is_empty() {
            Some("Title is required")
        } else if self.content.trim().is_empty() {
            Some("Content is required")
        } else if self.category.is_empty() {
            Some("Please select a category")
        } else if self.thumbnail.is_empty() {
            Some("Please upload a thumbnail image")
        } else {
            None
        };

        match rule {
            Some(msg) => Err(ClientError::Validation(msg.to_string())),
            None => Ok(()),
        }
    }

    /// Request body for the current form state
    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            content: self.content.clone(),
            thumbnail: self.thumbnail.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            status: "published".to_string(),
            published_at: Utc::now().to_rfc3339(),
            likes: 0,
            comment: Vec::new(),
            views: 0,
        }
    }

    /// Validate and publish
    ///
    /// Every outcome is reported through `notifier`; the form keeps its state
    /// on failure. Returns `true` when the post was published.
    pub async fn submit(&mut self, backend: &dyn BlogBackend, notifier: &Notifier) -> bool {
        if self.is_submitting {
            debug!("Submit ignored, already submitting");
            return false;
        }
        if let Err(e) = self.validate() {
            notifier.error(e.notice_message());
            return false;
        }

        self.is_submitting = true;
        let post = self.to_new_post();
        let result = backend.create_blog(&post).await;
        self.is_submitting = false;

        match result {
            Ok(message) => {
                info!(title = %post.title, "Blog published");
                let text = if message.is_empty() {
                    "Blog published successfully!".to_string()
                } else {
                    message
                };
                notifier.success(text);
                true
            }
            Err(e) => {
                notifier.failure("create blog", &e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use async_trait::async_trait;
    use blog_types::Post;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        created: Mutex<Vec<NewPost>>,
        fail: bool,
    }

    #[async_trait]
    impl BlogBackend for RecordingBackend {
        async fn fetch_all_blogs(&self) -> Result<Vec<Post>> {
            Ok(Vec::new())
        }

        async fn fetch_blog(&self, id: &str) -> Result<Post> {
            Err(ClientError::NotFound(id.to_string()))
        }

        async fn fetch_user_profile(&self) -> Result<User> {
            Ok(User::default())
        }

        async fn create_blog(&self, post: &NewPost) -> Result<String> {
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: String::new(),
                });
            }
            self.created.lock().unwrap().push(post.clone());
            Ok("Blog created".to_string())
        }
    }

    fn filled() -> PostComposer {
        let mut form = PostComposer::new();
        form.set_field(Field::Title, "Ownership, explained");
        form.set_field(Field::Content, "Borrowing rules...");
        form.select_category("technology").unwrap();
        form.thumbnail = "file:///tmp/cover.png".to_string();
        form
    }

    #[test]
    fn test_tags_are_normalised_and_unique() {
        let mut form = PostComposer::new();
        form.tag_input = "  Rust ".to_string();
        assert_eq!(form.add_tag(), Ok(()));
        assert_eq!(form.tags, vec!["rust"]);
        assert!(form.tag_input.is_empty());

        form.tag_input = "RUST".to_string();
        assert_eq!(form.add_tag(), Err(TagRejection::Duplicate));
        // Rejected input stays for editing
        assert_eq!(form.tag_input, "RUST");

        form.tag_input = "   ".to_string();
        assert_eq!(form.add_tag(), Err(TagRejection::Empty));
    }

    #[test]
    fn test_tag_limit() {
        let mut form = PostComposer::new();
        for i in 0..MAX_TAGS {
            form.tag_input = format!("t{}", i);
            form.add_tag().unwrap();
        }
        form.tag_input = "one-more".to_string();
        assert_eq!(form.add_tag(), Err(TagRejection::LimitReached));
        assert_eq!(form.tags.len(), MAX_TAGS);

        form.remove_tag("t3");
        assert_eq!(form.add_tag(), Ok(()));
        assert!(form.tags.contains(&"one-more".to_string()));
    }

    #[test]
    fn test_category_is_single_select() {
        let mut form = PostComposer::new();
        form.select_category("travel").unwrap();
        form.select_category("Personal development").unwrap();
        assert_eq!(form.category, "Personal Development");
        assert!(form.select_category("Gardening").is_err());
        assert_eq!(form.category, "Personal Development");
    }

    #[test]
    fn test_validation_order() {
        let mut form = PostComposer::new();
        let message = |form: &PostComposer| form.validate().unwrap_err().to_string();

        assert_eq!(message(&form), "Title is required");
        form.set_field(Field::Title, "T");
        assert_eq!(message(&form), "Content is required");
        form.set_field(Field::Content, "C");
        assert_eq!(message(&form), "Please select a category");
        form.select_category("Art").unwrap();
        assert_eq!(message(&form), "Please upload a thumbnail image");
        form.thumbnail = "file:///x.png".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_prefill_author_uses_email_when_unnamed() {
        let mut form = PostComposer::new();
        form.prefill_author(&User {
            email: "pen@example.org".to_string(),
            ..Default::default()
        });
        assert_eq!(form.author, "pen");
    }

    #[test]
    fn test_apply_format_updates_content() {
        let mut form = PostComposer::new();
        form.set_field(Field::Content, "hello world");
        let cursor = form.apply_format(Format::Bold, 6..11);
        assert_eq!(form.content, "hello **world**");
        assert_eq!(cursor, 15);
    }

    #[test]
    fn test_attach_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        let notifier = Notifier::new();
        let mut form = PostComposer::new();
        form.thumbnail = "file:///previous.png".to_string();

        assert!(!form.attach_thumbnail(&path, &notifier));
        assert_eq!(form.thumbnail, "file:///previous.png");
        let notices = notifier.drain();
        assert_eq!(notices[0].message, "Please upload an image file");
    }

    #[test]
    fn test_attach_png_sets_preview_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

        let notifier = Notifier::new();
        let mut form = PostComposer::new();

        assert!(form.attach_thumbnail(&path, &notifier));
        assert!(form.thumbnail.starts_with("file://"));
        assert!(form.thumbnail.ends_with("cover.png"));
        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].message, "Image uploaded successfully!");
    }

    #[tokio::test]
    async fn test_submit_ignored_while_in_flight() {
        let backend = RecordingBackend::default();
        let notifier = Notifier::new();
        let mut form = filled();
        form.is_submitting = true;

        assert!(!form.submit(&backend, &notifier).await);
        assert!(form.is_submitting());
        assert!(backend.created.lock().unwrap().is_empty());
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_submit_publishes_payload() {
        let backend = RecordingBackend::default();
        let notifier = Notifier::new();
        let mut form = filled();
        form.tag_input = "ownership".to_string();
        form.add_tag().unwrap();

        assert!(form.submit(&backend, &notifier).await);
        assert!(!form.is_submitting());

        let created = backend.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].status, "published");
        assert_eq!(created[0].category, "Technology");
        assert_eq!(created[0].tags, vec!["ownership"]);
        assert_eq!(created[0].likes, 0);

        let notices = notifier.drain();
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].message, "Blog created");
    }

    #[tokio::test]
    async fn test_submit_invalid_form_does_not_call_backend() {
        let backend = RecordingBackend::default();
        let notifier = Notifier::new();
        let mut form = PostComposer::new();

        assert!(!form.submit(&backend, &notifier).await);
        assert!(backend.created.lock().unwrap().is_empty());
        assert_eq!(notifier.drain()[0].message, "Title is required");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form() {
        let backend = RecordingBackend {
            fail: true,
            ..Default::default()
        };
        let notifier = Notifier::new();
        let mut form = filled();

        assert!(!form.submit(&backend, &notifier).await);
        assert_eq!(form.title, "Ownership, explained");
        assert_eq!(notifier.drain()[0].level, NoticeLevel::Error);
    }
}
