//! Records mirrored from API responses
//!
//! Field names follow the server's JSON. Missing fields default to empty so a
//! partially populated record still renders.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

// ============================================================================
// ENTITIES
// ============================================================================

/// Author reference embedded in posts and comments
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub profile_image: String,
}

/// Comment attached to a post
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user: Author,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub create_at: String,
}

/// Blog post as returned by the posts collection endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(rename = "comment", default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub create_at: String,
    #[serde(default)]
    pub update_at: String,
}

impl Post {
    /// Date and time halves of the server's `"date, time"` timestamp
    pub fn created_parts(&self) -> (&str, &str) {
        match self.create_at.split_once(',') {
            Some((date, time)) => (date.trim(), time.trim()),
            None => (self.create_at.trim(), ""),
        }
    }
}

/// Current user profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub profile_image: String,
}

impl User {
    /// Name shown as a post's author: the profile name, or the local part
    /// of the email address when no name is set
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Envelope wrapping every API response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    // A missing field is already `None`; `default` here would demand `T: Default`
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the result, turning an error envelope into `ClientError::Api`
    pub fn into_result(self) -> Result<T> {
        if self.error {
            return Err(ClientError::Api {
                status: self.status,
                message: self.message,
            });
        }
        self.result
            .ok_or_else(|| ClientError::Decode("No result in response".to_string()))
    }
}

/// Response type of `GET /blog`
pub type BlogResponse = ApiResponse<Vec<Post>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_post() -> serde_json::Value {
        json!({
            "_id": "p1",
            "title": "Rust in production",
            "subtitle": "Notes",
            "content": "<p>Body</p>",
            "thumbnail": "https://cdn.example.com/p1.png",
            "author": {"_id": "u1", "name": "Ada", "gender": "female", "profile_image": "a.png"},
            "category": "Technology",
            "tags": ["rust", "ops"],
            "likes": 4,
            "comment": [
                {"_id": "c1", "userId": {"_id": "u2", "name": "Lin"}, "msg": "Great", "create_at": "1/2/2025, 10:00:00"}
            ],
            "create_at": "1/2/2025, 09:30:00",
            "update_at": "1/2/2025, 09:30:00"
        })
    }

    #[test]
    fn test_post_decodes_server_field_names() {
        let post: Post = serde_json::from_value(sample_post()).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.author.name, "Ada");
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].user.name, "Lin");
        assert_eq!(post.created_parts(), ("1/2/2025", "09:30:00"));
    }

    #[test]
    fn test_post_tolerates_missing_fields() {
        let post: Post = serde_json::from_value(json!({"_id": "p2", "title": "Bare"})).unwrap();
        assert!(post.tags.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.likes, 0);
        assert_eq!(post.created_parts(), ("", ""));
    }

    #[test]
    fn test_error_envelope_maps_to_api_error() {
        let resp: BlogResponse = serde_json::from_value(json!({
            "status": 401,
            "error": true,
            "message": "Invalid token",
            "result": null
        }))
        .unwrap();
        assert_eq!(
            resp.into_result().unwrap_err(),
            ClientError::Api {
                status: 401,
                message: "Invalid token".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_without_result() {
        let resp: ApiResponse<Post> = serde_json::from_value(json!({
            "status": 200,
            "error": false,
            "message": "Password updated"
        }))
        .unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.message, "Password updated");
        assert!(matches!(resp.into_result(), Err(ClientError::Decode(_))));
    }

    /// Decoding through a generic helper needs no bound beyond `DeserializeOwned`
    fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> ApiResponse<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_generic_envelope_decode() {
        let resp: ApiResponse<Vec<Post>> = decode(r#"{"status":200,"error":false,"result":[{"_id":"p1"}]}"#);
        assert_eq!(resp.into_result().unwrap()[0].id, "p1");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            email: "writer@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "writer");

        let named = User {
            name: "Grace".to_string(),
            ..user
        };
        assert_eq!(named.display_name(), "Grace");
    }
}
