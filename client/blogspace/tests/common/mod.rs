//! Shared fixtures for the integration tests
//!
//! Every test gets its own mock server. The auth endpoints live at the server
//! root and the blog endpoints under `/api`, mirroring the two services.

#![allow(dead_code)]

use std::sync::Arc;

use blogspace::config::{ApiConfig, LogConfig, LogFormat, SessionConfig, WebConfig};
use blogspace::{App, Config, MemoryTokenStore, TokenStore};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const WEB_BASE: &str = "https://blogspace.test";

pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub app: App,
}

impl TestApp {
    pub async fn signed_out() -> Self {
        Self::with_store(MemoryTokenStore::new()).await
    }

    pub async fn signed_in(token: &str) -> Self {
        Self::with_store(MemoryTokenStore::with_token(token)).await
    }

    async fn with_store(store: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let shared: Arc<dyn TokenStore> = store.clone();
        let app = App::with_store(config_for(&server.uri()), shared);
        Self { server, store, app }
    }

    pub fn blog_base(&self) -> String {
        format!("{}/api", self.server.uri())
    }
}

pub fn config_for(server_uri: &str) -> Config {
    Config {
        api: ApiConfig {
            auth_base_url: server_uri.to_string(),
            blog_base_url: format!("{}/api", server_uri),
        },
        web: WebConfig {
            base_url: WEB_BASE.to_string(),
        },
        session: SessionConfig {
            token_path: std::env::temp_dir().join("blogspace-test-token"),
        },
        log: LogConfig {
            format: LogFormat::Pretty,
            filter: "blogspace=debug".to_string(),
        },
    }
}

/// Successful `{status, error, message, result}` envelope
pub fn envelope(result: Value) -> Value {
    json!({
        "status": 200,
        "error": false,
        "message": "ok",
        "result": result
    })
}

pub fn error_envelope(status: u16, message: &str) -> Value {
    json!({
        "status": status,
        "error": true,
        "message": message,
        "result": null
    })
}

pub fn post_json(id: &str, title: &str, category: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "subtitle": format!("About {}", title),
        "content": "<p>Body text</p>",
        "thumbnail": format!("https://cdn.blogspace.test/{}.png", id),
        "author": {"_id": "u1", "name": "Ada"},
        "category": category,
        "tags": ["rust"],
        "likes": 2,
        "comment": [],
        "create_at": "3/7/2025, 09:30:00",
        "update_at": "3/7/2025, 09:30:00"
    })
}

pub fn user_json() -> Value {
    json!({
        "_id": "u1",
        "name": "Ada",
        "email": "ada@blogspace.test",
        "gender": "female",
        "about": "Writes about compilers"
    })
}
