//! HTTP access to the remote blog API
//!
//! `ApiClient` owns the request/response plumbing shared by the auth and blog
//! endpoints: bearer authorization, status handling and unwrapping the
//! `{status, error, message, result}` envelope.

pub mod auth;
pub mod blog;

pub use auth::AuthApi;
pub use blog::{BlogApi, BlogBackend};

use blog_types::{ApiResponse, ClientError, Result};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Thin wrapper around a `reqwest::Client` bound to one base URL
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    service_name: &'static str,
}

impl ApiClient {
    pub fn new(service_name: &'static str, base_url: &str) -> Self {
        Self::with_client(service_name, base_url, Client::new())
    }

    pub fn with_client(service_name: &'static str, base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_name,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T>(&self, path: &str, token: Option<&str>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path));
        self.send(authorize(request, token), path).await
    }

    /// GET one member of `collection`; `id` becomes a single percent-encoded
    /// path segment
    pub async fn get_member<T>(
        &self,
        collection: &str,
        id: &str,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.member_url(collection, id)?;
        let request = self.client.get(url);
        self.send(authorize(request, token), collection).await
    }

    fn member_url(&self, collection: &str, id: &str) -> Result<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ClientError::NotFound(format!("Invalid id '{}'", id)));
        }
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| ClientError::Config(format!("Invalid base URL: {}", e)))?;
        let url_display = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("Base URL cannot take a path: {}", url_display)))?
            .push(id);
        Ok(url)
    }

    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(authorize(request, token), path).await
    }

    pub async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).multipart(form);
        self.send(authorize(request, token), path).await
    }

    async fn send<T>(&self, request: RequestBuilder, path: &str) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        debug!(service = self.service_name, path, "Calling API");

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {}", e)))?;

        decode_envelope(response, self.service_name, path).await
    }
}

/// Message-only endpoints may omit `result`; only the error flag matters
pub(crate) fn message_of(envelope: ApiResponse<serde_json::Value>) -> Result<String> {
    if envelope.error {
        return Err(ClientError::Api {
            status: envelope.status,
            message: envelope.message,
        });
    }
    Ok(envelope.message)
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Decode a response body into an envelope, mapping failure statuses
///
/// Failure bodies usually still carry the envelope, so its `message` is
/// preferred over the raw text.
async fn decode_envelope<T>(
    response: Response,
    service: &str,
    path: &str,
) -> Result<ApiResponse<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(format!("Reading body failed: {}", e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .map(|envelope| envelope.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.trim().to_string());
        warn!(service, path, status = status.as_u16(), %message, "API call failed");

        return Err(match status.as_u16() {
            401 => ClientError::Authentication(message),
            404 => ClientError::NotFound(message),
            code => ClientError::Api {
                status: code,
                message,
            },
        });
    }

    let mut envelope: ApiResponse<T> = serde_json::from_str(&body)
        .map_err(|e| ClientError::Decode(format!("Parse failed: {}", e)))?;
    if envelope.status == 0 {
        envelope.status = status.as_u16();
    }
    Ok(envelope)
}
