//! Authentication endpoints

use blog_types::{
    ChangePasswordPayload, ClientError, LoginResult, LoginUserBody, OtpVerifyPayload,
    RegisterUserBody, Result,
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::info;

use super::{message_of, ApiClient};
use crate::attachment::ImageAttachment;

const LOGIN: &str = "/auth/login";
const REGISTER: &str = "/auth/register";
const VERIFY_OTP: &str = "/auth/verify-otp";
const CHANGE_PASSWORD: &str = "/auth/change-password";

/// Client for the auth service
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ApiClient::new("auth", base_url),
        }
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, body: &LoginUserBody) -> Result<String> {
        let envelope = self
            .client
            .post_json::<_, LoginResult>(LOGIN, body, None)
            .await?;
        let token = envelope.into_result()?.into_token();
        info!(email = %body.email, "Login succeeded");
        Ok(token)
    }

    /// Create an account; returns the server's message
    pub async fn register(&self, body: &RegisterUserBody) -> Result<String> {
        body.validate()?;

        let mut form = Form::new()
            .text("name", body.name.trim().to_string())
            .text("email", body.email.trim().to_string())
            .text("password", body.password.clone())
            .text("gender", body.gender.to_string())
            .text("about", body.about.clone());

        if let Some(path) = &body.profile_image {
            let image = ImageAttachment::open(path)?;
            let bytes = image.read()?;
            let part = Part::bytes(bytes)
                .file_name(image.file_name())
                .mime_str(image.mime.as_ref())
                .map_err(|e| ClientError::Validation(e.to_string()))?;
            form = form.part("profile_image", part);
        }

        let envelope = self
            .client
            .post_multipart::<Value>(REGISTER, form, None)
            .await?;
        message_of(envelope)
    }

    /// Confirm the one-time password mailed after registration
    pub async fn verify_otp(&self, body: &OtpVerifyPayload) -> Result<String> {
        let envelope = self
            .client
            .post_json::<_, Value>(VERIFY_OTP, body, None)
            .await?;
        message_of(envelope)
    }

    pub async fn change_password(&self, body: &ChangePasswordPayload) -> Result<String> {
        let envelope = self
            .client
            .post_json::<_, Value>(CHANGE_PASSWORD, body, None)
            .await?;
        message_of(envelope)
    }
}
