//! Request bodies sent to the auth and blog endpoints

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::Comment;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUserBody {
    pub email: String,
    pub password: String,
}

/// Gender choices offered by the registration form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(ClientError::Validation(format!(
                "Unknown gender '{}', expected male, female or other",
                other
            ))),
        }
    }
}

/// Registration form; sent as multipart because of the profile image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterUserBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub about: String,
    pub profile_image: Option<PathBuf>,
}

impl RegisterUserBody {
    /// Required-field check run before the request is built
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(ClientError::Validation(
                "Name, email and password are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(ClientError::Validation(
                "Please enter a valid email".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerifyPayload {
    pub email: String,
    #[serde(rename = "OTP")]
    pub otp: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub email: String,
    pub new_password: String,
}

/// Token carried by a successful login response
///
/// The login endpoint has answered both with a bare token string and with an
/// object holding it, so both shapes are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoginResult {
    Token(String),
    Session { token: String },
}

impl LoginResult {
    pub fn into_token(self) -> String {
        match self {
            LoginResult::Token(token) | LoginResult::Session { token } => token,
        }
    }
}

/// Post body produced by the composer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub thumbnail: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: String,
    pub published_at: String,
    pub likes: u64,
    pub comment: Vec<Comment>,
    pub views: u64,
}
