//! BlogSpace shared types
//!
//! Records mirrored from the blog API, request payloads and the client-wide
//! error type.

pub mod error;
pub mod models;
pub mod payloads;

pub use error::{ClientError, Result};

pub use models::{ApiResponse, Author, BlogResponse, Comment, Post, User};
pub use payloads::{
    ChangePasswordPayload, Gender, LoginResult, LoginUserBody, NewPost, OtpVerifyPayload,
    RegisterUserBody,
};
