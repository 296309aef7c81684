//! Authentication forms: login, registration, OTP and password change
//!
//! Each submit reports its outcome through the notifier and returns the route
//! to show next, or `None` to stay on the current form.

use blog_types::{
    ChangePasswordPayload, ClientError, LoginUserBody, OtpVerifyPayload, RegisterUserBody, Result,
};
use entity_cache::EntityCache;
use tracing::{error, info};

use crate::api::AuthApi;
use crate::notify::Notifier;
use crate::routes::Route;
use crate::session::SessionGuard;

pub async fn submit_login(
    body: &LoginUserBody,
    auth: &AuthApi,
    guard: &SessionGuard,
    notifier: &Notifier,
) -> Option<Route> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        notifier.error("Email and password are required");
        return None;
    }

    let outcome = match auth.login(body).await {
        Ok(token) => guard.sign_in(&token),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(route) => {
            notifier.success("Login successful");
            Some(route)
        }
        Err(e) => {
            notifier.failure("login", &e);
            None
        }
    }
}

/// Sign out and drop everything cached for the session
pub async fn sign_out(guard: &SessionGuard, cache: &EntityCache, notifier: &Notifier) -> Route {
    cache.clear().await;
    match guard.sign_out() {
        Ok(route) => route,
        Err(e) => {
            notifier.failure("sign out", &e);
            Route::Login
        }
    }
}

/// Successful registration returns to the login form
pub async fn submit_register(
    body: &RegisterUserBody,
    auth: &AuthApi,
    notifier: &Notifier,
) -> Option<Route> {
    if let Err(e) = body.validate() {
        notifier.error(e.notice_message());
        return None;
    }

    match auth.register(body).await {
        Ok(message) => {
            info!(email = %body.email, "Account registered");
            notifier.success(non_empty(message, "Registered successfully, check your email"));
            Some(Route::Login)
        }
        Err(ClientError::Validation(msg)) => {
            notifier.error(msg);
            None
        }
        Err(e) => {
            notifier.failure("register", &e);
            None
        }
    }
}

pub async fn submit_otp(
    body: &OtpVerifyPayload,
    auth: &AuthApi,
    notifier: &Notifier,
) -> Option<Route> {
    if body.otp.trim().is_empty() {
        notifier.error("OTP is required");
        return None;
    }

    match auth.verify_otp(body).await {
        Ok(message) => {
            notifier.success(non_empty(message, "OTP verified"));
            Some(Route::ChangePassword {
                email: body.email.clone(),
            })
        }
        Err(e) => {
            notifier.failure("verify otp", &e);
            None
        }
    }
}

/// Change-password form; the email is route state from the previous step
#[derive(Clone, Debug, Default)]
pub struct ChangePasswordForm {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
    /// Inline error shown above the form
    pub error: String,
}

impl ChangePasswordForm {
    pub fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            return Err(ClientError::Validation(
                "All fields are required".to_string(),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(ClientError::Validation(
                "New and Confirm password do not match".to_string(),
            ));
        }
        Ok(())
    }

    /// Validation and server rejections land in `self.error`; transport
    /// failures become a notice
    pub async fn submit(&mut self, auth: &AuthApi, notifier: &Notifier) -> Option<Route> {
        if let Err(e) = self.validate() {
            self.error = e.to_string();
            return None;
        }

        let payload = ChangePasswordPayload {
            email: self.email.clone(),
            new_password: self.new_password.clone(),
        };

        match auth.change_password(&payload).await {
            Ok(message) => {
                self.error.clear();
                notifier.success(non_empty(message, "Password updated"));
                Some(Route::Login)
            }
            Err(ClientError::Api { message, .. }) if !message.is_empty() => {
                self.error = message;
                None
            }
            Err(e) => {
                error!(email = %self.email, error = %e, "Change password failed");
                notifier.error("Something went wrong. Please try again..");
                None
            }
        }
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_requires_both_fields() {
        let mut form = ChangePasswordForm::for_email("a@b.c");
        form.new_password = "secret".to_string();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "All fields are required"
        );
    }

    #[test]
    fn test_change_password_requires_match() {
        let mut form = ChangePasswordForm::for_email("a@b.c");
        form.new_password = "secret".to_string();
        form.confirm_password = "secrets".to_string();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "New and Confirm password do not match"
        );

        form.confirm_password = "secret".to_string();
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_change_password_sets_inline_error() {
        // Unroutable address: validation must fail before any request
        let auth = AuthApi::new("http://127.0.0.1:9");
        let notifier = Notifier::new();
        let mut form = ChangePasswordForm::for_email("a@b.c");

        assert_eq!(form.submit(&auth, &notifier).await, None);
        assert_eq!(form.error, "All fields are required");
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_change_password_transport_failure_is_one_notice() {
        let auth = AuthApi::new("http://127.0.0.1:9");
        let notifier = Notifier::new();
        let mut form = ChangePasswordForm::for_email("a@b.c");
        form.new_password = "secret".to_string();
        form.confirm_password = "secret".to_string();

        assert_eq!(form.submit(&auth, &notifier).await, None);
        assert!(form.error.is_empty());
        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices[0].message,
            "Something went wrong. Please try again.."
        );
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let auth = AuthApi::new("http://127.0.0.1:9");
        let guard = SessionGuard::new(std::sync::Arc::new(
            crate::session::MemoryTokenStore::new(),
        ));
        let notifier = Notifier::new();
        let body = LoginUserBody {
            email: String::new(),
            password: "pw".to_string(),
        };

        assert_eq!(submit_login(&body, &auth, &guard, &notifier).await, None);
        assert_eq!(
            notifier.drain()[0].message,
            "Email and password are required"
        );
    }
}
