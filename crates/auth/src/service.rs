//! Sign-in flows over a host-provided [`Transport`].

use serde_json::Value;

use accountkit_core::{ApiRequest, ClientConfig, Transport};

use crate::authentication::{self, OtpChannel};
use crate::customer::{self, CreatedAccount};
use crate::error::{ApiError, AuthenticationError};
use crate::handler::{classify_api_failure, classify_otp_failure};
use crate::session::Session;

/// Account and session operations for one client.
#[derive(Debug)]
pub struct AuthService<T> {
    transport: T,
    config: ClientConfig,
    session: Session,
}

impl<T: Transport> AuthService<T> {
    pub fn new(transport: T, config: ClientConfig, session: Session) -> Self {
        Self {
            transport,
            config,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Email a one-time password. Returns the username it was sent to.
    ///
    /// With `verify`, only existing accounts receive an OTP.
    pub async fn request_otp(&self, email: &str, verify: bool) -> Result<String, AuthenticationError> {
        let request = authentication::otp_request(email, OtpChannel::Email, &self.config.locale, verify);
        match self.transport.execute(request).await {
            Ok(_) => Ok(email.to_string()),
            Err(failure) => {
                let err = classify_otp_failure(&failure);
                tracing::warn!(code = err.code(), "otp request failed");
                Err(err)
            }
        }
    }

    /// Exchange an OTP for a short-lived token usable for registration.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError> {
        let body = self.call(authentication::otp_verification(email, otp)).await?;
        Ok(authentication::parse_token_response(&body)?)
    }

    /// Create an account with a verified OTP token and sign in as it.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        otp_token: &str,
        location: Option<&str>,
    ) -> Result<CreatedAccount, ApiError> {
        let request = customer::register(email, password, otp_token, &self.config.locale, location)?;
        let body = self.call(request).await?;
        let account = customer::parse_created_account(&body)?;
        tracing::info!(customer_id = %account.customer_id, "account created");
        self.session.sign_in(account.email_identity.clone());
        Ok(account)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = authentication::create_token(username, password, &self.config.locale);
        let body = self.call(request).await?;
        let token = authentication::parse_token_response(&body)?;
        self.session.sign_in(token);
        tracing::info!("signed in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session.logout();
        tracing::info!("signed out");
    }

    pub async fn update_password(&self, password: &str) -> Result<(), ApiError> {
        let request = authentication::update_password(&self.session, password)?;
        self.call(request).await?;
        Ok(())
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "api request");
        self.transport.execute(request).await.map_err(|failure| {
            let err = classify_api_failure(failure);
            tracing::warn!(error = %err, "api request failed");
            err
        })
    }
}
