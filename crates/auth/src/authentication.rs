//! Authentication service requests (`/authentication`).

use std::collections::BTreeMap;

use serde_json::{Value, json};

use accountkit_core::validate::{expect_keys, validate_string};
use accountkit_core::{ApiRequest, Method, UserId, ValidationError, ValidationResult};

use crate::error::ApiError;
use crate::session::Session;

const SERVICE: &str = "/authentication";

/// Channel an OTP is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpChannel {
    Basic,
    Email,
    Mobile,
}

impl OtpChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Basic => "basic",
            OtpChannel::Email => "email",
            OtpChannel::Mobile => "mobile",
        }
    }
}

/// Ask the service to send a one-time password to `username`.
///
/// With `verify`, the service only sends the OTP to existing accounts.
pub fn otp_request(username: &str, channel: OtpChannel, lang: &str, verify: bool) -> ApiRequest {
    let request = ApiRequest::new(Method::Post, format!("{SERVICE}/v1.0/otp")).json(json!({
        "username": username,
        "type": channel.as_str(),
        "lang": lang,
    }));
    if verify {
        request.query("verify", true)
    } else {
        request
    }
}

/// Exchange an emailed OTP for a session token.
pub fn otp_verification(username: &str, otp: &str) -> ApiRequest {
    ApiRequest::new(Method::Post, format!("{SERVICE}/v1.0/token/otp")).json(json!({
        "username": username,
        "password": otp,
        "type": "email",
    }))
}

/// Username + password login.
pub fn create_token(username: &str, password: &str, locale: &str) -> ApiRequest {
    ApiRequest::new(Method::Post, format!("{SERVICE}/v1.0/token/user")).json(json!({
        "username": username,
        "password": password,
        "locale": locale,
    }))
}

/// Update attributes of an authentication user.
pub fn update_user(user_id: &UserId, info: &BTreeMap<String, String>, token: &str) -> ApiRequest {
    ApiRequest::new(Method::Put, format!("{SERVICE}/v1.0/user/:userid"))
        .param("userid", user_id)
        .json(json!(info))
        .bearer(token)
}

/// Password change for the signed-in user.
pub fn update_password(session: &Session, password: &str) -> Result<ApiRequest, ApiError> {
    let token = session.require_token()?;
    let user_id = session.require_user_id()?;
    let info = BTreeMap::from([("password".to_string(), password.to_string())]);
    Ok(update_user(&user_id, &info, token))
}

/// The `token` of a token-issuing response.
pub fn parse_token_response(body: &Value) -> ValidationResult<String> {
    let obj = expect_keys(body, &["token"])?;
    validate_string(&obj["token"]).map_err(|e: ValidationError| e.at("token"))
}
