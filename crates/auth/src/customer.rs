//! Customer service requests (`/customer`).

use serde_json::{Value, json};

use accountkit_core::validate::{expect_keys, validate_string};
use accountkit_core::{ApiRequest, CustomerId, Method, ProfileId, ValidationResult};

use crate::error::ApiError;
use crate::session::check_registration_token;

const SERVICE: &str = "/customer";

/// Details of a new customer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccount {
    pub username: String,
    pub nickname: String,
    pub password: String,
    pub locale: String,
    pub location: Option<String>,
}

/// Result of account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub customer_id: CustomerId,
    /// The root profile created alongside the account.
    pub profile_id: ProfileId,
    /// Session token for the new customer user.
    pub email_identity: String,
}

pub fn create_account(account: &CreateAccount, token: &str) -> ApiRequest {
    let mut body = json!({
        "customer": {
            "name": { "nickName": account.nickname },
        },
        "userName": account.username,
        "loginType": "email",
        "password": account.password,
        "locale": account.locale,
    });
    if let Some(location) = &account.location {
        body["location"] = json!(location);
    }

    ApiRequest::new(Method::Post, format!("{SERVICE}/v1.0/customer"))
        .json(body)
        .bearer(token)
}

/// Register an email account with a verified OTP token.
///
/// Fails before any request is built if the OTP token is unusable or already
/// belongs to a customer.
pub fn register(
    email: &str,
    password: &str,
    otp_token: &str,
    locale: &str,
    location: Option<&str>,
) -> Result<ApiRequest, ApiError> {
    check_registration_token(otp_token)?;
    let account = CreateAccount {
        username: email.to_string(),
        nickname: email.to_string(),
        password: password.to_string(),
        locale: locale.to_string(),
        location: location.map(str::to_string),
    };
    Ok(create_account(&account, otp_token))
}

pub fn parse_created_account(body: &Value) -> ValidationResult<CreatedAccount> {
    let obj = expect_keys(body, &["customerId", "profileId", "emailIdentity"])?;
    Ok(CreatedAccount {
        customer_id: validate_string(&obj["customerId"])
            .map_err(|e| e.at("customerId"))?
            .into(),
        profile_id: validate_string(&obj["profileId"])
            .map_err(|e| e.at("profileId"))?
            .into(),
        email_identity: validate_string(&obj["emailIdentity"]).map_err(|e| e.at("emailIdentity"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthenticationError;
    use crate::token::test_tokens::sign;
    use accountkit_core::ValidationError;

    #[test]
    fn registration_builds_email_account() {
        let otp = sign(json!({ "roles": ["otp_verified"] }));
        let req = register("a@b.c", "pw", &otp, "en-HK", Some("HK")).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/customer/v1.0/customer");
        assert_eq!(
            req.body,
            Some(json!({
                "customer": { "name": { "nickName": "a@b.c" } },
                "userName": "a@b.c",
                "loginType": "email",
                "password": "pw",
                "locale": "en-HK",
                "location": "HK",
            }))
        );
        assert_eq!(req.bearer.as_deref(), Some(otp.as_str()));
    }

    #[test]
    fn location_is_omitted_when_absent() {
        let otp = sign(json!({ "roles": ["otp_verified"] }));
        let req = register("a@b.c", "pw", &otp, "en-HK", None).unwrap();
        assert!(req.body.unwrap().get("location").is_none());
    }

    #[test]
    fn existing_customers_cannot_register() {
        let token = sign(json!({ "roles": ["customer_user"] }));
        assert_eq!(
            register("a@b.c", "pw", &token, "en-HK", None),
            Err(ApiError::Authentication(AuthenticationError::AlreadyExists))
        );
    }

    #[test]
    fn created_account_response() {
        let account = parse_created_account(&json!({
            "customerId": "c-1",
            "profileId": "p-1",
            "emailIdentity": "tok",
        }))
        .unwrap();
        assert_eq!(account.customer_id, CustomerId::new("c-1"));
        assert_eq!(account.profile_id, ProfileId::new("p-1"));
        assert_eq!(account.email_identity, "tok");

        assert_eq!(
            parse_created_account(&json!({ "customerId": "c-1" })),
            Err(ValidationError::MissingKeys(vec![
                "customerId",
                "profileId",
                "emailIdentity"
            ]))
        );
    }
}
