//! Account login contract.
//!
//! The client only needs two calls and a way to interpret their status code.
//! The numeric encoding belongs to the service, so classification lives on
//! the trait and implementations may override it.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::AuthConfig;

/// Status code used when the request never produced a reply.
pub const NETWORK_ERROR_CODE: i64 = 520;

/// Raw reply from a login call.
#[derive(Debug, Clone, Default)]
pub struct AuthReply {
    pub code: i64,
    pub body: Vec<u8>,
}

impl AuthReply {
    pub fn new(code: i64, body: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    NetworkError,
    UnknownError,
    /// Wrong account or password, locked account, and similar refusals.
    Rejected,
}

/// Default interpretation of the account API's status codes.
pub fn classify_code(code: i64) -> AuthOutcome {
    match code {
        200 => AuthOutcome::Success,
        NETWORK_ERROR_CODE => AuthOutcome::NetworkError,
        301 | 302 | 400 | 501 | 502 | 509 => AuthOutcome::Rejected,
        _ => AuthOutcome::UnknownError,
    }
}

/// Login calls. Both block until the service answers.
pub trait AuthService: Send + Sync {
    fn login_by_email(&self, email: &str, password: &str) -> AuthReply;

    fn login_by_phone(&self, phone: &str, password: &str) -> AuthReply;

    fn classify(&self, code: i64) -> AuthOutcome {
        classify_code(code)
    }
}

// ── HTTP implementation ───────────────────────────────────────────────────────

/// Talks to a JSON account API: `POST {base}/login` and
/// `POST {base}/login/cellphone`, each answering with a body carrying `code`.
pub struct HttpAuthService {
    client: reqwest::Client,
    base_url: String,
    handle: tokio::runtime::Handle,
}

impl HttpAuthService {
    /// Must be built inside a multi-threaded tokio runtime; the login calls
    /// park the calling worker with `block_in_place`.
    pub fn new(config: &AuthConfig, handle: tokio::runtime::Handle) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            handle,
        })
    }

    fn post(&self, path: &str, payload: Value) -> AuthReply {
        let url = format!("{}{}", self.base_url, path);
        debug!("auth: POST {}", url);
        let request = self.client.post(&url).json(&payload).send();
        tokio::task::block_in_place(|| {
            self.handle.block_on(async {
                let response = match request.await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("auth: request to {} failed: {}", url, e);
                        return AuthReply::new(NETWORK_ERROR_CODE, Vec::new());
                    }
                };
                let status = i64::from(response.status().as_u16());
                match response.bytes().await {
                    Ok(body) => AuthReply::new(reply_code(&body).unwrap_or(status), body.to_vec()),
                    Err(e) => {
                        warn!("auth: reading reply from {} failed: {}", url, e);
                        AuthReply::new(NETWORK_ERROR_CODE, Vec::new())
                    }
                }
            })
        })
    }
}

impl AuthService for HttpAuthService {
    fn login_by_email(&self, email: &str, password: &str) -> AuthReply {
        self.post("/login", email_payload(email, password))
    }

    fn login_by_phone(&self, phone: &str, password: &str) -> AuthReply {
        self.post("/login/cellphone", phone_payload(phone, password))
    }
}

/// JSON body for `POST {base}/login`.
fn email_payload(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

/// JSON body for `POST {base}/login/cellphone`.
fn phone_payload(phone: &str, password: &str) -> Value {
    json!({ "phone": phone, "password": password })
}

/// `code` field of a JSON reply body, if there is one.
fn reply_code(body: &[u8]) -> Option<i64> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(Value::as_i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_code() {
        assert_eq!(classify_code(200), AuthOutcome::Success);
        assert_eq!(classify_code(520), AuthOutcome::NetworkError);
        assert_eq!(classify_code(502), AuthOutcome::Rejected);
        assert_eq!(classify_code(501), AuthOutcome::Rejected);
        assert_eq!(classify_code(0), AuthOutcome::UnknownError);
        assert_eq!(classify_code(-460), AuthOutcome::UnknownError);
    }

    #[test]
    fn test_reply_code() {
        assert_eq!(reply_code(br#"{"code":502,"msg":"bad"}"#), Some(502));
        assert_eq!(reply_code(b"gateway timeout"), None);
        assert_eq!(reply_code(br#"{"msg":"no code"}"#), None);
    }

    #[test]
    fn test_login_payloads() {
        assert_eq!(
            email_payload("a@b.c", "pw"),
            json!({ "email": "a@b.c", "password": "pw" })
        );
        let phone = phone_payload("13800000000", "pw");
        assert_eq!(phone["phone"], "13800000000");
        assert_eq!(phone["password"], "pw");
        assert!(phone.get("email").is_none());
    }

    struct FixedCodes;

    impl AuthService for FixedCodes {
        fn login_by_email(&self, _: &str, _: &str) -> AuthReply {
            AuthReply::new(1, Vec::new())
        }

        fn login_by_phone(&self, _: &str, _: &str) -> AuthReply {
            AuthReply::new(2, Vec::new())
        }

        fn classify(&self, code: i64) -> AuthOutcome {
            if code == 1 {
                AuthOutcome::Success
            } else {
                AuthOutcome::Rejected
            }
        }
    }

    #[test]
    fn test_classification_is_overridable() {
        let service = FixedCodes;
        let reply = service.login_by_email("a@b.c", "x");
        assert_eq!(service.classify(reply.code), AuthOutcome::Success);
        let reply = service.login_by_phone("123", "x");
        assert_eq!(service.classify(reply.code), AuthOutcome::Rejected);
    }
}
