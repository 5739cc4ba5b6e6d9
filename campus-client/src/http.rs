//! HTTP gateway to the campus server.
//!
//! Wraps `reqwest`, attaching the bearer token plus the advisory
//! `x-user-*` identity headers on staff sessions, and translating
//! non-2xx responses into typed [`ClientError`]s. Success bodies are
//! plain JSON payloads; error bodies carry the server's
//! `{code, message, details}` envelope.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    LoginRequest, LoginResponse, StudentLoginRequest, StudentLoginResponse, UserInfo,
    HEADER_USER_BRANCH, HEADER_USER_ID, HEADER_USER_ROLE,
};

use crate::error::{ClientError, ClientResult};

/// Error envelope returned by the server on non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    code: u16,
    message: String,
    #[serde(default)]
    details: Option<HashMap<String, serde_json::Value>>,
}

/// Identity attached to outgoing requests after login.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: String,
    user_id: Option<String>,
    role: Option<String>,
    branch_id: Option<String>,
}

impl AuthContext {
    /// Staff context: bearer token plus all three identity headers.
    pub fn staff(token: &str, user_id: &str, role: &str, branch_id: Option<i64>) -> Self {
        Self {
            token: token.to_string(),
            user_id: Some(user_id.to_string()),
            role: Some(role.to_string()),
            branch_id: branch_id.map(|branch| branch.to_string()),
        }
    }

    /// Bearer token only, no identity headers. Used for students.
    pub fn bearer(token: &str) -> Self {
        Self {
            token: token.to_string(),
            user_id: None,
            role: None,
            branch_id: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Server operations the auth service needs. Object-safe so services
/// can hold `Arc<dyn ApiGateway>` and tests can swap in a double.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;
    async fn student_login(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<StudentLoginResponse>;
    async fn me(&self) -> ClientResult<UserInfo>;
    async fn logout(&self) -> ClientResult<()>;

    /// Attach the identity applied to subsequent requests.
    fn set_auth(&self, auth: AuthContext);
    /// Drop the attached identity.
    fn clear_auth(&self);
}

/// Network gateway over reqwest.
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    auth: RwLock<Option<AuthContext>>,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.auth_read().as_ref().map(|auth| auth.token.clone())
    }

    fn auth_read(&self) -> RwLockReadGuard<'_, Option<AuthContext>> {
        self.auth
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn auth_write(&self) -> RwLockWriteGuard<'_, Option<AuthContext>> {
        self.auth
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn apply_auth(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(auth) = self.auth_read().as_ref() {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", auth.token),
            );
            if let Some(id) = &auth.user_id {
                request = request.header(HEADER_USER_ID, id);
            }
            if let Some(role) = &auth.role {
                request = request.header(HEADER_USER_ROLE, role);
            }
            if let Some(branch) = &auth.branch_id {
                request = request.header(HEADER_USER_BRANCH, branch);
            }
        }
        request
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let request = self.apply_auth(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.post(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let request = self.apply_auth(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.apply_auth(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Maps a response to a typed value or a typed error.
    ///
    /// 401 always becomes [`ClientError::Unauthorized`] regardless of
    /// body shape, so callers have one signal for session teardown.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;

            if status == StatusCode::UNAUTHORIZED {
                let message = serde_json::from_str::<ErrorEnvelope>(&text)
                    .map(|envelope| envelope.message)
                    .unwrap_or_else(|_| "Authentication required".to_string());
                return Err(ClientError::Unauthorized(message));
            }

            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
                return Err(ClientError::Api {
                    code: envelope.code,
                    message: envelope.message,
                    details: envelope.details,
                });
            }

            // Non-envelope bodies (proxies, timeouts) fall back to status.
            return match status {
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("/api/auth/login", &request).await
    }

    async fn student_login(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<StudentLoginResponse> {
        let request = StudentLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("/api/auth/student/login", &request).await
    }

    async fn me(&self) -> ClientResult<UserInfo> {
        self.get("/api/auth/me").await
    }

    async fn logout(&self) -> ClientResult<()> {
        let _: serde_json::Value = self.post_empty("/api/auth/logout").await?;
        self.clear_auth();
        Ok(())
    }

    fn set_auth(&self, auth: AuthContext) {
        *self.auth_write() = Some(auth);
    }

    fn clear_auth(&self) {
        *self.auth_write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> reqwest::Response {
        let http_response = http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(http_response)
    }

    #[tokio::test]
    async fn test_success_body_deserializes() {
        let body = r#"{"token":"t.k.n","user":{"id":"7","username":"root","role":"admin","branchId":null,"permissions":["*"]}}"#;
        let login: LoginResponse = HttpGateway::handle_response(response(200, body))
            .await
            .unwrap();
        assert_eq!(login.user.username, "root");
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_server_message() {
        let body = r#"{"code":1002,"message":"Invalid username or password"}"#;
        let err = HttpGateway::handle_response::<serde_json::Value>(response(401, body))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[tokio::test]
    async fn test_unauthorized_without_envelope() {
        let err = HttpGateway::handle_response::<serde_json::Value>(response(401, "gateway says no"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_envelope_becomes_api_error() {
        let body = r#"{"code":2006,"message":"Branch access denied","details":{"resource":"students"}}"#;
        let err = HttpGateway::handle_response::<serde_json::Value>(response(403, body))
            .await
            .unwrap_err();
        match err {
            ClientError::Api { code, message, details } => {
                assert_eq!(code, 2006);
                assert_eq!(message, "Branch access denied");
                assert!(details.unwrap().contains_key("resource"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_envelope_falls_back_to_status() {
        let err = HttpGateway::handle_response::<serde_json::Value>(response(404, "plain 404"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));

        let err = HttpGateway::handle_response::<serde_json::Value>(response(502, "bad gateway"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));
    }

    #[test]
    fn test_auth_context_shapes() {
        let staff = AuthContext::staff("tok", "11", "manager", Some(3));
        assert_eq!(staff.token(), "tok");
        assert_eq!(staff.user_id.as_deref(), Some("11"));
        assert_eq!(staff.role.as_deref(), Some("manager"));
        assert_eq!(staff.branch_id.as_deref(), Some("3"));

        let student = AuthContext::bearer("tok");
        assert!(student.user_id.is_none());
        assert!(student.role.is_none());
        assert!(student.branch_id.is_none());
    }

    #[test]
    fn test_gateway_auth_lifecycle() {
        let gateway = HttpGateway::new("http://localhost:3000/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:3000");
        assert_eq!(gateway.token(), None);

        gateway.set_auth(AuthContext::bearer("tok"));
        assert_eq!(gateway.token().as_deref(), Some("tok"));

        gateway.clear_auth();
        assert_eq!(gateway.token(), None);
    }
}
