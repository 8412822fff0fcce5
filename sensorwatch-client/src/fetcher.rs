//! Authenticated request pipeline.
//!
//! Every protected request goes through [`AuthenticatedFetcher::request`]:
//!
//! 1. Log in first if the session holds no credential.
//! 2. Send the request with `Authorization: Bearer <token>`.
//! 3. On 401, invalidate, log in once more and resend once. Whatever the
//!    second attempt returns is final.
//!
//! Only 401 triggers a retry. Other statuses are handed back untouched and
//! transport failures propagate immediately.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::session::{Credential, Session};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Wraps a [`Transport`] with the [`Session`]'s bearer credential.
pub struct AuthenticatedFetcher {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl AuthenticatedFetcher {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    /// The session this fetcher authenticates with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send `request` with transparent re-authentication.
    ///
    /// At most two requests reach the target endpoint and at most one extra
    /// login is attempted per call.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let credential = match self.session.current_credential() {
            Some(credential) => credential,
            None => self
                .session
                .login()
                .await
                .map_err(FetchError::Unauthenticated)?,
        };

        let response = self.send_with(&request, &credential).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(path = %request.path, "Credential rejected, logging in again");
        self.session.invalidate();

        let credential = self
            .session
            .login()
            .await
            .map_err(FetchError::Unauthenticated)?;

        let response = self.send_with(&request, &credential).await?;
        if response.status == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "Request still unauthorized after re-login");
        }
        Ok(response)
    }

    async fn send_with(
        &self,
        request: &ApiRequest,
        credential: &Credential,
    ) -> Result<ApiResponse, FetchError> {
        let mut request = request.clone();
        let value = credential
            .header_value()
            .map_err(FetchError::Unauthenticated)?;
        // Inserted last so caller-supplied headers cannot override it.
        request.headers.insert(AUTHORIZATION, value);

        debug!(method = %request.method, path = %request.path, "Sending request");
        Ok(self.transport.send(request).await?)
    }
}

impl std::fmt::Debug for AuthenticatedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedFetcher")
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceAccount;
    use crate::error::{AuthError, TransportError};
    use crate::session::LOGIN_PATH;
    use crate::testing::ScriptedTransport;
    use reqwest::header::HeaderValue;

    const STATUS: &str = "/api/status";

    fn fetcher(transport: &Arc<ScriptedTransport>) -> AuthenticatedFetcher {
        let session = Arc::new(Session::new(
            transport.clone(),
            ServiceAccount::new("fog_node", "pw"),
        ));
        AuthenticatedFetcher::new(transport.clone(), session)
    }

    #[tokio::test]
    async fn test_first_use_logs_in() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_json(STATUS, StatusCode::OK, "{}");
        let fetcher = fetcher(&transport);

        let response = fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        assert!(response.is_success());
        assert_eq!(transport.count(LOGIN_PATH), 1);
        assert_eq!(transport.bearer_tokens(STATUS), vec!["T1"]);
    }

    #[tokio::test]
    async fn test_existing_credential_is_reused() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.always_json(STATUS, StatusCode::OK, "{}");
        let fetcher = fetcher(&transport);

        fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        fetcher.request(ApiRequest::get(STATUS)).await.unwrap();

        assert_eq!(transport.count(LOGIN_PATH), 1);
        assert_eq!(transport.bearer_tokens(STATUS), vec!["T1", "T1"]);
    }

    #[tokio::test]
    async fn test_login_failure_skips_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::FORBIDDEN, "{}");
        let fetcher = fetcher(&transport);

        let err = fetcher.request(ApiRequest::get(STATUS)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Unauthenticated(AuthError::Rejected { status: 403 })
        );
        assert_eq!(transport.count(STATUS), 0);
    }

    #[tokio::test]
    async fn test_401_triggers_single_relogin_and_retry() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T2"}"#);
        transport.push_json(STATUS, StatusCode::UNAUTHORIZED, "{}");
        transport.push_json(STATUS, StatusCode::OK, r#"{"ok":true}"#);
        let fetcher = fetcher(&transport);

        let response = fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(transport.count(LOGIN_PATH), 2);
        assert_eq!(transport.bearer_tokens(STATUS), vec!["T1", "T2"]);
        assert_eq!(
            fetcher.session().current_credential().map(|c| c.token().to_string()),
            Some("T2".to_string())
        );
    }

    #[tokio::test]
    async fn test_persistent_401_is_bounded() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.always_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T2"}"#);
        transport.always_json(STATUS, StatusCode::UNAUTHORIZED, "{}");
        let fetcher = fetcher(&transport);

        let response = fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(transport.count(STATUS), 2);
        // Initial login plus exactly one re-login
        assert_eq!(transport.count(LOGIN_PATH), 2);
    }

    #[tokio::test]
    async fn test_relogin_failure_is_unauthenticated() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_json(LOGIN_PATH, StatusCode::UNAUTHORIZED, "{}");
        transport.push_json(STATUS, StatusCode::UNAUTHORIZED, "{}");
        let fetcher = fetcher(&transport);

        let err = fetcher.request(ApiRequest::get(STATUS)).await.unwrap_err();
        assert!(matches!(err, FetchError::Unauthenticated(_)));
        assert_eq!(transport.count(STATUS), 1);
        assert!(fetcher.session().current_credential().is_none());
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_json(STATUS, StatusCode::INTERNAL_SERVER_ERROR, "{}");
        transport.push_json(STATUS, StatusCode::FORBIDDEN, "{}");
        let fetcher = fetcher(&transport);

        let first = fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);
        let second = fetcher.request(ApiRequest::get(STATUS)).await.unwrap();
        assert_eq!(second.status, StatusCode::FORBIDDEN);

        assert_eq!(transport.count(STATUS), 2);
        assert_eq!(transport.count(LOGIN_PATH), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_error(STATUS, TransportError::Timeout);
        let fetcher = fetcher(&transport);

        let err = fetcher.request(ApiRequest::get(STATUS)).await.unwrap_err();
        assert_eq!(err, FetchError::Transport(TransportError::Timeout));
        assert_eq!(transport.count(STATUS), 1);
        assert_eq!(transport.count(LOGIN_PATH), 1);
    }

    #[tokio::test]
    async fn test_caller_cannot_override_authorization() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(LOGIN_PATH, StatusCode::OK, r#"{"token":"T1"}"#);
        transport.push_json(STATUS, StatusCode::OK, "{}");
        let fetcher = fetcher(&transport);

        let request = ApiRequest::get(STATUS)
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"));
        fetcher.request(request).await.unwrap();

        assert_eq!(transport.bearer_tokens(STATUS), vec!["T1"]);
    }
}
