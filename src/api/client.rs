//
//  deployer-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Gateway for the Deployer API
//!
//! This module provides [`DeployerClient`], the single point of HTTP execution for
//! the Deployer API, together with the session token handling built on it.
//!
//! ## Features
//!
//! - Path normalization to `api/<resource>.json`
//! - Lazy login and `auth_token` injection
//! - Query parameters for reads, JSON bodies for writes
//! - Transport failures wrapped with method and path
//! - Order-preserving JSON decoding of 200 responses
//!
//! ## Status Handling
//!
//! Only HTTP 200 carries data. Any other status yields `Ok(None)` and a warning in
//! the log; callers treat it like an empty result.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::common::{query_pairs, DeployerError, LoginResponse, Params};
use crate::auth::Session;
use crate::config::{CategoryResolver, EnvironmentConfig, StaticCategories};

/// Response format extension appended to every resource path.
pub const EXTENSION: &str = "json";

/// Parameter carrying the session token.
pub const AUTH_TOKEN_PARAM: &str = "auth_token";

/// HTTP methods accepted by the gateway.
///
/// Parsing is case-insensitive; any other method is rejected with
/// [`DeployerError::InvalidArgument`].
///
/// # Example
///
/// ```rust
/// use deployer_client::api::Method;
///
/// assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
/// assert!("patch".parse::<Method>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Options,
        Method::Head,
    ];

    /// Whether parameters travel in the request body rather than the query.
    pub fn sends_body(self) -> bool {
        matches!(self, Method::Put | Method::Post)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

impl FromStr for Method {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "put" => Ok(Method::Put),
            "post" => Ok(Method::Post),
            "delete" => Ok(Method::Delete),
            "options" => Ok(Method::Options),
            "head" => Ok(Method::Head),
            _ => Err(DeployerError::InvalidArgument(format!(
                "Unknown request method: {s}"
            ))),
        }
    }
}

/// Normalizes a resource path to `api/<path>.json`.
///
/// Paths that already contain an `/api/` segment (or start with `api/`) are not
/// prefixed again, and the extension is appended exactly once.
///
/// # Example
///
/// ```rust
/// use deployer_client::api::client::normalize_path;
///
/// assert_eq!(normalize_path("projects"), "api/projects.json");
/// assert_eq!(normalize_path("/api/projects/3"), "api/projects/3.json");
/// assert_eq!(normalize_path("api/projects.json"), "api/projects.json");
/// ```
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    let mut normalized = if path.contains("/api/") || trimmed.starts_with("api/") {
        trimmed.to_string()
    } else {
        format!("api/{trimmed}")
    };
    let suffix = format!(".{EXTENSION}");
    if !normalized.ends_with(&suffix) {
        normalized.push_str(&suffix);
    }
    normalized
}

/// The HTTP client for the Deployer API.
///
/// One client serves one organization: it owns the [`Session`] whose token it
/// injects into every authenticated request.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use deployer_client::DeployerClient;
/// use deployer_client::auth::{KeyringCipher, Session};
/// use deployer_client::Organization;
///
/// let session = Session::new(Organization::default(), Arc::new(KeyringCipher::new()));
/// let client = DeployerClient::with_urls(
///     "https://deployer.example.com",
///     "https://deploy.example.com",
///     Duration::from_secs(30),
///     session,
/// )?;
/// # Ok::<(), deployer_client::DeployerError>(())
/// ```
pub struct DeployerClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL of the REST API
    base_url: String,
    /// Base URL of the browser deploy flow
    deploy_base_url: String,
    /// Authentication state for the organization
    session: Session,
    /// Lookup for free-form target type references
    categories: Arc<dyn CategoryResolver>,
}

impl DeployerClient {
    /// Creates a client from an environment configuration block.
    pub fn new(environment: &EnvironmentConfig, session: Session) -> Result<Self, DeployerError> {
        Self::with_urls(
            &environment.url,
            &environment.deploy,
            Duration::from_secs(environment.timeout_secs),
            session,
        )
    }

    /// Creates a client from explicit base URLs and request timeout.
    pub fn with_urls(
        base_url: &str,
        deploy_base_url: &str,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, DeployerError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| DeployerError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            deploy_base_url: deploy_base_url.trim_end_matches('/').to_string(),
            session,
            categories: Arc::new(StaticCategories::default()),
        })
    }

    /// Sets the resolver used for target types outside the fixed set.
    pub fn with_categories(mut self, categories: Arc<dyn CategoryResolver>) -> Self {
        self.categories = categories;
        self
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The configured category resolver.
    pub fn categories(&self) -> &dyn CategoryResolver {
        self.categories.as_ref()
    }

    /// Base URL of the REST API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL of the browser deploy flow.
    pub fn deploy_base_url(&self) -> &str {
        &self.deploy_base_url
    }

    /// Full URL for a resource path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, normalize_path(path))
    }

    /// Performs a request against the Deployer API.
    ///
    /// # Parameters
    ///
    /// * `method` - One of `get`, `put`, `post`, `delete`, `options`, `head`
    /// * `path` - Resource path, e.g. `org_deploy_target/4`
    /// * `params` - Query parameters for reads, JSON body for writes
    /// * `skip_auth` - Send without the session token
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` for a 200 response (`Value::Null` for an empty body)
    /// - `Ok(None)` for any other status
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an unsupported method, before any network call
    /// - `Authentication` when a token is needed and login fails
    /// - `Transport` for connection-level failures
    /// - `Decode` when a 200 body is not JSON
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        params: Params,
        skip_auth: bool,
    ) -> Result<Option<Value>, DeployerError> {
        let method = method.parse::<Method>()?;
        self.execute(method, path, params, skip_auth).await
    }

    /// Typed-method form of [`request`](Self::request).
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        mut params: Params,
        skip_auth: bool,
    ) -> Result<Option<Value>, DeployerError> {
        if !skip_auth {
            let token = self.token().await?;
            params.insert(AUTH_TOKEN_PARAM.to_string(), Value::String(token));
        }
        self.send(method, path, &params).await
    }

    /// Dispatches a request as-is, with no token handling.
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<Option<Value>, DeployerError> {
        let url = self.api_url(path);
        debug!(%method, %url, "deployer request");

        let request = self.http.request(method.as_reqwest(), &url);
        let request = if method.sends_body() {
            request.json(params)
        } else {
            request.query(&query_pairs(params))
        };

        let transport = |source| DeployerError::Transport {
            method,
            path: path.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%method, path, %status, "deployer request returned no data");
            return Ok(None);
        }

        let body = response.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| DeployerError::Decode {
                method,
                path: path.to_string(),
                source,
            })
    }

    /// Returns the session token, logging in on first use.
    ///
    /// The session lock is held across the login, so concurrent callers wait for
    /// one login instead of starting their own.
    ///
    /// # Errors
    ///
    /// [`DeployerError::Authentication`] when credentials are missing or the API
    /// returns no token.
    pub async fn token(&self) -> Result<String, DeployerError> {
        let mut cached = self.session.lock_token().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        match self.authenticate(None, None).await? {
            Some(token) => {
                *cached = Some(token.clone());
                Ok(token)
            }
            None => Err(self.session.authentication_error()),
        }
    }

    /// Logs in and caches the resulting token.
    ///
    /// # Parameters
    ///
    /// * `login` - Replaces the stored login for this attempt
    /// * `password` - Replaces the decrypted stored password for this attempt
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))` on success
    /// - `Ok(None)` without any request when the organization has no stored login
    ///   or password, or when the response carries no token
    pub async fn login(
        &self,
        login: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<String>, DeployerError> {
        let token = self.authenticate(login, password).await?;
        if let Some(token) = &token {
            *self.session.lock_token().await = Some(token.clone());
        }
        Ok(token)
    }

    async fn authenticate(
        &self,
        login: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<String>, DeployerError> {
        let Some(credentials) = self.session.credentials(login, password)? else {
            debug!(
                organization = %self.session.organization().name,
                "no stored deployer credentials"
            );
            return Ok(None);
        };

        let mut params = Params::new();
        params.insert("login".to_string(), Value::String(credentials.login));
        params.insert("password".to_string(), Value::String(credentials.password));

        let body = self.send(Method::Get, "sessions/get", &params).await?;
        let token = LoginResponse::token(body);
        if token.is_none() {
            warn!(
                organization = %self.session.organization().name,
                "login response carried no auth token"
            );
        }
        Ok(token)
    }
}

impl fmt::Debug for DeployerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployerClient")
            .field("base_url", &self.base_url)
            .field("deploy_base_url", &self.deploy_base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client, client_with_token, organization};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_normalize_path_appends_extension_once() {
        for path in ["projects", "/projects", "api/projects", "/api/projects", "projects.json"] {
            let normalized = normalize_path(path);
            assert_eq!(normalized, "api/projects.json", "for {path}");
            assert_eq!(normalized.matches(".json").count(), 1);
        }
    }

    #[test]
    fn test_method_parsing() {
        for method in Method::ALL {
            let parsed: Method = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
        assert!(matches!(
            "patch".parse::<Method>(),
            Err(DeployerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_every_method_builds_one_extension() {
        let mut server = mockito::Server::new_async().await;
        let client = client_with_token(&server, organization(5), "T");

        for method in Method::ALL {
            let mock = server
                .mock(&method.to_string(), "/api/org_deploy_target/4.json")
                .match_query(Matcher::Any)
                .with_status(200)
                .expect(1)
                .create_async()
                .await;
            let result = client
                .request(&method.to_string().to_lowercase(), "/api/org_deploy_target/4", Params::new(), false)
                .await
                .unwrap();
            assert_eq!(result, Some(Value::Null));
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_unknown_method_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let any_get = server.mock("GET", Matcher::Any).expect(0).create_async().await;
        let any_patch = server.mock("PATCH", Matcher::Any).expect(0).create_async().await;
        let client = client(&server, organization(5));

        let err = client
            .request("patch", "projects", Params::new(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployerError::InvalidArgument(_)));
        any_get.assert_async().await;
        any_patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_sends_token_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "shop".into()),
                Matcher::UrlEncoded("auth_token".into(), "T".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"projects": [{"id": 1, "name": "shop"}]}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let mut params = Params::new();
        params.insert("name".into(), json!("shop"));
        let body = client.execute(Method::Get, "projects", params, false).await.unwrap();

        assert_eq!(body, Some(json!({"projects": [{"id": 1, "name": "shop"}]})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/projects.json")
            .match_body(Matcher::PartialJson(json!({"name": "shop", "auth_token": "T"})))
            .with_status(200)
            .with_body(r#"{"project": {"id": 9}}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let mut params = Params::new();
        params.insert("name".into(), json!("shop"));
        let body = client.execute(Method::Post, "projects", params, false).await.unwrap();

        assert_eq!(body, Some(json!({"project": {"id": 9}})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_200_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": "missing"}"#)
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let body = client.execute(Method::Get, "projects", Params::new(), false).await.unwrap();

        assert_eq!(body, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/projects.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<projects/>")
            .create_async()
            .await;
        let client = client_with_token(&server, organization(5), "T");

        let err = client
            .execute(Method::Get, "projects", Params::new(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployerError::Decode { method: Method::Get, .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let session = Session::new(organization(5), Arc::new(crate::testing::PlainCipher))
            .with_token("T");
        let client =
            DeployerClient::with_urls("http://127.0.0.1:9", "http://127.0.0.1:9", Duration::from_secs(2), session)
                .unwrap();

        let err = client
            .execute(Method::Delete, "projects/3", Params::new(), false)
            .await
            .unwrap_err();

        match err {
            DeployerError::Transport { method, path, .. } => {
                assert_eq!(method, Method::Delete);
                assert_eq!(path, "projects/3");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_without_credentials_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let any = server.mock("GET", Matcher::Any).expect(0).create_async().await;
        let mut org = organization(5);
        org.deploy_password = None;
        let client = client(&server, org);

        assert_eq!(client.login(None, None).await.unwrap(), None);
        assert!(matches!(
            client.token().await,
            Err(DeployerError::Authentication { organization }) if organization == "acme"
        ));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_logs_in_once() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("GET", "/api/sessions/get.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("login".into(), "acme-login".into()),
                Matcher::UrlEncoded("password".into(), "s3cret".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"hash": {"auth_token": "T"}}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client(&server, organization(5));

        assert_eq!(client.token().await.unwrap(), "T");
        assert_eq!(client.token().await.unwrap(), "T");
        assert_eq!(client.session().cached_token().await, Some("T".to_string()));
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_concurrent_token_calls_share_one_login() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("GET", "/api/sessions/get.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"hash": {"auth_token": "T"}}"#)
            .expect(1)
            .create_async()
            .await;
        let client = client(&server, organization(5));

        let (a, b, c) = tokio::join!(client.token(), client.token(), client.token());

        assert_eq!(a.unwrap(), "T");
        assert_eq!(b.unwrap(), "T");
        assert_eq!(c.unwrap(), "T");
        login.assert_async().await;
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new(organization(5), Arc::new(crate::testing::PlainCipher))
            .with_token("secret-token");
        let client = DeployerClient::with_urls(
            "https://deployer.example.test",
            "https://deploy.example.test",
            Duration::from_secs(5),
            session,
        )
        .unwrap();

        let debug = format!("{client:?}");
        assert!(debug.contains("deployer.example.test"));
        assert!(!debug.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_login_rejects_unexpected_shape() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/sessions/get.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"["not", "a", "mapping"]"#)
            .create_async()
            .await;
        let client = client(&server, organization(5));

        assert_eq!(client.login(None, None).await.unwrap(), None);
        assert_eq!(client.session().cached_token().await, None);
    }
}
