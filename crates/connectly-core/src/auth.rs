//! Authentication client for the Connectly server.
//!
//! Submits credentials to `POST /api/auth/login` and `/api/auth/register`
//! and maps the response into a [`Token`] or an [`AuthError`]. The client
//! never writes the session store itself; the caller applies the token so
//! the store is always updated before any navigation the response triggers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;

/// Minimum password length accepted before a request is attempted.
const MIN_PASSWORD_LEN: usize = 6;

/// Minimum first/last name length accepted before a request is attempted.
const MIN_NAME_LEN: usize = 2;

/// An issued session token. Opaque; never logged or displayed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.0.chars().take(4).collect::<String>();
        write!(f, "Token({shown}…)")
    }
}

/// Categories of authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The remote service rejected the credentials (4xx). Carries the
    /// human-readable message from the response body.
    InvalidCredentials(String),
    /// Transport failure or no usable response from the service.
    Network(String),
    /// Local precondition failed; nothing was sent over the network.
    Validation(String),
    /// Success status whose body did not parse as the token envelope.
    MalformedResponse(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials(msg) => write!(f, "authentication rejected: {msg}"),
            AuthError::Network(msg) => write!(f, "network failure: {msg}"),
            AuthError::Validation(msg) => write!(f, "validation error: {msg}"),
            AuthError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Result type for authentication operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Login credentials as entered on the login screen.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Email (or username) identifying the account.
    pub email: String,
    pub password: String,
}

impl Credentials {
    fn validate(&self) -> AuthResult<()> {
        if self.email.trim().is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

/// Registration form data. `confirm_password` never leaves the client.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Local, synchronous precondition checks mirroring the registration
    /// form validators. Runs before any network call is attempted.
    fn validate(&self) -> AuthResult<()> {
        if self.first_name.trim().len() < MIN_NAME_LEN {
            return Err(AuthError::Validation(format!(
                "first name must be at least {MIN_NAME_LEN} characters"
            )));
        }
        if self.last_name.trim().len() < MIN_NAME_LEN {
            return Err(AuthError::Validation(format!(
                "last name must be at least {MIN_NAME_LEN} characters"
            )));
        }
        if !self.email.contains('@') {
            return Err(AuthError::Validation("email is not valid".to_string()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation(
                "passwords do not match".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Success envelope returned by the authentication endpoints.
#[derive(Deserialize)]
struct TokenEnvelope {
    token: Option<String>,
}

/// A successful authentication outcome.
///
/// `attempt` is the monotonic id of the request that produced the token;
/// a caller juggling overlapping submissions keeps only the highest one
/// and discards stale completions.
#[derive(Debug)]
pub struct Issued {
    pub token: Token,
    pub attempt: u64,
}

/// Connection settings for the authentication client.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl AuthConfig {
    /// Builds the auth configuration from the loaded client config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url(),
            timeout: config.server.timeout(),
        }
    }
}

/// HTTP client for the remote authentication service.
pub struct AuthClient {
    base: Url,
    http: reqwest::Client,
    attempts: AtomicU64,
}

impl AuthClient {
    /// Creates a new client.
    pub fn new(config: AuthConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid server url: {}", config.base_url))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            base,
            http,
            attempts: AtomicU64::new(0),
        })
    }

    /// Authenticates against the server. No automatic retry; the caller
    /// owns retry policy and applies the token to the session store.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult<Issued> {
        credentials.validate()?;
        let attempt = self.next_attempt();
        tracing::debug!(attempt, email = %credentials.email, "submitting login");
        let payload = LoginPayload {
            email: &credentials.email,
            password: &credentials.password,
        };
        let token = self.submit("/api/auth/login", &payload).await?;
        Ok(Issued { token, attempt })
    }

    /// Registers a new account. Fails with [`AuthError::Validation`] before
    /// any network call when the local form checks fail (in particular a
    /// password/confirmation mismatch).
    pub async fn register(&self, registration: &Registration) -> AuthResult<Issued> {
        registration.validate()?;
        let attempt = self.next_attempt();
        tracing::debug!(attempt, email = %registration.email, "submitting registration");
        let payload = RegisterPayload {
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            email: &registration.email,
            password: &registration.password,
        };
        let token = self.submit("/api/auth/register", &payload).await?;
        Ok(Issued { token, attempt })
    }

    /// Returns the id of the most recently started attempt.
    pub fn latest_attempt(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn next_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn submit<T: Serialize>(&self, path: &str, payload: &T) -> AuthResult<Token> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AuthError::Network(format!("invalid endpoint {path}: {e}")))?;
        let response = self
            .http
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Network(format!("reading response body failed: {e}")))?;

        if status.is_success() {
            parse_token_envelope(&body)
        } else if status.is_client_error() {
            let message = if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.trim().to_string()
            };
            Err(AuthError::InvalidCredentials(message))
        } else {
            Err(AuthError::Network(format!(
                "HTTP {} from {url}",
                status.as_u16()
            )))
        }
    }
}

/// Parses a 2xx response body as the `{"token": "..."}` envelope.
///
/// A success status with an unparsable body surfaces as
/// [`AuthError::MalformedResponse`], never a panic.
fn parse_token_envelope(body: &str) -> AuthResult<Token> {
    let envelope: TokenEnvelope = serde_json::from_str(body)
        .map_err(|e| AuthError::MalformedResponse(format!("token envelope: {e}")))?;
    match envelope.token {
        Some(token) if !token.trim().is_empty() => Ok(Token::new(token)),
        _ => Err(AuthError::MalformedResponse(
            "token field missing or empty".to_string(),
        )),
    }
}
