//! Supabase identity provider adapter.
//!
//! Implements `IdentityProvider` against the Supabase GoTrue REST API:
//!
//! - `GET  {url}/auth/v1/user`   - identity behind the current access token
//! - `POST {url}/auth/v1/logout` - revoke the current session
//!
//! Every request carries the project's anon key in the `apikey` header and
//! the visitor's access token as a bearer token. The access token itself is
//! obtained by the hosted sign-in flow and handed to this adapter through
//! [`SupabaseIdentityProvider::set_access_token`]; each token change is
//! broadcast to session-change listeners.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, Identity, UserId};
use crate::domain::session::{AuthEvent, SessionChange};
use crate::ports::{IdentityProvider, SessionChangeHandler, Subscription};

use super::ListenerRegistry;

const USER_PATH: &str = "auth/v1/user";
const LOGOUT_PATH: &str = "auth/v1/logout";

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    project_url: Url,

    /// Public anon key sent as `apikey`.
    anon_key: SecretString,

    request_timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(project_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            project_url,
            anon_key: SecretString::new(anon_key.into()),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let mut base = self.project_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| AuthError::service_unavailable(format!("Invalid auth URL: {}", e)))
    }
}

/// User object as returned by `GET /auth/v1/user`.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: SupabaseUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct SupabaseUserMetadata {
    full_name: Option<String>,
    name: Option<String>,
}

/// Maps a `GET /auth/v1/user` response to an identity.
///
/// 401 and 403 mean the token no longer identifies anyone, which is a
/// normal "no session" answer rather than a failure.
pub(crate) fn parse_user_response(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<Identity>, AuthError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Ok(None);
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AuthError::service_unavailable(format!(
            "auth endpoint returned {}",
            status
        )));
    }
    if !status.is_success() {
        return Err(AuthError::MalformedResponse(format!(
            "unexpected status {}",
            status
        )));
    }

    let user: SupabaseUser = serde_json::from_slice(body)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    let id = UserId::new(user.id).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    Ok(Some(Identity {
        id,
        email: user.email.filter(|e| !e.is_empty()),
        display_name: user.user_metadata.full_name.or(user.user_metadata.name),
    }))
}

/// Supabase-backed identity provider.
pub struct SupabaseIdentityProvider {
    config: SupabaseConfig,
    http_client: reqwest::Client,
    access_token: RwLock<Option<SecretString>>,
    listeners: ListenerRegistry,
}

impl SupabaseIdentityProvider {
    pub fn new(config: SupabaseConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            access_token: RwLock::new(None),
            listeners: ListenerRegistry::new(),
        })
    }

    /// Starts with an access token already known (e.g. restored from storage).
    ///
    /// No notification is emitted.
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.store_token(Some(SecretString::new(token.into())));
        self
    }

    /// Installs a freshly issued access token and broadcasts `SIGNED_IN`.
    pub async fn set_access_token(
        &self,
        token: impl Into<String>,
    ) -> Result<Option<Identity>, AuthError> {
        self.replace_token(token.into(), AuthEvent::SignedIn).await
    }

    /// Installs a refreshed access token and broadcasts `TOKEN_REFRESHED`.
    pub async fn refresh_access_token(
        &self,
        token: impl Into<String>,
    ) -> Result<Option<Identity>, AuthError> {
        self.replace_token(token.into(), AuthEvent::TokenRefreshed).await
    }

    async fn replace_token(
        &self,
        token: String,
        event: AuthEvent,
    ) -> Result<Option<Identity>, AuthError> {
        let token = SecretString::new(token);
        let identity = self.fetch_user(&token).await?;

        // A token that resolves to nobody is no session at all.
        let (event, stored) = match identity {
            Some(_) => (event, Some(token)),
            None => (AuthEvent::SignedOut, None),
        };
        self.store_token(stored);
        self.listeners
            .emit(SessionChange::new(event, identity.clone()));
        Ok(identity)
    }

    fn store_token(&self, token: Option<SecretString>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn take_token(&self) -> Option<SecretString> {
        self.access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn current_token(&self) -> Option<SecretString> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn fetch_user(&self, token: &SecretString) -> Result<Option<Identity>, AuthError> {
        let url = self.config.endpoint(USER_PATH)?;
        tracing::debug!(%url, "Fetching current user");

        let response = self
            .http_client
            .get(url)
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Auth user request failed");
                AuthError::service_unavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        parse_user_response(status, &body)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        match self.current_token() {
            Some(token) => self.fetch_user(&token).await,
            None => Ok(None),
        }
    }

    fn on_session_change(&self, handler: SessionChangeHandler) -> Subscription {
        self.listeners.register(handler)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // The local session ends even if revoking it remotely fails.
        let token = self.take_token();
        self.listeners.emit(SessionChange::signed_out());

        let Some(token) = token else {
            return Ok(());
        };

        let url = self.config.endpoint(LOGOUT_PATH)?;
        let response = self
            .http_client
            .post(url)
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Logout request failed");
                AuthError::service_unavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            tracing::info!("Signed out");
            Ok(())
        } else {
            tracing::warn!(%status, "Logout endpoint rejected request");
            Err(AuthError::service_unavailable(format!(
                "logout returned {}",
                status
            )))
        }
    }
}
