//! Bearer tokens for Google API calls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use hammers_core::remote::RemoteError;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::app_config::{AppConfig, base_dir};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Supplies the bearer token for each API call.
#[allow(async_fn_in_trait)]
pub trait AccessTokenSource {
    async fn access_token(&self) -> Result<String, RemoteError>;
}

/// A fixed token, e.g. one minted by another tool.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl AccessTokenSource for BearerToken {
    async fn access_token(&self) -> Result<String, RemoteError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(EXPIRY_SKEW_SECS)
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// OAuth error body, e.g. `{"error": "invalid_grant"}`.
#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
}

/// A saved OAuth session that refreshes its access token when it expires.
pub struct Session {
    path: PathBuf,
    app_config: AppConfig,
    http: reqwest::Client,
    token_url: String,
    data: Mutex<SessionData>,
}

impl Session {
    pub fn default_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("session.toml"))
    }

    pub fn new(path: PathBuf, app_config: AppConfig, data: SessionData) -> Self {
        Session {
            path,
            app_config,
            http: reqwest::Client::new(),
            token_url: TOKEN_URL.to_string(),
            data: Mutex::new(data),
        }
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn load(app_config: AppConfig) -> Result<Self> {
        Self::load_from(&Self::default_path()?, app_config)
    }

    pub fn load_from(path: &Path, app_config: AppConfig) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session not found at {}.\n\n\
                Save access_token, refresh_token and expires_at there after authorising.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Self::new(path.to_path_buf(), app_config, data))
    }

    fn save(path: &Path, data: &SessionData) -> Result<()> {
        let contents = toml::to_string_pretty(data).context("Failed to serialize session")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Owner-only: the file holds OAuth tokens.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    async fn refresh(&self, data: &mut SessionData) -> Result<(), RemoteError> {
        info!("Refreshing Google access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.app_config.client_id.as_str()),
                ("client_secret", self.app_config.client_secret.as_str()),
                ("refresh_token", data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::transport("POST", &self.token_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let revoked = serde_json::from_str::<TokenErrorResponse>(&body)
                .is_ok_and(|e| e.error == "invalid_grant");
            let message = if revoked {
                format!(
                    "Google revoked the refresh token (invalid_grant). Authorise again and \
                    save the new tokens to {}.",
                    self.path.display()
                )
            } else {
                format!("Token refresh failed with {status}: {body}")
            };
            return Err(RemoteError::transport("POST", &self.token_url, message));
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            RemoteError::transport(
                "POST",
                &self.token_url,
                format!("Malformed token response: {e}"),
            )
        })?;

        data.access_token = refreshed.access_token;
        data.expires_at = Utc::now() + Duration::seconds(refreshed.expires_in);
        // Google usually keeps the old refresh token.
        if let Some(refresh_token) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
            data.refresh_token = refresh_token;
        }

        if let Err(err) = Self::save(&self.path, data) {
            warn!(error = %err, "Could not save refreshed Google session");
        }

        Ok(())
    }
}

impl AccessTokenSource for Session {
    async fn access_token(&self) -> Result<String, RemoteError> {
        let mut data = self.data.lock().await;
        if data.is_expired(Utc::now()) {
            self.refresh(&mut data).await?;
        }
        Ok(data.access_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn data(expires_at: DateTime<Utc>) -> SessionData {
        SessionData {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
        }
    }

    fn app_config() -> AppConfig {
        AppConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_token_counts_as_expired_shortly_before_expiry() {
        let now = Utc::now();
        assert!(data(now - Duration::seconds(1)).is_expired(now));
        assert!(data(now + Duration::seconds(30)).is_expired(now));
        assert!(!data(now + Duration::minutes(10)).is_expired(now));
    }

    #[tokio::test]
    async fn test_fresh_token_is_used_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(
            dir.path().join("session.toml"),
            app_config(),
            data(Utc::now() + Duration::hours(1)),
        );

        assert_eq!(session.access_token().await.unwrap(), "access");
    }

    #[test]
    fn test_save_then_load_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google").join("session.toml");
        let saved = data(Utc::now());

        Session::save(&path, &saved).unwrap();
        let loaded = Session::load_from(&path, app_config()).unwrap();

        assert_eq!(loaded.data.into_inner().refresh_token, "refresh");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_saved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        let session = Session::new(path.clone(), app_config(), data(Utc::now()))
            .with_token_url(format!("{}/token", server.uri()));

        assert_eq!(session.access_token().await.unwrap(), "renewed");
        // Still fresh, so no second refresh.
        assert_eq!(session.access_token().await.unwrap(), "renewed");

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("renewed"));
        assert!(saved.contains("refresh_token = \"refresh\""));
    }

    #[tokio::test]
    async fn test_revoked_refresh_token_asks_for_new_authorisation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked.",
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("session.toml"), app_config(), data(Utc::now()))
            .with_token_url(format!("{}/token", server.uri()));

        let err = session.access_token().await.unwrap_err();

        assert_eq!(err.method, "POST");
        assert!(err.message.contains("invalid_grant"));
        assert!(err.message.contains("Authorise again"));
    }

    #[tokio::test]
    async fn test_other_refresh_failures_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("session.toml"), app_config(), data(Utc::now()))
            .with_token_url(format!("{}/token", server.uri()));

        let err = session.access_token().await.unwrap_err();

        assert!(err.message.contains("500"));
        assert!(err.message.contains("backend down"));
        assert!(!err.message.contains("Authorise again"));
    }

    #[tokio::test]
    async fn test_bearer_token_is_returned_as_is() {
        let token = BearerToken("ya29.token".to_string());
        assert_eq!(token.access_token().await.unwrap(), "ya29.token");
    }
}
