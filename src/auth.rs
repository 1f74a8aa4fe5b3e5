//! Service account authentication for Google APIs, with an on-disk
//! token cache so repeated runs skip the token exchange.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::models::{ServiceAccountCredentials, StoredToken, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only metadata scope; enough for list and get calls.
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.metadata.readonly";

/// Refresh this many seconds before the token actually expires.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at > SystemTime::now() + EXPIRY_BUFFER
    }
}

/// Authenticator for Google APIs using service account credentials.
///
/// Cloning is cheap; all clones share the same cached token, so the
/// resolve-phase workers reuse one session.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<ServiceAccountCredentials>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    token_cache_path: Option<PathBuf>,
}

impl Authenticator {
    /// Create a new authenticator from a service account JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)?;
        Ok(Self::new(credentials))
    }

    /// Create a new authenticator from credentials.
    pub fn new(credentials: ServiceAccountCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
            token_cache_path: None,
        }
    }

    /// Persist tokens to `path` and reuse them across runs while valid.
    pub fn with_token_cache<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

    /// Get a valid access token: in-memory cache, then the on-disk
    /// cache, then a fresh token exchange.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_valid() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = match self.load_stored_token() {
            Some(token) => {
                debug!("reusing cached token from disk");
                token
            }
            None => {
                let token = self.refresh_token().await?;
                self.store_token(&token);
                token
            }
        };

        let mut cached = self.cached_token.write().await;
        *cached = Some(new_token.clone());

        Ok(new_token.access_token)
    }

    /// Read the on-disk cache; returns None if the file is missing,
    /// unparseable, or the token is stale.
    fn load_stored_token(&self) -> Option<CachedToken> {
        let path = self.token_cache_path.as_ref()?;
        let content = fs::read_to_string(path).ok()?;
        let stored: StoredToken = serde_json::from_str(&content).ok()?;

        let token = CachedToken {
            access_token: stored.access_token,
            expires_at: UNIX_EPOCH + Duration::from_secs(stored.expires_at),
        };
        token.is_valid().then_some(token)
    }

    /// Best-effort write of the token cache; failure is logged, not fatal.
    fn store_token(&self, token: &CachedToken) {
        let Some(path) = self.token_cache_path.as_ref() else {
            return;
        };

        let expires_at = token
            .expires_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let stored = StoredToken {
            access_token: token.access_token.clone(),
            expires_at,
        };

        match serde_json::to_string(&stored) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!(path = %path.display(), error = %e, "failed to write token cache");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize token cache"),
        }
    }

    fn token_uri(&self) -> &str {
        self.credentials.token_uri.as_deref().unwrap_or(TOKEN_URI)
    }

    /// Mint a JWT assertion and exchange it for an access token.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ReportError::TokenRefreshError(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.token_uri().to_string(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .client
            .post(self.token_uri())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
