//! OAuth2 access tokens for Google APIs via the JWT-bearer grant.

use async_trait::async_trait;
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::credentials::ServiceAccountCredentials;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;

/// Scopes needed to send FCM messages and read Firestore documents
pub const FIREBASE_SCOPES: &str =
    "https://www.googleapis.com/auth/firebase.messaging https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Cached tokens are refreshed this long before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Anything that can hand out a bearer token for Google APIs
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS > now
    }
}

/// Exchanges RS256-signed service-account assertions for access tokens.
///
/// The token is cached and reused until shortly before it expires. The cache
/// lock is held across the exchange, so concurrent callers wait for a single
/// in-flight request instead of each starting their own.
pub struct ServiceAccountTokenProvider {
    client_email: String,
    token_uri: String,
    header: Header,
    encoding_key: EncodingKey,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    /// Parses the private key up front so a bad key fails at startup
    pub fn new(credentials: &ServiceAccountCredentials) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| AppError::Configuration {
                key: "firebase.private_key".to_string(),
                source: anyhow::anyhow!("Invalid RSA private key: {}", e),
            })?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = credentials.private_key_id.clone();

        Ok(Self {
            client_email: credentials.client_email.clone(),
            token_uri: credentials.token_uri.clone(),
            header,
            encoding_key,
            cache: Mutex::new(None),
        })
    }

    fn sign_assertion(&self, now: i64) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            scope: FIREBASE_SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        encode(&self.header, &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to sign service-account assertion: {}", e),
        })
    }

    async fn exchange(&self, now: i64) -> AppResult<CachedToken> {
        let assertion = self.sign_assertion(now)?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = HTTP_CLIENT
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::provider("oauth", None, format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(TokenErrorResponse {
                    error,
                    error_description: Some(description),
                }) => format!("{}: {}", error, description),
                Ok(TokenErrorResponse { error, .. }) => error,
                Err(_) => body,
            };

            return Err(AppError::provider(
                "oauth",
                Some(status.as_u16()),
                format!("Token request failed with status {}: {}", status.as_u16(), detail),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::provider("oauth", Some(status.as_u16()), format!("Invalid token response: {}", e))
        })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        let mut cache = self.cache.lock().await;
        let now = Timestamp::now().as_second();

        if let Some(cached) = cache.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.access_token.clone());
        }

        tracing::debug!(client_email = %self.client_email, "Requesting Google access token");
        let fresh = self.exchange(now).await?;
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);

        Ok(access_token)
    }
}

/// Fixed token, for wiring clients against mock servers
#[cfg(test)]
pub struct StaticTokenSource(pub String);

#[cfg(test)]
#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.0.clone())
    }
}
