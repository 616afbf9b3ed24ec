//! Service-account credentials and access tokens

use std::path::Path;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{SheetsError, SheetsResult};

/// OAuth scope granting spreadsheet read/write
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Token endpoint used when the key does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each access token
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A Google service-account key document
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Key type; must be "service_account" when present
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
    /// Identifier of the private key, sent as the JWT `kid`
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Service account identity
    pub client_email: String,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse and sanity-check a key document
    pub fn from_json(json: &str) -> SheetsResult<Self> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| SheetsError::Auth(format!("malformed credential document: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    /// Read a key document from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> SheetsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SheetsError::Auth(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_json(&json)
    }

    fn validate(&self) -> SheetsResult<()> {
        if let Some(kind) = &self.key_type {
            if kind != "service_account" {
                return Err(SheetsError::Auth(format!("expected a service_account key, got '{kind}'")));
            }
        }
        if self.client_email.trim().is_empty() {
            return Err(SheetsError::Auth("client_email is empty".into()));
        }
        self.encoding_key()?;
        Ok(())
    }

    fn encoding_key(&self) -> SheetsResult<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SheetsError::Auth(format!("private key is not a valid RSA PEM: {e}")))
    }

    /// Signed JWT assertion for the token exchange
    pub fn assertion(&self, scope: &str, issued_at: i64) -> SheetsResult<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = Claims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };

        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding_key()?)?)
    }

    /// Exchange a signed assertion for a bearer token
    pub fn fetch_token(&self, client: &reqwest::blocking::Client) -> SheetsResult<AccessToken> {
        let assertion = self.assertion(SPREADSHEETS_SCOPE, chrono::Utc::now().timestamp())?;
        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SheetsError::Auth(format!("token request rejected ({status}): {body}")));
        }

        let token: TokenResponse = response.json()?;
        tracing::debug!("Obtained access token for {}", self.client_email);
        Ok(AccessToken::new(token.access_token, Duration::from_secs(token.expires_in)))
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    TOKEN_LIFETIME_SECS as u64
}

/// A bearer token and when it stops being usable
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    /// Token valid for `lifetime` from now
    pub fn new(value: String, lifetime: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + lifetime,
        }
    }

    /// Bearer value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the token should be replaced before use at `now`
    pub fn is_stale(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN >= self.expires_at
    }
}
