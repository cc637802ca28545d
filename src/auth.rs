//! Credential loading. Pure plumbing: a bearer token is taken from the
//! environment, from a token file, or from the GCE metadata server, in that
//! order. Missing credentials are fatal before any reconciliation begins.

use serde::Deserialize;

use crate::{Error, Result};

pub const ACCESS_TOKEN_ENV: &str = "GCE_ACCESS_TOKEN";
pub const TOKEN_FILE_ENV: &str = "GCE_TOKEN_FILE";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// OAuth2 bearer token presented on every provider call.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn from_token<S: AsRef<str>>(token: S) -> Self {
        Self(token.as_ref().trim().to_owned())
    }

    /// Resolve a token from the environment, a token file, or the metadata
    /// server, in that order.
    pub async fn load() -> Result<Self> {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            return Ok(Self::from_token(token));
        }
        if let Ok(path) = std::env::var(TOKEN_FILE_ENV) {
            let token = std::fs::read_to_string(&path)
                .map_err(|e| Error::Auth(format!("reading token file {path}: {e}")))?;
            return Ok(Self::from_token(token));
        }
        Self::from_metadata_server().await
    }

    async fn from_metadata_server() -> Result<Self> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let res = reqwest::Client::new()
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| Error::Auth(format!("querying metadata server: {e}")))?;
        if !res.status().is_success() {
            return Err(Error::Auth(format!(
                "metadata server answered HTTP {}; set {} or {} when running off-GCE",
                res.status(),
                ACCESS_TOKEN_ENV,
                TOKEN_FILE_ENV
            )));
        }
        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| Error::Auth(format!("decoding metadata token: {e}")))?;
        Ok(Self::from_token(token.access_token))
    }

    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}
