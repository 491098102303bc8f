//! Veracode HMAC request signing
//!
//! Every API request carries an `Authorization` header of the form
//! `VERACODE-HMAC-SHA-256 id=<key id>,ts=<millis>,nonce=<hex>,sig=<hex>`.
//! The signature is an HMAC-SHA-256 chain keyed by the hex-decoded API secret:
//!
//! ```text
//! key_nonce = HMAC(secret, nonce)
//! key_date  = HMAC(key_nonce, ts)
//! key_sig   = HMAC(key_date, "vcode_request_version_1")
//! sig       = HMAC(key_sig, "id=<id>&host=<host>&url=<path?query>&method=<METHOD>")
//! ```

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Method, Url};
use sha2::Sha256;

use crate::config::Credentials;
use crate::error::{ApiError, Result};

type HmacSha256 = Hmac<Sha256>;

const AUTH_SCHEME: &str = "VERACODE-HMAC-SHA-256";
const REQUEST_VERSION: &[u8] = b"vcode_request_version_1";
const NONCE_SIZE: usize = 16;

/// Signs requests with Veracode API credentials
#[derive(Debug, Clone)]
pub struct HmacSigner {
    key_id: String,
    secret: Vec<u8>,
}

impl HmacSigner {
    /// Create a signer, decoding the hex API secret.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let secret = hex::decode(credentials.signing_key_secret()).map_err(|e| {
            ApiError::Signing(format!("API key secret is not valid hex: {}", e))
        })?;

        Ok(Self {
            key_id: credentials.signing_key_id().to_string(),
            secret,
        })
    }

    /// Build the `Authorization` header value for a request.
    pub fn authorization(&self, method: &Method, url: &Url) -> Result<String> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let nonce: [u8; NONCE_SIZE] = rand::random();
        self.authorization_with(method, url, &timestamp, &nonce)
    }

    fn authorization_with(
        &self,
        method: &Method,
        url: &Url,
        timestamp: &str,
        nonce: &[u8],
    ) -> Result<String> {
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::Signing(format!("URL has no host: {}", url)))?;

        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let signing_data = format!(
            "id={}&host={}&url={}&method={}",
            self.key_id.to_lowercase(),
            host.to_lowercase(),
            path,
            method.as_str().to_uppercase()
        );

        let key_nonce = hmac_sha256(&self.secret, nonce)?;
        let key_date = hmac_sha256(&key_nonce, timestamp.as_bytes())?;
        let key_signature = hmac_sha256(&key_date, REQUEST_VERSION)?;
        let signature = hmac_sha256(&key_signature, signing_data.as_bytes())?;

        Ok(format!(
            "{} id={},ts={},nonce={},sig={}",
            AUTH_SCHEME,
            self.key_id,
            timestamp,
            hex::encode(nonce),
            hex::encode(signature)
        ))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| ApiError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
