//! Raw Kraken REST calls: public GETs and signed private POSTs

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256, Sha512};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::shared::errors::ProviderError;

pub const KRAKEN_API_URL: &str = "https://api.kraken.com";
const API_VERSION: &str = "0";
const USER_AGENT: &str = "kraken-dca-bot";

/// Sends a request and returns the raw JSON body
#[async_trait]
pub trait KrakenTransport: Send + Sync {
    async fn public(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError>;

    async fn private(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError>;
}

pub struct HttpTransport {
    http_client: Client,
    base_url: String,
    key: String,
    secret: String,
    /// Last nonce handed out; Kraken rejects a nonce that does not increase
    last_nonce: AtomicU64,
}

impl HttpTransport {
    pub fn new(key: String, secret: String) -> Result<Self, ProviderError> {
        Self::with_base_url(KRAKEN_API_URL.to_string(), key, secret)
    }

    pub fn with_base_url(base_url: String, key: String, secret: String) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            key,
            secret,
            last_nonce: AtomicU64::new(0),
        })
    }

    /// Millisecond timestamp, bumped past the previous nonce when the clock
    /// has not moved or went backwards.
    fn nonce(&self) -> String {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1)).to_string()
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ProviderError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Transport(format!("HTTP {}: {}", status, body)));
        }
        Ok(body)
    }
}

/// Form-encode the request parameters
pub fn encode_params(params: &[(&str, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// `API-Sign` header: HMAC-SHA512 keyed with the decoded secret over
/// `path + SHA256(nonce + body)`, base64 encoded.
pub fn sign(path: &str, nonce: &str, body: &str, secret: &str) -> Result<String, ProviderError> {
    let secret = general_purpose::STANDARD
        .decode(secret)
        .map_err(|e| ProviderError::Transport(format!("the API secret is not valid base64: {}", e)))?;

    let mut sha = Sha256::new();
    sha.update(nonce.as_bytes());
    sha.update(body.as_bytes());
    let digest = sha.finalize();

    let mut mac = Hmac::<Sha512>::new_from_slice(&secret)
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl KrakenTransport for HttpTransport {
    async fn public(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let url = format!("{}/{}/public/{}", self.base_url, API_VERSION, method);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::read_body(response).await
    }

    async fn private(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let path = format!("/{}/private/{}", API_VERSION, method);
        let nonce = self.nonce();

        let mut form: Vec<(&str, String)> = Vec::with_capacity(params.len() + 1);
        form.push(("nonce", nonce.clone()));
        form.extend(params.iter().cloned());
        let body = encode_params(&form);

        let signature = sign(&path, &nonce, &body, &self.secret)?;
        debug!("POST {} {}", path, body);

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .header("API-Key", &self.key)
            .header("API-Sign", signature)
            .header("Content-Type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::read_body(response).await
    }
}
