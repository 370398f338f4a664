/*
[INPUT]:  API key/secret, timestamp, recv window and request payload
[OUTPUT]: Signed request headers (x-bapi-*)
[POS]:    HTTP layer - request signing for private endpoints
[UPDATE]: When changing signing algorithm or header format
*/

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use sha2::Sha256;

use crate::http::{BybitError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "x-bapi-api-key";
pub const HEADER_TIMESTAMP: &str = "x-bapi-timestamp";
pub const HEADER_RECV_WINDOW: &str = "x-bapi-recv-window";
pub const HEADER_SIGN: &str = "x-bapi-sign";
pub const HEADER_SIGN_TYPE: &str = "x-bapi-sign-type";

/// Signs private V5 requests with HMAC-SHA256
#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    api_secret: String,
    recv_window_ms: u64,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &self.api_key)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        recv_window_ms: u64,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            recv_window_ms,
        }
    }

    /// Sign a request.
    ///
    /// Format: "{timestamp}{api_key}{recv_window}{payload}" where payload is
    /// the query string for GET and the raw JSON body for POST.
    /// Returns the lowercase hex digest.
    pub fn sign(&self, timestamp_ms: u64, payload: &str) -> Result<String> {
        let message = format!(
            "{timestamp_ms}{}{}{payload}",
            self.api_key, self.recv_window_ms
        );
        self.sign_message(&message)
    }

    fn sign_message(&self, message: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| BybitError::Config(format!("invalid api secret: {e}")))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build the full set of authentication headers for one request
    pub fn headers(&self, timestamp_ms: u64, payload: &str) -> Result<HeaderMap> {
        let signature = self.sign(timestamp_ms, payload)?;

        let mut headers = HeaderMap::new();
        headers.insert(HEADER_API_KEY, header_value(&self.api_key)?);
        headers.insert(HEADER_TIMESTAMP, header_value(&timestamp_ms.to_string())?);
        headers.insert(
            HEADER_RECV_WINDOW,
            header_value(&self.recv_window_ms.to_string())?,
        );
        headers.insert(HEADER_SIGN, header_value(&signature)?);
        headers.insert(HEADER_SIGN_TYPE, HeaderValue::from_static("2"));
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| BybitError::Config(format!("invalid header value: {e}")))
}
