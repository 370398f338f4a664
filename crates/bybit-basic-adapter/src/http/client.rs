/*
[INPUT]:  HTTP configuration (environment, timeouts, recv window, credentials)
[OUTPUT]: Configured reqwest client ready for public and signed API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{BybitError, RequestSigner, Result};
use crate::types::ApiResponse;

/// Base URLs for Bybit API
const TESTNET_BASE_URL: &str = "https://api-testnet.bybit.com";
const MAINNET_BASE_URL: &str = "https://api.bybit.com";

/// Default validity window for signed requests
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Target exchange environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn from_testnet_flag(testnet: bool) -> Self {
        if testnet {
            Environment::Testnet
        } else {
            Environment::Mainnet
        }
    }

    pub fn is_testnet(self) -> bool {
        self == Environment::Testnet
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Testnet => TESTNET_BASE_URL,
            Environment::Mainnet => MAINNET_BASE_URL,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub recv_window_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        }
    }
}

/// API key pair for signed requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Main HTTP client for the Bybit V5 API
#[derive(Debug)]
pub struct BybitClient {
    http_client: Client,
    base_url: Url,
    environment: Environment,
    recv_window_ms: u64,
    signer: Option<RequestSigner>,
}

impl BybitClient {
    /// Create a new client with default configuration
    pub fn new(environment: Environment) -> Result<Self> {
        Self::with_config(ClientConfig::default(), environment)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, environment: Environment) -> Result<Self> {
        let mut client = Self::with_config_and_base_url(config, environment.base_url())?;
        client.environment = environment;
        Ok(client)
    }

    /// Create a client against an explicit base URL (mock servers, proxies)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            environment: Environment::Testnet,
            recv_window_ms: config.recv_window_ms,
            signer: None,
        })
    }

    /// Set credentials for signed requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.signer = Some(RequestSigner::new(
            credentials.api_key,
            credentials.api_secret,
            self.recv_window_ms,
        ));
    }

    /// Builder-style variant of [`set_credentials`](Self::set_credentials)
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn signer(&self) -> Result<&RequestSigner> {
        self.signer
            .as_ref()
            .ok_or_else(|| BybitError::Config("API credentials are not set".to_string()))
    }

    /// Build full URL with an optional encoded query string
    fn url(&self, endpoint: &str, query: &str) -> Result<Url> {
        let mut url = self.base_url.join(endpoint)?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// Build request builder for public endpoints
    pub(crate) fn public_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let url = self.url(endpoint, &encode_query(query))?;
        Ok(self.http_client.request(method, url))
    }

    /// Build a signed GET request; the query string is the signed payload
    pub(crate) fn signed_get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let signer = self.signer()?;
        let query = encode_query(query);
        let headers = signer.headers(timestamp_ms(), &query)?;
        let url = self.url(endpoint, &query)?;
        Ok(self.http_client.get(url).headers(headers))
    }

    /// Build a signed POST request; the serialized JSON body is the signed payload
    pub(crate) fn signed_post<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<RequestBuilder> {
        let signer = self.signer()?;
        let payload = serde_json::to_string(body)?;
        let headers = signer.headers(timestamp_ms(), &payload)?;
        let url = self.url(endpoint, "")?;
        Ok(self
            .http_client
            .post(url)
            .headers(headers)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload))
    }

    /// Send a request and decode the V5 envelope.
    ///
    /// Non-success HTTP statuses and non-zero retCodes become errors.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body = %body, "bybit response");

        if !status.is_success() {
            return Err(BybitError::status_error(status, body));
        }

        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)?;
        if !envelope.is_success() {
            return Err(BybitError::Api {
                code: envelope.ret_code,
                message: envelope.ret_msg,
            });
        }

        let ApiResponse {
            ret_code,
            ret_msg,
            result,
            ret_ext_info,
            time,
        } = envelope;
        let result = serde_json::from_value(result)
            .map_err(|e| BybitError::InvalidResponse(format!("unexpected result shape: {e}")))?;

        Ok(ApiResponse {
            ret_code,
            ret_msg,
            result,
            ret_ext_info,
            time,
        })
    }
}

fn encode_query(query: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish()
}

fn timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
