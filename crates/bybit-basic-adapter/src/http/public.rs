/*
[INPUT]:  Public endpoint parameters
[OUTPUT]: Market-level data (server time)
[POS]:    HTTP layer - public endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::{BybitClient, Result};
use crate::types::{ApiResponse, ServerTime};
use reqwest::Method;

impl BybitClient {
    /// Get exchange server time
    ///
    /// GET /v5/market/time
    pub async fn get_server_time(&self) -> Result<ApiResponse<ServerTime>> {
        let builder = self.public_request(Method::GET, "/v5/market/time", &[])?;
        self.send_json(builder).await
    }
}
