/*
[INPUT]:  Order requests with signed-request credentials
[OUTPUT]: Order creation confirmations
[POS]:    HTTP layer - trading endpoints (require API key signature)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use crate::http::{BybitClient, Result};
use crate::types::{ApiResponse, PlaceOrderRequest, PlaceOrderResult};

impl BybitClient {
    /// Create a new order
    ///
    /// POST /v5/order/create
    pub async fn place_order(
        &self,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<PlaceOrderResult>> {
        let builder = self.signed_post("/v5/order/create", req)?;
        self.send_json(builder).await
    }
}
