/*
[INPUT]:  Account type and signed-request credentials
[OUTPUT]: Account wallet balances
[POS]:    HTTP layer - account endpoints (require API key signature)
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use crate::http::{BybitClient, Result};
use crate::types::{AccountType, ApiResponse, WalletBalance};

impl BybitClient {
    /// Query wallet balance for an account type
    ///
    /// GET /v5/account/wallet-balance?accountType={account_type}
    pub async fn get_wallet_balance(
        &self,
        account_type: AccountType,
    ) -> Result<ApiResponse<WalletBalance>> {
        let builder = self.signed_get(
            "/v5/account/wallet-balance",
            &[("accountType", account_type.as_str())],
        )?;
        self.send_json(builder).await
    }
}
