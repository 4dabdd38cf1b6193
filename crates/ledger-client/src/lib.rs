//! ledger-client: Read access to Warpgate pool state
//!
//! The pricing engine needs three facts from the ledger: a pair's reserves,
//! its fee, and the supply of its liquidity token. [`LedgerReader`] is that
//! capability. [`LedgerClient`] implements it on top of any raw view-function
//! transport ([`ViewClient`]); [`SnapshotLedger`] implements it from a JSON
//! snapshot held in memory.

pub mod responses;
pub mod snapshot;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use warpgate_core::{Address, BasisPoints, Error, LedgerError, SdkConfig};

use responses::{
    LpTokenResponse, PairMetadataResponse, ReservesResponse, SupplyResponse, GET_LP_TOKEN,
    GET_PAIR_METADATA, TOKEN_RESERVES,
};

pub use snapshot::{LedgerSnapshot, PoolEntry, SnapshotLedger, SnapshotToken};

/// Result type for ledger reads
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger read capability consumed by the pricing engine
pub trait LedgerReader: Send + Sync {
    /// Reserves of the pool between `token_a` and `token_b`, in that order
    fn get_reserves(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> impl Future<Output = Result<(u64, u64)>> + Send;

    /// Pool fee in basis points (0..=10000)
    fn get_fee(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> impl Future<Output = Result<BasisPoints>> + Send;

    /// Address of the pool's liquidity token
    fn get_lp_token(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> impl Future<Output = Result<Address>> + Send;

    /// Current supply of a liquidity token
    fn get_liquidity_token_supply(
        &self,
        lp_token: &Address,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// A view-function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPayload {
    /// Fully qualified `address::module::function`
    pub function: String,
    pub type_arguments: Vec<String>,
    pub function_arguments: Vec<Value>,
}

/// Raw ledger transport supplied by the embedding application
pub trait ViewClient: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// Execute a view function and return its result values
    fn view(
        &self,
        payload: ViewPayload,
    ) -> impl Future<Output = std::result::Result<Vec<Value>, Self::Error>> + Send;

    /// Fungible-asset metadata by asset type, `None` when the asset is unknown
    fn fungible_asset_metadata(
        &self,
        asset_type: &str,
    ) -> impl Future<Output = std::result::Result<Option<Value>, Self::Error>> + Send;
}

/// Whether a transport error means the pool was never created
fn is_missing_pool(message: &str) -> bool {
    message.contains("module_not_found") || message.contains("Pool does not exist")
}

/// Whether a transport error means the node could not be reached at all
fn is_connection_failure(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["error sending request", "connection refused", "dns error", "tcp connect"]
        .iter()
        .any(|marker| message.contains(marker))
}

/// Run a ledger request with a timeout
async fn timed_request<T, E: std::fmt::Display>(
    url: &str,
    timeout: Duration,
    fut: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| LedgerError::Timeout {
            secs: timeout.as_secs(),
        })?
        .map_err(|e| {
            let message = e.to_string();
            if is_connection_failure(&message) {
                LedgerError::Unreachable {
                    url: format!("{}: {}", url, message),
                }
            } else {
                LedgerError::ApiError { message }
            }
        })
}

/// [`LedgerReader`] backed by the Warpgate swap module's view functions
#[derive(Debug, Clone)]
pub struct LedgerClient<C> {
    client: C,
    url: String,
    swap_address: Address,
    timeout: Duration,
}

impl<C: ViewClient> LedgerClient<C> {
    /// Wrap a transport. The configuration must name the swap module account.
    pub fn new(client: C, config: &SdkConfig) -> std::result::Result<Self, Error> {
        let swap_address = config
            .swap
            .swap_address
            .clone()
            .ok_or_else(|| Error::Config("swap.swap_address is required".to_string()))?;
        Ok(Self {
            client,
            url: config.ledger.url.clone(),
            swap_address,
            timeout: Duration::from_secs(config.ledger.request_timeout_secs),
        })
    }

    pub fn swap_address(&self) -> &Address {
        &self.swap_address
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    fn function(&self, name: &str) -> String {
        format!("{}::swap::{}", self.swap_address.account(), name)
    }

    /// Call a pair view function with the tokens in canonical order
    async fn view_pair(
        &self,
        name: &str,
        token_a: &Address,
        token_b: &Address,
    ) -> Result<Vec<Value>> {
        let (token0, token1) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let payload = ViewPayload {
            function: self.function(name),
            type_arguments: Vec::new(),
            function_arguments: vec![
                Value::String(token0.to_string()),
                Value::String(token1.to_string()),
            ],
        };

        tracing::debug!(function = %payload.function, %token0, %token1, "view call");
        timed_request(&self.url, self.timeout, self.client.view(payload))
            .await
            .map_err(|e| match e {
                LedgerError::ApiError { message } if is_missing_pool(&message) => {
                    LedgerError::PoolNotFound {
                        token_a: token_a.short_string(),
                        token_b: token_b.short_string(),
                    }
                }
                other => other,
            })
    }
}

impl<C: ViewClient> LedgerReader for LedgerClient<C> {
    async fn get_reserves(&self, token_a: &Address, token_b: &Address) -> Result<(u64, u64)> {
        let values = self.view_pair(TOKEN_RESERVES, token_a, token_b).await?;
        let reserves = ReservesResponse::from_values(&values)?;
        if token_a <= token_b {
            Ok((reserves.reserve0, reserves.reserve1))
        } else {
            Ok((reserves.reserve1, reserves.reserve0))
        }
    }

    async fn get_fee(&self, token_a: &Address, token_b: &Address) -> Result<BasisPoints> {
        let values = self.view_pair(GET_PAIR_METADATA, token_a, token_b).await?;
        Ok(PairMetadataResponse::from_values(&values)?.swap_fee)
    }

    async fn get_lp_token(&self, token_a: &Address, token_b: &Address) -> Result<Address> {
        let values = self.view_pair(GET_LP_TOKEN, token_a, token_b).await?;
        Ok(LpTokenResponse::from_values(&values)?.address)
    }

    async fn get_liquidity_token_supply(&self, lp_token: &Address) -> Result<u64> {
        // metadata is keyed by the padded 64-digit account
        let asset_type = lp_token.account();
        tracing::debug!(%asset_type, "fungible asset metadata");
        let metadata = timed_request(
            &self.url,
            self.timeout,
            self.client.fungible_asset_metadata(asset_type),
        )
        .await?;
        Ok(SupplyResponse::from_metadata(metadata.as_ref())?.supply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport that answers from canned values and records calls
    #[derive(Debug, Default)]
    struct MockView {
        reserves: Option<Vec<Value>>,
        metadata: Option<Vec<Value>>,
        lp_token: Option<Vec<Value>>,
        supply: Option<Value>,
        fail_with: Option<String>,
        delay: Option<Duration>,
        calls: Mutex<Vec<ViewPayload>>,
    }

    impl ViewClient for MockView {
        type Error = String;

        async fn view(&self, payload: ViewPayload) -> std::result::Result<Vec<Value>, String> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.fail_with {
                return Err(message.clone());
            }
            let name = payload.function.rsplit("::").next().unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(payload);
            let canned = match name.as_str() {
                TOKEN_RESERVES => &self.reserves,
                GET_PAIR_METADATA => &self.metadata,
                GET_LP_TOKEN => &self.lp_token,
                _ => &None,
            };
            canned.clone().ok_or_else(|| format!("no canned response for {}", name))
        }

        async fn fungible_asset_metadata(
            &self,
            asset_type: &str,
        ) -> std::result::Result<Option<Value>, String> {
            assert_eq!(asset_type.len(), 66);
            Ok(self.supply.clone())
        }
    }

    fn config() -> SdkConfig {
        let mut config = SdkConfig::default();
        config.swap.swap_address = Some(Address::parse("0xabc").unwrap());
        config
    }

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_new_requires_swap_address() {
        let err = LedgerClient::new(MockView::default(), &SdkConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_reserves_in_caller_order() {
        let mock = MockView {
            reserves: Some(vec![json!("100"), json!("200"), json!("0")]),
            ..Default::default()
        };
        let client = LedgerClient::new(mock, &config()).unwrap();
        let low = addr("0x1::a::A");
        let high = addr("0x2::b::B");

        assert_eq!(client.get_reserves(&low, &high).await.unwrap(), (100, 200));
        assert_eq!(client.get_reserves(&high, &low).await.unwrap(), (200, 100));

        let calls = client.inner().calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        for call in calls.iter() {
            assert!(call.function.ends_with("::swap::token_reserves"));
            assert_eq!(call.function_arguments[0], json!(low.to_string()));
            assert_eq!(call.function_arguments[1], json!(high.to_string()));
        }
    }

    #[tokio::test]
    async fn test_fee_and_lp_token() {
        let mut metadata: Vec<Value> = (0..9).map(|_| json!("0")).collect();
        metadata[7] = json!("30");
        let mock = MockView {
            metadata: Some(metadata),
            lp_token: Some(vec![json!({ "inner": "0xfeed" })]),
            supply: Some(json!({ "supply_v2": "5000" })),
            ..Default::default()
        };
        let client = LedgerClient::new(mock, &config()).unwrap();
        let (a, b) = (addr("0x1::a::A"), addr("0x2::b::B"));

        assert_eq!(client.get_fee(&a, &b).await.unwrap(), 30);
        let lp = client.get_lp_token(&b, &a).await.unwrap();
        assert_eq!(lp, addr("0xfeed"));
        assert_eq!(client.get_liquidity_token_supply(&lp).await.unwrap(), 5000);
    }

    #[tokio::test]
    async fn test_missing_pool_mapped() {
        let mock = MockView {
            fail_with: Some("Move abort: module_not_found".to_string()),
            ..Default::default()
        };
        let client = LedgerClient::new(mock, &config()).unwrap();
        let err = client
            .get_reserves(&addr("0x1::a::A"), &addr("0x2::b::B"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PoolNotFound { .. }));

        let mock = MockView {
            fail_with: Some("503 Service Unavailable".to_string()),
            ..Default::default()
        };
        let client = LedgerClient::new(mock, &config()).unwrap();
        let err = client
            .get_fee(&addr("0x1::a::A"), &addr("0x2::b::B"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ApiError { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_failure_is_unreachable() {
        let mock = MockView {
            fail_with: Some(
                "error sending request for url (http://127.0.0.1:8080/v1/view): Connection refused"
                    .to_string(),
            ),
            ..Default::default()
        };
        let config = config();
        let client = LedgerClient::new(mock, &config).unwrap();
        let err = client
            .get_reserves(&addr("0x1::a::A"), &addr("0x2::b::B"))
            .await
            .unwrap_err();
        match &err {
            LedgerError::Unreachable { url } => assert!(url.starts_with(&config.ledger.url)),
            other => panic!("expected Unreachable, got {:?}", other),
        }
        assert_eq!(err.error_code(), "ledger_unreachable");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock = MockView {
            reserves: Some(vec![json!(null)]),
            ..Default::default()
        };
        let client = LedgerClient::new(mock, &config()).unwrap();
        let err = client
            .get_reserves(&addr("0x1::a::A"), &addr("0x2::b::B"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "malformed_response");
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout() {
        let mock = MockView {
            reserves: Some(vec![json!(1), json!(1)]),
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let mut config = config();
        config.ledger.request_timeout_secs = 5;
        let client = LedgerClient::new(mock, &config).unwrap();
        let err = client
            .get_reserves(&addr("0x1::a::A"), &addr("0x2::b::B"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Timeout { secs: 5 }));
    }
}
