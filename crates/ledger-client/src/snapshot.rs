//! In-memory ledger loaded from a JSON snapshot
//!
//! Used by the CLI for offline quoting and by tests across the workspace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use warpgate_core::{Address, BasisPoints, ChainId, Error, LedgerError, BPS_DENOMINATOR};

use crate::{LedgerReader, Result};

/// Token description carried alongside pool state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotToken {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// One pool as recorded in a snapshot. Reserves follow `token_a`/`token_b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub token_a: Address,
    pub token_b: Address,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub fee_bps: BasisPoints,
    #[serde(default)]
    pub lp_token: Option<Address>,
    #[serde(default)]
    pub lp_supply: u64,
}

/// Snapshot document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub tokens: Vec<SnapshotToken>,
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
}

fn pool_key(a: &Address, b: &Address) -> (Address, Address) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// [`LedgerReader`] over a [`LedgerSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotLedger {
    snapshot: LedgerSnapshot,
    index: HashMap<(Address, Address), usize>,
}

impl SnapshotLedger {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, Error> {
        let snapshot: LedgerSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::new(snapshot)
    }

    /// Index a snapshot, rejecting self-pairs, duplicate pools, and bad fees
    pub fn new(snapshot: LedgerSnapshot) -> std::result::Result<Self, Error> {
        let mut index = HashMap::with_capacity(snapshot.pools.len());
        for (i, pool) in snapshot.pools.iter().enumerate() {
            if pool.token_a == pool.token_b {
                return Err(Error::Config(format!(
                    "pool {} pairs {} with itself",
                    i, pool.token_a
                )));
            }
            if pool.fee_bps > BPS_DENOMINATOR {
                return Err(Error::Config(format!(
                    "pool {} fee {} exceeds {}",
                    i, pool.fee_bps, BPS_DENOMINATOR
                )));
            }
            if index
                .insert(pool_key(&pool.token_a, &pool.token_b), i)
                .is_some()
            {
                return Err(Error::Config(format!(
                    "duplicate pool {} / {}",
                    pool.token_a, pool.token_b
                )));
            }
        }

        tracing::debug!(
            tokens = snapshot.tokens.len(),
            pools = snapshot.pools.len(),
            "loaded ledger snapshot"
        );
        Ok(Self { snapshot, index })
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn tokens(&self) -> &[SnapshotToken] {
        &self.snapshot.tokens
    }

    /// Case-insensitive symbol lookup
    pub fn token_by_symbol(&self, symbol: &str) -> Option<&SnapshotToken> {
        self.snapshot
            .tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    fn pool(&self, a: &Address, b: &Address) -> Result<&PoolEntry> {
        self.index
            .get(&pool_key(a, b))
            .map(|&i| &self.snapshot.pools[i])
            .ok_or_else(|| LedgerError::PoolNotFound {
                token_a: a.short_string(),
                token_b: b.short_string(),
            })
    }
}

impl LedgerReader for SnapshotLedger {
    async fn get_reserves(&self, token_a: &Address, token_b: &Address) -> Result<(u64, u64)> {
        let pool = self.pool(token_a, token_b)?;
        if &pool.token_a == token_a {
            Ok((pool.reserve_a, pool.reserve_b))
        } else {
            Ok((pool.reserve_b, pool.reserve_a))
        }
    }

    async fn get_fee(&self, token_a: &Address, token_b: &Address) -> Result<BasisPoints> {
        Ok(self.pool(token_a, token_b)?.fee_bps)
    }

    async fn get_lp_token(&self, token_a: &Address, token_b: &Address) -> Result<Address> {
        self.pool(token_a, token_b)?
            .lp_token
            .clone()
            .ok_or_else(|| LedgerError::MalformedResponse {
                function: crate::responses::GET_LP_TOKEN.to_string(),
                reason: "snapshot pool has no lp_token".to_string(),
            })
    }

    async fn get_liquidity_token_supply(&self, lp_token: &Address) -> Result<u64> {
        self.snapshot
            .pools
            .iter()
            .find(|p| p.lp_token.as_ref() == Some(lp_token))
            .map(|p| p.lp_supply)
            .ok_or_else(|| LedgerError::ApiError {
                message: format!("unknown fungible asset {}", lp_token.short_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "tokens": [
            { "chain_id": 126, "address": "0x1::move::MOVE", "decimals": 8, "symbol": "MOVE", "name": "Move" },
            { "chain_id": 126, "address": "0x2::usdc::USDC", "decimals": 6, "symbol": "USDC" }
        ],
        "pools": [
            {
                "token_a": "0x2::usdc::USDC",
                "token_b": "0x1::move::MOVE",
                "reserve_a": 5000000,
                "reserve_b": 900000000,
                "fee_bps": 25,
                "lp_token": "0xfeed",
                "lp_supply": 60000000
            }
        ]
    }"#;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_reads_in_caller_order() {
        let ledger = SnapshotLedger::from_json_str(SNAPSHOT).unwrap();
        let usdc = addr("0x2::usdc::USDC");
        let mov = addr("0x1::move::MOVE");

        assert_eq!(ledger.get_reserves(&usdc, &mov).await.unwrap(), (5_000_000, 900_000_000));
        assert_eq!(ledger.get_reserves(&mov, &usdc).await.unwrap(), (900_000_000, 5_000_000));
        assert_eq!(ledger.get_fee(&mov, &usdc).await.unwrap(), 25);

        let lp = ledger.get_lp_token(&mov, &usdc).await.unwrap();
        assert_eq!(ledger.get_liquidity_token_supply(&lp).await.unwrap(), 60_000_000);
    }

    #[tokio::test]
    async fn test_snapshot_missing_pool() {
        let ledger = SnapshotLedger::from_json_str(SNAPSHOT).unwrap();
        let err = ledger
            .get_reserves(&addr("0x1::move::MOVE"), &addr("0x3::usdt::USDT"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "pool_not_found");

        let err = ledger
            .get_liquidity_token_supply(&addr("0xbeef"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ApiError { .. }));
    }

    #[test]
    fn test_symbol_lookup() {
        let ledger = SnapshotLedger::from_json_str(SNAPSHOT).unwrap();
        let usdc = ledger.token_by_symbol("usdc").unwrap();
        assert_eq!(usdc.decimals, 6);
        assert_eq!(usdc.name, "");
        assert!(ledger.token_by_symbol("ETH").is_none());
    }

    #[test]
    fn test_snapshot_validation() {
        let pool = PoolEntry {
            token_a: addr("0x1"),
            token_b: addr("0x2"),
            reserve_a: 1,
            reserve_b: 1,
            fee_bps: 25,
            lp_token: None,
            lp_supply: 0,
        };

        let duplicate = LedgerSnapshot {
            tokens: Vec::new(),
            pools: vec![
                pool.clone(),
                PoolEntry {
                    token_a: addr("0x2"),
                    token_b: addr("0x1"),
                    ..pool.clone()
                },
            ],
        };
        assert!(matches!(SnapshotLedger::new(duplicate), Err(Error::Config(_))));

        let bad_fee = LedgerSnapshot {
            tokens: Vec::new(),
            pools: vec![PoolEntry {
                fee_bps: 10_001,
                ..pool.clone()
            }],
        };
        assert!(SnapshotLedger::new(bad_fee).is_err());

        let self_pair = LedgerSnapshot {
            tokens: Vec::new(),
            pools: vec![PoolEntry {
                token_b: addr("0x1"),
                ..pool
            }],
        };
        assert!(SnapshotLedger::new(self_pair).is_err());

        assert!(matches!(
            SnapshotLedger::from_json_str("{ not json"),
            Err(Error::Serialization(_))
        ));
    }
}
