//! Typed view-function results
//!
//! The ledger answers view calls with loosely typed JSON arrays. Each parser
//! here checks arity, rejects nulls, and converts numbers (JSON numbers or
//! decimal strings) into fixed-width integers, reporting anything else as
//! [`LedgerError::MalformedResponse`].

use serde_json::Value;
use warpgate_core::{Address, BasisPoints, LedgerError, BPS_DENOMINATOR};

use crate::Result;

/// View function returning `(reserve0, reserve1, ...)` for a sorted pair
pub const TOKEN_RESERVES: &str = "token_reserves";

/// View function returning pair metadata; the swap fee sits at index 7
pub const GET_PAIR_METADATA: &str = "get_pair_metadata";

/// View function returning the LP token object `{ inner: address }`
pub const GET_LP_TOKEN: &str = "get_lp_token";

/// Fungible-asset metadata field holding the current supply
pub const SUPPLY_FIELD: &str = "supply_v2";

const PAIR_METADATA_LEN: usize = 9;
const SWAP_FEE_INDEX: usize = 7;

fn malformed(function: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::MalformedResponse {
        function: function.to_string(),
        reason: reason.into(),
    }
}

/// Read an unsigned integer from a JSON number or decimal string
pub fn parse_u64(value: &Value, function: &str, field: &str) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| malformed(function, format!("{} is not a u64: {}", field, n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| malformed(function, format!("{} is not a u64: {:?}", field, s))),
        Value::Null => Err(malformed(function, format!("{} is null", field))),
        other => Err(malformed(
            function,
            format!("{} has unexpected type: {}", field, other),
        )),
    }
}

fn expect_len(values: &[Value], len: usize, function: &str) -> Result<()> {
    if values.len() < len {
        return Err(malformed(
            function,
            format!("expected at least {} values, got {}", len, values.len()),
        ));
    }
    Ok(())
}

/// Reserves of a pair in sorted (token0, token1) order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservesResponse {
    pub reserve0: u64,
    pub reserve1: u64,
}

impl ReservesResponse {
    pub fn from_values(values: &[Value]) -> Result<Self> {
        expect_len(values, 2, TOKEN_RESERVES)?;
        Ok(Self {
            reserve0: parse_u64(&values[0], TOKEN_RESERVES, "reserve0")?,
            reserve1: parse_u64(&values[1], TOKEN_RESERVES, "reserve1")?,
        })
    }
}

/// The part of pair metadata the pricing engine uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairMetadataResponse {
    pub swap_fee: BasisPoints,
}

impl PairMetadataResponse {
    pub fn from_values(values: &[Value]) -> Result<Self> {
        expect_len(values, PAIR_METADATA_LEN, GET_PAIR_METADATA)?;
        let fee = parse_u64(&values[SWAP_FEE_INDEX], GET_PAIR_METADATA, "swap_fee")?;
        if fee > BPS_DENOMINATOR as u64 {
            return Err(malformed(
                GET_PAIR_METADATA,
                format!("swap_fee {} exceeds {}", fee, BPS_DENOMINATOR),
            ));
        }
        Ok(Self {
            swap_fee: fee as BasisPoints,
        })
    }
}

/// Address of a pair's LP token object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpTokenResponse {
    pub address: Address,
}

impl LpTokenResponse {
    pub fn from_values(values: &[Value]) -> Result<Self> {
        expect_len(values, 1, GET_LP_TOKEN)?;
        let inner = values[0]
            .get("inner")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(GET_LP_TOKEN, "missing string field `inner`"))?;
        let address = Address::parse(inner)
            .map_err(|e| malformed(GET_LP_TOKEN, format!("invalid address: {}", e)))?;
        Ok(Self { address })
    }
}

/// Current supply of a fungible asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyResponse {
    pub supply: u64,
}

impl SupplyResponse {
    pub fn from_metadata(metadata: Option<&Value>) -> Result<Self> {
        let function = "fungible_asset_metadata";
        let metadata = metadata.ok_or_else(|| malformed(function, "no metadata for asset"))?;
        let supply = metadata
            .get(SUPPLY_FIELD)
            .ok_or_else(|| malformed(function, format!("missing {}", SUPPLY_FIELD)))?;
        Ok(Self {
            supply: parse_u64(supply, function, SUPPLY_FIELD)?,
        })
    }
}
