//! Transaction Parameter Builder
//!
//! Turns trades and liquidity intents into the raw numeric parameters a
//! ledger transaction needs. Pure functions, no I/O.

use crate::amount::CurrencyAmount;
use crate::constants::{fees, DEFAULT_SLIPPAGE_BPS};
use crate::fraction::{Fraction, Rounding};
use crate::percent::Percent;
use crate::state::{
    AddLiquidityParameters, RemoveLiquidityParameters, Result, SwapError, SwapParameters, TradeType,
};
use crate::trade::Trade;

/// Options for [`swap_call_parameters`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOptions {
    /// Tolerated adverse price movement, in [0, 100%)
    pub allowed_slippage: Percent,
}

impl SwapOptions {
    pub fn from_bps(bps: u32) -> Self {
        Self {
            allowed_slippage: Percent::from_bps(bps),
        }
    }
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self::from_bps(DEFAULT_SLIPPAGE_BPS)
    }
}

/// Slippage must lie in [0, 100%)
pub fn validate_slippage(slippage: &Percent) -> Result<()> {
    if slippage.is_negative() || slippage >= &Percent::one_hundred() {
        return Err(SwapError::InvalidSlippage {
            slippage: slippage.to_string(),
        });
    }
    Ok(())
}

/// `floor(amount * (1 - slippage))`
pub fn minimum_amount_with_slippage(
    amount: &CurrencyAmount,
    slippage: &Percent,
) -> Result<CurrencyAmount> {
    validate_slippage(slippage)?;
    let factor = &Fraction::one() - slippage.as_fraction();
    amount.multiply(&factor, Rounding::RoundDown)
}

/// `ceil(amount * (1 + slippage))`
pub fn maximum_amount_with_slippage(
    amount: &CurrencyAmount,
    slippage: &Percent,
) -> Result<CurrencyAmount> {
    validate_slippage(slippage)?;
    let factor = &Fraction::one() + slippage.as_fraction();
    amount.multiply(&factor, Rounding::RoundUp)
}

fn ensure_same_token(expected: &CurrencyAmount, found: &CurrencyAmount) -> Result<()> {
    if expected.token() != found.token() {
        return Err(SwapError::TokenMismatch {
            expected: expected.token().address.to_string(),
            found: found.token().address.to_string(),
        });
    }
    Ok(())
}

/// Parameters for adding liquidity. Tokens keep the caller's order.
pub fn add_liquidity_parameters(
    amount_a: &CurrencyAmount,
    amount_b: &CurrencyAmount,
    min_amount_a: &CurrencyAmount,
    min_amount_b: &CurrencyAmount,
    fee_basis_points: u32,
) -> Result<AddLiquidityParameters> {
    ensure_same_token(amount_a, min_amount_a)?;
    ensure_same_token(amount_b, min_amount_b)?;
    if fee_basis_points > fees::FEE_DENOMINATOR {
        return Err(SwapError::InvalidFee {
            bps: fee_basis_points,
        });
    }

    Ok(AddLiquidityParameters {
        amount_a: amount_a.raw_string(),
        amount_b: amount_b.raw_string(),
        min_amount_a: min_amount_a.raw_string(),
        min_amount_b: min_amount_b.raw_string(),
        token_a: amount_a.token().address.clone(),
        token_b: amount_b.token().address.clone(),
        fee_basis_points: fee_basis_points.to_string(),
    })
}

/// Parameters for burning `lp_amount` liquidity tokens.
///
/// The minimums must name two distinct tokens on one chain, and the burned
/// token must be neither of them.
pub fn remove_liquidity_parameters(
    lp_amount: &CurrencyAmount,
    min_amount_a: &CurrencyAmount,
    min_amount_b: &CurrencyAmount,
) -> Result<RemoveLiquidityParameters> {
    min_amount_a.token().sorts_before(min_amount_b.token())?;
    let lp_token = lp_amount.token();
    if lp_token == min_amount_a.token() || lp_token == min_amount_b.token() {
        return Err(SwapError::InvalidLiquidity {
            message: format!("{} is a pool token, not a liquidity token", lp_token),
        });
    }

    Ok(RemoveLiquidityParameters {
        lp_amount: lp_amount.raw_string(),
        min_amount_a: min_amount_a.raw_string(),
        min_amount_b: min_amount_b.raw_string(),
        token_a: min_amount_a.token().address.clone(),
        token_b: min_amount_b.token().address.clone(),
    })
}

/// Swap parameters with slippage applied to the side that is not fixed
pub fn swap_call_parameters(trade: &Trade, options: &SwapOptions) -> Result<SwapParameters> {
    let slippage = &options.allowed_slippage;
    let (amount_in, amount_out) = match trade.trade_type() {
        TradeType::ExactInput => (
            trade.input_amount().clone(),
            trade.minimum_amount_out(slippage)?,
        ),
        TradeType::ExactOutput => (
            trade.maximum_amount_in(slippage)?,
            trade.output_amount().clone(),
        ),
    };

    Ok(SwapParameters {
        trade_type: trade.trade_type(),
        amount_in: amount_in.raw_string(),
        amount_out: amount_out.raw_string(),
        path: trade
            .route()
            .path()
            .iter()
            .map(|token| token.address.clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::{Pair, SwapFee};
    use crate::route::Route;
    use crate::token::Token;
    use warpgate_core::{Address, ChainId};

    fn token(address: &str, symbol: &str) -> Token {
        Token::new(
            ChainId::MOVE_MAINNET,
            Address::parse(address).unwrap(),
            6,
            symbol,
            symbol,
        )
    }

    fn amount(token: Token, raw: u64) -> CurrencyAmount {
        CurrencyAmount::from_raw(token, raw).unwrap()
    }

    fn a() -> Token {
        token("0x1::a::A", "A")
    }

    fn b() -> Token {
        token("0x2::b::B", "B")
    }

    #[test]
    fn test_minimum_amount_half_percent() {
        let quoted = amount(b(), 1_000_000);
        let min = minimum_amount_with_slippage(&quoted, &Percent::from_bps(50)).unwrap();
        assert_eq!(min.raw_string(), "995000");

        let max = maximum_amount_with_slippage(&quoted, &Percent::from_bps(50)).unwrap();
        assert_eq!(max.raw_string(), "1005000");

        let default_min =
            minimum_amount_with_slippage(&quoted, &SwapOptions::default().allowed_slippage)
                .unwrap();
        assert_eq!(default_min, min);
    }

    #[test]
    fn test_slippage_rounding_direction() {
        let odd = amount(b(), 999);
        let slippage = Percent::from_bps(50);
        // 999 * 0.995 = 994.005, 999 * 1.005 = 1003.995
        assert_eq!(minimum_amount_with_slippage(&odd, &slippage).unwrap().raw_string(), "994");
        assert_eq!(maximum_amount_with_slippage(&odd, &slippage).unwrap().raw_string(), "1004");
    }

    #[test]
    fn test_invalid_slippage() {
        assert!(validate_slippage(&Percent::zero()).is_ok());
        assert!(validate_slippage(&Percent::from_bps(9_999)).is_ok());
        assert!(matches!(
            validate_slippage(&Percent::from_bps(10_000)),
            Err(SwapError::InvalidSlippage { .. })
        ));
        assert!(matches!(
            validate_slippage(&Percent::new(-1, 10_000).unwrap()),
            Err(SwapError::InvalidSlippage { .. })
        ));
    }

    #[test]
    fn test_swap_call_parameters_exact_in() {
        let zero_fee = SwapFee::from_bps(0).unwrap();
        let pair = Pair::new(amount(a(), 1_000_000), amount(b(), 2_000_000)).unwrap();
        let route = Route::new(vec![pair], a(), b()).unwrap();
        let trade = Trade::exact_in(route, &amount(a(), 1_000_000), zero_fee).unwrap();
        assert_eq!(trade.output_amount().raw_string(), "1000000");

        let params = swap_call_parameters(&trade, &SwapOptions::from_bps(50)).unwrap();
        assert_eq!(params.trade_type, TradeType::ExactInput);
        assert_eq!(params.amount_in, "1000000");
        assert_eq!(params.amount_out, "995000");
        assert_eq!(params.path, vec![a().address, b().address]);
    }

    #[test]
    fn test_swap_call_parameters_exact_out() {
        let zero_fee = SwapFee::from_bps(0).unwrap();
        let pair = Pair::new(amount(a(), 1_000_000), amount(b(), 2_000_000)).unwrap();
        let route = Route::new(vec![pair], b(), a()).unwrap();
        let trade = Trade::exact_out(route, &amount(a(), 1_000), zero_fee).unwrap();

        let params = swap_call_parameters(&trade, &SwapOptions::from_bps(100)).unwrap();
        assert_eq!(params.trade_type, TradeType::ExactOutput);
        assert_eq!(params.amount_out, "1000");
        // 2_000_000 * 1000 / 999_000 + 1 = 2003, then ceil(2003 * 1.01)
        assert_eq!(trade.input_amount().raw_string(), "2003");
        assert_eq!(params.amount_in, "2024");
        assert_eq!(params.path, vec![b().address, a().address]);
    }

    #[test]
    fn test_liquidity_parameters_keep_caller_order() {
        let params = add_liquidity_parameters(
            &amount(b(), 2_000),
            &amount(a(), 1_000),
            &amount(b(), 1_990),
            &amount(a(), 995),
            25,
        )
        .unwrap();
        assert_eq!(params.token_a, b().address);
        assert_eq!(params.token_b, a().address);
        assert_eq!(params.min_amount_a, "1990");
        assert_eq!(params.fee_basis_points, "25");

        assert!(matches!(
            add_liquidity_parameters(
                &amount(a(), 1),
                &amount(b(), 1),
                &amount(b(), 1),
                &amount(a(), 1),
                25
            ),
            Err(SwapError::TokenMismatch { .. })
        ));
        assert!(matches!(
            add_liquidity_parameters(
                &amount(a(), 1),
                &amount(b(), 1),
                &amount(a(), 1),
                &amount(b(), 1),
                10_001
            ),
            Err(SwapError::InvalidFee { .. })
        ));

        let lp_token = token("0xfeed::swap::LP", "LP");
        let params =
            remove_liquidity_parameters(&amount(lp_token, 500), &amount(a(), 10), &amount(b(), 20))
                .unwrap();
        assert_eq!(params.lp_amount, "500");
        assert_eq!(params.token_a, a().address);
        assert_eq!(params.min_amount_b, "20");
    }

    #[test]
    fn test_remove_liquidity_parameters_validate_tokens() {
        let lp_token = token("0xfeed::swap::LP", "LP");
        assert!(matches!(
            remove_liquidity_parameters(
                &amount(lp_token.clone(), 500),
                &amount(a(), 10),
                &amount(a(), 20)
            ),
            Err(SwapError::IdenticalTokens { .. })
        ));
        assert!(matches!(
            remove_liquidity_parameters(&amount(a(), 500), &amount(a(), 10), &amount(b(), 20)),
            Err(SwapError::InvalidLiquidity { .. })
        ));
        assert!(matches!(
            remove_liquidity_parameters(&amount(b(), 500), &amount(a(), 10), &amount(b(), 20)),
            Err(SwapError::InvalidLiquidity { .. })
        ));
        let reversed =
            remove_liquidity_parameters(&amount(lp_token, 500), &amount(b(), 20), &amount(a(), 10))
                .unwrap();
        assert_eq!(reversed.token_a, b().address);
    }
}
