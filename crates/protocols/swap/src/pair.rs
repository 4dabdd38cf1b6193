//! Reserve Pair
//!
//! One liquidity pool: two reserves in canonical token order, the pool's
//! liquidity token, and the constant-product formulas (x * y = k) for swaps,
//! mints and burns. Every operation that moves reserves returns a new pair.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use warpgate_core::{Address, ChainId};

use crate::amount::CurrencyAmount;
use crate::constants::{fees, lp};
use crate::price::Price;
use crate::state::{Result, SwapError};
use crate::token::{sort_tokens, Token};

/// Pool fee as the share of input that reaches the curve
/// (numerator over [`fees::FEE_DENOMINATOR`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapFee {
    numerator: u32,
}

impl SwapFee {
    /// Fee from basis points charged: 25 bps becomes 9975/10000.
    /// Fails at 10000 bps or more.
    pub fn from_bps(bps: u32) -> Result<Self> {
        if bps >= fees::FEE_DENOMINATOR {
            return Err(SwapError::InvalidFee { bps });
        }
        Ok(Self {
            numerator: fees::FEE_DENOMINATOR - bps,
        })
    }

    /// Fee from the numerator directly (1..=10000)
    pub fn from_numerator(numerator: u32) -> Result<Self> {
        if numerator == 0 || numerator > fees::FEE_DENOMINATOR {
            return Err(SwapError::InvalidFee {
                bps: fees::FEE_DENOMINATOR.saturating_sub(numerator),
            });
        }
        Ok(Self { numerator })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Fee charged, in basis points
    pub fn bps(&self) -> u32 {
        fees::FEE_DENOMINATOR - self.numerator
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        Self {
            numerator: fees::DEFAULT_FEE_NUMERATOR,
        }
    }
}

/// A liquidity pool snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    liquidity_token: Token,
    reserve0: CurrencyAmount,
    reserve1: CurrencyAmount,
}

impl Pair {
    /// Build a pair from two reserves given in any order.
    ///
    /// The liquidity token gets a synthetic identity derived from the sorted
    /// token addresses; use [`Pair::with_liquidity_token`] to attach the
    /// address the ledger reports.
    pub fn new(amount_a: CurrencyAmount, amount_b: CurrencyAmount) -> Result<Self> {
        let (reserve0, reserve1) = if amount_a.token().sorts_before(amount_b.token())? {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        let address = Self::lp_type_tag(&Address::zero(), reserve0.token(), reserve1.token())?;
        let liquidity_token =
            Self::liquidity_token_for(reserve0.token(), reserve1.token(), address);
        Ok(Self {
            liquidity_token,
            reserve0,
            reserve1,
        })
    }

    /// Replace the liquidity token's address, keeping its metadata
    pub fn with_liquidity_token(mut self, address: Address) -> Self {
        self.liquidity_token.address = address;
        self
    }

    /// `<swap>::swap::LPToken<token0, token1>` for the given swap account
    pub fn lp_type_tag(swap_address: &Address, token_a: &Token, token_b: &Token) -> Result<Address> {
        Self::pair_type_tag(swap_address, lp::LP_TYPE_PATH, token_a, token_b)
    }

    /// `<swap>::swap::TokenPairReserve<token0, token1>` for the given swap account
    pub fn reserves_type_tag(
        swap_address: &Address,
        token_a: &Token,
        token_b: &Token,
    ) -> Result<Address> {
        Self::pair_type_tag(swap_address, lp::RESERVES_TYPE_PATH, token_a, token_b)
    }

    fn pair_type_tag(
        swap_address: &Address,
        type_path: &str,
        token_a: &Token,
        token_b: &Token,
    ) -> Result<Address> {
        let (token0, token1) = sort_tokens(token_a.clone(), token_b.clone())?;
        let tag = format!(
            "{}::{}<{}, {}>",
            swap_address.account(),
            type_path,
            token0.address,
            token1.address
        );
        Ok(Address::parse(&tag)?)
    }

    fn liquidity_token_for(token0: &Token, token1: &Token, address: Address) -> Token {
        Token::new(
            token0.chain_id,
            address,
            lp::LP_DECIMALS,
            lp::LP_SYMBOL,
            format!("Warpgate-{}-{}-LP", token0.symbol, token1.symbol),
        )
    }

    /// Same pool with new reserves, given in any order
    fn updated(&self, amount_a: CurrencyAmount, amount_b: CurrencyAmount) -> Pair {
        let (reserve0, reserve1) = if amount_a.token() == self.token0() {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        Self {
            liquidity_token: self.liquidity_token.clone(),
            reserve0,
            reserve1,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.token0().chain_id
    }

    pub fn token0(&self) -> &Token {
        self.reserve0.token()
    }

    pub fn token1(&self) -> &Token {
        self.reserve1.token()
    }

    pub fn reserve0(&self) -> &CurrencyAmount {
        &self.reserve0
    }

    pub fn reserve1(&self) -> &CurrencyAmount {
        &self.reserve1
    }

    pub fn liquidity_token(&self) -> &Token {
        &self.liquidity_token
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token == self.token0() || token == self.token1()
    }

    fn ensure_involves(&self, token: &Token) -> Result<()> {
        if !self.involves_token(token) {
            return Err(SwapError::TokenMismatch {
                expected: format!("{} or {}", self.token0().address, self.token1().address),
                found: token.address.to_string(),
            });
        }
        Ok(())
    }

    /// Token on the other side of the pool
    pub fn other_token(&self, token: &Token) -> Result<&Token> {
        self.ensure_involves(token)?;
        if token == self.token0() {
            Ok(self.token1())
        } else {
            Ok(self.token0())
        }
    }

    pub fn reserve_of(&self, token: &Token) -> Result<&CurrencyAmount> {
        self.ensure_involves(token)?;
        if token == self.token0() {
            Ok(&self.reserve0)
        } else {
            Ok(&self.reserve1)
        }
    }

    /// Spot price of token0 in token1
    pub fn token0_price(&self) -> Result<Price> {
        Price::from_amounts(&self.reserve0, &self.reserve1)
    }

    /// Spot price of token1 in token0
    pub fn token1_price(&self) -> Result<Price> {
        Price::from_amounts(&self.reserve1, &self.reserve0)
    }

    pub fn price_of(&self, token: &Token) -> Result<Price> {
        self.ensure_involves(token)?;
        if token == self.token0() {
            self.token0_price()
        } else {
            self.token1_price()
        }
    }

    fn ensure_reserves(&self) -> Result<()> {
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(SwapError::InsufficientReserves);
        }
        Ok(())
    }

    /// Amount of the other token that matches `amount` at the current ratio,
    /// as needed for a balanced deposit. Rounds down.
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.ensure_involves(amount.token())?;
        self.ensure_reserves()?;
        if amount.is_zero() {
            return Err(SwapError::InsufficientInputAmount);
        }

        let reserve_in = self.reserve_of(amount.token())?;
        let other = self.other_token(amount.token())?;
        let reserve_out = self.reserve_of(other)?;
        let raw = amount.raw() * reserve_out.raw() / reserve_in.raw();
        CurrencyAmount::from_raw(other.clone(), raw)
    }

    /// Output for an exact input, and the pool after the swap
    ///
    /// Formula: output = (input * fee * reserve_out) / (reserve_in * 10000 + input * fee)
    pub fn get_output_amount(
        &self,
        input_amount: &CurrencyAmount,
        fee: SwapFee,
    ) -> Result<(CurrencyAmount, Pair)> {
        self.ensure_involves(input_amount.token())?;
        self.ensure_reserves()?;

        let input_reserve = self.reserve_of(input_amount.token())?;
        let output_token = self.other_token(input_amount.token())?;
        let output_reserve = self.reserve_of(output_token)?;

        let input_with_fee = input_amount.raw() * BigInt::from(fee.numerator());
        let numerator = &input_with_fee * output_reserve.raw();
        let denominator =
            input_reserve.raw() * BigInt::from(fees::FEE_DENOMINATOR) + &input_with_fee;
        let output_amount = CurrencyAmount::from_raw(output_token.clone(), numerator / denominator)?;
        if output_amount.is_zero() {
            return Err(SwapError::InsufficientInputAmount);
        }

        let next = self.updated(
            input_reserve.add(input_amount)?,
            output_reserve.subtract(&output_amount)?,
        );
        Ok((output_amount, next))
    }

    /// Minimal input for an exact output, and the pool after the swap
    ///
    /// Formula: input = (reserve_in * output * 10000) / ((reserve_out - output) * fee) + 1
    pub fn get_input_amount(
        &self,
        output_amount: &CurrencyAmount,
        fee: SwapFee,
    ) -> Result<(CurrencyAmount, Pair)> {
        self.ensure_involves(output_amount.token())?;
        self.ensure_reserves()?;

        let output_reserve = self.reserve_of(output_amount.token())?;
        if output_amount.raw() >= output_reserve.raw() {
            return Err(SwapError::InsufficientReserves);
        }
        if output_amount.is_zero() {
            return Err(SwapError::InsufficientInputAmount);
        }

        let input_token = self.other_token(output_amount.token())?;
        let input_reserve = self.reserve_of(input_token)?;

        let numerator =
            input_reserve.raw() * output_amount.raw() * BigInt::from(fees::FEE_DENOMINATOR);
        let denominator =
            (output_reserve.raw() - output_amount.raw()) * BigInt::from(fee.numerator());
        // +1 so floor division never under-delivers the output
        let input_amount =
            CurrencyAmount::from_raw(input_token.clone(), numerator / denominator + 1u32)?;

        let next = self.updated(
            input_reserve.add(&input_amount)?,
            output_reserve.subtract(output_amount)?,
        );
        Ok((input_amount, next))
    }

    fn ensure_liquidity_token(&self, amount: &CurrencyAmount) -> Result<()> {
        if amount.token() != &self.liquidity_token {
            return Err(SwapError::TokenMismatch {
                expected: self.liquidity_token.address.to_string(),
                found: amount.token().address.to_string(),
            });
        }
        Ok(())
    }

    /// LP tokens minted for depositing `amount_a` and `amount_b`
    pub fn get_liquidity_minted(
        &self,
        total_supply: &CurrencyAmount,
        amount_a: &CurrencyAmount,
        amount_b: &CurrencyAmount,
    ) -> Result<CurrencyAmount> {
        self.ensure_liquidity_token(total_supply)?;
        let (amount0, amount1) = if amount_a.token().sorts_before(amount_b.token())? {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        if amount0.token() != self.token0() || amount1.token() != self.token1() {
            return Err(SwapError::TokenMismatch {
                expected: format!("{} and {}", self.token0().address, self.token1().address),
                found: format!("{} and {}", amount0.token().address, amount1.token().address),
            });
        }

        let liquidity = if total_supply.is_zero() {
            (amount0.raw() * amount1.raw()).sqrt() - BigInt::from(lp::MINIMUM_LIQUIDITY)
        } else {
            self.ensure_reserves()?;
            let share0 = amount0.raw() * total_supply.raw() / self.reserve0.raw();
            let share1 = amount1.raw() * total_supply.raw() / self.reserve1.raw();
            share0.min(share1)
        };

        if !liquidity.is_positive() {
            return Err(SwapError::InsufficientInputAmount);
        }
        CurrencyAmount::from_raw(self.liquidity_token.clone(), liquidity)
    }

    /// Amount of `token` redeemable for `liquidity` LP tokens.
    ///
    /// With `fee_on`, the supply is first inflated by the protocol fee accrued
    /// since `k_last`: `supply * (rootK - rootKLast) / (rootK * 5 + rootKLast)`.
    pub fn get_liquidity_value(
        &self,
        token: &Token,
        total_supply: &CurrencyAmount,
        liquidity: &CurrencyAmount,
        fee_on: bool,
        k_last: Option<&BigInt>,
    ) -> Result<CurrencyAmount> {
        self.ensure_involves(token)?;
        self.ensure_liquidity_token(total_supply)?;
        self.ensure_liquidity_token(liquidity)?;
        if liquidity.raw() > total_supply.raw() {
            return Err(SwapError::InvalidLiquidity {
                message: format!(
                    "liquidity {} exceeds total supply {}",
                    liquidity.raw(),
                    total_supply.raw()
                ),
            });
        }

        let mut supply = total_supply.raw().clone();
        if fee_on {
            let k_last = k_last.ok_or_else(|| SwapError::InvalidLiquidity {
                message: "k_last is required when the protocol fee is on".to_string(),
            })?;
            if !k_last.is_zero() {
                let root_k = (self.reserve0.raw() * self.reserve1.raw()).sqrt();
                let root_k_last = k_last.abs().sqrt();
                if root_k > root_k_last {
                    let numerator = total_supply.raw() * (&root_k - &root_k_last);
                    let denominator =
                        &root_k * BigInt::from(lp::PROTOCOL_FEE_DIVISOR) + &root_k_last;
                    supply += numerator / denominator;
                }
            }
        }

        if supply.is_zero() {
            return Err(SwapError::InvalidLiquidity {
                message: "total supply is zero".to_string(),
            });
        }

        let reserve = self.reserve_of(token)?;
        CurrencyAmount::from_raw(token.clone(), liquidity.raw() * reserve.raw() / supply)
    }
}
