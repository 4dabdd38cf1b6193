//! Trades & Best-Route Search
//!
//! A [`Trade`] prices one route for a fixed input (exact-in) or a fixed
//! output (exact-out). The best-trade functions enumerate acyclic routes over
//! a set of candidate pairs and keep the top results under a deterministic
//! ordering.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::amount::CurrencyAmount;
use crate::constants::search;
use crate::fraction::Fraction;
use crate::pair::{Pair, SwapFee};
use crate::percent::Percent;
use crate::price::Price;
use crate::route::Route;
use crate::router::{maximum_amount_with_slippage, minimum_amount_with_slippage, validate_slippage};
use crate::state::{Result, SwapError, TradeType};
use crate::token::Token;

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// A priced execution of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    route: Route,
    trade_type: TradeType,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    price_impact: Percent,
}

/// Latest state of `pair` among pools already moved by this trade
fn current_state<'a>(moved: &'a [Pair], pair: &'a Pair) -> &'a Pair {
    moved
        .iter()
        .find(|p| p.liquidity_token() == pair.liquidity_token())
        .unwrap_or(pair)
}

fn record_state(moved: &mut Vec<Pair>, next: Pair) {
    match moved
        .iter_mut()
        .find(|p| p.liquidity_token() == next.liquidity_token())
    {
        Some(slot) => *slot = next,
        None => moved.push(next),
    }
}

impl Trade {
    pub fn new(
        route: Route,
        amount: &CurrencyAmount,
        trade_type: TradeType,
        fee: SwapFee,
    ) -> Result<Self> {
        match trade_type {
            TradeType::ExactInput => Self::exact_in(route, amount, fee),
            TradeType::ExactOutput => Self::exact_out(route, amount, fee),
        }
    }

    /// Walk the route forward from a fixed input
    pub fn exact_in(route: Route, amount_in: &CurrencyAmount, fee: SwapFee) -> Result<Self> {
        if amount_in.token() != route.input() {
            return Err(SwapError::TokenMismatch {
                expected: route.input().address.to_string(),
                found: amount_in.token().address.to_string(),
            });
        }

        let mut moved: Vec<Pair> = Vec::with_capacity(route.hops());
        let mut amount = amount_in.clone();
        for pair in route.pairs() {
            let (output, next) = current_state(&moved, pair).get_output_amount(&amount, fee)?;
            record_state(&mut moved, next);
            amount = output;
        }

        Self::priced(route, TradeType::ExactInput, amount_in.clone(), amount)
    }

    /// Walk the route backward from a fixed output
    pub fn exact_out(route: Route, amount_out: &CurrencyAmount, fee: SwapFee) -> Result<Self> {
        if amount_out.token() != route.output() {
            return Err(SwapError::TokenMismatch {
                expected: route.output().address.to_string(),
                found: amount_out.token().address.to_string(),
            });
        }

        let mut moved: Vec<Pair> = Vec::with_capacity(route.hops());
        let mut amount = amount_out.clone();
        for pair in route.pairs().iter().rev() {
            let (input, next) = current_state(&moved, pair).get_input_amount(&amount, fee)?;
            record_state(&mut moved, next);
            amount = input;
        }

        Self::priced(route, TradeType::ExactOutput, amount, amount_out.clone())
    }

    fn priced(
        route: Route,
        trade_type: TradeType,
        input_amount: CurrencyAmount,
        output_amount: CurrencyAmount,
    ) -> Result<Self> {
        let execution_price = Price::from_amounts(&input_amount, &output_amount)?;

        // (quoted at mid price - received) / quoted at mid price
        let quoted = route.mid_price()?.quote_exact(&input_amount)?;
        let received = Fraction::from_integer(output_amount.raw().clone());
        let impact = (&quoted - &received).divide(&quoted)?;

        Ok(Self {
            route,
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            price_impact: Percent::from_fraction(impact),
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    /// Average rate actually obtained, output per input
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// Shortfall against the route's mid price. Informational only.
    pub fn price_impact(&self) -> &Percent {
        &self.price_impact
    }

    /// Least output to accept under `slippage`, rounded down.
    /// Exact-output trades return the fixed output.
    pub fn minimum_amount_out(&self, slippage: &Percent) -> Result<CurrencyAmount> {
        match self.trade_type {
            TradeType::ExactOutput => {
                validate_slippage(slippage)?;
                Ok(self.output_amount.clone())
            }
            TradeType::ExactInput => minimum_amount_with_slippage(&self.output_amount, slippage),
        }
    }

    /// Most input to spend under `slippage`, rounded up.
    /// Exact-input trades return the fixed input.
    pub fn maximum_amount_in(&self, slippage: &Percent) -> Result<CurrencyAmount> {
        match self.trade_type {
            TradeType::ExactInput => {
                validate_slippage(slippage)?;
                Ok(self.input_amount.clone())
            }
            TradeType::ExactOutput => maximum_amount_with_slippage(&self.input_amount, slippage),
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Total order over trades of the same direction, best first.
///
/// Exact-in prefers more output, exact-out prefers less input. Equal
/// amounts prefer fewer hops, then lower price impact. Token path and pool
/// identities break any remaining tie so equal-valued trades sort
/// deterministically.
pub fn trade_comparator(a: &Trade, b: &Trade) -> Ordering {
    let by_amounts = match a.trade_type {
        TradeType::ExactInput => b
            .output_amount
            .raw()
            .cmp(a.output_amount.raw())
            .then_with(|| a.input_amount.raw().cmp(b.input_amount.raw())),
        TradeType::ExactOutput => a
            .input_amount
            .raw()
            .cmp(b.input_amount.raw())
            .then_with(|| b.output_amount.raw().cmp(a.output_amount.raw())),
    };

    by_amounts
        .then_with(|| a.route.hops().cmp(&b.route.hops()))
        .then_with(|| a.price_impact.cmp(&b.price_impact))
        .then_with(|| {
            let path_a = a.route.path().iter().map(|t| &t.address);
            let path_b = b.route.path().iter().map(|t| &t.address);
            path_a.cmp(path_b)
        })
        .then_with(|| {
            let pools_a = a.route.pairs().iter().map(|p| &p.liquidity_token().address);
            let pools_b = b.route.pairs().iter().map(|p| &p.liquidity_token().address);
            pools_a.cmp(pools_b)
        })
}

/// Insert into a sorted vector bounded to `max_size`.
///
/// Equal items keep insertion order. Returns whatever fell off the end.
pub fn sorted_insert<T, F>(items: &mut Vec<T>, item: T, max_size: usize, compare: F) -> Option<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if max_size == 0 {
        return Some(item);
    }

    let index = items.partition_point(|existing| compare(existing, &item) != Ordering::Greater);
    if items.len() >= max_size && index == items.len() {
        return Some(item);
    }

    items.insert(index, item);
    if items.len() > max_size {
        items.pop()
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Best-trade search
// ---------------------------------------------------------------------------

/// Limits for best-trade search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestTradeOptions {
    /// Maximum number of pairs in a route
    pub max_hops: usize,
    /// Maximum number of trades returned
    pub max_results: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self {
            max_hops: search::DEFAULT_MAX_HOPS,
            max_results: search::DEFAULT_MAX_RESULTS,
        }
    }
}

impl BestTradeOptions {
    fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(SwapError::InvalidOptions {
                message: "max_hops must be at least 1".to_string(),
            });
        }
        if self.max_results == 0 {
            return Err(SwapError::InvalidOptions {
                message: "max_results must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial route on the search worklist
struct Branch {
    /// Indices into the candidate pairs, in walk order
    hops: Vec<usize>,
    /// Tokens this branch has already passed through
    visited: HashSet<Token>,
    /// Amount carried to the next hop
    amount: CurrencyAmount,
}

impl Branch {
    fn start(amount: &CurrencyAmount) -> Self {
        let mut visited = HashSet::new();
        visited.insert(amount.token().clone());
        Self {
            hops: Vec::new(),
            visited,
            amount: amount.clone(),
        }
    }

    fn extend(&self, pair_index: usize, amount: CurrencyAmount) -> Self {
        let mut hops = self.hops.clone();
        hops.push(pair_index);
        let mut visited = self.visited.clone();
        visited.insert(amount.token().clone());
        Self {
            hops,
            visited,
            amount,
        }
    }
}

/// Failures that rule out one candidate hop without failing the search
fn is_dead_end(err: &SwapError) -> bool {
    matches!(
        err,
        SwapError::InsufficientInputAmount
            | SwapError::InsufficientReserves
            | SwapError::AmountOutOfRange { .. }
    )
}

/// Best exact-input trades from `amount_in` to `token_out`.
///
/// Explores routes of up to `max_hops` pairs that never revisit a token or
/// reuse a pair, keeping the best `max_results` by [`trade_comparator`].
pub fn best_trade_exact_in(
    pairs: &[Pair],
    amount_in: &CurrencyAmount,
    token_out: &Token,
    fee: SwapFee,
    options: &BestTradeOptions,
) -> Result<Vec<Trade>> {
    options.validate()?;
    let mut best: Vec<Trade> = Vec::with_capacity(options.max_results);
    let mut worklist = vec![Branch::start(amount_in)];

    while let Some(branch) = worklist.pop() {
        for (index, pair) in pairs.iter().enumerate() {
            if branch.hops.contains(&index) || !pair.involves_token(branch.amount.token()) {
                continue;
            }

            let output = match pair.get_output_amount(&branch.amount, fee) {
                Ok((output, _)) => output,
                Err(e) if is_dead_end(&e) => continue,
                Err(e) => return Err(e),
            };

            if output.token() == token_out {
                let mut hops = branch.hops.clone();
                hops.push(index);
                let route_pairs = hops.iter().map(|&i| pairs[i].clone()).collect();
                let route = Route::new(route_pairs, amount_in.token().clone(), token_out.clone())?;
                match Trade::exact_in(route, amount_in, fee) {
                    Ok(trade) => {
                        sorted_insert(&mut best, trade, options.max_results, trade_comparator);
                    }
                    Err(e) if is_dead_end(&e) => continue,
                    Err(e) => return Err(e),
                }
            } else if branch.hops.len() + 1 < options.max_hops
                && !branch.visited.contains(output.token())
            {
                worklist.push(branch.extend(index, output));
            }
        }
    }

    Ok(best)
}

/// Best exact-output trades from `token_in` to `amount_out`.
///
/// Searches backward from the output token under the same rules as
/// [`best_trade_exact_in`].
pub fn best_trade_exact_out(
    pairs: &[Pair],
    token_in: &Token,
    amount_out: &CurrencyAmount,
    fee: SwapFee,
    options: &BestTradeOptions,
) -> Result<Vec<Trade>> {
    options.validate()?;
    let mut best: Vec<Trade> = Vec::with_capacity(options.max_results);
    let mut worklist = vec![Branch::start(amount_out)];

    while let Some(branch) = worklist.pop() {
        for (index, pair) in pairs.iter().enumerate() {
            if branch.hops.contains(&index) || !pair.involves_token(branch.amount.token()) {
                continue;
            }

            let input = match pair.get_input_amount(&branch.amount, fee) {
                Ok((input, _)) => input,
                Err(e) if is_dead_end(&e) => continue,
                Err(e) => return Err(e),
            };

            if input.token() == token_in {
                // hops were collected output-first
                let route_pairs = std::iter::once(index)
                    .chain(branch.hops.iter().rev().copied())
                    .map(|i| pairs[i].clone())
                    .collect();
                let route = Route::new(route_pairs, token_in.clone(), amount_out.token().clone())?;
                match Trade::exact_out(route, amount_out, fee) {
                    Ok(trade) => {
                        sorted_insert(&mut best, trade, options.max_results, trade_comparator);
                    }
                    Err(e) if is_dead_end(&e) => continue,
                    Err(e) => return Err(e),
                }
            } else if branch.hops.len() + 1 < options.max_hops
                && !branch.visited.contains(input.token())
            {
                worklist.push(branch.extend(index, input));
            }
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn a() -> Token {
        token("0x1::a::A", "A")
    }

    fn b() -> Token {
        token("0x2::b::B", "B")
    }

    fn c() -> Token {
        token("0x3::c::C", "C")
    }

    fn amount(token: Token, raw: u64) -> CurrencyAmount {
        CurrencyAmount::from_raw(token, raw).unwrap()
    }

    fn pair(x: Token, reserve_x: u64, y: Token, reserve_y: u64) -> Pair {
        Pair::new(amount(x, reserve_x), amount(y, reserve_y)).unwrap()
    }

    fn direct_route() -> Route {
        Route::new(vec![pair(a(), 100_000_000, b(), 100_000_000)], a(), b()).unwrap()
    }

    #[test]
    fn test_exact_in_matches_pair() {
        let trade = Trade::exact_in(direct_route(), &amount(a(), 1_000_000), SwapFee::default())
            .unwrap();
        assert_eq!(trade.trade_type(), TradeType::ExactInput);
        assert_eq!(trade.output_amount().raw_string(), "987648");
        assert_eq!(trade.output_amount().token(), &b());

        // mid price 1:1, so impact = (1_000_000 - 987_648) / 1_000_000
        assert_eq!(
            trade.price_impact(),
            &Percent::new(12_352, 1_000_000).unwrap()
        );
        assert_eq!(
            trade.execution_price().raw_ratio(),
            &Fraction::new(987_648, 1_000_000).unwrap()
        );
    }

    #[test]
    fn test_exact_out_covers_output() {
        let desired = amount(b(), 987_648);
        let trade = Trade::exact_out(direct_route(), &desired, SwapFee::default()).unwrap();
        assert_eq!(trade.output_amount(), &desired);
        assert_eq!(trade.input_amount().raw_string(), "1000000");
    }

    #[test]
    fn test_multi_hop_chains_amounts() {
        let route = Route::new(
            vec![
                pair(a(), 1_000_000, b(), 1_000_000),
                pair(b(), 1_000_000, c(), 1_000_000),
            ],
            a(),
            c(),
        )
        .unwrap();
        let fee = SwapFee::default();
        let trade = Trade::exact_in(route.clone(), &amount(a(), 10_000), fee).unwrap();

        let (first, _) = route.pairs()[0].get_output_amount(&amount(a(), 10_000), fee).unwrap();
        let (second, _) = route.pairs()[1].get_output_amount(&first, fee).unwrap();
        assert_eq!(trade.output_amount(), &second);

        // the minimal input for that output never exceeds what produced it,
        // and spending it still delivers the full output
        let back = Trade::exact_out(route.clone(), &second, fee).unwrap();
        assert!(back.input_amount().raw() <= trade.input_amount().raw());
        let replay = Trade::exact_in(route, back.input_amount(), fee).unwrap();
        assert!(replay.output_amount().raw() >= second.raw());
    }

    #[test]
    fn test_amount_must_match_route() {
        assert!(matches!(
            Trade::exact_in(direct_route(), &amount(b(), 1_000), SwapFee::default()),
            Err(SwapError::TokenMismatch { .. })
        ));
        assert!(matches!(
            Trade::exact_out(direct_route(), &amount(a(), 1_000), SwapFee::default()),
            Err(SwapError::TokenMismatch { .. })
        ));
    }

    #[test]
    fn test_slippage_bounds() {
        let zero_fee = SwapFee::from_bps(0).unwrap();
        let route = Route::new(vec![pair(a(), 1_000_000, b(), 2_000_000)], a(), b()).unwrap();
        let trade = Trade::exact_in(route.clone(), &amount(a(), 1_000_000), zero_fee).unwrap();
        assert_eq!(trade.output_amount().raw_string(), "1000000");

        let half_percent = Percent::from_bps(50);
        assert_eq!(
            trade.minimum_amount_out(&half_percent).unwrap().raw_string(),
            "995000"
        );
        assert_eq!(trade.maximum_amount_in(&half_percent).unwrap(), *trade.input_amount());

        let exact_out = Trade::exact_out(route, &amount(b(), 1_000), zero_fee).unwrap();
        let max_in = exact_out.maximum_amount_in(&half_percent).unwrap();
        assert!(max_in.raw() > exact_out.input_amount().raw());
        assert_eq!(exact_out.minimum_amount_out(&half_percent).unwrap(), *exact_out.output_amount());

        assert!(matches!(
            trade.minimum_amount_out(&Percent::from_bps(10_000)),
            Err(SwapError::InvalidSlippage { .. })
        ));
        assert!(matches!(
            trade.minimum_amount_out(&Percent::new(-1, 100).unwrap()),
            Err(SwapError::InvalidSlippage { .. })
        ));
    }

    #[test]
    fn test_sorted_insert_bounded_and_stable() {
        let mut items: Vec<(u32, char)> = Vec::new();
        let by_key = |x: &(u32, char), y: &(u32, char)| x.0.cmp(&y.0);

        assert_eq!(sorted_insert(&mut items, (2, 'a'), 3, by_key), None);
        assert_eq!(sorted_insert(&mut items, (1, 'b'), 3, by_key), None);
        assert_eq!(sorted_insert(&mut items, (2, 'c'), 3, by_key), None);
        assert_eq!(items, vec![(1, 'b'), (2, 'a'), (2, 'c')]);

        assert_eq!(sorted_insert(&mut items, (3, 'd'), 3, by_key), Some((3, 'd')));
        assert_eq!(sorted_insert(&mut items, (0, 'e'), 3, by_key), Some((2, 'c')));
        assert_eq!(items, vec![(0, 'e'), (1, 'b'), (2, 'a')]);
        assert_eq!(sorted_insert(&mut items, (0, 'f'), 0, by_key), Some((0, 'f')));
    }

    #[test]
    fn test_equal_output_prefers_fewer_hops() {
        let fee = SwapFee::from_bps(0).unwrap();
        let input = amount(a(), 1_000);

        let direct = Route::new(vec![pair(a(), 1_000_000, c(), 1_000_900)], a(), c()).unwrap();
        let two_hop = Route::new(
            vec![
                pair(a(), 1_000_000_000_000, b(), 2_000_000_000_000),
                pair(b(), 2_000_000_000_000, c(), 1_000_000_000_000),
            ],
            a(),
            c(),
        )
        .unwrap();

        let direct = Trade::exact_in(direct, &input, fee).unwrap();
        let two_hop = Trade::exact_in(two_hop, &input, fee).unwrap();
        assert_eq!(direct.output_amount().raw_string(), "999");
        assert_eq!(two_hop.output_amount().raw_string(), "999");
        // the deep route has less impact but more hops
        assert!(two_hop.price_impact() < direct.price_impact());

        assert_eq!(trade_comparator(&direct, &two_hop), Ordering::Less);
        assert_eq!(trade_comparator(&two_hop, &direct), Ordering::Greater);
    }

    fn triangle() -> Vec<Pair> {
        vec![
            pair(a(), 1_000_000, c(), 1_000_000),
            pair(a(), 100_000_000, b(), 100_000_000),
            pair(b(), 100_000_000, c(), 100_000_000),
        ]
    }

    #[test]
    fn test_best_trade_exact_in_prefers_deeper_route() {
        let trades = best_trade_exact_in(
            &triangle(),
            &amount(a(), 100_000),
            &c(),
            SwapFee::default(),
            &BestTradeOptions::default(),
        )
        .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].route().path(), &[a(), b(), c()]);
        assert_eq!(trades[1].route().hops(), 1);
        assert!(trades[0].output_amount().raw() > trades[1].output_amount().raw());
    }

    #[test]
    fn test_best_trade_respects_hop_limit() {
        let options = BestTradeOptions {
            max_hops: 1,
            max_results: 3,
        };
        let trades = best_trade_exact_in(
            &triangle(),
            &amount(a(), 100_000),
            &c(),
            SwapFee::default(),
            &options,
        )
        .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].route().hops(), 1);
    }

    #[test]
    fn test_best_trade_exact_out() {
        let trades = best_trade_exact_out(
            &triangle(),
            &a(),
            &amount(c(), 100_000),
            SwapFee::default(),
            &BestTradeOptions::default(),
        )
        .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].route().path(), &[a(), b(), c()]);
        assert!(trades[0].input_amount().raw() < trades[1].input_amount().raw());
        for trade in &trades {
            assert_eq!(trade.output_amount().raw_string(), "100000");
            assert_eq!(trade.trade_type(), TradeType::ExactOutput);
        }
    }

    #[test]
    fn test_best_trade_skips_dead_ends() {
        let pairs = vec![
            pair(a(), 0, b(), 1_000),
            pair(a(), 1_000_000, c(), 1_000_000),
        ];
        let trades = best_trade_exact_in(
            &pairs,
            &amount(a(), 10_000),
            &b(),
            SwapFee::default(),
            &BestTradeOptions::default(),
        )
        .unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn test_best_trade_rejects_empty_options() {
        let options = BestTradeOptions {
            max_hops: 0,
            max_results: 1,
        };
        assert!(matches!(
            best_trade_exact_in(&triangle(), &amount(a(), 1), &c(), SwapFee::default(), &options),
            Err(SwapError::InvalidOptions { .. })
        ));
    }
}
