//! Pari-mutuel payout projections
//!
//! All arithmetic runs on lamports in `u128`; values are converted to SOL and
//! rounded only when a [`QuoteSummary`] is produced. The fee is charged on
//! profit only:
//!
//! ```text
//! side'  = side + stake
//! total' = total + stake
//! gross  = stake * total' / side'
//! fee    = max(0, gross - stake) * fee_bps / 10_000
//! net    = gross - fee
//! ```
//!
//! A stake on an empty side owns the whole side, so its gross is the entire
//! post-stake pool.

use crate::accounts::{Market, MarketStatus, RaceMarket, RacePosition, UserPosition};
use crate::codec::{CodecError, CodecResult};
use crate::types::LAMPORTS_PER_SOL;
use serde::Serialize;

const BPS_DENOMINATOR: u128 = 10_000;

/// Display precision used when none is configured
pub const DEFAULT_DECIMALS: u32 = 4;

/// Projection for one hypothetical stake, in lamports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub stake: u64,
    /// Side pool after the stake
    pub side_pool_after: u64,
    /// Total pool after the stake
    pub total_pool_after: u64,
    pub gross_payout: u64,
    /// `gross - stake`; zero when the stake cannot lose money
    pub profit: u64,
    pub fee: u64,
    pub net_payout: u64,
    pub fee_bps: u16,
}

impl Quote {
    /// Fraction of the side pool the stake would own
    pub fn share(&self) -> f64 {
        if self.side_pool_after == 0 {
            return 0.0;
        }
        self.stake as f64 / self.side_pool_after as f64
    }

    /// Payout per unit staked, before fees
    pub fn gross_multiplier(&self) -> f64 {
        self.gross_payout as f64 / self.stake as f64
    }

    pub fn summary(&self, decimals: u32) -> QuoteSummary {
        QuoteSummary {
            stake: round_sol(self.stake, decimals),
            share: round_to(self.share(), decimals),
            gross_payout: round_sol(self.gross_payout, decimals),
            profit: round_sol(self.profit, decimals),
            fee: round_sol(self.fee, decimals),
            net_payout: round_sol(self.net_payout, decimals),
            multiplier: round_to(self.gross_multiplier(), decimals),
        }
    }
}

/// Rounded SOL values for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub stake: f64,
    pub share: f64,
    pub gross_payout: f64,
    pub profit: f64,
    pub fee: f64,
    pub net_payout: f64,
    pub multiplier: f64,
}

/// What a position can claim right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClaimProjection {
    /// Market not settled yet
    Pending,
    AlreadyClaimed,
    /// Settled against every side the position holds
    Lost,
    Winnings {
        gross: u64,
        fee: u64,
        net: u64,
    },
    Refund {
        amount: u64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PariMutuelQuoter {
    fee_bps: u16,
}

impl PariMutuelQuoter {
    pub fn new(fee_bps: u16) -> CodecResult<Self> {
        if fee_bps as u128 > BPS_DENOMINATOR {
            return Err(CodecError::invalid("fee_bps", format!("{} exceeds 10000", fee_bps)));
        }
        Ok(Self { fee_bps })
    }

    /// Quoter charging the fee rates captured on a market at creation
    pub fn for_market(market: &Market) -> CodecResult<Self> {
        let snapshot = market.fee_snapshot;
        Self::new(snapshot.platform_fee_bps.saturating_add(snapshot.creator_fee_bps))
    }

    pub fn for_race(race: &RaceMarket) -> CodecResult<Self> {
        let snapshot = race.fee_snapshot;
        Self::new(snapshot.platform_fee_bps.saturating_add(snapshot.creator_fee_bps))
    }

    pub fn fee_bps(&self) -> u16 {
        self.fee_bps
    }

    /// Binary market stake on `outcome` (true = yes)
    pub fn quote_binary(&self, yes_pool: u64, no_pool: u64, outcome: bool, stake: u64) -> CodecResult<Quote> {
        let (side, other) = if outcome { (yes_pool, no_pool) } else { (no_pool, yes_pool) };
        self.quote(side, side as u128 + other as u128, stake)
    }

    /// Race market stake on outcome `index`
    pub fn quote_race(&self, pools: &[u64], index: usize, stake: u64) -> CodecResult<Quote> {
        let side = *pools.get(index).ok_or_else(|| {
            CodecError::invalid(
                "outcome_index",
                format!("{} is outside the {} active outcomes", index, pools.len()),
            )
        })?;
        let total: u128 = pools.iter().map(|p| *p as u128).sum();
        self.quote(side, total, stake)
    }

    fn quote(&self, side: u64, total: u128, stake: u64) -> CodecResult<Quote> {
        if stake == 0 {
            return Err(CodecError::invalid("stake", "must be greater than zero"));
        }
        let side_after = side as u128 + stake as u128;
        let total_after = total + stake as u128;
        let gross = stake as u128 * total_after / side_after;
        let (fee, profit) = self.fee_on(gross, stake as u128);

        Ok(Quote {
            stake,
            side_pool_after: clamp(side_after),
            total_pool_after: clamp(total_after),
            gross_payout: clamp(gross),
            profit: clamp(profit),
            fee: clamp(fee),
            net_payout: clamp(gross - fee),
            fee_bps: self.fee_bps,
        })
    }

    /// Returns (fee, profit)
    fn fee_on(&self, gross: u128, stake: u128) -> (u128, u128) {
        let profit = gross.saturating_sub(stake);
        (profit * self.fee_bps as u128 / BPS_DENOMINATOR, profit)
    }

    fn settle(&self, stake: u64, winning_pool: u64, total_pool: u64) -> ClaimProjection {
        if stake == 0 || winning_pool == 0 {
            return ClaimProjection::Lost;
        }
        let gross = stake as u128 * total_pool as u128 / winning_pool as u128;
        let (fee, _) = self.fee_on(gross, stake as u128);
        ClaimProjection::Winnings {
            gross: clamp(gross),
            fee: clamp(fee),
            net: clamp(gross - fee),
        }
    }
}

/// Implied probability of each pool; uniform when nothing is staked
pub fn implied_probabilities(pools: &[u64]) -> Vec<f64> {
    let total: u128 = pools.iter().map(|p| *p as u128).sum();
    if total == 0 {
        let n = pools.len().max(1) as f64;
        return vec![1.0 / n; pools.len()];
    }
    pools.iter().map(|p| *p as f64 / total as f64).collect()
}

/// Claim projection for a binary position against its market.
///
/// Payouts use the pools frozen at close when present, the live pools
/// otherwise.
pub fn position_payout(market: &Market, position: &UserPosition) -> CodecResult<ClaimProjection> {
    if position.claimed {
        return Ok(ClaimProjection::AlreadyClaimed);
    }
    if market.status.is_refundable() {
        return Ok(ClaimProjection::Refund {
            amount: position.total_staked(),
        });
    }
    let winner = match (market.status, market.winning_outcome) {
        (MarketStatus::Resolved, Some(winner)) => winner,
        _ => return Ok(ClaimProjection::Pending),
    };

    let (yes, no) = if market.snapshot_yes_pool > 0 || market.snapshot_no_pool > 0 {
        (market.snapshot_yes_pool, market.snapshot_no_pool)
    } else {
        (market.yes_pool, market.no_pool)
    };
    let winning_pool = if winner { yes } else { no };
    let quoter = PariMutuelQuoter::for_market(market)?;
    Ok(quoter.settle(position.amount_on(winner), winning_pool, yes.saturating_add(no)))
}

/// Claim projection for a race position against its race market
pub fn race_position_payout(race: &RaceMarket, position: &RacePosition) -> CodecResult<ClaimProjection> {
    if position.claimed {
        return Ok(ClaimProjection::AlreadyClaimed);
    }
    if race.status.is_refundable() {
        return Ok(ClaimProjection::Refund {
            amount: position.total_bet,
        });
    }
    let winner = match (race.status, race.winning_outcome) {
        (MarketStatus::Resolved, Some(winner)) => winner as usize,
        _ => return Ok(ClaimProjection::Pending),
    };
    let winning_pool = race.outcome(winner as u8).map(|o| o.pool).unwrap_or(0);
    let stake = position.bets.get(winner).copied().unwrap_or(0);
    let quoter = PariMutuelQuoter::for_race(race)?;
    Ok(quoter.settle(stake, winning_pool, race.total_pool))
}

pub fn round_sol(lamports: u64, decimals: u32) -> f64 {
    round_to(lamports as f64 / LAMPORTS_PER_SOL as f64, decimals)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

fn clamp(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}
