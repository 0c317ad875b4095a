//! Pot and commission arithmetic for settled duels.
//!
//! Commission is kept in basis points so that
//! `floor(stake × 2 × (1 − rate))` is exact in integer arithmetic.

use serde::{Deserialize, Serialize};

/// Basis-point denominator (100.00%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Commission retained from every won pot (5.00%).
pub const DEFAULT_COMMISSION_BPS: u32 = 500;

/// Fraction of the pot retained by the house.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CommissionRate {
    bps: u32,
}

impl CommissionRate {
    /// Create a rate from basis points, clamped to 100%.
    #[must_use]
    pub const fn from_bps(bps: u32) -> Self {
        let bps = if bps > BPS_DENOMINATOR {
            BPS_DENOMINATOR
        } else {
            bps
        };
        Self { bps }
    }

    #[must_use]
    pub const fn bps(self) -> u32 {
        self.bps
    }

    #[must_use]
    pub fn as_fraction(self) -> f64 {
        f64::from(self.bps) / f64::from(BPS_DENOMINATOR)
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        Self::from_bps(DEFAULT_COMMISSION_BPS)
    }
}

/// Breakdown of a won pot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payout {
    /// Both stakes combined.
    pub pot: i64,
    /// Amount kept by the house.
    pub commission: i64,
    /// Amount paid to the winner.
    pub net: i64,
}

impl Payout {
    /// Split the pot of a duel staked at `stake` per participant.
    #[must_use]
    pub fn for_stake(stake: i64, rate: CommissionRate) -> Self {
        let pot = i128::from(stake.max(0)) * 2;
        let net = i128::from(compute_net_payout(stake, rate));
        let clamp = |amount: i128| i64::try_from(amount).unwrap_or(i64::MAX);
        Self {
            pot: clamp(pot),
            commission: clamp(pot - net),
            net: clamp(net),
        }
    }
}

/// Net amount paid to the winner of a duel staked at `stake` per participant.
///
/// Defined as `floor(stake × 2 × (1 − rate))`. Non-positive stakes pay
/// nothing; duel creation already rejects them.
#[must_use]
pub fn compute_net_payout(stake: i64, rate: CommissionRate) -> i64 {
    if stake <= 0 {
        return 0;
    }
    let pot = i128::from(stake) * 2;
    let kept = i128::from(BPS_DENOMINATOR - rate.bps());
    let net = pot * kept / i128::from(BPS_DENOMINATOR);
    i64::try_from(net).unwrap_or(i64::MAX)
}
