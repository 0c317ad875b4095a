//! Duel service configuration.

use serde::{Deserialize, Serialize};
use std::env;

use crate::payout::{BPS_DENOMINATOR, CommissionRate, DEFAULT_COMMISSION_BPS};

/// Duel service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelConfig {
    /// Commission retained from won pots, in basis points (500 = 5%)
    pub commission_bps: u32,

    /// Users per leaderboard page
    pub leaderboard_page_size: usize,

    /// Capacity of the duel actor's inbox
    pub inbox_capacity: usize,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            commission_bps: DEFAULT_COMMISSION_BPS,
            leaderboard_page_size: 10,
            inbox_capacity: 100,
        }
    }
}

impl DuelConfig {
    /// Read `DUEL_COMMISSION_BPS`, `LEADERBOARD_PAGE_SIZE` and
    /// `DUEL_INBOX_CAPACITY`, keeping defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns a description of the first unparsable variable.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let config = Self {
            commission_bps: parse_var("DUEL_COMMISSION_BPS", defaults.commission_bps)?,
            leaderboard_page_size: parse_var("LEADERBOARD_PAGE_SIZE", defaults.leaderboard_page_size)?,
            inbox_capacity: parse_var("DUEL_INBOX_CAPACITY", defaults.inbox_capacity)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.commission_bps > BPS_DENOMINATOR {
            return Err(format!(
                "Commission must be at most {BPS_DENOMINATOR} bps, got {}",
                self.commission_bps
            ));
        }

        if self.leaderboard_page_size == 0 {
            return Err("Leaderboard page size must be positive".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be positive".to_string());
        }

        Ok(())
    }

    pub fn commission(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_bps)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
