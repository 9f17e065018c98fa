//! Fixed trading budget and realized P/L.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Profit,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Profit => write!(f, "PROFIT"),
            Outcome::Loss => write!(f, "LOSS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub budget: Decimal,
    pub cumulative_pnl: Decimal,
}

impl Account {
    pub fn new(budget: Decimal) -> Self {
        Account {
            budget,
            cumulative_pnl: Decimal::ZERO,
        }
    }

    /// floor(budget / price); zero when the price is not positive, exceeds the
    /// budget, or is so small that the quotient leaves the `Decimal` range.
    pub fn shares_affordable(&self, price: Decimal) -> u64 {
        if price <= Decimal::ZERO || self.budget <= Decimal::ZERO {
            return 0;
        }
        self.budget
            .checked_div(price)
            .and_then(|shares| shares.floor().to_u64())
            .unwrap_or(0)
    }

    pub fn realize(&mut self, pnl: Decimal) {
        self.cumulative_pnl = self.cumulative_pnl.saturating_add(pnl);
    }

    /// A zero result counts as profit.
    pub fn outcome(&self) -> Outcome {
        if self.cumulative_pnl >= Decimal::ZERO {
            Outcome::Profit
        } else {
            Outcome::Loss
        }
    }
}
