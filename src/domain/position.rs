//! Open position and trade events.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// The single long position held between a buy and its sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: Decimal,
    pub share_count: u64,
}

impl Position {
    /// (price - entry_price) * share_count, clamped to the `Decimal` range.
    pub fn pnl_at(&self, price: Decimal) -> Decimal {
        price
            .saturating_sub(self.entry_price)
            .saturating_mul(Decimal::from(self.share_count))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyEvent {
    pub date: NaiveDate,
    pub price: Decimal,
    pub share_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellEvent {
    pub date: NaiveDate,
    pub price: Decimal,
    pub share_count: u64,
    pub pnl: Decimal,
    /// Closed by end-of-run liquidation rather than a death cross.
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeEvent {
    Buy(BuyEvent),
    Sell(SellEvent),
}

impl TradeEvent {
    pub fn date(&self) -> NaiveDate {
        match self {
            TradeEvent::Buy(b) => b.date,
            TradeEvent::Sell(s) => s.date,
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            TradeEvent::Buy(b) => b.price,
            TradeEvent::Sell(s) => s.price,
        }
    }
}
