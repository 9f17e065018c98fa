//! Console reporter: trade log and final summary on stdout.

use crate::domain::account::Outcome;
use crate::domain::error::CrossError;
use crate::domain::position::TradeEvent;
use crate::ports::report_port::{ReportContext, ReportPort};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

const BANNER: &str = "==============================";

/// Two decimal places, halves rounded away from zero.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.2}", rounded)
}

pub fn format_event(event: &TradeEvent) -> String {
    match event {
        TradeEvent::Buy(b) => format!(
            "BUY  | {} | Price: {} | Shares: {}",
            b.date,
            format_money(b.price),
            b.share_count
        ),
        TradeEvent::Sell(s) => format!(
            "SELL | {} | Price: {} | Trade P/L: {}",
            s.date,
            format_money(s.price),
            format_money(s.pnl)
        ),
    }
}

pub fn render_summary(ctx: &ReportContext<'_>) -> String {
    let result = ctx.result;
    let mut out = String::new();

    for event in &result.events {
        out.push_str(&format_event(event));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(BANNER);
    out.push('\n');
    match result.outcome() {
        Outcome::Profit => out.push_str("FINAL RESULT: PROFIT\n"),
        Outcome::Loss => out.push_str("FINAL RESULT: LOSS\n"),
    }
    out.push_str(&format!(
        "Final Profit / Loss: {}\n",
        format_money(result.cumulative_pnl())
    ));
    out.push_str(&format!(
        "Trades: {} ({} winning)\n",
        result.trade_count(),
        result.winning_trades()
    ));
    out.push_str(BANNER);
    out.push('\n');
    out
}

/// Writes the summary to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for ConsoleReporter {
    fn write(&self, ctx: &ReportContext<'_>) -> Result<(), CrossError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(render_summary(ctx).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
