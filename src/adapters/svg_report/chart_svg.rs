//! SVG price chart: close, both moving averages and trade markers.

use crate::adapters::console_report::format_money;
use crate::domain::position::TradeEvent;
use crate::ports::report_port::ReportContext;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt::Write;

pub const WIDTH: f64 = 1400.0;
pub const HEIGHT: f64 = 700.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 40.0;
const TOP: f64 = 80.0;
const BOTTOM: f64 = 60.0;

const GRID_LINES: usize = 5;
const DATE_TICKS: usize = 6;
const MARKER: f64 = 8.0;

const CLOSE_COLOR: &str = "#2563eb";
const FAST_COLOR: &str = "#f59e0b";
const SLOW_COLOR: &str = "#10b981";
const BUY_COLOR: &str = "#16a34a";
const SELL_COLOR: &str = "#dc2626";

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Maps bar indices and prices onto the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub min_price: f64,
    pub max_price: f64,
    pub count: usize,
}

impl ChartFrame {
    pub fn new(ctx: &ReportContext<'_>) -> Self {
        let prices = ctx
            .series
            .bars()
            .iter()
            .map(|b| b.close)
            .chain(
                ctx.indicators
                    .points
                    .iter()
                    .flat_map(|p| p.ma_fast.into_iter().chain(p.ma_slow)),
            )
            .map(to_f64);

        let (mut min_price, mut max_price) = prices
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            });
        if !min_price.is_finite() || !max_price.is_finite() {
            min_price = 0.0;
            max_price = 1.0;
        } else if max_price - min_price < f64::EPSILON {
            min_price -= 1.0;
            max_price += 1.0;
        }

        Self {
            min_price,
            max_price,
            count: ctx.series.len(),
        }
    }

    fn plot_width(&self) -> f64 {
        WIDTH - LEFT - RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - TOP - BOTTOM
    }

    pub fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            return LEFT + self.plot_width() / 2.0;
        }
        LEFT + self.plot_width() * index as f64 / (self.count - 1) as f64
    }

    pub fn y(&self, price: f64) -> f64 {
        TOP + self.plot_height() * (self.max_price - price) / (self.max_price - self.min_price)
    }
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn polyline(frame: &ChartFrame, points: impl Iterator<Item = (usize, Decimal)>) -> String {
    points
        .map(|(i, v)| format!("{:.1},{:.1}", frame.x(i), frame.y(to_f64(v))))
        .collect::<Vec<_>>()
        .join(" ")
}

fn marker(x: f64, y: f64, up: bool) -> String {
    let (tip, base) = if up {
        (y - MARKER, y + MARKER * 0.75)
    } else {
        (y + MARKER, y - MARKER * 0.75)
    };
    format!(
        "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
        x,
        tip,
        x - MARKER,
        base,
        x + MARKER,
        base
    )
}

pub fn render_chart(ctx: &ReportContext<'_>) -> String {
    let frame = ChartFrame::new(ctx);
    let symbol = escape_xml(ctx.symbol());
    let windows = ctx.indicators.windows;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="30" text-anchor="middle" font-size="20">{} Golden Cross Strategy</text>"#,
        WIDTH / 2.0,
        symbol
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="55" text-anchor="middle" font-size="16">Final Profit/Loss: {}</text>"#,
        WIDTH / 2.0,
        format_money(ctx.result.cumulative_pnl())
    );

    if ctx.series.is_empty() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.0}" y="{:.0}" text-anchor="middle">No price data available.</text>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    // Horizontal grid with price labels.
    for step in 0..=GRID_LINES {
        let price = frame.min_price
            + (frame.max_price - frame.min_price) * step as f64 / GRID_LINES as f64;
        let y = frame.y(price);
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e5e7eb"/>"##,
            LEFT,
            WIDTH - RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
            LEFT - 8.0,
            y + 4.0,
            price
        );
    }

    // Date ticks along the x axis.
    let bars = ctx.series.bars();
    let ticks = DATE_TICKS.min(bars.len());
    for t in 0..ticks {
        let index = if ticks > 1 {
            t * (bars.len() - 1) / (ticks - 1)
        } else {
            0
        };
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            frame.x(index),
            HEIGHT - BOTTOM + 20.0,
            bars[index].date
        );
    }

    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-size="14">Date</text>"#,
        LEFT + (WIDTH - LEFT - RIGHT) / 2.0,
        HEIGHT - 15.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{:.0}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {:.0})">Price</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    );

    let close_points = polyline(&frame, bars.iter().enumerate().map(|(i, b)| (i, b.close)));
    let _ = writeln!(
        svg,
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" stroke-opacity="0.8" points="{}"/>"#,
        CLOSE_COLOR, close_points
    );

    let points = &ctx.indicators.points;
    let fast_points = polyline(
        &frame,
        points.iter().enumerate().filter_map(|(i, p)| p.ma_fast.map(|v| (i, v))),
    );
    let slow_points = polyline(
        &frame,
        points.iter().enumerate().filter_map(|(i, p)| p.ma_slow.map(|v| (i, v))),
    );
    for (line, color) in [(fast_points, FAST_COLOR), (slow_points, SLOW_COLOR)] {
        if !line.is_empty() {
            let _ = writeln!(
                svg,
                r#"<polyline fill="none" stroke="{}" stroke-width="1.5" stroke-dasharray="6 4" points="{}"/>"#,
                color, line
            );
        }
    }

    for event in &ctx.result.events {
        let Some(index) = ctx.series.index_of(event.date()) else {
            continue;
        };
        let x = frame.x(index);
        let y = frame.y(to_f64(event.price()));
        let (class, color, up) = match event {
            TradeEvent::Buy(_) => ("buy", BUY_COLOR, true),
            TradeEvent::Sell(_) => ("sell", SELL_COLOR, false),
        };
        let _ = writeln!(
            svg,
            r#"<polygon class="{}" fill="{}" points="{}"/>"#,
            class,
            color,
            marker(x, y, up)
        );
    }

    // Legend.
    let legend = [
        ("Close Price".to_string(), CLOSE_COLOR),
        (format!("MA {}", windows.fast), FAST_COLOR),
        (format!("MA {}", windows.slow), SLOW_COLOR),
        ("BUY".to_string(), BUY_COLOR),
        ("SELL".to_string(), SELL_COLOR),
    ];
    let legend_x = LEFT + 12.0;
    for (row, (label, color)) in legend.iter().enumerate() {
        let y = TOP + 16.0 + row as f64 * 18.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="14" height="4" fill="{}"/>"#,
            legend_x,
            y - 4.0,
            color
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            legend_x + 20.0,
            y,
            label
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BacktestResult;
    use crate::domain::bar::RawBar;
    use crate::domain::engine::run_backtest;
    use crate::domain::indicator::{IndicatorSeries, Windows, compute_indicators};
    use crate::domain::series::{Series, clean};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fixture(closes: &[Decimal], windows: Windows) -> (Series, IndicatorSeries, BacktestResult) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let raw = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| RawBar::new(start + chrono::Duration::days(i as i64), c))
            .collect();
        let series = clean("T&T", raw).unwrap();
        let indicators = compute_indicators(&series, windows);
        let result = run_backtest(&series, &indicators, dec!(5000));
        (series, indicators, result)
    }

    fn v_shape() -> Vec<Decimal> {
        (0..40)
            .map(|i: i64| Decimal::from(if i < 20 { 120 - i } else { 60 + 3 * i }))
            .collect()
    }

    #[test]
    fn frame_spans_plot_area() {
        let (series, indicators, result) =
            fixture(&[dec!(10), dec!(20), dec!(30)], Windows { fast: 2, slow: 3 });
        let ctx = ReportContext {
            series: &series,
            indicators: &indicators,
            result: &result,
        };
        let frame = ChartFrame::new(&ctx);

        assert_relative_eq!(frame.min_price, 10.0);
        assert_relative_eq!(frame.max_price, 30.0);
        assert_relative_eq!(frame.x(0), LEFT);
        assert_relative_eq!(frame.x(2), WIDTH - RIGHT);
        assert_relative_eq!(frame.y(30.0), TOP);
        assert_relative_eq!(frame.y(10.0), HEIGHT - BOTTOM);
    }

    #[test]
    fn flat_prices_get_a_nonzero_range() {
        let (series, indicators, result) =
            fixture(&[dec!(5), dec!(5)], Windows { fast: 1, slow: 2 });
        let ctx = ReportContext {
            series: &series,
            indicators: &indicators,
            result: &result,
        };
        let frame = ChartFrame::new(&ctx);
        assert_relative_eq!(frame.max_price - frame.min_price, 2.0);
        assert!(frame.y(5.0).is_finite());
    }

    #[test]
    fn chart_contains_series_and_markers() {
        let (series, indicators, result) = fixture(&v_shape(), Windows { fast: 3, slow: 10 });
        assert!(!result.buys().is_empty(), "fixture should trade");

        let ctx = ReportContext {
            series: &series,
            indicators: &indicators,
            result: &result,
        };
        let svg = render_chart(&ctx);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("T&amp;T Golden Cross Strategy"));
        assert!(svg.contains("Final Profit/Loss:"));
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert_eq!(svg.matches(r#"class="buy""#).count(), result.buys().len());
        assert_eq!(svg.matches(r#"class="sell""#).count(), result.sells().len());
        assert!(svg.contains("MA 3"));
        assert!(svg.contains("MA 10"));
    }

    #[test]
    fn escape_xml_special_characters() {
        assert_eq!(escape_xml(r#"<a&"b">"#), "&lt;a&amp;&quot;b&quot;&gt;");
    }
}
