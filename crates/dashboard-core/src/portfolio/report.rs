//! Portfolio Reports
//!
//! Plain-text and JSON renderings of a [`PortfolioSummary`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use super::PortfolioSummary;
use crate::error::Result;
use crate::model::PriceMap;

/// Render a summary as a fixed-width text report with an allocation chart
pub fn render_text(summary: &PortfolioSummary, prices: &PriceMap) -> String {
    if summary.holdings.is_empty() {
        return "Portfolio is empty.".to_string();
    }

    let mut output = String::from("Portfolio\n");
    output.push_str("═".repeat(60).as_str());
    output.push('\n');

    for row in summary.valuations(prices) {
        output.push_str(&format!(
            "{:<6} {:>14.6} units @ ${:.2} = ${:.2} ({}${:.2} / {}{:.1}%)\n",
            row.symbol.as_ref(),
            row.quantity,
            row.avg_cost,
            row.value,
            sign(row.pnl), row.pnl,
            sign(row.pnl), row.pnl_pct * dec!(100),
        ));
    }

    output.push_str("─".repeat(60).as_str());
    output.push('\n');

    output.push_str(&format!("Total Cost:  ${:.2}\n", summary.total_cost));
    output.push_str(&format!("Total Value: ${:.2}\n", summary.total_value));
    output.push_str(&format!(
        "Total P&L:   {}${:.2} ({}{:.2}%)\n",
        sign(summary.pnl), summary.pnl,
        sign(summary.pnl), summary.pnl_pct * dec!(100),
    ));

    output.push_str("\nAllocation:\n");
    for entry in &summary.allocation {
        let percent = entry.fraction * dec!(100);
        // One block per 5%
        let bar_len = (percent.to_f64().unwrap_or(0.0) / 5.0) as usize;
        let bar = "█".repeat(bar_len.min(20));
        output.push_str(&format!(
            "  {:<6} {:>5.1}% {}\n",
            entry.symbol.as_ref(),
            percent,
            bar
        ));
    }

    output
}

/// Pretty-printed JSON of the summary
pub fn render_json(summary: &PortfolioSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

fn sign(value: Decimal) -> &'static str {
    if value >= Decimal::ZERO { "+" } else { "" }
}
