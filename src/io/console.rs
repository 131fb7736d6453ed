//! Human-readable conversion summary
//!
//! Layout:
//!
//! ```text
//! [FX Conversion Simulation]
//! Date used: 2025-08-01
//! Rate USD->AUD: 1.520000
//! Amount: 200.00 USD  →  304.00 AUD
//!
//! Before:
//!   AUD 1,000.00 | EUR 1,000.00 | USD 1,000.00
//!
//! After:
//!   AUD 1,304.00 | EUR 1,000.00 | USD 800.00
//!
//! Impact & Controls:
//!   Carbon: 0.10 kg CO₂  (Low)  |  Compliance: clear (no compliance rules triggered)
//!
//! One-liner:
//!   USD->AUD @ 1.5200 | 200.00 USD → 304.00 AUD | CO₂ 0.10 kg CO₂ (Low) | clear
//! ```

use crate::types::{Balances, TransactionRecord};
use rust_decimal::Decimal;
use std::io::Write;

/// Write the summary of one recorded conversion
pub fn write_summary(record: &TransactionRecord, output: &mut dyn Write) -> std::io::Result<()> {
    let (src, dst) = match record.parsed_pair() {
        Some(pair) => (pair.src, pair.dst),
        None => (record.pair.clone(), String::new()),
    };
    let compliance = &record.compliance;
    let carbon = &record.carbon;

    writeln!(output, "[FX Conversion Simulation]")?;
    writeln!(output, "Date used: {}", record.fx_date_used)?;
    writeln!(output, "Rate {}->{}: {:.6}", src, dst, record.rate.round_dp(6))?;
    writeln!(
        output,
        "Amount: {} {}  →  {} {}",
        format_money(record.amount_src),
        src,
        format_money(record.amount_dst),
        dst
    )?;

    writeln!(output)?;
    writeln!(output, "Before:")?;
    writeln!(output, "  {}", format_balances(&record.balances_before))?;

    writeln!(output)?;
    writeln!(output, "After:")?;
    writeln!(output, "  {}", format_balances(&record.balances_after))?;

    writeln!(output)?;
    writeln!(output, "Impact & Controls:")?;
    writeln!(
        output,
        "  Carbon: {}  ({})  |  Compliance: {} ({})",
        format_kg(carbon.kg),
        carbon.badge,
        compliance.status(),
        compliance.reason()
    )?;

    writeln!(output)?;
    writeln!(output, "One-liner:")?;
    writeln!(
        output,
        "  {}->{} @ {:.4} | {} {} → {} {} | CO₂ {} ({}) | {}",
        src,
        dst,
        record.rate.round_dp(4),
        format_money(record.amount_src),
        src,
        format_money(record.amount_dst),
        dst,
        format_kg(carbon.kg),
        carbon.badge,
        compliance.status()
    )?;

    Ok(())
}

/// Two decimals with comma thousands separators (`1,304.00`)
pub fn format_money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac)
}

pub fn format_kg(kg: Decimal) -> String {
    format!("{:.2} kg CO₂", kg.round_dp(2))
}

fn format_balances(balances: &Balances) -> String {
    balances
        .iter()
        .map(|(code, amount)| format!("{} {}", code, format_money(*amount)))
        .collect::<Vec<_>>()
        .join(" | ")
}
