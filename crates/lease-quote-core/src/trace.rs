//! Human-readable computation traces.
//!
//! Consumers display the trace verbatim, so line wording is part of the
//! observable output of every engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{round_currency, Money, Rate};

/// Ordered list of trace lines for one quote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing trace (e.g. rental on top of lease).
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Start a titled section, separated from the previous one by a blank line.
    pub fn section(&mut self, title: &str) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("=== {title} ==="));
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Format a currency amount as whole units with thousands separators, e.g. "1,234,568 KRW".
pub fn krw(amount: Money) -> String {
    format!("{} KRW", group_thousands(round_currency(amount)))
}

/// Format a fraction as a percentage with two decimals ("55.00%").
pub fn pct(rate: Rate) -> String {
    format!("{:.2}%", rate * dec!(100))
}

fn group_thousands(value: Decimal) -> String {
    let digits = value.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < Decimal::ZERO {
        format!("-{grouped}")
    } else {
        grouped
    }
}
