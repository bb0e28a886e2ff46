//! Rule-based habit nudges over recent waste logs.

use crate::calc::{round_whole, DAYS_PER_MONTH, INR_PER_KWH};
use crate::types::DailyLogRecord;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Average daily waste below which the household is congratulated.
pub const LOW_WASTE_KG_PER_DAY: f64 = 3.0;
/// Plastic share of total waste above which a warning fires.
pub const HIGH_PLASTIC_SHARE: f64 = 0.3;

pub const START_LOGGING_TEXT: &str = "Start logging your waste to get personalized insights!";
pub const HIGH_PLASTIC_TEXT: &str =
    "Your plastic waste is high. Try using reusable bags and containers!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeKind {
    Info,
    Success,
    Warning,
    Tip,
}

impl NudgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NudgeKind::Info => "info",
            NudgeKind::Success => "success",
            NudgeKind::Warning => "warning",
            NudgeKind::Tip => "tip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    #[serde(rename = "type")]
    pub kind: NudgeKind,
    pub text: String,
}

impl Nudge {
    fn new(kind: NudgeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Turn a window of daily logs into advisory messages.
///
/// All applicable rules fire, always in the order success, warning, tip.
pub fn generate_nudges(records: &[DailyLogRecord]) -> Vec<Nudge> {
    if records.is_empty() {
        return vec![Nudge::new(NudgeKind::Info, START_LOGGING_TEXT)];
    }

    let total_waste: f64 = records.iter().map(|r| r.total_kg).sum();
    let avg_daily = total_waste / records.len() as f64;
    let plastic_waste: f64 = records.iter().map(|r| r.plastic_kg).sum();

    let mut nudges = Vec::with_capacity(3);

    if avg_daily < LOW_WASTE_KG_PER_DAY {
        nudges.push(Nudge::new(
            NudgeKind::Success,
            format!(
                "Amazing! You're generating only {}kg waste daily. Keep it up!",
                one_decimal(avg_daily)
            ),
        ));
    }

    if plastic_waste > total_waste * HIGH_PLASTIC_SHARE {
        nudges.push(Nudge::new(NudgeKind::Warning, HIGH_PLASTIC_TEXT));
    }

    let monthly_saving = round_whole(avg_daily * INR_PER_KWH * DAYS_PER_MONTH);
    nudges.push(Nudge::new(
        NudgeKind::Tip,
        format!("You could save ₹{monthly_saving} monthly by composting your organic waste!"),
    ));

    nudges
}

/// Format with one decimal place, rounding the exact binary value and sending
/// exact ties away from zero.
///
/// `{:.1}` already rounds the exact value, so 0.35 (stored as 0.3499...) gives
/// "0.3". It sends exact ties to even ("1.2" for 1.25), so those are bumped.
fn one_decimal(value: f64) -> String {
    // Exact decimal expansion; a tie has exactly two fractional digits, the
    // second being 5.
    let exact = format!("{:.60}", value.abs());
    let frac = exact.split_once('.').map_or("", |(_, f)| f);
    let is_tie = frac.as_bytes().get(1) == Some(&b'5')
        && frac.get(2..).is_some_and(|rest| rest.bytes().all(|b| b == b'0'));
    if !is_tie {
        return format!("{value:.1}");
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{:.1}", (value.abs() * 10.0).ceil() / 10.0)
}

/// First date included in a nudge window of `window_days` ending today.
pub fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today - Duration::days(i64::from(window_days))
}
