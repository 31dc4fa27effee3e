use crate::error::{CalculatorError, Result};
use log::warn;

/// Longest horizon any growth, savings or withdrawal plan is projected over.
pub const MAX_PLAN_YEARS: u32 = 100;
pub const MAX_PLAN_MONTHS: u32 = MAX_PLAN_YEARS * 12;

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// Rounds a monetary amount to the nearest whole rupee.
///
/// Ties round half away from zero (`f64::round`). Every calculator in the crate
/// uses this rule for headline figures, so results stay comparable across
/// calculators and match what a browser's `Math.round` shows for positive values.
/// Non-finite input reads as zero; calculators check [`is_representable`] first.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.round()
}

/// Caps a horizon given in years at [`MAX_PLAN_YEARS`].
pub fn cap_plan_years(calculator: &str, years: f64) -> f64 {
    let limit = MAX_PLAN_YEARS as f64;
    if years > limit {
        warn!("{} horizon of {} years capped at {}", calculator, years, limit);
        return limit;
    }
    years
}

/// Caps a horizon given in months at [`MAX_PLAN_MONTHS`].
pub fn cap_plan_months(calculator: &str, months: u32) -> u32 {
    if months > MAX_PLAN_MONTHS {
        warn!("{} horizon of {} months capped at {}", calculator, months, MAX_PLAN_MONTHS);
        return MAX_PLAN_MONTHS;
    }
    months
}

/// `false` (with a warning) when an unrounded amount overflowed. Callers
/// return their zero result instead of letting [`round_currency`] publish it.
pub fn is_representable(calculator: &str, amounts: &[f64]) -> bool {
    if amounts.iter().all(|a| a.is_finite()) {
        return true;
    }
    warn!("{} result is too large to represent, returning zero result", calculator);
    false
}

/// Rounds to two decimal places (paise), same tie rule as [`round_currency`].
pub fn round_paise(value: f64) -> f64 {
    round_to_places(value, 2)
}

/// Rounds a percentage figure (CAGR, rate echoes) to two decimal places.
pub fn round_percent(value: f64) -> f64 {
    round_to_places(value, 2)
}

fn round_to_places(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = value * 10f64.powi(places);
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10f64.powi(places)
}

/// Formats a rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(amount: f64) -> String {
    let rounded = round_currency(amount);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    format!("{}₹{}", sign, group_indian(&digits))
}

/// Short lakh/crore form used in headline cards, e.g. `₹43.39 L` or `₹1.20 Cr`.
pub fn format_inr_compact(amount: f64) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };

    if abs >= CRORE {
        format!("{}₹{:.2} Cr", sign, abs / CRORE)
    } else if abs >= LAKH {
        format!("{}₹{:.2} L", sign, abs / LAKH)
    } else {
        format_inr(amount)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

pub fn validate_percent(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CalculatorError::InvalidConfig {
            field: field.to_string(),
            details: format!("{} must be a percentage between 0 and 100", value),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalculatorError::InvalidConfig {
            field: field.to_string(),
            details: format!("{} must be a finite, non-negative number", value),
        });
    }
    Ok(())
}

pub fn validate_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalculatorError::InvalidConfig {
            field: field.to_string(),
            details: format!("{} must be greater than zero", value),
        });
    }
    Ok(())
}
