//! EMI family: home, car, personal and gold loans.
//!
//! All four share one amortizing formula and differ only in the label the
//! presentation layer shows. A zero principal, zero rate or zero term yields
//! the all-zero result rather than an error.

use crate::input::{sanitize, to_count};
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{round_currency, round_paise};
use chrono::{Months, NaiveDate};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Longest schedule we are willing to materialize (100 years of months).
pub const MAX_SCHEDULE_MONTHS: u32 = 1_200;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    #[default]
    Home,
    Car,
    Personal,
    Gold,
}

impl LoanKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "home_loan" | "home" => Some(LoanKind::Home),
            "car_loan" | "car" => Some(LoanKind::Car),
            "personal_loan" | "personal" => Some(LoanKind::Personal),
            "gold_loan" | "gold" => Some(LoanKind::Gold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanTerm {
    #[schemars(description = "Tenure in years; converted to whole months by rounding years * 12")]
    Years(f64),
    #[schemars(description = "Tenure in whole months")]
    Months(u32),
}

impl LoanTerm {
    pub fn months(&self) -> u32 {
        match *self {
            LoanTerm::Years(years) => to_count((sanitize(years) * 12.0).round()),
            LoanTerm::Months(months) => months,
        }
    }
}

impl Default for LoanTerm {
    fn default() -> Self {
        LoanTerm::Months(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EmiInput {
    #[serde(default)]
    pub kind: LoanKind,

    #[schemars(description = "Loan amount in rupees")]
    pub principal: f64,

    #[schemars(description = "Nominal annual interest rate, e.g. 8.5 for 8.5%")]
    pub annual_rate_percent: f64,

    pub term: LoanTerm,

    #[serde(default)]
    #[schemars(description = "Attach a month-by-month amortization schedule to the result")]
    pub include_schedule: bool,

    #[serde(default)]
    #[schemars(description = "Due date of the first instalment; later instalments fall on the same day of each following month")]
    pub first_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmiResult {
    pub kind: LoanKind,
    pub months: u32,
    pub principal: f64,
    pub emi: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

impl EmiResult {
    fn zero(kind: LoanKind, months: u32) -> Self {
        Self {
            kind,
            months,
            principal: 0.0,
            emi: 0.0,
            total_interest: 0.0,
            total_payment: 0.0,
        }
    }

    /// `principal + total_interest == total_payment`, exactly.
    pub fn breakdown(&self) -> Breakdown {
        Breakdown::reconciled(
            self.total_payment,
            vec![
                BreakdownSegment::new("Principal", self.principal),
                BreakdownSegment::new("Total Interest", self.total_interest),
            ],
        )
    }
}

/// Unrounded instalment that amortizes `principal` over `months` periods at
/// `monthly_rate`.
///
/// Evaluated as `P·r / (1 − (1+r)^−n)`, which equals `P·r·(1+r)^n / ((1+r)^n − 1)`
/// but cannot overflow: for very long terms `(1+r)^−n` underflows to zero and
/// the instalment tends to the interest-only payment `P·r`.
pub fn monthly_installment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if principal <= 0.0 || monthly_rate <= 0.0 || months == 0 {
        return 0.0;
    }
    let discount = (1.0 + monthly_rate).powf(-(months as f64));
    principal * monthly_rate / (1.0 - discount)
}

pub fn calculate_emi(input: &EmiInput) -> EmiResult {
    let principal = sanitize(input.principal);
    let annual_rate = sanitize(input.annual_rate_percent);
    let months = input.term.months();
    let monthly_rate = annual_rate / 100.0 / 12.0;

    if principal == 0.0 || monthly_rate == 0.0 || months == 0 {
        debug!(
            "Degenerate {:?} loan (principal={}, rate={}, months={}), returning zero result",
            input.kind, principal, annual_rate, months
        );
        return EmiResult::zero(input.kind, months);
    }

    let raw_emi = monthly_installment(principal, monthly_rate, months);
    let raw_total = raw_emi * months as f64;
    if !raw_total.is_finite() {
        warn!(
            "{:?} loan repayment is not representable (principal={}, rate={}, months={}), returning zero result",
            input.kind, principal, annual_rate, months
        );
        return EmiResult::zero(input.kind, months);
    }

    // Totals come from the unrounded instalment; interest takes the rounding drift.
    let emi = round_currency(raw_emi);
    let total_payment = round_currency(raw_total);
    let principal = round_currency(principal);
    let total_interest = total_payment - principal;

    debug!(
        "{:?} loan: emi={} over {} months, total interest={}",
        input.kind, emi, months, total_interest
    );

    EmiResult {
        kind: input.kind,
        months,
        principal,
        emi,
        total_interest,
        total_payment,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleEntry {
    pub period: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: f64,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct YearlyTotal {
    pub year: u32,
    pub principal: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_principal(&self) -> f64 {
        self.entries.iter().map(|e| e.principal).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.entries.iter().map(|e| e.interest).sum()
    }

    /// Groups the schedule into loan years (periods 1-12 are year 1).
    pub fn yearly_totals(&self) -> Vec<YearlyTotal> {
        let mut years: Vec<YearlyTotal> = Vec::new();

        for entry in &self.entries {
            let year = (entry.period - 1) / 12 + 1;
            match years.last_mut() {
                Some(current) if current.year == year => {
                    current.principal += entry.principal;
                    current.interest += entry.interest;
                    current.closing_balance = entry.closing_balance;
                }
                _ => years.push(YearlyTotal {
                    year,
                    principal: entry.principal,
                    interest: entry.interest,
                    closing_balance: entry.closing_balance,
                }),
            }
        }

        for year in &mut years {
            year.principal = round_paise(year.principal);
            year.interest = round_paise(year.interest);
        }

        years
    }
}

/// Month-by-month split of each instalment into principal and interest.
///
/// The last period repays whatever balance remains, so the closing balance
/// ends at exactly zero and the principal components add back to the loan
/// amount. Empty for degenerate loans and for terms beyond
/// [`MAX_SCHEDULE_MONTHS`].
pub fn amortization_schedule(input: &EmiInput) -> Schedule {
    let principal = sanitize(input.principal);
    let monthly_rate = sanitize(input.annual_rate_percent) / 100.0 / 12.0;
    let months = input.term.months();

    if months > MAX_SCHEDULE_MONTHS {
        warn!(
            "Refusing to build a {}-month schedule (limit {})",
            months, MAX_SCHEDULE_MONTHS
        );
        return Schedule::default();
    }

    let emi = monthly_installment(principal, monthly_rate, months);
    if emi == 0.0 {
        return Schedule::default();
    }

    let mut entries = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for period in 1..=months {
        let interest = balance * monthly_rate;
        let principal_part = if period == months {
            balance
        } else {
            (emi - interest).min(balance)
        };
        let closing = if period == months {
            0.0
        } else {
            balance - principal_part
        };

        let due_date = input
            .first_due_date
            .and_then(|first| first.checked_add_months(Months::new(period - 1)));

        entries.push(ScheduleEntry {
            period,
            due_date,
            opening_balance: round_paise(balance),
            payment: round_paise(principal_part + interest),
            principal: round_paise(principal_part),
            interest: round_paise(interest),
            closing_balance: round_paise(closing),
        });

        balance = closing;
    }

    Schedule { entries }
}

impl From<&EmiResult> for CalculatorResult {
    fn from(result: &EmiResult) -> Self {
        CalculatorResult::new(CalculatorKind::Emi)
            .field("emi", result.emi)
            .field("totalInterest", result.total_interest)
            .field("totalPayment", result.total_payment)
            .field("principal", result.principal)
            .field("months", result.months as f64)
            .with_breakdown(result.breakdown())
    }
}
