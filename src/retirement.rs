//! EPF and NPS accumulation.

use crate::config::CalculatorConfig;
use crate::input::{sanitize, to_count};
use crate::recurring::sip_future_value;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{cap_plan_months, is_representable, round_currency, MAX_PLAN_YEARS};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct EpfInput {
    #[schemars(description = "Current monthly basic salary plus DA")]
    pub monthly_basic_salary: f64,
    #[schemars(description = "Whole years of service left until withdrawal")]
    pub years: u32,
    #[serde(default)]
    #[schemars(description = "Expected yearly salary increase in percent")]
    pub annual_increase_percent: f64,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    #[schemars(description = "Overrides the configured EPF interest rate")]
    pub interest_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EpfResult {
    pub maturity_amount: f64,
    pub opening_balance: f64,
    pub total_employee: f64,
    pub total_employer: f64,
    pub total_interest: f64,
}

/// Contributions land monthly; interest accrues monthly on the running
/// balance but is credited once at each year end. Salary steps up once a
/// year.
pub fn calculate_epf(input: &EpfInput, config: &CalculatorConfig) -> EpfResult {
    let mut salary = sanitize(input.monthly_basic_salary);
    let increase = sanitize(input.annual_increase_percent) / 100.0;
    let opening = sanitize(input.current_balance);
    let rate = sanitize(input.interest_rate_percent.unwrap_or(config.epf_interest_percent)) / 100.0;
    let years = input.years.min(MAX_PLAN_YEARS);

    if years < input.years {
        warn!("EPF horizon of {} years capped at {}", input.years, years);
    }
    if (salary == 0.0 && opening == 0.0) || years == 0 {
        return EpfResult {
            maturity_amount: round_currency(opening),
            opening_balance: round_currency(opening),
            ..Default::default()
        };
    }

    let mut balance = opening;
    let mut total_employee = 0.0;
    let mut total_employer = 0.0;

    for _ in 0..years {
        let employee = salary * config.epf_employee_percent / 100.0;
        let employer = salary * config.epf_employer_percent / 100.0;
        let mut accrued = 0.0;

        for _ in 0..12 {
            balance += employee + employer;
            total_employee += employee;
            total_employer += employer;
            accrued += balance * rate / 12.0;
        }

        balance += accrued;
        salary *= 1.0 + increase;
    }

    if !is_representable("EPF", &[balance, total_employee, total_employer]) {
        return EpfResult::default();
    }

    debug!("EPF after {} years: balance {}", years, balance);

    let maturity_amount = round_currency(balance);
    let opening_balance = round_currency(opening);
    let total_employee = round_currency(total_employee);
    let total_employer = round_currency(total_employer);

    EpfResult {
        maturity_amount,
        opening_balance,
        total_employee,
        total_employer,
        total_interest: maturity_amount - opening_balance - total_employee - total_employer,
    }
}

impl From<&EpfResult> for CalculatorResult {
    fn from(result: &EpfResult) -> Self {
        let mut segments = Vec::new();
        if result.opening_balance > 0.0 {
            segments.push(BreakdownSegment::new("Opening Balance", result.opening_balance));
        }
        segments.push(BreakdownSegment::new("Employee Contribution", result.total_employee));
        segments.push(BreakdownSegment::new("Employer Contribution", result.total_employer));
        segments.push(BreakdownSegment::new("Interest Earned", result.total_interest));

        CalculatorResult::new(CalculatorKind::Epf)
            .field("maturityAmount", result.maturity_amount)
            .field("totalEmployee", result.total_employee)
            .field("totalEmployer", result.total_employer)
            .field("totalInterest", result.total_interest)
            .with_breakdown(Breakdown::reconciled(result.maturity_amount, segments))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct NpsInput {
    pub monthly_contribution: f64,
    pub expected_return_percent: f64,
    #[schemars(description = "Years until retirement")]
    pub years: f64,
    #[schemars(description = "Share of the corpus used to buy an annuity; raised to the statutory minimum if lower")]
    pub annuity_percent: f64,
    #[schemars(description = "Expected annual annuity rate")]
    pub annuity_rate_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NpsResult {
    pub total_invested: f64,
    pub interest_earned: f64,
    pub total_corpus: f64,
    pub annuity_percent: f64,
    pub annuity_purchase: f64,
    pub lump_sum: f64,
    pub monthly_pension: f64,
}

pub fn calculate_nps(input: &NpsInput, config: &CalculatorConfig) -> NpsResult {
    let monthly = sanitize(input.monthly_contribution);
    let rate = sanitize(input.expected_return_percent);
    let months = cap_plan_months("NPS", to_count((sanitize(input.years) * 12.0).round()));
    let annuity_percent = sanitize(input.annuity_percent)
        .max(config.nps_min_annuity_percent)
        .min(100.0);
    let annuity_rate = sanitize(input.annuity_rate_percent);

    if monthly == 0.0 || months == 0 {
        return NpsResult::default();
    }

    let corpus = sip_future_value(monthly, rate, months);
    let invested = monthly * months as f64;
    let pension = corpus * annuity_percent / 100.0 * annuity_rate / 100.0 / 12.0;
    if !is_representable("NPS", &[corpus, invested, pension]) {
        return NpsResult::default();
    }

    let total_corpus = round_currency(corpus);
    let total_invested = round_currency(invested);
    let annuity_purchase = round_currency(total_corpus * annuity_percent / 100.0);

    NpsResult {
        total_invested,
        interest_earned: total_corpus - total_invested,
        total_corpus,
        annuity_percent,
        annuity_purchase,
        lump_sum: total_corpus - annuity_purchase,
        monthly_pension: round_currency(annuity_purchase * annuity_rate / 100.0 / 12.0),
    }
}

impl From<&NpsResult> for CalculatorResult {
    fn from(result: &NpsResult) -> Self {
        CalculatorResult::new(CalculatorKind::Nps)
            .field("totalInvested", result.total_invested)
            .field("interestEarned", result.interest_earned)
            .field("totalCorpus", result.total_corpus)
            .field("annuityPurchase", result.annuity_purchase)
            .field("lumpSum", result.lump_sum)
            .field("monthlyPension", result.monthly_pension)
            .with_breakdown(Breakdown::reconciled(
                result.total_corpus,
                vec![
                    BreakdownSegment::new("Lump Sum", result.lump_sum),
                    BreakdownSegment::new("Annuity Purchase", result.annuity_purchase),
                ],
            ))
    }
}
