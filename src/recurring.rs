//! Plans with a payment every period: PPF, SIP and SWP.

use crate::growth::InvestmentResult;
use crate::input::{sanitize, to_count};
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{cap_plan_months, is_representable, round_currency, MAX_PLAN_YEARS};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PpfInput {
    pub yearly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PpfResult {
    pub maturity_amount: f64,
    pub total_invested: f64,
    pub total_interest: f64,
}

/// Each year the contribution is deposited first and the whole balance then
/// compounds once. Swapping those two steps changes the answer.
pub fn calculate_ppf(input: &PpfInput) -> PpfResult {
    let contribution = sanitize(input.yearly_contribution);
    let rate = sanitize(input.annual_rate_percent) / 100.0;
    let years = input.years.min(MAX_PLAN_YEARS);

    if years < input.years {
        warn!("PPF horizon of {} years capped at {}", input.years, years);
    }
    if contribution == 0.0 || years == 0 {
        debug!("PPF with no contribution or no years, returning zero result");
        return PpfResult::default();
    }

    let mut balance = 0.0;
    for _ in 0..years {
        balance = (balance + contribution) * (1.0 + rate);
    }

    let invested = contribution * years as f64;
    if !is_representable("PPF", &[balance, invested]) {
        return PpfResult::default();
    }

    let maturity_amount = round_currency(balance);
    let total_invested = round_currency(invested);

    PpfResult {
        maturity_amount,
        total_invested,
        total_interest: maturity_amount - total_invested,
    }
}

impl From<&PpfResult> for CalculatorResult {
    fn from(result: &PpfResult) -> Self {
        CalculatorResult::new(CalculatorKind::Ppf)
            .field("maturityAmount", result.maturity_amount)
            .field("totalInvested", result.total_invested)
            .field("totalInterest", result.total_interest)
            .with_breakdown(Breakdown::reconciled(
                result.maturity_amount,
                vec![
                    BreakdownSegment::new("Total Invested", result.total_invested),
                    BreakdownSegment::new("Total Interest", result.total_interest),
                ],
            ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SipInput {
    pub monthly_investment: f64,
    pub expected_return_percent: f64,
    pub years: f64,
}

/// Future value of `months` instalments paid at the start of each month.
pub fn sip_future_value(monthly: f64, annual_rate_percent: f64, months: u32) -> f64 {
    let i = annual_rate_percent / 100.0 / 12.0;
    let n = months as f64;
    if i == 0.0 {
        return monthly * n;
    }
    monthly * ((1.0 + i).powf(n) - 1.0) / i * (1.0 + i)
}

pub fn calculate_sip(input: &SipInput) -> InvestmentResult {
    let monthly = sanitize(input.monthly_investment);
    let rate = sanitize(input.expected_return_percent);
    let months = cap_plan_months("SIP", to_count((sanitize(input.years) * 12.0).round()));

    if monthly == 0.0 || months == 0 {
        return InvestmentResult::default();
    }

    let maturity = sip_future_value(monthly, rate, months);
    InvestmentResult::from_unrounded(monthly * months as f64, maturity)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SwpInput {
    pub initial_corpus: f64,
    pub monthly_withdrawal: f64,
    pub expected_return_percent: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SwpResult {
    pub initial_corpus: f64,
    pub total_withdrawn: f64,
    pub final_balance: f64,
    /// Months in which the full withdrawal was paid.
    pub months_sustained: u32,
    pub exhausted: bool,
}

impl SwpResult {
    pub fn advisory(&self) -> Option<String> {
        if self.exhausted {
            Some(format!(
                "The corpus runs out after {} full monthly withdrawals.",
                self.months_sustained
            ))
        } else {
            None
        }
    }
}

/// Each month the balance earns interest first, then the withdrawal is paid
/// out (never more than what is left). Stops once the corpus is empty.
pub fn calculate_swp(input: &SwpInput) -> SwpResult {
    let corpus = sanitize(input.initial_corpus);
    let withdrawal = sanitize(input.monthly_withdrawal);
    let monthly_rate = sanitize(input.expected_return_percent) / 100.0 / 12.0;
    let months = cap_plan_months("SWP", to_count((sanitize(input.years) * 12.0).round()));

    if corpus == 0.0 || months == 0 {
        return SwpResult::default();
    }

    let mut balance = corpus;
    let mut total_withdrawn = 0.0;
    let mut months_sustained = 0;
    let mut exhausted = false;

    for month in 1..=months {
        balance += balance * monthly_rate;
        let paid = withdrawal.min(balance);
        balance -= paid;
        total_withdrawn += paid;

        if paid == withdrawal {
            months_sustained += 1;
        }
        if withdrawal > 0.0 && (paid < withdrawal || (balance <= 0.0 && month < months)) {
            exhausted = true;
            break;
        }
    }

    if !is_representable("SWP", &[balance, total_withdrawn]) {
        return SwpResult::default();
    }

    debug!(
        "SWP: withdrew {} over {} months, final balance {}",
        total_withdrawn, months_sustained, balance
    );

    SwpResult {
        initial_corpus: round_currency(corpus),
        total_withdrawn: round_currency(total_withdrawn),
        final_balance: round_currency(balance.max(0.0)),
        months_sustained,
        exhausted,
    }
}

impl From<&SwpResult> for CalculatorResult {
    fn from(result: &SwpResult) -> Self {
        CalculatorResult::new(CalculatorKind::Swp)
            .field("initialCorpus", result.initial_corpus)
            .field("totalWithdrawn", result.total_withdrawn)
            .field("finalBalance", result.final_balance)
            .field("monthsSustained", result.months_sustained as f64)
            .with_advisory(result.advisory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MAX_PLAN_MONTHS;

    #[test]
    fn test_ppf_fifteen_years() {
        let result = calculate_ppf(&PpfInput {
            yearly_contribution: 150_000.0,
            annual_rate_percent: 7.1,
            years: 15,
        });
        assert_eq!(result.total_invested, 2_250_000.0);
        assert_eq!(result.maturity_amount, 4_068_209.0);
        assert_eq!(
            result.total_interest,
            result.maturity_amount - result.total_invested
        );
    }

    #[test]
    fn test_ppf_adds_before_compounding() {
        let result = calculate_ppf(&PpfInput {
            yearly_contribution: 1_000.0,
            annual_rate_percent: 10.0,
            years: 2,
        });
        // (1000 * 1.1 + 1000) * 1.1; compounding first would give 2100.
        assert_eq!(result.maturity_amount, 2_310.0);
    }

    #[test]
    fn test_ppf_zero_years() {
        let result = calculate_ppf(&PpfInput {
            yearly_contribution: 150_000.0,
            annual_rate_percent: 7.1,
            years: 0,
        });
        assert_eq!(result, PpfResult::default());
    }

    #[test]
    fn test_ppf_long_horizon_is_capped() {
        let input = |years| PpfInput {
            yearly_contribution: 150_000.0,
            annual_rate_percent: 7.1,
            years,
        };
        let capped = calculate_ppf(&input(u32::MAX));
        assert_eq!(capped, calculate_ppf(&input(MAX_PLAN_YEARS)));
        assert_eq!(capped.total_invested, 15_000_000.0);
        assert!(capped.total_interest > 0.0);
        assert_eq!(calculate_ppf(&input(10_000)), capped);
    }

    #[test]
    fn test_ppf_overflow_is_zero_not_negative() {
        let result = calculate_ppf(&PpfInput {
            yearly_contribution: 150_000.0,
            annual_rate_percent: 1e9,
            years: 100,
        });
        assert_eq!(result, PpfResult::default());
    }

    #[test]
    fn test_sip_future_value() {
        let result = calculate_sip(&SipInput {
            monthly_investment: 10_000.0,
            expected_return_percent: 12.0,
            years: 10.0,
        });
        assert_eq!(result.invested, 1_200_000.0);
        assert_eq!(result.maturity_amount, 2_323_391.0);
        assert!(result.breakdown().is_balanced(0.0));
    }

    #[test]
    fn test_sip_zero_rate_is_plain_savings() {
        let result = calculate_sip(&SipInput {
            monthly_investment: 5_000.0,
            expected_return_percent: 0.0,
            years: 2.0,
        });
        assert_eq!(result.maturity_amount, 120_000.0);
        assert_eq!(result.estimated_returns, 0.0);
    }

    #[test]
    fn test_sip_long_horizon_never_reports_negative_returns() {
        let sip = |years, rate| {
            calculate_sip(&SipInput {
                monthly_investment: 5_000.0,
                expected_return_percent: rate,
                years,
            })
        };
        let capped = sip(10_000.0, 12.0);
        assert_eq!(capped, sip(100.0, 12.0));
        assert_eq!(capped.invested, 5_000.0 * MAX_PLAN_MONTHS as f64);
        assert!(capped.estimated_returns > 0.0);

        assert_eq!(sip(100.0, 1e9), InvestmentResult::default());
    }

    #[test]
    fn test_swp_sustainable_plan() {
        let result = calculate_swp(&SwpInput {
            initial_corpus: 1_000_000.0,
            monthly_withdrawal: 5_000.0,
            expected_return_percent: 8.0,
            years: 5.0,
        });
        assert!(!result.exhausted);
        assert_eq!(result.months_sustained, 60);
        assert_eq!(result.total_withdrawn, 300_000.0);
        assert!(result.final_balance > 1_000_000.0);
        assert!(result.advisory().is_none());
    }

    #[test]
    fn test_swp_exhausts_corpus() {
        let result = calculate_swp(&SwpInput {
            initial_corpus: 100_000.0,
            monthly_withdrawal: 15_000.0,
            expected_return_percent: 0.0,
            years: 2.0,
        });
        assert!(result.exhausted);
        assert_eq!(result.months_sustained, 6);
        assert_eq!(result.total_withdrawn, 100_000.0);
        assert_eq!(result.final_balance, 0.0);
        assert!(result.advisory().unwrap().contains("6"));
    }

    #[test]
    fn test_swp_exact_depletion_on_last_month_is_not_exhaustion() {
        let result = calculate_swp(&SwpInput {
            initial_corpus: 120_000.0,
            monthly_withdrawal: 10_000.0,
            expected_return_percent: 0.0,
            years: 1.0,
        });
        assert!(!result.exhausted);
        assert_eq!(result.months_sustained, 12);
        assert_eq!(result.final_balance, 0.0);
    }
}
