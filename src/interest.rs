use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{is_representable, round_paise};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SimpleInterestInput {
    pub principal: f64,
    pub rate_percent: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimpleInterestResult {
    pub principal: f64,
    pub interest: f64,
    pub total: f64,
}

/// `interest = P·R·T / 100`, reported to the paisa.
pub fn calculate_simple_interest(input: &SimpleInterestInput) -> SimpleInterestResult {
    let principal = sanitize(input.principal);
    let rate = sanitize(input.rate_percent);
    let years = sanitize(input.years);

    let raw_interest = principal * rate * years / 100.0;
    if !is_representable("Simple interest", &[raw_interest]) {
        return SimpleInterestResult::default();
    }

    let principal = round_paise(principal);
    let interest = round_paise(raw_interest);

    SimpleInterestResult {
        principal,
        interest,
        total: round_paise(principal + interest),
    }
}

impl From<&SimpleInterestResult> for CalculatorResult {
    fn from(result: &SimpleInterestResult) -> Self {
        CalculatorResult::new(CalculatorKind::SimpleInterest)
            .field("interest", result.interest)
            .field("total", result.total)
            .field("principal", result.principal)
            .with_breakdown(Breakdown::reconciled(
                result.total,
                vec![
                    BreakdownSegment::new("Principal", result.principal),
                    BreakdownSegment::new("Interest", result.interest),
                ],
            ))
    }
}
