use crate::config::CalculatorConfig;
use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::round_currency;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct HraInput {
    #[schemars(description = "Monthly basic salary (plus DA where it forms part of retirement benefits)")]
    pub basic_salary: f64,
    #[schemars(description = "Monthly HRA received from the employer")]
    pub hra_received: f64,
    #[schemars(description = "Monthly rent paid")]
    pub rent_paid: f64,
    pub is_metro: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HraRule {
    #[default]
    ActualHra,
    RentInExcessOfBasic,
    PercentOfBasic,
}

impl HraRule {
    pub fn label(&self) -> &'static str {
        match self {
            HraRule::ActualHra => "Actual HRA received",
            HraRule::RentInExcessOfBasic => "Rent paid minus share of basic",
            HraRule::PercentOfBasic => "Share of basic salary",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HraResult {
    pub actual_hra: f64,
    pub rent_in_excess: f64,
    pub basic_limit: f64,
    /// The rule that produced the smallest limit.
    pub binding_rule: HraRule,
    pub monthly_exemption: f64,
    pub monthly_taxable: f64,
    pub annual_exemption: f64,
    pub annual_taxable: f64,
}

impl HraResult {
    pub fn limits(&self) -> Vec<BreakdownSegment> {
        [
            (HraRule::ActualHra, self.actual_hra),
            (HraRule::RentInExcessOfBasic, self.rent_in_excess),
            (HraRule::PercentOfBasic, self.basic_limit),
        ]
        .into_iter()
        .map(|(rule, amount)| {
            BreakdownSegment::new(rule.label(), amount).binding(rule == self.binding_rule)
        })
        .collect()
    }

    pub fn advisory(&self) -> Option<String> {
        if self.actual_hra > 0.0 && self.rent_in_excess == 0.0 {
            Some("Rent paid does not exceed the basic-salary threshold, so no HRA is exempt.".to_string())
        } else {
            None
        }
    }
}

/// Exemption is the least of three limits: the HRA actually received, rent
/// paid in excess of a share of basic, and a metro/non-metro share of basic.
/// A non-positive salary, HRA or rent gives the zero result.
pub fn calculate_hra(input: &HraInput, config: &CalculatorConfig) -> HraResult {
    let basic = sanitize(input.basic_salary);
    let hra = sanitize(input.hra_received);
    let rent = sanitize(input.rent_paid);

    if basic <= 0.0 || hra <= 0.0 || rent <= 0.0 {
        debug!("HRA inputs not all positive, returning zero result");
        return HraResult::default();
    }

    let rent_in_excess = (rent - basic * config.hra_rent_threshold_percent / 100.0).max(0.0);
    let basic_percent = if input.is_metro {
        config.hra_metro_percent
    } else {
        config.hra_non_metro_percent
    };
    let basic_limit = basic * basic_percent / 100.0;

    let (binding_rule, exemption) = [
        (HraRule::ActualHra, hra),
        (HraRule::RentInExcessOfBasic, rent_in_excess),
        (HraRule::PercentOfBasic, basic_limit),
    ]
    .into_iter()
    .fold((HraRule::ActualHra, f64::INFINITY), |best, candidate| {
        if candidate.1 < best.1 {
            candidate
        } else {
            best
        }
    });

    let monthly_exemption = round_currency(exemption);
    let monthly_hra = round_currency(hra);
    let monthly_taxable = monthly_hra - monthly_exemption;

    HraResult {
        actual_hra: monthly_hra,
        rent_in_excess: round_currency(rent_in_excess),
        basic_limit: round_currency(basic_limit),
        binding_rule,
        monthly_exemption,
        monthly_taxable,
        annual_exemption: monthly_exemption * 12.0,
        annual_taxable: monthly_taxable * 12.0,
    }
}

impl From<&HraResult> for CalculatorResult {
    fn from(result: &HraResult) -> Self {
        CalculatorResult::new(CalculatorKind::Hra)
            .field("monthlyExemption", result.monthly_exemption)
            .field("monthlyTaxable", result.monthly_taxable)
            .field("annualExemption", result.annual_exemption)
            .field("annualTaxable", result.annual_taxable)
            .with_breakdown(Breakdown::reconciled(
                result.actual_hra,
                vec![
                    BreakdownSegment::new("Exempt HRA", result.monthly_exemption),
                    BreakdownSegment::new("Taxable HRA", result.monthly_taxable),
                ],
            ))
            .with_limits(result.limits())
            .with_advisory(result.advisory())
    }
}
