use crate::config::CalculatorConfig;
use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{format_inr, round_currency};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GratuityInput {
    #[schemars(description = "Last drawn monthly basic salary plus dearness allowance")]
    pub last_drawn_salary: f64,
    pub years_of_service: f64,
    #[schemars(description = "Whether the employer is covered under the Payment of Gratuity Act")]
    pub covered_under_act: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GratuityResult {
    pub gratuity_amount: f64,
    pub tax_free_amount: f64,
    pub taxable_amount: f64,
    /// True when service is below the statutory minimum.
    pub below_minimum_service: bool,
}

/// `salary · 15 · years / 26` under the Act, `/ 30` otherwise; nothing is
/// payable before the minimum service period. The tax-free part is capped at
/// the configured ceiling.
pub fn calculate_gratuity(input: &GratuityInput, config: &CalculatorConfig) -> GratuityResult {
    let salary = sanitize(input.last_drawn_salary);
    let years = sanitize(input.years_of_service);

    if years < config.gratuity_min_service_years {
        debug!(
            "{} years of service is below the {}-year minimum, no gratuity",
            years, config.gratuity_min_service_years
        );
        return GratuityResult {
            below_minimum_service: true,
            ..Default::default()
        };
    }

    let divisor = if input.covered_under_act {
        config.gratuity_divisor_covered
    } else {
        config.gratuity_divisor_uncovered
    };

    let gratuity_amount = round_currency(salary * config.gratuity_days_per_year * years / divisor);
    let ceiling = config.gratuity_tax_free_ceiling;

    GratuityResult {
        gratuity_amount,
        tax_free_amount: gratuity_amount.min(ceiling),
        taxable_amount: (gratuity_amount - ceiling).max(0.0),
        below_minimum_service: false,
    }
}

fn advisory(result: &GratuityResult, config: &CalculatorConfig) -> Option<String> {
    if result.below_minimum_service {
        Some(format!(
            "Gratuity is payable only after {} years of continuous service.",
            config.gratuity_min_service_years
        ))
    } else if result.taxable_amount > 0.0 {
        Some(format!(
            "Gratuity above {} is taxable.",
            format_inr(config.gratuity_tax_free_ceiling)
        ))
    } else {
        None
    }
}

pub fn to_calculator_result(result: &GratuityResult, config: &CalculatorConfig) -> CalculatorResult {
    CalculatorResult::new(CalculatorKind::Gratuity)
        .field("gratuityAmount", result.gratuity_amount)
        .field("taxFreeAmount", result.tax_free_amount)
        .field("taxableAmount", result.taxable_amount)
        .with_breakdown(Breakdown::reconciled(
            result.gratuity_amount,
            vec![
                BreakdownSegment::new("Tax-free", result.tax_free_amount),
                BreakdownSegment::new("Taxable", result.taxable_amount),
            ],
        ))
        .with_advisory(advisory(result, config))
}
