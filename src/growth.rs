use crate::error::{CalculatorError, Result};
use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{cap_plan_years, is_representable, round_currency, round_percent};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CagrInput {
    pub initial_value: f64,
    pub final_value: f64,
    #[schemars(description = "Holding period in years; fractional years are allowed")]
    pub years: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CagrResult {
    pub cagr_percent: f64,
    pub total_return: f64,
    pub absolute_return_percent: f64,
}

/// Any input `<= 0` gives the zero result.
pub fn calculate_cagr(input: &CagrInput) -> CagrResult {
    let initial = sanitize(input.initial_value);
    let final_value = sanitize(input.final_value);
    let years = sanitize(input.years);

    if initial <= 0.0 || final_value <= 0.0 || years <= 0.0 {
        debug!("CAGR inputs not all positive, returning zero result");
        return CagrResult::default();
    }

    let growth = final_value / initial;
    let cagr = growth.powf(1.0 / years) - 1.0;
    if !is_representable("CAGR", &[growth, cagr]) {
        return CagrResult::default();
    }

    CagrResult {
        cagr_percent: round_percent(cagr * 100.0),
        total_return: round_currency(final_value - initial),
        absolute_return_percent: round_percent((growth - 1.0) * 100.0),
    }
}

impl From<&CagrResult> for CalculatorResult {
    fn from(result: &CagrResult) -> Self {
        CalculatorResult::new(CalculatorKind::Cagr)
            .field("cagrPercent", result.cagr_percent)
            .field("totalReturn", result.total_return)
            .field("absoluteReturnPercent", result.absolute_return_percent)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    HalfYearly,
    #[default]
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    pub fn per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::HalfYearly => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
        }
    }

    /// Lenient conversion for form input: unknown counts fall back to
    /// quarterly, the usual bank deposit convention.
    pub fn from_raw(per_year: u32) -> Self {
        Self::try_from(per_year).unwrap_or_else(|e| {
            warn!("{}; using quarterly compounding", e);
            CompoundingFrequency::Quarterly
        })
    }
}

impl TryFrom<u32> for CompoundingFrequency {
    type Error = CalculatorError;

    fn try_from(per_year: u32) -> Result<Self> {
        match per_year {
            1 => Ok(CompoundingFrequency::Annually),
            2 => Ok(CompoundingFrequency::HalfYearly),
            4 => Ok(CompoundingFrequency::Quarterly),
            12 => Ok(CompoundingFrequency::Monthly),
            other => Err(CalculatorError::InvalidCompoundingFrequency(other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FixedDepositInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixedDepositResult {
    pub principal: f64,
    pub maturity_amount: f64,
    pub total_interest: f64,
}

impl FixedDepositResult {
    pub fn breakdown(&self) -> Breakdown {
        Breakdown::reconciled(
            self.maturity_amount,
            vec![
                BreakdownSegment::new("Principal", self.principal),
                BreakdownSegment::new("Total Interest", self.total_interest),
            ],
        )
    }
}

/// Lump-sum compounding, `P·(1 + r/n)^(n·t)`. Also serves the compound
/// interest calculator.
pub fn calculate_fixed_deposit(input: &FixedDepositInput) -> FixedDepositResult {
    let principal = sanitize(input.principal);
    let rate = sanitize(input.annual_rate_percent) / 100.0;
    let years = cap_plan_years("Fixed deposit", sanitize(input.years));

    if principal == 0.0 || rate == 0.0 || years == 0.0 {
        debug!("Degenerate fixed deposit inputs, returning zero result");
        return FixedDepositResult::default();
    }

    let n = input.frequency.per_year() as f64;
    let maturity = principal * (1.0 + rate / n).powf(n * years);
    if !is_representable("Fixed deposit", &[maturity]) {
        return FixedDepositResult::default();
    }

    let principal = round_currency(principal);
    let maturity_amount = round_currency(maturity);

    FixedDepositResult {
        principal,
        maturity_amount,
        total_interest: maturity_amount - principal,
    }
}

impl From<&FixedDepositResult> for CalculatorResult {
    fn from(result: &FixedDepositResult) -> Self {
        CalculatorResult::new(CalculatorKind::FixedDeposit)
            .field("maturityAmount", result.maturity_amount)
            .field("totalInterest", result.total_interest)
            .field("principal", result.principal)
            .with_breakdown(result.breakdown())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LumpsumInput {
    pub investment: f64,
    pub expected_return_percent: f64,
    pub years: f64,
}

/// Shared output shape for lumpsum, SIP and similar growth plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentResult {
    pub invested: f64,
    pub estimated_returns: f64,
    pub maturity_amount: f64,
}

impl InvestmentResult {
    /// Zero result when either amount overflowed.
    pub fn from_unrounded(invested: f64, maturity: f64) -> Self {
        if !is_representable("Investment plan", &[invested, maturity]) {
            return Self::default();
        }
        let invested = round_currency(invested);
        let maturity_amount = round_currency(maturity);
        Self {
            invested,
            estimated_returns: maturity_amount - invested,
            maturity_amount,
        }
    }

    pub fn breakdown(&self) -> Breakdown {
        Breakdown::reconciled(
            self.maturity_amount,
            vec![
                BreakdownSegment::new("Invested Amount", self.invested),
                BreakdownSegment::new("Estimated Returns", self.estimated_returns),
            ],
        )
    }

    pub fn to_result(&self, kind: CalculatorKind) -> CalculatorResult {
        CalculatorResult::new(kind)
            .field("invested", self.invested)
            .field("estimatedReturns", self.estimated_returns)
            .field("maturityAmount", self.maturity_amount)
            .with_breakdown(self.breakdown())
    }
}

/// One-time mutual fund investment compounded annually.
pub fn calculate_lumpsum(input: &LumpsumInput) -> InvestmentResult {
    let investment = sanitize(input.investment);
    let rate = sanitize(input.expected_return_percent) / 100.0;
    let years = cap_plan_years("Lumpsum", sanitize(input.years));

    if investment == 0.0 {
        return InvestmentResult::default();
    }

    InvestmentResult::from_unrounded(investment, investment * (1.0 + rate).powf(years))
}
