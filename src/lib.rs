//! # Financial Calculators
//!
//! Pure, stateless calculators behind a gold-rate and personal-finance site:
//! loan EMIs, investment growth, statutory benefits and taxes.
//!
//! ## Core Concepts
//!
//! - **Input Normalization**: raw form text becomes finite, non-negative numbers ([`input`])
//! - **Domain Formula**: one module per calculator family, no shared state
//! - **Result Shaping**: one rounding policy ([`utils`]) and a [`CalculatorResult`] whose
//!   [`Breakdown`] segments always sum to the stated total
//! - **Policy Tables**: ceilings and percentages live in [`CalculatorConfig`], not in formulas
//!
//! Calculators never fail. Invalid input is clamped to zero, and degenerate
//! cases (zero rate, zero term, service below the gratuity minimum) return a
//! defined zero result.
//!
//! ## Example
//!
//! ```rust
//! use financial_calculators::*;
//!
//! let raw = RawInput::new()
//!     .with("principal", "50,00,000")
//!     .with("annualRatePercent", "8.5")
//!     .with("termYears", "20");
//!
//! let calculator = FinancialCalculator::default();
//! let result = calculator.calculate_raw("home-loan", &raw).unwrap();
//!
//! assert_eq!(result.get("emi"), 43_391.0);
//! assert_eq!(
//!     result.get("principal") + result.get("totalInterest"),
//!     result.get("totalPayment")
//! );
//! ```

pub mod config;
pub mod error;
pub mod gold;
pub mod gratuity;
pub mod growth;
pub mod gst;
pub mod hra;
pub mod input;
pub mod interest;
pub mod loan;
pub mod recurring;
pub mod retirement;
pub mod schema;
pub mod utils;

pub use config::CalculatorConfig;
pub use error::{CalculatorError, Result};
pub use gold::{GoldValueInput, JewelleryPriceInput, Purity};
pub use gratuity::GratuityInput;
pub use growth::{CagrInput, CompoundingFrequency, FixedDepositInput, LumpsumInput};
pub use gst::{GstInput, GstMode, SupplyType};
pub use hra::HraInput;
pub use input::{parse_amount, parse_count, parse_flag, CalculatorInput, RawInput};
pub use interest::SimpleInterestInput;
pub use loan::{EmiInput, LoanKind, LoanTerm, Schedule, ScheduleEntry};
pub use recurring::{PpfInput, SipInput, SwpInput};
pub use retirement::{EpfInput, NpsInput};
pub use schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
pub use utils::{format_inr, format_inr_compact, round_currency, round_paise, round_percent};

use chrono::NaiveDate;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Typed input for any calculator, tagged by `"calculator"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    Emi(EmiInput),
    Cagr(CagrInput),
    FixedDeposit(FixedDepositInput),
    Ppf(PpfInput),
    Sip(SipInput),
    Lumpsum(LumpsumInput),
    Swp(SwpInput),
    SimpleInterest(SimpleInterestInput),
    Gst(GstInput),
    Hra(HraInput),
    Gratuity(GratuityInput),
    Epf(EpfInput),
    Nps(NpsInput),
    GoldValue(GoldValueInput),
    JewelleryPrice(JewelleryPriceInput),
    GoldLoanEligibility(GoldValueInput),
}

impl CalculatorRequest {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculatorRequest::Emi(_) => CalculatorKind::Emi,
            CalculatorRequest::Cagr(_) => CalculatorKind::Cagr,
            CalculatorRequest::FixedDeposit(_) => CalculatorKind::FixedDeposit,
            CalculatorRequest::Ppf(_) => CalculatorKind::Ppf,
            CalculatorRequest::Sip(_) => CalculatorKind::Sip,
            CalculatorRequest::Lumpsum(_) => CalculatorKind::Lumpsum,
            CalculatorRequest::Swp(_) => CalculatorKind::Swp,
            CalculatorRequest::SimpleInterest(_) => CalculatorKind::SimpleInterest,
            CalculatorRequest::Gst(_) => CalculatorKind::Gst,
            CalculatorRequest::Hra(_) => CalculatorKind::Hra,
            CalculatorRequest::Gratuity(_) => CalculatorKind::Gratuity,
            CalculatorRequest::Epf(_) => CalculatorKind::Epf,
            CalculatorRequest::Nps(_) => CalculatorKind::Nps,
            CalculatorRequest::GoldValue(_) => CalculatorKind::GoldValue,
            CalculatorRequest::JewelleryPrice(_) => CalculatorKind::JewelleryPrice,
            CalculatorRequest::GoldLoanEligibility(_) => CalculatorKind::GoldLoanEligibility,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CalculatorRequest)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FinancialCalculator {
    config: CalculatorConfig,
}

impl FinancialCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn calculate(&self, request: &CalculatorRequest) -> CalculatorResult {
        info!("Running {} calculator", request.kind());

        let config = &self.config;
        let result = match request {
            CalculatorRequest::Emi(input) => {
                let result = CalculatorResult::from(&loan::calculate_emi(input));
                if input.include_schedule {
                    result.with_schedule(loan::amortization_schedule(input).entries)
                } else {
                    result
                }
            }
            CalculatorRequest::Cagr(input) => (&growth::calculate_cagr(input)).into(),
            CalculatorRequest::FixedDeposit(input) => {
                (&growth::calculate_fixed_deposit(input)).into()
            }
            CalculatorRequest::Ppf(input) => (&recurring::calculate_ppf(input)).into(),
            CalculatorRequest::Sip(input) => {
                recurring::calculate_sip(input).to_result(CalculatorKind::Sip)
            }
            CalculatorRequest::Lumpsum(input) => {
                growth::calculate_lumpsum(input).to_result(CalculatorKind::Lumpsum)
            }
            CalculatorRequest::Swp(input) => (&recurring::calculate_swp(input)).into(),
            CalculatorRequest::SimpleInterest(input) => {
                (&interest::calculate_simple_interest(input)).into()
            }
            CalculatorRequest::Gst(input) => (&gst::calculate_gst(input)).into(),
            CalculatorRequest::Hra(input) => (&hra::calculate_hra(input, config)).into(),
            CalculatorRequest::Gratuity(input) => {
                gratuity::to_calculator_result(&gratuity::calculate_gratuity(input, config), config)
            }
            CalculatorRequest::Epf(input) => (&retirement::calculate_epf(input, config)).into(),
            CalculatorRequest::Nps(input) => (&retirement::calculate_nps(input, config)).into(),
            CalculatorRequest::GoldValue(input) => gold::calculate_gold_value(input),
            CalculatorRequest::JewelleryPrice(input) => {
                (&gold::calculate_jewellery_price(input, config)).into()
            }
            CalculatorRequest::GoldLoanEligibility(input) => {
                (&gold::calculate_gold_loan_eligibility(input, config)).into()
            }
        };

        debug!("{} result fields: {:?}", result.calculator, result.fields);
        result
    }

    pub fn calculate_json(&self, json: &str) -> Result<CalculatorResult> {
        let request: CalculatorRequest = serde_json::from_str(json)?;
        Ok(self.calculate(&request))
    }

    /// Presentation adapter: takes the calculator slug and the form fields
    /// exactly as typed.
    ///
    /// Numeric fields never fail (they are clamped); only enumerations with no
    /// sensible default (calculator name, GST mode, gold purity) are rejected.
    pub fn calculate_raw(&self, calculator: &str, raw: &RawInput) -> Result<CalculatorResult> {
        let request = self.request_from_raw(calculator, raw)?;
        Ok(self.calculate(&request))
    }

    pub fn request_from_raw(&self, calculator: &str, raw: &RawInput) -> Result<CalculatorRequest> {
        let kind: CalculatorKind = calculator.parse()?;
        let input = raw.normalize();

        let request = match kind {
            CalculatorKind::Emi => {
                let loan_kind = LoanKind::from_slug(calculator)
                    .or_else(|| raw.get("loanType").and_then(LoanKind::from_slug))
                    .unwrap_or_default();
                let term = if raw.contains("termMonths") {
                    LoanTerm::Months(input.count("termMonths"))
                } else {
                    LoanTerm::Years(input.get("termYears"))
                };
                CalculatorRequest::Emi(EmiInput {
                    kind: loan_kind,
                    principal: input.get("principal"),
                    annual_rate_percent: input.get("annualRatePercent"),
                    term,
                    include_schedule: raw.flag("includeSchedule"),
                    first_due_date: raw.get("firstDueDate").and_then(parse_date),
                })
            }
            CalculatorKind::Cagr => CalculatorRequest::Cagr(CagrInput {
                initial_value: input.get("initialValue"),
                final_value: input.get("finalValue"),
                years: input.get("years"),
            }),
            CalculatorKind::FixedDeposit => {
                let frequency = if raw.contains("compoundingFrequency") {
                    CompoundingFrequency::from_raw(input.count("compoundingFrequency"))
                } else {
                    CompoundingFrequency::default()
                };
                CalculatorRequest::FixedDeposit(FixedDepositInput {
                    principal: input.get("principal"),
                    annual_rate_percent: input.get("annualRatePercent"),
                    years: input.get("years"),
                    frequency,
                })
            }
            CalculatorKind::Ppf => CalculatorRequest::Ppf(PpfInput {
                yearly_contribution: input.get("yearlyContribution"),
                annual_rate_percent: input.get("annualRatePercent"),
                years: input.count("years"),
            }),
            CalculatorKind::Sip => CalculatorRequest::Sip(SipInput {
                monthly_investment: input.get("monthlyInvestment"),
                expected_return_percent: input.get("expectedReturnPercent"),
                years: input.get("years"),
            }),
            CalculatorKind::Lumpsum => CalculatorRequest::Lumpsum(LumpsumInput {
                investment: input.get("investment"),
                expected_return_percent: input.get("expectedReturnPercent"),
                years: input.get("years"),
            }),
            CalculatorKind::Swp => CalculatorRequest::Swp(SwpInput {
                initial_corpus: input.get("initialCorpus"),
                monthly_withdrawal: input.get("monthlyWithdrawal"),
                expected_return_percent: input.get("expectedReturnPercent"),
                years: input.get("years"),
            }),
            CalculatorKind::SimpleInterest => CalculatorRequest::SimpleInterest(SimpleInterestInput {
                principal: input.get("principal"),
                rate_percent: input.get("ratePercent"),
                years: input.get("years"),
            }),
            CalculatorKind::Gst => {
                let mode = match raw.get("mode").map(str::trim) {
                    Some(mode) if !mode.is_empty() => mode.parse()?,
                    _ => GstMode::default(),
                };
                let supply = if raw.flag("interState") {
                    SupplyType::InterState
                } else {
                    SupplyType::IntraState
                };
                CalculatorRequest::Gst(GstInput {
                    amount: input.get("amount"),
                    rate_percent: input.get("ratePercent"),
                    mode,
                    supply,
                })
            }
            CalculatorKind::Hra => {
                let is_metro = if raw.contains("isMetro") {
                    raw.flag("isMetro")
                } else {
                    raw.get("city")
                        .map(|city| self.config.is_metro(city))
                        .unwrap_or(false)
                };
                CalculatorRequest::Hra(HraInput {
                    basic_salary: input.get("basicSalary"),
                    hra_received: input.get("hraReceived"),
                    rent_paid: input.get("rentPaid"),
                    is_metro,
                })
            }
            CalculatorKind::Gratuity => CalculatorRequest::Gratuity(GratuityInput {
                last_drawn_salary: input.get("lastDrawnSalary"),
                years_of_service: input.get("yearsOfService"),
                covered_under_act: raw.flag("coveredUnderAct"),
            }),
            CalculatorKind::Epf => CalculatorRequest::Epf(EpfInput {
                monthly_basic_salary: input.get("monthlyBasicSalary"),
                years: input.count("years"),
                annual_increase_percent: input.get("annualIncreasePercent"),
                current_balance: input.get("currentBalance"),
                interest_rate_percent: raw
                    .contains("interestRatePercent")
                    .then(|| input.get("interestRatePercent")),
            }),
            CalculatorKind::Nps => CalculatorRequest::Nps(NpsInput {
                monthly_contribution: input.get("monthlyContribution"),
                expected_return_percent: input.get("expectedReturnPercent"),
                years: input.get("years"),
                annuity_percent: input.get("annuityPercent"),
                annuity_rate_percent: input.get("annuityRatePercent"),
            }),
            CalculatorKind::GoldValue => CalculatorRequest::GoldValue(gold_input(raw, &input)?),
            CalculatorKind::JewelleryPrice => {
                CalculatorRequest::JewelleryPrice(JewelleryPriceInput {
                    gold: gold_input(raw, &input)?,
                    making_charges_percent: input.get("makingChargesPercent"),
                })
            }
            CalculatorKind::GoldLoanEligibility => {
                CalculatorRequest::GoldLoanEligibility(gold_input(raw, &input)?)
            }
        };

        Ok(request)
    }
}

fn gold_input(raw: &RawInput, input: &CalculatorInput) -> Result<GoldValueInput> {
    let purity = match raw.get("purity").map(str::trim) {
        Some(purity) if !purity.is_empty() => purity.parse()?,
        _ => Purity::default(),
    };
    Ok(GoldValueInput {
        weight_grams: input.get("weightGrams"),
        rate_per_gram_24k: input.get("ratePerGram24k"),
        purity,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| warn!("Ignoring unparsable date '{}': {}", raw, e))
        .ok()
}

/// Runs a request against the default statutory configuration.
pub fn calculate(request: &CalculatorRequest) -> CalculatorResult {
    FinancialCalculator::default().calculate(request)
}
