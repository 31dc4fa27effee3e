//! Gold valuation.
//!
//! The per-gram rate comes from the caller (the site's rate feed); nothing
//! here knows where it was fetched from.

use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::round_currency;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum Purity {
    #[default]
    K24,
    K22,
    K18,
    K14,
}

impl Purity {
    pub fn karat(&self) -> u32 {
        match self {
            Purity::K24 => 24,
            Purity::K22 => 22,
            Purity::K18 => 18,
            Purity::K14 => 14,
        }
    }

    /// Share of pure gold, e.g. 22/24 for 22K.
    pub fn fineness(&self) -> f64 {
        self.karat() as f64 / 24.0
    }
}

impl FromStr for Purity {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_uppercase();
        let digits = trimmed
            .trim_start_matches('K')
            .trim_end_matches("KT")
            .trim_end_matches('K');
        match digits {
            "24" | "999" => Ok(Purity::K24),
            "22" | "916" => Ok(Purity::K22),
            "18" | "750" => Ok(Purity::K18),
            "14" | "585" => Ok(Purity::K14),
            _ => Err(CalculatorError::InvalidPurity(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GoldValueInput {
    pub weight_grams: f64,
    #[schemars(description = "Current price of one gram of 24K gold")]
    pub rate_per_gram_24k: f64,
    #[serde(default)]
    pub purity: Purity,
}

pub fn gold_value(input: &GoldValueInput) -> f64 {
    sanitize(input.weight_grams) * sanitize(input.rate_per_gram_24k) * input.purity.fineness()
}

pub fn calculate_gold_value(input: &GoldValueInput) -> CalculatorResult {
    let rate = sanitize(input.rate_per_gram_24k) * input.purity.fineness();
    CalculatorResult::new(CalculatorKind::GoldValue)
        .field("goldValue", round_currency(gold_value(input)))
        .field("ratePerGram", round_currency(rate))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct JewelleryPriceInput {
    #[serde(flatten)]
    pub gold: GoldValueInput,
    #[schemars(description = "Making charges as a percentage of the metal value")]
    pub making_charges_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JewelleryPriceResult {
    pub metal_value: f64,
    pub making_charges: f64,
    pub gst: f64,
    pub total_price: f64,
}

/// Metal value plus making charges, with GST charged on both.
pub fn calculate_jewellery_price(
    input: &JewelleryPriceInput,
    config: &CalculatorConfig,
) -> JewelleryPriceResult {
    let metal = gold_value(&input.gold);
    let making = metal * sanitize(input.making_charges_percent) / 100.0;
    let gst = (metal + making) * config.gold_gst_percent / 100.0;

    let metal_value = round_currency(metal);
    let making_charges = round_currency(making);
    let gst = round_currency(gst);

    JewelleryPriceResult {
        metal_value,
        making_charges,
        gst,
        total_price: metal_value + making_charges + gst,
    }
}

impl From<&JewelleryPriceResult> for CalculatorResult {
    fn from(result: &JewelleryPriceResult) -> Self {
        CalculatorResult::new(CalculatorKind::JewelleryPrice)
            .field("metalValue", result.metal_value)
            .field("makingCharges", result.making_charges)
            .field("gst", result.gst)
            .field("totalPrice", result.total_price)
            .with_breakdown(Breakdown::reconciled(
                result.total_price,
                vec![
                    BreakdownSegment::new("Gold Value", result.metal_value),
                    BreakdownSegment::new("Making Charges", result.making_charges),
                    BreakdownSegment::new("GST", result.gst),
                ],
            ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoldLoanEligibility {
    pub gold_value: f64,
    pub ltv_percent: f64,
    pub eligible_amount: f64,
}

pub fn calculate_gold_loan_eligibility(
    input: &GoldValueInput,
    config: &CalculatorConfig,
) -> GoldLoanEligibility {
    let value = gold_value(input);
    GoldLoanEligibility {
        gold_value: round_currency(value),
        ltv_percent: config.gold_loan_ltv_percent,
        eligible_amount: round_currency(value * config.gold_loan_ltv_percent / 100.0),
    }
}

impl From<&GoldLoanEligibility> for CalculatorResult {
    fn from(result: &GoldLoanEligibility) -> Self {
        CalculatorResult::new(CalculatorKind::GoldLoanEligibility)
            .field("goldValue", result.gold_value)
            .field("ltvPercent", result.ltv_percent)
            .field("eligibleAmount", result.eligible_amount)
    }
}
