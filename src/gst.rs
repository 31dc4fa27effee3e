//! GST add/remove.
//!
//! The CGST/SGST versus IGST split is a presentation of the same computed
//! tax, not a second formula.

use crate::error::{CalculatorError, Result};
use crate::input::sanitize;
use crate::schema::{Breakdown, BreakdownSegment, CalculatorKind, CalculatorResult};
use crate::utils::{is_representable, round_paise, round_percent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Slabs offered by the calculator form.
pub const STANDARD_GST_RATES: [f64; 5] = [0.0, 5.0, 12.0, 18.0, 28.0];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GstMode {
    #[default]
    #[schemars(description = "Amount excludes GST; add tax on top")]
    Add,
    #[schemars(description = "Amount already includes GST; extract the tax")]
    Remove,
}

impl FromStr for GstMode {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "exclusive" => Ok(GstMode::Add),
            "remove" | "inclusive" => Ok(GstMode::Remove),
            _ => Err(CalculatorError::InvalidGstMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    #[default]
    #[schemars(description = "Within one state: tax split equally into CGST and SGST")]
    IntraState,
    #[schemars(description = "Across states: full tax charged as IGST")]
    InterState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GstInput {
    pub amount: f64,
    pub rate_percent: f64,
    #[serde(default)]
    pub mode: GstMode,
    #[serde(default)]
    pub supply: SupplyType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GstResult {
    pub mode: GstMode,
    pub supply: SupplyType,
    pub rate_percent: f64,
    /// Value before tax.
    pub net_amount: f64,
    pub gst_amount: f64,
    /// Value including tax.
    pub gross_amount: f64,
    /// The amount the operation produces: gross for `Add`, net for `Remove`.
    pub total: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
}

pub fn calculate_gst(input: &GstInput) -> GstResult {
    let amount = sanitize(input.amount);
    let rate = sanitize(input.rate_percent);

    let (net, gross) = match input.mode {
        GstMode::Add => {
            let net = round_paise(amount);
            (net, net + net * rate / 100.0)
        }
        GstMode::Remove => {
            let gross = round_paise(amount);
            (gross / (1.0 + rate / 100.0), gross)
        }
    };
    if !is_representable("GST", &[net, gross]) {
        return GstResult {
            mode: input.mode,
            supply: input.supply,
            ..Default::default()
        };
    }
    let (net, gross) = (round_paise(net), round_paise(gross));
    let gst_amount = round_paise(gross - net);

    let (cgst, sgst, igst) = match input.supply {
        SupplyType::IntraState => {
            let cgst = round_paise(gst_amount / 2.0);
            (cgst, round_paise(gst_amount - cgst), 0.0)
        }
        SupplyType::InterState => (0.0, 0.0, gst_amount),
    };

    GstResult {
        mode: input.mode,
        supply: input.supply,
        rate_percent: round_percent(rate),
        net_amount: net,
        gst_amount,
        gross_amount: gross,
        total: match input.mode {
            GstMode::Add => gross,
            GstMode::Remove => net,
        },
        cgst,
        sgst,
        igst,
    }
}

pub fn add_gst(amount: f64, rate_percent: f64) -> GstResult {
    calculate_gst(&GstInput {
        amount,
        rate_percent,
        mode: GstMode::Add,
        supply: SupplyType::IntraState,
    })
}

pub fn remove_gst(amount: f64, rate_percent: f64) -> GstResult {
    calculate_gst(&GstInput {
        amount,
        rate_percent,
        mode: GstMode::Remove,
        supply: SupplyType::IntraState,
    })
}

impl From<&GstResult> for CalculatorResult {
    fn from(result: &GstResult) -> Self {
        let tax_segments = match result.supply {
            SupplyType::InterState => vec![BreakdownSegment::new("IGST", result.igst)],
            SupplyType::IntraState => vec![
                BreakdownSegment::new("CGST", result.cgst),
                BreakdownSegment::new("SGST", result.sgst),
            ],
        };

        let mut segments = vec![BreakdownSegment::new("Net Amount", result.net_amount)];
        segments.extend(tax_segments);

        CalculatorResult::new(CalculatorKind::Gst)
            .field("gstAmount", result.gst_amount)
            .field("total", result.total)
            .field("netAmount", result.net_amount)
            .field("grossAmount", result.gross_amount)
            .field("ratePercent", result.rate_percent)
            .field("cgst", result.cgst)
            .field("sgst", result.sgst)
            .field("igst", result.igst)
            .with_breakdown(Breakdown::reconciled(result.gross_amount, segments))
    }
}
