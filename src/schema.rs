use crate::error::CalculatorError;
use crate::loan::ScheduleEntry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    #[schemars(description = "Equated monthly instalment for home, car, personal and gold loans")]
    Emi,
    #[schemars(description = "Compound annual growth rate between two values")]
    Cagr,
    #[schemars(description = "Lump-sum deposit compounded 1, 2, 4 or 12 times a year")]
    FixedDeposit,
    #[schemars(description = "Yearly contribution added and then compounded once a year")]
    Ppf,
    #[schemars(description = "Monthly systematic investment plan future value")]
    Sip,
    #[schemars(description = "One-time mutual fund investment compounded annually")]
    Lumpsum,
    #[schemars(description = "Systematic withdrawal plan drawing down a corpus monthly")]
    Swp,
    #[schemars(description = "Non-compounding interest on a principal")]
    SimpleInterest,
    #[schemars(description = "GST added to or removed from an amount")]
    Gst,
    #[schemars(description = "House rent allowance exemption")]
    Hra,
    #[schemars(description = "Statutory gratuity with tax-free ceiling")]
    Gratuity,
    #[schemars(description = "Employees' provident fund accumulation")]
    Epf,
    #[schemars(description = "National pension system corpus and pension")]
    Nps,
    #[schemars(description = "Value of gold by weight and purity")]
    GoldValue,
    #[schemars(description = "Retail jewellery price with making charges and GST")]
    JewelleryPrice,
    #[schemars(description = "Maximum gold loan against pledged gold")]
    GoldLoanEligibility,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 16] = [
        CalculatorKind::Emi,
        CalculatorKind::Cagr,
        CalculatorKind::FixedDeposit,
        CalculatorKind::Ppf,
        CalculatorKind::Sip,
        CalculatorKind::Lumpsum,
        CalculatorKind::Swp,
        CalculatorKind::SimpleInterest,
        CalculatorKind::Gst,
        CalculatorKind::Hra,
        CalculatorKind::Gratuity,
        CalculatorKind::Epf,
        CalculatorKind::Nps,
        CalculatorKind::GoldValue,
        CalculatorKind::JewelleryPrice,
        CalculatorKind::GoldLoanEligibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Emi => "emi",
            CalculatorKind::Cagr => "cagr",
            CalculatorKind::FixedDeposit => "fixed_deposit",
            CalculatorKind::Ppf => "ppf",
            CalculatorKind::Sip => "sip",
            CalculatorKind::Lumpsum => "lumpsum",
            CalculatorKind::Swp => "swp",
            CalculatorKind::SimpleInterest => "simple_interest",
            CalculatorKind::Gst => "gst",
            CalculatorKind::Hra => "hra",
            CalculatorKind::Gratuity => "gratuity",
            CalculatorKind::Epf => "epf",
            CalculatorKind::Nps => "nps",
            CalculatorKind::GoldValue => "gold_value",
            CalculatorKind::JewelleryPrice => "jewellery_price",
            CalculatorKind::GoldLoanEligibility => "gold_loan_eligibility",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalculatorError;

    /// Accepts the snake_case name as well as the URL slugs the site uses
    /// (`compound-interest`, `mutual-fund`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "emi" | "home_loan" | "car_loan" | "personal_loan" | "gold_loan" | "loan" => {
                CalculatorKind::Emi
            }
            "cagr" => CalculatorKind::Cagr,
            "fixed_deposit" | "fd" | "compound_interest" => CalculatorKind::FixedDeposit,
            "ppf" => CalculatorKind::Ppf,
            "sip" => CalculatorKind::Sip,
            "lumpsum" | "mutual_fund" => CalculatorKind::Lumpsum,
            "swp" => CalculatorKind::Swp,
            "simple_interest" => CalculatorKind::SimpleInterest,
            "gst" => CalculatorKind::Gst,
            "hra" => CalculatorKind::Hra,
            "gratuity" => CalculatorKind::Gratuity,
            "epf" | "pf" => CalculatorKind::Epf,
            "nps" => CalculatorKind::Nps,
            "gold_value" | "gold_rate" => CalculatorKind::GoldValue,
            "jewellery_price" | "jewelry_price" => CalculatorKind::JewelleryPrice,
            "gold_loan_eligibility" => CalculatorKind::GoldLoanEligibility,
            _ => return Err(CalculatorError::UnknownCalculator(s.to_string())),
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BreakdownSegment {
    pub label: String,
    pub amount: f64,
    /// Marks the row the presentation layer should highlight.
    #[serde(default)]
    pub binding: bool,
}

impl BreakdownSegment {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
            binding: false,
        }
    }

    pub fn binding(mut self, binding: bool) -> Self {
        self.binding = binding;
        self
    }
}

/// Labeled parts of a stated total. The segments always sum to `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Breakdown {
    pub total: f64,
    pub segments: Vec<BreakdownSegment>,
}

impl Breakdown {
    /// Builds a breakdown whose final segment absorbs any rounding drift, so
    /// the segments sum to `total` exactly.
    pub fn reconciled(total: f64, mut segments: Vec<BreakdownSegment>) -> Self {
        if let Some((last, rest)) = segments.split_last_mut() {
            let others: f64 = rest.iter().map(|s| s.amount).sum();
            last.amount = total - others;
        }
        Self { total, segments }
    }

    pub fn sum(&self) -> f64 {
        self.segments.iter().map(|s| s.amount).sum()
    }

    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.sum() - self.total).abs() <= tolerance
    }

    pub fn segment(&self, label: &str) -> Option<&BreakdownSegment> {
        self.segments.iter().find(|s| s.label == label)
    }
}

/// Render-ready outcome of any calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalculatorResult {
    pub calculator: CalculatorKind,
    /// Named outputs, rounded per the crate's rounding policy.
    pub fields: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Breakdown>,
    /// Candidate limits where the smallest one decides the answer (HRA).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limits: Vec<BreakdownSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

impl CalculatorResult {
    pub fn new(calculator: CalculatorKind) -> Self {
        Self {
            calculator,
            fields: BTreeMap::new(),
            breakdown: None,
            limits: Vec::new(),
            schedule: None,
            advisory: None,
        }
    }

    pub fn field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn with_breakdown(mut self, breakdown: Breakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    pub fn with_limits(mut self, limits: Vec<BreakdownSegment>) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_schedule(mut self, schedule: Vec<ScheduleEntry>) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_advisory(mut self, advisory: Option<String>) -> Self {
        self.advisory = advisory;
        self
    }

    /// Reads a named output; absent fields read as `0`.
    pub fn get(&self, name: &str) -> f64 {
        self.fields.get(name).copied().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.fields.values().all(|v| *v == 0.0)
    }
}
