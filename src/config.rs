use crate::error::{CalculatorError, Result};
use crate::utils::{validate_non_negative, validate_percent, validate_positive};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy tables the formulas read instead of hard-coding them.
///
/// Missing fields fall back to the current Indian statutory values, so a
/// partial JSON document only needs to name what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CalculatorConfig {
    #[schemars(description = "Tax-free gratuity ceiling in rupees (Section 10(10)).")]
    pub gratuity_tax_free_ceiling: f64,

    #[schemars(description = "Minimum completed years of service before any gratuity is payable.")]
    pub gratuity_min_service_years: f64,

    #[schemars(description = "Days of wages paid per year of service.")]
    pub gratuity_days_per_year: f64,

    #[schemars(description = "Working days per month for employees covered under the Gratuity Act.")]
    pub gratuity_divisor_covered: f64,

    #[schemars(description = "Days per month for employees not covered under the Gratuity Act.")]
    pub gratuity_divisor_uncovered: f64,

    #[schemars(description = "HRA ceiling as a percentage of basic salary in metro cities.")]
    pub hra_metro_percent: f64,

    #[schemars(description = "HRA ceiling as a percentage of basic salary outside metro cities.")]
    pub hra_non_metro_percent: f64,

    #[schemars(description = "Share of basic salary deducted from rent paid before exemption.")]
    pub hra_rent_threshold_percent: f64,

    #[schemars(description = "Cities treated as metro for HRA (case-insensitive).")]
    pub metro_cities: Vec<String>,

    #[schemars(description = "Employee EPF contribution as a percentage of basic + DA.")]
    pub epf_employee_percent: f64,

    #[schemars(description = "Employer share credited to EPF (the rest goes to EPS).")]
    pub epf_employer_percent: f64,

    #[schemars(description = "Annual EPF interest rate.")]
    pub epf_interest_percent: f64,

    #[schemars(description = "Minimum share of the NPS corpus that must buy an annuity.")]
    pub nps_min_annuity_percent: f64,

    #[schemars(description = "Maximum loan-to-value ratio for gold loans.")]
    pub gold_loan_ltv_percent: f64,

    #[schemars(description = "GST levied on gold jewellery (metal value plus making charges).")]
    pub gold_gst_percent: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            gratuity_tax_free_ceiling: 2_000_000.0,
            gratuity_min_service_years: 5.0,
            gratuity_days_per_year: 15.0,
            gratuity_divisor_covered: 26.0,
            gratuity_divisor_uncovered: 30.0,
            hra_metro_percent: 50.0,
            hra_non_metro_percent: 40.0,
            hra_rent_threshold_percent: 10.0,
            metro_cities: ["Delhi", "Mumbai", "Kolkata", "Chennai"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            epf_employee_percent: 12.0,
            epf_employer_percent: 3.67,
            epf_interest_percent: 8.25,
            nps_min_annuity_percent: 40.0,
            gold_loan_ltv_percent: 75.0,
            gold_gst_percent: 3.0,
        }
    }
}

impl CalculatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading calculator config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        validate_non_negative("gratuity_tax_free_ceiling", self.gratuity_tax_free_ceiling)?;
        validate_non_negative("gratuity_min_service_years", self.gratuity_min_service_years)?;
        validate_non_negative("gratuity_days_per_year", self.gratuity_days_per_year)?;
        validate_positive("gratuity_divisor_covered", self.gratuity_divisor_covered)?;
        validate_positive("gratuity_divisor_uncovered", self.gratuity_divisor_uncovered)?;

        validate_percent("hra_metro_percent", self.hra_metro_percent)?;
        validate_percent("hra_non_metro_percent", self.hra_non_metro_percent)?;
        validate_percent("hra_rent_threshold_percent", self.hra_rent_threshold_percent)?;

        validate_percent("epf_employee_percent", self.epf_employee_percent)?;
        validate_percent("epf_employer_percent", self.epf_employer_percent)?;
        validate_percent("epf_interest_percent", self.epf_interest_percent)?;

        validate_percent("nps_min_annuity_percent", self.nps_min_annuity_percent)?;
        validate_percent("gold_loan_ltv_percent", self.gold_loan_ltv_percent)?;
        validate_percent("gold_gst_percent", self.gold_gst_percent)?;

        if self.metro_cities.iter().any(|c| c.trim().is_empty()) {
            return Err(CalculatorError::InvalidConfig {
                field: "metro_cities".to_string(),
                details: "city names must not be blank".to_string(),
            });
        }

        Ok(())
    }

    pub fn is_metro(&self, city: &str) -> bool {
        let city = city.trim();
        self.metro_cities
            .iter()
            .any(|metro| metro.trim().eq_ignore_ascii_case(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gratuity_tax_free_ceiling, 2_000_000.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            CalculatorConfig::from_json_str(r#"{ "gratuity_tax_free_ceiling": 2500000 }"#)
                .unwrap();
        assert_eq!(config.gratuity_tax_free_ceiling, 2_500_000.0);
        assert_eq!(config.hra_metro_percent, 50.0);
        assert_eq!(config.metro_cities.len(), 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = CalculatorConfig::from_json_str(r#"{ "hra_metro_percent": 150 }"#);
        assert!(matches!(
            result,
            Err(CalculatorError::InvalidConfig { ref field, .. }) if field == "hra_metro_percent"
        ));

        let result = CalculatorConfig::from_json_str(r#"{ "gratuity_divisor_covered": 0 }"#);
        assert!(result.is_err());

        let result = CalculatorConfig::from_json_str(r#"{ "metro_cities": ["Delhi", " "] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let result = CalculatorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(CalculatorError::SerializationError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CalculatorConfig::from_path("/nonexistent/calculators.json");
        assert!(matches!(result, Err(CalculatorError::IoError(_))));
    }

    #[test]
    fn test_is_metro_case_insensitive() {
        let config = CalculatorConfig::default();
        assert!(config.is_metro("mumbai"));
        assert!(config.is_metro(" Delhi "));
        assert!(!config.is_metro("Pune"));
    }
}
