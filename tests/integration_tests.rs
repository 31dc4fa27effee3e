use financial_calculators::*;

fn raw(fields: &[(&str, &str)]) -> RawInput {
    fields.iter().copied().collect()
}

fn run(calculator: &str, fields: &[(&str, &str)]) -> CalculatorResult {
    FinancialCalculator::default()
        .calculate_raw(calculator, &raw(fields))
        .unwrap()
}

#[test]
fn test_home_loan_from_form_fields() {
    let result = run(
        "home-loan",
        &[
            ("principal", "₹50,00,000"),
            ("annualRatePercent", "8.5"),
            ("termYears", "20"),
        ],
    );

    assert_eq!(result.calculator, CalculatorKind::Emi);
    assert_eq!(result.get("months"), 240.0);
    assert!((result.get("emi") - 43_391.0).abs() <= 1.0);
    assert_eq!(
        result.get("principal") + result.get("totalInterest"),
        result.get("totalPayment")
    );
    assert!(result.breakdown.as_ref().unwrap().is_balanced(0.0));
}

#[test]
fn test_home_loan_total_payment_from_unrounded_emi() {
    let result = run(
        "home-loan",
        &[
            ("principal", "5000000"),
            ("annualRatePercent", "8.5"),
            ("termYears", "20"),
        ],
    );
    assert_eq!(result.get("emi"), 43_391.0);
    assert_eq!(result.get("totalPayment"), 10_413_879.0);
    assert_eq!(result.get("totalInterest"), 5_413_879.0);
}

#[test]
fn test_emi_family_breakdown_is_exact() {
    for slug in ["home-loan", "car-loan", "personal-loan", "gold-loan"] {
        for (principal, rate, years) in [
            ("150000", "10.99", "1.5"),
            ("875000", "9.15", "7"),
            ("2500000", "8.4", "15"),
            ("12345678", "7.25", "30"),
        ] {
            let result = run(
                slug,
                &[
                    ("principal", principal),
                    ("annualRatePercent", rate),
                    ("termYears", years),
                ],
            );
            assert_eq!(
                result.get("principal") + result.get("totalInterest"),
                result.get("totalPayment"),
                "{} {} {} {}",
                slug,
                principal,
                rate,
                years
            );
        }
    }
}

#[test]
fn test_emi_degenerate_forms_render_zero() {
    for fields in [
        vec![("principal", ""), ("annualRatePercent", "8.5"), ("termYears", "20")],
        vec![("principal", "500000"), ("annualRatePercent", "0"), ("termYears", "20")],
        vec![("principal", "500000"), ("annualRatePercent", "8.5"), ("termYears", "abc")],
        vec![("principal", "-500000"), ("annualRatePercent", "8.5"), ("termYears", "5")],
    ] {
        let result = run("emi", &fields);
        assert_eq!(result.get("emi"), 0.0);
        assert_eq!(result.get("totalPayment"), 0.0);
        assert!(result.fields.values().all(|v| v.is_finite()));
    }
}

#[test]
fn test_emi_with_schedule() {
    let result = run(
        "car-loan",
        &[
            ("principal", "600000"),
            ("annualRatePercent", "9.5"),
            ("termMonths", "48"),
            ("includeSchedule", "true"),
            ("firstDueDate", "2025-03-05"),
        ],
    );

    let schedule = result.schedule.as_ref().unwrap();
    assert_eq!(schedule.len(), 48);
    assert_eq!(schedule.last().unwrap().closing_balance, 0.0);
    assert_eq!(
        schedule.last().unwrap().due_date,
        chrono::NaiveDate::from_ymd_opt(2029, 2, 5)
    );

    let principal: f64 = schedule.iter().map(|e| e.principal).sum();
    assert!((principal - 600_000.0).abs() < 0.5);
}

#[test]
fn test_cagr_reference_value() {
    let result = run(
        "cagr",
        &[("initialValue", "100000"), ("finalValue", "250000"), ("years", "5")],
    );
    assert_eq!(result.get("cagrPercent"), 20.11);
    assert_eq!(result.get("totalReturn"), 150_000.0);
    assert_eq!(result.get("absoluteReturnPercent"), 150.0);
}

#[test]
fn test_fd_maturity_strictly_increases_with_rate() {
    let mut previous = 0.0;
    for tenth in 10..=150 {
        let rate = format!("{:.1}", tenth as f64 / 10.0);
        let result = run(
            "fixed-deposit",
            &[
                ("principal", "500000"),
                ("annualRatePercent", rate.as_str()),
                ("years", "5"),
                ("compoundingFrequency", "4"),
            ],
        );
        let maturity = result.get("maturityAmount");
        assert!(maturity > previous, "rate {} gave {}", rate, maturity);
        previous = maturity;
    }
}

#[test]
fn test_fd_unknown_frequency_falls_back_to_quarterly() {
    let fields = [
        ("principal", "100000"),
        ("annualRatePercent", "7"),
        ("years", "5"),
    ];
    let quarterly = run("fd", &fields);

    let mut with_odd_frequency = fields.to_vec();
    with_odd_frequency.push(("compoundingFrequency", "365"));
    let fallback = run("fd", &with_odd_frequency);

    assert_eq!(quarterly.get("maturityAmount"), 141_478.0);
    assert_eq!(fallback, quarterly);
}

#[test]
fn test_gratuity_floor_for_short_service() {
    for years in ["0", "2", "4", "4.9"] {
        for salary in ["15000", "85000", "1000000"] {
            let result = run(
                "gratuity",
                &[
                    ("lastDrawnSalary", salary),
                    ("yearsOfService", years),
                    ("coveredUnderAct", "true"),
                ],
            );
            assert_eq!(result.get("gratuityAmount"), 0.0);
            assert!(result.advisory.is_some());
        }
    }
}

#[test]
fn test_gratuity_reference_value() {
    let result = run(
        "gratuity",
        &[
            ("lastDrawnSalary", "50000"),
            ("yearsOfService", "10"),
            ("coveredUnderAct", "yes"),
        ],
    );
    assert_eq!(result.get("gratuityAmount"), 288_462.0);
    assert_eq!(result.get("taxFreeAmount"), 288_462.0);
    assert_eq!(result.get("taxableAmount"), 0.0);
}

#[test]
fn test_gratuity_ceiling_from_config_file_contents() {
    let config = CalculatorConfig::from_json_str(r#"{ "gratuity_tax_free_ceiling": 250000 }"#).unwrap();
    let calculator = FinancialCalculator::new(config).unwrap();
    let result = calculator
        .calculate_raw(
            "gratuity",
            &raw(&[
                ("lastDrawnSalary", "50000"),
                ("yearsOfService", "10"),
                ("coveredUnderAct", "true"),
            ]),
        )
        .unwrap();

    assert_eq!(result.get("taxFreeAmount"), 250_000.0);
    assert_eq!(result.get("taxableAmount"), 38_462.0);
}

#[test]
fn test_hra_exemption_is_minimum_of_limits() {
    for basic in ["20000", "45000", "120000"] {
        for hra in ["5000", "18000", "60000"] {
            for rent in ["3000", "15000", "50000"] {
                for metro in ["true", "false"] {
                    let result = run(
                        "hra",
                        &[
                            ("basicSalary", basic),
                            ("hraReceived", hra),
                            ("rentPaid", rent),
                            ("isMetro", metro),
                        ],
                    );
                    let basic = parse_amount(basic);
                    let share = if metro == "true" { 0.5 } else { 0.4 };
                    let exemption = result.get("monthlyExemption");

                    assert!(exemption <= parse_amount(hra));
                    assert!(exemption <= (parse_amount(rent) - 0.1 * basic).max(0.0) + 0.5);
                    assert!(exemption <= share * basic + 0.5);
                    assert_eq!(result.limits.iter().filter(|l| l.binding).count(), 1);
                    assert_eq!(
                        result.get("annualExemption"),
                        result.get("monthlyExemption") * 12.0
                    );
                }
            }
        }
    }
}

#[test]
fn test_gst_round_trip_across_slabs() {
    for rate in ["0", "5", "12", "18", "28"] {
        for amount in ["1", "49.5", "999.99", "18500", "1234567.89"] {
            let added = run("gst", &[("amount", amount), ("ratePercent", rate), ("mode", "add")]);
            let total = format!("{}", added.get("total"));
            let removed = run(
                "gst",
                &[("amount", total.as_str()), ("ratePercent", rate), ("mode", "remove")],
            );
            assert!(
                (removed.get("total") - parse_amount(amount)).abs() <= 0.01,
                "rate {} amount {} came back as {}",
                rate,
                amount,
                removed.get("total")
            );
        }
    }
}

#[test]
fn test_gst_split_by_supply_type() {
    let intra = run("gst", &[("amount", "10000"), ("ratePercent", "18")]);
    assert_eq!(intra.get("cgst"), 900.0);
    assert_eq!(intra.get("sgst"), 900.0);
    assert_eq!(intra.get("igst"), 0.0);

    let inter = run(
        "gst",
        &[("amount", "10000"), ("ratePercent", "18"), ("interState", "on")],
    );
    assert_eq!(inter.get("igst"), 1_800.0);
    assert_eq!(inter.get("cgst"), 0.0);
    assert_eq!(inter.get("gstAmount"), intra.get("gstAmount"));
}

#[test]
fn test_gst_invalid_mode_is_rejected() {
    let result = FinancialCalculator::default().calculate_raw(
        "gst",
        &raw(&[("amount", "100"), ("ratePercent", "18"), ("mode", "double")]),
    );
    assert!(matches!(result, Err(CalculatorError::InvalidGstMode(_))));
}

#[test]
fn test_simple_interest_linearity() {
    for (p, r, t) in [("10000", "6", "1"), ("75000", "8.25", "3"), ("1250.50", "11", "2.5")] {
        let single = run("simple-interest", &[("principal", p), ("ratePercent", r), ("years", t)]);
        let doubled_t = format!("{}", parse_amount(t) * 2.0);
        let double = run(
            "simple-interest",
            &[("principal", p), ("ratePercent", r), ("years", doubled_t.as_str())],
        );
        assert!((double.get("interest") - 2.0 * single.get("interest")).abs() <= 0.01);
    }
}

#[test]
fn test_every_calculator_is_idempotent() {
    let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("emi", vec![("principal", "900000"), ("annualRatePercent", "10"), ("termYears", "6")]),
        ("cagr", vec![("initialValue", "1000"), ("finalValue", "3000"), ("years", "7")]),
        ("fd", vec![("principal", "200000"), ("annualRatePercent", "7.1"), ("years", "3")]),
        ("ppf", vec![("yearlyContribution", "150000"), ("annualRatePercent", "7.1"), ("years", "15")]),
        ("sip", vec![("monthlyInvestment", "5000"), ("expectedReturnPercent", "12"), ("years", "15")]),
        ("mutual-fund", vec![("investment", "100000"), ("expectedReturnPercent", "11"), ("years", "8")]),
        ("swp", vec![("initialCorpus", "2000000"), ("monthlyWithdrawal", "15000"), ("expectedReturnPercent", "8"), ("years", "10")]),
        ("simple-interest", vec![("principal", "10000"), ("ratePercent", "6"), ("years", "2")]),
        ("gst", vec![("amount", "4999"), ("ratePercent", "12"), ("mode", "remove")]),
        ("hra", vec![("basicSalary", "60000"), ("hraReceived", "24000"), ("rentPaid", "20000"), ("city", "Mumbai")]),
        ("gratuity", vec![("lastDrawnSalary", "70000"), ("yearsOfService", "12"), ("coveredUnderAct", "false")]),
        ("epf", vec![("monthlyBasicSalary", "30000"), ("years", "20"), ("annualIncreasePercent", "5")]),
        ("nps", vec![("monthlyContribution", "8000"), ("expectedReturnPercent", "10"), ("years", "25"), ("annuityPercent", "40"), ("annuityRatePercent", "6")]),
        ("gold-value", vec![("weightGrams", "12.5"), ("ratePerGram24k", "7350"), ("purity", "22K")]),
        ("jewellery-price", vec![("weightGrams", "8"), ("ratePerGram24k", "7350"), ("purity", "18K"), ("makingChargesPercent", "14")]),
        ("gold-loan-eligibility", vec![("weightGrams", "40"), ("ratePerGram24k", "7350"), ("purity", "916")]),
    ];

    let calculator = FinancialCalculator::default();
    for (slug, fields) in cases {
        let input = raw(&fields);
        let first = calculator.calculate_raw(slug, &input).unwrap();
        let second = calculator.calculate_raw(slug, &input).unwrap();
        assert_eq!(first, second, "{} is not idempotent", slug);
        assert!(
            first.fields.values().all(|v| v.is_finite()),
            "{} produced a non-finite field",
            slug
        );
        if let Some(breakdown) = &first.breakdown {
            assert!(breakdown.is_balanced(1e-6), "{} breakdown does not balance", slug);
        }
    }
}

#[test]
fn test_all_blank_forms_never_produce_nan() {
    let calculator = FinancialCalculator::default();
    for kind in CalculatorKind::ALL {
        let result = calculator.calculate_raw(kind.as_str(), &RawInput::new()).unwrap();
        assert!(
            result.fields.values().all(|v| v.is_finite()),
            "{} produced a non-finite field on blank input",
            kind
        );
    }
}

#[test]
fn test_unknown_calculator() {
    let result = FinancialCalculator::default().calculate_raw("astrology", &RawInput::new());
    assert!(matches!(result, Err(CalculatorError::UnknownCalculator(_))));
}

#[test]
fn test_result_json_for_presentation_layer() -> anyhow::Result<()> {
    let result = run(
        "sip",
        &[("monthlyInvestment", "10000"), ("expectedReturnPercent", "12"), ("years", "10")],
    );
    let json = serde_json::to_value(&result)?;

    assert_eq!(json["calculator"], "sip");
    assert_eq!(json["fields"]["maturityAmount"], 2_323_391.0);
    assert_eq!(json["breakdown"]["segments"][0]["label"], "Invested Amount");
    assert_eq!(format_inr(result.get("maturityAmount")), "₹23,23,391");
    assert_eq!(format_inr_compact(result.get("maturityAmount")), "₹23.23 L");
    Ok(())
}

#[test]
fn test_typed_request_matches_raw_request() {
    let typed = calculate(&CalculatorRequest::Ppf(PpfInput {
        yearly_contribution: 150_000.0,
        annual_rate_percent: 7.1,
        years: 15,
    }));
    let from_form = run(
        "ppf",
        &[("yearlyContribution", "1,50,000"), ("annualRatePercent", "7.1"), ("years", "15")],
    );
    assert_eq!(typed, from_form);
    assert_eq!(typed.get("maturityAmount"), 4_068_209.0);
}

#[test]
fn test_pathological_horizons_never_report_negative_growth() {
    let cases: [(&str, Vec<(&str, &str)>, &str); 5] = [
        (
            "fd",
            vec![("principal", "100000"), ("annualRatePercent", "8"), ("years", "10000")],
            "totalInterest",
        ),
        (
            "ppf",
            vec![("yearlyContribution", "150000"), ("annualRatePercent", "7.1"), ("years", "1e20")],
            "totalInterest",
        ),
        (
            "sip",
            vec![("monthlyInvestment", "5000"), ("expectedReturnPercent", "12"), ("years", "10000")],
            "estimatedReturns",
        ),
        (
            "lumpsum",
            vec![("investment", "100000"), ("expectedReturnPercent", "12"), ("years", "10000")],
            "estimatedReturns",
        ),
        (
            "nps",
            vec![
                ("monthlyContribution", "5000"),
                ("expectedReturnPercent", "10"),
                ("years", "10000"),
                ("annuityPercent", "40"),
                ("annuityRatePercent", "6"),
            ],
            "interestEarned",
        ),
    ];

    for (slug, fields, growth_field) in cases {
        let result = run(slug, &fields);
        assert!(result.get(growth_field) > 0.0, "{} reported {}", slug, result.get(growth_field));
        assert!(result.fields.values().all(|v| v.is_finite() && *v >= 0.0), "{}", slug);
    }
}

#[test]
fn test_overflowing_rates_render_zero() {
    for (slug, fields) in [
        ("fd", vec![("principal", "100000"), ("annualRatePercent", "1e9"), ("years", "100")]),
        ("ppf", vec![("yearlyContribution", "150000"), ("annualRatePercent", "1e9"), ("years", "100")]),
        ("sip", vec![("monthlyInvestment", "5000"), ("expectedReturnPercent", "1e9"), ("years", "100")]),
    ] {
        let result = run(slug, &fields);
        assert!(result.is_zero(), "{} should render zero: {:?}", slug, result.fields);
    }
}
