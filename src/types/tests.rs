use super::{Euro, Percent};
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_euro_formats_whole_amounts_with_thousands_separators() -> Result<()> {
    let test_cases = vec![
        ("0", "€0"),
        ("999", "€999"),
        ("1000", "€1,000"),
        ("1234567.49", "€1,234,567"),
        ("600000", "€600,000"),
        ("-1234.4", "€-1,234"),
        ("-0.4", "€0"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(Euro(Decimal::from_str(input_string)?).to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_euro_rounds_half_to_even() -> Result<()> {
    assert_eq!(Euro(Decimal::from_str("1.5")?).to_string(), "€2");
    assert_eq!(Euro(Decimal::from_str("2.5")?).to_string(), "€2");
    assert_eq!(Euro(Decimal::from_str("2.51")?).to_string(), "€3");

    Ok(())
}

#[test]
fn test_percent_renders_whole_and_precise_rates() -> Result<()> {
    assert_eq!(Percent::whole(Decimal::from_str("0.05")?).to_string(), "5%");
    assert_eq!(Percent::whole(Decimal::from_str("0.125")?).to_string(), "12%");
    assert_eq!(Percent::precise(Decimal::from_str("0.03")?).to_string(), "3.00%");
    assert_eq!(Percent::precise(Decimal::from_str("0.123456")?).to_string(), "12.35%");
    assert_eq!(Percent::precise(Decimal::ZERO).to_string(), "0.00%");

    Ok(())
}
