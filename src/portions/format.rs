//! Portion display strings
//!
//! Renders a portion as e.g. "6 cup (54ml)", "3 (slice) (90g)" or "83g".

use crate::catalog::{measure_unit, UNDETERMINED_MEASURE_UNIT_ID};
use crate::models::FoodPortion;

/// Free-text description USDA uses when no description was captured
pub const PORTION_DESCRIPTION_NOT_SPECIFIED: &str = "Quantity not specified";

/// Format to three significant figures, the way printf's `%.3g` does
pub fn format_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Rounding to 3 figures first gives the exponent printf would pick
    let scientific = format!("{:.2e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..3).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (2 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn usable_description(portion: &FoodPortion) -> Option<&str> {
    portion
        .portion_description
        .as_deref()
        .filter(|d| !d.is_empty() && *d != PORTION_DESCRIPTION_NOT_SPECIFIED)
}

/// Display string for a portion
///
/// The quantity prefix appears only when the middle part came from the
/// portion description, never when it came from amount and unit.
pub fn format_portion(portion: &FoodPortion) -> String {
    let quantity = portion.quantity_or_one();
    let suffix = format!(
        "{}{}",
        portion.serving_size().round_ties_even() as i64,
        portion.serving_size_unit().canonical_unit()
    );

    let mut infix: Option<String> = None;
    let mut use_prefix = false;

    let amount = portion.amount.filter(|a| *a != 0.0);
    let unit_name = amount.and_then(|_| {
        portion
            .measure_unit_id
            .filter(|id| *id != UNDETERMINED_MEASURE_UNIT_ID)
            .and_then(measure_unit)
            .map(|unit| unit.display_name().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| portion.modifier.clone().filter(|m| !m.is_empty()))
    });

    match (amount, unit_name) {
        (Some(amount), Some(unit_name)) => {
            infix = Some(format!("{} {}", format_significant(amount * quantity), unit_name));
        }
        _ => {
            if let Some(description) = usable_description(portion) {
                infix = Some(description.to_string());
                use_prefix = true;
            }
        }
    }

    let prefix = (quantity != 1.0 && use_prefix).then(|| format_significant(quantity));

    match (prefix, infix) {
        (Some(prefix), Some(infix)) => format!("{} ({}) ({})", prefix, infix, suffix),
        (Some(prefix), None) => format!("{} ({})", prefix, suffix),
        (None, Some(infix)) => format!("{} ({})", infix, suffix),
        (None, None) => suffix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PortionMeasure;
    use crate::nutrition::ServingSizeUnit;

    fn portion(size: f64, unit: ServingSizeUnit) -> FoodPortion {
        FoodPortion::serving(size, unit)
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(6.0), "6");
        assert_eq!(format_significant(0.5), "0.5");
        assert_eq!(format_significant(1.23456), "1.23");
        assert_eq!(format_significant(12.345), "12.3");
        assert_eq!(format_significant(100.0), "100");
        assert_eq!(format_significant(999.4), "999");
        assert_eq!(format_significant(1000.0), "1e+03");
        assert_eq!(format_significant(12345.0), "1.23e+04");
        assert_eq!(format_significant(0.0001234), "0.000123");
        assert_eq!(format_significant(0.00001234), "1.23e-05");
        assert_eq!(format_significant(-2.5), "-2.5");
        assert_eq!(format_significant(0.0), "0");
    }

    #[test]
    fn test_suffix_only() {
        assert_eq!(format_portion(&portion(54.0, ServingSizeUnit::Volume)), "54ml");
        assert_eq!(format_portion(&portion(82.5, ServingSizeUnit::Weight)), "82g");
        assert_eq!(format_portion(&portion(83.5, ServingSizeUnit::Weight)), "84g");
    }

    #[test]
    fn test_amount_with_measure_unit() {
        let mut p = portion(54.0, ServingSizeUnit::Volume);
        p.servings_per_container = Some(5.0);
        p.quantity = Some(3.0);
        p.amount = Some(2.0);
        p.measure_unit_id = Some(1000);
        p.portion_description = Some("PD".to_string());
        p.modifier = Some("modifier".to_string());
        assert_eq!(format_portion(&p), "6 cup (54ml)");

        let mut p = portion(34.0, ServingSizeUnit::Weight);
        p.amount = Some(2.0);
        p.measure_unit_id = Some(1000);
        p.portion_description = Some("PD".to_string());
        p.modifier = Some("modifier".to_string());
        assert_eq!(format_portion(&p), "2 cup (34g)");
    }

    #[test]
    fn test_abbreviation_preferred() {
        let mut p = portion(15.0, ServingSizeUnit::Volume);
        p.amount = Some(1.0);
        p.measure_unit_id = Some(1001);
        assert_eq!(format_portion(&p), "1 tbsp (15ml)");
    }

    #[test]
    fn test_undetermined_unit_falls_back_to_modifier() {
        let mut p = portion(54.0, ServingSizeUnit::Volume);
        p.quantity = Some(3.0);
        p.amount = Some(2.0);
        p.measure_unit_id = Some(UNDETERMINED_MEASURE_UNIT_ID);
        p.portion_description = Some("PD".to_string());
        p.modifier = Some("modifier".to_string());
        assert_eq!(format_portion(&p), "6 modifier (54ml)");
    }

    #[test]
    fn test_description_uses_prefix() {
        let mut p = portion(54.0, ServingSizeUnit::Volume);
        p.quantity = Some(3.0);
        p.measure_unit_id = Some(UNDETERMINED_MEASURE_UNIT_ID);
        p.portion_description = Some("PD".to_string());
        p.modifier = Some("modifier".to_string());
        assert_eq!(format_portion(&p), "3 (PD) (54ml)");

        p.quantity = None;
        assert_eq!(format_portion(&p), "PD (54ml)");
    }

    #[test]
    fn test_amount_without_unit_uses_description() {
        let mut p = portion(40.0, ServingSizeUnit::Weight);
        p.quantity = Some(2.0);
        p.amount = Some(1.0);
        p.portion_description = Some("slice".to_string());
        assert_eq!(format_portion(&p), "2 (slice) (40g)");
    }

    #[test]
    fn test_not_specified_description_ignored() {
        let mut p = portion(40.0, ServingSizeUnit::Weight);
        p.quantity = Some(2.0);
        p.portion_description = Some(PORTION_DESCRIPTION_NOT_SPECIFIED.to_string());
        assert_eq!(format_portion(&p), "40g");
    }

    #[test]
    fn test_gram_weight_portion() {
        let mut p = portion(0.0, ServingSizeUnit::Weight);
        p.measure = PortionMeasure::GramWeight { grams: 12.5 };
        p.quantity = Some(4.0);
        p.amount = Some(1.0);
        p.measure_unit_id = Some(1000);
        assert_eq!(format_portion(&p), "4 cup (50g)");
    }
}
