//! Map a logged serving back onto current portion choices
//!
//! Portions can be edited after a membership is logged, so there is no stable
//! link from the logged portion to a choice. This is a text heuristic: the
//! logged portion is rendered at quantity 1 and a choice matches when its
//! display string appears inside that rendering. It is not a bijection.

use super::choices::PortionChoice;
use super::format::format_portion;
use crate::models::{FoodPortion, PortionMeasure};

fn normalize(display: &str) -> String {
    display.replace(' ', "").to_lowercase()
}

/// Render a logged portion as a single unit of itself
fn single_unit_display(logged: &FoodPortion) -> String {
    let mut single = logged.clone();
    if let PortionMeasure::Serving { size, unit } = logged.measure {
        single.measure = PortionMeasure::Serving {
            size: size / logged.quantity_or_one(),
            unit,
        };
    }
    single.quantity = Some(1.0);
    format_portion(&single)
}

/// First choice whose display text is contained in the logged portion's,
/// with the logged quantity (absent quantity counts as 1)
pub fn match_member_portion<'a>(
    logged: &FoodPortion,
    choices: &'a [PortionChoice],
) -> Option<(&'a PortionChoice, f64)> {
    let logged_display = normalize(&single_unit_display(logged));

    choices
        .iter()
        .find(|choice| logged_display.contains(&normalize(&choice.display)))
        .map(|choice| (choice, logged.quantity.unwrap_or(1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::ServingSizeUnit;
    use crate::portions::{display_choices_for, PortionChoiceId, SyntheticPortion};

    #[test]
    fn test_matches_one_gram_default() {
        let mut logged = FoodPortion::serving(50.0, ServingSizeUnit::Weight);
        logged.quantity = Some(50.0);

        let choices = display_choices_for(None, None);
        let (choice, quantity) = match_member_portion(&logged, &choices).unwrap();
        assert_eq!(choice.id, PortionChoiceId::Synthetic(SyntheticPortion::One));
        assert_eq!(quantity, 50.0);
    }

    #[test]
    fn test_matches_measure_unit_choice() {
        let mut cup = FoodPortion::serving(240.0, ServingSizeUnit::Volume);
        cup.amount = Some(1.0);
        cup.measure_unit_id = Some(1000);

        let mut logged = cup.clone();
        logged.measure = PortionMeasure::Serving {
            size: 480.0,
            unit: ServingSizeUnit::Volume,
        };
        logged.quantity = Some(2.0);

        let choices = vec![
            PortionChoice {
                id: PortionChoiceId::Portion(cup.external_id),
                display: "1 Cup (240ml)".to_string(),
                serving_size: 240.0,
                serving_size_unit: ServingSizeUnit::Volume,
                servings_per_container: None,
                quantity: None,
            },
        ];

        let (choice, quantity) = match_member_portion(&logged, &choices).unwrap();
        assert_eq!(choice.id, PortionChoiceId::Portion(cup.external_id));
        assert_eq!(quantity, 2.0);
    }

    #[test]
    fn test_no_match() {
        let logged = FoodPortion::serving(37.0, ServingSizeUnit::Weight);
        let choices = display_choices_for(None, None);
        assert!(match_member_portion(&logged, &choices).is_none());
    }

    #[test]
    fn test_absent_quantity_counts_as_one() {
        let logged = FoodPortion::serving(100.0, ServingSizeUnit::Weight);
        let choices = display_choices_for(None, None);
        let (choice, quantity) = match_member_portion(&logged, &choices).unwrap();
        assert_eq!(choice.display, "100g");
        assert_eq!(quantity, 1.0);
    }
}
