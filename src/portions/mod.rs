//! Portion display, choices and matching

pub mod choices;
pub mod format;
pub mod matching;
pub mod usage;

pub use choices::{display_choices_for, PortionChoice, PortionChoiceId, PortionedFood, SyntheticPortion};
pub use format::{format_portion, format_significant, PORTION_DESCRIPTION_NOT_SPECIFIED};
pub use matching::match_member_portion;
pub use usage::{category_food_count_in_meals, category_serving_size_in_meals, serving_size_in_meals};
