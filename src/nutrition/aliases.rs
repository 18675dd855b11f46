//! Nutrient alias resolution
//!
//! A nutrient may be recorded under its modern id, its legacy number, or the
//! id of an equivalent nutrient (energy has three). Lookups match against all
//! of them.

use crate::catalog::{equivalence_classes, nutrient};

/// Every id that refers to the same nutrient as `nutrient_id`
///
/// Order: the nutrient's own id, its legacy number, then each other member of
/// its equivalence classes followed by that member's legacy number.
/// Equivalence is expanded one hop only. Unknown ids yield an empty list.
pub fn resolve_aliases(nutrient_id: i64) -> Vec<i64> {
    let Some(definition) = nutrient(nutrient_id) else {
        return Vec::new();
    };

    let mut aliases = vec![definition.id];
    aliases.extend(definition.legacy_id());

    for class in equivalence_classes().iter().filter(|c| c.contains(definition.id)) {
        for &member_id in class.members().iter().filter(|&&id| id != definition.id) {
            if let Some(member) = nutrient(member_id) {
                aliases.push(member.id);
                aliases.extend(member.legacy_id());
            }
        }
    }

    aliases
}

/// Concatenated aliases for each id, in input order, duplicates kept
pub fn resolve_aliases_for_many(nutrient_ids: &[i64]) -> Vec<i64> {
    nutrient_ids
        .iter()
        .flat_map(|&id| resolve_aliases(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::nutrients::all_nutrients;
    use crate::catalog::{ENERGY_NUTRIENT_ID, PROTEIN_NUTRIENT_ID};

    #[test]
    fn test_energy_aliases() {
        assert_eq!(
            resolve_aliases(ENERGY_NUTRIENT_ID),
            vec![1008, 208, 2047, 957, 2048, 958]
        );
        assert_eq!(resolve_aliases(2048), vec![2048, 958, 1008, 208, 2047, 957]);
    }

    #[test]
    fn test_legacy_number_resolves_to_definition() {
        assert_eq!(resolve_aliases(208), resolve_aliases(ENERGY_NUTRIENT_ID));
        assert_eq!(resolve_aliases(PROTEIN_NUTRIENT_ID), vec![1003, 203]);
    }

    #[test]
    fn test_unknown_nutrient() {
        assert!(resolve_aliases(999_999_999).is_empty());
    }

    #[test]
    fn test_many_keeps_duplicates() {
        let many = resolve_aliases_for_many(&[PROTEIN_NUTRIENT_ID, 999_999_999, PROTEIN_NUTRIENT_ID]);
        assert_eq!(many, vec![1003, 203, 1003, 203]);
    }

    #[test]
    fn test_alias_symmetry() {
        for definition in all_nutrients() {
            let aliases = resolve_aliases(definition.id);
            for &alias in &aliases {
                if let Some(other) = nutrient(alias) {
                    if other.id == alias {
                        assert!(
                            resolve_aliases(alias).contains(&definition.id),
                            "{} should alias back to {}",
                            alias,
                            definition.id
                        );
                    }
                }
            }
        }
    }
}
