//! Cost standardization
//!
//! Turns raw purchase records into comparable per-base-unit costs. These
//! are pure transforms: they take the loaded reference rows, return new
//! rows with the derived fields filled in, and leave the inputs alone.
//! They run once, before any recipe is priced.

use crate::error::{CostError, CostResult};
use crate::models::{IndirectCost, Ingredient, Supply};
use crate::units::ConversionTable;

/// Compute `standard_cost` (currency per base unit) for each ingredient.
///
/// An ingredient whose purchase quantity converts to zero base units keeps
/// `standard_cost = None`; pricing a recipe that references it fails with
/// `UnstandardizedItem`. Negative costs or quantities and unrecognized
/// purchase units are rejected here, before any recipe math runs.
pub fn standardize_ingredients(
    ingredients: Vec<Ingredient>,
    conversions: &ConversionTable,
) -> CostResult<Vec<Ingredient>> {
    ingredients
        .into_iter()
        .map(|mut item| {
            check_purchase_fields(&item.name, item.purchase_cost, item.purchase_quantity)?;

            let def = conversions
                .get(&item.purchase_unit)
                .ok_or_else(|| CostError::UnknownUnit {
                    unit: item.purchase_unit.clone(),
                })?;

            let total_base_units = item.purchase_quantity * def.ratio;
            if total_base_units > 0.0 {
                item.standard_cost = Some(item.purchase_cost / total_base_units);
                item.standard_unit = Some(def.kind);
            } else {
                item.standard_cost = None;
                item.standard_unit = None;
            }
            Ok(item)
        })
        .collect()
}

/// Compute `cost_per_each` for each supply.
///
/// Supplies are always counted per piece, so no unit conversion applies.
pub fn standardize_supplies(supplies: Vec<Supply>) -> CostResult<Vec<Supply>> {
    supplies
        .into_iter()
        .map(|mut item| {
            check_purchase_fields(&item.name, item.purchase_cost, item.purchase_quantity)?;

            item.cost_per_each = if item.purchase_quantity > 0.0 {
                Some(item.purchase_cost / item.purchase_quantity)
            } else {
                None
            };
            Ok(item)
        })
        .collect()
}

/// Compute `cost_per_minute` for each indirect cost.
pub fn standardize_indirect_costs(costs: Vec<IndirectCost>) -> CostResult<Vec<IndirectCost>> {
    costs
        .into_iter()
        .map(|mut item| {
            if item.cost_per_hour < 0.0 {
                return Err(CostError::InvalidQuantity {
                    context: format!(
                        "'{}' has negative cost_per_hour {}",
                        item.name, item.cost_per_hour
                    ),
                });
            }
            item.cost_per_minute = Some(item.cost_per_hour / 60.0);
            Ok(item)
        })
        .collect()
}

fn check_purchase_fields(name: &str, cost: f64, quantity: f64) -> CostResult<()> {
    if cost < 0.0 {
        return Err(CostError::InvalidQuantity {
            context: format!("'{}' has negative purchase_cost {}", name, cost),
        });
    }
    if quantity < 0.0 {
        return Err(CostError::InvalidQuantity {
            context: format!("'{}' has negative purchase_quantity {}", name, quantity),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitKind;

    fn ingredient(name: &str, cost: f64, quantity: f64, unit: &str) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            supplier: "Test Supplier".to_string(),
            purchase_cost: cost,
            purchase_quantity: quantity,
            purchase_unit: unit.to_string(),
            is_taxable: false,
            standard_cost: None,
            standard_unit: None,
        }
    }

    fn supply(name: &str, cost: f64, quantity: f64) -> Supply {
        Supply {
            name: name.to_string(),
            supplier: "Test Supplier".to_string(),
            purchase_cost: cost,
            purchase_quantity: quantity,
            is_taxable: true,
            cost_per_each: None,
        }
    }

    #[test]
    fn flour_standardizes_to_cost_per_gram() {
        let table = ConversionTable::builtin();
        let items = standardize_ingredients(vec![ingredient("Flour", 5.00, 2000.0, "gram")], &table)
            .unwrap();
        assert_eq!(items[0].standard_cost, Some(0.0025));
        assert_eq!(items[0].standard_unit, Some(UnitKind::Mass));
    }

    #[test]
    fn standard_cost_round_trips_to_purchase_cost() {
        let table = ConversionTable::builtin();
        let raw = vec![
            ingredient("Sugar", 4.50, 10.0, "pound"),
            ingredient("Vanilla", 12.00, 8.0, "fluid_ounce"),
            ingredient("Eggs", 6.00, 12.0, "each"),
        ];
        let items = standardize_ingredients(raw.clone(), &table).unwrap();
        for (item, original) in items.iter().zip(&raw) {
            let ratio = table.rate(&item.purchase_unit).unwrap();
            let total_base_units = item.purchase_quantity * ratio;
            let recovered = item.standard_cost.unwrap() * total_base_units;
            assert!((recovered - original.purchase_cost).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_quantity_leaves_cost_unset() {
        let table = ConversionTable::builtin();
        let items =
            standardize_ingredients(vec![ingredient("Mystery", 3.00, 0.0, "gram")], &table)
                .unwrap();
        assert!(items[0].standard_cost.is_none());
        assert!(items[0].standard_unit.is_none());
    }

    #[test]
    fn negative_purchase_values_are_rejected() {
        let table = ConversionTable::builtin();
        let err =
            standardize_ingredients(vec![ingredient("Bad", -1.00, 5.0, "gram")], &table)
                .unwrap_err();
        assert!(matches!(err, CostError::InvalidQuantity { .. }));

        let err = standardize_supplies(vec![supply("Bad Box", 1.00, -2.0)]).unwrap_err();
        assert!(matches!(err, CostError::InvalidQuantity { .. }));
    }

    #[test]
    fn unknown_purchase_unit_is_an_error() {
        let table = ConversionTable::builtin();
        let err =
            standardize_ingredients(vec![ingredient("Typo", 2.00, 1.0, "pund")], &table)
                .unwrap_err();
        assert!(matches!(err, CostError::UnknownUnit { unit } if unit == "pund"));
    }

    #[test]
    fn supplies_divide_cost_by_pack_count() {
        let items = standardize_supplies(vec![supply("Cupcake Liners", 5.00, 100.0)]).unwrap();
        assert_eq!(items[0].cost_per_each, Some(0.05));

        let items = standardize_supplies(vec![supply("Empty Pack", 5.00, 0.0)]).unwrap();
        assert!(items[0].cost_per_each.is_none());
    }

    #[test]
    fn indirect_costs_convert_hours_to_minutes() {
        let costs = standardize_indirect_costs(vec![IndirectCost {
            name: "Oven Usage".to_string(),
            cost_per_hour: 0.50,
            cost_per_minute: None,
        }])
        .unwrap();
        let per_minute = costs[0].cost_per_minute.unwrap();
        assert!((per_minute * 60.0 - 0.50).abs() < 1e-12);
    }

    #[test]
    fn standardization_is_idempotent() {
        let table = ConversionTable::builtin();
        let once =
            standardize_ingredients(vec![ingredient("Butter", 7.50, 1.0, "pound")], &table)
                .unwrap();
        let twice = standardize_ingredients(once.clone(), &table).unwrap();
        assert_eq!(once[0].standard_cost, twice[0].standard_cost);
        assert_eq!(once[0].standard_unit, twice[0].standard_unit);

        let once = standardize_supplies(vec![supply("Cake Box", 1.25, 1.0)]).unwrap();
        let twice = standardize_supplies(once.clone()).unwrap();
        assert_eq!(once[0].cost_per_each, twice[0].cost_per_each);

        let once = standardize_indirect_costs(vec![IndirectCost {
            name: "Mixer Usage".to_string(),
            cost_per_hour: 0.10,
            cost_per_minute: None,
        }])
        .unwrap();
        let twice = standardize_indirect_costs(once.clone()).unwrap();
        assert_eq!(once[0].cost_per_minute, twice[0].cost_per_minute);
    }
}
