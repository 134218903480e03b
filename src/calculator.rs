//! Recipe pricing logic
//!
//! Walks a recipe's lines in order against the standardized reference
//! tables and rolls them up into a cost report. A single pass, no state:
//! either the whole report is produced or an error comes back and no
//! partial report exists.

use std::collections::HashMap;

use crate::error::{CostError, CostResult};
use crate::models::{
    CostReport, IndirectCost, Ingredient, LineCost, LineKind, PricingConfig, Recipe, Supply,
};
use crate::units::ConversionTable;

/// Standardized reference tables with name lookup built once.
///
/// The aggregator only reads these; nothing here is mutated after
/// construction, so one `CostTables` can serve any number of recipes.
pub struct CostTables {
    ingredients: HashMap<String, Ingredient>,
    supplies: HashMap<String, Supply>,
    indirect_costs: HashMap<String, IndirectCost>,
}

impl CostTables {
    pub fn new(
        ingredients: Vec<Ingredient>,
        supplies: Vec<Supply>,
        indirect_costs: Vec<IndirectCost>,
    ) -> Self {
        CostTables {
            ingredients: ingredients
                .into_iter()
                .map(|i| (i.name.clone(), i))
                .collect(),
            supplies: supplies.into_iter().map(|s| (s.name.clone(), s)).collect(),
            indirect_costs: indirect_costs
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
        }
    }
}

/// Price a recipe against the standardized tables.
///
/// Line costs come back in recipe order. Summary fields are accumulated at
/// full precision and rounded to cents only in the returned report; line
/// costs are rounded to four decimals for display.
pub fn calculate_recipe_price(
    recipe: &Recipe,
    tables: &CostTables,
    conversions: &ConversionTable,
    config: &PricingConfig,
) -> CostResult<CostReport> {
    if recipe.batch_size <= 0 {
        return Err(CostError::InvalidBatchSize {
            batch_size: recipe.batch_size,
        });
    }

    let mut line_costs = Vec::with_capacity(recipe.lines.len());
    let mut items_subtotal = 0.0;
    let mut total_tax = 0.0;

    for line in &recipe.lines {
        if line.quantity <= 0.0 {
            return Err(CostError::InvalidQuantity {
                context: format!(
                    "recipe line '{}' has quantity {}",
                    line.name, line.quantity
                ),
            });
        }

        let (line_cost, line_tax) = match line.kind {
            LineKind::Ingredient => {
                let item = tables.ingredients.get(&line.name).ok_or_else(|| {
                    CostError::UnknownItem {
                        kind: line.kind,
                        name: line.name.clone(),
                    }
                })?;
                let standard_cost =
                    item.standard_cost
                        .ok_or_else(|| CostError::UnstandardizedItem {
                            name: item.name.clone(),
                        })?;
                let rate = conversions
                    .rate(&line.unit)
                    .ok_or_else(|| CostError::UnknownUnit {
                        unit: line.unit.clone(),
                    })?;
                let cost = line.quantity * rate * standard_cost;
                let tax = if item.is_taxable {
                    cost * config.tax_rate
                } else {
                    0.0
                };
                (cost, tax)
            }
            LineKind::Supply => {
                let item = tables.supplies.get(&line.name).ok_or_else(|| {
                    CostError::UnknownItem {
                        kind: line.kind,
                        name: line.name.clone(),
                    }
                })?;
                let cost_per_each =
                    item.cost_per_each
                        .ok_or_else(|| CostError::UnstandardizedItem {
                            name: item.name.clone(),
                        })?;
                let cost = line.quantity * cost_per_each;
                let tax = if item.is_taxable {
                    cost * config.tax_rate
                } else {
                    0.0
                };
                (cost, tax)
            }
            LineKind::IndirectCost => {
                // quantity is minutes; indirect costs are never taxed
                let item = tables.indirect_costs.get(&line.name).ok_or_else(|| {
                    CostError::UnknownItem {
                        kind: line.kind,
                        name: line.name.clone(),
                    }
                })?;
                let cost_per_minute =
                    item.cost_per_minute
                        .ok_or_else(|| CostError::UnstandardizedItem {
                            name: item.name.clone(),
                        })?;
                (line.quantity * cost_per_minute, 0.0)
            }
        };

        items_subtotal += line_cost;
        total_tax += line_tax;
        line_costs.push(LineCost {
            name: line.name.clone(),
            cost: round_to(line_cost, 4),
        });
    }

    let labor_cost = (config.labor_rate / 60.0) * recipe.labor_minutes;
    let total_recipe_cost = items_subtotal + total_tax + labor_cost;
    let cost_per_serving = total_recipe_cost / recipe.batch_size as f64;
    let recommended_selling_price = cost_per_serving * (1.0 + config.markup);

    Ok(CostReport {
        recipe_name: recipe.name.clone(),
        line_costs,
        items_subtotal: round_to(items_subtotal, 2),
        total_tax: round_to(total_tax, 2),
        labor_cost: round_to(labor_cost, 2),
        total_recipe_cost: round_to(total_recipe_cost, 2),
        cost_per_serving: round_to(cost_per_serving, 2),
        recommended_selling_price: round_to(recommended_selling_price, 2),
    })
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

impl std::fmt::Display for CostReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Cost Report: {} ===", self.recipe_name)?;
        writeln!(f)?;

        writeln!(f, "Line items:")?;
        for line in &self.line_costs {
            writeln!(f, "  {:<30} ${:.4}", line.name, line.cost)?;
        }
        writeln!(f)?;

        writeln!(f, "Items subtotal:    ${:.2}", self.items_subtotal)?;
        writeln!(f, "Tax:               ${:.2}", self.total_tax)?;
        writeln!(f, "Labor:             ${:.2}", self.labor_cost)?;
        writeln!(f, "Total recipe cost: ${:.2}", self.total_recipe_cost)?;
        writeln!(f, "Cost per serving:  ${:.2}", self.cost_per_serving)?;
        writeln!(
            f,
            "Recommended price: ${:.2}",
            self.recommended_selling_price
        )?;

        Ok(())
    }
}
