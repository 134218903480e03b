//! Data models for reference tables, recipes, and cost reports

use crate::units::UnitKind;

/// An ingredient as purchased: a pack of some quantity in some unit.
///
/// `standard_cost` and `standard_unit` are filled in by standardization;
/// they stay `None` when the purchase record cannot yield a usable
/// per-base-unit cost.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub name: String,
    pub supplier: String,
    /// Pre-tax cost of one purchase pack.
    pub purchase_cost: f64,
    pub purchase_quantity: f64,
    pub purchase_unit: String,
    pub is_taxable: bool,
    /// Cost per base unit (gram, milliliter, or each).
    pub standard_cost: Option<f64>,
    pub standard_unit: Option<UnitKind>,
}

/// A consumable supply (boxes, liners, parchment), always counted per piece.
#[derive(Debug, Clone)]
pub struct Supply {
    pub name: String,
    pub supplier: String,
    pub purchase_cost: f64,
    pub purchase_quantity: f64,
    pub is_taxable: bool,
    pub cost_per_each: Option<f64>,
}

/// A per-time operating cost (equipment run time, kitchen labor).
#[derive(Debug, Clone)]
pub struct IndirectCost {
    pub name: String,
    pub cost_per_hour: f64,
    pub cost_per_minute: Option<f64>,
}

/// Which reference table a recipe line draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Ingredient,
    Supply,
    IndirectCost,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Ingredient => "ingredient",
            LineKind::Supply => "supply",
            LineKind::IndirectCost => "indirect_cost",
        }
    }

    pub fn parse(s: &str) -> Option<LineKind> {
        match s {
            "ingredient" => Some(LineKind::Ingredient),
            "supply" => Some(LineKind::Supply),
            "indirect_cost" => Some(LineKind::IndirectCost),
            _ => None,
        }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consumption line of a recipe.
///
/// For indirect costs the quantity is always minutes and `unit` is "minute".
#[derive(Debug, Clone)]
pub struct RecipeLine {
    pub kind: LineKind,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    /// Number of units one batch yields.
    pub batch_size: i64,
    pub labor_minutes: f64,
    pub lines: Vec<RecipeLine>,
}

/// Configuration scalars for a pricing run.
#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    /// Sales tax as a fraction (0.15 = 15%).
    pub tax_rate: f64,
    /// Labor cost in currency per hour.
    pub labor_rate: f64,
    /// Markup as a fraction (3.00 = 300%).
    pub markup: f64,
}

/// Cost of a single recipe line, rounded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCost {
    pub name: String,
    pub cost: f64,
}

/// Result of pricing one recipe.
///
/// `line_costs` preserves the recipe's line order. Summary fields are
/// rounded to cents; line costs to four decimals.
#[derive(Debug, Clone)]
pub struct CostReport {
    pub recipe_name: String,
    pub line_costs: Vec<LineCost>,
    pub items_subtotal: f64,
    pub total_tax: f64,
    pub labor_cost: f64,
    pub total_recipe_cost: f64,
    pub cost_per_serving: f64,
    pub recommended_selling_price: f64,
}
