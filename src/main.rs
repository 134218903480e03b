//! Recipe Cost Calculator
//!
//! Computes the fully-loaded cost and recommended selling price of a
//! baked good from ingredient, supply, and indirect-cost reference tables.

mod calculator;
mod db;
mod error;
mod models;
mod standardize;
mod units;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::models::PricingConfig;

#[derive(Parser)]
#[command(name = "recipe-cost")]
#[command(about = "Recipe costing and pricing calculator for small bakeries")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "bakery.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a recipe and print its cost report
    Price {
        /// Recipe name (e.g., "Vanilla Cupcakes")
        recipe: String,

        /// Sales tax rate as a fraction
        #[arg(long, default_value = "0.15")]
        tax_rate: f64,

        /// Labor rate in currency per hour
        #[arg(long, default_value = "20.0")]
        labor_rate: f64,

        /// Markup as a fraction (3.0 = 300%)
        #[arg(long, default_value = "3.0")]
        markup: f64,

        /// Show per-line consumption detail
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all ingredients with their standardized costs
    ListIngredients,

    /// List all supplies with their per-piece costs
    ListSupplies,

    /// List all indirect costs with their per-minute rates
    ListIndirectCosts,

    /// List all recipes
    ListRecipes,

    /// Show details for a specific ingredient
    Ingredient {
        /// Ingredient name
        name: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load the sample bakery dataset
    LoadSample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Price {
            recipe,
            tax_rate,
            labor_rate,
            markup,
            verbose,
        } => {
            let config = PricingConfig {
                tax_rate,
                labor_rate,
                markup,
            };
            let recipe = db::get_recipe(&conn, &recipe)?
                .ok_or_else(|| anyhow!("recipe '{}' not found. Run 'list-recipes' to see what is available.", recipe))?;

            let conversions = db::load_conversions(&conn)?;
            if conversions.is_empty() {
                return Err(anyhow!(
                    "no unit conversions in database. Run 'load-sample' first."
                ));
            }

            let ingredients =
                standardize::standardize_ingredients(db::load_ingredients(&conn)?, &conversions)?;
            let supplies = standardize::standardize_supplies(db::load_supplies(&conn)?)?;
            let indirect_costs =
                standardize::standardize_indirect_costs(db::load_indirect_costs(&conn)?)?;
            let tables = calculator::CostTables::new(ingredients, supplies, indirect_costs);

            if verbose {
                println!("Recipe: {} (batch of {}, {} min labor)", recipe.name, recipe.batch_size, recipe.labor_minutes);
                for line in &recipe.lines {
                    println!("  {} {} {} ({})", line.quantity, line.unit, line.name, line.kind);
                }
                println!();
            }

            let report =
                calculator::calculate_recipe_price(&recipe, &tables, &conversions, &config)?;
            println!("{}", report);
        }

        Commands::ListIngredients => {
            let conversions = db::load_conversions(&conn)?;
            let ingredients =
                standardize::standardize_ingredients(db::load_ingredients(&conn)?, &conversions)?;
            if ingredients.is_empty() {
                println!("No ingredients in database. Run 'load-sample' first.");
            } else {
                println!("{:<25} {:<20} {:>12} {:>18}", "Ingredient", "Supplier", "Pack Cost", "Standard Cost");
                println!("{}", "-".repeat(77));
                for item in ingredients {
                    let standard = match (item.standard_cost, item.standard_unit) {
                        (Some(cost), Some(kind)) => {
                            format!("${:.5}/{}", cost, kind.base_unit())
                        }
                        _ => "(unpriced)".to_string(),
                    };
                    println!(
                        "{:<25} {:<20} {:>12} {:>18}",
                        item.name,
                        item.supplier,
                        format!("${:.2}", item.purchase_cost),
                        standard
                    );
                }
            }
        }

        Commands::ListSupplies => {
            let supplies = standardize::standardize_supplies(db::load_supplies(&conn)?)?;
            if supplies.is_empty() {
                println!("No supplies in database. Run 'load-sample' first.");
            } else {
                println!("{:<25} {:<20} {:>14}", "Supply", "Supplier", "Cost per Each");
                println!("{}", "-".repeat(61));
                for item in supplies {
                    let each = match item.cost_per_each {
                        Some(cost) => format!("${:.4}", cost),
                        None => "(unpriced)".to_string(),
                    };
                    println!("{:<25} {:<20} {:>14}", item.name, item.supplier, each);
                }
            }
        }

        Commands::ListIndirectCosts => {
            let costs = standardize::standardize_indirect_costs(db::load_indirect_costs(&conn)?)?;
            if costs.is_empty() {
                println!("No indirect costs in database. Run 'load-sample' first.");
            } else {
                println!("{:<25} {:>10} {:>12}", "Indirect Cost", "Per Hour", "Per Minute");
                println!("{}", "-".repeat(49));
                for item in costs {
                    let per_minute = item.cost_per_minute.unwrap_or(0.0);
                    println!(
                        "{:<25} {:>10} {:>12}",
                        item.name,
                        format!("${:.2}", item.cost_per_hour),
                        format!("${:.4}", per_minute)
                    );
                }
            }
        }

        Commands::ListRecipes => {
            let recipes = db::list_recipes(&conn)?;
            if recipes.is_empty() {
                println!("No recipes in database. Run 'load-sample' first.");
            } else {
                println!("{:<30} {:>10}", "Recipe", "Batch");
                println!("{}", "-".repeat(41));
                for (name, batch_size) in recipes {
                    println!("{:<30} {:>10}", name, batch_size);
                }
            }
        }

        Commands::Ingredient { name } => {
            let conversions = db::load_conversions(&conn)?;
            let ingredients =
                standardize::standardize_ingredients(db::load_ingredients(&conn)?, &conversions)?;
            if let Some(item) = ingredients.iter().find(|i| i.name == name) {
                println!("Ingredient: {}", item.name);
                println!("  Supplier: {}", item.supplier);
                println!(
                    "  Purchased: {} {} for ${:.2} ({})",
                    item.purchase_quantity,
                    item.purchase_unit,
                    item.purchase_cost,
                    if item.is_taxable { "taxable" } else { "tax-free" }
                );
                match (item.standard_cost, item.standard_unit) {
                    (Some(cost), Some(kind)) => {
                        println!("  Standard cost: ${:.6} per {}", cost, kind.base_unit());
                    }
                    _ => println!("  Standard cost: unavailable (zero purchase quantity)"),
                }
            } else {
                println!("Ingredient '{}' not found", name);
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}

/// Load the sample bakery dataset: reference tables and one recipe
fn load_sample_data(conn: &Connection) -> Result<()> {
    use crate::models::{IndirectCost, Ingredient, LineKind, Recipe, Supply};
    use crate::units::BUILTIN_UNITS;

    db::clear_data(conn)?;

    for (name, ratio, kind) in BUILTIN_UNITS {
        db::upsert_conversion(conn, name, *ratio, *kind)?;
    }

    let ingredients = [
        ("All-Purpose Flour", "Bulk Barn", 5.00, 2000.0, "gram", false),
        ("White Sugar", "Costco", 4.50, 10.0, "pound", false),
        ("Large Eggs", "Local Farm", 6.00, 12.0, "each", false),
        ("Unsalted Butter", "Costco", 7.50, 1.0, "pound", false),
        ("Vanilla Extract", "Amazon", 12.00, 8.0, "fluid_ounce", true),
    ];
    for (name, supplier, cost, quantity, unit, taxable) in ingredients {
        db::upsert_ingredient(
            conn,
            &Ingredient {
                name: name.to_string(),
                supplier: supplier.to_string(),
                purchase_cost: cost,
                purchase_quantity: quantity,
                purchase_unit: unit.to_string(),
                is_taxable: taxable,
                standard_cost: None,
                standard_unit: None,
            },
        )?;
    }

    let supplies = [
        ("8-inch Cake Box", "Webstaurant Store", 1.25, 1.0),
        ("Cupcake Liners", "Amazon", 5.00, 100.0),
        ("Parchment Paper Sheet", "Costco", 0.15, 1.0),
    ];
    for (name, supplier, cost, quantity) in supplies {
        db::upsert_supply(
            conn,
            &Supply {
                name: name.to_string(),
                supplier: supplier.to_string(),
                purchase_cost: cost,
                purchase_quantity: quantity,
                is_taxable: true,
                cost_per_each: None,
            },
        )?;
    }

    let indirect_costs = [
        ("Oven Usage", 0.50),
        ("Mixer Usage", 0.10),
        ("General Kitchen Labor", 20.00),
    ];
    for (name, cost_per_hour) in indirect_costs {
        db::upsert_indirect_cost(
            conn,
            &IndirectCost {
                name: name.to_string(),
                cost_per_hour,
                cost_per_minute: None,
            },
        )?;
    }

    let recipe = Recipe {
        name: "Vanilla Cupcakes".to_string(),
        batch_size: 12,
        labor_minutes: 45.0,
        lines: vec![
            sample_line(LineKind::Ingredient, "All-Purpose Flour", 250.0, "gram"),
            sample_line(LineKind::Ingredient, "White Sugar", 200.0, "gram"),
            sample_line(LineKind::Ingredient, "Large Eggs", 2.0, "each"),
            sample_line(LineKind::Ingredient, "Unsalted Butter", 120.0, "gram"),
            sample_line(LineKind::Ingredient, "Vanilla Extract", 2.0, "teaspoon"),
            sample_line(LineKind::Supply, "Cupcake Liners", 12.0, "each"),
            sample_line(LineKind::IndirectCost, "Oven Usage", 25.0, "minute"),
            sample_line(LineKind::IndirectCost, "Mixer Usage", 10.0, "minute"),
        ],
    };
    db::insert_recipe(conn, &recipe)?;

    println!(
        "Loaded {} ingredients, {} supplies, {} indirect costs, 1 recipe",
        5, 3, 3
    );
    Ok(())
}

fn sample_line(kind: models::LineKind, name: &str, quantity: f64, unit: &str) -> models::RecipeLine {
    models::RecipeLine {
        kind,
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    }
}
