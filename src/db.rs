//! Database schema and operations
//!
//! Reference tables store raw purchase records only; derived costs are
//! computed in memory after loading, never persisted.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::models::{IndirectCost, Ingredient, LineKind, Recipe, RecipeLine, Supply};
use crate::units::{ConversionTable, UnitKind};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Unit of measure conversions (ratio to base unit, explicit kind)
        CREATE TABLE IF NOT EXISTS unit_conversions (
            name TEXT PRIMARY KEY,
            ratio REAL NOT NULL,
            kind TEXT NOT NULL
        );

        -- Ingredients as purchased (pre-tax cost)
        CREATE TABLE IF NOT EXISTS ingredients (
            name TEXT PRIMARY KEY,
            supplier TEXT NOT NULL,
            purchase_cost REAL NOT NULL,
            purchase_quantity REAL NOT NULL,
            purchase_unit TEXT NOT NULL,
            is_taxable INTEGER NOT NULL
        );

        -- Consumable supplies, counted per piece
        CREATE TABLE IF NOT EXISTS supplies (
            name TEXT PRIMARY KEY,
            supplier TEXT NOT NULL,
            purchase_cost REAL NOT NULL,
            purchase_quantity REAL NOT NULL,
            is_taxable INTEGER NOT NULL
        );

        -- Per-hour operating costs
        CREATE TABLE IF NOT EXISTS indirect_costs (
            name TEXT PRIMARY KEY,
            cost_per_hour REAL NOT NULL
        );

        -- Recipe headers
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            batch_size INTEGER NOT NULL,
            labor_minutes REAL NOT NULL
        );

        -- Recipe consumption lines; rowid order is recipe order
        CREATE TABLE IF NOT EXISTS recipe_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL,
            line_kind TEXT NOT NULL,
            item_name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recipe_lines_recipe ON recipe_lines(recipe_id);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a unit conversion
pub fn upsert_conversion(conn: &Connection, name: &str, ratio: f64, kind: UnitKind) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO unit_conversions (name, ratio, kind) VALUES (?1, ?2, ?3)",
        (name, ratio, kind.as_str()),
    )?;
    Ok(())
}

/// Insert or replace an ingredient
pub fn upsert_ingredient(conn: &Connection, item: &Ingredient) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO ingredients (name, supplier, purchase_cost, purchase_quantity, purchase_unit, is_taxable)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &item.name,
            &item.supplier,
            item.purchase_cost,
            item.purchase_quantity,
            &item.purchase_unit,
            item.is_taxable,
        ),
    )?;
    Ok(())
}

/// Insert or replace a supply
pub fn upsert_supply(conn: &Connection, item: &Supply) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO supplies (name, supplier, purchase_cost, purchase_quantity, is_taxable)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &item.name,
            &item.supplier,
            item.purchase_cost,
            item.purchase_quantity,
            item.is_taxable,
        ),
    )?;
    Ok(())
}

/// Insert or replace an indirect cost
pub fn upsert_indirect_cost(conn: &Connection, item: &IndirectCost) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO indirect_costs (name, cost_per_hour) VALUES (?1, ?2)",
        (&item.name, item.cost_per_hour),
    )?;
    Ok(())
}

/// Insert a recipe with its lines, replacing any existing recipe of the same name
pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
    if let Some(old_id) = recipe_id(conn, &recipe.name)? {
        conn.execute("DELETE FROM recipe_lines WHERE recipe_id = ?1", [old_id])?;
        conn.execute("DELETE FROM recipes WHERE id = ?1", [old_id])?;
    }

    conn.execute(
        "INSERT INTO recipes (name, batch_size, labor_minutes) VALUES (?1, ?2, ?3)",
        (&recipe.name, recipe.batch_size, recipe.labor_minutes),
    )?;
    let recipe_id = conn.last_insert_rowid();

    for line in &recipe.lines {
        conn.execute(
            "INSERT INTO recipe_lines (recipe_id, line_kind, item_name, quantity, unit)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                recipe_id,
                line.kind.as_str(),
                &line.name,
                line.quantity,
                &line.unit,
            ),
        )?;
    }
    Ok(())
}

fn recipe_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM recipes WHERE name = ?1")?;
    let mut rows = stmt.query_map([name], |row| row.get(0))?;
    match rows.next() {
        Some(id) => Ok(Some(id?)),
        None => Ok(None),
    }
}

/// Load the unit conversion table
pub fn load_conversions(conn: &Connection) -> Result<ConversionTable> {
    let mut stmt = conn.prepare("SELECT name, ratio, kind FROM unit_conversions")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut table = ConversionTable::new();
    for row in rows {
        let (name, ratio, kind) = row?;
        let kind = UnitKind::parse(&kind)
            .ok_or_else(|| anyhow!("unit '{}' has unrecognized kind '{}'", name, kind))?;
        table.insert(&name, ratio, kind);
    }
    Ok(table)
}

/// Load all ingredients, derived fields unset
pub fn load_ingredients(conn: &Connection) -> Result<Vec<Ingredient>> {
    let mut stmt = conn.prepare(
        "SELECT name, supplier, purchase_cost, purchase_quantity, purchase_unit, is_taxable
         FROM ingredients ORDER BY name",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Ingredient {
            name: row.get(0)?,
            supplier: row.get(1)?,
            purchase_cost: row.get(2)?,
            purchase_quantity: row.get(3)?,
            purchase_unit: row.get(4)?,
            is_taxable: row.get(5)?,
            standard_cost: None,
            standard_unit: None,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Load all supplies, derived fields unset
pub fn load_supplies(conn: &Connection) -> Result<Vec<Supply>> {
    let mut stmt = conn.prepare(
        "SELECT name, supplier, purchase_cost, purchase_quantity, is_taxable
         FROM supplies ORDER BY name",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Supply {
            name: row.get(0)?,
            supplier: row.get(1)?,
            purchase_cost: row.get(2)?,
            purchase_quantity: row.get(3)?,
            is_taxable: row.get(4)?,
            cost_per_each: None,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Load all indirect costs, derived fields unset
pub fn load_indirect_costs(conn: &Connection) -> Result<Vec<IndirectCost>> {
    let mut stmt = conn.prepare("SELECT name, cost_per_hour FROM indirect_costs ORDER BY name")?;

    let rows = stmt.query_map([], |row| {
        Ok(IndirectCost {
            name: row.get(0)?,
            cost_per_hour: row.get(1)?,
            cost_per_minute: None,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Load one recipe by name, lines in insertion order
pub fn get_recipe(conn: &Connection, name: &str) -> Result<Option<Recipe>> {
    let Some(id) = recipe_id(conn, name)? else {
        return Ok(None);
    };

    let (batch_size, labor_minutes) = conn.query_row(
        "SELECT batch_size, labor_minutes FROM recipes WHERE id = ?1",
        [id],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)),
    )?;

    let mut stmt = conn.prepare(
        "SELECT line_kind, item_name, quantity, unit
         FROM recipe_lines WHERE recipe_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map([id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut lines = Vec::new();
    for row in rows {
        let (kind, item_name, quantity, unit) = row?;
        let kind = LineKind::parse(&kind)
            .ok_or_else(|| anyhow!("recipe line for '{}' has unrecognized kind '{}'", item_name, kind))?;
        lines.push(RecipeLine {
            kind,
            name: item_name,
            quantity,
            unit,
        });
    }

    Ok(Some(Recipe {
        name: name.to_string(),
        batch_size,
        labor_minutes,
        lines,
    }))
}

/// List recipe names with batch sizes
pub fn list_recipes(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare("SELECT name, batch_size FROM recipes ORDER BY name")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Clear all reference and recipe data (for re-seeding)
pub fn clear_data(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM recipe_lines;
        DELETE FROM recipes;
        DELETE FROM indirect_costs;
        DELETE FROM supplies;
        DELETE FROM ingredients;
        DELETE FROM unit_conversions;
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn ingredient_round_trips() {
        let conn = test_conn();
        let item = Ingredient {
            name: "Flour".to_string(),
            supplier: "Bulk Barn".to_string(),
            purchase_cost: 5.00,
            purchase_quantity: 2000.0,
            purchase_unit: "gram".to_string(),
            is_taxable: false,
            standard_cost: None,
            standard_unit: None,
        };
        upsert_ingredient(&conn, &item).unwrap();

        let loaded = load_ingredients(&conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Flour");
        assert_eq!(loaded[0].purchase_cost, 5.00);
        assert!(loaded[0].standard_cost.is_none());
    }

    #[test]
    fn conversions_round_trip_with_kind() {
        let conn = test_conn();
        upsert_conversion(&conn, "pound", 453.592, UnitKind::Mass).unwrap();
        upsert_conversion(&conn, "cup", 236.588, UnitKind::Volume).unwrap();

        let table = load_conversions(&conn).unwrap();
        assert_eq!(table.rate("pound"), Some(453.592));
        assert_eq!(table.get("cup").unwrap().kind, UnitKind::Volume);
    }

    #[test]
    fn recipe_lines_come_back_in_insertion_order() {
        let conn = test_conn();
        let recipe = Recipe {
            name: "Cupcakes".to_string(),
            batch_size: 12,
            labor_minutes: 45.0,
            lines: vec![
                RecipeLine {
                    kind: LineKind::IndirectCost,
                    name: "Oven Usage".to_string(),
                    quantity: 25.0,
                    unit: "minute".to_string(),
                },
                RecipeLine {
                    kind: LineKind::Ingredient,
                    name: "Flour".to_string(),
                    quantity: 250.0,
                    unit: "gram".to_string(),
                },
                RecipeLine {
                    kind: LineKind::Supply,
                    name: "Cupcake Liners".to_string(),
                    quantity: 12.0,
                    unit: "each".to_string(),
                },
            ],
        };
        insert_recipe(&conn, &recipe).unwrap();

        let loaded = get_recipe(&conn, "Cupcakes").unwrap().unwrap();
        assert_eq!(loaded.batch_size, 12);
        let names: Vec<&str> = loaded.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Oven Usage", "Flour", "Cupcake Liners"]);
    }

    #[test]
    fn reinserting_a_recipe_replaces_it() {
        let conn = test_conn();
        let mut recipe = Recipe {
            name: "Cupcakes".to_string(),
            batch_size: 12,
            labor_minutes: 45.0,
            lines: vec![RecipeLine {
                kind: LineKind::Ingredient,
                name: "Flour".to_string(),
                quantity: 250.0,
                unit: "gram".to_string(),
            }],
        };
        insert_recipe(&conn, &recipe).unwrap();

        recipe.batch_size = 24;
        recipe.lines[0].quantity = 500.0;
        insert_recipe(&conn, &recipe).unwrap();

        let loaded = get_recipe(&conn, "Cupcakes").unwrap().unwrap();
        assert_eq!(loaded.batch_size, 24);
        assert_eq!(loaded.lines.len(), 1);
        assert_eq!(loaded.lines[0].quantity, 500.0);
    }

    #[test]
    fn missing_recipe_is_none() {
        let conn = test_conn();
        assert!(get_recipe(&conn, "Croissants").unwrap().is_none());
    }
}
