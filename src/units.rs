//! Unit of measure conversions
//!
//! Every canonical unit carries an explicit kind tag along with its ratio
//! to the base unit of that kind (gram for mass, milliliter for volume,
//! "each" for countable items). Lookups of unrecognized units return
//! `None`; callers turn that into `CostError::UnknownUnit` rather than
//! guessing a ratio.

use std::collections::HashMap;

/// Family a unit belongs to, determining its base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Mass,
    Volume,
    Count,
}

impl UnitKind {
    /// Name of the base unit for this kind.
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitKind::Mass => "gram",
            UnitKind::Volume => "milliliter",
            UnitKind::Count => "each",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Mass => "mass",
            UnitKind::Volume => "volume",
            UnitKind::Count => "count",
        }
    }

    pub fn parse(s: &str) -> Option<UnitKind> {
        match s {
            "mass" => Some(UnitKind::Mass),
            "volume" => Some(UnitKind::Volume),
            "count" => Some(UnitKind::Count),
            _ => None,
        }
    }
}

/// A canonical unit: how many base units one of it is worth.
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    pub ratio: f64,
    pub kind: UnitKind,
}

/// Mapping from unit name to its definition.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    units: HashMap<String, UnitDef>,
}

impl ConversionTable {
    pub fn new() -> Self {
        ConversionTable {
            units: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, ratio: f64, kind: UnitKind) {
        self.units.insert(name.to_string(), UnitDef { ratio, kind });
    }

    pub fn get(&self, unit: &str) -> Option<&UnitDef> {
        self.units.get(unit)
    }

    /// Ratio of one `unit` to its base unit, if the unit is known.
    pub fn rate(&self, unit: &str) -> Option<f64> {
        self.units.get(unit).map(|def| def.ratio)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The built-in kitchen conversion table.
    pub fn builtin() -> Self {
        let mut table = ConversionTable::new();
        for (name, ratio, kind) in BUILTIN_UNITS {
            table.insert(name, *ratio, *kind);
        }
        table
    }
}

/// Canonical units and their base-unit ratios.
pub const BUILTIN_UNITS: &[(&str, f64, UnitKind)] = &[
    ("gram", 1.0, UnitKind::Mass),
    ("kilogram", 1000.0, UnitKind::Mass),
    ("pound", 453.592, UnitKind::Mass),
    ("ounce", 28.35, UnitKind::Mass),
    ("milliliter", 1.0, UnitKind::Volume),
    ("liter", 1000.0, UnitKind::Volume),
    ("fluid_ounce", 29.5735, UnitKind::Volume),
    ("cup", 236.588, UnitKind::Volume),
    ("tablespoon", 14.7868, UnitKind::Volume),
    ("teaspoon", 4.92892, UnitKind::Volume),
    ("each", 1.0, UnitKind::Count),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_base_units_at_one() {
        let table = ConversionTable::builtin();
        assert_eq!(table.rate("gram"), Some(1.0));
        assert_eq!(table.rate("milliliter"), Some(1.0));
        assert_eq!(table.rate("each"), Some(1.0));
    }

    #[test]
    fn pound_converts_to_grams() {
        let table = ConversionTable::builtin();
        let def = table.get("pound").unwrap();
        assert_eq!(def.ratio, 453.592);
        assert_eq!(def.kind, UnitKind::Mass);
    }

    #[test]
    fn unknown_unit_is_none() {
        let table = ConversionTable::builtin();
        assert!(table.rate("grm").is_none());
        assert!(table.get("bushel").is_none());
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [UnitKind::Mass, UnitKind::Volume, UnitKind::Count] {
            assert_eq!(UnitKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(UnitKind::parse("weight"), None);
    }
}
