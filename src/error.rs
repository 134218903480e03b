//! Error types for standardization and pricing
//!
//! Any of these aborts the whole calculation for a recipe. Nothing is
//! downgraded to a default: substituting a zero cost for an unresolvable
//! item would corrupt the financial report.

use thiserror::Error;

use crate::models::LineKind;

#[derive(Debug, Error)]
pub enum CostError {
    /// A recipe line references a name absent from its table.
    #[error("unknown {kind} '{name}'")]
    UnknownItem { kind: LineKind, name: String },

    /// An item's standardization could not produce a usable per-unit cost.
    #[error("'{name}' has no standardized cost (check its purchase quantity and unit)")]
    UnstandardizedItem { name: String },

    /// Batch size is zero or negative.
    #[error("batch size must be positive, got {batch_size}")]
    InvalidBatchSize { batch_size: i64 },

    /// A quantity or cost is out of range for the calculation.
    #[error("invalid quantity: {context}")]
    InvalidQuantity { context: String },

    /// A unit name is not in the conversion table.
    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },
}

pub type CostResult<T> = Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = CostError::UnknownItem {
            kind: LineKind::Supply,
            name: "Ribbon".to_string(),
        };
        assert_eq!(err.to_string(), "unknown supply 'Ribbon'");

        let err = CostError::InvalidBatchSize { batch_size: 0 };
        assert_eq!(err.to_string(), "batch size must be positive, got 0");

        let err = CostError::UnknownUnit {
            unit: "grm".to_string(),
        };
        assert_eq!(err.to_string(), "unknown unit 'grm'");
    }
}
