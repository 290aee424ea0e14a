//! Assortment prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    combinations::{CombinationKey, VariantCombination, combination_count, generate_combinations},
    configuration::{ConfigurationError, ProductConfiguration},
    edits::EditError,
    limits::{LimitError, VariantLimits},
    matrix::{MatrixError, MatrixSummary, write_matrix},
    options::{OptionError, OptionId, OptionSet, VariantOption},
    reconcile::{ReconcileReport, reconcile, regenerate},
    variants::{ProductVariant, VariantId},
};
