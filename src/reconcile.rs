//! Variant Reconciliation
//!
//! Regenerating variants after an option edit must not lose what the merchant has already
//! entered. Reconciliation maps each newly generated combination onto the previous variant with
//! the same [`CombinationKey`], keeping that variant's id and editable fields. Combinations with
//! no previous variant get a fresh default variant, and previous variants whose combination no
//! longer exists are dropped.
//!
//! The output always follows the order of the new combinations. Running reconciliation twice with
//! no option changes in between returns the same list.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    combinations::{CombinationKey, VariantCombination, generate_combinations},
    options::VariantOption,
    variants::{ProductVariant, VariantId},
};

/// What a reconciliation did to each variant id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Previous variants matched to a new combination, in output order.
    pub retained: Vec<VariantId>,

    /// Variants created for combinations seen for the first time, in output order.
    pub created: Vec<VariantId>,

    /// Previous variants whose combination no longer exists, in their previous order.
    pub dropped: Vec<VariantId>,
}

impl ReconcileReport {
    /// Check whether the variant list is unchanged apart from refreshed combinations.
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.dropped.is_empty()
    }
}

/// Merge freshly generated combinations with the previous variant list.
///
/// If `previous` holds more than one variant for the same combination, the first one is kept and
/// the rest are dropped.
pub fn reconcile(
    combinations: Vec<VariantCombination>,
    previous: Vec<ProductVariant>,
) -> (Vec<ProductVariant>, ReconcileReport) {
    let mut index: FxHashMap<CombinationKey, usize> = FxHashMap::default();

    for (position, variant) in previous.iter().enumerate() {
        index.entry(variant.key()).or_insert(position);
    }

    let mut slots: Vec<Option<ProductVariant>> = previous.into_iter().map(Some).collect();
    let mut variants = Vec::with_capacity(combinations.len());
    let mut report = ReconcileReport::default();

    for combination in combinations {
        let existing = index
            .remove(&combination.key())
            .and_then(|position| slots.get_mut(position))
            .and_then(Option::take);

        let variant = if let Some(mut variant) = existing {
            variant.replace_options(combination);
            report.retained.push(variant.id());

            variant
        } else {
            let variant = ProductVariant::new(combination);
            report.created.push(variant.id());

            variant
        };

        variants.push(variant);
    }

    report.dropped = slots.into_iter().flatten().map(|v| v.id()).collect();

    debug!(
        retained = report.retained.len(),
        created = report.created.len(),
        dropped = report.dropped.len(),
        "reconciled variants"
    );

    (variants, report)
}

/// Generate combinations for the options and reconcile them with the previous variants.
pub fn regenerate(
    options: &[VariantOption],
    previous: Vec<ProductVariant>,
) -> (Vec<ProductVariant>, ReconcileReport) {
    reconcile(generate_combinations(options), previous)
}
