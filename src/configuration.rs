//! Product Configuration
//!
//! A product configuration is the editing session for one product's options and variants. Option
//! changes go through the option store, are checked against the [`VariantLimits`], and then
//! regenerate and reconcile the variant list. Field edits go straight to [`crate::edits`].
//!
//! Every operation either succeeds completely or leaves the configuration exactly as it was.

use std::mem;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    combinations::VariantCombination,
    edits::{self, EditError},
    limits::{LimitError, VariantLimits},
    options::{OptionError, OptionId, OptionSet, VariantOption},
    reconcile::{ReconcileReport, regenerate},
    variants::{ProductVariant, VariantId},
};

/// Errors from editing a product configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The option change was invalid.
    #[error(transparent)]
    Option(#[from] OptionError),

    /// The variant edit was invalid.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The change would exceed the configured limits.
    #[error(transparent)]
    Limit(#[from] LimitError),
}

/// Options, variants and limits for a single product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductConfiguration {
    options: OptionSet,
    variants: Vec<ProductVariant>,
    limits: VariantLimits,
}

impl ProductConfiguration {
    /// Create an empty configuration.
    pub fn new(limits: VariantLimits) -> Self {
        Self {
            options: OptionSet::new(),
            variants: Vec::new(),
            limits,
        }
    }

    /// Restore a configuration from caller-held options and variants.
    ///
    /// The variants are reconciled against the options, so records for combinations that can't
    /// be formed are dropped and missing combinations get default variants.
    ///
    /// Options without values are treated the way [`Self::add_option`] leaves them: if variants
    /// were saved alongside such an option, they are reconciled against the options that do have
    /// values, so a saved session restores to the same variant list.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::Option`]: the options break a naming or value rule.
    /// - [`ConfigurationError::Limit`]: the options exceed the limits.
    pub fn from_parts(
        options: impl IntoIterator<Item = VariantOption>,
        variants: Vec<ProductVariant>,
        limits: VariantLimits,
    ) -> Result<Self, ConfigurationError> {
        let options = OptionSet::from_options(options)?;

        limits.check(options.options())?;

        let pending = options.iter().any(|option| option.values().is_empty());

        let (variants, _report) = if pending && !variants.is_empty() {
            let filled: Vec<VariantOption> = options
                .iter()
                .filter(|option| !option.values().is_empty())
                .cloned()
                .collect();

            regenerate(&filled, variants)
        } else {
            regenerate(options.options(), variants)
        };

        Ok(Self {
            options,
            variants,
            limits,
        })
    }

    /// Split the configuration into its option and variant lists, e.g. to persist them.
    pub fn into_parts(self) -> (Vec<VariantOption>, Vec<ProductVariant>) {
        (self.options.into(), self.variants)
    }

    /// The option store.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// The current variants, in generation order.
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    /// Get a variant by id.
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|variant| variant.id() == id)
    }

    /// Find the variant selling a combination, regardless of pair order.
    pub fn variant_for(&self, combination: &VariantCombination) -> Option<&ProductVariant> {
        let key = combination.key();

        self.variants.iter().find(|variant| variant.key() == key)
    }

    /// The limits applied to option changes.
    pub fn limits(&self) -> VariantLimits {
        self.limits
    }

    /// Add an option with no values.
    ///
    /// The variant list is left as it is: the new option has no values yet, so there is nothing
    /// to generate until one is added. The next regeneration applies the empty option, which
    /// empties the list; removing the option first keeps the list intact.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Option`] for blank or duplicate names.
    pub fn add_option(&mut self, name: &str) -> Result<OptionId, ConfigurationError> {
        Ok(self.options.add_option(name)?)
    }

    /// Remove an option and regenerate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Option`] if the option doesn't exist.
    pub fn remove_option(&mut self, id: OptionId) -> Result<ReconcileReport, ConfigurationError> {
        self.options.remove_option(id)?;

        Ok(self.regenerate())
    }

    /// Add a value to an option and regenerate.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::Option`]: unknown option, blank or duplicate value.
    /// - [`ConfigurationError::Limit`]: the new value would exceed the limits.
    pub fn add_option_value(
        &mut self,
        id: OptionId,
        value: &str,
    ) -> Result<ReconcileReport, ConfigurationError> {
        let mut options = self.options.clone();

        options.add_option_value(id, value)?;

        if let Err(err) = self.limits.check(options.options()) {
            warn!(option = %id, value, %err, "rejected option value");

            return Err(err.into());
        }

        self.options = options;

        Ok(self.regenerate())
    }

    /// Remove a value from an option and regenerate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Option`] for an unknown option or value.
    pub fn remove_option_value(
        &mut self,
        id: OptionId,
        value: &str,
    ) -> Result<ReconcileReport, ConfigurationError> {
        self.options.remove_option_value(id, value)?;

        Ok(self.regenerate())
    }

    /// Rename an option, carrying every existing variant over to the new name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Option`] for an unknown option or an invalid name.
    pub fn rename_option(
        &mut self,
        id: OptionId,
        name: &str,
    ) -> Result<ReconcileReport, ConfigurationError> {
        let previous = self.options.rename_option(id, name)?;
        let current = self
            .options
            .get(id)
            .map(|option| option.name().to_string())
            .ok_or(OptionError::OptionNotFound(id))?;

        for variant in &mut self.variants {
            variant.options_mut().rename_option(&previous, &current);
        }

        Ok(self.regenerate())
    }

    /// Move an option to a new position and regenerate. Every variant is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Option`] if the option doesn't exist.
    pub fn move_option(
        &mut self,
        id: OptionId,
        index: usize,
    ) -> Result<ReconcileReport, ConfigurationError> {
        self.options.move_option(id, index)?;

        Ok(self.regenerate())
    }

    /// Regenerate the variants from the current options.
    pub fn regenerate(&mut self) -> ReconcileReport {
        let previous = mem::take(&mut self.variants);
        let (variants, report) = regenerate(self.options.options(), previous);

        debug!(
            options = self.options.len(),
            variants = variants.len(),
            "regenerated variants"
        );

        self.variants = variants;

        report
    }

    /// Set a variant's inventory from form input. See [`edits::set_inventory`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant or invalid inventory.
    pub fn set_inventory(&mut self, id: VariantId, input: &str) -> Result<u32, ConfigurationError> {
        Ok(edits::set_inventory(&mut self.variants, id, input)?)
    }

    /// Set a variant's inventory to a known count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant.
    pub fn set_inventory_count(
        &mut self,
        id: VariantId,
        inventory: u32,
    ) -> Result<(), ConfigurationError> {
        Ok(edits::set_inventory_count(&mut self.variants, id, inventory)?)
    }

    /// Set or clear a variant's price override from form input. See [`edits::set_price`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant or invalid price.
    pub fn set_price(
        &mut self,
        id: VariantId,
        input: &str,
    ) -> Result<Option<Decimal>, ConfigurationError> {
        Ok(edits::set_price(&mut self.variants, id, input)?)
    }

    /// Set or clear a variant's price override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant or a non-positive price.
    pub fn set_price_override(
        &mut self,
        id: VariantId,
        price: Option<Decimal>,
    ) -> Result<(), ConfigurationError> {
        Ok(edits::set_price_override(&mut self.variants, id, price)?)
    }

    /// Set or clear a variant's SKU.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant.
    pub fn set_sku(
        &mut self,
        id: VariantId,
        input: &str,
    ) -> Result<Option<String>, ConfigurationError> {
        Ok(edits::set_sku(&mut self.variants, id, input)?)
    }

    /// Flip whether a variant is offered for sale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant.
    pub fn toggle_active(&mut self, id: VariantId) -> Result<bool, ConfigurationError> {
        Ok(edits::toggle_active(&mut self.variants, id)?)
    }

    /// Give a variant a custom label, or restore the default with a blank one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Edit`] for an unknown variant.
    pub fn rename_variant(&mut self, id: VariantId, name: &str) -> Result<(), ConfigurationError> {
        Ok(edits::rename_variant(&mut self.variants, id, name)?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn labels(configuration: &ProductConfiguration) -> Vec<&str> {
        configuration
            .variants()
            .iter()
            .map(ProductVariant::name)
            .collect()
    }

    #[test]
    fn add_option_does_not_regenerate() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option("Color")?;

        assert_eq!(labels(&configuration), ["S"]);

        configuration.regenerate();

        assert!(configuration.variants().is_empty());

        Ok(())
    }

    #[test]
    fn removing_an_unfilled_option_restores_previous_variants() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;

        let id = configuration
            .variants()
            .first()
            .map(ProductVariant::id)
            .ok_or("no variants")?;

        configuration.set_inventory(id, "3")?;

        let color = configuration.add_option("Color")?;
        let report = configuration.remove_option(color)?;

        assert!(report.is_unchanged());
        assert_eq!(configuration.variant(id).map(ProductVariant::inventory), Some(3));

        Ok(())
    }

    #[test]
    fn removing_last_option_empties_variants() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option_value(size, "M")?;

        let report = configuration.remove_option(size)?;

        assert_eq!(report.dropped.len(), 2);
        assert!(configuration.variants().is_empty());
        assert!(configuration.options().is_empty());

        Ok(())
    }

    #[test]
    fn limit_rejection_leaves_state_unchanged() -> TestResult {
        let mut configuration = ProductConfiguration::new(VariantLimits::new(2));
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option_value(size, "M")?;

        let before = configuration.clone();
        let result = configuration.add_option_value(size, "L");

        assert!(matches!(
            result,
            Err(ConfigurationError::Limit(LimitError::TooManyCombinations {
                projected: 3,
                limit: 2
            }))
        ));
        assert_eq!(configuration, before);

        Ok(())
    }

    #[test]
    fn limit_counts_options_without_values_as_one() -> TestResult {
        let mut configuration = ProductConfiguration::new(VariantLimits::new(4));
        let size = configuration.add_option("Size")?;
        let color = configuration.add_option("Color")?;

        for value in ["S", "M", "L", "XL"] {
            configuration.add_option_value(size, value)?;
        }

        assert!(configuration.variants().is_empty());

        configuration.add_option_value(color, "Red")?;

        assert_eq!(configuration.variants().len(), 4);
        assert!(configuration.add_option_value(color, "Blue").is_err());

        Ok(())
    }

    #[test]
    fn invalid_option_change_leaves_state_unchanged() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;

        let before = configuration.clone();

        assert!(configuration.add_option_value(size, "S").is_err());
        assert!(configuration.remove_option_value(size, "XL").is_err());
        assert!(configuration.add_option("size").is_err());
        assert!(configuration.rename_option(size, " ").is_err());
        assert!(configuration.remove_option(OptionId::generate()).is_err());
        assert_eq!(configuration, before);

        Ok(())
    }

    #[test]
    fn rename_option_keeps_variant_identity() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option_value(size, "M")?;

        let ids: Vec<VariantId> = configuration.variants().iter().map(ProductVariant::id).collect();
        let first = ids.first().copied().ok_or("no variants")?;

        configuration.set_sku(first, "SHIRT-S")?;

        let report = configuration.rename_option(size, "Shirt size")?;

        assert!(report.is_unchanged());
        assert_eq!(
            configuration.variants().iter().map(ProductVariant::id).collect::<Vec<_>>(),
            ids
        );

        let variant = configuration.variant(first).ok_or("variant dropped")?;

        assert_eq!(variant.sku(), Some("SHIRT-S"));
        assert_eq!(variant.options().value("Shirt size"), Some("S"));
        assert_eq!(variant.options().value("Size"), None);

        Ok(())
    }

    #[test]
    fn move_option_reorders_without_losing_variants() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;
        let color = configuration.add_option("Color")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option_value(size, "M")?;
        configuration.add_option_value(color, "Red")?;
        configuration.add_option_value(color, "Blue")?;

        let report = configuration.move_option(color, 0)?;

        assert!(report.is_unchanged());
        assert_eq!(labels(&configuration), ["S / Red", "M / Red", "S / Blue", "M / Blue"]);

        Ok(())
    }

    #[test]
    fn from_parts_normalizes_caller_variants() -> TestResult {
        let options = vec![VariantOption::new("Size", ["S", "M"])];
        let stale = ProductVariant::new(VariantCombination::from_pairs([("Size", "XL")]));
        let kept = ProductVariant::new(VariantCombination::from_pairs([("Size", "M")]));

        let configuration = ProductConfiguration::from_parts(
            options,
            vec![stale.clone(), kept.clone()],
            VariantLimits::default(),
        )?;

        assert_eq!(labels(&configuration), ["S", "M"]);
        assert!(configuration.variant(stale.id()).is_none());
        assert_eq!(configuration.variants().get(1), Some(&kept));

        Ok(())
    }

    #[test]
    fn from_parts_enforces_limits() {
        let options = vec![
            VariantOption::new("Size", ["S", "M"]),
            VariantOption::new("Color", ["Red", "Blue"]),
        ];

        let result = ProductConfiguration::from_parts(options, Vec::new(), VariantLimits::new(3));

        assert!(matches!(result, Err(ConfigurationError::Limit(_))));
    }

    #[test]
    fn into_parts_round_trips_through_from_parts() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;

        let (options, variants) = configuration.clone().into_parts();
        let restored = ProductConfiguration::from_parts(options, variants, configuration.limits())?;

        assert_eq!(restored, configuration);

        Ok(())
    }

    #[test]
    fn round_trip_keeps_variants_beside_an_option_without_values() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;

        let id = configuration
            .variants()
            .first()
            .map(ProductVariant::id)
            .ok_or("no variants")?;

        configuration.set_inventory(id, "3")?;
        configuration.set_sku(id, "TS-S")?;

        let color = configuration.add_option("Color")?;

        let (options, variants) = configuration.clone().into_parts();
        let mut restored =
            ProductConfiguration::from_parts(options, variants, configuration.limits())?;

        assert_eq!(restored, configuration);

        restored.remove_option(color)?;

        let variant = restored.variant(id).ok_or("variant dropped")?;

        assert_eq!(variant.inventory(), 3);
        assert_eq!(variant.sku(), Some("TS-S"));

        Ok(())
    }

    #[test]
    fn round_trip_keeps_a_collapsed_list_empty() -> TestResult {
        let mut configuration = ProductConfiguration::default();
        let size = configuration.add_option("Size")?;

        configuration.add_option_value(size, "S")?;
        configuration.add_option("Color")?;
        configuration.regenerate();

        let (options, variants) = configuration.clone().into_parts();
        let restored = ProductConfiguration::from_parts(options, variants, configuration.limits())?;

        assert!(restored.variants().is_empty());
        assert_eq!(restored, configuration);

        Ok(())
    }

    #[test]
    fn variant_for_matches_any_pair_order() -> TestResult {
        let configuration = ProductConfiguration::from_parts(
            vec![
                VariantOption::new("Size", ["S"]),
                VariantOption::new("Color", ["Red"]),
            ],
            Vec::new(),
            VariantLimits::default(),
        )?;

        let lookup = VariantCombination::from_pairs([("Color", "Red"), ("Size", "S")]);

        assert_eq!(
            configuration.variant_for(&lookup).map(ProductVariant::name),
            Some("S / Red")
        );

        Ok(())
    }
}
