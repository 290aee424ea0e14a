//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    combinations::VariantCombination,
    configuration::ProductConfiguration,
    fixtures::FixtureError,
    limits::VariantLimits,
};

/// Product fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Options in the order they are added
    #[serde(default)]
    pub options: Vec<OptionFixture>,

    /// Edits applied to the generated variants
    #[serde(default)]
    pub variants: Vec<VariantFixture>,

    /// Limits for this product, if it needs something other than the default
    #[serde(default)]
    pub limits: Option<VariantLimits>,
}

/// Option fixture from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionFixture {
    /// Option name
    pub name: String,

    /// Option values in the order they are added
    #[serde(default)]
    pub values: Vec<String>,
}

/// Edits to one generated variant, selected by its option values.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantFixture {
    /// Option name -> value selecting the variant
    pub select: FxHashMap<String, String>,

    /// Custom label
    #[serde(default)]
    pub name: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub inventory: Option<u32>,

    /// Price override
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,

    /// Whether the variant is offered for sale
    #[serde(default)]
    pub active: Option<bool>,
}

impl VariantFixture {
    fn combination(&self) -> VariantCombination {
        let mut pairs: Vec<(&String, &String)> = self.select.iter().collect();

        pairs.sort();

        VariantCombination::from_pairs(pairs.into_iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl ProductFixture {
    /// Build a configuration by replaying the fixture through the option and edit operations.
    ///
    /// `limits` takes precedence over the fixture's own limits, which take precedence over the
    /// defaults.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::Configuration`]: an option or edit was rejected.
    /// - [`FixtureError::VariantNotFound`]: a variant selection matches no generated variant.
    pub fn configuration(
        &self,
        limits: Option<VariantLimits>,
    ) -> Result<ProductConfiguration, FixtureError> {
        let limits = limits.or(self.limits).unwrap_or_default();
        let mut configuration = ProductConfiguration::new(limits);

        for option in &self.options {
            let id = configuration.add_option(&option.name)?;

            for value in &option.values {
                configuration.add_option_value(id, value)?;
            }
        }

        for fixture in &self.variants {
            let combination = fixture.combination();

            let (id, is_active) = configuration
                .variant_for(&combination)
                .map(|variant| (variant.id(), variant.is_active()))
                .ok_or_else(|| FixtureError::VariantNotFound(combination.to_string()))?;

            if let Some(name) = &fixture.name {
                configuration.rename_variant(id, name)?;
            }

            if let Some(inventory) = fixture.inventory {
                configuration.set_inventory_count(id, inventory)?;
            }

            if fixture.price.is_some() {
                configuration.set_price_override(id, fixture.price)?;
            }

            if let Some(sku) = &fixture.sku {
                configuration.set_sku(id, sku)?;
            }

            if fixture.active.is_some_and(|active| active != is_active) {
                configuration.toggle_active(id)?;
            }
        }

        Ok(configuration)
    }
}
