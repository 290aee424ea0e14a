//! Product Variants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use crate::ids::VariantId;
use crate::combinations::{CombinationKey, VariantCombination};

/// A sellable record for one combination of option values.
///
/// Fields other than the combination are only changed through [`crate::edits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    id: VariantId,
    name: String,
    options: VariantCombination,
    #[serde(default)]
    inventory: u32,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

impl ProductVariant {
    /// Create a variant for a combination's first appearance: fresh id, default label, no stock,
    /// base price, no SKU, active.
    pub fn new(options: VariantCombination) -> Self {
        Self::with_id(VariantId::generate(), options)
    }

    /// Create a default variant with a known id.
    pub fn with_id(id: VariantId, options: VariantCombination) -> Self {
        Self {
            id,
            name: options.default_label(),
            options,
            inventory: 0,
            price: None,
            sku: None,
            is_active: true,
        }
    }

    /// Variant id
    pub fn id(&self) -> VariantId {
        self.id
    }

    /// Display label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The combination this variant sells.
    pub fn options(&self) -> &VariantCombination {
        &self.options
    }

    /// Canonical key of the variant's combination.
    pub fn key(&self) -> CombinationKey {
        self.options.key()
    }

    /// Units in stock
    pub fn inventory(&self) -> u32 {
        self.inventory
    }

    /// Price override; `None` means the product's base price applies.
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Stock keeping unit
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    /// Whether the variant is offered for sale.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the label still matches the default for the current combination.
    pub fn has_default_name(&self) -> bool {
        self.name == self.options.default_label()
    }

    pub(crate) fn replace_options(&mut self, options: VariantCombination) {
        self.options = options;
    }

    pub(crate) fn options_mut(&mut self) -> &mut VariantCombination {
        &mut self.options
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_inventory(&mut self, inventory: u32) {
        self.inventory = inventory;
    }

    pub(crate) fn set_price(&mut self, price: Option<Decimal>) {
        self.price = price;
    }

    pub(crate) fn set_sku(&mut self, sku: Option<String>) {
        self.sku = sku;
    }

    pub(crate) fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

const fn default_active() -> bool {
    true
}
