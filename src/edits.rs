//! Variant Edits
//!
//! Field mutators for a single variant in a reconciled list. Edits never regenerate the list and
//! never touch other variants. A failed edit leaves the variant as it was.
//!
//! Text inputs follow the storefront's form conventions: a blank inventory field means zero, and
//! a blank price field means "use the product's base price".

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;
use tracing::trace;

use crate::variants::{ProductVariant, VariantId};

/// Errors raised by variant edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// No variant in the list has this id.
    #[error("variant {0} not found")]
    VariantNotFound(VariantId),

    /// The inventory was negative, fractional or too large.
    #[error("invalid inventory {0:?}: must be a whole number of zero or more")]
    InvalidInventory(String),

    /// The price was not a positive number.
    #[error("invalid price {0:?}: must be a positive number")]
    InvalidPrice(String),
}

/// Parse an inventory field.
///
/// Blank or non-numeric input counts as zero.
///
/// # Errors
///
/// Returns [`EditError::InvalidInventory`] for negative, fractional or out of range numbers,
/// including numbers too long to parse at all.
pub fn parse_inventory(input: &str) -> Result<u32, EditError> {
    let trimmed = input.trim();

    if !is_numeric(trimmed) {
        return Ok(0);
    }

    let number = Decimal::from_str(trimmed)
        .map_err(|_err| EditError::InvalidInventory(trimmed.to_string()))?;

    if number.is_sign_negative() && !number.is_zero() {
        return Err(EditError::InvalidInventory(trimmed.to_string()));
    }

    if !number.fract().is_zero() {
        return Err(EditError::InvalidInventory(trimmed.to_string()));
    }

    number
        .to_u32()
        .ok_or_else(|| EditError::InvalidInventory(trimmed.to_string()))
}

/// Parse a price override field. Blank input clears the override.
///
/// # Errors
///
/// Returns [`EditError::InvalidPrice`] if the input isn't a positive decimal number.
pub fn parse_price(input: &str) -> Result<Option<Decimal>, EditError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    let price =
        Decimal::from_str(trimmed).map_err(|_err| EditError::InvalidPrice(trimmed.to_string()))?;

    validate_price(price).map(Some)
}

/// Set a variant's inventory from form input.
///
/// # Errors
///
/// - [`EditError::VariantNotFound`]: no variant has this id.
/// - [`EditError::InvalidInventory`]: see [`parse_inventory`].
pub fn set_inventory(
    variants: &mut [ProductVariant],
    id: VariantId,
    input: &str,
) -> Result<u32, EditError> {
    let variant = find_mut(variants, id)?;
    let inventory = parse_inventory(input)?;

    trace!(variant = %id, inventory, "setting inventory");

    variant.set_inventory(inventory);

    Ok(inventory)
}

/// Set a variant's inventory to a known count.
///
/// # Errors
///
/// Returns [`EditError::VariantNotFound`] if no variant has this id.
pub fn set_inventory_count(
    variants: &mut [ProductVariant],
    id: VariantId,
    inventory: u32,
) -> Result<(), EditError> {
    find_mut(variants, id)?.set_inventory(inventory);

    Ok(())
}

/// Set or clear a variant's price override from form input.
///
/// # Errors
///
/// - [`EditError::VariantNotFound`]: no variant has this id.
/// - [`EditError::InvalidPrice`]: see [`parse_price`].
pub fn set_price(
    variants: &mut [ProductVariant],
    id: VariantId,
    input: &str,
) -> Result<Option<Decimal>, EditError> {
    let variant = find_mut(variants, id)?;
    let price = parse_price(input)?;

    trace!(variant = %id, ?price, "setting price override");

    variant.set_price(price);

    Ok(price)
}

/// Set or clear a variant's price override.
///
/// # Errors
///
/// - [`EditError::VariantNotFound`]: no variant has this id.
/// - [`EditError::InvalidPrice`]: the price is zero or negative.
pub fn set_price_override(
    variants: &mut [ProductVariant],
    id: VariantId,
    price: Option<Decimal>,
) -> Result<(), EditError> {
    let variant = find_mut(variants, id)?;
    let price = price.map(validate_price).transpose()?;

    variant.set_price(price);

    Ok(())
}

/// Set a variant's SKU. Surrounding whitespace is trimmed and an empty SKU clears it.
///
/// # Errors
///
/// Returns [`EditError::VariantNotFound`] if no variant has this id.
pub fn set_sku(
    variants: &mut [ProductVariant],
    id: VariantId,
    input: &str,
) -> Result<Option<String>, EditError> {
    let variant = find_mut(variants, id)?;
    let sku = non_blank(input);

    variant.set_sku(sku.clone());

    Ok(sku)
}

/// Flip whether a variant is offered for sale, returning the new state.
///
/// # Errors
///
/// Returns [`EditError::VariantNotFound`] if no variant has this id.
pub fn toggle_active(variants: &mut [ProductVariant], id: VariantId) -> Result<bool, EditError> {
    let variant = find_mut(variants, id)?;
    let is_active = !variant.is_active();

    trace!(variant = %id, is_active, "toggling active");

    variant.set_active(is_active);

    Ok(is_active)
}

/// Give a variant a custom label. A blank label restores the default for its combination.
///
/// # Errors
///
/// Returns [`EditError::VariantNotFound`] if no variant has this id.
pub fn rename_variant(
    variants: &mut [ProductVariant],
    id: VariantId,
    input: &str,
) -> Result<(), EditError> {
    let variant = find_mut(variants, id)?;
    let name = non_blank(input).unwrap_or_else(|| variant.options().default_label());

    variant.set_name(name);

    Ok(())
}

fn find_mut(
    variants: &mut [ProductVariant],
    id: VariantId,
) -> Result<&mut ProductVariant, EditError> {
    variants
        .iter_mut()
        .find(|variant| variant.id() == id)
        .ok_or(EditError::VariantNotFound(id))
}

fn validate_price(price: Decimal) -> Result<Decimal, EditError> {
    if price.is_sign_positive() && !price.is_zero() {
        Ok(price)
    } else {
        Err(EditError::InvalidPrice(price.to_string()))
    }
}

/// Whether the text is a plain decimal number: an optional sign, digits and at most one point.
fn is_numeric(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());

    !(whole.is_empty() && fraction.is_empty()) && digits(whole) && digits(fraction)
}

fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
