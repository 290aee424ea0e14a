//! Inventory Matrix
//!
//! Summaries and a terminal table of a product's variants.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::variants::ProductVariant;

/// Errors that can occur when writing the matrix.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// IO error
    #[error("failed to write variant matrix: {0}")]
    Io(#[from] io::Error),
}

/// Totals across a product's variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixSummary {
    /// Number of variants
    pub variants: usize,

    /// Number of variants offered for sale
    pub active: usize,

    /// Units in stock across all variants
    pub inventory: u64,

    /// Units in stock across active variants
    pub active_inventory: u64,

    /// Number of variants with a price override
    pub price_overrides: usize,
}

impl MatrixSummary {
    /// Summarise a variant list.
    pub fn from_variants(variants: &[ProductVariant]) -> Self {
        variants
            .iter()
            .fold(Self::default(), |mut summary, variant| {
                let inventory = u64::from(variant.inventory());

                summary.variants += 1;
                summary.inventory += inventory;

                if variant.is_active() {
                    summary.active += 1;
                    summary.active_inventory += inventory;
                }

                if variant.price().is_some() {
                    summary.price_overrides += 1;
                }

                summary
            })
    }
}

/// Write the variants as a table followed by a summary line.
///
/// # Errors
///
/// Returns a [`MatrixError::Io`] if writing fails.
pub fn write_matrix(
    mut out: impl io::Write,
    variants: &[ProductVariant],
) -> Result<(), MatrixError> {
    let mut builder = Builder::default();

    builder.push_record(["Variant", "SKU", "Inventory", "Price", "Active"]);

    for variant in variants {
        builder.push_record([
            variant.name().to_string(),
            variant.sku().unwrap_or("-").to_string(),
            variant.inventory().to_string(),
            variant
                .price()
                .map_or_else(|| "base".to_string(), |price| price.to_string()),
            if variant.is_active() { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..4), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    let summary = MatrixSummary::from_variants(variants);

    writeln!(out, "\n{table}")?;
    writeln!(
        out,
        " {} variants, {} active, {} in stock ({} active)",
        summary.variants, summary.active, summary.inventory, summary.active_inventory
    )?;

    Ok(())
}
