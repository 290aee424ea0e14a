//! Variant Matrix Example
//!
//! Loads a product fixture, applies option value edits and prints the resulting variant matrix.
//!
//! Use `-f` to load a fixture product by name
//! Use `-a OPTION=VALUE` to add a value and `-r OPTION=VALUE` to remove one (both repeatable)
//! Use `-l` to load variant limits from a YAML file
//!
//! Set `RUST_LOG=assortment=debug` to see reconciliation events.

use std::{io, io::Write, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::EnvFilter;

use assortment::{
    configuration::ProductConfiguration,
    fixtures::Fixture,
    limits::VariantLimits,
    matrix::write_matrix,
    options::{OptionId, VariantOption},
    utils::{ExampleMatrixArgs, OptionValueArg},
};

/// Variant Matrix Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = ExampleMatrixArgs::parse();

    let limits = args
        .limits
        .as_deref()
        .map(VariantLimits::from_path)
        .transpose()?;

    let fixture = Fixture::from_set(&args.fixture)?;

    let start = Instant::now();

    let mut configuration = fixture.configuration(&args.fixture, limits)?;

    for arg in &args.add_value {
        let id = option_id(&configuration, arg)?;
        configuration.add_option_value(id, &arg.value)?;
    }

    for arg in &args.remove_value {
        let id = option_id(&configuration, arg)?;
        configuration.remove_option_value(id, &arg.value)?;
    }

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "\n {}", fixture.product(&args.fixture)?.name)?;

    write_matrix(&mut handle, configuration.variants())?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}

fn option_id(configuration: &ProductConfiguration, arg: &OptionValueArg) -> Result<OptionId> {
    configuration
        .options()
        .find_by_name(&arg.option)
        .map(VariantOption::id)
        .with_context(|| format!("no option named {:?}", arg.option))
}
