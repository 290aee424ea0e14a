//! Utils

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use thiserror::Error;

/// Arguments for the matrix example
#[derive(Debug, Parser)]
pub struct ExampleMatrixArgs {
    /// Fixture product to load
    #[clap(short, long, default_value = "tshirt")]
    pub fixture: String,

    /// Value to add, as `OPTION=VALUE` (repeatable)
    #[clap(short, long = "add-value")]
    pub add_value: Vec<OptionValueArg>,

    /// Value to remove, as `OPTION=VALUE` (repeatable)
    #[clap(short, long = "remove-value")]
    pub remove_value: Vec<OptionValueArg>,

    /// YAML file with variant limits
    #[clap(short, long)]
    pub limits: Option<PathBuf>,
}

/// Error parsing an `OPTION=VALUE` argument.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected OPTION=VALUE, got {0:?}")]
pub struct OptionValueArgError(String);

/// An option name and value given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValueArg {
    /// Option name
    pub option: String,

    /// Option value
    pub value: String,
}

impl FromStr for OptionValueArg {
    type Err = OptionValueArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (option, value) = s
            .split_once('=')
            .ok_or_else(|| OptionValueArgError(s.to_string()))?;

        if option.trim().is_empty() {
            return Err(OptionValueArgError(s.to_string()));
        }

        Ok(Self {
            option: option.trim().to_string(),
            value: value.to_string(),
        })
    }
}
