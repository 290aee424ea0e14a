//! Variant Limits
//!
//! Nothing in generation itself stops a product from growing an enormous cartesian product, so the
//! editing session checks a configured ceiling before accepting any change that could grow it.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::VariantOption;

/// Default ceiling on the number of variants a product may have.
pub const DEFAULT_MAX_COMBINATIONS: usize = 2_000;

/// Errors related to variant limits.
#[derive(Debug, Error)]
pub enum LimitError {
    /// The change would allow more combinations than the configured ceiling.
    #[error("{projected} combinations would exceed the limit of {limit}")]
    TooManyCombinations {
        /// Projected number of combinations (saturated at `usize::MAX`)
        projected: usize,

        /// Configured ceiling
        limit: usize,
    },

    /// IO error reading a limits file
    #[error("failed to read limits file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse limits: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Limits applied while editing a product's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantLimits {
    /// Maximum number of combinations the options may produce.
    pub max_combinations: usize,
}

impl VariantLimits {
    /// Create limits with the given ceiling.
    #[must_use]
    pub const fn new(max_combinations: usize) -> Self {
        Self { max_combinations }
    }

    /// Limits that never reject anything.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Parse limits from YAML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::Yaml`] if the document can't be parsed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LimitError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load limits from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::Io`] or [`LimitError::Yaml`] if the file can't be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LimitError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Check a set of options against the ceiling, returning the projected combination count.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::TooManyCombinations`] if the projection exceeds the ceiling.
    pub fn check(self, options: &[VariantOption]) -> Result<usize, LimitError> {
        let projected = projected_combinations(options);

        if projected > self.max_combinations {
            return Err(LimitError::TooManyCombinations {
                projected,
                limit: self.max_combinations,
            });
        }

        Ok(projected)
    }
}

impl Default for VariantLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMBINATIONS)
    }
}

/// Number of combinations the options will produce once every option has at least one value.
///
/// Options that don't have values yet count as a single value, so the projection can only grow
/// when a value is added. Saturates at `usize::MAX`.
pub fn projected_combinations(options: &[VariantOption]) -> usize {
    if options.is_empty() {
        return 0;
    }

    options.iter().fold(1_usize, |count, option| {
        count.saturating_mul(option.values().len().max(1))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_limit_is_applied() {
        assert_eq!(
            VariantLimits::default().max_combinations,
            DEFAULT_MAX_COMBINATIONS
        );
    }

    #[test]
    fn projection_treats_empty_options_as_one() {
        let options = [
            VariantOption::new("Size", ["S", "M", "L"]),
            VariantOption::new("Material", Vec::<String>::new()),
        ];

        assert_eq!(projected_combinations(&options), 3);
        assert_eq!(projected_combinations(&[]), 0);
    }

    #[test]
    fn check_rejects_projection_over_limit() {
        let options = [
            VariantOption::new("Size", ["S", "M", "L"]),
            VariantOption::new("Color", ["Red", "Blue"]),
        ];

        assert!(matches!(VariantLimits::new(6).check(&options), Ok(6)));
        assert!(matches!(
            VariantLimits::new(5).check(&options),
            Err(LimitError::TooManyCombinations {
                projected: 6,
                limit: 5
            })
        ));
    }

    #[test]
    fn projection_saturates() {
        let values: Vec<String> = (0..1_000).map(|n| n.to_string()).collect();
        let options: Vec<VariantOption> = (0..10)
            .map(|n| VariantOption::new(format!("Option {n}"), values.clone()))
            .collect();

        assert_eq!(projected_combinations(&options), usize::MAX);
        assert!(VariantLimits::unlimited().check(&options).is_ok());
    }

    #[test]
    fn parses_yaml_with_defaults() -> TestResult {
        assert_eq!(
            VariantLimits::from_yaml_str("max_combinations: 50")?,
            VariantLimits::new(50)
        );
        assert_eq!(VariantLimits::from_yaml_str("{}")?, VariantLimits::default());
        assert!(matches!(
            VariantLimits::from_yaml_str("max_variants: 50"),
            Err(LimitError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "max_combinations: 12")?;

        assert_eq!(VariantLimits::from_path(file.path())?, VariantLimits::new(12));

        let missing = VariantLimits::from_path(file.path().with_extension("missing"));

        assert!(matches!(missing, Err(LimitError::Io(_))));

        Ok(())
    }
}
