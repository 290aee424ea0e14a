//! Combinations
//!
//! A combination selects exactly one value from every option. Generating combinations produces
//! the cartesian product of the option value lists in odometer order: the last option varies
//! fastest and the first option slowest.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::options::VariantOption;

/// Separator placed between the default label's values.
pub const LABEL_SEPARATOR: &str = " / ";

const KEY_PAIR_SEPARATOR: char = '\u{1f}';
const KEY_VALUE_SEPARATOR: char = '=';
const KEY_ESCAPE: char = '\\';

/// One selected value per option, as ordered `(option name, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantCombination {
    pairs: SmallVec<[(String, String); 4]>,
}

impl VariantCombination {
    /// Create a combination from `(option name, value)` pairs, kept in the given order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Iterate over the `(option name, value)` pairs in option order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Iterate over the selected values in option order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, value)| value.as_str())
    }

    /// Get the value selected for an option, matching the name exactly.
    pub fn value(&self, option: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, value)| value.as_str())
    }

    /// Number of options in the combination.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the combination selects nothing.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The canonical identity of this combination, independent of option order.
    pub fn key(&self) -> CombinationKey {
        let mut pairs: SmallVec<[&(String, String); 4]> = self.pairs.iter().collect();

        pairs.sort();

        let mut key = String::new();

        for (index, (name, value)) in pairs.into_iter().enumerate() {
            if index > 0 {
                key.push(KEY_PAIR_SEPARATOR);
            }

            push_escaped(&mut key, name);
            key.push(KEY_VALUE_SEPARATOR);
            push_escaped(&mut key, value);
        }

        CombinationKey(key)
    }

    /// The default display label: values joined by `" / "` in option order.
    pub fn default_label(&self) -> String {
        self.values().collect::<Vec<_>>().join(LABEL_SEPARATOR)
    }

    /// Rewrite the option name used by this combination. Returns whether anything changed.
    pub(crate) fn rename_option(&mut self, from: &str, to: &str) -> bool {
        let mut renamed = false;

        for (name, _) in self.pairs.iter_mut().filter(|(name, _)| name == from) {
            to.clone_into(name);
            renamed = true;
        }

        renamed
    }

    fn push(&mut self, name: &str, value: &str) {
        self.pairs.push((name.to_string(), value.to_string()));
    }
}

impl Display for VariantCombination {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{name}: {value}")?;
        }

        Ok(())
    }
}

/// Deterministic serialization of a combination's sorted pairs. Two combinations are the same
/// combination exactly when their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationKey(String);

impl CombinationKey {
    /// The serialized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, KEY_ESCAPE | KEY_VALUE_SEPARATOR | KEY_PAIR_SEPARATOR) {
            out.push(KEY_ESCAPE);
        }

        out.push(ch);
    }
}

/// Number of combinations the options would generate, or `None` if it overflows `usize`.
///
/// Zero options, or any option without values, yields zero.
pub fn combination_count(options: &[VariantOption]) -> Option<usize> {
    if options.is_empty() {
        return Some(0);
    }

    options
        .iter()
        .try_fold(1_usize, |count, option| count.checked_mul(option.values().len()))
}

/// Generate every combination of the options' values in odometer order.
///
/// Returns an empty list when there are no options or when any option has no values.
pub fn generate_combinations(options: &[VariantOption]) -> Vec<VariantCombination> {
    if options.is_empty() || options.iter().any(|option| option.values().is_empty()) {
        return Vec::new();
    }

    let mut combinations = vec![VariantCombination::default()];

    for option in options {
        let mut next =
            Vec::with_capacity(combinations.len().saturating_mul(option.values().len()));

        for prefix in &combinations {
            for value in option.values() {
                let mut combination = prefix.clone();

                combination.push(option.name(), value);
                next.push(combination);
            }
        }

        combinations = next;
    }

    combinations
}
