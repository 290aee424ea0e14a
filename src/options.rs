//! Variant Options
//!
//! The option store holds the ordered list of option definitions for a product. Each option is a
//! named axis (e.g. "Size") with an ordered list of values. Option names are unique ignoring case,
//! values are unique within their option using exact comparison.
//!
//! The store only validates and mutates the option list. Regenerating variants after a change is
//! the caller's job, see [`crate::configuration::ProductConfiguration`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

pub use crate::ids::OptionId;

/// Errors raised by option store mutations. A failed mutation leaves the store unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    /// Another option already uses this name (compared ignoring case).
    #[error("an option named {0:?} already exists")]
    DuplicateOption(String),

    /// The option name was empty or whitespace.
    #[error("option name must not be blank")]
    BlankOptionName,

    /// Two options in a supplied list share an id.
    #[error("option id {0} appears more than once")]
    DuplicateOptionId(OptionId),

    /// The value was empty or whitespace.
    #[error("option value must not be blank")]
    InvalidValue,

    /// The option already has this exact value.
    #[error("option {option:?} already has value {value:?}")]
    DuplicateValue {
        /// Option name
        option: String,

        /// The rejected value
        value: String,
    },

    /// The option doesn't have this value.
    #[error("option {option:?} has no value {value:?}")]
    ValueNotFound {
        /// Option name
        option: String,

        /// The missing value
        value: String,
    },

    /// No option has this id.
    #[error("option {0} not found")]
    OptionNotFound(OptionId),
}

/// A named axis of product configuration with an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    id: OptionId,
    name: String,
    #[serde(default)]
    values: Vec<String>,
}

impl VariantOption {
    /// Create an option with a fresh id.
    ///
    /// No validation happens here; options are checked when they enter an [`OptionSet`].
    pub fn new<V>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<String>,
    {
        Self::with_id(OptionId::generate(), name, values)
    }

    /// Create an option with a known id, e.g. one restored from storage.
    pub fn with_id<V>(
        id: OptionId,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self
    where
        V: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Option id
    pub fn id(&self) -> OptionId {
        self.id
    }

    /// Option name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Option values, in the order they were added.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Check whether the option has this exact value.
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|existing| existing == value)
    }
}

/// Ordered list of variant options for a single product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
    options: Vec<VariantOption>,
}

impl OptionSet {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an option set from caller-supplied options, applying the same rules as the mutators.
    ///
    /// Names and values are trimmed.
    ///
    /// # Errors
    ///
    /// - [`OptionError::BlankOptionName`]: an option name is blank.
    /// - [`OptionError::DuplicateOption`]: two options share a name, ignoring case.
    /// - [`OptionError::DuplicateOptionId`]: two options share an id.
    /// - [`OptionError::InvalidValue`]: a value is blank.
    /// - [`OptionError::DuplicateValue`]: an option lists the same value twice.
    pub fn from_options(
        options: impl IntoIterator<Item = VariantOption>,
    ) -> Result<Self, OptionError> {
        let mut set = Self::new();
        let mut ids = FxHashSet::default();

        for option in options {
            if !ids.insert(option.id) {
                return Err(OptionError::DuplicateOptionId(option.id));
            }

            let name = set.validate_name(&option.name, None)?;
            let mut restored = VariantOption::with_id(option.id, name, Vec::<String>::new());

            for value in option.values {
                let value = validate_value(&restored, &value)?;
                restored.values.push(value);
            }

            set.options.push(restored);
        }

        Ok(set)
    }

    /// All options, in order.
    pub fn options(&self) -> &[VariantOption] {
        &self.options
    }

    /// Iterate over the options in order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantOption> {
        self.options.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Get an option by id.
    pub fn get(&self, id: OptionId) -> Option<&VariantOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Find an option by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&VariantOption> {
        let name = name.trim();

        self.options
            .iter()
            .find(|option| names_match(&option.name, name))
    }

    /// Add a new option with no values.
    ///
    /// # Errors
    ///
    /// - [`OptionError::BlankOptionName`]: the name is blank.
    /// - [`OptionError::DuplicateOption`]: an option with this name already exists.
    pub fn add_option(&mut self, name: &str) -> Result<OptionId, OptionError> {
        let name = self.validate_name(name, None)?;
        let option = VariantOption::new(name, Vec::<String>::new());
        let id = option.id;

        trace!(option = %option.name, "adding option");

        self.options.push(option);

        Ok(id)
    }

    /// Remove an option, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::OptionNotFound`] if no option has this id.
    pub fn remove_option(&mut self, id: OptionId) -> Result<VariantOption, OptionError> {
        let index = self.position(id)?;
        let option = self.options.remove(index);

        trace!(option = %option.name, "removed option");

        Ok(option)
    }

    /// Append a value to an option.
    ///
    /// # Errors
    ///
    /// - [`OptionError::OptionNotFound`]: no option has this id.
    /// - [`OptionError::InvalidValue`]: the value is blank.
    /// - [`OptionError::DuplicateValue`]: the option already has this value.
    pub fn add_option_value(&mut self, id: OptionId, value: &str) -> Result<(), OptionError> {
        let option = self.get_mut(id)?;
        let value = validate_value(option, value)?;

        trace!(option = %option.name, %value, "adding option value");

        option.values.push(value);

        Ok(())
    }

    /// Remove a value from an option.
    ///
    /// # Errors
    ///
    /// - [`OptionError::OptionNotFound`]: no option has this id.
    /// - [`OptionError::ValueNotFound`]: the option doesn't have this value.
    pub fn remove_option_value(&mut self, id: OptionId, value: &str) -> Result<(), OptionError> {
        let option = self.get_mut(id)?;
        let value = value.trim();

        let index = option
            .values
            .iter()
            .position(|existing| existing == value)
            .ok_or_else(|| OptionError::ValueNotFound {
                option: option.name.clone(),
                value: value.to_string(),
            })?;

        option.values.remove(index);

        trace!(option = %option.name, %value, "removed option value");

        Ok(())
    }

    /// Rename an option, returning its previous name.
    ///
    /// Changing only the case of an option's own name is allowed.
    ///
    /// # Errors
    ///
    /// - [`OptionError::OptionNotFound`]: no option has this id.
    /// - [`OptionError::BlankOptionName`]: the name is blank.
    /// - [`OptionError::DuplicateOption`]: another option already uses this name.
    pub fn rename_option(&mut self, id: OptionId, name: &str) -> Result<String, OptionError> {
        self.position(id)?;

        let name = self.validate_name(name, Some(id))?;
        let option = self.get_mut(id)?;

        trace!(from = %option.name, to = %name, "renaming option");

        Ok(std::mem::replace(&mut option.name, name))
    }

    /// Move an option to a new position. Indexes past the end move it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::OptionNotFound`] if no option has this id.
    pub fn move_option(&mut self, id: OptionId, index: usize) -> Result<(), OptionError> {
        let current = self.position(id)?;
        let option = self.options.remove(current);
        let index = index.min(self.options.len());

        self.options.insert(index, option);

        Ok(())
    }

    fn position(&self, id: OptionId) -> Result<usize, OptionError> {
        self.options
            .iter()
            .position(|option| option.id == id)
            .ok_or(OptionError::OptionNotFound(id))
    }

    fn get_mut(&mut self, id: OptionId) -> Result<&mut VariantOption, OptionError> {
        self.options
            .iter_mut()
            .find(|option| option.id == id)
            .ok_or(OptionError::OptionNotFound(id))
    }

    /// Trim and check a candidate name, ignoring the option being renamed (if any).
    fn validate_name(
        &self,
        name: &str,
        renaming: Option<OptionId>,
    ) -> Result<String, OptionError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(OptionError::BlankOptionName);
        }

        let taken = self
            .options
            .iter()
            .filter(|option| Some(option.id) != renaming)
            .any(|option| names_match(&option.name, name));

        if taken {
            return Err(OptionError::DuplicateOption(name.to_string()));
        }

        Ok(name.to_string())
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a VariantOption;
    type IntoIter = std::slice::Iter<'a, VariantOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl From<OptionSet> for Vec<VariantOption> {
    fn from(set: OptionSet) -> Self {
        set.options
    }
}

fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

fn validate_value(option: &VariantOption, value: &str) -> Result<String, OptionError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(OptionError::InvalidValue);
    }

    if option.has_value(value) {
        return Err(OptionError::DuplicateValue {
            option: option.name.clone(),
            value: value.to_string(),
        });
    }

    Ok(value.to_string())
}
