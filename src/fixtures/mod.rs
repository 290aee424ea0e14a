//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    configuration::{ConfigurationError, ProductConfiguration},
    limits::VariantLimits,
};

pub mod products;

pub use products::{OptionFixture, ProductFixture, VariantFixture};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A variant selection matched no generated variant
    #[error("No variant for selection: {0}")]
    VariantNotFound(String),

    /// The fixture's options or edits were rejected
    #[error("Invalid product configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products by fixture name
    products: FxHashMap<String, ProductFixture>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
        }
    }

    /// Load a product from `<base>/products/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_product(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let product: ProductFixture = serde_norway::from_str(&contents)?;

        self.products.insert(name.to_string(), product);

        Ok(self)
    }

    /// Load the named product from the default fixture directory
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_product(name)?;

        Ok(fixture)
    }

    /// Get a loaded product by its fixture name
    ///
    /// # Errors
    ///
    /// Returns an error if the product hasn't been loaded.
    pub fn product(&self, name: &str) -> Result<&ProductFixture, FixtureError> {
        self.products
            .get(name)
            .ok_or_else(|| FixtureError::ProductNotFound(name.to_string()))
    }

    /// Build the configuration for a loaded product
    ///
    /// # Errors
    ///
    /// Returns an error if the product hasn't been loaded or its configuration is rejected.
    pub fn configuration(
        &self,
        name: &str,
        limits: Option<VariantLimits>,
    ) -> Result<ProductConfiguration, FixtureError> {
        self.product(name)?.configuration(limits)
    }

    /// Number of loaded products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if no products are loaded
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use testresult::TestResult;

    use super::*;
    use crate::variants::ProductVariant;

    fn write_fixture(base: &Path, name: &str, contents: &str) -> TestResult {
        let dir = base.join("products");

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_tshirt_set() -> TestResult {
        let fixture = Fixture::from_set("tshirt")?;

        assert_eq!(fixture.len(), 1);
        assert_eq!(fixture.product("tshirt")?.name, "T-Shirt");

        let configuration = fixture.configuration("tshirt", None)?;

        assert_eq!(configuration.options().len(), 2);
        assert_eq!(configuration.variants().len(), 6);

        Ok(())
    }

    #[test]
    fn fixture_applies_variant_edits() -> TestResult {
        let configuration = Fixture::from_set("tshirt")?.configuration("tshirt", None)?;

        let skus: Vec<Option<&str>> = configuration
            .variants()
            .iter()
            .map(ProductVariant::sku)
            .collect();

        assert_eq!(skus.iter().filter(|sku| sku.is_some()).count(), 2);

        Ok(())
    }

    #[test]
    fn fixture_product_not_found_returns_error() {
        let fixture = Fixture::new();
        let result = fixture.product("nonexistent");

        assert!(matches!(result, Err(FixtureError::ProductNotFound(_))));
    }

    #[test]
    fn fixture_missing_file_returns_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        let result = fixture.load_product("missing");

        assert!(matches!(result, Err(FixtureError::Io(_))));

        Ok(())
    }

    #[test]
    fn fixture_invalid_yaml_returns_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "broken", "name: [unclosed")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_product("broken"),
            Err(FixtureError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_duplicate_option_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "twice",
            concat!(
                "name: Twice\n",
                "options:\n",
                "  - name: Size\n",
                "    values: [S]\n",
                "  - name: size\n",
                "    values: [M]\n",
            ),
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_product("twice")?;

        assert!(matches!(
            fixture.configuration("twice", None),
            Err(FixtureError::Configuration(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.is_empty());
    }
}
