//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic product payloads (always available)
//! - `assertions`: custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let payload = builder.product(0);
//!     let name = builder.name("product", "main");
//! }
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, IteratorRandom};
use serde_json::{Map, Value, json};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

const BRANDS: [&str; 6] = ["Nike", "Adidas", "Sony", "Apple", "Samsung", "Dell"];
const MODELS: [&str; 5] = ["Pro", "Max", "Lite", "Air", "X"];
const KINDS: [&str; 6] = ["T-Shirt", "Jeans", "Phone", "Laptop", "Watch", "Shoes"];
const QUALITIES: [&str; 5] = ["high-quality", "durable", "eco-friendly", "premium", "ergonomic"];
const PRICE_POINTS: [f64; 5] = [9.99, 19.99, 29.99, 49.99, 99.99];

/// Category names with their relative weights (sum = 100)
const CATEGORY_WEIGHTS: [(&str, u64); 6] = [
    ("CLOTHS", 30),
    ("FOOD", 20),
    ("HOUSEWARES", 20),
    ("AUTOMOTIVE", 15),
    ("TOOLS", 10),
    ("UNKNOWN", 5),
];

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// JSON payload for the `index`-th fake product of this seed.
    ///
    /// Names combine a brand, a model and a kind ("Sony Air Watch"), prices
    /// are common price points, and categories follow a fixed weighting
    /// that favours CLOTHS.
    pub fn product(&self, index: u64) -> Map<String, Value> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ index);

        let kind = pick(&mut rng, &KINDS);
        let name = format!(
            "{} {} {}",
            pick(&mut rng, &BRANDS),
            pick(&mut rng, &MODELS),
            kind
        );
        let description = format!(
            "A {} and {} {}.",
            pick(&mut rng, &QUALITIES),
            pick(&mut rng, &QUALITIES),
            kind.to_lowercase()
        );
        let price = pick(&mut rng, &PRICE_POINTS);
        // Anything manufactured within the last year is still on sale
        let age_days = (0..5 * 365).choose(&mut rng).unwrap_or(0);
        let (category, _) = CATEGORY_WEIGHTS
            .choose_weighted(&mut rng, |(_, weight)| *weight)
            .expect("category weights are positive");

        match json!({
            "name": name,
            "description": description,
            "price": price,
            "available": age_days < 365,
            "category": category,
        }) {
            Value::Object(map) => map,
            _ => unreachable!("json! object literal"),
        }
    }

    /// The first `count` products of this seed
    pub fn products(&self, count: u64) -> Vec<Map<String, Value>> {
        (0..count).map(|i| self.product(i)).collect()
    }
}

fn pick<T: Copy>(rng: &mut StdRng, choices: &[T]) -> T {
    *choices.choose(rng).expect("choices are not empty")
}

/// Test assertion helpers
pub mod assertions {
    use serde_json::Value;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a JSON object has `field` equal to `expected`
    pub fn assert_json_field(value: &Value, field: &str, expected: impl Into<Value>) {
        let expected = expected.into();
        assert_eq!(
            value.get(field),
            Some(&expected),
            "field '{}': expected {}, got {}",
            field,
            expected,
            value
        );
    }
}
