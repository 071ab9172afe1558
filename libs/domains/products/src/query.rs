//! Listing filters.
//!
//! At most one filter applies per request. When several query parameters are
//! present the first non-empty one wins, in the order `name`, `category`,
//! `available`.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ProductResult;
use crate::models::{Category, Product};

/// Raw query string of `GET /products`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Exact, case-sensitive product name
    pub name: Option<String>,
    /// Category name, case-insensitive (e.g. `FOOD`)
    pub category: Option<String>,
    /// `true`, `yes` or `1` select available products; anything else unavailable ones
    pub available: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductQuery {
    All,
    ByName(String),
    ByCategory(Category),
    ByAvailability(bool),
}

impl ProductQuery {
    pub fn from_params(params: &ListParams) -> ProductResult<Self> {
        if let Some(name) = non_empty(&params.name) {
            return Ok(Self::ByName(name.to_string()));
        }
        if let Some(category) = non_empty(&params.category) {
            return Ok(Self::ByCategory(category.parse()?));
        }
        if let Some(available) = &params.available {
            return Ok(Self::ByAvailability(parse_availability(available)));
        }
        Ok(Self::All)
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::ByName(name) => product.name == *name,
            Self::ByCategory(category) => product.category == *category,
            Self::ByAvailability(available) => product.available == *available,
        }
    }
}

pub fn parse_availability(raw: &str) -> bool {
    ["true", "yes", "1"]
        .iter()
        .any(|truthy| raw.eq_ignore_ascii_case(truthy))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;

    fn params(name: Option<&str>, category: Option<&str>, available: Option<&str>) -> ListParams {
        ListParams {
            name: name.map(String::from),
            category: category.map(String::from),
            available: available.map(String::from),
        }
    }

    #[test]
    fn test_no_params_lists_everything() {
        assert_eq!(
            ProductQuery::from_params(&ListParams::default()).unwrap(),
            ProductQuery::All
        );
    }

    #[test]
    fn test_name_takes_precedence() {
        let query = ProductQuery::from_params(&params(Some("Hat"), Some("NOPE"), Some("no"))).unwrap();
        assert_eq!(query, ProductQuery::ByName("Hat".to_string()));
    }

    #[test]
    fn test_category_before_availability() {
        let query = ProductQuery::from_params(&params(None, Some("food"), Some("true"))).unwrap();
        assert_eq!(query, ProductQuery::ByCategory(Category::Food));
    }

    #[test]
    fn test_invalid_category_is_an_error() {
        let err = ProductQuery::from_params(&params(None, Some("NOPE"), None)).unwrap_err();
        assert!(matches!(err, ProductError::Validation(ref m) if m == "Invalid category: NOPE"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let query = ProductQuery::from_params(&params(Some(""), Some(""), Some("yes"))).unwrap();
        assert_eq!(query, ProductQuery::ByAvailability(true));
    }

    #[test]
    fn test_availability_coercion() {
        for truthy in ["true", "TRUE", "Yes", "1"] {
            assert!(parse_availability(truthy), "{truthy}");
        }
        for falsy in ["false", "no", "0", "", "maybe"] {
            assert!(!parse_availability(falsy), "{falsy}");
        }
    }

    #[test]
    fn test_matches() {
        let product = Product::new("Hat", 10.0, Category::Cloths);

        assert!(ProductQuery::All.matches(&product));
        assert!(ProductQuery::ByName("Hat".to_string()).matches(&product));
        assert!(!ProductQuery::ByName("hat".to_string()).matches(&product));
        assert!(ProductQuery::ByCategory(Category::Cloths).matches(&product));
        assert!(!ProductQuery::ByAvailability(false).matches(&product));
    }
}
