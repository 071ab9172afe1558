use sea_orm::{DeriveActiveEnum, EnumIter, Iterable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::str::FromStr;
use strum::{Display, IntoStaticStr};
use utoipa::ToSchema;

use crate::error::{ProductError, ProductResult};

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 250;

/// Product category, stored and serialized by its symbolic name.
///
/// The declaration order defines the ordinal accepted on the JSON boundary
/// (`UNKNOWN` = 0 ... `TOOLS` = 5).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
    #[sea_orm(string_value = "CLOTHS")]
    Cloths,
    #[sea_orm(string_value = "FOOD")]
    Food,
    #[sea_orm(string_value = "HOUSEWARES")]
    Housewares,
    #[sea_orm(string_value = "AUTOMOTIVE")]
    Automotive,
    #[sea_orm(string_value = "TOOLS")]
    Tools,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Case-insensitive lookup by symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl FromStr for Category {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ProductError::Validation(format!("Invalid category: {}", s)))
    }
}

/// Values that name a [`Category`]: the variant itself, its symbolic name
/// (any case) or its ordinal.
pub trait IntoCategory {
    fn into_category(self) -> ProductResult<Category>;
}

impl IntoCategory for Category {
    fn into_category(self) -> ProductResult<Category> {
        Ok(self)
    }
}

impl IntoCategory for &str {
    fn into_category(self) -> ProductResult<Category> {
        self.parse()
    }
}

impl IntoCategory for i64 {
    fn into_category(self) -> ProductResult<Category> {
        usize::try_from(self)
            .ok()
            .and_then(|n| Category::iter().nth(n))
            .ok_or_else(|| ProductError::invalid(format!("{} is not a valid Category", self)))
    }
}

/// A product record.
///
/// `id` is `None` until the record has been persisted and is never changed
/// by [`Product::apply_payload`].
#[derive(Debug, Clone, PartialEq, ToSchema)]
pub struct Product {
    /// Assigned by storage on create
    #[schema(read_only)]
    pub id: Option<i32>,
    #[schema(max_length = 100)]
    pub name: String,
    #[schema(max_length = 250)]
    pub description: Option<String>,
    pub price: f64,
    /// Defaults to `true` when omitted
    pub available: bool,
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            price: 0.0,
            available: true,
            category: Category::Unknown,
        }
    }
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            category,
            ..Self::default()
        }
    }

    /// JSON representation, keys in the order
    /// `id, name, description, price, available, category`.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("name".to_string(), json!(self.name));
        map.insert("description".to_string(), json!(self.description));
        map.insert("price".to_string(), json!(self.price));
        map.insert("available".to_string(), json!(self.available));
        map.insert("category".to_string(), json!(self.category.as_str()));
        map
    }

    /// Overwrite this record's fields from a JSON object.
    ///
    /// Fields are processed in the order name, description, price, available,
    /// category and assigned as they are validated, so on error the fields
    /// before the offending one already hold their new values.
    pub fn apply_payload(&mut self, payload: &Map<String, Value>) -> ProductResult<()> {
        self.name = match payload.get("name") {
            None | Some(Value::Null) => return Err(ProductError::missing("name")),
            Some(Value::String(name)) => {
                check_text("name", name, NAME_MAX_LEN)?;
                if name.trim().is_empty() {
                    return Err(ProductError::invalid("name must not be empty"));
                }
                name.clone()
            }
            Some(other) => return Err(type_mismatch("name", "a string", other)),
        };

        self.description = match payload.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => {
                check_text("description", text, DESCRIPTION_MAX_LEN)?;
                Some(text.clone())
            }
            Some(other) => return Err(type_mismatch("description", "a string", other)),
        };

        self.price = match payload.get("price") {
            None | Some(Value::Null) => return Err(ProductError::missing("price")),
            Some(value) => parse_price(value)?,
        };

        self.available = match payload.get("available") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => return Err(type_mismatch("available", "a boolean", other)),
        };

        match payload.get("category") {
            None | Some(Value::Null) => {
                return Err(ProductError::invalid("None is not a valid Category"));
            }
            Some(Value::String(name)) => self.category = name.parse()?,
            Some(Value::Number(n)) => {
                self.category = n
                    .as_i64()
                    .ok_or_else(|| ProductError::invalid(format!("{} is not a valid Category", n)))?
                    .into_category()?;
            }
            Some(other) => {
                return Err(type_mismatch("category", "a string or an integer", other));
            }
        }

        Ok(())
    }
}

fn parse_price(value: &Value) -> ProductResult<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => return Err(type_mismatch("price", "a number", other)),
    };

    price
        .filter(|p| p.is_finite())
        .ok_or_else(|| ProductError::invalid(format!("could not convert price to float: {}", value)))
}

fn check_text(field: &str, text: &str, max_len: usize) -> ProductResult<()> {
    if text.chars().count() > max_len {
        return Err(ProductError::invalid(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

fn type_mismatch(field: &str, expected: &str, found: &Value) -> ProductError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ProductError::invalid(format!("{} must be {}, got {}", field, expected, found))
}
