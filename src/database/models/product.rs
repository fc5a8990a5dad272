use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Fraction digits kept for every stored and rendered price.
pub const PRICE_SCALE: u32 = 2;
pub const PRICE_MAX_INTEGER_DIGITS: u32 = 15;
pub const PRICE_MAX_FRACTION_DIGITS: u32 = 2;

/// A persisted row of the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_price")]
    pub price: Decimal,
}

impl Product {
    pub fn from_data(id: Uuid, data: ProductData) -> Self {
        Self {
            id,
            name: data.name,
            description: data.description,
            price: with_price_scale(data.price),
        }
    }

    pub fn data(&self) -> ProductData {
        ProductData {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

/// Every column of a product except its identity. Used for inserts and full replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductData {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Body of `POST /api/v1/products` and `PUT /api/v1/products/{id}`.
///
/// `id` is accepted so a PUT can be checked against the path id; it is never
/// used to choose the stored identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(
        required(message = "must not be null"),
        custom(function = "validate_price")
    )]
    pub price: Option<Decimal>,
}

impl ProductRequest {
    pub fn new(name: impl Into<String>, description: Option<&str>, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.map(str::to_string),
            price: Some(price),
        }
    }

    /// Drops the client-supplied id. `None` when the request never carried a price.
    pub fn into_data(self) -> Option<ProductData> {
        let price = self.price?;
        Some(ProductData {
            name: self.name,
            description: self.description,
            price: with_price_scale(price),
        })
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("not_blank", "must not be blank"));
    }
    Ok(())
}

pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(violation("decimal_min", "must be greater than or equal to 0.00"));
    }

    let (integer, fraction) = price_digits(price);
    if integer > PRICE_MAX_INTEGER_DIGITS || fraction > PRICE_MAX_FRACTION_DIGITS {
        return Err(violation(
            "digits",
            "numeric value out of bounds (<15 digits>.<2 digits> expected)",
        ));
    }

    Ok(())
}

/// Integer and fraction digit counts of a decimal, ignoring trailing zeros.
/// `100.50` is `(3, 1)`, `0.05` is `(0, 2)`.
pub fn price_digits(price: &Decimal) -> (u32, u32) {
    let normalized = price.normalize();
    let mantissa = normalized.mantissa().unsigned_abs();
    if mantissa == 0 {
        return (0, 0);
    }
    let precision = mantissa.to_string().len() as u32;
    let scale = normalized.scale();
    (precision.saturating_sub(scale), scale)
}

pub fn with_price_scale(mut price: Decimal) -> Decimal {
    price.rescale(PRICE_SCALE);
    price
}

fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&with_price_scale(*price).to_string())
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
