//! Domain records and wire payloads.
//!
//! Stored documents and JSON bodies share the original API's camelCase field
//! names (`totalAmount`, `isAvailable`, ...) so existing clients keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A menu item. `name` is unique across the catalog (case-insensitive),
/// `price` is non-negative. Timestamps are assigned by the store on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order. `price` is the dish's unit price captured when the
/// order was priced; it never tracks later changes to the dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish: Uuid,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Completed,
    Cancelled,
}

/// A placed order. `total_amount` always equals the sum of
/// `price * quantity` over `items` as of the last (re)pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data for a dish create; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Field-level changes for a dish update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct DishChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// Body of `POST /dishes` and `PUT /dishes/{id}`. Every field is optional at
/// the wire level; `validate_create`/`validate_update` decide what is
/// actually required and bundle all offending fields into one rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

impl DishPayload {
    pub fn validate_create(self) -> Result<NewDish, AppError> {
        let mut problems = Vec::new();

        let name = normalize(self.name);
        if name.is_none() {
            problems.push("A dish name is required".to_string());
        }
        let category = normalize(self.category);
        if category.is_none() {
            problems.push("A category is required".to_string());
        }
        match self.price {
            None => problems.push("A price is required".to_string()),
            Some(price) if !(price >= 0.0) => {
                problems.push("Price must be a non-negative number".to_string());
            }
            Some(_) => {}
        }

        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        Ok(NewDish {
            name: name.unwrap_or_default(),
            description: normalize(self.description),
            price: self.price.unwrap_or_default(),
            category: category.unwrap_or_default(),
            image_url: normalize(self.image_url),
            is_available: self.is_available.unwrap_or(true),
        })
    }

    pub fn validate_update(self) -> Result<DishChanges, AppError> {
        let mut problems = Vec::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                problems.push("A dish name cannot be empty".to_string());
            }
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                problems.push("A category cannot be empty".to_string());
            }
        }
        if let Some(price) = self.price {
            if !(price >= 0.0) {
                problems.push("Price must be a non-negative number".to_string());
            }
        }

        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        Ok(DishChanges {
            name: normalize(self.name),
            description: normalize(self.description),
            price: self.price,
            category: normalize(self.category),
            image_url: normalize(self.image_url),
            is_available: self.is_available,
        })
    }
}

pub(crate) fn normalize(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// One requested line of an order before pricing. The dish reference stays a
/// string until the engine resolves it, and the quantity is signed so that
/// zero and negative requests reach the engine's own rejection instead of
/// dying as a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub dish: String,
    pub quantity: i64,
}

/// Body of `POST /orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
}

/// Body of `PUT /orders/{id}`. A present `items` list triggers a wholesale
/// re-price; other fields patch in place. Customer fields that are absent,
/// empty, or whitespace-only are left unchanged — there is no way to clear
/// a customer field through an update, only to overwrite it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub items: Option<Vec<OrderItemRequest>>,
    pub status: Option<OrderStatus>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
}

/// Data for an order create; the store assigns id, pending status and
/// timestamps. Items and total come from the pricing engine, never the caller.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
}

/// Field-level changes for an order update. `items` and `total_amount` are
/// always set together by the caller after a re-pricing pass.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub items: Option<Vec<OrderItem>>,
    pub total_amount: Option<f64>,
    pub status: Option<OrderStatus>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
}

/// An order as returned to clients: each line's dish reference is joined to
/// the full dish record for display. Quantity and price always come from the
/// stored snapshot; a dish deleted since ordering renders as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub items: Vec<OrderItemView>,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub dish: Option<Dish>,
    pub quantity: u32,
    pub price: f64,
}
