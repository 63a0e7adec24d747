//! Store seams.
//!
//! The engine and the handlers only ever see these traits; the Redis-backed
//! implementations live in [`crate::database`] and the in-memory ones below
//! back the tests. Both stores own identifier and timestamp assignment:
//! `create` stamps `created_at`/`updated_at`, `update` refreshes `updated_at`.
//! Writes are whole-record; there is no partial line-item patching.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Dish, DishChanges, NewDish, NewOrder, Order, OrderChanges, OrderStatus,
};

#[async_trait]
pub trait DishStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, AppError>;
    async fn list_all(&self) -> Result<Vec<Dish>, AppError>;
    /// Rejects with [`AppError::DuplicateField`] when the name is taken.
    async fn create(&self, new: NewDish) -> Result<Dish, AppError>;
    async fn update(&self, id: Uuid, changes: DishChanges) -> Result<Option<Dish>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError>;
    async fn list_all(&self) -> Result<Vec<Order>, AppError>;
    async fn create(&self, new: NewOrder) -> Result<Order, AppError>;
    async fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Unique dish names are compared trimmed and lower-cased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub(crate) fn apply_dish_changes(dish: &mut Dish, changes: DishChanges) {
    if let Some(name) = changes.name {
        dish.name = name;
    }
    if let Some(description) = changes.description {
        dish.description = Some(description);
    }
    if let Some(price) = changes.price {
        dish.price = price;
    }
    if let Some(category) = changes.category {
        dish.category = category;
    }
    if let Some(image_url) = changes.image_url {
        dish.image_url = Some(image_url);
    }
    if let Some(is_available) = changes.is_available {
        dish.is_available = is_available;
    }
    dish.updated_at = Utc::now();
}

pub(crate) fn apply_order_changes(order: &mut Order, changes: OrderChanges) {
    if let Some(items) = changes.items {
        order.items = items;
    }
    if let Some(total_amount) = changes.total_amount {
        order.total_amount = total_amount;
    }
    if let Some(status) = changes.status {
        order.status = status;
    }
    if let Some(customer_name) = changes.customer_name {
        order.customer_name = Some(customer_name);
    }
    if let Some(customer_contact) = changes.customer_contact {
        order.customer_contact = Some(customer_contact);
    }
    order.updated_at = Utc::now();
}

#[derive(Default)]
pub struct MemoryDishStore {
    dishes: Mutex<HashMap<Uuid, Dish>>,
}

impl MemoryDishStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DishStore for MemoryDishStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        Ok(self.dishes.lock().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Dish>, AppError> {
        let mut all: Vec<Dish> = self.dishes.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn create(&self, new: NewDish) -> Result<Dish, AppError> {
        let mut dishes = self.dishes.lock().unwrap();
        if dishes.values().any(|d| name_key(&d.name) == name_key(&new.name)) {
            return Err(AppError::DuplicateField(new.name));
        }

        let now = Utc::now();
        let dish = Dish {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            image_url: new.image_url,
            is_available: new.is_available,
            created_at: now,
            updated_at: now,
        };
        dishes.insert(dish.id, dish.clone());
        Ok(dish)
    }

    async fn update(&self, id: Uuid, changes: DishChanges) -> Result<Option<Dish>, AppError> {
        let mut dishes = self.dishes.lock().unwrap();
        if !dishes.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            let taken = dishes
                .values()
                .any(|d| d.id != id && name_key(&d.name) == name_key(name));
            if taken {
                return Err(AppError::DuplicateField(name.clone()));
            }
        }

        let Some(dish) = dishes.get_mut(&id) else {
            return Ok(None);
        };
        apply_dish_changes(dish, changes);
        Ok(Some(dish.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.dishes.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let mut all: Vec<Order> = self.orders.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn create(&self, new: NewOrder) -> Result<Order, AppError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            items: new.items,
            total_amount: new.total_amount,
            status: OrderStatus::Pending,
            customer_name: new.customer_name,
            customer_contact: new.customer_contact,
            created_at: now,
            updated_at: now,
        };
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, AppError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.get_mut(&id) else {
            return Ok(None);
        };
        apply_order_changes(order, changes);
        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.orders.lock().unwrap().remove(&id).is_some())
    }
}
