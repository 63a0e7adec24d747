//! # Redis
//!
//! Document storage for the two collections.
//!
//! Records are JSON documents inside Redis hashes, one hash per collection:
//! - `dishes`: dish id -> dish document
//! - `orders`: order id -> order document (line items embedded, never
//!   independently queryable)
//! - `dish_names`: lower-cased dish name -> dish id, enforcing the unique
//!   name invariant via `HSETNX`
//!
//! The name index and the document write are two separate commands; like the
//! dish-read/order-write pair in the pricing path there is no transaction
//! spanning them, and the index claim happens first so a lost race surfaces
//! as a duplicate-name rejection rather than a clobbered document.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Dish, DishChanges, NewDish, NewOrder, Order, OrderChanges, OrderStatus,
};
use crate::store::{DishStore, OrderStore, apply_dish_changes, apply_order_changes, name_key};

pub const DISHES_KEY: &str = "dishes";
pub const ORDERS_KEY: &str = "orders";
pub const DISH_NAMES_KEY: &str = "dish_names";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).expect("Invalid Redis URL");

    client
        .get_connection_manager_with_config(config)
        .await
        .expect("Failed to connect to Redis")
}

pub struct RedisDishStore {
    conn: ConnectionManager,
}

impl RedisDishStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DishStore for RedisDishStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(DISHES_KEY, id.to_string()).await?;
        raw.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Dish>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.hvals(DISHES_KEY).await?;

        let mut dishes = raw
            .iter()
            .map(|json| serde_json::from_str::<Dish>(json).map_err(AppError::from))
            .collect::<Result<Vec<_>, _>>()?;
        dishes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(dishes)
    }

    async fn create(&self, new: NewDish) -> Result<Dish, AppError> {
        let mut conn = self.conn.clone();

        let id = Uuid::new_v4();
        let claimed: bool = conn
            .hset_nx(DISH_NAMES_KEY, name_key(&new.name), id.to_string())
            .await?;
        if !claimed {
            return Err(AppError::DuplicateField(new.name));
        }

        let now = Utc::now();
        let dish = Dish {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            image_url: new.image_url,
            is_available: new.is_available,
            created_at: now,
            updated_at: now,
        };
        let _: () = conn
            .hset(DISHES_KEY, id.to_string(), serde_json::to_string(&dish)?)
            .await?;
        Ok(dish)
    }

    async fn update(&self, id: Uuid, changes: DishChanges) -> Result<Option<Dish>, AppError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.hget(DISHES_KEY, id.to_string()).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let mut dish: Dish = serde_json::from_str(&raw)?;

        if let Some(name) = &changes.name {
            let old_key = name_key(&dish.name);
            let new_key = name_key(name);
            if new_key != old_key {
                let claimed: bool = conn
                    .hset_nx(DISH_NAMES_KEY, &new_key, id.to_string())
                    .await?;
                if !claimed {
                    return Err(AppError::DuplicateField(name.clone()));
                }
                let _: () = conn.hdel(DISH_NAMES_KEY, &old_key).await?;
            }
        }

        apply_dish_changes(&mut dish, changes);
        let _: () = conn
            .hset(DISHES_KEY, id.to_string(), serde_json::to_string(&dish)?)
            .await?;
        Ok(Some(dish))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.hget(DISHES_KEY, id.to_string()).await?;
        let Some(raw) = raw else {
            return Ok(false);
        };
        let dish: Dish = serde_json::from_str(&raw)?;

        let _: () = conn.hdel(DISH_NAMES_KEY, name_key(&dish.name)).await?;
        let _: () = conn.hdel(DISHES_KEY, id.to_string()).await?;
        Ok(true)
    }
}

pub struct RedisOrderStore {
    conn: ConnectionManager,
}

impl RedisOrderStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OrderStore for RedisOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(ORDERS_KEY, id.to_string()).await?;
        raw.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.hvals(ORDERS_KEY).await?;

        let mut orders = raw
            .iter()
            .map(|json| serde_json::from_str::<Order>(json).map_err(AppError::from))
            .collect::<Result<Vec<_>, _>>()?;
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    async fn create(&self, new: NewOrder) -> Result<Order, AppError> {
        let mut conn = self.conn.clone();

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
        let _: () = conn
            .hset(
                ORDERS_KEY,
                order.id.to_string(),
                serde_json::to_string(&order)?,
            )
            .await?;
        Ok(order)
    }

    async fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, AppError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.hget(ORDERS_KEY, id.to_string()).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let mut order: Order = serde_json::from_str(&raw)?;

        apply_order_changes(&mut order, changes);
        let _: () = conn
            .hset(ORDERS_KEY, id.to_string(), serde_json::to_string(&order)?)
            .await?;
        Ok(Some(order))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.hdel(ORDERS_KEY, id.to_string()).await?;
        Ok(removed > 0)
    }
}
