//! Order pricing and validation.
//!
//! Turns a requested list of `(dish, quantity)` pairs into priced line items
//! plus a total, or rejects the whole batch on the first violated rule.
//! Runs for both order creation and wholesale item replacement on update; in
//! the update case the fresh total replaces the stored one unconditionally.
//!
//! The engine only reads from the dish store. Nothing is written here, so a
//! rejection can never leave a partial order behind. The dish read and the
//! later order write are not transactionally coupled: a concurrent dish
//! update can land between them, and the snapshot keeps whatever price the
//! read observed. That staleness window is inherited behavior, kept on
//! purpose rather than papered over with locking.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{OrderItem, OrderItemRequest};
use crate::store::DishStore;

/// The engine's successful output: line items in request order, each holding
/// the dish's price as of the lookup, and their exact sum.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
}

/// Validates and prices a requested item list against the current catalog.
///
/// Rules, per item in input order, short-circuiting on the first failure:
/// an unparseable dish reference is a malformed id, an unknown dish is not
/// found, an unavailable dish or a quantity below 1 rejects by dish name.
/// An empty request list is rejected outright.
pub async fn price_order(
    dishes: &dyn DishStore,
    requested: &[OrderItemRequest],
) -> Result<PricedOrder, AppError> {
    if requested.is_empty() {
        return Err(AppError::EmptyOrder);
    }

    let mut items = Vec::with_capacity(requested.len());
    let mut total_amount = 0.0;

    for request in requested {
        let id = Uuid::parse_str(request.dish.trim())
            .map_err(|_| AppError::MalformedId(request.dish.clone()))?;

        let dish = dishes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DishNotFound(request.dish.clone()))?;

        if !dish.is_available {
            return Err(AppError::DishUnavailable(dish.name));
        }
        // Anything outside 1..=u32::MAX is rejected here so the stored
        // quantity always matches the one that went into the total.
        let Some(quantity) = valid_quantity(request.quantity) else {
            return Err(AppError::InvalidQuantity(dish.name));
        };

        total_amount += dish.price * quantity as f64;
        items.push(OrderItem {
            dish: dish.id,
            quantity,
            price: dish.price,
        });
    }

    Ok(PricedOrder {
        items,
        total_amount,
    })
}

fn valid_quantity(requested: i64) -> Option<u32> {
    if requested < 1 {
        return None;
    }
    u32::try_from(requested).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dish, NewDish};
    use crate::store::MemoryDishStore;

    async fn seed(store: &MemoryDishStore, name: &str, price: f64, available: bool) -> Dish {
        store
            .create(NewDish {
                name: name.to_string(),
                description: None,
                price,
                category: "mains".to_string(),
                image_url: None,
                is_available: available,
            })
            .await
            .unwrap()
    }

    fn want(dish: &Dish, quantity: i64) -> OrderItemRequest {
        OrderItemRequest {
            dish: dish.id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn prices_a_valid_order_preserving_input_order() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 12.5, true).await;
        let tea = seed(&store, "Iced Tea", 3.0, true).await;

        let priced = price_order(&store, &[want(&tea, 2), want(&pho, 1)])
            .await
            .unwrap();

        assert_eq!(priced.total_amount, 3.0 * 2.0 + 12.5);
        assert_eq!(priced.items[0].dish, tea.id);
        assert_eq!(priced.items[0].quantity, 2);
        assert_eq!(priced.items[0].price, 3.0);
        assert_eq!(priced.items[1].dish, pho.id);
    }

    #[tokio::test]
    async fn rejects_an_empty_order() {
        let store = MemoryDishStore::new();
        seed(&store, "Pho", 12.5, true).await;

        let err = price_order(&store, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyOrder));
        assert_eq!(err.to_string(), "Order must contain at least one item.");
    }

    #[tokio::test]
    async fn rejects_an_unknown_dish_and_stops_there() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 12.5, true).await;
        let ghost = Uuid::new_v4().to_string();

        // The invalid-quantity item after the miss must never be reached.
        let requests = [
            OrderItemRequest {
                dish: ghost.clone(),
                quantity: 1,
            },
            want(&pho, 0),
        ];
        let err = price_order(&store, &requests).await.unwrap_err();
        match err {
            AppError::DishNotFound(id) => assert_eq!(id, ghost),
            other => panic!("expected DishNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_a_malformed_dish_reference() {
        let store = MemoryDishStore::new();

        let requests = [OrderItemRequest {
            dish: "not-a-uuid".to_string(),
            quantity: 1,
        }];
        let err = price_order(&store, &requests).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedId(ref v) if v == "not-a-uuid"));
    }

    #[tokio::test]
    async fn rejects_an_unavailable_dish_by_name() {
        let store = MemoryDishStore::new();
        let a = seed(&store, "A", 10.0, true).await;
        let b = seed(&store, "B", 5.5, false).await;

        let err = price_order(&store, &[want(&a, 2), want(&b, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Dish \"B\" is currently not available.");
    }

    #[tokio::test]
    async fn rejects_zero_and_negative_quantities_by_name() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 12.5, true).await;

        for quantity in [0, -3] {
            let err = price_order(&store, &[want(&pho, quantity)])
                .await
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Quantity for dish \"Pho\" must be at least 1."
            );
        }
    }

    #[tokio::test]
    async fn rejects_quantities_beyond_the_line_item_range() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 1.0, true).await;

        // One past u32::MAX would wrap to quantity 1 if it were cast through,
        // leaving a total that no longer matches the stored line.
        let err = price_order(&store, &[want(&pho, u32::MAX as i64 + 2)])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity for dish \"Pho\" must be at least 1."
        );

        let priced = price_order(&store, &[want(&pho, u32::MAX as i64)])
            .await
            .unwrap();
        assert_eq!(priced.items[0].quantity, u32::MAX);
        assert_eq!(priced.total_amount, u32::MAX as f64);
    }

    #[tokio::test]
    async fn worked_example_from_the_menu() {
        let store = MemoryDishStore::new();
        let a = seed(&store, "A", 10.0, true).await;
        seed(&store, "B", 5.5, false).await;

        let priced = price_order(&store, &[want(&a, 2)]).await.unwrap();
        assert_eq!(priced.total_amount, 20.0);
        assert_eq!(priced.items.len(), 1);
    }

    #[tokio::test]
    async fn repricing_the_same_input_is_deterministic() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 12.5, true).await;
        let tea = seed(&store, "Iced Tea", 3.0, true).await;
        let requests = [want(&pho, 3), want(&tea, 1)];

        let first = price_order(&store, &requests).await.unwrap();
        let second = price_order(&store, &requests).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn snapshot_keeps_the_price_at_lookup_time() {
        let store = MemoryDishStore::new();
        let pho = seed(&store, "Pho", 12.5, true).await;

        let priced = price_order(&store, &[want(&pho, 1)]).await.unwrap();
        assert_eq!(priced.items[0].price, 12.5);

        let changes = crate::models::DishChanges {
            price: Some(99.0),
            ..Default::default()
        };
        store.update(pho.id, changes).await.unwrap();

        // The already-priced line is untouched by the catalog change.
        assert_eq!(priced.items[0].price, 12.5);
    }
}
