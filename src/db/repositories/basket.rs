use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{basket_items, baskets, orders, prelude::*};

/// Line item persisted as part of an order's `products` JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub total: f64,
    pub bonus: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub email: String,
    pub total_price: f64,
    pub bonus: i32,
    pub products: Vec<OrderLine>,
    pub delivered: bool,
    pub eta: i32,
}

pub struct BasketRepository {
    conn: DatabaseConnection,
}

impl BasketRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_basket(
        &self,
        user_id: i32,
        coupon: Option<String>,
    ) -> Result<baskets::Model> {
        baskets::ActiveModel {
            user_id: Set(user_id),
            coupon: Set(coupon),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert basket for user {user_id}"))
    }

    pub async fn create_item(
        &self,
        basket_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<basket_items::Model> {
        basket_items::ActiveModel {
            basket_id: Set(basket_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert item for basket {basket_id}"))
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<orders::Model> {
        let products =
            serde_json::to_string(&order.products).context("Failed to serialize order lines")?;
        let order_id = order.order_id.clone();

        orders::ActiveModel {
            order_id: Set(order.order_id),
            email: Set(order.email),
            total_price: Set(order.total_price),
            bonus: Set(order.bonus),
            products: Set(products),
            delivered: Set(order.delivered),
            eta: Set(order.eta),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert order {order_id}"))
    }

    pub async fn list_orders(&self) -> Result<Vec<orders::Model>> {
        Orders::find()
            .all(&self.conn)
            .await
            .context("Failed to list orders")
    }

    pub async fn count_baskets(&self) -> Result<u64> {
        Ok(Baskets::find().count(&self.conn).await?)
    }

    pub async fn count_items(&self) -> Result<u64> {
        Ok(BasketItems::find().count(&self.conn).await?)
    }
}
