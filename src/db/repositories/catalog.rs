use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use crate::entities::{delivery_methods, prelude::*, products, quantities};

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub deluxe_price: f64,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewDeliveryMethod {
    pub name: String,
    pub price: f64,
    pub deluxe_price: f64,
    pub eta: i32,
    pub icon: String,
}

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<products::Model> {
        let name = product.name.clone();

        products::ActiveModel {
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            deluxe_price: Set(product.deluxe_price),
            image: Set(product.image),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert product {name}"))
    }

    pub async fn soft_delete_product(&self, id: i32) -> Result<()> {
        let product = Products::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product for deletion")?
            .ok_or_else(|| anyhow::anyhow!("Product not found: {id}"))?;

        let mut active: products::ActiveModel = product.into();
        active.deleted_at = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn create_quantity(
        &self,
        product_id: i32,
        quantity: i32,
        limit_per_user: Option<i32>,
    ) -> Result<quantities::Model> {
        quantities::ActiveModel {
            product_id: Set(product_id),
            quantity: Set(quantity),
            limit_per_user: Set(limit_per_user),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert quantity for product {product_id}"))
    }

    pub async fn create_delivery_method(
        &self,
        method: NewDeliveryMethod,
    ) -> Result<delivery_methods::Model> {
        let name = method.name.clone();

        delivery_methods::ActiveModel {
            name: Set(method.name),
            price: Set(method.price),
            deluxe_price: Set(method.deluxe_price),
            eta: Set(method.eta),
            icon: Set(method.icon),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert delivery method {name}"))
    }

    pub async fn list_products(&self) -> Result<Vec<products::Model>> {
        Products::find()
            .all(&self.conn)
            .await
            .context("Failed to list products")
    }

    pub async fn count_products(&self) -> Result<u64> {
        Ok(Products::find().count(&self.conn).await?)
    }

    pub async fn count_delivery_methods(&self) -> Result<u64> {
        Ok(DeliveryMethods::find().count(&self.conn).await?)
    }
}
