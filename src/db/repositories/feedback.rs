use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::entities::{complaints, feedbacks, memories, prelude::*, recycles};

#[derive(Debug, Clone)]
pub struct NewRecycle {
    pub user_id: i32,
    pub address_id: Option<i32>,
    pub quantity: i32,
    pub is_pickup: bool,
    pub date: Option<String>,
}

/// Feedback, complaints, recycling requests and photo memories.
pub struct FeedbackRepository {
    conn: DatabaseConnection,
}

impl FeedbackRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_feedback(
        &self,
        user_id: Option<i32>,
        comment: &str,
        rating: i32,
    ) -> Result<feedbacks::Model> {
        feedbacks::ActiveModel {
            user_id: Set(user_id),
            comment: Set(comment.to_string()),
            rating: Set(rating),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert feedback")
    }

    pub async fn create_complaint(
        &self,
        user_id: i32,
        message: &str,
        file: Option<String>,
    ) -> Result<complaints::Model> {
        complaints::ActiveModel {
            user_id: Set(user_id),
            message: Set(message.to_string()),
            file: Set(file),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert complaint for user {user_id}"))
    }

    pub async fn create_recycle(&self, recycle: NewRecycle) -> Result<recycles::Model> {
        let user_id = recycle.user_id;

        recycles::ActiveModel {
            user_id: Set(recycle.user_id),
            address_id: Set(recycle.address_id),
            quantity: Set(recycle.quantity),
            is_pickup: Set(recycle.is_pickup),
            date: Set(recycle.date),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert recycle for user {user_id}"))
    }

    pub async fn create_memory(
        &self,
        user_id: i32,
        caption: &str,
        image_path: &str,
    ) -> Result<memories::Model> {
        memories::ActiveModel {
            user_id: Set(user_id),
            caption: Set(caption.to_string()),
            image_path: Set(image_path.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert memory for user {user_id}"))
    }

    pub async fn list_feedback(&self) -> Result<Vec<feedbacks::Model>> {
        Feedbacks::find()
            .all(&self.conn)
            .await
            .context("Failed to list feedback")
    }

    pub async fn list_recycles(&self) -> Result<Vec<recycles::Model>> {
        Recycles::find()
            .order_by_asc(recycles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list recycles")
    }

    pub async fn count_complaints(&self) -> Result<u64> {
        Ok(Complaints::find().count(&self.conn).await?)
    }

    pub async fn count_recycles(&self) -> Result<u64> {
        Ok(Recycles::find().count(&self.conn).await?)
    }

    pub async fn count_memories(&self) -> Result<u64> {
        Ok(Memories::find().count(&self.conn).await?)
    }
}
