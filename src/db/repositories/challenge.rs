use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{challenges, hints, prelude::*};

#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub key: String,
    pub name: String,
    pub category: String,
    pub tags: Option<String>,
    pub description: String,
    pub difficulty: i32,
    pub hint_url: Option<String>,
    pub mitigation_url: Option<String>,
    pub disabled_env: Option<String>,
    pub tutorial_order: Option<i32>,
    pub has_coding_challenge: bool,
}

pub struct ChallengeRepository {
    conn: DatabaseConnection,
}

impl ChallengeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a challenge. New challenges always start unsolved.
    pub async fn create(&self, challenge: NewChallenge) -> Result<challenges::Model> {
        let key = challenge.key.clone();

        challenges::ActiveModel {
            key: Set(challenge.key),
            name: Set(challenge.name),
            category: Set(challenge.category),
            tags: Set(challenge.tags),
            description: Set(challenge.description),
            difficulty: Set(challenge.difficulty),
            solved: Set(false),
            hint_url: Set(challenge.hint_url),
            mitigation_url: Set(challenge.mitigation_url),
            disabled_env: Set(challenge.disabled_env),
            tutorial_order: Set(challenge.tutorial_order),
            has_coding_challenge: Set(challenge.has_coding_challenge),
            coding_challenge_status: Set(0),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert challenge {key}"))
    }

    /// Inserts a locked hint.
    pub async fn create_hint(
        &self,
        challenge_id: i32,
        text: &str,
        order: i32,
    ) -> Result<hints::Model> {
        hints::ActiveModel {
            challenge_id: Set(challenge_id),
            text: Set(text.to_string()),
            order: Set(order),
            unlocked: Set(false),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert hint {order} for challenge {challenge_id}"))
    }

    pub async fn list(&self) -> Result<Vec<challenges::Model>> {
        Challenges::find()
            .order_by_asc(challenges::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list challenges")
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Option<challenges::Model>> {
        Challenges::find()
            .filter(challenges::Column::Key.eq(key))
            .one(&self.conn)
            .await
            .context("Failed to query challenge by key")
    }

    pub async fn hints_for(&self, challenge_id: i32) -> Result<Vec<hints::Model>> {
        Hints::find()
            .filter(hints::Column::ChallengeId.eq(challenge_id))
            .order_by_asc(hints::Column::Order)
            .all(&self.conn)
            .await
            .context("Failed to list hints")
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Challenges::find().count(&self.conn).await?)
    }

    pub async fn count_hints(&self) -> Result<u64> {
        Ok(Hints::find().count(&self.conn).await?)
    }
}
