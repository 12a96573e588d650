use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{
    addresses, cards, prelude::*, security_answers, security_questions, users, wallets,
};

/// Field mapping for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub deluxe_token: String,
    pub last_login_ip: String,
    pub profile_image: String,
    pub totp_secret: String,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub user_id: i32,
    pub full_name: String,
    pub mobile_num: i64,
    pub zip_code: String,
    pub street_address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: i32,
    pub full_name: String,
    pub card_num: i64,
    pub exp_month: i32,
    pub exp_year: i32,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user: NewUser) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email.clone()),
            password: Set(user.password),
            role: Set(user.role),
            deluxe_token: Set(user.deluxe_token),
            last_login_ip: Set(user.last_login_ip),
            profile_image: Set(user.profile_image),
            totp_secret: Set(user.totp_secret),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert user {}", user.email))
    }

    /// Marks the user as deleted without removing the row.
    pub async fn soft_delete(&self, id: i32) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for deletion")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<users::Model>> {
        Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Users::find().count(&self.conn).await?)
    }

    pub async fn create_wallet(&self, user_id: i32, balance: f64) -> Result<wallets::Model> {
        wallets::ActiveModel {
            user_id: Set(user_id),
            balance: Set(balance),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert wallet for user {user_id}"))
    }

    pub async fn list_wallets(&self) -> Result<Vec<wallets::Model>> {
        Wallets::find()
            .order_by_asc(wallets::Column::UserId)
            .all(&self.conn)
            .await
            .context("Failed to list wallets")
    }

    pub async fn create_security_question(
        &self,
        question: &str,
    ) -> Result<security_questions::Model> {
        security_questions::ActiveModel {
            question: Set(question.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert security question")
    }

    pub async fn get_security_question(&self, id: i32) -> Result<Option<security_questions::Model>> {
        SecurityQuestions::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query security question {id}"))
    }

    pub async fn create_security_answer(
        &self,
        user_id: i32,
        security_question_id: i32,
        answer: &str,
    ) -> Result<security_answers::Model> {
        security_answers::ActiveModel {
            user_id: Set(user_id),
            security_question_id: Set(security_question_id),
            answer: Set(answer.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert security answer for user {user_id}"))
    }

    pub async fn security_answer_for_user(
        &self,
        user_id: i32,
    ) -> Result<Option<security_answers::Model>> {
        SecurityAnswers::find()
            .filter(security_answers::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query security answer for user {user_id}"))
    }

    pub async fn create_address(&self, address: NewAddress) -> Result<addresses::Model> {
        let user_id = address.user_id;

        addresses::ActiveModel {
            user_id: Set(address.user_id),
            full_name: Set(address.full_name),
            mobile_num: Set(address.mobile_num),
            zip_code: Set(address.zip_code),
            street_address: Set(address.street_address),
            city: Set(address.city),
            state: Set(address.state),
            country: Set(address.country),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert address for user {user_id}"))
    }

    pub async fn addresses_for_user(&self, user_id: i32) -> Result<Vec<addresses::Model>> {
        Addresses::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_asc(addresses::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list addresses for user {user_id}"))
    }

    pub async fn create_card(&self, card: NewCard) -> Result<cards::Model> {
        let user_id = card.user_id;

        cards::ActiveModel {
            user_id: Set(card.user_id),
            full_name: Set(card.full_name),
            card_num: Set(card.card_num),
            exp_month: Set(card.exp_month),
            exp_year: Set(card.exp_year),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to insert card for user {user_id}"))
    }
}
