use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{
    addresses, basket_items, baskets, cards, challenges, complaints, delivery_methods, feedbacks,
    hints, memories, orders, products, quantities, recycles, security_answers, security_questions,
    users, wallets,
};

pub mod migrator;
pub mod repositories;

pub use repositories::basket::{NewOrder, OrderLine};
pub use repositories::catalog::{NewDeliveryMethod, NewProduct};
pub use repositories::challenge::NewChallenge;
pub use repositories::feedback::NewRecycle;
pub use repositories::user::{NewAddress, NewCard, NewUser};

/// Row counts per seeded table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: u64,
    pub challenges: u64,
    pub hints: u64,
    pub products: u64,
    pub delivery_methods: u64,
    pub baskets: u64,
    pub basket_items: u64,
    pub complaints: u64,
    pub recycles: u64,
    pub memories: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory database is a separate database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Rolls every migration back, dropping child tables before their
    /// parents, then reapplies them.
    pub async fn reset(&self) -> Result<()> {
        use sea_orm_migration::MigratorTrait;

        migrator::Migrator::refresh(&self.conn).await?;
        info!("Database reset to an empty schema");
        Ok(())
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn challenge_repo(&self) -> repositories::challenge::ChallengeRepository {
        repositories::challenge::ChallengeRepository::new(self.conn.clone())
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository {
        repositories::catalog::CatalogRepository::new(self.conn.clone())
    }

    fn basket_repo(&self) -> repositories::basket::BasketRepository {
        repositories::basket::BasketRepository::new(self.conn.clone())
    }

    fn feedback_repo(&self) -> repositories::feedback::FeedbackRepository {
        repositories::feedback::FeedbackRepository::new(self.conn.clone())
    }

    // Users and everything hanging off them

    pub async fn create_user(&self, user: NewUser) -> Result<users::Model> {
        self.user_repo().create(user).await
    }

    pub async fn soft_delete_user(&self, id: i32) -> Result<()> {
        self.user_repo().soft_delete(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list().await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn create_wallet(&self, user_id: i32, balance: f64) -> Result<wallets::Model> {
        self.user_repo().create_wallet(user_id, balance).await
    }

    pub async fn list_wallets(&self) -> Result<Vec<wallets::Model>> {
        self.user_repo().list_wallets().await
    }

    pub async fn create_security_question(
        &self,
        question: &str,
    ) -> Result<security_questions::Model> {
        self.user_repo().create_security_question(question).await
    }

    pub async fn get_security_question(
        &self,
        id: i32,
    ) -> Result<Option<security_questions::Model>> {
        self.user_repo().get_security_question(id).await
    }

    pub async fn create_security_answer(
        &self,
        user_id: i32,
        security_question_id: i32,
        answer: &str,
    ) -> Result<security_answers::Model> {
        self.user_repo()
            .create_security_answer(user_id, security_question_id, answer)
            .await
    }

    pub async fn create_address(&self, address: NewAddress) -> Result<addresses::Model> {
        self.user_repo().create_address(address).await
    }

    pub async fn security_answer_for_user(
        &self,
        user_id: i32,
    ) -> Result<Option<security_answers::Model>> {
        self.user_repo().security_answer_for_user(user_id).await
    }

    pub async fn addresses_for_user(&self, user_id: i32) -> Result<Vec<addresses::Model>> {
        self.user_repo().addresses_for_user(user_id).await
    }

    pub async fn create_card(&self, card: NewCard) -> Result<cards::Model> {
        self.user_repo().create_card(card).await
    }

    // Challenges

    pub async fn create_challenge(&self, challenge: NewChallenge) -> Result<challenges::Model> {
        self.challenge_repo().create(challenge).await
    }

    pub async fn create_hint(
        &self,
        challenge_id: i32,
        text: &str,
        order: i32,
    ) -> Result<hints::Model> {
        self.challenge_repo()
            .create_hint(challenge_id, text, order)
            .await
    }

    pub async fn list_challenges(&self) -> Result<Vec<challenges::Model>> {
        self.challenge_repo().list().await
    }

    pub async fn get_challenge_by_key(&self, key: &str) -> Result<Option<challenges::Model>> {
        self.challenge_repo().get_by_key(key).await
    }

    pub async fn hints_for_challenge(&self, challenge_id: i32) -> Result<Vec<hints::Model>> {
        self.challenge_repo().hints_for(challenge_id).await
    }

    // Catalog

    pub async fn create_product(&self, product: NewProduct) -> Result<products::Model> {
        self.catalog_repo().create_product(product).await
    }

    pub async fn soft_delete_product(&self, id: i32) -> Result<()> {
        self.catalog_repo().soft_delete_product(id).await
    }

    pub async fn create_quantity(
        &self,
        product_id: i32,
        quantity: i32,
        limit_per_user: Option<i32>,
    ) -> Result<quantities::Model> {
        self.catalog_repo()
            .create_quantity(product_id, quantity, limit_per_user)
            .await
    }

    pub async fn create_delivery_method(
        &self,
        method: NewDeliveryMethod,
    ) -> Result<delivery_methods::Model> {
        self.catalog_repo().create_delivery_method(method).await
    }

    pub async fn list_products(&self) -> Result<Vec<products::Model>> {
        self.catalog_repo().list_products().await
    }

    // Baskets and orders

    pub async fn create_basket(
        &self,
        user_id: i32,
        coupon: Option<String>,
    ) -> Result<baskets::Model> {
        self.basket_repo().create_basket(user_id, coupon).await
    }

    pub async fn create_basket_item(
        &self,
        basket_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<basket_items::Model> {
        self.basket_repo()
            .create_item(basket_id, product_id, quantity)
            .await
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<orders::Model> {
        self.basket_repo().create_order(order).await
    }

    pub async fn list_orders(&self) -> Result<Vec<orders::Model>> {
        self.basket_repo().list_orders().await
    }

    // Feedback, complaints, recycling, memories

    pub async fn create_feedback(
        &self,
        user_id: Option<i32>,
        comment: &str,
        rating: i32,
    ) -> Result<feedbacks::Model> {
        self.feedback_repo()
            .create_feedback(user_id, comment, rating)
            .await
    }

    pub async fn list_feedback(&self) -> Result<Vec<feedbacks::Model>> {
        self.feedback_repo().list_feedback().await
    }

    pub async fn create_complaint(
        &self,
        user_id: i32,
        message: &str,
        file: Option<String>,
    ) -> Result<complaints::Model> {
        self.feedback_repo()
            .create_complaint(user_id, message, file)
            .await
    }

    pub async fn create_recycle(&self, recycle: NewRecycle) -> Result<recycles::Model> {
        self.feedback_repo().create_recycle(recycle).await
    }

    pub async fn list_recycles(&self) -> Result<Vec<recycles::Model>> {
        self.feedback_repo().list_recycles().await
    }

    pub async fn create_memory(
        &self,
        user_id: i32,
        caption: &str,
        image_path: &str,
    ) -> Result<memories::Model> {
        self.feedback_repo()
            .create_memory(user_id, caption, image_path)
            .await
    }

    pub async fn table_counts(&self) -> Result<TableCounts> {
        let challenge_repo = self.challenge_repo();
        let catalog_repo = self.catalog_repo();
        let basket_repo = self.basket_repo();
        let feedback_repo = self.feedback_repo();

        Ok(TableCounts {
            users: self.user_repo().count().await?,
            challenges: challenge_repo.count().await?,
            hints: challenge_repo.count_hints().await?,
            products: catalog_repo.count_products().await?,
            delivery_methods: catalog_repo.count_delivery_methods().await?,
            baskets: basket_repo.count_baskets().await?,
            basket_items: basket_repo.count_items().await?,
            complaints: feedback_repo.count_complaints().await?,
            recycles: feedback_repo.count_recycles().await?,
            memories: feedback_repo.count_memories().await?,
        })
    }
}
