use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Referenced tables first so foreign keys resolve.
        create(manager, &schema, Users).await?;
        create(manager, &schema, SecurityQuestions).await?;
        create(manager, &schema, SecurityAnswers).await?;
        create(manager, &schema, Wallets).await?;
        create(manager, &schema, Addresses).await?;
        create(manager, &schema, Cards).await?;
        create(manager, &schema, Feedbacks).await?;
        create(manager, &schema, DeliveryMethods).await?;
        create(manager, &schema, Challenges).await?;
        create(manager, &schema, Hints).await?;
        create(manager, &schema, Products).await?;
        create(manager, &schema, Quantities).await?;
        create(manager, &schema, Baskets).await?;
        create(manager, &schema, BasketItems).await?;
        create(manager, &schema, Complaints).await?;
        create(manager, &schema, Recycles).await?;
        create(manager, &schema, Orders).await?;
        create(manager, &schema, Memories).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables = [
            Memories.into_iden(),
            Orders.into_iden(),
            Recycles.into_iden(),
            Complaints.into_iden(),
            BasketItems.into_iden(),
            Baskets.into_iden(),
            Quantities.into_iden(),
            Products.into_iden(),
            Hints.into_iden(),
            Challenges.into_iden(),
            DeliveryMethods.into_iden(),
            Feedbacks.into_iden(),
            Cards.into_iden(),
            Addresses.into_iden(),
            Wallets.into_iden(),
            SecurityAnswers.into_iden(),
            SecurityQuestions.into_iden(),
            Users.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}
