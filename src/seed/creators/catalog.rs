use rand::Rng;

use super::{FamilyResult, counts, decode, fixtures, log_nested};
use crate::db::{NewDeliveryMethod, NewProduct};
use crate::fixtures::ProductFixture;
use crate::seed::templating::brand_text;
use crate::seed::{CachedProduct, Family, SeedContext, SeedError, Seeder, fan_out};

impl Seeder {
    pub(in crate::seed) async fn seed_delivery_methods(&self) -> FamilyResult {
        let deliveries = fixtures(self.fixtures.deliveries().await)?;

        let tasks = deliveries
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let method = NewDeliveryMethod {
                        name: fixture.name,
                        price: fixture.price,
                        deluxe_price: fixture.deluxe_price,
                        eta: fixture.eta,
                        icon: fixture.icon,
                    };
                    Ok::<_, SeedError>(self.store.create_delivery_method(method).await?)
                };
                (record.label("name", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::DeliveryMethods, tasks).await;
        Ok(counts(&outcome))
    }

    pub(in crate::seed) async fn seed_products(&self, ctx: &mut SeedContext) -> FamilyResult {
        let products = fixtures(self.fixtures.products().await)?;

        let tasks = products
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    self.create_product(&fixture).await
                };
                (record.label("name", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Products, tasks).await;
        let result = counts(&outcome);

        for (name, product) in outcome.created {
            ctx.products.insert(name, product);
        }

        Ok(result)
    }

    async fn create_product(
        &self,
        fixture: &ProductFixture,
    ) -> Result<(String, CachedProduct), SeedError> {
        let deluxe_price = fixture.deluxe_price.unwrap_or(fixture.price);

        let product = self
            .store
            .create_product(NewProduct {
                name: fixture.name.clone(),
                description: brand_text(&fixture.description, self.branding()),
                price: fixture.price,
                deluxe_price,
                image: fixture.image.clone(),
            })
            .await?;

        let name = fixture.name.as_str();
        let stock = fixture
            .quantity
            .unwrap_or_else(|| rand::rng().random_range(30..100));
        let quantity = self
            .store
            .create_quantity(product.id, stock, fixture.limit_per_user)
            .await;
        log_nested(Family::Products, name, "quantity", quantity);

        if fixture.deleted_flag {
            let deleted = self.store.soft_delete_product(product.id).await;
            log_nested(Family::Products, name, "deletion", deleted);
        }

        Ok((
            fixture.name.clone(),
            CachedProduct {
                id: product.id,
                price: product.price,
                deluxe_price: product.deluxe_price,
            },
        ))
    }
}
