use uuid::Uuid;

use super::{FamilyResult, cached_user, counts, decode, fixtures};
use crate::db::{NewOrder, OrderLine};
use crate::fixtures::{BasketFixture, OrderFixture, Role};
use crate::seed::{CachedProduct, Family, SeedContext, SeedError, Seeder, fan_out};

fn cached_product<'a>(ctx: &'a SeedContext, name: &str) -> Result<&'a CachedProduct, SeedError> {
    ctx.products
        .get(name)
        .ok_or_else(|| SeedError::missing("product", name))
}

/// `xxxx-xxxxxxxxxxxxxxxx` in lowercase hex.
fn order_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", &hex[..4], &hex[4..20])
}

/// Deluxe customers pay the deluxe price. Bonus points are a tenth of the
/// unit price, rounded, per unit.
fn order_line(name: &str, product: &CachedProduct, quantity: i32, role: Role) -> OrderLine {
    let price = if role == Role::Deluxe {
        product.deluxe_price
    } else {
        product.price
    };

    OrderLine {
        id: product.id,
        name: name.to_string(),
        price,
        quantity,
        total: price * f64::from(quantity),
        bonus: (price / 10.0).round() as i32 * quantity,
    }
}

impl Seeder {
    pub(in crate::seed) async fn seed_baskets(&self, ctx: &mut SeedContext) -> FamilyResult {
        let baskets = fixtures(self.fixtures.baskets().await)?;
        let lookup: &SeedContext = ctx;

        let tasks = baskets
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let user = cached_user(lookup, &fixture.user)?;
                    let basket = self.store.create_basket(user.id, fixture.coupon).await?;
                    Ok::<_, SeedError>((fixture.user, basket.id))
                };
                (record.label("user", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Baskets, tasks).await;
        let result = counts(&outcome);

        for (user, basket_id) in outcome.created {
            ctx.baskets.insert(user, basket_id);
        }

        Ok(result)
    }

    /// Items of malformed basket entries were already counted as basket failures.
    pub(in crate::seed) async fn seed_basket_items(&self, ctx: &SeedContext) -> FamilyResult {
        let baskets: Vec<BasketFixture> = fixtures(self.fixtures.baskets().await)?
            .iter()
            .filter_map(|record| record.decode().ok())
            .collect();

        let tasks = baskets
            .iter()
            .flat_map(move |basket| {
                basket.items.iter().map(move |item| {
                    let label = format!("{}:{}", basket.user, item.product);
                    let fut = async move {
                        let basket_id = ctx
                            .baskets
                            .get(basket.user.as_str())
                            .copied()
                            .ok_or_else(|| SeedError::missing("basket", &basket.user))?;
                        let product = cached_product(ctx, &item.product)?;
                        Ok::<_, SeedError>(
                            self.store
                                .create_basket_item(basket_id, product.id, item.quantity)
                                .await?,
                        )
                    };
                    (label, fut)
                })
            })
            .collect();

        let outcome = fan_out(Family::BasketItems, tasks).await;
        Ok(counts(&outcome))
    }

    pub(in crate::seed) async fn seed_orders(&self, ctx: &SeedContext) -> FamilyResult {
        let orders = fixtures(self.fixtures.orders().await)?;

        let tasks = orders
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let label = format!("{}#{}", record.label("user", index), index + 1);
                let fut = async move {
                    let fixture = decode(record)?;
                    self.create_order(&fixture, ctx).await
                };
                (label, fut)
            })
            .collect();

        let outcome = fan_out(Family::Orders, tasks).await;
        Ok(counts(&outcome))
    }

    async fn create_order(
        &self,
        fixture: &OrderFixture,
        ctx: &SeedContext,
    ) -> Result<i32, SeedError> {
        let user = cached_user(ctx, &fixture.user)?;

        let products = fixture
            .products
            .iter()
            .map(|item| {
                cached_product(ctx, &item.product)
                    .map(|product| order_line(&item.product, product, item.quantity, user.role))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order = self
            .store
            .create_order(NewOrder {
                order_id: order_id(),
                email: user.email.clone(),
                total_price: products.iter().map(|line| line.total).sum(),
                bonus: products.iter().map(|line| line.bonus).sum(),
                products,
                delivered: fixture.delivered,
                eta: fixture.eta,
            })
            .await?;

        Ok(order.id)
    }
}
