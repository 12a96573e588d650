use super::{FamilyResult, UPLOADS_PATH, cached_user, counts, decode, fixtures};
use crate::db::NewRecycle;
use crate::seed::templating::authored_comment;
use crate::seed::{Family, SeedContext, SeedError, Seeder, fan_out};

impl Seeder {
    /// Standalone feedback entries have no author.
    pub(in crate::seed) async fn seed_feedback(&self) -> FamilyResult {
        let entries = fixtures(self.fixtures.feedback().await)?;

        let tasks = entries
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let comment = authored_comment(&fixture.comment, None);
                    Ok::<_, SeedError>(
                        self.store
                            .create_feedback(None, &comment, fixture.rating)
                            .await?,
                    )
                };
                (format!("#{}", index + 1), fut)
            })
            .collect();

        let outcome = fan_out(Family::Feedback, tasks).await;
        Ok(counts(&outcome))
    }

    pub(in crate::seed) async fn seed_complaints(&self, ctx: &SeedContext) -> FamilyResult {
        let complaints = fixtures(self.fixtures.complaints().await)?;

        let tasks = complaints
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let user = cached_user(ctx, &fixture.user)?;
                    Ok::<_, SeedError>(
                        self.store
                            .create_complaint(user.id, &fixture.message, fixture.file)
                            .await?,
                    )
                };
                (record.label("user", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Complaints, tasks).await;
        Ok(counts(&outcome))
    }

    /// A recycle is picked up from the user's first address, if any.
    pub(in crate::seed) async fn seed_recycles(&self, ctx: &SeedContext) -> FamilyResult {
        let recycles = fixtures(self.fixtures.recycles().await)?;

        let tasks = recycles
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let user = cached_user(ctx, &fixture.user)?;
                    Ok::<_, SeedError>(
                        self.store
                            .create_recycle(NewRecycle {
                                user_id: user.id,
                                address_id: user.address_ids.first().copied(),
                                quantity: fixture.quantity,
                                is_pickup: fixture.is_pickup,
                                date: fixture.date,
                            })
                            .await?,
                    )
                };
                (record.label("user", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Recycles, tasks).await;
        Ok(counts(&outcome))
    }

    pub(in crate::seed) async fn seed_memories(&self, ctx: &SeedContext) -> FamilyResult {
        let memories = fixtures(self.fixtures.memories().await)?;

        let tasks = memories
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    let image_path = format!("{UPLOADS_PATH}/{}", fixture.image);
                    let user = cached_user(ctx, &fixture.user)?;
                    Ok::<_, SeedError>(
                        self.store
                            .create_memory(user.id, &fixture.caption, &image_path)
                            .await?,
                    )
                };
                (record.label("user", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Memories, tasks).await;
        Ok(counts(&outcome))
    }
}
