use tracing::info;

use super::{FamilyResult, counts, decode, fixtures, positional_id};
use crate::db::NewChallenge;
use crate::fixtures::ChallengeFixture;
use crate::seed::environment::disabled_warning;
use crate::seed::templating::{sanitize_description, sanitize_hint};
use crate::seed::{Family, SeedContext, SeedError, Seeder, fan_out};

const DEFAULT_DIFFICULTY: i32 = 3;

impl Seeder {
    pub(in crate::seed) async fn seed_challenges(&self, ctx: &mut SeedContext) -> FamilyResult {
        let records = fixtures(self.fixtures.challenges().await)?;

        let tasks = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let fixture = decode(record)?;
                    self.create_challenge(&fixture).await
                };
                (record.label("key", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Challenges, tasks).await;
        let result = counts(&outcome);

        for (key, id) in outcome.created {
            ctx.challenges.insert(key, id);
        }

        Ok(result)
    }

    async fn create_challenge(
        &self,
        fixture: &ChallengeFixture,
    ) -> Result<(String, i32), SeedError> {
        let settings = &self.config.challenges;
        let disabled_on = self.environments.disabling(fixture.disabled_env.as_deref());

        let mut description = sanitize_description(
            &fixture.description,
            self.branding(),
            &settings.xss_bonus_payload,
        );
        if let Some(env) = disabled_on {
            description.push_str(&disabled_warning(env, settings.safety_override));
        }

        let challenge = self
            .store
            .create_challenge(NewChallenge {
                key: fixture.key.clone(),
                name: fixture.name.clone(),
                category: fixture.category.clone(),
                tags: (!fixture.tags.is_empty()).then(|| fixture.tags.join(",")),
                description,
                difficulty: fixture.difficulty.unwrap_or(DEFAULT_DIFFICULTY),
                hint_url: fixture.hint_url.clone().filter(|_| settings.show_hints),
                mitigation_url: fixture
                    .mitigation_url
                    .clone()
                    .filter(|_| settings.show_mitigations),
                disabled_env: disabled_on
                    .filter(|_| !settings.safety_override)
                    .map(|env| env.as_str().to_string()),
                tutorial_order: fixture.tutorial.as_ref().map(|t| t.order),
                has_coding_challenge: fixture.has_coding_challenge,
            })
            .await?;

        Ok((fixture.key.clone(), challenge.id))
    }

    /// Hints are numbered 1..N per challenge in fixture order. Malformed
    /// challenge entries were already counted by the challenge family.
    pub(in crate::seed) async fn seed_hints(&self, ctx: &SeedContext) -> FamilyResult {
        if !self.config.challenges.show_hints {
            info!("Hints disabled, skipping");
            return Ok((0, 0));
        }

        let challenges: Vec<ChallengeFixture> = fixtures(self.fixtures.challenges().await)?
            .iter()
            .filter_map(|record| record.decode().ok())
            .collect();

        let tasks = challenges
            .iter()
            .flat_map(move |challenge| {
                challenge.hints.iter().enumerate().map(move |(index, text)| {
                    let label = format!("{}#{}", challenge.key, index + 1);
                    let fut = async move {
                        let challenge_id = ctx
                            .challenges
                            .get(challenge.key.as_str())
                            .copied()
                            .ok_or_else(|| SeedError::missing("challenge", &challenge.key))?;
                        let order = positional_id(index)?;
                        let text = sanitize_hint(text, self.branding());
                        Ok::<_, SeedError>(
                            self.store.create_hint(challenge_id, &text, order).await?,
                        )
                    };
                    (label, fut)
                })
            })
            .collect();

        let outcome = fan_out(Family::Hints, tasks).await;
        Ok(counts(&outcome))
    }
}
