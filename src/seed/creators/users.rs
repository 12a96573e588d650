use futures::future::join_all;

use super::{FamilyResult, UPLOADS_PATH, counts, decode, fixtures, log_nested, positional_id};
use crate::db::{NewAddress, NewCard, NewUser};
use crate::fixtures::{FixtureRecord, Role, UserFixture};
use crate::seed::templating::{
    DELUXE_TOKEN_LENGTH, authored_comment, compose_email, generate_token, is_valid_email,
};
use crate::seed::{CachedUser, Family, SeedContext, SeedError, Seeder, fan_out};

fn default_profile_image(role: Role) -> &'static str {
    match role {
        Role::Admin => "defaultAdmin.png",
        _ => "default.svg",
    }
}

impl Seeder {
    pub(in crate::seed) async fn seed_security_questions(
        &self,
        ctx: &mut SeedContext,
    ) -> FamilyResult {
        let questions = fixtures(self.fixtures.security_questions().await)?;

        let tasks = questions
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let label = format!("#{}", index + 1);
                let fut = async move {
                    let position = positional_id(index)?;
                    let fixture = decode(record)?;
                    let created = self
                        .store
                        .create_security_question(&fixture.question)
                        .await?;
                    Ok::<_, SeedError>((position, created.id))
                };
                (label, fut)
            })
            .collect();

        let outcome = fan_out(Family::SecurityQuestions, tasks).await;
        let result = counts(&outcome);

        for (position, id) in outcome.created {
            ctx.security_questions.insert(position, id);
        }

        Ok(result)
    }

    pub(in crate::seed) async fn seed_users(&self, ctx: &mut SeedContext) -> FamilyResult {
        let users = fixtures(self.fixtures.users().await)?;
        let lookup: &SeedContext = ctx;

        let tasks = users
            .iter()
            .enumerate()
            .map(|(index, record)| {
                (record.label("key", index), self.create_user(index, record, lookup))
            })
            .collect();

        let outcome = fan_out(Family::Users, tasks).await;
        let result = counts(&outcome);

        for (key, user) in outcome.created {
            ctx.users.insert(key, user);
        }

        Ok(result)
    }

    async fn create_user(
        &self,
        index: usize,
        record: &FixtureRecord<UserFixture>,
        ctx: &SeedContext,
    ) -> Result<(String, CachedUser), SeedError> {
        let fixture = decode(record)?;
        let email = compose_email(
            &fixture.email,
            fixture.custom_domain,
            &self.config.application.domain,
        );
        if !is_valid_email(&email) {
            return Err(SeedError::InvalidEmail(email));
        }

        let deluxe_token = if fixture.role == Role::Deluxe {
            generate_token(DELUXE_TOKEN_LENGTH)
        } else {
            String::new()
        };

        let profile_image = fixture
            .profile_image
            .as_deref()
            .unwrap_or_else(|| default_profile_image(fixture.role));

        let user = self
            .store
            .create_user(NewUser {
                id: positional_id(index)?,
                username: fixture.username.clone(),
                email: email.clone(),
                password: fixture.password.clone(),
                role: fixture.role.as_str().to_string(),
                deluxe_token,
                last_login_ip: fixture
                    .last_login_ip
                    .clone()
                    .unwrap_or_else(|| "0.0.0.0".to_string()),
                profile_image: format!("{UPLOADS_PATH}/{profile_image}"),
                totp_secret: fixture.totp_secret.clone().unwrap_or_default(),
            })
            .await?;

        let key = fixture.key.as_str();

        if let Some(security) = &fixture.security_question {
            match ctx.security_questions.get(&security.id) {
                Some(&question_id) => {
                    let answer = self
                        .store
                        .create_security_answer(user.id, question_id, &security.answer)
                        .await;
                    log_nested(Family::Users, key, "security answer", answer);
                }
                None => {
                    let missing = anyhow::anyhow!("Unknown security question {}", security.id);
                    log_nested::<()>(Family::Users, key, "security answer", Err(missing));
                }
            }
        }

        if let Some(feedback) = &fixture.feedback {
            let comment = authored_comment(&feedback.comment, Some(&user.email));
            let created = self
                .store
                .create_feedback(Some(user.id), &comment, feedback.rating)
                .await;
            log_nested(Family::Users, key, "feedback", created);
        }

        let addresses = join_all(fixture.address.iter().map(|address| {
            self.store.create_address(NewAddress {
                user_id: user.id,
                full_name: address.full_name.clone(),
                mobile_num: address.mobile_num,
                zip_code: address.zip_code.clone(),
                street_address: address.street_address.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                country: address.country.clone(),
            })
        }))
        .await;
        let address_ids = addresses
            .into_iter()
            .filter_map(|created| log_nested(Family::Users, key, "address", created))
            .map(|address| address.id)
            .collect();

        let cards = join_all(fixture.card.iter().map(|card| {
            self.store.create_card(NewCard {
                user_id: user.id,
                full_name: card.full_name.clone(),
                card_num: card.card_num,
                exp_month: card.exp_month,
                exp_year: card.exp_year,
            })
        }))
        .await;
        for created in cards {
            log_nested(Family::Users, key, "card", created);
        }

        if fixture.deleted_flag {
            let deleted = self.store.soft_delete_user(user.id).await;
            log_nested(Family::Users, key, "deletion", deleted);
        }

        Ok((
            fixture.key.clone(),
            CachedUser {
                id: user.id,
                email: user.email,
                role: fixture.role,
                address_ids,
            },
        ))
    }

    /// Wallets link to users by fixture position, not by key: the wallet of
    /// fixture `i` belongs to user id `i + 1`. A malformed user entry fails
    /// its wallet too.
    pub(in crate::seed) async fn seed_wallets(&self) -> FamilyResult {
        let users = fixtures(self.fixtures.users().await)?;

        let tasks = users
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fut = async move {
                    let user_id = positional_id(index)?;
                    let balance = decode(record)?.wallet_balance.unwrap_or(0.0);
                    Ok::<_, SeedError>(self.store.create_wallet(user_id, balance).await?)
                };
                (record.label("key", index), fut)
            })
            .collect();

        let outcome = fan_out(Family::Wallets, tasks).await;
        Ok(counts(&outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_get_admin_avatar() {
        assert_eq!(default_profile_image(Role::Admin), "defaultAdmin.png");
        assert_eq!(default_profile_image(Role::Deluxe), "default.svg");
        assert_eq!(default_profile_image(Role::Customer), "default.svg");
    }
}
