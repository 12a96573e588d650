//! Database seeding.
//!
//! A run walks [`Family::ORDER`] one family at a time. Inside a family every
//! record is created concurrently and the family is joined before the next
//! one starts, so later families can resolve foreign keys through the
//! [`SeedContext`] filled by earlier ones. A failing record is logged and
//! skipped; nothing aborts the run once it has started.
//!
//! A run only starts on an empty database. With [`Seeder::with_fresh`] the
//! schema is dropped and recreated first.

pub mod cache;
mod creators;
pub mod environment;
pub mod error;
pub mod fanout;
pub mod placeholder;
pub mod templating;

use anyhow::{Context, bail};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::fixtures::FixtureLoader;

pub use cache::{CacheTable, CachedProduct, CachedUser, SeedContext};
pub use environment::{ActiveEnvironments, Environment};
pub use error::SeedError;
pub use fanout::{FamilyOutcome, fan_out};

/// A set of records created by one creator routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    SecurityQuestions,
    Users,
    Wallets,
    DeliveryMethods,
    Challenges,
    Hints,
    Products,
    Baskets,
    BasketItems,
    Feedback,
    Complaints,
    Recycles,
    Orders,
    Memories,
}

impl Family {
    /// Creation order. Each family only depends on families before it.
    pub const ORDER: [Self; 14] = [
        Self::SecurityQuestions,
        Self::Users,
        Self::Wallets,
        Self::DeliveryMethods,
        Self::Challenges,
        Self::Hints,
        Self::Products,
        Self::Baskets,
        Self::BasketItems,
        Self::Feedback,
        Self::Complaints,
        Self::Recycles,
        Self::Orders,
        Self::Memories,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SecurityQuestions => "security_questions",
            Self::Users => "users",
            Self::Wallets => "wallets",
            Self::DeliveryMethods => "delivery_methods",
            Self::Challenges => "challenges",
            Self::Hints => "hints",
            Self::Products => "products",
            Self::Baskets => "baskets",
            Self::BasketItems => "basket_items",
            Self::Feedback => "feedback",
            Self::Complaints => "complaints",
            Self::Recycles => "recycles",
            Self::Orders => "orders",
            Self::Memories => "memories",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyReport {
    pub family: Family,
    pub created: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub families: Vec<FamilyReport>,
    pub metadata_files_rewritten: usize,
}

impl SeedReport {
    #[must_use]
    pub fn family(&self, family: Family) -> Option<&FamilyReport> {
        self.families.iter().find(|r| r.family == family)
    }

    #[must_use]
    pub fn created(&self) -> usize {
        self.families.iter().map(|r| r.created).sum()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.families.iter().map(|r| r.failed).sum()
    }
}

pub struct Seeder {
    store: Store,
    config: Config,
    fixtures: FixtureLoader,
    environments: ActiveEnvironments,
    fresh: bool,
}

impl Seeder {
    /// Uses the fixture source and forced environments from `config`.
    #[must_use]
    pub fn new(store: Store, config: Config) -> Self {
        let fixtures = FixtureLoader::from_config_path(config.general.fixtures_path.as_deref());
        let environments = ActiveEnvironments::detect(&config.challenges.forced_environments);

        Self {
            store,
            config,
            fixtures,
            environments,
            fresh: false,
        }
    }

    #[must_use]
    pub fn with_fixtures(mut self, fixtures: FixtureLoader) -> Self {
        self.fixtures = fixtures;
        self
    }

    #[must_use]
    pub fn with_environments(mut self, environments: ActiveEnvironments) -> Self {
        self.environments = environments;
        self
    }

    /// Wipe the database before seeding instead of refusing a populated one.
    #[must_use]
    pub const fn with_fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Seeds every family in order, then rewrites metadata placeholders.
    /// Individual failures are logged and counted in the report.
    ///
    /// Fails before touching any table when the database already holds users
    /// and the seeder is not fresh.
    pub async fn run(&self) -> anyhow::Result<SeedReport> {
        self.prepare().await?;

        let mut ctx = SeedContext::default();
        let mut report = SeedReport::default();

        for family in Family::ORDER {
            debug!(family = %family, "Seeding family");
            let outcome = self.seed_family(family, &mut ctx).await;

            info!(
                family = %family,
                created = outcome.created,
                failed = outcome.failed,
                "Family seeded"
            );
            report.families.push(outcome);
        }

        report.metadata_files_rewritten =
            placeholder::rewrite_all(&self.config.metadata, &self.config.server.base_url).await;

        info!(
            created = report.created(),
            failed = report.failed(),
            "Database initialization complete"
        );

        Ok(report)
    }

    async fn prepare(&self) -> anyhow::Result<()> {
        if self.fresh {
            warn!("Dropping all seeded data before seeding");
            return self.store.reset().await.context("Failed to reset database");
        }

        let users = self.store.count_users().await?;
        if users > 0 {
            bail!(
                "Database already holds {users} user(s); seed again with --fresh to start over"
            );
        }
        Ok(())
    }

    async fn seed_family(&self, family: Family, ctx: &mut SeedContext) -> FamilyReport {
        let (created, failed) = match family {
            Family::SecurityQuestions => self.seed_security_questions(ctx).await,
            Family::Users => self.seed_users(ctx).await,
            Family::Wallets => self.seed_wallets().await,
            Family::DeliveryMethods => self.seed_delivery_methods().await,
            Family::Challenges => self.seed_challenges(ctx).await,
            Family::Hints => self.seed_hints(ctx).await,
            Family::Products => self.seed_products(ctx).await,
            Family::Baskets => self.seed_baskets(ctx).await,
            Family::BasketItems => self.seed_basket_items(ctx).await,
            Family::Feedback => self.seed_feedback().await,
            Family::Complaints => self.seed_complaints(ctx).await,
            Family::Recycles => self.seed_recycles(ctx).await,
            Family::Orders => self.seed_orders(ctx).await,
            Family::Memories => self.seed_memories(ctx).await,
        }
        .unwrap_or_else(|e| {
            error!(family = %family, error = %e, "Skipping family");
            (0, 0)
        });

        FamilyReport {
            family,
            created,
            failed,
        }
    }

    fn branding(&self) -> templating::Branding<'_> {
        templating::Branding {
            domain: self.config.application.domain.as_str(),
            name: self.config.application.name.as_str(),
        }
    }
}
