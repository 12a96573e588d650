//! Fixture loading.
//!
//! Fixture lists are JSON arrays, one file per family. They are read from a
//! configured directory or, when none is configured, from the copies compiled
//! into the binary. A file missing from the source yields an empty list.
//!
//! Entries stay raw JSON until a creator decodes them, so a malformed entry
//! fails on its own instead of taking the whole file with it.

pub mod types;

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use types::*;

#[derive(RustEmbed)]
#[folder = "fixtures/"]
struct EmbeddedFixtures;

/// One undecoded entry of a fixture file.
#[derive(Debug, Clone)]
pub struct FixtureRecord<T> {
    raw: Value,
    _record: PhantomData<T>,
}

impl<T: DeserializeOwned> FixtureRecord<T> {
    #[must_use]
    pub fn new(raw: Value) -> Self {
        Self {
            raw,
            _record: PhantomData,
        }
    }

    pub fn decode(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.raw.clone())
    }

    /// String value of `field`, or the 1-based position when the entry has
    /// no such field.
    #[must_use]
    pub fn label(&self, field: &str, index: usize) -> String {
        self.raw
            .get(field)
            .and_then(Value::as_str)
            .map_or_else(|| format!("#{}", index + 1), str::to_string)
    }
}

#[derive(Debug, Clone)]
pub enum FixtureSource {
    Embedded,
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct FixtureLoader {
    source: FixtureSource,
}

impl Default for FixtureLoader {
    fn default() -> Self {
        Self::embedded()
    }
}

impl FixtureLoader {
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            source: FixtureSource::Embedded,
        }
    }

    #[must_use]
    pub fn from_dir(path: impl AsRef<Path>) -> Self {
        Self {
            source: FixtureSource::Directory(path.as_ref().to_path_buf()),
        }
    }

    /// Directory loader when `path` is set, embedded fixtures otherwise.
    #[must_use]
    pub fn from_config_path(path: Option<&str>) -> Self {
        path.map_or_else(Self::embedded, Self::from_dir)
    }

    pub async fn security_questions(
        &self,
    ) -> Result<Vec<FixtureRecord<SecurityQuestionFixture>>> {
        self.load("securityQuestions.json").await
    }

    pub async fn users(&self) -> Result<Vec<FixtureRecord<UserFixture>>> {
        self.load("users.json").await
    }

    pub async fn challenges(&self) -> Result<Vec<FixtureRecord<ChallengeFixture>>> {
        self.load("challenges.json").await
    }

    pub async fn deliveries(&self) -> Result<Vec<FixtureRecord<DeliveryFixture>>> {
        self.load("deliveries.json").await
    }

    pub async fn products(&self) -> Result<Vec<FixtureRecord<ProductFixture>>> {
        self.load("products.json").await
    }

    pub async fn baskets(&self) -> Result<Vec<FixtureRecord<BasketFixture>>> {
        self.load("baskets.json").await
    }

    pub async fn feedback(&self) -> Result<Vec<FixtureRecord<FeedbackFixture>>> {
        self.load("feedback.json").await
    }

    pub async fn complaints(&self) -> Result<Vec<FixtureRecord<ComplaintFixture>>> {
        self.load("complaints.json").await
    }

    pub async fn recycles(&self) -> Result<Vec<FixtureRecord<RecycleFixture>>> {
        self.load("recycles.json").await
    }

    pub async fn orders(&self) -> Result<Vec<FixtureRecord<OrderFixture>>> {
        self.load("orders.json").await
    }

    pub async fn memories(&self) -> Result<Vec<FixtureRecord<MemoryFixture>>> {
        self.load("memories.json").await
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<FixtureRecord<T>>> {
        let bytes = match &self.source {
            FixtureSource::Embedded => match EmbeddedFixtures::get(file) {
                Some(content) => content.data.into_owned(),
                None => {
                    debug!(file, "No embedded fixture, treating as empty");
                    return Ok(Vec::new());
                }
            },
            FixtureSource::Directory(dir) => {
                let path = dir.join(file);
                match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(path = %path.display(), "Fixture file missing, treating as empty");
                        return Ok(Vec::new());
                    }
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("Failed to read fixture file: {}", path.display())
                        });
                    }
                }
            }
        };

        let entries: Vec<Value> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Fixture {file} is not a JSON array"))?;

        Ok(entries.into_iter().map(FixtureRecord::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all<T: DeserializeOwned>(records: &[FixtureRecord<T>]) -> Vec<T> {
        records.iter().map(|r| r.decode().unwrap()).collect()
    }

    #[tokio::test]
    async fn embedded_fixtures_parse() {
        let loader = FixtureLoader::embedded();

        let users = decode_all(&loader.users().await.unwrap());
        assert!(users.iter().any(|u| u.role == Role::Deluxe));
        assert!(users.iter().any(|u| u.role == Role::Admin));

        let challenges = decode_all(&loader.challenges().await.unwrap());
        assert!(!challenges.is_empty());
        assert!(challenges.iter().any(|c| !c.hints.is_empty()));

        assert!(!decode_all(&loader.security_questions().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.deliveries().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.products().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.baskets().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.feedback().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.complaints().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.recycles().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.orders().await.unwrap()).is_empty());
        assert!(!decode_all(&loader.memories().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn embedded_challenge_keys_are_unique() {
        let challenges = decode_all(&FixtureLoader::embedded().challenges().await.unwrap());
        let mut keys: Vec<&str> = challenges.iter().map(|c| c.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), challenges.len());
    }

    #[tokio::test]
    async fn missing_directory_file_is_empty() {
        let dir = std::env::temp_dir().join(format!("shopseed-fixtures-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let loader = FixtureLoader::from_dir(&dir);
        assert!(loader.users().await.unwrap().is_empty());

        tokio::fs::write(dir.join("users.json"), "not json")
            .await
            .unwrap();
        assert!(loader.users().await.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn malformed_entry_fails_alone() {
        let dir = std::env::temp_dir().join(format!("shopseed-fixtures-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("users.json"),
            r#"[{"key": "alice", "email": "alice", "password": "pw"}, {"key": "bob", "email": "bob"}, 42]"#,
        )
        .await
        .unwrap();

        let records = FixtureLoader::from_dir(&dir).users().await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.ok();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].decode().unwrap().key, "alice");
        assert!(records[1].decode().is_err());
        assert_eq!(records[1].label("key", 1), "bob");
        assert!(records[2].decode().is_err());
        assert_eq!(records[2].label("key", 2), "#3");
    }

    #[test]
    fn user_fixture_defaults() {
        let user: UserFixture = serde_json::from_str(
            r#"{"key": "bob", "email": "bob", "password": "pw"}"#,
        )
        .unwrap();

        assert_eq!(user.role, Role::Customer);
        assert!(!user.custom_domain);
        assert!(!user.deleted_flag);
        assert!(user.address.is_empty());
        assert!(user.wallet_balance.is_none());
    }

    #[test]
    fn unknown_roles_are_customers() {
        let user: UserFixture = serde_json::from_str(
            r#"{"key": "bob", "email": "bob", "password": "pw", "role": "user"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Customer);

        let admin: UserFixture = serde_json::from_str(
            r#"{"key": "root", "email": "root", "password": "pw", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
