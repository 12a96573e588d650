//! End-to-end seeding against a temporary SQLite database.

use serde_json::{Value, json};
use shopseed::config::Config;
use shopseed::db::Store;
use shopseed::fixtures::FixtureLoader;
use shopseed::seed::{ActiveEnvironments, Environment, Family, SeedReport, Seeder};
use std::path::{Path, PathBuf};

struct TestEnv {
    store: Store,
    config: Config,
    fixtures_dir: PathBuf,
}

impl TestEnv {
    async fn new() -> Self {
        let id = uuid::Uuid::new_v4();
        let db_path = std::env::temp_dir().join(format!("shopseed-test-{id}.db"));
        let fixtures_dir = std::env::temp_dir().join(format!("shopseed-fixtures-{id}"));
        std::fs::create_dir_all(&fixtures_dir).unwrap();

        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", db_path.display());
        config.application.domain = "shop.test".to_string();
        config.application.name = "Test Shop".to_string();

        let store = Store::new(&config.general.database_path)
            .await
            .expect("Failed to create store");

        Self {
            store,
            config,
            fixtures_dir,
        }
    }

    fn write(&self, file: &str, records: Value) {
        std::fs::write(self.fixtures_dir.join(file), records.to_string()).unwrap();
    }

    fn seeder(&self) -> Seeder {
        Seeder::new(self.store.clone(), self.config.clone())
            .with_fixtures(FixtureLoader::from_dir(&self.fixtures_dir))
            .with_environments(ActiveEnvironments::from_list(&[]))
    }

    async fn seed_with(&self, environments: &[Environment]) -> SeedReport {
        self.seeder()
            .with_environments(ActiveEnvironments::from_list(environments))
            .run()
            .await
            .expect("Seeding should start on an empty database")
    }

    async fn seed(&self) -> SeedReport {
        self.seed_with(&[]).await
    }
}

fn user(key: &str, email: &str, role: &str) -> Value {
    json!({ "key": key, "email": email, "password": "pw", "role": role })
}

fn challenge(key: &str, description: &str, hints: &[&str]) -> Value {
    json!({
        "key": key,
        "name": key,
        "category": "XSS",
        "description": description,
        "difficulty": 1,
        "hints": hints,
        "hintUrl": "https://hints.example.com",
        "mitigationUrl": "https://mitigate.example.com"
    })
}

fn created(report: &SeedReport, family: Family) -> usize {
    report.family(family).map_or(0, |r| r.created)
}

fn failed(report: &SeedReport, family: Family) -> usize {
    report.family(family).map_or(0, |r| r.failed)
}

#[tokio::test]
async fn test_two_users_and_one_challenge() {
    let env = TestEnv::new().await;
    env.write(
        "users.json",
        json!([
            user("bender", "bender", "deluxe"),
            user("jim", "jim", "customer"),
        ]),
    );
    env.write(
        "challenges.json",
        json!([challenge("scoreBoard", "Find the score board.", &["Look closely."])]),
    );

    let report = env.seed().await;

    assert_eq!(created(&report, Family::Users), 2);
    assert_eq!(created(&report, Family::Challenges), 1);
    assert_eq!(created(&report, Family::Hints), 1);
    assert_eq!(report.failed(), 0);

    let users = env.store.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    let deluxe = users.iter().find(|u| u.role == "deluxe").unwrap();
    let plain = users.iter().find(|u| u.role == "customer").unwrap();
    assert_eq!(deluxe.deluxe_token.len(), 32);
    assert!(plain.deluxe_token.is_empty());

    let challenge = env
        .store
        .get_challenge_by_key("scoreBoard")
        .await
        .unwrap()
        .unwrap();
    assert!(!challenge.solved);
    assert_eq!(challenge.difficulty, 1);
    assert_eq!(
        challenge.hint_url.as_deref(),
        Some("https://hints.example.com")
    );

    let hints = env.store.hints_for_challenge(challenge.id).await.unwrap();
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].order, 1);
    assert!(!hints[0].unlocked);
}

#[tokio::test]
async fn test_emails_use_configured_domain() {
    let env = TestEnv::new().await;
    let mut google = user("bjoern", "bjoern.kimminich@gmail.com", "admin");
    google["customDomain"] = json!(true);
    env.write("users.json", json!([user("amy", "amy", "customer"), google]));

    env.seed().await;

    let amy = env.store.get_user_by_email("amy@shop.test").await.unwrap();
    assert!(amy.is_some());
    let bjoern = env
        .store
        .get_user_by_email("bjoern.kimminich@gmail.com")
        .await
        .unwrap();
    assert!(bjoern.is_some());
    assert_eq!(
        bjoern.unwrap().profile_image,
        "assets/public/images/uploads/defaultAdmin.png"
    );
}

#[tokio::test]
async fn test_invalid_email_skips_only_that_user() {
    let env = TestEnv::new().await;
    let mut broken = user("broken", "not an email", "customer");
    broken["customDomain"] = json!(true);
    env.write(
        "users.json",
        json!([user("amy", "amy", "customer"), broken, user("jim", "jim", "customer")]),
    );

    let report = env.seed().await;

    assert_eq!(created(&report, Family::Users), 2);
    assert_eq!(failed(&report, Family::Users), 1);

    let ids: Vec<i32> = env
        .store
        .list_users()
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_malformed_user_does_not_drop_its_family() {
    let env = TestEnv::new().await;
    env.write(
        "users.json",
        json!([
            user("alice", "alice", "deluxe"),
            user("bob", "bob", "user"),
            { "key": "carol", "email": "carol", "password": "pw" },
            { "key": "dave", "email": "dave", "role": "customer" },
        ]),
    );

    let report = env.seed().await;

    assert_eq!(created(&report, Family::Users), 3);
    assert_eq!(failed(&report, Family::Users), 1);
    assert_eq!(created(&report, Family::Wallets), 3);
    assert_eq!(failed(&report, Family::Wallets), 1);

    let users = env.store.list_users().await.unwrap();
    let roles: Vec<(&str, &str)> = users
        .iter()
        .map(|u| (u.email.as_str(), u.role.as_str()))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("alice@shop.test", "deluxe"),
            ("bob@shop.test", "customer"),
            ("carol@shop.test", "customer"),
        ]
    );
}

#[tokio::test]
async fn test_malformed_records_fail_alone_in_every_family() {
    let env = TestEnv::new().await;
    env.write("users.json", json!([user("jim", "jim", "customer")]));
    env.write(
        "challenges.json",
        json!([challenge("good", "Fine.", &["a"]), { "key": "broken" }]),
    );
    env.write(
        "products.json",
        json!([
            { "name": "Apple Juice", "description": "Juicy.", "price": 1.99 },
            { "name": "Priceless", "description": "No price." }
        ]),
    );
    env.write(
        "complaints.json",
        json!([{ "user": "jim", "message": "Too sour." }, { "user": "jim" }]),
    );

    let report = env.seed().await;

    for family in [Family::Challenges, Family::Products, Family::Complaints] {
        assert_eq!(created(&report, family), 1, "{family}");
        assert_eq!(failed(&report, family), 1, "{family}");
    }
    assert_eq!(created(&report, Family::Hints), 1);
    assert_eq!(failed(&report, Family::Hints), 0);
}

#[tokio::test]
async fn test_descriptions_are_rebranded() {
    let env = TestEnv::new().await;
    env.write(
        "challenges.json",
        json!([
            challenge(
                "contact",
                "Write to <a href=\"mailto:support@juice-sh.op\">support@juice-sh.op</a> at OWASP Juice Shop.",
                &["Ask OWASP Juice Shop support."]
            ),
            challenge("plain", "Nothing to rebrand.", &[]),
        ]),
    );

    env.seed().await;

    for challenge in env.store.list_challenges().await.unwrap() {
        assert!(!challenge.description.contains("juice-sh.op"));
        assert!(!challenge.description.contains("OWASP Juice Shop"));
    }

    let contact = env
        .store
        .get_challenge_by_key("contact")
        .await
        .unwrap()
        .unwrap();
    assert!(contact.description.contains("support@shop.test"));
    assert!(contact.description.contains("Test Shop"));

    let hints = env.store.hints_for_challenge(contact.id).await.unwrap();
    assert_eq!(hints[0].text, "Ask Test Shop support.");
}

#[tokio::test]
async fn test_hints_are_numbered_in_fixture_order() {
    let env = TestEnv::new().await;
    env.write(
        "challenges.json",
        json!([
            challenge("first", "One", &["a", "b", "c"]),
            challenge("second", "Two", &["x", "y"]),
        ]),
    );

    let report = env.seed().await;
    assert_eq!(created(&report, Family::Hints), 5);

    for (key, expected) in [("first", vec!["a", "b", "c"]), ("second", vec!["x", "y"])] {
        let challenge = env.store.get_challenge_by_key(key).await.unwrap().unwrap();
        let hints = env.store.hints_for_challenge(challenge.id).await.unwrap();

        let orders: Vec<i32> = hints.iter().map(|h| h.order).collect();
        let texts: Vec<&str> = hints.iter().map(|h| h.text.as_str()).collect();
        let expected_orders: Vec<i32> = (1..=expected.len() as i32).collect();
        assert_eq!(orders, expected_orders);
        assert_eq!(texts, expected);
    }
}

#[tokio::test]
async fn test_hints_can_be_disabled() {
    let mut env = TestEnv::new().await;
    env.config.challenges.show_hints = false;
    env.write(
        "challenges.json",
        json!([challenge("first", "One", &["a", "b"])]),
    );

    let report = env.seed().await;

    assert_eq!(created(&report, Family::Hints), 0);
    let challenge = env.store.get_challenge_by_key("first").await.unwrap().unwrap();
    assert!(challenge.hint_url.is_none());
    assert_eq!(
        challenge.mitigation_url.as_deref(),
        Some("https://mitigate.example.com")
    );
    assert!(env.store.hints_for_challenge(challenge.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_wallets_follow_user_positions() {
    let env = TestEnv::new().await;
    let mut jim = user("jim", "jim", "customer");
    jim["walletBalance"] = json!(100);
    env.write(
        "users.json",
        json!([user("admin", "admin", "admin"), jim, user("amy", "amy", "customer")]),
    );

    let report = env.seed().await;
    assert_eq!(created(&report, Family::Wallets), 3);

    let users = env.store.list_users().await.unwrap();
    let wallets = env.store.list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 3);

    for (index, wallet) in wallets.iter().enumerate() {
        assert_eq!(wallet.user_id, index as i32 + 1);
        assert_eq!(users[index].id, wallet.user_id);
    }
    let balances: Vec<f64> = wallets.iter().map(|w| w.balance).collect();
    assert_eq!(balances, vec![0.0, 100.0, 0.0]);
}

#[tokio::test]
async fn test_deleted_user_is_soft_deleted() {
    let env = TestEnv::new().await;
    let mut chris = user("chris", "chris.pike", "customer");
    chris["deletedFlag"] = json!(true);
    env.write("users.json", json!([user("amy", "amy", "customer"), chris]));

    env.seed().await;

    let chris = env
        .store
        .get_user_by_email("chris.pike@shop.test")
        .await
        .unwrap()
        .unwrap();
    assert!(chris.deleted_at.is_some());

    let amy = env.store.get_user_by_email("amy@shop.test").await.unwrap().unwrap();
    assert!(amy.deleted_at.is_none());
}

#[tokio::test]
async fn test_disabled_challenge_carries_warning() {
    let env = TestEnv::new().await;
    let mut risky = challenge("xxe", "Retrieve a file.", &[]);
    risky["disabledEnv"] = json!("Docker");
    env.write(
        "challenges.json",
        json!([risky, challenge("safe", "Harmless.", &[])]),
    );

    env.seed_with(&[Environment::Docker]).await;

    let risky = env.store.get_challenge_by_key("xxe").await.unwrap().unwrap();
    assert!(
        risky
            .description
            .ends_with(" <em>(This challenge is <strong>not available</strong> on Docker!)</em>")
    );
    assert_eq!(risky.disabled_env.as_deref(), Some("Docker"));

    let safe = env.store.get_challenge_by_key("safe").await.unwrap().unwrap();
    assert_eq!(safe.description, "Harmless.");
    assert!(safe.disabled_env.is_none());
}

#[tokio::test]
async fn test_safety_override_keeps_challenge_enabled() {
    let mut env = TestEnv::new().await;
    env.config.challenges.safety_override = true;
    let mut risky = challenge("xxe", "Retrieve a file.", &[]);
    risky["disabledEnv"] = json!("Heroku");
    env.write("challenges.json", json!([risky]));

    env.seed_with(&[Environment::Heroku]).await;

    let risky = env.store.get_challenge_by_key("xxe").await.unwrap().unwrap();
    assert!(risky.description.contains("potentially harmful"));
    assert!(risky.disabled_env.is_none());
}

#[tokio::test]
async fn test_security_answer_uses_question_position() {
    let env = TestEnv::new().await;
    env.write(
        "securityQuestions.json",
        json!([
            { "question": "First pet?" },
            { "question": "Mother's maiden name?" },
            { "question": "Favorite book?" }
        ]),
    );
    let mut amy = user("amy", "amy", "customer");
    amy["securityQuestion"] = json!({ "id": 2, "answer": "Smith" });
    let mut jim = user("jim", "jim", "customer");
    jim["securityQuestion"] = json!({ "id": 3, "answer": "Dune" });
    env.write("users.json", json!([amy, jim]));

    let report = env.seed().await;
    assert_eq!(created(&report, Family::SecurityQuestions), 3);

    for (email, question, expected) in [
        ("amy@shop.test", "Mother's maiden name?", "Smith"),
        ("jim@shop.test", "Favorite book?", "Dune"),
    ] {
        let user = env.store.get_user_by_email(email).await.unwrap().unwrap();
        let answer = env
            .store
            .security_answer_for_user(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(answer.answer, expected);

        let asked = env
            .store
            .get_security_question(answer.security_question_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asked.question, question);
    }
}

#[tokio::test]
async fn test_recycle_uses_first_address() {
    let env = TestEnv::new().await;
    let address = |street: &str| {
        json!({
            "fullName": "Jim",
            "mobileNum": 5_550_100,
            "zipCode": "12345",
            "streetAddress": street,
            "city": "Springfield",
            "country": "USA"
        })
    };
    let mut jim = user("jim", "jim", "customer");
    jim["address"] = json!([address("1 Main St"), address("2 Side St")]);
    env.write("users.json", json!([jim, user("amy", "amy", "customer")]));
    env.write(
        "recycles.json",
        json!([
            { "user": "jim", "quantity": 5, "isPickup": true },
            { "user": "amy", "quantity": 1 }
        ]),
    );

    let report = env.seed().await;
    assert_eq!(created(&report, Family::Recycles), 2);

    let jim = env.store.get_user_by_email("jim@shop.test").await.unwrap().unwrap();
    let addresses = env.store.addresses_for_user(jim.id).await.unwrap();
    assert_eq!(addresses.len(), 2);
    let first = addresses
        .iter()
        .find(|a| a.street_address == "1 Main St")
        .unwrap();

    let recycles = env.store.list_recycles().await.unwrap();
    let jims = recycles.iter().find(|r| r.user_id == jim.id).unwrap();
    assert_eq!(jims.address_id, Some(first.id));
    assert!(jims.is_pickup);

    let amys = recycles.iter().find(|r| r.user_id != jim.id).unwrap();
    assert!(amys.address_id.is_none());
}

#[tokio::test]
async fn test_unknown_references_skip_dependents() {
    let env = TestEnv::new().await;
    env.write("users.json", json!([user("jim", "jim", "customer")]));
    env.write(
        "products.json",
        json!([{ "name": "Apple Juice", "description": "Juicy.", "price": 1.99, "quantity": 10 }]),
    );
    env.write(
        "baskets.json",
        json!([
            { "user": "jim", "items": [
                { "product": "Apple Juice", "quantity": 2 },
                { "product": "Missing Product", "quantity": 1 }
            ] },
            { "user": "ghost", "items": [] }
        ]),
    );
    env.write(
        "complaints.json",
        json!([
            { "user": "jim", "message": "Too sour." },
            { "user": "ghost", "message": "Boo." }
        ]),
    );

    let report = env.seed().await;

    assert_eq!(created(&report, Family::Baskets), 1);
    assert_eq!(failed(&report, Family::Baskets), 1);
    assert_eq!(created(&report, Family::BasketItems), 1);
    assert_eq!(failed(&report, Family::BasketItems), 1);
    assert_eq!(created(&report, Family::Complaints), 1);
    assert_eq!(failed(&report, Family::Complaints), 1);
}

#[tokio::test]
async fn test_orders_use_deluxe_prices() {
    let env = TestEnv::new().await;
    env.write(
        "users.json",
        json!([user("bender", "bender", "deluxe"), user("jim", "jim", "customer")]),
    );
    env.write(
        "products.json",
        json!([{ "name": "Hoodie", "description": "Warm.", "price": 30.0, "deluxePrice": 20.0 }]),
    );
    env.write(
        "orders.json",
        json!([
            { "user": "bender", "products": [{ "product": "Hoodie", "quantity": 2 }], "eta": 2 },
            { "user": "jim", "products": [{ "product": "Hoodie", "quantity": 1 }], "delivered": true }
        ]),
    );

    let report = env.seed().await;
    assert_eq!(created(&report, Family::Orders), 2);

    let orders = env.store.list_orders().await.unwrap();
    let bender = orders.iter().find(|o| o.email == "bender@shop.test").unwrap();
    assert!((bender.total_price - 40.0).abs() < f64::EPSILON);
    assert_eq!(bender.bonus, 4);
    assert!(!bender.delivered);

    let jim = orders.iter().find(|o| o.email == "jim@shop.test").unwrap();
    assert!((jim.total_price - 30.0).abs() < f64::EPSILON);
    assert_eq!(jim.bonus, 3);
    assert!(jim.delivered);

    let lines: Value = serde_json::from_str(&jim.products).unwrap();
    assert_eq!(lines[0]["name"], "Hoodie");
    assert_eq!(lines[0]["quantity"], 1);
}

#[tokio::test]
async fn test_products_and_feedback() {
    let env = TestEnv::new().await;
    let mut amy = user("amy", "amy", "customer");
    amy["feedback"] = json!({ "comment": "Nice juice!", "rating": 4 });
    env.write("users.json", json!([amy]));
    env.write(
        "products.json",
        json!([
            { "name": "Apple Juice", "description": "Best <b>OWASP Juice Shop</b> juice.", "price": 1.99 },
            { "name": "Old Stock", "description": "Gone.", "price": 5.0, "deletedFlag": true }
        ]),
    );
    env.write(
        "feedback.json",
        json!([{ "comment": "Anonymous praise.", "rating": 5 }]),
    );

    let report = env.seed().await;
    assert_eq!(created(&report, Family::Products), 2);
    assert_eq!(created(&report, Family::Feedback), 1);

    let products = env.store.list_products().await.unwrap();
    let juice = products.iter().find(|p| p.name == "Apple Juice").unwrap();
    assert_eq!(juice.description, "Best <b>Test Shop</b> juice.");
    assert!((juice.deluxe_price - 1.99).abs() < f64::EPSILON);
    assert_eq!(juice.image, "undefined.png");
    assert!(juice.deleted_at.is_none());
    let old = products.iter().find(|p| p.name == "Old Stock").unwrap();
    assert!(old.deleted_at.is_some());

    let feedback = env.store.list_feedback().await.unwrap();
    assert_eq!(feedback.len(), 2);
    assert!(feedback.iter().any(|f| {
        f.user_id == Some(1) && f.comment == "Nice juice! (***@shop.test)" && f.rating == 4
    }));
    assert!(feedback.iter().any(|f| {
        f.user_id.is_none() && f.comment == "Anonymous praise. (anonymous)"
    }));
}

#[tokio::test]
async fn test_empty_fixture_directory_seeds_nothing() {
    let env = TestEnv::new().await;

    let report = env.seed().await;

    assert_eq!(report.families.len(), Family::ORDER.len());
    assert_eq!(report.created(), 0);
    assert_eq!(report.failed(), 0);
}

#[tokio::test]
async fn test_embedded_fixtures_seed_everything() {
    let env = TestEnv::new().await;

    let report = Seeder::new(env.store.clone(), env.config.clone())
        .with_fixtures(FixtureLoader::embedded())
        .with_environments(ActiveEnvironments::from_list(&[]))
        .run()
        .await
        .unwrap();

    assert_eq!(report.failed(), 0);
    for family in Family::ORDER {
        assert!(created(&report, family) > 0, "{family} created nothing");
    }

    let counts = env.store.table_counts().await.unwrap();
    assert_eq!(counts.users as usize, created(&report, Family::Users));
    assert_eq!(counts.hints as usize, created(&report, Family::Hints));

    for challenge in env.store.list_challenges().await.unwrap() {
        assert!(!challenge.description.contains("juice-sh.op"));
    }
}

#[tokio::test]
async fn test_second_seed_is_refused_without_fresh() {
    let env = TestEnv::new().await;
    let mut jim = user("jim", "jim", "customer");
    jim["walletBalance"] = json!(10);
    env.write("users.json", json!([user("amy", "amy", "customer"), jim]));
    env.write(
        "products.json",
        json!([{ "name": "Apple Juice", "description": "Juicy.", "price": 1.99 }]),
    );

    env.seed().await;
    let before = env.store.table_counts().await.unwrap();

    let err = env.seeder().run().await.unwrap_err();
    assert!(err.to_string().contains("--fresh"), "{err}");

    let after = env.store.table_counts().await.unwrap();
    assert_eq!(after.users, before.users);
    assert_eq!(after.products, before.products);
    assert_eq!(env.store.list_wallets().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fresh_seed_replaces_previous_data() {
    let env = TestEnv::new().await;
    env.write(
        "users.json",
        json!([user("amy", "amy", "customer"), user("jim", "jim", "customer")]),
    );
    env.write(
        "products.json",
        json!([{ "name": "Apple Juice", "description": "Juicy.", "price": 1.99 }]),
    );

    env.seed().await;
    let report = env.seeder().with_fresh(true).run().await.unwrap();

    assert_eq!(report.failed(), 0);
    assert_eq!(created(&report, Family::Users), 2);

    let counts = env.store.table_counts().await.unwrap();
    assert_eq!(counts.users, 2);
    assert_eq!(counts.products, 1);

    let ids: Vec<i32> = env
        .store
        .list_users()
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(env.store.list_wallets().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_metadata_placeholder_is_rewritten() {
    let mut env = TestEnv::new().await;
    let metadata = env.fixtures_dir.join("metadata.json");
    std::fs::write(&metadata, r#"{"image":"http://localhost:3000/logo.png"}"#).unwrap();
    env.config.server.base_url = "https://shop.test".to_string();
    env.config.metadata.files = vec![path_string(&metadata)];

    let report = env.seed().await;

    assert_eq!(report.metadata_files_rewritten, 1);
    let content = std::fs::read_to_string(&metadata).unwrap();
    assert_eq!(content, r#"{"image":"https://shop.test/logo.png"}"#);
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
