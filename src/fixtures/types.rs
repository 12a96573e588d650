//! Typed fixture records as they appear in the fixture JSON files.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Deluxe,
    Accounting,
    Admin,
    /// Also covers legacy and unknown role names such as `user`.
    #[default]
    #[serde(other)]
    Customer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Deluxe => "deluxe",
            Self::Accounting => "accounting",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityQuestionFixture {
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFixture {
    pub key: String,
    #[serde(default)]
    pub username: String,
    /// Local part unless `custom_domain` is set.
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub custom_domain: bool,
    pub profile_image: Option<String>,
    pub totp_secret: Option<String>,
    pub last_login_ip: Option<String>,
    pub wallet_balance: Option<f64>,
    #[serde(default)]
    pub deleted_flag: bool,
    pub security_question: Option<SecurityAnswerFixture>,
    pub feedback: Option<FeedbackFixture>,
    #[serde(default)]
    pub address: Vec<AddressFixture>,
    #[serde(default)]
    pub card: Vec<CardFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityAnswerFixture {
    /// 1-based position in the security question fixture list.
    pub id: i32,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackFixture {
    pub comment: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFixture {
    pub full_name: String,
    pub mobile_num: i64,
    pub zip_code: String,
    pub street_address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFixture {
    pub full_name: String,
    pub card_num: i64,
    pub exp_month: i32,
    pub exp_year: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeFixture {
    pub key: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub hints: Vec<String>,
    pub hint_url: Option<String>,
    pub mitigation_url: Option<String>,
    pub disabled_env: Option<String>,
    pub tutorial: Option<TutorialFixture>,
    #[serde(default)]
    pub has_coding_challenge: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TutorialFixture {
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFixture {
    pub name: String,
    pub price: f64,
    pub deluxe_price: f64,
    pub eta: i32,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub deluxe_price: Option<f64>,
    #[serde(default = "default_product_image")]
    pub image: String,
    pub quantity: Option<i32>,
    pub limit_per_user: Option<i32>,
    #[serde(default)]
    pub deleted_flag: bool,
}

fn default_product_image() -> String {
    "undefined.png".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasketFixture {
    /// Key of the owning user fixture.
    pub user: String,
    pub coupon: Option<String>,
    #[serde(default)]
    pub items: Vec<BasketItemFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasketItemFixture {
    /// Name of the product fixture.
    pub product: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintFixture {
    pub user: String,
    pub message: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycleFixture {
    pub user: String,
    pub quantity: i32,
    #[serde(default)]
    pub is_pickup: bool,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderFixture {
    pub user: String,
    pub products: Vec<BasketItemFixture>,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub eta: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryFixture {
    pub user: String,
    pub caption: String,
    pub image: String,
}
